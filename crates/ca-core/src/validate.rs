//! Form validation
//!
//! The store accepts any payload; these are the boundary checks run on raw
//! form input before a client, director or template is saved.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{ClientStatus, Director, EmailTemplate, NewClient, NewTemplate, TemplateCategory, TemplatePatch};
use crate::{Error, Result};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// One rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn reject<T>(form: &str, errors: &[FieldError]) -> Result<T> {
    let joined = errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
    warn!("Rejected {} form: {}", form, joined);
    Err(Error::Validation(joined))
}

/// Raw add-client form input; blank strings mean "not given"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub alternate_contact: String,
    pub company_name: String,
    pub business_type: String,
    pub pan_number: String,
    pub gst_number: String,
    /// `yyyy-MM-dd`
    pub registration_date: String,
    pub status: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pin_code: String,
    pub services: Vec<String>,
    pub directors: Vec<Director>,
    pub notes: String,
}

impl Default for ClientForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            alternate_contact: String::new(),
            company_name: String::new(),
            business_type: String::new(),
            pan_number: String::new(),
            gst_number: String::new(),
            registration_date: String::new(),
            status: ClientStatus::Active.as_str().to_string(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            country: "India".to_string(),
            pin_code: String::new(),
            services: Vec::new(),
            directors: Vec::new(),
            notes: String::new(),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl ClientForm {
    /// Every problem with the form, in form order; empty when it can be submitted
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let mut check = |failed: bool, field: &'static str, message: &'static str| {
            if failed {
                errors.push(FieldError { field, message });
            }
        };

        check(self.name.trim().is_empty(), "name", "Client name is required");
        if self.email.trim().is_empty() {
            check(true, "email", "Email is required");
        } else {
            check(!is_valid_email(&self.email), "email", "Invalid email");
        }
        check(self.phone.trim().is_empty(), "phone", "Phone is required");
        check(self.company_name.trim().is_empty(), "company_name", "Company name is required");
        check(self.business_type.trim().is_empty(), "business_type", "Business type is required");

        if non_blank(&self.registration_date).is_some() && self.parsed_registration_date().is_none() {
            errors.push(FieldError {
                field: "registration_date",
                message: "Invalid date",
            });
        }
        if self.status.parse::<ClientStatus>().is_err() {
            errors.push(FieldError {
                field: "status",
                message: "Unknown status",
            });
        }
        errors
    }

    fn parsed_registration_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.registration_date.trim(), "%Y-%m-%d").ok()
    }

    /// Validate and build the store payload
    ///
    /// Categories become the chosen services, or the business type when no
    /// service was picked. Directors without a name are dropped.
    pub fn into_new_client(self) -> Result<NewClient> {
        let errors = self.validate();
        if !errors.is_empty() {
            return reject("client", &errors);
        }

        let registration_date = self.parsed_registration_date();
        let status = self.status.parse::<ClientStatus>().ok();
        let categories = if self.services.is_empty() {
            [self.business_type.clone()].into_iter().collect()
        } else {
            self.services.iter().cloned().collect()
        };

        Ok(NewClient {
            name: self.name,
            email: self.email,
            phone: self.phone,
            alternate_contact: non_blank(&self.alternate_contact),
            categories,
            company_name: self.company_name,
            pan_number: non_blank(&self.pan_number),
            gst_number: non_blank(&self.gst_number),
            registration_date,
            business_type: self.business_type,
            address: non_blank(&self.address),
            city: non_blank(&self.city),
            state: non_blank(&self.state),
            country: non_blank(&self.country),
            pin_code: non_blank(&self.pin_code),
            status,
            services: self.services,
            directors: self.directors.into_iter().filter(|d| !d.name.trim().is_empty()).collect(),
            notes: non_blank(&self.notes),
        })
    }
}

/// Raw add-director input from the client detail page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorForm {
    pub name: String,
    pub din: String,
    pub designation: String,
    pub email: String,
    pub phone: String,
    pub pan: String,
    pub aadhar: String,
}

impl DirectorForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError {
                field: "name",
                message: "Director name is required",
            });
        }
        errors
    }

    pub fn into_director(self) -> Result<Director> {
        let errors = self.validate();
        if !errors.is_empty() {
            return reject("director", &errors);
        }

        let mut director = Director::new(self.name.trim());
        if let Some(din) = non_blank(&self.din) {
            director = director.with_din(din);
        }
        if let Some(designation) = non_blank(&self.designation) {
            director = director.with_designation(designation);
        }
        if let Some(email) = non_blank(&self.email) {
            director = director.with_email(email);
        }
        director.phone = non_blank(&self.phone);
        director.pan = non_blank(&self.pan);
        director.aadhar = non_blank(&self.aadhar);
        Ok(director)
    }
}

/// Raw create/edit template input
///
/// Every field is required and the category must be one of the fixed set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateForm {
    pub name: String,
    pub category: String,
    pub subject: String,
    pub body: String,
}

impl TemplateForm {
    /// Form pre-filled from a saved template, as the edit page opens it
    pub fn from_template(template: &EmailTemplate) -> Self {
        Self {
            name: template.name.clone(),
            category: template.category.as_str().to_string(),
            subject: template.subject.clone(),
            body: template.body.clone(),
        }
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let mut check = |failed: bool, field: &'static str, message: &'static str| {
            if failed {
                errors.push(FieldError { field, message });
            }
        };

        check(self.name.trim().is_empty(), "name", "Template name is required");
        if self.category.trim().is_empty() {
            check(true, "category", "Category is required");
        } else {
            check(
                self.category.parse::<TemplateCategory>().is_err(),
                "category",
                "Unknown category",
            );
        }
        check(self.subject.trim().is_empty(), "subject", "Subject is required");
        check(self.body.trim().is_empty(), "body", "Body is required");
        errors
    }

    fn checked_category(&self) -> Result<TemplateCategory> {
        let errors = self.validate();
        if !errors.is_empty() {
            return reject("template", &errors);
        }
        self.category.parse().map_err(Error::Validation)
    }

    pub fn into_new_template(self) -> Result<NewTemplate> {
        let category = self.checked_category()?;
        Ok(NewTemplate::new(self.name, category, self.subject, self.body))
    }

    /// Patch replacing every field of the edited template
    pub fn into_patch(self) -> Result<TemplatePatch> {
        let category = self.checked_category()?;
        Ok(TemplatePatch {
            name: Some(self.name),
            category: Some(category),
            subject: Some(self.subject),
            body: Some(self.body),
        })
    }
}

//! Client and director records

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// Engagement status of a client
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
    Pending,
}

impl ClientStatus {
    pub const ALL: [ClientStatus; 3] = [Self::Active, Self::Inactive, Self::Pending];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Pending => "Pending",
        }
    }

    /// Status after flipping the Active/Inactive switch in the client list
    pub fn toggled(&self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            _ => Self::Active,
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "pending" => Ok(Self::Pending),
            other => Err(format!("unknown client status: {}", other)),
        }
    }
}

/// Category tags offered by the client list filters
pub const CLIENT_CATEGORIES: [&str; 5] = ["Individual", "Company", "Startup", "Partnership", "LLP"];

/// Legal forms offered on the client form
pub const BUSINESS_TYPES: [&str; 5] = ["Sole Proprietor", "Partnership", "LLP", "Pvt Ltd", "Public Ltd"];

/// Services a practice offers its clients
pub const CA_SERVICES: [&str; 5] = [
    "TDS returns",
    "Audit service",
    "Company registration",
    "Compliances",
    "GST filing",
];

/// Director of a client company
///
/// Owned by exactly one client and only reachable through it.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Director {
    pub name: String,
    #[serde(default)]
    pub din: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub pan: Option<String>,
    #[serde(default)]
    pub aadhar: Option<String>,
}

impl Director {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_designation(mut self, designation: impl Into<String>) -> Self {
        self.designation = Some(designation.into());
        self
    }

    pub fn with_din(mut self, din: impl Into<String>) -> Self {
        self.din = Some(din.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// A client of the practice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub alternate_contact: Option<String>,
    #[serde(default)]
    pub categories: BTreeSet<String>,
    pub company_name: String,
    #[serde(default)]
    pub pan_number: Option<String>,
    #[serde(default)]
    pub gst_number: Option<String>,
    #[serde(default)]
    pub registration_date: Option<NaiveDate>,
    pub business_type: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub pin_code: Option<String>,
    pub status: ClientStatus,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub directors: Vec<Director>,
    /// Set once when the client is added
    pub added_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Client {
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    /// Local part of the email address, or `"user"` when there is none
    pub fn username(&self) -> String {
        let local = self.email.split('@').next().unwrap_or_default();
        if local.is_empty() {
            "user".to_string()
        } else {
            local.to_string()
        }
    }
}

/// Payload for adding a client
///
/// The store assigns `id` and `added_date`; a missing status becomes Active.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub alternate_contact: Option<String>,
    #[serde(default)]
    pub categories: BTreeSet<String>,
    pub company_name: String,
    #[serde(default)]
    pub pan_number: Option<String>,
    #[serde(default)]
    pub gst_number: Option<String>,
    #[serde(default)]
    pub registration_date: Option<NaiveDate>,
    pub business_type: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub pin_code: Option<String>,
    #[serde(default)]
    pub status: Option<ClientStatus>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub directors: Vec<Director>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewClient {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        company_name: impl Into<String>,
        business_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            company_name: company_name.into(),
            business_type: business_type.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    pub fn with_status(mut self, status: ClientStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_director(mut self, director: Director) -> Self {
        self.directors.push(director);
        self
    }

    pub(crate) fn into_client(self, id: EntityId, added_date: DateTime<Utc>) -> Client {
        Client {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            alternate_contact: self.alternate_contact,
            categories: self.categories,
            company_name: self.company_name,
            pan_number: self.pan_number,
            gst_number: self.gst_number,
            registration_date: self.registration_date,
            business_type: self.business_type,
            address: self.address,
            city: self.city,
            state: self.state,
            country: self.country,
            pin_code: self.pin_code,
            status: self.status.unwrap_or_default(),
            services: self.services,
            directors: self.directors,
            added_date,
            notes: self.notes,
        }
    }
}

/// Typed partial update for a client
///
/// `None` leaves a field untouched. For optional fields the inner `Option`
/// is the new value, so `Some(None)` clears it. `id` and `added_date` are not
/// patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub alternate_contact: Option<Option<String>>,
    pub categories: Option<BTreeSet<String>>,
    pub company_name: Option<String>,
    pub pan_number: Option<Option<String>>,
    pub gst_number: Option<Option<String>>,
    pub registration_date: Option<Option<NaiveDate>>,
    pub business_type: Option<String>,
    pub address: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub state: Option<Option<String>>,
    pub country: Option<Option<String>>,
    pub pin_code: Option<Option<String>>,
    pub status: Option<ClientStatus>,
    pub services: Option<Vec<String>>,
    pub directors: Option<Vec<Director>>,
    pub notes: Option<Option<String>>,
}

impl ClientPatch {
    pub fn status(status: ClientStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.alternate_contact.is_none()
            && self.categories.is_none()
            && self.company_name.is_none()
            && self.pan_number.is_none()
            && self.gst_number.is_none()
            && self.registration_date.is_none()
            && self.business_type.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.country.is_none()
            && self.pin_code.is_none()
            && self.status.is_none()
            && self.services.is_none()
            && self.directors.is_none()
            && self.notes.is_none()
    }

    /// Merge the patch into `client`
    pub fn apply(self, client: &mut Client) {
        if let Some(v) = self.name {
            client.name = v;
        }
        if let Some(v) = self.email {
            client.email = v;
        }
        if let Some(v) = self.phone {
            client.phone = v;
        }
        if let Some(v) = self.alternate_contact {
            client.alternate_contact = v;
        }
        if let Some(v) = self.categories {
            client.categories = v;
        }
        if let Some(v) = self.company_name {
            client.company_name = v;
        }
        if let Some(v) = self.pan_number {
            client.pan_number = v;
        }
        if let Some(v) = self.gst_number {
            client.gst_number = v;
        }
        if let Some(v) = self.registration_date {
            client.registration_date = v;
        }
        if let Some(v) = self.business_type {
            client.business_type = v;
        }
        if let Some(v) = self.address {
            client.address = v;
        }
        if let Some(v) = self.city {
            client.city = v;
        }
        if let Some(v) = self.state {
            client.state = v;
        }
        if let Some(v) = self.country {
            client.country = v;
        }
        if let Some(v) = self.pin_code {
            client.pin_code = v;
        }
        if let Some(v) = self.status {
            client.status = v;
        }
        if let Some(v) = self.services {
            client.services = v;
        }
        if let Some(v) = self.directors {
            client.directors = v;
        }
        if let Some(v) = self.notes {
            client.notes = v;
        }
    }
}

//! Email templates

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// Fixed set of template categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TemplateCategory {
    #[serde(rename = "Login Credentials")]
    LoginCredentials,
    Notifications,
    #[serde(rename = "Follow-ups")]
    FollowUps,
    Reminders,
    #[default]
    General,
    Custom,
}

impl TemplateCategory {
    pub const ALL: [TemplateCategory; 6] = [
        Self::LoginCredentials,
        Self::Notifications,
        Self::FollowUps,
        Self::Reminders,
        Self::General,
        Self::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoginCredentials => "Login Credentials",
            Self::Notifications => "Notifications",
            Self::FollowUps => "Follow-ups",
            Self::Reminders => "Reminders",
            Self::General => "General",
            Self::Custom => "Custom",
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().to_lowercase() == wanted)
            .ok_or_else(|| format!("unknown template category: {}", s.trim()))
    }
}

/// A reusable email template; subject and body may hold `{{key}}` placeholders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailTemplate {
    pub id: EntityId,
    pub name: String,
    pub category: TemplateCategory,
    pub subject: String,
    pub body: String,
    /// Refreshed on every mutation
    pub last_modified: DateTime<Utc>,
    /// Only ever increases
    pub usage_count: u64,
}

/// Payload for adding a template
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewTemplate {
    pub name: String,
    pub category: TemplateCategory,
    pub subject: String,
    pub body: String,
}

impl NewTemplate {
    pub fn new(
        name: impl Into<String>,
        category: TemplateCategory,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Payload for a copy of `template`
    pub fn duplicate_of(template: &EmailTemplate) -> Self {
        Self {
            name: format!("{} (Copy)", template.name),
            category: template.category,
            subject: template.subject.clone(),
            body: template.body.clone(),
        }
    }

    pub(crate) fn into_template(self, id: EntityId, now: DateTime<Utc>) -> EmailTemplate {
        EmailTemplate {
            id,
            name: self.name,
            category: self.category,
            subject: self.subject,
            body: self.body,
            last_modified: now,
            usage_count: 0,
        }
    }
}

/// Typed partial update for a template
///
/// Usage is counted through the store, never set through a patch.
#[derive(Debug, Clone, Default)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub category: Option<TemplateCategory>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

impl TemplatePatch {
    /// Merge the patch and stamp `last_modified`, whatever changed
    pub fn apply(self, template: &mut EmailTemplate, now: DateTime<Utc>) {
        if let Some(v) = self.name {
            template.name = v;
        }
        if let Some(v) = self.category {
            template.category = v;
        }
        if let Some(v) = self.subject {
            template.subject = v;
        }
        if let Some(v) = self.body {
            template.body = v;
        }
        template.last_modified = now;
    }
}

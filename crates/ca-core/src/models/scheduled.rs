//! Outgoing (sent, scheduled and recurring) emails

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// Delivery status of an outgoing email
///
/// Nothing moves a record between states on its own; only explicit updates do.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum DeliveryStatus {
    #[default]
    Pending,
    Sending,
    Sent,
    Failed,
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "Pending",
            Self::Sending => "Sending",
            Self::Sent => "Sent",
            Self::Failed => "Failed",
        };
        f.write_str(s)
    }
}

/// One-off or repeating
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
    #[default]
    Scheduled,
    Recurring,
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => f.write_str("scheduled"),
            Self::Recurring => f.write_str("recurring"),
        }
    }
}

/// Repeat interval of a recurring email
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RepeatFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for RepeatFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => f.write_str("Daily"),
            Self::Weekly => f.write_str("Weekly"),
            Self::Monthly => f.write_str("Monthly"),
        }
    }
}

impl FromStr for RepeatFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(format!("unknown repeat frequency: {}", other)),
        }
    }
}

/// An outgoing email record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledEmail {
    pub id: EntityId,
    pub subject: String,
    pub recipients: Vec<String>,
    /// Cached `recipients.len()`, fixed when the record is created
    pub recipients_count: usize,
    pub schedule_date: DateTime<Utc>,
    pub status: DeliveryStatus,
    #[serde(rename = "type")]
    pub kind: ScheduleKind,
    /// Only meaningful for recurring emails
    #[serde(default)]
    pub repeat_frequency: Option<RepeatFrequency>,
    pub body: String,
    /// Only meaningful once sent
    #[serde(default)]
    pub waiting_for_reply: bool,
}

impl ScheduledEmail {
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.status == DeliveryStatus::Pending && self.schedule_date > now
    }

    pub fn is_draft(&self, now: DateTime<Utc>) -> bool {
        self.status == DeliveryStatus::Pending && self.schedule_date <= now
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.status == DeliveryStatus::Sent && self.waiting_for_reply
    }
}

/// Payload for adding an outgoing email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScheduledEmail {
    pub subject: String,
    pub recipients: Vec<String>,
    pub schedule_date: DateTime<Utc>,
    pub status: DeliveryStatus,
    #[serde(rename = "type")]
    pub kind: ScheduleKind,
    #[serde(default)]
    pub repeat_frequency: Option<RepeatFrequency>,
    pub body: String,
    #[serde(default)]
    pub waiting_for_reply: bool,
}

impl NewScheduledEmail {
    pub(crate) fn into_email(self, id: EntityId) -> ScheduledEmail {
        ScheduledEmail {
            id,
            subject: self.subject,
            recipients_count: self.recipients.len(),
            recipients: self.recipients,
            schedule_date: self.schedule_date,
            status: self.status,
            kind: self.kind,
            repeat_frequency: self.repeat_frequency,
            body: self.body,
            waiting_for_reply: self.waiting_for_reply,
        }
    }
}

/// Typed partial update for an outgoing email
#[derive(Debug, Clone, Default)]
pub struct ScheduledEmailPatch {
    pub subject: Option<String>,
    pub recipients: Option<Vec<String>>,
    pub schedule_date: Option<DateTime<Utc>>,
    pub status: Option<DeliveryStatus>,
    pub kind: Option<ScheduleKind>,
    pub repeat_frequency: Option<Option<RepeatFrequency>>,
    pub body: Option<String>,
    pub waiting_for_reply: Option<bool>,
}

impl ScheduledEmailPatch {
    pub fn status(status: DeliveryStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Merge the patch into `email`
    ///
    /// Replacing the recipient list refreshes the cached count with it.
    pub fn apply(self, email: &mut ScheduledEmail) {
        if let Some(v) = self.subject {
            email.subject = v;
        }
        if let Some(v) = self.recipients {
            email.recipients_count = v.len();
            email.recipients = v;
        }
        if let Some(v) = self.schedule_date {
            email.schedule_date = v;
        }
        if let Some(v) = self.status {
            email.status = v;
        }
        if let Some(v) = self.kind {
            email.kind = v;
        }
        if let Some(v) = self.repeat_frequency {
            email.repeat_frequency = v;
        }
        if let Some(v) = self.body {
            email.body = v;
        }
        if let Some(v) = self.waiting_for_reply {
            email.waiting_for_reply = v;
        }
    }
}

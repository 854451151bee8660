//! Inbox (received) emails

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// An email in the practice inbox
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReceivedEmail {
    pub id: EntityId,
    pub from: String,
    pub from_name: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub received_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub is_starred: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub has_attachment: bool,
    /// Lookup-only link to a client; may dangle after the client is deleted
    #[serde(default)]
    pub client_id: Option<EntityId>,
}

/// Payload for adding an inbox email
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewReceivedEmail {
    pub from: String,
    pub from_name: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub received_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub is_starred: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub has_attachment: bool,
    #[serde(default)]
    pub client_id: Option<EntityId>,
}

impl NewReceivedEmail {
    pub fn new(
        from: impl Into<String>,
        from_name: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            from_name: from_name.into(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn received_at(mut self, at: DateTime<Utc>) -> Self {
        self.received_at = Some(at);
        self
    }

    pub fn from_client(mut self, client_id: EntityId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn starred(mut self) -> Self {
        self.is_starred = true;
        self
    }

    pub fn read(mut self) -> Self {
        self.is_read = true;
        self
    }

    pub fn archived(mut self) -> Self {
        self.is_archived = true;
        self
    }

    pub fn with_attachment(mut self) -> Self {
        self.has_attachment = true;
        self
    }

    /// A missing receive time defaults to `now`
    pub(crate) fn into_email(self, id: EntityId, now: DateTime<Utc>) -> ReceivedEmail {
        ReceivedEmail {
            id,
            from: self.from,
            from_name: self.from_name,
            to: self.to,
            subject: self.subject,
            body: self.body,
            received_at: self.received_at.unwrap_or(now),
            is_read: self.is_read,
            is_starred: self.is_starred,
            is_archived: self.is_archived,
            has_attachment: self.has_attachment,
            client_id: self.client_id,
        }
    }
}

/// Typed partial update for an inbox email
///
/// Cloneable so one patch can be applied across a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceivedEmailPatch {
    pub is_read: Option<bool>,
    pub is_starred: Option<bool>,
    pub is_archived: Option<bool>,
    pub client_id: Option<Option<EntityId>>,
}

impl ReceivedEmailPatch {
    pub fn read(is_read: bool) -> Self {
        Self {
            is_read: Some(is_read),
            ..Default::default()
        }
    }

    pub fn starred(is_starred: bool) -> Self {
        Self {
            is_starred: Some(is_starred),
            ..Default::default()
        }
    }

    pub fn archived(is_archived: bool) -> Self {
        Self {
            is_archived: Some(is_archived),
            ..Default::default()
        }
    }

    /// Merge the patch into `email`
    pub fn apply(&self, email: &mut ReceivedEmail) {
        if let Some(v) = self.is_read {
            email.is_read = v;
        }
        if let Some(v) = self.is_starred {
            email.is_starred = v;
        }
        if let Some(v) = self.is_archived {
            email.is_archived = v;
        }
        if let Some(v) = self.client_id {
            email.client_id = v;
        }
    }
}

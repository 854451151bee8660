//! Email composer
//!
//! Nothing is delivered. "Sending" records an outgoing email in the store:
//! sent immediately, scheduled for later or scheduled to recur.

use std::fmt;

use ca_core::EntityId;
use ca_core::models::{DeliveryStatus, NewScheduledEmail, RepeatFrequency, ScheduleKind};
use ca_core::store::PracticeStore;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::{MailError, Result};
use crate::recipients::RecipientSelection;

/// When and how often the composed email goes out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOption {
    /// Record as sent right away
    Now { waiting_for_reply: bool },
    /// Pending until `at`
    Later { at: DateTime<Utc> },
    /// Pending from `at`, repeating every `frequency`
    Recurring {
        at: DateTime<Utc>,
        frequency: RepeatFrequency,
    },
}

impl Default for SendOption {
    fn default() -> Self {
        Self::Now {
            waiting_for_reply: false,
        }
    }
}

impl fmt::Display for SendOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Now { .. } => f.write_str("now"),
            Self::Later { at } => write!(f, "at {}", at.format("%Y-%m-%d %H:%M")),
            Self::Recurring { at, frequency } => {
                write!(f, "{} from {}", frequency, at.format("%Y-%m-%d %H:%M"))
            }
        }
    }
}

/// Email being written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
    pub recipients: RecipientSelection,
}

impl EmailDraft {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            recipients: RecipientSelection::new(),
        }
    }

    pub fn with_recipient(mut self, email: impl Into<String>) -> Self {
        self.recipients.add(email);
        self
    }

    /// Subject, body and at least one recipient
    pub fn check_ready(&self) -> Result<()> {
        let missing: Vec<&str> = [("subject", &self.subject), ("body", &self.body)]
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect();
        if !missing.is_empty() {
            return Err(MailError::MissingFields(missing.join(", ")));
        }
        if self.recipients.is_empty() {
            return Err(MailError::NoRecipients);
        }
        Ok(())
    }

    fn to_outgoing(&self, option: SendOption, now: DateTime<Utc>) -> NewScheduledEmail {
        let (schedule_date, status, kind, repeat_frequency, waiting_for_reply) = match option {
            SendOption::Now { waiting_for_reply } => {
                (now, DeliveryStatus::Sent, ScheduleKind::Scheduled, None, waiting_for_reply)
            }
            SendOption::Later { at } => (at, DeliveryStatus::Pending, ScheduleKind::Scheduled, None, false),
            SendOption::Recurring { at, frequency } => {
                (at, DeliveryStatus::Pending, ScheduleKind::Recurring, Some(frequency), false)
            }
        };

        NewScheduledEmail {
            subject: self.subject.clone(),
            recipients: self.recipients.as_slice().to_vec(),
            schedule_date,
            status,
            kind,
            repeat_frequency,
            body: self.body.clone(),
            waiting_for_reply,
        }
    }
}

/// Record the draft as an outgoing email and return its id
///
/// Placeholders are stored unrendered.
pub fn send(store: &mut PracticeStore, draft: &EmailDraft, option: SendOption, now: DateTime<Utc>) -> Result<EntityId> {
    if let Err(e) = draft.check_ready() {
        warn!("Refused to send draft: {}", e);
        return Err(e);
    }

    let id = store.add_scheduled_email(draft.to_outgoing(option, now));
    info!(
        "Outgoing email {} to {} recipient(s), {}",
        id,
        draft.recipients.len(),
        option
    );
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ca_core::query::{ScheduledTab, filter_scheduled};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap()
    }

    fn ready() -> EmailDraft {
        EmailDraft::new("GST due", "Dear {{client_name}}")
            .with_recipient("john@smith.com")
            .with_recipient("jane@doe.com")
    }

    #[test]
    fn test_send_now_is_sent_at_now() {
        let mut store = PracticeStore::new();
        let option = SendOption::Now {
            waiting_for_reply: true,
        };
        let id = send(&mut store, &ready(), option, now()).unwrap();

        let email = store.scheduled_email(id).unwrap();
        assert_eq!(email.status, DeliveryStatus::Sent);
        assert_eq!(email.kind, ScheduleKind::Scheduled);
        assert_eq!(email.schedule_date, now());
        assert_eq!(email.recipients_count, 2);
        assert_eq!(email.body, "Dear {{client_name}}");
        assert!(email.is_awaiting_reply());
    }

    #[test]
    fn test_send_later_is_upcoming() {
        let mut store = PracticeStore::new();
        let at = now() + Duration::days(2);
        let id = send(&mut store, &ready(), SendOption::Later { at }, now()).unwrap();

        let upcoming = filter_scheduled(store.scheduled_emails(), ScheduledTab::Upcoming, now());
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].id, id);
        assert!(!upcoming[0].waiting_for_reply);
    }

    #[test]
    fn test_send_recurring_records_frequency() {
        let mut store = PracticeStore::new();
        let option = SendOption::Recurring {
            at: now() + Duration::hours(1),
            frequency: RepeatFrequency::Weekly,
        };
        let id = send(&mut store, &ready(), option, now()).unwrap();

        let email = store.scheduled_email(id).unwrap();
        assert_eq!(email.kind, ScheduleKind::Recurring);
        assert_eq!(email.repeat_frequency, Some(RepeatFrequency::Weekly));
        assert_eq!(email.status, DeliveryStatus::Pending);
    }

    #[test]
    fn test_incomplete_draft_is_refused() {
        let mut store = PracticeStore::new();

        let err = send(&mut store, &EmailDraft::new(" ", ""), SendOption::default(), now()).unwrap_err();
        assert!(matches!(err, MailError::MissingFields(ref f) if f == "subject, body"));

        let err = send(&mut store, &EmailDraft::new("Hi", "Body"), SendOption::default(), now()).unwrap_err();
        assert!(matches!(err, MailError::NoRecipients));

        assert!(store.scheduled_emails().is_empty());
    }
}

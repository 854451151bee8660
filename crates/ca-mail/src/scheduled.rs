//! Actions on outgoing emails

use ca_core::EntityId;
use ca_core::models::{DeliveryStatus, ScheduledEmailPatch};
use ca_core::store::PracticeStore;
use tracing::info;

use crate::error::{MailError, Result};

/// Put an outgoing email back to Pending
///
/// Only the status changes; the schedule date stays, so a paused email
/// whose date has passed shows up under Drafts.
pub fn pause(store: &mut PracticeStore, id: EntityId) -> Result<()> {
    if !store.update_scheduled_email(id, ScheduledEmailPatch::status(DeliveryStatus::Pending)) {
        return Err(MailError::EmailNotFound(id));
    }
    info!("Paused outgoing email {}", id);
    Ok(())
}

/// Flag or unflag a sent email as waiting for a client reply
pub fn set_waiting_for_reply(store: &mut PracticeStore, id: EntityId, waiting: bool) -> Result<()> {
    let patch = ScheduledEmailPatch {
        waiting_for_reply: Some(waiting),
        ..Default::default()
    };
    if store.update_scheduled_email(id, patch) {
        Ok(())
    } else {
        Err(MailError::EmailNotFound(id))
    }
}

pub fn delete(store: &mut PracticeStore, id: EntityId) -> Result<()> {
    if !store.delete_scheduled_email(id) {
        return Err(MailError::EmailNotFound(id));
    }
    info!("Deleted outgoing email {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{EmailDraft, SendOption, send};
    use ca_core::query::{ScheduledTab, TabCounts};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_pause_sent_email_turns_it_into_a_draft() {
        let now = Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap();
        let mut store = PracticeStore::new();
        let draft = EmailDraft::new("Hi", "Body").with_recipient("a@x.com");
        let id = send(
            &mut store,
            &draft,
            SendOption::Now {
                waiting_for_reply: true,
            },
            now,
        )
        .unwrap();

        pause(&mut store, id).unwrap();

        let counts = TabCounts::of(store.scheduled_emails(), now + Duration::minutes(1));
        assert_eq!(counts.get(ScheduledTab::Sent), 0);
        assert_eq!(counts.get(ScheduledTab::WaitingForReply), 0);
        assert_eq!(counts.get(ScheduledTab::Drafts), 1);
    }

    #[test]
    fn test_waiting_flag_and_delete() {
        let now = Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap();
        let mut store = PracticeStore::new();
        let draft = EmailDraft::new("Hi", "Body").with_recipient("a@x.com");
        let id = send(&mut store, &draft, SendOption::default(), now).unwrap();

        set_waiting_for_reply(&mut store, id, true).unwrap();
        assert!(store.scheduled_email(id).unwrap().is_awaiting_reply());

        delete(&mut store, id).unwrap();
        assert!(matches!(delete(&mut store, id), Err(MailError::EmailNotFound(_))));
        assert!(matches!(pause(&mut store, id), Err(MailError::EmailNotFound(_))));
    }
}

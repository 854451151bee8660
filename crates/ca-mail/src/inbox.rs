//! Inbox actions

use std::fmt;
use std::str::FromStr;

use ca_core::EntityId;
use ca_core::models::{ReceivedEmail, ReceivedEmailPatch};
use ca_core::store::PracticeStore;
use tracing::info;

use crate::error::{MailError, Result};

/// Open an email for reading; an unread email becomes read
pub fn open_email(store: &mut PracticeStore, id: EntityId) -> Result<ReceivedEmail> {
    let unread = store
        .received_email(id)
        .map(|e| !e.is_read)
        .ok_or(MailError::EmailNotFound(id))?;
    if unread {
        store.mark_received_email_read(id);
    }
    store.received_email(id).cloned().ok_or(MailError::EmailNotFound(id))
}

/// Flip the star; returns the new state
pub fn toggle_star(store: &mut PracticeStore, id: EntityId) -> Result<bool> {
    let starred = !store
        .received_email(id)
        .map(|e| e.is_starred)
        .ok_or(MailError::EmailNotFound(id))?;
    store.update_received_email(id, ReceivedEmailPatch::starred(starred));
    Ok(starred)
}

/// Action applied to every selected email at once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    MarkRead,
    MarkUnread,
    Archive,
    Unarchive,
    Delete,
}

impl BulkAction {
    pub const ALL: [BulkAction; 5] = [
        Self::MarkRead,
        Self::MarkUnread,
        Self::Archive,
        Self::Unarchive,
        Self::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarkRead => "read",
            Self::MarkUnread => "unread",
            Self::Archive => "archive",
            Self::Unarchive => "unarchive",
            Self::Delete => "delete",
        }
    }

    fn patch(&self) -> Option<ReceivedEmailPatch> {
        match self {
            Self::MarkRead => Some(ReceivedEmailPatch::read(true)),
            Self::MarkUnread => Some(ReceivedEmailPatch::read(false)),
            Self::Archive => Some(ReceivedEmailPatch::archived(true)),
            Self::Unarchive => Some(ReceivedEmailPatch::archived(false)),
            Self::Delete => None,
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BulkAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == wanted)
            .ok_or_else(|| format!("unknown inbox action: {}", s.trim()))
    }
}

/// Apply `action` to `ids`; returns how many emails it touched
///
/// Unknown ids are skipped.
pub fn apply_bulk(store: &mut PracticeStore, action: BulkAction, ids: &[EntityId]) -> usize {
    let touched = match action.patch() {
        Some(patch) => store.bulk_update_received_emails(ids, &patch),
        None => store.delete_received_emails(ids),
    };
    info!("Inbox {} applied to {} of {} selected", action, touched, ids.len());
    touched
}

/// Emails ticked in the inbox list, in tick order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboxSelection {
    ids: Vec<EntityId>,
}

impl InboxSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn toggle(&mut self, id: EntityId) -> bool {
        if let Some(pos) = self.ids.iter().position(|&i| i == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    /// Header checkbox: clears when every shown email is ticked, otherwise
    /// ticks exactly the shown ones
    pub fn toggle_all(&mut self, shown: &[&ReceivedEmail]) {
        if self.ids.len() == shown.len() {
            self.ids.clear();
        } else {
            self.ids = shown.iter().map(|e| e.id).collect();
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Run `action` on the selection and clear it
    pub fn apply(&mut self, store: &mut PracticeStore, action: BulkAction) -> usize {
        let touched = apply_bulk(store, action, &self.ids);
        self.ids.clear();
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ca_core::query::{InboxCounts, InboxQuery, InboxTab, filter_inbox};
    use ca_core::sample::sample_store;

    #[test]
    fn test_open_marks_read_once() {
        let mut store = sample_store();
        assert!(!store.received_email(1).unwrap().is_read);

        let opened = open_email(&mut store, 1).unwrap();
        assert!(opened.is_read);
        assert!(open_email(&mut store, 1).unwrap().is_read);
        assert!(matches!(open_email(&mut store, 404), Err(MailError::EmailNotFound(404))));
    }

    #[test]
    fn test_toggle_star() {
        let mut store = sample_store();
        assert!(toggle_star(&mut store, 1).unwrap());
        assert!(!toggle_star(&mut store, 1).unwrap());
        assert!(toggle_star(&mut store, 99).is_err());
    }

    #[test]
    fn test_bulk_archive_moves_between_tabs() {
        let mut store = sample_store();
        let touched = apply_bulk(&mut store, BulkAction::Archive, &[1, 2, 404]);
        assert_eq!(touched, 2);

        let counts = InboxCounts::of(store.received_emails());
        assert_eq!(counts.archived, 3);
        assert_eq!(counts.unread, 0);
        assert_eq!(filter_inbox(store.received_emails(), &InboxQuery::new(InboxTab::All)).len(), 1);
    }

    #[test]
    fn test_bulk_read_unread_and_delete() {
        let mut store = sample_store();
        apply_bulk(&mut store, BulkAction::MarkRead, &[1, 2]);
        assert_eq!(InboxCounts::of(store.received_emails()).unread, 0);

        apply_bulk(&mut store, BulkAction::MarkUnread, &[3]);
        assert!(!store.received_email(3).unwrap().is_read);

        assert_eq!(apply_bulk(&mut store, BulkAction::Delete, &[3, 4, 4]), 2);
        assert_eq!(store.received_emails().len(), 2);
    }

    #[test]
    fn test_selection_toggle_all_and_apply() {
        let mut store = sample_store();
        let shown: Vec<ReceivedEmail> = filter_inbox(store.received_emails(), &InboxQuery::new(InboxTab::All))
            .into_iter()
            .cloned()
            .collect();
        let shown_refs: Vec<&ReceivedEmail> = shown.iter().collect();

        let mut selection = InboxSelection::new();
        selection.toggle(shown[0].id);
        selection.toggle_all(&shown_refs);
        assert_eq!(selection.len(), shown.len());
        selection.toggle_all(&shown_refs);
        assert!(selection.is_empty());

        selection.toggle(1);
        selection.toggle(3);
        assert_eq!(selection.apply(&mut store, BulkAction::Archive), 2);
        assert!(selection.is_empty());
        assert!(store.received_email(3).unwrap().is_archived);
    }

    #[test]
    fn test_parse_action() {
        assert_eq!("Archive".parse::<BulkAction>().unwrap(), BulkAction::Archive);
        assert!("snooze".parse::<BulkAction>().is_err());
    }
}

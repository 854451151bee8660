//! Outgoing email tabs
//!
//! Tabs are predicates, not stored groupings: one email can show up under
//! several tabs at once.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::models::{DeliveryStatus, ScheduleKind, ScheduledEmail};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScheduledTab {
    /// Pending and due in the future
    #[default]
    Upcoming,
    /// Recurring, whatever the status
    Recurring,
    Sent,
    /// Sent and flagged as awaiting a client reply
    WaitingForReply,
    /// Pending but already due
    Drafts,
    Failed,
}

impl ScheduledTab {
    pub const ALL: [ScheduledTab; 6] = [
        Self::Upcoming,
        Self::Recurring,
        Self::Sent,
        Self::WaitingForReply,
        Self::Drafts,
        Self::Failed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Recurring => "Recurring",
            Self::Sent => "Sent",
            Self::WaitingForReply => "Waiting for Reply",
            Self::Drafts => "Drafts",
            Self::Failed => "Failed",
        }
    }

    pub fn includes(&self, email: &ScheduledEmail, now: DateTime<Utc>) -> bool {
        match self {
            Self::Upcoming => email.is_upcoming(now),
            Self::Recurring => email.kind == ScheduleKind::Recurring,
            Self::Sent => email.status == DeliveryStatus::Sent,
            Self::WaitingForReply => email.is_awaiting_reply(),
            Self::Drafts => email.is_draft(now),
            Self::Failed => email.status == DeliveryStatus::Failed,
        }
    }
}

impl fmt::Display for ScheduledTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScheduledTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match wanted.as_str() {
            "upcoming" => Ok(Self::Upcoming),
            "recurring" => Ok(Self::Recurring),
            "sent" => Ok(Self::Sent),
            "waiting" | "waitingforreply" => Ok(Self::WaitingForReply),
            "drafts" | "draft" => Ok(Self::Drafts),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("unknown scheduled tab: {}", s.trim())),
        }
    }
}

/// Emails under `tab` at time `now`, in collection order
pub fn filter_scheduled(emails: &[ScheduledEmail], tab: ScheduledTab, now: DateTime<Utc>) -> Vec<&ScheduledEmail> {
    emails.iter().filter(|e| tab.includes(e, now)).collect()
}

/// Number of emails under each tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabCounts(Vec<(ScheduledTab, usize)>);

impl TabCounts {
    pub fn of(emails: &[ScheduledEmail], now: DateTime<Utc>) -> Self {
        Self(
            ScheduledTab::ALL
                .into_iter()
                .map(|tab| (tab, emails.iter().filter(|e| tab.includes(e, now)).count()))
                .collect(),
        )
    }

    pub fn get(&self, tab: ScheduledTab) -> usize {
        self.0.iter().find(|(t, _)| *t == tab).map(|(_, n)| *n).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScheduledTab, usize)> + '_ {
        self.0.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewScheduledEmail, RepeatFrequency};
    use crate::store::PracticeStore;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap()
    }

    fn outgoing(
        subject: &str,
        offset_hours: i64,
        status: DeliveryStatus,
        kind: ScheduleKind,
        waiting: bool,
    ) -> NewScheduledEmail {
        NewScheduledEmail {
            subject: subject.to_string(),
            recipients: vec!["a@x.com".to_string()],
            schedule_date: now() + Duration::hours(offset_hours),
            status,
            kind,
            repeat_frequency: (kind == ScheduleKind::Recurring).then_some(RepeatFrequency::Monthly),
            body: String::new(),
            waiting_for_reply: waiting,
        }
    }

    fn store() -> PracticeStore {
        let mut store = PracticeStore::new();
        store.add_scheduled_email(outgoing("future", 5, DeliveryStatus::Pending, ScheduleKind::Scheduled, false));
        store.add_scheduled_email(outgoing("monthly", 24, DeliveryStatus::Pending, ScheduleKind::Recurring, false));
        store.add_scheduled_email(outgoing("overdue", -5, DeliveryStatus::Pending, ScheduleKind::Scheduled, false));
        store.add_scheduled_email(outgoing("sent", -1, DeliveryStatus::Sent, ScheduleKind::Scheduled, true));
        store.add_scheduled_email(outgoing("sent-quiet", -2, DeliveryStatus::Sent, ScheduleKind::Scheduled, false));
        store.add_scheduled_email(outgoing("bounced", -3, DeliveryStatus::Failed, ScheduleKind::Scheduled, false));
        store
    }

    fn subjects(tab: ScheduledTab) -> Vec<String> {
        let store = store();
        filter_scheduled(store.scheduled_emails(), tab, now())
            .iter()
            .map(|e| e.subject.clone())
            .collect()
    }

    #[test]
    fn test_each_tab() {
        assert_eq!(subjects(ScheduledTab::Upcoming), vec!["future", "monthly"]);
        assert_eq!(subjects(ScheduledTab::Recurring), vec!["monthly"]);
        assert_eq!(subjects(ScheduledTab::Sent), vec!["sent", "sent-quiet"]);
        assert_eq!(subjects(ScheduledTab::WaitingForReply), vec!["sent"]);
        assert_eq!(subjects(ScheduledTab::Drafts), vec!["overdue"]);
        assert_eq!(subjects(ScheduledTab::Failed), vec!["bounced"]);
    }

    #[test]
    fn test_recurring_email_in_several_tabs() {
        let store = store();
        let monthly = store.scheduled_emails().iter().find(|e| e.subject == "monthly").unwrap();
        let tabs: Vec<ScheduledTab> = ScheduledTab::ALL
            .into_iter()
            .filter(|t| t.includes(monthly, now()))
            .collect();
        assert_eq!(tabs, vec![ScheduledTab::Upcoming, ScheduledTab::Recurring]);
    }

    #[test]
    fn test_upcoming_becomes_draft_as_time_passes() {
        let store = store();
        let later = now() + Duration::hours(6);
        let drafts: Vec<&str> = filter_scheduled(store.scheduled_emails(), ScheduledTab::Drafts, later)
            .iter()
            .map(|e| e.subject.as_str())
            .collect();
        assert_eq!(drafts, vec!["future", "overdue"]);
    }

    #[test]
    fn test_tab_counts() {
        let store = store();
        let counts = TabCounts::of(store.scheduled_emails(), now());
        assert_eq!(counts.get(ScheduledTab::Upcoming), 2);
        assert_eq!(counts.get(ScheduledTab::Sent), 2);
        assert_eq!(counts.get(ScheduledTab::WaitingForReply), 1);
        assert_eq!(counts.iter().count(), 6);
    }

    #[test]
    fn test_parse_tab() {
        assert_eq!("Waiting for Reply".parse::<ScheduledTab>().unwrap(), ScheduledTab::WaitingForReply);
        assert_eq!("drafts".parse::<ScheduledTab>().unwrap(), ScheduledTab::Drafts);
        assert!("trash".parse::<ScheduledTab>().is_err());
    }
}

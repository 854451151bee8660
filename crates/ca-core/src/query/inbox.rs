//! Inbox view: tabs, search, sort

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{contains_ignore_case, normalize_trimmed_search};
use crate::models::ReceivedEmail;

/// Inbox tab; every tab except `Archived` hides archived mail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InboxTab {
    #[default]
    All,
    Unread,
    Starred,
    FromClients,
    Archived,
}

impl InboxTab {
    pub const ALL: [InboxTab; 5] = [Self::All, Self::Unread, Self::Starred, Self::FromClients, Self::Archived];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Unread => "unread",
            Self::Starred => "starred",
            Self::FromClients => "from-clients",
            Self::Archived => "archived",
        }
    }

    pub fn includes(&self, email: &ReceivedEmail) -> bool {
        match self {
            Self::All => !email.is_archived,
            Self::Unread => !email.is_read && !email.is_archived,
            Self::Starred => email.is_starred && !email.is_archived,
            Self::FromClients => email.client_id.is_some() && !email.is_archived,
            Self::Archived => email.is_archived,
        }
    }
}

impl fmt::Display for InboxTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InboxTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("unknown inbox tab: {}", s.trim()))
    }
}

/// Inbox ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InboxSort {
    /// Newest first
    #[default]
    #[serde(rename = "date-desc")]
    DateDesc,
    /// Oldest first
    #[serde(rename = "date-asc")]
    DateAsc,
    /// Sender name A-Z
    #[serde(rename = "sender")]
    Sender,
    /// Subject A-Z
    #[serde(rename = "subject")]
    Subject,
}

impl InboxSort {
    pub const ALL: [InboxSort; 4] = [Self::DateDesc, Self::DateAsc, Self::Sender, Self::Subject];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::Sender => "sender",
            Self::Subject => "subject",
        }
    }
}

impl fmt::Display for InboxSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InboxSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|o| o.as_str() == wanted)
            .ok_or_else(|| format!("unknown inbox sort: {}", s.trim()))
    }
}

/// Parameters of the inbox view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboxQuery {
    pub tab: InboxTab,
    pub search: String,
    pub sort: InboxSort,
}

impl InboxQuery {
    pub fn new(tab: InboxTab) -> Self {
        Self {
            tab,
            ..Default::default()
        }
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn sort(mut self, sort: InboxSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn matches(&self, email: &ReceivedEmail) -> bool {
        if !self.tab.includes(email) {
            return false;
        }
        match normalize_trimmed_search(&self.search) {
            None => true,
            Some(q) => {
                contains_ignore_case(&email.from_name, &q)
                    || contains_ignore_case(&email.from, &q)
                    || contains_ignore_case(&email.subject, &q)
            }
        }
    }
}

/// Tab, search and sort the inbox for display
pub fn filter_inbox<'a>(emails: &'a [ReceivedEmail], query: &InboxQuery) -> Vec<&'a ReceivedEmail> {
    let mut result: Vec<&ReceivedEmail> = emails.iter().filter(|e| query.matches(e)).collect();
    match query.sort {
        InboxSort::DateDesc => result.sort_by(|a, b| b.received_at.cmp(&a.received_at)),
        InboxSort::DateAsc => result.sort_by(|a, b| a.received_at.cmp(&b.received_at)),
        InboxSort::Sender => result.sort_by_cached_key(|e| e.from_name.to_lowercase()),
        InboxSort::Subject => result.sort_by_cached_key(|e| e.subject.to_lowercase()),
    }
    result
}

/// Badge counts shown above the inbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InboxCounts {
    pub unread: usize,
    pub starred: usize,
    pub archived: usize,
}

impl InboxCounts {
    pub fn of(emails: &[ReceivedEmail]) -> Self {
        let count = |tab: InboxTab| emails.iter().filter(|e| tab.includes(e)).count();
        Self {
            unread: count(InboxTab::Unread),
            starred: count(InboxTab::Starred),
            archived: count(InboxTab::Archived),
        }
    }
}

//! Pure view queries over the store's collections
//!
//! Nothing here mutates a collection. Results borrow from the input slice and
//! every sort is stable, so ties keep their collection order.

mod clients;
mod inbox;
mod scheduled;
mod templates;

pub use clients::{ClientQuery, ClientSortField, filter_clients};
pub use inbox::{InboxCounts, InboxQuery, InboxSort, InboxTab, filter_inbox};
pub use scheduled::{ScheduledTab, TabCounts, filter_scheduled};
pub use templates::{TemplateQuery, filter_templates};

use serde::{Deserialize, Serialize};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn reversed(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Lower-cased search needle; `None` only when the input is empty
pub(crate) fn normalize_search(search: &str) -> Option<String> {
    (!search.is_empty()).then(|| search.to_lowercase())
}

/// As [`normalize_search`], but whitespace-only input also counts as no search
pub(crate) fn normalize_trimmed_search(search: &str) -> Option<String> {
    if search.trim().is_empty() {
        None
    } else {
        normalize_search(search)
    }
}

pub(crate) fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// One page of a result list
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually returned
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Cut `items` into pages of `per_page` and return page `page` (1-based)
///
/// A `per_page` of 0 is treated as 1, page 0 as page 1. A page past the end
/// comes back empty with its number preserved.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);

    let start = (page - 1).saturating_mul(per_page);
    let page_items = items.iter().skip(start).take(per_page).cloned().collect();

    Page {
        items: page_items,
        page,
        per_page,
        total_items,
        total_pages,
    }
}

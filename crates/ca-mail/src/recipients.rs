//! Composer recipient selection
//!
//! The selection is an ordered set of addresses: adding an address already
//! present is a no-op and insertion order is kept for display and preview.

use ca_core::models::{Client, ClientStatus};
use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;

/// Recipient list filter shown beside the composer
///
/// Unlike the client list it takes at most one category and one status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientFilter {
    /// Matched against name, email and company
    pub search: String,
    pub category: Option<String>,
    pub status: Option<ClientStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl RecipientFilter {
    pub fn matches(&self, client: &Client) -> bool {
        let search = self.search.to_lowercase();
        let search_ok = search.trim().is_empty()
            || [&client.name, &client.email, &client.company_name]
                .iter()
                .any(|field| field.to_lowercase().contains(&search));
        search_ok
            && self.category.as_ref().is_none_or(|c| client.has_category(c))
            && self.status.is_none_or(|s| client.status == s)
            && in_range(client, self.date_from, self.date_to)
    }

    /// Clients passing the filter, in store order
    pub fn apply<'a>(&self, clients: &'a [Client]) -> Vec<&'a Client> {
        clients.iter().filter(|c| self.matches(c)).collect()
    }
}

fn in_range(client: &Client, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    let day = client.added_date.date_naive();
    from.is_none_or(|f| day >= f) && to.is_none_or(|t| day <= t)
}

/// `requested` clamped to `1..=available`, or 0 when nothing is available
pub fn clamp_count(requested: usize, available: usize) -> usize {
    if available == 0 { 0 } else { requested.clamp(1, available) }
}

/// Addresses picked for the email being composed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientSelection {
    emails: Vec<String>,
}

impl RecipientSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.emails
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.emails.first().map(String::as_str)
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails.iter().any(|e| e == email)
    }

    /// Returns true when the address was not selected yet
    pub fn add(&mut self, email: impl Into<String>) -> bool {
        let email = email.into();
        if self.contains(&email) {
            false
        } else {
            self.emails.push(email);
            true
        }
    }

    pub fn remove(&mut self, email: &str) -> bool {
        let before = self.emails.len();
        self.emails.retain(|e| e != email);
        self.emails.len() != before
    }

    /// Select or deselect; returns whether the address ends up selected
    pub fn toggle(&mut self, email: &str) -> bool {
        if self.remove(email) {
            false
        } else {
            self.emails.push(email.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.emails.clear();
    }

    /// Add every client's address; returns how many were new
    pub fn add_clients<'a, I>(&mut self, clients: I) -> usize
    where
        I: IntoIterator<Item = &'a Client>,
    {
        clients.into_iter().filter(|c| self.add(c.email.clone())).count()
    }

    /// Replace the selection with every client
    pub fn select_all_clients(&mut self, clients: &[Client]) -> usize {
        self.clear();
        self.add_clients(clients)
    }

    pub fn add_by_category(&mut self, clients: &[Client], category: &str) -> usize {
        self.add_clients(clients.iter().filter(|c| c.has_category(category)))
    }

    pub fn add_by_status(&mut self, clients: &[Client], status: ClientStatus) -> usize {
        self.add_clients(clients.iter().filter(|c| c.status == status))
    }

    /// Both ends are required and inclusive
    pub fn add_by_date_range(&mut self, clients: &[Client], from: NaiveDate, to: NaiveDate) -> usize {
        self.add_clients(clients.iter().filter(|c| in_range(c, Some(from), Some(to))))
    }

    /// Add the first `n` filtered clients; returns the clamped `n`
    pub fn add_first_n(&mut self, filtered: &[&Client], n: usize) -> usize {
        let n = clamp_count(n, filtered.len());
        self.add_clients(filtered.iter().take(n).copied());
        n
    }

    /// Add `n` filtered clients picked at random; returns the clamped `n`
    pub fn add_random_n<R: Rng + ?Sized>(&mut self, filtered: &[&Client], n: usize, rng: &mut R) -> usize {
        let n = clamp_count(n, filtered.len());
        let picked: Vec<&Client> = filtered.choose_multiple(rng, n).copied().collect();
        self.add_clients(picked);
        n
    }

    /// Drop every shown client; returns how many were selected
    pub fn deselect_shown(&mut self, shown: &[&Client]) -> usize {
        shown.iter().filter(|c| self.remove(&c.email)).count()
    }

    pub fn all_shown_selected(&self, shown: &[&Client]) -> bool {
        !shown.is_empty() && shown.iter().all(|c| self.contains(&c.email))
    }

    pub fn some_shown_selected(&self, shown: &[&Client]) -> bool {
        shown.iter().any(|c| self.contains(&c.email))
    }
}

impl From<Vec<String>> for RecipientSelection {
    fn from(emails: Vec<String>) -> Self {
        let mut selection = Self::new();
        emails.into_iter().for_each(|e| {
            selection.add(e);
        });
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ca_core::sample::sample_clients;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_add_is_idempotent_and_ordered() {
        let mut sel = RecipientSelection::new();
        assert!(sel.add("b@x.com"));
        assert!(sel.add("a@x.com"));
        assert!(!sel.add("b@x.com"));
        assert_eq!(sel.as_slice(), ["b@x.com", "a@x.com"]);
        assert_eq!(sel.first(), Some("b@x.com"));
    }

    #[test]
    fn test_toggle_and_remove() {
        let mut sel = RecipientSelection::from(vec!["a@x.com".to_string()]);
        assert!(!sel.toggle("a@x.com"));
        assert!(sel.is_empty());
        assert!(sel.toggle("a@x.com"));
        assert!(!sel.remove("z@x.com"));
    }

    #[test]
    fn test_select_all_replaces() {
        let clients = sample_clients();
        let mut sel = RecipientSelection::from(vec!["someone@else.com".to_string()]);
        assert_eq!(sel.select_all_clients(&clients), 3);
        assert!(!sel.contains("someone@else.com"));
    }

    #[test]
    fn test_add_by_category_and_status_union() {
        let clients = sample_clients();
        let mut sel = RecipientSelection::new();
        assert_eq!(sel.add_by_category(&clients, "Startup"), 1);
        assert_eq!(sel.add_by_status(&clients, ClientStatus::Pending), 0);
        assert_eq!(sel.add_by_status(&clients, ClientStatus::Active), 2);
        assert_eq!(sel.len(), 3);
    }

    #[test]
    fn test_add_by_date_range_inclusive() {
        let clients = sample_clients();
        let mut sel = RecipientSelection::new();
        let from = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        assert_eq!(sel.add_by_date_range(&clients, from, to), 2);
    }

    #[test]
    fn test_filter_search_category_status() {
        let clients = sample_clients();
        let filter = RecipientFilter {
            search: "ENTERPRISES".to_string(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&clients).len(), 1);

        let filter = RecipientFilter {
            search: "9876543210".to_string(),
            ..Default::default()
        };
        assert!(filter.apply(&clients).is_empty());

        let filter = RecipientFilter {
            category: Some("Individual".to_string()),
            status: Some(ClientStatus::Active),
            ..Default::default()
        };
        assert_eq!(filter.apply(&clients)[0].name, "Jane Doe");
    }

    #[test]
    fn test_first_n_is_clamped() {
        let clients = sample_clients();
        let filtered = RecipientFilter::default().apply(&clients);
        let mut sel = RecipientSelection::new();

        assert_eq!(sel.add_first_n(&filtered, 0), 1);
        assert_eq!(sel.as_slice(), ["john@smith.com"]);
        assert_eq!(sel.add_first_n(&filtered, 30), 3);
        assert_eq!(sel.len(), 3);
        assert_eq!(sel.add_first_n(&[], 5), 0);
    }

    #[test]
    fn test_random_n_picks_distinct_filtered_clients() {
        let clients = sample_clients();
        let filtered = RecipientFilter::default().apply(&clients);
        let mut rng = StdRng::seed_from_u64(7);
        let mut sel = RecipientSelection::new();

        assert_eq!(sel.add_random_n(&filtered, 2, &mut rng), 2);
        assert_eq!(sel.len(), 2);
        assert!(sel.as_slice().iter().all(|e| clients.iter().any(|c| &c.email == e)));
    }

    #[test]
    fn test_shown_helpers() {
        let clients = sample_clients();
        let shown = RecipientFilter {
            status: Some(ClientStatus::Active),
            ..Default::default()
        }
        .apply(&clients);
        let mut sel = RecipientSelection::new();

        assert!(!sel.all_shown_selected(&shown));
        sel.add_clients(shown.iter().copied());
        sel.add("raj@kumar.com");
        assert!(sel.all_shown_selected(&shown));
        assert_eq!(sel.deselect_shown(&shown), 2);
        assert!(!sel.some_shown_selected(&shown));
        assert_eq!(sel.as_slice(), ["raj@kumar.com"]);
    }

    #[test]
    fn test_clamp_count() {
        assert_eq!(clamp_count(30, 50), 30);
        assert_eq!(clamp_count(0, 5), 1);
        assert_eq!(clamp_count(9, 0), 0);
    }
}

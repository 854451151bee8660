//! Client list: search, filters, sort

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::NaiveDate;

use super::{SortOrder, contains_ignore_case, normalize_search};
use crate::models::{Client, ClientStatus};

/// Column the client list is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientSortField {
    Name,
    CompanyName,
    #[default]
    AddedDate,
}

impl FromStr for ClientSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "company" | "companyname" | "company_name" => Ok(Self::CompanyName),
            "added" | "date" | "addeddate" | "added_date" => Ok(Self::AddedDate),
            other => Err(format!("unknown sort field: {}", other)),
        }
    }
}

/// Parameters of the client list view
///
/// Empty filter sets and an empty search match everything. A whitespace-only
/// search is still a substring search. The date range is
/// inclusive on both ends and compares calendar days of `added_date`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientQuery {
    pub search: String,
    pub categories: BTreeSet<String>,
    pub statuses: BTreeSet<ClientStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub sort_field: ClientSortField,
    pub sort_order: SortOrder,
}

impl ClientQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    pub fn status(mut self, status: ClientStatus) -> Self {
        self.statuses.insert(status);
        self
    }

    pub fn added_between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn sort_by(mut self, field: ClientSortField, order: SortOrder) -> Self {
        self.sort_field = field;
        self.sort_order = order;
        self
    }

    /// Clicking a column header: same field flips the order, a new field
    /// starts ascending
    pub fn toggle_sort(&mut self, field: ClientSortField) {
        if self.sort_field == field {
            self.sort_order = self.sort_order.reversed();
        } else {
            self.sort_field = field;
            self.sort_order = SortOrder::Asc;
        }
    }

    /// Whether any filter beyond sorting is active
    pub fn has_filters(&self) -> bool {
        normalize_search(&self.search).is_some()
            || !self.categories.is_empty()
            || !self.statuses.is_empty()
            || self.date_from.is_some()
            || self.date_to.is_some()
    }

    /// Drop every filter and the search, keep the sort
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.categories.clear();
        self.statuses.clear();
        self.date_from = None;
        self.date_to = None;
    }

    pub fn matches(&self, client: &Client) -> bool {
        self.matches_search(client)
            && self.matches_category(client)
            && self.matches_status(client)
            && self.matches_date(client)
    }

    fn matches_search(&self, client: &Client) -> bool {
        match normalize_search(&self.search) {
            None => true,
            Some(q) => {
                contains_ignore_case(&client.name, &q)
                    || contains_ignore_case(&client.email, &q)
                    || contains_ignore_case(&client.company_name, &q)
                    || contains_ignore_case(&client.phone, &q)
            }
        }
    }

    fn matches_category(&self, client: &Client) -> bool {
        self.categories.is_empty() || client.categories.iter().any(|c| self.categories.contains(c))
    }

    fn matches_status(&self, client: &Client) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&client.status)
    }

    fn matches_date(&self, client: &Client) -> bool {
        let day = client.added_date.date_naive();
        self.date_from.is_none_or(|from| day >= from) && self.date_to.is_none_or(|to| day <= to)
    }

    fn compare(&self, a: &Client, b: &Client) -> Ordering {
        let ordering = match self.sort_field {
            ClientSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            ClientSortField::CompanyName => a.company_name.to_lowercase().cmp(&b.company_name.to_lowercase()),
            ClientSortField::AddedDate => a.added_date.cmp(&b.added_date),
        };
        match self.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Filter and sort `clients` for display
pub fn filter_clients<'a>(clients: &'a [Client], query: &ClientQuery) -> Vec<&'a Client> {
    let mut result: Vec<&Client> = clients.iter().filter(|c| query.matches(c)).collect();
    result.sort_by(|a, b| query.compare(a, b));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewClient;
    use crate::store::PracticeStore;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    /// Three clients added on Jan 15, 20 and 25
    fn three_clients() -> PracticeStore {
        let mut store = PracticeStore::new();
        store.add_client(
            NewClient::new("John Smith", "john@smith.com", "+91 9876543210", "Smith Enterprises", "Pvt Ltd")
                .with_category("Company"),
        );
        store.add_client(
            NewClient::new("jane Doe", "jane@doe.com", "+91 9876543220", "Doe Consultancy", "Sole Proprietor")
                .with_category("Individual"),
        );
        store.add_client(
            NewClient::new("Raj Kumar", "raj@kumar.com", "+91 9876543230", "Kumar Tech Solutions", "LLP")
                .with_category("Startup")
                .with_status(ClientStatus::Pending),
        );
        let clients: Vec<Client> = store
            .clients()
            .iter()
            .cloned()
            .zip([15, 20, 25])
            .map(|(mut c, d)| {
                c.added_date = at(d);
                c
            })
            .collect();
        PracticeStore::from_parts(clients, Vec::new(), Vec::new(), Vec::new())
    }

    fn names(list: &[&Client]) -> Vec<String> {
        list.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn test_default_query_sorts_newest_first() {
        let store = three_clients();
        let result = filter_clients(store.clients(), &ClientQuery::new());
        assert_eq!(names(&result), vec!["Raj Kumar", "jane Doe", "John Smith"]);
    }

    #[test]
    fn test_category_filter() {
        let store = three_clients();
        let result = filter_clients(store.clients(), &ClientQuery::new().category("Startup"));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Raj Kumar");
    }

    #[test]
    fn test_category_filter_matches_any() {
        let store = three_clients();
        let query = ClientQuery::new().category("Startup").category("Company");
        assert_eq!(filter_clients(store.clients(), &query).len(), 2);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let store = three_clients();
        let by_company = filter_clients(store.clients(), &ClientQuery::new().search("TECH"));
        assert_eq!(names(&by_company), vec!["Raj Kumar"]);

        let by_phone = filter_clients(store.clients(), &ClientQuery::new().search("543220"));
        assert_eq!(names(&by_phone), vec!["jane Doe"]);

        let by_email = filter_clients(store.clients(), &ClientQuery::new().search("@SMITH"));
        assert_eq!(names(&by_email), vec!["John Smith"]);
    }

    #[test]
    fn test_empty_search_matches_all() {
        let store = three_clients();
        assert_eq!(filter_clients(store.clients(), &ClientQuery::new().search("")).len(), 3);
    }

    #[test]
    fn test_whitespace_search_still_filters() {
        let store = three_clients();
        assert!(filter_clients(store.clients(), &ClientQuery::new().search("   ")).is_empty());
        assert!(ClientQuery::new().search("   ").has_filters());
    }

    #[test]
    fn test_status_filter_matches_predicate_count() {
        let store = three_clients();
        let via_query = filter_clients(store.clients(), &ClientQuery::new().status(ClientStatus::Active)).len();
        let direct = store.clients().iter().filter(|c| c.status == ClientStatus::Active).count();
        assert_eq!(via_query, direct);
        assert_eq!(via_query, 2);
    }

    #[test]
    fn test_filter_dimensions_compose_in_any_order() {
        let store = three_clients();
        let combined = ClientQuery::new()
            .search("o")
            .category("Company")
            .category("Startup")
            .status(ClientStatus::Active)
            .added_between(Some(day(10)), Some(day(22)));
        let all = filter_clients(store.clients(), &combined);

        let stepwise: Vec<&Client> = store
            .clients()
            .iter()
            .filter(|c| ClientQuery::new().status(ClientStatus::Active).matches(c))
            .filter(|c| ClientQuery::new().added_between(Some(day(10)), Some(day(22))).matches(c))
            .filter(|c| ClientQuery::new().category("Company").category("Startup").matches(c))
            .filter(|c| ClientQuery::new().search("o").matches(c))
            .collect();

        assert_eq!(names(&all), names(&stepwise));
        assert_eq!(names(&all), vec!["John Smith"]);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let store = three_clients();
        let query = ClientQuery::new().added_between(Some(day(20)), Some(day(25)));
        let result = filter_clients(store.clients(), &query);
        assert_eq!(names(&result), vec!["Raj Kumar", "jane Doe"]);

        let only_to = ClientQuery::new().added_between(None, Some(day(15)));
        assert_eq!(names(&filter_clients(store.clients(), &only_to)), vec!["John Smith"]);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let store = three_clients();
        let query = ClientQuery::new().sort_by(ClientSortField::Name, SortOrder::Asc);
        let result = filter_clients(store.clients(), &query);
        assert_eq!(names(&result), vec!["jane Doe", "John Smith", "Raj Kumar"]);
    }

    #[test]
    fn test_date_sort_desc_then_asc_reverses() {
        let store = three_clients();
        let desc = filter_clients(
            store.clients(),
            &ClientQuery::new().sort_by(ClientSortField::AddedDate, SortOrder::Desc),
        );
        let mut asc = filter_clients(
            store.clients(),
            &ClientQuery::new().sort_by(ClientSortField::AddedDate, SortOrder::Asc),
        );
        asc.reverse();
        assert_eq!(names(&desc), names(&asc));
    }

    #[test]
    fn test_ties_keep_collection_order() {
        let base = at(10);
        let clients: Vec<Client> = ["A", "B", "C", "D"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mut store = PracticeStore::new();
                let id = store.add_client(NewClient::new(*name, "x@y.z", "1", "Co", "LLP"));
                let mut c = store.client(id).cloned().unwrap();
                c.id = i as u64 + 1;
                // A and C share a date, B and D share a later one
                c.added_date = if i % 2 == 0 { base } else { base + Duration::days(1) };
                c
            })
            .collect();

        for order in [SortOrder::Asc, SortOrder::Desc] {
            let query = ClientQuery::new().sort_by(ClientSortField::AddedDate, order);
            let once = filter_clients(&clients, &query);
            let again = filter_clients(&clients, &query);
            assert_eq!(names(&once), names(&again));
        }

        let asc = filter_clients(&clients, &ClientQuery::new().sort_by(ClientSortField::AddedDate, SortOrder::Asc));
        assert_eq!(names(&asc), vec!["A", "C", "B", "D"]);
        let desc = filter_clients(&clients, &ClientQuery::new().sort_by(ClientSortField::AddedDate, SortOrder::Desc));
        assert_eq!(names(&desc), vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn test_filtering_does_not_mutate() {
        let store = three_clients();
        let before = store.clients().to_vec();
        let _ = filter_clients(store.clients(), &ClientQuery::new().sort_by(ClientSortField::Name, SortOrder::Asc));
        assert_eq!(store.clients(), before.as_slice());
    }

    #[test]
    fn test_toggle_sort() {
        let mut query = ClientQuery::new();
        query.toggle_sort(ClientSortField::Name);
        assert_eq!((query.sort_field, query.sort_order), (ClientSortField::Name, SortOrder::Asc));
        query.toggle_sort(ClientSortField::Name);
        assert_eq!(query.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_clear_filters() {
        let mut query = ClientQuery::new().search("x").status(ClientStatus::Pending);
        assert!(query.has_filters());
        query.clear_filters();
        assert!(!query.has_filters());
    }
}

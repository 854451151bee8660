//! Template catalogue filter

use super::{contains_ignore_case, normalize_search};
use crate::models::{EmailTemplate, TemplateCategory};

/// `category: None` is the "All" chip
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateQuery {
    pub category: Option<TemplateCategory>,
    pub search: String,
}

impl TemplateQuery {
    pub fn matches(&self, template: &EmailTemplate) -> bool {
        if self.category.is_some_and(|c| c != template.category) {
            return false;
        }
        match normalize_search(&self.search) {
            None => true,
            Some(q) => contains_ignore_case(&template.name, &q) || contains_ignore_case(template.category.as_str(), &q),
        }
    }
}

pub fn filter_templates<'a>(templates: &'a [EmailTemplate], query: &TemplateQuery) -> Vec<&'a EmailTemplate> {
    templates.iter().filter(|t| query.matches(t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTemplate;
    use crate::store::PracticeStore;

    fn store() -> PracticeStore {
        let mut store = PracticeStore::new();
        store.add_template(NewTemplate::new(
            "Welcome & Login Credentials",
            TemplateCategory::LoginCredentials,
            "",
            "",
        ));
        store.add_template(NewTemplate::new("Document Request Reminder", TemplateCategory::Reminders, "", ""));
        store.add_template(NewTemplate::new("Quarterly update", TemplateCategory::General, "", ""));
        store
    }

    #[test]
    fn test_all_category() {
        let store = store();
        assert_eq!(filter_templates(store.templates(), &TemplateQuery::default()).len(), 3);
    }

    #[test]
    fn test_category_chip() {
        let store = store();
        let query = TemplateQuery {
            category: Some(TemplateCategory::Reminders),
            ..Default::default()
        };
        let result = filter_templates(store.templates(), &query);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Document Request Reminder");
    }

    #[test]
    fn test_search_hits_category_name() {
        let store = store();
        let query = TemplateQuery {
            search: "login".to_string(),
            ..Default::default()
        };
        assert_eq!(filter_templates(store.templates(), &query).len(), 1);

        let query = TemplateQuery {
            search: "GENERAL".to_string(),
            ..Default::default()
        };
        assert_eq!(filter_templates(store.templates(), &query)[0].name, "Quarterly update");
    }
}

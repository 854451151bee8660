//! Using saved templates in the composer

use ca_core::EntityId;
use ca_core::models::EmailTemplate;
use ca_core::store::PracticeStore;
use tracing::debug;

use crate::compose::EmailDraft;
use crate::error::{MailError, Result};

/// Copy a template's subject and body into `draft` and count the use
///
/// Recipients are left alone. The template keeps its placeholders; they are
/// only filled in for previews.
pub fn apply_template(store: &mut PracticeStore, draft: &mut EmailDraft, template_id: EntityId) -> Result<()> {
    let template = store
        .template(template_id)
        .ok_or(MailError::TemplateNotFound(template_id))?;
    draft.subject = template.subject.clone();
    draft.body = template.body.clone();

    store.record_template_use(template_id);
    debug!("Applied template {} to draft", template_id);
    Ok(())
}

/// Template named `name`, ignoring case and surrounding whitespace
pub fn find_template<'a>(store: &'a PracticeStore, name: &str) -> Option<&'a EmailTemplate> {
    let wanted = name.trim().to_lowercase();
    store.templates().iter().find(|t| t.name.to_lowercase() == wanted)
}

//! Rendered previews of drafts and templates

use ca_core::PortalConfig;
use ca_core::models::EmailTemplate;
use ca_core::store::PracticeStore;
use ca_core::template::{RenderedEmail, VariableData};
use chrono::NaiveDate;

use crate::compose::EmailDraft;
use crate::error::{MailError, Result};
use crate::recipients::RecipientSelection;

/// Where preview values come from
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewSource<'a> {
    /// The first selected recipient is a known client
    Client(&'a ca_core::models::Client),
    /// No recipient maps to a client
    Sample,
}

/// Pick the preview source for a selection
pub fn preview_source<'a>(store: &'a PracticeStore, recipients: &RecipientSelection) -> PreviewSource<'a> {
    recipients
        .first()
        .and_then(|email| store.client_by_email(email))
        .map_or(PreviewSource::Sample, PreviewSource::Client)
}

/// Variable values used to preview mail for `recipients`
pub fn preview_data(
    store: &PracticeStore,
    recipients: &RecipientSelection,
    portal: &PortalConfig,
    today: NaiveDate,
) -> VariableData {
    match preview_source(store, recipients) {
        PreviewSource::Client(client) => VariableData::for_client(client, portal, today),
        PreviewSource::Sample => VariableData::sample(portal, today),
    }
}

/// Render the draft for its first recipient
///
/// Needs a subject or a body.
pub fn preview_draft(
    store: &PracticeStore,
    draft: &EmailDraft,
    portal: &PortalConfig,
    today: NaiveDate,
) -> Result<RenderedEmail> {
    if draft.subject.trim().is_empty() && draft.body.trim().is_empty() {
        return Err(MailError::MissingFields("subject or body".to_string()));
    }
    let data = preview_data(store, &draft.recipients, portal, today);
    Ok(RenderedEmail::render(&draft.subject, &draft.body, &data))
}

/// Render a saved template with sample values
pub fn preview_template(template: &EmailTemplate, portal: &PortalConfig, today: NaiveDate) -> RenderedEmail {
    RenderedEmail::render(&template.subject, &template.body, &VariableData::sample(portal, today))
}

//! In-memory entity store
//!
//! Four independent collections (clients, templates, outgoing emails, inbox
//! emails) kept in insertion order. Every operation is total: lookups of
//! unknown ids are answered with `None`/`false`, never with an error.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::ids::{EntityId, IdGenerator};
use crate::models::{
    Client, ClientPatch, ClientStatus, Director, EmailTemplate, NewClient, NewReceivedEmail, NewScheduledEmail, NewTemplate,
    ReceivedEmail, ReceivedEmailPatch, ScheduledEmail, ScheduledEmailPatch, TemplatePatch,
};

/// Source of the current time
pub type Clock = fn() -> DateTime<Utc>;

/// Store owning every collection of the practice desk
#[derive(Debug, Clone)]
pub struct PracticeStore {
    clients: Vec<Client>,
    templates: Vec<EmailTemplate>,
    scheduled_emails: Vec<ScheduledEmail>,
    received_emails: Vec<ReceivedEmail>,
    ids: IdGenerator,
    clock: Clock,
}

impl Default for PracticeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PracticeStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            clients: Vec::new(),
            templates: Vec::new(),
            scheduled_emails: Vec::new(),
            received_emails: Vec::new(),
            ids: IdGenerator::new(),
            clock: Utc::now,
        }
    }

    /// Create a store pre-filled with existing records
    ///
    /// The id generator is advanced past every id already present.
    pub fn from_parts(
        clients: Vec<Client>,
        templates: Vec<EmailTemplate>,
        scheduled_emails: Vec<ScheduledEmail>,
        received_emails: Vec<ReceivedEmail>,
    ) -> Self {
        let highest = clients
            .iter()
            .map(|c| c.id)
            .chain(templates.iter().map(|t| t.id))
            .chain(scheduled_emails.iter().map(|e| e.id))
            .chain(received_emails.iter().map(|e| e.id))
            .max()
            .unwrap_or(0);
        let ids = IdGenerator::starting_after(highest);

        debug!(
            "Store seeded with {} clients, {} templates, {} outgoing and {} inbox emails",
            clients.len(),
            templates.len(),
            scheduled_emails.len(),
            received_emails.len()
        );

        Self {
            clients,
            templates,
            scheduled_emails,
            received_emails,
            ids,
            clock: Utc::now,
        }
    }

    /// Replace the clock used for default timestamps
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    // ------------------------------------------------------------------
    // Clients
    // ------------------------------------------------------------------

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn client(&self, id: EntityId) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// First client whose email is exactly `email`
    pub fn client_by_email(&self, email: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.email == email)
    }

    /// Add a client, stamping `added_date` and defaulting status to Active
    pub fn add_client(&mut self, client: NewClient) -> EntityId {
        let id = self.ids.next_id();
        let client = client.into_client(id, self.now());
        debug!("Added client {} ({})", id, client.name);
        self.clients.push(client);
        id
    }

    /// Returns false when no client has `id`
    pub fn update_client(&mut self, id: EntityId, patch: ClientPatch) -> bool {
        match self.clients.iter_mut().find(|c| c.id == id) {
            Some(client) => {
                patch.apply(client);
                debug!("Updated client {}", id);
                true
            }
            None => {
                debug!("Update skipped, no client {}", id);
                false
            }
        }
    }

    /// Flip Active/Inactive; returns the new status
    pub fn toggle_client_status(&mut self, id: EntityId) -> Option<ClientStatus> {
        let client = self.clients.iter_mut().find(|c| c.id == id)?;
        client.status = client.status.toggled();
        debug!("Client {} status now {}", id, client.status);
        Some(client.status)
    }

    /// Append a director to a client; false when no client has `id`
    pub fn add_director(&mut self, id: EntityId, director: Director) -> bool {
        match self.clients.iter_mut().find(|c| c.id == id) {
            Some(client) => {
                debug!("Client {} gained director {}", id, director.name);
                client.directors.push(director);
                true
            }
            None => false,
        }
    }

    /// Remove the director at `index` (0-based) and return it
    pub fn remove_director(&mut self, id: EntityId, index: usize) -> Option<Director> {
        let client = self.clients.iter_mut().find(|c| c.id == id)?;
        if index >= client.directors.len() {
            return None;
        }
        let director = client.directors.remove(index);
        debug!("Client {} lost director {}", id, director.name);
        Some(director)
    }

    /// Remove a client. Inbox emails pointing at it keep their dangling id.
    pub fn delete_client(&mut self, id: EntityId) -> bool {
        let before = self.clients.len();
        self.clients.retain(|c| c.id != id);
        let removed = self.clients.len() != before;
        if removed {
            debug!("Deleted client {}", id);
        }
        removed
    }

    // ------------------------------------------------------------------
    // Templates
    // ------------------------------------------------------------------

    pub fn templates(&self) -> &[EmailTemplate] {
        &self.templates
    }

    pub fn template(&self, id: EntityId) -> Option<&EmailTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Add a template with `usage_count` 0 and `last_modified` now
    pub fn add_template(&mut self, template: NewTemplate) -> EntityId {
        let id = self.ids.next_id();
        let template = template.into_template(id, self.now());
        debug!("Added template {} ({})", id, template.name);
        self.templates.push(template);
        id
    }

    /// Merge a patch; `last_modified` is refreshed even for an empty patch
    pub fn update_template(&mut self, id: EntityId, patch: TemplatePatch) -> bool {
        let now = self.now();
        match self.templates.iter_mut().find(|t| t.id == id) {
            Some(template) => {
                patch.apply(template, now);
                debug!("Updated template {}", id);
                true
            }
            None => false,
        }
    }

    /// Count one use of a template
    pub fn record_template_use(&mut self, id: EntityId) -> bool {
        let now = self.now();
        match self.templates.iter_mut().find(|t| t.id == id) {
            Some(template) => {
                template.usage_count += 1;
                template.last_modified = now;
                debug!("Template {} used {} times", id, template.usage_count);
                true
            }
            None => false,
        }
    }

    /// Add a fresh copy of a template
    pub fn duplicate_template(&mut self, id: EntityId) -> Option<EntityId> {
        let copy = NewTemplate::duplicate_of(self.template(id)?);
        Some(self.add_template(copy))
    }

    pub fn delete_template(&mut self, id: EntityId) -> bool {
        let before = self.templates.len();
        self.templates.retain(|t| t.id != id);
        let removed = self.templates.len() != before;
        if removed {
            debug!("Deleted template {}", id);
        }
        removed
    }

    // ------------------------------------------------------------------
    // Outgoing emails
    // ------------------------------------------------------------------

    pub fn scheduled_emails(&self) -> &[ScheduledEmail] {
        &self.scheduled_emails
    }

    pub fn scheduled_email(&self, id: EntityId) -> Option<&ScheduledEmail> {
        self.scheduled_emails.iter().find(|e| e.id == id)
    }

    /// Add an outgoing email; `recipients_count` is taken from the list
    pub fn add_scheduled_email(&mut self, email: NewScheduledEmail) -> EntityId {
        let id = self.ids.next_id();
        let email = email.into_email(id);
        debug!(
            "Added {} email {} to {} recipient(s), status {}",
            email.kind, id, email.recipients_count, email.status
        );
        self.scheduled_emails.push(email);
        id
    }

    pub fn update_scheduled_email(&mut self, id: EntityId, patch: ScheduledEmailPatch) -> bool {
        match self.scheduled_emails.iter_mut().find(|e| e.id == id) {
            Some(email) => {
                patch.apply(email);
                debug!("Updated outgoing email {}", id);
                true
            }
            None => false,
        }
    }

    pub fn delete_scheduled_email(&mut self, id: EntityId) -> bool {
        let before = self.scheduled_emails.len();
        self.scheduled_emails.retain(|e| e.id != id);
        let removed = self.scheduled_emails.len() != before;
        if removed {
            debug!("Deleted outgoing email {}", id);
        }
        removed
    }

    // ------------------------------------------------------------------
    // Inbox
    // ------------------------------------------------------------------

    pub fn received_emails(&self) -> &[ReceivedEmail] {
        &self.received_emails
    }

    pub fn received_email(&self, id: EntityId) -> Option<&ReceivedEmail> {
        self.received_emails.iter().find(|e| e.id == id)
    }

    pub fn add_received_email(&mut self, email: NewReceivedEmail) -> EntityId {
        let id = self.ids.next_id();
        let email = email.into_email(id, self.now());
        debug!("Received email {} from {}", id, email.from);
        self.received_emails.push(email);
        id
    }

    pub fn update_received_email(&mut self, id: EntityId, patch: ReceivedEmailPatch) -> bool {
        match self.received_emails.iter_mut().find(|e| e.id == id) {
            Some(email) => {
                patch.apply(email);
                debug!("Updated inbox email {}", id);
                true
            }
            None => false,
        }
    }

    pub fn mark_received_email_read(&mut self, id: EntityId) -> bool {
        self.update_received_email(id, ReceivedEmailPatch::read(true))
    }

    /// Apply one patch to every listed email; unknown ids are skipped.
    /// Returns how many emails were patched.
    pub fn bulk_update_received_emails(&mut self, ids: &[EntityId], patch: &ReceivedEmailPatch) -> usize {
        let wanted: HashSet<EntityId> = ids.iter().copied().collect();
        let mut updated = 0;
        for email in self.received_emails.iter_mut().filter(|e| wanted.contains(&e.id)) {
            patch.apply(email);
            updated += 1;
        }
        debug!("Bulk update touched {} of {} requested inbox emails", updated, wanted.len());
        updated
    }

    pub fn delete_received_email(&mut self, id: EntityId) -> bool {
        self.delete_received_emails(&[id]) == 1
    }

    /// Remove every listed email; returns how many were removed
    pub fn delete_received_emails(&mut self, ids: &[EntityId]) -> usize {
        let wanted: HashSet<EntityId> = ids.iter().copied().collect();
        let before = self.received_emails.len();
        self.received_emails.retain(|e| !wanted.contains(&e.id));
        let removed = before - self.received_emails.len();
        if removed > 0 {
            debug!("Deleted {} inbox email(s)", removed);
        }
        removed
    }
}

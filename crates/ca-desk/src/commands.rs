//! Desk session and slash commands
//!
//! Parsing and execution are kept apart from the line editor so that every
//! command can be driven from tests with a fixed clock.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, anyhow, bail};
use ca_core::models::{Client, ClientPatch, ClientStatus, RepeatFrequency, TemplateCategory};
use ca_core::query::{
    ClientQuery, ClientSortField, InboxCounts, InboxQuery, InboxSort, InboxTab, ScheduledTab, TabCounts,
    TemplateQuery, filter_clients, filter_inbox, filter_scheduled, filter_templates, paginate,
};
use ca_core::validate::is_valid_email;
use ca_core::{
    ClientForm, DashboardStats, DeskConfig, DirectorForm, EntityId, PracticeStore, TemplateForm,
    default_export_file_name, write_clients_csv,
};
use ca_mail::portal::{self, CredentialRequest, Strength};
use ca_mail::{
    BulkAction, EmailDraft, InboxSelection, RecipientFilter, SendOption, apply_template, find_template, open_email,
    preview_draft, preview_template, send, toggle_star,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Slash commands offered by completion, with a short description
pub const COMMANDS: &[(&str, &str)] = &[
    ("/help", "Show commands"),
    ("/stats", "Dashboard numbers"),
    ("/clients", "List clients [page]"),
    ("/search", "Search clients <text>"),
    ("/filter", "Filter clients category|status|from|to <value>"),
    ("/clear-filters", "Drop client filters"),
    ("/sort", "Sort clients name|company|date"),
    ("/client", "Show client <id>"),
    ("/add-client", "Add client name=..; email=..; phone=..; company=..; type=.."),
    ("/edit-client", "Edit client <id> field=value; ..."),
    ("/add-director", "Add director <client id> name=..; designation=..; din=.."),
    ("/remove-director", "Remove director <client id> <n>"),
    ("/toggle", "Toggle client Active/Inactive <id>"),
    ("/delete-client", "Delete client <id>"),
    ("/export", "Export listed clients to CSV [path]"),
    ("/templates", "List templates [category]"),
    ("/template", "Preview template <id>"),
    ("/new-template", "Create template name=..; category=..; subject=..; body=.."),
    ("/edit-template", "Edit template <id> field=value; ..."),
    ("/duplicate", "Duplicate template <id>"),
    ("/delete-template", "Delete template <id>"),
    ("/subject", "Set draft subject <text>"),
    ("/body", "Set draft body <text> (\\n for new lines)"),
    ("/use", "Apply template to draft <id|name>"),
    ("/to", "Toggle recipient <email>"),
    ("/to-category", "Add clients in category <name>"),
    ("/to-status", "Add clients with status <status>"),
    ("/to-all", "Select every client"),
    ("/to-first", "Add first N recipient matches <n>"),
    ("/to-random", "Add N random recipient matches <n>"),
    ("/rfilter", "Recipient filter search|category|status|clear <value>"),
    ("/recipients", "Show draft recipients"),
    ("/clear-recipients", "Clear draft recipients"),
    ("/preview", "Preview draft"),
    ("/send", "Send draft now [wait] | later <date> <time> | recurring <freq> <date> <time>"),
    ("/outbox", "Outgoing emails [tab]"),
    ("/pause", "Pause outgoing email <id>"),
    ("/unschedule", "Delete outgoing email <id>"),
    ("/inbox", "Inbox [tab] [sort]"),
    ("/inbox-search", "Search inbox <text>"),
    ("/open", "Open inbox email <id>"),
    ("/star", "Toggle star <id>"),
    ("/select", "Toggle inbox selection <id>"),
    ("/bulk", "Apply read|unread|archive|unarchive|delete to selection"),
    ("/login", "Portal credentials email <client id> [password]"),
    ("/exit", "Quit"),
    ("/quit", "Quit"),
];

#[derive(Debug, Clone, PartialEq)]
pub enum ClientFilter {
    Category(String),
    Status(ClientStatus),
    From(NaiveDate),
    To(NaiveDate),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecipientFilterArg {
    Search(String),
    Category(String),
    Status(ClientStatus),
    Clear,
}

/// Fields given to `/new-template` or `/edit-template`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateEdit {
    pub name: Option<String>,
    pub category: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

impl TemplateEdit {
    fn apply_to(self, form: &mut TemplateForm) {
        if let Some(v) = self.name {
            form.name = v;
        }
        if let Some(v) = self.category {
            form.category = v;
        }
        if let Some(v) = self.subject {
            form.subject = v;
        }
        if let Some(v) = self.body {
            form.body = v;
        }
    }
}

/// A parsed slash command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quit,
    Stats,
    Clients { page: usize },
    Search(String),
    Filter(ClientFilter),
    ClearFilters,
    Sort(ClientSortField),
    ShowClient(EntityId),
    AddClient(ClientForm),
    EditClient { id: EntityId, patch: ClientPatch },
    AddDirector { client: EntityId, form: DirectorForm },
    /// `position` counts from 1, as `/client` lists directors
    RemoveDirector { client: EntityId, position: usize },
    ToggleStatus(EntityId),
    DeleteClient(EntityId),
    Export(Option<PathBuf>),
    Templates(Option<TemplateCategory>),
    ShowTemplate(EntityId),
    NewTemplate(TemplateEdit),
    EditTemplate { id: EntityId, edit: TemplateEdit },
    DuplicateTemplate(EntityId),
    DeleteTemplate(EntityId),
    Subject(String),
    Body(String),
    /// Template id, or a template name
    UseTemplate(String),
    To(String),
    ToCategory(String),
    ToStatus(ClientStatus),
    ToAll,
    ToFirst(usize),
    ToRandom(usize),
    RecipientFilter(RecipientFilterArg),
    Recipients,
    ClearRecipients,
    Preview,
    Send(SendOption),
    Outbox(ScheduledTab),
    Pause(EntityId),
    Unschedule(EntityId),
    Inbox { tab: InboxTab, sort: Option<InboxSort> },
    InboxSearch(String),
    Open(EntityId),
    Star(EntityId),
    Select(EntityId),
    Bulk(BulkAction),
    Login { client: EntityId, password: Option<String> },
}

fn parse_id(arg: &str) -> anyhow::Result<EntityId> {
    arg.trim().parse().with_context(|| format!("expected a numeric id, got '{}'", arg.trim()))
}

fn parse_count(arg: &str) -> anyhow::Result<usize> {
    arg.trim().parse().with_context(|| format!("expected a number, got '{}'", arg.trim()))
}

fn parse_date(arg: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(arg.trim(), "%Y-%m-%d").with_context(|| format!("expected yyyy-mm-dd, got '{}'", arg))
}

fn parse_datetime(date: &str, time: &str) -> anyhow::Result<DateTime<Utc>> {
    let text = format!("{} {}", date, time);
    NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M")
        .map(|naive| naive.and_utc())
        .with_context(|| format!("expected 'yyyy-mm-dd HH:MM', got '{}'", text))
}

fn parse_status(arg: &str) -> anyhow::Result<ClientStatus> {
    arg.parse::<ClientStatus>().map_err(|e| anyhow!(e))
}

/// Split an `<id> rest` argument
fn split_id(args: &str) -> anyhow::Result<(EntityId, &str)> {
    let (id, rest) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
    Ok((parse_id(id)?, rest.trim()))
}

/// Split `key=value; key=value` input into lower-cased keys and trimmed values
fn parse_fields(args: &str) -> anyhow::Result<Vec<(String, String)>> {
    args.split(';')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            let (key, value) = part
                .split_once('=')
                .with_context(|| format!("expected field=value, got '{}'", part.trim()))?;
            Ok((key.trim().to_lowercase(), value.trim().replace("\\n", "\n")))
        })
        .collect()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn client_form(fields: Vec<(String, String)>) -> anyhow::Result<ClientForm> {
    let mut form = ClientForm::default();
    for (key, value) in fields {
        match key.as_str() {
            "name" => form.name = value,
            "email" => form.email = value,
            "phone" => form.phone = value,
            "alt" => form.alternate_contact = value,
            "company" => form.company_name = value,
            "type" => form.business_type = value,
            "pan" => form.pan_number = value,
            "gst" => form.gst_number = value,
            "registered" => form.registration_date = value,
            "status" => form.status = value,
            "address" => form.address = value,
            "city" => form.city = value,
            "state" => form.state = value,
            "country" => form.country = value,
            "pin" => form.pin_code = value,
            "services" => form.services = split_list(&value),
            "notes" => form.notes = value,
            other => bail!("unknown client field: {}", other),
        }
    }
    Ok(form)
}

/// Blank input clears an optional field
fn optional(value: String) -> Option<Option<String>> {
    Some((!value.is_empty()).then_some(value))
}

fn required(field: &str, value: String) -> anyhow::Result<Option<String>> {
    if value.is_empty() {
        bail!("{} cannot be blank", field);
    }
    Ok(Some(value))
}

fn client_patch(fields: Vec<(String, String)>) -> anyhow::Result<ClientPatch> {
    let mut patch = ClientPatch::default();
    for (key, value) in fields {
        match key.as_str() {
            "name" => patch.name = required("name", value)?,
            "email" => {
                if !is_valid_email(&value) {
                    bail!("invalid email: {}", value);
                }
                patch.email = Some(value);
            }
            "phone" => patch.phone = required("phone", value)?,
            "alt" => patch.alternate_contact = optional(value),
            "company" => patch.company_name = required("company", value)?,
            "type" => patch.business_type = required("type", value)?,
            "pan" => patch.pan_number = optional(value),
            "gst" => patch.gst_number = optional(value),
            "registered" => {
                patch.registration_date = Some(if value.is_empty() { None } else { Some(parse_date(&value)?) })
            }
            "status" => patch.status = Some(parse_status(&value)?),
            "address" => patch.address = optional(value),
            "city" => patch.city = optional(value),
            "state" => patch.state = optional(value),
            "country" => patch.country = optional(value),
            "pin" => patch.pin_code = optional(value),
            "services" => patch.services = Some(split_list(&value)),
            "notes" => patch.notes = optional(value),
            other => bail!("unknown client field: {}", other),
        }
    }
    if patch.is_empty() {
        bail!("usage: /edit-client <id> field=value; ...");
    }
    Ok(patch)
}

fn director_form(fields: Vec<(String, String)>) -> anyhow::Result<DirectorForm> {
    let mut form = DirectorForm::default();
    for (key, value) in fields {
        match key.as_str() {
            "name" => form.name = value,
            "din" => form.din = value,
            "designation" => form.designation = value,
            "email" => form.email = value,
            "phone" => form.phone = value,
            "pan" => form.pan = value,
            "aadhar" => form.aadhar = value,
            other => bail!("unknown director field: {}", other),
        }
    }
    Ok(form)
}

fn template_edit(fields: Vec<(String, String)>) -> anyhow::Result<TemplateEdit> {
    let mut edit = TemplateEdit::default();
    for (key, value) in fields {
        match key.as_str() {
            "name" => edit.name = Some(value),
            "category" => edit.category = Some(value),
            "subject" => edit.subject = Some(value),
            "body" => edit.body = Some(value),
            other => bail!("unknown template field: {}", other),
        }
    }
    Ok(edit)
}

fn parse_send(args: &str) -> anyhow::Result<SendOption> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    match parts.as_slice() {
        [] | ["now"] => Ok(SendOption::Now {
            waiting_for_reply: false,
        }),
        ["now", "wait"] => Ok(SendOption::Now {
            waiting_for_reply: true,
        }),
        ["later", date, time] => Ok(SendOption::Later {
            at: parse_datetime(date, time)?,
        }),
        ["recurring", frequency, date, time] => Ok(SendOption::Recurring {
            at: parse_datetime(date, time)?,
            frequency: frequency.parse::<RepeatFrequency>().map_err(|e| anyhow!(e))?,
        }),
        _ => bail!("usage: /send now [wait] | later <date> <time> | recurring <daily|weekly|monthly> <date> <time>"),
    }
}

impl Command {
    /// Parse one input line; a line not starting with `/` is an error
    pub fn parse(line: &str) -> anyhow::Result<Self> {
        let line = line.trim();
        if !line.starts_with('/') {
            bail!("commands start with '/'; try /help");
        }
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let first = rest.split_whitespace().next().unwrap_or_default();

        let command = match name.to_lowercase().as_str() {
            "/help" | "/?" => Self::Help,
            "/exit" | "/quit" | "/q" => Self::Quit,
            "/stats" => Self::Stats,
            "/clients" => Self::Clients {
                page: if rest.is_empty() { 1 } else { parse_count(rest)? },
            },
            "/search" => Self::Search(rest.to_string()),
            "/filter" => {
                let value = rest[first.len()..].trim();
                let filter = match first.to_lowercase().as_str() {
                    "category" if !value.is_empty() => ClientFilter::Category(value.to_string()),
                    "status" => ClientFilter::Status(parse_status(value)?),
                    "from" => ClientFilter::From(parse_date(value)?),
                    "to" => ClientFilter::To(parse_date(value)?),
                    _ => bail!("usage: /filter category|status|from|to <value>"),
                };
                Self::Filter(filter)
            }
            "/clear-filters" => Self::ClearFilters,
            "/sort" => Self::Sort(rest.parse().map_err(|e: String| anyhow!(e))?),
            "/client" => Self::ShowClient(parse_id(rest)?),
            "/add-client" => Self::AddClient(client_form(parse_fields(rest)?)?),
            "/edit-client" => {
                let (id, fields) = split_id(rest)?;
                Self::EditClient {
                    id,
                    patch: client_patch(parse_fields(fields)?)?,
                }
            }
            "/add-director" => {
                let (client, fields) = split_id(rest)?;
                Self::AddDirector {
                    client,
                    form: director_form(parse_fields(fields)?)?,
                }
            }
            "/remove-director" => {
                let (client, position) = split_id(rest)?;
                Self::RemoveDirector {
                    client,
                    position: parse_count(position)?,
                }
            }
            "/toggle" => Self::ToggleStatus(parse_id(rest)?),
            "/delete-client" => Self::DeleteClient(parse_id(rest)?),
            "/export" => Self::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "/templates" => Self::Templates(if rest.is_empty() || rest.eq_ignore_ascii_case("all") {
                None
            } else {
                Some(rest.parse().map_err(|e: String| anyhow!(e))?)
            }),
            "/template" => Self::ShowTemplate(parse_id(rest)?),
            "/new-template" => Self::NewTemplate(template_edit(parse_fields(rest)?)?),
            "/edit-template" => {
                let (id, fields) = split_id(rest)?;
                Self::EditTemplate {
                    id,
                    edit: template_edit(parse_fields(fields)?)?,
                }
            }
            "/duplicate" => Self::DuplicateTemplate(parse_id(rest)?),
            "/delete-template" => Self::DeleteTemplate(parse_id(rest)?),
            "/subject" => Self::Subject(rest.to_string()),
            "/body" => Self::Body(rest.replace("\\n", "\n")),
            "/use" if rest.is_empty() => bail!("usage: /use <id|name>"),
            "/use" => Self::UseTemplate(rest.to_string()),
            "/to" | "/to-category" if rest.is_empty() => bail!("usage: {} <value>", name),
            "/to" => Self::To(rest.to_string()),
            "/to-category" => Self::ToCategory(rest.to_string()),
            "/to-status" => Self::ToStatus(parse_status(rest)?),
            "/to-all" => Self::ToAll,
            "/to-first" => Self::ToFirst(parse_count(rest)?),
            "/to-random" => Self::ToRandom(parse_count(rest)?),
            "/rfilter" => {
                let value = rest[first.len()..].trim();
                Self::RecipientFilter(match first.to_lowercase().as_str() {
                    "search" => RecipientFilterArg::Search(value.to_string()),
                    "category" if !value.is_empty() => RecipientFilterArg::Category(value.to_string()),
                    "status" => RecipientFilterArg::Status(parse_status(value)?),
                    "clear" => RecipientFilterArg::Clear,
                    _ => bail!("usage: /rfilter search|category|status|clear <value>"),
                })
            }
            "/recipients" => Self::Recipients,
            "/clear-recipients" => Self::ClearRecipients,
            "/preview" => Self::Preview,
            "/send" => Self::Send(parse_send(rest)?),
            "/outbox" => Self::Outbox(if rest.is_empty() {
                ScheduledTab::default()
            } else {
                rest.parse().map_err(|e: String| anyhow!(e))?
            }),
            "/pause" => Self::Pause(parse_id(rest)?),
            "/unschedule" => Self::Unschedule(parse_id(rest)?),
            "/inbox" => {
                let mut parts = rest.split_whitespace();
                let tab = match parts.next() {
                    Some(t) => t.parse().map_err(|e: String| anyhow!(e))?,
                    None => InboxTab::default(),
                };
                let sort = parts
                    .next()
                    .map(|s| s.parse::<InboxSort>().map_err(|e| anyhow!(e)))
                    .transpose()?;
                Self::Inbox { tab, sort }
            }
            "/inbox-search" => Self::InboxSearch(rest.to_string()),
            "/open" => Self::Open(parse_id(rest)?),
            "/star" => Self::Star(parse_id(rest)?),
            "/select" => Self::Select(parse_id(rest)?),
            "/bulk" => Self::Bulk(rest.parse().map_err(|e: String| anyhow!(e))?),
            "/login" => {
                let mut parts = rest.split_whitespace();
                let client = parse_id(parts.next().unwrap_or_default())?;
                Self::Login {
                    client,
                    password: parts.next().map(str::to_string),
                }
            }
            _ => bail!("unknown command: {}; /help lists commands", name),
        };
        Ok(command)
    }
}

/// What the shell should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// State of one interactive session
pub struct Desk {
    store: PracticeStore,
    config: DeskConfig,
    client_query: ClientQuery,
    recipient_filter: RecipientFilter,
    inbox_query: InboxQuery,
    inbox_selection: InboxSelection,
    draft: EmailDraft,
}

impl Desk {
    pub fn new(store: PracticeStore, config: DeskConfig) -> Self {
        let inbox_query = InboxQuery::new(InboxTab::All).sort(config.inbox.default_sort);
        Self {
            store,
            config,
            client_query: ClientQuery::new(),
            recipient_filter: RecipientFilter::default(),
            inbox_query,
            inbox_selection: InboxSelection::new(),
            draft: EmailDraft::default(),
        }
    }

    pub fn store(&self) -> &PracticeStore {
        &self.store
    }

    pub fn draft(&self) -> &EmailDraft {
        &self.draft
    }

    pub fn execute(&mut self, command: Command, now: DateTime<Utc>) -> anyhow::Result<Reply> {
        let today = now.date_naive();
        let text = match command {
            Command::Quit => return Ok(Reply::Quit),
            Command::Help => help_text(),
            Command::Stats => format_stats(&DashboardStats::from(&self.store)),
            Command::Clients { page } => self.list_clients(page),
            Command::Search(text) => {
                self.client_query.search = text;
                self.list_clients(1)
            }
            Command::Filter(filter) => {
                match filter {
                    ClientFilter::Category(c) => {
                        self.client_query.categories.insert(c);
                    }
                    ClientFilter::Status(s) => {
                        self.client_query.statuses.insert(s);
                    }
                    ClientFilter::From(d) => self.client_query.date_from = Some(d),
                    ClientFilter::To(d) => self.client_query.date_to = Some(d),
                }
                self.list_clients(1)
            }
            Command::ClearFilters => {
                self.client_query.clear_filters();
                self.list_clients(1)
            }
            Command::Sort(field) => {
                self.client_query.toggle_sort(field);
                self.list_clients(1)
            }
            Command::ShowClient(id) => {
                let client = self.store.client(id).ok_or_else(|| anyhow!("no client with id {}", id))?;
                format_client_detail(client)
            }
            Command::AddClient(form) => {
                let client = form.into_new_client()?;
                let name = client.name.clone();
                let id = self.store.add_client(client);
                format!("Added client {} ({})", id, name)
            }
            Command::EditClient { id, patch } => {
                if !self.store.update_client(id, patch) {
                    bail!("no client with id {}", id);
                }
                format!("Updated client {}", id)
            }
            Command::AddDirector { client, form } => {
                if self.store.client(client).is_none() {
                    bail!("no client with id {}", client);
                }
                let director = form.into_director()?;
                let name = director.name.clone();
                self.store.add_director(client, director);
                format!("Added director {} to client {}", name, client)
            }
            Command::RemoveDirector { client, position } => {
                let removed = position
                    .checked_sub(1)
                    .and_then(|index| self.store.remove_director(client, index))
                    .ok_or_else(|| anyhow!("client {} has no director {}", client, position))?;
                format!("Removed director {}", removed.name)
            }
            Command::ToggleStatus(id) => {
                let status = self
                    .store
                    .toggle_client_status(id)
                    .ok_or_else(|| anyhow!("no client with id {}", id))?;
                format!("Client {} is now {}", id, status)
            }
            Command::DeleteClient(id) => {
                if !self.store.delete_client(id) {
                    bail!("no client with id {}", id);
                }
                format!("Deleted client {}", id)
            }
            Command::Export(path) => {
                let path = path.unwrap_or_else(|| PathBuf::from(default_export_file_name(today)));
                let clients = filter_clients(self.store.clients(), &self.client_query);
                write_clients_csv(&path, &clients)?;
                format!("Exported {} clients to {}", clients.len(), path.display())
            }
            Command::Templates(category) => {
                let query = TemplateQuery {
                    category,
                    search: String::new(),
                };
                let mut out = String::new();
                for t in filter_templates(self.store.templates(), &query) {
                    let _ = writeln!(
                        out,
                        "{:>4}  {:<32} {:<18} used {:>3}x  modified {}",
                        t.id,
                        t.name,
                        t.category.as_str(),
                        t.usage_count,
                        t.last_modified.format("%Y-%m-%d")
                    );
                }
                if out.is_empty() { "No templates".to_string() } else { out }
            }
            Command::ShowTemplate(id) => {
                let template = self.store.template(id).ok_or_else(|| anyhow!("no template with id {}", id))?;
                let rendered = preview_template(template, &self.config.portal, today);
                format!("Subject: {}\n\n{}", rendered.subject, rendered.body)
            }
            Command::NewTemplate(edit) => {
                let mut form = TemplateForm::default();
                edit.apply_to(&mut form);
                let id = self.store.add_template(form.into_new_template()?);
                format!("Created template {}", id)
            }
            Command::EditTemplate { id, edit } => {
                let template = self.store.template(id).ok_or_else(|| anyhow!("no template with id {}", id))?;
                let mut form = TemplateForm::from_template(template);
                edit.apply_to(&mut form);
                self.store.update_template(id, form.into_patch()?);
                format!("Updated template {}", id)
            }
            Command::DeleteTemplate(id) => {
                if !self.store.delete_template(id) {
                    bail!("no template with id {}", id);
                }
                format!("Deleted template {}", id)
            }
            Command::DuplicateTemplate(id) => {
                let copy = self
                    .store
                    .duplicate_template(id)
                    .ok_or_else(|| anyhow!("no template with id {}", id))?;
                format!("Created template {}", copy)
            }
            Command::Subject(subject) => {
                self.draft.subject = subject;
                "Subject set".to_string()
            }
            Command::Body(body) => {
                self.draft.body = body;
                "Body set".to_string()
            }
            Command::UseTemplate(template) => {
                let id = match template.parse::<EntityId>() {
                    Ok(id) => id,
                    Err(_) => {
                        find_template(&self.store, &template)
                            .ok_or_else(|| anyhow!("no template named '{}'", template))?
                            .id
                    }
                };
                apply_template(&mut self.store, &mut self.draft, id)?;
                format!("Template applied: {}", self.draft.subject)
            }
            Command::To(email) => {
                if self.draft.recipients.toggle(&email) {
                    format!("Added {}", email)
                } else {
                    format!("Removed {}", email)
                }
            }
            Command::ToCategory(category) => {
                let added = self.draft.recipients.add_by_category(self.store.clients(), &category);
                format!("Added {} members from {}", added, category)
            }
            Command::ToStatus(status) => {
                let added = self.draft.recipients.add_by_status(self.store.clients(), status);
                format!("Added {} {} members", added, status)
            }
            Command::ToAll => {
                let added = self.draft.recipients.select_all_clients(self.store.clients());
                format!("Added all {} members", added)
            }
            Command::ToFirst(n) => {
                let filtered = self.recipient_filter.apply(self.store.clients());
                let n = self.draft.recipients.add_first_n(&filtered, n);
                format!("Added {} members from filtered list ({} total match)", n, filtered.len())
            }
            Command::ToRandom(n) => {
                let filtered = self.recipient_filter.apply(self.store.clients());
                let n = self
                    .draft
                    .recipients
                    .add_random_n(&filtered, n, &mut rand::thread_rng());
                format!("Added {} random members from filtered list", n)
            }
            Command::RecipientFilter(arg) => {
                match arg {
                    RecipientFilterArg::Search(s) => self.recipient_filter.search = s,
                    RecipientFilterArg::Category(c) => self.recipient_filter.category = Some(c),
                    RecipientFilterArg::Status(s) => self.recipient_filter.status = Some(s),
                    RecipientFilterArg::Clear => self.recipient_filter = RecipientFilter::default(),
                }
                let shown = self.recipient_filter.apply(self.store.clients());
                format!("{} clients match the recipient filter", shown.len())
            }
            Command::Recipients => {
                if self.draft.recipients.is_empty() {
                    "No recipients selected".to_string()
                } else {
                    format!(
                        "{} recipient(s): {}",
                        self.draft.recipients.len(),
                        self.draft.recipients.as_slice().join(", ")
                    )
                }
            }
            Command::ClearRecipients => {
                self.draft.recipients.clear();
                "Selection cleared".to_string()
            }
            Command::Preview => {
                let rendered = preview_draft(&self.store, &self.draft, &self.config.portal, today)?;
                format!("Subject: {}\n\n{}", rendered.subject, rendered.body)
            }
            Command::Send(option) => {
                let id = send(&mut self.store, &self.draft, option, now)?;
                let count = self.draft.recipients.len();
                self.draft = EmailDraft::default();
                match option {
                    SendOption::Now { .. } => format!("Email {} sent to {} recipient(s)", id, count),
                    _ => format!("Email {} scheduled {}", id, option),
                }
            }
            Command::Outbox(tab) => self.list_outbox(tab, now),
            Command::Pause(id) => {
                ca_mail::scheduled::pause(&mut self.store, id)?;
                "Email schedule paused".to_string()
            }
            Command::Unschedule(id) => {
                ca_mail::scheduled::delete(&mut self.store, id)?;
                "Scheduled email deleted".to_string()
            }
            Command::Inbox { tab, sort } => {
                self.inbox_query.tab = tab;
                if let Some(sort) = sort {
                    self.inbox_query.sort = sort;
                }
                self.list_inbox()
            }
            Command::InboxSearch(text) => {
                self.inbox_query.search = text;
                self.list_inbox()
            }
            Command::Open(id) => {
                let email = open_email(&mut self.store, id)?;
                format!(
                    "From: {} <{}>\nTo: {}\nDate: {}\nSubject: {}\n\n{}",
                    email.from_name,
                    email.from,
                    email.to,
                    email.received_at.format("%Y-%m-%d %H:%M"),
                    email.subject,
                    email.body
                )
            }
            Command::Star(id) => {
                if toggle_star(&mut self.store, id)? {
                    format!("Starred {}", id)
                } else {
                    format!("Unstarred {}", id)
                }
            }
            Command::Select(id) => {
                if self.store.received_email(id).is_none() {
                    bail!("no inbox email with id {}", id);
                }
                self.inbox_selection.toggle(id);
                format!("{} selected", self.inbox_selection.len())
            }
            Command::Bulk(action) => {
                if self.inbox_selection.is_empty() {
                    bail!("select emails first with /select <id>");
                }
                let touched = self.inbox_selection.apply(&mut self.store, action);
                if action == BulkAction::Delete {
                    format!("{} email(s) deleted", touched)
                } else {
                    format!("{} email(s) updated", touched)
                }
            }
            Command::Login { client, password } => {
                let record = self.store.client(client).ok_or_else(|| anyhow!("no client with id {}", client))?;
                let password = password.unwrap_or_else(|| portal::generate_password(&mut rand::thread_rng()));
                let request = CredentialRequest::for_client(record).with_password(password.as_str());
                let email = portal::credential_email(&self.store, client, &request, &self.config.portal, today)?;
                format!(
                    "Username: {}\nPassword strength: {}\n\nSubject: {}\n\n{}",
                    request.username,
                    Strength::of(&password),
                    email.subject,
                    email.body
                )
            }
        };
        Ok(Reply::Text(text))
    }

    fn list_clients(&self, page: usize) -> String {
        let filtered = filter_clients(self.store.clients(), &self.client_query);
        let page = paginate(&filtered, page, self.config.clients.page_size);

        let mut out = String::new();
        for c in &page.items {
            let _ = writeln!(
                out,
                "{:>4}  {:<20} {:<24} {:<24} {:<8} {}",
                c.id,
                c.name,
                c.email,
                c.company_name,
                c.status.as_str(),
                c.added_date.format("%Y-%m-%d")
            );
        }
        if page.total_items == 0 {
            out.push_str("No clients match\n");
        }
        let _ = write!(
            out,
            "Page {}/{} ({} clients)",
            page.page,
            page.total_pages.max(1),
            page.total_items
        );
        out
    }

    fn list_outbox(&self, tab: ScheduledTab, now: DateTime<Utc>) -> String {
        let emails = self.store.scheduled_emails();
        let counts = TabCounts::of(emails, now);

        let mut out = counts
            .iter()
            .map(|(t, n)| format!("{} ({})", t, n))
            .collect::<Vec<_>>()
            .join(" | ");
        out.push('\n');
        for e in filter_scheduled(emails, tab, now) {
            let repeat = e.repeat_frequency.map(|f| format!(" {}", f)).unwrap_or_default();
            let _ = writeln!(
                out,
                "{:>4}  {:<32} {:>3} recipient(s)  {}  {}{}",
                e.id,
                e.subject,
                e.recipients_count,
                e.schedule_date.format("%Y-%m-%d %H:%M"),
                e.status,
                repeat
            );
        }
        out
    }

    fn list_inbox(&self) -> String {
        let emails = self.store.received_emails();
        let counts = InboxCounts::of(emails);
        let mut out = format!(
            "[{}] unread {} | starred {} | archived {}\n",
            self.inbox_query.tab, counts.unread, counts.starred, counts.archived
        );
        for e in filter_inbox(emails, &self.inbox_query) {
            let _ = writeln!(
                out,
                "{:>4} {}{}{} {:<20} {:<36} {}",
                e.id,
                if e.is_read { ' ' } else { '*' },
                if e.is_starred { '★' } else { ' ' },
                if e.has_attachment { '@' } else { ' ' },
                e.from_name,
                e.subject,
                e.received_at.format("%b %-d")
            );
        }
        out
    }
}

fn help_text() -> String {
    let mut out = String::from("Commands:\n");
    for (cmd, desc) in COMMANDS {
        let _ = writeln!(out, "  {:<18} {}", cmd, desc);
    }
    out
}

pub fn format_stats(stats: &DashboardStats) -> String {
    format!(
        "Total clients:   {}\nActive clients:  {}\nEmails sent:     {}\nPending tasks:   {}",
        stats.total_clients, stats.active_clients, stats.emails_sent, stats.pending_tasks
    )
}

fn format_client_detail(client: &Client) -> String {
    let mut out = format!(
        "{} ({})\nEmail: {}\nPhone: {}\nCompany: {} [{}]\nStatus: {}\nCategories: {}\nAdded: {}\n",
        client.name,
        client.id,
        client.email,
        client.phone,
        client.company_name,
        client.business_type,
        client.status,
        client.categories.iter().cloned().collect::<Vec<_>>().join(", "),
        client.added_date.format("%Y-%m-%d")
    );
    let place: Vec<&str> = [&client.city, &client.state, &client.pin_code, &client.country]
        .into_iter()
        .filter_map(|p| p.as_deref())
        .collect();
    if !place.is_empty() {
        let _ = writeln!(out, "Location: {}", place.join(", "));
    }
    if !client.services.is_empty() {
        let _ = writeln!(out, "Services: {}", client.services.join(", "));
    }
    for (n, d) in client.directors.iter().enumerate() {
        let _ = writeln!(
            out,
            "Director {}: {}{}",
            n + 1,
            d.name,
            d.designation.as_deref().map(|s| format!(" ({})", s)).unwrap_or_default()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ca_core::sample::sample_store;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap()
    }

    fn desk() -> Desk {
        Desk::new(sample_store(), DeskConfig::default())
    }

    fn run(desk: &mut Desk, line: &str) -> String {
        match desk.execute(Command::parse(line).unwrap(), now()).unwrap() {
            Reply::Text(text) => text,
            Reply::Quit => "quit".to_string(),
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/clients").unwrap(), Command::Clients { page: 1 });
        assert_eq!(
            Command::parse("/filter status pending").unwrap(),
            Command::Filter(ClientFilter::Status(ClientStatus::Pending))
        );
        assert_eq!(
            Command::parse("/inbox unread sender").unwrap(),
            Command::Inbox {
                tab: InboxTab::Unread,
                sort: Some(InboxSort::Sender)
            }
        );
        assert_eq!(
            Command::parse("/send later 2024-03-01 10:30").unwrap(),
            Command::Send(SendOption::Later {
                at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap()
            })
        );
        assert_eq!(Command::parse("/QUIT").unwrap(), Command::Quit);
        assert!(Command::parse("hello").is_err());
        assert!(Command::parse("/frobnicate").is_err());
        assert!(Command::parse("/client abc").is_err());
        assert!(Command::parse("/send recurring yearly 2024-03-01 10:30").is_err());
    }

    #[test]
    fn test_every_listed_command_parses_or_needs_args() {
        for (cmd, _) in COMMANDS {
            if let Err(e) = Command::parse(cmd) {
                let msg = e.to_string();
                assert!(!msg.starts_with("unknown command"), "{} is listed but not handled", cmd);
            }
        }
    }

    #[test]
    fn test_client_filter_flow() {
        let mut desk = desk();
        let out = run(&mut desk, "/filter status pending");
        assert!(out.contains("Raj Kumar"));
        assert!(!out.contains("John Smith"));
        assert!(out.ends_with("Page 1/1 (1 clients)"));

        let out = run(&mut desk, "/clear-filters");
        assert!(out.ends_with("(3 clients)"));
    }

    #[test]
    fn test_compose_and_send() {
        let mut desk = desk();
        run(&mut desk, "/use 2");
        run(&mut desk, "/to-status active");
        let preview = run(&mut desk, "/preview");
        assert!(preview.starts_with("Subject: Document Request - Smith Enterprises"));

        let out = run(&mut desk, "/send now wait");
        assert!(out.contains("sent to 2 recipient(s)"));
        assert!(desk.draft().recipients.is_empty());
        assert_eq!(desk.store().template(2).unwrap().usage_count, 24);

        let stats = run(&mut desk, "/stats");
        assert!(stats.contains("Emails sent:     1"));
    }

    #[test]
    fn test_use_template_by_name() {
        let mut desk = desk();
        let out = run(&mut desk, "/use document request reminder");
        assert_eq!(out, "Template applied: Document Request - {{company_name}}");
        assert_eq!(desk.store().template(2).unwrap().usage_count, 24);
        assert!(desk.execute(Command::parse("/use Tax Notice").unwrap(), now()).is_err());
        assert!(Command::parse("/use").is_err());
    }

    #[test]
    fn test_send_without_recipients_fails() {
        let mut desk = desk();
        run(&mut desk, "/subject Hi");
        run(&mut desk, "/body Hello");
        let err = desk.execute(Command::parse("/send").unwrap(), now()).unwrap_err();
        assert!(err.to_string().contains("No recipients"));
    }

    #[test]
    fn test_inbox_bulk_archive() {
        let mut desk = desk();
        run(&mut desk, "/select 1");
        run(&mut desk, "/select 2");
        let out = run(&mut desk, "/bulk archive");
        assert_eq!(out, "2 email(s) updated");

        let inbox = run(&mut desk, "/inbox archived");
        assert!(inbox.contains("archived 3"));
    }

    #[test]
    fn test_export_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clients.csv");
        let mut desk = desk();
        let out = run(&mut desk, &format!("/export {}", path.display()));
        assert!(out.starts_with("Exported 3 clients"));
        let csv = std::fs::read_to_string(&path).unwrap();
        assert!(csv.starts_with("Name,Email,Phone,Company,Status,Added Date"));
    }

    #[test]
    fn test_login_with_given_password() {
        let mut desk = desk();
        let out = run(&mut desk, "/login 1 Abcdefgh12!x");
        assert!(out.contains("Username: john"));
        assert!(out.contains("Password strength: Strong"));
        assert!(out.contains("Password: Abcdefgh12!x"));
    }

    #[test]
    fn test_parse_field_commands() {
        assert_eq!(
            Command::parse("/remove-director 3 2").unwrap(),
            Command::RemoveDirector { client: 3, position: 2 }
        );
        assert_eq!(
            Command::parse("/edit-template 2 Subject = Docs ; body=a\\nb").unwrap(),
            Command::EditTemplate {
                id: 2,
                edit: TemplateEdit {
                    subject: Some("Docs".to_string()),
                    body: Some("a\nb".to_string()),
                    ..Default::default()
                }
            }
        );
        assert!(Command::parse("/add-client nickname=JS").is_err());
        assert!(Command::parse("/add-client name").is_err());
        assert!(Command::parse("/edit-client 1").is_err());
        assert!(Command::parse("/edit-client 1 email=not-an-email").is_err());
        assert!(Command::parse("/edit-client 1 name=").is_err());
    }

    #[test]
    fn test_add_and_edit_client() {
        let mut desk = desk();
        let out = run(
            &mut desk,
            "/add-client name=Asha Rao; email=asha@rao.in; phone=+91 90000 00000; company=Rao Traders; \
             type=Partnership; services=GST filing, Audit service; city=Pune",
        );
        assert!(out.starts_with("Added client"));
        let client = desk.store().clients().iter().find(|c| c.name == "Asha Rao").unwrap().clone();
        assert!(client.has_category("GST filing"));
        assert!(!client.has_category("Partnership"));
        assert_eq!(client.city.as_deref(), Some("Pune"));

        run(&mut desk, &format!("/edit-client {} city=; status=pending", client.id));
        let edited = desk.store().client(client.id).unwrap();
        assert_eq!(edited.city, None);
        assert_eq!(edited.status, ClientStatus::Pending);
        assert_eq!(edited.added_date, client.added_date);

        let err = desk
            .execute(Command::parse("/add-client name=No Email; phone=1").unwrap(), now())
            .unwrap_err();
        assert!(err.to_string().contains("Email is required"));
        assert!(desk.execute(Command::parse("/edit-client 99 city=Goa").unwrap(), now()).is_err());
    }

    #[test]
    fn test_directors_from_the_desk() {
        let mut desk = desk();
        run(&mut desk, "/add-director 1 name=Meera Iyer; designation=Director; din=01234567");
        let detail = run(&mut desk, "/client 1");
        assert!(detail.contains("Director 1: Meera Iyer (Director)"));
        assert_eq!(desk.store().client(1).unwrap().directors[0].din.as_deref(), Some("01234567"));

        let blank = Command::parse("/add-director 1 designation=CFO").unwrap();
        assert!(desk.execute(blank, now()).is_err());
        assert!(desk.execute(Command::parse("/add-director 99 name=X").unwrap(), now()).is_err());
        assert!(desk.execute(Command::parse("/remove-director 1 0").unwrap(), now()).is_err());
        assert!(desk.execute(Command::parse("/remove-director 1 2").unwrap(), now()).is_err());

        assert_eq!(run(&mut desk, "/remove-director 1 1"), "Removed director Meera Iyer");
        assert!(desk.store().client(1).unwrap().directors.is_empty());
    }

    #[test]
    fn test_template_authoring() {
        let mut desk = desk();
        let out = run(
            &mut desk,
            "/new-template name=GST due; category=reminders; subject=GST due for {{company_name}}; \
             body=Dear {{client_name}},\\nFile by {{date}}.",
        );
        assert!(out.starts_with("Created template"));
        let created = desk.store().templates().iter().find(|t| t.name == "GST due").unwrap();
        assert_eq!(created.category, TemplateCategory::Reminders);
        assert_eq!(created.body, "Dear {{client_name}},\nFile by {{date}}.");
        assert_eq!(created.usage_count, 0);

        let bad = Command::parse("/new-template name=X; category=Marketing; subject=a; body=b").unwrap();
        assert!(desk.execute(bad, now()).is_err());
        let incomplete = Command::parse("/new-template name=X; category=General").unwrap();
        assert!(desk.execute(incomplete, now()).is_err());

        run(&mut desk, "/edit-template 2 subject=Documents needed");
        let edited = desk.store().template(2).unwrap();
        assert_eq!(edited.subject, "Documents needed");
        assert!(edited.body.starts_with("Dear {{client_name}}"));
        assert_eq!(edited.usage_count, 23);

        let cleared = Command::parse("/edit-template 2 body=").unwrap();
        assert!(desk.execute(cleared, now()).is_err());

        assert_eq!(run(&mut desk, "/delete-template 2"), "Deleted template 2");
        assert!(desk.execute(Command::parse("/delete-template 2").unwrap(), now()).is_err());
    }

    #[test]
    fn test_quit() {
        let mut desk = desk();
        assert_eq!(desk.execute(Command::Quit, now()).unwrap(), Reply::Quit);
    }
}

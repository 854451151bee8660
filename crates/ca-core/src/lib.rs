//! ca-core: Practice desk core library
//!
//! In-memory records of an accounting practice (clients, email templates,
//! outgoing and received email) with the pure queries and the template
//! engine the desk is built on.
//!
//! ## Features
//!
//! - Entity store with typed patches and a shared id sequence
//! - `{{key}}` placeholder rendering with client or sample data
//! - Client, template, inbox and outgoing-email views (filter, sort, tabs, pages)
//! - Dashboard statistics and CSV export of the client list
//! - Add-client form validation
//! - TOML + environment configuration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ca_core::prelude::*;
//!
//! let mut store = PracticeStore::new();
//! let id = store.add_client(NewClient::new(
//!     "Asha Rao", "asha@rao.in", "+91 90000 00000", "Rao Traders", "Partnership",
//! ));
//!
//! let active = filter_clients(store.clients(), &ClientQuery::new().status(ClientStatus::Active));
//! let csv = clients_to_csv(&active);
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod ids;
pub mod models;
pub mod query;
pub mod sample;
pub mod stats;
pub mod store;
pub mod template;
pub mod validate;

pub use config::{ClientListConfig, DeskConfig, InboxConfig, LoggingConfig, PortalConfig};
pub use error::{Error, Result};
pub use export::{clients_to_csv, default_export_file_name, write_clients_csv};
pub use ids::EntityId;
pub use stats::DashboardStats;
pub use store::{Clock, PracticeStore};
pub use validate::{ClientForm, DirectorForm, FieldError, TemplateForm};

pub mod prelude {
    pub use super::models::*;
    pub use super::query::{
        ClientQuery, ClientSortField, InboxCounts, InboxQuery, InboxSort, InboxTab, Page, ScheduledTab, SortOrder,
        TabCounts, TemplateQuery, filter_clients, filter_inbox, filter_scheduled, filter_templates, paginate,
    };
    pub use super::template::{RenderedEmail, TemplateVariable, VariableData, render};
    pub use super::{
        ClientForm, DashboardStats, DeskConfig, EntityId, PracticeStore, clients_to_csv, default_export_file_name,
    };
}

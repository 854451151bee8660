//! ca-mail: Mock email workflow for the practice desk
//!
//! Builds on the `ca-core` store. No mail leaves the process: sending,
//! scheduling and inbox handling only change store records.
//!
//! ## Features
//!
//! - Composer with send now, send later and recurring schedules
//! - Recipient selection by client, category, status, date range or sample
//! - Template application with usage counting, rendered previews
//! - Inbox actions (open, star, bulk read/unread/archive/unarchive/delete)
//! - Outgoing email actions (pause, delete)
//! - Client portal credential helpers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ca_mail::prelude::*;
//!
//! let mut store = ca_core::sample::sample_store();
//! let mut draft = EmailDraft::default();
//! apply_template(&mut store, &mut draft, 2)?;
//! draft.recipients.add_by_status(store.clients(), ClientStatus::Active);
//!
//! let id = send(&mut store, &draft, SendOption::Now { waiting_for_reply: true }, chrono::Utc::now())?;
//! ```

pub mod compose;
pub mod error;
pub mod inbox;
pub mod portal;
pub mod preview;
pub mod recipients;
pub mod scheduled;
pub mod templates;

pub use compose::{EmailDraft, SendOption, send};
pub use error::{MailError, Result};
pub use inbox::{BulkAction, InboxSelection, apply_bulk, open_email, toggle_star};
pub use portal::{CredentialRequest, Strength, credential_email, generate_password, password_strength};
pub use preview::{PreviewSource, preview_data, preview_draft, preview_template};
pub use recipients::{RecipientFilter, RecipientSelection};
pub use templates::{apply_template, find_template};

pub mod prelude {
    pub use super::{
        BulkAction, CredentialRequest, EmailDraft, InboxSelection, MailError, RecipientFilter, RecipientSelection,
        SendOption, apply_template, preview_draft, send,
    };
    pub use ca_core::models::ClientStatus;
}

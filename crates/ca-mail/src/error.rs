//! Error types for ca-mail

use ca_core::EntityId;
use thiserror::Error;

/// Reasons a mail workflow step is refused
///
/// All of these are reported back to the user; none leaves the store changed.
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Missing required fields: {0}")]
    MissingFields(String),

    #[error("No recipients selected")]
    NoRecipients,

    #[error("Template not found: {0}")]
    TemplateNotFound(EntityId),

    #[error("Client not found: {0}")]
    ClientNotFound(EntityId),

    #[error("Email not found: {0}")]
    EmailNotFound(EntityId),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error(transparent)]
    Core(#[from] ca_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, MailError>;

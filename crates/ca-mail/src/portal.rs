//! Client portal login helpers
//!
//! Credentials are never stored. These helpers check what the user typed,
//! suggest a password and render the email that hands the login over.

use std::fmt;

use ca_core::models::{Client, TemplateCategory};
use ca_core::store::PracticeStore;
use ca_core::template::{RenderedEmail, TemplateVariable, VariableData};
use ca_core::{EntityId, PortalConfig};
use chrono::NaiveDate;
use rand::Rng;
use tracing::debug;

use crate::error::{MailError, Result};

const PASSWORD_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";
pub const GENERATED_PASSWORD_LEN: usize = 16;

const DEFAULT_SUBJECT: &str = "Your Client Portal Login Credentials";
const DEFAULT_BODY: &str = "Dear {{client_name}},\n\nYour client portal login credentials have been created:\n\nUsername: {{username}}\nPassword: {{password}}\n\nLogin at: {{login_link}}\n\nPlease keep these credentials secure.";

/// Score 0..=5, one point each for: at least 8 chars, at least 12 chars,
/// both letter cases, a digit, a symbol
pub fn password_strength(password: &str) -> u8 {
    let len = password.chars().count();
    [
        len >= 8,
        len >= 12,
        password.chars().any(|c| c.is_ascii_lowercase()) && password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ]
    .into_iter()
    .filter(|&hit| hit)
    .count() as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    Weak,
    Medium,
    Strong,
}

impl Strength {
    pub fn of(password: &str) -> Self {
        match password_strength(password) {
            0..=2 => Self::Weak,
            3 => Self::Medium,
            _ => Self::Strong,
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
        })
    }
}

/// Random password drawn from letters, digits and `!@#$%^&*`
pub fn generate_password<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..GENERATED_PASSWORD_LEN)
        .map(|_| PASSWORD_CHARS[rng.gen_range(0..PASSWORD_CHARS.len())] as char)
        .collect()
}

/// Login the user is creating for a client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl CredentialRequest {
    /// Pre-filled from the client: username is the email's local part
    pub fn for_client(client: &Client) -> Self {
        Self {
            username: client.email.split('@').next().unwrap_or_default().to_string(),
            email: client.email.clone(),
            ..Default::default()
        }
    }

    /// Use `password` for both password fields
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self.confirm_password = self.password.clone();
        self
    }

    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [("username", &self.username), ("password", &self.password)]
            .into_iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(name, _)| name)
            .collect();
        if !missing.is_empty() {
            return Err(MailError::MissingFields(missing.join(", ")));
        }
        if self.password != self.confirm_password {
            return Err(MailError::PasswordMismatch);
        }
        Ok(())
    }
}

/// Email handing a validated login to the client
///
/// Uses the first Login Credentials template when there is one. Unlike
/// previews, the real password and the requested username are filled in.
pub fn credential_email(
    store: &PracticeStore,
    client_id: EntityId,
    request: &CredentialRequest,
    portal: &PortalConfig,
    today: NaiveDate,
) -> Result<RenderedEmail> {
    request.validate()?;
    let client = store.client(client_id).ok_or(MailError::ClientNotFound(client_id))?;

    let data = VariableData::for_client(client, portal, today)
        .with(TemplateVariable::Username, request.username.as_str())
        .with(TemplateVariable::Password, request.password.as_str())
        .with(TemplateVariable::LoginLink, portal.login_link_for(&request.username));

    let (subject, body) = store
        .templates()
        .iter()
        .find(|t| t.category == TemplateCategory::LoginCredentials)
        .map_or((DEFAULT_SUBJECT, DEFAULT_BODY), |t| (t.subject.as_str(), t.body.as_str()));

    debug!("Rendered login credentials email for client {}", client_id);
    Ok(RenderedEmail::render(subject, body, &data))
}

//! The fixed set of template variables and the data record they draw from

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::PortalConfig;
use crate::models::Client;

/// A supported `{{key}}` placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateVariable {
    ClientName,
    CompanyName,
    Email,
    Phone,
    Username,
    Password,
    LoginLink,
    Date,
    CustomMessage,
}

impl TemplateVariable {
    /// Substitution order
    pub const ALL: [TemplateVariable; 9] = [
        Self::ClientName,
        Self::CompanyName,
        Self::Email,
        Self::Phone,
        Self::Username,
        Self::Password,
        Self::LoginLink,
        Self::Date,
        Self::CustomMessage,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::ClientName => "client_name",
            Self::CompanyName => "company_name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Username => "username",
            Self::Password => "password",
            Self::LoginLink => "login_link",
            Self::Date => "date",
            Self::CustomMessage => "custom_message",
        }
    }

    /// Human label shown in the variable picker
    pub fn label(&self) -> &'static str {
        match self {
            Self::ClientName => "Client Name",
            Self::CompanyName => "Company Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Username => "Username",
            Self::Password => "Password",
            Self::LoginLink => "Login Link",
            Self::Date => "Date",
            Self::CustomMessage => "Custom Message",
        }
    }

    /// The literal token, e.g. `{{client_name}}`
    pub fn placeholder(&self) -> String {
        format!("{{{{{}}}}}", self.key())
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.key() == key)
    }
}

impl fmt::Display for TemplateVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Values for the template variables; any of them may be missing
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct VariableData {
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub login_link: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub custom_message: Option<String>,
}

/// Text used for `custom_message` until the author writes one
pub const SAMPLE_CUSTOM_MESSAGE: &str = "Your custom message here";

/// Format used for the `date` variable, e.g. `15 Jan 2024`
pub fn format_template_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

impl VariableData {
    pub fn get(&self, variable: TemplateVariable) -> Option<&str> {
        let value = match variable {
            TemplateVariable::ClientName => &self.client_name,
            TemplateVariable::CompanyName => &self.company_name,
            TemplateVariable::Email => &self.email,
            TemplateVariable::Phone => &self.phone,
            TemplateVariable::Username => &self.username,
            TemplateVariable::Password => &self.password,
            TemplateVariable::LoginLink => &self.login_link,
            TemplateVariable::Date => &self.date,
            TemplateVariable::CustomMessage => &self.custom_message,
        };
        value.as_deref()
    }

    pub fn set(&mut self, variable: TemplateVariable, value: impl Into<String>) {
        let value = Some(value.into());
        match variable {
            TemplateVariable::ClientName => self.client_name = value,
            TemplateVariable::CompanyName => self.company_name = value,
            TemplateVariable::Email => self.email = value,
            TemplateVariable::Phone => self.phone = value,
            TemplateVariable::Username => self.username = value,
            TemplateVariable::Password => self.password = value,
            TemplateVariable::LoginLink => self.login_link = value,
            TemplateVariable::Date => self.date = value,
            TemplateVariable::CustomMessage => self.custom_message = value,
        }
    }

    pub fn with(mut self, variable: TemplateVariable, value: impl Into<String>) -> Self {
        self.set(variable, value);
        self
    }

    /// Fixed record used for previews when no real client is at hand
    pub fn sample(portal: &PortalConfig, today: NaiveDate) -> Self {
        Self {
            client_name: Some("John Smith".to_string()),
            company_name: Some("Smith Enterprises".to_string()),
            email: Some("john@smith.com".to_string()),
            phone: Some("+91 9876543210".to_string()),
            username: Some("johnsmith".to_string()),
            password: Some("TempPass123!".to_string()),
            login_link: Some(portal.login_url.clone()),
            date: Some(format_template_date(today)),
            custom_message: Some(SAMPLE_CUSTOM_MESSAGE.to_string()),
        }
    }

    /// Record derived from a client
    ///
    /// The username is the local part of the email, the login link carries it
    /// URL-encoded, and the password is always the masked placeholder.
    pub fn for_client(client: &Client, portal: &PortalConfig, today: NaiveDate) -> Self {
        let username = client.username();
        Self {
            client_name: Some(client.name.clone()),
            company_name: Some(client.company_name.clone()),
            email: Some(client.email.clone()),
            phone: Some(client.phone.clone()),
            login_link: Some(portal.login_link_for(&username)),
            username: Some(username),
            password: Some(portal.masked_password.clone()),
            date: Some(format_template_date(today)),
            custom_message: Some(SAMPLE_CUSTOM_MESSAGE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewClient;
    use crate::store::PracticeStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    }

    #[test]
    fn test_keys_and_placeholders() {
        assert_eq!(TemplateVariable::ALL.len(), 9);
        assert_eq!(TemplateVariable::LoginLink.placeholder(), "{{login_link}}");
        assert_eq!(TemplateVariable::from_key("custom_message"), Some(TemplateVariable::CustomMessage));
        assert_eq!(TemplateVariable::from_key("Client_Name"), None);
    }

    #[test]
    fn test_date_format() {
        assert_eq!(format_template_date(today()), "5 Jan 2024");
    }

    #[test]
    fn test_for_client() {
        let mut store = PracticeStore::new();
        let id = store.add_client(NewClient::new(
            "Raj Kumar",
            "raj+tax@kumar.com",
            "+91 9876543230",
            "Kumar Tech Solutions",
            "LLP",
        ));
        let client = store.client(id).unwrap();
        let portal = PortalConfig::default();

        let data = VariableData::for_client(client, &portal, today());

        assert_eq!(data.username.as_deref(), Some("raj+tax"));
        assert_eq!(
            data.login_link.as_deref(),
            Some("https://portal.example.com/login?user=raj%2Btax")
        );
        assert_eq!(data.password.as_deref(), Some("••••••••"));
        assert_eq!(data.client_name.as_deref(), Some("Raj Kumar"));
        assert_eq!(data.date.as_deref(), Some("5 Jan 2024"));
    }

    #[test]
    fn test_for_client_without_local_part() {
        let mut store = PracticeStore::new();
        let id = store.add_client(NewClient::new("X", "@x.com", "1", "X Co", "LLP"));
        let data = VariableData::for_client(store.client(id).unwrap(), &PortalConfig::default(), today());
        assert_eq!(data.username.as_deref(), Some("user"));
    }

    #[test]
    fn test_get_and_set() {
        let mut data = VariableData::default();
        assert!(data.get(TemplateVariable::Phone).is_none());
        data.set(TemplateVariable::Phone, "123");
        assert_eq!(data.get(TemplateVariable::Phone), Some("123"));
    }
}

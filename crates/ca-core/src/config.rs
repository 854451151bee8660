//! Configuration management
//!
//! Settings are resolved in this order:
//! 1. Environment variables (`.env` is honoured)
//! 2. `ca-desk.toml` in the working directory
//! 3. Defaults
//!
//! Inside the TOML file, `${VAR_NAME}` is expanded from the environment.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::query::InboxSort;
use crate::{Error, Result};

/// Default configuration file name
pub const CONFIG_FILE: &str = "ca-desk.toml";

/// Client portal settings used when building template data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortalConfig {
    /// Base login URL; the username is appended as `?user=...`
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// Shown in place of a password in client previews
    #[serde(default = "default_masked_password")]
    pub masked_password: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            login_url: default_login_url(),
            masked_password: default_masked_password(),
        }
    }
}

impl PortalConfig {
    /// Login link for `username`, URL-encoded into the query string
    pub fn login_link_for(&self, username: &str) -> String {
        format!("{}?user={}", self.login_url, urlencoding::encode(username))
    }
}

/// Client list settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientListConfig {
    /// Rows per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ClientListConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Inbox settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct InboxConfig {
    /// Sort applied when none is requested
    #[serde(default)]
    pub default_sort: InboxSort,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Main configuration for ca-desk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DeskConfig {
    #[serde(default)]
    pub portal: PortalConfig,

    #[serde(default)]
    pub clients: ClientListConfig,

    #[serde(default)]
    pub inbox: InboxConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_login_url() -> String {
    "https://portal.example.com/login".to_string()
}

fn default_masked_password() -> String {
    "••••••••".to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DeskConfig {
    /// Expand `${VAR_NAME}` references from the environment
    ///
    /// Unset variables expand to an empty string.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Parse TOML text into a config (no env overrides)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let expanded = Self::expand_env_vars(content);
        let toml: TomlConfig = toml::from_str(&expanded)?;
        toml.into_config()
    }

    /// Load a TOML file, then apply env overrides
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut cfg = Self::from_toml_str(&content)?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Load from `ca-desk.toml` when present, else from the environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }

        Self::from_env()
    }

    /// Defaults with env overrides applied
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("CA_DESK_LOGIN_URL") {
            if !url.is_empty() {
                self.portal.login_url = url;
            }
        }

        if let Ok(size) = std::env::var("CA_DESK_PAGE_SIZE") {
            match size.parse() {
                Ok(n) if n > 0 => self.clients.page_size = n,
                _ => tracing::warn!("Ignoring invalid CA_DESK_PAGE_SIZE: {}", size),
            }
        }

        if let Ok(sort) = std::env::var("CA_DESK_INBOX_SORT") {
            match sort.parse() {
                Ok(s) => self.inbox.default_sort = s,
                Err(e) => tracing::warn!("Ignoring CA_DESK_INBOX_SORT: {}", e),
            }
        }

        if let Ok(level) = std::env::var("CA_DESK_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.clients.page_size == 0 {
            return Err(Error::Config("clients.page_size must be at least 1".to_string()));
        }
        if self.portal.login_url.trim().is_empty() {
            return Err(Error::Config("portal.login_url must not be empty".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// TOML file layout
// ============================================================================

#[derive(Debug, Deserialize, Default)]
struct TomlConfig {
    portal: Option<TomlPortalConfig>,
    clients: Option<TomlClientListConfig>,
    inbox: Option<TomlInboxConfig>,
    logging: Option<TomlLoggingConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlPortalConfig {
    login_url: Option<String>,
    masked_password: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlClientListConfig {
    page_size: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlInboxConfig {
    default_sort: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlLoggingConfig {
    level: Option<String>,
}

impl TomlConfig {
    fn into_config(self) -> Result<DeskConfig> {
        let portal = self.portal.unwrap_or_default();
        let clients = self.clients.unwrap_or_default();
        let inbox = self.inbox.unwrap_or_default();
        let logging = self.logging.unwrap_or_default();

        let default_sort = match inbox.default_sort {
            Some(s) => s.parse().map_err(Error::Config)?,
            None => InboxSort::default(),
        };

        let cfg = DeskConfig {
            portal: PortalConfig {
                login_url: portal.login_url.unwrap_or_else(default_login_url),
                masked_password: portal.masked_password.unwrap_or_else(default_masked_password),
            },
            clients: ClientListConfig {
                page_size: clients.page_size.unwrap_or_else(default_page_size),
            },
            inbox: InboxConfig { default_sort },
            logging: LoggingConfig {
                level: logging.level.unwrap_or_else(default_log_level),
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

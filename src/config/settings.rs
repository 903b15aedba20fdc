//! Configuration settings structures for herald-rs
//!
//! This module defines all configuration structures that can be loaded from
//! a TOML file, `HERALD_*` environment overrides and the flat provider keys.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::directory::RecipientDirectory;
use crate::config::error::ConfigError;
use crate::config::source::ConfigSource;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};
use crate::services::notifications::SessionDefaults;

/// Discord bot token key
pub const DISCORD_BOT_TOKEN_KEY: &str = "DISCORD_BOT_TOKEN";

/// Email provider API key (named after the SMTP password it doubles as)
pub const EMAIL_API_KEY_KEY: &str = "SMTP_PASS";

/// Alternate name accepted for the email provider API key
pub const EMAIL_API_KEY_ALIAS: &str = "RESEND_API_KEY";

/// Sender address key
pub const EMAIL_FROM_KEY: &str = "EMAIL_FROM";

// ============================================================================
// Default value functions
// ============================================================================

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_discord_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_email_api_base() -> String {
    "https://api.resend.com".to_string()
}

fn default_subject() -> String {
    "Notification".to_string()
}

fn default_alert_subject() -> String {
    "Alert".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/herald.log".to_string()
}

fn default_log_format() -> String {
    "full".to_string()
}

// ============================================================================
// HTTP Configuration
// ============================================================================

/// Outbound HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// User-Agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: None,
        }
    }
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Discord REST API configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordSettings {
    /// Bot token; falls back to `DISCORD_BOT_TOKEN`
    #[serde(default)]
    pub bot_token: Option<String>,

    /// REST API base URL
    #[serde(default = "default_discord_api_base")]
    pub api_base: String,
}

impl Default for DiscordSettings {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base: default_discord_api_base(),
        }
    }
}

impl fmt::Debug for DiscordSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordSettings")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Transactional email API configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSettings {
    /// API key; falls back to `SMTP_PASS` or `RESEND_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sender address; falls back to `EMAIL_FROM`
    #[serde(default)]
    pub from: Option<String>,

    /// Email API base URL
    #[serde(default = "default_email_api_base")]
    pub api_base: String,

    /// Subject used when a send omits one
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Subject used by `alert` when it is not given one
    #[serde(default = "default_alert_subject")]
    pub alert_subject: String,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            from: None,
            api_base: default_email_api_base(),
            subject: default_subject(),
            alert_subject: default_alert_subject(),
        }
    }
}

impl fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("from", &self.from)
            .field("api_base", &self.api_base)
            .field("subject", &self.subject)
            .field("alert_subject", &self.alert_subject)
            .finish()
    }
}

// ============================================================================
// Logger Configuration
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Whether console output is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to use colored output
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Whether file output is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Path to the log file
    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to existing file
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger settings as they appear in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console output settings
    #[serde(default)]
    pub console: ConsoleSettings,

    /// File output settings
    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert LoggerSettings to the runtime LoggerConfig
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let format = self.file.format.parse::<LogFormat>().map_err(|e| {
            ConfigError::invalid("logger.file.format", e.to_string())
        })?;
        let file = FileConfig {
            enabled: self.file.enabled,
            path: PathBuf::from(self.file.path),
            append: self.file.append,
            format,
        };

        LoggerConfig::new(console, file, self.level)
            .map_err(|e| ConfigError::invalid("logger", format!("{:#}", e)))
    }
}

// ============================================================================
// Root Settings
// ============================================================================

/// Complete herald-rs configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpSettings,

    /// Discord configuration
    #[serde(default)]
    pub discord: DiscordSettings,

    /// Email configuration
    #[serde(default)]
    pub email: EmailSettings,

    /// Initial session defaults
    #[serde(default)]
    pub defaults: SessionDefaults,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerSettings,

    /// Named recipients, parsed from the flat configuration source
    #[serde(skip)]
    pub recipients: RecipientDirectory,
}

impl Settings {
    /// Fill provider credentials and the recipient table from the flat source.
    ///
    /// Values already set by the TOML file or `HERALD_*` overrides are kept.
    pub fn apply_source(&mut self, source: &ConfigSource) {
        if self.discord.bot_token.is_none() {
            self.discord.bot_token = source.get(DISCORD_BOT_TOKEN_KEY).map(str::to_string);
        }
        if self.email.api_key.is_none() {
            self.email.api_key = source
                .get(EMAIL_API_KEY_KEY)
                .or_else(|| source.get(EMAIL_API_KEY_ALIAS))
                .map(str::to_string);
        }
        if self.email.from.is_none() {
            self.email.from = source.get(EMAIL_FROM_KEY).map(str::to_string);
        }
        self.recipients = RecipientDirectory::from_source(source);
    }
}

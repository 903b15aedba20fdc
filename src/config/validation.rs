//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use reqwest::Url;

use crate::config::error::ConfigError;
use crate::config::settings::{
    DiscordSettings, EmailSettings, HttpSettings, LoggerSettings, Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl HttpSettings {
    /// Validate HTTP client configuration
    ///
    /// # Validation Rules
    /// - Request timeout must be greater than 0
    /// - Connect timeout must be greater than 0 and not exceed the request timeout
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "http.timeout_secs",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "http.connect_timeout_secs",
                "Connect timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout_secs > self.timeout_secs {
            return Err(ConfigError::Invalid {
                field: "http.connect_timeout_secs".to_string(),
                message: format!(
                    "Connect timeout ({}s) cannot exceed request timeout ({}s).",
                    self.connect_timeout_secs, self.timeout_secs
                ),
            });
        }

        Ok(())
    }
}

impl DiscordSettings {
    /// Validate Discord configuration
    ///
    /// A missing bot token is not an error here; sends fail individually instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_api_base("discord.api_base", &self.api_base)
    }
}

impl EmailSettings {
    /// Validate email configuration
    ///
    /// # Validation Rules
    /// - API base must be an http(s) URL
    /// - Sender address, when set, must contain `@`
    /// - Subjects must not be blank
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_api_base("email.api_base", &self.api_base)?;

        if let Some(from) = &self.from
            && !from.contains('@')
        {
            return Err(ConfigError::Invalid {
                field: "email.from".to_string(),
                message: format!("Sender '{}' is not an email address.", from),
            });
        }

        if self.subject.trim().is_empty() {
            return Err(ConfigError::invalid(
                "email.subject",
                "Default subject cannot be empty.",
            ));
        }

        if self.alert_subject.trim().is_empty() {
            return Err(ConfigError::invalid(
                "email.alert_subject",
                "Alert subject cannot be empty.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        let format = self.file.format.to_lowercase();
        if !VALID_LOG_FORMATS.contains(&format.as_str()) {
            return Err(ConfigError::Invalid {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.file.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        if self.file.enabled && self.file.path.trim().is_empty() {
            return Err(ConfigError::invalid(
                "logger.file.path",
                "Log file path cannot be empty when file output is enabled.",
            ));
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::invalid(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Validate all sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.http.validate()?;
        self.discord.validate()?;
        self.email.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}

fn validate_api_base(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|_| ConfigError::Invalid {
        field: field.to_string(),
        message: format!("Invalid URL format: '{}'", value),
    })?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::Invalid {
            field: field.to_string(),
            message: "URL must use http or https protocol".to_string(),
        });
    }

    Ok(())
}

//! Errors raised while loading herald-rs settings

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly named TOML or dotenv file does not exist
    #[error("{0} not found")]
    MissingFile(String),

    /// The merged layers do not deserialize into `Settings`
    #[error("cannot parse configuration: {0}")]
    Parse(String),

    /// A loaded value is out of range or malformed
    #[error("invalid {field}: {message}")]
    Invalid { field: String, message: String },

    /// The dotenv file exists but could not be read
    #[error("cannot read dotenv file {0}")]
    Dotenv(String),

    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing_file(path: &Path) -> Self {
        ConfigError::MissingFile(path.display().to_string())
    }
}

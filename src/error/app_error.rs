use thiserror::Error;

use crate::config::ConfigError;
use crate::logger::LoggerError;

/// Errors that stop herald-rs before any send is attempted.
///
/// Individual sends never produce an `AppError`; their failures are
/// reported as data through `SendResult`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading or validation failed
    #[error("Configuration error")]
    Configuration {
        #[from]
        source: ConfigError,
    },

    /// Logger could not be installed
    #[error("Logger initialization failed")]
    Logger {
        #[from]
        source: LoggerError,
    },

    /// Shared HTTP client could not be built
    #[error("HTTP client initialization failed")]
    HttpClient {
        #[source]
        source: reqwest::Error,
    },
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

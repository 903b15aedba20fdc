//! Configuration management module for herald-rs
//!
//! This module provides layered configuration loading with support for:
//! - A `.env` file merged under the process environment
//! - An optional TOML configuration file
//! - `HERALD_*` environment variable overrides
//! - Flat provider keys (`DISCORD_BOT_TOKEN`, `SMTP_PASS`, `EMAIL_FROM`)
//! - Named recipients (`DISCORD_USER_<NAME>`, `DISCORD_CHANNEL_<NAME>`,
//!   `EMAIL_TO_<NAME>`, `EMAIL_TO`)

pub mod directory;
pub mod error;
pub mod loader;
pub mod settings;
pub mod source;
pub mod validation;

// Re-export public types
pub use directory::RecipientDirectory;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    DiscordSettings, EmailSettings, HttpSettings, LoggerSettings, Settings,
};
pub use source::ConfigSource;

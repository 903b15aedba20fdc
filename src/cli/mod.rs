//! CLI module for herald-rs
//!
//! - Argument parsing with clap
//! - Settings loading with CLI overrides
//! - Command execution against a [`Notifier`](crate::Notifier)

pub mod executor;
pub mod parser;
pub mod validation;

pub use executor::execute_command;
pub use parser::{Cli, Commands};

use crate::config::{ConfigLoader, Settings};
use crate::error::AppResult;
use crate::logger::init_logger;

/// Load settings using the paths given on the command line
///
/// # Errors
/// Returns error if loading or validation fails
pub fn load_settings(cli: &Cli) -> AppResult<Settings> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_file(path);
    }
    if let Some(path) = &cli.env_file {
        loader = loader.with_env_file(path);
    }

    let mut settings = loader.load()?;
    if let Some(level) = cli.log_level_override() {
        settings.logger.level = level.to_string();
    }
    Ok(settings)
}

/// Initialize logger from settings
///
/// # Errors
/// Returns error if the logger configuration is invalid or a global
/// subscriber is already installed
pub fn init_logger_from_settings(settings: &Settings) -> AppResult<()> {
    let logger_config = settings.logger.clone().into_logger_config()?;
    init_logger(logger_config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_load_settings_applies_verbose() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logger]\nlevel = \"warn\"").unwrap();
        let env_file = tempfile::NamedTempFile::new().unwrap();

        let cli = Cli::try_parse_from([
            "herald-rs",
            "--config",
            file.path().to_str().unwrap(),
            "--env-file",
            env_file.path().to_str().unwrap(),
            "--verbose",
            "config",
        ])
        .unwrap();

        let settings = load_settings(&cli).expect("settings should load");
        assert_eq!(settings.logger.level, "debug");
    }
}

//! Tests for the logger module

use crate::logger::config::*;
use crate::logger::{build_layers, init_logger, LoggerError};
use std::path::PathBuf;

#[cfg(test)]
mod config_tests {
    use super::*;

    /// Helper function to create a test configuration
    fn create_test_config() -> LoggerConfig {
        LoggerConfig {
            console: ConsoleConfig {
                enabled: true,
                colored: false,
            },
            file: FileConfig {
                enabled: false,
                path: PathBuf::from("test.log"),
                append: true,
                format: LogFormat::Full,
            },
            level: "info".to_string(),
        }
    }

    #[test]
    fn test_default_config_creation() {
        let config = LoggerConfig::default();
        assert!(config.console.enabled);
        assert!(config.console.colored);
        assert!(!config.file.enabled);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_config_validation() {
        let mut config = create_test_config();
        assert!(config.validate().is_ok());

        config.console.enabled = false;
        config.file.enabled = false;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_level() {
        let mut config = create_test_config();
        config.level = "DEBUG".to_string();
        assert_eq!(config.parse_level().unwrap(), tracing::Level::DEBUG);

        config.level = "chatty".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chatty"));
    }

    #[test]
    fn test_disabled_outputs_rejected_by_layer_builder() {
        let mut config = create_test_config();
        config.console.enabled = false;
        assert!(!config.has_output());
        assert!(matches!(build_layers(&config), Err(LoggerError::Config { .. })));
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::default(), LogFormat::Full);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::Json.as_str(), "json");
        assert_eq!(LogFormat::Compact.to_string(), "compact");
        assert_eq!(" Full ".parse::<LogFormat>().unwrap(), LogFormat::Full);
    }

    #[test]
    fn test_empty_file_path_rejected_when_enabled() {
        let mut config = create_test_config();
        config.file.enabled = true;
        config.file.path = PathBuf::new();
        assert!(config.validate().is_err());
    }
}

#[cfg(test)]
mod layer_tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_layer_creates_parent_directories() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("herald.log");

        let config = LoggerConfig {
            console: ConsoleConfig::new(false, false),
            file: FileConfig {
                enabled: true,
                path: path.clone(),
                append: false,
                format: LogFormat::Json,
            },
            level: "debug".to_string(),
        };

        let layers = build_layers(&config).expect("file layer should build");
        assert_eq!(layers.len(), 1);
        assert!(path.exists());
    }

    #[test]
    fn test_both_outputs_build_two_layers() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = LoggerConfig {
            console: ConsoleConfig::new(true, true),
            file: FileConfig {
                enabled: true,
                path: dir.path().join("herald.log"),
                append: true,
                format: LogFormat::Compact,
            },
            level: "info".to_string(),
        };

        assert_eq!(build_layers(&config).expect("layers").len(), 2);
    }

    #[test]
    fn test_init_rejects_invalid_config() {
        let config = LoggerConfig {
            level: "nope".to_string(),
            ..LoggerConfig::default()
        };
        assert!(matches!(init_logger(config), Err(LoggerError::Config { .. })));
    }
}

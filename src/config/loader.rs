//! Configuration loader for herald-rs
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};

use crate::config::error::ConfigError;
use crate::config::settings::Settings;
use crate::config::source::ConfigSource;

/// Key naming a TOML configuration file
pub const CONFIG_FILE_ENV: &str = "HERALD_CONFIG_FILE";

/// Dotenv file read when no explicit one is given
const DEFAULT_ENV_FILE: &str = ".env";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "HERALD";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Configuration loader that handles layered configuration loading
///
/// Sources, lowest priority first:
/// 1. Built-in defaults
/// 2. TOML file (`--config` or `HERALD_CONFIG_FILE`)
/// 3. `HERALD_*` overrides (`HERALD_HTTP__TIMEOUT_SECS` -> `http.timeout_secs`)
/// 4. Flat provider keys (`DISCORD_BOT_TOKEN`, `SMTP_PASS`, ...) for
///    credentials the layers above left unset
///
/// Layers 2-4 all read from one [`ConfigSource`] snapshot: the process
/// environment topped up with a `.env` file.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Explicit TOML file, takes precedence over `HERALD_CONFIG_FILE`
    config_file: Option<PathBuf>,
    /// Explicit dotenv file (required to exist when set)
    env_file: Option<PathBuf>,
    /// Pre-built source replacing the process environment
    source: Option<ConfigSource>,
}

impl ConfigLoader {
    /// Create a loader over the process environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific TOML configuration file
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Use a specific dotenv file instead of `./.env`
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Read from the given source instead of the process environment.
    ///
    /// No implicit `./.env` is merged into an explicit source.
    pub fn with_source(mut self, source: ConfigSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Load configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An explicit config or dotenv file is missing
    /// - Configuration parsing fails
    /// - Configuration validation fails
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let source = self.snapshot()?;
        let config = self.build_config(&source)?;
        let mut settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::Parse(e.to_string())
        })?;

        settings.apply_source(&source);
        settings.validate()?;

        tracing::debug!(
            discord_token = settings.discord.bot_token.is_some(),
            email_key = settings.email.api_key.is_some(),
            "configuration loaded"
        );

        Ok(settings)
    }

    /// Take the key/value snapshot every layer reads from
    pub fn snapshot(&self) -> Result<ConfigSource, ConfigError> {
        match (&self.source, &self.env_file) {
            (Some(source), Some(path)) => source.clone().with_dotenv_file(path, true),
            (Some(source), None) => Ok(source.clone()),
            (None, Some(path)) => ConfigSource::from_env().with_dotenv_file(path, true),
            (None, None) => {
                ConfigSource::from_env().with_dotenv_file(Path::new(DEFAULT_ENV_FILE), false)
            }
        }
    }

    /// Build the config::Config instance from the file and override layers
    fn build_config(&self, source: &ConfigSource) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let config_file = self
            .config_file
            .clone()
            .or_else(|| source.get(CONFIG_FILE_ENV).map(PathBuf::from));

        let builder = match config_file {
            Some(path) => Self::add_file_source(builder, &path)?,
            None => builder,
        };

        let builder = Self::add_env_source(builder, source);

        builder.build().map_err(ConfigError::from)
    }

    /// Add the TOML file source to the config builder
    fn add_file_source(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        path: &Path,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::missing_file(path));
        }

        let name = path.to_str().ok_or_else(|| {
            ConfigError::Parse(format!("Non UTF-8 configuration path: {}", path.display()))
        })?;

        Ok(builder.add_source(File::new(name, FileFormat::Toml).required(true)))
    }

    /// Add `HERALD_*` overrides from the snapshot to the config builder
    ///
    /// Double underscores (`__`) separate nested keys:
    /// - `HERALD_HTTP__TIMEOUT_SECS` -> `http.timeout_secs`
    /// - `HERALD_DEFAULTS__CHAT_USER` -> `defaults.chat_user`
    fn add_env_source(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        source: &ConfigSource,
    ) -> config::ConfigBuilder<config::builder::DefaultState> {
        let overrides: config::Map<String, String> = source
            .with_prefix("HERALD_")
            .filter(|(key, _)| *key != CONFIG_FILE_ENV)
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true)
                .source(Some(overrides)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Helper to create a temporary directory with files
    fn setup_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            let path = temp_dir.path().join(name);
            fs::write(&path, content).expect("Failed to write file");
        }
        temp_dir
    }

    #[test]
    fn test_load_empty_source_uses_defaults() {
        let settings = ConfigLoader::new()
            .with_source(ConfigSource::default())
            .load()
            .expect("defaults should load");

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_flat_provider_keys() {
        let source = ConfigSource::from_pairs([
            ("DISCORD_BOT_TOKEN", "bot-token"),
            ("SMTP_PASS", "re_123"),
            ("EMAIL_FROM", "bot@example.com"),
            ("EMAIL_TO", "default@example.com"),
            ("DISCORD_USER_AARON", "1001"),
        ]);

        let settings = ConfigLoader::new()
            .with_source(source)
            .load()
            .expect("should load");

        assert_eq!(settings.discord.bot_token.as_deref(), Some("bot-token"));
        assert_eq!(settings.email.api_key.as_deref(), Some("re_123"));
        assert_eq!(settings.email.from.as_deref(), Some("bot@example.com"));
        assert_eq!(settings.recipients.default_email(), Some("default@example.com"));
        assert_eq!(settings.recipients.chat_user("aaron"), Some("1001"));
    }

    #[test]
    fn test_load_toml_file() {
        let dir = setup_dir(&[(
            "herald.toml",
            r#"
[http]
timeout_secs = 20

[email]
subject = "Lab Notification"

[defaults]
chat_user = "aaron"
email_user = "aaron"

[logger]
level = "debug"
"#,
        )]);

        let settings = ConfigLoader::new()
            .with_source(ConfigSource::default())
            .with_config_file(dir.path().join("herald.toml"))
            .load()
            .expect("should load");

        assert_eq!(settings.http.timeout_secs, 20);
        assert_eq!(settings.email.subject, "Lab Notification");
        assert_eq!(settings.defaults.chat_user.as_deref(), Some("aaron"));
        assert_eq!(settings.defaults.email_user.as_deref(), Some("aaron"));
        assert!(settings.defaults.chat_channel.is_none());
        assert_eq!(settings.logger.level, "debug");
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = setup_dir(&[("herald.toml", "[http]\ntimeout_secs = 20\n")]);
        let source = ConfigSource::from_pairs([
            ("HERALD_CONFIG_FILE", dir.path().join("herald.toml").to_string_lossy().to_string()),
            ("HERALD_HTTP__TIMEOUT_SECS", "30".to_string()),
            ("HERALD_DEFAULTS__CHAT_CHANNEL", "alerts".to_string()),
        ]);

        let settings = ConfigLoader::new()
            .with_source(source)
            .load()
            .expect("should load");

        assert_eq!(settings.http.timeout_secs, 30);
        assert_eq!(settings.defaults.chat_channel.as_deref(), Some("alerts"));
    }

    #[test]
    fn test_file_credentials_win_over_flat_keys() {
        let dir = setup_dir(&[(
            "herald.toml",
            "[discord]\nbot_token = \"from-file\"\n",
        )]);
        let source = ConfigSource::from_pairs([("DISCORD_BOT_TOKEN", "from-env")]);

        let settings = ConfigLoader::new()
            .with_source(source)
            .with_config_file(dir.path().join("herald.toml"))
            .load()
            .expect("should load");

        assert_eq!(settings.discord.bot_token.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = setup_dir(&[]);
        let result = ConfigLoader::new()
            .with_source(ConfigSource::default())
            .with_config_file(dir.path().join("missing.toml"))
            .load();

        match result {
            Err(ConfigError::MissingFile(msg)) => assert!(msg.contains("missing.toml")),
            other => panic!("Expected MissingFile error, got {:?}", other),
        }
    }

    #[test]
    fn test_env_file_is_merged() {
        let dir = setup_dir(&[(
            "notify.env",
            "EMAIL_TO_ZACK=zack@example.com\nEMAIL_FROM=bot@example.com\n",
        )]);

        let settings = ConfigLoader::new()
            .with_source(ConfigSource::from_pairs([("EMAIL_FROM", "env@example.com")]))
            .with_env_file(dir.path().join("notify.env"))
            .load()
            .expect("should load");

        assert_eq!(settings.email.from.as_deref(), Some("env@example.com"));
        assert_eq!(
            settings.recipients.email_recipient("zack"),
            Some("zack@example.com")
        );
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let source = ConfigSource::from_pairs([("HERALD_HTTP__TIMEOUT_SECS", "0")]);
        let result = ConfigLoader::new().with_source(source).load();
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }
}

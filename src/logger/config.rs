//! Logger output settings.
//!
//! Built from the `[logger]` section by `LoggerSettings::into_logger_config`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::Level;

const DEFAULT_LOG_FILE: &str = "logs/herald.log";

/// Sinks herald-rs writes diagnostics to, and the level filter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub console: ConsoleConfig,
    pub file: FileConfig,
    /// One of trace, debug, info, warn, error
    pub level: String,
}

impl LoggerConfig {
    pub fn new(console: ConsoleConfig, file: FileConfig, level: String) -> Result<Self> {
        let config = Self {
            console,
            file,
            level,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the level and that at least one usable sink is on
    pub fn validate(&self) -> Result<()> {
        self.parse_level()?;

        if self.file.enabled && self.file.path.as_os_str().is_empty() {
            bail!("file logging is enabled but logger.file.path is empty");
        }
        if !self.has_output() {
            bail!("console and file logging are both disabled");
        }
        Ok(())
    }

    pub fn has_output(&self) -> bool {
        self.console.enabled || self.file.enabled
    }

    pub fn parse_level(&self) -> Result<Level> {
        Level::from_str(self.level.trim()).with_context(|| {
            format!(
                "unknown log level '{}' (expected trace, debug, info, warn or error)",
                self.level
            )
        })
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
            level: Level::INFO.as_str().to_lowercase(),
        }
    }
}

/// stderr sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub enabled: bool,
    /// ANSI colors, only honored when stderr is a terminal
    pub colored: bool,
}

impl ConsoleConfig {
    pub fn new(enabled: bool, colored: bool) -> Self {
        Self { enabled, colored }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::new(true, true)
    }
}

/// Log file sink; off unless configured
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub enabled: bool,
    pub path: PathBuf,
    /// Append to an existing file instead of truncating it
    pub append: bool,
    pub format: LogFormat,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from(DEFAULT_LOG_FILE),
            append: true,
            format: LogFormat::Full,
        }
    }
}

/// Line format of the log file
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Full => "full",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [LogFormat::Full, LogFormat::Compact, LogFormat::Json]
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .with_context(|| format!("unknown log format '{}' (expected full, compact or json)", s))
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Flat key/value configuration source.
//!
//! `ConfigSource` is an immutable snapshot of environment-variable-shaped
//! pairs. It is taken once at startup (process environment, optionally
//! topped up from a `.env` file) and everything downstream reads from the
//! snapshot rather than from `std::env`.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::Path;

use crate::config::error::ConfigError;

/// Snapshot of configuration key/value pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSource {
    values: BTreeMap<String, String>,
}

impl ConfigSource {
    /// Snapshot the current process environment
    pub fn from_env() -> Self {
        Self::from_os_pairs(std::env::vars_os())
    }

    /// Build a source from OS strings, skipping pairs that are not UTF-8
    pub fn from_os_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        Self::from_pairs(pairs.into_iter().filter_map(|(key, value)| {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (key, _) => {
                    tracing::debug!(key = ?key, "skipping non UTF-8 environment entry");
                    None
                }
            }
        }))
    }

    /// Build a source from arbitrary pairs (later duplicates win)
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Merge pairs from a dotenv file. Keys already present are kept.
    ///
    /// A missing file is only an error when `required` is set.
    pub fn with_dotenv_file(mut self, path: &Path, required: bool) -> Result<Self, ConfigError> {
        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(e) if e.not_found() && !required => {
                tracing::debug!(path = %path.display(), "no dotenv file, skipping");
                return Ok(self);
            }
            Err(e) if e.not_found() => {
                return Err(ConfigError::missing_file(path));
            }
            Err(e) => {
                return Err(ConfigError::Dotenv(format!(
                    "{}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let mut loaded = 0usize;
        for item in iter {
            let (key, value) = item.map_err(|e| {
                ConfigError::Dotenv(format!("{}: {}", path.display(), e))
            })?;
            if !self.values.contains_key(&key) {
                self.values.insert(key, value);
                loaded += 1;
            }
        }

        tracing::debug!(path = %path.display(), loaded, "merged dotenv file");
        Ok(self)
    }

    /// Look up a key. Blank values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Iterate over all pairs with non-blank values
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pairs whose key starts with `prefix`, for feeding layered loaders
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.iter().filter(move |(k, _)| k.starts_with(prefix))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_blank_values_are_absent() {
        let source = ConfigSource::from_pairs([("A", "1"), ("B", "  "), ("C", "")]);
        assert_eq!(source.get("A"), Some("1"));
        assert_eq!(source.get("B"), None);
        assert_eq!(source.get("C"), None);
        assert_eq!(source.iter().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_environment_entries_are_skipped() {
        use std::os::unix::ffi::OsStringExt;

        let source = ConfigSource::from_os_pairs([
            (OsString::from("DISCORD_USER_AARON"), OsString::from("1001")),
            (OsString::from("LEGACY_PATH"), OsString::from_vec(vec![0x66, 0xff, 0x6f])),
            (OsString::from_vec(vec![0xfe, 0x41]), OsString::from("x")),
        ]);

        assert_eq!(source.len(), 1);
        assert_eq!(source.get("DISCORD_USER_AARON"), Some("1001"));
        assert_eq!(source.get("LEGACY_PATH"), None);
    }

    #[test]
    fn test_dotenv_does_not_override_existing_keys() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(".env");
        fs::write(
            &path,
            "# comment\nDISCORD_BOT_TOKEN=\"from-file\"\nEMAIL_FROM='bot@example.com'\n",
        )
        .expect("Failed to write dotenv file");

        let source = ConfigSource::from_pairs([("DISCORD_BOT_TOKEN", "from-env")])
            .with_dotenv_file(&path, true)
            .expect("dotenv should load");

        assert_eq!(source.get("DISCORD_BOT_TOKEN"), Some("from-env"));
        assert_eq!(source.get("EMAIL_FROM"), Some("bot@example.com"));
    }

    #[test]
    fn test_missing_optional_dotenv_is_ignored() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let source = ConfigSource::from_pairs([("A", "1")])
            .with_dotenv_file(&dir.path().join("missing.env"), false)
            .expect("optional dotenv should be skipped");
        assert_eq!(source.len(), 1);
    }

    #[test]
    fn test_missing_required_dotenv_fails() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let result = ConfigSource::default().with_dotenv_file(&dir.path().join("missing.env"), true);
        assert!(matches!(result, Err(ConfigError::MissingFile(_))));
    }

    #[test]
    fn test_with_prefix() {
        let source = ConfigSource::from_pairs([
            ("HERALD_HTTP__TIMEOUT_SECS", "5"),
            ("HOME", "/root"),
            ("HERALD_CONFIG_FILE", "x.toml"),
        ]);
        let keys: Vec<_> = source.with_prefix("HERALD_").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["HERALD_CONFIG_FILE", "HERALD_HTTP__TIMEOUT_SECS"]);
    }
}

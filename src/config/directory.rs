//! Named-recipient table.
//!
//! Recipients are declared through prefixed keys in the configuration
//! source and parsed once into typed maps:
//!
//! | Key                       | Table            |
//! |---------------------------|------------------|
//! | `DISCORD_USER_<NAME>`     | `chat_users`     |
//! | `DISCORD_CHANNEL_<NAME>`  | `chat_channels`  |
//! | `EMAIL_TO_<NAME>`         | `email_recipients` |
//! | `EMAIL_TO`                | `default_email`  |
//!
//! Names are case-insensitive and stored lower-cased.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::source::ConfigSource;

pub const DISCORD_USER_PREFIX: &str = "DISCORD_USER";
pub const DISCORD_CHANNEL_PREFIX: &str = "DISCORD_CHANNEL";
pub const EMAIL_TO_PREFIX: &str = "EMAIL_TO";

/// Global default email recipient key
pub const DEFAULT_EMAIL_KEY: &str = "EMAIL_TO";

static RECIPIENT_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(DISCORD_USER|DISCORD_CHANNEL|EMAIL_TO)_([A-Z0-9_-]+)$")
        .expect("recipient key pattern is valid")
});

/// Typed recipient mappings built from a [`ConfigSource`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientDirectory {
    chat_users: BTreeMap<String, String>,
    chat_channels: BTreeMap<String, String>,
    email_recipients: BTreeMap<String, String>,
    default_email: Option<String>,
}

impl RecipientDirectory {
    /// Parse every recognized recipient key out of the source
    pub fn from_source(source: &ConfigSource) -> Self {
        let mut directory = Self {
            default_email: source.get(DEFAULT_EMAIL_KEY).map(|v| v.trim().to_string()),
            ..Self::default()
        };

        for (key, value) in source.iter() {
            let key = key.to_ascii_uppercase();
            let Some(caps) = RECIPIENT_KEY.captures(&key) else {
                continue;
            };
            let name = caps[2].to_ascii_lowercase();
            let value = value.trim().to_string();

            let table = match &caps[1] {
                DISCORD_USER_PREFIX => &mut directory.chat_users,
                DISCORD_CHANNEL_PREFIX => &mut directory.chat_channels,
                _ => &mut directory.email_recipients,
            };
            table.insert(name, value);
        }

        tracing::debug!(
            chat_users = directory.chat_users.len(),
            chat_channels = directory.chat_channels.len(),
            email_recipients = directory.email_recipients.len(),
            default_email = directory.default_email.is_some(),
            "recipient directory loaded"
        );

        directory
    }

    pub fn chat_user(&self, name: &str) -> Option<&str> {
        lookup(&self.chat_users, name)
    }

    pub fn chat_channel(&self, name: &str) -> Option<&str> {
        lookup(&self.chat_channels, name)
    }

    pub fn email_recipient(&self, name: &str) -> Option<&str> {
        lookup(&self.email_recipients, name)
    }

    /// The `EMAIL_TO` fallback address
    pub fn default_email(&self) -> Option<&str> {
        self.default_email.as_deref()
    }

    /// Configured chat user names, sorted
    pub fn chat_user_names(&self) -> Vec<String> {
        self.chat_users.keys().cloned().collect()
    }

    /// Configured chat channel names, sorted
    pub fn chat_channel_names(&self) -> Vec<String> {
        self.chat_channels.keys().cloned().collect()
    }

    /// Configured email recipient names, sorted
    pub fn email_recipient_names(&self) -> Vec<String> {
        self.email_recipients.keys().cloned().collect()
    }
}

fn lookup<'a>(table: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    table.get(&name.trim().to_ascii_lowercase()).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory(pairs: &[(&str, &str)]) -> RecipientDirectory {
        RecipientDirectory::from_source(&ConfigSource::from_pairs(pairs.iter().copied()))
    }

    #[test]
    fn test_parses_all_tables() {
        let dir = directory(&[
            ("DISCORD_USER_AARON", "1001"),
            ("DISCORD_CHANNEL_ALERTS", "2002"),
            ("EMAIL_TO_AARON", "aaron@example.com"),
            ("EMAIL_TO", "default@example.com"),
            ("PATH", "/usr/bin"),
        ]);

        assert_eq!(dir.chat_user("aaron"), Some("1001"));
        assert_eq!(dir.chat_channel("alerts"), Some("2002"));
        assert_eq!(dir.email_recipient("aaron"), Some("aaron@example.com"));
        assert_eq!(dir.default_email(), Some("default@example.com"));
        assert!(dir.email_recipient("to").is_none());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let dir = directory(&[("discord_user_Lab-Bot_2", "42")]);
        assert_eq!(dir.chat_user("LAB-BOT_2"), Some("42"));
        assert_eq!(dir.chat_user("lab-bot_2"), Some("42"));
        assert_eq!(dir.chat_user_names(), vec!["lab-bot_2".to_string()]);
    }

    #[test]
    fn test_rejects_keys_outside_charset() {
        let dir = directory(&[("DISCORD_USER_A.B", "1"), ("DISCORD_USER_", "2")]);
        assert!(dir.chat_user_names().is_empty());
    }

    #[test]
    fn test_blank_values_are_skipped() {
        let dir = directory(&[("DISCORD_CHANNEL_OPS", " "), ("EMAIL_TO", "")]);
        assert!(dir.chat_channel("ops").is_none());
        assert!(dir.default_email().is_none());
    }

    #[test]
    fn test_names_are_sorted() {
        let dir = directory(&[
            ("EMAIL_TO_ZACK", "z@example.com"),
            ("EMAIL_TO_AARON", "a@example.com"),
        ]);
        assert_eq!(dir.email_recipient_names(), vec!["aaron", "zack"]);
    }
}

//! Session-level default recipients.

use serde::{Deserialize, Serialize};

/// Recipients used when a send omits them
///
/// Values are recipient *names*, validated lazily when a send uses them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDefaults {
    #[serde(default)]
    pub chat_user: Option<String>,
    #[serde(default)]
    pub chat_channel: Option<String>,
    #[serde(default)]
    pub email_user: Option<String>,
}

impl SessionDefaults {
    /// Merge an update field-wise; fields the update leaves unset are kept
    pub fn merge(&mut self, update: DefaultsUpdate) {
        if let Some(chat_user) = update.chat_user {
            self.chat_user = Some(chat_user);
        }
        if let Some(chat_channel) = update.chat_channel {
            self.chat_channel = Some(chat_channel);
        }
        if let Some(email_user) = update.email_user {
            self.email_user = Some(email_user);
        }
    }

    pub fn chat_user(&self) -> Option<&str> {
        non_empty(self.chat_user.as_deref())
    }

    pub fn chat_channel(&self) -> Option<&str> {
        non_empty(self.chat_channel.as_deref())
    }

    pub fn email_user(&self) -> Option<&str> {
        non_empty(self.email_user.as_deref())
    }
}

/// Partial update for [`SessionDefaults`]
///
/// ```rust,ignore
/// notifier.set_defaults(DefaultsUpdate::new().chat_user("aaron").email_user("aaron"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultsUpdate {
    pub chat_user: Option<String>,
    pub chat_channel: Option<String>,
    pub email_user: Option<String>,
}

impl DefaultsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chat_user(mut self, name: impl Into<String>) -> Self {
        self.chat_user = Some(name.into());
        self
    }

    pub fn chat_channel(mut self, name: impl Into<String>) -> Self {
        self.chat_channel = Some(name.into());
        self
    }

    pub fn email_user(mut self, name: impl Into<String>) -> Self {
        self.email_user = Some(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.chat_user.is_none() && self.chat_channel.is_none() && self.email_user.is_none()
    }
}

/// Treat blank strings as "not given"
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut defaults = SessionDefaults::default();
        defaults.merge(DefaultsUpdate::new().chat_user("a"));
        defaults.merge(DefaultsUpdate::new().email_user("b"));

        assert_eq!(defaults.chat_user(), Some("a"));
        assert_eq!(defaults.email_user(), Some("b"));
        assert_eq!(defaults.chat_channel(), None);
    }

    #[test]
    fn test_merge_overwrites_supplied_fields() {
        let mut defaults = SessionDefaults::default();
        defaults.merge(DefaultsUpdate::new().chat_channel("alerts"));
        defaults.merge(DefaultsUpdate::new().chat_channel("lab"));
        assert_eq!(defaults.chat_channel(), Some("lab"));
    }

    #[test]
    fn test_blank_default_reads_as_unset() {
        let mut defaults = SessionDefaults::default();
        defaults.merge(DefaultsUpdate::new().chat_user("   "));
        assert_eq!(defaults.chat_user(), None);
    }

    #[test]
    fn test_update_is_empty() {
        assert!(DefaultsUpdate::new().is_empty());
        assert!(!DefaultsUpdate::new().email_user("x").is_empty());
    }
}

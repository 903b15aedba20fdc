//! Human-readable configuration overview.

use std::fmt;

use super::defaults::SessionDefaults;
use super::provider::CredentialStatus;

/// Snapshot of defaults, known recipient names and credential presence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSummary {
    pub defaults: SessionDefaults,
    pub chat_users: Vec<String>,
    pub chat_channels: Vec<String>,
    pub email_recipients: Vec<String>,
    pub default_email: Option<String>,
    pub credentials: Vec<CredentialStatus>,
}

impl ConfigSummary {
    /// Credentials that are required but missing
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        self.credentials
            .iter()
            .filter(|c| !c.present)
            .map(|c| c.key)
            .collect()
    }
}

fn names(list: &[String]) -> String {
    if list.is_empty() {
        "None".to_string()
    } else {
        list.join(", ")
    }
}

impl fmt::Display for ConfigSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== herald-rs configuration ===")?;

        match self.defaults.chat_user() {
            Some(user) => writeln!(f, "Default Discord user: @{}", user)?,
            None => writeln!(f, "Default Discord user: None")?,
        }
        match self.defaults.chat_channel() {
            Some(channel) => writeln!(f, "Default Discord channel: #{}", channel)?,
            None => writeln!(f, "Default Discord channel: None")?,
        }
        writeln!(
            f,
            "Default email user: {}",
            self.defaults.email_user().unwrap_or("None")
        )?;
        writeln!(f)?;

        writeln!(f, "Available Discord users: {}", names(&self.chat_users))?;
        writeln!(f, "Available Discord channels: {}", names(&self.chat_channels))?;
        writeln!(f, "Available email users: {}", names(&self.email_recipients))?;
        writeln!(
            f,
            "Fallback email (EMAIL_TO): {}",
            self.default_email.as_deref().unwrap_or("None")
        )?;
        writeln!(f)?;

        writeln!(f, "Credentials:")?;
        for credential in &self.credentials {
            let state = if credential.present { "set" } else { "missing" };
            writeln!(f, "  {}: {}", credential.key, state)?;
        }
        Ok(())
    }
}

//! Recipient resolution.
//!
//! Maps human-friendly names to provider targets using the
//! [`RecipientDirectory`] built at startup. Resolution is pure: it never
//! performs I/O and depends only on the name and the directory.

use super::error::ResolutionError;
use super::provider::{ChannelType, ChatTarget, ChatTargetKind};
use crate::config::RecipientDirectory;

/// Resolves recipient names against the configured directory
#[derive(Debug, Clone, Default)]
pub struct RecipientResolver {
    directory: RecipientDirectory,
}

impl RecipientResolver {
    pub fn new(directory: RecipientDirectory) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &RecipientDirectory {
        &self.directory
    }

    /// Resolve a chat user or channel name (`DISCORD_USER_<NAME>` /
    /// `DISCORD_CHANNEL_<NAME>`) to its ID
    ///
    /// # Errors
    /// - `UnknownRecipient` when no key matches
    /// - `NoRecipientConfigured` for an empty name
    pub fn resolve_chat_target(
        &self,
        kind: ChatTargetKind,
        name: &str,
    ) -> Result<ChatTarget, ResolutionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ResolutionError::NoRecipientConfigured {
                channel: ChannelType::Discord,
            });
        }

        let found = match kind {
            ChatTargetKind::User => self.directory.chat_user(name),
            ChatTargetKind::Channel => self.directory.chat_channel(name),
        };

        if let Some(id) = found {
            tracing::debug!(%kind, name, id, "resolved chat recipient");
            return Ok(ChatTarget::new(kind, id));
        }

        let available = match kind {
            ChatTargetKind::User => self.directory.chat_user_names(),
            ChatTargetKind::Channel => self.directory.chat_channel_names(),
        };
        Err(ResolutionError::UnknownRecipient {
            kind,
            name: name.to_string(),
            available,
        })
    }

    /// Resolve an email recipient
    ///
    /// Input containing `@` is a literal address and is returned unchanged.
    /// Otherwise the name is looked up as `EMAIL_TO_<NAME>`, falling back to
    /// `EMAIL_TO` when it is unknown or empty.
    ///
    /// # Errors
    /// `NoRecipientConfigured` when neither the name nor `EMAIL_TO` resolve
    pub fn resolve_email_target(&self, name_or_address: &str) -> Result<String, ResolutionError> {
        if name_or_address.contains('@') {
            return Ok(name_or_address.to_string());
        }

        let name = name_or_address.trim();
        if !name.is_empty() {
            if let Some(address) = self.directory.email_recipient(name) {
                tracing::debug!(name, address, "resolved email recipient");
                return Ok(address.to_string());
            }
            tracing::warn!(
                name,
                available = %self.directory.email_recipient_names().join(", "),
                "unknown email recipient, falling back to EMAIL_TO"
            );
        }

        self.default_email_target()
    }

    /// The global `EMAIL_TO` recipient
    pub fn default_email_target(&self) -> Result<String, ResolutionError> {
        self.directory
            .default_email()
            .map(str::to_string)
            .ok_or(ResolutionError::NoRecipientConfigured {
                channel: ChannelType::Email,
            })
    }
}

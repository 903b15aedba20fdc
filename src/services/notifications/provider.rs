//! Core transport traits and types.
//!
//! The dispatch layer talks to providers only through [`ChatTransport`] and
//! [`EmailTransport`], so the HTTP clients can be swapped for fakes in tests.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::TransportError;

/// Delivery channel a send goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    Discord,
    Email,
}

impl ChannelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelType::Discord => "discord",
            ChannelType::Email => "email",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which chat table a name is looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatTargetKind {
    User,
    Channel,
}

impl fmt::Display for ChatTargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatTargetKind::User => f.write_str("Discord user"),
            ChatTargetKind::Channel => f.write_str("Discord channel"),
        }
    }
}

/// A resolved chat-platform ID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChatTarget {
    /// Direct message to a user ID
    User(String),
    /// Post to a channel ID
    Channel(String),
}

impl ChatTarget {
    pub fn new(kind: ChatTargetKind, id: impl Into<String>) -> Self {
        match kind {
            ChatTargetKind::User => ChatTarget::User(id.into()),
            ChatTargetKind::Channel => ChatTarget::Channel(id.into()),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ChatTarget::User(id) | ChatTarget::Channel(id) => id,
        }
    }

    pub fn kind(&self) -> ChatTargetKind {
        match self {
            ChatTarget::User(_) => ChatTargetKind::User,
            ChatTarget::Channel(_) => ChatTargetKind::Channel,
        }
    }
}

/// Provider-specific destination produced by the resolver
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedTarget {
    Chat(ChatTarget),
    Email(String),
}

impl ResolvedTarget {
    pub fn channel_type(&self) -> ChannelType {
        match self {
            ResolvedTarget::Chat(_) => ChannelType::Discord,
            ResolvedTarget::Email(_) => ChannelType::Email,
        }
    }
}

impl From<ChatTarget> for ResolvedTarget {
    fn from(target: ChatTarget) -> Self {
        ResolvedTarget::Chat(target)
    }
}

impl fmt::Display for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedTarget::Chat(ChatTarget::User(id)) => write!(f, "user:{}", id),
            ResolvedTarget::Chat(ChatTarget::Channel(id)) => write!(f, "channel:{}", id),
            ResolvedTarget::Email(address) => f.write_str(address),
        }
    }
}

/// Chat message body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Text content as posted (mentions already prefixed)
    pub content: String,
    /// User IDs allowed to be pinged by this message
    pub mention_user_ids: Vec<String>,
}

impl ChatMessage {
    /// Plain message without mentions
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            mention_user_ids: Vec::new(),
        }
    }

    /// Message that pings `user_id`, as `<@id> text`
    pub fn mentioning(content: &str, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            content: format!("<@{}> {}", user_id, content),
            mention_user_ids: vec![user_id],
        }
    }
}

/// Email to a single recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Outcome of a successful provider call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReceipt {
    /// Provider-assigned message or email ID
    pub message_id: Option<String>,
    /// HTTP status code of the final request
    pub status_code: u16,
    /// Time taken for the operation in milliseconds
    pub duration_ms: u64,
}

/// Whether a credential the transport needs is present (never its value)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialStatus {
    pub key: &'static str,
    pub present: bool,
}

/// Chat platform transport (Discord)
///
/// Uses `async_trait` for dynamic dispatch; implementations must be
/// Send + Sync since one transport is shared by every send.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Deliver `message` to `target`
    ///
    /// # Returns
    /// Receipt with the provider message ID, or the provider's error
    async fn send_chat(
        &self,
        target: &ChatTarget,
        message: &ChatMessage,
    ) -> Result<MessageReceipt, TransportError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Credentials this transport depends on
    fn credentials(&self) -> Vec<CredentialStatus> {
        Vec::new()
    }
}

/// Transactional email transport
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Send one email
    async fn send_email(&self, message: &EmailMessage) -> Result<MessageReceipt, TransportError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Credentials this transport depends on
    fn credentials(&self) -> Vec<CredentialStatus> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentioning_prefixes_content() {
        let message = ChatMessage::mentioning("battery low", "1001");
        assert_eq!(message.content, "<@1001> battery low");
        assert_eq!(message.mention_user_ids, vec!["1001".to_string()]);
    }

    #[test]
    fn test_resolved_target_display() {
        assert_eq!(ResolvedTarget::from(ChatTarget::User("1".into())).to_string(), "user:1");
        assert_eq!(
            ResolvedTarget::from(ChatTarget::Channel("2".into())).to_string(),
            "channel:2"
        );
        assert_eq!(ResolvedTarget::Email("a@b.c".into()).to_string(), "a@b.c");
        assert_eq!(
            ResolvedTarget::Email("a@b.c".into()).channel_type(),
            ChannelType::Email
        );
    }

    #[test]
    fn test_chat_target_from_kind() {
        let target = ChatTarget::new(ChatTargetKind::Channel, "77");
        assert_eq!(target, ChatTarget::Channel("77".into()));
        assert_eq!(target.kind(), ChatTargetKind::Channel);
        assert_eq!(target.id(), "77");
    }
}

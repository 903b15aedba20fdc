//! Discord chat transport.
//!
//! Talks to the Discord REST API (v10) with a bot token. Channel posts are a
//! single request; direct messages first open (or fetch) the DM channel with
//! the user and then post into it.
//!
//! API Reference: https://discord.com/developers/docs/resources/message#create-message

use std::fmt;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;
use serde_json::json;

use super::error::TransportError;
use super::provider::{ChatMessage, ChatTarget, ChatTransport, CredentialStatus, MessageReceipt};
use crate::config::settings::{DiscordSettings, DISCORD_BOT_TOKEN_KEY};

/// Discord asks bots to identify as `DiscordBot ($url, $version)`
const DISCORD_USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/herald-rs/herald-rs, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Object returned by channel and message creation endpoints
#[derive(Debug, Deserialize)]
struct DiscordObject {
    id: String,
}

/// Discord REST transport
#[derive(Clone)]
pub struct DiscordClient {
    http: reqwest::Client,
    bot_token: Option<String>,
    api_base: String,
}

impl fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordClient")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl DiscordClient {
    /// Creates a new Discord client
    ///
    /// # Arguments
    /// * `http` - Shared HTTP client
    /// * `bot_token` - Bot token; sends fail with `MissingCredential` without it
    /// * `api_base` - REST base URL, e.g. `https://discord.com/api/v10`
    pub fn new(http: reqwest::Client, bot_token: Option<String>, api_base: impl Into<String>) -> Self {
        Self {
            http,
            bot_token: bot_token.filter(|t| !t.trim().is_empty()),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(http: reqwest::Client, settings: &DiscordSettings) -> Self {
        Self::new(http, settings.bot_token.clone(), settings.api_base.clone())
    }

    fn authorization(&self) -> Result<String, TransportError> {
        self.bot_token
            .as_ref()
            .map(|token| format!("Bot {}", token))
            .ok_or(TransportError::MissingCredential {
                key: DISCORD_BOT_TOKEN_KEY,
            })
    }

    /// Builds the create-message body
    ///
    /// Mention parsing is always off; only the listed users are pinged, so
    /// `@everyone` or role pings inside the text stay inert.
    fn build_message_body(message: &ChatMessage) -> serde_json::Value {
        json!({
            "content": message.content,
            "allowed_mentions": {
                "parse": [],
                "users": message.mention_user_ids,
            },
        })
    }

    /// Opens the DM channel with a user and returns its channel ID
    async fn open_dm(&self, auth: &str, user_id: &str) -> Result<String, TransportError> {
        let url = format!("{}/users/@me/channels", self.api_base);
        let response = self
            .http
            .post(&url)
            .header("Authorization", auth)
            .header("User-Agent", DISCORD_USER_AGENT)
            .json(&json!({ "recipient_id": user_id }))
            .send()
            .await?;

        let channel: DiscordObject = Self::parse_object(response).await?.1;
        tracing::debug!(user_id, dm_channel = %channel.id, "opened discord DM channel");
        Ok(channel.id)
    }

    /// Posts a message into a channel
    async fn post_message(
        &self,
        auth: &str,
        channel_id: &str,
        message: &ChatMessage,
    ) -> Result<(u16, DiscordObject), TransportError> {
        let url = format!("{}/channels/{}/messages", self.api_base, channel_id);
        let response = self
            .http
            .post(&url)
            .header("Authorization", auth)
            .header("User-Agent", DISCORD_USER_AGENT)
            .json(&Self::build_message_body(message))
            .send()
            .await?;

        Self::parse_object(response).await
    }

    /// Maps non-2xx responses to `TransportError::Status` and parses the body
    async fn parse_object(response: Response) -> Result<(u16, DiscordObject), TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let object = response
            .json::<DiscordObject>()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;
        Ok((status.as_u16(), object))
    }
}

#[async_trait]
impl ChatTransport for DiscordClient {
    /// Sends a message to a Discord user (as a DM) or channel
    ///
    /// # Returns
    /// Receipt with the created message ID, status code and duration
    async fn send_chat(
        &self,
        target: &ChatTarget,
        message: &ChatMessage,
    ) -> Result<MessageReceipt, TransportError> {
        let auth = self.authorization()?;
        let start = Instant::now();

        let channel_id = match target {
            ChatTarget::User(user_id) => self.open_dm(&auth, user_id).await?,
            ChatTarget::Channel(channel_id) => channel_id.clone(),
        };
        let (status_code, created) = self.post_message(&auth, &channel_id, message).await?;

        Ok(MessageReceipt {
            message_id: Some(created.id),
            status_code,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "discord"
    }

    fn credentials(&self) -> Vec<CredentialStatus> {
        vec![CredentialStatus {
            key: DISCORD_BOT_TOKEN_KEY,
            present: self.bot_token.is_some(),
        }]
    }
}

//! Dispatch façade.
//!
//! [`Notifier`] owns the recipient directory, the session defaults and one
//! transport per channel. Every send returns a [`SendResult`]; resolution
//! and provider failures are reported as data and never raised.

use std::sync::{Arc, PoisonError, RwLock};

use super::defaults::{DefaultsUpdate, SessionDefaults, non_empty};
use super::discord_provider::DiscordClient;
use super::error::{ResolutionError, SendFailure};
use super::provider::{
    ChannelType, ChatMessage, ChatTarget, ChatTargetKind, ChatTransport, EmailMessage,
    EmailTransport, ResolvedTarget,
};
use super::resend_provider::ResendClient;
use super::resolver::RecipientResolver;
use super::summary::ConfigSummary;
use crate::config::{RecipientDirectory, Settings};
use crate::error::AppResult;
use crate::external::build_http_client;

const DEFAULT_EMAIL_SUBJECT: &str = "Notification";
const DEFAULT_ALERT_SUBJECT: &str = "Alert";

/// Successful delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub channel: ChannelType,
    pub target: ResolvedTarget,
    pub message_id: Option<String>,
}

/// Outcome of one dispatch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendResult {
    Success(SendReceipt),
    Failure(SendFailure),
}

impl SendResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SendResult::Success(_))
    }

    pub fn receipt(&self) -> Option<&SendReceipt> {
        match self {
            SendResult::Success(receipt) => Some(receipt),
            SendResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&SendFailure> {
        match self {
            SendResult::Success(_) => None,
            SendResult::Failure(failure) => Some(failure),
        }
    }
}

impl From<ResolutionError> for SendResult {
    fn from(error: ResolutionError) -> Self {
        SendResult::Failure(error.into())
    }
}

/// Result of [`Notifier::alert`]; each channel is reported independently
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertOutcome {
    pub chat: SendResult,
    pub email: SendResult,
}

impl AlertOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.chat.is_success() && self.email.is_success()
    }

    pub fn any_succeeded(&self) -> bool {
        self.chat.is_success() || self.email.is_success()
    }
}

/// Subjects used when a caller passes none
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultSubjects {
    pub email: String,
    pub alert: String,
}

impl Default for DefaultSubjects {
    fn default() -> Self {
        Self {
            email: DEFAULT_EMAIL_SUBJECT.to_string(),
            alert: DEFAULT_ALERT_SUBJECT.to_string(),
        }
    }
}

/// Builder for [`Notifier`]
pub struct NotifierBuilder {
    chat: Arc<dyn ChatTransport>,
    email: Arc<dyn EmailTransport>,
    directory: RecipientDirectory,
    defaults: SessionDefaults,
    subjects: DefaultSubjects,
}

impl NotifierBuilder {
    pub fn directory(mut self, directory: RecipientDirectory) -> Self {
        self.directory = directory;
        self
    }

    /// Seed the session defaults
    pub fn defaults(mut self, defaults: SessionDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn subjects(mut self, subjects: DefaultSubjects) -> Self {
        self.subjects = subjects;
        self
    }

    pub fn build(self) -> Notifier {
        Notifier {
            resolver: RecipientResolver::new(self.directory),
            chat: self.chat,
            email: self.email,
            defaults: RwLock::new(self.defaults),
            subjects: self.subjects,
        }
    }
}

/// Notification dispatcher
///
/// Shareable across tasks; session defaults sit behind a lock and every
/// send reads a snapshot of them.
pub struct Notifier {
    resolver: RecipientResolver,
    chat: Arc<dyn ChatTransport>,
    email: Arc<dyn EmailTransport>,
    defaults: RwLock<SessionDefaults>,
    subjects: DefaultSubjects,
}

impl Notifier {
    pub fn builder(chat: Arc<dyn ChatTransport>, email: Arc<dyn EmailTransport>) -> NotifierBuilder {
        NotifierBuilder {
            chat,
            email,
            directory: RecipientDirectory::default(),
            defaults: SessionDefaults::default(),
            subjects: DefaultSubjects::default(),
        }
    }

    /// Creates a notifier backed by Discord and Resend
    ///
    /// Missing credentials do not fail here; the affected sends report
    /// `MissingCredential` instead.
    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        let http = build_http_client(&settings.http)?;
        let chat = DiscordClient::from_settings(http.clone(), &settings.discord);
        let email = ResendClient::from_settings(http, &settings.email);

        tracing::debug!(
            chat = chat.name(),
            email = email.name(),
            users = settings.recipients.chat_user_names().len(),
            channels = settings.recipients.chat_channel_names().len(),
            email_recipients = settings.recipients.email_recipient_names().len(),
            "notifier configured"
        );

        Ok(Self::builder(Arc::new(chat), Arc::new(email))
            .directory(settings.recipients.clone())
            .defaults(settings.defaults.clone())
            .subjects(DefaultSubjects {
                email: settings.email.subject.clone(),
                alert: settings.email.alert_subject.clone(),
            })
            .build())
    }

    pub fn resolver(&self) -> &RecipientResolver {
        &self.resolver
    }

    // ========================================================================
    // Session defaults
    // ========================================================================

    /// Merge `update` into the session defaults and return the new snapshot
    ///
    /// Names are not checked against configuration here; an unknown default
    /// surfaces as `UnknownRecipient` on the send that uses it.
    pub fn set_defaults(&self, update: DefaultsUpdate) -> SessionDefaults {
        let mut defaults = self.defaults.write().unwrap_or_else(PoisonError::into_inner);
        defaults.merge(update);

        tracing::info!(
            chat_user = defaults.chat_user().unwrap_or("None"),
            chat_channel = defaults.chat_channel().unwrap_or("None"),
            email_user = defaults.email_user().unwrap_or("None"),
            "session defaults updated"
        );
        defaults.clone()
    }

    /// Snapshot of the current session defaults
    pub fn defaults(&self) -> SessionDefaults {
        self.defaults
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ========================================================================
    // Sending
    // ========================================================================

    /// Send a chat message to a user (DM) or channel
    ///
    /// An explicit `user` wins over an explicit `channel`. With neither, the
    /// default user is tried, then the default channel.
    pub async fn send_chat_message(
        &self,
        text: &str,
        user: Option<&str>,
        channel: Option<&str>,
    ) -> SendResult {
        let target = match self.chat_recipient(user, channel) {
            Some((kind, name)) => self.resolver.resolve_chat_target(kind, &name),
            None => Err(ResolutionError::NoRecipientConfigured {
                channel: ChannelType::Discord,
            }),
        };

        match target {
            Ok(target) => self.dispatch_chat(target, ChatMessage::text(text)).await,
            Err(error) => self.resolution_failed(error),
        }
    }

    /// Post to a channel, optionally pinging one user
    ///
    /// A mention that does not resolve is dropped with a warning and the
    /// post goes out without it.
    pub async fn send_channel_message(
        &self,
        text: &str,
        channel: Option<&str>,
        mention: Option<&str>,
    ) -> SendResult {
        let defaults = self.defaults();
        let Some(channel) = non_empty(channel).or(defaults.chat_channel()) else {
            return self.resolution_failed(ResolutionError::NoRecipientConfigured {
                channel: ChannelType::Discord,
            });
        };

        let target = match self.resolver.resolve_chat_target(ChatTargetKind::Channel, channel) {
            Ok(target) => target,
            Err(error) => return self.resolution_failed(error),
        };

        let message = match non_empty(mention) {
            Some(name) => match self.resolver.resolve_chat_target(ChatTargetKind::User, name) {
                Ok(user) => ChatMessage::mentioning(text, user.id()),
                Err(error) => {
                    tracing::warn!(mention = name, error = %error, "mention skipped");
                    ChatMessage::text(text)
                }
            },
            None => ChatMessage::text(text),
        };

        self.dispatch_chat(target, message).await
    }

    /// Send an email
    ///
    /// Recipient precedence: `to_email`, `to_user`, the default email user,
    /// then `EMAIL_TO`.
    pub async fn send_email(
        &self,
        text: &str,
        subject: Option<&str>,
        to_user: Option<&str>,
        to_email: Option<&str>,
    ) -> SendResult {
        let address = match non_empty(to_email) {
            Some(address) => Ok(address.to_string()),
            None => {
                let defaults = self.defaults();
                match non_empty(to_user).or(defaults.email_user()) {
                    Some(name) => self.resolver.resolve_email_target(name),
                    None => self.resolver.default_email_target(),
                }
            }
        };

        let to = match address {
            Ok(to) => to,
            Err(error) => return self.resolution_failed(error),
        };

        let message = EmailMessage {
            to,
            subject: non_empty(subject).unwrap_or(self.subjects.email.as_str()).to_string(),
            body: text.to_string(),
        };
        self.dispatch_email(message).await
    }

    /// Send `text` to the default chat recipient and by email
    ///
    /// Both sends are always attempted, chat first; one failing does not
    /// stop the other.
    pub async fn alert(&self, text: &str, subject: Option<&str>) -> AlertOutcome {
        let subject = non_empty(subject).unwrap_or(self.subjects.alert.as_str()).to_string();

        let chat = self.send_chat_message(text, None, None).await;
        let email = self.send_email(text, Some(&subject), None, None).await;

        if !chat.is_success() || !email.is_success() {
            tracing::warn!(
                chat_ok = chat.is_success(),
                email_ok = email.is_success(),
                "alert partially delivered"
            );
        }
        AlertOutcome { chat, email }
    }

    /// Chat message to the session default recipient
    pub async fn discord(&self, text: &str) -> SendResult {
        self.send_chat_message(text, None, None).await
    }

    /// Email to the session default recipient
    pub async fn email_short(&self, text: &str, subject: Option<&str>) -> SendResult {
        self.send_email(text, subject, None, None).await
    }

    /// Defaults, known names and credential presence
    pub fn config_summary(&self) -> ConfigSummary {
        let directory = self.resolver.directory();
        let mut credentials = self.chat.credentials();
        credentials.extend(self.email.credentials());

        ConfigSummary {
            defaults: self.defaults(),
            chat_users: directory.chat_user_names(),
            chat_channels: directory.chat_channel_names(),
            email_recipients: directory.email_recipient_names(),
            default_email: directory.default_email().map(str::to_string),
            credentials,
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn chat_recipient(
        &self,
        user: Option<&str>,
        channel: Option<&str>,
    ) -> Option<(ChatTargetKind, String)> {
        if let Some(user) = non_empty(user) {
            return Some((ChatTargetKind::User, user.to_string()));
        }
        if let Some(channel) = non_empty(channel) {
            return Some((ChatTargetKind::Channel, channel.to_string()));
        }

        let defaults = self.defaults();
        defaults
            .chat_user()
            .map(|user| (ChatTargetKind::User, user.to_string()))
            .or_else(|| {
                defaults
                    .chat_channel()
                    .map(|channel| (ChatTargetKind::Channel, channel.to_string()))
            })
    }

    fn resolution_failed(&self, error: ResolutionError) -> SendResult {
        tracing::warn!(error = %error, "recipient not resolved");
        error.into()
    }

    async fn dispatch_chat(&self, target: ChatTarget, message: ChatMessage) -> SendResult {
        match self.chat.send_chat(&target, &message).await {
            Ok(receipt) => {
                tracing::info!(
                    provider = self.chat.name(),
                    recipient = %ResolvedTarget::from(target.clone()),
                    message_id = receipt.message_id.as_deref().unwrap_or("-"),
                    status = receipt.status_code,
                    duration_ms = receipt.duration_ms,
                    "chat message sent"
                );
                SendResult::Success(SendReceipt {
                    channel: ChannelType::Discord,
                    target: target.into(),
                    message_id: receipt.message_id,
                })
            }
            Err(error) => {
                tracing::error!(
                    provider = self.chat.name(),
                    recipient = %ResolvedTarget::from(target),
                    error = %error,
                    "chat message failed"
                );
                SendResult::Failure(SendFailure::transport(ChannelType::Discord, error))
            }
        }
    }

    async fn dispatch_email(&self, message: EmailMessage) -> SendResult {
        match self.email.send_email(&message).await {
            Ok(receipt) => {
                tracing::info!(
                    provider = self.email.name(),
                    to = %message.to,
                    subject = %message.subject,
                    message_id = receipt.message_id.as_deref().unwrap_or("-"),
                    duration_ms = receipt.duration_ms,
                    "email sent"
                );
                SendResult::Success(SendReceipt {
                    channel: ChannelType::Email,
                    target: ResolvedTarget::Email(message.to),
                    message_id: receipt.message_id,
                })
            }
            Err(error) => {
                tracing::error!(
                    provider = self.email.name(),
                    to = %message.to,
                    error = %error,
                    "email failed"
                );
                SendResult::Failure(SendFailure::transport(ChannelType::Email, error))
            }
        }
    }
}

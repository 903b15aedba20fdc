//! Notification dispatch.
//!
//! Resolves recipient names through the configured directory and delivers
//! messages over a chat transport (Discord) and an email transport (Resend).
//! Transports sit behind the [`ChatTransport`] and [`EmailTransport`] traits
//! so the façade can be exercised without a network.

mod defaults;
mod discord_provider;
mod error;
mod notifier;
mod provider;
mod resend_provider;
mod resolver;
mod summary;

pub use defaults::{DefaultsUpdate, SessionDefaults};
pub use discord_provider::DiscordClient;
pub use error::{ResolutionError, SendFailure, TransportError};
pub use notifier::{AlertOutcome, DefaultSubjects, Notifier, NotifierBuilder, SendReceipt, SendResult};
pub use provider::{
    ChannelType, ChatMessage, ChatTarget, ChatTargetKind, ChatTransport, CredentialStatus,
    EmailMessage, EmailTransport, MessageReceipt, ResolvedTarget,
};
pub use resend_provider::ResendClient;
pub use resolver::RecipientResolver;
pub use summary::ConfigSummary;

//! Failure taxonomy for recipient resolution and delivery.

use thiserror::Error;

use super::provider::{ChannelType, ChatTargetKind};

/// Recipient could not be resolved from configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// A name was given but no matching key is configured
    #[error("{kind} '{name}' not found. Available: {}", available_names(.available))]
    UnknownRecipient {
        kind: ChatTargetKind,
        name: String,
        /// Configured names of the same kind, sorted
        available: Vec<String>,
    },

    /// Nothing given, no session default and no fallback key
    #[error("no {channel} recipient specified and none configured")]
    NoRecipientConfigured { channel: ChannelType },
}

fn available_names(names: &[String]) -> String {
    if names.is_empty() {
        "None".to_string()
    } else {
        names.join(", ")
    }
}

/// Provider call failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Required credential missing; no request was made
    #[error("{key} not configured")]
    MissingCredential { key: &'static str },

    /// Network failure, timeout, or request construction error
    #[error("request failed: {0}")]
    Request(String),

    /// Provider answered with a non-2xx status
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx response that could not be understood
    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        TransportError::Request(error.to_string())
    }
}

/// Why a single dispatch attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendFailure {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("{channel} delivery failed: {error}")]
    Transport {
        channel: ChannelType,
        #[source]
        error: TransportError,
    },
}

impl SendFailure {
    pub fn transport(channel: ChannelType, error: TransportError) -> Self {
        SendFailure::Transport { channel, error }
    }
}

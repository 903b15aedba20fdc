//! Resend email transport.
//!
//! Sends plain-text email through the Resend HTTP API. The API key is the
//! same secret Resend issues as the SMTP password, so `SMTP_PASS` works
//! unchanged.
//!
//! API Reference: https://resend.com/docs/api-reference/emails/send-email

use std::fmt;
use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::error::TransportError;
use super::provider::{CredentialStatus, EmailMessage, EmailTransport, MessageReceipt};
use crate::config::settings::{EMAIL_API_KEY_KEY, EMAIL_FROM_KEY, EmailSettings};

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

/// Resend email transport
#[derive(Clone)]
pub struct ResendClient {
    http: reqwest::Client,
    api_key: Option<String>,
    from: Option<String>,
    api_base: String,
}

impl fmt::Debug for ResendClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResendClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("from", &self.from)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl ResendClient {
    /// Creates a new Resend client
    ///
    /// # Arguments
    /// * `http` - Shared HTTP client
    /// * `api_key` - Resend API key
    /// * `from` - Sender address
    /// * `api_base` - API base URL, e.g. `https://api.resend.com`
    pub fn new(
        http: reqwest::Client,
        api_key: Option<String>,
        from: Option<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            from: from.filter(|f| !f.trim().is_empty()),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(http: reqwest::Client, settings: &EmailSettings) -> Self {
        Self::new(
            http,
            settings.api_key.clone(),
            settings.from.clone(),
            settings.api_base.clone(),
        )
    }

    fn build_request_body(from: &str, message: &EmailMessage) -> serde_json::Value {
        json!({
            "from": from,
            "to": [message.to],
            "subject": message.subject,
            "text": message.body,
        })
    }
}

#[async_trait]
impl EmailTransport for ResendClient {
    /// Sends an email via Resend
    ///
    /// # Returns
    /// Receipt with the Resend email ID, status code and duration
    async fn send_email(&self, message: &EmailMessage) -> Result<MessageReceipt, TransportError> {
        let api_key = self.api_key.as_deref().ok_or(TransportError::MissingCredential {
            key: EMAIL_API_KEY_KEY,
        })?;
        let from = self.from.as_deref().ok_or(TransportError::MissingCredential {
            key: EMAIL_FROM_KEY,
        })?;

        let start = Instant::now();
        let response = self
            .http
            .post(format!("{}/emails", self.api_base))
            .bearer_auth(api_key)
            .json(&Self::build_request_body(from, message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let sent = response
            .json::<SendEmailResponse>()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

        Ok(MessageReceipt {
            message_id: Some(sent.id),
            status_code: status.as_u16(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "resend"
    }

    fn credentials(&self) -> Vec<CredentialStatus> {
        vec![
            CredentialStatus {
                key: EMAIL_API_KEY_KEY,
                present: self.api_key.is_some(),
            },
            CredentialStatus {
                key: EMAIL_FROM_KEY,
                present: self.from.is_some(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn message() -> EmailMessage {
        EmailMessage {
            to: "aaron@example.com".to_string(),
            subject: "Notification".to_string(),
            body: "cooldown complete".to_string(),
        }
    }

    fn client(server: &MockServer, api_key: Option<&str>, from: Option<&str>) -> ResendClient {
        ResendClient::new(
            reqwest::Client::new(),
            api_key.map(str::to_string),
            from.map(str::to_string),
            server.uri(),
        )
    }

    #[tokio::test]
    async fn test_send_email() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("authorization", "Bearer re_test"))
            .and(body_json(json!({
                "from": "bot@example.com",
                "to": ["aaron@example.com"],
                "subject": "Notification",
                "text": "cooldown complete",
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "id": "49a3999c-0ce1-4ea6-ab68-afcd6dc2e794" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let receipt = client(&server, Some("re_test"), Some("bot@example.com"))
            .send_email(&message())
            .await
            .expect("send should succeed");

        assert_eq!(
            receipt.message_id.as_deref(),
            Some("49a3999c-0ce1-4ea6-ab68-afcd6dc2e794")
        );
        assert_eq!(receipt.status_code, 200);
    }

    #[tokio::test]
    async fn test_provider_error_text_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "statusCode": 422,
                "name": "validation_error",
                "message": "Invalid `from` field."
            })))
            .mount(&server)
            .await;

        let err = client(&server, Some("re_test"), Some("bot@example.com"))
            .send_email(&message())
            .await
            .expect_err("422 should fail");

        match err {
            TransportError::Status { status, body } => {
                assert_eq!(status, 422);
                assert!(body.contains("Invalid `from` field."));
            }
            other => panic!("expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_make_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server, None, Some("bot@example.com"))
            .send_email(&message())
            .await
            .expect_err("missing key should fail");
        assert_eq!(err, TransportError::MissingCredential { key: EMAIL_API_KEY_KEY });

        let err = client(&server, Some("re_test"), None)
            .send_email(&message())
            .await
            .expect_err("missing sender should fail");
        assert_eq!(err, TransportError::MissingCredential { key: EMAIL_FROM_KEY });
    }

    #[test]
    fn test_credentials_report_presence_only() {
        let client = ResendClient::new(
            reqwest::Client::new(),
            Some("re_secret".into()),
            Some("  ".into()),
            "https://api.resend.com/",
        );
        assert_eq!(
            client.credentials(),
            vec![
                CredentialStatus { key: EMAIL_API_KEY_KEY, present: true },
                CredentialStatus { key: EMAIL_FROM_KEY, present: false },
            ]
        );
        assert_eq!(client.api_base, "https://api.resend.com");
        assert!(!format!("{:?}", client).contains("re_secret"));
    }
}

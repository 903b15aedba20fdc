//! Command executor for dispatching CLI commands

use super::parser::{Cli, Commands};
use crate::services::notifications::{Notifier, SendResult};

/// Execute a CLI command against `notifier`
///
/// Results are printed to stdout, failures to stderr.
///
/// # Returns
/// `true` when every attempted send succeeded
pub async fn execute_command(cli: &Cli, notifier: &Notifier) -> bool {
    let update = cli.defaults_update();
    if !update.is_empty() {
        notifier.set_defaults(update);
    }

    match &cli.command {
        Commands::Discord { message, user, channel } => {
            let result = notifier
                .send_chat_message(message, user.as_deref(), channel.as_deref())
                .await;
            report("Discord", &result)
        }
        Commands::Channel { message, channel, mention } => {
            let result = notifier
                .send_channel_message(message, channel.as_deref(), mention.as_deref())
                .await;
            report("Discord", &result)
        }
        Commands::Email { message, subject, to_user, to_email } => {
            let result = notifier
                .send_email(
                    message,
                    subject.as_deref(),
                    to_user.as_deref(),
                    to_email.as_deref(),
                )
                .await;
            report("Email", &result)
        }
        Commands::Alert { message, subject } => {
            let outcome = notifier.alert(message, subject.as_deref()).await;
            let chat_ok = report("Discord", &outcome.chat);
            let email_ok = report("Email", &outcome.email);
            chat_ok && email_ok
        }
        Commands::Config => {
            print!("{}", notifier.config_summary());
            true
        }
    }
}

fn report(label: &str, result: &SendResult) -> bool {
    match result {
        SendResult::Success(receipt) => {
            println!("{} sent to {}", label, receipt.target);
            true
        }
        SendResult::Failure(failure) => {
            eprintln!("{} failed: {}", label, failure);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigSource, RecipientDirectory};
    use crate::services::notifications::{
        ChatMessage, ChatTarget, ChatTransport, EmailMessage, EmailTransport, MessageReceipt,
        TransportError,
    };
    use async_trait::async_trait;
    use clap::Parser;
    use std::sync::Arc;

    struct AcceptAll;

    #[async_trait]
    impl ChatTransport for AcceptAll {
        async fn send_chat(
            &self,
            _target: &ChatTarget,
            _message: &ChatMessage,
        ) -> Result<MessageReceipt, TransportError> {
            Ok(MessageReceipt { message_id: None, status_code: 200, duration_ms: 0 })
        }

        fn name(&self) -> &'static str {
            "accept"
        }
    }

    #[async_trait]
    impl EmailTransport for AcceptAll {
        async fn send_email(&self, _message: &EmailMessage) -> Result<MessageReceipt, TransportError> {
            Ok(MessageReceipt { message_id: None, status_code: 200, duration_ms: 0 })
        }

        fn name(&self) -> &'static str {
            "accept"
        }
    }

    fn notifier() -> Notifier {
        let directory = RecipientDirectory::from_source(&ConfigSource::from_pairs([
            ("DISCORD_USER_AARON", "1001"),
            ("EMAIL_TO", "lab@example.com"),
        ]));
        Notifier::builder(Arc::new(AcceptAll), Arc::new(AcceptAll))
            .directory(directory)
            .build()
    }

    #[tokio::test]
    async fn test_cli_defaults_are_applied() {
        let notifier = notifier();
        let cli = Cli::try_parse_from(["herald-rs", "--default-user", "aaron", "alert", "x"]).unwrap();

        assert!(execute_command(&cli, &notifier).await);
        assert_eq!(notifier.defaults().chat_user(), Some("aaron"));
    }

    #[tokio::test]
    async fn test_failed_send_reports_false() {
        let cli = Cli::try_parse_from(["herald-rs", "discord", "x", "--user", "bob"]).unwrap();
        assert!(!execute_command(&cli, &notifier()).await);
    }

    #[tokio::test]
    async fn test_alert_with_missing_chat_recipient_reports_false() {
        let cli = Cli::try_parse_from(["herald-rs", "alert", "x"]).unwrap();
        assert!(!execute_command(&cli, &notifier()).await);
    }

    #[tokio::test]
    async fn test_config_command() {
        let cli = Cli::try_parse_from(["herald-rs", "config"]).unwrap();
        assert!(execute_command(&cli, &notifier()).await);
    }
}

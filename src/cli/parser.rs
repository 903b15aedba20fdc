//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::validation;
use crate::build;
use crate::services::notifications::DefaultsUpdate;

/// Send notifications to Discord and email
#[derive(Parser, Debug)]
#[command(name = "herald-rs")]
#[command(about = "Send notifications to Discord users, channels and email recipients")]
#[command(long_about = "
herald-rs forwards a message to a Discord user or channel, an email
recipient, or both. Recipients are referred to by name; names map to IDs
and addresses through DISCORD_USER_<NAME>, DISCORD_CHANNEL_<NAME> and
EMAIL_TO_<NAME> environment variables (a .env file is read too).

EXAMPLES:
    # DM the default user
    herald-rs --default-user aaron discord \"run finished\"

    # Post to a channel and ping a user
    herald-rs channel \"disk almost full\" --channel alerts --mention aaron

    # Email a named recipient
    herald-rs email \"results attached\" --to-user aaron --subject \"Run 42\"

    # Discord and email at once
    herald-rs --default-user aaron alert \"pump stopped\"

    # Show what is configured
    herald-rs config
")]
#[command(version = build::CLAP_LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// TOML file with [http], [discord], [email], [defaults] and [logger]
    /// sections. The file must exist and be readable.
    #[arg(short, long, value_name = "FILE", value_parser = validation::validate_existing_file)]
    pub config: Option<PathBuf>,

    /// Dotenv file to load (defaults to ./.env when present)
    #[arg(long, value_name = "FILE", value_parser = validation::validate_existing_file)]
    pub env_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Default Discord user name for this run
    #[arg(long, value_name = "NAME")]
    pub default_user: Option<String>,

    /// Default Discord channel name for this run
    #[arg(long, value_name = "NAME")]
    pub default_channel: Option<String>,

    /// Default email recipient name for this run
    #[arg(long, value_name = "NAME")]
    pub default_email_user: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a Discord message to a user (DM) or channel
    ///
    /// Without --user or --channel the default user is used, then the
    /// default channel. --user wins when both are given.
    Discord {
        #[arg(value_parser = validation::validate_message)]
        message: String,

        /// Recipient user name
        #[arg(long, value_name = "NAME")]
        user: Option<String>,

        /// Recipient channel name
        #[arg(long, value_name = "NAME")]
        channel: Option<String>,
    },

    /// Post to a Discord channel, optionally pinging a user
    Channel {
        #[arg(value_parser = validation::validate_message)]
        message: String,

        /// Channel name (defaults to the default channel)
        #[arg(long, value_name = "NAME")]
        channel: Option<String>,

        /// User name to mention
        #[arg(long, value_name = "NAME")]
        mention: Option<String>,
    },

    /// Send an email
    ///
    /// Recipient precedence: --to-email, --to-user, the default email user,
    /// then EMAIL_TO.
    Email {
        #[arg(value_parser = validation::validate_message)]
        message: String,

        /// Subject line
        #[arg(short, long)]
        subject: Option<String>,

        /// Recipient name
        #[arg(long, value_name = "NAME")]
        to_user: Option<String>,

        /// Literal recipient address
        #[arg(long, value_name = "ADDRESS")]
        to_email: Option<String>,
    },

    /// Send to the default Discord recipient and by email
    Alert {
        #[arg(value_parser = validation::validate_message)]
        message: String,

        /// Subject line
        #[arg(short, long)]
        subject: Option<String>,
    },

    /// Print defaults, configured names and credential status
    Config,
}

impl Cli {
    /// Session defaults supplied on the command line
    pub fn defaults_update(&self) -> DefaultsUpdate {
        DefaultsUpdate {
            chat_user: self.default_user.clone(),
            chat_channel: self.default_channel.clone(),
            email_user: self.default_email_user.clone(),
        }
    }

    /// Log level forced by --verbose / --quiet
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}

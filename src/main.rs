use std::process::ExitCode;

use clap::Parser;
use herald_rs::Notifier;
use herald_rs::cli::{Cli, execute_command, init_logger_from_settings, load_settings};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = load_settings(&cli)?;
    init_logger_from_settings(&settings)?;
    tracing::debug!(version = herald_rs::pkg_version(), "starting herald-rs");

    let notifier = Notifier::from_settings(&settings)?;
    if execute_command(&cli, &notifier).await {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

//! `avatar-fx` binary.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use avatar_fx::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("avatar_fx={log_level},image_processor={log_level},glitch_engine={log_level}").into()
        }))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = avatar_fx::run(&cli) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

//! avatar-fx: command-line image effects for avatars and product shots.

pub mod cli;
pub mod commands;
pub mod config;

use anyhow::Context;

use cli::Cli;
use config::{AppConfig, SettingsManager};

/// Load .env from multiple candidate paths. Existing environment variables win.
pub fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::debug!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}

/// Resolve settings for `cli` and run its command.
pub fn run(cli: &Cli) -> Result<(), anyhow::Error> {
    load_dotenv();

    let mut sm = SettingsManager::from_env();
    cli.command
        .apply_overrides(&mut sm)
        .context("Invalid command-line option")?;
    let config = AppConfig::load(&sm).context("Failed to load settings")?;
    tracing::debug!(?config, "Settings loaded");

    commands::dispatch(&cli.command, &sm, &config)
}

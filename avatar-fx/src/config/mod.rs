//! Configuration management: defaults, validation, layered loading from CLI + environment.

pub mod app_config;
pub mod defaults;
pub mod manager;
pub mod validation;

pub use app_config::AppConfig;
pub use manager::SettingsManager;

use serde::{Deserialize, Serialize};

/// Where a resolved setting value came from, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingSource {
    Cli,
    /// Process environment, including values loaded from `.env`.
    Env,
    Default,
}

/// A setting as reported by the `config` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingInfo {
    pub key: String,
    pub value: String,
    pub source: SettingSource,
    pub description: String,
    pub has_value: bool,
}

/// Errors from reading or overriding settings.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SettingError {
    #[error("unknown setting key: {0}")]
    UnknownKey(String),

    #[error("validation error for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

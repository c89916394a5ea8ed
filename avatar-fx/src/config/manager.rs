//! SettingsManager: layered settings with CLI overrides, environment, and defaults.

use std::collections::{BTreeMap, HashMap};

use super::defaults::DEFAULT_SETTINGS;
use super::validation::validate_setting;
use super::{SettingError, SettingInfo, SettingSource};

/// Resolves settings as CLI override > environment > default.
///
/// The environment is captured once at construction, after `.env` has been
/// loaded into the process.
#[derive(Debug, Clone, Default)]
pub struct SettingsManager {
    env: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl SettingsManager {
    /// Capture known keys from the process environment.
    pub fn from_env() -> Self {
        let env = DEFAULT_SETTINGS
            .keys()
            .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v)))
            .collect();
        Self::with_env(env)
    }

    /// Use an explicit environment map.
    pub fn with_env(env: HashMap<String, String>) -> Self {
        Self {
            env,
            overrides: HashMap::new(),
        }
    }

    /// Set a command-line override with validation.
    pub fn set_override(&mut self, key: &str, value: &str) -> Result<(), SettingError> {
        if !DEFAULT_SETTINGS.contains_key(key) {
            return Err(SettingError::UnknownKey(key.to_string()));
        }
        validate(key, value)?;
        tracing::debug!(key, value, "CLI override");
        self.overrides.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Get a setting value. Falls back to env, then default.
    pub fn get_setting(&self, key: &str) -> Result<String, SettingError> {
        self.resolve(key).map(|(value, _)| value)
    }

    /// Resolved value and where it came from. Empty environment values count
    /// as unset.
    pub fn resolve(&self, key: &str) -> Result<(String, SettingSource), SettingError> {
        let def = DEFAULT_SETTINGS
            .get(key)
            .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;

        if let Some(val) = self.overrides.get(key) {
            return Ok((val.clone(), SettingSource::Cli));
        }
        if let Some(val) = self.env.get(key).filter(|v| !v.is_empty()) {
            validate(key, val)?;
            return Ok((val.clone(), SettingSource::Env));
        }
        Ok((def.default.to_string(), SettingSource::Default))
    }

    /// All settings with their resolved values, ordered by key.
    pub fn get_all_settings(&self) -> Result<BTreeMap<String, SettingInfo>, SettingError> {
        let mut result = BTreeMap::new();
        for (key, def) in DEFAULT_SETTINGS.iter() {
            let (value, source) = self.resolve(key)?;
            result.insert(
                key.to_string(),
                SettingInfo {
                    key: key.to_string(),
                    has_value: !value.is_empty(),
                    value,
                    source,
                    description: def.description.to_string(),
                },
            );
        }
        Ok(result)
    }
}

fn validate(key: &str, value: &str) -> Result<(), SettingError> {
    validate_setting(key, value).map_err(|reason| SettingError::Invalid {
        key: key.to_string(),
        reason,
    })
}

//! Application tunables.
//!
//! # Invariants
//! - Intervals are strictly positive.
//! - Storage key and worker script path are non-empty.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

const TWO_HOURS_SECS: u64 = 2 * 60 * 60;

/// Runtime configuration for one `TaskApp`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Key holding the serialized task array.
    pub storage_key: String,
    pub reminder_interval_secs: u64,
    pub update_check_interval_secs: u64,
    /// Background worker script registered at startup.
    pub worker_script_path: String,
    pub notification_icon: String,
    pub vibration_pattern_ms: Vec<u32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_key: "tasks".to_string(),
            reminder_interval_secs: TWO_HOURS_SECS,
            update_check_interval_secs: TWO_HOURS_SECS,
            worker_script_path: "/sw.js".to_string(),
            notification_icon: "icons/icon-192x192.png".to_string(),
            vibration_pattern_ms: vec![200, 100, 200],
        }
    }
}

impl AppConfig {
    /// Parses a JSON config document; absent fields take defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty"));
        }
        if self.worker_script_path.trim().is_empty() {
            return Err(ConfigError::Invalid("worker_script_path must not be empty"));
        }
        if self.reminder_interval_secs == 0 {
            return Err(ConfigError::Invalid("reminder_interval_secs must be positive"));
        }
        if self.update_check_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "update_check_interval_secs must be positive",
            ));
        }
        Ok(())
    }

    pub fn reminder_interval(&self) -> Duration {
        Duration::from_secs(self.reminder_interval_secs)
    }

    pub fn update_check_interval(&self) -> Duration {
        Duration::from_secs(self.update_check_interval_secs)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use std::time::Duration;

    #[test]
    fn defaults_use_two_hour_intervals() {
        let config = AppConfig::default();
        assert_eq!(config.reminder_interval(), Duration::from_secs(7_200));
        assert_eq!(config.update_check_interval(), Duration::from_secs(7_200));
        assert_eq!(config.storage_key, "tasks");
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = AppConfig::from_json_str(r#"{"storage_key":"todo"}"#).expect("parse");
        assert_eq!(config.storage_key, "todo");
        assert_eq!(config.worker_script_path, "/sw.js");
    }

    #[test]
    fn rejects_zero_interval_and_unknown_fields() {
        assert!(matches!(
            AppConfig::from_json_str(r#"{"reminder_interval_secs":0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_json_str(r#"{"reminder":1}"#),
            Err(ConfigError::Parse(_))
        ));
    }
}

//! Session configuration, read from `certify.toml`.
//!
//! Every field is optional; a missing file section or key falls back to the
//! defaults below.
//!
//! ```toml
//! dataset = "certificates.json"
//! max_attempts = 5
//! cooldown_seconds = 60
//! auto_trigger_delay_ms = 500
//! result_delay_ms = 800
//! toast_seconds = 4
//! max_id_length = 64
//! base_url = "https://certs.example.org/verify/"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::engine::DEFAULT_MAX_ID_LENGTH;
use crate::error::ConfigError;
use crate::limiter::{DEFAULT_COOLDOWN, DEFAULT_MAX_ATTEMPTS};

/// Tunable settings for a verification session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Location of the certificate dataset document.
    pub dataset: PathBuf,
    /// Attempts accepted per cooldown window.
    pub max_attempts: u32,
    /// Length of the cooldown window in seconds.
    pub cooldown_seconds: u64,
    /// Delay before an auto-triggered submission, in milliseconds.
    pub auto_trigger_delay_ms: u64,
    /// Delay before a result is displayed, in milliseconds.
    pub result_delay_ms: u64,
    /// How long a toast stays visible, in seconds.
    pub toast_seconds: u64,
    /// Longest accepted certificate ID, in characters.
    pub max_id_length: usize,
    /// Page URL used for share links when none is supplied.
    pub base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("certificates.json"),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            cooldown_seconds: DEFAULT_COOLDOWN.as_secs(),
            auto_trigger_delay_ms: 500,
            result_delay_ms: 800,
            toast_seconds: 4,
            max_id_length: DEFAULT_MAX_ID_LENGTH,
            base_url: None,
        }
    }
}

impl Config {
    /// Reads and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, and the
    /// errors of [`Config::from_toml`] otherwise.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&source)
    }

    /// Parses and validates TOML config text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys, and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "max_attempts",
                reason: "must be at least 1",
            });
        }
        if self.cooldown_seconds == 0 {
            return Err(ConfigError::Invalid {
                field: "cooldown_seconds",
                reason: "must be at least 1",
            });
        }
        if self.max_id_length == 0 {
            return Err(ConfigError::Invalid {
                field: "max_id_length",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Cooldown window as a duration.
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_seconds)
    }

    /// Auto-trigger delay as a duration.
    pub fn auto_trigger_delay(&self) -> Duration {
        Duration::from_millis(self.auto_trigger_delay_ms)
    }

    /// Result display delay as a duration.
    pub fn result_delay(&self) -> Duration {
        Duration::from_millis(self.result_delay_ms)
    }

    /// Toast lifetime as a duration.
    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.toast_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn partial_file_overrides_some_fields() {
        let config = Config::from_toml("max_attempts = 3\nbase_url = \"https://x.test/\"").unwrap();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.cooldown(), Duration::from_secs(60));
        assert_eq!(config.base_url.as_deref(), Some("https://x.test/"));
    }

    #[test]
    fn zero_attempts_is_invalid() {
        assert!(matches!(
            Config::from_toml("max_attempts = 0"),
            Err(ConfigError::Invalid {
                field: "max_attempts",
                ..
            })
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            Config::from_toml("max_attempt = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::load(&dir.path().join("certify.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}

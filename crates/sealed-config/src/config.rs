//! Settings loading and validation.
//!
//! Values are read from environment variables prefixed with `SEALED_CONFIG`,
//! using `__` to separate nested keys:
//!
//! ```text
//! SEALED_CONFIG__LOG_LEVEL=debug
//! SEALED_CONFIG__KEYS__MAC0=<standard base64 of 32 key bytes>
//! ```
//!
//! The environment source lower-cases key names. Hosts that need
//! case-sensitive names provision a [`KeyStore`](crate::keys::KeyStore) from
//! their own [`KeySource`](crate::keys::KeySource) instead.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "SEALED_CONFIG";

/// Validated settings.
#[derive(Clone, Deserialize)]
pub struct Settings {
    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Key name → standard base64 key material.
    #[serde(default)]
    pub keys: BTreeMap<String, String>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("log_level", &self.log_level)
            .field("keys", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn default_log_level() -> String {
    "info".into()
}

impl Settings {
    /// Load and validate settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or validation fails.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .context("failed to build settings from environment")?;

        Self::from_config(cfg)
    }

    /// Deserialise and validate settings from a host-built [`config::Config`].
    ///
    /// # Errors
    ///
    /// Returns an error if deserialisation or validation fails.
    pub fn from_config(cfg: config::Config) -> Result<Self> {
        let settings: Settings = cfg
            .try_deserialize()
            .context("failed to deserialise settings")?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            anyhow::bail!("LOG_LEVEL must not be empty");
        }
        for (name, material) in &self.keys {
            if name.trim().is_empty() {
                anyhow::bail!("key names must not be empty");
            }
            if material.trim().is_empty() {
                anyhow::bail!("key {name} has no material");
            }
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            keys: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let settings = Settings::default();
        assert_eq!(settings.log_level, "info");
        assert!(settings.keys.is_empty());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = config::Config::builder().build().unwrap();
        let settings = Settings::from_config(cfg).unwrap();
        assert_eq!(settings.log_level, "info");
        assert!(settings.keys.is_empty());
    }

    #[test]
    fn reads_nested_keys_table() {
        let cfg = config::Config::builder()
            .set_override("log_level", "debug")
            .unwrap()
            .set_override("keys.mac0", "AAAA")
            .unwrap()
            .build()
            .unwrap();
        let settings = Settings::from_config(cfg).unwrap();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.keys.get("mac0").map(String::as_str), Some("AAAA"));
    }

    #[test]
    fn validate_rejects_empty_log_level() {
        let settings = Settings {
            log_level: " ".into(),
            keys: BTreeMap::new(),
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_material() {
        let mut keys = BTreeMap::new();
        keys.insert("mac0".to_string(), "".to_string());
        let settings = Settings {
            log_level: default_log_level(),
            keys,
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn debug_hides_key_material() {
        let mut keys = BTreeMap::new();
        keys.insert("mac0".to_string(), "c2VjcmV0".to_string());
        let settings = Settings {
            log_level: default_log_level(),
            keys,
        };
        let rendered = format!("{settings:?}");
        assert!(rendered.contains("mac0"));
        assert!(!rendered.contains("c2VjcmV0"));
    }
}

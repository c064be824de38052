//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing: intervals and batch sizes
//! must be positive, the fetch command must mention `{name}`, and the
//! powers root must be a valid dotted path.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::path::DottedPath;

/// Placeholder substituted with a power name in the fetch command.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// store = "/home/me/.dotdb/db.lua"
///
/// [fetch]
/// interval_ms = 1000
/// per_tick = 1
/// command = "help {name}"
///
/// [powers]
/// root = "powers"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Store file location
    pub store: Option<PathBuf>,

    /// Fetch chain pacing
    pub fetch: Option<FetchConfig>,

    /// Power catalog settings
    pub powers: Option<PowersConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(fetch) = &self.fetch {
            fetch.validate()?;
        }
        if let Some(powers) = &self.powers {
            powers.validate()?;
        }
        Ok(())
    }
}

/// Pacing of the sequential fetch chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Milliseconds between ticks
    pub interval_ms: Option<u64>,

    /// Names dispatched per tick
    pub per_tick: Option<usize>,

    /// Command sent to the host, with `{name}` substituted
    pub command: Option<String>,
}

impl FetchConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms == Some(0) {
            return Err(ConfigError::InvalidValue(
                "fetch.interval_ms must be greater than 0".into(),
            ));
        }
        if self.per_tick == Some(0) {
            return Err(ConfigError::InvalidValue(
                "fetch.per_tick must be greater than 0".into(),
            ));
        }
        if let Some(command) = &self.command {
            if !command.contains(NAME_PLACEHOLDER) {
                return Err(ConfigError::InvalidValue(format!(
                    "fetch.command '{}' must contain {}",
                    command, NAME_PLACEHOLDER
                )));
            }
        }
        Ok(())
    }
}

/// Where power records live in the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PowersConfig {
    /// Dotted path of the catalog table
    pub root: Option<String>,
}

impl PowersConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(root) = &self.root {
            DottedPath::parse(root).map_err(|e| {
                ConfigError::InvalidValue(format!("powers.root '{}': {}", root, e))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_valid() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config, GlobalConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn full_config_parses() {
        let config: GlobalConfig = toml::from_str(
            r#"
            store = "/tmp/db.lua"

            [fetch]
            interval_ms = 250
            per_tick = 2
            command = "ab {name}"

            [powers]
            root = "char.powers"
            "#,
        )
        .unwrap();

        assert_eq!(config.store, Some(PathBuf::from("/tmp/db.lua")));
        let fetch = config.fetch.as_ref().unwrap();
        assert_eq!(fetch.interval_ms, Some(250));
        assert_eq!(fetch.per_tick, Some(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_interval_rejected() {
        let config: GlobalConfig = toml::from_str("[fetch]\ninterval_ms = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_per_tick_rejected() {
        let config: GlobalConfig = toml::from_str("[fetch]\nper_tick = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn command_without_placeholder_rejected() {
        let config: GlobalConfig = toml::from_str("[fetch]\ncommand = \"help\"").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("{name}"));
    }

    #[test]
    fn invalid_powers_root_rejected() {
        let config: GlobalConfig = toml::from_str("[powers]\nroot = \"a..b\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<GlobalConfig, _> = toml::from_str("colour = true");
        assert!(result.is_err());

        let result: Result<GlobalConfig, _> = toml::from_str("[fetch]\nretries = 3");
        assert!(result.is_err());
    }
}

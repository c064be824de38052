//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. An explicit path (`--config`), which must exist
//! 2. `$DOTDB_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/dotdb/config.toml`
//! 4. `~/.dotdb/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use dotdb::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("Store: {}", config.store_path().unwrap().display());
//! println!("Tick: {:?}", config.fetch_interval());
//! ```

pub mod schema;

pub use schema::{FetchConfig, GlobalConfig, PowersConfig, NAME_PLACEHOLDER};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "DOTDB_CONFIG";

/// Default milliseconds between fetch ticks.
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Default fetch command.
pub const DEFAULT_COMMAND: &str = "help {name}";

/// Default catalog root.
pub const DEFAULT_POWERS_ROOT: &str = "powers";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Effective configuration with defaults applied by the accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub global: GlobalConfig,
    /// Path the config was loaded from, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `explicit` or the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed or
    /// validated, or if `explicit` is given and does not exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        match Self::discover() {
            Some(path) => Self::load_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate one config file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let global: GlobalConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        global.validate()?;

        Ok(Self {
            global,
            path: Some(path.to_path_buf()),
        })
    }

    /// First existing config file among the default locations.
    fn discover() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("dotdb/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".dotdb/config.toml"))
            .filter(|path| path.exists())
    }

    /// Canonical config location: `~/.dotdb/config.toml`.
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".dotdb/config.toml"))
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Store file location.
    ///
    /// Defaults to `~/.dotdb/db.lua`.
    pub fn store_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.global.store {
            Some(path) => Ok(path.clone()),
            None => {
                let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
                Ok(home.join(".dotdb/db.lua"))
            }
        }
    }

    /// Time between fetch ticks.
    pub fn fetch_interval(&self) -> Duration {
        let ms = self
            .global
            .fetch
            .as_ref()
            .and_then(|f| f.interval_ms)
            .unwrap_or(DEFAULT_INTERVAL_MS);
        Duration::from_millis(ms)
    }

    /// Names dispatched per tick. Defaults to 1.
    pub fn per_tick(&self) -> usize {
        self.global
            .fetch
            .as_ref()
            .and_then(|f| f.per_tick)
            .unwrap_or(1)
    }

    /// Command template sent to the host.
    pub fn fetch_command(&self) -> &str {
        self.global
            .fetch
            .as_ref()
            .and_then(|f| f.command.as_deref())
            .unwrap_or(DEFAULT_COMMAND)
    }

    /// Dotted path of the power catalog.
    pub fn powers_root(&self) -> &str {
        self.global
            .powers
            .as_ref()
            .and_then(|p| p.root.as_deref())
            .unwrap_or(DEFAULT_POWERS_ROOT)
    }

    /// Path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

//! cli
//!
//! Command-line interface layer for dotdb.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve configuration and the store location
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers open the store through [`Context`], call
//! into [`crate::core`] and [`crate::scrape`], and format the results.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::core::store::PathStore;
use crate::ui::output::{self, Verbosity};

/// Resolved settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Store file in use
    pub store_path: PathBuf,
    /// Loaded configuration
    pub config: Config,
    pub verbosity: Verbosity,
}

impl Context {
    /// Build the context from global flags.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
        let store_path = match &cli.store {
            Some(path) => path.clone(),
            None => config.store_path().context("Failed to locate store")?,
        };

        Ok(Self {
            store_path,
            config,
            verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
        })
    }

    /// Open the store, reporting load warnings.
    pub fn open_store(&self) -> PathStore {
        let result = PathStore::open(&self.store_path);
        for warning in &result.warnings {
            output::warn(warning, self.verbosity);
        }
        result.store
    }

    /// Save the store to its file.
    ///
    /// A store file that could not be loaded is first copied to
    /// `<file>.bak`.
    pub fn save_store(&self, store: &PathStore) -> Result<()> {
        let backup = PathStore::preserve_unreadable(&self.store_path)
            .with_context(|| format!("Failed to back up '{}'", self.store_path.display()))?;
        if let Some(backup) = backup {
            output::warn(
                format!("kept the unreadable store as '{}'", backup.display()),
                self.verbosity,
            );
        }
        store
            .save(&self.store_path)
            .with_context(|| format!("Failed to save '{}'", self.store_path.display()))
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli) -> Result<()> {
    let ctx = Context::from_cli(&cli)?;
    commands::dispatch(cli.command, &ctx)
}

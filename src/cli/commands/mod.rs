//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Opens the store through the [`Context`]
//! 3. Calls into the library and formats the results
//!
//! Handlers that change the store save it before returning.
//!
//! # Async Commands
//!
//! `powers refresh` drives the tick-paced fetch chain, which is async. It
//! builds a tokio runtime and blocks on the chain from the sync context.

mod completion;
mod config_cmd;
mod delete;
mod dump;
mod get;
mod import;
mod keys;
mod powers;
mod set;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use config_cmd::{path as config_path, show as config_show};
pub use delete::delete;
pub use dump::dump;
pub use get::get;
pub use import::{import, parse_mapping};
pub use keys::keys;
pub use powers::{parse as powers_parse, refresh as powers_refresh, show as powers_show};
pub use set::{read_value, set};

use crate::cli::args::{Command, ConfigAction, PowersAction};
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Get { path } => get::get(ctx, &path),
        Command::Set {
            path,
            value,
            string,
        } => set::set(ctx, &path, &value, string),
        Command::Delete { path } => delete::delete(ctx, &path),
        Command::Keys { path } => keys::keys(ctx, path.as_deref()),
        Command::Dump => dump::dump(ctx),
        Command::Import { source, mappings } => import::import(ctx, &source, &mappings),
        Command::Powers { action } => match action {
            PowersAction::Parse { file, json } => powers::parse(ctx, &file, json),
            PowersAction::Refresh {
                capture_dir,
                list,
                names,
                interval_ms,
                per_tick,
            } => powers::refresh(
                ctx,
                &capture_dir,
                list.as_deref(),
                names,
                interval_ms,
                per_tick,
            ),
            PowersAction::Show { name, json } => powers::show(ctx, name.as_deref(), json),
        },
        Command::Config { action } => match action {
            ConfigAction::Path => config_cmd::path(ctx),
            ConfigAction::Show => config_cmd::show(ctx),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}

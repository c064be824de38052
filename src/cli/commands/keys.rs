//! keys command - List the keys of a table

use crate::cli::Context;
use crate::core::path::DottedPath;
use anyhow::{bail, Context as _, Result};

/// Print the child keys of the table at `path`, or of the root.
///
/// Outputs nothing (exit 0) for an empty table.
pub fn keys(ctx: &Context, path: Option<&str>) -> Result<()> {
    let path = match path {
        Some(p) => DottedPath::parse(p).context("Invalid path")?.to_string(),
        None => String::new(),
    };
    let store = ctx.open_store();

    if !path.is_empty() && !store.contains(&path) {
        bail!("'{}' not found", path);
    }
    let Some(keys) = store.keys(&path) else {
        bail!("'{}' is not a table", path);
    };
    for key in keys {
        println!("{}", key);
    }
    Ok(())
}

//! delete command - Remove the value at a dotted path

use crate::cli::Context;
use crate::core::path::DottedPath;
use crate::ui::output;
use anyhow::{bail, Context as _, Result};

/// Remove the value at `path` and save.
pub fn delete(ctx: &Context, path: &str) -> Result<()> {
    let path = DottedPath::parse(path).context("Invalid path")?;
    let mut store = ctx.open_store();

    let Some(removed) = store.delete(&path.to_string()) else {
        bail!("'{}' not found", path);
    };
    ctx.save_store(&store)?;

    output::print(format!("Deleted {} ({})", path, removed.kind()), ctx.verbosity);
    Ok(())
}

//! get command - Print the value at a dotted path

use crate::cli::Context;
use crate::core::path::DottedPath;
use crate::ui::output;
use anyhow::{bail, Context as _, Result};

/// Print the value stored at `path`.
///
/// Fails with "not found" if nothing is stored there.
pub fn get(ctx: &Context, path: &str) -> Result<()> {
    let path = DottedPath::parse(path).context("Invalid path")?;
    let store = ctx.open_store();

    let Some(value) = store.get_path(&path) else {
        bail!("'{}' not found", path);
    };

    let text = output::format_value(value).context("Could not serialize value")?;
    println!("{}", text);
    Ok(())
}

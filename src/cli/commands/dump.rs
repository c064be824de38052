//! dump command - Print the whole store

use crate::cli::Context;
use anyhow::{Context as _, Result};

/// Print the store in its persisted file format.
pub fn dump(ctx: &Context) -> Result<()> {
    let store = ctx.open_store();
    let text = store.to_literal().context("Could not serialize store")?;
    print!("{}", text);
    Ok(())
}

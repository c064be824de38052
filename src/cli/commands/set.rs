//! set command - Store a value at a dotted path

use crate::cli::Context;
use crate::core::literal;
use crate::core::path::DottedPath;
use crate::core::value::Value;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Store `value` at `path` and save.
pub fn set(ctx: &Context, path: &str, value: &str, as_string: bool) -> Result<()> {
    let path = DottedPath::parse(path).context("Invalid path")?;
    let value = if as_string {
        Value::from(value)
    } else {
        read_value(value)
    };

    let mut store = ctx.open_store();
    output::debug(format!("{} <- {}", path, value.kind()), ctx.verbosity);
    store.set_path(&path, value);
    ctx.save_store(&store)?;

    output::print(format!("Set {}", path), ctx.verbosity);
    Ok(())
}

/// Read a command-line value as a literal, falling back to a plain string.
///
/// ```
/// use dotdb::cli::commands::read_value;
/// use dotdb::core::value::Value;
///
/// assert_eq!(read_value("42"), Value::Int(42));
/// assert_eq!(read_value("\"42\""), Value::from("42"));
/// assert_eq!(read_value("Fire Ball"), Value::from("Fire Ball"));
/// ```
pub fn read_value(text: &str) -> Value {
    literal::parse(text).unwrap_or_else(|_| Value::from(text))
}

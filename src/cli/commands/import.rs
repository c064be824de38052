//! import command - Copy top-level keys from another store file

use std::path::Path;

use crate::cli::Context;
use crate::ui::output;
use anyhow::{anyhow, Context as _, Result};

/// Import `mappings` (`OLD=NEW.PATH`) from `source` and save.
pub fn import(ctx: &Context, source: &Path, mappings: &[String]) -> Result<()> {
    let mapping = mappings
        .iter()
        .map(|m| parse_mapping(m))
        .collect::<Result<Vec<_>>>()?;

    let mut store = ctx.open_store();
    let report = store
        .import(source, &mapping)
        .with_context(|| format!("Failed to import from '{}'", source.display()))?;

    if !report.copied.is_empty() {
        ctx.save_store(&store)?;
    }

    for (old, new) in &report.copied {
        output::print(format!("copied  {} -> {}", old, new), ctx.verbosity);
    }
    for old in &report.skipped {
        output::print(format!("skipped {} (not in source)", old), ctx.verbosity);
    }
    Ok(())
}

/// Split an `OLD=NEW.PATH` argument.
///
/// ```
/// use dotdb::cli::commands::parse_mapping;
///
/// assert_eq!(
///     parse_mapping("hp=char.stats.hp").unwrap(),
///     ("hp".to_string(), "char.stats.hp".to_string())
/// );
/// assert!(parse_mapping("hp").is_err());
/// ```
pub fn parse_mapping(arg: &str) -> Result<(String, String)> {
    let (old, new) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid mapping '{}': expected OLD=NEW.PATH", arg))?;
    if old.is_empty() {
        return Err(anyhow!("Invalid mapping '{}': empty source key", arg));
    }
    Ok((old.to_string(), new.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_splits_on_first_equals() {
        assert_eq!(
            parse_mapping("a=b.c=d").unwrap(),
            ("a".to_string(), "b.c=d".to_string())
        );
    }

    #[test]
    fn mapping_needs_source_key() {
        assert!(parse_mapping("=x").is_err());
    }
}

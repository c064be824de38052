//! powers command - Parse, fetch and show power help blocks
//!
//! # Example
//!
//! ```bash
//! # Parse a single captured block
//! dotdb powers parse captures/Heal.txt
//!
//! # Fetch every power named in a captured list, one per tick
//! dotdb powers refresh captures/ --list captures/powers.txt
//!
//! # Show what is stored
//! dotdb powers show
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::cli::Context;
use crate::core::config::Config;
use crate::scrape::fetch::{FetchOptions, Fetcher};
use crate::scrape::power::{parse_power_block, parse_power_list, PowerRecord};
use crate::scrape::replay::ReplayHost;
use crate::scrape::Catalog;
use crate::ui::output;
use anyhow::{bail, Context as _, Result};

/// Parse one help block file and print the record.
pub fn parse(ctx: &Context, file: &Path, json: bool) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read '{}'", file.display()))?;
    let record = parse_power_block(&text)
        .with_context(|| format!("Failed to parse '{}'", file.display()))?;

    print_records(ctx, &[record], json)
}

/// Fetch blocks from a capture directory, store the records and save.
pub fn refresh(
    ctx: &Context,
    capture_dir: &Path,
    list: Option<&Path>,
    mut names: Vec<String>,
    interval_ms: Option<u64>,
    per_tick: Option<u64>,
) -> Result<()> {
    if !capture_dir.is_dir() {
        bail!("Capture directory '{}' not found", capture_dir.display());
    }

    if let Some(list) = list {
        let text = fs::read_to_string(list)
            .with_context(|| format!("Failed to read '{}'", list.display()))?;
        for name in parse_power_list(&text) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    if names.is_empty() {
        bail!("No power names given; pass names or --list");
    }

    let options = fetch_options(&ctx.config, interval_ms, per_tick);
    let host = ReplayHost::new(capture_dir, &options.command);
    let fetcher = Fetcher::new(options);
    output::debug(
        format!("fetching {} powers from {}", names.len(), capture_dir.display()),
        ctx.verbosity,
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
    let report = runtime.block_on(fetcher.run(&host, names));

    let catalog = catalog(&ctx.config)?;
    let mut store = ctx.open_store();
    catalog
        .store_all(&mut store, &report.records)
        .context("Failed to store records")?;
    if !report.records.is_empty() {
        ctx.save_store(&store)?;
    }

    for (name, reason) in &report.missed {
        output::warn(format!("missed {}: {}", name, reason), ctx.verbosity);
    }
    if !report.records.is_empty() {
        output::print(output::format_records(&report.records), ctx.verbosity);
    }
    output::print(
        format!(
            "Stored {} powers under '{}' ({} missed)",
            report.records.len(),
            catalog.root(),
            report.missed.len()
        ),
        ctx.verbosity,
    );
    Ok(())
}

/// Print stored records, or the one matching `name`.
pub fn show(ctx: &Context, name: Option<&str>, json: bool) -> Result<()> {
    let catalog = catalog(&ctx.config)?;
    let store = ctx.open_store();

    let records = match name {
        Some(name) => match catalog.find(&store, name) {
            Some(record) => vec![record],
            None => bail!("Power '{}' not found", name),
        },
        None => catalog.load_records(&store),
    };

    print_records(ctx, &records, json)
}

fn catalog(config: &Config) -> Result<Catalog> {
    Catalog::new(config.powers_root()).context("Invalid powers root")
}

/// Config values with command-line overrides applied.
fn fetch_options(config: &Config, interval_ms: Option<u64>, per_tick: Option<u64>) -> FetchOptions {
    FetchOptions {
        interval: interval_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| config.fetch_interval()),
        per_tick: per_tick
            .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
            .unwrap_or_else(|| config.per_tick()),
        command: config.fetch_command().to_string(),
    }
}

fn print_records(ctx: &Context, records: &[PowerRecord], json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(records).context("Failed to render JSON")?;
        println!("{}", text);
    } else if records.is_empty() {
        output::print("No powers stored", ctx.verbosity);
    } else {
        println!("{}", output::format_records(records));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_config() {
        let config = Config::default();

        let options = fetch_options(&config, Some(50), Some(3));
        assert_eq!(options.interval, Duration::from_millis(50));
        assert_eq!(options.per_tick, 3);

        let options = fetch_options(&config, None, None);
        assert_eq!(options, FetchOptions::default());
    }
}

//! config command - Show configuration location and values

use crate::cli::Context;
use crate::core::config::{Config, FetchConfig, GlobalConfig, PowersConfig};
use anyhow::{Context as _, Result};

/// Print the config file in use, or where one would be read from.
pub fn path(ctx: &Context) -> Result<()> {
    match ctx.config.loaded_from() {
        Some(path) => println!("{}", path.display()),
        None => {
            let path = Config::default_config_path().context("Failed to locate config")?;
            println!("{} (not present)", path.display());
        }
    }
    Ok(())
}

/// Print the effective configuration as TOML.
pub fn show(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    let effective = GlobalConfig {
        store: Some(ctx.store_path.clone()),
        fetch: Some(FetchConfig {
            interval_ms: Some(config.fetch_interval().as_millis() as u64),
            per_tick: Some(config.per_tick()),
            command: Some(config.fetch_command().to_string()),
        }),
        powers: Some(PowersConfig {
            root: Some(config.powers_root().to_string()),
        }),
    };

    let text = toml::to_string(&effective).context("Failed to render config")?;
    print!("{}", text);
    Ok(())
}

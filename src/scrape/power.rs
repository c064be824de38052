//! scrape::power
//!
//! Parsing of power help blocks and power lists.
//!
//! # Block Format
//!
//! A help block is a run of `Label: value` lines. Labels are
//! case-insensitive and unknown labels are ignored:
//!
//! ```text
//! Power:    Fire Ball
//! Alias:    fb
//! Recharge: 2 minutes 30 seconds
//! Status:   Ready
//! ```
//!
//! | Label                 | Field              | When missing |
//! |-----------------------|--------------------|--------------|
//! | `Power` / `Name`      | `name`             | error        |
//! | `Alias`               | `alias`            | `None`       |
//! | `Recharge`/`Cooldown` | `recharge_seconds` | `0`          |
//! | `Status` / `State`    | `is_ready`         | `true`       |
//!
//! # Example
//!
//! ```
//! use dotdb::scrape::power::parse_power_block;
//!
//! let record = parse_power_block("Power: Heal\nAlias: hl\nRecharge: 1m30s\nStatus: Recharging").unwrap();
//! assert_eq!(record.name, "Heal");
//! assert_eq!(record.alias.as_deref(), Some("hl"));
//! assert_eq!(record.recharge_seconds, 90);
//! assert!(!record.is_ready);
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::text::{clean, squeeze};

/// `Label: value` lines.
static FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z][A-Za-z ]*?)\s*:\s*(.*?)\s*$").unwrap());

/// One `<count> <unit>` term of a recharge time.
static TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(hours?|hrs?|h|minutes?|mins?|m|seconds?|secs?|s)").unwrap()
});

/// Text allowed between recharge terms.
static FILLER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^(\s|,|and)*$").unwrap());

/// Bullet lines of a power list, with an optional trailing `(alias)`.
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*•]\s+(.+?)(?:\s*\([^)]*\))?\s*$").unwrap());

/// Errors from scraping help text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScrapeError {
    #[error("help block is empty")]
    EmptyBlock,

    #[error("help block has no power name")]
    MissingName,

    #[error("cannot read recharge time '{0}'")]
    InvalidRecharge(String),
}

/// One power as described by its help block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerRecord {
    pub name: String,
    pub alias: Option<String>,
    pub recharge_seconds: u64,
    pub is_ready: bool,
}

impl PowerRecord {
    /// A ready power with no alias and no recharge.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            recharge_seconds: 0,
            is_ready: true,
        }
    }
}

/// Parse one help block into a record.
///
/// # Errors
///
/// - [`ScrapeError::EmptyBlock`] if the text has no content
/// - [`ScrapeError::MissingName`] if there is no `Power`/`Name` line
/// - [`ScrapeError::InvalidRecharge`] if the recharge time is unreadable
pub fn parse_power_block(text: &str) -> Result<PowerRecord, ScrapeError> {
    let text = clean(text);
    if text.trim().is_empty() {
        return Err(ScrapeError::EmptyBlock);
    }

    let mut name = None;
    let mut alias = None;
    let mut recharge_seconds = 0;
    let mut is_ready = true;

    for line in text.lines() {
        let Some(caps) = FIELD.captures(line) else {
            continue;
        };
        let value = &caps[2];
        match caps[1].to_ascii_lowercase().as_str() {
            "power" | "name" => {
                let squeezed = squeeze(value);
                if !squeezed.is_empty() {
                    name = Some(squeezed);
                }
            }
            "alias" => alias = parse_alias(value),
            "recharge" | "cooldown" => recharge_seconds = parse_recharge(value)?,
            "status" | "state" => is_ready = parse_ready(value),
            _ => {}
        }
    }

    Ok(PowerRecord {
        name: name.ok_or(ScrapeError::MissingName)?,
        alias,
        recharge_seconds,
        is_ready,
    })
}

fn parse_alias(value: &str) -> Option<String> {
    let alias = squeeze(value);
    match alias.to_ascii_lowercase().as_str() {
        "" | "none" | "-" => None,
        _ => Some(alias),
    }
}

fn parse_ready(value: &str) -> bool {
    let status = value.trim().to_ascii_lowercase();
    status.starts_with("ready") || status.starts_with("available")
}

/// Parse a recharge time into seconds.
///
/// Accepts sums of `<n> <unit>` terms (`2 minutes 30 seconds`, `1h30m`,
/// `1 hour, 5 mins and 3 secs`), a bare number of seconds, and
/// `none`/`instant`/`-` for zero.
///
/// # Example
///
/// ```
/// use dotdb::scrape::power::parse_recharge;
///
/// assert_eq!(parse_recharge("2 minutes 30 seconds").unwrap(), 150);
/// assert_eq!(parse_recharge("1h30m").unwrap(), 5400);
/// assert_eq!(parse_recharge("45").unwrap(), 45);
/// assert_eq!(parse_recharge("none").unwrap(), 0);
/// assert!(parse_recharge("soon").is_err());
/// ```
pub fn parse_recharge(value: &str) -> Result<u64, ScrapeError> {
    let trimmed = value.trim();
    let invalid = || ScrapeError::InvalidRecharge(trimmed.to_string());

    match trimmed.to_ascii_lowercase().as_str() {
        "" | "none" | "instant" | "-" => return Ok(0),
        _ => {}
    }
    if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed.parse().map_err(|_| invalid());
    }

    let mut total: u64 = 0;
    let mut last_end = 0;
    let mut terms = 0;
    for caps in TERM.captures_iter(trimmed) {
        let Some(whole) = caps.get(0) else { continue };
        if !FILLER.is_match(&trimmed[last_end..whole.start()]) {
            return Err(invalid());
        }
        last_end = whole.end();
        terms += 1;

        let count: u64 = caps[1].parse().map_err(|_| invalid())?;
        let unit = match caps[2].to_ascii_lowercase().chars().next() {
            Some('h') => 3600,
            Some('m') => 60,
            _ => 1,
        };
        total = count
            .checked_mul(unit)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(invalid)?;
    }

    if terms == 0 || !FILLER.is_match(&trimmed[last_end..]) {
        return Err(invalid());
    }
    Ok(total)
}

/// Power names from the bullet lines of a list, in order, without repeats.
pub fn parse_power_list(text: &str) -> Vec<String> {
    let text = clean(text);
    let mut names: Vec<String> = Vec::new();
    for line in text.lines() {
        if let Some(caps) = BULLET.captures(line) {
            let name = squeeze(&caps[1]);
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_block() {
        let record = parse_power_block(
            "Power:    Fire Ball\nAlias:    fb\nRecharge: 2 minutes 30 seconds\nStatus:   Ready\n",
        )
        .unwrap();

        assert_eq!(
            record,
            PowerRecord {
                name: "Fire Ball".to_string(),
                alias: Some("fb".to_string()),
                recharge_seconds: 150,
                is_ready: true,
            }
        );
    }

    #[test]
    fn labels_are_case_insensitive_and_synonyms_work() {
        let record =
            parse_power_block("NAME: Heal\ncooldown: 90s\nSTATE: recharging (12s left)").unwrap();
        assert_eq!(record.name, "Heal");
        assert_eq!(record.recharge_seconds, 90);
        assert!(!record.is_ready);
    }

    #[test]
    fn defaults_for_missing_fields() {
        let record = parse_power_block("Power: Blink").unwrap();
        assert_eq!(record, PowerRecord::new("Blink"));
    }

    #[test]
    fn alias_none_is_absent() {
        let record = parse_power_block("Power: Blink\nAlias: none").unwrap();
        assert!(record.alias.is_none());
    }

    #[test]
    fn colors_and_noise_are_ignored() {
        let text = "\x1b[33m--- Help ---\x1b[0m\r\n\x1b[1mPower:\x1b[0m Shield\r\nA shimmering barrier.\r\nStatus: Available\r\n";
        let record = parse_power_block(text).unwrap();
        assert_eq!(record.name, "Shield");
        assert!(record.is_ready);
    }

    #[test]
    fn missing_name_is_error() {
        assert_eq!(
            parse_power_block("Alias: fb\nStatus: Ready"),
            Err(ScrapeError::MissingName)
        );
        assert_eq!(
            parse_power_block("Power:   \nAlias: fb"),
            Err(ScrapeError::MissingName)
        );
    }

    #[test]
    fn empty_block_is_error() {
        assert_eq!(parse_power_block("  \n \n"), Err(ScrapeError::EmptyBlock));
    }

    #[test]
    fn bad_recharge_is_error() {
        assert!(matches!(
            parse_power_block("Power: X\nRecharge: whenever"),
            Err(ScrapeError::InvalidRecharge(_))
        ));
    }

    #[test]
    fn recharge_forms() {
        assert_eq!(parse_recharge("30 seconds").unwrap(), 30);
        assert_eq!(parse_recharge("1 second").unwrap(), 1);
        assert_eq!(parse_recharge("5 mins").unwrap(), 300);
        assert_eq!(parse_recharge("2 hours").unwrap(), 7200);
        assert_eq!(parse_recharge("1h 2m 3s").unwrap(), 3723);
        assert_eq!(parse_recharge("1 hour, 5 minutes and 3 seconds").unwrap(), 3903);
        assert_eq!(parse_recharge("10S").unwrap(), 10);
        assert_eq!(parse_recharge("instant").unwrap(), 0);
        assert_eq!(parse_recharge("-").unwrap(), 0);
        assert_eq!(parse_recharge("").unwrap(), 0);
    }

    #[test]
    fn recharge_rejects_stray_text() {
        assert!(parse_recharge("5 mango").is_err());
        assert!(parse_recharge("about 5 minutes").is_err());
        assert!(parse_recharge("5 minutes-ish").is_err());
        assert!(parse_recharge("2.5 minutes").is_err());
    }

    #[test]
    fn recharge_overflow_is_error() {
        assert!(parse_recharge("99999999999999999999 hours").is_err());
        assert!(parse_recharge("5124095576030432 hours").is_err());
    }

    #[test]
    fn list_parsing() {
        let text = "Your powers:\n  - Fire Ball (fb)\n  * Heal\n  • Shield  \n  - Heal\nTotal: 3\n";
        assert_eq!(parse_power_list(text), vec!["Fire Ball", "Heal", "Shield"]);
    }

    #[test]
    fn list_without_bullets_is_empty() {
        assert!(parse_power_list("nothing to see here").is_empty());
    }
}

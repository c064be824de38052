//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag. Results go
//! to stdout; warnings, errors and debug lines go to stderr.

use std::fmt::Display;

use crate::core::literal::{dump, DumpError};
use crate::core::value::Value;
use crate::scrape::power::PowerRecord;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Format a stored value: scalars as plain text, tables as literals.
pub fn format_value(value: &Value) -> Result<String, DumpError> {
    match value {
        Value::Str(s) => Ok(s.clone()),
        Value::Table(_) | Value::Float(_) => dump(value),
        Value::Int(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
    }
}

/// Format seconds as `1h2m3s`, dropping zero parts (`0s` for zero).
pub fn format_recharge(seconds: u64) -> String {
    if seconds == 0 {
        return "0s".to_string();
    }

    let (hours, minutes, secs) = (seconds / 3600, seconds % 3600 / 60, seconds % 60);
    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    if secs > 0 {
        out.push_str(&format!("{}s", secs));
    }
    out
}

/// Format power records as an aligned table.
pub fn format_records(records: &[PowerRecord]) -> String {
    const HEADERS: [&str; 4] = ["NAME", "ALIAS", "RECHARGE", "STATUS"];

    let rows: Vec<[String; 4]> = records
        .iter()
        .map(|r| {
            [
                r.name.clone(),
                r.alias.clone().unwrap_or_else(|| "-".to_string()),
                format_recharge(r.recharge_seconds),
                if r.is_ready { "ready" } else { "recharging" }.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 4]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    std::iter::once(line(HEADERS))
        .chain(rows.iter().map(|row| line(row.each_ref().map(String::as_str))))
        .collect::<Vec<_>>()
        .join("\n")
}

//! scrape::text
//!
//! Small string helpers for captured host output.

use std::sync::LazyLock;

use regex::Regex;

/// ANSI CSI sequences (colors, cursor movement).
static ANSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").unwrap());

/// Remove ANSI escape sequences and carriage returns.
pub fn clean(text: &str) -> String {
    ANSI.replace_all(text, "").replace('\r', "")
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn squeeze(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive equality after squeezing whitespace.
pub fn same_name(a: &str, b: &str) -> bool {
    squeeze(a).eq_ignore_ascii_case(&squeeze(b))
}

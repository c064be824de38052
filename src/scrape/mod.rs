//! scrape
//!
//! Power help-text scraping.
//!
//! # Modules
//!
//! - [`power`] - Parsing help blocks and power lists into records
//! - [`catalog`] - Records kept in a path store
//! - [`fetch`] - Tick-paced sequential fetch over a host
//! - [`host`] - The host trait
//! - [`mock`] - In-memory host for tests
//! - [`replay`] - Host serving captured blocks from disk
//! - [`text`] - Cleanup helpers for host output

pub mod catalog;
pub mod fetch;
pub mod host;
pub mod mock;
pub mod power;
pub mod replay;
pub mod text;

pub use catalog::Catalog;
pub use fetch::{FetchCursor, FetchOptions, FetchReport, FetchState, Fetcher, MissReason};
pub use host::{Host, HostError};
pub use power::{parse_power_block, parse_power_list, parse_recharge, PowerRecord, ScrapeError};

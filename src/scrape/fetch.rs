//! scrape::fetch
//!
//! Sequential, tick-paced fetch of many power help blocks.
//!
//! # Design
//!
//! A [`FetchCursor`] owns the queue of names and an index into it. The
//! [`Fetcher`] drives the cursor from a tokio interval: every tick it takes
//! the next batch (one name by default), sends one command per name and
//! waits at most one interval for each answer. Silence, host errors and
//! unreadable blocks are recorded as misses and the cursor moves on. There
//! are no retries.
//!
//! ```text
//! Idle --start--> Fetching(0) --advance--> Fetching(n) ... --> Done
//!   \--start (empty queue)------------------------------------> Done
//! ```
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use dotdb::scrape::fetch::{FetchOptions, Fetcher};
//! use dotdb::scrape::mock::{MockHost, MockResponse};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let host = MockHost::new()
//!     .respond("help Heal", MockResponse::Block("Power: Heal".into()));
//! let fetcher = Fetcher::new(FetchOptions {
//!     interval: Duration::from_millis(10),
//!     ..FetchOptions::default()
//! });
//!
//! let report = fetcher.run(&host, vec!["Heal".to_string(), "Blink".to_string()]).await;
//! assert_eq!(report.records.len(), 1);
//! assert_eq!(report.missed.len(), 1);
//! # });
//! ```

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use super::host::{Host, HostError};
use super::power::{parse_power_block, PowerRecord, ScrapeError};
use crate::core::config::{DEFAULT_COMMAND, DEFAULT_INTERVAL_MS, NAME_PLACEHOLDER};

/// Position of a fetch cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    /// Not started.
    Idle,
    /// Next name to dispatch is at this index.
    Fetching(usize),
    /// Every name has been dispatched.
    Done,
}

impl fmt::Display for FetchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchState::Idle => write!(f, "idle"),
            FetchState::Fetching(i) => write!(f, "fetching #{}", i),
            FetchState::Done => write!(f, "done"),
        }
    }
}

/// Queue of names plus the index of the next one to fetch.
#[derive(Debug, Clone)]
pub struct FetchCursor {
    names: Vec<String>,
    state: FetchState,
}

impl FetchCursor {
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            state: FetchState::Idle,
        }
    }

    /// Leave `Idle`. An empty queue goes straight to `Done`.
    pub fn start(&mut self) {
        if self.state == FetchState::Idle {
            self.state = if self.names.is_empty() {
                FetchState::Done
            } else {
                FetchState::Fetching(0)
            };
        }
    }

    /// Take the next `batch` names (at least one), starting the cursor if
    /// needed. Returns an empty slice once `Done`.
    pub fn advance(&mut self, batch: usize) -> &[String] {
        self.start();
        let FetchState::Fetching(index) = self.state else {
            return &[];
        };

        let end = index.saturating_add(batch.max(1)).min(self.names.len());
        self.state = if end == self.names.len() {
            FetchState::Done
        } else {
            FetchState::Fetching(end)
        };
        &self.names[index..end]
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == FetchState::Done
    }

    /// Names not yet dispatched.
    pub fn remaining(&self) -> usize {
        match self.state {
            FetchState::Idle => self.names.len(),
            FetchState::Fetching(i) => self.names.len() - i,
            FetchState::Done => 0,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Why a name produced no record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MissReason {
    #[error("no answer within {0:?}")]
    Timeout(Duration),

    #[error("host produced no block")]
    NoResponse,

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Parse(#[from] ScrapeError),
}

/// Outcome of one fetch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Parsed records, in dispatch order
    pub records: Vec<PowerRecord>,
    /// Names that produced no record
    pub missed: Vec<(String, MissReason)>,
}

impl FetchReport {
    /// True if every name produced a record.
    pub fn is_complete(&self) -> bool {
        self.missed.is_empty()
    }
}

/// Fetch pacing and command shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Time between ticks, and the bound on each request
    pub interval: Duration,
    /// Names dispatched per tick
    pub per_tick: usize,
    /// Command template containing `{name}`
    pub command: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            per_tick: 1,
            command: DEFAULT_COMMAND.to_string(),
        }
    }
}

impl FetchOptions {
    /// The command that asks for `name`.
    pub fn command_for(&self, name: &str) -> String {
        self.command.replace(NAME_PLACEHOLDER, name)
    }
}

/// Drives a [`FetchCursor`] against a [`Host`].
#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    options: FetchOptions,
}

impl Fetcher {
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Fetch every name, one batch per tick, until the cursor is done.
    ///
    /// The first batch goes out immediately.
    pub async fn run(&self, host: &dyn Host, names: Vec<String>) -> FetchReport {
        let mut cursor = FetchCursor::new(names);
        let mut report = FetchReport::default();
        cursor.start();

        let mut ticker = time::interval(self.options.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !cursor.is_done() {
            ticker.tick().await;
            let batch = cursor.advance(self.options.per_tick).to_vec();
            debug!(
                host = host.name(),
                batch = batch.len(),
                remaining = cursor.remaining(),
                "fetch tick"
            );

            for name in batch {
                match self.fetch_one(host, &name).await {
                    Ok(record) => report.records.push(record),
                    Err(reason) => {
                        debug!(name = %name, reason = %reason, "fetch missed");
                        report.missed.push((name, reason));
                    }
                }
            }
        }

        debug!(
            records = report.records.len(),
            missed = report.missed.len(),
            "fetch done"
        );
        report
    }

    async fn fetch_one(&self, host: &dyn Host, name: &str) -> Result<PowerRecord, MissReason> {
        let command = self.options.command_for(name);
        let interval = self.options.interval;

        let block = time::timeout(interval, host.request(&command))
            .await
            .map_err(|_| MissReason::Timeout(interval))??
            .ok_or(MissReason::NoResponse)?;

        Ok(parse_power_block(&block)?)
    }
}

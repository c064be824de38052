//! scrape::host
//!
//! The remote text host that answers help commands.
//!
//! # Design
//!
//! The `Host` trait is async because a real host answers over the network
//! some time after the command is sent. A host may stay silent, which is
//! reported as `Ok(None)` rather than an error. The fetcher bounds every
//! request with its own timeout, so implementations do not need one.
//!
//! # Example
//!
//! ```ignore
//! use dotdb::scrape::host::{Host, HostError};
//!
//! async fn ask(host: &dyn Host) -> Result<(), HostError> {
//!     if let Some(block) = host.request("help Fire Ball").await? {
//!         println!("{}", block);
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

/// Errors from host requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    /// The host is not connected.
    #[error("host disconnected")]
    Disconnected,

    /// The host rejected the command.
    #[error("command rejected: {0}")]
    Rejected(String),

    /// Reading the host's output failed.
    #[error("i/o error: {0}")]
    Io(String),
}

/// A text host that answers commands with blocks of output.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so the fetch loop can hold them
/// across await points.
#[async_trait]
pub trait Host: Send + Sync {
    /// Short host name for logs (e.g., "mock", "replay").
    fn name(&self) -> &'static str;

    /// Send one command and wait for its output block.
    ///
    /// Returns `Ok(None)` when the host produced nothing for the command.
    async fn request(&self, command: &str) -> Result<Option<String>, HostError>;
}

//! scrape::mock
//!
//! In-memory host for deterministic testing.
//!
//! # Design
//!
//! Responses are configured per command. Unknown commands get `Ok(None)`.
//! Every request is recorded with the (tokio) instant it arrived, so paused
//! clock tests can check the pacing of the fetch chain.
//!
//! # Example
//!
//! ```
//! use dotdb::scrape::mock::{MockHost, MockResponse};
//! use dotdb::scrape::host::Host;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let host = MockHost::new()
//!     .respond("help Heal", MockResponse::Block("Power: Heal".into()));
//!
//! let block = host.request("help Heal").await.unwrap();
//! assert_eq!(block.as_deref(), Some("Power: Heal"));
//! assert_eq!(host.commands(), vec!["help Heal"]);
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::time::Instant;

use super::host::{Host, HostError};

/// How the mock answers one command.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Answer with this block.
    Block(String),
    /// Answer with no block.
    Empty,
    /// Never answer.
    Silent,
    /// Fail with this error.
    Fail(HostError),
}

/// Recorded request for test verification.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub command: String,
    pub at: Instant,
}

/// Mock host for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MockHost {
    inner: Arc<Mutex<MockHostInner>>,
}

#[derive(Debug, Default)]
struct MockHostInner {
    responses: HashMap<String, MockResponse>,
    requests: Vec<MockRequest>,
}

impl MockHost {
    /// Create a mock host with no configured responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the response to `command`.
    pub fn respond(self, command: impl Into<String>, response: MockResponse) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.responses.insert(command.into(), response);
        }
        self
    }

    /// All recorded requests, in arrival order.
    pub fn requests(&self) -> Vec<MockRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.clone()
    }

    /// Commands of all recorded requests, in arrival order.
    pub fn commands(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner.requests.iter().map(|r| r.command.clone()).collect()
    }

    /// Clear recorded requests.
    pub fn clear_requests(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.clear();
    }

    fn record(&self, command: &str) -> Option<MockResponse> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(MockRequest {
            command: command.to_string(),
            at: Instant::now(),
        });
        inner.responses.get(command).cloned()
    }
}

#[async_trait]
impl Host for MockHost {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn request(&self, command: &str) -> Result<Option<String>, HostError> {
        match self.record(command) {
            Some(MockResponse::Block(block)) => Ok(Some(block)),
            Some(MockResponse::Empty) | None => Ok(None),
            Some(MockResponse::Silent) => std::future::pending().await,
            Some(MockResponse::Fail(e)) => Err(e),
        }
    }
}

//! scrape::replay
//!
//! Host that serves previously captured help blocks from a directory.
//!
//! The block for power `Fire Ball` lives in `<dir>/Fire Ball.txt`. The
//! command template (e.g. `help {name}`) is used in reverse to recover the
//! power name from each command.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::host::{Host, HostError};
use crate::core::config::NAME_PLACEHOLDER;

/// File extension of captured blocks.
pub const CAPTURE_EXTENSION: &str = "txt";

/// Replay host over a capture directory.
#[derive(Debug, Clone)]
pub struct ReplayHost {
    dir: PathBuf,
    prefix: String,
    suffix: String,
}

impl ReplayHost {
    /// Serve captures from `dir`, answering commands shaped like `template`.
    pub fn new(dir: impl Into<PathBuf>, template: &str) -> Self {
        let (prefix, suffix) = template
            .split_once(NAME_PLACEHOLDER)
            .unwrap_or((template, ""));
        Self {
            dir: dir.into(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Capture file for a power name.
    pub fn capture_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, CAPTURE_EXTENSION))
    }

    /// Power name addressed by `command`, if it matches the template.
    fn name_for<'c>(&self, command: &'c str) -> Option<&'c str> {
        let name = command
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())?;
        let plain = !name.is_empty()
            && !name.contains(['/', '\\'])
            && name != "."
            && name != "..";
        plain.then_some(name)
    }
}

#[async_trait]
impl Host for ReplayHost {
    fn name(&self) -> &'static str {
        "replay"
    }

    async fn request(&self, command: &str) -> Result<Option<String>, HostError> {
        let name = self
            .name_for(command)
            .ok_or_else(|| HostError::Rejected(command.to_string()))?;

        let path = self.capture_path(name);
        match fs::read_to_string(&path).await {
            Ok(block) => Ok(Some(block)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no capture");
                Ok(None)
            }
            Err(e) => Err(HostError::Io(format!("{}: {}", path.display(), e))),
        }
    }
}

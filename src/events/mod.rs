//! Mutation event log
//!
//! Every successful mutation is appended as one line of NDJSON. The log is a
//! local audit trail: failing to write it never fails the mutation.

pub mod types;

pub use types::{Event, EventType};

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;
use crate::paths::events_file;

/// Append-only NDJSON log at a fixed path
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The log under the configured state directory
    pub fn default_location() -> Self {
        Self::new(events_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an event, warning instead of failing
    pub fn record(&self, event: Event) {
        if let Err(e) = self.append(&event) {
            warn!(path = %self.path.display(), "failed to log event: {e}");
        }
    }

    /// Append an event as one JSON line.
    ///
    /// The file is opened with `O_APPEND`; concurrent writers interleave by
    /// whole lines for lines shorter than `PIPE_BUF`.
    pub fn append(&self, event: &Event) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let json = serde_json::to_string(event)?;
        writeln!(file, "{json}")?;
        file.flush()?;
        Ok(())
    }

    /// Read all events, oldest first.
    ///
    /// A missing file is an empty log. Lines that fail to parse are skipped
    /// with a warning.
    pub fn read(&self) -> Result<Vec<Event>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let mut events = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Event>(line) {
                Ok(event) => events.push(event),
                Err(e) => warn!("skipping malformed event on line {}: {e}", line_num + 1),
            }
        }

        Ok(events)
    }

    /// The newest `limit` events, oldest first
    pub fn tail(&self, limit: usize) -> Result<Vec<Event>> {
        let mut events = self.read()?;
        let skip = events.len().saturating_sub(limit);
        Ok(events.split_off(skip))
    }

    /// Remove the log file. Returns how many events it held.
    pub fn clear(&self) -> Result<usize> {
        if !self.path.exists() {
            return Ok(0);
        }
        let count = self.read()?.len();
        std::fs::remove_file(&self.path)?;
        Ok(count)
    }
}

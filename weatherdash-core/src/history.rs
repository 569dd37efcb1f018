//! Recent-search history.
//!
//! The file store is a plain JSON array of `{location, timestamp}` objects in
//! chronological order. It is rewritten in full on every append and holds at
//! most [`MAX_HISTORY`] entries. There is no locking; two processes writing at
//! once may lose one of the updates.

use chrono::{DateTime, FixedOffset, Local};
use std::{
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::{
    error::{DashboardError, Result},
    model::{Location, SearchRecord},
};

/// Number of searches kept.
pub const MAX_HISTORY: usize = 5;

pub trait HistoryStore: Send + Sync + Debug {
    /// Record a search made now.
    fn append(&self, location: &Location) -> Result<()>;

    /// All stored searches, oldest first.
    fn read_all(&self) -> Result<Vec<SearchRecord>>;
}

#[derive(Debug, Clone)]
pub struct JsonFileHistory {
    path: PathBuf,
}

impl JsonFileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record with an explicit timestamp, keeping only the newest entries.
    pub fn append_at(&self, location: &Location, timestamp: DateTime<FixedOffset>) -> Result<()> {
        let mut records = self.load()?;
        records.push(SearchRecord {
            location: location.as_str().to_string(),
            timestamp,
        });

        let overflow = records.len().saturating_sub(MAX_HISTORY);
        let records = records.split_off(overflow);

        self.store(&records)?;
        info!(path = %self.path.display(), entries = records.len(), "Saved search");
        Ok(())
    }

    fn load(&self) -> Result<Vec<SearchRecord>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No history file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error("read", e)),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            DashboardError::Persistence(format!(
                "History file {} is malformed: {e}",
                self.path.display()
            ))
        })
    }

    fn store(&self, records: &[SearchRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error("create directory for", e))?;
        }

        let json = serde_json::to_string(records)
            .map_err(|e| DashboardError::Persistence(format!("Failed to encode history: {e}")))?;

        fs::write(&self.path, json).map_err(|e| self.io_error("write", e))
    }

    fn io_error(&self, action: &str, e: io::Error) -> DashboardError {
        DashboardError::Persistence(format!(
            "Failed to {action} history file {}: {e}",
            self.path.display()
        ))
    }
}

impl HistoryStore for JsonFileHistory {
    fn append(&self, location: &Location) -> Result<()> {
        self.append_at(location, Local::now().fixed_offset())
    }

    fn read_all(&self) -> Result<Vec<SearchRecord>> {
        self.load()
    }
}

use thiserror::Error;

/// Failures surfaced by the dashboard.
///
/// Every variant is caught where it happens and turned into a message for the
/// user; none of them is meant to abort the process.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Missing credential or unreadable configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport error, non-success status or unparseable provider response.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Malformed history file or I/O failure while reading/writing it.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// User input rejected before any call was made.
    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

impl DashboardError {
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

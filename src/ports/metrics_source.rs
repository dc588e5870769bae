//! Metrics source port: Trait for loading the reference metrics table.
//!
//! The table is static data owned outside the engine (a bundled asset or a
//! file the operator points at).

use crate::domain::{PerformanceMetricsTable, Task};

/// Errors that can occur while loading a metrics table.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Failed to read metrics table {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed metrics table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Metrics table has no entry for task {0}")]
    MissingTask(Task),
}

/// Trait for suppliers of the performance metrics table.
pub trait MetricsSource: Send + Sync {
    /// Human-readable origin, for logs.
    fn describe(&self) -> String;

    /// Load the full table.
    ///
    /// # Errors
    /// Returns `MetricsError` if the table cannot be read or parsed.
    fn load(&self) -> Result<PerformanceMetricsTable, MetricsError>;
}

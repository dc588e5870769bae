//! Reference data adapter: Implementations of MetricsSource.
//!
//! Provides the bundled performance metrics table and demo patient records,
//! plus a loader for an operator-supplied JSON table.

use std::fs;
use std::path::PathBuf;

use crate::domain::{PerformanceMetricsTable, RawPatientRecord, Task};
use crate::ports::{MetricsError, MetricsSource};

/// Environment variable naming a JSON metrics table to use instead of the
/// bundled one.
pub const METRICS_FILE_ENV: &str = "PROGNOS_METRICS_FILE";

const BUNDLED_METRICS: &str = include_str!("../../data/performance_metrics.json");
const BUNDLED_PATIENTS: &str = include_str!("../../data/sample_patients.json");

/// Configuration for the metrics source.
#[derive(Debug, Clone, Default)]
pub struct MetricsConfig {
    /// Table file; `None` means the bundled table.
    pub path: Option<PathBuf>,
}

impl MetricsConfig {
    /// Load config overrides from environment (best-effort).
    ///
    /// Supported:
    /// - PROGNOS_METRICS_FILE
    #[must_use]
    pub fn from_env_or_default() -> Self {
        let path = std::env::var(METRICS_FILE_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self { path }
    }

    /// Apply an explicit path (e.g. a command-line flag) over the loaded one.
    #[must_use]
    pub fn with_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.path = path;
        }
        self
    }

    /// Build the configured source.
    #[must_use]
    pub fn into_source(self) -> Box<dyn MetricsSource> {
        match self.path {
            Some(path) => Box::new(JsonFileMetrics::new(path)),
            None => Box::new(BundledMetrics),
        }
    }
}

/// Every task must be present; models within a task are free-form.
fn check_complete(table: PerformanceMetricsTable) -> Result<PerformanceMetricsTable, MetricsError> {
    match Task::ALL.into_iter().find(|t| !table.has_task(*t)) {
        Some(missing) => Err(MetricsError::MissingTask(missing)),
        None => Ok(table),
    }
}

/// The metrics table shipped with the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledMetrics;

impl MetricsSource for BundledMetrics {
    fn describe(&self) -> String {
        "bundled reference table".to_string()
    }

    fn load(&self) -> Result<PerformanceMetricsTable, MetricsError> {
        check_complete(serde_json::from_str(BUNDLED_METRICS)?)
    }
}

/// A metrics table read from a JSON file on every `load`.
#[derive(Debug, Clone)]
pub struct JsonFileMetrics {
    path: PathBuf,
}

impl JsonFileMetrics {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MetricsSource for JsonFileMetrics {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<PerformanceMetricsTable, MetricsError> {
        let text = fs::read_to_string(&self.path).map_err(|source| MetricsError::Read {
            path: self.describe(),
            source,
        })?;
        check_complete(serde_json::from_str(&text)?)
    }
}

/// Demo patient records shipped with the crate.
///
/// # Errors
/// Returns a parse error only if the bundled asset is corrupt.
pub fn sample_patients() -> Result<Vec<RawPatientRecord>, serde_json::Error> {
    serde_json::from_str(BUNDLED_PATIENTS)
}

//! Adapters layer: Concrete implementations of ports.
//!
//! - `rng`: ChaCha20 and scripted random sources
//! - `reference_data`: bundled and file-backed metrics tables, demo patients
//! - `sanitize`: patient-value filtering for logs

pub mod reference_data;
pub mod rng;
pub mod sanitize;

pub use reference_data::{sample_patients, BundledMetrics, JsonFileMetrics, MetricsConfig};
pub use rng::{ChaChaSource, FixedSource, RngConfig, SequenceSource};

//! # Prognos
//!
//! Clinical risk inference and multi-model comparison engine.
//!
//! This crate provides:
//! - Validation of raw patient records against physiological bounds
//! - Rule-based composite mortality risk scoring
//! - Simulated outputs of four named models for three prediction tasks
//! - Best-model selection and chart views over a reference metrics table
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (Patient, Risk, Predictions, Metrics)
//! - `ports`: Trait definitions for external dependencies (randomness, metrics)
//! - `adapters`: Concrete implementations (ChaCha20, bundled data, log sanitizing)
//! - `application`: Use cases orchestrating domain and ports

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use domain::{Assessment, ModelName, PatientObservation, PredictionSet, RiskLevel, Task};

/// Result type for Prognos operations
pub type Result<T> = std::result::Result<T, PrognosError>;

/// Main error type for Prognos
#[derive(Debug, thiserror::Error)]
pub enum PrognosError {
    #[error("Invalid patient record: {0}")]
    Validation(domain::ValidationErrors),

    #[error("Metrics table unavailable: {0}")]
    Metrics(#[from] ports::MetricsError),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Random source unavailable")]
    RngUnavailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<domain::ValidationErrors> for PrognosError {
    fn from(errors: domain::ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

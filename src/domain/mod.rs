//! Domain layer: Core clinical types and logic.
//!
//! This module contains pure Rust types with no I/O.
//! All types are serializable and patient input is strictly validated.

mod metrics;
mod ordered;
mod patient;
mod prediction;
mod risk;
mod validation;

pub use metrics::{Metric, MetricSet, PerformanceMetricsTable};
pub use ordered::OrderedMap;
pub use patient::{
    AdmissionType, Comorbidities, FieldBound, Gender, PatientObservation, BINARY_FIELDS,
    NUMERIC_BOUNDS,
};
pub use prediction::{Assessment, ClassOutput, ModelName, PredictionSet, Task};
pub use risk::{RiskLevel, RiskScalar, StayOutlook};
pub use validation::{validate, RawPatientRecord, ValidationError, ValidationErrors};

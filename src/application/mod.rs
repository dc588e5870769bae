//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod aggregator;
mod prediction;
mod results;
mod scorer;
mod simulator;

pub use aggregator::{ChartRow, MetricsAggregator, RadarRow, TaskComparison};
pub use prediction::PredictionService;
pub use results::{ComparisonRow, ResultsView};
pub use scorer::{RiskScorer, ScoreBreakdown};
pub use simulator::{ModelProfile, ModelSimulator, StayJitter};

//! Ports layer: Trait definitions for external dependencies.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the engine and what it is handed from outside (randomness,
//! reference data).

mod metrics_source;
mod random;

pub use metrics_source::{MetricsError, MetricsSource};
pub use random::RandomSource;

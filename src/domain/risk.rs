//! Risk values derived from an observation.
//!
//! `RiskScalar` is the composite mortality risk that feeds the model
//! simulator; `RiskLevel` and `StayOutlook` are the display bands used by the
//! results view.

use serde::{Deserialize, Serialize};

/// Composite mortality risk, always within [`RiskScalar::MIN`, `RiskScalar::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskScalar(f64);

impl RiskScalar {
    pub const MIN: f64 = 0.01;
    pub const MAX: f64 = 0.95;

    /// Clamp a raw risk into the published range.
    ///
    /// NaN maps to `MIN`.
    #[must_use]
    pub fn clamped(raw: f64) -> Self {
        if raw.is_nan() {
            return Self(Self::MIN);
        }
        Self(raw.clamp(Self::MIN, Self::MAX))
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for RiskScalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// Mortality risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Below 25%
    Low,
    /// 25% up to (not including) 50%
    Moderate,
    /// 50% and above
    High,
}

impl RiskLevel {
    /// Band a mortality probability expressed in percent (0-100).
    ///
    /// Each band is closed at the bottom and open at the top.
    #[must_use]
    pub fn from_percent(percent: f64) -> Self {
        if percent < 25.0 {
            Self::Low
        } else if percent < 50.0 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - No significant indicators",
            Self::Moderate => "Moderate risk - Close monitoring recommended",
            Self::High => "High risk - Immediate clinical review advised",
        }
    }

    /// Badge color (hex).
    #[must_use]
    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "#22c55e",
            Self::Moderate => "#f59e0b",
            Self::High => "#ef4444",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Length-of-stay band shown next to the predicted day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StayOutlook {
    /// Up to two weeks
    Standard,
    /// More than 14 days
    Extended,
    /// More than 30 days
    Prolonged,
}

impl StayOutlook {
    #[must_use]
    pub fn from_days(days: u32) -> Self {
        if days > 30 {
            Self::Prolonged
        } else if days > 14 {
            Self::Extended
        } else {
            Self::Standard
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Standard => "Expected stay within two weeks",
            Self::Extended => "Extended stay expected",
            Self::Prolonged => "Prolonged stay expected - plan for discharge support",
        }
    }
}

//! Results projection for a single assessment.
//!
//! Turns a `PredictionSet` into what the results screen shows for the model
//! the user selected: headline mortality and stay, plus a comparison row per
//! model.

use serde::Serialize;

use crate::domain::{ModelName, PredictionSet, RiskLevel, StayOutlook};
use crate::PrognosError;

/// One row of the per-model comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub model: ModelName,
    pub label: &'static str,
    pub color: &'static str,
    /// Mortality percent, one decimal
    pub mortality: f64,
    /// Length of stay from the paired regression model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub los: Option<f64>,
}

/// Results screen content for one selected classification model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsView {
    pub selected: ModelName,
    pub mortality_percent: f64,
    pub risk_level: RiskLevel,
    pub risk_description: &'static str,
    pub risk_color: &'static str,
    /// Complement of `mortality_percent`, for the gauge
    pub survival_percent: f64,
    pub length_of_stay_days: u32,
    pub stay_outlook: StayOutlook,
    pub stay_description: &'static str,
    pub stay_unit: &'static str,
    pub comparison: Vec<ComparisonRow>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn comparison_label(model: ModelName) -> &'static str {
    match model {
        ModelName::LogisticRegression | ModelName::LinearRegression => "Log/Lin Reg",
        other => other.display_name(),
    }
}

impl ResultsView {
    /// Build the view for `selected`.
    ///
    /// # Errors
    /// Returns `PrognosError::UnknownModel` if `selected` has no
    /// classification output or its paired regression model has no stay.
    pub fn new(set: &PredictionSet, selected: ModelName) -> Result<Self, PrognosError> {
        let output = set
            .classification(selected)
            .ok_or_else(|| PrognosError::UnknownModel(selected.to_string()))?;
        let regressor = selected.regression_counterpart();
        let stay = set
            .length_of_stay(regressor)
            .ok_or_else(|| PrognosError::UnknownModel(regressor.to_string()))?;

        let mortality_percent = output.probability * 100.0;
        // Simulated stays are floored at 1 day.
        let length_of_stay_days = stay.round().max(0.0) as u32;

        let comparison = set
            .mortality_classification
            .iter()
            .map(|(model, out)| ComparisonRow {
                model: *model,
                label: comparison_label(*model),
                color: model.color(),
                mortality: round1(out.probability * 100.0),
                los: set.length_of_stay(model.regression_counterpart()),
            })
            .collect();

        let risk_level = RiskLevel::from_percent(mortality_percent);
        let stay_outlook = StayOutlook::from_days(length_of_stay_days);

        Ok(Self {
            selected,
            mortality_percent,
            risk_level,
            risk_description: risk_level.description(),
            risk_color: risk_level.color(),
            survival_percent: 100.0 - mortality_percent,
            length_of_stay_days,
            stay_outlook,
            stay_description: stay_outlook.description(),
            stay_unit: if length_of_stay_days == 1 { "day" } else { "days" },
            comparison,
        })
    }
}

//! Prediction result types.
//!
//! Represents the per-model outputs produced for one patient submission.

use serde::{Deserialize, Serialize};

use super::ordered::OrderedMap;
use super::patient::PatientObservation;
use super::risk::RiskScalar;

/// Names of the pseudo-models compared by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelName {
    RandomForest,
    Knn,
    Xgboost,
    /// Classification only
    LogisticRegression,
    /// Regression only
    LinearRegression,
}

impl ModelName {
    /// Models reporting the classification task, in display order.
    pub const CLASSIFIERS: [Self; 4] = [
        Self::RandomForest,
        Self::Knn,
        Self::Xgboost,
        Self::LogisticRegression,
    ];

    /// Models reporting the regression tasks, in display order.
    pub const REGRESSORS: [Self; 4] = [
        Self::RandomForest,
        Self::Knn,
        Self::Xgboost,
        Self::LinearRegression,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RandomForest => "random_forest",
            Self::Knn => "knn",
            Self::Xgboost => "xgboost",
            Self::LogisticRegression => "logistic_regression",
            Self::LinearRegression => "linear_regression",
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::RandomForest => "Random Forest",
            Self::Knn => "KNN",
            Self::Xgboost => "XGBoost",
            Self::LogisticRegression => "Logistic Regression",
            Self::LinearRegression => "Linear Regression",
        }
    }

    /// Short chart label: the key with its first underscore turned into a space.
    #[must_use]
    pub fn label(&self) -> String {
        self.as_str().replacen('_', " ", 1)
    }

    /// Series color (hex). Logistic and linear share one series.
    #[must_use]
    pub fn color(&self) -> &'static str {
        match self {
            Self::RandomForest => "#3b82f6",
            Self::Knn => "#10b981",
            Self::Xgboost => "#f59e0b",
            Self::LogisticRegression | Self::LinearRegression => "#8b5cf6",
        }
    }

    /// Model reporting the regression tasks for this classifier.
    ///
    /// The linear model stands in for the logistic one on regression targets.
    #[must_use]
    pub fn regression_counterpart(&self) -> Self {
        match self {
            Self::LogisticRegression => Self::LinearRegression,
            other => *other,
        }
    }
}

impl std::fmt::Display for ModelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModelName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::RandomForest,
            Self::Knn,
            Self::Xgboost,
            Self::LogisticRegression,
            Self::LinearRegression,
        ]
        .into_iter()
        .find(|m| m.as_str() == s)
        .ok_or_else(|| format!("unknown model '{s}'"))
    }
}

/// Prediction tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    MortalityClassification,
    MortalityRateRegression,
    LengthOfStayRegression,
}

impl Task {
    pub const ALL: [Self; 3] = [
        Self::MortalityClassification,
        Self::MortalityRateRegression,
        Self::LengthOfStayRegression,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MortalityClassification => "mortality_classification",
            Self::MortalityRateRegression => "mortality_rate_regression",
            Self::LengthOfStayRegression => "length_of_stay_regression",
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MortalityClassification => "Mortality Classification",
            Self::MortalityRateRegression => "Mortality Rate Regression",
            Self::LengthOfStayRegression => "Length of Stay Regression",
        }
    }

    #[must_use]
    pub fn is_classification(&self) -> bool {
        matches!(self, Self::MortalityClassification)
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Task {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown task '{s}'"))
    }
}

/// One model's mortality classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassOutput {
    /// Binary prediction (0 = survives, 1 = dies in hospital)
    pub class: u8,

    /// Reported probability. Not clamped: perturbation can push it slightly
    /// outside [0, 1].
    pub probability: f64,
}

/// Outputs of every pseudo-model for one submission.
///
/// Built whole by the simulator and replaced whole by the next submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSet {
    /// Risk the set was derived from
    pub risk: RiskScalar,

    /// Shared length-of-stay baseline before per-model jitter
    pub length_of_stay_days: u32,

    pub mortality_classification: OrderedMap<ModelName, ClassOutput>,

    /// Mortality rate on the 0-100 scale
    pub mortality_rate_regression: OrderedMap<ModelName, f64>,

    /// Days, at least 1
    pub length_of_stay_regression: OrderedMap<ModelName, f64>,
}

impl PredictionSet {
    #[must_use]
    pub fn classification(&self, model: ModelName) -> Option<&ClassOutput> {
        self.mortality_classification.get(&model)
    }

    #[must_use]
    pub fn mortality_rate(&self, model: ModelName) -> Option<f64> {
        self.mortality_rate_regression.get(&model).copied()
    }

    #[must_use]
    pub fn length_of_stay(&self, model: ModelName) -> Option<f64> {
        self.length_of_stay_regression.get(&model).copied()
    }
}

/// Complete record of one scored submission.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    /// Unique identifier
    pub id: String,

    /// Caller-supplied label (record `id` from the form, if any)
    pub label: Option<String>,

    /// Validated input
    pub observation: PatientObservation,

    /// Per-model outputs
    pub predictions: PredictionSet,

    /// Timestamp of assessment
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    #[must_use]
    pub fn new(observation: PatientObservation, predictions: PredictionSet) -> Self {
        Self {
            id: uuid_v4(),
            label: None,
            observation,
            predictions,
            created_at: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn risk(&self) -> RiskScalar {
        self.predictions.risk
    }
}

/// Generate a random UUID v4 string from an OS-seeded ChaCha20 stream.
fn uuid_v4() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_labels() {
        assert_eq!(ModelName::RandomForest.label(), "random forest");
        assert_eq!(ModelName::LogisticRegression.label(), "logistic regression");
        assert_eq!(ModelName::Knn.label(), "knn");
    }

    #[test]
    fn test_model_name_round_trip_through_str() {
        for model in ModelName::CLASSIFIERS.into_iter().chain(ModelName::REGRESSORS) {
            assert_eq!(model.as_str().parse::<ModelName>(), Ok(model));
        }
        assert!("svm".parse::<ModelName>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ModelName::LogisticRegression).expect("Should serialize");
        assert_eq!(json, "\"logistic_regression\"");
        let task: Task = serde_json::from_str("\"length_of_stay_regression\"").expect("Should parse");
        assert_eq!(task, Task::LengthOfStayRegression);
    }

    #[test]
    fn test_regression_counterpart() {
        assert_eq!(
            ModelName::LogisticRegression.regression_counterpart(),
            ModelName::LinearRegression
        );
        assert_eq!(ModelName::Xgboost.regression_counterpart(), ModelName::Xgboost);
    }

    #[test]
    fn test_uuid_generation() {
        let id1 = uuid_v4();
        let id2 = uuid_v4();
        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 36);
        assert_eq!(&id1[14..15], "4");
    }
}

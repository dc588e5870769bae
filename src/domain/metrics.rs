//! Reference performance metrics for the compared models.
//!
//! The table is static data supplied from outside the engine. Its JSON shape
//! is `{ task: { model: { metric: value } } }`, and the order in which models
//! appear is significant (first-encountered wins best-model ties).

use serde::{Deserialize, Serialize};

use super::ordered::OrderedMap;
use super::prediction::{ModelName, Task};

/// Named evaluation metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Accuracy,
    Auroc,
    Precision,
    Recall,
    F1,
    Mse,
    R2,
}

impl Metric {
    /// Chart row name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Accuracy => "Accuracy",
            Self::Auroc => "AUROC",
            Self::Precision => "Precision",
            Self::Recall => "Recall",
            Self::F1 => "F1 Score",
            Self::Mse => "MSE",
            Self::R2 => "R²",
        }
    }
}

/// Metric values reported for one model on one task.
pub type MetricSet = OrderedMap<Metric, f64>;

/// Per-task, per-model metric table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerformanceMetricsTable {
    tasks: OrderedMap<Task, OrderedMap<ModelName, MetricSet>>,
}

impl PerformanceMetricsTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a model's metrics for a task, appending the model if new.
    pub fn insert(&mut self, task: Task, model: ModelName, metrics: MetricSet) {
        if let Some(models) = self.tasks.get_mut(&task) {
            models.insert(model, metrics);
            return;
        }
        let mut models = OrderedMap::new();
        models.insert(model, metrics);
        self.tasks.insert(task, models);
    }

    /// Models reported for a task, in table order.
    #[must_use]
    pub fn task(&self, task: Task) -> Option<&OrderedMap<ModelName, MetricSet>> {
        self.tasks.get(&task)
    }

    #[must_use]
    pub fn metric(&self, task: Task, model: ModelName, metric: Metric) -> Option<f64> {
        self.task(task)?.get(&model)?.get(&metric).copied()
    }

    #[must_use]
    pub fn has_task(&self, task: Task) -> bool {
        self.tasks.contains_key(&task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table_shape() {
        let json = r#"{
            "mortality_classification": {
                "knn": {"accuracy": 0.83, "f1": 0.80},
                "random_forest": {"accuracy": 0.89}
            },
            "length_of_stay_regression": {
                "linear_regression": {"mse": 7.9, "r2": 0.68}
            }
        }"#;
        let table: PerformanceMetricsTable = serde_json::from_str(json).expect("Should parse");

        let models: Vec<_> = table
            .task(Task::MortalityClassification)
            .expect("task present")
            .keys()
            .copied()
            .collect();
        assert_eq!(models, vec![ModelName::Knn, ModelName::RandomForest]);
        assert_eq!(
            table.metric(Task::LengthOfStayRegression, ModelName::LinearRegression, Metric::R2),
            Some(0.68)
        );
        assert_eq!(
            table.metric(Task::MortalityClassification, ModelName::RandomForest, Metric::F1),
            None
        );
        assert!(!table.has_task(Task::MortalityRateRegression));
    }

    #[test]
    fn test_insert_keeps_model_order() {
        let mut table = PerformanceMetricsTable::new();
        table.insert(
            Task::MortalityRateRegression,
            ModelName::Xgboost,
            [(Metric::R2, 0.88)].into_iter().collect(),
        );
        table.insert(
            Task::MortalityRateRegression,
            ModelName::Knn,
            [(Metric::R2, 0.76)].into_iter().collect(),
        );
        let models: Vec<_> = table
            .task(Task::MortalityRateRegression)
            .expect("task present")
            .keys()
            .copied()
            .collect();
        assert_eq!(models, vec![ModelName::Xgboost, ModelName::Knn]);
    }
}

//! Model comparison views over the reference metrics table.
//!
//! Produces the best-model badge, the per-metric bar chart rows, and the
//! cross-task radar rows consumed by the comparison screen.

use serde::Serialize;

use crate::domain::{Metric, ModelName, OrderedMap, PerformanceMetricsTable, Task};

/// One bar-chart group: a metric and every model's value for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    /// Display name of the metric (e.g. "F1 Score")
    pub name: &'static str,
    /// Value per model in table order, rounded to 3 decimals
    pub values: OrderedMap<ModelName, f64>,
}

/// One radar point: a model's headline score on each task, as a percentage.
///
/// A task the model does not report is left out rather than zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarRow {
    pub model: ModelName,
    pub label: String,
    pub color: &'static str,
    /// Classification accuracy x100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mortality: Option<f64>,
    /// Mortality-rate R² x100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mortality_rate: Option<f64>,
    /// Length-of-stay R² x100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub los: Option<f64>,
}

/// Everything the comparison screen shows for one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskComparison {
    pub task: Task,
    pub task_name: &'static str,
    pub best_model: Option<ModelName>,
    pub series: Vec<ChartRow>,
    pub radar: Vec<RadarRow>,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Read-only view computations over a metrics table.
#[derive(Debug, Clone, Copy)]
pub struct MetricsAggregator<'a> {
    table: &'a PerformanceMetricsTable,
}

impl<'a> MetricsAggregator<'a> {
    /// Models shown on the radar chart, in order.
    pub const RADAR_MODELS: [ModelName; 4] = ModelName::CLASSIFIERS;

    #[must_use]
    pub fn new(table: &'a PerformanceMetricsTable) -> Self {
        Self { table }
    }

    /// Metric that ranks models on a task.
    #[must_use]
    pub fn selection_metric(task: Task) -> Metric {
        if task.is_classification() {
            Metric::Accuracy
        } else {
            Metric::R2
        }
    }

    /// Metrics charted for a task, in row order.
    #[must_use]
    pub fn chart_metrics(task: Task) -> &'static [Metric] {
        if task.is_classification() {
            &[Metric::Accuracy, Metric::Auroc, Metric::F1]
        } else {
            &[Metric::Mse, Metric::R2]
        }
    }

    /// Model with the strictly greatest selection metric.
    ///
    /// Ties keep the model met first in table order. Models without the
    /// metric are skipped; `None` if the task is absent or no model has it.
    #[must_use]
    pub fn best_model(&self, task: Task) -> Option<ModelName> {
        let metric = Self::selection_metric(task);
        let mut best: Option<(ModelName, f64)> = None;

        for (model, metrics) in self.table.task(task)?.iter() {
            let Some(&value) = metrics.get(&metric) else {
                continue;
            };
            match best {
                Some((_, top)) if value <= top => {}
                _ => best = Some((*model, value)),
            }
        }

        best.map(|(model, _)| model)
    }

    /// Bar chart rows for a task.
    ///
    /// A metric a model does not report is charted as 0.
    #[must_use]
    pub fn chart_series(&self, task: Task) -> Vec<ChartRow> {
        let Some(models) = self.table.task(task) else {
            return Vec::new();
        };

        Self::chart_metrics(task)
            .iter()
            .map(|metric| ChartRow {
                name: metric.display_name(),
                values: models
                    .iter()
                    .map(|(model, metrics)| {
                        (*model, round3(metrics.get(metric).copied().unwrap_or(0.0)))
                    })
                    .collect(),
            })
            .collect()
    }

    /// Cross-task radar rows for the canonical models.
    #[must_use]
    pub fn radar_projection(&self) -> Vec<RadarRow> {
        let percent = |task: Task, model: ModelName| -> Option<f64> {
            let metrics = self.table.task(task)?.get(&model)?;
            let value = metrics
                .get(&Self::selection_metric(task))
                .copied()
                .unwrap_or(0.0);
            Some(round3(value) * 100.0)
        };

        Self::RADAR_MODELS
            .into_iter()
            .map(|model| RadarRow {
                model,
                label: model.label(),
                color: model.color(),
                mortality: percent(Task::MortalityClassification, model),
                mortality_rate: percent(Task::MortalityRateRegression, model),
                los: percent(Task::LengthOfStayRegression, model),
            })
            .collect()
    }

    /// Best model, chart rows, and radar rows for one task.
    #[must_use]
    pub fn aggregate(&self, task: Task) -> TaskComparison {
        TaskComparison {
            task,
            task_name: task.display_name(),
            best_model: self.best_model(task),
            series: self.chart_series(task),
            radar: self.radar_projection(),
        }
    }
}

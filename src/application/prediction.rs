//! Prediction service: Orchestrates one patient submission.
//!
//! This service coordinates:
//! - Record validation
//! - Risk scoring
//! - Model simulation
//! - Assessment construction

use std::sync::Mutex;

use serde_json::Value;

use crate::application::{ModelSimulator, RiskScorer};
use crate::domain::{validate, Assessment, RawPatientRecord};
use crate::ports::RandomSource;
use crate::PrognosError;

/// Service running the validate → score → simulate pipeline.
///
/// The random source sits behind a mutex so a shared service can serve
/// concurrent submissions; each submission holds the lock for its whole
/// draw sequence, keeping scripted sources reproducible.
pub struct PredictionService<R: RandomSource> {
    rng: Mutex<R>,
    scorer: RiskScorer,
    simulator: ModelSimulator,
}

impl<R: RandomSource> PredictionService<R> {
    /// Create a service with the standard scorer and model profiles.
    pub fn new(rng: R) -> Self {
        Self::with_simulator(rng, ModelSimulator::default())
    }

    pub fn with_simulator(rng: R, simulator: ModelSimulator) -> Self {
        Self {
            rng: Mutex::new(rng),
            scorer: RiskScorer::new(),
            simulator,
        }
    }

    /// Validate, score and simulate one raw record.
    ///
    /// On rejection no score is computed and no draws are consumed.
    ///
    /// # Errors
    /// Returns `PrognosError::Validation` with every failing field, or
    /// `PrognosError::RngUnavailable` if the random source lock is poisoned.
    pub fn predict(&self, raw: &RawPatientRecord) -> Result<Assessment, PrognosError> {
        let observation = validate(raw).map_err(|errors| {
            tracing::warn!(
                fields = ?errors.fields(),
                "Rejected patient record"
            );
            PrognosError::Validation(errors)
        })?;

        let predictions = {
            let mut rng = self.rng.lock().map_err(|_| PrognosError::RngUnavailable)?;
            let risk = self.scorer.score(&observation, &mut *rng);
            self.simulator.simulate(risk, &mut *rng)
        };

        let mut assessment = Assessment::new(observation, predictions);
        if let Some(label) = raw.get("id").and_then(record_label) {
            assessment = assessment.with_label(label);
        }

        tracing::info!(
            assessment = %assessment.id,
            risk = %assessment.risk(),
            length_of_stay_days = assessment.predictions.length_of_stay_days,
            "Assessment complete"
        );
        Ok(assessment)
    }
}

fn record_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{sample_patients, ChaChaSource, FixedSource, SequenceSource};
    use crate::domain::{ModelName, ValidationError};
    use serde_json::json;
    use std::sync::Arc;

    const EPS: f64 = 1e-9;

    fn record(value: Value) -> RawPatientRecord {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn elderly_emergency() -> RawPatientRecord {
        record(json!({
            "id": "bed-12",
            "age": 72, "gender": 1, "heart_rate": 95, "systolic_bp": 145,
            "diastolic_bp": 90, "respiration_rate": 20, "temperature": 37.5,
            "oxygen_saturation": 94, "wbc_count": 11.5, "hemoglobin": 12.5,
            "platelet_count": 220, "sodium": 138, "potassium": 4.2, "creatinine": 1.3,
            "diabetes": 1, "hypertension": 1, "copd": 0, "asthma": 0,
            "chf": 0, "ckd": 0, "cancer": 0, "admission_type": "Emergency"
        }))
    }

    #[test]
    fn test_worked_example() {
        // Midpoint for the score perturbation, then zero for every simulator draw.
        let mut draws = vec![0.5];
        draws.extend([0.0; 16]);
        let service = PredictionService::new(SequenceSource::new(draws));

        let assessment = service.predict(&elderly_emergency()).expect("Should predict");
        assert!((assessment.risk().value() - 0.75).abs() < EPS);
        assert_eq!(assessment.predictions.length_of_stay_days, 15);
        assert_eq!(assessment.label.as_deref(), Some("bed-12"));
        assert_eq!(assessment.id.len(), 36);
    }

    #[test]
    fn test_rejection_collects_all_fields_and_draws_nothing() {
        let mut raw = elderly_emergency();
        raw.insert("age".into(), json!(200));
        raw.insert("heart_rate".into(), json!(5));

        let service = PredictionService::new(SequenceSource::new(vec![0.5]));
        let err = service.predict(&raw).unwrap_err();

        let PrognosError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.fields(), vec!["age", "heart_rate"]);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ValidationError::RangeViolation { .. })));

        let rng = service.rng.lock().expect("lock");
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_seeded_runs_agree() {
        let raw = elderly_emergency();
        let a = PredictionService::new(ChaChaSource::seeded(11))
            .predict(&raw)
            .expect("Should predict");
        let b = PredictionService::new(ChaChaSource::seeded(11))
            .predict(&raw)
            .expect("Should predict");

        assert_eq!(a.predictions, b.predictions);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_numeric_label_and_missing_label() {
        let service = PredictionService::new(FixedSource::midpoint());
        let mut raw = elderly_emergency();
        raw.insert("id".into(), json!(7));
        assert_eq!(
            service.predict(&raw).expect("Should predict").label.as_deref(),
            Some("7")
        );

        raw.remove("id");
        assert_eq!(service.predict(&raw).expect("Should predict").label, None);
    }

    #[test]
    fn test_sample_patients_predict() {
        let service = PredictionService::new(FixedSource::midpoint());
        for raw in sample_patients().expect("Should parse") {
            let assessment = service.predict(&raw).expect("Should predict");
            for model in ModelName::CLASSIFIERS {
                assert!(assessment.predictions.classification(model).is_some());
            }
        }
    }

    #[test]
    fn test_shared_service_across_threads() {
        let service = Arc::new(PredictionService::new(ChaChaSource::seeded(3)));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let service = Arc::clone(&service);
                let raw = elderly_emergency();
                std::thread::spawn(move || service.predict(&raw).map(|a| a.risk()))
            })
            .collect();

        for handle in handles {
            let risk = handle.join().expect("thread").expect("Should predict");
            assert!((0.65..=0.85).contains(&risk.value()));
        }
    }
}

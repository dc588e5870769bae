//! Rule-based composite risk scoring.
//!
//! Four independent buckets (age, vitals, comorbidities, labs) each
//! contribute a bounded amount; their sum is perturbed and clamped into
//! [`RiskScalar::MIN`, `RiskScalar::MAX`].

use serde::Serialize;

use crate::domain::{PatientObservation, RiskScalar};
use crate::ports::RandomSource;

/// Per-bucket contributions for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub age_risk: f64,
    pub vital_risk: f64,
    pub comorbidity_count: u8,
    pub comorbidity_risk: f64,
    pub lab_risk: f64,
}

impl ScoreBreakdown {
    /// Unperturbed sum of the buckets (roughly 0.35 to 0.9).
    #[must_use]
    pub fn base_risk(&self) -> f64 {
        self.age_risk + self.vital_risk + self.comorbidity_risk + self.lab_risk
    }
}

/// Maps an observation to a composite mortality risk.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskScorer;

impl RiskScorer {
    /// Half-width of the uniform perturbation added to the base risk.
    pub const PERTURBATION: f64 = 0.1;

    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Deterministic bucket contributions.
    #[must_use]
    pub fn breakdown(&self, obs: &PatientObservation) -> ScoreBreakdown {
        let age_risk = if obs.age() > 70.0 { 0.2 } else { 0.1 };

        let abnormal_vitals = obs.heart_rate() > 90.0
            || obs.systolic_bp() > 140.0
            || obs.oxygen_saturation_pct() < 94.0;
        let vital_risk = if abnormal_vitals { 0.2 } else { 0.1 };

        let comorbidity_count = obs.comorbidities().count();
        let comorbidity_risk = match comorbidity_count {
            0 => 0.05,
            1 | 2 => 0.15,
            _ => 0.3,
        };

        let abnormal_labs =
            obs.wbc_count() > 10.0 || obs.creatinine() > 1.5 || obs.hemoglobin() < 10.0;
        let lab_risk = if abnormal_labs { 0.2 } else { 0.1 };

        ScoreBreakdown {
            age_risk,
            vital_risk,
            comorbidity_count,
            comorbidity_risk,
            lab_risk,
        }
    }

    /// Composite risk: base risk plus one perturbation draw, clamped.
    ///
    /// Consumes exactly one draw from `rng`.
    pub fn score<R: RandomSource + ?Sized>(
        &self,
        obs: &PatientObservation,
        rng: &mut R,
    ) -> RiskScalar {
        let breakdown = self.breakdown(obs);
        let perturbation = rng.jitter(Self::PERTURBATION);
        let risk = RiskScalar::clamped(breakdown.base_risk() + perturbation);

        tracing::debug!(
            base = breakdown.base_risk(),
            perturbation,
            risk = risk.value(),
            "Scored observation"
        );
        risk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixedSource, SequenceSource};
    use crate::domain::{validate, RawPatientRecord};
    use proptest::prelude::*;
    use serde_json::{json, Value};

    const EPS: f64 = 1e-9;

    fn observation(overrides: Value) -> PatientObservation {
        let mut raw: RawPatientRecord = match json!({
            "age": 65, "gender": 1, "heart_rate": 80, "systolic_bp": 130,
            "diastolic_bp": 85, "respiration_rate": 18, "temperature": 37.2,
            "oxygen_saturation": 96, "wbc_count": 8.5, "hemoglobin": 14.0,
            "platelet_count": 250, "sodium": 140, "potassium": 4.1, "creatinine": 1.1,
            "diabetes": 0, "hypertension": 0, "copd": 0, "asthma": 0,
            "chf": 0, "ckd": 0, "cancer": 0, "admission_type": "Emergency"
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        if let Value::Object(extra) = overrides {
            raw.extend(extra);
        }
        validate(&raw).expect("test observation must be valid")
    }

    fn elderly_emergency() -> PatientObservation {
        observation(json!({
            "age": 72, "heart_rate": 95, "systolic_bp": 145, "oxygen_saturation": 94,
            "wbc_count": 11.5, "creatinine": 1.3, "hemoglobin": 12.5,
            "diabetes": 1, "hypertension": 1
        }))
    }

    #[test]
    fn test_breakdown_worked_example() {
        let b = RiskScorer::new().breakdown(&elderly_emergency());
        assert!((b.age_risk - 0.2).abs() < EPS);
        assert!((b.vital_risk - 0.2).abs() < EPS);
        assert_eq!(b.comorbidity_count, 2);
        assert!((b.comorbidity_risk - 0.15).abs() < EPS);
        assert!((b.lab_risk - 0.2).abs() < EPS);
        assert!((b.base_risk() - 0.75).abs() < EPS);
    }

    #[test]
    fn test_zero_perturbation_keeps_base() {
        let risk = RiskScorer::new().score(&elderly_emergency(), &mut FixedSource::midpoint());
        assert!((risk.value() - 0.75).abs() < EPS);
    }

    #[test]
    fn test_perturbation_extremes() {
        let scorer = RiskScorer::new();
        let obs = elderly_emergency();
        let low = scorer.score(&obs, &mut FixedSource::zero());
        assert!((low.value() - 0.65).abs() < EPS);

        let mut high = SequenceSource::new(vec![0.999_999_999]);
        assert!((scorer.score(&obs, &mut high).value() - 0.85).abs() < 1e-6);
        assert_eq!(high.consumed(), 1);
    }

    #[test]
    fn test_default_patient_is_lowest_bucket() {
        let b = RiskScorer::new().breakdown(&observation(json!({})));
        assert!((b.base_risk() - 0.35).abs() < EPS);
        let risk = RiskScorer::new().score(&observation(json!({})), &mut FixedSource::zero());
        assert!((risk.value() - 0.25).abs() < EPS);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let b = RiskScorer::new().breakdown(&observation(json!({
            "age": 70, "heart_rate": 90, "systolic_bp": 140, "oxygen_saturation": 94,
            "wbc_count": 10, "creatinine": 1.5, "hemoglobin": 10
        })));
        assert!((b.base_risk() - 0.35).abs() < EPS);
    }

    #[test]
    fn test_maximum_risk_clamps() {
        let obs = observation(json!({
            "age": 90, "heart_rate": 130, "creatinine": 4.0,
            "diabetes": 1, "chf": 1, "ckd": 1, "cancer": 1
        }));
        let b = RiskScorer::new().breakdown(&obs);
        assert!((b.base_risk() - 0.9).abs() < EPS);

        let mut top = SequenceSource::new(vec![0.99]);
        let risk = RiskScorer::new().score(&obs, &mut top);
        assert!((risk.value() - RiskScalar::MAX).abs() < EPS);
    }

    fn arb_raw() -> impl Strategy<Value = RawPatientRecord> {
        let vitals = (
            18.0f64..=120.0,
            30.0f64..=220.0,
            50.0f64..=250.0,
            30.0f64..=150.0,
            4.0f64..=60.0,
            32.0f64..=43.0,
            50.0f64..=100.0,
        );
        let labs = (
            0.5f64..=50.0,
            3.0f64..=25.0,
            5.0f64..=1000.0,
            110.0f64..=180.0,
            2.0f64..=9.0,
            0.2f64..=20.0,
        );
        let flags = proptest::array::uniform8(0u8..=1);
        let admission = prop_oneof![Just("Emergency"), Just("Urgent"), Just("Elective")];

        (vitals, labs, flags, admission).prop_map(
            |((age, hr, sbp, dbp, rr, temp, spo2), (wbc, hgb, plt, na, k, cr), f, adm)| {
                match json!({
                    "age": age, "heart_rate": hr, "systolic_bp": sbp, "diastolic_bp": dbp,
                    "respiration_rate": rr, "temperature": temp, "oxygen_saturation": spo2,
                    "wbc_count": wbc, "hemoglobin": hgb, "platelet_count": plt,
                    "sodium": na, "potassium": k, "creatinine": cr,
                    "gender": f[0], "diabetes": f[1], "hypertension": f[2], "copd": f[3],
                    "asthma": f[4], "chf": f[5], "ckd": f[6], "cancer": f[7],
                    "admission_type": adm
                }) {
                    Value::Object(map) => map,
                    _ => unreachable!(),
                }
            },
        )
    }

    proptest! {
        #[test]
        fn prop_score_within_published_range(raw in arb_raw(), draw in 0.0f64..1.0) {
            let obs = validate(&raw).expect("generated record is in range");
            let risk = RiskScorer::new().score(&obs, &mut FixedSource::new(draw));
            prop_assert!(risk.value() >= RiskScalar::MIN);
            prop_assert!(risk.value() <= RiskScalar::MAX);
        }

        #[test]
        fn prop_comorbidity_bucket_ignores_which_flags(
            picks in proptest::sample::subsequence(
                vec!["diabetes", "hypertension", "copd", "asthma", "chf", "ckd", "cancer"],
                3..=7,
            )
        ) {
            let mut overrides = serde_json::Map::new();
            for flag in &picks {
                overrides.insert((*flag).to_string(), json!(1));
            }
            let b = RiskScorer::new().breakdown(&observation(Value::Object(overrides)));
            prop_assert_eq!(usize::from(b.comorbidity_count), picks.len());
            prop_assert!((b.comorbidity_risk - 0.3).abs() < EPS);
        }
    }
}

//! Pseudo-model simulation.
//!
//! Expands one risk scalar into the outputs of four named models. Each model
//! is a fixed profile (decision threshold, perturbation widths, stay jitter)
//! applied to the same risk, which stands in for inter-model disagreement.
//!
//! # Draw order
//!
//! Draws are consumed in a fixed order so scripted sources are reproducible:
//! length-of-stay noise, then one classification draw per model, then one
//! mortality-rate draw per model, then the stay jitter draws (0 to 2 per
//! model, depending on its `StayJitter`).

use crate::domain::{ClassOutput, ModelName, OrderedMap, PredictionSet, RiskScalar};
use crate::ports::RandomSource;

/// Integer day offset a model applies to the shared length-of-stay baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StayJitter {
    /// +0 or +1, even odds
    ZeroOrOne,
    /// -1 with p=0.5, otherwise +1 or +0 with even odds
    Symmetric,
    /// No offset
    Exact,
    /// +2 with p=0.3, otherwise +1 or +0 with even odds
    SkewedUp,
}

impl StayJitter {
    fn draw<R: RandomSource + ?Sized>(self, rng: &mut R) -> i64 {
        match self {
            Self::ZeroOrOne => i64::from(rng.exceeds(0.5)),
            Self::Symmetric => {
                if rng.exceeds(0.5) {
                    -1
                } else {
                    i64::from(rng.exceeds(0.5))
                }
            }
            Self::Exact => 0,
            Self::SkewedUp => {
                if rng.exceeds(0.7) {
                    2
                } else {
                    i64::from(rng.exceeds(0.5))
                }
            }
        }
    }
}

/// Fixed behaviour of one simulated model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelProfile {
    /// Name reported for the classification task
    pub classifier: ModelName,
    /// Name reported for the regression tasks
    pub regressor: ModelName,
    /// `class` is 1 when risk is strictly above this
    pub threshold: f64,
    /// Half-width of the probability perturbation
    pub probability_delta: f64,
    /// Half-width of the mortality-rate perturbation (0-100 scale)
    pub rate_amplitude: f64,
    pub stay_jitter: StayJitter,
}

impl ModelProfile {
    /// The four standard models, in display order.
    pub const STANDARD: [Self; 4] = [
        Self {
            classifier: ModelName::RandomForest,
            regressor: ModelName::RandomForest,
            threshold: 0.50,
            probability_delta: 0.03,
            rate_amplitude: 1.5,
            stay_jitter: StayJitter::ZeroOrOne,
        },
        Self {
            classifier: ModelName::Knn,
            regressor: ModelName::Knn,
            threshold: 0.48,
            probability_delta: 0.04,
            rate_amplitude: 2.5,
            stay_jitter: StayJitter::Symmetric,
        },
        Self {
            classifier: ModelName::Xgboost,
            regressor: ModelName::Xgboost,
            threshold: 0.52,
            probability_delta: 0.02,
            rate_amplitude: 1.0,
            stay_jitter: StayJitter::Exact,
        },
        Self {
            classifier: ModelName::LogisticRegression,
            regressor: ModelName::LinearRegression,
            threshold: 0.49,
            probability_delta: 0.05,
            rate_amplitude: 3.0,
            stay_jitter: StayJitter::SkewedUp,
        },
    ];
}

/// Expands a risk scalar into a full [`PredictionSet`].
#[derive(Debug, Clone)]
pub struct ModelSimulator {
    profiles: Vec<ModelProfile>,
}

impl Default for ModelSimulator {
    fn default() -> Self {
        Self::with_profiles(ModelProfile::STANDARD.to_vec())
    }
}

impl ModelSimulator {
    /// Multiplier from risk to baseline days.
    pub const STAY_DAYS_PER_RISK: f64 = 20.0;
    /// Upper bound of the additive baseline stay noise, in days.
    pub const STAY_NOISE_DAYS: f64 = 5.0;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_profiles(profiles: Vec<ModelProfile>) -> Self {
        Self { profiles }
    }

    #[must_use]
    pub fn profiles(&self) -> &[ModelProfile] {
        &self.profiles
    }

    /// Shared length-of-stay baseline: `max(1, round(risk*20 + U(0,5)))`.
    fn baseline_stay<R: RandomSource + ?Sized>(risk: RiskScalar, rng: &mut R) -> u32 {
        let days = risk.value() * Self::STAY_DAYS_PER_RISK
            + rng.uniform(0.0, Self::STAY_NOISE_DAYS);
        // Bounded: risk <= 0.95, so days < 24.
        days.round().max(1.0) as u32
    }

    /// Produce every model's output for one risk value.
    pub fn simulate<R: RandomSource + ?Sized>(&self, risk: RiskScalar, rng: &mut R) -> PredictionSet {
        let r = risk.value();
        let length_of_stay_days = Self::baseline_stay(risk, rng);

        let mortality_classification: OrderedMap<_, _> = self
            .profiles
            .iter()
            .map(|p| {
                let output = ClassOutput {
                    class: u8::from(r > p.threshold),
                    probability: r + rng.jitter(p.probability_delta),
                };
                (p.classifier, output)
            })
            .collect();

        let mortality_rate_regression: OrderedMap<_, _> = self
            .profiles
            .iter()
            .map(|p| (p.regressor, r * 100.0 + rng.jitter(p.rate_amplitude)))
            .collect();

        let length_of_stay_regression: OrderedMap<_, _> = self
            .profiles
            .iter()
            .map(|p| {
                let days = (i64::from(length_of_stay_days) + p.stay_jitter.draw(rng)).max(1);
                (p.regressor, days as f64)
            })
            .collect();

        tracing::debug!(
            risk = r,
            length_of_stay_days,
            models = self.profiles.len(),
            "Simulated model outputs"
        );

        PredictionSet {
            risk,
            length_of_stay_days,
            mortality_classification,
            mortality_rate_regression,
            length_of_stay_regression,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ChaChaSource, FixedSource, SequenceSource};

    const EPS: f64 = 1e-9;

    fn class(set: &PredictionSet, model: ModelName) -> ClassOutput {
        *set.classification(model).expect("model present")
    }

    #[test]
    fn test_zero_source_is_reproducible() {
        let sim = ModelSimulator::new();
        let risk = RiskScalar::clamped(0.5);
        let first = sim.simulate(risk, &mut FixedSource::zero());
        let second = sim.simulate(risk, &mut FixedSource::zero());
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_source_values() {
        let set = ModelSimulator::new().simulate(RiskScalar::clamped(0.5), &mut FixedSource::zero());

        assert_eq!(set.length_of_stay_days, 10);

        // Thresholds are strict.
        assert_eq!(class(&set, ModelName::RandomForest).class, 0);
        assert_eq!(class(&set, ModelName::Knn).class, 1);
        assert_eq!(class(&set, ModelName::Xgboost).class, 0);
        assert_eq!(class(&set, ModelName::LogisticRegression).class, 1);

        assert!((class(&set, ModelName::RandomForest).probability - 0.47).abs() < EPS);
        assert!((class(&set, ModelName::Knn).probability - 0.46).abs() < EPS);
        assert!((class(&set, ModelName::Xgboost).probability - 0.48).abs() < EPS);
        assert!((class(&set, ModelName::LogisticRegression).probability - 0.45).abs() < EPS);

        assert_eq!(set.mortality_rate(ModelName::RandomForest), Some(48.5));
        assert_eq!(set.mortality_rate(ModelName::Knn), Some(47.5));
        assert_eq!(set.mortality_rate(ModelName::Xgboost), Some(49.0));
        assert_eq!(set.mortality_rate(ModelName::LinearRegression), Some(47.0));
        assert_eq!(set.mortality_rate(ModelName::LogisticRegression), None);

        for model in ModelName::REGRESSORS {
            assert_eq!(set.length_of_stay(model), Some(10.0));
        }
    }

    #[test]
    fn test_worked_example_stay() {
        let set = ModelSimulator::new().simulate(RiskScalar::clamped(0.75), &mut FixedSource::zero());
        assert_eq!(set.length_of_stay_days, 15);
    }

    #[test]
    fn test_stay_jitter_and_floor() {
        let mut draws = vec![0.0];
        draws.extend([0.5; 8]);
        // random_forest +0, knn -1, linear +2
        draws.extend([0.0, 0.9, 0.9]);
        let mut rng = SequenceSource::new(draws);

        let set = ModelSimulator::new().simulate(RiskScalar::clamped(0.01), &mut rng);

        assert_eq!(rng.consumed(), 12);
        assert_eq!(set.length_of_stay_days, 1);
        assert_eq!(set.length_of_stay(ModelName::RandomForest), Some(1.0));
        assert_eq!(set.length_of_stay(ModelName::Knn), Some(1.0));
        assert_eq!(set.length_of_stay(ModelName::Xgboost), Some(1.0));
        assert_eq!(set.length_of_stay(ModelName::LinearRegression), Some(3.0));
    }

    #[test]
    fn test_knn_second_draw() {
        // knn: first draw below 0.5, second above -> +1
        let mut draws = vec![0.0];
        draws.extend([0.5; 8]);
        draws.extend([0.9, 0.1, 0.6, 0.6, 0.6]);
        let mut rng = SequenceSource::new(draws);

        let set = ModelSimulator::new().simulate(RiskScalar::clamped(0.5), &mut rng);

        assert_eq!(set.length_of_stay(ModelName::RandomForest), Some(11.0));
        assert_eq!(set.length_of_stay(ModelName::Knn), Some(11.0));
        assert_eq!(set.length_of_stay(ModelName::LinearRegression), Some(11.0));
        assert_eq!(rng.consumed(), 14);
    }

    #[test]
    fn test_probability_is_not_clamped() {
        let set = ModelSimulator::new().simulate(RiskScalar::clamped(0.01), &mut FixedSource::zero());
        assert!(class(&set, ModelName::LogisticRegression).probability < 0.0);
    }

    #[test]
    fn test_perturbations_stay_within_profile_bounds() {
        let sim = ModelSimulator::new();
        let mut rng = ChaChaSource::seeded(42);
        for step in 0..200 {
            let risk = RiskScalar::clamped(0.01 + f64::from(step) * 0.0047);
            let set = sim.simulate(risk, &mut rng);
            let r = risk.value();
            for p in sim.profiles() {
                let out = class(&set, p.classifier);
                assert!((out.probability - r).abs() <= p.probability_delta + EPS);
                let rate = set.mortality_rate(p.regressor).expect("rate present");
                assert!((rate - r * 100.0).abs() <= p.rate_amplitude + EPS);
                let stay = set.length_of_stay(p.regressor).expect("stay present");
                assert!(stay >= 1.0);
                assert!((stay - f64::from(set.length_of_stay_days)).abs() <= 2.0);
            }
        }
    }

    #[test]
    fn test_model_order_follows_profiles() {
        let set = ModelSimulator::new().simulate(RiskScalar::clamped(0.3), &mut FixedSource::zero());
        let classifiers: Vec<_> = set.mortality_classification.keys().copied().collect();
        assert_eq!(classifiers, ModelName::CLASSIFIERS.to_vec());
        let regressors: Vec<_> = set.length_of_stay_regression.keys().copied().collect();
        assert_eq!(regressors, ModelName::REGRESSORS.to_vec());
    }
}

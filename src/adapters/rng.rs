//! Random source adapters: Implementations of RandomSource.
//!
//! - `ChaChaSource`: ChaCha20 stream, OS-seeded or seeded for replay
//! - `FixedSource`: the same draw every time
//! - `SequenceSource`: cycles through a scripted list of draws

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::ports::RandomSource;

/// Environment variable holding an optional u64 seed.
pub const RNG_SEED_ENV: &str = "PROGNOS_RNG_SEED";

/// Configuration for the random source.
#[derive(Debug, Clone, Default)]
pub struct RngConfig {
    /// Fixed seed for reproducible runs; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl RngConfig {
    /// Load config overrides from environment (best-effort).
    ///
    /// Supported:
    /// - PROGNOS_RNG_SEED
    #[must_use]
    pub fn from_env_or_default() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var(RNG_SEED_ENV) {
            match v.trim().parse::<u64>() {
                Ok(seed) => cfg.seed = Some(seed),
                Err(_) => tracing::warn!("Ignoring non-numeric {}: {:?}", RNG_SEED_ENV, v),
            }
        }

        cfg
    }

    /// Apply an explicit seed (e.g. a command-line flag) over the loaded one.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }
}

/// ChaCha20-backed random source.
pub struct ChaChaSource {
    rng: ChaCha20Rng,
}

impl ChaChaSource {
    /// Create a source from configuration.
    #[must_use]
    pub fn with_config(config: &RngConfig) -> Self {
        match config.seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for ChaChaSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Source returning the same draw forever.
///
/// `FixedSource::new(0.5)` makes every symmetric jitter exactly zero;
/// `FixedSource::new(0.0)` pins every draw to the bottom of its range.
#[derive(Debug, Clone, Copy)]
pub struct FixedSource {
    value: f64,
}

impl FixedSource {
    /// # Panics
    /// Panics if `value` is outside `[0, 1)`.
    #[must_use]
    pub fn new(value: f64) -> Self {
        assert!((0.0..1.0).contains(&value), "draw must lie in [0, 1)");
        Self { value }
    }

    /// Every draw is zero.
    #[must_use]
    pub fn zero() -> Self {
        Self::new(0.0)
    }

    /// Every draw is the midpoint: symmetric jitter vanishes.
    #[must_use]
    pub fn midpoint() -> Self {
        Self::new(0.5)
    }
}

impl RandomSource for FixedSource {
    fn next_unit(&mut self) -> f64 {
        self.value
    }
}

/// Source replaying a scripted list of draws, wrapping at the end.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    draws: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    /// # Panics
    /// Panics if `draws` is empty or any draw is outside `[0, 1)`.
    #[must_use]
    pub fn new(draws: Vec<f64>) -> Self {
        assert!(!draws.is_empty(), "sequence needs at least one draw");
        assert!(
            draws.iter().all(|d| (0.0..1.0).contains(d)),
            "draws must lie in [0, 1)"
        );
        Self { draws, cursor: 0 }
    }

    /// Draws consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        let value = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        value
    }
}

//! Random source port: Trait for the perturbation draws.
//!
//! Scoring and simulation take their randomness through this trait rather
//! than an ambient generator, so tests can pin every draw.

/// Source of uniform draws in `[0, 1)`.
///
/// Only `next_unit` is required; the range helpers are derived from it and
/// consume exactly one draw each.
pub trait RandomSource {
    /// Next uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform draw in `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_unit() * (high - low)
    }

    /// Symmetric offset in `[-amplitude, amplitude)`.
    fn jitter(&mut self, amplitude: f64) -> f64 {
        self.uniform(-amplitude, amplitude)
    }

    /// True when the next draw is strictly above `threshold`.
    fn exceeds(&mut self, threshold: f64) -> bool {
        self.next_unit() > threshold
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

//! Deterministic stand-ins for the random source
//!
//! Used by unit and integration tests to force outcomes that would otherwise
//! depend on luck.

use crate::core::random::RandomSource;

/// A source that returns the same uniform value forever.
///
/// With `unit = 0.0` every probability trial with `p > 0` succeeds; with a
/// unit close to 1 almost every trial fails. Because all draws are equal, a
/// binomial draw either succeeds on every trial or on none.
#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    unit: f64,
}

impl ScriptedRandom {
    pub fn new(unit: f64) -> Self {
        Self {
            unit: unit.clamp(0.0, 1.0 - f64::EPSILON),
        }
    }

    /// Every trial with positive probability succeeds
    pub fn always() -> Self {
        Self::new(0.0)
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        self.unit
    }

    fn reset(&self) -> Self {
        self.clone()
    }

    /// Exactly the mean
    fn erlang(&mut self, shape: u32, mean: f64) -> f64 {
        shape as f64 * mean.max(0.0)
    }

    fn binomial(&mut self, trials: u64, p: f64) -> u64 {
        if self.probability(p) {
            trials
        } else {
            0
        }
    }
}

//! Deterministic random number generation
//!
//! Every stochastic decision in the simulation draws from a [`RandomSource`]
//! that is passed in explicitly; nothing holds a generator as ambient state.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Binomial, Distribution, Exp, Gamma, Normal, Poisson};

/// Means above this use the normal approximation in the fallback samplers
const NORMAL_APPROXIMATION_THRESHOLD: f64 = 36.0;

/// The draws the simulation needs from a pseudorandom generator.
///
/// Only [`next_f64`](RandomSource::next_f64) and [`reset`](RandomSource::reset)
/// are required; the distributions default to inversion sampling on top of
/// `next_f64`. Degenerate parameters are handled here rather than by callers.
pub trait RandomSource {
    /// A uniform value in [0, 1)
    fn next_f64(&mut self) -> f64;

    /// A new generator whose stream is independent of this one's
    fn reset(&self) -> Self
    where
        Self: Sized;

    /// True with probability `p`. Never true for p <= 0, always for p >= 1.
    fn probability(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// A value in [min, max)
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_f64()
    }

    /// An integer in [min, max)
    fn discrete(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.uniform(min as f64, max as f64).floor() as i64
    }

    fn normal(&mut self, mean: f64, std: f64) -> f64 {
        let u0 = 1.0 - self.next_f64();
        let u1 = self.next_f64();
        let z = (-2.0 * u0.ln()).sqrt() * (2.0 * std::f64::consts::PI * u1).cos();
        mean + std * z
    }

    /// An exponentially distributed value. An infinite mean yields infinity.
    fn exponential(&mut self, mean: f64) -> f64 {
        if mean.is_infinite() {
            return f64::INFINITY;
        }
        if !(mean > 0.0) {
            return 0.0;
        }
        -mean * (1.0 - self.next_f64()).ln()
    }

    /// The sum of `shape` exponential draws with the given mean each
    fn erlang(&mut self, shape: u32, mean: f64) -> f64 {
        (0..shape).map(|_| self.exponential(mean)).sum()
    }

    fn poisson(&mut self, mean: f64) -> u64 {
        if !(mean > 0.0) {
            return 0;
        }
        if mean >= NORMAL_APPROXIMATION_THRESHOLD {
            return self.normal(mean, mean.sqrt()).round().max(0.0) as u64;
        }
        let mut u = self.next_f64();
        let mut pk = (-mean).exp();
        let mut k = 0u64;
        while u >= pk && pk > 0.0 {
            u -= pk;
            k += 1;
            pk *= mean / k as f64;
        }
        k
    }

    fn binomial(&mut self, trials: u64, p: f64) -> u64 {
        if trials == 0 || !(p > 0.0) {
            return 0;
        }
        if p >= 1.0 {
            return trials;
        }
        let n = trials as f64;
        if n * p >= NORMAL_APPROXIMATION_THRESHOLD && n * (1.0 - p) >= NORMAL_APPROXIMATION_THRESHOLD {
            let draw = self.normal(n * p, (n * p * (1.0 - p)).sqrt()).round();
            return draw.clamp(0.0, n) as u64;
        }
        let mut u = self.next_f64();
        let mut pk = (1.0 - p).powf(n);
        for k in 0..trials {
            if u < pk {
                return k;
            }
            u -= pk;
            pk *= (n - k as f64) / (k as f64 + 1.0) * p / (1.0 - p);
        }
        trials
    }
}

/// Seedable ChaCha8 generator used for real simulation runs
#[derive(Clone, Debug)]
pub struct Random {
    seed: u64,
    inner: ChaCha8Rng,
}

impl Random {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for Random {
    fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    fn reset(&self) -> Self {
        Random::new(self.seed.wrapping_add(1))
    }

    fn normal(&mut self, mean: f64, std: f64) -> f64 {
        match Normal::new(mean, std) {
            Ok(dist) => dist.sample(&mut self.inner),
            Err(_) => mean,
        }
    }

    fn exponential(&mut self, mean: f64) -> f64 {
        if mean.is_infinite() {
            return f64::INFINITY;
        }
        match Exp::new(1.0 / mean) {
            Ok(dist) if mean > 0.0 => dist.sample(&mut self.inner),
            _ => 0.0,
        }
    }

    fn erlang(&mut self, shape: u32, mean: f64) -> f64 {
        match Gamma::new(shape as f64, mean) {
            Ok(dist) if shape > 0 && mean > 0.0 => dist.sample(&mut self.inner),
            _ => 0.0,
        }
    }

    fn poisson(&mut self, mean: f64) -> u64 {
        match Poisson::new(mean) {
            Ok(dist) => {
                let draw: f64 = dist.sample(&mut self.inner);
                draw as u64
            }
            Err(_) => 0,
        }
    }

    fn binomial(&mut self, trials: u64, p: f64) -> u64 {
        if !(p > 0.0) {
            return 0;
        }
        if p >= 1.0 {
            return trials;
        }
        match Binomial::new(trials, p) {
            Ok(dist) => dist.sample(&mut self.inner),
            Err(_) => 0,
        }
    }
}

//! Distribution payloads.
//!
//! A distribution is either symbolic (parameters only) or a sample set.
//! The value model needs means, single draws, and environment-sized sample
//! vectors; heavier distribution math belongs to the builtin functions
//! built on top of these primitives.

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use rand::Rng;
use rand_chacha::ChaCha20Rng;

use super::fmt_number;
use crate::env::Environment;

/// A symbolic distribution, described by its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SymbolicDist {
    Normal { mean: f64, stdev: f64 },
    Uniform { low: f64, high: f64 },
    PointMass { value: f64 },
}

impl SymbolicDist {
    pub fn mean(&self) -> f64 {
        match self {
            SymbolicDist::Normal { mean, .. } => *mean,
            SymbolicDist::Uniform { low, high } => (low + high) / 2.0,
            SymbolicDist::PointMass { value } => *value,
        }
    }

    /// Draw a single value from the given random source.
    pub fn sample(&self, rng: &mut ChaCha20Rng) -> f64 {
        match self {
            SymbolicDist::Normal { mean, stdev } => {
                // Box-Muller transform over two uniform draws.
                let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
                let u2: f64 = rng.gen();
                let standard = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
                mean + stdev * standard
            }
            SymbolicDist::Uniform { low, high } => low + (high - low) * rng.gen::<f64>(),
            SymbolicDist::PointMass { value } => *value,
        }
    }
}

/// A probability distribution value.
#[derive(Debug, Clone, PartialEq)]
pub enum Dist {
    Symbolic(SymbolicDist),
    /// An empirical sample set. Draws resample with replacement.
    Samples(Arc<[f64]>),
}

impl Dist {
    pub fn normal(mean: f64, stdev: f64) -> Self {
        Dist::Symbolic(SymbolicDist::Normal { mean, stdev })
    }

    pub fn uniform(low: f64, high: f64) -> Self {
        Dist::Symbolic(SymbolicDist::Uniform { low, high })
    }

    pub fn point_mass(value: f64) -> Self {
        Dist::Symbolic(SymbolicDist::PointMass { value })
    }

    pub fn from_samples(samples: impl Into<Arc<[f64]>>) -> Self {
        Dist::Samples(samples.into())
    }

    /// The distribution's mean; the arithmetic mean for sample sets.
    pub fn mean(&self) -> f64 {
        match self {
            Dist::Symbolic(sym) => sym.mean(),
            Dist::Samples(samples) => {
                if samples.is_empty() {
                    f64::NAN
                } else {
                    samples.iter().sum::<f64>() / samples.len() as f64
                }
            }
        }
    }

    /// Draw a single value from the given random source.
    pub fn sample(&self, rng: &mut ChaCha20Rng) -> f64 {
        match self {
            Dist::Symbolic(sym) => sym.sample(rng),
            Dist::Samples(samples) => {
                if samples.is_empty() {
                    f64::NAN
                } else {
                    samples[rng.gen_range(0..samples.len())]
                }
            }
        }
    }

    /// Draw `env.sample_count()` values from the environment's scoped
    /// random source.
    pub fn sample_n(&self, env: &Environment) -> Vec<f64> {
        env.with_rng(|rng| (0..env.sample_count()).map(|_| self.sample(rng)).collect())
    }
}

impl fmt::Display for Dist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dist::Symbolic(SymbolicDist::Normal { mean, stdev }) => {
                write!(f, "Normal({}, {})", fmt_number(*mean), fmt_number(*stdev))
            }
            Dist::Symbolic(SymbolicDist::Uniform { low, high }) => {
                write!(f, "Uniform({}, {})", fmt_number(*low), fmt_number(*high))
            }
            Dist::Symbolic(SymbolicDist::PointMass { value }) => {
                write!(f, "PointMass({})", fmt_number(*value))
            }
            Dist::Samples(samples) => write!(f, "SampleSet({} values)", samples.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn symbolic_means() {
        assert_eq!(Dist::normal(5.0, 2.0).mean(), 5.0);
        assert_eq!(Dist::uniform(0.0, 10.0).mean(), 5.0);
        assert_eq!(Dist::point_mass(3.0).mean(), 3.0);
    }

    #[test]
    fn sample_set_mean() {
        let dist = Dist::from_samples(vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(dist.mean(), 2.5);
    }

    #[test]
    fn point_mass_always_samples_its_value() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let dist = Dist::point_mass(42.0);
        for _ in 0..10 {
            assert_eq!(dist.sample(&mut rng), 42.0);
        }
    }

    #[test]
    fn uniform_samples_stay_in_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let dist = Dist::uniform(2.0, 3.0);
        for _ in 0..100 {
            let x = dist.sample(&mut rng);
            assert!((2.0..=3.0).contains(&x));
        }
    }

    #[test]
    fn sample_set_draws_only_members() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let members = [1.0, 2.0, 3.0];
        let dist = Dist::from_samples(members.to_vec());
        for _ in 0..50 {
            assert!(members.contains(&dist.sample(&mut rng)));
        }
    }

    #[test]
    fn sample_n_respects_environment() {
        let env = Environment::new(250, 42);
        let samples = Dist::normal(0.0, 1.0).sample_n(&env);
        assert_eq!(samples.len(), 250);

        // Same seed, same draws.
        let env2 = Environment::new(250, 42);
        assert_eq!(samples, Dist::normal(0.0, 1.0).sample_n(&env2));
    }

    #[test]
    fn normal_sampling_is_roughly_centered() {
        let env = Environment::new(4000, 1);
        let samples = Dist::normal(10.0, 1.0).sample_n(&env);
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!((mean - 10.0).abs() < 0.1);
    }

    #[test]
    fn display() {
        assert_eq!(Dist::normal(5.0, 2.0).to_string(), "Normal(5, 2)");
        assert_eq!(Dist::uniform(0.0, 1.5).to_string(), "Uniform(0, 1.5)");
        assert_eq!(
            Dist::from_samples(vec![1.0, 2.0]).to_string(),
            "SampleSet(2 values)"
        );
    }
}

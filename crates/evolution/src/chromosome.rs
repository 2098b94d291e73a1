//! Tunable configuration vector and its genetic operators.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive bounds of one gene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneBounds {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl GeneBounds {
    /// Bounds of `learning_rate`.
    pub const LEARNING_RATE: GeneBounds = GeneBounds { min: 0.001, max: 0.1 };
    /// Bounds of `confidence_threshold`.
    pub const CONFIDENCE_THRESHOLD: GeneBounds = GeneBounds { min: 0.6, max: 0.95 };
    /// Bounds of `cache_size`.
    pub const CACHE_SIZE: GeneBounds = GeneBounds { min: 50.0, max: 200.0 };

    /// Width of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Clamp a value into the range. NaN maps to the lower bound.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    /// Whether the value lies inside the range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Uniform sample from the range.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.random_range(self.min..=self.max)
    }
}

/// One candidate configuration.
///
/// Genes are clamped into [`GeneBounds`] whenever a chromosome is built, so
/// every value of this type is in range. Fitness is assigned by the engine
/// and only ever by producing a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chromosome {
    learning_rate: f64,
    confidence_threshold: f64,
    cache_size: u32,
    fitness: f64,
}

impl Chromosome {
    /// Build a chromosome with fitness 0, clamping each gene into bounds.
    pub fn new(learning_rate: f64, confidence_threshold: f64, cache_size: f64) -> Self {
        Self {
            learning_rate: GeneBounds::LEARNING_RATE.clamp(learning_rate),
            confidence_threshold: GeneBounds::CONFIDENCE_THRESHOLD.clamp(confidence_threshold),
            cache_size: GeneBounds::CACHE_SIZE.clamp(cache_size).round() as u32,
            fitness: 0.0,
        }
    }

    /// Draw every gene uniformly from its bounds.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::new(
            GeneBounds::LEARNING_RATE.sample(rng),
            GeneBounds::CONFIDENCE_THRESHOLD.sample(rng),
            GeneBounds::CACHE_SIZE.sample(rng),
        )
    }

    /// Learning rate gene.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Confidence threshold gene.
    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    /// Cache size gene.
    pub fn cache_size(&self) -> u32 {
        self.cache_size
    }

    /// Fitness from the last evaluation (0 before any).
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Whether every gene and the fitness are within bounds.
    pub fn is_within_bounds(&self) -> bool {
        GeneBounds::LEARNING_RATE.contains(self.learning_rate)
            && GeneBounds::CONFIDENCE_THRESHOLD.contains(self.confidence_threshold)
            && GeneBounds::CACHE_SIZE.contains(f64::from(self.cache_size))
            && (0.0..=1.0).contains(&self.fitness)
    }

    /// Same genes, re-clamped, carrying the given fitness.
    pub(crate) fn with_fitness(&self, fitness: f64) -> Self {
        let mut scored = Self::new(
            self.learning_rate,
            self.confidence_threshold,
            f64::from(self.cache_size),
        );
        scored.fitness = if fitness.is_nan() { 0.0 } else { fitness.clamp(0.0, 1.0) };
        scored
    }

    /// Field-wise recombination: each gene comes from one parent or, with
    /// probability `interpolation_rate`, from a random point between them.
    pub(crate) fn crossover<R: Rng>(&self, other: &Self, rng: &mut R, interpolation_rate: f64) -> Self {
        let mut pick = |a: f64, b: f64| -> f64 {
            if rng.random::<f64>() < interpolation_rate {
                let t = rng.random::<f64>();
                a + (b - a) * t
            } else if rng.random::<bool>() {
                a
            } else {
                b
            }
        };

        Self::new(
            pick(self.learning_rate, other.learning_rate),
            pick(self.confidence_threshold, other.confidence_threshold),
            pick(f64::from(self.cache_size), f64::from(other.cache_size)),
        )
    }

    /// Perturb each gene with probability `rate` by up to `scale` of its
    /// range, then clamp back into bounds.
    pub(crate) fn mutate<R: Rng>(&self, rng: &mut R, rate: f64, scale: f64) -> Self {
        let mut perturb = |value: f64, bounds: GeneBounds| -> f64 {
            if rng.random::<f64>() < rate {
                let delta = rng.random_range(-scale..=scale) * bounds.span();
                bounds.clamp(value + delta)
            } else {
                value
            }
        };

        Self::new(
            perturb(self.learning_rate, GeneBounds::LEARNING_RATE),
            perturb(self.confidence_threshold, GeneBounds::CONFIDENCE_THRESHOLD),
            perturb(f64::from(self.cache_size), GeneBounds::CACHE_SIZE),
        )
    }
}

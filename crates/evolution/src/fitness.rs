//! Fitness scoring of chromosomes against observed performance.
//!
//! Each gene has an "ideal" value implied by the metrics snapshot:
//!
//! ```text
//! confidence_threshold  0.6 + 0.35 * success_rate        (only high accuracy earns a strict threshold)
//! cache_size            50 + 150 * memory_headroom       (large caches only while memory is below the limit)
//! learning_rate         0.001 + 0.099 * (1 - success_rate)  (explore while outcomes are poor)
//! ```
//!
//! A gene scores `1 - |gene - ideal| / range`, so moving any gene toward its
//! ideal never lowers the total.

use crate::chromosome::{Chromosome, GeneBounds};
use crate::metrics::PerformanceMetrics;
use serde::{Deserialize, Serialize};

/// Relative weight of each fitness term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessWeights {
    /// Observed success rate
    pub success: f64,
    /// Normalised mean user rating
    pub rating: f64,
    /// Confidence threshold alignment
    pub confidence: f64,
    /// Cache size alignment
    pub cache: f64,
    /// Learning rate alignment
    pub learning_rate: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            success: 0.4,
            rating: 0.1,
            confidence: 0.2,
            cache: 0.2,
            learning_rate: 0.1,
        }
    }
}

impl FitnessWeights {
    fn total(&self) -> f64 {
        self.success + self.rating + self.confidence + self.cache + self.learning_rate
    }
}

/// Gene values the metrics currently favour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdealSettings {
    /// Favoured learning rate
    pub learning_rate: f64,
    /// Favoured confidence threshold
    pub confidence_threshold: f64,
    /// Favoured cache size
    pub cache_size: f64,
}

/// Scores chromosomes in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessModel {
    memory_limit_mb: f64,
    rating_scale: f64,
    weights: FitnessWeights,
}

impl FitnessModel {
    /// Create a model with default weights.
    pub fn new(memory_limit_mb: f64, rating_scale: f64) -> Self {
        Self {
            memory_limit_mb,
            rating_scale,
            weights: FitnessWeights::default(),
        }
    }

    /// Replace the term weights.
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Gene values implied by the metrics.
    pub fn ideal(&self, metrics: &PerformanceMetrics) -> IdealSettings {
        let success = unit(metrics.success_rate);
        let headroom = if self.memory_limit_mb > 0.0 {
            unit(1.0 - metrics.avg_memory_mb / self.memory_limit_mb)
        } else {
            0.0
        };

        let lr = GeneBounds::LEARNING_RATE;
        let ct = GeneBounds::CONFIDENCE_THRESHOLD;
        let cs = GeneBounds::CACHE_SIZE;

        IdealSettings {
            learning_rate: lr.min + lr.span() * (1.0 - success),
            confidence_threshold: ct.min + ct.span() * success,
            cache_size: cs.min + cs.span() * headroom,
        }
    }

    /// Score one chromosome against the metrics.
    pub fn score(&self, metrics: &PerformanceMetrics, chromosome: &Chromosome) -> f64 {
        let total = self.weights.total();
        if total <= 0.0 {
            return 0.0;
        }

        let ideal = self.ideal(metrics);
        let rating = if self.rating_scale > 0.0 {
            unit(metrics.avg_rating / self.rating_scale)
        } else {
            0.0
        };

        let weighted = self.weights.success * unit(metrics.success_rate)
            + self.weights.rating * rating
            + self.weights.confidence
                * alignment(chromosome.confidence_threshold(), ideal.confidence_threshold, GeneBounds::CONFIDENCE_THRESHOLD)
            + self.weights.cache
                * alignment(f64::from(chromosome.cache_size()), ideal.cache_size, GeneBounds::CACHE_SIZE)
            + self.weights.learning_rate
                * alignment(chromosome.learning_rate(), ideal.learning_rate, GeneBounds::LEARNING_RATE);

        unit(weighted / total)
    }
}

fn unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

fn alignment(value: f64, ideal: f64, bounds: GeneBounds) -> f64 {
    unit(1.0 - (value - ideal).abs() / bounds.span())
}

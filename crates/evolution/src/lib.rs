//! Evolution layer - self-tuning of configuration parameters.
//!
//! Outcome samples feed a [`MetricsAggregator`]; a [`GeneticEngine`] evolves
//! candidate configurations against its snapshots; an
//! [`ImprovementEvaluator`] computes single-step adjustments toward targets.

#![warn(missing_docs, unused_crate_dependencies)]

mod metrics;
mod chromosome;
mod population;
mod fitness;
mod config;
mod engine;
mod improvement;

pub use metrics::{MetricsAggregator, PerformanceMetrics};
pub use chromosome::{Chromosome, GeneBounds};
pub use population::Population;
pub use fitness::{FitnessModel, FitnessWeights, IdealSettings};
pub use config::{EvolutionConfig, ConfigError};
pub use engine::{GeneticEngine, EvolutionResult, AppliedConfiguration, EngineState, EvolutionError};
pub use improvement::{ImprovementEvaluator, DEFAULT_STEP_FRACTION};

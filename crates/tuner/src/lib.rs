//! Self-tuning facade.
//!
//! [`AdaptiveTuner`] is an explicitly constructed, caller-owned instance that
//! ties the metrics aggregator, the feedback loop, the genetic engine and the
//! improvement evaluator together behind a single-writer lock.

#![warn(missing_docs)]

mod config;
mod tuner;

pub use config::{TunerConfig, TunerError};
pub use tuner::{AdaptiveTuner, TunerSnapshot};

// Convenience re-exports for callers that only depend on the facade.
pub use autotune_core::{
    ImprovementArea, ImprovementOpportunity, ImprovementResult, ParamValue, ParameterMap, Priority,
    TaskCategory, TaskFeedback, TaskId, TaskResult,
};
pub use autotune_evolution::{
    AppliedConfiguration, Chromosome, EvolutionConfig, EvolutionResult, PerformanceMetrics,
};
pub use autotune_reflection::{AdaptationKind, CategorySummary, FeedbackConfig, TaskAdaptation};

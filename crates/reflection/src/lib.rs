//! Reflection layer - feedback recording and adaptation hints.

#![warn(missing_docs, unused_crate_dependencies)]

mod engine;
mod analyzer;

pub use engine::{FeedbackLoop, FeedbackConfig};
pub use analyzer::{AdaptationAnalyzer, TaskAdaptation, AdaptationKind, CategorySummary};

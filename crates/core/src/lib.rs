//! autotune core data models.
//!
//! This crate defines the value types shared by the self-tuning engine:
//! outcome samples, feedback events, improvement requests and the closed
//! parameter value type used when materialising configurations.

#![warn(missing_docs)]

// Core identities
mod id;

// Signals from completed work
mod task;
mod feedback;

// Configuration values and improvement requests
mod param;
mod improvement;

// Re-exports
pub use id::*;

pub use task::{TaskResult, TaskCategory};
pub use feedback::TaskFeedback;
pub use param::{ParamValue, ParameterMap};
pub use improvement::{
    ImprovementArea, Direction, Priority, ImprovementOpportunity, ImprovementResult,
};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

//! Feedback events recorded after a task completes.

use serde::{Deserialize, Serialize};
use crate::id::TaskId;
use crate::task::{TaskCategory, TaskResult};
use crate::Time;

/// Immutable feedback record for one completed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskFeedback {
    /// Task the feedback is about
    pub task_id: TaskId,

    /// Category of the task
    pub category: TaskCategory,

    /// Whether the task succeeded
    pub success: bool,

    /// Execution time (milliseconds)
    pub execution_time_ms: f64,

    /// User rating, nominally 1-5
    pub user_rating: f64,

    /// When the feedback was recorded
    pub recorded_at: Time,
}

impl TaskFeedback {
    /// Create a feedback record stamped with the current time.
    pub fn new(
        task_id: TaskId,
        category: TaskCategory,
        success: bool,
        execution_time_ms: f64,
        user_rating: f64,
    ) -> Self {
        Self {
            task_id,
            category,
            success,
            execution_time_ms,
            user_rating,
            recorded_at: chrono::Utc::now(),
        }
    }

    /// Build feedback from an outcome sample.
    pub fn from_result(result: &TaskResult, category: TaskCategory) -> Self {
        Self::new(
            result.task_id,
            category,
            result.success,
            result.execution_time_ms,
            result.user_rating,
        )
    }

    /// Override the recording timestamp.
    pub fn at(mut self, recorded_at: Time) -> Self {
        self.recorded_at = recorded_at;
        self
    }
}

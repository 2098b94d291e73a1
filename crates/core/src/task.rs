//! Outcome samples reported by the task layer.

use serde::{Deserialize, Serialize};
use crate::id::TaskId;

/// Category of a completed unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// Scheduling, reminders, notes
    Productivity,
    /// Messages and calls
    Communication,
    /// Lookups and information gathering
    Research,
    /// Multi-step automations
    Automation,
    /// Anything not covered above
    General,
}

impl TaskCategory {
    /// Every category, in declaration order.
    pub const ALL: [TaskCategory; 5] = [
        TaskCategory::Productivity,
        TaskCategory::Communication,
        TaskCategory::Research,
        TaskCategory::Automation,
        TaskCategory::General,
    ];

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Productivity => "productivity",
            Self::Communication => "communication",
            Self::Research => "research",
            Self::Automation => "automation",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one completed unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    /// Task that produced this sample
    pub task_id: TaskId,

    /// Whether the task succeeded
    pub success: bool,

    /// Wall-clock execution time (milliseconds)
    pub execution_time_ms: f64,

    /// Peak memory used (megabytes)
    pub memory_used_mb: f64,

    /// User rating, nominally on a 1-5 scale
    pub user_rating: f64,
}

impl TaskResult {
    /// Create a new outcome sample.
    pub fn new(
        task_id: TaskId,
        success: bool,
        execution_time_ms: f64,
        memory_used_mb: f64,
        user_rating: f64,
    ) -> Self {
        Self {
            task_id,
            success,
            execution_time_ms,
            memory_used_mb,
            user_rating,
        }
    }
}

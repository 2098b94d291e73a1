//! Running performance statistics for evolution.

use autotune_core::TaskResult;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Point-in-time view of aggregated task outcomes.
///
/// Rates and means are derived from the running totals when the snapshot
/// is taken; with no samples every field is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Total samples recorded
    pub total_tasks: u64,
    /// Successful samples
    pub successful_tasks: u64,
    /// Fraction of successful samples
    pub success_rate: f64,
    /// Mean execution time (milliseconds)
    pub avg_execution_time_ms: f64,
    /// Mean memory used (megabytes)
    pub avg_memory_mb: f64,
    /// Mean user rating
    pub avg_rating: f64,
}

impl PerformanceMetrics {
    /// Whether any sample has been recorded.
    pub fn has_samples(&self) -> bool {
        self.total_tasks > 0
    }
}

/// Accumulates outcome samples into running totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsAggregator {
    total_tasks: u64,
    successful_tasks: u64,
    total_execution_time_ms: f64,
    total_memory_mb: f64,
    total_rating: f64,
}

impl MetricsAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sample to the running totals.
    pub fn record_outcome(&mut self, sample: &TaskResult) {
        self.total_tasks += 1;
        if sample.success {
            self.successful_tasks += 1;
        }
        self.total_execution_time_ms += sample.execution_time_ms;
        self.total_memory_mb += sample.memory_used_mb;
        self.total_rating += sample.user_rating;

        trace!(task = %sample.task_id, success = sample.success, "Recorded outcome");
    }

    /// Compute the current aggregate view.
    pub fn snapshot(&self) -> PerformanceMetrics {
        if self.total_tasks == 0 {
            return PerformanceMetrics::default();
        }

        let n = self.total_tasks as f64;
        PerformanceMetrics {
            total_tasks: self.total_tasks,
            successful_tasks: self.successful_tasks,
            success_rate: self.successful_tasks as f64 / n,
            avg_execution_time_ms: self.total_execution_time_ms / n,
            avg_memory_mb: self.total_memory_mb / n,
            avg_rating: self.total_rating / n,
        }
    }

    /// Drop all recorded samples.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

//! Feedback loop - records task feedback and derives adaptations.

use crate::{AdaptationAnalyzer, CategorySummary, TaskAdaptation};
use autotune_core::{TaskCategory, TaskFeedback};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Configuration for the feedback loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Records needed before an adaptation reaches full confidence
    pub min_samples: usize,
    /// Half-life of a record's weight, in hours
    pub recency_half_life_hours: f64,
    /// Success rate below which exploration is recommended
    pub low_success_rate: f64,
    /// Success rate at or above which a stricter threshold is recommended
    pub high_success_rate: f64,
    /// Rating below which response quality needs attention
    pub low_rating: f64,
    /// Execution time above which latency needs attention (milliseconds)
    pub slow_execution_ms: f64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            min_samples: 5,
            recency_half_life_hours: 24.0,
            low_success_rate: 0.6,
            high_success_rate: 0.9,
            low_rating: 3.0,
            slow_execution_ms: 2000.0,
        }
    }
}

/// Append-only feedback log with category-scoped analysis.
pub struct FeedbackLoop {
    log: Vec<TaskFeedback>,
    analyzer: AdaptationAnalyzer,
    config: FeedbackConfig,
}

impl FeedbackLoop {
    /// Create an empty feedback loop.
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            analyzer: AdaptationAnalyzer::new(),
            config: FeedbackConfig::default(),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: FeedbackConfig) -> Self {
        self.config = config;
        self
    }

    /// Start from a previously exported log.
    pub fn with_entries(mut self, entries: Vec<TaskFeedback>) -> Self {
        self.log = entries;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &FeedbackConfig {
        &self.config
    }

    /// Append a feedback record.
    pub fn record_feedback(&mut self, feedback: TaskFeedback) {
        debug!(task = %feedback.task_id, category = %feedback.category, success = feedback.success, "Recorded feedback");
        self.log.push(feedback);
    }

    /// Adaptations for `category`; empty when no feedback matches.
    pub fn get_adaptations(&self, category: TaskCategory) -> Vec<TaskAdaptation> {
        let adaptations = self.analyzer.analyze(&self.log, category, &self.config);
        if !adaptations.is_empty() {
            info!("Derived {} adaptation(s) for {}", adaptations.len(), category);
        }
        adaptations
    }

    /// Weighted statistics for `category`.
    pub fn category_summary(&self, category: TaskCategory) -> Option<CategorySummary> {
        self.analyzer.summarize(&self.log, category, &self.config)
    }

    /// All records, oldest first.
    pub fn entries(&self) -> &[TaskFeedback] {
        &self.log
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Whether no feedback has been recorded.
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

impl Default for FeedbackLoop {
    fn default() -> Self {
        Self::new()
    }
}

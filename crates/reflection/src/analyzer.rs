//! Derives adaptation hints from category feedback.

use crate::FeedbackConfig;
use autotune_core::{TaskCategory, TaskFeedback};
use serde::{Deserialize, Serialize};

/// Kind of adjustment an adaptation recommends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptationKind {
    /// Success is low; explore more and accept less certain results
    IncreaseExploration,
    /// Success is consistently high; require more certainty
    RaiseConfidenceThreshold,
    /// Users rate results poorly
    ImproveResponseQuality,
    /// Tasks run slowly
    ReduceLatency,
    /// Nothing stands out; keep the current strategy
    MaintainStrategy,
}

impl AdaptationKind {
    /// Tuning parameter this adaptation most directly affects, if any.
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            Self::IncreaseExploration => Some("learning_rate"),
            Self::RaiseConfidenceThreshold => Some("confidence_threshold"),
            Self::ReduceLatency => Some("cache_size"),
            Self::ImproveResponseQuality | Self::MaintainStrategy => None,
        }
    }
}

/// A category-scoped recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAdaptation {
    /// Category the recommendation applies to
    pub category: TaskCategory,
    /// What to adjust
    pub kind: AdaptationKind,
    /// Confidence, always in (0, 1]
    pub confidence: f64,
    /// Human-readable recommendation
    pub recommendation: String,
    /// Feedback records behind the recommendation
    pub sample_count: usize,
}

/// Recency-weighted statistics for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Matching feedback records
    pub samples: usize,
    /// Weighted success rate
    pub success_rate: f64,
    /// Weighted mean rating
    pub avg_rating: f64,
    /// Weighted mean execution time (milliseconds)
    pub avg_execution_time_ms: f64,
}

/// Turns feedback history into adaptations.
pub struct AdaptationAnalyzer;

impl AdaptationAnalyzer {
    /// Create a new analyzer.
    pub fn new() -> Self {
        Self
    }

    /// Weighted statistics for `category`, or `None` with no evidence.
    ///
    /// Records are weighted by `0.5^(age / half_life)`, age measured from the
    /// newest matching record.
    pub fn summarize(
        &self,
        log: &[TaskFeedback],
        category: TaskCategory,
        config: &FeedbackConfig,
    ) -> Option<CategorySummary> {
        let matching: Vec<&TaskFeedback> = log.iter().filter(|f| f.category == category).collect();
        let newest = matching.iter().map(|f| f.recorded_at).max()?;

        let half_life_secs = config.recency_half_life_hours * 3600.0;
        let mut total_weight = 0.0;
        let mut success = 0.0;
        let mut rating = 0.0;
        let mut time = 0.0;

        for feedback in &matching {
            let age: chrono::Duration = newest - feedback.recorded_at;
            let age_secs = age.num_milliseconds() as f64 / 1000.0;
            let weight = if half_life_secs > 0.0 {
                0.5_f64.powf(age_secs / half_life_secs)
            } else {
                1.0
            };
            total_weight += weight;
            if feedback.success {
                success += weight;
            }
            rating += weight * feedback.user_rating;
            time += weight * feedback.execution_time_ms;
        }

        if !(total_weight > 0.0) {
            return None;
        }

        Some(CategorySummary {
            samples: matching.len(),
            success_rate: success / total_weight,
            avg_rating: rating / total_weight,
            avg_execution_time_ms: time / total_weight,
        })
    }

    /// Derive adaptations for `category`; empty when there is no feedback.
    pub fn analyze(
        &self,
        log: &[TaskFeedback],
        category: TaskCategory,
        config: &FeedbackConfig,
    ) -> Vec<TaskAdaptation> {
        let Some(summary) = self.summarize(log, category, config) else {
            return Vec::new();
        };

        let evidence = (summary.samples as f64 / config.min_samples.max(1) as f64).min(1.0);
        let mut candidates: Vec<(AdaptationKind, f64, String)> = Vec::new();

        if summary.success_rate < config.low_success_rate {
            let strength = (config.low_success_rate - summary.success_rate) / config.low_success_rate;
            candidates.push((
                AdaptationKind::IncreaseExploration,
                strength,
                format!(
                    "Success rate {:.0}% is below {:.0}%; widen exploration for {} tasks",
                    summary.success_rate * 100.0,
                    config.low_success_rate * 100.0,
                    category
                ),
            ));
        } else if summary.success_rate >= config.high_success_rate {
            candidates.push((
                AdaptationKind::RaiseConfidenceThreshold,
                summary.success_rate,
                format!(
                    "Success rate {:.0}% is consistently high; require more certainty for {} tasks",
                    summary.success_rate * 100.0,
                    category
                ),
            ));
        }

        if summary.avg_rating < config.low_rating {
            let strength = (config.low_rating - summary.avg_rating) / config.low_rating;
            candidates.push((
                AdaptationKind::ImproveResponseQuality,
                strength,
                format!("Average rating {:.1} is below {:.1}", summary.avg_rating, config.low_rating),
            ));
        }

        if summary.avg_execution_time_ms > config.slow_execution_ms {
            let strength = (summary.avg_execution_time_ms - config.slow_execution_ms) / config.slow_execution_ms;
            candidates.push((
                AdaptationKind::ReduceLatency,
                strength,
                format!(
                    "Average execution time {:.0}ms exceeds {:.0}ms",
                    summary.avg_execution_time_ms, config.slow_execution_ms
                ),
            ));
        }

        if candidates.is_empty() {
            candidates.push((
                AdaptationKind::MaintainStrategy,
                summary.success_rate,
                format!("{} tasks are performing within expectations", category),
            ));
        }

        candidates
            .into_iter()
            .filter_map(|(kind, strength, recommendation)| {
                let confidence = evidence * strength;
                (confidence > 0.0).then(|| TaskAdaptation {
                    category,
                    kind,
                    confidence: confidence.min(1.0),
                    recommendation,
                    sample_count: summary.samples,
                })
            })
            .collect()
    }
}

impl Default for AdaptationAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

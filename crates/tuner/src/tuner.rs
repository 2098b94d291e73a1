//! The adaptive tuner - one instance per tuned system.

use crate::{TunerConfig, TunerError};
use autotune_core::{
    ImprovementOpportunity, ImprovementResult, TaskCategory, TaskFeedback, TaskResult, Time,
};
use autotune_evolution::{
    AppliedConfiguration, Chromosome, EngineState, EvolutionResult, GeneticEngine,
    ImprovementEvaluator, MetricsAggregator, PerformanceMetrics,
};
use autotune_reflection::{CategorySummary, FeedbackLoop, TaskAdaptation};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Everything a caller needs to persist to resume a tuner later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TunerSnapshot {
    /// Running outcome totals
    pub metrics: MetricsAggregator,
    /// Feedback log, oldest first
    pub feedback: Vec<TaskFeedback>,
    /// Genetic engine generation and population
    pub engine: EngineState,
    /// When the snapshot was taken
    pub taken_at: Time,
}

struct TunerState {
    metrics: MetricsAggregator,
    feedback: FeedbackLoop,
    engine: GeneticEngine,
}

/// Closed-loop self-tuning engine.
///
/// ```text
/// record_outcome / record_feedback → evolve_population → apply_best_configuration
///                                   execute_improvement (stateless, independent)
/// ```
///
/// All mutation goes through one write lock, so recording and evolving are
/// serialised per instance; reads return point-in-time copies.
pub struct AdaptiveTuner {
    state: RwLock<TunerState>,
    evaluator: ImprovementEvaluator,
    config: TunerConfig,
}

impl AdaptiveTuner {
    /// Build a tuner with a fresh random population.
    pub fn new(config: TunerConfig) -> Result<Self, TunerError> {
        config.validate()?;

        let engine = GeneticEngine::new(config.evolution.clone())?;
        let feedback = FeedbackLoop::new().with_config(config.feedback.clone());
        let evaluator = ImprovementEvaluator::new().with_step_fraction(config.improvement_step_fraction);

        info!(
            population = config.evolution.population_size,
            "Adaptive tuner initialised"
        );

        Ok(Self {
            state: RwLock::new(TunerState {
                metrics: MetricsAggregator::new(),
                feedback,
                engine,
            }),
            evaluator,
            config,
        })
    }

    /// Configuration the tuner was built with.
    pub fn config(&self) -> &TunerConfig {
        &self.config
    }

    /// Add one outcome sample to the running metrics.
    pub async fn record_outcome(&self, sample: TaskResult) {
        self.state.write().await.metrics.record_outcome(&sample);
    }

    /// Append one feedback record.
    pub async fn record_feedback(&self, feedback: TaskFeedback) {
        self.state.write().await.feedback.record_feedback(feedback);
    }

    /// Record an outcome and its category feedback as one atomic update.
    pub async fn record_completion(&self, sample: TaskResult, category: TaskCategory) {
        let mut state = self.state.write().await;
        state.metrics.record_outcome(&sample);
        state.feedback.record_feedback(TaskFeedback::from_result(&sample, category));
    }

    /// Point-in-time performance metrics.
    pub async fn metrics_snapshot(&self) -> PerformanceMetrics {
        self.state.read().await.metrics.snapshot()
    }

    /// Clear the running metrics. The feedback log and population are kept.
    pub async fn reset_metrics(&self) {
        self.state.write().await.metrics.reset();
        debug!("Metrics reset");
    }

    /// Adaptations for `category`; empty without matching feedback.
    pub async fn get_adaptations(&self, category: TaskCategory) -> Vec<TaskAdaptation> {
        self.state.read().await.feedback.get_adaptations(category)
    }

    /// Weighted statistics for `category`.
    pub async fn category_summary(&self, category: TaskCategory) -> Option<CategorySummary> {
        self.state.read().await.feedback.category_summary(category)
    }

    /// Evolve one generation against the current metrics.
    pub async fn evolve_population(&self) -> EvolutionResult {
        let mut state = self.state.write().await;
        let metrics = state.metrics.snapshot();
        state.engine.evolve_population(&metrics)
    }

    /// Best chromosome of the current generation, `None` before evolving.
    pub async fn best_chromosome(&self) -> Option<Chromosome> {
        self.state.read().await.engine.best_chromosome()
    }

    /// Best chromosome as named parameters.
    pub async fn apply_best_configuration(&self) -> AppliedConfiguration {
        self.state.read().await.engine.apply_best_configuration()
    }

    /// Generations completed so far.
    pub async fn generation(&self) -> u64 {
        self.state.read().await.engine.generation()
    }

    /// Compute one bounded improvement step. Does not touch tuner state.
    pub fn execute_improvement(&self, opportunity: &ImprovementOpportunity) -> ImprovementResult {
        self.evaluator.execute_improvement(opportunity)
    }

    /// Open opportunities, most urgent first.
    pub fn rank_improvements<'a>(
        &self,
        opportunities: &'a [ImprovementOpportunity],
    ) -> Vec<&'a ImprovementOpportunity> {
        self.evaluator.rank(opportunities)
    }

    /// Capture the full tuner state.
    pub async fn snapshot(&self) -> TunerSnapshot {
        let state = self.state.read().await;
        TunerSnapshot {
            metrics: state.metrics.clone(),
            feedback: state.feedback.entries().to_vec(),
            engine: state.engine.state(),
            taken_at: chrono::Utc::now(),
        }
    }

    /// Replace the tuner state with a snapshot. On error nothing changes.
    pub async fn restore(&self, snapshot: TunerSnapshot) -> Result<(), TunerError> {
        let mut state = self.state.write().await;
        state.engine.restore(snapshot.engine)?;
        state.metrics = snapshot.metrics;
        state.feedback = FeedbackLoop::new()
            .with_config(self.config.feedback.clone())
            .with_entries(snapshot.feedback);

        info!(
            generation = state.engine.generation(),
            feedback = state.feedback.len(),
            "Restored tuner from snapshot taken at {}",
            snapshot.taken_at
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotune_core::{ImprovementArea, TaskId};
    use autotune_evolution::EvolutionConfig;
    use std::sync::Arc;

    fn tuner(seed: u64) -> AdaptiveTuner {
        AdaptiveTuner::new(TunerConfig {
            evolution: EvolutionConfig {
                population_size: 12,
                seed: Some(seed),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap()
    }

    fn sample(success: bool) -> TaskResult {
        TaskResult::new(TaskId::new(), success, 250.0, 96.0, if success { 4.5 } else { 2.0 })
    }

    #[tokio::test]
    async fn test_empty_tuner_is_neutral() {
        let tuner = tuner(1);
        assert_eq!(tuner.metrics_snapshot().await, PerformanceMetrics::default());
        assert!(tuner.best_chromosome().await.is_none());
        assert!(!tuner.apply_best_configuration().await.success);
        assert!(tuner.get_adaptations(TaskCategory::General).await.is_empty());
    }

    #[tokio::test]
    async fn test_closed_loop_produces_configuration() {
        let tuner = tuner(2);
        for i in 0..20 {
            tuner.record_completion(sample(i % 5 != 0), TaskCategory::Productivity).await;
        }

        let result = tuner.evolve_population().await;
        assert_eq!(result.generation, 1);
        assert!((0.0..=1.0).contains(&result.best_fitness));

        let applied = tuner.apply_best_configuration().await;
        assert!(applied.success);
        for key in ["learning_rate", "confidence_threshold", "fitness"] {
            assert!(applied.parameters.contains_key(key));
        }

        let metrics = tuner.metrics_snapshot().await;
        assert_eq!(metrics.total_tasks, 20);
        assert!((metrics.success_rate - 0.8).abs() < 1e-9);
        assert!(!tuner.get_adaptations(TaskCategory::Productivity).await.is_empty());
    }

    #[tokio::test]
    async fn test_best_fitness_does_not_degrade_with_improving_outcomes() {
        let tuner = tuner(3);
        let mut previous: Option<f64> = None;

        for round in 0..3 {
            // success climbs from 50% to 90% per round
            for i in 0..10 {
                tuner.record_outcome(sample(i < 5 + round * 2)).await;
            }
            let result = tuner.evolve_population().await;
            if let Some(prev) = previous {
                assert!(result.best_fitness >= prev - 0.1);
            }
            previous = Some(result.best_fitness);
        }
    }

    #[tokio::test]
    async fn test_concurrent_writers_are_serialised() {
        let tuner = Arc::new(tuner(4));
        let mut handles = Vec::new();
        for w in 0..8 {
            let tuner = Arc::clone(&tuner);
            handles.push(tokio::spawn(async move {
                for i in 0..25 {
                    tuner.record_completion(sample((w + i) % 2 == 0), TaskCategory::Research).await;
                    if i % 10 == 0 {
                        tuner.evolve_population().await;
                    }
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let metrics = tuner.metrics_snapshot().await;
        assert_eq!(metrics.total_tasks, 200);
        assert_eq!(tuner.generation().await, 24);
        assert_eq!(tuner.snapshot().await.feedback.len(), 200);
    }

    #[tokio::test]
    async fn test_snapshot_restore_round_trip() {
        let source = tuner(5);
        for i in 0..10 {
            source.record_completion(sample(i % 3 != 0), TaskCategory::Automation).await;
        }
        source.evolve_population().await;
        source.evolve_population().await;
        let snapshot = source.snapshot().await;

        let target = tuner(6);
        target.restore(snapshot.clone()).await.unwrap();

        assert_eq!(target.generation().await, 2);
        assert_eq!(target.metrics_snapshot().await, source.metrics_snapshot().await);
        assert_eq!(target.best_chromosome().await, source.best_chromosome().await);
        assert_eq!(
            target.get_adaptations(TaskCategory::Automation).await,
            source.get_adaptations(TaskCategory::Automation).await
        );

        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: TunerSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.engine.generation, 2);
    }

    #[tokio::test]
    async fn test_failed_restore_leaves_state_untouched() {
        let big = tuner(7);
        big.record_outcome(sample(true)).await;
        big.evolve_population().await;

        let small = AdaptiveTuner::new(TunerConfig {
            evolution: EvolutionConfig {
                population_size: 4,
                seed: Some(8),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();

        assert!(small.restore(big.snapshot().await).await.is_err());
        assert_eq!(small.generation().await, 0);
        assert_eq!(small.metrics_snapshot().await.total_tasks, 0);
    }

    #[tokio::test]
    async fn test_improvement_path_is_independent() {
        let tuner = tuner(9);
        let result = tuner.execute_improvement(&ImprovementOpportunity::new(
            ImprovementArea::UserSatisfaction,
            3.0,
            5.0,
        ));
        assert!(result.success);
        assert!((result.new_value - 4.0).abs() < 0.01);
        assert_eq!(tuner.generation().await, 0);
    }

    #[tokio::test]
    async fn test_reset_metrics_keeps_population() {
        let tuner = tuner(10);
        tuner.record_outcome(sample(true)).await;
        tuner.evolve_population().await;
        tuner.reset_metrics().await;

        assert_eq!(tuner.metrics_snapshot().await.total_tasks, 0);
        assert!(tuner.best_chromosome().await.is_some());
    }
}

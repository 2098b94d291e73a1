//! Improvement evaluator - bounded, area-specific adjustments toward a target.

use autotune_core::{Direction, ImprovementOpportunity, ImprovementResult};
use tracing::debug;

/// Fraction of the remaining gap closed per call by default.
pub const DEFAULT_STEP_FRACTION: f64 = 0.5;

/// Computes how far one step may move a performance area toward its target.
///
/// Stateless: the same opportunity always yields the same result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImprovementEvaluator {
    step_fraction: f64,
}

impl ImprovementEvaluator {
    /// Create an evaluator that closes half the gap per call.
    pub fn new() -> Self {
        Self {
            step_fraction: DEFAULT_STEP_FRACTION,
        }
    }

    /// Set the fraction of the gap closed per call, clamped to `(0, 1]`.
    pub fn with_step_fraction(mut self, fraction: f64) -> Self {
        self.step_fraction = if fraction.is_nan() || fraction <= 0.0 {
            DEFAULT_STEP_FRACTION
        } else {
            fraction.min(1.0)
        };
        self
    }

    /// Fraction of the gap closed per call.
    pub fn step_fraction(&self) -> f64 {
        self.step_fraction
    }

    /// Validate the opportunity and compute one bounded improvement step.
    ///
    /// A target that is already met is a normal outcome and returns
    /// `success = false` with the current value unchanged. So is a step that
    /// leaves the value where it was.
    pub fn execute_improvement(&self, opportunity: &ImprovementOpportunity) -> ImprovementResult {
        let current = opportunity.current_value;
        let gap = opportunity.gap();

        if !(gap > 0.0) {
            debug!(area = %opportunity.area, current, target = opportunity.target_value, "Target already met");
            return unchanged(opportunity);
        }

        let new_value = match opportunity.area.direction() {
            Direction::HigherIsBetter => current + self.step_fraction * gap,
            Direction::LowerIsBetter if current > 0.0 => {
                let reduction = self.step_fraction * gap / current;
                current * (1.0 - reduction)
            }
            Direction::LowerIsBetter => current - self.step_fraction * gap,
        };
        let actual_improvement = (new_value - current).abs();

        // A gap below float resolution can round the step away entirely.
        if !new_value.is_finite() || !(actual_improvement > 0.0) {
            debug!(area = %opportunity.area, current, gap, "Step too small to move the value");
            return unchanged(opportunity);
        }

        debug!(
            area = %opportunity.area,
            priority = ?opportunity.priority,
            current,
            new_value,
            "Computed improvement"
        );

        ImprovementResult {
            area: opportunity.area,
            success: true,
            actual_improvement,
            new_value,
            target_value: opportunity.target_value,
        }
    }

    /// Order opportunities by priority, then by relative gap, dropping those
    /// whose target is already met.
    pub fn rank<'a>(&self, opportunities: &'a [ImprovementOpportunity]) -> Vec<&'a ImprovementOpportunity> {
        let mut open: Vec<_> = opportunities.iter().filter(|o| o.gap() > 0.0).collect();
        open.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| relative_gap(b).partial_cmp(&relative_gap(a)).unwrap_or(std::cmp::Ordering::Equal))
        });
        open
    }
}

impl Default for ImprovementEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn unchanged(opportunity: &ImprovementOpportunity) -> ImprovementResult {
    ImprovementResult {
        area: opportunity.area,
        success: false,
        actual_improvement: 0.0,
        new_value: opportunity.current_value,
        target_value: opportunity.target_value,
    }
}

fn relative_gap(opportunity: &ImprovementOpportunity) -> f64 {
    let scale = opportunity.current_value.abs().max(opportunity.target_value.abs());
    if scale > 0.0 {
        opportunity.gap() / scale
    } else {
        opportunity.gap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotune_core::{ImprovementArea, Priority};

    #[test]
    fn test_user_satisfaction_moves_halfway() {
        let evaluator = ImprovementEvaluator::new();
        let result = evaluator.execute_improvement(&ImprovementOpportunity::new(
            ImprovementArea::UserSatisfaction,
            3.0,
            5.0,
        ));

        assert!(result.success);
        assert!((result.actual_improvement - 1.0).abs() < 0.01);
        assert!((result.new_value - 4.0).abs() < 0.01);
        assert_eq!(result.target_value, 5.0);
    }

    #[test]
    fn test_exceeded_target_is_a_failure_result() {
        let evaluator = ImprovementEvaluator::new();
        let result = evaluator.execute_improvement(&ImprovementOpportunity::new(
            ImprovementArea::Accuracy,
            0.95,
            0.90,
        ));

        assert!(!result.success);
        assert_eq!(result.actual_improvement, 0.0);
        assert_eq!(result.new_value, 0.95);
    }

    #[test]
    fn test_met_target_exactly_is_a_failure_result() {
        let evaluator = ImprovementEvaluator::new();
        let result = evaluator.execute_improvement(&ImprovementOpportunity::new(
            ImprovementArea::Reliability,
            0.9,
            0.9,
        ));
        assert!(!result.success);
        assert_eq!(result.new_value, 0.9);
    }

    #[test]
    fn test_efficiency_reduces_current_value() {
        let evaluator = ImprovementEvaluator::new();
        let result = evaluator.execute_improvement(&ImprovementOpportunity::new(
            ImprovementArea::Efficiency,
            10.0,
            5.0,
        ));

        assert!(result.success);
        assert!(result.actual_improvement > 0.0);
        assert!(result.new_value < 10.0);
        assert!((result.new_value - 7.5).abs() < 1e-9);
        assert!((result.actual_improvement - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_lower_is_better_with_non_positive_current() {
        let evaluator = ImprovementEvaluator::new();
        let result = evaluator.execute_improvement(&ImprovementOpportunity::new(
            ImprovementArea::Latency,
            0.0,
            -4.0,
        ));
        assert!(result.success);
        assert!((result.new_value + 2.0).abs() < 1e-9);
        assert!((result.actual_improvement - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_additive_areas_never_overshoot() {
        let evaluator = ImprovementEvaluator::new().with_step_fraction(1.0);
        let result = evaluator.execute_improvement(&ImprovementOpportunity::new(
            ImprovementArea::Accuracy,
            0.5,
            0.8,
        ));
        assert!(result.new_value <= 0.8 + 1e-12);
    }

    #[test]
    fn test_repeated_calls_are_idempotent() {
        let evaluator = ImprovementEvaluator::new();
        let opportunity = ImprovementOpportunity::new(ImprovementArea::ResourceUsage, 300.0, 200.0);
        assert_eq!(
            evaluator.execute_improvement(&opportunity),
            evaluator.execute_improvement(&opportunity)
        );
    }

    #[test]
    fn test_nan_gap_is_rejected() {
        let evaluator = ImprovementEvaluator::new();
        let result = evaluator.execute_improvement(&ImprovementOpportunity::new(
            ImprovementArea::Accuracy,
            f64::NAN,
            0.9,
        ));
        assert!(!result.success);
        assert_eq!(result.actual_improvement, 0.0);
    }

    #[test]
    fn test_gap_below_float_resolution_is_a_failure_result() {
        let evaluator = ImprovementEvaluator::new();
        let result = evaluator.execute_improvement(&ImprovementOpportunity::new(
            ImprovementArea::Efficiency,
            1.0,
            1.0 - f64::EPSILON / 2.0,
        ));

        assert!(!result.success);
        assert_eq!(result.actual_improvement, 0.0);
        assert_eq!(result.new_value, 1.0);
    }

    #[test]
    fn test_successful_steps_always_move_the_value() {
        let evaluator = ImprovementEvaluator::new();
        for (area, current, target) in [
            (ImprovementArea::Accuracy, 1.0, 1.0 + f64::EPSILON),
            (ImprovementArea::Latency, 1.0e300, 1.0e300 - 1.0),
            (ImprovementArea::UserSatisfaction, 3.0, 5.0),
        ] {
            let result = evaluator.execute_improvement(&ImprovementOpportunity::new(area, current, target));
            if result.success {
                assert!(result.actual_improvement > 0.0);
                assert_ne!(result.new_value, current);
            } else {
                assert_eq!(result.new_value, current);
            }
        }
    }

    #[test]
    fn test_step_fraction_is_clamped() {
        assert_eq!(ImprovementEvaluator::new().with_step_fraction(3.0).step_fraction(), 1.0);
        assert_eq!(ImprovementEvaluator::new().with_step_fraction(-1.0).step_fraction(), 0.5);
    }

    #[test]
    fn test_rank_orders_by_priority_then_gap() {
        let evaluator = ImprovementEvaluator::new();
        let opportunities = vec![
            ImprovementOpportunity::new(ImprovementArea::Accuracy, 0.8, 0.9).with_priority(Priority::High),
            ImprovementOpportunity::new(ImprovementArea::Latency, 400.0, 200.0).with_priority(Priority::High),
            ImprovementOpportunity::new(ImprovementArea::UserSatisfaction, 3.0, 4.0)
                .with_priority(Priority::Critical),
            ImprovementOpportunity::new(ImprovementArea::Reliability, 0.99, 0.95)
                .with_priority(Priority::Critical),
        ];

        let ranked = evaluator.rank(&opportunities);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].area, ImprovementArea::UserSatisfaction);
        assert_eq!(ranked[1].area, ImprovementArea::Latency);
        assert_eq!(ranked[2].area, ImprovementArea::Accuracy);
    }
}

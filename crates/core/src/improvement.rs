//! Improvement requests and their outcomes.

use serde::{Deserialize, Serialize};

/// Which way an area improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Larger values are better; improvements are additive.
    HigherIsBetter,
    /// Smaller values are better; improvements are proportional reductions.
    LowerIsBetter,
}

/// Named performance area an improvement targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementArea {
    /// Fraction of correct outcomes
    Accuracy,
    /// User rating
    UserSatisfaction,
    /// Fraction of tasks completing without error
    Reliability,
    /// Execution cost of a task (e.g. time)
    Efficiency,
    /// Response latency
    Latency,
    /// Memory or compute footprint
    ResourceUsage,
}

impl ImprovementArea {
    /// Every area, in declaration order.
    pub const ALL: [ImprovementArea; 6] = [
        ImprovementArea::Accuracy,
        ImprovementArea::UserSatisfaction,
        ImprovementArea::Reliability,
        ImprovementArea::Efficiency,
        ImprovementArea::Latency,
        ImprovementArea::ResourceUsage,
    ];

    /// Direction in which this area improves.
    pub fn direction(&self) -> Direction {
        match self {
            Self::Accuracy | Self::UserSatisfaction | Self::Reliability => Direction::HigherIsBetter,
            Self::Efficiency | Self::Latency | Self::ResourceUsage => Direction::LowerIsBetter,
        }
    }

    /// Stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accuracy => "accuracy",
            Self::UserSatisfaction => "user_satisfaction",
            Self::Reliability => "reliability",
            Self::Efficiency => "efficiency",
            Self::Latency => "latency",
            Self::ResourceUsage => "resource_usage",
        }
    }
}

impl std::fmt::Display for ImprovementArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority of an improvement opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Nice to have
    Low,
    /// Default
    Medium,
    /// Should be addressed soon
    High,
    /// Address first
    Critical,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// A request to move one performance area toward a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementOpportunity {
    /// Area to improve
    pub area: ImprovementArea,

    /// Current observed value
    pub current_value: f64,

    /// Desired value
    pub target_value: f64,

    /// Priority
    pub priority: Priority,

    /// Why this improvement is wanted
    pub rationale: String,
}

impl ImprovementOpportunity {
    /// Create an opportunity with medium priority and no rationale.
    pub fn new(area: ImprovementArea, current_value: f64, target_value: f64) -> Self {
        Self {
            area,
            current_value,
            target_value,
            priority: Priority::default(),
            rationale: String::new(),
        }
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the rationale.
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = rationale.into();
        self
    }

    /// Distance still to cover, signed so that positive means "not yet met".
    pub fn gap(&self) -> f64 {
        match self.area.direction() {
            Direction::HigherIsBetter => self.target_value - self.current_value,
            Direction::LowerIsBetter => self.current_value - self.target_value,
        }
    }
}

/// Outcome of evaluating an improvement opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementResult {
    /// Area that was evaluated
    pub area: ImprovementArea,

    /// Whether any improvement was made
    pub success: bool,

    /// Magnitude of the improvement (never negative)
    pub actual_improvement: f64,

    /// Value after applying the improvement
    pub new_value: f64,

    /// The requested target, for reference
    pub target_value: f64,
}

//! Tuner configuration.

use autotune_evolution::{ConfigError, EvolutionConfig, EvolutionError, DEFAULT_STEP_FRACTION};
use autotune_reflection::FeedbackConfig;
use serde::{Deserialize, Serialize};

/// Errors from building or restoring a tuner.
#[derive(Debug, thiserror::Error)]
pub enum TunerError {
    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Genetic engine error
    #[error(transparent)]
    Evolution(#[from] EvolutionError),
}

impl From<ConfigError> for TunerError {
    fn from(err: ConfigError) -> Self {
        Self::Evolution(EvolutionError::Config(err))
    }
}

/// Configuration for every tuner component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunerConfig {
    /// Genetic engine settings
    pub evolution: EvolutionConfig,
    /// Feedback loop settings
    pub feedback: FeedbackConfig,
    /// Fraction of the gap closed per improvement step
    pub improvement_step_fraction: f64,
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            evolution: EvolutionConfig::default(),
            feedback: FeedbackConfig::default(),
            improvement_step_fraction: DEFAULT_STEP_FRACTION,
        }
    }
}

impl TunerConfig {
    /// Check every section.
    pub fn validate(&self) -> Result<(), TunerError> {
        self.evolution.validate()?;

        if !(self.improvement_step_fraction > 0.0 && self.improvement_step_fraction <= 1.0) {
            return Err(TunerError::Config(format!(
                "improvement_step_fraction must be within (0, 1], got {}",
                self.improvement_step_fraction
            )));
        }
        if !(self.feedback.low_success_rate <= self.feedback.high_success_rate) {
            return Err(TunerError::Config(format!(
                "feedback.low_success_rate ({}) must not exceed feedback.high_success_rate ({})",
                self.feedback.low_success_rate, self.feedback.high_success_rate
            )));
        }
        if !(self.feedback.recency_half_life_hours >= 0.0) {
            return Err(TunerError::Config(format!(
                "feedback.recency_half_life_hours must not be negative, got {}",
                self.feedback.recency_half_life_hours
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TunerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: TunerConfig = serde_json::from_str(
            r#"{"evolution": {"population_size": 8, "seed": 42}, "improvement_step_fraction": 0.25}"#,
        )
        .unwrap();

        assert_eq!(config.evolution.population_size, 8);
        assert_eq!(config.evolution.seed, Some(42));
        assert_eq!(config.evolution.elite_count, 1);
        assert_eq!(config.improvement_step_fraction, 0.25);
        assert_eq!(config.feedback, FeedbackConfig::default());
    }

    #[test]
    fn test_rejects_bad_sections() {
        let mut config = TunerConfig::default();
        config.improvement_step_fraction = 0.0;
        assert!(matches!(config.validate(), Err(TunerError::Config(_))));

        let mut config = TunerConfig::default();
        config.feedback.low_success_rate = 0.95;
        assert!(matches!(config.validate(), Err(TunerError::Config(_))));

        let mut config = TunerConfig::default();
        config.evolution.population_size = 0;
        assert!(matches!(config.validate(), Err(TunerError::Evolution(_))));
    }
}

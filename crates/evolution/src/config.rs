//! Configuration for the genetic engine.

use serde::{Deserialize, Serialize};

/// Errors in an [`EvolutionConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Population too small to breed
    #[error("population_size must be at least 2, got {0}")]
    PopulationTooSmall(usize),

    /// Elites must leave room for offspring
    #[error("elite_count must be between 1 and population_size - 1, got {elite_count} for population {population_size}")]
    InvalidEliteCount {
        /// Configured elites
        elite_count: usize,
        /// Configured population size
        population_size: usize,
    },

    /// Tournament must pick at least one contestant
    #[error("tournament_size must be at least 1")]
    EmptyTournament,

    /// A probability outside [0, 1]
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability {
        /// Field name
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// A quantity that must be positive
    #[error("{name} must be positive, got {value}")]
    NotPositive {
        /// Field name
        name: &'static str,
        /// Offending value
        value: f64,
    },
}

/// Parameters of the genetic algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Members per generation (constant for the engine's lifetime)
    pub population_size: usize,
    /// Best members carried unchanged into the next generation
    pub elite_count: usize,
    /// Contestants per tournament
    pub tournament_size: usize,
    /// Probability that an offspring is produced by crossover rather than cloned
    pub crossover_rate: f64,
    /// Probability, per gene, of interpolating between parents during crossover
    pub interpolation_rate: f64,
    /// Probability, per gene, of mutation
    pub mutation_rate: f64,
    /// Maximum mutation step as a fraction of the gene's range
    pub mutation_scale: f64,
    /// Memory budget used by the cache-size fitness term (megabytes)
    pub memory_limit_mb: f64,
    /// Upper end of the user rating scale
    pub rating_scale: f64,
    /// RNG seed for reproducible runs; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            elite_count: 1,
            tournament_size: 3,
            crossover_rate: 0.8,
            interpolation_rate: 0.3,
            mutation_rate: 0.15,
            mutation_scale: 0.1,
            memory_limit_mb: 512.0,
            rating_scale: 5.0,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Check every field, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        if self.elite_count == 0 || self.elite_count >= self.population_size {
            return Err(ConfigError::InvalidEliteCount {
                elite_count: self.elite_count,
                population_size: self.population_size,
            });
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::EmptyTournament);
        }
        for (name, value) in [
            ("crossover_rate", self.crossover_rate),
            ("interpolation_rate", self.interpolation_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }
        for (name, value) in [
            ("mutation_scale", self.mutation_scale),
            ("memory_limit_mb", self.memory_limit_mb),
            ("rating_scale", self.rating_scale),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        Ok(())
    }
}

//! Genetic algorithm engine - evolves configuration candidates.

use crate::chromosome::Chromosome;
use crate::config::{ConfigError, EvolutionConfig};
use crate::fitness::FitnessModel;
use crate::metrics::PerformanceMetrics;
use crate::population::Population;
use autotune_core::{ParamValue, ParameterMap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Errors raised when building or restoring an engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvolutionError {
    /// Invalid configuration
    #[error("invalid evolution config: {0}")]
    Config(#[from] ConfigError),

    /// Restored population does not match the configured size
    #[error("population size mismatch: expected {expected}, got {actual}")]
    PopulationSizeMismatch {
        /// Configured size
        expected: usize,
        /// Size found in the restored state
        actual: usize,
    },
}

/// Outcome of one generation step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// Generation counter after the step (1 after the first call)
    pub generation: u64,
    /// Best fitness in the new population
    pub best_fitness: f64,
    /// Mean fitness in the new population
    pub mean_fitness: f64,
}

/// Best chromosome materialised as external parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedConfiguration {
    /// False when no generation has been evaluated yet
    pub success: bool,
    /// Parameters keyed by stable names
    pub parameters: ParameterMap,
}

/// Serializable engine state, enough to resume from a given generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    /// Generation counter
    pub generation: u64,
    /// Current population
    pub population: Population,
}

/// Evolves a fixed-size population one generation at a time.
///
/// Each step:
/// ```text
/// Score → Keep elites → Tournament select → Crossover → Mutate → Clamp → Score
/// ```
pub struct GeneticEngine {
    config: EvolutionConfig,
    fitness: FitnessModel,
    population: Population,
    generation: u64,
    rng: StdRng,
}

impl GeneticEngine {
    /// Create an engine with a random initial population.
    pub fn new(config: EvolutionConfig) -> Result<Self, EvolutionError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let population = Population::random(config.population_size, &mut rng);
        let fitness = FitnessModel::new(config.memory_limit_mb, config.rating_scale);

        debug!(size = config.population_size, seed = ?config.seed, "Initialised population");

        Ok(Self {
            config,
            fitness,
            population,
            generation: 0,
            rng,
        })
    }

    /// Replace the fitness model.
    pub fn with_fitness_model(mut self, fitness: FitnessModel) -> Self {
        self.fitness = fitness;
        self
    }

    /// Engine configuration.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Generations completed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current population.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Produce the next generation, scoring against `metrics`.
    pub fn evolve_population(&mut self, metrics: &PerformanceMetrics) -> EvolutionResult {
        let scored = self.evaluate(&self.population, metrics);
        let size = self.config.population_size;

        let mut next: Vec<Chromosome> = scored
            .ranked()
            .into_iter()
            .take(self.config.elite_count)
            .cloned()
            .collect();

        while next.len() < size {
            let first = self.tournament(&scored);
            let second = self.tournament(&scored);

            let base = if self.rng.random::<f64>() < self.config.crossover_rate {
                first.crossover(second, &mut self.rng, self.config.interpolation_rate)
            } else {
                first.clone()
            };
            next.push(base.mutate(&mut self.rng, self.config.mutation_rate, self.config.mutation_scale));
        }

        self.population = self.evaluate(&Population::from_members(next), metrics);
        self.generation += 1;

        let result = EvolutionResult {
            generation: self.generation,
            best_fitness: self.population.best().map(Chromosome::fitness).unwrap_or(0.0),
            mean_fitness: self.population.mean_fitness(),
        };

        info!(
            "Generation {}: best fitness {:.4}, mean {:.4} ({} samples)",
            result.generation, result.best_fitness, result.mean_fitness, metrics.total_tasks
        );

        result
    }

    /// Best chromosome, or `None` before the first generation.
    pub fn best_chromosome(&self) -> Option<Chromosome> {
        if self.generation == 0 {
            return None;
        }
        self.population.best().cloned()
    }

    /// Materialise the best chromosome as named parameters.
    pub fn apply_best_configuration(&self) -> AppliedConfiguration {
        let Some(best) = self.best_chromosome() else {
            debug!("No evaluated generation yet, nothing to apply");
            return AppliedConfiguration {
                success: false,
                parameters: ParameterMap::new(),
            };
        };

        let mut parameters = ParameterMap::new();
        parameters.insert("learning_rate".to_string(), ParamValue::from(best.learning_rate()));
        parameters.insert("confidence_threshold".to_string(), ParamValue::from(best.confidence_threshold()));
        parameters.insert("cache_size".to_string(), ParamValue::from(best.cache_size()));
        parameters.insert("fitness".to_string(), ParamValue::from(best.fitness()));
        parameters.insert("generation".to_string(), ParamValue::Number(self.generation as f64));

        AppliedConfiguration {
            success: true,
            parameters,
        }
    }

    /// Copy of the state needed to resume from this generation.
    pub fn state(&self) -> EngineState {
        EngineState {
            generation: self.generation,
            population: self.population.clone(),
        }
    }

    /// Resume from a previously captured state.
    pub fn restore(&mut self, state: EngineState) -> Result<(), EvolutionError> {
        let expected = self.config.population_size;
        if state.population.len() != expected {
            return Err(EvolutionError::PopulationSizeMismatch {
                expected,
                actual: state.population.len(),
            });
        }

        // Re-clamp in case the state was edited outside the engine.
        let members = state
            .population
            .members()
            .iter()
            .map(|c| c.with_fitness(c.fitness()))
            .collect();

        self.population = Population::from_members(members);
        self.generation = state.generation;
        info!("Restored engine at generation {}", self.generation);
        Ok(())
    }

    fn evaluate(&self, population: &Population, metrics: &PerformanceMetrics) -> Population {
        Population::from_members(
            population
                .members()
                .iter()
                .map(|c| c.with_fitness(self.fitness.score(metrics, c)))
                .collect(),
        )
    }

    fn tournament<'a>(&mut self, population: &'a Population) -> &'a Chromosome {
        let members = population.members();
        let mut winner = &members[self.rng.random_range(0..members.len())];
        for _ in 1..self.config.tournament_size {
            let contestant = &members[self.rng.random_range(0..members.len())];
            if contestant.fitness() > winner.fitness() {
                winner = contestant;
            }
        }
        winner
    }
}

//! Synthetic workload for exercising the tuner from the command line.

use autotune_tuner::{TaskCategory, TaskId, TaskResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generates outcome samples whose quality improves round by round.
pub struct Workload {
    rng: StdRng,
    rounds: usize,
}

impl Workload {
    /// Workload spanning `rounds` rounds; seeded when `seed` is given.
    pub fn new(rounds: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng, rounds }
    }

    /// Success probability in `round` (0-based), rising from 45% to 90%.
    pub fn success_probability(&self, round: usize) -> f64 {
        let progress = if self.rounds > 1 {
            round.min(self.rounds - 1) as f64 / (self.rounds - 1) as f64
        } else {
            1.0
        };
        0.45 + 0.45 * progress
    }

    /// One completed task in `round`.
    pub fn sample(&mut self, round: usize) -> (TaskResult, TaskCategory) {
        let success = self.rng.random_bool(self.success_probability(round));
        let speedup = 1.0 - 0.5 * self.success_probability(round);
        let execution_time_ms = self.rng.random_range(200.0..2500.0) * speedup;
        let memory_used_mb = self.rng.random_range(64.0..320.0);
        let user_rating = if success {
            self.rng.random_range(3.5..=5.0)
        } else {
            self.rng.random_range(1.0..=3.0)
        };
        let category = TaskCategory::ALL[self.rng.random_range(0..TaskCategory::ALL.len())];

        (
            TaskResult::new(TaskId::new(), success, execution_time_ms, memory_used_mb, user_rating),
            category,
        )
    }
}

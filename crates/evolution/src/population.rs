//! Fixed-size ordered collection of chromosomes.

use crate::chromosome::Chromosome;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One generation of candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    members: Vec<Chromosome>,
}

impl Population {
    /// Random initial population of `size` members with fitness 0.
    pub fn random<R: Rng>(size: usize, rng: &mut R) -> Self {
        Self {
            members: (0..size).map(|_| Chromosome::random(rng)).collect(),
        }
    }

    /// Wrap an already assembled generation.
    pub(crate) fn from_members(members: Vec<Chromosome>) -> Self {
        Self { members }
    }

    /// Members in order.
    pub fn members(&self) -> &[Chromosome] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the population has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member with the highest fitness; the first one on ties.
    pub fn best(&self) -> Option<&Chromosome> {
        self.best_index().map(|i| &self.members[i])
    }

    /// Index of [`Population::best`].
    pub(crate) fn best_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, c) in self.members.iter().enumerate() {
            match best {
                Some((_, f)) if f >= c.fitness() => {}
                _ => best = Some((i, c.fitness())),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Mean fitness across members (0 when empty).
    pub fn mean_fitness(&self) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        self.members.iter().map(Chromosome::fitness).sum::<f64>() / self.members.len() as f64
    }

    /// Members ordered by fitness, best first.
    pub fn ranked(&self) -> Vec<&Chromosome> {
        let mut ranked: Vec<_> = self.members.iter().collect();
        ranked.sort_by(|a, b| b.fitness().partial_cmp(&a.fitness()).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }
}

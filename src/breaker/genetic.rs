use super::{Candidate, KeySpace};
use crate::config::SearchParams;
use crate::error::{CfResult, CipherForgeError};
use crate::scorer::TextScorer;
use fastrand::Rng;
use rayon::prelude::*;
use std::time::Instant;
use tracing::debug;

/// Fraction of each generation carried over unchanged.
const ELITE_FRACTION: f64 = 0.1;
/// Tournament selection sample size.
const TOURNAMENT_K: usize = 3;

/// Population-based key search: non-overlapping generations of elitism,
/// tournament selection, order-preserving crossover, and swap mutation.
pub struct GeneticBreaker<'a, S: KeySpace> {
    space: &'a S,
    scorer: &'a dyn TextScorer,
    params: &'a SearchParams,
}

impl<'a, S: KeySpace> GeneticBreaker<'a, S> {
    pub fn new(space: &'a S, scorer: &'a dyn TextScorer, params: &'a SearchParams) -> Self {
        Self {
            space,
            scorer,
            params,
        }
    }

    /// Runs the configured generation budget and returns the best candidate
    /// ever evaluated, which selection pressure alone does not guarantee to
    /// sit in the final population.
    pub fn run(&self, rng: &mut Rng, deadline: Option<Instant>) -> CfResult<Candidate<S::Key>> {
        let pop_size = self.params.population_size;
        let mut population: Vec<S::Key> =
            (0..pop_size).map(|_| self.space.random_key(rng)).collect();
        let mut best: Option<Candidate<S::Key>> = None;

        for generation in 0..self.params.generations {
            // Evaluations are independent; scoring is pure.
            let evaluated: Vec<(String, f64)> = population
                .par_iter()
                .map(|key| {
                    let plain = self.space.decrypt(key);
                    let score = self.scorer.score(&plain);
                    (plain, score)
                })
                .collect();

            for (i, (plain, score)) in evaluated.iter().enumerate() {
                if best.as_ref().map_or(true, |b| *score > b.score) {
                    best = Some(Candidate {
                        key: population[i].clone(),
                        plaintext: plain.clone(),
                        score: *score,
                    });
                }
            }

            if let Some(limit) = deadline {
                if Instant::now() >= limit {
                    debug!("deadline reached at generation {}", generation);
                    break;
                }
            }
            if generation + 1 == self.params.generations {
                break;
            }

            let scores: Vec<f64> = evaluated.iter().map(|(_, s)| *s).collect();
            let mut order: Vec<usize> = (0..pop_size).collect();
            order.sort_by(|&x, &y| {
                scores[y]
                    .partial_cmp(&scores[x])
                    .unwrap()
                    .then(x.cmp(&y))
            });

            let elite_count = ((pop_size as f64 * ELITE_FRACTION).ceil() as usize).max(1);
            let mut next: Vec<S::Key> = order
                .iter()
                .take(elite_count.min(pop_size))
                .map(|&i| population[i].clone())
                .collect();

            while next.len() < pop_size {
                let p1 = tournament(&population, &scores, rng);
                let p2 = tournament(&population, &scores, rng);
                let mut child = self.space.crossover(p1, p2, rng)?;
                if rng.f64() < self.params.mutation_rate {
                    self.space.mutate(&mut child, rng);
                }
                next.push(child);
            }
            population = next;
        }

        best.ok_or_else(|| CipherForgeError::InvalidConfig("empty population".into()))
    }
}

fn tournament<'p, K>(population: &'p [K], scores: &[f64], rng: &mut Rng) -> &'p K {
    let mut best_idx = rng.usize(0..population.len());
    for _ in 1..TOURNAMENT_K {
        let idx = rng.usize(0..population.len());
        if scores[idx] > scores[best_idx] {
            best_idx = idx;
        }
    }
    &population[best_idx]
}

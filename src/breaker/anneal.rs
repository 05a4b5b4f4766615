use super::Candidate;
use crate::cipher::{SubstitutionKey, ALPHABET_LEN};
use crate::config::SearchParams;
use crate::lang::LanguageModel;
use crate::scorer::TextScorer;
use fastrand::Rng;
use rayon::prelude::*;
use std::time::Instant;
use tracing::debug;

/// Probability of accepting a worsening move at full temperature.
const BASE_ACCEPT_PROB: f64 = 0.05;
/// Temperature decays linearly from 1.0 down to this floor.
const TEMP_FLOOR: f64 = 0.1;
/// Deadline checks happen every `POLL_MASK + 1` iterations.
const POLL_MASK: usize = 0x1FF;

/// Single-trajectory local search over substitution keys with a light
/// annealing schedule, orchestrated across independent restarts.
pub struct AnnealBreaker<'a> {
    scorer: &'a dyn TextScorer,
    model: &'a LanguageModel,
    params: &'a SearchParams,
}

impl<'a> AnnealBreaker<'a> {
    pub fn new(
        scorer: &'a dyn TextScorer,
        model: &'a LanguageModel,
        params: &'a SearchParams,
    ) -> Self {
        Self {
            scorer,
            model,
            params,
        }
    }

    /// Runs the configured restarts in parallel and returns every restart's
    /// best candidate, in restart order, for finalist re-ranking. Restart
    /// seeding interleaves frequency-based and random initial keys per the
    /// configured ratio; at the default 0.5 the even-indexed restarts are
    /// frequency-seeded.
    pub fn run(
        &self,
        ciphertext: &str,
        seed: u64,
        deadline: Option<Instant>,
    ) -> Vec<Candidate<SubstitutionKey>> {
        let ratio = self.params.freq_init_ratio;
        (0..self.params.restarts)
            .into_par_iter()
            .map(|r| {
                let mut rng = Rng::with_seed(seed.wrapping_add(r as u64));
                let use_freq_init =
                    ((r as f64 + 1.0) * ratio).ceil() > (r as f64 * ratio).ceil();
                self.run_single(ciphertext, &mut rng, use_freq_init, deadline)
            })
            .collect()
    }

    /// One annealed trajectory. The best-ever candidate is tracked separately
    /// from the current key, since worsening moves are sometimes accepted.
    pub fn run_single(
        &self,
        ciphertext: &str,
        rng: &mut Rng,
        use_freq_init: bool,
        deadline: Option<Instant>,
    ) -> Candidate<SubstitutionKey> {
        let mut current_key = if use_freq_init {
            SubstitutionKey::frequency_seeded(ciphertext, self.model.freq_order())
        } else {
            SubstitutionKey::random(rng)
        };
        let mut current_score = self.scorer.score(&current_key.decrypt(ciphertext));
        let mut best = Candidate {
            plaintext: current_key.decrypt(ciphertext),
            key: current_key.clone(),
            score: current_score,
        };

        let iterations = self.params.iterations;
        for i in 0..iterations {
            if i & POLL_MASK == 0 {
                if let Some(limit) = deadline {
                    if Instant::now() >= limit {
                        break;
                    }
                }
            }

            let a = rng.usize(0..ALPHABET_LEN);
            let mut b = rng.usize(0..ALPHABET_LEN);
            while b == a {
                b = rng.usize(0..ALPHABET_LEN);
            }
            let mut neighbor = current_key.clone();
            neighbor.swap_plain_targets(a, b);
            let plain = neighbor.decrypt(ciphertext);
            let score = self.scorer.score(&plain);

            let accept = if score > current_score {
                true
            } else {
                let temperature = TEMP_FLOOR.max((iterations - i) as f64 / iterations as f64);
                rng.f64() < BASE_ACCEPT_PROB * temperature
            };

            if accept {
                current_key = neighbor;
                current_score = score;
                if current_score > best.score {
                    best = Candidate {
                        key: current_key.clone(),
                        plaintext: plain,
                        score: current_score,
                    };
                }
            }
        }

        debug!(
            "restart done: freq_init={}, best score {:.2}",
            use_freq_init, best.score
        );
        best
    }
}

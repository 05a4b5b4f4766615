// ===== cipherforge/src/breaker/mod.rs =====
pub mod anneal;
pub mod genetic;

pub use self::anneal::AnnealBreaker;
pub use self::genetic::GeneticBreaker;

use crate::cipher::{permutation, CipherKind, PermutationKey, SubstitutionKey, ALPHABET_LEN};
use crate::config::SearchParams;
use crate::detect;
use crate::error::{CfResult, CipherForgeError};
use crate::lang::{normalize_ciphertext, LanguageModel};
use crate::scorer::{QualityOracle, TextScorer};
use fastrand::Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::time::{Duration, Instant};
use strum_macros::{Display, EnumString};
use tracing::{debug, info};

/// One evaluated key: the decryption it produces and how plausible it reads.
/// Ephemeral except for the best-ever record each search carries forward.
#[derive(Debug, Clone)]
pub struct Candidate<K> {
    pub key: K,
    pub plaintext: String,
    pub score: f64,
}

/// The seam between the search strategies and a concrete cipher family.
/// Every operator must hand back a valid (bijective) key; the validating key
/// constructors enforce that on the crossover path.
pub trait KeySpace: Sync {
    type Key: Clone + Send + Sync;

    fn random_key(&self, rng: &mut Rng) -> Self::Key;
    fn crossover(&self, a: &Self::Key, b: &Self::Key, rng: &mut Rng) -> CfResult<Self::Key>;
    fn mutate(&self, key: &mut Self::Key, rng: &mut Rng);
    fn decrypt(&self, key: &Self::Key) -> String;
}

/// Search space of block-permutation keys over one fixed ciphertext.
pub struct PermutationSpace {
    block_size: usize,
    cipher_bytes: Vec<u8>,
}

impl PermutationSpace {
    pub fn new(ciphertext: &str, block_size: usize) -> CfResult<Self> {
        if block_size < 2 {
            return Err(CipherForgeError::InvalidConfig(format!(
                "permutation block size must be at least 2, got {}",
                block_size
            )));
        }
        let cipher_bytes = ciphertext.as_bytes().to_vec();
        if cipher_bytes.is_empty() {
            return Err(CipherForgeError::Validation("empty ciphertext".into()));
        }
        if cipher_bytes.len() % block_size != 0 {
            return Err(CipherForgeError::Validation(format!(
                "ciphertext length {} is not a multiple of block size {}",
                cipher_bytes.len(),
                block_size
            )));
        }
        Ok(Self {
            block_size,
            cipher_bytes,
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

impl KeySpace for PermutationSpace {
    type Key = PermutationKey;

    fn random_key(&self, rng: &mut Rng) -> PermutationKey {
        PermutationKey::random(self.block_size, rng)
    }

    /// Order-preserving crossover: a contiguous slice of parent A's targets,
    /// remaining positions filled with parent B's targets in order, skipping
    /// targets already placed.
    fn crossover(
        &self,
        a: &PermutationKey,
        b: &PermutationKey,
        rng: &mut Rng,
    ) -> CfResult<PermutationKey> {
        let n = self.block_size;
        let (lo, hi) = distinct_range(n, rng);

        let mut child = vec![usize::MAX; n];
        let mut used = vec![false; n];
        for i in lo..hi {
            let v = a.targets()[i];
            child[i] = v;
            used[v] = true;
        }
        let mut fill = b.targets().iter().filter(|&&v| !used[v]);
        for slot in child.iter_mut() {
            if *slot == usize::MAX {
                *slot = *fill.next().ok_or_else(|| {
                    CipherForgeError::InvalidKey("crossover ran out of targets".into())
                })?;
            }
        }
        PermutationKey::from_zero_based(child)
    }

    fn mutate(&self, key: &mut PermutationKey, rng: &mut Rng) {
        let (a, b) = distinct_pair(self.block_size, rng);
        key.swap_targets(a, b);
    }

    fn decrypt(&self, key: &PermutationKey) -> String {
        let mut out = key.decrypt_blocks(&self.cipher_bytes);
        permutation::trim_filler(&mut out, self.block_size);
        String::from_utf8_lossy(&out).into_owned()
    }
}

/// Search space of monoalphabetic substitution keys over one normalized
/// ciphertext.
pub struct SubstitutionSpace {
    ciphertext: String,
}

impl SubstitutionSpace {
    pub fn new(normalized_ciphertext: String) -> CfResult<Self> {
        if !normalized_ciphertext.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(CipherForgeError::Validation(
                "ciphertext contains no letters to map".into(),
            ));
        }
        Ok(Self {
            ciphertext: normalized_ciphertext,
        })
    }

    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }
}

impl KeySpace for SubstitutionSpace {
    type Key = SubstitutionKey;

    fn random_key(&self, rng: &mut Rng) -> SubstitutionKey {
        SubstitutionKey::random(rng)
    }

    /// Slice-copy from parent A's mapping, greedy-fill from parent B skipping
    /// targets already used, any unused letter when B's value collides.
    fn crossover(
        &self,
        a: &SubstitutionKey,
        b: &SubstitutionKey,
        rng: &mut Rng,
    ) -> CfResult<SubstitutionKey> {
        let (lo, hi) = distinct_range(ALPHABET_LEN, rng);
        let fa = a.cipher_alphabet();
        let fb = b.cipher_alphabet();
        let (fa, fb) = (fa.as_bytes(), fb.as_bytes());

        let mut forward = [0u8; ALPHABET_LEN];
        let mut used = [false; ALPHABET_LEN];
        for i in lo..hi {
            forward[i] = fa[i];
            used[(fa[i] - b'A') as usize] = true;
        }
        for i in 0..ALPHABET_LEN {
            if lo <= i && i < hi {
                continue;
            }
            let preferred = fb[i];
            let target = if !used[(preferred - b'A') as usize] {
                preferred
            } else {
                let fallback = used.iter().position(|&u| !u).ok_or_else(|| {
                    CipherForgeError::InvalidKey("crossover ran out of targets".into())
                })?;
                b'A' + fallback as u8
            };
            forward[i] = target;
            used[(target - b'A') as usize] = true;
        }
        SubstitutionKey::new(forward)
    }

    fn mutate(&self, key: &mut SubstitutionKey, rng: &mut Rng) {
        let (a, b) = distinct_pair(ALPHABET_LEN, rng);
        key.swap_plain_targets(a, b);
    }

    fn decrypt(&self, key: &SubstitutionKey) -> String {
        key.decrypt(&self.ciphertext)
    }
}

fn distinct_pair(n: usize, rng: &mut Rng) -> (usize, usize) {
    let a = rng.usize(0..n);
    let mut b = rng.usize(0..n);
    while b == a {
        b = rng.usize(0..n);
    }
    (a, b)
}

fn distinct_range(n: usize, rng: &mut Rng) -> (usize, usize) {
    let (a, b) = distinct_pair(n, rng);
    (a.min(b), a.max(b))
}

/// Which search strategy the orchestrator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Genetic algorithm for permutation, annealed hill-climb for substitution.
    Auto,
    Genetic,
    Anneal,
}

pub struct BreakOptions {
    pub params: SearchParams,
    pub strategy: SearchStrategy,
    /// Permutation block size; detected from periodicity when absent.
    pub block_size: Option<usize>,
    pub seed: Option<u64>,
    pub max_time: Option<Duration>,
}

impl Default for BreakOptions {
    fn default() -> Self {
        Self {
            params: SearchParams::default(),
            strategy: SearchStrategy::Auto,
            block_size: None,
            seed: None,
            max_time: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RecoveredKey {
    Permutation(PermutationKey),
    Substitution(SubstitutionKey),
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakResult {
    pub kind: CipherKind,
    pub key: RecoveredKey,
    pub plaintext: String,
    pub score: f64,
    pub block_size: Option<usize>,
    pub restarts_run: usize,
}

/// Primary entry point: recovers the most plausible key for `ciphertext`
/// under the selected cipher family. Always returns the best-ever candidate;
/// acceptance thresholding is the caller's business.
pub fn break_cipher(
    ciphertext: &str,
    kind: CipherKind,
    scorer: &dyn TextScorer,
    model: &LanguageModel,
    oracle: &dyn QualityOracle,
    opts: &BreakOptions,
) -> CfResult<BreakResult> {
    opts.params.validate()?;
    let deadline = opts.max_time.map(|d| Instant::now() + d);
    let seed = opts.seed.unwrap_or_else(|| Rng::new().u64(..));
    debug!("break_cipher: kind={}, seed={}", kind, seed);

    match kind {
        CipherKind::Permutation => {
            if opts.strategy == SearchStrategy::Anneal {
                return Err(CipherForgeError::InvalidConfig(
                    "annealed hill-climb only supports substitution keys".into(),
                ));
            }
            let block_size = match opts.block_size {
                Some(n) => n,
                None => detect::estimate_block_size(ciphertext).ok_or_else(|| {
                    CipherForgeError::Validation(
                        "ciphertext too short to estimate a block size".into(),
                    )
                })?,
            };
            info!("breaking permutation cipher with block size {}", block_size);
            let space = PermutationSpace::new(ciphertext, block_size)?;
            let finalists = run_genetic_restarts(&space, scorer, &opts.params, seed, deadline)?;
            let best = rerank(finalists, oracle);
            Ok(BreakResult {
                kind,
                key: RecoveredKey::Permutation(best.key),
                plaintext: best.plaintext,
                score: best.score,
                block_size: Some(block_size),
                restarts_run: opts.params.restarts,
            })
        }
        CipherKind::Substitution => {
            let normalized = normalize_ciphertext(ciphertext);
            let finalists = match opts.strategy {
                SearchStrategy::Genetic => {
                    let space = SubstitutionSpace::new(normalized)?;
                    run_genetic_restarts(&space, scorer, &opts.params, seed, deadline)?
                }
                SearchStrategy::Auto | SearchStrategy::Anneal => {
                    let space = SubstitutionSpace::new(normalized)?;
                    AnnealBreaker::new(scorer, model, &opts.params).run(
                        space.ciphertext(),
                        seed,
                        deadline,
                    )
                }
            };
            let best = rerank(finalists, oracle);
            Ok(BreakResult {
                kind,
                key: RecoveredKey::Substitution(best.key),
                plaintext: best.plaintext,
                score: best.score,
                block_size: None,
                restarts_run: opts.params.restarts,
            })
        }
    }
}

/// Independent restarts of the genetic algorithm; each restart owns a seed
/// derived from the run seed, so parallel execution stays reproducible.
fn run_genetic_restarts<S: KeySpace>(
    space: &S,
    scorer: &dyn TextScorer,
    params: &SearchParams,
    seed: u64,
    deadline: Option<Instant>,
) -> CfResult<Vec<Candidate<S::Key>>> {
    (0..params.restarts)
        .into_par_iter()
        .map(|r| {
            let mut rng = Rng::with_seed(seed.wrapping_add(r as u64));
            let breaker = GeneticBreaker::new(space, scorer, params);
            breaker.run(&mut rng, deadline)
        })
        .collect()
}

/// Finalist selection: heuristic score plus the quality oracle's verdict,
/// lowest restart index winning ties. The reported score stays heuristic.
fn rerank<K>(mut finalists: Vec<Candidate<K>>, oracle: &dyn QualityOracle) -> Candidate<K> {
    let texts: Vec<String> = finalists.iter().map(|c| c.plaintext.clone()).collect();
    let oracle_scores = oracle.evaluate(&texts);

    let mut best_idx = 0;
    let mut best_total = f64::NEG_INFINITY;
    for (i, candidate) in finalists.iter().enumerate() {
        let total = candidate.score + oracle_scores.get(i).copied().unwrap_or(0.0);
        if total > best_total {
            best_total = total;
            best_idx = i;
        }
    }
    finalists.swap_remove(best_idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_permutation_space_rejects_ragged_ciphertext() {
        assert!(matches!(
            PermutationSpace::new("ABCDE", 4),
            Err(CipherForgeError::Validation(_))
        ));
    }

    #[test]
    fn test_substitution_space_rejects_letterless_text() {
        assert!(SubstitutionSpace::new("   ".to_string()).is_err());
    }

    proptest! {
        #[test]
        fn prop_permutation_crossover_conserves_targets(seed in any::<u64>()) {
            let mut rng = Rng::with_seed(seed);
            let space = PermutationSpace::new("ABCDEFGH", 8).unwrap();
            let a = space.random_key(&mut rng);
            let b = space.random_key(&mut rng);
            let child = space.crossover(&a, &b, &mut rng).unwrap();

            let mut targets: Vec<usize> = child.targets().to_vec();
            targets.sort();
            prop_assert_eq!(targets, (0..8).collect::<Vec<_>>());
        }

        #[test]
        fn prop_substitution_crossover_stays_bijective(seed in any::<u64>()) {
            let mut rng = Rng::with_seed(seed);
            let space = SubstitutionSpace::new("HELLO WORLD".to_string()).unwrap();
            let a = space.random_key(&mut rng);
            let b = space.random_key(&mut rng);
            let child = space.crossover(&a, &b, &mut rng).unwrap();

            let mut seen = [false; ALPHABET_LEN];
            for c in child.cipher_alphabet().bytes() {
                prop_assert!(!seen[(c - b'A') as usize]);
                seen[(c - b'A') as usize] = true;
            }
        }

        #[test]
        fn prop_mutation_keeps_permutation_valid(seed in any::<u64>()) {
            let mut rng = Rng::with_seed(seed);
            let space = PermutationSpace::new("ABCDEF", 6).unwrap();
            let mut key = space.random_key(&mut rng);
            space.mutate(&mut key, &mut rng);

            let mut targets: Vec<usize> = key.targets().to_vec();
            targets.sort();
            prop_assert_eq!(targets, (0..6).collect::<Vec<_>>());
        }
    }
}

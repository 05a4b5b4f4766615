use crate::lang::LanguageModel;
use std::sync::Arc;

const WORD_WEIGHT: f64 = 10.0;
const BIGRAM_WEIGHT: f64 = 1.0;
const VOWEL_WEIGHT: f64 = 2.0;
const VOWEL_TARGET: f64 = 0.40;

/// Plausibility scoring capability. Implementations must be pure: the same
/// text always yields the same score.
pub trait TextScorer: Send + Sync {
    fn score(&self, text: &str) -> f64;
}

/// Optional external re-ranking capability for finalist candidates.
pub trait QualityOracle: Send + Sync {
    /// One score per candidate, additively combined with the heuristic score.
    fn evaluate(&self, candidates: &[String]) -> Vec<f64>;
}

/// Default oracle: contributes nothing to every candidate.
pub struct NullOracle;

impl QualityOracle for NullOracle {
    fn evaluate(&self, candidates: &[String]) -> Vec<f64> {
        vec![0.0; candidates.len()]
    }
}

/// Dictionary- and statistics-based English plausibility scorer.
///
/// Whole-word and phrase evidence carries a 10x weight so character
/// statistics alone cannot outrank genuinely readable text.
pub struct EnglishScorer {
    model: Arc<LanguageModel>,
}

impl EnglishScorer {
    pub fn new(model: Arc<LanguageModel>) -> Self {
        Self { model }
    }

    fn word_evidence(&self, upper: &str) -> f64 {
        let mut hits = 0usize;
        for word in upper.split_whitespace() {
            if self.model.contains_word(word) {
                hits += 1;
            }
        }
        let padded = format!(" {} ", upper);
        for phrase in self.model.phrases() {
            hits += padded.matches(phrase.as_str()).count();
        }
        hits as f64
    }

    fn bigram_evidence(&self, upper: &str) -> f64 {
        let mut sum = 0.0;
        let mut prev: Option<u8> = None;
        for b in upper.bytes() {
            if b.is_ascii_uppercase() {
                if let Some(p) = prev {
                    sum += self.model.bigram_weight(p, b);
                }
                prev = Some(b);
            }
        }
        sum
    }

    fn vowel_penalty(&self, upper: &str) -> f64 {
        let mut letters = 0usize;
        let mut vowels = 0usize;
        for b in upper.bytes() {
            if b.is_ascii_uppercase() {
                letters += 1;
                if matches!(b, b'A' | b'E' | b'I' | b'O' | b'U') {
                    vowels += 1;
                }
            }
        }
        if letters == 0 {
            return 0.0;
        }
        let ratio = vowels as f64 / letters as f64;
        -(ratio - VOWEL_TARGET).abs()
    }
}

impl TextScorer for EnglishScorer {
    fn score(&self, text: &str) -> f64 {
        let upper = text.to_ascii_uppercase();
        WORD_WEIGHT * self.word_evidence(&upper)
            + BIGRAM_WEIGHT * self.bigram_evidence(&upper)
            + VOWEL_WEIGHT * self.vowel_penalty(&upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> EnglishScorer {
        EnglishScorer::new(Arc::new(LanguageModel::builtin()))
    }

    #[test]
    fn test_score_is_pure() {
        let s = scorer();
        let text = "PLEASE FIND THE ATTACHED DOCUMENT";
        assert_eq!(s.score(text), s.score(text));
    }

    #[test]
    fn test_words_dominate_statistics() {
        let s = scorer();
        let readable = "THE QUICK START OF THE SESSION";
        let scrambled = "EHT KCIUQ TRATS FO EHT NOISSES";
        assert!(s.score(readable) > s.score(scrambled));
    }

    #[test]
    fn test_empty_text_scores_zero() {
        assert_eq!(scorer().score(""), 0.0);
    }

    #[test]
    fn test_bigrams_count_without_word_boundaries() {
        // No spaces, so only bigram and vowel terms can fire.
        let s = scorer();
        assert!(s.score("THETHETHE") > s.score("QQQQQQQQQ"));
    }
}

use cipherforge::error::CipherForgeError;
use cipherforge::lang::LanguageModel;
use cipherforge::scorer::{EnglishScorer, NullOracle, QualityOracle, TextScorer};
use std::fs::File;
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;

fn builtin_scorer() -> EnglishScorer {
    EnglishScorer::new(Arc::new(LanguageModel::builtin()))
}

#[test]
fn test_score_is_deterministic() {
    let scorer = builtin_scorer();
    let text = "KINDLY CONFIRM YOUR PARTICIPATION IN THE UPCOMING TRAINING SESSION";
    let a = scorer.score(text);
    let b = scorer.score(text);
    assert_eq!(a, b, "score drifted between calls");
}

#[test]
fn test_readable_text_beats_scrambled() {
    let scorer = builtin_scorer();
    let readable = "PLEASE FIND THE ATTACHED DOCUMENT FOR REVIEW";
    let scrambled = "ESAELP DNIF EHT DEHCATTA TNEMUCOD ROF WEIVER";
    assert!(scorer.score(readable) > scorer.score(scrambled));
}

#[test]
fn test_word_evidence_dominates_bigrams() {
    let scorer = builtin_scorer();
    // One dictionary word outweighs a string of high-frequency bigrams.
    let wordy = "THE THE THE";
    let bigrammy = "THTHTHTHTHT";
    assert!(scorer.score(wordy) > scorer.score(bigrammy));
}

#[test]
fn test_vowel_ratio_penalty_applies() {
    let scorer = builtin_scorer();
    // No dictionary words, no common bigrams: only the vowel term differs.
    let balanced = "UKKAKUKKAK"; // 40% vowels
    let skewed = "KKKKKKKKKK"; // 0% vowels
    assert!(scorer.score(balanced) > scorer.score(skewed));
}

#[test]
fn test_null_oracle_returns_zero_for_everything() {
    let oracle = NullOracle;
    let candidates = vec!["ONE".to_string(), "TWO".to_string()];
    assert_eq!(oracle.evaluate(&candidates), vec![0.0, 0.0]);
}

fn write_corpus(dir: &TempDir, words: &str, bigrams: Option<&str>) {
    let mut f = File::create(dir.path().join("words.csv")).unwrap();
    write!(f, "{}", words).unwrap();
    if let Some(content) = bigrams {
        let mut f = File::create(dir.path().join("2grams.csv")).unwrap();
        write!(f, "{}", content).unwrap();
    }
}

#[test]
fn test_model_loads_from_corpus_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(
        &dir,
        "the,1000\nand,800\nsecret,50\n",
        Some("t,h,3.0\nh,e,2.8\n"),
    );

    let model = LanguageModel::from_dir(dir.path()).unwrap();
    assert!(model.contains_word("SECRET"));
    assert!(model.contains_word("THE"));
    assert_eq!(model.bigram_weight(b'T', b'H'), 3.0);
    assert_eq!(model.bigram_weight(b'Z', b'Q'), 0.0);
}

#[test]
fn test_missing_vocabulary_is_resource_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        LanguageModel::from_dir(dir.path()),
        Err(CipherForgeError::ResourceUnavailable(_))
    ));
}

#[test]
fn test_empty_vocabulary_is_resource_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(&dir, "", None);
    assert!(matches!(
        LanguageModel::from_dir(dir.path()),
        Err(CipherForgeError::ResourceUnavailable(_))
    ));
}

#[test]
fn test_frequency_ranking_derived_from_monograms() {
    let dir = tempfile::tempdir().unwrap();
    write_corpus(&dir, "zzz,10\n", None);
    let mut f = File::create(dir.path().join("1grams.csv")).unwrap();
    write!(f, "z,900\ne,500\na,100\n").unwrap();

    let model = LanguageModel::from_dir(dir.path()).unwrap();
    assert_eq!(model.freq_order()[0], b'Z');
    assert_eq!(model.freq_order()[1], b'E');
}

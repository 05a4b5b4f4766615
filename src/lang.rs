// ===== cipherforge/src/lang.rs =====
use crate::error::{CfResult, CipherForgeError};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// English letters from most to least frequent.
pub const ENGLISH_FREQ_ORDER: &[u8; 26] = b"ETAOINSHRDLCUMWFGYPBVKJXQZ";

/// How many of the most frequent corpus words double as phrase probes.
const PHRASE_LIMIT: usize = 50;

/// Immutable reference data for plausibility scoring: a vocabulary, a list of
/// space-padded phrase probes, a bigram weight table, and the letter-frequency
/// ranking used to seed substitution keys. Loaded once, shared read-only.
pub struct LanguageModel {
    words: HashSet<String>,
    phrases: Vec<String>,
    bigram_weights: [f64; 26 * 26],
    freq_order: [u8; 26],
}

impl LanguageModel {
    /// Compact embedded English model. Choosing it is an explicit decision by
    /// the caller, not a fallback the loader degrades into.
    pub fn builtin() -> Self {
        let words = BUILTIN_WORDS
            .iter()
            .map(|w| w.to_string())
            .collect::<HashSet<_>>();
        let phrases = BUILTIN_PHRASES
            .iter()
            .map(|w| format!(" {} ", w))
            .collect();
        Self {
            words,
            phrases,
            bigram_weights: builtin_bigram_table(),
            freq_order: *ENGLISH_FREQ_ORDER,
        }
    }

    /// Loads a model from a corpus directory:
    /// - `words.csv` (word,count): required, becomes the vocabulary; the
    ///   most frequent entries double as phrase probes.
    /// - `2grams.csv` (a,b,weight): optional, replaces the embedded bigram
    ///   table when present.
    /// - `1grams.csv` (letter,count): optional, replaces the embedded
    ///   frequency ranking when present.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> CfResult<Self> {
        let root = dir.as_ref();
        info!("Loading language model from {:?}", root);

        let words_path = root.join("words.csv");
        if !words_path.exists() {
            return Err(CipherForgeError::ResourceUnavailable(format!(
                "vocabulary file not found: {:?}",
                words_path
            )));
        }

        let mut ranked: Vec<(String, u64)> = Vec::new();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&words_path)?;
        for result in rdr.records().flatten() {
            if result.is_empty() {
                continue;
            }
            let word = result[0].trim().to_ascii_uppercase();
            if word.is_empty() || !word.bytes().all(|b| b.is_ascii_uppercase()) {
                continue;
            }
            let count: u64 = result
                .get(1)
                .and_then(|c| c.trim().parse().ok())
                .unwrap_or(1);
            ranked.push((word, count));
        }
        if ranked.is_empty() {
            return Err(CipherForgeError::ResourceUnavailable(format!(
                "vocabulary file {:?} contains no usable words",
                words_path
            )));
        }

        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let phrases = ranked
            .iter()
            .take(PHRASE_LIMIT)
            .map(|(w, _)| format!(" {} ", w))
            .collect();
        let words: HashSet<String> = ranked.into_iter().map(|(w, _)| w).collect();

        let bigram_weights = match load_bigrams(&root.join("2grams.csv"))? {
            Some(table) => table,
            None => {
                info!("No 2grams.csv in corpus, using embedded bigram table");
                builtin_bigram_table()
            }
        };

        let freq_order = match load_freq_order(&root.join("1grams.csv"))? {
            Some(order) => order,
            None => *ENGLISH_FREQ_ORDER,
        };

        debug!(
            "Language model ready: {} words, {} phrase probes",
            words.len(),
            PHRASE_LIMIT.min(words.len())
        );
        Ok(Self {
            words,
            phrases,
            bigram_weights,
            freq_order,
        })
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Weight for the (first, second) uppercase-letter pair, 0.0 if uncommon.
    #[inline]
    pub fn bigram_weight(&self, first: u8, second: u8) -> f64 {
        self.bigram_weights[(first - b'A') as usize * 26 + (second - b'A') as usize]
    }

    pub fn freq_order(&self) -> &[u8; 26] {
        &self.freq_order
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

/// Uppercases and keeps only A-Z plus space, the symbol set the substitution
/// search operates on.
pub fn normalize_ciphertext(text: &str) -> String {
    text.bytes()
        .map(|b| b.to_ascii_uppercase())
        .filter(|&b| b.is_ascii_uppercase() || b == b' ')
        .map(char::from)
        .collect()
}

fn load_bigrams(path: &Path) -> CfResult<Option<[f64; 26 * 26]>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut table = [0.0f64; 26 * 26];
    let mut loaded = 0usize;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    for result in rdr.records().flatten() {
        if result.len() < 3 {
            continue;
        }
        let a = first_letter(&result[0]);
        let b = first_letter(&result[1]);
        let weight: f64 = result[2].trim().parse().unwrap_or(0.0);
        if let (Some(a), Some(b)) = (a, b) {
            if weight.is_finite() && weight > 0.0 {
                table[(a - b'A') as usize * 26 + (b - b'A') as usize] = weight;
                loaded += 1;
            }
        }
    }
    if loaded == 0 {
        return Err(CipherForgeError::ResourceUnavailable(format!(
            "bigram file {:?} contains no usable entries",
            path
        )));
    }
    Ok(Some(table))
}

fn load_freq_order(path: &Path) -> CfResult<Option<[u8; 26]>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut counts = [0u64; 26];
    let mut loaded = 0usize;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    for result in rdr.records().flatten() {
        if result.len() < 2 {
            continue;
        }
        if let Some(letter) = first_letter(&result[0]) {
            let count: u64 = result[1].trim().parse().unwrap_or(0);
            counts[(letter - b'A') as usize] += count;
            loaded += 1;
        }
    }
    if loaded == 0 {
        return Err(CipherForgeError::ResourceUnavailable(format!(
            "letter frequency file {:?} contains no usable entries",
            path
        )));
    }
    let mut ranked: Vec<usize> = (0..26).collect();
    ranked.sort_by_key(|&i| (Reverse(counts[i]), i));
    let mut order = [0u8; 26];
    for (rank, &idx) in ranked.iter().enumerate() {
        order[rank] = b'A' + idx as u8;
    }
    Ok(Some(order))
}

fn first_letter(field: &str) -> Option<u8> {
    let b = field.trim().bytes().next()?;
    let u = b.to_ascii_uppercase();
    u.is_ascii_uppercase().then_some(u)
}

fn builtin_bigram_table() -> [f64; 26 * 26] {
    let mut table = [0.0f64; 26 * 26];
    for &(pair, weight) in BUILTIN_BIGRAMS {
        let b = pair.as_bytes();
        table[(b[0] - b'A') as usize * 26 + (b[1] - b'A') as usize] = weight;
    }
    table
}

const BUILTIN_BIGRAMS: &[(&str, f64)] = &[
    ("TH", 3.0),
    ("HE", 2.8),
    ("IN", 2.5),
    ("ER", 2.3),
    ("AN", 2.2),
    ("RE", 2.1),
    ("ON", 2.0),
    ("AT", 1.9),
    ("EN", 1.8),
    ("ND", 1.7),
    ("TI", 1.6),
    ("ES", 1.6),
    ("OR", 1.5),
    ("TE", 1.5),
    ("OF", 1.5),
    ("ED", 1.4),
    ("IS", 1.4),
    ("IT", 1.4),
    ("AL", 1.3),
    ("AR", 1.3),
    ("ST", 1.3),
    ("TO", 1.3),
    ("NT", 1.2),
    ("HA", 1.2),
    ("SE", 1.1),
];

/// Space-padded probes counted as substrings; whole-word evidence that also
/// fires on text where word boundaries survived encryption.
const BUILTIN_PHRASES: &[&str] = &[
    "THE", "AND", "TO", "OF", "IN", "THAT", "IT", "IS", "WAS", "FOR", "ON", "WITH", "AS", "YOU",
    "I", "HE", "SHE", "THEY", "THIS", "BUT", "WE", "OUR", "YOUR", "PLEASE", "FIND", "ATTACHED",
    "DOCUMENT", "DOCUMENTS", "REQUIRED", "REVIEW", "APPRECIATE", "COOPERATION", "REMAIN",
    "DISPOSAL", "KINDLY", "CONFIRM", "PARTICIPATION", "UPCOMING", "TRAINING", "SESSION",
    "PRESENCE", "ESSENTIAL", "COMPLIANCE", "PURPOSES", "POLICY", "GUIDELINES", "EFFECT", "MARCH",
    "ADDITIONAL", "INSTRUCTIONS", "IMPLEMENTATION",
];

const BUILTIN_WORDS: &[&str] = &[
    "THE", "AND", "TO", "OF", "IN", "THAT", "IT", "IS", "WAS", "FOR", "ON", "WITH", "AS", "YOU",
    "I", "HE", "SHE", "THEY", "THIS", "BUT", "WE", "OUR", "YOUR", "AT", "BY", "FROM", "OR", "AN",
    "BE", "ARE", "WERE", "BEEN", "HAS", "HAVE", "HAD", "NOT", "NO", "YES", "ALL", "ANY", "CAN",
    "COULD", "WILL", "WOULD", "SHALL", "SHOULD", "MAY", "MIGHT", "MUST", "DO", "DOES", "DID",
    "DONE", "IF", "THEN", "ELSE", "WHEN", "WHERE", "WHY", "HOW", "WHAT", "WHICH", "WHO", "WHOM",
    "WHOSE", "THERE", "HERE", "THAN", "SO", "SUCH", "SOME", "MORE", "MOST", "LESS", "LEAST",
    "VERY", "MUCH", "MANY", "FEW", "OTHER", "ANOTHER", "EACH", "EVERY", "BOTH", "EITHER",
    "NEITHER", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE", "TEN",
    "FIRST", "LAST", "NEXT", "NEW", "OLD", "GOOD", "BAD", "GREAT", "SMALL", "LARGE", "LONG",
    "SHORT", "HIGH", "LOW", "EARLY", "LATE", "DAY", "WEEK", "MONTH", "YEAR", "TIME", "HOUR",
    "MINUTE", "SECOND", "TODAY", "NOW", "SOON", "ABOUT", "AFTER", "BEFORE", "BETWEEN", "DURING",
    "UNDER", "OVER", "ABOVE", "BELOW", "INTO", "OUT", "UP", "DOWN", "OFF", "AGAIN", "ONCE",
    "TWICE", "ALSO", "ONLY", "JUST", "EVEN", "STILL", "NEVER", "ALWAYS", "OFTEN", "SOMETIMES",
    "PEOPLE", "PERSON", "MAN", "WOMAN", "CHILD", "FAMILY", "FRIEND", "WORK", "JOB", "OFFICE",
    "HOME", "HOUSE", "CITY", "COUNTRY", "WORLD", "LIFE", "HAND", "PART", "PLACE", "CASE",
    "POINT", "FACT", "GROUP", "NUMBER", "PROBLEM", "QUESTION", "ANSWER", "NAME", "WORD", "LINE",
    "THING", "WAY", "END", "MAKE", "MADE", "TAKE", "TOOK", "GIVE", "GAVE", "GET", "GOT", "GO",
    "WENT", "COME", "CAME", "SEE", "SAW", "KNOW", "KNEW", "THINK", "THOUGHT", "SAY", "SAID",
    "TELL", "TOLD", "ASK", "ASKED", "USE", "USED", "FIND", "FOUND", "WANT", "NEED", "HELP",
    "CALL", "KEEP", "LET", "PUT", "SEEM", "LEAVE", "FEEL", "LOOK", "SHOW", "PLEASE", "THANK",
    "REGARDS", "DEAR", "ATTACHED", "DOCUMENT", "DOCUMENTS", "REQUIRED", "REVIEW", "APPRECIATE",
    "COOPERATION", "REMAIN", "DISPOSAL", "KINDLY", "CONFIRM", "PARTICIPATION", "UPCOMING",
    "TRAINING", "SESSION", "PRESENCE", "ESSENTIAL", "COMPLIANCE", "PURPOSES", "POLICY",
    "GUIDELINES", "EFFECT", "MARCH", "ADDITIONAL", "INSTRUCTIONS", "IMPLEMENTATION", "MESSAGE",
    "SECRET", "TEST", "SIMPLE",
];

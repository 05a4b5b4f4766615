use std::collections::HashMap;
use tracing::debug;

/// Estimates an unknown permutation block size from ciphertext periodicity.
///
/// Scans candidate sizes, segments the raw ciphertext into equal chunks
/// (ignoring a trailing partial chunk), and picks the size whose chunks
/// repeat the most. Repetition is measured as the fraction of chunks that
/// duplicate an earlier one; a raw duplicate count would always favor the
/// smallest sizes, which produce the most chunks. Smallest size wins ties.
/// Duplicate chunks are a periodicity proxy, not a guarantee; treat the
/// estimate as best-effort.
pub fn estimate_block_size(ciphertext: &str) -> Option<usize> {
    let bytes = ciphertext.as_bytes();
    if bytes.len() < 4 {
        return None;
    }
    let upper = 40.min(13.max(bytes.len() / 2 + 1));

    let mut best_size = 2;
    let mut best_ratio = 0.0f64;
    for size in 2..=upper {
        if size > bytes.len() {
            break;
        }
        let mut counts: HashMap<&[u8], usize> = HashMap::new();
        let mut total = 0usize;
        for chunk in bytes.chunks_exact(size) {
            *counts.entry(chunk).or_default() += 1;
            total += 1;
        }
        let dups = total - counts.len();
        let ratio = dups as f64 / total as f64;
        if ratio > best_ratio {
            best_ratio = ratio;
            best_size = size;
        }
    }
    debug!(
        "block size estimate: {} (duplicate ratio {:.2})",
        best_size, best_ratio
    );
    Some(best_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_short_for_estimate() {
        assert_eq!(estimate_block_size("ABC"), None);
    }

    #[test]
    fn test_strong_period_detected() {
        let ciphertext = "HELLO".repeat(12);
        let n = estimate_block_size(&ciphertext).unwrap();
        assert!((3..=7).contains(&n), "estimate {} outside tolerance", n);
    }

    #[test]
    fn test_no_repetition_falls_back_to_smallest() {
        let n = estimate_block_size("ABCDEFGHIJKLMNOP").unwrap();
        assert_eq!(n, 2);
    }
}

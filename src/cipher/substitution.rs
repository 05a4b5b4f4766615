use crate::error::{CfResult, CipherForgeError};
use fastrand::Rng;
use serde::{Serialize, Serializer};
use std::cmp::Reverse;

pub const ALPHABET_LEN: usize = 26;
pub const ALPHABET: &[u8; ALPHABET_LEN] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A monoalphabetic substitution key: a bijection of the uppercase alphabet
/// onto itself.
///
/// `forward[i]` is the ciphertext letter for plaintext letter `ALPHABET[i]`;
/// `inverse` holds the decryption direction. Both stay in lockstep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionKey {
    forward: [u8; ALPHABET_LEN],
    inverse: [u8; ALPHABET_LEN],
}

impl SubstitutionKey {
    /// Validates the plain->cipher table and derives the inverse.
    pub fn new(forward: [u8; ALPHABET_LEN]) -> CfResult<Self> {
        let mut inverse = [0u8; ALPHABET_LEN];
        let mut seen = [false; ALPHABET_LEN];
        for (i, &c) in forward.iter().enumerate() {
            if !c.is_ascii_uppercase() {
                return Err(CipherForgeError::InvalidKey(format!(
                    "substitution target {:?} is not an uppercase letter",
                    c as char
                )));
            }
            let idx = (c - b'A') as usize;
            if seen[idx] {
                return Err(CipherForgeError::InvalidKey(format!(
                    "duplicate substitution target '{}'",
                    c as char
                )));
            }
            seen[idx] = true;
            inverse[idx] = b'A' + i as u8;
        }
        Ok(Self { forward, inverse })
    }

    /// Parses a 26-letter cipher alphabet ("the letter A encrypts to s[0]").
    pub fn from_cipher_alphabet(s: &str) -> CfResult<Self> {
        let upper = s.trim().to_ascii_uppercase();
        let bytes = upper.as_bytes();
        if bytes.len() != ALPHABET_LEN {
            return Err(CipherForgeError::InvalidKey(format!(
                "substitution key must be {} letters, got {}",
                ALPHABET_LEN,
                bytes.len()
            )));
        }
        let mut forward = [0u8; ALPHABET_LEN];
        forward.copy_from_slice(bytes);
        Self::new(forward)
    }

    pub fn identity() -> Self {
        Self {
            forward: *ALPHABET,
            inverse: *ALPHABET,
        }
    }

    pub fn random(rng: &mut Rng) -> Self {
        let mut forward = *ALPHABET;
        rng.shuffle(&mut forward);
        let mut inverse = [0u8; ALPHABET_LEN];
        for (i, &c) in forward.iter().enumerate() {
            inverse[(c - b'A') as usize] = b'A' + i as u8;
        }
        Self { forward, inverse }
    }

    /// Seeds a key from letter statistics: the ciphertext's most frequent
    /// letters are assumed to decrypt to the reference frequency ranking.
    /// Ties and absent letters fall back to alphabetical order so the result
    /// is deterministic for a given ciphertext.
    pub fn frequency_seeded(ciphertext: &str, freq_order: &[u8; ALPHABET_LEN]) -> Self {
        let mut counts = [0usize; ALPHABET_LEN];
        for b in ciphertext.bytes() {
            let u = b.to_ascii_uppercase();
            if u.is_ascii_uppercase() {
                counts[(u - b'A') as usize] += 1;
            }
        }
        let mut ranked: Vec<usize> = (0..ALPHABET_LEN).collect();
        ranked.sort_by_key(|&i| (Reverse(counts[i]), i));

        let mut forward = [0u8; ALPHABET_LEN];
        let mut inverse = [0u8; ALPHABET_LEN];
        for (rank, &cipher_idx) in ranked.iter().enumerate() {
            let plain = freq_order[rank];
            inverse[cipher_idx] = plain;
            forward[(plain - b'A') as usize] = b'A' + cipher_idx as u8;
        }
        Self { forward, inverse }
    }

    pub fn cipher_alphabet(&self) -> String {
        String::from_utf8_lossy(&self.forward).into_owned()
    }

    /// Exchanges the ciphertext letters assigned to two plaintext letters.
    /// A transposition keeps the mapping bijective.
    pub fn swap_plain_targets(&mut self, a: usize, b: usize) {
        self.forward.swap(a, b);
        self.inverse[(self.forward[a] - b'A') as usize] = b'A' + a as u8;
        self.inverse[(self.forward[b] - b'A') as usize] = b'A' + b as u8;
    }

    /// Uppercase-normalizes, maps letters through the key, and passes every
    /// other symbol through untouched.
    pub fn encrypt(&self, plaintext: &str) -> String {
        self.map_through(plaintext, &self.forward)
    }

    pub fn decrypt(&self, ciphertext: &str) -> String {
        self.map_through(ciphertext, &self.inverse)
    }

    fn map_through(&self, text: &str, table: &[u8; ALPHABET_LEN]) -> String {
        let mut out = Vec::with_capacity(text.len());
        for b in text.bytes() {
            let u = b.to_ascii_uppercase();
            if u.is_ascii_uppercase() {
                out.push(table[(u - b'A') as usize]);
            } else {
                out.push(b);
            }
        }
        String::from_utf8_lossy(&out).into_owned()
    }
}

impl Serialize for SubstitutionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.cipher_alphabet())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_maps_text_to_itself() {
        let key = SubstitutionKey::identity();
        assert_eq!(key.encrypt("THISISATEST"), "THISISATEST");
    }

    #[test]
    fn test_duplicate_target_rejected() {
        let mut forward = *ALPHABET;
        forward[1] = b'A';
        assert!(matches!(
            SubstitutionKey::new(forward),
            Err(CipherForgeError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_non_letter_passthrough() {
        let mut rng = Rng::with_seed(7);
        let key = SubstitutionKey::random(&mut rng);
        let enc = key.encrypt("A B, C!");
        assert_eq!(enc.as_bytes()[1], b' ');
        assert_eq!(&enc[3..5], ", ");
        assert!(enc.ends_with('!'));
    }

    #[test]
    fn test_frequency_seeded_is_bijective_and_deterministic() {
        let freq = *b"ETAOINSHRDLCUMWFGYPBVKJXQZ";
        let a = SubstitutionKey::frequency_seeded("QQQWWE", &freq);
        let b = SubstitutionKey::frequency_seeded("QQQWWE", &freq);
        assert_eq!(a, b);
        // Most frequent cipher letter decrypts to 'E'
        assert_eq!(a.decrypt("Q"), "E");
        let mut seen = [false; ALPHABET_LEN];
        for c in a.cipher_alphabet().bytes() {
            seen[(c - b'A') as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}

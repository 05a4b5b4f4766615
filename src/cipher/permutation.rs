use crate::error::{CfResult, CipherForgeError};
use fastrand::Rng;
use serde::Serialize;

/// Symbol used to right-pad the final block on encryption.
pub const FILLER: u8 = b'X';

/// A fixed-block permutation key: a bijection on `{0..n-1}`.
///
/// `forward[i]` is the output position that receives input position `i`.
/// The inverse permutation is precomputed so both directions are O(n) gathers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermutationKey {
    forward: Vec<usize>,
    #[serde(skip)]
    inverse: Vec<usize>,
}

impl PermutationKey {
    /// Builds a key from a user-supplied literal, accepting either 0- or
    /// 1-indexed targets. The indexing convention is inspected exactly once
    /// here: a literal containing 0 is taken as 0-indexed, anything else is
    /// shifted down by one. Everything downstream is 0-indexed.
    pub fn new(values: &[usize]) -> CfResult<Self> {
        if values.is_empty() {
            return Err(CipherForgeError::InvalidKey(
                "permutation key must not be empty".into(),
            ));
        }
        let shift = usize::from(!values.contains(&0));
        let canonical: Vec<usize> = values
            .iter()
            .map(|&v| {
                v.checked_sub(shift).ok_or_else(|| {
                    CipherForgeError::InvalidKey(format!("target {} underflows after shift", v))
                })
            })
            .collect::<CfResult<_>>()?;
        Self::from_zero_based(canonical)
    }

    /// Builds a key from an already 0-indexed target list, enforcing the
    /// bijection invariant (full coverage, no duplicate targets).
    pub fn from_zero_based(forward: Vec<usize>) -> CfResult<Self> {
        let n = forward.len();
        if n == 0 {
            return Err(CipherForgeError::InvalidKey(
                "permutation key must not be empty".into(),
            ));
        }
        let mut seen = vec![false; n];
        for &v in &forward {
            if v >= n {
                return Err(CipherForgeError::InvalidKey(format!(
                    "target {} out of range for block size {}",
                    v, n
                )));
            }
            if seen[v] {
                return Err(CipherForgeError::InvalidKey(format!(
                    "duplicate target {} in permutation key",
                    v
                )));
            }
            seen[v] = true;
        }
        let mut inverse = vec![0usize; n];
        for (i, &v) in forward.iter().enumerate() {
            inverse[v] = i;
        }
        Ok(Self { forward, inverse })
    }

    /// Uniformly random permutation of `{0..n-1}`.
    pub fn random(n: usize, rng: &mut Rng) -> Self {
        let mut forward: Vec<usize> = (0..n).collect();
        rng.shuffle(&mut forward);
        let mut inverse = vec![0usize; n];
        for (i, &v) in forward.iter().enumerate() {
            inverse[v] = i;
        }
        Self { forward, inverse }
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn targets(&self) -> &[usize] {
        &self.forward
    }

    /// Swaps two targets in place. A transposition of a bijection is still a
    /// bijection, so only the inverse needs patching.
    pub fn swap_targets(&mut self, a: usize, b: usize) {
        self.forward.swap(a, b);
        self.inverse[self.forward[a]] = a;
        self.inverse[self.forward[b]] = b;
    }

    /// Encrypts by scattering each n-sized block through the key. The final
    /// block is right-padded with `FILLER` up to the block size.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let n = self.forward.len();
        let bytes = plaintext.as_bytes();
        let mut out = Vec::with_capacity(bytes.len().div_ceil(n) * n);
        for chunk in bytes.chunks(n) {
            if chunk.len() == n {
                // out[forward[i]] = in[i], expressed as a gather over the inverse
                out.extend((0..n).map(|j| chunk[self.inverse[j]]));
            } else {
                let mut padded = vec![FILLER; n];
                padded[..chunk.len()].copy_from_slice(chunk);
                out.extend((0..n).map(|j| padded[self.inverse[j]]));
            }
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Decrypts block-wise and strips trailing `FILLER` symbols from the final
    /// decoded block (at most n-1; encryption never pads a whole block).
    /// Ciphertext whose length is not a multiple of the block size is
    /// malformed, not a passthrough.
    pub fn decrypt(&self, ciphertext: &str) -> CfResult<String> {
        let n = self.forward.len();
        let bytes = ciphertext.as_bytes();
        if bytes.is_empty() {
            return Ok(String::new());
        }
        if bytes.len() % n != 0 {
            return Err(CipherForgeError::Validation(format!(
                "ciphertext length {} is not a multiple of block size {}",
                bytes.len(),
                n
            )));
        }
        let mut out = self.decrypt_blocks(bytes);
        trim_filler(&mut out, n);
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Raw block-wise inverse with no length check and no padding trim.
    /// The search loop calls this on pre-validated ciphertext.
    pub(crate) fn decrypt_blocks(&self, bytes: &[u8]) -> Vec<u8> {
        let n = self.forward.len();
        let mut out = Vec::with_capacity(bytes.len());
        for chunk in bytes.chunks_exact(n) {
            out.extend((0..n).map(|i| chunk[self.forward[i]]));
        }
        out
    }
}

/// Removes trailing filler from the final decoded block. Encryption pads at
/// most n-1 symbols, so never strip past that.
pub(crate) fn trim_filler(out: &mut Vec<u8>, block_size: usize) {
    if out.is_empty() {
        return;
    }
    let limit = out.len() - (block_size - 1);
    let mut end = out.len();
    while end > limit && out[end - 1] == FILLER {
        end -= 1;
    }
    out.truncate(end);
}

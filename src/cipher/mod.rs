pub mod permutation;
pub mod substitution;

pub use permutation::{PermutationKey, FILLER};
pub use substitution::{SubstitutionKey, ALPHABET_LEN};

use serde::Serialize;
use strum_macros::{Display, EnumString};

/// Which classical cipher family a ciphertext is assumed to come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum CipherKind {
    Permutation,
    Substitution,
}

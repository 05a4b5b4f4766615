use cipherforge::cipher::{PermutationKey, SubstitutionKey};
use proptest::prelude::*;

fn arb_permutation(max_n: usize) -> impl Strategy<Value = PermutationKey> {
    (2..=max_n, any::<u64>()).prop_map(|(n, seed)| {
        let mut rng = fastrand::Rng::with_seed(seed);
        PermutationKey::random(n, &mut rng)
    })
}

fn arb_substitution() -> impl Strategy<Value = SubstitutionKey> {
    any::<u64>().prop_map(|seed| {
        let mut rng = fastrand::Rng::with_seed(seed);
        SubstitutionKey::random(&mut rng)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    // Round trip holds for arbitrary text as long as the plaintext does not
    // itself end in the filler symbol (inherent padding ambiguity).
    #[test]
    fn prop_permutation_round_trip(
        key in arb_permutation(12),
        text in "[A-WYZ ]{0,80}"
    ) {
        let encrypted = key.encrypt(&text);
        prop_assert_eq!(encrypted.len() % key.len(), 0);
        prop_assert_eq!(key.decrypt(&encrypted).unwrap(), text);
    }

    #[test]
    fn prop_substitution_round_trip_exact(
        key in arb_substitution(),
        text in "[A-Z]{0,80}"
    ) {
        let encrypted = key.encrypt(&text);
        prop_assert_eq!(key.decrypt(&encrypted), text);
    }

    #[test]
    fn prop_substitution_leaves_non_letters_alone(
        key in arb_substitution(),
        text in "[0-9 .,!?]{0,40}"
    ) {
        prop_assert_eq!(key.encrypt(&text), text);
    }

    #[test]
    fn prop_random_permutation_is_bijective(key in arb_permutation(20)) {
        let mut targets: Vec<usize> = key.targets().to_vec();
        let n = key.len();
        targets.sort();
        prop_assert_eq!(targets, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn prop_swap_chains_preserve_bijection(
        key in arb_substitution(),
        swaps in proptest::collection::vec((0usize..26, 0usize..26), 0..40)
    ) {
        let mut key = key;
        for (a, b) in swaps {
            if a != b {
                key.swap_plain_targets(a, b);
            }
        }
        let mut seen = [false; 26];
        for c in key.cipher_alphabet().bytes() {
            prop_assert!(!seen[(c - b'A') as usize]);
            seen[(c - b'A') as usize] = true;
        }
        // Inverse must still agree with the forward table.
        let alphabet = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
        prop_assert_eq!(key.decrypt(&key.encrypt(alphabet)), alphabet);
    }
}

//! Property-based tests for the universal invariants of the MinHash / LSH
//! ensemble core: determinism, round-trip, containment bounds, and
//! prefix-query monotonicity.

use proptest::prelude::*;

use setsketch_ensemble::codec::HashValueWidth;
use setsketch_ensemble::forest::LshForest;
use setsketch_ensemble::minhash::{containment, deserialize_signature, serialize_signature, Minhash};

fn build_signature(seed: i64, num_hash: usize, elements: &[String]) -> Vec<u64> {
    let mut mh = Minhash::new(seed, num_hash);
    for e in elements {
        mh.push(e.as_bytes());
    }
    mh.signature()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn minhash_determinism_is_independent_of_push_order(
        seed in 0i64..1000,
        mut elements in prop::collection::vec("[a-z]{1,8}", 1..40),
    ) {
        let forward = build_signature(seed, 64, &elements);
        elements.reverse();
        let backward = build_signature(seed, 64, &elements);
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn minhash_signature_round_trips_through_serialization(
        seed in 0i64..1000,
        elements in prop::collection::vec("[a-z]{1,8}", 0..40),
    ) {
        let sig = build_signature(seed, 32, &elements);
        let bytes = serialize_signature(&sig);
        let restored = deserialize_signature(&bytes);
        prop_assert_eq!(sig, restored);
    }

    #[test]
    fn containment_is_always_bounded(
        seed in 0i64..1000,
        q_elements in prop::collection::vec("[a-z]{1,8}", 0..40),
        x_elements in prop::collection::vec("[a-z]{1,8}", 0..40),
    ) {
        let q_sig = build_signature(seed, 64, &q_elements);
        let x_sig = build_signature(seed, 64, &x_elements);
        let c = containment(&q_sig, &x_sig, q_elements.len(), x_elements.len());
        prop_assert!((0.0..=1.0).contains(&c));
        if q_elements.is_empty() || x_elements.is_empty() {
            prop_assert_eq!(c, 0.0);
        }
    }

    #[test]
    fn prefix_query_monotonicity_holds_for_random_signatures(
        seeds in prop::collection::vec(0u64..10_000, 3..15),
    ) {
        let mut forest: LshForest<usize> = LshForest::new(4, 2, HashValueWidth::Four);
        let signatures: Vec<Vec<u64>> = seeds
            .iter()
            .map(|&s| {
                let mut mh = Minhash::new(s as i64, 8);
                mh.push(&s.to_le_bytes());
                mh.signature()
            })
            .collect();
        for (key, sig) in signatures.iter().enumerate() {
            forest.add(key, sig);
        }
        forest.index();

        let query_sig = &signatures[0];
        let with_k4 = forest.query_collect(query_sig, Some(4), None);
        let with_k2 = forest.query_collect(query_sig, Some(2), None);
        for key in &with_k4 {
            prop_assert!(with_k2.contains(key));
        }
    }
}

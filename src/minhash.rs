//! MinHash sketching: streaming construction of fixed-length signatures
//! whose collision rate estimates Jaccard similarity.
//!
//! Uses the one-permutation-plus-two-hash MinWise scheme: two independent
//! FNV-1a base hashes `h1`, `h2` are drawn once per [`Minhash`] from a seeded
//! PRNG, and the `j`-th of `H` hash functions is the affine combination
//! `g_j(x) = h1(x) + j * h2(x)` (wrapping `u64` arithmetic). This needs only
//! two hash evaluations per pushed element regardless of `H`.

use rand::{RngCore, SeedableRng};
use rand::rngs::StdRng;

/// Number of bytes used to serialize one hash value.
pub const HASH_VALUE_SIZE: usize = 8;

/// A length-H array of 64-bit minhash values.
///
/// Equality on position `i` between two signatures is used to estimate the
/// Jaccard similarity of the sets they were built from.
pub type Signature = Vec<u64>;

/// Streaming MinHash sketcher.
///
/// Single-producer, write-only until [`Minhash::signature`] is taken. The
/// resulting signature is a deterministic function of the seed, the number
/// of hash functions, and the *set* of pushed elements — independent of
/// push order or duplicate pushes.
pub struct Minhash {
    prefix1: [u8; 8],
    prefix2: [u8; 8],
    slots: Vec<u64>,
}

impl Minhash {
    /// Initialize a MinHash sketcher with a seed and the number of hash
    /// functions `num_hash` (the signature length H).
    #[must_use]
    pub fn new(seed: i64, num_hash: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed as u64);
        let mut prefix1 = [0u8; 8];
        let mut prefix2 = [0u8; 8];
        rng.fill_bytes(&mut prefix1);
        rng.fill_bytes(&mut prefix2);
        Self {
            prefix1,
            prefix2,
            slots: vec![u64::MAX; num_hash],
        }
    }

    /// Number of hash functions (the length of the eventual signature).
    #[must_use]
    pub fn num_hash(&self) -> usize {
        self.slots.len()
    }

    /// Push one element into the sketch. The value should be the element's
    /// serialized byte representation.
    pub fn push(&mut self, value: &[u8]) {
        let h1 = fnv1a_with_prefix(&self.prefix1, value);
        let h2 = fnv1a_with_prefix(&self.prefix2, value);
        for (j, slot) in self.slots.iter_mut().enumerate() {
            let g = h1.wrapping_add((j as u64).wrapping_mul(h2));
            if g < *slot {
                *slot = g;
            }
        }
    }

    /// Take a snapshot of the current signature.
    #[must_use]
    pub fn signature(&self) -> Signature {
        self.slots.clone()
    }
}

/// FNV-1a over `prefix ‖ data`.
fn fnv1a_with_prefix(prefix: &[u8; 8], data: &[u8]) -> u64 {
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in prefix.iter().chain(data.iter()) {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Serialize a signature into a byte buffer, 8 bytes per value, big-endian.
#[must_use]
pub fn serialize_signature(sig: &[u64]) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(signature_byte_len(sig));
    for &value in sig {
        buffer.extend_from_slice(&value.to_be_bytes());
    }
    buffer
}

/// Deserialize a signature from a byte buffer produced by
/// [`serialize_signature`].
///
/// # Panics
///
/// Panics if `buffer.len()` is not a multiple of [`HASH_VALUE_SIZE`] — a
/// malformed buffer is a programming error, not a recoverable input error.
#[must_use]
pub fn deserialize_signature(buffer: &[u8]) -> Signature {
    assert!(
        buffer.len() % HASH_VALUE_SIZE == 0,
        "signature buffer length {} is not a multiple of {HASH_VALUE_SIZE}",
        buffer.len()
    );
    buffer
        .chunks_exact(HASH_VALUE_SIZE)
        .map(|chunk| u64::from_be_bytes(chunk.try_into().expect("chunk is exactly 8 bytes")))
        .collect()
}

/// The serialized length in bytes of a signature of this length.
#[must_use]
pub fn signature_byte_len(sig: &[u64]) -> usize {
    sig.len() * HASH_VALUE_SIZE
}

/// Estimate the containment `|Q ∩ X| / |Q|` from two MinHash signatures and
/// the original set sizes.
///
/// `jaccard` is the fraction of matching positions between `query_sig` and
/// `index_sig`. Containment is then recovered from Jaccard and the size
/// ratio: `c = (|X|/|Q| + 1) * jaccard / (1 + jaccard)`, clamped to `1.0`.
/// Returns `0.0` when either size is `0`.
///
/// # Panics
///
/// Panics if the two signatures have different lengths — comparing
/// signatures built with different `H` is a programming error.
#[must_use]
pub fn containment(query_sig: &[u64], index_sig: &[u64], query_size: usize, index_size: usize) -> f64 {
    assert_eq!(
        query_sig.len(),
        index_sig.len(),
        "signatures must share the same length"
    );
    if query_size == 0 || index_size == 0 {
        return 0.0;
    }
    let matching = query_sig
        .iter()
        .zip(index_sig.iter())
        .filter(|(a, b)| a == b)
        .count();
    let jaccard = matching as f64 / query_sig.len() as f64;
    let ratio = index_size as f64 / query_size as f64;
    let c = (ratio + 1.0) * jaccard / (1.0 + jaccard);
    c.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_has_requested_length() {
        let mh = Minhash::new(1, 64);
        assert_eq!(mh.signature().len(), 64);
        assert_eq!(mh.num_hash(), 64);
    }

    #[test]
    fn determinism_independent_of_push_order() {
        let mut a = Minhash::new(7, 32);
        let mut b = Minhash::new(7, 32);
        for v in ["alpha", "beta", "gamma", "delta"] {
            a.push(v.as_bytes());
        }
        for v in ["delta", "gamma", "beta", "alpha"] {
            b.push(v.as_bytes());
        }
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Minhash::new(1, 32);
        let mut b = Minhash::new(2, 32);
        for v in ["alpha", "beta", "gamma"] {
            a.push(v.as_bytes());
            b.push(v.as_bytes());
        }
        assert_ne!(a.signature(), b.signature());
    }

    #[test]
    fn duplicate_pushes_are_idempotent() {
        let mut a = Minhash::new(3, 16);
        let mut b = Minhash::new(3, 16);
        a.push(b"x");
        a.push(b"x");
        a.push(b"y");
        b.push(b"x");
        b.push(b"y");
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn serialize_round_trip() {
        let mut mh = Minhash::new(1, 8);
        mh.push(b"Test some input");
        let sig = mh.signature();
        let buf = serialize_signature(&sig);
        assert_eq!(buf.len(), signature_byte_len(&sig));
        let restored = deserialize_signature(&buf);
        assert_eq!(sig, restored);
    }

    #[test]
    #[should_panic(expected = "not a multiple")]
    fn deserialize_rejects_misaligned_buffer() {
        let _ = deserialize_signature(&[0u8; 7]);
    }

    #[test]
    fn containment_zero_when_either_size_zero() {
        let a = vec![1u64, 2, 3];
        let b = vec![1u64, 2, 4];
        assert_eq!(containment(&a, &b, 0, 5), 0.0);
        assert_eq!(containment(&a, &b, 5, 0), 0.0);
    }

    #[test]
    fn containment_is_bounded() {
        let mut q = Minhash::new(1, 128);
        let mut x = Minhash::new(1, 128);
        for v in ["a", "b", "c", "d"] {
            q.push(v.as_bytes());
        }
        for v in ["a", "b", "c", "d", "e", "f", "g", "h"] {
            x.push(v.as_bytes());
        }
        let c = containment(&q.signature(), &x.signature(), 4, 8);
        assert!((0.0..=1.0).contains(&c));
    }

    #[test]
    fn identical_sets_have_full_containment() {
        let mut a = Minhash::new(1, 256);
        let mut b = Minhash::new(1, 256);
        for v in ["a", "b", "c", "d", "e"] {
            a.push(v.as_bytes());
            b.push(v.as_bytes());
        }
        let c = containment(&a.signature(), &b.signature(), 5, 5);
        assert!((c - 1.0).abs() < 1e-9);
    }

    #[test]
    fn jaccard_estimate_is_reasonably_unbiased_on_average() {
        // Two overlapping ranges out of a shared universe; signature agreement
        // should track the true Jaccard similarity across many signatures.
        let universe: Vec<String> = (0..2000).map(|i| format!("item-{i}")).collect();
        let a: Vec<&str> = universe[0..1300].iter().map(String::as_str).collect();
        let b: Vec<&str> = universe[700..2000].iter().map(String::as_str).collect();
        let intersection = 1300 - 700;
        let union = 2000;
        let true_jaccard = intersection as f64 / union as f64;

        let mut errors = Vec::new();
        for seed in 0..20 {
            let mut mh_a = Minhash::new(seed, 256);
            let mut mh_b = Minhash::new(seed, 256);
            for v in &a {
                mh_a.push(v.as_bytes());
            }
            for v in &b {
                mh_b.push(v.as_bytes());
            }
            let sig_a = mh_a.signature();
            let sig_b = mh_b.signature();
            let matching = sig_a.iter().zip(sig_b.iter()).filter(|(x, y)| x == y).count();
            let est = matching as f64 / sig_a.len() as f64;
            errors.push((est - true_jaccard).abs());
        }
        let mean_error: f64 = errors.iter().sum::<f64>() / errors.len() as f64;
        assert!(mean_error < 0.15, "mean absolute error too high: {mean_error}");
    }
}

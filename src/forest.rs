//! LshForest: a single band-partitioned LSH index with sorted-prefix query.
//!
//! Backed by `L` independent banded hash tables. While *building*, each band
//! accumulates an unordered table of `hashKey -> {keys}`. `index()` converts
//! each band into a byte-sorted array of `(hashKey, keys)` buckets, enabling
//! binary-search prefix lookup at query time with `K' <= K` — the whole
//! reason buckets are sorted arrays rather than hash maps.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::codec::{encode_band, encode_query_prefix, HashValueWidth};
use crate::probability::{false_positive_and_negative, DEFAULT_PRECISION};

type Band<K> = Vec<(Vec<u8>, Vec<K>)>;

enum State<K> {
    Building(Vec<HashMap<Vec<u8>, HashSet<K>>>),
    Indexed(Vec<Band<K>>),
}

/// A single banded LSH index over `k`-wide, `l`-band signatures.
pub struct LshForest<K> {
    k: usize,
    l: usize,
    width: HashValueWidth,
    state: State<K>,
}

impl<K> LshForest<K>
where
    K: Clone + Eq + Hash,
{
    /// Construct a new forest in the *building* state.
    ///
    /// # Panics
    ///
    /// Panics if `k` or `l` is zero — a zero band width or band count is a
    /// contract violation, mirroring the original source panicking on
    /// negative `k`/`l`.
    #[must_use]
    pub fn new(k: usize, l: usize, width: HashValueWidth) -> Self {
        assert!(k > 0 && l > 0, "k and l must both be positive, got k={k}, l={l}");
        Self {
            k,
            l,
            width,
            state: State::Building(vec![HashMap::new(); l]),
        }
    }

    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    #[must_use]
    pub fn l(&self) -> usize {
        self.l
    }

    #[must_use]
    pub fn is_indexed(&self) -> bool {
        matches!(self.state, State::Indexed(_))
    }

    /// Insert `key` under its banded slices of `signature`.
    ///
    /// # Panics
    ///
    /// Panics if the forest has already been indexed, or if
    /// `signature.len() < k * l`.
    pub fn add(&mut self, key: K, signature: &[u64]) {
        assert!(
            signature.len() >= self.k * self.l,
            "signature of length {} too short for k={} l={}",
            signature.len(),
            self.k,
            self.l
        );
        let bands = match &mut self.state {
            State::Building(bands) => bands,
            State::Indexed(_) => panic!("cannot add to an already-indexed LshForest"),
        };
        for (i, table) in bands.iter_mut().enumerate() {
            let band_key = encode_band(signature, i, self.k, self.width);
            table.entry(band_key).or_default().insert(key.clone());
        }
    }

    /// Finalize the forest: convert every band's building table into a
    /// byte-sorted bucket array. Idempotent generations — calling `add`
    /// again after `index` starts a fresh building table.
    pub fn index(&mut self) {
        let bands = match &mut self.state {
            State::Building(bands) => std::mem::take(bands),
            State::Indexed(_) => return,
        };
        let mut total_keys = 0usize;
        let indexed: Vec<Band<K>> = bands
            .into_iter()
            .map(|table| {
                let mut buckets: Band<K> = table
                    .into_iter()
                    .map(|(key, set)| {
                        total_keys += set.len();
                        (key, set.into_iter().collect())
                    })
                    .collect();
                buckets.sort_by(|a, b| a.0.cmp(&b.0));
                buckets
            })
            .collect();
        tracing::debug!(bands = indexed.len(), total_keys, "lsh forest indexed");
        self.state = State::Indexed(indexed);
    }

    /// Query with effective `(K', L')`, invoking `on_key` once per
    /// newly-discovered matching key. `on_key` returns `false` to request
    /// cooperative cancellation; the query stops emitting (but does not
    /// un-discover) as soon as that happens.
    ///
    /// `k_prime`/`l_prime` of `None` mean "use the configured `k`/`l`".
    ///
    /// # Panics
    ///
    /// Panics if the forest has not been indexed yet, or if `k_prime > k`
    /// / `l_prime > l`.
    pub fn query(
        &self,
        signature: &[u64],
        k_prime: Option<usize>,
        l_prime: Option<usize>,
        on_key: &mut dyn FnMut(&K) -> bool,
    ) {
        let bands = match &self.state {
            State::Indexed(bands) => bands,
            State::Building(_) => panic!("cannot query an LshForest before index() has run"),
        };
        let k_prime = k_prime.unwrap_or(self.k);
        let l_prime = l_prime.unwrap_or(self.l);
        assert!(k_prime <= self.k, "k' ({k_prime}) exceeds configured k ({})", self.k);
        assert!(l_prime <= self.l, "l' ({l_prime}) exceeds configured l ({})", self.l);

        let mut seen: HashSet<K> = HashSet::new();
        'bands: for (i, bucket) in bands.iter().take(l_prime).enumerate() {
            let prefix = encode_query_prefix(signature, i, self.k, k_prime, self.width);
            let start = bucket.partition_point(|(key, _)| key.as_slice() < prefix.as_slice());
            for (key, members) in bucket[start..].iter() {
                if key.len() < prefix.len() || key[..prefix.len()] != prefix[..] {
                    break;
                }
                for member in members {
                    if seen.contains(member) {
                        continue;
                    }
                    if !on_key(member) {
                        break 'bands;
                    }
                    seen.insert(member.clone());
                }
            }
        }
    }

    /// Convenience wrapper over [`LshForest::query`] collecting matches into
    /// a `Vec`, for callers that don't need streaming cancellation.
    #[must_use]
    pub fn query_collect(&self, signature: &[u64], k_prime: Option<usize>, l_prime: Option<usize>) -> Vec<K> {
        let mut out = Vec::new();
        self.query(signature, k_prime, l_prime, &mut |key| {
            out.push(key.clone());
            true
        });
        out
    }

    /// Search `(k, l) in [1, k] x [1, l]` for the pair minimizing
    /// `fp + fn` at `(x, q, t)`, ties broken by lexicographic `(l, k)` order
    /// (first found wins).
    #[must_use]
    pub fn optimal_kl(&self, x: f64, q: f64, t: f64) -> (usize, usize) {
        optimal_kl_in_range(1..=self.k, 1..=self.l, x, q, t, DEFAULT_PRECISION)
    }
}

/// Shared optimal-(k, l) search used by both [`LshForest`] and
/// [`crate::forest_array::LshForestArray`], parameterized over the
/// candidate ranges each backend makes available.
pub(crate) fn optimal_kl_in_range(
    k_range: std::ops::RangeInclusive<usize>,
    l_range: std::ops::RangeInclusive<usize>,
    x: f64,
    q: f64,
    t: f64,
    precision: f64,
) -> (usize, usize) {
    let mut best = (*k_range.start(), *l_range.start());
    let mut best_score = f64::INFINITY;
    for l in l_range {
        for k in k_range.clone() {
            let (fp, fnr) = false_positive_and_negative(x, q, k as u32, l as u32, t, precision);
            let score = fp + fnr;
            if score < best_score {
                best_score = score;
                best = (k, l);
            }
        }
    }
    best
}

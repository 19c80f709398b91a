//! LshForestArray: a family of [`LshForest`]s over `k in [1, maxK]` sharing
//! one `numHash` budget, widening the feasible `(K, L)` grid beyond what a
//! single fixed-`K` forest can express.

use std::hash::Hash;

use crate::codec::HashValueWidth;
use crate::forest::LshForest;
use crate::probability::{false_positive_and_negative, DEFAULT_PRECISION};

/// A family of forests, one per band width `k in [1, max_k]`, each built
/// with `l = num_hash / k` bands.
pub struct LshForestArray<K> {
    num_hash: usize,
    max_k: usize,
    forests: Vec<LshForest<K>>,
}

impl<K> LshForestArray<K>
where
    K: Clone + Eq + Hash,
{
    /// Build a forest for every `k` in `[1, max_k]`, each with
    /// `l = num_hash / k` bands (floor division).
    ///
    /// # Panics
    ///
    /// Panics if `max_k == 0` or `num_hash < max_k` (every forest needs at
    /// least one band).
    #[must_use]
    pub fn new(num_hash: usize, max_k: usize, width: HashValueWidth) -> Self {
        assert!(max_k > 0, "max_k must be positive");
        assert!(num_hash >= max_k, "num_hash ({num_hash}) must be at least max_k ({max_k})");
        let forests = (1..=max_k)
            .map(|k| LshForest::new(k, num_hash / k, width))
            .collect();
        Self { num_hash, max_k, forests }
    }

    #[must_use]
    pub fn max_k(&self) -> usize {
        self.max_k
    }

    #[must_use]
    pub fn num_hash(&self) -> usize {
        self.num_hash
    }

    /// Insert `key` into every forest in the array.
    pub fn add(&mut self, key: K, signature: &[u64]) {
        for forest in &mut self.forests {
            forest.add(key.clone(), signature);
        }
    }

    /// Finalize every forest in the array.
    pub fn index(&mut self) {
        for forest in &mut self.forests {
            forest.index();
        }
        tracing::debug!(max_k = self.max_k, "lsh forest array indexed");
    }

    /// Query the `(k - 1)`-th forest (band width `k`) with its native band
    /// width and `l` bands, invoking `on_key` for each newly-discovered
    /// match.
    ///
    /// # Panics
    ///
    /// Panics if `k` is `0` or greater than `max_k`, or if `l` exceeds that
    /// forest's configured band count.
    pub fn query(&self, signature: &[u64], k: usize, l: usize, on_key: &mut dyn FnMut(&K) -> bool) {
        assert!(k > 0 && k <= self.max_k, "k ({k}) out of range [1, {}]", self.max_k);
        let forest = &self.forests[k - 1];
        forest.query(signature, None, Some(l), on_key);
    }

    /// Convenience wrapper collecting [`LshForestArray::query`] matches into
    /// a `Vec`.
    #[must_use]
    pub fn query_collect(&self, signature: &[u64], k: usize, l: usize) -> Vec<K> {
        let mut out = Vec::new();
        self.query(signature, k, l, &mut |key| {
            out.push(key.clone());
            true
        });
        out
    }

    /// Search `(k, l)` with `k in [1, max_k]`, `l in [1, num_hash / k]`,
    /// subject to `k * l <= num_hash`, minimizing `fp + fn` at `(x, q, t)`.
    /// Ties broken by lexicographic `(l, k)` order, first found wins.
    #[must_use]
    pub fn optimal_kl(&self, x: f64, q: f64, t: f64) -> (usize, usize) {
        let mut best = (1usize, 1usize);
        let mut best_score = f64::INFINITY;
        for l in 1..=self.num_hash {
            for k in 1..=self.max_k {
                if k * l > self.num_hash {
                    continue;
                }
                let (fp, fnr) = false_positive_and_negative(x, q, k as u32, l as u32, t, DEFAULT_PRECISION);
                let score = fp + fnr;
                if score < best_score {
                    best_score = score;
                    best = (k, l);
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fans_out_add_and_index_to_every_forest() {
        let mut array: LshForestArray<&str> = LshForestArray::new(16, 4, HashValueWidth::Eight);
        array.add("a", &(0..16).collect::<Vec<u64>>());
        array.index();
        for forest in &array.forests {
            assert!(forest.is_indexed());
        }
    }

    #[test]
    fn query_dispatches_to_the_matching_k_forest() {
        let mut array: LshForestArray<&str> = LshForestArray::new(16, 4, HashValueWidth::Eight);
        array.add("a", &(0..16).collect::<Vec<u64>>());
        array.index();
        let results = array.query_collect(&(0..16).collect::<Vec<u64>>(), 2, 8);
        assert!(results.contains(&"a"));
    }

    #[test]
    fn optimal_kl_respects_num_hash_budget() {
        let array: LshForestArray<&str> = LshForestArray::new(32, 8, HashValueWidth::Eight);
        let (k, l) = array.optimal_kl(100.0, 100.0, 0.5);
        assert!(k * l <= 32);
        assert!((1..=8).contains(&k));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn query_rejects_k_outside_range() {
        let mut array: LshForestArray<&str> = LshForestArray::new(16, 4, HashValueWidth::Eight);
        array.index();
        array.query_collect(&(0..16).collect::<Vec<u64>>(), 5, 1);
    }
}

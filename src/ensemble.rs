//! LshEnsemble: coordinates per-size-partition LSH indices and fans out
//! queries across them, caching the `(K, L)` parameters chosen for each
//! `(upperSize, querySize, roundedThreshold)` triple.
//!
//! Two backends share one facade ([`LshBackend`]): [`LshForest`] (the
//! "plain" ensemble) and [`LshForestArray`] (the "Plus" ensemble, trading
//! build memory for a wider `(K, L)` search grid). An ensemble holds a
//! homogeneous collection of exactly one backend, fixed at construction.

use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::codec::HashValueWidth;
use crate::forest::LshForest;
use crate::forest_array::LshForestArray;
use crate::partition::Partition;

/// Capability set a concrete LSH backend must expose to back an ensemble.
pub trait LshBackend<K> {
    fn add(&mut self, key: K, signature: &[u64]);
    fn index(&mut self);
    /// Query with an explicit, already-resolved `(k, l)` — no sentinel
    /// values at this layer; the ensemble resolves `(k, l)` itself.
    fn query(&self, signature: &[u64], k: usize, l: usize, on_key: &mut dyn FnMut(&K) -> bool);
    fn optimal_kl(&self, x: f64, q: f64, t: f64) -> (usize, usize);
}

/// Construct a backend's initial (building-state) instance from the shared
/// ensemble-wide budget.
pub trait NewBackend {
    fn new_backend(num_hash: usize, max_k: usize, width: HashValueWidth) -> Self;
}

impl<K> LshBackend<K> for LshForest<K>
where
    K: Clone + Eq + Hash,
{
    fn add(&mut self, key: K, signature: &[u64]) {
        LshForest::add(self, key, signature);
    }

    fn index(&mut self) {
        LshForest::index(self);
    }

    fn query(&self, signature: &[u64], k: usize, l: usize, on_key: &mut dyn FnMut(&K) -> bool) {
        LshForest::query(self, signature, Some(k), Some(l), on_key);
    }

    fn optimal_kl(&self, x: f64, q: f64, t: f64) -> (usize, usize) {
        LshForest::optimal_kl(self, x, q, t)
    }
}

impl<K> NewBackend for LshForest<K>
where
    K: Clone + Eq + Hash,
{
    fn new_backend(num_hash: usize, max_k: usize, width: HashValueWidth) -> Self {
        LshForest::new(max_k, num_hash / max_k, width)
    }
}

impl<K> LshBackend<K> for LshForestArray<K>
where
    K: Clone + Eq + Hash,
{
    fn add(&mut self, key: K, signature: &[u64]) {
        LshForestArray::add(self, key, signature);
    }

    fn index(&mut self) {
        LshForestArray::index(self);
    }

    fn query(&self, signature: &[u64], k: usize, l: usize, on_key: &mut dyn FnMut(&K) -> bool) {
        LshForestArray::query(self, signature, k, l, on_key);
    }

    fn optimal_kl(&self, x: f64, q: f64, t: f64) -> (usize, usize) {
        LshForestArray::optimal_kl(self, x, q, t)
    }
}

impl<K> NewBackend for LshForestArray<K>
where
    K: Clone + Eq + Hash,
{
    fn new_backend(num_hash: usize, max_k: usize, width: HashValueWidth) -> Self {
        LshForestArray::new(num_hash, max_k, width)
    }
}

/// Cache key: `(partition upper bound, query size, threshold rounded to two
/// decimal places and scaled to an integer)`.
type CacheKey = (usize, usize, u64);

fn round_threshold(t: f64) -> u64 {
    (t * 100.0).round() as u64
}

/// A size-partitioned cover of the domain collection, queried in parallel
/// with per-partition `(K, L)`.
pub struct LshEnsemble<K, B> {
    partitions: Vec<Partition>,
    backends: Vec<B>,
    indexed: bool,
    cache: DashMap<CacheKey, (usize, usize)>,
    _marker: PhantomData<K>,
}

impl<K, B> LshEnsemble<K, B> {
    /// Assemble an ensemble directly from already-built partitions and
    /// backends. Used by [`crate::bootstrap`], which discovers partition
    /// bounds incrementally while streaming records.
    pub(crate) fn assemble(partitions: Vec<Partition>, backends: Vec<B>) -> Self {
        Self {
            partitions,
            backends,
            indexed: false,
            cache: DashMap::new(),
            _marker: PhantomData,
        }
    }
}

impl<K, B> LshEnsemble<K, B>
where
    B: NewBackend,
{
    /// Build an (empty, building-state) ensemble over the given partitions,
    /// each holding an independent backend sharing the `num_hash` / `max_k`
    /// budget.
    #[must_use]
    pub fn new(partitions: Vec<Partition>, num_hash: usize, max_k: usize, width: HashValueWidth) -> Self {
        let backends = partitions
            .iter()
            .map(|_| B::new_backend(num_hash, max_k, width))
            .collect();
        Self {
            partitions,
            backends,
            indexed: false,
            cache: DashMap::new(),
            _marker: PhantomData,
        }
    }
}

impl<K, B> LshEnsemble<K, B>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    B: LshBackend<K> + Send + Sync + 'static,
{
    #[must_use]
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    /// Insert `key` into the backend owning partition `part_index`.
    ///
    /// # Panics
    ///
    /// Panics if `part_index` is out of range, or the ensemble has already
    /// been indexed.
    pub fn add(&mut self, key: K, signature: &[u64], part_index: usize) {
        assert!(!self.indexed, "cannot add to an already-indexed LshEnsemble");
        self.backends[part_index].add(key, signature);
    }

    /// Finalize every partition's backend.
    pub fn index(&mut self) {
        for backend in &mut self.backends {
            backend.index();
        }
        self.indexed = true;
        tracing::info!(
            partitions = self.partitions.len(),
            bounds = ?self.partitions.iter().map(|p| (p.lower, p.upper)).collect::<Vec<_>>(),
            "lsh ensemble indexed"
        );
    }

    /// Resolve the cached (or freshly computed) `(K, L)` for partition `i`
    /// at `(query_size, threshold)`.
    fn resolve_kl(&self, i: usize, query_size: usize, threshold: f64) -> (usize, usize) {
        let partition = &self.partitions[i];
        let key = (partition.upper, query_size, round_threshold(threshold));
        if let Some(cached) = self.cache.get(&key) {
            return *cached;
        }
        let kl = self.backends[i].optimal_kl(partition.upper as f64, query_size as f64, threshold);
        tracing::debug!(
            upper = partition.upper,
            query_size,
            threshold,
            k = kl.0,
            l = kl.1,
            "lsh ensemble (k, l) cache miss"
        );
        self.cache.insert(key, kl);
        kl
    }

    fn query_blocking(
        self: &Arc<Self>,
        signature: &[u64],
        query_size: usize,
        threshold: f64,
        done: &AtomicBool,
        tx: &mpsc::SyncSender<K>,
    ) {
        rayon::scope(|scope| {
            for i in 0..self.partitions.len() {
                if done.load(Ordering::Relaxed) {
                    break;
                }
                let (k, l) = self.resolve_kl(i, query_size, threshold);
                let ensemble = Arc::clone(self);
                scope.spawn(move |_| {
                    if done.load(Ordering::Relaxed) {
                        return;
                    }
                    ensemble.backends[i].query(signature, k, l, &mut |found| {
                        if done.load(Ordering::Relaxed) {
                            return false;
                        }
                        tx.send(found.clone()).is_ok()
                    });
                });
            }
        });
    }

    /// Query every partition in parallel at `(|Q| = query_size, t =
    /// threshold)`, returning a lazy, cancellable stream of matching keys.
    ///
    /// Dropping the returned [`QueryStream`] (or setting its `done` flag)
    /// causes every per-partition worker to stop emitting promptly.
    ///
    /// # Panics
    ///
    /// Panics if the ensemble has not been indexed yet.
    #[must_use]
    pub fn query(self: &Arc<Self>, signature: Vec<u64>, query_size: usize, threshold: f64) -> QueryStream<K> {
        assert!(self.indexed, "cannot query an un-indexed LshEnsemble");
        let (tx, rx) = mpsc::sync_channel(0);
        let done = Arc::new(AtomicBool::new(false));
        let ensemble = Arc::clone(self);
        let worker_done = Arc::clone(&done);
        thread::spawn(move || {
            ensemble.query_blocking(&signature, query_size, threshold, &worker_done, &tx);
        });
        QueryStream { receiver: rx, done }
    }

    /// Convenience wrapper: drain [`LshEnsemble::query`] eagerly, reporting
    /// wall-clock duration alongside the collected keys.
    #[must_use]
    pub fn query_timed(self: &Arc<Self>, signature: Vec<u64>, query_size: usize, threshold: f64) -> (Vec<K>, Duration) {
        let start = Instant::now();
        let keys: Vec<K> = self.query(signature, query_size, threshold).collect();
        (keys, start.elapsed())
    }
}

/// A lazy, cancellable stream of matching keys returned by
/// [`LshEnsemble::query`].
///
/// Dropping the stream signals cancellation to every in-flight per-partition
/// worker; they stop emitting at their next cooperative checkpoint.
pub struct QueryStream<K> {
    receiver: mpsc::Receiver<K>,
    done: Arc<AtomicBool>,
}

impl<K> QueryStream<K> {
    /// Explicitly signal cancellation without dropping the stream.
    pub fn cancel(&self) {
        self.done.store(true, Ordering::SeqCst);
    }
}

impl<K> Iterator for QueryStream<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.receiver.recv().ok()
    }
}

impl<K> Drop for QueryStream<K> {
    fn drop(&mut self) {
        self.done.store(true, Ordering::SeqCst);
    }
}

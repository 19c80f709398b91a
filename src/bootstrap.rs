//! Bootstrap: build an [`LshEnsemble`] from a stream of sorted
//! [`DomainRecord`]s, either by equi-depth partitioning or by the
//! DP-optimal partitioner.
//!
//! Both variants are generic over the backend (`LshForest` for the plain
//! ensemble, `LshForestArray` for the "Plus" ensemble), so each has exactly
//! one implementation shared by both backend choices.

use std::hash::Hash;

use crate::codec::HashValueWidth;
use crate::domain::DomainRecord;
use crate::ensemble::{LshBackend, LshEnsemble, NewBackend};
use crate::error::{LshError, Result};
use crate::histogram::collect_size_histogram;
use crate::partition::{optimal_partitions, Partition};

/// Build an ensemble by equi-depth partitioning: `total_num_domains` split
/// as evenly as possible across `num_partitions` contiguous partitions.
///
/// `records` must arrive in non-decreasing order of `size`; violation
/// returns [`LshError::size_out_of_order`] with no partial ensemble built.
pub fn bootstrap_equi_depth<K, B>(
    num_partitions: usize,
    num_hash: usize,
    max_k: usize,
    width: HashValueWidth,
    total_num_domains: usize,
    records: impl IntoIterator<Item = DomainRecord<K>>,
) -> Result<LshEnsemble<K, B>>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    B: LshBackend<K> + NewBackend + Send + Sync + 'static,
{
    assert!(num_partitions > 0, "num_partitions must be positive");

    let depth = (total_num_domains / num_partitions).max(1);
    let mut lowers: Vec<Option<usize>> = vec![None; num_partitions];
    let mut uppers: Vec<usize> = vec![0; num_partitions];
    let mut counts: Vec<usize> = vec![0; num_partitions];
    let mut backends: Vec<B> = (0..num_partitions)
        .map(|_| B::new_backend(num_hash, max_k, width))
        .collect();

    let mut current = 0usize;
    let mut prev_size: Option<usize> = None;

    for record in records {
        if let Some(prev) = prev_size {
            if record.size < prev {
                tracing::warn!(prev, size = record.size, "bootstrap_equi_depth: size-order violation");
                return Err(LshError::size_out_of_order("bootstrap_equi_depth"));
            }
        }
        prev_size = Some(record.size);

        if current < num_partitions - 1 && counts[current] >= depth && record.size != uppers[current] {
            current += 1;
        }

        if lowers[current].is_none() {
            lowers[current] = Some(record.size);
        }
        uppers[current] = record.size;
        counts[current] += 1;
        backends[current].add(record.key, &record.signature);
    }

    let mut partitions = Vec::with_capacity(num_partitions);
    let mut kept_backends = Vec::with_capacity(num_partitions);
    for i in 0..num_partitions {
        if let Some(lower) = lowers[i] {
            partitions.push(Partition::new(lower, uppers[i]));
            kept_backends.push(backends.remove(0));
        } else {
            // This partition absorbed no records (total_num_domains < num_partitions);
            // drop it rather than expose an empty, boundless partition.
            backends.remove(0);
        }
    }

    tracing::info!(
        partitions = partitions.len(),
        bounds = ?partitions.iter().map(|p| (p.lower, p.upper)).collect::<Vec<_>>(),
        "bootstrap_equi_depth: partitions fixed"
    );

    let mut ensemble = LshEnsemble::assemble(partitions, kept_backends);
    ensemble.index();
    Ok(ensemble)
}

/// Build an ensemble by DP-optimal partitioning.
///
/// `stream_factory` must be callable twice, yielding identical records each
/// time: once to compute the partition boundaries from the size
/// distribution (§4.F, §4.G), a second time to actually populate the index.
/// Records falling outside every precomputed interval fail the bootstrap
/// with [`LshError::out_of_partition`].
pub fn bootstrap_optimal<K, B, I, F>(
    num_partitions: usize,
    num_hash: usize,
    max_k: usize,
    width: HashValueWidth,
    mut stream_factory: F,
) -> Result<LshEnsemble<K, B>>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    B: LshBackend<K> + NewBackend + Send + Sync + 'static,
    I: IntoIterator<Item = DomainRecord<K>>,
    F: FnMut() -> I,
{
    assert!(num_partitions > 0, "num_partitions must be positive");

    let mut prev_size: Option<usize> = None;
    let sizing_pass = stream_factory();
    let mut sizes_seen = Vec::new();
    for record in sizing_pass {
        if let Some(prev) = prev_size {
            if record.size < prev {
                tracing::warn!(prev, size = record.size, "bootstrap_optimal: size-order violation");
                return Err(LshError::size_out_of_order("bootstrap_optimal"));
            }
        }
        prev_size = Some(record.size);
        sizes_seen.push(record.size);
    }

    let (sizes, counts) = collect_size_histogram(sizes_seen);
    if sizes.is_empty() {
        let ensemble = LshEnsemble::assemble(Vec::new(), Vec::new());
        return Ok(ensemble);
    }
    let partitions = optimal_partitions(&sizes, &counts, num_partitions);

    tracing::info!(
        partitions = partitions.len(),
        bounds = ?partitions.iter().map(|p| (p.lower, p.upper)).collect::<Vec<_>>(),
        "bootstrap_optimal: partitions fixed"
    );

    let mut backends: Vec<B> = partitions
        .iter()
        .map(|_| B::new_backend(num_hash, max_k, width))
        .collect();

    let populate_pass = stream_factory();
    let mut prev_size: Option<usize> = None;
    for record in populate_pass {
        if let Some(prev) = prev_size {
            if record.size < prev {
                tracing::warn!(prev, size = record.size, "bootstrap_optimal: size-order violation");
                return Err(LshError::size_out_of_order("bootstrap_optimal"));
            }
        }
        prev_size = Some(record.size);

        let part_index = partitions.iter().position(|p| p.contains(record.size));
        let Some(part_index) = part_index else {
            return Err(LshError::out_of_partition("bootstrap_optimal", record.size));
        };
        backends[part_index].add(record.key, &record.signature);
    }

    let mut ensemble = LshEnsemble::assemble(partitions, backends);
    ensemble.index();
    Ok(ensemble)
}

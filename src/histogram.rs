//! Size-distribution collector: turns a stream of domain sizes into the
//! `(sizes[], counts[])` histogram the optimal partitioner operates on.

use std::collections::BTreeMap;

/// Collect a histogram of `size -> count` from a stream of sizes, returning
/// parallel arrays sorted ascending by size.
///
/// Invoked twice during optimal bootstrap: once against a throwaway stream
/// to fix partition boundaries, and again against a fresh stream to
/// actually populate the index.
#[must_use]
pub fn collect_size_histogram(sizes: impl IntoIterator<Item = usize>) -> (Vec<usize>, Vec<usize>) {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for size in sizes {
        *counts.entry(size).or_insert(0) += 1;
    }
    counts.into_iter().unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainRecord;

    #[test]
    fn aggregates_and_sorts_by_size() {
        let records = vec![
            DomainRecord::new("a", 5, vec![]),
            DomainRecord::new("b", 2, vec![]),
            DomainRecord::new("c", 5, vec![]),
            DomainRecord::new("d", 8, vec![]),
            DomainRecord::new("e", 2, vec![]),
        ];
        let (sizes, counts) = collect_size_histogram(records.iter().map(|r| r.size));
        assert_eq!(sizes, vec![2, 5, 8]);
        assert_eq!(counts, vec![2, 2, 1]);
    }

    #[test]
    fn empty_stream_gives_empty_histogram() {
        let (sizes, counts) = collect_size_histogram(std::iter::empty());
        assert!(sizes.is_empty());
        assert!(counts.is_empty());
    }
}

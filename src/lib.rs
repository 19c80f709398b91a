//! **Approximate set-containment search over MinHash LSH ensembles.**
//!
//! `setsketch-ensemble` indexes a collection of *domains* — each an
//! arbitrary set of string values — and answers containment queries: given
//! a query domain Q and a threshold `t`, return every indexed domain X with
//! `|Q ∩ X| / |Q| >= t`, with bounded false-positive and false-negative
//! probabilities. It is built for corpora whose domain sizes span orders of
//! magnitude — the canonical workload is large collections of heterogeneous
//! tabular columns — where a single fixed `(K, L)` LSH configuration cannot
//! serve both small and large sets well.
//!
//! ## Core Concepts & Modules
//!
//! - **[`minhash`]**: Streaming construction of fixed-length MinHash
//!   signatures ([`minhash::Minhash`]) and the [`minhash::containment`]
//!   estimator built from two signatures.
//! - **[`forest`]**: [`forest::LshForest`], a single banded LSH index with
//!   sorted-prefix query supporting `K' <= K`, `L' <= L` at query time.
//! - **[`forest_array`]**: [`forest_array::LshForestArray`], a family of
//!   forests over `k in [1, maxK]` sharing one hash budget, for callers who
//!   want a wider `(K, L)` search grid at the cost of extra build memory.
//! - **[`ensemble`]**: [`ensemble::LshEnsemble`], the size-partitioned
//!   collection of indices queried in parallel with per-partition tuning.
//! - **[`bootstrap`]**: build an ensemble from a sorted stream of
//!   [`domain::DomainRecord`]s, either by equi-depth partitioning or by the
//!   DP-optimal partitioner in [`partition`].
//! - **[`partition`]**: the DP partitioner minimizing expected false
//!   positives under a known size distribution.
//! - **[`probability`]**: the collision-probability kernel both `OptimalKL`
//!   searches use as their cost oracle.
//!
//! ## Getting Started
//!
//! ```
//! use std::sync::Arc;
//! use setsketch_ensemble::bootstrap::bootstrap_equi_depth;
//! use setsketch_ensemble::codec::HashValueWidth;
//! use setsketch_ensemble::domain::DomainRecord;
//! use setsketch_ensemble::forest::LshForest;
//! use setsketch_ensemble::minhash::Minhash;
//!
//! let mut records = Vec::new();
//! for (key, values) in [
//!     ("1", vec!["a", "b", "c", "d"]),
//!     ("2", vec!["e", "f", "g", "h"]),
//! ] {
//!     let mut mh = Minhash::new(1, 128);
//!     for v in &values {
//!         mh.push(v.as_bytes());
//!     }
//!     records.push(DomainRecord::new(key, values.len(), mh.signature()));
//! }
//!
//! let ensemble = bootstrap_equi_depth::<&str, LshForest<&str>>(
//!     2, 128, 4, HashValueWidth::Eight, records.len(), records.clone(),
//! )
//! .expect("stream is sorted by size");
//! let ensemble = Arc::new(ensemble);
//!
//! let query = &records[0];
//! let hits: Vec<&str> = ensemble.query(query.signature.clone(), query.size, 0.9).collect();
//! assert!(hits.contains(&"1"));
//! ```

#![warn(clippy::unwrap_used)]
#![allow(
    // Domain sizes and hash widths are pervasively usize<->f64<->u32 in the
    // probability kernel and partitioner; all values are small in practice.
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::similar_names
)]

pub mod bootstrap;
pub mod codec;
pub mod config;
pub mod domain;
pub mod ensemble;
pub mod error;
pub mod forest;
pub mod forest_array;
pub mod histogram;
pub mod minhash;
pub mod partition;
pub mod probability;

pub use bootstrap::{bootstrap_equi_depth, bootstrap_optimal};
pub use config::{EnsembleConfig, EnsembleConfigBuilder, Validatable};
pub use domain::DomainRecord;
pub use ensemble::{LshBackend, LshEnsemble, NewBackend, QueryStream};
pub use error::{BootstrapErrorKind, LshError, Result};
pub use forest::LshForest;
pub use forest_array::LshForestArray;
pub use minhash::{containment, deserialize_signature, serialize_signature, Minhash, Signature};
pub use partition::{optimal_partitions, Partition};

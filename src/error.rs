//! Unified error type for setsketch-ensemble.
//!
//! Only the two bootstrap input errors below are recoverable. Programming
//! errors (querying an index before `index()`, negative K/L, a malformed
//! serialized signature buffer) are contract violations and panic — the
//! caller has misused the API, not supplied bad data.

use thiserror::Error;

/// Top-level error type for setsketch-ensemble operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LshError {
    /// Errors raised while bootstrapping an ensemble from a domain stream.
    #[error("bootstrap failed: {context}")]
    Bootstrap {
        context: String,
        #[source]
        source: BootstrapErrorKind,
    },

    /// Invalid ensemble configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Specific bootstrap error kinds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BootstrapErrorKind {
    /// A domain record arrived with a smaller size than its predecessor.
    #[error("domain records must be sorted in ascending order of size")]
    DomainSizeOutOfOrder,

    /// A domain record's size falls in no precomputed partition interval.
    #[error("domain size {size} does not match any partition")]
    DomainOutOfPartition { size: usize },
}

/// Convenient `Result` alias for setsketch-ensemble operations.
pub type Result<T> = std::result::Result<T, LshError>;

impl LshError {
    /// Build a `DomainSizeOutOfOrder` bootstrap error.
    pub fn size_out_of_order(context: impl Into<String>) -> Self {
        Self::Bootstrap {
            context: context.into(),
            source: BootstrapErrorKind::DomainSizeOutOfOrder,
        }
    }

    /// Build a `DomainOutOfPartition` bootstrap error.
    pub fn out_of_partition(context: impl Into<String>, size: usize) -> Self {
        Self::Bootstrap {
            context: context.into(),
            source: BootstrapErrorKind::DomainOutOfPartition { size },
        }
    }

    /// True if this is a `DomainSizeOutOfOrder` bootstrap error.
    #[must_use]
    pub fn is_size_out_of_order(&self) -> bool {
        matches!(
            self,
            Self::Bootstrap {
                source: BootstrapErrorKind::DomainSizeOutOfOrder,
                ..
            }
        )
    }
}

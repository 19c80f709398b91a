//! Configuration module for setsketch-ensemble.
//!
//! A small, validated surface of build-time defaults for embedding
//! applications to tune — integration precision, MinHash seed, default
//! partition count. There is no file-based configuration: this crate is a
//! library with no on-disk config of its own.
//!
//! ```
//! use setsketch_ensemble::config::{EnsembleConfig, Validatable};
//!
//! let config = EnsembleConfig::builder().default_num_partitions(8).build();
//! assert!(config.is_valid());
//! ```

mod defaults;
mod validation;

pub use defaults::{
    EnsembleConfig, EnsembleConfigBuilder, DEFAULT_INTEGRATION_PRECISION, DEFAULT_MINHASH_SEED,
    DEFAULT_NUM_PARTITIONS,
};
pub use validation::{ConfigError, Validatable};

//! Tunable build-time defaults for setsketch-ensemble.

/// Integration precision used by the probability kernel unless overridden.
pub const DEFAULT_INTEGRATION_PRECISION: f64 = 0.01;

/// Fixed MinHash seed used when the caller wants reproducible builds across
/// runs rather than process-random sketches.
pub const DEFAULT_MINHASH_SEED: i64 = 1;

/// Default partition count for equi-depth bootstrap when the caller has no
/// opinion on how finely to split the size distribution.
pub const DEFAULT_NUM_PARTITIONS: usize = 4;

/// Validated, tunable defaults for building an ensemble.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsembleConfig {
    /// Step size used by rectangle-rule integration in the probability
    /// kernel (see [`crate::probability`]).
    pub integration_precision: f64,
    /// Seed handed to every [`crate::minhash::Minhash`] built under this
    /// configuration.
    pub minhash_seed: i64,
    /// Default partition count for equi-depth bootstrap.
    pub default_num_partitions: usize,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            integration_precision: DEFAULT_INTEGRATION_PRECISION,
            minhash_seed: DEFAULT_MINHASH_SEED,
            default_num_partitions: DEFAULT_NUM_PARTITIONS,
        }
    }
}

impl EnsembleConfig {
    /// Start building a config from the library defaults.
    #[must_use]
    pub fn builder() -> EnsembleConfigBuilder {
        EnsembleConfigBuilder::default()
    }
}

/// Fluent builder for [`EnsembleConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EnsembleConfigBuilder {
    integration_precision: Option<f64>,
    minhash_seed: Option<i64>,
    default_num_partitions: Option<usize>,
}

impl EnsembleConfigBuilder {
    #[must_use]
    pub fn integration_precision(mut self, value: f64) -> Self {
        self.integration_precision = Some(value);
        self
    }

    #[must_use]
    pub fn minhash_seed(mut self, value: i64) -> Self {
        self.minhash_seed = Some(value);
        self
    }

    #[must_use]
    pub fn default_num_partitions(mut self, value: usize) -> Self {
        self.default_num_partitions = Some(value);
        self
    }

    #[must_use]
    pub fn build(self) -> EnsembleConfig {
        let defaults = EnsembleConfig::default();
        EnsembleConfig {
            integration_precision: self.integration_precision.unwrap_or(defaults.integration_precision),
            minhash_seed: self.minhash_seed.unwrap_or(defaults.minhash_seed),
            default_num_partitions: self.default_num_partitions.unwrap_or(defaults.default_num_partitions),
        }
    }
}

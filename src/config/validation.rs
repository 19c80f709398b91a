//! Configuration validation for setsketch-ensemble.
//!
//! Provides a validation trait implemented for [`EnsembleConfig`].

use super::defaults::EnsembleConfig;

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validatable for EnsembleConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.integration_precision <= 0.0 || self.integration_precision >= 1.0 {
            errors.push(ConfigError {
                field: "integration_precision".to_string(),
                message: format!("must be in (0, 1), got {}", self.integration_precision),
            });
        }

        if self.default_num_partitions < 1 {
            errors.push(ConfigError {
                field: "default_num_partitions".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EnsembleConfig::default();
        assert!(config.is_valid());
    }

    #[test]
    fn precision_out_of_range_is_invalid() {
        let config = EnsembleConfig::builder().integration_precision(1.5).build();
        assert!(!config.is_valid());

        let config = EnsembleConfig::builder().integration_precision(0.0).build();
        assert!(!config.is_valid());
    }

    #[test]
    fn zero_partitions_is_invalid() {
        let config = EnsembleConfig::builder().default_num_partitions(0).build();
        assert!(!config.is_valid());
    }

    #[test]
    fn config_error_display() {
        let error = ConfigError {
            field: "test_field".to_string(),
            message: "test error message".to_string(),
        };
        assert_eq!(error.to_string(), "test_field: test error message");
    }
}

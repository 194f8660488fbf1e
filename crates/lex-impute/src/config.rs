//! Configuration types for imputation runs.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic setup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Highest number of decimals a rounding policy may request.
pub const MAX_DECIMALS: u32 = 15;

/// Statistic used to learn the fill value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImputationStrategy {
    /// Arithmetic mean of the non-missing values
    Mean,
    /// Median of the non-missing values
    #[default]
    Median,
}

impl ImputationStrategy {
    /// Lowercase name used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
        }
    }
}

impl fmt::Display for ImputationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How learned fill values are rounded.
///
/// `display_decimals` only affects reports and log lines. `fill_value_decimals`,
/// when set, rounds the learned value itself and therefore changes what
/// `transform` writes into missing slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingPolicy {
    /// Decimals applied to the learned fill value. `None` keeps it unrounded.
    pub fill_value_decimals: Option<u32>,
    /// Decimals used when a fill value is displayed.
    pub display_decimals: u32,
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        Self {
            fill_value_decimals: None,
            display_decimals: 1,
        }
    }
}

impl RoundingPolicy {
    /// Apply the fill-value part of the policy to a learned statistic.
    pub fn apply(&self, value: f64) -> f64 {
        match self.fill_value_decimals {
            Some(decimals) => round_to(value, decimals),
            None => value,
        }
    }

    /// Round a value for display.
    pub fn display(&self, value: f64) -> f64 {
        round_to(value, self.display_decimals)
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        // Too large to carry any fractional digits at this precision.
        return value;
    }
    scaled.round() / factor
}

/// Configuration for an imputation run.
///
/// Use [`ImputationConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_impute::config::{ImputationConfig, ImputationStrategy};
///
/// let config = ImputationConfig::builder()
///     .strategy(ImputationStrategy::Mean)
///     .variables(["Age", "Fare"])
///     .test_size(0.3)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImputationConfig {
    /// Statistic learned from the training partition.
    /// Default: Median
    pub strategy: ImputationStrategy,

    /// Variables to impute. Empty means every column with missing values
    /// in the training partition.
    /// Default: empty
    pub variables: Vec<String>,

    /// Fraction of rows held out as the test partition (exclusive 0.0 - 1.0).
    /// Default: 0.3
    pub test_size: f64,

    /// Seed for the train/test shuffle.
    /// Default: 0
    pub seed: u64,

    /// Rounding applied to fill values.
    /// Default: unrounded fill values, 1 decimal for display
    pub rounding: RoundingPolicy,

    /// Multiplier of the IQR used for outlier fences.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Output directory for imputed partitions and reports.
    /// Default: "output"
    pub output_dir: PathBuf,

    /// Whether to write imputed partitions to disk.
    /// Default: true
    pub save_to_disk: bool,
}

impl Default for ImputationConfig {
    fn default() -> Self {
        Self {
            strategy: ImputationStrategy::default(),
            variables: Vec::new(),
            test_size: 0.3,
            seed: 0,
            rounding: RoundingPolicy::default(),
            iqr_multiplier: 1.5,
            output_dir: PathBuf::from("output"),
            save_to_disk: true,
        }
    }
}

impl ImputationConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ImputationConfigBuilder {
        ImputationConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(ConfigValidationError::InvalidTestSize(self.test_size));
        }

        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier > 0.0) {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        if let Some(decimals) = self.rounding.fill_value_decimals
            && decimals > MAX_DECIMALS
        {
            return Err(ConfigValidationError::InvalidDecimals {
                field: "fill_value_decimals".to_string(),
                value: decimals,
            });
        }

        if self.rounding.display_decimals > MAX_DECIMALS {
            return Err(ConfigValidationError::InvalidDecimals {
                field: "display_decimals".to_string(),
                value: self.rounding.display_decimals,
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid test size: {0} (must be strictly between 0.0 and 1.0)")]
    InvalidTestSize(f64),

    #[error("Invalid IQR multiplier: {0} (must be a positive number)")]
    InvalidIqrMultiplier(f64),

    #[error("Invalid decimals for '{field}': {value} (must be at most 15)")]
    InvalidDecimals { field: String, value: u32 },
}

/// Builder for [`ImputationConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ImputationConfigBuilder {
    strategy: Option<ImputationStrategy>,
    variables: Option<Vec<String>>,
    test_size: Option<f64>,
    seed: Option<u64>,
    fill_value_decimals: Option<u32>,
    display_decimals: Option<u32>,
    iqr_multiplier: Option<f64>,
    output_dir: Option<PathBuf>,
    save_to_disk: Option<bool>,
}

impl ImputationConfigBuilder {
    /// Set the statistic learned from the training partition.
    pub fn strategy(mut self, strategy: ImputationStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Set the variables to impute.
    pub fn variables<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables = Some(variables.into_iter().map(Into::into).collect());
        self
    }

    /// Set the fraction of rows held out for testing.
    ///
    /// # Arguments
    /// * `test_size` - Value strictly between 0.0 and 1.0 (e.g., 0.3 = 30%)
    pub fn test_size(mut self, test_size: f64) -> Self {
        self.test_size = Some(test_size);
        self
    }

    /// Set the seed for the train/test shuffle.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Round the learned fill value itself to `decimals` places.
    pub fn fill_value_decimals(mut self, decimals: u32) -> Self {
        self.fill_value_decimals = Some(decimals);
        self
    }

    /// Set the decimals used when displaying fill values.
    pub fn display_decimals(mut self, decimals: u32) -> Self {
        self.display_decimals = Some(decimals);
        self
    }

    /// Set the IQR multiplier for outlier fences.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the output directory.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Enable or disable writing imputed partitions to disk.
    pub fn save_to_disk(mut self, save: bool) -> Self {
        self.save_to_disk = Some(save);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ImputationConfig` or an error if validation fails.
    pub fn build(self) -> Result<ImputationConfig, ConfigValidationError> {
        let defaults = RoundingPolicy::default();
        let config = ImputationConfig {
            strategy: self.strategy.unwrap_or_default(),
            variables: self.variables.unwrap_or_default(),
            test_size: self.test_size.unwrap_or(0.3),
            seed: self.seed.unwrap_or(0),
            rounding: RoundingPolicy {
                fill_value_decimals: self.fill_value_decimals,
                display_decimals: self.display_decimals.unwrap_or(defaults.display_decimals),
            },
            iqr_multiplier: self.iqr_multiplier.unwrap_or(1.5),
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from("output")),
            save_to_disk: self.save_to_disk.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}

//! Mean/Median Imputation Library
//!
//! Fills missing numeric values with a single statistic learned from the
//! training partition of a dataset, built with Rust and Polars.
//!
//! # Overview
//!
//! - **Fit / Transform**: learn the mean or median of the non-missing training
//!   values, then write that value into every gap of any partition
//! - **No Leakage**: the test partition never contributes to a learned value
//! - **Diagnostics**: missing fraction, sample variance, covariance, quantiles
//!   and IQR outlier counts before and after imputation
//! - **Reporting**: a serializable report plus a human-readable summary
//! - **Progress Reporting**: per-stage callbacks while the pipeline runs
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_impute::{ImputationConfig, ImputationPipeline, ImputationStrategy, Table};
//! use lex_impute::io::load_csv;
//!
//! let df = load_csv("data/titanic.csv")?;
//! let table = Table::from_dataframe(&df, None)?;
//!
//! let config = ImputationConfig::builder()
//!     .strategy(ImputationStrategy::Median)
//!     .variables(["Age", "Fare"])
//!     .test_size(0.3)
//!     .seed(0)
//!     .build()?;
//!
//! let result = ImputationPipeline::new(config).run(&table)?;
//! println!("Age filled with {:?}", result.imputer.fill_value("Age"));
//! ```
//!
//! # Single Columns
//!
//! The pure functions work on optional floats directly:
//!
//! ```rust,ignore
//! use lex_impute::{ImputationStrategy, fit, transform};
//!
//! let train = [Some(1.0), None, Some(3.0)];
//! let fill = fit(&train, ImputationStrategy::Mean)?;   // 2.0
//! let filled = transform(&[None, Some(5.0)], fill);    // [2.0, 5.0]
//! ```

pub mod config;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod split;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    ConfigValidationError, ImputationConfig, ImputationConfigBuilder, ImputationStrategy,
    RoundingPolicy,
};
pub use error::{ImputationError, Result as ImputationResult, ResultExt};
pub use imputers::{FittedImputer, StatisticalImputer, TableImputer, fit, transform};
pub use pipeline::{
    ClosureProgressReporter, ImputationPipeline, ImputationStage, PipelineBuilder,
    PipelineResult, ProgressReporter, ProgressUpdate,
};
pub use profiler::{ColumnProfile, ColumnProfiler, CovarianceMatrix, covariance_matrix};
pub use reporting::{ImputationReport, ReportGenerator, VariableReport};
pub use split::{SplitIndices, split_indices, train_test_split};
pub use types::{Column, Table};

//! Pipeline module.
//!
//! This module provides the imputation pipeline and its progress reporting.

mod builder;
pub mod progress;

pub use builder::{ImputationPipeline, PipelineBuilder, PipelineResult};
pub use progress::{ClosureProgressReporter, ImputationStage, ProgressReporter, ProgressUpdate};

//! Progress reporting for the imputation pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_impute::ImputationPipeline;
//!
//! let result = ImputationPipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:?}] {}", update.stage, update.message);
//!     })
//!     .build()?
//!     .run(&table)?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the imputation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationStage {
    /// Partitioning rows into train and test
    Splitting,
    /// Learning fill values from the training partition
    Fitting,
    /// Filling both partitions
    Transforming,
    /// Profiling the result
    Reporting,
    /// Pipeline completed successfully
    Complete,
}

impl ImputationStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Splitting => "Splitting Rows",
            Self::Fitting => "Fitting Imputers",
            Self::Transforming => "Imputing Values",
            Self::Reporting => "Generating Report",
            Self::Complete => "Complete",
        }
    }

    /// Cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Splitting => 0.0,
            Self::Fitting => 0.10,
            Self::Transforming => 0.40,
            Self::Reporting => 0.60,
            Self::Complete => 1.0,
        }
    }

    fn weight(&self) -> f32 {
        match self {
            Self::Splitting => 0.10,
            Self::Fitting => 0.30,
            Self::Transforming => 0.20,
            Self::Reporting => 0.40,
            Self::Complete => 0.0,
        }
    }
}

/// A single progress notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: ImputationStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Human-readable message describing current activity
    pub message: String,
}

impl ProgressUpdate {
    /// Creates an update for `stage`, `stage_progress` of the way through it.
    pub fn new(stage: ImputationStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + stage.weight() * stage_progress.clamp(0.0, 1.0);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: ImputationStage::Complete,
            progress: 1.0,
            message: message.into(),
        }
    }
}

/// Receives progress updates while the pipeline runs.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

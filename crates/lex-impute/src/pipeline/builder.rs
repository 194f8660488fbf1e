//! Imputation pipeline: split, fit on train, fill both partitions, report.

use crate::config::{ConfigValidationError, ImputationConfig};
use crate::error::{ImputationError, Result};
use crate::imputers::TableImputer;
use crate::pipeline::progress::{
    ClosureProgressReporter, ImputationStage, ProgressReporter, ProgressUpdate,
};
use crate::reporting::{ImputationReport, ReportGenerator, ReportParams};
use crate::split::{SplitIndices, split_indices};
use crate::types::Table;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Everything produced by one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Row indices of each partition in the input table
    pub split: SplitIndices,
    /// Fill values learned from the training partition
    pub imputer: TableImputer,
    pub train: Table,
    pub test: Table,
    pub train_imputed: Table,
    pub test_imputed: Table,
    pub report: ImputationReport,
}

/// The imputation pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use lex_impute::{ImputationConfig, ImputationPipeline, ImputationStrategy};
///
/// let config = ImputationConfig::builder()
///     .strategy(ImputationStrategy::Mean)
///     .variables(["LotFrontage", "MasVnrArea"])
///     .build()?;
///
/// let result = ImputationPipeline::new(config).run(&table)?;
/// println!("{:?}", result.imputer.fill_value("LotFrontage"));
/// ```
pub struct ImputationPipeline {
    config: ImputationConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl ImputationPipeline {
    /// Create a pipeline without progress reporting.
    ///
    /// The configuration is validated when the pipeline runs.
    pub fn new(config: ImputationConfig) -> Self {
        Self {
            config,
            progress_reporter: None,
        }
    }

    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &ImputationConfig {
        &self.config
    }

    /// Run the pipeline on a table.
    pub fn run(&self, table: &Table) -> Result<PipelineResult> {
        self.run_with_source(table, None)
    }

    /// Run the pipeline, recording `input_file` in the report.
    pub fn run_with_source(
        &self,
        table: &Table,
        input_file: Option<&str>,
    ) -> Result<PipelineResult> {
        match self.run_internal(table, input_file) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Imputation completed"));
                Ok(result)
            }
            Err(e) => {
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    fn run_internal(&self, table: &Table, input_file: Option<&str>) -> Result<PipelineResult> {
        self.config
            .validate()
            .map_err(|e| ImputationError::InvalidConfig(e.to_string()))?;

        // Split
        self.report_progress(ProgressUpdate::new(
            ImputationStage::Splitting,
            0.0,
            format!("Splitting {} rows", table.height()),
        ));
        let split = split_indices(table.height(), self.config.test_size, self.config.seed)?;
        let train = table.take(&split.train);
        let test = table.take(&split.test);
        info!(
            "Split {} rows into {} train / {} test",
            table.height(),
            train.height(),
            test.height()
        );

        // Fit on the training partition only
        let variables = self.resolve_variables(&train);
        self.report_progress(ProgressUpdate::new(
            ImputationStage::Fitting,
            0.0,
            format!("Fitting {} variable(s)", variables.len()),
        ));
        if variables.is_empty() {
            info!("No missing values in the training partition, nothing to impute");
        }
        let imputer = TableImputer::fit(
            &train,
            &variables,
            self.config.strategy,
            &self.config.rounding,
        )?;

        // Fill both partitions with the learned values
        self.report_progress(ProgressUpdate::new(
            ImputationStage::Transforming,
            0.0,
            "Imputing train and test partitions",
        ));
        let train_imputed = imputer.transform(&train)?;
        let test_imputed = imputer.transform(&test)?;
        for name in test_imputed.columns_with_missing() {
            warn!(
                "'{}' still has missing values in the test partition (not imputed)",
                name
            );
        }

        self.report_progress(ProgressUpdate::new(
            ImputationStage::Reporting,
            0.0,
            "Profiling imputed variables",
        ));
        let report = ReportGenerator::build_report(ReportParams {
            input_file,
            config: &self.config,
            imputer: &imputer,
            train: &train,
            test: &test,
            train_imputed: &train_imputed,
        })?;

        Ok(PipelineResult {
            split,
            imputer,
            train,
            test,
            train_imputed,
            test_imputed,
            report,
        })
    }

    /// Configured variables, or every training column with missing values.
    fn resolve_variables(&self, train: &Table) -> Vec<String> {
        if self.config.variables.is_empty() {
            train.columns_with_missing()
        } else {
            self.config.variables.clone()
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }
}

/// Builder for [`ImputationPipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<ImputationConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: ImputationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// ```rust,ignore
    /// let pipeline = ImputationPipeline::builder()
    ///     .on_progress(|update| {
    ///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
    ///     })
    ///     .build()?;
    /// ```
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<ImputationPipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(ImputationPipeline {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}

use crate::config::{ImputationConfig, ImputationStrategy, RoundingPolicy};
use crate::error::Result;
use crate::imputers::TableImputer;
use crate::profiler::{
    ColumnProfile, ColumnProfiler, CovarianceMatrix, covariance_matrix, missing_fraction,
};
use crate::types::Table;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

// ============================================================================
// Report Types
// ============================================================================

/// Report of one imputation run.
///
/// Used for JSON output to stdout (`--json`), for the report file
/// (`--emit-report`) and for programmatic access in library mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImputationReport {
    // Metadata
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file, when the table came from disk
    pub input_file: Option<String>,

    // Run parameters
    pub strategy: ImputationStrategy,
    pub seed: u64,
    pub test_size: f64,
    /// Decimals used when printing values in the summary
    pub display_decimals: u32,

    // Partition sizes
    pub train_rows: usize,
    pub test_rows: usize,

    /// One entry per imputed variable, in fit order
    pub variables: Vec<VariableReport>,

    /// Covariance matrix of the training partition before imputation
    pub covariance_before: CovarianceMatrix,
    /// Covariance matrix of the training partition after imputation
    pub covariance_after: CovarianceMatrix,
}

/// Effect of imputation on a single variable of the training partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableReport {
    pub variable: String,
    /// Value learned from the training partition and written into gaps
    pub fill_value: f64,
    /// `fill_value` rounded for display
    pub display_fill_value: f64,
    pub train_missing_fraction: f64,
    pub test_missing_fraction: f64,
    /// Profile of the training values before imputation
    pub original: ColumnProfile,
    /// Profile of the training values after imputation
    pub imputed: ColumnProfile,
    /// `imputed variance / original variance`; below 1 means the spread shrank
    pub variance_ratio: Option<f64>,
    /// Covariance with every other column, before and after
    pub covariance_changes: Vec<CovarianceChange>,
}

/// Covariance between an imputed variable and another column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CovarianceChange {
    pub other: String,
    pub before: Option<f64>,
    pub after: Option<f64>,
}

impl VariableReport {
    /// Outliers gained (positive) or lost (negative) through imputation.
    ///
    /// Filling with a central value concentrates the distribution, which
    /// narrows the IQR fences and can expose extra outliers.
    pub fn outlier_delta(&self) -> i64 {
        self.imputed.outlier_count as i64 - self.original.outlier_count as i64
    }
}

// ============================================================================
// Report Generator
// ============================================================================

/// Builds imputation reports and writes them to disk.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

/// Inputs needed to build an [`ImputationReport`].
pub struct ReportParams<'a> {
    pub input_file: Option<&'a str>,
    pub config: &'a ImputationConfig,
    pub imputer: &'a TableImputer,
    pub train: &'a Table,
    pub test: &'a Table,
    pub train_imputed: &'a Table,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    /// Profile every imputed variable and compare the training partition
    /// before and after imputation.
    pub fn build_report(params: ReportParams<'_>) -> Result<ImputationReport> {
        let config = params.config;
        let covariance_before = covariance_matrix(params.train)?;
        let covariance_after = covariance_matrix(params.train_imputed)?;

        let mut variables = Vec::with_capacity(params.imputer.imputers().len());
        for imputer in params.imputer.imputers() {
            let name = imputer.variable();
            let original =
                ColumnProfiler::profile(params.train.column(name)?, config.iqr_multiplier);
            let imputed =
                ColumnProfiler::profile(params.train_imputed.column(name)?, config.iqr_multiplier);

            let variance_ratio = match (original.variance, imputed.variance) {
                (Some(before), Some(after)) if before > 0.0 => Some(after / before),
                _ => None,
            };

            let covariance_changes = params
                .train
                .column_names()
                .into_iter()
                .filter(|other| *other != name)
                .map(|other| CovarianceChange {
                    other: other.to_string(),
                    before: covariance_before.get(name, other),
                    after: covariance_after.get(name, other),
                })
                .collect();

            debug!(
                "'{}': variance ratio {:?}, outliers {} -> {}",
                name, variance_ratio, original.outlier_count, imputed.outlier_count
            );

            variables.push(VariableReport {
                variable: name.to_string(),
                fill_value: imputer.fill_value(),
                display_fill_value: config.rounding.display(imputer.fill_value()),
                train_missing_fraction: original.missing_fraction,
                test_missing_fraction: missing_fraction(params.test.column(name)?.values()),
                original,
                imputed,
                variance_ratio,
                covariance_changes,
            });
        }

        Ok(ImputationReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: params.input_file.map(String::from),
            strategy: config.strategy,
            seed: config.seed,
            test_size: config.test_size,
            display_decimals: config.rounding.display_decimals,
            train_rows: params.train.height(),
            test_rows: params.test.height(),
            variables,
            covariance_before,
            covariance_after,
        })
    }

    /// Write a report to `<base_name>_report.json` in the output directory.
    pub fn write_report_to_file(
        &self,
        report: &ImputationReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }

    /// Render the human-readable summary printed by the CLI.
    pub fn render_summary(report: &ImputationReport) -> String {
        report.to_string()
    }
}

impl fmt::Display for ImputationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounding = RoundingPolicy {
            fill_value_decimals: None,
            display_decimals: self.display_decimals,
        };
        let decimals = self.display_decimals as usize;
        let show = |value: Option<f64>| match value {
            Some(v) => format!("{:.*}", decimals, rounding.display(v)),
            None => "n/a".to_string(),
        };

        let rule = "=".repeat(80);
        writeln!(f, "{}", rule)?;
        writeln!(f, "IMPUTATION SUMMARY")?;
        writeln!(f, "{}", rule)?;
        if let Some(input) = &self.input_file {
            writeln!(f, "Input:     {}", input)?;
        }
        writeln!(
            f,
            "Strategy:  {} (seed {}, test size {})",
            self.strategy, self.seed, self.test_size
        )?;
        writeln!(
            f,
            "Rows:      {} train / {} test",
            self.train_rows, self.test_rows
        )?;

        if self.variables.is_empty() {
            writeln!(f, "\nNo variables needed imputation.")?;
        }

        for var in &self.variables {
            writeln!(f, "\n{}", var.variable)?;
            writeln!(f, "{}", "-".repeat(var.variable.len().max(3)))?;
            writeln!(
                f,
                "  fill value:        {}",
                show(Some(var.display_fill_value))
            )?;
            writeln!(
                f,
                "  missing:           {:.1}% train / {:.1}% test",
                var.train_missing_fraction * 100.0,
                var.test_missing_fraction * 100.0
            )?;
            writeln!(
                f,
                "  variance:          {} -> {}",
                show(var.original.variance),
                show(var.imputed.variance)
            )?;
            writeln!(
                f,
                "  outliers:          {} -> {}",
                var.original.outlier_count, var.imputed.outlier_count
            )?;
            for change in &var.covariance_changes {
                writeln!(
                    f,
                    "  cov({}):{}{} -> {}",
                    change.other,
                    " ".repeat(14usize.saturating_sub(change.other.len())),
                    show(change.before),
                    show(change.after)
                )?;
            }
        }
        writeln!(f, "{}", rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn tables() -> (Table, Table) {
        let train = Table::new(vec![
            Column::new(
                "Age",
                vec![Some(22.0), None, Some(26.0), Some(35.0), None, Some(54.0)],
            ),
            Column::from_present("Fare", vec![7.25, 71.28, 7.93, 53.1, 8.05, 51.86]),
        ])
        .unwrap();
        let test = Table::new(vec![
            Column::new("Age", vec![None, Some(2.0)]),
            Column::from_present("Fare", vec![21.08, 11.13]),
        ])
        .unwrap();
        (train, test)
    }

    fn report() -> ImputationReport {
        let (train, test) = tables();
        let config = ImputationConfig::default();
        let imputer = TableImputer::fit(
            &train,
            &["Age".to_string()],
            config.strategy,
            &config.rounding,
        )
        .unwrap();
        let train_imputed = imputer.transform(&train).unwrap();

        ReportGenerator::build_report(ReportParams {
            input_file: Some("titanic.csv"),
            config: &config,
            imputer: &imputer,
            train: &train,
            test: &test,
            train_imputed: &train_imputed,
        })
        .unwrap()
    }

    // =========================================================================
    // build_report
    // =========================================================================

    #[test]
    fn test_build_report_per_variable() {
        let report = report();
        assert_eq!(report.train_rows, 6);
        assert_eq!(report.test_rows, 2);
        assert_eq!(report.variables.len(), 1);

        let age = &report.variables[0];
        assert_eq!(age.variable, "Age");
        assert_eq!(age.fill_value, 30.5);
        assert!((age.train_missing_fraction - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(age.test_missing_fraction, 0.5);
        assert_eq!(age.imputed.missing_count, 0);
    }

    #[test]
    fn test_build_report_variance_shrinks() {
        let report = report();
        let ratio = report.variables[0].variance_ratio.unwrap();
        assert!(ratio < 1.0);
    }

    #[test]
    fn test_build_report_covariance_changes() {
        let report = report();
        let changes = &report.variables[0].covariance_changes;
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].other, "Fare");
        assert!(changes[0].before.is_some());
        assert!(changes[0].after.is_some());
        assert_eq!(
            changes[0].after,
            report.covariance_after.get("Age", "Fare")
        );
    }

    // =========================================================================
    // Output
    // =========================================================================

    #[test]
    fn test_render_summary_mentions_variables() {
        let summary = ReportGenerator::render_summary(&report());
        assert!(summary.contains("IMPUTATION SUMMARY"));
        assert!(summary.contains("Age"));
        assert!(summary.contains("fill value:        30.5"));
        assert!(summary.contains("median"));
    }

    #[test]
    fn test_summary_matches_display() {
        let report = report();
        let summary = ReportGenerator::render_summary(&report);
        assert_eq!(summary, format!("{}", report));
        assert!(summary.starts_with(&"=".repeat(80)));
        assert!(summary.ends_with(&format!("{}\n", "=".repeat(80))));
    }

    #[test]
    fn test_report_serializes_strategy_lowercase() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["strategy"], "median");
        assert_eq!(json["variables"][0]["variable"], "Age");
    }

    #[test]
    fn test_write_report_to_file() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("lex_impute_report_{}", nanos));
        let generator = ReportGenerator::new(&dir);

        let path = generator.write_report_to_file(&report(), "titanic").unwrap();
        assert_eq!(path, dir.join("titanic_report.json"));

        let written: ImputationReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.variables[0].fill_value, 30.5);

        fs::remove_dir_all(&dir).unwrap();
    }
}

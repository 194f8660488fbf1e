//! Report generation module.
//!
//! [`ImputationReport`] records what an imputation run learned and how it
//! changed the training distribution. It is used for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_impute::reporting::ReportGenerator;
//!
//! let result = pipeline.run(&table)?;
//! println!("{}", ReportGenerator::render_summary(&result.report));
//!
//! let generator = ReportGenerator::new("output");
//! generator.write_report_to_file(&result.report, "titanic")?;
//! ```

mod generator;

pub use generator::{
    CovarianceChange, ImputationReport, ReportGenerator, ReportParams, VariableReport,
};

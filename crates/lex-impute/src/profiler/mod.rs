//! Column profiling for comparing a variable before and after imputation.
//!
//! This module provides:
//! - Summary statistics that ignore missing values (mean, median, variance)
//! - Pairwise covariance and covariance matrices over a table
//! - Quantiles and IQR outlier fences

mod outliers;
mod statistics;

use crate::error::Result;
use crate::types::{Column, Table};
use serde::{Deserialize, Serialize};

pub use outliers::{IqrBounds, count_outliers, iqr_bounds, quantile, quantile_sorted};
pub use statistics::{covariance, mean, median, missing_fraction, std_dev, variance};

/// Five-number summary of the present values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Distribution profile of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub row_count: usize,
    pub missing_count: usize,
    pub missing_fraction: f64,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub variance: Option<f64>,
    pub std_dev: Option<f64>,
    pub summary: Option<FiveNumberSummary>,
    pub iqr_bounds: Option<IqrBounds>,
    pub outlier_count: usize,
}

/// Column profiler.
pub struct ColumnProfiler;

impl ColumnProfiler {
    /// Profile a column, using `iqr_multiplier` for the outlier fences.
    pub fn profile(column: &Column, iqr_multiplier: f64) -> ColumnProfile {
        let values = column.values();
        let sorted = statistics::sorted_present(values);

        let summary = match (sorted.first(), sorted.last()) {
            (Some(&min), Some(&max)) => Some(FiveNumberSummary {
                min,
                q1: quantile_sorted(&sorted, 0.25).unwrap_or(min),
                median: quantile_sorted(&sorted, 0.5).unwrap_or(min),
                q3: quantile_sorted(&sorted, 0.75).unwrap_or(max),
                max,
            }),
            _ => None,
        };

        let bounds = iqr_bounds(values, iqr_multiplier);
        let outlier_count = bounds
            .as_ref()
            .map(|b| count_outliers(values, b))
            .unwrap_or(0);

        ColumnProfile {
            name: column.name().to_string(),
            row_count: column.len(),
            missing_count: column.missing_count(),
            missing_fraction: missing_fraction(values),
            mean: mean(values),
            median: median(values),
            variance: variance(values),
            std_dev: std_dev(values),
            summary,
            iqr_bounds: bounds,
            outlier_count,
        }
    }
}

/// Pairwise sample covariances of every column pair in a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CovarianceMatrix {
    pub columns: Vec<String>,
    /// Row-major, `values[i][j]` is the covariance of `columns[i]` and `columns[j]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CovarianceMatrix {
    /// Covariance of two named columns, if both are in the matrix.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Compute the covariance matrix of a table (pairwise complete rows).
pub fn covariance_matrix(table: &Table) -> Result<CovarianceMatrix> {
    let columns = table.columns();
    let mut values = vec![vec![None; columns.len()]; columns.len()];

    for (i, a) in columns.iter().enumerate() {
        for (j, b) in columns.iter().enumerate().skip(i) {
            let cov = covariance(a.values(), b.values())?;
            values[i][j] = cov;
            values[j][i] = cov;
        }
    }

    Ok(CovarianceMatrix {
        columns: table.column_names().into_iter().map(String::from).collect(),
        values,
    })
}

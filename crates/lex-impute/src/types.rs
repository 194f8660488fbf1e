//! Core data model: named numeric columns and the tables that hold them.

use crate::error::{ImputationError, Result};
use serde::{Deserialize, Serialize};

/// An ordered sequence of numeric values, each either present or missing.
///
/// `None` is the missing marker. Non-finite values (`NaN` and both
/// infinities) are normalised to `None` on construction, so a present value
/// is always a finite number and counts toward every statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    values: Vec<Option<f64>>,
}

impl Column {
    /// Create a column from optional values.
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        Self {
            name: name.into(),
            values,
        }
    }

    /// Create a fully populated column.
    pub fn from_present(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, values.into_iter().map(Some).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of missing entries.
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Present values in row order.
    pub fn present(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().flatten().copied()
    }

    /// Values as plain floats if nothing is missing.
    pub fn to_dense(&self) -> Option<Vec<f64>> {
        self.values.iter().copied().collect()
    }

    /// Pick rows by index, in the order given.
    pub(crate) fn take(&self, indices: &[usize]) -> Self {
        Self {
            name: self.name.clone(),
            values: indices.iter().map(|&i| self.values[i]).collect(),
        }
    }
}

/// A set of named columns sharing the same row count and row order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, rejecting ragged columns and duplicate names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(ragged) = columns.iter().find(|c| c.len() != expected) {
                return Err(ImputationError::LengthMismatch {
                    expected,
                    found: ragged.len(),
                });
            }
        }

        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name() == column.name()) {
                return Err(ImputationError::InvalidConfig(format!(
                    "duplicate column name '{}'",
                    column.name()
                )));
            }
        }

        Ok(Self { columns })
    }

    /// Number of rows (0 for a table without columns).
    pub fn height(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| ImputationError::ColumnNotFound(name.to_string()))
    }

    /// Replace a column of the same name and length.
    pub fn replace(&mut self, column: Column) -> Result<()> {
        let height = self.height();
        if column.len() != height {
            return Err(ImputationError::LengthMismatch {
                expected: height,
                found: column.len(),
            });
        }
        let slot = self
            .columns
            .iter_mut()
            .find(|c| c.name() == column.name())
            .ok_or_else(|| ImputationError::ColumnNotFound(column.name().to_string()))?;
        *slot = column;
        Ok(())
    }

    /// Names of columns with at least one missing value.
    pub fn columns_with_missing(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.missing_count() > 0)
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Pick rows by index, in the order given.
    pub(crate) fn take(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
        }
    }
}

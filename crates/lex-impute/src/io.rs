//! Polars interop: CSV loading/writing and DataFrame conversions.

use crate::error::{ImputationError, Result, ResultExt};
use crate::imputers::TableImputer;
use crate::split::SplitIndices;
use crate::types::{Column as NumericColumn, Table};
use crate::utils::{fill_numeric_nulls, is_numeric_dtype, series_to_values};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Text markers read as missing values (the Ames house-price data uses "NA").
pub const NULL_MARKERS: [&str; 2] = ["NA", ""];

/// Load a CSV file with a header row.
///
/// Tries a quote-aware parse first and falls back to a plain parse.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ImputationError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file not found: {}", path.display()),
        )));
    }

    let null_values = || {
        Some(NullValues::AllColumns(
            NULL_MARKERS.iter().map(|m| PlSmallStr::from(*m)).collect(),
        ))
    };

    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_null_values(null_values()),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => {
            info!("Loaded {:?} from {}", df.shape(), path.display());
            return Ok(df);
        }
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    let df = CsvReadOptions::default()
        .with_infer_schema_length(None)
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_null_values(null_values()))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .context(format!("Reading {}", path.display()))?;
    info!("Loaded {:?} from {}", df.shape(), path.display());
    Ok(df)
}

/// Write a DataFrame as CSV with a header row.
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .context(format!("Writing {}", path.display()))?;
    debug!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

/// Take the rows of a DataFrame belonging to each partition.
pub fn split_dataframe(df: &DataFrame, split: &SplitIndices) -> Result<(DataFrame, DataFrame)> {
    let take = |indices: &[usize]| -> Result<DataFrame> {
        let idx: Vec<IdxSize> = indices.iter().map(|&i| i as IdxSize).collect();
        Ok(df.take(&IdxCa::from_vec("idx".into(), idx))?)
    };
    Ok((take(&split.train)?, take(&split.test)?))
}

impl Table {
    /// Build a table from the numeric columns of a DataFrame.
    ///
    /// With `columns = None` every numeric column is taken and the rest are
    /// skipped. Explicitly requested columns must exist and be numeric.
    pub fn from_dataframe(df: &DataFrame, columns: Option<&[String]>) -> Result<Self> {
        let names: Vec<String> = match columns {
            Some(names) => names.to_vec(),
            None => df
                .get_columns()
                .iter()
                .filter(|c| is_numeric_dtype(c.dtype()))
                .map(|c| c.name().to_string())
                .collect(),
        };

        let mut out = Vec::with_capacity(names.len());
        for name in &names {
            let column = df
                .column(name)
                .map_err(|_| ImputationError::ColumnNotFound(name.clone()))?;
            if !is_numeric_dtype(column.dtype()) {
                return Err(ImputationError::SchemaMismatch {
                    column: name.clone(),
                    reason: format!("expected a numeric column, found {}", column.dtype()),
                });
            }
            let values = series_to_values(column.as_materialized_series())?;
            out.push(NumericColumn::new(name.clone(), values));
        }

        Table::new(out)
    }

    /// Convert to a DataFrame of nullable Float64 columns.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns: Vec<Column> = self
            .columns()
            .iter()
            .map(|c| Series::new(c.name().into(), c.values().to_vec()).into_column())
            .collect();
        Ok(DataFrame::new(columns)?)
    }
}

impl TableImputer {
    /// Fill the fitted variables of a DataFrame, keeping every other column.
    pub fn transform_dataframe(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut out = df.clone();
        for imputer in self.imputers() {
            let name = imputer.variable();
            let column = df
                .column(name)
                .map_err(|_| ImputationError::ColumnNotFound(name.to_string()))?;
            if !is_numeric_dtype(column.dtype()) {
                return Err(ImputationError::SchemaMismatch {
                    column: name.to_string(),
                    reason: format!("cannot fill {} column with a number", column.dtype()),
                });
            }
            let filled = fill_numeric_nulls(column.as_materialized_series(), imputer.fill_value())?;
            out.replace(name, filled)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ImputationStrategy, RoundingPolicy};

    fn titanic_frame() -> DataFrame {
        df![
            "Name" => ["Braund", "Cumings", "Heikkinen", "Futrelle"],
            "Age" => [Some(22.0), None, Some(26.0), Some(35.0)],
            "Fare" => [7.25, 71.2833, 7.925, 53.1],
            "Pclass" => [3i64, 1, 3, 1],
        ]
        .unwrap()
    }

    #[test]
    fn test_from_dataframe_takes_numeric_columns() {
        let table = Table::from_dataframe(&titanic_frame(), None).unwrap();
        assert_eq!(table.column_names(), vec!["Age", "Fare", "Pclass"]);
        assert_eq!(
            table.column("Age").unwrap().values(),
            &[Some(22.0), None, Some(26.0), Some(35.0)]
        );
    }

    #[test]
    fn test_from_dataframe_selected_columns() {
        let names = vec!["Fare".to_string()];
        let table = Table::from_dataframe(&titanic_frame(), Some(names.as_slice())).unwrap();
        assert_eq!(table.column_names(), vec!["Fare"]);
    }

    #[test]
    fn test_from_dataframe_rejects_text_column() {
        let names = vec!["Name".to_string()];
        let err = Table::from_dataframe(&titanic_frame(), Some(names.as_slice())).unwrap_err();
        assert_eq!(err.error_code(), "SCHEMA_MISMATCH");
    }

    #[test]
    fn test_from_dataframe_unknown_column() {
        let names = vec!["Cabin".to_string()];
        let err = Table::from_dataframe(&titanic_frame(), Some(names.as_slice())).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_to_dataframe_keeps_nulls() {
        let table = Table::from_dataframe(&titanic_frame(), None).unwrap();
        let df = table.to_dataframe().unwrap();
        assert_eq!(df.shape(), (4, 3));
        assert_eq!(df.column("Age").unwrap().null_count(), 1);
        assert_eq!(df.column("Pclass").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_transform_dataframe_keeps_other_columns() {
        let df = titanic_frame();
        let table = Table::from_dataframe(&df, None).unwrap();
        let imputer = TableImputer::fit(
            &table,
            &["Age".to_string()],
            ImputationStrategy::Median,
            &RoundingPolicy::default(),
        )
        .unwrap();

        let out = imputer.transform_dataframe(&df).unwrap();
        assert_eq!(out.shape(), df.shape());
        assert_eq!(out.column("Age").unwrap().null_count(), 0);
        assert_eq!(
            out.column("Age").unwrap().get(1).unwrap().try_extract::<f64>().unwrap(),
            26.0
        );
        assert!(
            out.column("Name")
                .unwrap()
                .as_materialized_series()
                .equals(df.column("Name").unwrap().as_materialized_series())
        );
    }

    #[test]
    fn test_split_dataframe_follows_indices() {
        let df = titanic_frame();
        let split = SplitIndices {
            train: vec![3, 0],
            test: vec![2, 1],
        };
        let (train, test) = split_dataframe(&df, &split).unwrap();
        assert_eq!(train.height(), 2);
        assert_eq!(test.height(), 2);
        assert_eq!(
            train.column("Fare").unwrap().get(0).unwrap().try_extract::<f64>().unwrap(),
            53.1
        );
    }
}

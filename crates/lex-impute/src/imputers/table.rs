//! Imputation of several variables of a table at once.

use super::statistical::{FittedImputer, StatisticalImputer};
use crate::config::{ImputationStrategy, RoundingPolicy};
use crate::error::Result;
use crate::types::Table;
use tracing::{debug, info};

/// One learned fill value per variable, fitted on a training table.
#[derive(Debug, Clone)]
pub struct TableImputer {
    imputers: Vec<FittedImputer>,
}

impl TableImputer {
    /// Fit every named variable on the training table.
    pub fn fit(
        train: &Table,
        variables: &[String],
        strategy: ImputationStrategy,
        rounding: &RoundingPolicy,
    ) -> Result<Self> {
        let mut imputers = Vec::with_capacity(variables.len());
        for variable in variables {
            let column = train.column(variable)?;
            imputers.push(StatisticalImputer::fit(column, strategy, rounding)?);
        }

        info!(
            "Fitted {} imputer on {} variable(s) from {} training rows",
            strategy,
            imputers.len(),
            train.height()
        );

        Ok(Self { imputers })
    }

    pub fn imputers(&self) -> &[FittedImputer] {
        &self.imputers
    }

    /// Names of the imputed variables, in fit order.
    pub fn variables(&self) -> Vec<&str> {
        self.imputers.iter().map(FittedImputer::variable).collect()
    }

    /// Learned fill value of a variable.
    pub fn fill_value(&self, variable: &str) -> Option<f64> {
        self.imputer(variable).map(FittedImputer::fill_value)
    }

    pub fn imputer(&self, variable: &str) -> Option<&FittedImputer> {
        self.imputers.iter().find(|i| i.variable() == variable)
    }

    /// Return a copy of `table` with the fitted variables filled.
    ///
    /// Columns that were not fitted are passed through untouched.
    pub fn transform(&self, table: &Table) -> Result<Table> {
        let mut out = table.clone();
        for imputer in &self.imputers {
            let column = table.column(imputer.variable())?;
            let filled = column.missing_count();
            out.replace(imputer.transform(column)?)?;
            debug!(
                "Filled {} missing value(s) in '{}'",
                filled,
                imputer.variable()
            );
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;

    fn train_table() -> Table {
        Table::new(vec![
            Column::new("LotFrontage", vec![Some(60.0), None, Some(80.0), Some(70.0)]),
            Column::new("MasVnrArea", vec![Some(0.0), Some(100.0), None, Some(300.0)]),
            Column::from_present("SalePrice", vec![200.0, 180.0, 250.0, 140.0]),
        ])
        .unwrap()
    }

    fn variables(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fit_learns_one_value_per_variable() {
        let imputer = TableImputer::fit(
            &train_table(),
            &variables(&["LotFrontage", "MasVnrArea"]),
            ImputationStrategy::Median,
            &RoundingPolicy::default(),
        )
        .unwrap();

        assert_eq!(imputer.variables(), vec!["LotFrontage", "MasVnrArea"]);
        assert_eq!(imputer.fill_value("LotFrontage"), Some(70.0));
        assert_eq!(imputer.fill_value("MasVnrArea"), Some(100.0));
        assert_eq!(imputer.fill_value("SalePrice"), None);
    }

    #[test]
    fn test_transform_leaves_other_columns_untouched() {
        let train = train_table();
        let imputer = TableImputer::fit(
            &train,
            &variables(&["LotFrontage"]),
            ImputationStrategy::Mean,
            &RoundingPolicy::default(),
        )
        .unwrap();

        let out = imputer.transform(&train).unwrap();
        assert_eq!(
            out.column("LotFrontage").unwrap().values(),
            &[Some(60.0), Some(70.0), Some(80.0), Some(70.0)]
        );
        assert_eq!(out.column("MasVnrArea").unwrap(), train.column("MasVnrArea").unwrap());
        assert_eq!(out.column("SalePrice").unwrap(), train.column("SalePrice").unwrap());
    }

    #[test]
    fn test_transform_test_partition_uses_train_values() {
        let imputer = TableImputer::fit(
            &train_table(),
            &variables(&["LotFrontage", "MasVnrArea"]),
            ImputationStrategy::Median,
            &RoundingPolicy::default(),
        )
        .unwrap();

        let test = Table::new(vec![
            Column::new("LotFrontage", vec![None, Some(500.0)]),
            Column::new("MasVnrArea", vec![None, None]),
            Column::from_present("SalePrice", vec![300.0, 120.0]),
        ])
        .unwrap();

        let out = imputer.transform(&test).unwrap();
        assert_eq!(
            out.column("LotFrontage").unwrap().values(),
            &[Some(70.0), Some(500.0)]
        );
        assert_eq!(
            out.column("MasVnrArea").unwrap().values(),
            &[Some(100.0), Some(100.0)]
        );
    }

    #[test]
    fn test_fit_unknown_variable() {
        let err = TableImputer::fit(
            &train_table(),
            &variables(&["GarageYrBlt"]),
            ImputationStrategy::Median,
            &RoundingPolicy::default(),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_transform_missing_variable() {
        let imputer = TableImputer::fit(
            &train_table(),
            &variables(&["LotFrontage"]),
            ImputationStrategy::Median,
            &RoundingPolicy::default(),
        )
        .unwrap();

        let other = Table::new(vec![Column::from_present("SalePrice", vec![1.0])]).unwrap();
        assert_eq!(
            imputer.transform(&other).unwrap_err().error_code(),
            "COLUMN_NOT_FOUND"
        );
    }
}

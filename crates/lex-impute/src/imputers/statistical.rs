//! Mean/median imputation with a fixed learned value.
//!
//! The fill value is learned once, from the training partition only, and
//! then applied unchanged to every partition of the same variable.

use crate::config::{ImputationStrategy, RoundingPolicy};
use crate::error::{ImputationError, Result, ResultExt};
use crate::profiler;
use crate::types::Column;
use tracing::debug;

/// Learn a fill value from the present values of a training column.
///
/// Fails with [`ImputationError::InsufficientData`] when every value is missing.
pub fn fit(values: &[Option<f64>], strategy: ImputationStrategy) -> Result<f64> {
    let statistic = match strategy {
        ImputationStrategy::Mean => profiler::mean(values),
        ImputationStrategy::Median => profiler::median(values),
    };
    statistic.ok_or(ImputationError::InsufficientData { strategy })
}

/// Replace every missing entry with `fill_value`; present values are kept as-is.
///
/// Non-finite entries count as missing, as they do in [`fit`].
pub fn transform(values: &[Option<f64>], fill_value: f64) -> Vec<f64> {
    values
        .iter()
        .map(|v| match v {
            Some(x) if x.is_finite() => *x,
            _ => fill_value,
        })
        .collect()
}

/// Statistical imputation entry point.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fit on a training column, applying the fill-value rounding policy.
    pub fn fit(
        column: &Column,
        strategy: ImputationStrategy,
        rounding: &RoundingPolicy,
    ) -> Result<FittedImputer> {
        let statistic = fit(column.values(), strategy)
            .context(format!("Fitting {} imputer on '{}'", strategy, column.name()))?;
        let fill_value = rounding.apply(statistic);

        debug!(
            "Learned {} for '{}' from {} of {} rows: {:.prec$}",
            strategy,
            column.name(),
            column.len() - column.missing_count(),
            column.len(),
            fill_value,
            prec = rounding.display_decimals as usize
        );

        Ok(FittedImputer {
            variable: column.name().to_string(),
            strategy,
            fill_value,
        })
    }
}

/// Learned imputer state. Immutable once fitted.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedImputer {
    variable: String,
    strategy: ImputationStrategy,
    fill_value: f64,
}

impl FittedImputer {
    /// Name of the column the fill value was learned from.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn strategy(&self) -> ImputationStrategy {
        self.strategy
    }

    pub fn fill_value(&self) -> f64 {
        self.fill_value
    }

    /// Fill the missing entries of another partition of the same variable.
    ///
    /// The result has no missing entries.
    pub fn transform(&self, column: &Column) -> Result<Column> {
        if column.name() != self.variable {
            return Err(ImputationError::SchemaMismatch {
                column: column.name().to_string(),
                reason: format!("imputer was fitted on '{}'", self.variable),
            });
        }
        if !self.fill_value.is_finite() {
            return Err(ImputationError::SchemaMismatch {
                column: column.name().to_string(),
                reason: format!("fill value {} is not a finite number", self.fill_value),
            });
        }

        Ok(Column::from_present(
            column.name(),
            transform(column.values(), self.fill_value),
        ))
    }
}

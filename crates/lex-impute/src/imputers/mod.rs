//! Imputation module for handling missing values.
//!
//! This module provides:
//! - Mean/median imputation of a single column (`fit`, `transform`)
//! - A multi-variable imputer fitted on a training table

mod statistical;
mod table;

pub use statistical::{FittedImputer, StatisticalImputer, fit, transform};
pub use table::TableImputer;

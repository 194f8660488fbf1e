//! Quantiles and IQR outlier fences.
//!
//! Quantiles use linear interpolation between closest ranks, the same
//! definition box plots draw their whiskers from.

use super::statistics::sorted_present;
use serde::{Deserialize, Serialize};

/// Lower and upper outlier fences around the inter-quartile range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Whether a value falls outside the fences.
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Quantile `q` (0.0 - 1.0) of values already sorted ascending.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Quantile `q` of the present values.
pub fn quantile(values: &[Option<f64>], q: f64) -> Option<f64> {
    quantile_sorted(&sorted_present(values), q)
}

/// IQR fences `Q1 - k*IQR` and `Q3 + k*IQR` over the present values.
pub fn iqr_bounds(values: &[Option<f64>], multiplier: f64) -> Option<IqrBounds> {
    let sorted = sorted_present(values);
    let q1 = quantile_sorted(&sorted, 0.25)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let iqr = q3 - q1;
    Some(IqrBounds {
        q1,
        q3,
        lower: q1 - multiplier * iqr,
        upper: q3 + multiplier * iqr,
    })
}

/// Number of present values outside the given fences.
pub fn count_outliers(values: &[Option<f64>], bounds: &IqrBounds) -> usize {
    values
        .iter()
        .flatten()
        .filter(|v| bounds.is_outlier(**v))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn present(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = present(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 0.5), Some(2.5));
        assert_eq!(quantile(&values, 0.25), Some(1.75));
        assert_eq!(quantile(&values, 1.0), Some(4.0));
    }

    #[test]
    fn test_quantile_invalid_inputs() {
        assert_eq!(quantile(&[None], 0.5), None);
        assert_eq!(quantile(&present(&[1.0]), 1.5), None);
    }

    #[test]
    fn test_iqr_bounds_and_outlier_count() {
        let values = present(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0]);
        let bounds = iqr_bounds(&values, 1.5).unwrap();

        // Q1 = 3.25, Q3 = 7.75, IQR = 4.5
        assert!((bounds.q1 - 3.25).abs() < 1e-9);
        assert!((bounds.q3 - 7.75).abs() < 1e-9);
        assert!((bounds.iqr() - 4.5).abs() < 1e-9);
        assert_eq!(count_outliers(&values, &bounds), 1);
    }

    #[test]
    fn test_no_outliers_in_uniform_data() {
        let values = present(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let bounds = iqr_bounds(&values, 1.5).unwrap();
        assert_eq!(count_outliers(&values, &bounds), 0);
    }

    #[test]
    fn test_missing_values_are_never_outliers() {
        let values = vec![Some(1.0), None, Some(2.0), None, Some(3.0)];
        let bounds = iqr_bounds(&values, 1.5).unwrap();
        assert_eq!(count_outliers(&values, &bounds), 0);
    }

    #[test]
    fn test_concentration_shrinks_fences() {
        // Piling values onto the centre narrows the IQR, so a value that was
        // inside the fences can fall outside them without itself changing.
        let original = vec![Some(0.0), Some(10.0), Some(20.0), Some(30.0), Some(60.0)];
        let before = iqr_bounds(&original, 1.5).unwrap();
        assert_eq!(count_outliers(&original, &before), 0);

        let mut concentrated = original.clone();
        concentrated.extend(std::iter::repeat_n(Some(20.0), 10));
        let after = iqr_bounds(&concentrated, 1.5).unwrap();
        assert!(count_outliers(&concentrated, &after) > 0);
    }
}

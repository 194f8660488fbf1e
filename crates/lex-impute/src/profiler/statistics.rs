//! Summary statistics over columns with missing values.
//!
//! All functions ignore missing entries. A non-finite value counts as
//! missing, the same way `Column` stores it. Variance and covariance use the
//! sample convention (divide by N - 1).

use crate::error::{ImputationError, Result};

/// Fraction of entries that are missing, in `[0, 1]`. Empty input gives 0.
pub fn missing_fraction(values: &[Option<f64>]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let missing = values.len() - present(values).count();
    missing as f64 / values.len() as f64
}

/// Arithmetic mean of the present values.
pub fn mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) =
        present(values).fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return None;
    }
    if sum.is_finite() {
        return Some(sum / count as f64);
    }
    // The running sum overflowed; divide first so the total stays in range.
    let n = count as f64;
    Some(present(values).map(|v| v / n).sum())
}

/// Median of the present values.
///
/// Odd count returns the middle value, even count the average of the two
/// middle values.
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    let sorted = sorted_present(values);
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some(sorted[n / 2 - 1] / 2.0 + sorted[n / 2] / 2.0)
    }
}

/// Sample variance of the present values. `None` with fewer than two.
pub fn variance(values: &[Option<f64>]) -> Option<f64> {
    let n = present(values).count();
    if n < 2 {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq: f64 = present(values).map(|v| (v - mean).powi(2)).sum();
    Some(sum_sq / (n - 1) as f64)
}

/// Sample standard deviation of the present values.
pub fn std_dev(values: &[Option<f64>]) -> Option<f64> {
    variance(values).map(f64::sqrt)
}

/// Sample covariance over rows where both columns are present.
///
/// Returns `Ok(None)` when fewer than two such rows exist.
pub fn covariance(a: &[Option<f64>], b: &[Option<f64>]) -> Result<Option<f64>> {
    if a.len() != b.len() {
        return Err(ImputationError::LengthMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }

    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some((finite(*x)?, finite(*y)?)))
        .collect();
    let n = pairs.len();
    if n < 2 {
        return Ok(None);
    }

    let mean_a = pairs.iter().map(|(x, _)| x).sum::<f64>() / n as f64;
    let mean_b = pairs.iter().map(|(_, y)| y).sum::<f64>() / n as f64;
    let co_sum: f64 = pairs
        .iter()
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum();

    Ok(Some(co_sum / (n - 1) as f64))
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|x| x.is_finite())
}

/// Present, finite values in column order.
pub(crate) fn present(values: &[Option<f64>]) -> impl Iterator<Item = f64> + '_ {
    values.iter().filter_map(|v| finite(*v))
}

/// Present values sorted ascending.
pub(crate) fn sorted_present(values: &[Option<f64>]) -> Vec<f64> {
    let mut sorted: Vec<f64> = present(values).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ==================== missing_fraction tests ====================

    #[test]
    fn test_missing_fraction_basic() {
        let values = [Some(1.0), None, Some(3.0), None];
        assert_eq!(missing_fraction(&values), 0.5);
    }

    #[test]
    fn test_missing_fraction_bounds() {
        assert_eq!(missing_fraction(&[]), 0.0);
        assert_eq!(missing_fraction(&[Some(1.0)]), 0.0);
        assert_eq!(missing_fraction(&[None, None]), 1.0);
    }

    // ==================== mean / median tests ====================

    #[test]
    fn test_mean_ignores_missing() {
        let values = [Some(1.0), Some(2.0), None, Some(4.0)];
        assert!(close(mean(&values).unwrap(), 7.0 / 3.0));
    }

    #[test]
    fn test_mean_all_missing() {
        assert_eq!(mean(&[None, None]), None);
    }

    #[test]
    fn test_median_odd_count() {
        let values = [Some(5.0), None, Some(1.0), Some(3.0)];
        assert_eq!(median(&values), Some(3.0));
    }

    #[test]
    fn test_median_even_count() {
        let values = [Some(1.0), Some(2.0), None, Some(4.0), Some(100.0)];
        assert_eq!(median(&values), Some(3.0));
    }

    #[test]
    fn test_median_all_missing() {
        assert_eq!(median(&[None]), None);
    }

    #[test]
    fn test_mean_median_near_float_max() {
        let values = [Some(f64::MAX), Some(f64::MAX), None];
        assert_eq!(mean(&values), Some(f64::MAX));
        assert_eq!(median(&values), Some(f64::MAX));

        let values = [Some(1e308), Some(1.5e308), None];
        assert!(close(mean(&values).unwrap() / 1e308, 1.25));
        assert!(close(median(&values).unwrap() / 1e308, 1.25));
    }

    #[test]
    fn test_infinite_values_count_as_missing() {
        let values = [Some(f64::INFINITY), Some(f64::NEG_INFINITY), Some(2.0), None];
        assert_eq!(missing_fraction(&values), 0.75);
        assert_eq!(mean(&values), Some(2.0));
        assert_eq!(median(&values), Some(2.0));
        assert_eq!(mean(&[Some(f64::INFINITY), Some(f64::NEG_INFINITY)]), None);
    }

    // ==================== variance tests ====================

    #[test]
    fn test_variance_sample_convention() {
        // Mean = 3, squared deviations sum to 10, divided by N - 1 = 4
        let values = [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)];
        assert!(close(variance(&values).unwrap(), 2.5));
        assert!(close(std_dev(&values).unwrap(), 2.5f64.sqrt()));
    }

    #[test]
    fn test_variance_ignores_missing() {
        let values = [Some(1.0), None, Some(3.0)];
        assert!(close(variance(&values).unwrap(), 2.0));
    }

    #[test]
    fn test_variance_needs_two_values() {
        assert_eq!(variance(&[Some(5.0), None]), None);
        assert_eq!(variance(&[]), None);
    }

    #[test]
    fn test_variance_identical_values() {
        assert_eq!(variance(&[Some(5.0), Some(5.0), Some(5.0)]), Some(0.0));
    }

    // ==================== covariance tests ====================

    #[test]
    fn test_covariance_perfect_linear() {
        let a = [Some(1.0), Some(2.0), Some(3.0)];
        let b = [Some(2.0), Some(4.0), Some(6.0)];
        // cov = 2 * var(a) = 2 * 1
        assert!(close(covariance(&a, &b).unwrap().unwrap(), 2.0));
    }

    #[test]
    fn test_covariance_pairwise_complete() {
        let a = [Some(1.0), None, Some(3.0), Some(5.0)];
        let b = [Some(1.0), Some(100.0), None, Some(5.0)];
        // Only rows 0 and 3 are complete: (1,1), (5,5) -> cov = var = 8
        assert!(close(covariance(&a, &b).unwrap().unwrap(), 8.0));
    }

    #[test]
    fn test_covariance_with_itself_is_variance() {
        let a = [Some(2.0), Some(4.0), None, Some(9.0)];
        let cov = covariance(&a, &a).unwrap().unwrap();
        assert!(close(cov, variance(&a).unwrap()));
    }

    #[test]
    fn test_covariance_insufficient_pairs() {
        let a = [Some(1.0), None];
        let b = [None, Some(2.0)];
        assert_eq!(covariance(&a, &b).unwrap(), None);
    }

    #[test]
    fn test_covariance_length_mismatch() {
        let err = covariance(&[Some(1.0)], &[Some(1.0), Some(2.0)]).unwrap_err();
        assert_eq!(err.error_code(), "LENGTH_MISMATCH");
    }
}

//! Small descriptive statistics.

// Sample counts stay far below 2^52
#![allow(clippy::cast_precision_loss)]

/// Arithmetic mean. Empty input yields 0.0.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `n`, not `n - 1`).
///
/// Empty input yields 0.0.
#[must_use]
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let center = mean(values);
    let variance = values
        .iter()
        .map(|&v| (v - center).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn mean_basic() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5, epsilon = 1e-12);
        assert_relative_eq!(mean(&[]), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn std_dev_is_population() {
        // Sample std of this set is ~1.155; population std is 1.0.
        assert_relative_eq!(std_dev(&[1.0, 1.0, 3.0, 3.0]), 1.0, epsilon = 1e-12);
        assert_relative_eq!(std_dev(&[5.0]), 0.0, epsilon = 1e-12);
        assert_relative_eq!(std_dev(&[]), 0.0, epsilon = 1e-12);
    }
}

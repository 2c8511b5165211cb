//! Trapezoidal integration and finite-difference differentiation.

/// Cumulative trapezoidal integral with uniform spacing `dx`, seeded at
/// zero so the output has the input's length.
///
/// # Example
///
/// ```
/// use propulsion_signal::cumulative_trapezoid;
///
/// // Integrating a constant velocity of 2 m/s at 10 Hz.
/// let dist = cumulative_trapezoid(&[2.0; 5], 0.1);
/// assert!((dist[4] - 0.8).abs() < 1e-12);
/// assert!(dist[0].abs() < 1e-12);
/// ```
#[must_use]
pub fn cumulative_trapezoid(y: &[f64], dx: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(y.len());
    let mut acc = 0.0;
    for (i, &value) in y.iter().enumerate() {
        if i > 0 {
            acc += dx * (y[i - 1] + value) / 2.0;
        }
        out.push(acc);
    }
    out
}

/// First derivative by finite differences with unit spacing: one-sided at
/// both edges, central in the interior.
///
/// Inputs with fewer than two samples have no defined slope and yield
/// zeros of the same length.
///
/// # Example
///
/// ```
/// use propulsion_signal::gradient;
///
/// let slope = gradient(&[0.0, 1.0, 2.0, 3.0]);
/// assert!(slope.iter().all(|&s| (s - 1.0).abs() < 1e-12));
/// ```
#[must_use]
pub fn gradient(y: &[f64]) -> Vec<f64> {
    let n = y.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let mut out = Vec::with_capacity(n);
    out.push(y[1] - y[0]);
    for i in 1..n - 1 {
        out.push((y[i + 1] - y[i - 1]) / 2.0);
    }
    out.push(y[n - 1] - y[n - 2]);
    out
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::similar_names,
    clippy::cast_precision_loss
)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn cumtrapz_constant_gives_ramp() {
        let out = cumulative_trapezoid(&[3.0; 4], 0.5);
        assert_eq!(out.len(), 4);
        assert_relative_eq!(out[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(out[1], 1.5, epsilon = 1e-12);
        assert_relative_eq!(out[3], 4.5, epsilon = 1e-12);
    }

    #[test]
    fn cumtrapz_ramp_gives_quadratic() {
        let y: Vec<f64> = (0..11).map(f64::from).collect();
        let out = cumulative_trapezoid(&y, 1.0);
        // Trapezoid rule is exact for linear integrands: ∫t dt = t²/2.
        assert_relative_eq!(out[10], 50.0, epsilon = 1e-12);
        assert_relative_eq!(out[5], 12.5, epsilon = 1e-12);
    }

    #[test]
    fn cumtrapz_degenerate_lengths() {
        assert!(cumulative_trapezoid(&[], 1.0).is_empty());
        assert_eq!(cumulative_trapezoid(&[7.0], 1.0), vec![0.0]);
    }

    #[test]
    fn gradient_linear_is_constant() {
        let y: Vec<f64> = (0..8).map(|i| 2.0 * f64::from(i) + 1.0).collect();
        for slope in gradient(&y) {
            assert_relative_eq!(slope, 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn gradient_edges_one_sided() {
        let y = [0.0, 1.0, 4.0, 9.0];
        let g = gradient(&y);
        assert_relative_eq!(g[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(g[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(g[2], 4.0, epsilon = 1e-12);
        assert_relative_eq!(g[3], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn gradient_degenerate_lengths() {
        assert!(gradient(&[]).is_empty());
        assert_eq!(gradient(&[5.0]), vec![0.0]);
    }

    #[test]
    fn gradient_inverts_cumtrapz_for_smooth_signals() {
        let y: Vec<f64> = (0..100)
            .map(|i| (f64::from(i) / 100.0 * std::f64::consts::TAU).sin())
            .collect();
        let integral = cumulative_trapezoid(&y, 1.0);
        let recovered = gradient(&integral);
        for i in 2..98 {
            assert_relative_eq!(recovered[i], y[i], epsilon = 2e-3);
        }
    }
}

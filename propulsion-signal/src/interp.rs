//! Linear resampling against a new time axis.

use crate::error::{Result, SignalError};

/// Computes the interpolation factor for `x` between `a` and `b`.
///
/// Returns 0.0 when the bracket is degenerate.
#[must_use]
pub fn lerp_factor(a: f64, b: f64, x: f64) -> f64 {
    if (b - a).abs() < f64::EPSILON {
        0.0
    } else {
        (x - a) / (b - a)
    }
}

/// Performs linear interpolation between two values.
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    t.mul_add(b - a, a)
}

/// Resamples `(x, y)` onto the axis `xi` by linear interpolation.
///
/// Points of `xi` outside the observed range `[x[0], x[last]]` become `NaN`;
/// nothing is extrapolated. `x` must be sorted ascending — the session
/// resampler validates monotonic time before calling in here.
///
/// # Errors
///
/// Returns an error if `x` and `y` differ in length or hold fewer than two
/// samples.
///
/// # Example
///
/// ```
/// use propulsion_signal::resample_linear;
///
/// let x = [0.0, 1.0, 2.0];
/// let y = [0.0, 10.0, 20.0];
/// let out = resample_linear(&x, &y, &[0.5, 1.5, 3.0]).unwrap();
///
/// assert!((out[0] - 5.0).abs() < 1e-12);
/// assert!((out[1] - 15.0).abs() < 1e-12);
/// assert!(out[2].is_nan());
/// ```
pub fn resample_linear(x: &[f64], y: &[f64], xi: &[f64]) -> Result<Vec<f64>> {
    if x.len() != y.len() {
        return Err(SignalError::length_mismatch(x.len(), y.len()));
    }
    if x.len() < 2 {
        return Err(SignalError::too_short(x.len(), 2));
    }

    let first = x[0];
    let last = x[x.len() - 1];

    let out = xi
        .iter()
        .map(|&t| {
            if !t.is_finite() || t < first || t > last {
                return f64::NAN;
            }
            // First index with x[hi] >= t; t >= first guarantees hi >= 1
            // except at the exact left edge.
            let hi = x.partition_point(|&v| v < t);
            if hi == 0 {
                return y[0];
            }
            let lo = hi - 1;
            let factor = lerp_factor(x[lo], x[hi], t);
            lerp(y[lo], y[hi], factor)
        })
        .collect();

    Ok(out)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::similar_names
)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn lerp_factor_basic() {
        assert!((lerp_factor(0.0, 10.0, 5.0) - 0.5).abs() < 1e-12);
        assert!((lerp_factor(0.0, 10.0, 0.0)).abs() < 1e-12);
        assert!((lerp_factor(3.0, 3.0, 3.0)).abs() < 1e-12);
    }

    #[test]
    fn lerp_basic() {
        assert!((lerp(0.0, 10.0, 0.5) - 5.0).abs() < 1e-12);
        assert!((lerp(-2.0, 2.0, 1.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn resample_hits_exact_nodes() {
        let x = [0.0, 0.5, 1.0, 1.5];
        let y = [1.0, 2.0, 4.0, 8.0];
        let out = resample_linear(&x, &y, &x).unwrap();
        for (a, b) in out.iter().zip(&y) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn resample_interpolates_midpoints() {
        let x = [0.0, 1.0, 2.0];
        let y = [0.0, 10.0, 30.0];
        let out = resample_linear(&x, &y, &[0.25, 1.5]).unwrap();
        assert_relative_eq!(out[0], 2.5, epsilon = 1e-12);
        assert_relative_eq!(out[1], 20.0, epsilon = 1e-12);
    }

    #[test]
    fn resample_nan_outside_range() {
        let x = [1.0, 2.0];
        let y = [5.0, 6.0];
        let out = resample_linear(&x, &y, &[0.5, 1.5, 2.5]).unwrap();
        assert!(out[0].is_nan());
        assert!(!out[1].is_nan());
        assert!(out[2].is_nan());
    }

    #[test]
    fn resample_handles_irregular_source() {
        let x = [0.0, 0.1, 0.4, 1.0];
        let y = [0.0, 1.0, 4.0, 10.0];
        let out = resample_linear(&x, &y, &[0.25, 0.7]).unwrap();
        assert_relative_eq!(out[0], 2.5, epsilon = 1e-12);
        assert_relative_eq!(out[1], 7.0, epsilon = 1e-12);
    }

    #[test]
    fn resample_rejects_mismatched_lengths() {
        let err = resample_linear(&[0.0, 1.0], &[0.0], &[0.5]).unwrap_err();
        assert!(matches!(err, SignalError::LengthMismatch { .. }));
    }

    #[test]
    fn resample_rejects_single_sample() {
        let err = resample_linear(&[0.0], &[1.0], &[0.0]).unwrap_err();
        assert!(matches!(err, SignalError::TooShort { len: 1, min: 2 }));
    }
}

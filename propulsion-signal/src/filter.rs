//! Zero-phase Butterworth low-pass filtering.
//!
//! The pipeline smooths every derived quantity with the same primitive: a
//! second-order Butterworth low-pass run forward and backward so the result
//! has no phase lag against the raw signal.

use sci_rs::signal::filter::{design::Sos, sosfiltfilt_dyn};

use crate::error::{Result, SignalError};

/// Shortest signal [`lowpass_filter`] accepts.
///
/// Forward-backward filtering reflects 3·(2·sections + 1) samples at each
/// end; one biquad section needs 9, so inputs must be longer than that.
pub const MIN_FILTFILT_LEN: usize = 10;

/// Designs a second-order Butterworth low-pass as a single biquad section
/// via the bilinear transform with frequency pre-warping.
#[allow(clippy::similar_names)]
fn butter2_lowpass(cutoff: f64, sample_rate: f64) -> Sos<f64> {
    let k = (std::f64::consts::PI * cutoff / sample_rate).tan();
    let k2 = k * k;
    let norm = 1.0 / (std::f64::consts::SQRT_2.mul_add(k, 1.0) + k2);

    let b0 = k2 * norm;
    let a1 = 2.0 * (k2 - 1.0) * norm;
    let a2 = (std::f64::consts::SQRT_2.mul_add(-k, 1.0) + k2) * norm;

    Sos::new([b0, 2.0 * b0, b0], [1.0, a1, a2])
}

/// Applies a zero-phase second-order Butterworth low-pass.
///
/// # Arguments
///
/// * `signal` - Input samples
/// * `sample_rate` - Sampling frequency in Hz
/// * `cutoff` - Cutoff frequency in Hz, inside `(0, sample_rate / 2)`
///
/// # Errors
///
/// Returns an error for a non-positive or non-finite sample rate, a cutoff
/// outside the open Nyquist interval, or a signal shorter than the
/// forward-backward pad (10 samples).
///
/// # Example
///
/// ```
/// use propulsion_signal::lowpass_filter;
///
/// let steady = vec![2.0; 32];
/// let filtered = lowpass_filter(&steady, 100.0, 10.0).unwrap();
/// assert!((filtered[16] - 2.0).abs() < 1e-6);
/// ```
pub fn lowpass_filter(signal: &[f64], sample_rate: f64, cutoff: f64) -> Result<Vec<f64>> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(SignalError::invalid_sample_rate(sample_rate));
    }
    let nyquist = sample_rate / 2.0;
    if !cutoff.is_finite() || cutoff <= 0.0 || cutoff >= nyquist {
        return Err(SignalError::invalid_cutoff(cutoff, nyquist));
    }
    if signal.len() < MIN_FILTFILT_LEN {
        return Err(SignalError::too_short(signal.len(), MIN_FILTFILT_LEN));
    }

    let sos = vec![butter2_lowpass(cutoff, sample_rate)];
    Ok(sosfiltfilt_dyn(signal.iter(), &sos))
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
    use std::f64::consts::TAU;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn filter_passes_constant_signal() {
        let steady = vec![3.5; 64];
        let filtered = lowpass_filter(&steady, 100.0, 10.0).unwrap();
        assert_eq!(filtered.len(), 64);
        for value in filtered {
            assert_relative_eq!(value, 3.5, epsilon = 1e-6);
        }
    }

    #[test]
    fn filter_attenuates_high_frequency() {
        let fs = 100.0;
        let n = 400;
        let low: Vec<f64> = (0..n).map(|i| (TAU * 1.0 * i as f64 / fs).sin()).collect();
        let high: Vec<f64> = (0..n).map(|i| (TAU * 40.0 * i as f64 / fs).sin()).collect();
        let mixed: Vec<f64> = low.iter().zip(&high).map(|(a, b)| a + b).collect();

        let filtered = lowpass_filter(&mixed, fs, 5.0).unwrap();

        // Away from the edges the 40 Hz component should be nearly gone.
        let residual: f64 = (100..300)
            .map(|i| (filtered[i] - low[i]).powi(2))
            .sum::<f64>()
            / 200.0;
        assert!(residual < 0.01, "residual power {residual}");
    }

    #[test]
    fn filter_has_zero_phase() {
        let fs = 100.0;
        let n = 101;
        // Gaussian bump centered on sample 50.
        let bump: Vec<f64> = (0..n)
            .map(|i| (-((i as f64 - 50.0) / 8.0).powi(2)).exp())
            .collect();

        let filtered = lowpass_filter(&bump, fs, 10.0).unwrap();
        let peak = filtered
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!((49..=51).contains(&peak), "peak moved to {peak}");
    }

    #[test]
    fn filter_rejects_invalid_cutoff() {
        let signal = vec![0.0; 32];
        assert!(matches!(
            lowpass_filter(&signal, 100.0, 0.0),
            Err(SignalError::InvalidCutoff { .. })
        ));
        assert!(matches!(
            lowpass_filter(&signal, 100.0, -1.0),
            Err(SignalError::InvalidCutoff { .. })
        ));
        assert!(matches!(
            lowpass_filter(&signal, 100.0, 50.0),
            Err(SignalError::InvalidCutoff { .. })
        ));
    }

    #[test]
    fn filter_rejects_invalid_sample_rate() {
        let signal = vec![0.0; 32];
        assert!(matches!(
            lowpass_filter(&signal, 0.0, 5.0),
            Err(SignalError::InvalidSampleRate { .. })
        ));
        assert!(matches!(
            lowpass_filter(&signal, f64::NAN, 5.0),
            Err(SignalError::InvalidSampleRate { .. })
        ));
    }

    #[test]
    fn filter_rejects_short_signal() {
        let signal = vec![1.0; 9];
        assert!(matches!(
            lowpass_filter(&signal, 100.0, 5.0),
            Err(SignalError::TooShort { len: 9, min: 10 })
        ));
    }
}

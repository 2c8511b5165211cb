//! One-sided periodogram power spectral density estimation.

// Bin indices and lengths stay far below 2^52
#![allow(clippy::cast_precision_loss)]

use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::{Result, SignalError};

/// One-sided power spectral density estimate.
///
/// `frequencies[i]` is the center frequency of bin `i` in Hz; `power[i]`
/// its density in units²/Hz. Both run from DC to the Nyquist bin.
#[derive(Debug, Clone)]
pub struct PowerSpectrum {
    /// Bin center frequencies in Hz.
    pub frequencies: Vec<f64>,

    /// Power spectral density per bin.
    pub power: Vec<f64>,
}

impl PowerSpectrum {
    /// Number of frequency bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Returns true if the spectrum has no bins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Frequency of the highest-power bin.
    #[must_use]
    pub fn dominant_frequency(&self) -> Option<f64> {
        self.power
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| self.frequencies[i])
    }
}

/// Estimates the power spectral density of `signal` by the periodogram
/// method: mean removal, an unwindowed FFT and one-sided density scaling
/// (interior bins doubled to fold in their conjugates).
///
/// # Errors
///
/// Returns an error for a non-positive or non-finite sample rate, or a
/// signal with fewer than two samples.
///
/// # Example
///
/// ```
/// use propulsion_signal::periodogram;
///
/// let fs = 64.0;
/// let tone: Vec<f64> = (0..256)
///     .map(|i| (std::f64::consts::TAU * 8.0 * f64::from(i) / fs).sin())
///     .collect();
///
/// let spectrum = periodogram(&tone, fs).unwrap();
/// assert!((spectrum.dominant_frequency().unwrap() - 8.0).abs() < 1e-9);
/// ```
pub fn periodogram(signal: &[f64], sample_rate: f64) -> Result<PowerSpectrum> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(SignalError::invalid_sample_rate(sample_rate));
    }
    let n = signal.len();
    if n < 2 {
        return Err(SignalError::too_short(n, 2));
    }

    let mean = signal.iter().sum::<f64>() / n as f64;
    let mut buffer: Vec<Complex<f64>> = signal
        .iter()
        .map(|&x| Complex::new(x - mean, 0.0))
        .collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let n_bins = n / 2 + 1;
    let scale = 1.0 / (sample_rate * n as f64);
    let nyquist_bin_unpaired = n % 2 == 0;

    let mut power = Vec::with_capacity(n_bins);
    for (i, value) in buffer.iter().take(n_bins).enumerate() {
        let mut density = value.norm_sqr() * scale;
        if i != 0 && !(nyquist_bin_unpaired && i == n_bins - 1) {
            density *= 2.0;
        }
        power.push(density);
    }

    let freq_step = sample_rate / n as f64;
    let frequencies = (0..n_bins).map(|i| i as f64 * freq_step).collect();

    Ok(PowerSpectrum { frequencies, power })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::similar_names
)]
mod tests {
    use std::f64::consts::TAU;

    use approx::assert_relative_eq;

    use super::*;

    fn tone(freq: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| (TAU * freq * i as f64 / fs).sin()).collect()
    }

    #[test]
    fn periodogram_locates_pure_tone() {
        let fs = 128.0;
        let spectrum = periodogram(&tone(10.0, fs, 512), fs).unwrap();
        assert_relative_eq!(spectrum.dominant_frequency().unwrap(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn periodogram_bin_layout() {
        let fs = 100.0;
        let spectrum = periodogram(&tone(5.0, fs, 200), fs).unwrap();
        assert_eq!(spectrum.len(), 101);
        assert_relative_eq!(spectrum.frequencies[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(spectrum.frequencies[1], 0.5, epsilon = 1e-12);
        assert_relative_eq!(spectrum.frequencies[100], 50.0, epsilon = 1e-12);
    }

    #[test]
    fn periodogram_density_integrates_to_variance() {
        let fs = 64.0;
        let n = 256;
        let signal = tone(8.0, fs, n);
        let spectrum = periodogram(&signal, fs).unwrap();

        let df = fs / n as f64;
        let total: f64 = spectrum.power.iter().sum::<f64>() * df;
        // Unit-amplitude sinusoid over whole cycles has variance 1/2.
        assert_relative_eq!(total, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn periodogram_removes_dc() {
        let fs = 50.0;
        let signal = vec![42.0; 100];
        let spectrum = periodogram(&signal, fs).unwrap();
        for density in spectrum.power {
            assert!(density.abs() < 1e-18);
        }
    }

    #[test]
    fn periodogram_rejects_bad_inputs() {
        assert!(matches!(
            periodogram(&[1.0], 100.0),
            Err(SignalError::TooShort { .. })
        ));
        assert!(matches!(
            periodogram(&[1.0, 2.0], 0.0),
            Err(SignalError::InvalidSampleRate { .. })
        ));
    }

    #[test]
    fn spectrum_dominant_on_empty() {
        let spectrum = PowerSpectrum {
            frequencies: vec![],
            power: vec![],
        };
        assert!(spectrum.is_empty());
        assert!(spectrum.dominant_frequency().is_none());
    }
}

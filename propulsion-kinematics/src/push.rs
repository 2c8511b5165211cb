//! Propulsion stroke detection from a forward acceleration signal.
//!
//! The dominant stroke frequency is estimated spectrally, the signal is
//! low-passed just above it, and the individual pushes are the peaks that
//! survive height, prominence and spacing thresholds. Follows van der
//! Slikke et al., "Push characteristics in wheelchair court sport
//! sprinting", Procedia Engineering 147.

// Casts: peak counts and sample indices are far below f64's exact integer
// range; the distance rule rounds a small positive quotient.
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]

use std::fmt;

use propulsion_signal::{
    find_peaks, lowpass_filter, periodogram, std_dev, PeakCriteria, SignalError, MIN_FILTFILT_LEN,
};
use propulsion_types::{DeviceId, SessionData, SessionError};
use tracing::debug;

use crate::error::{KinematicsError, Result};

/// Physiological floor of the stroke-frequency search band, Hz.
const MIN_STROKE_FREQ_HZ: f64 = 1.2;

/// Physiological cap on the detected stroke frequency, Hz.
const MAX_STROKE_FREQ_HZ: f64 = 3.0;

/// The adaptive low-pass cutoff sits this factor above the dominant
/// stroke frequency; the same product sets the minimum peak spacing.
const CUTOFF_MULTIPLIER: f64 = 1.5;

/// Detected propulsion strokes for one acceleration signal.
#[derive(Debug, Clone, PartialEq)]
pub struct PushAnalysis {
    /// Sample indices of the detected pushes.
    pub peaks: Vec<usize>,

    /// The low-passed acceleration the peaks were picked from.
    pub filtered: Vec<f64>,

    /// Time between consecutive pushes, in seconds.
    pub cycle_times: Vec<f64>,

    /// Pushes per second over the whole signal.
    pub frequency_hz: f64,
}

impl PushAnalysis {
    /// Number of detected pushes.
    #[must_use]
    pub fn count(&self) -> usize {
        self.peaks.len()
    }

    /// Analysis of a signal with no usable periodic content: no pushes,
    /// the input passed through unfiltered.
    fn empty(signal: &[f64]) -> Self {
        Self {
            peaks: Vec::new(),
            filtered: signal.to_vec(),
            cycle_times: Vec::new(),
            frequency_hz: 0.0,
        }
    }
}

impl fmt::Display for PushAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pushes at {:.2} Hz", self.count(), self.frequency_hz)
    }
}

/// Detects propulsion strokes in a forward acceleration signal.
///
/// The periodogram of the mean-removed signal is searched between the
/// 1.2 Hz floor and five times that floor's bin index for the dominant
/// stroke frequency, capped at 3 Hz. The raw signal is then low-passed at
/// 1.5x the dominant frequency, and pushes are the peaks that are at
/// least half the filtered signal's standard deviation tall and
/// prominent, spaced at least one cutoff-frequency cycle apart.
///
/// A signal too short for filtering, or whose spectrum has no bins in the
/// search band, yields an empty [`PushAnalysis`] with the input passed
/// through unfiltered.
///
/// # Errors
///
/// Returns an error for a non-positive or non-finite sample rate, or when
/// the sample rate is too low to apply the adaptive cutoff.
///
/// # Example
///
/// ```
/// use propulsion_kinematics::detect_pushes;
///
/// // Ten seconds of 1.5 Hz propulsion at 400 Hz.
/// let acc: Vec<f64> = (0..4000)
///     .map(|i| (2.0 * std::f64::consts::PI * 1.5 * f64::from(i) / 400.0).sin())
///     .collect();
///
/// let analysis = detect_pushes(&acc, 400.0).unwrap();
/// assert!((analysis.frequency_hz - 1.5).abs() < 0.1);
/// ```
pub fn detect_pushes(acceleration: &[f64], sample_rate: f64) -> Result<PushAnalysis> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(SignalError::invalid_sample_rate(sample_rate).into());
    }
    if acceleration.len() < MIN_FILTFILT_LEN {
        debug!(
            len = acceleration.len(),
            "signal too short for stroke detection"
        );
        return Ok(PushAnalysis::empty(acceleration));
    }

    let spectrum = periodogram(acceleration, sample_rate)?;
    let floor = spectrum
        .frequencies
        .partition_point(|&f| f < MIN_STROKE_FREQ_HZ);
    let band_end = (floor * 5).min(spectrum.len());
    if floor >= band_end {
        debug!(sample_rate, "no spectral bins in the stroke band");
        return Ok(PushAnalysis::empty(acceleration));
    }

    let mut dominant = floor;
    for bin in floor..band_end {
        if spectrum.power[bin] > spectrum.power[dominant] {
            dominant = bin;
        }
    }
    let stroke_freq = spectrum.frequencies[dominant].min(MAX_STROKE_FREQ_HZ);
    let cutoff = CUTOFF_MULTIPLIER * stroke_freq;

    let filtered = lowpass_filter(acceleration, sample_rate, cutoff)?;
    let threshold = std_dev(&filtered) / 2.0;
    let distance = (sample_rate / cutoff).round() as usize;
    let criteria = PeakCriteria::new()
        .with_min_height(threshold)
        .with_min_distance(distance)
        .with_min_prominence(threshold);
    let peaks = find_peaks(&filtered, &criteria);

    let duration = acceleration.len() as f64 / sample_rate;
    let frequency_hz = peaks.len() as f64 / duration;
    let cycle_times: Vec<f64> = peaks
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) as f64 / sample_rate)
        .collect();

    debug!(
        pushes = peaks.len(),
        stroke_freq, cutoff, "stroke detection complete"
    );

    Ok(PushAnalysis {
        peaks,
        filtered,
        cycle_times,
        frequency_hz,
    })
}

/// Runs [`detect_pushes`] on a named channel of a session device, with the
/// sample rate inferred from the device's time axis.
///
/// # Errors
///
/// Returns an error if the device or channel is absent, the table is too
/// short to infer a sample rate, or stroke detection itself fails.
pub fn detect_channel_pushes(
    session: &SessionData,
    device: &DeviceId,
    channel: &str,
) -> Result<PushAnalysis> {
    let table = session.require(device)?;
    let values = table
        .channel(channel)
        .ok_or_else(|| SessionError::missing_channel(device.name(), channel))?;
    let sample_rate = table.sample_frequency().ok_or_else(|| {
        KinematicsError::insufficient_data(format!(
            "device '{device}' needs at least two samples with increasing time"
        ))
    })?;
    detect_pushes(values, sample_rate)
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
    use propulsion_types::DeviceTable;

    use super::*;

    /// Ten seconds of a pure stroke tone at 400 Hz.
    fn sprint_signal(stroke_hz: f64) -> Vec<f64> {
        (0..4000)
            .map(|i| (2.0 * std::f64::consts::PI * stroke_hz * f64::from(i) / 400.0).sin())
            .collect()
    }

    #[test]
    fn detects_synthetic_sprint_strokes() {
        let acc = sprint_signal(1.5);
        let analysis = detect_pushes(&acc, 400.0).unwrap();

        assert!(
            (14..=16).contains(&analysis.count()),
            "expected about 15 pushes, got {}",
            analysis.count()
        );
        assert!((analysis.frequency_hz - 1.5).abs() < 0.1);
        assert_eq!(analysis.cycle_times.len(), analysis.count() - 1);
        for cycle in &analysis.cycle_times {
            assert_relative_eq!(*cycle, 1.0 / 1.5, epsilon = 0.02);
        }
        assert_eq!(analysis.filtered.len(), acc.len());
        assert!(format!("{analysis}").contains("pushes"));
    }

    #[test]
    fn caps_dominant_frequency_at_three_hertz() {
        // 4 Hz is above the cap; the cutoff stays at 4.5 Hz and the peaks
        // are still one stroke apart.
        let acc = sprint_signal(4.0);
        let analysis = detect_pushes(&acc, 400.0).unwrap();

        assert!(
            (38..=41).contains(&analysis.count()),
            "expected about 40 pushes, got {}",
            analysis.count()
        );
        assert!((analysis.frequency_hz - 4.0).abs() < 0.2);
    }

    #[test]
    fn short_signal_yields_empty_analysis() {
        let acc = vec![0.0, 1.0, 0.0, 1.0, 0.0];
        let analysis = detect_pushes(&acc, 400.0).unwrap();
        assert_eq!(analysis.count(), 0);
        assert_eq!(analysis.filtered, acc);
        assert!(analysis.cycle_times.is_empty());
        assert_eq!(analysis.frequency_hz, 0.0);
    }

    #[test]
    fn empty_stroke_band_yields_empty_analysis() {
        // At 2 Hz sampling the whole spectrum sits below the 1.2 Hz floor.
        let acc: Vec<f64> = (0..20).map(|i| f64::from(i % 2)).collect();
        let analysis = detect_pushes(&acc, 2.0).unwrap();
        assert_eq!(analysis.count(), 0);
        assert_eq!(analysis.filtered, acc);
    }

    #[test]
    fn invalid_sample_rate_is_an_error() {
        let acc = sprint_signal(1.5);
        for bad in [0.0, -10.0, f64::NAN] {
            let err = detect_pushes(&acc, bad).unwrap_err();
            assert!(matches!(err, KinematicsError::Signal(_)));
        }
    }

    #[test]
    fn channel_convenience_matches_direct_call() {
        let acc = sprint_signal(1.5);
        let time: Vec<f64> = (0..4000).map(|i| f64::from(i) / 400.0).collect();
        let mut table = DeviceTable::from_time(time);
        table.insert_channel("acc", acc.clone()).unwrap();
        let mut session = SessionData::new();
        session.insert(DeviceId::Frame, table);

        let via_channel = detect_channel_pushes(&session, &DeviceId::Frame, "acc").unwrap();
        let direct = detect_pushes(&acc, 400.0).unwrap();
        assert_eq!(via_channel.peaks, direct.peaks);
    }

    #[test]
    fn channel_convenience_reports_missing_data() {
        let session = SessionData::new();
        assert!(matches!(
            detect_channel_pushes(&session, &DeviceId::Frame, "acc"),
            Err(KinematicsError::Session(SessionError::MissingDevice { .. }))
        ));

        let mut session = SessionData::new();
        session.insert(DeviceId::Frame, DeviceTable::from_time(vec![0.0, 0.1]));
        assert!(matches!(
            detect_channel_pushes(&session, &DeviceId::Frame, "acc"),
            Err(KinematicsError::Session(SessionError::MissingChannel { .. }))
        ));
    }
}

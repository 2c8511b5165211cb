//! Peak picking with height, distance and prominence criteria.
//!
//! Matches the usual peak-finding conventions for 1-D signals: a peak is a
//! strict local maximum (plateaus count once, at their midpoint), and the
//! criteria are applied in a fixed order so combining them is predictable:
//! height first, then minimum distance with taller peaks taking priority,
//! then prominence measured against the full signal extent.

/// Criteria for [`find_peaks`]. Unset criteria do not filter.
///
/// # Example
///
/// ```
/// use propulsion_signal::{find_peaks, PeakCriteria};
///
/// let signal = [0.0, 3.0, 0.0, 1.0, 0.0];
/// let criteria = PeakCriteria::new().with_min_height(2.0);
/// assert_eq!(find_peaks(&signal, &criteria), vec![1]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PeakCriteria {
    /// Minimum sample value at the peak.
    pub min_height: Option<f64>,

    /// Minimum index separation between retained peaks.
    pub min_distance: Option<usize>,

    /// Minimum prominence: height above the higher of the two bases.
    pub min_prominence: Option<f64>,
}

impl PeakCriteria {
    /// Criteria that accept every local maximum.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum peak height.
    #[must_use]
    pub const fn with_min_height(mut self, height: f64) -> Self {
        self.min_height = Some(height);
        self
    }

    /// Sets the minimum peak separation in samples.
    #[must_use]
    pub const fn with_min_distance(mut self, distance: usize) -> Self {
        self.min_distance = Some(distance);
        self
    }

    /// Sets the minimum peak prominence.
    #[must_use]
    pub const fn with_min_prominence(mut self, prominence: f64) -> Self {
        self.min_prominence = Some(prominence);
        self
    }
}

/// Finds strict local maxima, reporting each plateau once at its midpoint.
///
/// The first and last samples can never be peaks. `NaN` samples never
/// compare greater, so runs containing `NaN` yield no peaks.
#[must_use]
pub fn local_maxima(signal: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if signal.len() < 3 {
        return peaks;
    }

    let last = signal.len() - 1;
    let mut i = 1;
    while i < last {
        if signal[i - 1] < signal[i] {
            // Skip over a possible plateau of equal samples.
            let mut ahead = i + 1;
            while ahead < last && signal[ahead] == signal[i] {
                ahead += 1;
            }
            if signal[ahead] < signal[i] {
                peaks.push(usize::midpoint(i, ahead - 1));
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

/// Computes the prominence of each peak: its height above the higher of
/// the two flanking minima, searched out to the nearest higher sample or
/// the signal border.
#[must_use]
pub fn peak_prominences(signal: &[f64], peaks: &[usize]) -> Vec<f64> {
    peaks
        .iter()
        .map(|&peak| {
            let height = signal[peak];

            let mut left_min = height;
            for j in (0..=peak).rev() {
                if signal[j] > height {
                    break;
                }
                if signal[j] < left_min {
                    left_min = signal[j];
                }
            }

            let mut right_min = height;
            for &value in &signal[peak..] {
                if value > height {
                    break;
                }
                if value < right_min {
                    right_min = value;
                }
            }

            height - left_min.max(right_min)
        })
        .collect()
}

/// Keeps only peaks at least `distance` samples apart, dropping the lower
/// of any two that crowd each other.
fn select_by_distance(signal: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    let mut keep = vec![true; peaks.len()];

    // Visit peaks from tallest to lowest so the taller neighbor wins.
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_unstable_by(|&a, &b| signal[peaks[a]].total_cmp(&signal[peaks[b]]));

    for &k in order.iter().rev() {
        if !keep[k] {
            continue;
        }
        let mut j = k;
        while j > 0 && peaks[k] - peaks[j - 1] < distance {
            keep[j - 1] = false;
            j -= 1;
        }
        let mut j = k + 1;
        while j < peaks.len() && peaks[j] - peaks[k] < distance {
            keep[j] = false;
            j += 1;
        }
    }

    peaks
        .iter()
        .zip(&keep)
        .filter_map(|(&peak, &kept)| kept.then_some(peak))
        .collect()
}

/// Finds peaks satisfying all set criteria.
///
/// # Example
///
/// ```
/// use propulsion_signal::{find_peaks, PeakCriteria};
///
/// let signal = [0.0, 5.0, 0.0, 4.0, 0.0, 3.0, 0.0];
/// let crowded = find_peaks(&signal, &PeakCriteria::new());
/// assert_eq!(crowded, vec![1, 3, 5]);
///
/// let spaced = find_peaks(&signal, &PeakCriteria::new().with_min_distance(3));
/// assert_eq!(spaced, vec![1, 5]);
/// ```
#[must_use]
pub fn find_peaks(signal: &[f64], criteria: &PeakCriteria) -> Vec<usize> {
    let mut peaks = local_maxima(signal);

    if let Some(min_height) = criteria.min_height {
        peaks.retain(|&peak| signal[peak] >= min_height);
    }

    if let Some(distance) = criteria.min_distance {
        if distance > 1 {
            peaks = select_by_distance(signal, &peaks, distance);
        }
    }

    if let Some(min_prominence) = criteria.min_prominence {
        let prominences = peak_prominences(signal, &peaks);
        peaks = peaks
            .iter()
            .zip(&prominences)
            .filter_map(|(&peak, &prominence)| (prominence >= min_prominence).then_some(peak))
            .collect();
    }

    peaks
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

    use super::*;

    #[test]
    fn maxima_simple_triangle() {
        assert_eq!(local_maxima(&[0.0, 1.0, 0.0]), vec![1]);
        assert_eq!(local_maxima(&[1.0, 0.0, 1.0]), Vec::<usize>::new());
    }

    #[test]
    fn maxima_endpoints_excluded() {
        assert_eq!(local_maxima(&[2.0, 1.0, 0.0, 1.0, 2.0]), Vec::<usize>::new());
    }

    #[test]
    fn maxima_plateau_midpoint() {
        assert_eq!(local_maxima(&[0.0, 1.0, 1.0, 1.0, 0.0]), vec![2]);
        // Even-length plateau reports the left of the two middle samples.
        assert_eq!(local_maxima(&[0.0, 1.0, 1.0, 0.0]), vec![1]);
    }

    #[test]
    fn maxima_plateau_touching_border_is_not_a_peak() {
        assert_eq!(local_maxima(&[0.0, 1.0, 1.0]), Vec::<usize>::new());
    }

    #[test]
    fn maxima_ignore_nan_neighborhoods() {
        let signal = [0.0, f64::NAN, 0.0, 1.0, 0.0];
        assert_eq!(local_maxima(&signal), vec![3]);
    }

    #[test]
    fn prominence_isolated_peak_is_full_height() {
        let signal = [0.0, 2.0, 1.0, 3.0, 0.0];
        let prominences = peak_prominences(&signal, &[1, 3]);
        assert!((prominences[0] - 1.0).abs() < 1e-12);
        assert!((prominences[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn find_peaks_height_filter() {
        let signal = [0.0, 3.0, 0.0, 1.0, 0.0, 2.0, 0.0];
        let peaks = find_peaks(&signal, &PeakCriteria::new().with_min_height(1.5));
        assert_eq!(peaks, vec![1, 5]);
    }

    #[test]
    fn find_peaks_distance_keeps_tallest() {
        let signal = [0.0, 5.0, 0.0, 4.0, 0.0, 3.0, 0.0];
        let peaks = find_peaks(&signal, &PeakCriteria::new().with_min_distance(3));
        // 5 at index 1 suppresses 4 at index 3; 3 at index 5 survives.
        assert_eq!(peaks, vec![1, 5]);
    }

    #[test]
    fn find_peaks_prominence_filter() {
        // The middle peak rises only 0.4 above its saddles; the walk past
        // its neighbors stops at the first strictly higher sample.
        let signal = [0.0, 2.0, 1.0, 1.4, 1.0, 2.0, 0.0];
        let peaks = find_peaks(&signal, &PeakCriteria::new().with_min_prominence(1.5));
        assert_eq!(peaks, vec![1, 5]);
    }

    #[test]
    fn find_peaks_counts_sinusoid_cycles() {
        let fs = 50.0;
        let n = 200; // 4 seconds
        let signal: Vec<f64> = (0..n).map(|i| (TAU * 2.0 * i as f64 / fs).sin()).collect();
        let criteria = PeakCriteria::new()
            .with_min_height(0.5)
            .with_min_distance(10)
            .with_min_prominence(0.5);
        let peaks = find_peaks(&signal, &criteria);
        assert_eq!(peaks.len(), 8);
    }

    #[test]
    fn find_peaks_empty_and_short_signals() {
        assert!(find_peaks(&[], &PeakCriteria::new()).is_empty());
        assert!(find_peaks(&[1.0, 2.0], &PeakCriteria::new()).is_empty());
    }
}

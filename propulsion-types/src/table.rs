//! Per-device time series table.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// How resampling treats a device's channels.
///
/// The tag lives on the table so policy never depends on device naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeviceKind {
    /// Independent scalar channels, resampled channel by channel.
    #[default]
    Generic,
    /// Channels form one quaternion per sample; rows are renormalized to
    /// unit length after interpolation.
    Quaternion,
    /// Channels form one rotation matrix per sample. Linear interpolation
    /// does not preserve orthonormality, so these tables are dropped by the
    /// resampler.
    RotationMatrix,
}

/// Summary statistics for a device table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStats {
    /// Number of samples.
    pub samples: usize,

    /// Number of channels.
    pub channels: usize,

    /// First timestamp, if any samples exist.
    pub start_time: Option<f64>,

    /// Last timestamp, if any samples exist.
    pub end_time: Option<f64>,

    /// Estimated sample frequency in Hz (inverse mean time step).
    pub sample_frequency: Option<f64>,
}

/// One device's recording: a time axis plus named channel columns.
///
/// Invariant: every channel has exactly as many samples as the time axis.
/// [`DeviceTable::insert_channel`] enforces this on the way in.
///
/// # Example
///
/// ```
/// use propulsion_types::{channel, DeviceTable};
///
/// let mut table = DeviceTable::from_time(vec![0.0, 0.01, 0.02]);
/// table
///     .insert_channel(channel::GYRO_Z, vec![1.0, 2.0, 3.0])
///     .unwrap();
///
/// assert_eq!(table.len(), 3);
/// assert_eq!(table.channel(channel::GYRO_Z), Some(&[1.0, 2.0, 3.0][..]));
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceTable {
    kind: DeviceKind,
    time: Vec<f64>,
    channels: HashMap<String, Vec<f64>>,
}

impl DeviceTable {
    /// Creates an empty generic table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table of the given kind.
    #[must_use]
    pub fn with_kind(kind: DeviceKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Creates a generic table over the given time axis.
    #[must_use]
    pub fn from_time(time: Vec<f64>) -> Self {
        Self {
            kind: DeviceKind::Generic,
            time,
            channels: HashMap::new(),
        }
    }

    /// Returns the table's kind tag.
    #[must_use]
    pub const fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Sets the table's kind tag.
    pub fn set_kind(&mut self, kind: DeviceKind) {
        self.kind = kind;
    }

    /// Returns the time axis in seconds.
    #[must_use]
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Replaces the time axis.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ChannelLengthMismatch`] if any existing
    /// channel's length differs from the new axis.
    pub fn set_time(&mut self, time: Vec<f64>) -> Result<(), SessionError> {
        for (name, values) in &self.channels {
            if values.len() != time.len() {
                return Err(SessionError::channel_length_mismatch(
                    name.clone(),
                    time.len(),
                    values.len(),
                ));
            }
        }
        self.time = time;
        Ok(())
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Returns true if the table has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Number of channels.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Inserts or replaces a channel.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ChannelLengthMismatch`] if the values'
    /// length differs from the time axis.
    pub fn insert_channel(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), SessionError> {
        let name = name.into();
        if values.len() != self.time.len() {
            return Err(SessionError::channel_length_mismatch(
                name,
                self.time.len(),
                values.len(),
            ));
        }
        self.channels.insert(name, values);
        Ok(())
    }

    /// Returns a channel by name.
    #[must_use]
    pub fn channel(&self, name: &str) -> Option<&[f64]> {
        self.channels.get(name).map(Vec::as_slice)
    }

    /// Returns a mutable channel by name.
    #[must_use]
    pub fn channel_mut(&mut self, name: &str) -> Option<&mut [f64]> {
        self.channels.get_mut(name).map(Vec::as_mut_slice)
    }

    /// Returns true if the channel exists.
    #[must_use]
    pub fn has_channel(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// Removes a channel, returning its values.
    pub fn remove_channel(&mut self, name: &str) -> Option<Vec<f64>> {
        self.channels.remove(name)
    }

    /// Renames a channel, replacing any channel already under the new name.
    ///
    /// Returns false (and changes nothing) if the old name does not exist.
    pub fn rename_channel(&mut self, old: &str, new: impl Into<String>) -> bool {
        match self.channels.remove(old) {
            Some(values) => {
                self.channels.insert(new.into(), values);
                true
            }
            None => false,
        }
    }

    /// Returns the channel names, sorted for deterministic iteration.
    #[must_use]
    pub fn channel_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.channels.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterates over `(name, values)` pairs in arbitrary order.
    pub fn channels(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.channels
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Returns true if the time axis is strictly increasing.
    ///
    /// Vacuously true for tables with fewer than two samples.
    #[must_use]
    pub fn is_time_strictly_increasing(&self) -> bool {
        self.time.windows(2).all(|pair| pair[0] < pair[1])
    }

    /// First and last timestamps, if any samples exist.
    #[must_use]
    pub fn time_range(&self) -> Option<(f64, f64)> {
        match (self.time.first(), self.time.last()) {
            (Some(&first), Some(&last)) => Some((first, last)),
            _ => None,
        }
    }

    /// Recording duration in seconds (zero for empty tables).
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.time_range().map_or(0.0, |(first, last)| last - first)
    }

    /// Estimates the sample frequency as the inverse mean time step.
    ///
    /// Returns `None` for tables with fewer than two samples or a
    /// non-positive time span.
    #[must_use]
    pub fn sample_frequency(&self) -> Option<f64> {
        let (first, last) = self.time_range()?;
        if self.time.len() < 2 || last <= first {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let steps = (self.time.len() - 1) as f64;
        Some(steps / (last - first))
    }

    /// Truncates the time axis and every channel to at most `len` samples.
    pub fn truncate(&mut self, len: usize) {
        self.time.truncate(len);
        for values in self.channels.values_mut() {
            values.truncate(len);
        }
    }

    /// Computes summary statistics.
    #[must_use]
    pub fn stats(&self) -> TableStats {
        TableStats {
            samples: self.len(),
            channels: self.channel_count(),
            start_time: self.time.first().copied(),
            end_time: self.time.last().copied(),
            sample_frequency: self.sample_frequency(),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::similar_names
)]
mod tests {
    use super::*;

    fn table_with_channel() -> DeviceTable {
        let mut table = DeviceTable::from_time(vec![0.0, 0.1, 0.2, 0.3]);
        table
            .insert_channel("gyroscope_z", vec![1.0, 2.0, 3.0, 4.0])
            .unwrap();
        table
    }

    #[test]
    fn table_new_is_empty_generic() {
        let table = DeviceTable::new();
        assert!(table.is_empty());
        assert_eq!(table.kind(), DeviceKind::Generic);
        assert_eq!(table.channel_count(), 0);
    }

    #[test]
    fn table_insert_and_read_channel() {
        let table = table_with_channel();
        assert_eq!(table.len(), 4);
        assert_eq!(table.channel("gyroscope_z").unwrap()[2], 3.0);
        assert!(table.channel("missing").is_none());
    }

    #[test]
    fn table_insert_rejects_wrong_length() {
        let mut table = DeviceTable::from_time(vec![0.0, 0.1]);
        let err = table.insert_channel("vel", vec![1.0]).unwrap_err();
        assert!(matches!(
            err,
            SessionError::ChannelLengthMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn table_set_time_checks_existing_channels() {
        let mut table = table_with_channel();
        assert!(table.set_time(vec![0.0, 0.1, 0.2]).is_err());
        assert!(table.set_time(vec![0.0, 0.1, 0.2, 0.3]).is_ok());
    }

    #[test]
    fn table_channel_mut_scales_in_place() {
        let mut table = table_with_channel();
        for value in table.channel_mut("gyroscope_z").unwrap() {
            *value *= 2.0;
        }
        assert_eq!(table.channel("gyroscope_z").unwrap()[0], 2.0);
    }

    #[test]
    fn table_rename_channel() {
        let mut table = table_with_channel();
        assert!(table.rename_channel("gyroscope_z", "gyroscope_y"));
        assert!(!table.has_channel("gyroscope_z"));
        assert!(table.has_channel("gyroscope_y"));
        assert!(!table.rename_channel("gyroscope_z", "gyroscope_x"));
    }

    #[test]
    fn table_channel_names_sorted() {
        let mut table = DeviceTable::from_time(vec![0.0]);
        table.insert_channel("b", vec![0.0]).unwrap();
        table.insert_channel("a", vec![0.0]).unwrap();
        table.insert_channel("c", vec![0.0]).unwrap();
        assert_eq!(table.channel_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn table_monotonic_time() {
        let table = table_with_channel();
        assert!(table.is_time_strictly_increasing());

        let unordered = DeviceTable::from_time(vec![0.0, 0.2, 0.1]);
        assert!(!unordered.is_time_strictly_increasing());

        let repeated = DeviceTable::from_time(vec![0.0, 0.1, 0.1]);
        assert!(!repeated.is_time_strictly_increasing());
    }

    #[test]
    fn table_sample_frequency() {
        let table = table_with_channel();
        let freq = table.sample_frequency().unwrap();
        assert!((freq - 10.0).abs() < 1e-9);

        assert!(DeviceTable::new().sample_frequency().is_none());
        assert!(DeviceTable::from_time(vec![1.0]).sample_frequency().is_none());
    }

    #[test]
    fn table_duration_and_range() {
        let table = table_with_channel();
        assert!((table.duration() - 0.3).abs() < 1e-12);
        assert_eq!(table.time_range(), Some((0.0, 0.3)));
        assert!(DeviceTable::new().time_range().is_none());
    }

    #[test]
    fn table_truncate_keeps_invariant() {
        let mut table = table_with_channel();
        table.truncate(2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.channel("gyroscope_z").unwrap().len(), 2);

        // Truncating past the end is a no-op.
        table.truncate(10);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn table_stats() {
        let stats = table_with_channel().stats();
        assert_eq!(stats.samples, 4);
        assert_eq!(stats.channels, 1);
        assert_eq!(stats.start_time, Some(0.0));
        assert_eq!(stats.end_time, Some(0.3));
        assert!((stats.sample_frequency.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn kind_tag_defaults_and_overrides() {
        assert_eq!(DeviceKind::default(), DeviceKind::Generic);

        let mut table = DeviceTable::with_kind(DeviceKind::Quaternion);
        assert_eq!(table.kind(), DeviceKind::Quaternion);
        table.set_kind(DeviceKind::RotationMatrix);
        assert_eq!(table.kind(), DeviceKind::RotationMatrix);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn table_serde_round_trip() {
        let table = table_with_channel();
        let json = serde_json::to_string(&table).unwrap();
        let parsed: DeviceTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), table.len());
        assert_eq!(
            parsed.channel("gyroscope_z").unwrap(),
            table.channel("gyroscope_z").unwrap()
        );
    }
}

//! Multi-device session container.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::device::DeviceId;
use crate::error::SessionError;
use crate::table::DeviceTable;

/// One recording session: a table per device.
///
/// The pipeline stages mutate sessions in place. Callers that need to keep
/// the unprocessed session clone it first; `SessionData` owns all of its
/// data, so `clone` is a deep copy.
///
/// # Example
///
/// ```
/// use propulsion_types::{channel, DeviceId, DeviceTable, SessionData};
///
/// let mut table = DeviceTable::from_time(vec![0.0, 0.01]);
/// table.insert_channel(channel::GYRO_Y, vec![10.0, 11.0]).unwrap();
///
/// let mut session = SessionData::new();
/// session.insert(DeviceId::Right, table);
///
/// let gyro = session
///     .require_channel(&DeviceId::Right, channel::GYRO_Y)
///     .unwrap();
/// assert_eq!(gyro.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionData {
    devices: HashMap<DeviceId, DeviceTable>,
}

impl SessionData {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a device table, returning any table it replaced.
    pub fn insert(&mut self, id: DeviceId, table: DeviceTable) -> Option<DeviceTable> {
        self.devices.insert(id, table)
    }

    /// Returns a device table by id.
    #[must_use]
    pub fn device(&self, id: &DeviceId) -> Option<&DeviceTable> {
        self.devices.get(id)
    }

    /// Returns a mutable device table by id.
    #[must_use]
    pub fn device_mut(&mut self, id: &DeviceId) -> Option<&mut DeviceTable> {
        self.devices.get_mut(id)
    }

    /// Returns a device table or an error naming the absent device.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingDevice`] if the device is not present.
    pub fn require(&self, id: &DeviceId) -> Result<&DeviceTable, SessionError> {
        self.devices
            .get(id)
            .ok_or_else(|| SessionError::missing_device(id.name()))
    }

    /// Mutable variant of [`SessionData::require`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingDevice`] if the device is not present.
    pub fn require_mut(&mut self, id: &DeviceId) -> Result<&mut DeviceTable, SessionError> {
        self.devices
            .get_mut(id)
            .ok_or_else(|| SessionError::missing_device(id.name()))
    }

    /// Returns a channel from a device, with full error context.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingDevice`] or
    /// [`SessionError::MissingChannel`].
    pub fn require_channel(&self, id: &DeviceId, channel: &str) -> Result<&[f64], SessionError> {
        self.require(id)?
            .channel(channel)
            .ok_or_else(|| SessionError::missing_channel(id.name(), channel))
    }

    /// Removes a device, returning its table.
    pub fn remove(&mut self, id: &DeviceId) -> Option<DeviceTable> {
        self.devices.remove(id)
    }

    /// Returns true if the device is present.
    #[must_use]
    pub fn contains(&self, id: &DeviceId) -> bool {
        self.devices.contains_key(id)
    }

    /// Number of devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns true if the session has no devices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Iterates over `(id, table)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&DeviceId, &DeviceTable)> {
        self.devices.iter()
    }

    /// Mutable variant of [`SessionData::iter`].
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&DeviceId, &mut DeviceTable)> {
        self.devices.iter_mut()
    }

    /// Returns the device ids, sorted by name for deterministic iteration.
    #[must_use]
    pub fn device_ids(&self) -> Vec<DeviceId> {
        let mut ids: Vec<DeviceId> = self.devices.keys().cloned().collect();
        ids.sort_unstable_by(|a, b| a.name().cmp(b.name()));
        ids
    }

    /// Latest final timestamp across all non-empty devices.
    #[must_use]
    pub fn end_time(&self) -> Option<f64> {
        self.devices
            .values()
            .filter_map(|table| table.time().last().copied())
            .fold(None, |acc, t| Some(acc.map_or(t, |max: f64| max.max(t))))
    }

    /// Truncates every device table to at most `len` samples.
    ///
    /// Useful for cutting the undefined tail after resampling devices of
    /// unequal duration onto a shared axis.
    pub fn truncate(&mut self, len: usize) {
        for table in self.devices.values_mut() {
            table.truncate(len);
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

    fn small_session() -> SessionData {
        let mut session = SessionData::new();
        for id in [DeviceId::Left, DeviceId::Right] {
            let mut table = DeviceTable::from_time(vec![0.0, 0.1, 0.2]);
            table
                .insert_channel("gyroscope_y", vec![1.0, 2.0, 3.0])
                .unwrap();
            session.insert(id, table);
        }
        session
    }

    #[test]
    fn session_insert_and_lookup() {
        let session = small_session();
        assert_eq!(session.len(), 2);
        assert!(session.contains(&DeviceId::Left));
        assert!(!session.contains(&DeviceId::Frame));
        assert!(session.device(&DeviceId::Right).is_some());
    }

    #[test]
    fn session_require_reports_missing_device() {
        let session = small_session();
        let err = session.require(&DeviceId::Frame).unwrap_err();
        assert!(matches!(err, SessionError::MissingDevice { .. }));
        assert!(format!("{err}").contains("frame"));
    }

    #[test]
    fn session_require_channel_reports_context() {
        let session = small_session();
        let err = session
            .require_channel(&DeviceId::Left, "accelerometer_x")
            .unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("left"));
        assert!(msg.contains("accelerometer_x"));

        let values = session
            .require_channel(&DeviceId::Left, "gyroscope_y")
            .unwrap();
        assert_eq!(values, &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn session_device_ids_sorted() {
        let mut session = small_session();
        session.insert(DeviceId::Frame, DeviceTable::new());
        let names: Vec<String> = session
            .device_ids()
            .iter()
            .map(|id| id.name().to_string())
            .collect();
        assert_eq!(names, vec!["frame", "left", "right"]);
    }

    #[test]
    fn session_end_time_is_max_across_devices() {
        let mut session = small_session();
        session.insert(
            DeviceId::Frame,
            DeviceTable::from_time(vec![0.0, 0.1, 0.2, 0.3, 0.4]),
        );
        assert!((session.end_time().unwrap() - 0.4).abs() < 1e-12);

        assert!(SessionData::new().end_time().is_none());
    }

    #[test]
    fn session_truncate_all_devices() {
        let mut session = small_session();
        session.truncate(1);
        for (_, table) in session.iter() {
            assert_eq!(table.len(), 1);
        }
    }

    #[test]
    fn session_clone_is_deep() {
        let session = small_session();
        let mut copy = session.clone();
        for value in copy
            .device_mut(&DeviceId::Left)
            .unwrap()
            .channel_mut("gyroscope_y")
            .unwrap()
        {
            *value = 0.0;
        }
        assert_eq!(
            session
                .require_channel(&DeviceId::Left, "gyroscope_y")
                .unwrap()[0],
            1.0
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn session_serde_round_trip() {
        let session = small_session();
        let json = serde_json::to_string(&session).unwrap();
        let parsed: SessionData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(
            parsed
                .require_channel(&DeviceId::Right, "gyroscope_y")
                .unwrap(),
            &[1.0, 2.0, 3.0]
        );
    }
}

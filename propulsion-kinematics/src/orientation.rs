//! Gyroscope axis relabeling for remounted wheel sensors.
//!
//! Moving a sensor from in-wheel to on-wheel mounting rotates its body
//! frame: the axis that used to measure wheel spin now measures something
//! else. The fix is pure bookkeeping, renaming the gyroscope channels and
//! restoring the right wheel's rotation sign convention. No numerics are
//! estimated here.

use serde::{Deserialize, Serialize};

use propulsion_types::{channel, DeviceId, SessionData, SessionError};

use crate::error::{KinematicsError, Result};

/// One gyroscope body axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// The x axis.
    X,
    /// The y axis.
    Y,
    /// The z axis.
    Z,
}

impl Axis {
    /// Canonical gyroscope channel name for this axis.
    #[must_use]
    pub const fn gyro_channel(self) -> &'static str {
        match self {
            Self::X => channel::GYRO_X,
            Self::Y => channel::GYRO_Y,
            Self::Z => channel::GYRO_Z,
        }
    }
}

/// Where each recorded gyroscope axis channel is relabeled to.
///
/// Field `x` names the destination for the channel recorded as
/// `gyroscope_x`, and so on. The default is [`AxisRemap::wheel_mount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisRemap {
    /// Destination axis for the recorded x channel.
    pub x: Axis,
    /// Destination axis for the recorded y channel.
    pub y: Axis,
    /// Destination axis for the recorded z channel.
    pub z: Axis,
}

impl AxisRemap {
    /// The in-wheel to on-wheel mounting rule: x becomes z, z becomes y,
    /// and y becomes x.
    #[must_use]
    pub const fn wheel_mount() -> Self {
        Self {
            x: Axis::Z,
            y: Axis::X,
            z: Axis::Y,
        }
    }

    /// The remap that leaves every channel in place.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            x: Axis::X,
            y: Axis::Y,
            z: Axis::Z,
        }
    }

    /// Returns true if every axis has a distinct destination.
    #[must_use]
    pub fn is_permutation(&self) -> bool {
        self.x != self.y && self.y != self.z && self.z != self.x
    }

    /// The inverse relabeling, which restores the original channel names.
    ///
    /// Only channel identity round-trips; the right wheel's sign flip is
    /// applied on every pass and is not undone.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let mut inverse = Self::identity();
        for (source, destination) in self.pairs() {
            match destination {
                Axis::X => inverse.x = source,
                Axis::Y => inverse.y = source,
                Axis::Z => inverse.z = source,
            }
        }
        inverse
    }

    const fn pairs(&self) -> [(Axis, Axis); 3] {
        [(Axis::X, self.x), (Axis::Y, self.y), (Axis::Z, self.z)]
    }
}

impl Default for AxisRemap {
    fn default() -> Self {
        Self::wheel_mount()
    }
}

/// Relabels the gyroscope channels on both wheel devices, then negates the
/// right wheel's post-remap `gyroscope_y` to restore the shared rotation
/// sign convention.
///
/// All three channels move simultaneously on each wheel, so cyclic remaps
/// cannot collide.
///
/// # Errors
///
/// Returns an error if the remap maps two axes to the same destination, or
/// if either wheel device or any of its three gyroscope channels is absent.
/// Presence is checked up front; on error the session is unchanged.
pub fn remap_wheel_orientation(session: &mut SessionData, remap: &AxisRemap) -> Result<()> {
    if !remap.is_permutation() {
        return Err(KinematicsError::invalid_axis_remap(format!(
            "{remap:?} sends two axes to the same channel"
        )));
    }

    let wheels = [DeviceId::Left, DeviceId::Right];
    for id in &wheels {
        let table = session.require(id)?;
        for name in channel::GYRO_AXES {
            if !table.has_channel(name) {
                return Err(SessionError::missing_channel(id.name(), name).into());
            }
        }
    }

    for id in &wheels {
        let table = session.require_mut(id)?;
        let mut moved = Vec::with_capacity(3);
        for (source, destination) in remap.pairs() {
            if let Some(values) = table.remove_channel(source.gyro_channel()) {
                moved.push((destination.gyro_channel(), values));
            }
        }
        for (name, values) in moved {
            table.insert_channel(name, values)?;
        }
    }

    if let Some(values) = session
        .require_mut(&DeviceId::Right)?
        .channel_mut(channel::GYRO_Y)
    {
        for value in values {
            *value = -*value;
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::similar_names
)]
mod tests {
    use propulsion_types::DeviceTable;

    use super::*;

    fn wheel_table() -> DeviceTable {
        let mut table = DeviceTable::from_time(vec![0.0, 0.1]);
        table.insert_channel(channel::GYRO_X, vec![1.0, 1.5]).unwrap();
        table.insert_channel(channel::GYRO_Y, vec![2.0, 2.5]).unwrap();
        table.insert_channel(channel::GYRO_Z, vec![3.0, 3.5]).unwrap();
        table
    }

    fn wheel_session() -> SessionData {
        let mut session = SessionData::new();
        session.insert(DeviceId::Left, wheel_table());
        session.insert(DeviceId::Right, wheel_table());
        session
    }

    #[test]
    fn wheel_mount_moves_channels_and_flips_right_y() {
        let mut session = wheel_session();
        remap_wheel_orientation(&mut session, &AxisRemap::wheel_mount()).unwrap();

        let right = session.device(&DeviceId::Right).unwrap();
        assert_eq!(right.channel(channel::GYRO_Z).unwrap(), &[1.0, 1.5]);
        assert_eq!(right.channel(channel::GYRO_X).unwrap(), &[2.0, 2.5]);
        assert_eq!(right.channel(channel::GYRO_Y).unwrap(), &[-3.0, -3.5]);

        // Only the right wheel changes sign.
        let left = session.device(&DeviceId::Left).unwrap();
        assert_eq!(left.channel(channel::GYRO_Y).unwrap(), &[3.0, 3.5]);
    }

    #[test]
    fn inverse_restores_channel_identity() {
        let mut session = wheel_session();
        let remap = AxisRemap::wheel_mount();
        remap_wheel_orientation(&mut session, &remap).unwrap();
        remap_wheel_orientation(&mut session, &remap.inverse()).unwrap();

        // The left wheel round-trips completely.
        let left = session.device(&DeviceId::Left).unwrap();
        assert_eq!(left.channel(channel::GYRO_X).unwrap(), &[1.0, 1.5]);
        assert_eq!(left.channel(channel::GYRO_Y).unwrap(), &[2.0, 2.5]);
        assert_eq!(left.channel(channel::GYRO_Z).unwrap(), &[3.0, 3.5]);

        // The right wheel recovers its names; the y flip lands on whatever
        // channel is called gyroscope_y on each pass, so y and z come back
        // negated while x is untouched.
        let right = session.device(&DeviceId::Right).unwrap();
        assert_eq!(right.channel(channel::GYRO_X).unwrap(), &[1.0, 1.5]);
        assert_eq!(right.channel(channel::GYRO_Y).unwrap(), &[-2.0, -2.5]);
        assert_eq!(right.channel(channel::GYRO_Z).unwrap(), &[-3.0, -3.5]);
    }

    #[test]
    fn inverse_permutations() {
        assert_eq!(
            AxisRemap::wheel_mount().inverse(),
            AxisRemap {
                x: Axis::Y,
                y: Axis::Z,
                z: Axis::X,
            }
        );
        assert_eq!(AxisRemap::identity().inverse(), AxisRemap::identity());
        assert!(AxisRemap::wheel_mount().is_permutation());
    }

    #[test]
    fn default_is_wheel_mount() {
        assert_eq!(AxisRemap::default(), AxisRemap::wheel_mount());
    }

    #[test]
    fn non_permutation_is_rejected() {
        let mut session = wheel_session();
        let degenerate = AxisRemap {
            x: Axis::X,
            y: Axis::X,
            z: Axis::Z,
        };
        let err = remap_wheel_orientation(&mut session, &degenerate).unwrap_err();
        assert!(matches!(err, KinematicsError::InvalidAxisRemap(_)));
    }

    #[test]
    fn missing_channel_leaves_session_unchanged() {
        let mut session = wheel_session();
        session
            .device_mut(&DeviceId::Right)
            .unwrap()
            .remove_channel(channel::GYRO_Z);

        let err = remap_wheel_orientation(&mut session, &AxisRemap::wheel_mount()).unwrap_err();
        assert!(matches!(
            err,
            KinematicsError::Session(SessionError::MissingChannel { .. })
        ));

        // Nothing was renamed on either wheel.
        let left = session.device(&DeviceId::Left).unwrap();
        assert_eq!(left.channel(channel::GYRO_X).unwrap(), &[1.0, 1.5]);
        let right = session.device(&DeviceId::Right).unwrap();
        assert_eq!(right.channel(channel::GYRO_Y).unwrap(), &[2.0, 2.5]);
    }

    #[test]
    fn missing_wheel_device_is_fatal() {
        let mut session = SessionData::new();
        session.insert(DeviceId::Right, wheel_table());

        let err = remap_wheel_orientation(&mut session, &AxisRemap::wheel_mount()).unwrap_err();
        assert!(matches!(
            err,
            KinematicsError::Session(SessionError::MissingDevice { .. })
        ));
    }

    #[test]
    fn remap_serde_round_trip() {
        let remap = AxisRemap::wheel_mount();
        let json = serde_json::to_string(&remap).unwrap();
        let parsed: AxisRemap = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, remap);
    }
}

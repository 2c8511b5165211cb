//! Sensor-set configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::device::DeviceId;

/// Which physical sensors a recording session carries.
///
/// The kinematics processor checks the configured set against the session
/// once, at entry; individual steps then index devices without re-checking.
///
/// # Example
///
/// ```
/// use propulsion_types::{DeviceId, SensorSet};
///
/// let set = SensorSet::RightWheelAndFrame;
/// assert_eq!(set.count(), 2);
/// assert!(set.has_frame());
/// assert!(!set.has_left_wheel());
/// assert_eq!(set.reference_device(), DeviceId::Frame);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SensorSet {
    /// A single sensor on the right wheel.
    RightWheel,
    /// Right wheel and frame sensors.
    RightWheelAndFrame,
    /// Left wheel, right wheel and frame sensors.
    #[default]
    BothWheelsAndFrame,
}

impl SensorSet {
    /// Number of sensors in the set.
    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            Self::RightWheel => 1,
            Self::RightWheelAndFrame => 2,
            Self::BothWheelsAndFrame => 3,
        }
    }

    /// Resolves a sensor count (1, 2 or 3) to a set.
    #[must_use]
    pub const fn from_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(Self::RightWheel),
            2 => Some(Self::RightWheelAndFrame),
            3 => Some(Self::BothWheelsAndFrame),
            _ => None,
        }
    }

    /// Returns true if the set includes a frame sensor.
    #[must_use]
    pub const fn has_frame(self) -> bool {
        !matches!(self, Self::RightWheel)
    }

    /// Returns true if the set includes a left wheel sensor.
    #[must_use]
    pub const fn has_left_wheel(self) -> bool {
        matches!(self, Self::BothWheelsAndFrame)
    }

    /// Devices a session must contain for this set.
    #[must_use]
    pub fn required_devices(self) -> Vec<DeviceId> {
        match self {
            Self::RightWheel => vec![DeviceId::Right],
            Self::RightWheelAndFrame => vec![DeviceId::Right, DeviceId::Frame],
            Self::BothWheelsAndFrame => {
                vec![DeviceId::Left, DeviceId::Right, DeviceId::Frame]
            }
        }
    }

    /// The device that anchors frame-level outputs: yaw rate, forward
    /// acceleration and the shared time base.
    ///
    /// With a frame sensor present that is the frame; a single-sensor setup
    /// falls back to the right wheel.
    #[must_use]
    pub const fn reference_device(self) -> DeviceId {
        match self {
            Self::RightWheel => DeviceId::Right,
            Self::RightWheelAndFrame | Self::BothWheelsAndFrame => DeviceId::Frame,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn sensor_set_counts() {
        assert_eq!(SensorSet::RightWheel.count(), 1);
        assert_eq!(SensorSet::RightWheelAndFrame.count(), 2);
        assert_eq!(SensorSet::BothWheelsAndFrame.count(), 3);
    }

    #[test]
    fn sensor_set_from_count_round_trip() {
        for set in [
            SensorSet::RightWheel,
            SensorSet::RightWheelAndFrame,
            SensorSet::BothWheelsAndFrame,
        ] {
            assert_eq!(SensorSet::from_count(set.count()), Some(set));
        }
        assert_eq!(SensorSet::from_count(0), None);
        assert_eq!(SensorSet::from_count(4), None);
    }

    #[test]
    fn sensor_set_default_is_full() {
        assert_eq!(SensorSet::default(), SensorSet::BothWheelsAndFrame);
    }

    #[test]
    fn sensor_set_required_devices() {
        assert_eq!(
            SensorSet::RightWheel.required_devices(),
            vec![DeviceId::Right]
        );
        let full = SensorSet::BothWheelsAndFrame.required_devices();
        assert!(full.contains(&DeviceId::Left));
        assert!(full.contains(&DeviceId::Right));
        assert!(full.contains(&DeviceId::Frame));
    }

    #[test]
    fn sensor_set_reference_device() {
        assert_eq!(SensorSet::RightWheel.reference_device(), DeviceId::Right);
        assert_eq!(
            SensorSet::RightWheelAndFrame.reference_device(),
            DeviceId::Frame
        );
        assert_eq!(
            SensorSet::BothWheelsAndFrame.reference_device(),
            DeviceId::Frame
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn sensor_set_serde_round_trip() {
        let json = serde_json::to_string(&SensorSet::RightWheelAndFrame).unwrap();
        let parsed: SensorSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, SensorSet::RightWheelAndFrame);
    }
}

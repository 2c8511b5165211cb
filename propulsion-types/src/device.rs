//! Device identity within a session.

use std::fmt;

/// Identifies one sensor device in a recording session.
///
/// The propulsion pipeline knows three devices by role; anything else
/// (an ergometer, a trunk sensor) travels as [`DeviceId::Other`].
///
/// # Example
///
/// ```
/// use propulsion_types::DeviceId;
///
/// assert_eq!(DeviceId::Right.name(), "right");
/// assert_eq!(DeviceId::from_name("frame"), DeviceId::Frame);
/// assert_eq!(DeviceId::from_name("ergometer"), DeviceId::other("ergometer"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceId {
    /// Left wheel hub sensor.
    Left,
    /// Right wheel hub sensor.
    Right,
    /// Frame (chassis) sensor.
    Frame,
    /// Any other device, identified by name.
    Other(String),
}

impl DeviceId {
    /// Returns the canonical name of this device.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Frame => "frame",
            Self::Other(name) => name,
        }
    }

    /// Creates a [`DeviceId::Other`] device.
    #[must_use]
    pub fn other(name: impl Into<String>) -> Self {
        Self::Other(name.into())
    }

    /// Resolves a canonical name back to a device id.
    ///
    /// Unrecognized names become [`DeviceId::Other`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "left" => Self::Left,
            "right" => Self::Right,
            "frame" => Self::Frame,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns true for the wheel-mounted devices.
    #[must_use]
    pub const fn is_wheel(&self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Serialized as the canonical name so device ids can key JSON maps.
#[cfg(feature = "serde")]
impl serde::Serialize for DeviceId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DeviceId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn device_names() {
        assert_eq!(DeviceId::Left.name(), "left");
        assert_eq!(DeviceId::Right.name(), "right");
        assert_eq!(DeviceId::Frame.name(), "frame");
        assert_eq!(DeviceId::other("trunk").name(), "trunk");
    }

    #[test]
    fn device_from_name_round_trip() {
        for id in [
            DeviceId::Left,
            DeviceId::Right,
            DeviceId::Frame,
            DeviceId::other("ergometer"),
        ] {
            assert_eq!(DeviceId::from_name(id.name()), id);
        }
    }

    #[test]
    fn device_is_wheel() {
        assert!(DeviceId::Left.is_wheel());
        assert!(DeviceId::Right.is_wheel());
        assert!(!DeviceId::Frame.is_wheel());
        assert!(!DeviceId::other("trunk").is_wheel());
    }

    #[test]
    fn device_display() {
        assert_eq!(format!("{}", DeviceId::Frame), "frame");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn device_serde_as_name() {
        let json = serde_json::to_string(&DeviceId::Right).unwrap();
        assert_eq!(json, "\"right\"");

        let parsed: DeviceId = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(parsed, DeviceId::Left);

        let parsed: DeviceId = serde_json::from_str("\"ergometer\"").unwrap();
        assert_eq!(parsed, DeviceId::other("ergometer"));
    }
}

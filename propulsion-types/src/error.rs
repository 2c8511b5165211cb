//! Error types for session data operations.

use thiserror::Error;

/// Errors that can occur when working with session data.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A device required by the operation is not present in the session.
    #[error("missing device: {device}")]
    MissingDevice {
        /// Name of the absent device.
        device: String,
    },

    /// A channel required by the operation is not present on a device.
    #[error("missing channel: {device}/{channel}")]
    MissingChannel {
        /// Device that was inspected.
        device: String,
        /// Name of the absent channel.
        channel: String,
    },

    /// A channel's length does not match the table's time axis.
    #[error("channel length mismatch: {channel} has {actual} samples, expected {expected}")]
    ChannelLengthMismatch {
        /// Channel that was inserted or resized.
        channel: String,
        /// Length of the time axis.
        expected: usize,
        /// Length of the offending channel.
        actual: usize,
    },

    /// A device table has no samples where the operation needs at least one.
    #[error("empty table: {device}")]
    EmptyTable {
        /// Device whose table is empty.
        device: String,
    },

    /// A device's time axis is not strictly increasing.
    #[error("non-monotonic time axis on device: {device}")]
    NonMonotonicTime {
        /// Device with the invalid time axis.
        device: String,
    },

    /// Two devices that must share a time axis have different lengths.
    #[error("device length mismatch: {device} has {actual} samples, expected {expected}")]
    DeviceLengthMismatch {
        /// Device with the unexpected length.
        device: String,
        /// Length of the reference device.
        expected: usize,
        /// Length of the offending device.
        actual: usize,
    },
}

impl SessionError {
    /// Creates a missing device error.
    #[must_use]
    pub fn missing_device(device: impl Into<String>) -> Self {
        Self::MissingDevice {
            device: device.into(),
        }
    }

    /// Creates a missing channel error.
    #[must_use]
    pub fn missing_channel(device: impl Into<String>, channel: impl Into<String>) -> Self {
        Self::MissingChannel {
            device: device.into(),
            channel: channel.into(),
        }
    }

    /// Creates a channel length mismatch error.
    #[must_use]
    pub fn channel_length_mismatch(
        channel: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::ChannelLengthMismatch {
            channel: channel.into(),
            expected,
            actual,
        }
    }

    /// Creates an empty table error.
    #[must_use]
    pub fn empty_table(device: impl Into<String>) -> Self {
        Self::EmptyTable {
            device: device.into(),
        }
    }

    /// Creates a non-monotonic time error.
    #[must_use]
    pub fn non_monotonic_time(device: impl Into<String>) -> Self {
        Self::NonMonotonicTime {
            device: device.into(),
        }
    }

    /// Creates a device length mismatch error.
    #[must_use]
    pub fn device_length_mismatch(
        device: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::DeviceLengthMismatch {
            device: device.into(),
            expected,
            actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_missing_device() {
        let err = SessionError::missing_device("frame");
        let msg = format!("{err}");
        assert!(msg.contains("missing device"));
        assert!(msg.contains("frame"));
    }

    #[test]
    fn error_missing_channel() {
        let err = SessionError::missing_channel("right", "gyroscope_y");
        let msg = format!("{err}");
        assert!(msg.contains("right"));
        assert!(msg.contains("gyroscope_y"));
    }

    #[test]
    fn error_channel_length_mismatch() {
        let err = SessionError::channel_length_mismatch("vel", 100, 99);
        let msg = format!("{err}");
        assert!(msg.contains("100"));
        assert!(msg.contains("99"));
    }

    #[test]
    fn error_non_monotonic_time() {
        let err = SessionError::non_monotonic_time("left");
        let msg = format!("{err}");
        assert!(msg.contains("non-monotonic"));
        assert!(msg.contains("left"));
    }
}

//! Error types for the kinematics pipeline.

use propulsion_signal::SignalError;
use propulsion_types::SessionError;
use thiserror::Error;

/// Errors that can occur in the propulsion kinematics pipeline.
#[derive(Debug, Error)]
pub enum KinematicsError {
    /// Structural problem with the session data.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A numerical primitive rejected its input.
    #[error(transparent)]
    Signal(#[from] SignalError),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Axis remap does not permute the three gyroscope axes.
    #[error("invalid axis remap: {0}")]
    InvalidAxisRemap(String),

    /// Insufficient data for the operation.
    #[error("insufficient data: {0}")]
    InsufficientData(String),
}

impl KinematicsError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Creates an invalid axis remap error.
    #[must_use]
    pub fn invalid_axis_remap(reason: impl Into<String>) -> Self {
        Self::InvalidAxisRemap(reason.into())
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(reason: impl Into<String>) -> Self {
        Self::InsufficientData(reason.into())
    }
}

/// Result type for kinematics operations.
pub type Result<T> = std::result::Result<T, KinematicsError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn error_wraps_session_errors() {
        let err: KinematicsError = SessionError::missing_device("frame").into();
        assert!(err.to_string().contains("missing device"));
        assert!(matches!(err, KinematicsError::Session(_)));
    }

    #[test]
    fn error_wraps_signal_errors() {
        let err: KinematicsError = SignalError::invalid_sample_rate(0.0).into();
        assert!(err.to_string().contains("invalid sample rate"));
        assert!(matches!(err, KinematicsError::Signal(_)));
    }

    #[test]
    fn error_invalid_config() {
        let err = KinematicsError::invalid_config("wheel radius must be positive");
        assert!(err.to_string().contains("invalid configuration"));
    }

    #[test]
    fn error_invalid_axis_remap() {
        let err = KinematicsError::invalid_axis_remap("two axes map to z");
        assert!(err.to_string().contains("invalid axis remap"));
    }
}

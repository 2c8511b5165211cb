//! Error types for signal operations.

use thiserror::Error;

/// Errors that can occur in signal-processing operations.
#[derive(Debug, Error)]
pub enum SignalError {
    /// Sample rate is zero, negative or not finite.
    #[error("invalid sample rate: {rate} Hz")]
    InvalidSampleRate {
        /// The offending rate.
        rate: f64,
    },

    /// Filter cutoff outside the open interval (0, Nyquist).
    #[error("invalid cutoff: {cutoff} Hz not in (0, {nyquist}) Hz")]
    InvalidCutoff {
        /// Requested cutoff frequency.
        cutoff: f64,
        /// Nyquist frequency for the given sample rate.
        nyquist: f64,
    },

    /// Input has too few samples for the operation.
    #[error("signal too short: {len} samples, need at least {min}")]
    TooShort {
        /// Actual number of samples.
        len: usize,
        /// Minimum required.
        min: usize,
    },

    /// Paired inputs have different lengths.
    #[error("length mismatch: {expected} vs {actual}")]
    LengthMismatch {
        /// Length of the first input.
        expected: usize,
        /// Length of the second input.
        actual: usize,
    },
}

impl SignalError {
    /// Creates an invalid sample rate error.
    #[must_use]
    pub const fn invalid_sample_rate(rate: f64) -> Self {
        Self::InvalidSampleRate { rate }
    }

    /// Creates an invalid cutoff error.
    #[must_use]
    pub const fn invalid_cutoff(cutoff: f64, nyquist: f64) -> Self {
        Self::InvalidCutoff { cutoff, nyquist }
    }

    /// Creates a too-short error.
    #[must_use]
    pub const fn too_short(len: usize, min: usize) -> Self {
        Self::TooShort { len, min }
    }

    /// Creates a length mismatch error.
    #[must_use]
    pub const fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::LengthMismatch { expected, actual }
    }
}

/// Result type for signal operations.
pub type Result<T> = std::result::Result<T, SignalError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_sample_rate() {
        let err = SignalError::invalid_sample_rate(0.0);
        assert!(err.to_string().contains("invalid sample rate"));
    }

    #[test]
    fn error_invalid_cutoff() {
        let err = SignalError::invalid_cutoff(250.0, 200.0);
        let msg = err.to_string();
        assert!(msg.contains("250"));
        assert!(msg.contains("200"));
    }

    #[test]
    fn error_too_short() {
        let err = SignalError::too_short(3, 10);
        assert!(err.to_string().contains('3'));
        assert!(err.to_string().contains("10"));
    }

    #[test]
    fn error_length_mismatch() {
        let err = SignalError::length_mismatch(5, 4);
        assert!(err.to_string().contains("length mismatch"));
    }
}

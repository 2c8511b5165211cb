//! Session resampling onto a shared uniform time axis.
//!
//! Devices in a recording rarely share a clock: each sensor logs at its own
//! rate and stops at its own time. Everything downstream (camber correction,
//! skid blending) needs sample-aligned channels, so the first pipeline stage
//! interpolates every device onto one axis.

// Casts: axis sample counts are small positive integers well inside both
// f64's exact integer range and usize.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use std::fmt;

use propulsion_signal::resample_linear;
use propulsion_types::{DeviceId, DeviceKind, DeviceTable, SessionData, SessionError};
use tracing::{info, warn};

use crate::error::{KinematicsError, Result};

/// Outcome summary of [`resample_session`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResampleReport {
    /// Number of samples on the shared axis.
    pub samples: usize,

    /// Step frequency of the shared axis in Hz.
    pub sample_frequency: f64,

    /// Devices removed because their kind cannot be interpolated.
    pub dropped: Vec<DeviceId>,
}

impl ResampleReport {
    /// Returns true if every device survived resampling.
    #[must_use]
    pub fn all_resampled(&self) -> bool {
        self.dropped.is_empty()
    }
}

impl fmt::Display for ResampleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "resampled to {} samples at {} Hz",
            self.samples, self.sample_frequency
        )?;
        if !self.dropped.is_empty() {
            write!(f, ", dropped {} device(s)", self.dropped.len())?;
        }
        Ok(())
    }
}

/// Resamples every device in the session onto a shared uniform time axis.
///
/// The axis starts at zero and steps at `1 / target_hz`, ending just short
/// of the latest timestamp across devices (the endpoint is excluded). Each
/// device is handled according to its [`DeviceKind`]:
///
/// - `Generic`: per-channel linear interpolation.
/// - `Quaternion`: linear interpolation, then every sample row of the
///   component channels is renormalized to unit length. Rows with a
///   vanishing or undefined norm keep their interpolated values.
/// - `RotationMatrix`: component-wise interpolation would break
///   orthonormality, so the device is removed; the drop is logged and
///   recorded in the report.
///
/// Axis points past a device's recorded span become `NaN` rather than being
/// extrapolated. Callers that need a rectangular session can cut the tail
/// with [`SessionData::truncate`].
///
/// # Errors
///
/// Returns an error if `target_hz` is not positive and finite, the session
/// has no devices, or any device table is empty, has fewer than two
/// samples, or has a time axis that is not strictly increasing.
///
/// # Example
///
/// ```
/// use propulsion_kinematics::resample_session;
/// use propulsion_types::{channel, DeviceId, DeviceTable, SessionData};
///
/// let time: Vec<f64> = (0..100).map(|i| f64::from(i) * 0.01).collect();
/// let mut table = DeviceTable::from_time(time);
/// table.insert_channel(channel::GYRO_Z, vec![5.0; 100]).unwrap();
///
/// let mut session = SessionData::new();
/// session.insert(DeviceId::Frame, table);
///
/// let report = resample_session(&mut session, 50.0).unwrap();
/// assert_eq!(report.samples, 50);
/// ```
pub fn resample_session(session: &mut SessionData, target_hz: f64) -> Result<ResampleReport> {
    if !target_hz.is_finite() || target_hz <= 0.0 {
        return Err(KinematicsError::invalid_config(format!(
            "target sample frequency must be positive and finite, got {target_hz} Hz"
        )));
    }
    if session.is_empty() {
        return Err(KinematicsError::insufficient_data(
            "session has no devices to resample",
        ));
    }

    // Validate every table before mutating any of them.
    let ids = session.device_ids();
    for id in &ids {
        let table = session.require(id)?;
        if table.is_empty() {
            return Err(SessionError::empty_table(id.name()).into());
        }
        if table.len() < 2 {
            return Err(KinematicsError::insufficient_data(format!(
                "device '{id}' has a single sample; interpolation needs at least two"
            )));
        }
        if !table.is_time_strictly_increasing() {
            return Err(SessionError::non_monotonic_time(id.name()).into());
        }
    }

    let end = session
        .end_time()
        .ok_or_else(|| KinematicsError::insufficient_data("session has no samples"))?;
    let step = 1.0 / target_hz;
    let samples = (end / step).ceil() as usize;
    let new_time: Vec<f64> = (0..samples).map(|i| i as f64 * step).collect();

    info!(
        devices = ids.len(),
        target_hz, samples, "resampling session onto shared axis"
    );

    let mut dropped = Vec::new();
    for id in ids {
        let Some(table) = session.remove(&id) else {
            continue;
        };
        if table.kind() == DeviceKind::RotationMatrix {
            warn!(device = %id, "rotation matrices cannot be interpolated; device dropped");
            dropped.push(id);
            continue;
        }
        let resampled = resample_table(&table, &new_time)?;
        session.insert(id, resampled);
    }

    Ok(ResampleReport {
        samples,
        sample_frequency: target_hz,
        dropped,
    })
}

fn resample_table(table: &DeviceTable, new_time: &[f64]) -> Result<DeviceTable> {
    let mut out = DeviceTable::from_time(new_time.to_vec());
    out.set_kind(table.kind());
    for name in table.channel_names() {
        let Some(values) = table.channel(name) else {
            continue;
        };
        let resampled = resample_linear(table.time(), values, new_time)?;
        out.insert_channel(name, resampled)?;
    }
    if table.kind() == DeviceKind::Quaternion {
        renormalize_rows(&mut out);
    }
    Ok(out)
}

/// Scales each sample row of a quaternion table back to unit length.
///
/// Linear interpolation between unit quaternions lands inside the unit
/// sphere. Rows whose norm is not finite (the `NaN` tail of a short device)
/// or vanishingly small are left as interpolated.
fn renormalize_rows(table: &mut DeviceTable) {
    let names: Vec<String> = table
        .channel_names()
        .iter()
        .map(ToString::to_string)
        .collect();

    let mut norms = vec![0.0_f64; table.len()];
    for name in &names {
        if let Some(values) = table.channel(name) {
            for (norm, value) in norms.iter_mut().zip(values) {
                *norm = value.mul_add(*value, *norm);
            }
        }
    }
    for norm in &mut norms {
        *norm = norm.sqrt();
    }

    for name in &names {
        if let Some(values) = table.channel_mut(name) {
            for (value, &norm) in values.iter_mut().zip(&norms) {
                if norm.is_finite() && norm > f64::EPSILON {
                    *value /= norm;
                }
            }
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
    use approx::assert_relative_eq;

    use super::*;

    fn ramp_table(samples: usize, step: f64) -> DeviceTable {
        let time: Vec<f64> = (0..samples).map(|i| i as f64 * step).collect();
        let values: Vec<f64> = (0..samples).map(|i| i as f64 * 0.5).collect();
        let mut table = DeviceTable::from_time(time);
        table.insert_channel("gyroscope_z", values).unwrap();
        table
    }

    #[test]
    fn resample_is_idempotent_at_native_rate() {
        let mut session = SessionData::new();
        session.insert(DeviceId::Frame, ramp_table(11, 0.1));

        let report = resample_session(&mut session, 10.0).unwrap();

        // The endpoint is excluded, so the axis covers the original's first
        // ten samples exactly.
        assert_eq!(report.samples, 10);
        let resampled = session
            .require_channel(&DeviceId::Frame, "gyroscope_z")
            .unwrap();
        for (i, value) in resampled.iter().enumerate() {
            assert_relative_eq!(*value, i as f64 * 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn short_device_gets_nan_tail() {
        let mut session = SessionData::new();
        let mut short = DeviceTable::from_time((0..6).map(|i| i as f64 * 0.1).collect());
        short.insert_channel("vel", vec![7.0; 6]).unwrap();
        session.insert(DeviceId::Left, short);
        session.insert(DeviceId::Right, ramp_table(11, 0.1));

        resample_session(&mut session, 10.0).unwrap();

        let vel = session.require_channel(&DeviceId::Left, "vel").unwrap();
        assert_eq!(vel.len(), 10);
        assert_eq!(vel[5], 7.0);
        assert!(vel[6].is_nan());
        assert!(vel[9].is_nan());
    }

    #[test]
    fn quaternion_rows_renormalized() {
        let mut quat = DeviceTable::from_time(vec![0.0, 0.5, 1.0]);
        quat.set_kind(DeviceKind::Quaternion);
        quat.insert_channel("w", vec![3.0; 3]).unwrap();
        quat.insert_channel("x", vec![4.0; 3]).unwrap();

        let mut session = SessionData::new();
        session.insert(DeviceId::other("quaternion"), quat);
        session.insert(DeviceId::Frame, ramp_table(5, 0.5));

        resample_session(&mut session, 2.0).unwrap();

        let id = DeviceId::other("quaternion");
        let table = session.device(&id).unwrap();
        assert_eq!(table.kind(), DeviceKind::Quaternion);
        let w = table.channel("w").unwrap();
        let x = table.channel("x").unwrap();
        assert_relative_eq!(w[0], 0.6, epsilon = 1e-12);
        assert_relative_eq!(x[0], 0.8, epsilon = 1e-12);
        assert_relative_eq!(w[2], 0.6, epsilon = 1e-12);
        // Past the quaternion device's span the rows stay NaN.
        assert!(w[3].is_nan());
        assert!(x[3].is_nan());
    }

    #[test]
    fn rotation_matrix_device_dropped_with_report() {
        let mut matrix = DeviceTable::from_time(vec![0.0, 0.1]);
        matrix.set_kind(DeviceKind::RotationMatrix);
        matrix.insert_channel("m00", vec![1.0, 1.0]).unwrap();

        let matrix_id = DeviceId::other("matrix");
        let mut session = SessionData::new();
        session.insert(matrix_id.clone(), matrix);
        session.insert(DeviceId::Right, ramp_table(11, 0.1));

        let report = resample_session(&mut session, 10.0).unwrap();

        assert!(!session.contains(&matrix_id));
        assert!(session.contains(&DeviceId::Right));
        assert_eq!(report.dropped, vec![matrix_id]);
        assert!(!report.all_resampled());
        assert!(format!("{report}").contains("dropped 1 device"));
    }

    #[test]
    fn report_display_without_drops() {
        let report = ResampleReport {
            samples: 200,
            sample_frequency: 100.0,
            dropped: Vec::new(),
        };
        assert!(report.all_resampled());
        assert_eq!(format!("{report}"), "resampled to 200 samples at 100 Hz");
    }

    #[test]
    fn non_monotonic_time_is_rejected() {
        let mut table = DeviceTable::from_time(vec![0.0, 0.2, 0.1]);
        table.insert_channel("vel", vec![1.0, 2.0, 3.0]).unwrap();
        let mut session = SessionData::new();
        session.insert(DeviceId::Right, table);

        let err = resample_session(&mut session, 10.0).unwrap_err();
        assert!(matches!(
            err,
            KinematicsError::Session(SessionError::NonMonotonicTime { .. })
        ));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let mut empty = SessionData::new();
        assert!(matches!(
            resample_session(&mut empty, 10.0),
            Err(KinematicsError::InsufficientData(_))
        ));

        let mut session = SessionData::new();
        session.insert(DeviceId::Right, DeviceTable::new());
        assert!(matches!(
            resample_session(&mut session, 10.0),
            Err(KinematicsError::Session(SessionError::EmptyTable { .. }))
        ));

        let mut session = SessionData::new();
        session.insert(DeviceId::Right, DeviceTable::from_time(vec![0.0]));
        assert!(matches!(
            resample_session(&mut session, 10.0),
            Err(KinematicsError::InsufficientData(_))
        ));
    }

    #[test]
    fn invalid_target_rate_is_rejected() {
        let mut session = SessionData::new();
        session.insert(DeviceId::Right, ramp_table(11, 0.1));

        for bad in [0.0, -5.0, f64::NAN] {
            assert!(matches!(
                resample_session(&mut session, bad),
                Err(KinematicsError::InvalidConfig(_))
            ));
        }
    }
}

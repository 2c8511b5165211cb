//! Whole-session wheelchair kinematics.
//!
//! Turns camber-corrected wheel rotation rates into linear velocity,
//! distance, frame rotation, 2-D displacement, and skid-corrected frame
//! velocity. Channels are read from and written back into the session, so
//! the enriched tables can be handed straight to downstream consumers.
//!
//! Wheel-skid correction follows Van der Slikke et al., "Wheel skid
//! correction is a prerequisite to reliably measure wheelchair sports
//! kinematics based on inertial sensors", Procedia Engineering 112.

use propulsion_signal::{cumulative_trapezoid, gradient, lowpass_filter};
use propulsion_types::{channel, DeviceId, SessionData, SessionError};
use tracing::info;

use crate::error::{KinematicsError, Result};
use crate::params::{AccelerometerUnits, ProcessConfig};

/// Standard gravity in m/s², for accelerometers recorded in g.
const STANDARD_GRAVITY: f64 = 9.81;

/// Cutoff for smoothing rotational and linear velocity, Hz.
const VELOCITY_CUTOFF_HZ: f64 = 10.0;

/// Cutoff for smoothing acceleration and the skid blend weight, Hz.
const ACCELERATION_CUTOFF_HZ: f64 = 20.0;

/// Derives the kinematic channels for a resampled session, in place.
///
/// Wheel devices receive `gyro_cor`, `vel`, and `dist`. The reference
/// device (the frame when the sensor set has one, otherwise the right
/// wheel) receives the session-level channels: the corrected rotation
/// rate, smoothed rotational and linear velocity, travelled and 2-D
/// decomposed distance, accelerations, and the skid-corrected velocity
/// and distance. Gyroscope channels are expected in degrees per second.
///
/// With a single right-wheel sensor the wheel and reference tables are the
/// same; the smoothed session-level `vel` then replaces the wheel's raw
/// `vel` (the skid channels are still derived from the raw values).
///
/// # Errors
///
/// Returns an error if the configuration is invalid, a device required by
/// `config.sensors` is absent, a required channel (`gyroscope_y` on
/// wheels, `gyroscope_z` and `accelerometer_x` on the reference) is
/// absent, the required tables differ in length, or the session is too
/// short to filter.
///
/// # Example
///
/// ```
/// use propulsion_kinematics::{process_session, ProcessConfig};
/// use propulsion_types::{channel, DeviceId, DeviceTable, SensorSet, SessionData};
///
/// let time: Vec<f64> = (0..64).map(|i| f64::from(i) * 0.01).collect();
/// let mut right = DeviceTable::from_time(time);
/// right.insert_channel(channel::GYRO_Y, vec![90.0; 64]).unwrap();
/// right.insert_channel(channel::GYRO_Z, vec![0.0; 64]).unwrap();
/// right.insert_channel(channel::ACCEL_X, vec![0.0; 64]).unwrap();
///
/// let mut session = SessionData::new();
/// session.insert(DeviceId::Right, right);
///
/// let config = ProcessConfig::default().with_sensors(SensorSet::RightWheel);
/// process_session(&mut session, &config).unwrap();
///
/// let dist = session.require_channel(&DeviceId::Right, channel::DIST).unwrap();
/// assert!(dist.last().unwrap() > &0.0);
/// ```
#[allow(clippy::too_many_lines)]
pub fn process_session(session: &mut SessionData, config: &ProcessConfig) -> Result<()> {
    config.validate()?;

    let sensors = config.sensors;
    let reference = sensors.reference_device();

    // Presence and alignment checks up front; nothing is written until the
    // whole device set is known to be usable.
    let expected = session.require(&reference)?.len();
    for id in sensors.required_devices() {
        let len = session.require(&id)?.len();
        if len != expected {
            return Err(SessionError::device_length_mismatch(id.name(), expected, len).into());
        }
    }
    session.require_channel(&reference, channel::GYRO_Z)?;
    session.require_channel(&reference, channel::ACCEL_X)?;
    session.require_channel(&DeviceId::Right, channel::GYRO_Y)?;
    if sensors.has_left_wheel() {
        session.require_channel(&DeviceId::Left, channel::GYRO_Y)?;
    }

    let sample_rate = session
        .require(&reference)?
        .sample_frequency()
        .ok_or_else(|| {
            KinematicsError::insufficient_data(format!(
                "device '{reference}' needs at least two samples with increasing time"
            ))
        })?;
    let dt = 1.0 / sample_rate;

    info!(
        sensors = sensors.count(),
        sample_rate,
        camber_deg = config.camber_deg,
        "deriving session kinematics"
    );

    let ref_gyro_z = session
        .require_channel(&reference, channel::GYRO_Z)?
        .to_vec();

    // Camber correction: the leaned wheel's spin axis picks up a component
    // of the frame's yaw rate; the right wheel adds the coupling term, the
    // left subtracts it.
    let camber = config.camber_deg.to_radians();
    let tan_camber = camber.tan();
    let cos_camber = camber.cos();
    let camber_term: Vec<f64> = ref_gyro_z
        .iter()
        .map(|gz| tan_camber * (gz * cos_camber))
        .collect();

    let right_gyro_cor: Vec<f64> = session
        .require_channel(&DeviceId::Right, channel::GYRO_Y)?
        .iter()
        .zip(&camber_term)
        .map(|(gy, term)| gy + term)
        .collect();
    let left_gyro_cor: Option<Vec<f64>> = if sensors.has_left_wheel() {
        let corrected = session
            .require_channel(&DeviceId::Left, channel::GYRO_Y)?
            .iter()
            .zip(&camber_term)
            .map(|(gy, term)| gy - term)
            .collect();
        Some(corrected)
    } else {
        None
    };
    let ref_gyro_cor = match &left_gyro_cor {
        Some(left) => elementwise_mean(&right_gyro_cor, left),
        None => right_gyro_cor.clone(),
    };

    // Frame rotation: smoothed yaw rate, cumulative rotation magnitude,
    // rotational acceleration.
    let rot_vel = lowpass_filter(&ref_gyro_z, sample_rate, VELOCITY_CUTOFF_HZ)?;
    let rot_vel_abs: Vec<f64> = rot_vel.iter().map(|v| v.abs()).collect();
    let rot = cumulative_trapezoid(&rot_vel_abs, dt);
    let rot_acc = scaled_gradient(&rot_vel, sample_rate);

    // Wheel rotation rate to rim velocity and travelled distance.
    let right_vel = wheel_velocity(&right_gyro_cor, config.wheel_radius_m);
    let right_dist = cumulative_trapezoid(&right_vel, dt);
    let left_vel = left_gyro_cor
        .as_ref()
        .map(|cor| wheel_velocity(cor, config.wheel_radius_m));
    let left_dist = left_vel.as_ref().map(|vel| cumulative_trapezoid(vel, dt));

    let ref_vel_raw = match &left_vel {
        Some(left) => elementwise_mean(&right_vel, left),
        None => right_vel.clone(),
    };
    let ref_dist = match &left_dist {
        Some(left) => elementwise_mean(&right_dist, left),
        None => right_dist.clone(),
    };
    let ref_vel = lowpass_filter(&ref_vel_raw, sample_rate, VELOCITY_CUTOFF_HZ)?;
    let acc_wheel = scaled_gradient(&ref_vel, sample_rate);

    // Accelerometer conditioning on the forward axis.
    let mut accel_x = session
        .require_channel(&reference, channel::ACCEL_X)?
        .to_vec();
    if config.accelerometer_units == AccelerometerUnits::Gravity {
        for value in &mut accel_x {
            *value *= STANDARD_GRAVITY;
        }
    }
    let acc = lowpass_filter(&accel_x, sample_rate, ACCELERATION_CUTOFF_HZ)?;

    // Decompose travelled distance along the instantaneous heading.
    let heading_deg = cumulative_trapezoid(&rot_vel, dt);
    let dist_step = gradient(&ref_dist);
    let lateral_steps: Vec<f64> = dist_step
        .iter()
        .zip(&heading_deg)
        .map(|(step, heading)| step * heading.to_radians().sin())
        .collect();
    let forward_steps: Vec<f64> = dist_step
        .iter()
        .zip(&heading_deg)
        .map(|(step, heading)| step * heading.to_radians().cos())
        .collect();
    let dist_y = cumulative_trapezoid(&lateral_steps, 1.0);
    let dist_x = cumulative_trapezoid(&forward_steps, 1.0);

    // Lever-arm correction: frame yaw moves each wheel relative to the
    // frame centre by half the wheelbase per unit yaw angle.
    let skid_term: Vec<f64> = ref_gyro_z
        .iter()
        .map(|gz| (gz / sample_rate).to_radians().tan() * config.wheelbase_m / 2.0 * sample_rate)
        .collect();
    let skid_vel_right: Vec<f64> = right_vel
        .iter()
        .zip(&skid_term)
        .map(|(vel, term)| vel - term)
        .collect();
    let skid_vel_left: Option<Vec<f64>> = left_vel.as_ref().map(|left| {
        left.iter()
            .zip(&skid_term)
            .map(|(vel, term)| vel + term)
            .collect()
    });

    let skid_vel: Vec<f64> = match (&left_vel, &skid_vel_left) {
        (Some(left), Some(skid_left)) => {
            let ratio = combined_skid_ratio(&right_vel, left);
            let weight = lowpass_filter(&ratio, sample_rate, ACCELERATION_CUTOFF_HZ)?;
            skid_vel_right
                .iter()
                .zip(skid_left)
                .zip(&weight)
                .map(|((right, left), w)| {
                    let w = w.clamp(0.0, 1.0);
                    w.mul_add(*right, (1.0 - w) * left)
                })
                .collect()
        }
        _ => skid_vel_right.clone(),
    };
    let skid_dist = cumulative_trapezoid(&skid_vel, dt);

    // All outputs computed; write the wheel tables first, the reference
    // last so its session-level channels win when the tables coincide.
    let right_table = session.require_mut(&DeviceId::Right)?;
    right_table.insert_channel(channel::GYRO_COR, right_gyro_cor)?;
    right_table.insert_channel(channel::VEL, right_vel)?;
    right_table.insert_channel(channel::DIST, right_dist)?;

    if let (Some(cor), Some(vel), Some(dist)) = (left_gyro_cor, left_vel, left_dist) {
        let left_table = session.require_mut(&DeviceId::Left)?;
        left_table.insert_channel(channel::GYRO_COR, cor)?;
        left_table.insert_channel(channel::VEL, vel)?;
        left_table.insert_channel(channel::DIST, dist)?;
    }

    let table = session.require_mut(&reference)?;
    table.insert_channel(channel::GYRO_COR, ref_gyro_cor)?;
    table.insert_channel(channel::ROT_VEL, rot_vel)?;
    table.insert_channel(channel::ROT, rot)?;
    table.insert_channel(channel::ROT_ACC, rot_acc)?;
    table.insert_channel(channel::VEL, ref_vel)?;
    table.insert_channel(channel::DIST, ref_dist)?;
    table.insert_channel(channel::ACC_WHEEL, acc_wheel)?;
    table.insert_channel(channel::ACCEL_X, accel_x)?;
    table.insert_channel(channel::ACC, acc)?;
    table.insert_channel(channel::DIST_X, dist_x)?;
    table.insert_channel(channel::DIST_Y, dist_y)?;
    table.insert_channel(channel::SKID_VEL_RIGHT, skid_vel_right)?;
    if let Some(skid_left) = skid_vel_left {
        table.insert_channel(channel::SKID_VEL_LEFT, skid_left)?;
    }
    table.insert_channel(channel::SKID_VEL, skid_vel)?;
    table.insert_channel(channel::SKID_DIST, skid_dist)?;

    Ok(())
}

/// Converts a camber-corrected rotation rate in deg/s to rim velocity in
/// m/s.
fn wheel_velocity(gyro_cor: &[f64], wheel_radius_m: f64) -> Vec<f64> {
    gyro_cor
        .iter()
        .map(|rate| rate.to_radians() * wheel_radius_m)
        .collect()
}

/// Central-difference derivative scaled back to per-second units.
fn scaled_gradient(signal: &[f64], sample_rate: f64) -> Vec<f64> {
    gradient(signal)
        .iter()
        .map(|step| step * sample_rate)
        .collect()
}

fn elementwise_mean(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| (x + y) / 2.0).collect()
}

/// Per-sample blend weight for combining the wheels' skid velocities.
///
/// Each side's score multiplies its share of the summed speed magnitudes
/// with the opposite side's share of the summed speed-derivative
/// magnitudes; the weight is the right score's fraction of both scores.
/// Zero-velocity ties (0/0) are neutralized to zero weight.
fn combined_skid_ratio(right_vel: &[f64], left_vel: &[f64]) -> Vec<f64> {
    let right_step = gradient(right_vel);
    let left_step = gradient(left_vel);
    right_vel
        .iter()
        .zip(left_vel)
        .zip(right_step.iter().zip(&left_step))
        .map(|((right, left), (right_d, left_d))| {
            let speed_sum = right.abs() + left.abs();
            let step_sum = right_d.abs() + left_d.abs();
            let right_score = (right.abs() / speed_sum) * (left_d.abs() / step_sum);
            let left_score = (left.abs() / speed_sum) * (right_d.abs() / step_sum);
            let ratio = right_score / (right_score + left_score);
            if ratio.is_finite() {
                ratio
            } else {
                0.0
            }
        })
        .collect()
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
    use approx::assert_relative_eq;
    use propulsion_types::{DeviceTable, SensorSet};

    use super::*;

    const SAMPLES: usize = 128;
    const DT: f64 = 0.01;

    fn table_with(channels: &[(&str, Vec<f64>)]) -> DeviceTable {
        let time: Vec<f64> = (0..SAMPLES).map(|i| i as f64 * DT).collect();
        let mut table = DeviceTable::from_time(time);
        for (name, values) in channels {
            table.insert_channel(*name, values.clone()).unwrap();
        }
        table
    }

    /// Both wheels spinning at a constant 100 deg/s, no frame yaw.
    fn straight_line_session() -> SessionData {
        let gyro_y = vec![100.0; SAMPLES];
        let mut session = SessionData::new();
        session.insert(
            DeviceId::Right,
            table_with(&[(channel::GYRO_Y, gyro_y.clone())]),
        );
        session.insert(DeviceId::Left, table_with(&[(channel::GYRO_Y, gyro_y)]));
        session.insert(
            DeviceId::Frame,
            table_with(&[
                (channel::GYRO_Z, vec![0.0; SAMPLES]),
                (channel::ACCEL_X, vec![1.0; SAMPLES]),
            ]),
        );
        session
    }

    #[test]
    fn skid_ratio_is_bounded_and_neutralizes_ties() {
        let right: Vec<f64> = (0..64).map(|i| (i as f64 * 0.3).sin() * 2.0).collect();
        let left: Vec<f64> = (0..64).map(|i| (i as f64 * 0.3).cos() * 1.5).collect();
        let forward = combined_skid_ratio(&right, &left);
        let swapped = combined_skid_ratio(&left, &right);
        for (w, v) in forward.iter().zip(&swapped) {
            assert!((0.0..=1.0).contains(w));
            // Swapping the wheels complements the weight.
            assert_relative_eq!(w + v, 1.0, epsilon = 1e-12);
        }

        // Both wheels stopped: every sample is a 0/0 tie.
        let zeros = vec![0.0; 16];
        for value in combined_skid_ratio(&zeros, &zeros) {
            assert_eq!(value, 0.0);
        }
    }

    #[test]
    fn zero_camber_leaves_rotation_rate_untouched() {
        let mut session = straight_line_session();
        let gyro_y = session
            .require_channel(&DeviceId::Right, channel::GYRO_Y)
            .unwrap()
            .to_vec();

        let config = ProcessConfig::default().with_camber_deg(0.0);
        process_session(&mut session, &config).unwrap();

        let cor = session
            .require_channel(&DeviceId::Right, channel::GYRO_COR)
            .unwrap();
        assert_eq!(cor, gyro_y.as_slice());
    }

    #[test]
    fn straight_line_distance_is_monotone_and_matches_speed() {
        let mut session = straight_line_session();
        process_session(&mut session, &ProcessConfig::default()).unwrap();

        let expected_vel = 100.0_f64.to_radians() * 0.32;
        let dist = session
            .require_channel(&DeviceId::Frame, channel::DIST)
            .unwrap();
        for pair in dist.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        let span = (SAMPLES - 1) as f64 * DT;
        assert_relative_eq!(
            *dist.last().unwrap(),
            expected_vel * span,
            epsilon = 1e-9
        );

        // No yaw: all distance is forward, none lateral.
        let dist_x = session
            .require_channel(&DeviceId::Frame, channel::DIST_X)
            .unwrap();
        let dist_y = session
            .require_channel(&DeviceId::Frame, channel::DIST_Y)
            .unwrap();
        for (i, (x, y)) in dist_x.iter().zip(dist_y).enumerate() {
            assert_relative_eq!(*x, dist[i], epsilon = 1e-9);
            assert_relative_eq!(*y, 0.0, epsilon = 1e-12);
        }

        // Constant input passes the smoothing filter unchanged.
        let vel = session
            .require_channel(&DeviceId::Frame, channel::VEL)
            .unwrap();
        assert_relative_eq!(vel[SAMPLES / 2], expected_vel, epsilon = 1e-6);
    }

    #[test]
    fn enriches_all_expected_channels() {
        let mut session = straight_line_session();
        process_session(&mut session, &ProcessConfig::default()).unwrap();

        let frame = session.device(&DeviceId::Frame).unwrap();
        for name in [
            channel::GYRO_COR,
            channel::ROT_VEL,
            channel::ROT,
            channel::ROT_ACC,
            channel::VEL,
            channel::DIST,
            channel::ACC_WHEEL,
            channel::ACC,
            channel::DIST_X,
            channel::DIST_Y,
            channel::SKID_VEL_RIGHT,
            channel::SKID_VEL_LEFT,
            channel::SKID_VEL,
            channel::SKID_DIST,
        ] {
            assert!(frame.has_channel(name), "frame missing {name}");
        }
        for id in [DeviceId::Left, DeviceId::Right] {
            let wheel = session.device(&id).unwrap();
            for name in [channel::GYRO_COR, channel::VEL, channel::DIST] {
                assert!(wheel.has_channel(name), "{id} missing {name}");
            }
        }
    }

    #[test]
    fn gravity_units_scale_accelerometer() {
        let mut session = straight_line_session();
        process_session(&mut session, &ProcessConfig::default()).unwrap();
        let accel = session
            .require_channel(&DeviceId::Frame, channel::ACCEL_X)
            .unwrap();
        assert_eq!(accel[0], 9.81);
        let acc = session
            .require_channel(&DeviceId::Frame, channel::ACC)
            .unwrap();
        assert_relative_eq!(acc[SAMPLES / 2], 9.81, epsilon = 1e-6);

        let mut session = straight_line_session();
        let config = ProcessConfig::default().with_accelerometer_units(AccelerometerUnits::Si);
        process_session(&mut session, &config).unwrap();
        let accel = session
            .require_channel(&DeviceId::Frame, channel::ACCEL_X)
            .unwrap();
        assert_eq!(accel[0], 1.0);
    }

    #[test]
    fn single_sensor_matches_mirrored_frame_run() {
        let gyro_y: Vec<f64> = (0..SAMPLES).map(|i| 60.0 + (i as f64 * 0.2).sin() * 20.0).collect();
        let gyro_z: Vec<f64> = (0..SAMPLES).map(|i| (i as f64 * 0.15).cos() * 5.0).collect();
        let accel_x: Vec<f64> = (0..SAMPLES).map(|i| (i as f64 * 0.4).sin() * 0.3).collect();

        let mut single = SessionData::new();
        single.insert(
            DeviceId::Right,
            table_with(&[
                (channel::GYRO_Y, gyro_y.clone()),
                (channel::GYRO_Z, gyro_z.clone()),
                (channel::ACCEL_X, accel_x.clone()),
            ]),
        );
        let config = ProcessConfig::default().with_sensors(SensorSet::RightWheel);
        process_session(&mut single, &config).unwrap();

        // The same recording with the frame channels split onto a frame
        // device must produce identical session-level outputs.
        let mut mirrored = SessionData::new();
        mirrored.insert(
            DeviceId::Right,
            table_with(&[(channel::GYRO_Y, gyro_y)]),
        );
        mirrored.insert(
            DeviceId::Frame,
            table_with(&[
                (channel::GYRO_Z, gyro_z),
                (channel::ACCEL_X, accel_x),
            ]),
        );
        let config = ProcessConfig::default().with_sensors(SensorSet::RightWheelAndFrame);
        process_session(&mut mirrored, &config).unwrap();

        let single_table = single.device(&DeviceId::Right).unwrap();
        let mirrored_frame = mirrored.device(&DeviceId::Frame).unwrap();
        for name in [
            channel::GYRO_COR,
            channel::ROT_VEL,
            channel::ROT,
            channel::VEL,
            channel::DIST,
            channel::ACC,
            channel::DIST_X,
            channel::SKID_VEL_RIGHT,
            channel::SKID_VEL,
            channel::SKID_DIST,
        ] {
            assert_eq!(
                single_table.channel(name).unwrap(),
                mirrored_frame.channel(name).unwrap(),
                "channel {name} diverged"
            );
        }

        // Single wheel: no blending, the skid velocity is the right wheel's.
        assert_eq!(
            single_table.channel(channel::SKID_VEL).unwrap(),
            single_table.channel(channel::SKID_VEL_RIGHT).unwrap()
        );
        assert!(!single_table.has_channel(channel::SKID_VEL_LEFT));
    }

    #[test]
    fn missing_required_device_is_fatal() {
        let mut session = straight_line_session();
        session.remove(&DeviceId::Left);

        let err = process_session(&mut session, &ProcessConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            KinematicsError::Session(SessionError::MissingDevice { .. })
        ));
    }

    #[test]
    fn missing_accelerometer_channel_is_fatal() {
        let mut session = straight_line_session();
        session
            .device_mut(&DeviceId::Frame)
            .unwrap()
            .remove_channel(channel::ACCEL_X);

        let err = process_session(&mut session, &ProcessConfig::default()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("accelerometer_x"));
        assert!(msg.contains("frame"));
    }

    #[test]
    fn device_length_mismatch_is_fatal() {
        let mut session = straight_line_session();
        session.device_mut(&DeviceId::Left).unwrap().truncate(64);

        let err = process_session(&mut session, &ProcessConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            KinematicsError::Session(SessionError::DeviceLengthMismatch { .. })
        ));
    }

    #[test]
    fn too_short_session_fails_in_filtering() {
        let time: Vec<f64> = (0..5).map(|i| i as f64 * DT).collect();
        let mut right = DeviceTable::from_time(time);
        right.insert_channel(channel::GYRO_Y, vec![10.0; 5]).unwrap();
        right.insert_channel(channel::GYRO_Z, vec![0.0; 5]).unwrap();
        right.insert_channel(channel::ACCEL_X, vec![0.0; 5]).unwrap();
        let mut session = SessionData::new();
        session.insert(DeviceId::Right, right);

        let config = ProcessConfig::default().with_sensors(SensorSet::RightWheel);
        let err = process_session(&mut session, &config).unwrap_err();
        assert!(matches!(err, KinematicsError::Signal(_)));
    }
}

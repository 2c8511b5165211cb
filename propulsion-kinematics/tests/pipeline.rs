//! End-to-end pipeline runs: resample, remap, process, detect.

#![allow(clippy::unwrap_used, clippy::cast_precision_loss, clippy::float_cmp)]

use approx::assert_relative_eq;
use propulsion_kinematics::{
    detect_channel_pushes, process_session, remap_wheel_orientation, resample_session, AxisRemap,
    ProcessConfig,
};
use propulsion_types::{channel, DeviceId, DeviceTable, SessionData};

fn timeline(samples: usize, duration: f64) -> Vec<f64> {
    (0..samples)
        .map(|i| i as f64 * duration / (samples - 1) as f64)
        .collect()
}

fn wheel(samples: usize, gyro_y: f64) -> DeviceTable {
    let mut table = DeviceTable::from_time(timeline(samples, 10.0));
    for name in channel::GYRO_AXES.into_iter().chain(channel::ACCEL_AXES) {
        let value = if name == channel::GYRO_Y { gyro_y } else { 0.0 };
        table.insert_channel(name, vec![value; samples]).unwrap();
    }
    table
}

#[test]
fn resample_process_detect_round_trip() {
    // Three devices logging the same ten seconds at three different rates.
    let mut session = SessionData::new();
    session.insert(DeviceId::Right, wheel(474, 100.0));
    session.insert(DeviceId::Left, wheel(521, 100.0));

    let frame_samples = 500;
    let time = timeline(frame_samples, 10.0);
    let accel: Vec<f64> = time
        .iter()
        .map(|t| (2.0 * std::f64::consts::PI * 1.5 * t).sin() * 0.5)
        .collect();
    let mut frame = DeviceTable::from_time(time);
    frame
        .insert_channel(channel::GYRO_Z, vec![0.0; frame_samples])
        .unwrap();
    frame.insert_channel(channel::ACCEL_X, accel).unwrap();
    session.insert(DeviceId::Frame, frame);

    let report = resample_session(&mut session, 100.0).unwrap();
    assert_eq!(report.samples, 1000);
    assert!(report.all_resampled());

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
        channel::SKID_VEL,
        channel::SKID_DIST,
    ] {
        assert!(frame.has_channel(name), "frame missing {name}");
    }

    // Constant 100 deg/s on 0.32 m wheels with no yaw.
    let expected_vel = 100.0_f64.to_radians() * 0.32;
    let dist = frame.channel(channel::DIST).unwrap();
    for pair in dist.windows(2) {
        assert!(pair[1] >= pair[0]);
    }
    assert_relative_eq!(
        *dist.last().unwrap(),
        expected_vel * frame.duration(),
        epsilon = 1e-9
    );
    let vel = frame.channel(channel::VEL).unwrap();
    assert_relative_eq!(vel[500], expected_vel, epsilon = 1e-6);
    let skid_vel = frame.channel(channel::SKID_VEL).unwrap();
    assert_relative_eq!(skid_vel[500], expected_vel, epsilon = 1e-9);

    // Raw channels no processing step consumes ride through resampling.
    let right = session.device(&DeviceId::Right).unwrap();
    let accel_z = right.channel(channel::ACCEL_Z).unwrap();
    assert_eq!(accel_z.len(), 1000);
    assert!(accel_z.iter().all(|v| *v == 0.0));

    // The 1.5 Hz sine on the frame accelerometer reads as 15 pushes.
    let analysis = detect_channel_pushes(&session, &DeviceId::Frame, channel::ACC).unwrap();
    assert!(
        (14..=16).contains(&analysis.count()),
        "expected about 15 pushes, got {}",
        analysis.count()
    );
    assert!((analysis.frequency_hz - 1.5).abs() < 0.1);
}

#[test]
fn remap_then_process_recovers_forward_motion() {
    let samples = 128;
    let mut session = SessionData::new();

    // In-wheel mounted sensors record wheel spin on the z axis; the right
    // sensor reads the spin mirrored.
    for (id, spin) in [(DeviceId::Left, 100.0), (DeviceId::Right, -100.0)] {
        let mut table = DeviceTable::from_time(timeline(samples, 1.27));
        table
            .insert_channel(channel::GYRO_X, vec![1.0; samples])
            .unwrap();
        table
            .insert_channel(channel::GYRO_Y, vec![2.0; samples])
            .unwrap();
        table
            .insert_channel(channel::GYRO_Z, vec![spin; samples])
            .unwrap();
        session.insert(id, table);
    }
    let mut frame = DeviceTable::from_time(timeline(samples, 1.27));
    frame
        .insert_channel(channel::GYRO_Z, vec![0.0; samples])
        .unwrap();
    frame
        .insert_channel(channel::ACCEL_X, vec![0.0; samples])
        .unwrap();
    session.insert(DeviceId::Frame, frame);

    remap_wheel_orientation(&mut session, &AxisRemap::wheel_mount()).unwrap();

    // Spin now sits on gyroscope_y with a shared sign.
    for id in [DeviceId::Left, DeviceId::Right] {
        let gyro_y = session.require_channel(&id, channel::GYRO_Y).unwrap();
        assert_eq!(gyro_y[0], 100.0);
    }

    let config = ProcessConfig::default().with_camber_deg(0.0);
    process_session(&mut session, &config).unwrap();

    for id in [DeviceId::Left, DeviceId::Right] {
        let vel = session.require_channel(&id, channel::VEL).unwrap();
        assert!(vel.iter().all(|v| *v > 0.0), "{id} not rolling forward");
    }
}

#[test]
fn truncate_cuts_the_resampled_nan_tail() {
    let mut session = SessionData::new();
    session.insert(DeviceId::Right, wheel(474, 90.0));

    // The left wheel stopped logging after six seconds.
    let mut left = DeviceTable::from_time(timeline(300, 6.0));
    left.insert_channel(channel::GYRO_Y, vec![90.0; 300]).unwrap();
    session.insert(DeviceId::Left, left);

    resample_session(&mut session, 50.0).unwrap();

    let left_gyro = session
        .require_channel(&DeviceId::Left, channel::GYRO_Y)
        .unwrap();
    assert!(left_gyro.last().unwrap().is_nan());
    let covered = left_gyro.iter().take_while(|v| v.is_finite()).count();
    assert!(covered > 0);

    session.truncate(covered);
    for (_, table) in session.iter() {
        assert_eq!(table.len(), covered);
    }
    let left_gyro = session
        .require_channel(&DeviceId::Left, channel::GYRO_Y)
        .unwrap();
    assert!(left_gyro.iter().all(|v| v.is_finite()));
}

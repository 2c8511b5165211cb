//! Canonical channel names shared across the pipeline.
//!
//! Raw ingestion produces the `gyroscope_*` / `accelerometer_*` channels;
//! the kinematics processor adds the derived channels. Keeping the names in
//! one place lets downstream consumers address enriched sessions without
//! string drift.

/// Gyroscope x-axis, degrees per second.
pub const GYRO_X: &str = "gyroscope_x";

/// Gyroscope y-axis, degrees per second. On wheel devices this is the wheel
/// rotation axis after orientation remapping.
pub const GYRO_Y: &str = "gyroscope_y";

/// Gyroscope z-axis, degrees per second. On the frame device this is the
/// yaw (turning) axis.
pub const GYRO_Z: &str = "gyroscope_z";

/// Accelerometer x-axis (forward), in g or m/s² depending on the source.
pub const ACCEL_X: &str = "accelerometer_x";

/// Accelerometer y-axis.
pub const ACCEL_Y: &str = "accelerometer_y";

/// Accelerometer z-axis.
pub const ACCEL_Z: &str = "accelerometer_z";

/// Camber-corrected wheel rotation rate, degrees per second.
pub const GYRO_COR: &str = "gyro_cor";

/// Linear velocity, m/s.
pub const VEL: &str = "vel";

/// Travelled distance, m.
pub const DIST: &str = "dist";

/// Displacement along the initial heading, m.
pub const DIST_X: &str = "dist_x";

/// Displacement perpendicular to the initial heading, m.
pub const DIST_Y: &str = "dist_y";

/// Cumulative rotation magnitude, degrees.
pub const ROT: &str = "rot";

/// Smoothed rotational velocity, degrees per second.
pub const ROT_VEL: &str = "rot_vel";

/// Rotational acceleration, degrees per second squared.
pub const ROT_ACC: &str = "rot_acc";

/// Smoothed forward acceleration from the accelerometer, m/s².
pub const ACC: &str = "acc";

/// Forward acceleration differentiated from wheel velocity, m/s².
pub const ACC_WHEEL: &str = "acc_wheel";

/// Skid-corrected frame velocity, m/s.
pub const SKID_VEL: &str = "skid_vel";

/// Right-wheel skid velocity estimate, m/s.
pub const SKID_VEL_RIGHT: &str = "skid_vel_right";

/// Left-wheel skid velocity estimate, m/s.
pub const SKID_VEL_LEFT: &str = "skid_vel_left";

/// Distance integrated from the skid-corrected velocity, m.
pub const SKID_DIST: &str = "skid_dist";

/// The three gyroscope channels in axis order.
pub const GYRO_AXES: [&str; 3] = [GYRO_X, GYRO_Y, GYRO_Z];

/// The three accelerometer channels in axis order.
pub const ACCEL_AXES: [&str; 3] = [ACCEL_X, ACCEL_Y, ACCEL_Z];

//! Wheelchair propulsion kinematics from wheel- and frame-mounted
//! inertial sensors.
//!
//! The pipeline turns raw gyroscope and accelerometer tables into the
//! channels motion analysts work with: camber-corrected rotation rates,
//! linear velocity and distance, frame heading and 2-D displacement,
//! skid-corrected velocity, and individual propulsion strokes.
//!
//! Stages run in order, each mutating the session in place:
//!
//! - [`resample_session`]: interpolates every device onto one uniform
//!   time axis and reports devices that cannot be resampled
//! - [`remap_wheel_orientation`]: relabels wheel gyroscope axes after the
//!   sensors are remounted, restoring the rotation sign convention
//! - [`process_session`]: derives the kinematic channels configured by
//!   [`ProcessConfig`]
//! - [`detect_pushes`] / [`detect_channel_pushes`]: finds individual
//!   propulsion strokes in a forward acceleration signal
//!
//! Sessions and tables come from [`propulsion_types`]; the numerical
//! primitives (filtering, interpolation, spectra, peaks) come from
//! [`propulsion_signal`]. Structural and numerical failures surface as
//! [`KinematicsError`].
//!
//! # Example
//!
//! ```
//! use propulsion_kinematics::{process_session, resample_session, ProcessConfig};
//! use propulsion_types::{channel, DeviceId, DeviceTable, SensorSet, SessionData};
//!
//! // One right-wheel sensor logging at an uneven 93 Hz for ten seconds.
//! let time: Vec<f64> = (0..930).map(|i| f64::from(i) / 93.0).collect();
//! let samples = time.len();
//! let mut right = DeviceTable::from_time(time);
//! right.insert_channel(channel::GYRO_Y, vec![120.0; samples]).unwrap();
//! right.insert_channel(channel::GYRO_Z, vec![0.0; samples]).unwrap();
//! right.insert_channel(channel::ACCEL_X, vec![0.1; samples]).unwrap();
//!
//! let mut session = SessionData::new();
//! session.insert(DeviceId::Right, right);
//!
//! // Align onto a uniform 100 Hz axis, then derive the kinematics.
//! let report = resample_session(&mut session, 100.0).unwrap();
//! assert!(report.all_resampled());
//!
//! let config = ProcessConfig::default().with_sensors(SensorSet::RightWheel);
//! process_session(&mut session, &config).unwrap();
//!
//! let dist = session.require_channel(&DeviceId::Right, channel::DIST).unwrap();
//! assert!(dist.iter().all(|d| d.is_finite()));
//! ```
//!
//! # Quality Standards
//!
//! This crate adheres to the workspace quality standards defined in
//! [STANDARDS.md](../../STANDARDS.md):
//!
//! - No `unwrap()` or `expect()` in library code
//! - All public APIs documented with examples
//! - Comprehensive error handling with `thiserror`

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod orientation;
mod params;
mod process;
mod push;
mod resample;

pub use error::{KinematicsError, Result};
pub use orientation::{remap_wheel_orientation, Axis, AxisRemap};
pub use params::{AccelerometerUnits, ProcessConfig};
pub use process::process_session;
pub use push::{detect_channel_pushes, detect_pushes, PushAnalysis};
pub use resample::{resample_session, ResampleReport};

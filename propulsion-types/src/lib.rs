//! Data model for wheelchair propulsion sensor sessions.
//!
//! This crate provides the foundational types shared across the propulsion
//! workspace:
//!
//! - [`SessionData`] - A recording session: one table per device
//! - [`DeviceTable`] - Time axis plus named channel columns for one device
//! - [`DeviceId`] - Device identity (`Left`, `Right`, `Frame`, or named)
//! - [`DeviceKind`] - Resampling policy tag (generic, quaternion, rotation matrix)
//! - [`SensorSet`] - Which sensors a session carries (1, 2 or 3)
//! - [`channel`] - Canonical channel names, raw and derived
//!
//! # Design
//!
//! Tables are column stores: a shared `time` axis in seconds and `f64`
//! channels addressed by name. The single structural invariant is that
//! every channel has exactly as many samples as the time axis; insertion
//! enforces it, so downstream numeric code can index freely.
//!
//! Processing stages mutate sessions in place. The copy path is explicit:
//! `SessionData` is `Clone` and owns all of its data.
//!
//! # Example
//!
//! ```
//! use propulsion_types::{channel, DeviceId, DeviceTable, SessionData};
//!
//! let mut table = DeviceTable::from_time(vec![0.0, 0.01, 0.02]);
//! table
//!     .insert_channel(channel::GYRO_Y, vec![350.0, 352.0, 351.0])
//!     .unwrap();
//!
//! let mut session = SessionData::new();
//! session.insert(DeviceId::Right, table);
//!
//! assert_eq!(session.require(&DeviceId::Right).unwrap().len(), 3);
//! ```
//!
//! # Serialization
//!
//! All types derive `serde` traits behind the `serde` feature. Device ids
//! serialize as their canonical names so sessions round-trip through JSON
//! with string-keyed device maps.
//!
//! # Quality Standards
//!
//! This crate maintains A-grade standards per [STANDARDS.md](../../STANDARDS.md):
//! - Zero clippy/doc warnings
//! - Zero `unwrap`/`expect` in library code

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod channel;
mod device;
mod error;
mod sensors;
mod session;
mod table;

pub use device::DeviceId;
pub use error::SessionError;
pub use sensors::SensorSet;
pub use session::SessionData;
pub use table::{DeviceKind, DeviceTable, TableStats};

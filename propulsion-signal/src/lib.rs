//! Signal-processing primitives for propulsion analysis.
//!
//! The kinematics pipeline leans on a small set of numerical operations;
//! this crate provides them with explicit contracts so the algorithm code
//! stays free of numerics details:
//!
//! # Filtering
//!
//! - [`lowpass_filter`] - Zero-phase second-order Butterworth low-pass
//!
//! # Resampling
//!
//! - [`resample_linear`] - Linear interpolation onto a new axis, `NaN`
//!   outside the observed range
//! - [`lerp`] / [`lerp_factor`] - The underlying interpolation helpers
//!
//! # Calculus on sampled signals
//!
//! - [`cumulative_trapezoid`] - Zero-seeded running trapezoid integral
//! - [`gradient`] - Central differences with one-sided edges
//!
//! # Spectral estimation
//!
//! - [`periodogram`] - One-sided power spectral density ([`PowerSpectrum`])
//!
//! # Peak picking
//!
//! - [`find_peaks`] / [`PeakCriteria`] - Local maxima filtered by height,
//!   distance and prominence
//! - [`local_maxima`] / [`peak_prominences`] - The underlying pieces
//!
//! # Statistics
//!
//! - [`mean`] / [`std_dev`] - Population statistics
//!
//! # Example
//!
//! ```
//! use propulsion_signal::{lowpass_filter, periodogram};
//!
//! let fs = 100.0;
//! let signal: Vec<f64> = (0..400)
//!     .map(|i| (std::f64::consts::TAU * 2.0 * f64::from(i) / fs).sin())
//!     .collect();
//!
//! let smoothed = lowpass_filter(&signal, fs, 10.0).unwrap();
//! let spectrum = periodogram(&smoothed, fs).unwrap();
//! assert!((spectrum.dominant_frequency().unwrap() - 2.0).abs() < 0.26);
//! ```
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

mod error;
mod filter;
mod integrate;
mod interp;
mod peaks;
mod spectrum;
mod stats;

pub use error::{Result, SignalError};
pub use filter::{lowpass_filter, MIN_FILTFILT_LEN};
pub use integrate::{cumulative_trapezoid, gradient};
pub use interp::{lerp, lerp_factor, resample_linear};
pub use peaks::{find_peaks, local_maxima, peak_prominences, PeakCriteria};
pub use spectrum::{periodogram, PowerSpectrum};
pub use stats::{mean, std_dev};

//! Configuration for the kinematics processor.

use serde::{Deserialize, Serialize};

use propulsion_types::SensorSet;

use crate::error::{KinematicsError, Result};

/// Units the accelerometer channels were recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccelerometerUnits {
    /// Gravitational units; channels are scaled by 9.81 before filtering.
    #[default]
    Gravity,
    /// Already in m/s²; channels are used as recorded.
    Si,
}

/// Wheelchair geometry and sensor configuration for
/// [`process_session`](crate::process_session).
///
/// Defaults describe the reference measurement wheelchair: 18° camber,
/// 0.32 m wheel radius, 0.80 m wheelbase, sensors on both wheels and the
/// frame, accelerometers reporting in g.
///
/// # Example
///
/// ```
/// use propulsion_kinematics::ProcessConfig;
/// use propulsion_types::SensorSet;
///
/// let config = ProcessConfig::default()
///     .with_camber_deg(15.0)
///     .with_sensors(SensorSet::RightWheelAndFrame);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Inward lean of the wheels, in degrees.
    pub camber_deg: f64,

    /// Wheel radius, in meters.
    pub wheel_radius_m: f64,

    /// Distance between the rear wheels, in meters.
    pub wheelbase_m: f64,

    /// Which devices are physically mounted.
    pub sensors: SensorSet,

    /// Units of the recorded accelerometer channels.
    pub accelerometer_units: AccelerometerUnits,
}

impl ProcessConfig {
    /// Sets the wheel camber in degrees.
    #[must_use]
    pub const fn with_camber_deg(mut self, camber_deg: f64) -> Self {
        self.camber_deg = camber_deg;
        self
    }

    /// Sets the wheel radius in meters.
    #[must_use]
    pub const fn with_wheel_radius(mut self, wheel_radius_m: f64) -> Self {
        self.wheel_radius_m = wheel_radius_m;
        self
    }

    /// Sets the wheelbase in meters.
    #[must_use]
    pub const fn with_wheelbase(mut self, wheelbase_m: f64) -> Self {
        self.wheelbase_m = wheelbase_m;
        self
    }

    /// Sets the mounted sensor set.
    #[must_use]
    pub const fn with_sensors(mut self, sensors: SensorSet) -> Self {
        self.sensors = sensors;
        self
    }

    /// Sets the accelerometer units.
    #[must_use]
    pub const fn with_accelerometer_units(mut self, units: AccelerometerUnits) -> Self {
        self.accelerometer_units = units;
        self
    }

    /// Checks the geometry for physical plausibility.
    ///
    /// # Errors
    ///
    /// Returns [`KinematicsError::InvalidConfig`] if the camber is not
    /// finite or the wheel radius or wheelbase is not a positive finite
    /// number.
    pub fn validate(&self) -> Result<()> {
        if !self.camber_deg.is_finite() {
            return Err(KinematicsError::invalid_config(format!(
                "camber must be finite, got {} deg",
                self.camber_deg
            )));
        }
        if !self.wheel_radius_m.is_finite() || self.wheel_radius_m <= 0.0 {
            return Err(KinematicsError::invalid_config(format!(
                "wheel radius must be positive, got {} m",
                self.wheel_radius_m
            )));
        }
        if !self.wheelbase_m.is_finite() || self.wheelbase_m <= 0.0 {
            return Err(KinematicsError::invalid_config(format!(
                "wheelbase must be positive, got {} m",
                self.wheelbase_m
            )));
        }
        Ok(())
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            camber_deg: 18.0,
            wheel_radius_m: 0.32,
            wheelbase_m: 0.80,
            sensors: SensorSet::default(),
            accelerometer_units: AccelerometerUnits::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_reference_wheelchair() {
        let config = ProcessConfig::default();
        assert_eq!(config.camber_deg, 18.0);
        assert_eq!(config.wheel_radius_m, 0.32);
        assert_eq!(config.wheelbase_m, 0.80);
        assert_eq!(config.sensors, SensorSet::BothWheelsAndFrame);
        assert_eq!(config.accelerometer_units, AccelerometerUnits::Gravity);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builders_set_fields() {
        let config = ProcessConfig::default()
            .with_camber_deg(0.0)
            .with_wheel_radius(0.30)
            .with_wheelbase(0.75)
            .with_sensors(SensorSet::RightWheel)
            .with_accelerometer_units(AccelerometerUnits::Si);
        assert_eq!(config.camber_deg, 0.0);
        assert_eq!(config.wheel_radius_m, 0.30);
        assert_eq!(config.wheelbase_m, 0.75);
        assert_eq!(config.sensors, SensorSet::RightWheel);
        assert_eq!(config.accelerometer_units, AccelerometerUnits::Si);
    }

    #[test]
    fn validate_rejects_bad_geometry() {
        assert!(ProcessConfig::default()
            .with_camber_deg(f64::NAN)
            .validate()
            .is_err());
        assert!(ProcessConfig::default()
            .with_wheel_radius(0.0)
            .validate()
            .is_err());
        assert!(ProcessConfig::default()
            .with_wheelbase(-0.5)
            .validate()
            .is_err());
        assert!(ProcessConfig::default()
            .with_wheel_radius(f64::INFINITY)
            .validate()
            .is_err());
    }

    #[test]
    fn config_serde_round_trip() {
        let config = ProcessConfig::default().with_sensors(SensorSet::RightWheelAndFrame);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ProcessConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}

//! Drive constants of the robots, with per-index speed limits kept as data.

use vsss_kinematics::{DifferentialDrive, KinematicsError};

use crate::error::NavigationError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Speed bounds of one robot. Enforcing them is up to whoever builds the command.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriveLimits {
    /// Maximum linear speed (cm/s).
    pub max_linear: f64,
    /// Maximum angular rate, scaled from `max_linear`.
    pub max_angular: f64,
}

/// A lower (or higher) linear speed cap for one match index.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedOverride {
    /// Match index the cap applies to.
    pub index: u8,
    /// Maximum linear speed (cm/s) for that index.
    pub max_linear: f64,
}

/// Chassis geometry and speed limits shared by every robot of a team.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct DriveProfile {
    /// Distance between the wheels of the physical chassis (cm).
    pub wheel_base: f64,
    /// Distance between the wheels of the simulator model (cm).
    pub simulator_wheel_base: f64,
    /// Wheel radius (cm).
    pub wheel_radius: f64,
    /// Linear speed cap for indices without an override (cm/s).
    pub default_max_linear: f64,
    /// `max_angular = angular_factor * max_linear`.
    pub angular_factor: f64,
    /// Per-index linear speed caps.
    pub max_linear_overrides: Vec<SpeedOverride>,
}

impl Default for DriveProfile {
    fn default() -> Self {
        DriveProfile {
            wheel_base: 7.5,
            simulator_wheel_base: 6.11,
            wheel_radius: 3.4,
            default_max_linear: 50.0,
            angular_factor: 3.0,
            // Index 0 plays goalkeeper and is kept slower.
            max_linear_overrides: vec![SpeedOverride {
                index: 0,
                max_linear: 40.0,
            }],
        }
    }
}

impl DriveProfile {
    /// Speed limits for the robot with match index `index`.
    pub fn limits_for(&self, index: u8) -> DriveLimits {
        let max_linear = self
            .max_linear_overrides
            .iter()
            .find(|o| o.index == index)
            .map_or(self.default_max_linear, |o| o.max_linear);

        DriveLimits {
            max_linear,
            max_angular: self.angular_factor * max_linear,
        }
    }

    /// Check both chassis geometries and that every speed cap is usable.
    ///
    /// # Errors
    ///
    /// `NavigationError::Kinematics` for a bad radius or wheel-base,
    /// `NavigationError::InvalidDriveLimits` for a negative or NaN cap or factor.
    pub fn validate(&self) -> Result<(), NavigationError> {
        self.chassis()?;
        self.simulator_chassis()?;

        let mut caps = core::iter::once(self.default_max_linear)
            .chain(self.max_linear_overrides.iter().map(|o| o.max_linear));
        // `!(c >= 0.0)` also rejects NaN.
        if caps.any(|c| !(c >= 0.0)) {
            return Err(NavigationError::InvalidDriveLimits("speed caps must be non-negative"));
        }
        if !(self.angular_factor >= 0.0) {
            return Err(NavigationError::InvalidDriveLimits("angular factor must be non-negative"));
        }
        Ok(())
    }

    /// Differential-drive geometry of the physical chassis.
    ///
    /// # Errors
    ///
    /// Fails if the configured radius or wheel-base is not positive.
    pub fn chassis(&self) -> Result<DifferentialDrive, KinematicsError> {
        DifferentialDrive::new(self.wheel_radius, self.wheel_base)
    }

    /// Differential-drive geometry of the simulator model.
    ///
    /// # Errors
    ///
    /// Fails if the configured radius or simulator wheel-base is not positive.
    pub fn simulator_chassis(&self) -> Result<DifferentialDrive, KinematicsError> {
        DifferentialDrive::new(self.wheel_radius, self.simulator_wheel_base)
    }
}

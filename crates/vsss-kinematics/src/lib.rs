#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for the kinematic state of small-field soccer bodies."]
#![doc = ""]
#![doc = "This crate provides coordinate and velocity records, a copy-on-read kinematic body,"]
#![doc = "and differential-drive kinematics for a chassis that can drive with either end as front."]

use core::f64::consts::PI;
use core::fmt;
use libm::{cos, sin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod body;
pub mod error;
pub use body::{Kinematic, KinematicBody};
pub use error::KinematicsError;

/// A field position `(x, y)` in centimeters with a heading in radians.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpatialCoordinates {
    /// Field x position (cm).
    pub x: f64,
    /// Field y position (cm).
    pub y: f64,
    /// Heading (rad).
    pub rotation: f64,
}

impl SpatialCoordinates {
    /// Construct a new coordinate record.
    ///
    /// # Arguments
    ///
    /// * `x`: Field x position in centimeters.
    /// * `y`: Field y position in centimeters.
    /// * `rotation`: Heading in radians.
    pub const fn new(x: f64, y: f64, rotation: f64) -> Self {
        SpatialCoordinates { x, y, rotation }
    }

    /// Normalize an angle to be within `[-PI, PI)`.
    ///
    /// Angles at `PI` will be normalized to `-PI`.
    pub fn normalize_angle(angle: f64) -> f64 {
        let a = angle % (2.0 * PI);
        if a >= PI {
            a - 2.0 * PI
        } else if a < -PI {
            a + 2.0 * PI
        } else {
            a
        }
    }
}

impl fmt::Display for SpatialCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2} cm, y: {:.2} cm, θ: {:.2} rad)", self.x, self.y, self.rotation)
    }
}

/// Velocity record as delivered by the feed.
///
/// Both the polar (`linear`, `angular`) and the Cartesian (`x`, `y`) forms are
/// kept; nothing forces them to agree.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocities {
    /// Linear speed (cm/s).
    pub linear: f64,
    /// Angular speed (rad/s).
    pub angular: f64,
    /// Velocity x component (cm/s).
    pub x: f64,
    /// Velocity y component (cm/s).
    pub y: f64,
}

impl Velocities {
    /// Construct a new velocity record.
    pub const fn new(linear: f64, angular: f64, x: f64, y: f64) -> Self {
        Velocities { linear, angular, x, y }
    }
}

impl fmt::Display for Velocities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(v: {:.2} cm/s, ω: {:.2} rad/s, vx: {:.2}, vy: {:.2})",
            self.linear, self.angular, self.x, self.y
        )
    }
}

/// Which physical end of the chassis currently acts as the front.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Face {
    /// The nominal front leads; commands map to wheels unchanged.
    #[default]
    Forward,
    /// The nominal back leads; the linear command is negated.
    Reversed,
}

impl Face {
    /// Returns the opposite face.
    pub const fn flipped(self) -> Self {
        match self {
            Face::Forward => Face::Reversed,
            Face::Reversed => Face::Forward,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Face::Forward => write!(f, "forward"),
            Face::Reversed => write!(f, "reversed"),
        }
    }
}

/// Left and right wheel rim speeds.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelSpeeds {
    /// Left wheel speed (cm/s).
    pub left: f64,
    /// Right wheel speed (cm/s).
    pub right: f64,
}

impl WheelSpeeds {
    /// Construct wheel speeds.
    pub const fn new(left: f64, right: f64) -> Self {
        WheelSpeeds { left, right }
    }
}

impl fmt::Display for WheelSpeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(vL: {:.2} cm/s, vR: {:.2} cm/s)", self.left, self.right)
    }
}

/// Linear and angular chassis velocities.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChassisSpeeds {
    /// Linear speed of the chassis center (cm/s).
    pub v: f64,
    /// Angular speed of the chassis (rad/s).
    pub omega: f64,
}

impl ChassisSpeeds {
    /// Construct chassis speeds.
    ///
    /// # Arguments
    ///
    /// * `v`: Linear speed of the chassis center (cm/s).
    /// * `omega`: Angular speed of the chassis (rad/s).
    pub const fn new(v: f64, omega: f64) -> Self {
        ChassisSpeeds { v, omega }
    }
}

impl fmt::Display for ChassisSpeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(v: {:.2} cm/s, ω: {:.2} rad/s)", self.v, self.omega)
    }
}

/// Differential‑drive kinematics helper.
///
/// Holds the physical parameters of the chassis (wheel radius and wheel-base
/// length) and converts between chassis and wheel speeds for either [`Face`].
/// Wheel speeds are linear rim speeds; [`DifferentialDrive::wheel_angular_speeds`]
/// turns them into shaft rates with the wheel radius.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialDrive {
    /// Wheel radius (cm).
    wheel_radius: f64,
    /// Wheel-base length (cm).
    axle_length: f64,
}

impl DifferentialDrive {
    /// Construct a new differential‑drive kinematics helper.
    ///
    /// # Arguments
    ///
    /// * `wheel_radius`: The radius of the robot's wheels in centimeters.
    /// * `axle_length`: The distance between the two drive wheels in centimeters.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidWheelRadius)` if `wheel_radius` is not positive.
    /// Returns `Err(KinematicsError::InvalidAxleLength)` if `axle_length` is not positive.
    /// NaN counts as not positive.
    pub const fn new(wheel_radius: f64, axle_length: f64) -> Result<Self, KinematicsError> {
        if !(wheel_radius > 0.0) {
            return Err(KinematicsError::InvalidWheelRadius("must be positive"));
        }
        if !(axle_length > 0.0) {
            return Err(KinematicsError::InvalidAxleLength("must be positive"));
        }
        Ok(DifferentialDrive {
            wheel_radius,
            axle_length,
        })
    }

    /// Returns the wheel radius.
    pub fn wheel_radius(&self) -> f64 {
        self.wheel_radius
    }

    /// Converts rim speeds (cm/s) into wheel angular speeds (rad/s).
    pub fn wheel_angular_speeds(&self, wheel_speeds: WheelSpeeds) -> WheelSpeeds {
        WheelSpeeds::new(
            wheel_speeds.left / self.wheel_radius,
            wheel_speeds.right / self.wheel_radius,
        )
    }

    /// Returns the wheel-base length.
    pub fn axle_length(&self) -> f64 {
        self.axle_length
    }

    /// Calculates the wheel speeds needed for the given chassis speeds.
    ///
    /// With [`Face::Reversed`] the linear term is negated, so the chassis
    /// drives with its nominal back as front while the wheels keep their
    /// electrical left/right assignment.
    ///
    /// # Arguments
    ///
    /// * `chassis_speeds`: The desired linear and angular velocities of the chassis.
    /// * `face`: Which end of the chassis leads.
    pub fn inverse_kinematics(&self, chassis_speeds: ChassisSpeeds, face: Face) -> WheelSpeeds {
        let half_turn = 0.5 * self.axle_length * chassis_speeds.omega;
        match face {
            Face::Forward => WheelSpeeds::new(
                chassis_speeds.v - half_turn,
                chassis_speeds.v + half_turn,
            ),
            Face::Reversed => WheelSpeeds::new(
                -chassis_speeds.v - half_turn,
                -chassis_speeds.v + half_turn,
            ),
        }
    }

    /// Calculates the chassis speeds produced by the given wheel speeds.
    /// This is the inverse of [`DifferentialDrive::inverse_kinematics`] for the same `face`.
    pub fn forward_kinematics(&self, wheel_speeds: WheelSpeeds, face: Face) -> ChassisSpeeds {
        let v = (wheel_speeds.right + wheel_speeds.left) / 2.0;
        let omega = (wheel_speeds.right - wheel_speeds.left) / self.axle_length;

        match face {
            Face::Forward => ChassisSpeeds::new(v, omega),
            Face::Reversed => ChassisSpeeds::new(-v, omega),
        }
    }

    /// Integrates the chassis speeds over `dt` seconds from `current`.
    ///
    /// Assumes constant chassis speeds over the interval. `v` is taken along
    /// `current.rotation`; the final heading is normalized to `[-PI, PI)`.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::NegativeTimeDelta)` if `dt` is negative.
    pub fn update_pose(
        &self,
        current: SpatialCoordinates,
        chassis_speeds: ChassisSpeeds,
        dt: f64,
    ) -> Result<SpatialCoordinates, KinematicsError> {
        if dt < 0.0 {
            return Err(KinematicsError::NegativeTimeDelta("must be non-negative"));
        }

        let delta_x = chassis_speeds.v * cos(current.rotation) * dt;
        let delta_y = chassis_speeds.v * sin(current.rotation) * dt;
        let delta_theta = chassis_speeds.omega * dt;

        Ok(SpatialCoordinates {
            x: current.x + delta_x,
            y: current.y + delta_y,
            rotation: SpatialCoordinates::normalize_angle(current.rotation + delta_theta),
        })
    }
}

impl fmt::Display for DifferentialDrive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DifferentialDrive (r: {:.2} cm, L: {:.2} cm)", self.wheel_radius, self.axle_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    fn chassis() -> DifferentialDrive {
        DifferentialDrive::new(3.4, 7.5).unwrap()
    }

    #[test]
    fn test_angle_normalization() {
        assert!((SpatialCoordinates::normalize_angle(0.0) - 0.0).abs() < EPSILON);
        assert!((SpatialCoordinates::normalize_angle(PI) - (-PI)).abs() < EPSILON);
        assert!((SpatialCoordinates::normalize_angle(2.5 * PI) - 0.5 * PI).abs() < EPSILON);
        assert!((SpatialCoordinates::normalize_angle(-2.5 * PI) - -0.5 * PI).abs() < EPSILON);
    }

    #[test]
    fn test_drive_constructor() {
        let drive = chassis();
        assert_eq!(drive.wheel_radius(), 3.4);
        assert_eq!(drive.axle_length(), 7.5);
    }

    #[test]
    fn test_constructor_rejects_bad_geometry() {
        assert!(matches!(
            DifferentialDrive::new(0.0, 7.5),
            Err(KinematicsError::InvalidWheelRadius("must be positive"))
        ));
        assert!(matches!(
            DifferentialDrive::new(3.4, -1.0),
            Err(KinematicsError::InvalidAxleLength("must be positive"))
        ));
        assert!(matches!(
            DifferentialDrive::new(f64::NAN, 7.5),
            Err(KinematicsError::InvalidWheelRadius(_))
        ));
        assert!(matches!(
            DifferentialDrive::new(3.4, f64::NAN),
            Err(KinematicsError::InvalidAxleLength(_))
        ));
    }

    #[test]
    fn test_wheel_angular_speeds() {
        let drive = DifferentialDrive::new(2.0, 7.5).unwrap();
        let shafts = drive.wheel_angular_speeds(WheelSpeeds::new(10.0, -4.0));
        assert!((shafts.left - 5.0).abs() < EPSILON);
        assert!((shafts.right - (-2.0)).abs() < EPSILON);
    }

    #[test]
    fn test_straight_command_forward_and_reversed() {
        let drive = chassis();
        let forward = drive.inverse_kinematics(ChassisSpeeds::new(10.0, 0.0), Face::Forward);
        assert_eq!(forward, WheelSpeeds::new(10.0, 10.0));

        let reversed = drive.inverse_kinematics(ChassisSpeeds::new(10.0, 0.0), Face::Reversed);
        assert_eq!(reversed, WheelSpeeds::new(-10.0, -10.0));
    }

    #[test]
    fn test_turning_command() {
        let drive = chassis();
        // 0.5 * 7.5 * 2.0 = 7.5
        let forward = drive.inverse_kinematics(ChassisSpeeds::new(20.0, 2.0), Face::Forward);
        assert!((forward.left - 12.5).abs() < EPSILON);
        assert!((forward.right - 27.5).abs() < EPSILON);

        let reversed = drive.inverse_kinematics(ChassisSpeeds::new(20.0, 2.0), Face::Reversed);
        assert!((reversed.left - (-27.5)).abs() < EPSILON);
        assert!((reversed.right - (-12.5)).abs() < EPSILON);
    }

    #[test]
    fn test_forward_kinematics_undoes_inverse() {
        let drive = chassis();
        let command = ChassisSpeeds::new(-13.0, 0.75);
        for face in [Face::Forward, Face::Reversed] {
            let wheels = drive.inverse_kinematics(command, face);
            let back = drive.forward_kinematics(wheels, face);
            assert!((back.v - command.v).abs() < EPSILON, "face {face}");
            assert!((back.omega - command.omega).abs() < EPSILON, "face {face}");
        }
    }

    #[test]
    fn test_face_flip() {
        assert_eq!(Face::default(), Face::Forward);
        assert_eq!(Face::Forward.flipped(), Face::Reversed);
        assert_eq!(Face::Reversed.flipped(), Face::Forward);
    }

    #[test]
    fn test_update_pose_straight() {
        let drive = chassis();
        let start = SpatialCoordinates::new(10.0, 20.0, PI / 2.0);
        let pose = drive.update_pose(start, ChassisSpeeds::new(30.0, 0.0), 0.5).unwrap();
        assert!((pose.x - 10.0).abs() < EPSILON);
        assert!((pose.y - 35.0).abs() < EPSILON);
        assert!((pose.rotation - PI / 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_update_pose_wraps_heading() {
        let drive = chassis();
        let start = SpatialCoordinates::new(0.0, 0.0, 0.75 * PI);
        let pose = drive.update_pose(start, ChassisSpeeds::new(0.0, PI / 2.0), 1.0).unwrap();
        assert!((pose.rotation - (-0.75 * PI)).abs() < EPSILON);
    }

    #[test]
    fn test_update_pose_negative_dt() {
        let drive = chassis();
        let result = drive.update_pose(SpatialCoordinates::default(), ChassisSpeeds::default(), -0.1);
        assert!(matches!(result, Err(KinematicsError::NegativeTimeDelta("must be non-negative"))));
    }
}

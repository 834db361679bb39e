//! The seam between drive commands and whatever moves the wheels.

use vsss_kinematics::WheelSpeeds;

/// One wheel-speed command addressed to a robot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelCommand {
    /// Match index of the robot the command is for.
    pub index: u8,
    /// Commanded wheel speeds (cm/s).
    pub speeds: WheelSpeeds,
}

impl core::fmt::Display for WheelCommand {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "robot {} {}", self.index, self.speeds)
    }
}

/// Delivers wheel speeds to hardware or a simulator.
///
/// Transport reliability belongs to the implementor; the caller sends once
/// per computed command and does not retry.
pub trait Actuator {
    /// Error raised when a command cannot be handed over.
    type Error;

    /// Send left and right wheel speeds (cm/s) to the robot with match index `index`.
    fn send(&mut self, index: u8, left: f64, right: f64) -> Result<(), Self::Error>;
}

//! Where a robot is headed.

use vsss_kinematics::{Kinematic, KinematicBody};

/// The point a robot is currently driving toward.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Target {
    body: KinematicBody,
}

impl Target {
    /// Construct a target at the origin.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Kinematic for Target {
    fn body(&self) -> &KinematicBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut KinematicBody {
        &mut self.body
    }
}

impl core::fmt::Display for Target {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Target {}", self.body)
    }
}

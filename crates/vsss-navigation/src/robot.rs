//! Robots: drive command conversion, arrival and rosters.

use tracing::debug;
use vsss_kinematics::{ChassisSpeeds, DifferentialDrive, Face, Kinematic, KinematicBody, WheelSpeeds};

use crate::actuator::Actuator;
use crate::drive::{DriveLimits, DriveProfile};
use crate::error::NavigationError;
use crate::field::{FieldGeometry, TeamColor};
use crate::obstacle::Obstacle;
use crate::target::Target;

/// Handle of a robot inside a [`World`](crate::World).
///
/// Handles are the identity of a robot: two robots with equal coordinates are
/// still different robots, two equal handles are the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RobotId(pub(crate) usize);

impl RobotId {
    /// Position of the robot in the world registry.
    pub fn slot(self) -> usize {
        self.0
    }
}

impl core::fmt::Display for RobotId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One feed sample for a robot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RobotSample {
    /// Measured x position (cm).
    pub x: f64,
    /// Measured y position (cm).
    pub y: f64,
    /// Measured heading (rad).
    pub orientation: f64,
    /// Velocity x component (cm/s).
    pub vx: f64,
    /// Velocity y component (cm/s).
    pub vy: f64,
    /// Angular rate (rad/s).
    pub angular: f64,
}

/// A differential-drive robot with its target, obstacle and rosters.
#[derive(Debug, Clone, PartialEq)]
pub struct Robot {
    body: KinematicBody,
    id: RobotId,
    index: u8,
    team: TeamColor,
    drive: DifferentialDrive,
    limits: DriveLimits,
    arrival_threshold: f64,
    face: Face,
    wheels: WheelSpeeds,
    obstacle: Obstacle,
    target: Target,
    friends: Vec<RobotId>,
    enemies: Vec<RobotId>,
}

impl Robot {
    pub(crate) fn new(
        id: RobotId,
        index: u8,
        team: TeamColor,
        profile: &DriveProfile,
        field: &FieldGeometry,
    ) -> Result<Self, NavigationError> {
        Ok(Robot {
            body: KinematicBody::default(),
            id,
            index,
            team,
            drive: profile.chassis()?,
            limits: profile.limits_for(index),
            arrival_threshold: field.arrival_threshold,
            face: Face::Forward,
            wheels: WheelSpeeds::default(),
            obstacle: Obstacle::new(id),
            target: Target::new(),
            friends: Vec::new(),
            enemies: Vec::new(),
        })
    }

    /// Registry handle of this robot.
    pub fn id(&self) -> RobotId {
        self.id
    }

    /// Match index, as addressed by the actuator.
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Team colour.
    pub fn team(&self) -> TeamColor {
        self.team
    }

    /// Chassis geometry used for command conversion.
    pub fn drive(&self) -> &DifferentialDrive {
        &self.drive
    }

    /// Speed bounds for this robot's index.
    pub fn limits(&self) -> DriveLimits {
        self.limits
    }

    /// Which end of the chassis currently leads.
    pub fn face(&self) -> Face {
        self.face
    }

    /// Select which end of the chassis leads.
    pub fn set_face(&mut self, face: Face) {
        self.face = face;
    }

    /// Swap the leading end of the chassis.
    pub fn toggle_face(&mut self) {
        self.face = self.face.flipped();
    }

    /// Wheel speeds produced by the last [`Robot::set_velocity_command`].
    pub fn wheel_speeds(&self) -> WheelSpeeds {
        self.wheels
    }

    /// Current obstacle snapshot.
    pub fn obstacle(&self) -> &Obstacle {
        &self.obstacle
    }

    /// Mutable obstacle snapshot.
    pub fn obstacle_mut(&mut self) -> &mut Obstacle {
        &mut self.obstacle
    }

    /// Point the robot is driving toward.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Mutable target, for the decision layer.
    pub fn target_mut(&mut self) -> &mut Target {
        &mut self.target
    }

    /// True if the target is within the arrival threshold, boundary included.
    pub fn arrive(&self) -> bool {
        self.distance_to(&self.target) <= self.arrival_threshold
    }

    /// Overwrite pose and velocity from one feed sample.
    pub fn set_simulator_data(&mut self, sample: RobotSample) {
        self.set_coordinates(sample.x, sample.y, sample.orientation);
        let linear = sample.vx.hypot(sample.vy);
        self.set_velocities(linear, sample.angular, sample.vx, sample.vy);
    }

    /// Convert `(v, w)` into wheel speeds for the current face and send them.
    ///
    /// No clamping to [`Robot::limits`] happens here; callers that want the
    /// bounds enforced apply them to `v` and `w` before calling.
    pub fn set_velocity_command<A: Actuator>(
        &mut self,
        v: f64,
        w: f64,
        actuator: &mut A,
    ) -> Result<WheelSpeeds, A::Error> {
        self.wheels = self.drive.inverse_kinematics(ChassisSpeeds::new(v, w), self.face);
        let shafts = self.drive.wheel_angular_speeds(self.wheels);
        debug!(
            robot = self.index,
            v,
            w,
            face = %self.face,
            left = self.wheels.left,
            right = self.wheels.right,
            left_rad = shafts.left,
            right_rad = shafts.right,
            "velocity command"
        );
        actuator.send(self.index, self.wheels.left, self.wheels.right)?;
        Ok(self.wheels)
    }

    /// Send wheel speeds as given, bypassing the geometry conversion.
    pub fn set_wheel_velocities<A: Actuator>(
        &self,
        left: f64,
        right: f64,
        actuator: &mut A,
    ) -> Result<(), A::Error> {
        actuator.send(self.index, left, right)
    }

    /// Replace the teammate roster, dropping this robot's own handle.
    pub fn set_friends(&mut self, friends: Vec<RobotId>) {
        let id = self.id;
        self.friends = friends;
        self.friends.retain(|&friend| friend != id);
    }

    /// Replace the opponent roster as given.
    pub fn set_enemies(&mut self, enemies: Vec<RobotId>) {
        self.enemies = enemies;
    }

    /// Teammate handles, never including this robot.
    pub fn friends(&self) -> &[RobotId] {
        &self.friends
    }

    /// Opponent handles.
    pub fn enemies(&self) -> &[RobotId] {
        &self.enemies
    }
}

impl Kinematic for Robot {
    fn body(&self) -> &KinematicBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut KinematicBody {
        &mut self.body
    }
}

impl core::fmt::Display for Robot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Robot {} {} ({} face) {}", self.team, self.index, self.face, self.body)
    }
}

//! Registry of every body in the match.
//!
//! Robots refer to each other through [`RobotId`] handles into this registry,
//! so a robot's rosters and its obstacle's back-reference never own anything.

use tracing::{debug, info};
use vsss_kinematics::SpatialCoordinates;

use crate::ball::{Ball, BallSample};
use crate::drive::DriveProfile;
use crate::error::NavigationError;
use crate::field::{FieldGeometry, TeamColor};
use crate::obstacle::{self, ObstacleStrategy};
use crate::robot::{Robot, RobotId, RobotSample};

/// All robots, the ball and the field they play on.
#[derive(Debug, Clone)]
pub struct World {
    field: FieldGeometry,
    profile: DriveProfile,
    ball: Ball,
    robots: Vec<Robot>,
}

impl World {
    /// Create an empty world.
    ///
    /// # Errors
    ///
    /// Fails if the field or the drive profile does not pass validation, see
    /// [`FieldGeometry::validate`] and [`DriveProfile::validate`].
    pub fn new(field: FieldGeometry, profile: DriveProfile) -> Result<Self, NavigationError> {
        field.validate()?;
        profile.validate()?;
        Ok(World {
            field,
            profile,
            ball: Ball::new(),
            robots: Vec::new(),
        })
    }

    /// Field constants.
    pub fn field(&self) -> &FieldGeometry {
        &self.field
    }

    /// Drive profile new robots are built from.
    pub fn profile(&self) -> &DriveProfile {
        &self.profile
    }

    /// The ball.
    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    /// Mutable ball.
    pub fn ball_mut(&mut self) -> &mut Ball {
        &mut self.ball
    }

    /// Register a robot and return its handle.
    ///
    /// # Errors
    ///
    /// Fails if the drive profile does not describe a valid chassis.
    pub fn spawn_robot(&mut self, index: u8, team: TeamColor) -> Result<RobotId, NavigationError> {
        let id = RobotId(self.robots.len());
        let robot = Robot::new(id, index, team, &self.profile, &self.field)?;
        info!(%id, index, %team, limits = ?robot.limits(), "robot registered");
        self.robots.push(robot);
        Ok(id)
    }

    /// Look up a robot by handle.
    pub fn robot(&self, id: RobotId) -> Result<&Robot, NavigationError> {
        self.robots.get(id.0).ok_or(NavigationError::UnknownRobot(id.0))
    }

    /// Look up a robot by handle, mutably.
    pub fn robot_mut(&mut self, id: RobotId) -> Result<&mut Robot, NavigationError> {
        self.robots.get_mut(id.0).ok_or(NavigationError::UnknownRobot(id.0))
    }

    /// Every robot in registration order.
    pub fn robots(&self) -> impl Iterator<Item = &Robot> {
        self.robots.iter()
    }

    /// Handles of every robot in registration order.
    pub fn robot_ids(&self) -> impl Iterator<Item = RobotId> + use<> {
        (0..self.robots.len()).map(RobotId)
    }

    /// Handles of the robots wearing `team`, in registration order.
    pub fn team(&self, team: TeamColor) -> Vec<RobotId> {
        self.robots.iter().filter(|r| r.team() == team).map(Robot::id).collect()
    }

    /// Replace the teammate roster of `id`.
    ///
    /// # Errors
    ///
    /// Fails if `id` or any roster handle is not registered.
    pub fn set_friends(&mut self, id: RobotId, friends: Vec<RobotId>) -> Result<(), NavigationError> {
        self.check_handles(&friends)?;
        self.robot_mut(id)?.set_friends(friends);
        Ok(())
    }

    /// Replace the opponent roster of `id`.
    ///
    /// # Errors
    ///
    /// Fails if `id` or any roster handle is not registered.
    pub fn set_enemies(&mut self, id: RobotId, enemies: Vec<RobotId>) -> Result<(), NavigationError> {
        self.check_handles(&enemies)?;
        self.robot_mut(id)?.set_enemies(enemies);
        Ok(())
    }

    /// Give every robot its own team as friends and the other team as enemies.
    pub fn assign_rosters_by_team(&mut self) {
        let blue = self.team(TeamColor::Blue);
        let yellow = self.team(TeamColor::Yellow);
        for robot in &mut self.robots {
            let (friends, enemies) = match robot.team() {
                TeamColor::Blue => (blue.clone(), yellow.clone()),
                TeamColor::Yellow => (yellow.clone(), blue.clone()),
            };
            robot.set_friends(friends);
            robot.set_enemies(enemies);
        }
        debug!(blue = blue.len(), yellow = yellow.len(), "rosters assigned");
    }

    /// Write one feed sample into robot `id`.
    pub fn ingest_robot(&mut self, id: RobotId, sample: RobotSample) -> Result<(), NavigationError> {
        self.robot_mut(id)?.set_simulator_data(sample);
        Ok(())
    }

    /// Write one feed sample into the ball.
    pub fn ingest_ball(&mut self, sample: BallSample) {
        self.ball.set_simulator_data(sample, &self.field);
    }

    /// Apply one tick of feed data.
    ///
    /// Samples are applied in order; on an unknown handle the samples before it
    /// have been written and the ball has not.
    pub fn ingest(
        &mut self,
        robots: impl IntoIterator<Item = (RobotId, RobotSample)>,
        ball: BallSample,
    ) -> Result<(), NavigationError> {
        for (id, sample) in robots {
            self.ingest_robot(id, sample)?;
        }
        self.ingest_ball(ball);
        Ok(())
    }

    /// Refresh the obstacle of robot `id` and return the selected coordinates.
    ///
    /// Rosters and the ball must already hold this tick's data.
    ///
    /// # Errors
    ///
    /// `NavigationError::EmptyCandidateSet` if nothing is left to select,
    /// `NavigationError::UnknownRobot` for a stale handle. The previous
    /// obstacle is kept on error.
    pub fn update_obstacle(
        &mut self,
        id: RobotId,
        strategy: ObstacleStrategy,
    ) -> Result<SpatialCoordinates, NavigationError> {
        let owner = self.robot(id)?;
        let friends = self.resolve(owner.friends())?;
        let enemies = self.resolve(owner.enemies())?;

        let chosen = match strategy {
            ObstacleStrategy::Nearest => obstacle::select_nearest(owner, &friends, &enemies)?,
            ObstacleStrategy::Filtered => {
                obstacle::select_filtered(owner, &self.ball, &friends, &enemies, &self.field)?
            }
        };

        self.robot_mut(id)?.obstacle_mut().set_obstacle(chosen);
        Ok(chosen)
    }

    fn resolve(&self, ids: &[RobotId]) -> Result<Vec<&Robot>, NavigationError> {
        ids.iter().map(|&id| self.robot(id)).collect()
    }

    fn check_handles(&self, ids: &[RobotId]) -> Result<(), NavigationError> {
        match ids.iter().find(|id| id.0 >= self.robots.len()) {
            Some(id) => Err(NavigationError::UnknownRobot(id.0)),
            None => Ok(()),
        }
    }
}

//! Choosing the single body a robot has to steer around this tick.
//!
//! Two selection rules exist. [`ObstacleStrategy::Nearest`] takes the closest
//! robot of either team. [`ObstacleStrategy::Filtered`] first drops opponents
//! that should not be avoided:
//!
//! * an opponent close enough to the ball to be carrying it, and
//! * the opposing goalkeeper near its own goal while the ball is also deep near
//!   the robot's own goal.
//!
//! Teammates are never filtered. Among the survivors the one closest to the
//! owning robot wins; ties go to the earlier candidate, opponents first and
//! then teammates, each in roster order.

use tracing::{debug, trace};
use vsss_kinematics::{Kinematic, KinematicBody, SpatialCoordinates};

use crate::ball::Ball;
use crate::error::NavigationError;
use crate::field::{FieldGeometry, GoalDistance};
use crate::robot::{Robot, RobotId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which selection rule an obstacle update uses.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObstacleStrategy {
    /// Closest robot among teammates and opponents, no exclusions.
    Nearest,
    /// Closest robot after dropping the ball carrier and the deep goalkeeper.
    #[default]
    Filtered,
}

/// The nearest relevant body of one robot, as a coordinate snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    body: KinematicBody,
    owner: RobotId,
}

impl Obstacle {
    pub(crate) fn new(owner: RobotId) -> Self {
        Obstacle {
            body: KinematicBody::default(),
            owner,
        }
    }

    /// Handle of the robot this obstacle belongs to.
    pub fn owner(&self) -> RobotId {
        self.owner
    }

    /// Store the coordinates of the selected body.
    pub fn set_obstacle(&mut self, coordinates: SpatialCoordinates) {
        self.set_coordinates(coordinates.x, coordinates.y, coordinates.rotation);
    }
}

impl Kinematic for Obstacle {
    fn body(&self) -> &KinematicBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut KinematicBody {
        &mut self.body
    }
}

impl core::fmt::Display for Obstacle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Obstacle of {} {}", self.owner, self.body)
    }
}

/// Closest body among `enemies` and `friends`, measured from `owner`.
///
/// # Errors
///
/// `NavigationError::EmptyCandidateSet` if both rosters are empty.
pub fn select_nearest(
    owner: &Robot,
    friends: &[&Robot],
    enemies: &[&Robot],
) -> Result<SpatialCoordinates, NavigationError> {
    closest(owner, enemies.iter().chain(friends).copied())
        .ok_or(NavigationError::EmptyCandidateSet("no teammates or opponents"))
}

/// Closest body after applying the exclusion rules to `enemies`.
///
/// # Errors
///
/// `NavigationError::EmptyCandidateSet` if there are no teammates and every
/// opponent was excluded.
pub fn select_filtered(
    owner: &Robot,
    ball: &Ball,
    friends: &[&Robot],
    enemies: &[&Robot],
    field: &FieldGeometry,
) -> Result<SpatialCoordinates, NavigationError> {
    let ball_deep = ball.distance_to_goal(field, owner.team()) < field.goal_area_radius;

    let surviving: Vec<&Robot> = enemies
        .iter()
        .copied()
        .filter(|enemy| {
            let to_ball = enemy.distance_to(ball);
            if to_ball < field.ball_possession_radius {
                trace!(enemy = enemy.index(), to_ball, "opponent holds the ball, not an obstacle");
                return false;
            }
            let to_goal = enemy.distance_to_goal(field, enemy.team());
            if ball_deep && to_goal < field.goal_area_radius {
                trace!(enemy = enemy.index(), to_goal, "goalkeeper with the ball deep, not an obstacle");
                return false;
            }
            true
        })
        .collect();

    closest(owner, surviving.into_iter().chain(friends.iter().copied()))
        .ok_or(NavigationError::EmptyCandidateSet("every opponent excluded and no teammates"))
}

fn closest<'a>(owner: &Robot, candidates: impl Iterator<Item = &'a Robot>) -> Option<SpatialCoordinates> {
    // `min_by` keeps the first of equal elements, like a stable sort.
    let (nearest, distance) = candidates
        .map(|candidate| (candidate, owner.distance_to(candidate)))
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    debug!(
        robot = owner.index(),
        obstacle = nearest.index(),
        team = %nearest.team(),
        distance,
        "obstacle selected"
    );
    Some(nearest.coordinates())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ball::BallSample;
    use crate::drive::DriveProfile;
    use crate::field::TeamColor;

    fn robot(slot: usize, team: TeamColor, x: f64, y: f64) -> Robot {
        let field = FieldGeometry::default();
        let mut robot = Robot::new(RobotId(slot), slot as u8, team, &DriveProfile::default(), &field).unwrap();
        robot.set_coordinates(x, y, 0.1 * slot as f64);
        robot
    }

    fn still_ball(x: f64, y: f64) -> Ball {
        let mut ball = Ball::new();
        ball.set_simulator_data(BallSample::new(x, y, 0.0, 0.0), &FieldGeometry::default());
        ball
    }

    #[test]
    fn test_nearest_picks_closest_of_both_rosters() {
        let owner = robot(0, TeamColor::Blue, 80.0, 60.0);
        let friend = robot(1, TeamColor::Blue, 80.0, 90.0);
        let enemy = robot(3, TeamColor::Yellow, 100.0, 60.0);

        let chosen = select_nearest(&owner, &[&friend], &[&enemy]).unwrap();
        assert_eq!(chosen, enemy.coordinates());
    }

    #[test]
    fn test_nearest_copies_rotation() {
        let owner = robot(0, TeamColor::Blue, 80.0, 60.0);
        let friend = robot(2, TeamColor::Blue, 81.0, 60.0);

        let chosen = select_nearest(&owner, &[&friend], &[]).unwrap();
        assert_eq!(chosen.rotation, 0.2);
    }

    #[test]
    fn test_nearest_empty_rosters() {
        let owner = robot(0, TeamColor::Blue, 80.0, 60.0);
        assert!(matches!(
            select_nearest(&owner, &[], &[]),
            Err(NavigationError::EmptyCandidateSet(_))
        ));
    }

    #[test]
    fn test_ball_carrier_excluded_even_when_closest() {
        let field = FieldGeometry::default();
        let owner = robot(0, TeamColor::Blue, 80.0, 60.0);
        // 5 cm from the robot, 10 cm from the ball.
        let carrier = robot(3, TeamColor::Yellow, 85.0, 60.0);
        let ball = still_ball(95.0, 60.0);
        let friend = robot(1, TeamColor::Blue, 80.0, 110.0);

        let chosen = select_filtered(&owner, &ball, &[&friend], &[&carrier], &field).unwrap();
        assert_eq!(chosen, friend.coordinates());
    }

    #[test]
    fn test_opponent_at_possession_radius_is_kept() {
        let field = FieldGeometry::default();
        let owner = robot(0, TeamColor::Blue, 80.0, 60.0);
        let enemy = robot(3, TeamColor::Yellow, 85.0, 60.0);
        let ball = still_ball(100.0, 60.0);
        let friend = robot(1, TeamColor::Blue, 80.0, 110.0);

        let chosen = select_filtered(&owner, &ball, &[&friend], &[&enemy], &field).unwrap();
        assert_eq!(chosen, enemy.coordinates());
    }

    #[test]
    fn test_teammates_never_filtered() {
        let field = FieldGeometry::default();
        let owner = robot(0, TeamColor::Blue, 140.0, 65.0);
        // Right next to the ball and inside the blue goal area.
        let friend = robot(1, TeamColor::Blue, 150.0, 65.0);
        let ball = still_ball(152.0, 65.0);

        let chosen = select_filtered(&owner, &ball, &[&friend], &[], &field).unwrap();
        assert_eq!(chosen, friend.coordinates());
    }

    #[test]
    fn test_goalkeeper_excluded_when_ball_deep() {
        let field = FieldGeometry::default();
        // Blue defends x = 160; yellow keeper defends x = 10.
        let owner = robot(0, TeamColor::Blue, 30.0, 65.0);
        let keeper = robot(3, TeamColor::Yellow, 15.0, 65.0);
        let friend = robot(1, TeamColor::Blue, 30.0, 120.0);

        let ball_deep = still_ball(150.0, 65.0);
        let chosen = select_filtered(&owner, &ball_deep, &[&friend], &[&keeper], &field).unwrap();
        assert_eq!(chosen, friend.coordinates());

        let ball_midfield = still_ball(85.0, 65.0);
        let chosen = select_filtered(&owner, &ball_midfield, &[&friend], &[&keeper], &field).unwrap();
        assert_eq!(chosen, keeper.coordinates());
    }

    #[test]
    fn test_goalkeeper_at_goal_area_radius_is_kept() {
        let field = FieldGeometry::default();
        let owner = robot(0, TeamColor::Blue, 60.0, 65.0);
        // Exactly 20 cm from the yellow goal at (10, 65).
        let keeper = robot(3, TeamColor::Yellow, 30.0, 65.0);
        let friend = robot(1, TeamColor::Blue, 60.0, 120.0);
        let ball_deep = still_ball(150.0, 65.0);

        let chosen = select_filtered(&owner, &ball_deep, &[&friend], &[&keeper], &field).unwrap();
        assert_eq!(chosen, keeper.coordinates());
    }

    #[test]
    fn test_opponent_outside_goal_area_kept_with_ball_deep() {
        let field = FieldGeometry::default();
        let owner = robot(0, TeamColor::Blue, 60.0, 65.0);
        let defender = robot(3, TeamColor::Yellow, 35.0, 65.0);
        let friend = robot(1, TeamColor::Blue, 60.0, 120.0);
        let ball_deep = still_ball(150.0, 65.0);

        let chosen = select_filtered(&owner, &ball_deep, &[&friend], &[&defender], &field).unwrap();
        assert_eq!(chosen, defender.coordinates());
    }

    #[test]
    fn test_ball_at_goal_area_radius_is_not_deep() {
        let field = FieldGeometry::default();
        let owner = robot(0, TeamColor::Blue, 30.0, 65.0);
        let keeper = robot(3, TeamColor::Yellow, 15.0, 65.0);
        let friend = robot(1, TeamColor::Blue, 30.0, 120.0);
        // Exactly 20 cm from the blue goal at (160, 65).
        let ball = still_ball(140.0, 65.0);

        let chosen = select_filtered(&owner, &ball, &[&friend], &[&keeper], &field).unwrap();
        assert_eq!(chosen, keeper.coordinates());
    }

    #[test]
    fn test_filter_examines_every_opponent() {
        let field = FieldGeometry::default();
        let owner = robot(0, TeamColor::Blue, 80.0, 60.0);
        let ball = still_ball(90.0, 60.0);
        // Two adjacent carriers, then a far opponent that must survive.
        let first = robot(3, TeamColor::Yellow, 88.0, 60.0);
        let second = robot(4, TeamColor::Yellow, 92.0, 60.0);
        let far = robot(5, TeamColor::Yellow, 80.0, 100.0);

        let chosen = select_filtered(&owner, &ball, &[], &[&first, &second, &far], &field).unwrap();
        assert_eq!(chosen, far.coordinates());
    }

    #[test]
    fn test_everything_excluded() {
        let field = FieldGeometry::default();
        let owner = robot(0, TeamColor::Blue, 80.0, 60.0);
        let ball = still_ball(90.0, 60.0);
        let carrier = robot(3, TeamColor::Yellow, 88.0, 60.0);

        assert!(matches!(
            select_filtered(&owner, &ball, &[], &[&carrier], &field),
            Err(NavigationError::EmptyCandidateSet(_))
        ));
    }

    #[test]
    fn test_tie_goes_to_opponent_listed_first() {
        let field = FieldGeometry::default();
        let owner = robot(0, TeamColor::Blue, 80.0, 60.0);
        let ball = still_ball(20.0, 120.0);
        let enemy = robot(3, TeamColor::Yellow, 80.0, 80.0);
        let friend = robot(1, TeamColor::Blue, 80.0, 40.0);

        let chosen = select_filtered(&owner, &ball, &[&friend], &[&enemy], &field).unwrap();
        assert_eq!(chosen, enemy.coordinates());
    }

    #[test]
    fn test_obstacle_stores_selection() {
        let mut obstacle = Obstacle::new(RobotId(4));
        obstacle.set_obstacle(SpatialCoordinates::new(1.0, 2.0, 3.0));
        assert_eq!(obstacle.owner(), RobotId(4));
        assert_eq!(obstacle.coordinates(), SpatialCoordinates::new(1.0, 2.0, 3.0));
    }
}

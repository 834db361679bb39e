//! A minimal decision layer so the harness has something to drive with:
//! every robot chases the ball except index 0, which shadows it along its
//! own goal mouth.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, PI};

use vsss_kinematics::{ChassisSpeeds, Face, Kinematic, SpatialCoordinates};
use vsss_navigation::{NavigationError, Robot, World};

use crate::config::ControlGains;

/// How far in front of its goal mouth the keeper stands (cm).
const KEEPER_DEPTH: f64 = 8.0;
/// Half-width of the strip the keeper shadows the ball in (cm).
const KEEPER_SPAN: f64 = 20.0;

/// What the controller wants a robot to do this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub command: ChassisSpeeds,
    /// The target is behind the current front: swap ends instead of turning around.
    pub flip_face: bool,
}

/// Point every robot's target at this tick's ball.
pub fn assign_targets(world: &mut World) -> Result<(), NavigationError> {
    let ball = world.ball().coordinates();
    let field = world.field().clone();

    for id in world.robot_ids() {
        let robot = world.robot_mut(id)?;
        let (x, y) = if robot.index() == 0 {
            let goal = field.own_goal(robot.team());
            let inward = if goal.x > (field.min_x + field.max_x) / 2.0 { -1.0 } else { 1.0 };
            (
                goal.x + inward * KEEPER_DEPTH,
                ball.y.clamp(goal.y - KEEPER_SPAN, goal.y + KEEPER_SPAN),
            )
        } else {
            (ball.x, ball.y)
        };
        robot.target_mut().set_coordinates(x, y, 0.0);
    }
    Ok(())
}

/// Proportional go-to-target with a nudge away from the current obstacle.
///
/// The command is clamped to the robot's drive limits here; the robot itself
/// sends whatever it is given.
pub fn decide(robot: &Robot, gains: &ControlGains) -> Decision {
    if robot.arrive() {
        return Decision {
            command: ChassisSpeeds::default(),
            flip_face: false,
        };
    }

    let pose = robot.coordinates();
    let heading = effective_heading(pose, robot.face());
    let target = robot.target().coordinates();
    let (dx, dy) = (target.x - pose.x, target.y - pose.y);
    let distance = dx.hypot(dy);
    let heading_error = SpatialCoordinates::normalize_angle(dy.atan2(dx) - heading);

    if heading_error.abs() > FRAC_PI_2 {
        return Decision {
            command: ChassisSpeeds::default(),
            flip_face: true,
        };
    }

    let mut v = gains.kp_linear * distance;
    let mut w = gains.kp_angular * heading_error;

    let obstacle = robot.obstacle().coordinates();
    let to_obstacle = robot.distance_to(robot.obstacle());
    if to_obstacle < gains.avoid_radius && to_obstacle > f64::EPSILON {
        let bearing = SpatialCoordinates::normalize_angle(
            (obstacle.y - pose.y).atan2(obstacle.x - pose.x) - heading,
        );
        if bearing.abs() < FRAC_PI_3 {
            let closeness = 1.0 - to_obstacle / gains.avoid_radius;
            let away = if bearing >= 0.0 { -1.0 } else { 1.0 };
            w += away * gains.avoid_gain * closeness;
            v *= 1.0 - closeness;
        }
    }

    let limits = robot.limits();
    let max_w = limits.max_angular.min(gains.max_turn_rate);
    v = v.clamp(0.0, limits.max_linear);
    w = w.clamp(-max_w, max_w);

    Decision {
        command: ChassisSpeeds::new(v, w),
        flip_face: false,
    }
}

fn effective_heading(pose: SpatialCoordinates, face: Face) -> f64 {
    match face {
        Face::Forward => pose.rotation,
        Face::Reversed => SpatialCoordinates::normalize_angle(pose.rotation + PI),
    }
}

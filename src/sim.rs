//! Kinematic stand-in for the simulator feed.
//!
//! Integrates the wheel commands coming off the command topic into robot
//! poses, rolls the ball with damping and edge bounces, and hands both back
//! as feed samples. Good enough to close the loop; no contact physics beyond
//! a robot nudging the ball.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{trace, warn};

use vsss_kinematics::{DifferentialDrive, Face, KinematicsError, SpatialCoordinates, WheelSpeeds};
use vsss_navigation::{BallSample, FieldGeometry, RobotId, RobotSample, TeamColor};

use crate::bus::TeamCommand;

/// A robot touching the ball within this distance (cm) pushes it.
const CONTACT_RADIUS: f64 = 6.0;
/// Ball speed gained from a push, relative to the robot's speed.
const PUSH_GAIN: f64 = 1.3;

struct SimRobot {
    id: RobotId,
    index: u8,
    team: TeamColor,
    pose: SpatialCoordinates,
    wheels: WheelSpeeds,
    velocity: (f64, f64, f64),
}

pub struct Simulator {
    chassis: DifferentialDrive,
    field: FieldGeometry,
    dt: f64,
    damping: f64,
    robots: Vec<SimRobot>,
    ball: (f64, f64, f64, f64),
    commands: broadcast::Receiver<Arc<TeamCommand>>,
}

impl Simulator {
    pub fn new(
        chassis: DifferentialDrive,
        field: FieldGeometry,
        dt: f64,
        damping: f64,
        commands: broadcast::Receiver<Arc<TeamCommand>>,
    ) -> Self {
        let ball = ((field.min_x + field.max_x) / 2.0, (field.min_y + field.max_y) / 2.0, 0.0, 0.0);
        Simulator {
            chassis,
            field,
            dt,
            damping,
            robots: Vec::new(),
            ball,
            commands,
        }
    }

    pub fn add_robot(&mut self, id: RobotId, index: u8, team: TeamColor, pose: SpatialCoordinates) {
        self.robots.push(SimRobot {
            id,
            index,
            team,
            pose,
            wheels: WheelSpeeds::default(),
            velocity: (0.0, 0.0, 0.0),
        });
    }

    /// Kick-off position for robot `index` of `team`, on that team's own half.
    pub fn kickoff_pose(field: &FieldGeometry, team: TeamColor, index: u8) -> SpatialCoordinates {
        let goal = field.own_goal(team);
        let toward_center = if goal.x > (field.min_x + field.max_x) / 2.0 { -1.0 } else { 1.0 };
        let depth = 10.0 + 25.0 * f64::from(index);
        let lane = field.min_y + (field.max_y - field.min_y) * (0.3 + 0.2 * f64::from(index % 3));
        let y = if index == 0 { goal.y } else { lane };
        let heading = if toward_center > 0.0 { 0.0 } else { std::f64::consts::PI };
        SpatialCoordinates::new(goal.x + toward_center * depth, y, SpatialCoordinates::normalize_angle(heading))
    }

    /// Apply pending commands and advance one tick.
    pub fn step(&mut self) -> Result<(), KinematicsError> {
        self.drain_commands();

        for robot in &mut self.robots {
            // The simulated chassis is always integrated in its physical frame.
            let chassis = self.chassis.forward_kinematics(robot.wheels, Face::Forward);
            let next = self.chassis.update_pose(robot.pose, chassis, self.dt)?;
            robot.velocity = (
                (next.x - robot.pose.x) / self.dt,
                (next.y - robot.pose.y) / self.dt,
                chassis.omega,
            );
            robot.pose = SpatialCoordinates::new(
                next.x.clamp(0.0, self.field.max_x + self.field.min_x),
                next.y.clamp(self.field.min_y, self.field.max_y),
                next.rotation,
            );
        }

        self.roll_ball();
        Ok(())
    }

    pub fn robot_samples(&self) -> Vec<(RobotId, RobotSample)> {
        self.robots
            .iter()
            .map(|r| {
                let sample = RobotSample {
                    x: r.pose.x,
                    y: r.pose.y,
                    orientation: r.pose.rotation,
                    vx: r.velocity.0,
                    vy: r.velocity.1,
                    angular: r.velocity.2,
                };
                (r.id, sample)
            })
            .collect()
    }

    /// Ball sample in feed units: cm for position, m/s for velocity.
    pub fn ball_sample(&self) -> BallSample {
        let (x, y, vx, vy) = self.ball;
        BallSample::new(x, y, vx / 100.0, vy / 100.0)
    }

    fn drain_commands(&mut self) {
        loop {
            match self.commands.try_recv() {
                Ok(msg) => {
                    if let Some(robot) = self
                        .robots
                        .iter_mut()
                        .find(|r| r.team == msg.team && r.index == msg.command.index)
                    {
                        robot.wheels = msg.command.speeds;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Lagged(n)) => {
                    warn!(skipped = n, "Simulator command receiver lagged.");
                }
                Err(TryRecvError::Closed) => break,
            }
        }
    }

    fn roll_ball(&mut self) {
        let (mut x, mut y, mut vx, mut vy) = self.ball;

        for robot in &self.robots {
            let (dx, dy) = (x - robot.pose.x, y - robot.pose.y);
            let distance = dx.hypot(dy);
            let speed = robot.velocity.0.hypot(robot.velocity.1);
            if distance < CONTACT_RADIUS && distance > f64::EPSILON && speed > 1.0 {
                vx = dx / distance * speed * PUSH_GAIN;
                vy = dy / distance * speed * PUSH_GAIN;
                trace!(robot = robot.index, team = %robot.team, vx, vy, "ball pushed");
            }
        }

        let decay = self.damping.powf(self.dt);
        vx *= decay;
        vy *= decay;
        x += vx * self.dt;
        y += vy * self.dt;

        if x < self.field.min_x || x > self.field.max_x {
            vx = -vx;
            x = x.clamp(self.field.min_x, self.field.max_x);
        }
        if y < self.field.min_y || y > self.field.max_y {
            vy = -vy;
            y = y.clamp(self.field.min_y, self.field.max_y);
        }

        self.ball = (x, y, vx, vy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Topic;
    use vsss_navigation::{DriveProfile, WheelCommand, World};

    fn simulator(topic: &Topic<TeamCommand>) -> Simulator {
        let chassis = DifferentialDrive::new(3.4, 6.11).unwrap();
        Simulator::new(chassis, FieldGeometry::default(), 0.1, 1.0, topic.subscribe())
    }

    #[test]
    fn test_command_moves_addressed_robot_only() {
        let topic: Topic<TeamCommand> = Topic::new(8);
        let mut sim = simulator(&topic);
        let mut world = World::new(FieldGeometry::default(), DriveProfile::default()).unwrap();
        let blue = world.spawn_robot(1, TeamColor::Blue).unwrap();
        let yellow = world.spawn_robot(1, TeamColor::Yellow).unwrap();
        sim.add_robot(blue, 1, TeamColor::Blue, SpatialCoordinates::new(100.0, 30.0, 0.0));
        sim.add_robot(yellow, 1, TeamColor::Yellow, SpatialCoordinates::new(40.0, 30.0, 0.0));

        topic
            .publish(TeamCommand {
                team: TeamColor::Blue,
                command: WheelCommand { index: 1, speeds: WheelSpeeds::new(20.0, 20.0) },
            })
            .unwrap();
        sim.step().unwrap();

        let samples = sim.robot_samples();
        assert_eq!(samples[0].0, blue);
        assert!((samples[0].1.x - 102.0).abs() < 1e-9);
        assert!((samples[0].1.vx - 20.0).abs() < 1e-9);
        assert_eq!(samples[1].1.x, 40.0);
    }

    #[test]
    fn test_ball_sample_in_feed_units() {
        let topic: Topic<TeamCommand> = Topic::new(8);
        let mut sim = simulator(&topic);
        sim.ball = (80.0, 60.0, 50.0, -20.0);
        let sample = sim.ball_sample();
        assert_eq!((sample.vx, sample.vy), (0.5, -0.2));
    }

    #[test]
    fn test_ball_bounces_off_edge() {
        let topic: Topic<TeamCommand> = Topic::new(8);
        let mut sim = simulator(&topic);
        sim.ball = (159.0, 60.0, 100.0, 0.0);
        sim.step().unwrap();

        let (x, _, vx, _) = sim.ball;
        assert_eq!(x, 160.0);
        assert!(vx < 0.0);
    }

    #[test]
    fn test_kickoff_on_own_half() {
        let field = FieldGeometry::default();
        for index in 0..3 {
            assert!(Simulator::kickoff_pose(&field, TeamColor::Blue, index).x > 85.0);
            assert!(Simulator::kickoff_pose(&field, TeamColor::Yellow, index).x < 85.0);
        }
    }
}

#![warn(missing_docs)]
//! Field model and per-tick control results for small-field robot soccer.
//!
//! Each tick the feed writes poses into the [`World`], rosters are refreshed,
//! every robot's obstacle is re-selected, and the decision layer turns its
//! `(v, w)` choice into wheel speeds through [`Robot::set_velocity_command`].
//! The ordering is the caller's job; nothing here checks it.

pub mod actuator;
pub mod ball;
pub mod drive;
pub mod error;
pub mod field;
pub mod obstacle;
pub mod robot;
pub mod target;
pub mod world;

pub use actuator::{Actuator, WheelCommand};
pub use ball::{Ball, BallSample};
pub use drive::{DriveLimits, DriveProfile, SpeedOverride};
pub use error::NavigationError;
pub use field::{FieldGeometry, FieldPoint, GoalDistance, TeamColor};
pub use obstacle::{Obstacle, ObstacleStrategy};
pub use robot::{Robot, RobotId, RobotSample};
pub use target::Target;
pub use world::World;

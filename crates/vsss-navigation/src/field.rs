//! Field constants: goal mouths, playing rectangle and the thresholds the
//! obstacle and arrival rules are tuned with.

use vsss_kinematics::Kinematic;

use crate::error::NavigationError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Feed velocities arrive in m/s; scaling by 100 gives cm/s and the ball is
/// projected eight 60 Hz frames ahead.
pub const DEFAULT_BALL_LOOKAHEAD: f64 = 100.0 * 8.0 / 60.0;

/// Team colour of a robot. Each colour defends its own goal mouth.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TeamColor {
    /// Blue team, defending the goal at the high-x end.
    #[default]
    Blue,
    /// Yellow team, defending the goal at the low-x end.
    Yellow,
}

impl TeamColor {
    /// Returns the other team.
    pub const fn opponent(self) -> Self {
        match self {
            TeamColor::Blue => TeamColor::Yellow,
            TeamColor::Yellow => TeamColor::Blue,
        }
    }
}

impl core::fmt::Display for TeamColor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TeamColor::Blue => write!(f, "blue"),
            TeamColor::Yellow => write!(f, "yellow"),
        }
    }
}

/// Represents a fixed point on the field (centimeters).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FieldPoint {
    /// The x-coordinate in centimeters.
    pub x: f64,
    /// The y-coordinate in centimeters.
    pub y: f64,
}

impl FieldPoint {
    /// Creates a new `FieldPoint`.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Geometry and tuning constants of the playing field.
///
/// The defaults reproduce the small-size field the controllers were tuned on.
/// All distances are in centimeters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGeometry {
    /// Goal mouth defended by the blue team.
    pub blue_goal: FieldPoint,
    /// Goal mouth defended by the yellow team.
    pub yellow_goal: FieldPoint,
    /// Lowest reachable x of the ball.
    pub min_x: f64,
    /// Highest reachable x of the ball.
    pub max_x: f64,
    /// Lowest reachable y of the ball.
    pub min_y: f64,
    /// Highest reachable y of the ball.
    pub max_y: f64,
    /// A robot within this distance of its target has arrived (inclusive).
    pub arrival_threshold: f64,
    /// An opponent closer than this to the ball is treated as carrying it.
    pub ball_possession_radius: f64,
    /// Radius around a goal mouth inside which the goalkeeper rule applies.
    pub goal_area_radius: f64,
    /// Multiplier applied to the feed ball velocity to extrapolate its position.
    pub ball_lookahead: f64,
}

impl Default for FieldGeometry {
    fn default() -> Self {
        FieldGeometry {
            blue_goal: FieldPoint::new(160.0, 65.0),
            yellow_goal: FieldPoint::new(10.0, 65.0),
            min_x: 10.0,
            max_x: 160.0,
            min_y: 0.0,
            max_y: 130.0,
            arrival_threshold: 3.0,
            ball_possession_radius: 15.0,
            goal_area_radius: 20.0,
            ball_lookahead: DEFAULT_BALL_LOOKAHEAD,
        }
    }
}

impl FieldGeometry {
    /// Goal mouth defended by `team`.
    pub fn own_goal(&self, team: TeamColor) -> FieldPoint {
        match team {
            TeamColor::Blue => self.blue_goal,
            TeamColor::Yellow => self.yellow_goal,
        }
    }

    /// Check that the bounds form a rectangle and every threshold is usable.
    ///
    /// # Errors
    ///
    /// `NavigationError::InvalidField` for inverted or non-finite bounds,
    /// non-finite goals, and negative or NaN thresholds.
    pub fn validate(&self) -> Result<(), NavigationError> {
        let bounds = [self.min_x, self.max_x, self.min_y, self.max_y];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(NavigationError::InvalidField("bounds must be finite"));
        }
        if self.min_x > self.max_x {
            return Err(NavigationError::InvalidField("min_x is above max_x"));
        }
        if self.min_y > self.max_y {
            return Err(NavigationError::InvalidField("min_y is above max_y"));
        }
        let goals = [self.blue_goal, self.yellow_goal];
        if goals.iter().any(|g| !g.x.is_finite() || !g.y.is_finite()) {
            return Err(NavigationError::InvalidField("goal mouths must be finite"));
        }
        let thresholds = [
            self.arrival_threshold,
            self.ball_possession_radius,
            self.goal_area_radius,
            self.ball_lookahead,
        ];
        // `!(t >= 0.0)` also rejects NaN.
        if thresholds.iter().any(|t| !(*t >= 0.0)) {
            return Err(NavigationError::InvalidField("thresholds must be non-negative"));
        }
        Ok(())
    }

    /// Returns true if `(x, y)` lies inside the playing rectangle, edges included.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

/// Distance from any body to a goal mouth of the field.
///
/// The goal positions belong to the field, not to the body, so the field is
/// passed in rather than stored.
pub trait GoalDistance: Kinematic {
    /// Euclidean distance to the goal mouth defended by `team`.
    fn distance_to_goal(&self, field: &FieldGeometry, team: TeamColor) -> f64 {
        let goal = field.own_goal(team);
        self.distance_to_point(goal.x, goal.y)
    }
}

impl<T: Kinematic + ?Sized> GoalDistance for T {}

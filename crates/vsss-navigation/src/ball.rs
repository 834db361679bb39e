//! The ball and its short-horizon position prediction.

use tracing::trace;
use vsss_kinematics::{Kinematic, KinematicBody};

use crate::field::FieldGeometry;

/// One feed sample for the ball: position (cm) and velocity as delivered.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BallSample {
    /// Measured x position (cm).
    pub x: f64,
    /// Measured y position (cm).
    pub y: f64,
    /// Velocity x component, in feed units.
    pub vx: f64,
    /// Velocity y component, in feed units.
    pub vy: f64,
}

impl BallSample {
    /// Construct a ball sample.
    pub const fn new(x: f64, y: f64, vx: f64, vy: f64) -> Self {
        BallSample { x, y, vx, vy }
    }
}

/// The game ball.
///
/// Its stored position is not the raw measurement but a short-horizon
/// prediction, bounced off the field edges.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ball {
    body: KinematicBody,
}

impl Ball {
    /// Construct a ball at rest at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the ball from one feed sample.
    ///
    /// The position is extrapolated by `field.ball_lookahead`, mirrored once
    /// about any field edge it crosses (each axis on its own), then clamped to
    /// the field so an overshoot of more than a field width cannot escape.
    /// The velocity is stored verbatim and never reflected.
    pub fn set_simulator_data(&mut self, sample: BallSample, field: &FieldGeometry) {
        let predicted_x = sample.x + sample.vx * field.ball_lookahead;
        let predicted_y = sample.y + sample.vy * field.ball_lookahead;

        let x = reflect(predicted_x, field.min_x, field.max_x);
        let y = reflect(predicted_y, field.min_y, field.max_y);
        if x != predicted_x || y != predicted_y {
            trace!(predicted_x, predicted_y, x, y, "ball prediction reflected off field edge");
        }

        let rotation = self.coordinates().rotation;
        self.set_coordinates(x, y, rotation);

        let velocities = self.velocities();
        self.set_velocities(velocities.linear, velocities.angular, sample.vx, sample.vy);
    }
}

/// Single elastic bounce of `value` inside `[low, high]`, then clamped.
fn reflect(value: f64, low: f64, high: f64) -> f64 {
    let bounced = if value > high {
        high - (value - high)
    } else if value < low {
        low - (value - low)
    } else {
        value
    };
    bounced.clamp(low, high)
}

impl Kinematic for Ball {
    fn body(&self) -> &KinematicBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut KinematicBody {
        &mut self.body
    }
}

impl core::fmt::Display for Ball {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Ball {}", self.body)
    }
}

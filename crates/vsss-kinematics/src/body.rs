//! The kinematic body shared by every tracked entity on the field.
//!
//! A body is nothing more than one [`SpatialCoordinates`] record and one
//! [`Velocities`] record. Specialised bodies (ball, robot, target, obstacle)
//! embed a [`KinematicBody`] and implement [`Kinematic`] to inherit the
//! accessors and distance queries.

use core::fmt;
use libm::sqrt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{SpatialCoordinates, Velocities};

/// Position and velocity of a body, with no dynamics attached.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KinematicBody {
    coordinates: SpatialCoordinates,
    velocities: Velocities,
}

impl KinematicBody {
    /// Construct a body from an initial coordinate and velocity record.
    pub const fn new(coordinates: SpatialCoordinates, velocities: Velocities) -> Self {
        KinematicBody {
            coordinates,
            velocities,
        }
    }
}

impl fmt::Display for KinematicBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.coordinates, self.velocities)
    }
}

/// Behaviour shared by everything that embeds a [`KinematicBody`].
///
/// Implementors only provide access to the embedded body; the setters,
/// copy-on-read getters and distance queries come for free.
pub trait Kinematic {
    /// Shared access to the embedded body.
    fn body(&self) -> &KinematicBody;

    /// Exclusive access to the embedded body.
    fn body_mut(&mut self) -> &mut KinematicBody;

    /// Overwrite the position and heading. No validation is performed.
    fn set_coordinates(&mut self, x: f64, y: f64, rotation: f64) {
        self.body_mut().coordinates = SpatialCoordinates::new(x, y, rotation);
    }

    /// Overwrite the velocity record. No validation is performed.
    fn set_velocities(&mut self, linear: f64, angular: f64, x: f64, y: f64) {
        self.body_mut().velocities = Velocities::new(linear, angular, x, y);
    }

    /// Returns a copy of the current coordinates.
    fn coordinates(&self) -> SpatialCoordinates {
        self.body().coordinates
    }

    /// Returns a copy of the current velocities.
    fn velocities(&self) -> Velocities {
        self.body().velocities
    }

    /// Euclidean distance (cm) to the point `(x, y)`.
    fn distance_to_point(&self, x: f64, y: f64) -> f64 {
        let c = self.coordinates();
        sqrt((c.x - x) * (c.x - x) + (c.y - y) * (c.y - y))
    }

    /// Euclidean distance (cm) between the current positions of `self` and `other`.
    ///
    /// Both positions are read at call time, so the result always reflects the
    /// latest state of both bodies.
    fn distance_to<K: Kinematic + ?Sized>(&self, other: &K) -> f64 {
        let c = other.coordinates();
        self.distance_to_point(c.x, c.y)
    }
}

impl Kinematic for KinematicBody {
    fn body(&self) -> &KinematicBody {
        self
    }

    fn body_mut(&mut self) -> &mut KinematicBody {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    fn body_at(x: f64, y: f64) -> KinematicBody {
        let mut body = KinematicBody::default();
        body.set_coordinates(x, y, 0.0);
        body
    }

    #[test]
    fn test_setters_overwrite_state() {
        let mut body = KinematicBody::default();
        body.set_coordinates(12.0, 34.0, 1.5);
        body.set_velocities(5.0, -0.5, 3.0, 4.0);

        assert_eq!(body.coordinates(), SpatialCoordinates::new(12.0, 34.0, 1.5));
        assert_eq!(body.velocities(), Velocities::new(5.0, -0.5, 3.0, 4.0));
    }

    #[test]
    fn test_accessors_return_copies() {
        let mut body = body_at(1.0, 2.0);
        let mut coordinates = body.coordinates();
        coordinates.x = 99.0;
        let mut velocities = body.velocities();
        velocities.linear = 99.0;

        assert_eq!(body.coordinates().x, 1.0);
        assert_eq!(body.velocities().linear, 0.0);

        // Writing through the body afterwards does not touch the old copy either.
        body.set_coordinates(7.0, 7.0, 0.0);
        assert_eq!(coordinates.y, 2.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = body_at(0.0, 0.0);
        let b = body_at(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < EPSILON);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < EPSILON);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let a = body_at(-17.25, 42.5);
        assert_eq!(a.distance_to(&a), 0.0);
    }

    #[test]
    fn test_distance_tracks_latest_state() {
        let a = body_at(0.0, 0.0);
        let mut b = body_at(0.0, 10.0);
        assert!((a.distance_to(&b) - 10.0).abs() < EPSILON);
        b.set_coordinates(6.0, 8.0, 0.0);
        assert!((a.distance_to(&b) - 10.0).abs() < EPSILON);
        b.set_coordinates(0.0, 1.0, 0.0);
        assert!((a.distance_to(&b) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_distance_to_point() {
        let a = body_at(10.0, 65.0);
        assert!((a.distance_to_point(160.0, 65.0) - 150.0).abs() < EPSILON);
    }
}

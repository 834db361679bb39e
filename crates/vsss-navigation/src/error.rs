//! This module defines the error types used by the `vsss-navigation` crate.

use vsss_kinematics::KinematicsError;

/// Error type for navigation operations.
///
/// Most inputs in this crate are trusted verbatim from the feed, so the
/// variants here cover broken preconditions rather than bad numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// No body was left to choose an obstacle from.
    /// Callers must guarantee at least one teammate or one surviving opponent.
    EmptyCandidateSet(&'static str),
    /// A robot handle that is not registered in the world.
    UnknownRobot(usize),
    /// Field bounds or thresholds that no body could be placed against.
    InvalidField(&'static str),
    /// Speed limits of the drive profile that no command could satisfy.
    InvalidDriveLimits(&'static str),
    /// Drive geometry could not be built from the configured profile.
    Kinematics(KinematicsError),
}

impl From<KinematicsError> for NavigationError {
    fn from(err: KinematicsError) -> Self {
        NavigationError::Kinematics(err)
    }
}

impl core::fmt::Display for NavigationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NavigationError::EmptyCandidateSet(msg) => write!(f, "Empty candidate set: {}", msg),
            NavigationError::UnknownRobot(id) => write!(f, "Unknown robot handle: #{}", id),
            NavigationError::InvalidField(msg) => write!(f, "Invalid field geometry: {}", msg),
            NavigationError::InvalidDriveLimits(msg) => write!(f, "Invalid drive limits: {}", msg),
            NavigationError::Kinematics(err) => write!(f, "Drive geometry error: {}", err),
        }
    }
}

impl core::error::Error for NavigationError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            NavigationError::Kinematics(err) => Some(err),
            _ => None,
        }
    }
}

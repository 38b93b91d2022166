//! Classification errors.

use thiserror::Error;

use super::angle::Coincident;
use super::finger::Finger;

/// Errors raised while building or classifying a hand.
///
/// None of these are recovered inside the classifier: they are data-quality
/// signals from the upstream detector and must reach the caller rather than
/// being reported as a curled finger.
#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum ClassifyError {
    /// A finger's tip coincides with its base or the palm anchor, so the
    /// angle between the two rays is undefined.
    #[error("finger {finger}: degenerate geometry, tip coincides with the {coincident} point")]
    DegenerateGeometry { finger: Finger, coincident: Coincident },

    /// The hand does not contain exactly the expected number of landmarks.
    #[error("malformed hand: expected {expected} landmarks, got {actual}")]
    LandmarkCount { expected: usize, actual: usize },

    /// A landmark coordinate is NaN or infinite.
    #[error("malformed hand: landmark {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },
}

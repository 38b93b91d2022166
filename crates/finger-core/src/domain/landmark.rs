//! Landmarks, hands, and handedness labels.
//!
//! A detector reports each hand as 21 keypoints in normalized image
//! coordinates (`x` and `y` typically in `[0, 1]`, origin at the top-left
//! corner).  The keypoint order is fixed:
//!
//! ```text
//!            8   12  16  20        tips
//!            7   11  15  19        DIP joints
//!      4     6   10  14  18        PIP joints
//!     3      5    9  13  17        MCP knuckles
//!      2
//!       1                          thumb CMC
//!           0                      wrist / palm-center reference
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error::ClassifyError;

/// Number of landmarks in every hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// A single 2D keypoint in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One detected hand: exactly [`LANDMARK_COUNT`] landmarks with finite coordinates.
///
/// The invariant is enforced at construction, so every classifier operation
/// can index the anatomical landmarks without bounds or NaN checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl Hand {
    /// Builds a hand from a fixed-size landmark array.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::NonFiniteCoordinate`] if any coordinate is NaN
    /// or infinite.
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Result<Self, ClassifyError> {
        if let Some(index) = landmarks.iter().position(|l| !l.is_finite()) {
            return Err(ClassifyError::NonFiniteCoordinate { index });
        }
        Ok(Self { landmarks })
    }

    /// Builds a hand from a slice, which must hold exactly [`LANDMARK_COUNT`] entries.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::LandmarkCount`] when the slice length is wrong,
    /// and [`ClassifyError::NonFiniteCoordinate`] for NaN or infinite coordinates.
    pub fn from_slice(landmarks: &[Landmark]) -> Result<Self, ClassifyError> {
        let array: [Landmark; LANDMARK_COUNT] =
            landmarks
                .try_into()
                .map_err(|_| ClassifyError::LandmarkCount {
                    expected: LANDMARK_COUNT,
                    actual: landmarks.len(),
                })?;
        Self::new(array)
    }

    /// Returns the landmark at `index` in the anatomical scheme.
    ///
    /// # Panics
    ///
    /// Panics if `index >= LANDMARK_COUNT`.
    pub fn landmark(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }
}

impl TryFrom<Vec<Landmark>> for Hand {
    type Error = ClassifyError;

    fn try_from(landmarks: Vec<Landmark>) -> Result<Self, Self::Error> {
        Self::from_slice(&landmarks)
    }
}

/// Which hand a count belongs to.
///
/// This is a *label*, not a geometric property: the detector assigns it, and
/// its raw value is mirrored relative to the viewer (see
/// [`crate::domain::aggregate::correct_for_mirroring`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    /// Returns the other side.
    pub fn opposite(self) -> Self {
        match self {
            HandSide::Left => HandSide::Right,
            HandSide::Right => HandSide::Left,
        }
    }
}

impl fmt::Display for HandSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandSide::Left => f.write_str("Left"),
            HandSide::Right => f.write_str("Right"),
        }
    }
}

/// A handedness label that is neither "Left" nor "Right".
#[derive(Debug, Error, PartialEq)]
#[error("unknown handedness label: {0:?}")]
pub struct UnknownHandSide(pub String);

impl FromStr for HandSide {
    type Err = UnknownHandSide;

    /// Parses a detector label; matching is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("left") {
            Ok(HandSide::Left)
        } else if s.eq_ignore_ascii_case("right") {
            Ok(HandSide::Right)
        } else {
            Err(UnknownHandSide(s.to_string()))
        }
    }
}

/// One hand as reported by the detector, with its raw (uncorrected) label.
#[derive(Debug, Clone, PartialEq)]
pub struct HandDetection {
    pub hand: Hand,
    pub raw_label: HandSide,
}

impl HandDetection {
    pub fn new(hand: Hand, raw_label: HandSide) -> Self {
        Self { hand, raw_label }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

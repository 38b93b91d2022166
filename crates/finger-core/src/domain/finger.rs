//! Finger classifier: turns one hand's landmarks into a count of extended fingers.
//!
//! Every finger is judged the same way.  The angle at its tip is measured
//! between the ray toward its base landmark and the ray toward the wrist
//! (landmark 0).  When that angle is below the finger's threshold the finger
//! is "up".
//!
//! Which landmarks play the tip and base roles, and which threshold applies,
//! is not scattered through the code: it lives in [`FINGER_TABLE`].  The
//! thumb compares its tip against the joint directly below it (IP); the other
//! four skip the DIP joint and compare against the PIP joint two steps back,
//! which widens the baseline and separates a straight finger from a partly
//! curled one more clearly.

use std::fmt;

use tracing::trace;

use super::angle::angle_between;
use super::error::ClassifyError;
use super::landmark::{
    Hand, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP, PINKY_TIP, RING_PIP, RING_TIP,
    THUMB_IP, THUMB_TIP, WRIST,
};

/// Default extension threshold for the thumb, in degrees.
pub const THUMB_THRESHOLD_DEGREES: f64 = 40.0;

/// Default extension threshold for index, middle, ring and pinky, in degrees.
pub const FINGER_THRESHOLD_DEGREES: f64 = 90.0;

/// The common anchor for every finger's angle: the wrist / palm-center reference.
pub const PALM_ANCHOR: usize = WRIST;

/// The five fingers, in landmark order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl fmt::Display for Finger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Finger::Thumb => "Thumb",
            Finger::Index => "Index",
            Finger::Middle => "Middle",
            Finger::Ring => "Ring",
            Finger::Pinky => "Pinky",
        };
        f.write_str(name)
    }
}

/// Landmark roles and default decision boundary for one finger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerSpec {
    pub finger: Finger,
    /// Index of the fingertip landmark.
    pub tip: usize,
    /// Index of the landmark the tip is compared against.
    pub base: usize,
    /// The finger counts as extended when its angle is strictly below this.
    pub threshold_degrees: f64,
}

/// The anatomical finger table.
///
/// This is the one place to update if a detector with a different landmark
/// topology is ever supplied.
pub const FINGER_TABLE: [FingerSpec; 5] = [
    FingerSpec {
        finger: Finger::Thumb,
        tip: THUMB_TIP,
        base: THUMB_IP,
        threshold_degrees: THUMB_THRESHOLD_DEGREES,
    },
    FingerSpec {
        finger: Finger::Index,
        tip: INDEX_TIP,
        base: INDEX_PIP,
        threshold_degrees: FINGER_THRESHOLD_DEGREES,
    },
    FingerSpec {
        finger: Finger::Middle,
        tip: MIDDLE_TIP,
        base: MIDDLE_PIP,
        threshold_degrees: FINGER_THRESHOLD_DEGREES,
    },
    FingerSpec {
        finger: Finger::Ring,
        tip: RING_TIP,
        base: RING_PIP,
        threshold_degrees: FINGER_THRESHOLD_DEGREES,
    },
    FingerSpec {
        finger: Finger::Pinky,
        tip: PINKY_TIP,
        base: PINKY_PIP,
        threshold_degrees: FINGER_THRESHOLD_DEGREES,
    },
];

/// Extension thresholds, in degrees.
///
/// The thumb moves relative to the palm differently from the other four
/// fingers, so it has its own boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtensionThresholds {
    pub thumb_degrees: f64,
    pub finger_degrees: f64,
}

impl Default for ExtensionThresholds {
    fn default() -> Self {
        Self {
            thumb_degrees: THUMB_THRESHOLD_DEGREES,
            finger_degrees: FINGER_THRESHOLD_DEGREES,
        }
    }
}

impl ExtensionThresholds {
    fn for_finger(&self, finger: Finger) -> f64 {
        match finger {
            Finger::Thumb => self.thumb_degrees,
            _ => self.finger_degrees,
        }
    }
}

/// The measured angle and decision for one finger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerReading {
    pub finger: Finger,
    pub angle_degrees: f64,
    pub extended: bool,
}

/// Classifies each finger of a hand as extended or not.
///
/// Stateless apart from its thresholds; one instance can be shared across
/// threads and frames.
#[derive(Debug, Clone, Default)]
pub struct FingerClassifier {
    thresholds: ExtensionThresholds,
}

impl FingerClassifier {
    pub fn new(thresholds: ExtensionThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> ExtensionThresholds {
        self.thresholds
    }

    /// Measures every finger in [`FINGER_TABLE`] order.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::DegenerateGeometry`] for the first finger whose
    /// tip coincides with its base or with the wrist.
    pub fn classify(&self, hand: &Hand) -> Result<Vec<FingerReading>, ClassifyError> {
        let mut readings = Vec::with_capacity(FINGER_TABLE.len());
        for spec in &FINGER_TABLE {
            readings.push(self.read_finger(hand, spec)?);
        }
        Ok(readings)
    }

    /// Returns how many fingers are extended, in `0..=5`.
    ///
    /// # Errors
    ///
    /// Propagates [`ClassifyError::DegenerateGeometry`] from [`Self::classify`].
    pub fn count_extended(&self, hand: &Hand) -> Result<u8, ClassifyError> {
        let readings = self.classify(hand)?;
        Ok(readings.iter().filter(|r| r.extended).count() as u8)
    }

    fn read_finger(&self, hand: &Hand, spec: &FingerSpec) -> Result<FingerReading, ClassifyError> {
        let angle_degrees = angle_between(
            hand.landmark(spec.tip),
            hand.landmark(spec.base),
            hand.landmark(PALM_ANCHOR),
        )
        .map_err(|e| ClassifyError::DegenerateGeometry {
            finger: spec.finger,
            coincident: e.0,
        })?;

        let threshold = self.thresholds.for_finger(spec.finger);
        let extended = angle_degrees < threshold;
        trace!(finger = %spec.finger, angle_degrees, threshold, extended, "finger reading");

        Ok(FingerReading {
            finger: spec.finger,
            angle_degrees,
            extended,
        })
    }
}

/// Counts extended fingers with the default thresholds (40° thumb, 90° others).
///
/// # Errors
///
/// Returns [`ClassifyError::DegenerateGeometry`] when any finger's angle is undefined.
pub fn count_extended(hand: &Hand) -> Result<u8, ClassifyError> {
    FingerClassifier::default().count_extended(hand)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Per-frame aggregation of every detected hand into Left/Right finger counts.
//!
//! # Why are the labels swapped?
//!
//! The detector assigns handedness as if the camera image were not mirrored,
//! but the picture shown to the user is the raw, un-flipped camera feed, which
//! the user reads like a mirror.  A hand the detector calls "Left" is the
//! user's right hand.  [`correct_for_mirroring`] is the single place that
//! encodes this assumption.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ClassifyError;
use super::finger::FingerClassifier;
use super::landmark::{HandDetection, HandSide};

/// Finger counts for one frame.
///
/// Both sides are always present; a side with no detected hand reads 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameResult {
    #[serde(rename = "Left")]
    pub left: u8,
    #[serde(rename = "Right")]
    pub right: u8,
}

impl FrameResult {
    /// Returns the count for `side`.
    pub fn get(&self, side: HandSide) -> u8 {
        match side {
            HandSide::Left => self.left,
            HandSide::Right => self.right,
        }
    }

    /// Stores `count` for `side`, replacing any earlier value.
    pub fn set(&mut self, side: HandSide, count: u8) {
        match side {
            HandSide::Left => self.left = count,
            HandSide::Right => self.right = count,
        }
    }
}

/// Maps the detector's raw handedness label to the side the viewer sees.
pub fn correct_for_mirroring(raw: HandSide) -> HandSide {
    raw.opposite()
}

/// Classifies every hand in a frame and files each count under its corrected side.
#[derive(Debug, Clone, Default)]
pub struct HandAggregator {
    classifier: FingerClassifier,
}

impl HandAggregator {
    pub fn new(classifier: FingerClassifier) -> Self {
        Self { classifier }
    }

    /// Builds the [`FrameResult`] for one frame.
    ///
    /// Detections are processed in order.  When two detections land on the
    /// same corrected side, the later one replaces the earlier count.
    ///
    /// # Errors
    ///
    /// Returns the first [`ClassifyError`] raised by any hand; the frame has
    /// no partial result in that case.
    pub fn aggregate(&self, detections: &[HandDetection]) -> Result<FrameResult, ClassifyError> {
        let mut result = FrameResult::default();
        let mut assigned = [false; 2];

        for (position, detection) in detections.iter().enumerate() {
            let count = self.classifier.count_extended(&detection.hand)?;
            let side = correct_for_mirroring(detection.raw_label);

            let slot = match side {
                HandSide::Left => 0,
                HandSide::Right => 1,
            };
            if assigned[slot] {
                debug!(
                    %side,
                    position,
                    previous = result.get(side),
                    count,
                    "later detection overwrites count for side"
                );
            }
            assigned[slot] = true;
            result.set(side, count);
        }

        Ok(result)
    }
}

/// Aggregates a frame with the default classifier thresholds.
///
/// # Errors
///
/// Propagates any [`ClassifyError`] from classifying the individual hands.
pub fn aggregate(detections: &[HandDetection]) -> Result<FrameResult, ClassifyError> {
    HandAggregator::default().aggregate(detections)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! JSON message types for detector input and frame output.
//!
//! The detector writes one JSON object per frame, one frame per line.  The
//! shape follows what hand-landmark detectors commonly report: a list of
//! hands, each with 21 landmarks and a handedness classification.
//!
//! ```json
//! {"frame":17,"hands":[{"handedness":{"label":"Left","score":0.97},
//!   "landmarks":[{"x":0.51,"y":0.82,"z":0.0}, ...]}]}
//! ```
//!
//! Optional fields are skipped when absent, so a minimal frame is just `{}`
//! (no hands) and a minimal landmark is `{"x":0.5,"y":0.5}`.

use serde::{Deserialize, Serialize};

use crate::domain::aggregate::FrameResult;

// ── Detector → core ───────────────────────────────────────────────────────────

/// One frame of detector output.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectorFrame {
    /// Detector frame number.  When absent the consumer numbers frames itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<u64>,

    /// Every hand found in the frame, in detector order.
    #[serde(default)]
    pub hands: Vec<DetectedHand>,
}

/// One hand as reported by the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedHand {
    pub handedness: Handedness,

    /// Must hold exactly 21 entries; checked when converting to a domain hand.
    pub landmarks: Vec<WireLandmark>,
}

/// The detector's left/right classification for one hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Handedness {
    /// `"Left"` or `"Right"`, as the detector sees it (mirrored for the viewer).
    pub label: String,

    /// Classification confidence.  Logged, never used for counting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// A landmark on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WireLandmark {
    pub x: f32,
    pub y: f32,

    /// Relative depth.  Accepted for compatibility and ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

// ── Core → renderer ───────────────────────────────────────────────────────────

/// The counts for one frame.
///
/// ```json
/// {"frame":17,"counts":{"Left":0,"Right":3}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultLine {
    pub frame: u64,
    pub counts: FrameResult,
}

/// A frame that could not be classified.
///
/// ```json
/// {"frame":18,"error":"hand 0: finger Thumb: degenerate geometry, ..."}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorLine {
    pub frame: u64,
    pub error: String,
}

//! # finger-core
//!
//! Shared library for the finger counter containing the geometric finger-state
//! classifier and the JSON wire format spoken by the upstream hand-landmark
//! detector.
//!
//! It has zero dependencies on cameras, detector models, async runtimes, or
//! rendering back-ends.
//!
//! # Architecture overview (for beginners)
//!
//! A hand-landmark detector looks at a camera frame and, for every hand it
//! finds, reports 21 keypoints (wrist, knuckles, joints, fingertips) in
//! normalized image coordinates plus a "Left" or "Right" label.  This crate
//! turns that raw geometry into "how many fingers are up on each hand".
//!
//! - **`domain`** – Pure classification logic.  The angle estimator measures
//!   how bent each finger is, the finger classifier turns five angles into a
//!   count, and the hand aggregator combines every hand in a frame into a
//!   Left/Right result while undoing the detector's mirrored labels.
//!
//! - **`protocol`** – How detector output and frame results travel as text.
//!   Each frame is one JSON object per line; the codec decodes it into typed
//!   [`HandDetection`]s and encodes [`FrameResult`]s back out.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `finger_core::Hand` instead of `finger_core::domain::landmark::Hand`.
pub use domain::aggregate::{aggregate, correct_for_mirroring, FrameResult, HandAggregator};
pub use domain::angle::{angle_between, Coincident, DegenerateGeometry};
pub use domain::error::ClassifyError;
pub use domain::finger::{
    count_extended, ExtensionThresholds, Finger, FingerClassifier, FingerReading, FingerSpec,
    FINGER_TABLE,
};
pub use domain::landmark::{Hand, HandDetection, HandSide, Landmark, LANDMARK_COUNT};
pub use protocol::codec::{decode_frame, encode_error, encode_result, ProtocolError};
pub use protocol::messages::DetectorFrame;

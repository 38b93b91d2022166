//! Codec between JSON lines and domain types.
//!
//! Decoding is two-step: [`decode_frame`] parses the JSON into a
//! [`DetectorFrame`], then [`DetectorFrame::into_detections`] validates every
//! hand (label, landmark count, finite coordinates) and produces the
//! [`HandDetection`]s the aggregator consumes.  Keeping the steps apart lets
//! callers read the frame number even when a hand in that frame is invalid.

use thiserror::Error;

use crate::domain::aggregate::FrameResult;
use crate::domain::error::ClassifyError;
use crate::domain::landmark::{Hand, HandDetection, HandSide, Landmark, UnknownHandSide};
use crate::protocol::messages::{DetectedHand, DetectorFrame, ErrorLine, ResultLine};

/// Errors that can occur while decoding detector frames or encoding results.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The line is not valid UTF-8 text.
    #[error("detector frame is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    /// The line is not valid JSON or does not have the frame shape.
    #[error("malformed detector frame: {0}")]
    MalformedJson(String),

    /// A hand's handedness label is neither Left nor Right.
    #[error("hand {position}: {source}")]
    UnknownHandedness {
        position: usize,
        #[source]
        source: UnknownHandSide,
    },

    /// A hand's landmarks do not form a valid [`Hand`].
    #[error("hand {position}: {source}")]
    InvalidHand {
        position: usize,
        #[source]
        source: ClassifyError,
    },

    /// A result could not be serialized.
    #[error("failed to encode result line: {0}")]
    Encode(String),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parses one line of detector output.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedJson`] if the line is not a JSON frame object.
///
/// # Examples
///
/// ```rust
/// use finger_core::decode_frame;
///
/// let frame = decode_frame(r#"{"frame":3,"hands":[]}"#).unwrap();
/// assert_eq!(frame.frame, Some(3));
/// assert!(frame.hands.is_empty());
/// ```
pub fn decode_frame(line: &str) -> Result<DetectorFrame, ProtocolError> {
    serde_json::from_str(line).map_err(|e| ProtocolError::MalformedJson(e.to_string()))
}

/// Encodes the counts for `frame` as a single JSON line (without the newline).
///
/// # Errors
///
/// Returns [`ProtocolError::Encode`] if serialization fails.
///
/// # Examples
///
/// ```rust
/// use finger_core::{encode_result, FrameResult};
///
/// let line = encode_result(7, &FrameResult { left: 1, right: 4 }).unwrap();
/// assert_eq!(line, r#"{"frame":7,"counts":{"Left":1,"Right":4}}"#);
/// ```
pub fn encode_result(frame: u64, result: &FrameResult) -> Result<String, ProtocolError> {
    let line = ResultLine {
        frame,
        counts: *result,
    };
    serde_json::to_string(&line).map_err(|e| ProtocolError::Encode(e.to_string()))
}

/// Encodes a per-frame failure as a single JSON line (without the newline).
///
/// # Errors
///
/// Returns [`ProtocolError::Encode`] if serialization fails.
pub fn encode_error(frame: u64, message: &str) -> Result<String, ProtocolError> {
    let line = ErrorLine {
        frame,
        error: message.to_string(),
    };
    serde_json::to_string(&line).map_err(|e| ProtocolError::Encode(e.to_string()))
}

impl DetectorFrame {
    /// Converts every detected hand into a domain [`HandDetection`], keeping
    /// detector order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProtocolError::UnknownHandedness`] or
    /// [`ProtocolError::InvalidHand`], tagged with the hand's position.
    pub fn into_detections(self) -> Result<Vec<HandDetection>, ProtocolError> {
        self.hands
            .into_iter()
            .enumerate()
            .map(|(position, hand)| decode_hand(position, hand))
            .collect()
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn decode_hand(position: usize, wire: DetectedHand) -> Result<HandDetection, ProtocolError> {
    let raw_label: HandSide = wire
        .handedness
        .label
        .parse()
        .map_err(|source| ProtocolError::UnknownHandedness { position, source })?;

    let landmarks: Vec<Landmark> = wire
        .landmarks
        .iter()
        .map(|l| Landmark::new(l.x, l.y))
        .collect();
    let hand = Hand::from_slice(&landmarks)
        .map_err(|source| ProtocolError::InvalidHand { position, source })?;

    Ok(HandDetection::new(hand, raw_label))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

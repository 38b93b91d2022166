//! FrameProcessor: turns one line of detector output into finger counts.
//!
//! This use case sits between the raw text stream and the classifier.  It
//! decodes the JSON frame, classifies every hand through the
//! [`HandAggregator`], and reports failures with the frame they belong to so
//! the caller can apply the configured [`ErrorPolicy`].
//!
//! Each call is independent: no state is carried from one frame to the next.

use std::fmt;
use std::str::FromStr;

use finger_core::{ClassifyError, FrameResult, HandAggregator, ProtocolError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Error type for the frame pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The frame could not be decoded, or one of its hands is malformed.
    #[error("frame {frame}: {source}")]
    Protocol {
        frame: u64,
        #[source]
        source: ProtocolError,
    },

    /// A hand in the frame has degenerate geometry.
    #[error("frame {frame}: {source}")]
    Classify {
        frame: u64,
        #[source]
        source: ClassifyError,
    },

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// The frame the error belongs to, if it is a per-frame error.
    pub fn frame(&self) -> Option<u64> {
        match self {
            PipelineError::Protocol { frame, .. } | PipelineError::Classify { frame, .. } => {
                Some(*frame)
            }
            PipelineError::Io(_) => None,
        }
    }
}

/// What to do with a frame that cannot be classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log a warning, render the error if the output format has a form for
    /// it, and continue with the next frame.
    #[default]
    Skip,
    /// Stop the pipeline and return the error.
    Abort,
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(ErrorPolicy::Skip),
            "abort" => Ok(ErrorPolicy::Abort),
            other => Err(format!("unknown error policy '{other}' (expected 'skip' or 'abort')")),
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Skip => f.write_str("skip"),
            ErrorPolicy::Abort => f.write_str("abort"),
        }
    }
}

/// The outcome of one successfully classified frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessedFrame {
    /// Detector frame number, or the pipeline's own count when the detector
    /// did not supply one.
    pub frame: u64,
    /// Number of hands the detector reported.
    pub hands: usize,
    pub result: FrameResult,
}

/// Decodes and classifies detector frames.
#[derive(Debug, Clone, Default)]
pub struct FrameProcessor {
    aggregator: HandAggregator,
    policy: ErrorPolicy,
}

impl FrameProcessor {
    pub fn new(aggregator: HandAggregator, policy: ErrorPolicy) -> Self {
        Self { aggregator, policy }
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Processes one raw line of detector output.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Protocol`] with [`ProtocolError::InvalidUtf8`]
    /// if the bytes are not UTF-8; otherwise as [`Self::process_line`].
    pub fn process_bytes(
        &self,
        bytes: &[u8],
        fallback_frame: u64,
    ) -> Result<Option<ProcessedFrame>, PipelineError> {
        let line = std::str::from_utf8(bytes).map_err(|e| PipelineError::Protocol {
            frame: fallback_frame,
            source: ProtocolError::InvalidUtf8(e.to_string()),
        })?;
        self.process_line(line, fallback_frame)
    }

    /// Processes one line of detector output.
    ///
    /// `fallback_frame` numbers the frame when the line carries no `frame`
    /// field (or cannot be parsed far enough to read it).
    ///
    /// Returns `Ok(None)` for blank lines.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Protocol`] for malformed JSON or invalid hands,
    /// and [`PipelineError::Classify`] for degenerate geometry.
    pub fn process_line(
        &self,
        line: &str,
        fallback_frame: u64,
    ) -> Result<Option<ProcessedFrame>, PipelineError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let decoded = finger_core::decode_frame(line).map_err(|source| PipelineError::Protocol {
            frame: fallback_frame,
            source,
        })?;
        let frame = decoded.frame.unwrap_or(fallback_frame);

        for (position, hand) in decoded.hands.iter().enumerate() {
            debug!(
                frame,
                position,
                label = %hand.handedness.label,
                score = ?hand.handedness.score,
                "detected hand"
            );
        }

        let detections = decoded
            .into_detections()
            .map_err(|source| PipelineError::Protocol { frame, source })?;
        let result = self
            .aggregator
            .aggregate(&detections)
            .map_err(|source| PipelineError::Classify { frame, source })?;

        debug!(frame, left = result.left, right = result.right, "frame classified");

        Ok(Some(ProcessedFrame {
            frame,
            hands: detections.len(),
            result,
        }))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use finger_core::{Coincident, ExtensionThresholds, Finger, FingerClassifier};

    /// A detector line with one hand whose fingers all point straight up from
    /// the wrist; `curled` fingers fold back between knuckle and wrist.
    fn line_with_hand(label: &str, frame: Option<u64>, curled: &[usize]) -> String {
        let mut points = vec![(0.5f32, 0.9f32); 21];
        for finger in 0..5 {
            let x = 0.3 + finger as f32 * 0.1;
            let first = 1 + finger * 4;
            points[first] = (x, 0.8);
            points[first + 1] = (x, 0.7);
            points[first + 2] = (x, 0.6);
            points[first + 3] = if curled.contains(&finger) { (x, 0.85) } else { (x, 0.4) };
        }
        let landmarks: Vec<String> = points
            .iter()
            .map(|(x, y)| format!(r#"{{"x":{x},"y":{y}}}"#))
            .collect();
        let frame_field = frame.map(|f| format!(r#""frame":{f},"#)).unwrap_or_default();
        format!(
            r#"{{{frame_field}"hands":[{{"handedness":{{"label":"{label}","score":0.9}},"landmarks":[{}]}}]}}"#,
            landmarks.join(",")
        )
    }

    // ── process_line ──────────────────────────────────────────────────────────

    #[test]
    fn test_process_line_blank_line_yields_none() {
        let processor = FrameProcessor::default();
        assert!(processor.process_line("", 0).unwrap().is_none());
        assert!(processor.process_line("   \t", 0).unwrap().is_none());
    }

    #[test]
    fn test_process_line_uses_detector_frame_number_when_present() {
        let processor = FrameProcessor::default();
        let line = line_with_hand("Left", Some(77), &[]);

        let processed = processor.process_line(&line, 3).unwrap().unwrap();

        assert_eq!(processed.frame, 77);
        assert_eq!(processed.hands, 1);
    }

    #[test]
    fn test_process_line_falls_back_to_pipeline_frame_number() {
        let processor = FrameProcessor::default();
        let line = line_with_hand("Left", None, &[]);

        let processed = processor.process_line(&line, 3).unwrap().unwrap();

        assert_eq!(processed.frame, 3);
    }

    #[test]
    fn test_process_line_counts_with_mirrored_label() {
        let processor = FrameProcessor::default();
        // Ring and pinky curled: three fingers up on the detector's "Right" hand.
        let line = line_with_hand("Right", Some(1), &[3, 4]);

        let processed = processor.process_line(&line, 0).unwrap().unwrap();

        assert_eq!(processed.result, FrameResult { left: 3, right: 0 });
    }

    #[test]
    fn test_process_line_empty_frame_counts_zero() {
        let processor = FrameProcessor::default();

        let processed = processor.process_line(r#"{"frame":4}"#, 0).unwrap().unwrap();

        assert_eq!(processed.hands, 0);
        assert_eq!(processed.result, FrameResult::default());
    }

    #[test]
    fn test_process_line_malformed_json_reports_fallback_frame() {
        let processor = FrameProcessor::default();

        let err = processor.process_line("not json", 9).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Protocol { frame: 9, source: ProtocolError::MalformedJson(_) }
        ));
        assert_eq!(err.frame(), Some(9));
    }

    #[test]
    fn test_process_line_degenerate_hand_reports_classify_error() {
        let processor = FrameProcessor::default();
        let line = line_with_hand("Left", Some(12), &[])
            // Move the thumb tip onto the thumb IP joint.
            .replacen(r#"{"x":0.3,"y":0.4}"#, r#"{"x":0.3,"y":0.6}"#, 1);

        let err = processor.process_line(&line, 0).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Classify {
                frame: 12,
                source: ClassifyError::DegenerateGeometry {
                    finger: Finger::Thumb,
                    coincident: Coincident::Base,
                },
            }
        ));
    }

    #[test]
    fn test_process_line_uses_configured_thresholds() {
        let classifier = FingerClassifier::new(ExtensionThresholds {
            thumb_degrees: 0.0,
            finger_degrees: 0.0,
        });
        let processor = FrameProcessor::new(HandAggregator::new(classifier), ErrorPolicy::Skip);
        let line = line_with_hand("Left", Some(1), &[]);

        let processed = processor.process_line(&line, 0).unwrap().unwrap();

        // No angle is below 0°, so every finger reads as curled.
        assert_eq!(processed.result, FrameResult { left: 0, right: 0 });
    }

    #[test]
    fn test_process_bytes_invalid_utf8_reports_fallback_frame() {
        let processor = FrameProcessor::default();

        let err = processor.process_bytes(b"{\"frame\":\xff}", 6).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Protocol { frame: 6, source: ProtocolError::InvalidUtf8(_) }
        ));
    }

    #[test]
    fn test_process_bytes_accepts_line_with_trailing_newline() {
        let processor = FrameProcessor::default();

        let processed = processor.process_bytes(b"{\"frame\":2}\r\n", 0).unwrap().unwrap();

        assert_eq!(processed.frame, 2);
    }

    // ── ErrorPolicy ───────────────────────────────────────────────────────────

    #[test]
    fn test_error_policy_parses_case_insensitively() {
        assert_eq!("skip".parse::<ErrorPolicy>(), Ok(ErrorPolicy::Skip));
        assert_eq!("ABORT".parse::<ErrorPolicy>(), Ok(ErrorPolicy::Abort));
        assert!("retry".parse::<ErrorPolicy>().is_err());
    }

    #[test]
    fn test_error_policy_default_is_skip() {
        assert_eq!(ErrorPolicy::default(), ErrorPolicy::Skip);
    }

    #[test]
    fn test_io_error_has_no_frame() {
        let err = PipelineError::from(std::io::Error::new(std::io::ErrorKind::Other, "closed"));
        assert_eq!(err.frame(), None);
    }
}

//! Renderers: how a processed frame is shown to the viewer.
//!
//! The counter itself has no opinion about display format.  A renderer turns
//! a [`ProcessedFrame`] into the text written to the output sink:
//!
//! - [`TextRenderer`] prints the two labeled counters a camera overlay shows.
//! - [`JsonRenderer`] prints one JSON result line per frame, for downstream
//!   programs.

use std::fmt;
use std::str::FromStr;

use finger_core::{encode_error, encode_result, HandSide, ProtocolError};
use serde::{Deserialize, Serialize};

use super::process_frames::{PipelineError, ProcessedFrame};

/// Formats frames for the output sink.
pub trait FrameRenderer: Send + Sync {
    /// Renders a classified frame.  The returned text has no trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Encode`] if the frame cannot be serialized.
    fn render_frame(&self, frame: &ProcessedFrame) -> Result<String, ProtocolError>;

    /// Renders a skipped frame, or returns `None` when this format has no
    /// representation for errors.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Encode`] if the error line cannot be serialized.
    fn render_error(&self, error: &PipelineError) -> Result<Option<String>, ProtocolError>;
}

/// Two labeled counters, one per line.
///
/// ```text
/// Left Hand Fingers: 2
/// Right Hand Fingers: 5
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl FrameRenderer for TextRenderer {
    fn render_frame(&self, frame: &ProcessedFrame) -> Result<String, ProtocolError> {
        Ok(format!(
            "{} Hand Fingers: {}\n{} Hand Fingers: {}",
            HandSide::Left,
            frame.result.get(HandSide::Left),
            HandSide::Right,
            frame.result.get(HandSide::Right),
        ))
    }

    fn render_error(&self, _error: &PipelineError) -> Result<Option<String>, ProtocolError> {
        // Errors go to the log; the counters stay on screen unchanged.
        Ok(None)
    }
}

/// One JSON object per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl FrameRenderer for JsonRenderer {
    fn render_frame(&self, frame: &ProcessedFrame) -> Result<String, ProtocolError> {
        encode_result(frame.frame, &frame.result)
    }

    fn render_error(&self, error: &PipelineError) -> Result<Option<String>, ProtocolError> {
        // The frame number has its own field.
        let (frame, message) = match error {
            PipelineError::Protocol { frame, source } => (*frame, source.to_string()),
            PipelineError::Classify { frame, source } => (*frame, source.to_string()),
            PipelineError::Io(_) => return Ok(None),
        };
        encode_error(frame, &message).map(Some)
    }
}

/// Output format selector used by the config file and the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Returns the renderer for this format.
    pub fn renderer(self) -> Box<dyn FrameRenderer> {
        match self {
            OutputFormat::Text => Box::new(TextRenderer),
            OutputFormat::Json => Box::new(JsonRenderer),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}' (expected 'text' or 'json')")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

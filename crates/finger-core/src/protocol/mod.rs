//! Line-delimited JSON protocol between the landmark detector, this crate,
//! and the result renderer.
//!
//! - **`messages`** – Serde types for a detector frame and for result lines.
//! - **`codec`** – Decoding a detector line into typed [`crate::HandDetection`]s
//!   and encoding results back into single-line JSON.

pub mod codec;
pub mod messages;

pub use codec::{decode_frame, encode_error, encode_result, ProtocolError};
pub use messages::{DetectedHand, DetectorFrame, ErrorLine, Handedness, ResultLine, WireLandmark};

//! Application layer use cases for the finger counter.
//!
//! Use cases in this layer orchestrate `finger-core` to fulfil one goal:
//! "turn a detector frame into something the viewer can read".  They contain
//! no file, terminal, or network access, so every rule here is testable with
//! plain strings.
//!
//! # Sub-modules
//!
//! - **`process_frames`** – Decodes one detector line, classifies every hand,
//!   and applies the error policy for frames that cannot be classified.
//!
//! - **`render`** – Formats a processed frame for the output sink, either as
//!   two labeled counters or as a JSON result line.

pub mod process_frames;
pub mod render;

pub use process_frames::{ErrorPolicy, FrameProcessor, PipelineError, ProcessedFrame};
pub use render::{FrameRenderer, JsonRenderer, OutputFormat, TextRenderer};

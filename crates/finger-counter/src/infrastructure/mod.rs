//! Infrastructure layer for finger-counter.
//!
//! The infrastructure layer handles all I/O:
//!
//! - Reading the TOML configuration file from the platform config directory.
//! - Reading detector frames from stdin or a file, line by line.
//! - Writing rendered frames to the output sink and flushing after each one.
//! - Stopping cleanly when the shutdown flag is cleared.
//!
//! Decoding and classification are *not* done here; the pipeline hands every
//! line to the application layer's `FrameProcessor`.

pub mod config;
pub mod pipeline;

pub use pipeline::{run_pipeline, PipelineSummary};

//! finger-counter library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # Architecture
//!
//! ```text
//! detector (JSON lines on stdin or a file)
//!         ↓
//! [finger-counter]
//!   ├── application/       FrameProcessor (decode + classify), renderers
//!   └── infrastructure/
//!         ├── config       TOML settings, platform config path
//!         └── pipeline     async read → process → write loop
//!         ↓
//! renderer sink (stdout)
//! ```
//!
//! The application layer is synchronous and does no I/O, like the
//! classifier it wraps.  Only the infrastructure layer touches Tokio.

pub mod application;
pub mod infrastructure;

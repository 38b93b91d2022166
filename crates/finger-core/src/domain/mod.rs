//! Domain logic for finger counting.
//!
//! This module contains pure classification rules with no infrastructure
//! dependencies: no camera access, no detector model, no I/O, and no state
//! that survives from one frame to the next.
//!
//! The pieces compose bottom-up:
//!
//! ```text
//! aggregate   (every hand in a frame → Left/Right counts)
//!  └─ finger  (one hand → number of extended fingers)
//!      └─ angle (three points → angle in degrees)
//! ```

/// Per-frame aggregation and mirrored-label correction.
///
/// See [`aggregate::HandAggregator`] for the main type.
pub mod aggregate;

/// The angle estimator.
pub mod angle;

/// Error taxonomy shared by the classifier layers.
pub mod error;

/// Per-finger extension decisions against the anatomical finger table.
pub mod finger;

/// Landmarks, hands, and handedness labels.
pub mod landmark;

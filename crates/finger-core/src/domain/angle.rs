//! Angle at a fingertip between the rays toward two other landmarks.
//!
//! Uses the dot product formula `cos(θ) = (v1 · v2) / (|v1| × |v2|)` with
//!
//! ```text
//! v1 = tip − base
//! v2 = tip − anchor
//! ```
//!
//! so both vectors are anchored at `tip`.  A straight finger puts `base` and
//! `anchor` on the same side of the tip and the angle shrinks toward 0°; a
//! curled finger swings the tip back past its base toward the palm and the
//! angle opens toward 180°.

use std::fmt;

use thiserror::Error;

use super::landmark::Landmark;

/// Which of the two reference points coincides with the tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coincident {
    Base,
    Anchor,
}

impl fmt::Display for Coincident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coincident::Base => f.write_str("base"),
            Coincident::Anchor => f.write_str("anchor"),
        }
    }
}

/// The tip coincides exactly with one of the reference points, so one of the
/// vectors has zero length and the angle is undefined.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("tip coincides with the {0} point; angle is undefined")]
pub struct DegenerateGeometry(pub Coincident);

/// Returns the angle in degrees, within `[0, 180]`, between `tip − base` and
/// `tip − anchor`.
///
/// The computation runs in `f64` and the cosine is clamped to `[-1, 1]`, so
/// rounding on near-collinear points never produces NaN.
///
/// # Errors
///
/// Returns [`DegenerateGeometry`] when `tip` equals `base` or `anchor`.
///
/// # Examples
///
/// ```rust
/// use finger_core::{angle_between, Landmark};
///
/// let tip = Landmark::new(0.0, 0.0);
/// let base = Landmark::new(1.0, 0.0);
/// let anchor = Landmark::new(0.0, 1.0);
/// let angle = angle_between(tip, base, anchor).unwrap();
/// assert!((angle - 90.0).abs() < 1e-9);
/// ```
pub fn angle_between(
    tip: Landmark,
    base: Landmark,
    anchor: Landmark,
) -> Result<f64, DegenerateGeometry> {
    let v1 = (
        f64::from(tip.x) - f64::from(base.x),
        f64::from(tip.y) - f64::from(base.y),
    );
    let v2 = (
        f64::from(tip.x) - f64::from(anchor.x),
        f64::from(tip.y) - f64::from(anchor.y),
    );

    let mag1 = v1.0.hypot(v1.1);
    let mag2 = v2.0.hypot(v2.1);

    if mag1 == 0.0 {
        return Err(DegenerateGeometry(Coincident::Base));
    }
    if mag2 == 0.0 {
        return Err(DegenerateGeometry(Coincident::Anchor));
    }

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let cos_angle = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);

    Ok(cos_angle.acos().to_degrees())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

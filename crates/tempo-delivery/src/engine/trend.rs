//! Trend computation: percentage change against the preceding window.
//!
//! The sign is normalized by metric direction so a positive trend always
//! reads as "improving" — a shrinking lead time reports positive, a
//! shrinking deployment rate reports negative.

use super::rating::Direction;

/// Percentage change of `current` against `prior`, direction-normalized.
///
/// A zero (or vanishing) prior yields 0 — there is no meaningful baseline
/// to compare against.
#[must_use]
pub fn trend_pct(current: f64, prior: f64, direction: Direction) -> f64 {
    if prior.abs() < f64::EPSILON || !prior.is_finite() || !current.is_finite() {
        return 0.0;
    }

    let raw = (current - prior) / prior * 100.0;
    match direction {
        Direction::HigherIsBetter => raw,
        Direction::LowerIsBetter => -raw,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

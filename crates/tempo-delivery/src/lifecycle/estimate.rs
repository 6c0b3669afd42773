//! Heuristic review-start estimation for items with no recorded review
//! transition.
//!
//! Synthesized timestamps are inherently approximate, so the heuristic
//! lives behind the [`ReviewStartEstimator`] trait: exact-history and
//! estimated code paths can be tested independently and swapped by the
//! caller.

use chrono::{DateTime, Duration, Utc};
use tempo_core::model::WorkItem;

/// Strategy for placing a review-start instant when the status history
/// records none.
pub trait ReviewStartEstimator {
    /// Estimated review-start for `item`, or `None` when the item carries
    /// too little data even for an estimate.
    fn estimate(&self, item: &WorkItem) -> Option<DateTime<Utc>>;
}

/// Default heuristic: review begins at a fixed fraction of the span from
/// `started_at` to `completed_at`; with no usable start, a fixed number of
/// wall-clock hours before completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProportionalEstimator {
    /// Fraction of the started→completed span assumed spent before review.
    pub progress_fraction: f64,
    /// Wall-clock hours before completion when `started_at` is absent.
    pub lookback_hours: i64,
}

impl Default for ProportionalEstimator {
    fn default() -> Self {
        Self {
            progress_fraction: 0.75,
            lookback_hours: 24,
        }
    }
}

impl ReviewStartEstimator for ProportionalEstimator {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn estimate(&self, item: &WorkItem) -> Option<DateTime<Utc>> {
        let completed = item.completed_at?;

        match item.started_at {
            Some(started) if started < completed => {
                let span_secs = (completed - started).num_seconds() as f64;
                let offset = (span_secs * self.progress_fraction).round() as i64;
                Some(started + Duration::seconds(offset))
            }
            _ => Some(completed - Duration::hours(self.lookback_hours)),
        }
    }
}

/// Estimator that never estimates: milestone extraction falls back to
/// "not computable" instead of a synthesized instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFallback;

impl ReviewStartEstimator for NoFallback {
    fn estimate(&self, _item: &WorkItem) -> Option<DateTime<Utc>> {
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

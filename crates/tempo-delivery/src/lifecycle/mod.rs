//! Lifecycle interpreter: semantic milestones from raw status history.
//!
//! # Overview
//!
//! Given one work item's ordered transition history, this module locates
//! the instants the metrics care about — entered progress, entered review,
//! merged, deployed, incident detected — using exact state-name matches
//! first and the [`estimate::ReviewStartEstimator`] heuristic only where an
//! approximate value is structurally required.
//!
//! A lookup whose prerequisites are missing returns `None` ("not
//! computable", distinct from a zero duration); callers exclude the item
//! from the relevant sample. Out-of-order timestamps in malformed input
//! clip the derived duration to zero rather than going negative.

pub mod estimate;

use chrono::{DateTime, Utc};
use tracing::warn;

use tempo_core::calendar::BusinessCalendar;
use tempo_core::model::WorkItem;

pub use estimate::{NoFallback, ProportionalEstimator, ReviewStartEstimator};

/// State names that mean a review is underway, compared case-insensitively.
const REVIEW_STATES: [&str; 8] = [
    "code review",
    "in review",
    "review",
    "pr review",
    "reviewing",
    "ready for review",
    "pending review",
    "under review",
];

/// Exact (case-sensitive) state name marking a merge.
const MERGED_STATE: &str = "Merged";

/// Minimum review duration when the start was estimated, guarding against
/// zero or colliding clock values.
pub const ESTIMATED_REVIEW_FLOOR_HOURS: f64 = 2.0;

/// A located review-start instant, flagged when it came from the heuristic
/// rather than the recorded history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewStart {
    pub at: DateTime<Utc>,
    pub estimated: bool,
}

/// First transition into "in progress", falling back to `started_at`.
#[must_use]
pub fn progress_start(item: &WorkItem) -> Option<DateTime<Utc>> {
    first_transition_to(item, |state| state.eq_ignore_ascii_case("in progress"))
        .or(item.started_at)
}

/// First transition into a review state, falling back to `started_at`.
///
/// This is the lead-time milestone. Review-duration needs a tighter
/// approximation than "work started" and goes through
/// [`review_duration_hours`]'s heuristic instead.
#[must_use]
pub fn review_start(item: &WorkItem) -> Option<DateTime<Utc>> {
    review_transition(item).or(item.started_at)
}

/// First transition into a review state, flagged with heuristic fallback
/// when the history records none.
#[must_use]
pub fn review_start_or_estimate(
    item: &WorkItem,
    estimator: &dyn ReviewStartEstimator,
) -> Option<ReviewStart> {
    if let Some(at) = review_transition(item) {
        return Some(ReviewStart {
            at,
            estimated: false,
        });
    }

    estimator.estimate(item).map(|at| ReviewStart {
        at,
        estimated: true,
    })
}

fn review_transition(item: &WorkItem) -> Option<DateTime<Utc>> {
    first_transition_to(item, |state| {
        let normalized = state.trim().to_ascii_lowercase();
        REVIEW_STATES.contains(&normalized.as_str())
    })
}

/// First transition into the strict `"Merged"` state. No fallback: absence
/// means deploy-lag metrics are not computable for this item.
#[must_use]
pub fn merge_time(item: &WorkItem) -> Option<DateTime<Utc>> {
    first_transition_to(item, |state| state == MERGED_STATE)
}

/// Deployment instant: the completion timestamp of a completed item.
#[must_use]
pub fn deploy_time(item: &WorkItem) -> Option<DateTime<Utc>> {
    if item.is_completed() { item.completed_at } else { None }
}

/// Detection instant for incident-tagged items.
///
/// The tracker records no label-applied-at timestamp, so creation is the
/// documented proxy.
#[must_use]
pub fn incident_detected(item: &WorkItem) -> Option<DateTime<Utc>> {
    item.is_incident().then_some(item.created_at)
}

// ---------------------------------------------------------------------------
// Durations
// ---------------------------------------------------------------------------

/// Business hours from review start to deployment.
#[must_use]
pub fn lead_time_hours(item: &WorkItem, calendar: &BusinessCalendar) -> Option<f64> {
    let start = review_start(item)?;
    let end = deploy_time(item)?;
    Some(clipped_hours(item, calendar, "lead-time", start, end))
}

/// Business hours from merge to deployment; requires both milestones.
#[must_use]
pub fn deploy_lag_hours(item: &WorkItem, calendar: &BusinessCalendar) -> Option<f64> {
    let merged = merge_time(item)?;
    let deployed = deploy_time(item)?;
    Some(clipped_hours(item, calendar, "deploy-lag", merged, deployed))
}

/// Business hours from incident detection to the recovering deployment.
#[must_use]
pub fn recovery_hours(item: &WorkItem, calendar: &BusinessCalendar) -> Option<f64> {
    let detected = incident_detected(item)?;
    let deployed = deploy_time(item)?;
    Some(clipped_hours(item, calendar, "recovery", detected, deployed))
}

/// Business hours from review start to merge (or completion when the
/// workflow has no distinct merge state). Estimated starts are floored at
/// [`ESTIMATED_REVIEW_FLOOR_HOURS`].
#[must_use]
pub fn review_duration_hours(
    item: &WorkItem,
    calendar: &BusinessCalendar,
    estimator: &dyn ReviewStartEstimator,
) -> Option<(f64, bool)> {
    let start = review_start_or_estimate(item, estimator)?;
    let end = merge_time(item).or(item.completed_at)?;

    let hours = clipped_hours(item, calendar, "review", start.at, end);
    let hours = if start.estimated {
        hours.max(ESTIMATED_REVIEW_FLOOR_HOURS)
    } else {
        hours
    };

    Some((hours, start.estimated))
}

/// Business hours from entering progress to deployment; the "actual
/// duration" used by estimation accuracy and bottleneck detection.
#[must_use]
pub fn work_duration_hours(item: &WorkItem, calendar: &BusinessCalendar) -> Option<f64> {
    let started = progress_start(item)?;
    let deployed = deploy_time(item)?;
    Some(clipped_hours(item, calendar, "work-duration", started, deployed))
}

fn first_transition_to(
    item: &WorkItem,
    mut matches: impl FnMut(&str) -> bool,
) -> Option<DateTime<Utc>> {
    item.history
        .iter()
        .find(|transition| matches(transition.to_state.as_str()))
        .map(|transition| transition.at)
}

fn clipped_hours(
    item: &WorkItem,
    calendar: &BusinessCalendar,
    span: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> f64 {
    if end < start {
        warn!(item = %item.id, span, "out-of-order timestamps; clipping duration to zero");
        return 0.0;
    }
    calendar.business_hours(start, end)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

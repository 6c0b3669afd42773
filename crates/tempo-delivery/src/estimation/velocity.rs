//! Weekly velocity: points planned vs. points delivered per week.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tempo_core::model::WorkItem;

/// Number of trailing weekly buckets retained.
pub const VELOCITY_WEEKS: usize = 8;

/// One weekly bucket, keyed by its Monday.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityBucket {
    pub week_start: NaiveDate,
    pub planned_points: f64,
    pub completed_points: f64,
    /// `min(completed, planned) / planned × 100` — parity is the ceiling;
    /// over-delivery is not rewarded. 0 when nothing was planned.
    pub accuracy: f64,
}

/// Bucket estimated items into trailing weekly planned/completed sums.
///
/// An item counts as *planned* in the week its work started (`started_at`,
/// falling back to `created_at`) and as *completed* in the week it was
/// completed. Items without a size estimate contribute to neither sum.
/// The most recent [`VELOCITY_WEEKS`] buckets are returned, oldest first.
#[must_use]
pub fn weekly_velocity(items: &[WorkItem]) -> Vec<VelocityBucket> {
    let mut buckets: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

    for item in items {
        let Some(points) = item.points else { continue };
        let value = points.value();

        let planned_on = item.started_at.unwrap_or(item.created_at).date_naive();
        buckets.entry(week_start(planned_on)).or_default().0 += value;

        if item.is_completed() {
            if let Some(completed_at) = item.completed_at {
                buckets
                    .entry(week_start(completed_at.date_naive()))
                    .or_default()
                    .1 += value;
            }
        }
    }

    let skip = buckets.len().saturating_sub(VELOCITY_WEEKS);
    buckets
        .into_iter()
        .skip(skip)
        .map(|(week_start, (planned, completed))| VelocityBucket {
            week_start,
            planned_points: planned,
            completed_points: completed,
            accuracy: if planned > 0.0 {
                (completed.min(planned) / planned * 100.0).min(100.0)
            } else {
                0.0
            },
        })
        .collect()
}

/// The Monday of the week containing `date`.
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

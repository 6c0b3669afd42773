//! Code-review analysis: how long changes wait in review, per task, per
//! size class, and as a distribution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tempo_core::calendar::BusinessCalendar;
use tempo_core::model::{Points, WorkItem};

use crate::lifecycle::{self, ProportionalEstimator, ReviewStartEstimator};

/// Histogram bucket upper bounds in business hours, aligned with the
/// review-duration rating thresholds.
const BUCKET_BOUNDS: [(&str, f64); 5] = [
    ("<1h", 1.0),
    ("1-4h", 4.0),
    ("4-8h", 8.0),
    ("8-24h", 24.0),
    ("24-72h", 72.0),
];
const OVERFLOW_BUCKET: &str = ">72h";

/// One reviewed task, longest first in [`CodeReviewAnalysis::tasks`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewTask {
    pub id: String,
    pub points: Option<Points>,
    pub hours: f64,
    /// True when the review start came from the heuristic estimator.
    pub estimated: bool,
}

/// Mean review duration for one size class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointsDistribution {
    pub points: Points,
    pub count: usize,
    pub mean_hours: f64,
}

/// One histogram bucket of review durations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub label: String,
    pub count: usize,
}

/// The full code-review report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeReviewAnalysis {
    pub average_review_hours: f64,
    pub tasks: Vec<ReviewTask>,
    pub by_points: Vec<PointsDistribution>,
    pub histogram: Vec<HistogramBucket>,
}

/// Analyze review durations with the default review-start heuristic.
#[must_use]
pub fn compute_code_review_analysis(
    items: &[WorkItem],
    calendar: &BusinessCalendar,
) -> CodeReviewAnalysis {
    compute_code_review_analysis_with(items, calendar, &ProportionalEstimator::default())
}

/// Like [`compute_code_review_analysis`] but with an explicit estimator.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_code_review_analysis_with(
    items: &[WorkItem],
    calendar: &BusinessCalendar,
    estimator: &dyn ReviewStartEstimator,
) -> CodeReviewAnalysis {
    let mut tasks: Vec<ReviewTask> = items
        .iter()
        .filter_map(|item| {
            let (hours, estimated) =
                lifecycle::review_duration_hours(item, calendar, estimator)?;
            Some(ReviewTask {
                id: item.id.clone(),
                points: item.points,
                hours,
                estimated,
            })
        })
        .collect();

    tasks.sort_by(|a, b| {
        b.hours
            .partial_cmp(&a.hours)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let average_review_hours = if tasks.is_empty() {
        0.0
    } else {
        tasks.iter().map(|t| t.hours).sum::<f64>() / tasks.len() as f64
    };

    CodeReviewAnalysis {
        average_review_hours,
        by_points: points_distribution(&tasks),
        histogram: histogram(&tasks),
        tasks,
    }
}

#[allow(clippy::cast_precision_loss)]
fn points_distribution(tasks: &[ReviewTask]) -> Vec<PointsDistribution> {
    let mut by_points: BTreeMap<Points, Vec<f64>> = BTreeMap::new();
    for task in tasks {
        if let Some(points) = task.points {
            by_points.entry(points).or_default().push(task.hours);
        }
    }

    by_points
        .into_iter()
        .map(|(points, hours)| PointsDistribution {
            points,
            count: hours.len(),
            mean_hours: hours.iter().sum::<f64>() / hours.len() as f64,
        })
        .collect()
}

fn histogram(tasks: &[ReviewTask]) -> Vec<HistogramBucket> {
    let mut counts = vec![0_usize; BUCKET_BOUNDS.len() + 1];

    for task in tasks {
        let slot = BUCKET_BOUNDS
            .iter()
            .position(|(_, upper)| task.hours <= *upper)
            .unwrap_or(BUCKET_BOUNDS.len());
        counts[slot] += 1;
    }

    BUCKET_BOUNDS
        .iter()
        .map(|(label, _)| (*label).to_string())
        .chain(std::iter::once(OVERFLOW_BUCKET.to_string()))
        .zip(counts)
        .map(|(label, count)| HistogramBucket { label, count })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

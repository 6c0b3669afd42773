//! Estimation accuracy and bottleneck analysis.
//!
//! # Overview
//!
//! Completed work is grouped by story-point size and compared against an
//! expected duration: `points × 8` business hours by the fixed convention,
//! unless a historical sample yields a team-specific baseline (mean
//! observed business-hours per point), which supersedes the fixed one.
//! Per-size accuracy carries a confidence interval over the accuracy
//! percentages; items that overran their expectation by the configured
//! multiplier are flagged as bottlenecks; weekly planned-vs-delivered
//! velocity rounds out the report.

pub mod bottleneck;
pub mod velocity;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use tempo_core::calendar::BusinessCalendar;
use tempo_core::config::EstimationConfig;
use tempo_core::model::{Points, WorkItem};

use crate::lifecycle;
use crate::stats::{ConfidenceLevel, Interval, accuracy_with_confidence};

pub use bottleneck::{Bottleneck, MAX_BOTTLENECKS, Severity};
pub use velocity::{VELOCITY_WEEKS, VelocityBucket, weekly_velocity};

/// Where the hours-per-point baseline came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaselineSource {
    /// The fixed 1-point-per-business-day convention (or configured value).
    Fixed,
    /// Mean observed business-hours per point over the historical sample.
    Historical,
}

/// How closely a size class tracks its expectation, judged on the raw
/// actual/expected ratio (symmetric around parity, not the accuracy score).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccuracyBand {
    Excellent,
    Good,
    Poor,
}

impl AccuracyBand {
    /// Band from a mean actual/expected ratio: Excellent within
    /// [0.8, 1.2], Good within [0.6, 1.4], Poor otherwise.
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if (0.8..=1.2).contains(&ratio) {
            Self::Excellent
        } else if (0.6..=1.4).contains(&ratio) {
            Self::Good
        } else {
            Self::Poor
        }
    }
}

/// One completed, estimated work item's durations, ready for comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct SizedObservation {
    pub id: String,
    pub points: Points,
    pub actual_hours: f64,
    pub expected_hours: f64,
}

/// Accuracy report for one story-point size class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsAccuracy {
    pub points: Points,
    pub expected_hours: f64,
    pub sample_size: usize,
    /// Mean per-item accuracy, 0–100.
    pub accuracy: f64,
    pub confidence_interval: Interval,
    pub band: AccuracyBand,
}

/// The full estimation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationAnalysis {
    pub baseline_hours_per_point: f64,
    pub baseline_source: BaselineSource,
    pub accuracy_by_points: Vec<PointsAccuracy>,
    pub velocity: Vec<VelocityBucket>,
    pub bottlenecks: Vec<Bottleneck>,
}

/// Analyze estimation accuracy, velocity, and bottlenecks over `items`.
///
/// `historical` feeds the team baseline; pass `None` (or an empty slice)
/// to stay on the fixed convention.
#[must_use]
pub fn compute_estimation_analysis(
    items: &[WorkItem],
    historical: Option<&[WorkItem]>,
    calendar: &BusinessCalendar,
    config: &EstimationConfig,
    level: ConfidenceLevel,
) -> EstimationAnalysis {
    let (baseline, baseline_source) = baseline_hours_per_point(historical, calendar, config);

    let observations: Vec<SizedObservation> = items
        .iter()
        .filter_map(|item| {
            let points = item.points?;
            let actual = lifecycle::work_duration_hours(item, calendar)?;
            Some(SizedObservation {
                id: item.id.clone(),
                points,
                actual_hours: actual,
                expected_hours: points.value() * baseline,
            })
        })
        .collect();

    debug!(
        observations = observations.len(),
        baseline, "estimation sample assembled"
    );

    EstimationAnalysis {
        baseline_hours_per_point: baseline,
        baseline_source,
        accuracy_by_points: accuracy_by_points(&observations, level),
        velocity: weekly_velocity(items),
        bottlenecks: bottleneck::detect(&observations, config.bottleneck_multiplier),
    }
}

/// Mean observed business-hours per point over the historical sample, or
/// the configured fixed baseline when the sample yields nothing usable.
fn baseline_hours_per_point(
    historical: Option<&[WorkItem]>,
    calendar: &BusinessCalendar,
    config: &EstimationConfig,
) -> (f64, BaselineSource) {
    let per_point: Vec<f64> = historical
        .unwrap_or_default()
        .iter()
        .filter_map(|item| {
            let points = item.points?;
            let hours = lifecycle::work_duration_hours(item, calendar)?;
            Some(hours / points.value())
        })
        .collect();

    if per_point.is_empty() {
        return (config.hours_per_point, BaselineSource::Fixed);
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = per_point.iter().sum::<f64>() / per_point.len() as f64;
    if mean > 0.0 {
        (mean, BaselineSource::Historical)
    } else {
        (config.hours_per_point, BaselineSource::Fixed)
    }
}

fn accuracy_by_points(
    observations: &[SizedObservation],
    level: ConfidenceLevel,
) -> Vec<PointsAccuracy> {
    let mut by_points: BTreeMap<Points, Vec<&SizedObservation>> = BTreeMap::new();
    for obs in observations {
        by_points.entry(obs.points).or_default().push(obs);
    }

    let mut result = Vec::with_capacity(by_points.len());
    for (points, group) in by_points {
        let actuals: Vec<f64> = group.iter().map(|o| o.actual_hours).collect();
        let expecteds: Vec<f64> = group.iter().map(|o| o.expected_hours).collect();

        // Inputs are constructed above with matching lengths and positive
        // expectations, so this cannot fail; skip defensively regardless.
        let Ok(estimate) = accuracy_with_confidence(&actuals, &expecteds, level) else {
            continue;
        };

        // Expected hours are constant within a size class, so the ratio of
        // sums is the mean per-item ratio.
        let mean_ratio =
            actuals.iter().sum::<f64>() / expecteds.iter().sum::<f64>().max(f64::EPSILON);

        result.push(PointsAccuracy {
            points,
            expected_hours: expecteds.first().copied().unwrap_or_default(),
            sample_size: group.len(),
            accuracy: estimate.accuracy,
            confidence_interval: estimate.confidence_interval,
            band: AccuracyBand::from_ratio(mean_ratio),
        });
    }

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

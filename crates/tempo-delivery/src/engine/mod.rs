//! Metrics engine: the four DORA metrics plus the two extension metrics,
//! each with a rating tier and a trend against the preceding period.
//!
//! # Overview
//!
//! Every metric is a pure function of the filtered work-item set for one
//! reporting window (an explicit date range, or a bounding cycle). The
//! engine never raises on data quality: items missing a required milestone
//! are excluded from the relevant sample, and an empty sample produces a
//! zero-valued, lowest-rated result carrying a human-readable note.
//!
//! Trends compare against the immediately preceding window of equal length
//! (or a caller-supplied prior item set), sign-normalized so positive
//! always means improving.

pub mod rating;
pub mod trend;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tempo_core::calendar::{BusinessCalendar, HOURS_PER_DAY};
use tempo_core::model::{Cycle, ReportingWindow, WorkItem};

use crate::lifecycle::{
    self, ProportionalEstimator, ReviewStartEstimator,
};

pub use rating::{Direction, MetricKind, Rating, RatingScale, scale_for};
pub use trend::trend_pct;

/// One computed metric: value, tier, trend, and provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    pub kind: MetricKind,
    /// Deployment frequency: a count (cycle-bound) or per-day rate.
    /// Durations: business days, except review duration in business hours.
    /// Change failure rate: percent.
    pub value: f64,
    pub rating: Rating,
    /// Percentage change vs. the prior period, positive = improving.
    pub trend_pct: f64,
    /// Items that contributed to the value after milestone filtering.
    pub sample_size: usize,
    /// Present when the sample was empty and the value is a placeholder.
    pub note: Option<String>,
}

/// The full delivery-metrics report for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryMetrics {
    pub window: ReportingWindow,
    pub cycle: Option<Cycle>,
    pub deployment_frequency: MetricValue,
    pub lead_time: MetricValue,
    pub change_failure_rate: MetricValue,
    pub time_to_recovery: MetricValue,
    pub time_to_deploy: MetricValue,
    pub review_duration: MetricValue,
}

/// Compute all six delivery metrics with the default review-start
/// heuristic.
#[must_use]
pub fn compute_delivery_metrics(
    items: &[WorkItem],
    window: ReportingWindow,
    cycle: Option<&Cycle>,
    prior_items: Option<&[WorkItem]>,
    calendar: &BusinessCalendar,
) -> DeliveryMetrics {
    compute_delivery_metrics_with(
        items,
        window,
        cycle,
        prior_items,
        calendar,
        &ProportionalEstimator::default(),
    )
}

/// Like [`compute_delivery_metrics`] but with an explicit review-start
/// estimator.
#[must_use]
pub fn compute_delivery_metrics_with(
    items: &[WorkItem],
    window: ReportingWindow,
    cycle: Option<&Cycle>,
    prior_items: Option<&[WorkItem]>,
    calendar: &BusinessCalendar,
    estimator: &dyn ReviewStartEstimator,
) -> DeliveryMetrics {
    let cycle_bound = cycle.is_some();
    let window = cycle.map_or(window, Cycle::window);
    let prior_window = window.preceding();
    let prior_pool = prior_items.unwrap_or(items);

    let frequency = assemble(
        MetricKind::DeploymentFrequency,
        cycle_bound,
        frequency_sample(items, window, cycle_bound),
        frequency_sample(prior_pool, prior_window, cycle_bound),
        "no work items were completed in this window",
    );

    let lead_time = assemble(
        MetricKind::LeadTime,
        cycle_bound,
        mean_sample(items, window, hours_to_days, |item| {
            lifecycle::lead_time_hours(item, calendar)
        }),
        mean_sample(prior_pool, prior_window, hours_to_days, |item| {
            lifecycle::lead_time_hours(item, calendar)
        }),
        "no completed items with a computable review-to-deploy span",
    );

    let change_failure_rate = assemble(
        MetricKind::ChangeFailureRate,
        cycle_bound,
        failure_rate_sample(items, window),
        failure_rate_sample(prior_pool, prior_window),
        "no deployments in this window",
    );

    let time_to_recovery = assemble(
        MetricKind::TimeToRecovery,
        cycle_bound,
        mean_sample(items, window, hours_to_days, |item| {
            lifecycle::recovery_hours(item, calendar)
        }),
        mean_sample(prior_pool, prior_window, hours_to_days, |item| {
            lifecycle::recovery_hours(item, calendar)
        }),
        "no incident-tagged deployments in this window",
    );

    let time_to_deploy = assemble(
        MetricKind::TimeToDeploy,
        cycle_bound,
        mean_sample(items, window, hours_to_days, |item| {
            lifecycle::deploy_lag_hours(item, calendar)
        }),
        mean_sample(prior_pool, prior_window, hours_to_days, |item| {
            lifecycle::deploy_lag_hours(item, calendar)
        }),
        "no items carrying both merge and deploy timestamps",
    );

    let review_duration = assemble(
        MetricKind::ReviewDuration,
        cycle_bound,
        mean_sample(items, window, |hours| hours, |item| {
            lifecycle::review_duration_hours(item, calendar, estimator)
                .map(|(hours, _)| hours)
        }),
        mean_sample(prior_pool, prior_window, |hours| hours, |item| {
            lifecycle::review_duration_hours(item, calendar, estimator)
                .map(|(hours, _)| hours)
        }),
        "no completed items with a computable review span",
    );

    DeliveryMetrics {
        window,
        cycle: cycle.cloned(),
        deployment_frequency: frequency,
        lead_time,
        change_failure_rate,
        time_to_recovery,
        time_to_deploy,
        review_duration,
    }
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// An aggregated sample: the reportable value, the value the rating scale
/// reads (they differ only for cycle-bound deployment frequency), and how
/// many items contributed.
struct Sampled {
    value: f64,
    rating_input: f64,
    size: usize,
}

fn completions<'a>(
    items: &'a [WorkItem],
    window: ReportingWindow,
) -> impl Iterator<Item = &'a WorkItem> + 'a {
    items.iter().filter(move |item| {
        item.is_completed()
            && item
                .completed_at
                .is_some_and(|at| window.contains(at))
    })
}

#[allow(clippy::cast_precision_loss)]
fn frequency_sample(items: &[WorkItem], window: ReportingWindow, cycle_bound: bool) -> Sampled {
    let count = completions(items, window).count();
    let rate = count as f64 / window.days().max(1.0);

    // Cycle-bound mode reports the raw count but rates the per-day rate;
    // three completions in a ten-day cycle must rate Low, not Medium.
    if cycle_bound {
        Sampled {
            value: count as f64,
            rating_input: rate,
            size: count,
        }
    } else {
        Sampled {
            value: rate,
            rating_input: rate,
            size: count,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean_sample(
    items: &[WorkItem],
    window: ReportingWindow,
    to_value: impl Fn(f64) -> f64,
    duration: impl Fn(&WorkItem) -> Option<f64>,
) -> Sampled {
    let sample: Vec<f64> = completions(items, window).filter_map(duration).collect();
    if sample.is_empty() {
        return Sampled {
            value: 0.0,
            rating_input: 0.0,
            size: 0,
        };
    }

    let mean = sample.iter().sum::<f64>() / sample.len() as f64;
    let value = to_value(mean);
    Sampled {
        value,
        rating_input: value,
        size: sample.len(),
    }
}

#[allow(clippy::cast_precision_loss)]
fn failure_rate_sample(items: &[WorkItem], window: ReportingWindow) -> Sampled {
    let deployed: Vec<&WorkItem> = completions(items, window).collect();
    if deployed.is_empty() {
        return Sampled {
            value: 0.0,
            rating_input: 0.0,
            size: 0,
        };
    }

    let failures = deployed.iter().filter(|item| item.is_failure_change()).count();
    let rate = failures as f64 / deployed.len() as f64 * 100.0;
    Sampled {
        value: rate,
        rating_input: rate,
        size: deployed.len(),
    }
}

fn hours_to_days(hours: f64) -> f64 {
    hours / HOURS_PER_DAY
}

fn assemble(
    kind: MetricKind,
    cycle_bound: bool,
    current: Sampled,
    prior: Sampled,
    empty_note: &str,
) -> MetricValue {
    let scale = scale_for(kind, cycle_bound);

    if current.size == 0 {
        debug!(metric = ?kind, "empty sample; reporting placeholder value");
        return MetricValue {
            kind,
            value: 0.0,
            rating: Rating::Low,
            trend_pct: 0.0,
            sample_size: 0,
            note: Some(empty_note.to_string()),
        };
    }

    MetricValue {
        kind,
        value: current.value,
        rating: scale.rate(current.rating_input),
        trend_pct: trend_pct(current.value, prior.value, scale.direction),
        sample_size: current.size,
        note: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use tempo_core::model::{StateCategory, Transition};

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn window(from_day: u32, to_day: u32) -> ReportingWindow {
        ReportingWindow {
            starts_at: ts(from_day, 0),
            ends_at: ts(to_day, 23),
        }
    }

    fn deployed(id: &str, completed_day: u32) -> WorkItem {
        WorkItem {
            id: id.to_string(),
            points: None,
            state: "Done".to_string(),
            category: StateCategory::Completed,
            created_at: ts(1, 9),
            started_at: Some(ts(completed_day.saturating_sub(1).max(1), 9)),
            completed_at: Some(ts(completed_day, 17)),
            tags: Vec::new(),
            history: Vec::new(),
        }
    }

    fn with_history(mut item: WorkItem, history: Vec<(u32, u32, &str)>) -> WorkItem {
        item.history = history
            .into_iter()
            .map(|(day, hour, state)| Transition {
                at: ts(day, hour),
                from_state: None,
                to_state: state.to_string(),
            })
            .collect();
        item
    }

    #[test]
    fn empty_input_degrades_every_metric() {
        let metrics = compute_delivery_metrics(
            &[],
            window(1, 15),
            None,
            None,
            &BusinessCalendar::default(),
        );

        for metric in [
            &metrics.deployment_frequency,
            &metrics.lead_time,
            &metrics.change_failure_rate,
            &metrics.time_to_recovery,
            &metrics.time_to_deploy,
            &metrics.review_duration,
        ] {
            assert!((metric.value - 0.0).abs() < f64::EPSILON);
            assert_eq!(metric.rating, Rating::Low);
            assert_eq!(metric.sample_size, 0);
            assert!(metric.note.is_some(), "{:?} should carry a note", metric.kind);
        }
    }

    #[test]
    fn cycle_bound_frequency_reports_the_raw_count_but_rates_the_rate() {
        let cycle = Cycle {
            sequence: 3,
            starts_at: ts(1, 0),
            ends_at: ts(11, 0),
        };
        let items = vec![deployed("A", 2), deployed("B", 5), deployed("C", 9)];

        let metrics = compute_delivery_metrics(
            &items,
            cycle.window(),
            Some(&cycle),
            None,
            &BusinessCalendar::default(),
        );

        let frequency = &metrics.deployment_frequency;
        assert!((frequency.value - 3.0).abs() < f64::EPSILON);
        assert_eq!(frequency.sample_size, 3);
        // 0.3 deployments/day clears none of the >10/>5/>1 cutoffs.
        assert_eq!(frequency.rating, Rating::Low);
    }

    #[test]
    fn window_bound_frequency_is_a_day_rate() {
        // Four deployments across a ten-day window: 0.4/day clears >0.2.
        let items = vec![
            deployed("A", 2),
            deployed("B", 4),
            deployed("C", 6),
            deployed("D", 8),
        ];

        let metrics = compute_delivery_metrics(
            &items,
            window(1, 11),
            None,
            None,
            &BusinessCalendar::default(),
        );

        let frequency = &metrics.deployment_frequency;
        assert!(frequency.value > 0.35 && frequency.value < 0.45);
        assert_eq!(frequency.rating, Rating::High);
    }

    #[test]
    fn change_failure_rate_counts_incidents_and_rollbacks() {
        let mut incident = deployed("BAD", 5);
        incident.tags = vec!["incident".to_string()];
        let mut rollback = deployed("RB", 6);
        rollback.tags = vec!["rollback".to_string()];
        let items = vec![deployed("A", 2), deployed("B", 4), incident, rollback];

        let metrics = compute_delivery_metrics(
            &items,
            window(1, 11),
            None,
            None,
            &BusinessCalendar::default(),
        );

        let cfr = &metrics.change_failure_rate;
        assert!((cfr.value - 50.0).abs() < 1e-9);
        assert_eq!(cfr.sample_size, 4);
        assert_eq!(cfr.rating, Rating::Low);
    }

    #[test]
    fn time_to_deploy_requires_both_milestones() {
        // Only A carries a Merged transition; B is excluded, not zeroed.
        let a = with_history(deployed("A", 5), vec![(5, 12, "Merged")]);
        let b = deployed("B", 6);

        let metrics = compute_delivery_metrics(
            &[a, b],
            window(1, 11),
            None,
            None,
            &BusinessCalendar::default(),
        );

        let ttd = &metrics.time_to_deploy;
        assert_eq!(ttd.sample_size, 1);
        // Merged Tuesday 12:00 → deployed 17:00: 5 business hours = 0.625 d.
        assert!((ttd.value - 0.625).abs() < 1e-9);
        assert_eq!(ttd.rating, Rating::Medium);
    }

    #[test]
    fn trends_are_direction_normalized() {
        // Current window: one deployment; prior window: three.
        let items = vec![
            deployed("A", 12),
            deployed("P1", 2),
            deployed("P2", 4),
            deployed("P3", 8),
        ];

        let metrics = compute_delivery_metrics(
            &items,
            window(11, 21),
            None,
            None,
            &BusinessCalendar::default(),
        );

        // Fewer deployments than before: a regression, so negative.
        assert!(metrics.deployment_frequency.trend_pct < 0.0);
    }

    #[test]
    fn completions_outside_the_window_are_ignored() {
        let items = vec![deployed("IN", 5), deployed("OUT", 25)];

        let metrics = compute_delivery_metrics(
            &items,
            window(1, 11),
            None,
            None,
            &BusinessCalendar::default(),
        );

        assert_eq!(metrics.deployment_frequency.sample_size, 1);
    }
}

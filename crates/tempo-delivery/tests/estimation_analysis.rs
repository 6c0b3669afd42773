//! Estimation-analysis scenarios: the documented bottleneck boundary case,
//! baseline supersession, and velocity retention.

use chrono::{DateTime, Duration, TimeZone, Utc};
use tempo_core::calendar::BusinessCalendar;
use tempo_core::config::{AnalyticsConfig, EstimationConfig};
use tempo_core::model::{Points, StateCategory, WorkItem};
use tempo_delivery::compute_estimation_analysis;
use tempo_delivery::estimation::{BaselineSource, Severity, VELOCITY_WEEKS};
use tempo_delivery::provider::{HistoricalSampleProvider, HistoryScope, InMemoryProvider};
use tempo_delivery::stats::ConfidenceLevel;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// A completed item started Monday 2024-03-04 09:00 that took `hours`
/// business hours under the default calendar (9-hour work days).
fn took(id: &str, points: Points, hours: f64) -> WorkItem {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let completed = {
        let full_days = (hours / 9.0).floor() as u32;
        let remainder = hours - f64::from(full_days) * 9.0;
        let minutes = (remainder * 60.0).round() as u32;
        ts(4 + full_days, 9) + Duration::minutes(i64::from(minutes))
    };

    WorkItem {
        id: id.to_string(),
        points: Some(points),
        state: "Done".to_string(),
        category: StateCategory::Completed,
        created_at: ts(4, 9),
        started_at: Some(ts(4, 9)),
        completed_at: Some(completed),
        tags: Vec::new(),
        history: Vec::new(),
    }
}

fn analyze(items: &[WorkItem], historical: Option<&[WorkItem]>) -> tempo_delivery::EstimationAnalysis {
    compute_estimation_analysis(
        items,
        historical,
        &BusinessCalendar::default(),
        &EstimationConfig::default(),
        ConfidenceLevel::P95,
    )
}

// ---------------------------------------------------------------------------
// The documented bottleneck boundary
// ---------------------------------------------------------------------------

/// Estimate 2 at an 8 h/point baseline means 16 expected hours; a 24-hour
/// actual is exactly the 1.5× threshold — flagged, severity Medium.
#[test]
fn ratio_of_exactly_one_point_five_flags_at_medium() {
    let analysis = analyze(&[took("EDGE", Points::Two, 24.0)], None);

    assert_eq!(analysis.bottlenecks.len(), 1);
    let flagged = &analysis.bottlenecks[0];
    assert_eq!(flagged.id, "EDGE");
    assert!((flagged.expected_hours - 16.0).abs() < 1e-9);
    assert!((flagged.actual_hours - 24.0).abs() < 1e-9);
    assert_eq!(flagged.severity, Severity::Medium);
    assert!((flagged.overrun_pct - 50.0).abs() < 1e-9);
}

#[test]
fn on_budget_work_is_never_flagged() {
    let analysis = analyze(
        &[
            took("A", Points::One, 8.0),
            took("B", Points::Three, 22.0),
            took("C", Points::Five, 44.0),
        ],
        None,
    );

    assert!(analysis.bottlenecks.is_empty());
}

// ---------------------------------------------------------------------------
// Baselines
// ---------------------------------------------------------------------------

#[test]
fn historical_baseline_supersedes_the_fixed_convention() {
    // The team's one-pointers historically take 12 business hours, so a
    // 24-hour two-pointer is exactly on budget rather than a bottleneck.
    let history = vec![
        took("H1", Points::One, 12.0),
        took("H2", Points::One, 12.0),
        took("H3", Points::Two, 24.0),
    ];

    let analysis = analyze(&[took("A", Points::Two, 24.0)], Some(&history));

    assert_eq!(analysis.baseline_source, BaselineSource::Historical);
    assert!((analysis.baseline_hours_per_point - 12.0).abs() < 1e-9);
    assert!(analysis.bottlenecks.is_empty());
    assert!((analysis.accuracy_by_points[0].accuracy - 100.0).abs() < 1e-9);
}

#[test]
fn empty_history_falls_back_to_fixed() {
    let analysis = analyze(&[took("A", Points::One, 8.0)], Some(&[]));
    assert_eq!(analysis.baseline_source, BaselineSource::Fixed);
    assert!((analysis.baseline_hours_per_point - 8.0).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Accuracy confidence
// ---------------------------------------------------------------------------

#[test]
fn accuracy_interval_brackets_the_mean() {
    let analysis = analyze(
        &[
            took("A", Points::One, 7.0),
            took("B", Points::One, 8.0),
            took("C", Points::One, 10.0),
            took("D", Points::One, 12.0),
        ],
        None,
    );

    let class = &analysis.accuracy_by_points[0];
    assert_eq!(class.sample_size, 4);
    assert!(class.confidence_interval.lower <= class.accuracy);
    assert!(class.accuracy <= class.confidence_interval.upper);
    assert!(class.confidence_interval.lower >= 0.0);
}

// ---------------------------------------------------------------------------
// Provider wiring
// ---------------------------------------------------------------------------

/// The typical caller path: history comes from an injected provider and
/// the confidence level from configuration.
#[test]
fn a_provider_backed_history_feeds_the_baseline() {
    let provider = InMemoryProvider::new(vec![
        took("H1", Points::One, 12.0),
        took("H2", Points::Two, 24.0),
    ]);
    let history = provider
        .fetch(&HistoryScope::default())
        .expect("in-memory fetch");

    let config = AnalyticsConfig::default();
    let level = ConfidenceLevel::try_from(config.stats.confidence_level)
        .expect("configured level is supported");

    let analysis = compute_estimation_analysis(
        &[took("A", Points::Two, 24.0)],
        Some(&history),
        &BusinessCalendar::default(),
        &config.estimation,
        level,
    );

    assert_eq!(analysis.baseline_source, BaselineSource::Historical);
    assert!((analysis.baseline_hours_per_point - 12.0).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Velocity
// ---------------------------------------------------------------------------

#[test]
fn velocity_keeps_only_the_trailing_weeks() {
    let items: Vec<WorkItem> = (0..12_i64)
        .map(|week| {
            let started = Utc
                .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
                .single()
                .expect("valid timestamp")
                + Duration::weeks(week);
            WorkItem {
                id: format!("W-{week}"),
                points: Some(Points::Three),
                state: "Done".to_string(),
                category: StateCategory::Completed,
                created_at: started,
                started_at: Some(started),
                completed_at: Some(started + Duration::days(2)),
                tags: Vec::new(),
                history: Vec::new(),
            }
        })
        .collect();

    let analysis = analyze(&items, None);
    assert_eq!(analysis.velocity.len(), VELOCITY_WEEKS);
    assert!(
        analysis
            .velocity
            .windows(2)
            .all(|pair| pair[0].week_start < pair[1].week_start),
        "buckets are ordered oldest first"
    );
}

//! Statistical summarizer: sample statistics, confidence intervals, and
//! predictive ranges over duration samples.
//!
//! # Overview
//!
//! Every aggregate the engine reports runs through [`summarize`]: mean,
//! median, unbiased standard deviation, standard error, a confidence
//! interval for the mean, and a wider predictive range expected to contain
//! one future observation. [`accuracy_with_confidence`] layers the
//! estimation-accuracy formula on top, summarizing the per-pair accuracy
//! percentages rather than the raw durations.
//!
//! Degenerate samples degrade, never fail: an empty sample yields the
//! all-zero summary and a single observation has zero spread. The only
//! error path is a caller-contract violation in
//! [`accuracy_with_confidence`].

pub mod ttable;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

pub use ttable::t_critical;

/// Supported confidence levels for intervals and predictive ranges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    P90,
    #[default]
    P95,
    P99,
}

impl ConfidenceLevel {
    /// The level as a percentage (90, 95, 99).
    #[must_use]
    pub const fn percent(self) -> u8 {
        match self {
            Self::P90 => 90,
            Self::P95 => 95,
            Self::P99 => 99,
        }
    }

    /// Column index into the critical-value table.
    pub(crate) const fn table_column(self) -> usize {
        match self {
            Self::P90 => 0,
            Self::P95 => 1,
            Self::P99 => 2,
        }
    }
}

impl TryFrom<u8> for ConfidenceLevel {
    type Error = anyhow::Error;

    fn try_from(percent: u8) -> Result<Self> {
        match percent {
            90 => Ok(Self::P90),
            95 => Ok(Self::P95),
            99 => Ok(Self::P99),
            other => bail!("unsupported confidence level {other}: expected 90, 95, or 99"),
        }
    }
}

/// A closed interval on the duration axis. Lower bounds are floored at 0 —
/// durations cannot be negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    /// The degenerate `[0, 0]` interval.
    pub const ZERO: Self = Self {
        lower: 0.0,
        upper: 0.0,
    };

    /// Interval width.
    #[must_use]
    pub fn width(&self) -> f64 {
        (self.upper - self.lower).max(0.0)
    }

    /// True when `other` lies entirely within this interval.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.lower <= other.lower && other.upper <= self.upper
    }
}

/// Full summary of one numeric sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticalSummary {
    pub sample_size: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n−1 denominator); 0 for n ≤ 1.
    pub std_dev: f64,
    pub std_err: f64,
    /// Range expected to contain the true mean at the stated level.
    pub confidence_interval: Interval,
    /// Wider range expected to contain one future observation.
    pub predictive_range: Interval,
    pub confidence_level: ConfidenceLevel,
}

impl StatisticalSummary {
    fn empty(level: ConfidenceLevel) -> Self {
        Self {
            sample_size: 0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            std_err: 0.0,
            confidence_interval: Interval::ZERO,
            predictive_range: Interval::ZERO,
            confidence_level: level,
        }
    }
}

/// Summarize a sample of observations at the given confidence level.
///
/// An empty sample yields the all-zero summary.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(values: &[f64], level: ConfidenceLevel) -> StatisticalSummary {
    let n = values.len();
    if n == 0 {
        return StatisticalSummary::empty(level);
    }

    let count = n as f64;
    let mean = values.iter().sum::<f64>() / count;
    let median = median_of(values);

    let std_dev = if n <= 1 {
        0.0
    } else {
        let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        (sum_sq / (count - 1.0)).sqrt()
    };
    let std_err = std_dev / count.sqrt();

    let (ci_margin, pred_margin) = if n <= 1 {
        (0.0, 0.0)
    } else {
        let t = t_critical(level, n - 1);
        (t * std_err, t * std_dev * (1.0 + 1.0 / count).sqrt())
    };

    StatisticalSummary {
        sample_size: n,
        mean,
        median,
        std_dev,
        std_err,
        confidence_interval: interval_around(mean, ci_margin),
        predictive_range: interval_around(mean, pred_margin),
        confidence_level: level,
    }
}

/// Accuracy of actual durations against expectations, with a confidence
/// interval over the per-pair accuracy percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyEstimate {
    /// Mean per-pair accuracy, 0–100.
    pub accuracy: f64,
    pub confidence_interval: Interval,
    pub sample_size: usize,
}

/// Per-pair estimation accuracy: `clamp(0, 100, (1 − |actual−expected|/expected) × 100)`.
///
/// Parity scores 100; a 2× overrun (or a zero actual) scores 0.
#[must_use]
pub fn pair_accuracy(actual: f64, expected: f64) -> f64 {
    ((1.0 - (actual - expected).abs() / expected) * 100.0).clamp(0.0, 100.0)
}

/// Aggregate estimation accuracy over paired samples.
///
/// # Errors
///
/// Fails on mismatched lengths, empty input, non-finite values, or
/// non-positive expectations — programming errors, not data-quality gaps.
pub fn accuracy_with_confidence(
    actuals: &[f64],
    expecteds: &[f64],
    level: ConfidenceLevel,
) -> Result<AccuracyEstimate> {
    if actuals.len() != expecteds.len() {
        bail!(
            "mismatched sample lengths: {} actuals vs {} expecteds",
            actuals.len(),
            expecteds.len()
        );
    }
    if actuals.is_empty() {
        bail!("accuracy requires at least one (actual, expected) pair");
    }

    let mut accuracies = Vec::with_capacity(actuals.len());
    for (index, (&actual, &expected)) in actuals.iter().zip(expecteds).enumerate() {
        if !actual.is_finite() || !expected.is_finite() {
            bail!("non-finite sample at index {index}");
        }
        if expected <= 0.0 {
            bail!("non-positive expected value {expected} at index {index}");
        }
        accuracies.push(pair_accuracy(actual, expected));
    }

    let summary = summarize(&accuracies, level);
    Ok(AccuracyEstimate {
        accuracy: summary.mean,
        confidence_interval: summary.confidence_interval,
        sample_size: summary.sample_size,
    })
}

fn interval_around(mean: f64, margin: f64) -> Interval {
    Interval {
        lower: (mean - margin).max(0.0),
        upper: mean + margin,
    }
}

fn median_of(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 1 {
        sorted[mid]
    } else {
        f64::midpoint(sorted[mid - 1], sorted[mid])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

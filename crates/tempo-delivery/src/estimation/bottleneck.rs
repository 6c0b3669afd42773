//! Bottleneck detection: completed items whose actual duration overran
//! their size-based expectation by more than the configured multiplier.

use serde::{Deserialize, Serialize};
use std::fmt;

use tempo_core::model::Points;

use super::SizedObservation;

/// Reported bottlenecks are capped at the worst offenders.
pub const MAX_BOTTLENECKS: usize = 10;

/// How badly an item overran its expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Severity from the actual/expected ratio. The Medium boundary is
    /// inclusive: a ratio of exactly 1.5 classifies Medium.
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > 3.0 {
            Self::Critical
        } else if ratio > 2.0 {
            Self::High
        } else if ratio >= 1.5 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One flagged work item, sorted by overrun percentage descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottleneck {
    pub id: String,
    pub points: Points,
    pub expected_hours: f64,
    pub actual_hours: f64,
    /// Percent over expectation: `(actual/expected − 1) × 100`.
    pub overrun_pct: f64,
    pub severity: Severity,
}

/// Flag observations whose actual duration reaches
/// `expected × multiplier` (boundary inclusive), worst first, capped at
/// [`MAX_BOTTLENECKS`].
#[must_use]
pub fn detect(observations: &[SizedObservation], multiplier: f64) -> Vec<Bottleneck> {
    let mut flagged: Vec<Bottleneck> = observations
        .iter()
        .filter(|obs| obs.expected_hours > 0.0)
        .filter_map(|obs| {
            let ratio = obs.actual_hours / obs.expected_hours;
            if ratio < multiplier {
                return None;
            }
            Some(Bottleneck {
                id: obs.id.clone(),
                points: obs.points,
                expected_hours: obs.expected_hours,
                actual_hours: obs.actual_hours,
                overrun_pct: (ratio - 1.0) * 100.0,
                severity: Severity::from_ratio(ratio),
            })
        })
        .collect();

    flagged.sort_by(|a, b| {
        b.overrun_pct
            .partial_cmp(&a.overrun_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    flagged.truncate(MAX_BOTTLENECKS);
    flagged
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

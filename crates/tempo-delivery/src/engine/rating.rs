//! Declarative rating tiers for delivery metrics.
//!
//! One table maps each metric to an ordered threshold scale and a
//! direction; the tier logic itself is uniform. Thresholds follow the
//! published DORA bands where they exist and the house conventions for the
//! two extension metrics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative performance tier, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Elite,
    High,
    Medium,
    Low,
}

impl Rating {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Elite => "elite",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six metrics the engine reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricKind {
    DeploymentFrequency,
    LeadTime,
    ChangeFailureRate,
    TimeToRecovery,
    TimeToDeploy,
    ReviewDuration,
}

/// Whether larger values are better (rates) or worse (durations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// Ordered thresholds for one metric: the elite, high, and medium cutoffs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingScale {
    pub direction: Direction,
    pub elite: f64,
    pub high: f64,
    pub medium: f64,
}

impl RatingScale {
    /// Tier for a value under this scale.
    ///
    /// Higher-is-better scales require strictly exceeding a cutoff;
    /// lower-is-better scales admit the cutoff itself.
    #[must_use]
    pub fn rate(&self, value: f64) -> Rating {
        match self.direction {
            Direction::HigherIsBetter => {
                if value > self.elite {
                    Rating::Elite
                } else if value > self.high {
                    Rating::High
                } else if value > self.medium {
                    Rating::Medium
                } else {
                    Rating::Low
                }
            }
            Direction::LowerIsBetter => {
                if value <= self.elite {
                    Rating::Elite
                } else if value <= self.high {
                    Rating::High
                } else if value <= self.medium {
                    Rating::Medium
                } else {
                    Rating::Low
                }
            }
        }
    }
}

/// The threshold table. Deployment frequency is rated on a per-day rate in
/// both modes; the cycle-bound scale is the stricter one (the window-bound
/// scale tolerates slower cadences over long ranges).
#[must_use]
pub const fn scale_for(kind: MetricKind, cycle_bound: bool) -> RatingScale {
    match kind {
        MetricKind::DeploymentFrequency => {
            if cycle_bound {
                RatingScale {
                    direction: Direction::HigherIsBetter,
                    elite: 10.0,
                    high: 5.0,
                    medium: 1.0,
                }
            } else {
                RatingScale {
                    direction: Direction::HigherIsBetter,
                    elite: 1.0,
                    high: 0.2,
                    medium: 0.1,
                }
            }
        }
        // Business days.
        MetricKind::LeadTime => RatingScale {
            direction: Direction::LowerIsBetter,
            elite: 1.0,
            high: 7.0,
            medium: 30.0,
        },
        // Percent of deployments.
        MetricKind::ChangeFailureRate => RatingScale {
            direction: Direction::LowerIsBetter,
            elite: 15.0,
            high: 30.0,
            medium: 45.0,
        },
        // Business days.
        MetricKind::TimeToRecovery => RatingScale {
            direction: Direction::LowerIsBetter,
            elite: 0.04,
            high: 1.0,
            medium: 7.0,
        },
        // Business days.
        MetricKind::TimeToDeploy => RatingScale {
            direction: Direction::LowerIsBetter,
            elite: 0.125,
            high: 0.5,
            medium: 2.0,
        },
        // Business hours.
        MetricKind::ReviewDuration => RatingScale {
            direction: Direction::LowerIsBetter,
            elite: 4.0,
            high: 24.0,
            medium: 72.0,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

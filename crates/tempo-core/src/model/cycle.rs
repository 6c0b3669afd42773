use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A fixed time-boxed iteration (sprint) used to bound metric attribution.
///
/// A work item belongs to a cycle when its completion timestamp falls within
/// `[starts_at, ends_at]` (both bounds inclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub sequence: u32,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl Cycle {
    /// True when `at` falls within the cycle bounds.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.starts_at <= at && at <= self.ends_at
    }

    /// Cycle length in (possibly fractional) days.
    #[must_use]
    pub fn days(&self) -> f64 {
        span_days(self.starts_at, self.ends_at)
    }

    /// The cycle bounds as a plain reporting window.
    #[must_use]
    pub const fn window(&self) -> ReportingWindow {
        ReportingWindow {
            starts_at: self.starts_at,
            ends_at: self.ends_at,
        }
    }
}

/// An inclusive reporting window for metric attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingWindow {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl ReportingWindow {
    /// True when `at` falls within the window bounds.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.starts_at <= at && at <= self.ends_at
    }

    /// Window length in (possibly fractional) days. Never negative.
    #[must_use]
    pub fn days(&self) -> f64 {
        span_days(self.starts_at, self.ends_at)
    }

    /// The immediately preceding window of equal length.
    ///
    /// Used for trend computation: metrics for the current window are
    /// compared against the same metrics over this window.
    #[must_use]
    pub fn preceding(&self) -> Self {
        let span = self.ends_at - self.starts_at;
        Self {
            starts_at: self.starts_at - span,
            ends_at: self.starts_at,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn span_days(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> f64 {
    let span = (ends_at - starts_at).max(Duration::zero());
    span.num_seconds() as f64 / 86_400.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

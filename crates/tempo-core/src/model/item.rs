use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Story-point sizes from the closed Fibonacci-ish set used by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Points {
    One,
    Two,
    Three,
    Five,
    Eight,
}

impl Points {
    /// All sizes in ascending order.
    pub const ALL: [Self; 5] = [Self::One, Self::Two, Self::Three, Self::Five, Self::Eight];

    /// Numeric point value.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::One => 1.0,
            Self::Two => 2.0,
            Self::Three => 3.0,
            Self::Five => 5.0,
            Self::Eight => 8.0,
        }
    }
}

impl TryFrom<u8> for Points {
    type Error = InvalidPoints;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            5 => Ok(Self::Five),
            8 => Ok(Self::Eight),
            other => Err(InvalidPoints(other)),
        }
    }
}

impl From<Points> for u8 {
    fn from(points: Points) -> Self {
        match points {
            Points::One => 1,
            Points::Two => 2,
            Points::Three => 3,
            Points::Five => 5,
            Points::Eight => 8,
        }
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Error returned when a story-point value is outside the closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid story-point value {0}: expected one of 1, 2, 3, 5, 8")]
pub struct InvalidPoints(pub u8);

/// Coarse lifecycle category, normalized by the tracker client.
///
/// The raw tracker state name is kept alongside in [`WorkItem::state`];
/// milestone extraction matches on the raw names, while window attribution
/// and deploy detection use this category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StateCategory {
    Open,
    InProgress,
    Completed,
    Canceled,
}

impl StateCategory {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for StateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateCategory {
    type Err = ParseEnumError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "in-progress" | "in progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            _ => Err(ParseEnumError {
                expected: "state category",
                got: raw.to_string(),
            }),
        }
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {expected}: '{got}'")]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

/// One recorded state change in a work item's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub at: DateTime<Utc>,
    #[serde(default)]
    pub from_state: Option<String>,
    pub to_state: String,
}

/// A unit of delivered work, normalized by the tracker client.
///
/// Supplied wholesale per calculation call and never mutated by the engine.
/// `history` timestamps are expected to be non-decreasing in array order,
/// but consumers must not rely on that for malformed input (durations
/// derived from out-of-order transitions are clipped to zero).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: String,
    #[serde(default)]
    pub points: Option<Points>,
    pub state: String,
    pub category: StateCategory,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub history: Vec<Transition>,
}

impl WorkItem {
    /// Case-insensitive tag membership test.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// True for items classified as production incidents.
    #[must_use]
    pub fn is_incident(&self) -> bool {
        self.has_tag("incident")
    }

    /// True for changes that count against the change-failure rate
    /// (incidents and rollbacks).
    #[must_use]
    pub fn is_failure_change(&self) -> bool {
        self.has_tag("incident") || self.has_tag("rollback")
    }

    /// True when the item's coarse category is `completed`.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.category == StateCategory::Completed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

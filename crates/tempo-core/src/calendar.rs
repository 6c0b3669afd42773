//! Business-calendar clock: elapsed time counted only inside configured
//! work days and work hours.
//!
//! # Overview
//!
//! Every duration-based metric in the engine runs through
//! [`BusinessCalendar::business_hours`]. The walk is day-by-day: each work
//! day contributes the overlap between its `[start_hour, end_hour]` window
//! and the portion of `[start, end]` falling on that day, precise to
//! sub-hour fractions (minutes matter for same-day reviews).
//!
//! The canonical default calendar is Mon–Fri, 09:00–18:00. Unit conversion
//! to "business days" is a separate, fixed convention — 8 hours per day —
//! independent of the calendar's actual day length.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

/// Fixed hours-per-day convention for unit conversion.
pub const HOURS_PER_DAY: f64 = 8.0;

/// Error returned when a calendar configuration is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidCalendar {
    /// The work-day set is empty; every duration would be zero.
    #[error("work-day set is empty")]
    NoWorkDays,

    /// The daily window is inverted or zero-length.
    #[error("work window is inverted: starts at {start}:00, ends at {end}:00")]
    InvertedWindow { start: u32, end: u32 },

    /// The end hour runs past midnight.
    #[error("work-day end hour {0} is past midnight: maximum is 24")]
    EndPastMidnight(u32),
}

/// A configurable work-week/work-day model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessCalendar {
    work_days: Vec<Weekday>,
    start_hour: u32,
    end_hour: u32,
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self {
            work_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            start_hour: 9,
            end_hour: 18,
        }
    }
}

impl BusinessCalendar {
    /// Build a validated calendar.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCalendar`] when the work-day set is empty, the
    /// window is inverted or zero-length, or the end hour exceeds 24.
    pub fn new(
        work_days: Vec<Weekday>,
        start_hour: u32,
        end_hour: u32,
    ) -> Result<Self, InvalidCalendar> {
        if work_days.is_empty() {
            return Err(InvalidCalendar::NoWorkDays);
        }
        if end_hour > 24 {
            return Err(InvalidCalendar::EndPastMidnight(end_hour));
        }
        if start_hour >= end_hour {
            return Err(InvalidCalendar::InvertedWindow {
                start: start_hour,
                end: end_hour,
            });
        }

        Ok(Self {
            work_days,
            start_hour,
            end_hour,
        })
    }

    /// Hour the work day opens.
    #[must_use]
    pub const fn start_hour(&self) -> u32 {
        self.start_hour
    }

    /// Hour the work day closes.
    #[must_use]
    pub const fn end_hour(&self) -> u32 {
        self.end_hour
    }

    /// True when `day` is a configured work day.
    #[must_use]
    pub fn is_work_day(&self, day: Weekday) -> bool {
        self.work_days.contains(&day)
    }

    /// Elapsed business hours between two instants.
    ///
    /// Returns `0.0` when `end <= start`. Non-work days contribute zero;
    /// work days contribute the overlap of `[start, end]` with the daily
    /// window, in fractional hours.
    #[must_use]
    pub fn business_hours(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
        if end <= start {
            return 0.0;
        }

        let open = f64::from(self.start_hour);
        let close = f64::from(self.end_hour);

        let first = start.date_naive();
        let last = end.date_naive();

        let mut total = 0.0;
        let mut day = first;
        loop {
            if self.is_work_day(day.weekday()) {
                let from = if day == first { hour_of_day(start) } else { 0.0 };
                let until = if day == last { hour_of_day(end) } else { 24.0 };
                total += (until.min(close) - from.max(open)).max(0.0);
            }

            if day == last {
                break;
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        total
    }
}

/// Fractional hour-of-day of an instant (e.g. 16:45 → 16.75).
fn hour_of_day(at: DateTime<Utc>) -> f64 {
    let time = at.time();
    f64::from(time.hour())
        + f64::from(time.minute()) / 60.0
        + f64::from(time.second()) / 3600.0
}

/// Convert business hours to business days under the fixed 8 h/day
/// convention, rounded to one decimal.
#[must_use]
pub fn business_hours_to_days(hours: f64) -> f64 {
    (hours / HOURS_PER_DAY * 10.0).round() / 10.0
}

/// Render a business-hour quantity for humans: minutes under one hour,
/// one-decimal hours under a day, `"Nd Mh"` beyond.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_duration(hours: f64) -> String {
    let hours = hours.max(0.0);

    if hours < 1.0 {
        return format!("{}m", (hours * 60.0).round() as i64);
    }
    if hours < 24.0 {
        return format!("{hours:.1}h");
    }

    let whole = hours.round() as i64;
    format!("{}d {}h", whole / 24, whole % 24)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use anyhow::{Context, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::calendar::BusinessCalendar;

/// Configuration for the metrics engine, loaded from
/// `<root>/.tempo/config.toml`. A missing file means all defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub estimation: EstimationConfig,
}

/// Work-week model. Day names accept anything `chrono` can parse
/// ("mon", "Monday", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_work_days")]
    pub work_days: Vec<String>,
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            work_days: default_work_days(),
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
        }
    }
}

impl CalendarConfig {
    /// Build the validated [`BusinessCalendar`] this configuration names.
    ///
    /// # Errors
    ///
    /// Fails on unrecognized day names or an unusable window.
    pub fn build(&self) -> Result<BusinessCalendar> {
        let mut work_days = Vec::with_capacity(self.work_days.len());
        for name in &self.work_days {
            let day: Weekday = name
                .trim()
                .parse()
                .ok()
                .with_context(|| format!("unrecognized work day '{name}'"))?;
            if !work_days.contains(&day) {
                work_days.push(day);
            }
        }

        BusinessCalendar::new(work_days, self.start_hour, self.end_hour)
            .context("invalid business calendar")
    }
}

/// Statistical-summary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Confidence level percentage; one of 90, 95, 99.
    #[serde(default = "default_confidence_level")]
    pub confidence_level: u8,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            confidence_level: default_confidence_level(),
        }
    }
}

/// Estimation-analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationConfig {
    /// An item is a bottleneck when actual ≥ expected × this multiplier.
    #[serde(default = "default_bottleneck_multiplier")]
    pub bottleneck_multiplier: f64,
    /// Expected business hours per story point when no historical baseline
    /// is available.
    #[serde(default = "default_hours_per_point")]
    pub hours_per_point: f64,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            bottleneck_multiplier: default_bottleneck_multiplier(),
            hours_per_point: default_hours_per_point(),
        }
    }
}

/// Load configuration from `<root>/.tempo/config.toml`.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed. A missing file
/// yields the default configuration.
pub fn load_config(project_root: &Path) -> Result<AnalyticsConfig> {
    let path = project_root.join(".tempo/config.toml");
    if !path.exists() {
        return Ok(AnalyticsConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<AnalyticsConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn default_work_days() -> Vec<String> {
    ["mon", "tue", "wed", "thu", "fri"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

const fn default_start_hour() -> u32 {
    9
}

const fn default_end_hour() -> u32 {
    18
}

const fn default_confidence_level() -> u8 {
    95
}

const fn default_bottleneck_multiplier() -> f64 {
    1.5
}

const fn default_hours_per_point() -> f64 {
    8.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

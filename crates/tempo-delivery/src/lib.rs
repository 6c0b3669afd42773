#![forbid(unsafe_code)]
//! tempo-delivery library.
//!
//! The calculation core: lifecycle milestones → business-calendar durations
//! → sample statistics → rated, trended delivery metrics. Every entry point
//! is a pure function over immutable inputs; concurrent calls over separate
//! snapshots need no coordination.
//!
//! # Conventions
//!
//! - **Errors**: `anyhow::Result` with `bail!`/context at caller-contract
//!   boundaries; data-quality problems degrade instead of raising.
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod engine;
pub mod estimation;
pub mod lifecycle;
pub mod provider;
pub mod review;
pub mod stats;

pub use engine::{DeliveryMetrics, MetricValue, compute_delivery_metrics};
pub use estimation::{EstimationAnalysis, compute_estimation_analysis};
pub use review::{CodeReviewAnalysis, compute_code_review_analysis};
pub use stats::{ConfidenceLevel, StatisticalSummary, summarize};

pub fn init() {
    tracing::info!("tempo-delivery initialized");
}

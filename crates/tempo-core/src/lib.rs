#![forbid(unsafe_code)]
//! tempo-core library.
//!
//! Data model, business-calendar clock, and configuration shared by the
//! delivery-metrics engine. Pure and synchronous: no I/O outside
//! [`config::load_config`], no shared mutable state.
//!
//! # Conventions
//!
//! - **Errors**: small `thiserror` types beside the types they guard;
//!   `anyhow::Result` at config-loading boundaries.
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod calendar;
pub mod config;
pub mod error;
pub mod model;

pub fn init() {
    tracing::info!("tempo-core initialized");
}

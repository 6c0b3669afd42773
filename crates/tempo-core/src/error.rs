//! Error surface of the core crate.
//!
//! Typed errors live beside the types they guard; this module re-exports
//! them for a single import path. All of these indicate caller-contract
//! violations — data-quality problems never surface as errors anywhere in
//! the workspace.

pub use crate::calendar::InvalidCalendar;
pub use crate::model::item::{InvalidPoints, ParseEnumError};

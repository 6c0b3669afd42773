//! Work-item data model: items, transitions, and bounding windows.
//!
//! Records arrive already normalized by the tracker client (see the crate
//! docs); nothing here performs I/O or mutation.

pub mod cycle;
pub mod item;

pub use cycle::{Cycle, ReportingWindow};
pub use item::{Points, StateCategory, Transition, WorkItem};

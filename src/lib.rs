//! Motile: a headless 2-D particle-life simulation.
//!
//! The engine lives in `motile_core`; this crate re-exports it under
//! [`model`] and adds the batch [`runner`] used by the `motile` binary.

pub mod model;
pub mod runner;

pub use model::{AppConfig, Simulation};
pub use runner::{HeadlessRunner, RunSummary, MAX_DELTA_TIME};

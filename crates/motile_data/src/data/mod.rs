//! Core data structures for the Motile simulation.

pub mod ability;
pub mod behavior;
pub mod event;
pub mod particle;
pub mod timed;

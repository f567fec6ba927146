//! # Motile Core
//!
//! The deterministic engine behind Motile, a 2-D particle-life simulation.
//!
//! This crate contains:
//! - Newtonian physics with pairwise gravity, damping and elastic collisions
//! - Vision queries and the per-tick ability decision
//! - Abilities (eating, chase, flee, splitting, reproduction, phasing, bursts)
//! - Energy bookkeeping coupled to mass and radius
//! - Deferred lifecycle queues for births and removals
//!
//! ## Architecture
//!
//! Particles are stored as components in a [`hecs`] world indexed by id.
//! Each tick takes flat snapshots, runs a behavior pass in id order, then a
//! physics pass, then applies the queued births and removals. Two seeded
//! ChaCha streams drive population and ability randomness, so a seed and a
//! `dt` sequence always reproduce the same run.
//!
//! ## Example
//!
//! ```
//! use motile_core::{AppConfig, Simulation};
//!
//! let mut config = AppConfig::default();
//! config.world.seed = Some(7);
//! config.world.initial_population = 20;
//!
//! let mut sim = Simulation::new(config).unwrap();
//! for _ in 0..10 {
//!     sim.update(1.0 / 60.0);
//! }
//! assert_eq!(sim.tick(), 10);
//! ```

/// Collision detection (pairwise and grid) and elastic resolution
pub mod collision;
/// Configuration management for simulation parameters
pub mod config;
/// Deferred births and removals, particle creation and inheritance
pub mod lifecycle;
/// Runtime counters and logging setup
pub mod metrics;
/// Lifecycle notification hooks
pub mod observer;
/// Seeded random streams
pub mod rng;
/// The step orchestrator
pub mod simulation;
/// Flat per-tick particle views
pub mod snapshot;
/// Uniform grid for proximity queries
pub mod spatial_hash;
/// ECS-backed particle storage
pub mod store;
/// Per-tick systems (physics, vision, decision, abilities, energy)
pub mod systems;

pub use config::AppConfig;
pub use metrics::{init_logging, Metrics, SimulationStats};
pub use motile_data::{
    AbilityKind, AbilityTable, Behavior, BehaviorState, Body, LiveEvent, Particle, ParticleId,
    ParticleType, Position, RemovalCause, Velocity,
};
pub use observer::{LifecycleObserver, NullObserver};
pub use simulation::Simulation;

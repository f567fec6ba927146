//! Plain data shared by the Motile engine and its collaborators.
//!
//! Everything in this crate is inert state: components stored per particle,
//! the ability table, timed states and the lifecycle events emitted by a tick.
//! The rules that mutate these types live in `motile_core`.

pub mod data;

pub use data::ability::{AbilityKind, AbilitySlot, AbilityTable, ALL_ABILITIES};
pub use data::behavior::{Behavior, BehaviorState, ConversionThresholds, ParticleType};
pub use data::event::{LiveEvent, RemovalCause};
pub use data::particle::{Appearance, Body, Identity, Particle, ParticleId, Position, Velocity};
pub use data::timed::TimedState;

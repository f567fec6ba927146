use motile_data::{Particle, ParticleId, Position, RemovalCause};

/// Receives lifecycle notifications at the end of each tick.
///
/// Called after the store has been updated, once per removal and then once
/// per birth, in the order they were applied. A renderer would use these to
/// spawn death and birth effects.
pub trait LifecycleObserver: Send {
    /// `particle` holds the last state before removal.
    fn on_particle_destroyed(&mut self, particle: &Particle, cause: RemovalCause);

    /// `parent` is the parent's id and position at the moment of birth.
    fn on_particle_born(&mut self, particle: &Particle, parent: Option<(ParticleId, Position)>);
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl LifecycleObserver for NullObserver {
    fn on_particle_destroyed(&mut self, _particle: &Particle, _cause: RemovalCause) {}
    fn on_particle_born(&mut self, _particle: &Particle, _parent: Option<(ParticleId, Position)>) {}
}

//! ECS-backed particle storage.
//!
//! Components live in a [`hecs::World`]; a `BTreeMap` from [`ParticleId`] to
//! entity handle gives id-ordered iteration, which every pass relies on for
//! determinism.

use crate::snapshot::{ParticleSnapshot, PhysicsBody};
use motile_data::{Appearance, Behavior, Body, Identity, Particle, ParticleId, Position, Velocity};
use std::collections::{BTreeMap, HashSet};

/// Monotonic id source shared by everything that creates particles.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> ParticleId {
        let id = ParticleId(self.next);
        self.next += 1;
        id
    }
}

/// Mutable view of one behavior particle's components.
pub struct BehaviorParts<'a> {
    pub position: &'a mut Position,
    pub velocity: &'a mut Velocity,
    pub body: &'a mut Body,
    pub appearance: Appearance,
    pub behavior: &'a mut Behavior,
}

#[derive(Default)]
pub struct ParticleStore {
    world: hecs::World,
    index: BTreeMap<ParticleId, hecs::Entity>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a particle, replacing any existing particle with the same id.
    pub fn spawn(&mut self, particle: Particle) -> ParticleId {
        let Particle {
            identity,
            position,
            velocity,
            body,
            appearance,
            behavior,
        } = particle;
        let id = identity.id;
        self.despawn(id);

        let entity = match behavior {
            Some(behavior) => self
                .world
                .spawn((identity, position, velocity, body, appearance, behavior)),
            None => self
                .world
                .spawn((identity, position, velocity, body, appearance)),
        };
        self.index.insert(id, entity);
        id
    }

    /// Removes a particle and returns its last state.
    pub fn despawn(&mut self, id: ParticleId) -> Option<Particle> {
        let particle = self.get(id)?;
        if let Some(entity) = self.index.remove(&id) {
            let _ = self.world.despawn(entity);
        }
        Some(particle)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn clear(&mut self) {
        self.world.clear();
        self.index.clear();
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> Vec<ParticleId> {
        self.index.keys().copied().collect()
    }

    /// Assembles an owned copy of one particle.
    pub fn get(&self, id: ParticleId) -> Option<Particle> {
        let entity = *self.index.get(&id)?;
        let mut query = self
            .world
            .query_one::<(
                &Identity,
                &Position,
                &Velocity,
                &Body,
                &Appearance,
                Option<&Behavior>,
            )>(entity)
            .ok()?;
        let (identity, position, velocity, body, appearance, behavior) = query.get()?;
        Some(Particle {
            identity: *identity,
            position: *position,
            velocity: *velocity,
            body: *body,
            appearance: *appearance,
            behavior: behavior.cloned(),
        })
    }

    /// Owned copies of every particle, sorted by id.
    pub fn particles(&self) -> Vec<Particle> {
        self.index.keys().filter_map(|&id| self.get(id)).collect()
    }

    pub fn behavior_parts_mut(&mut self, id: ParticleId) -> Option<BehaviorParts<'_>> {
        let entity = *self.index.get(&id)?;
        let (position, velocity, body, appearance, behavior) = self
            .world
            .query_one_mut::<(
                &mut Position,
                &mut Velocity,
                &mut Body,
                &Appearance,
                &mut Behavior,
            )>(entity)
            .ok()?;
        Some(BehaviorParts {
            position,
            velocity,
            body,
            appearance: *appearance,
            behavior,
        })
    }

    pub fn velocity_mut(&mut self, id: ParticleId) -> Option<(&mut Velocity, f64)> {
        let entity = *self.index.get(&id)?;
        let (velocity, body) = self
            .world
            .query_one_mut::<(&mut Velocity, &Body)>(entity)
            .ok()?;
        Some((velocity, body.mass))
    }

    /// Ids of particles carrying a behavior component, ascending.
    pub fn behavior_ids(&self) -> Vec<ParticleId> {
        let mut ids: Vec<ParticleId> = self
            .world
            .query::<(&Identity, &Behavior)>()
            .iter()
            .map(|(_, (identity, _))| identity.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Behavior particles whose energy has run out, ascending.
    pub fn starved_ids(&self) -> Vec<ParticleId> {
        let mut ids: Vec<ParticleId> = self
            .world
            .query::<(&Identity, &Behavior)>()
            .iter()
            .filter(|(_, (_, behavior))| !behavior.is_alive())
            .map(|(_, (identity, _))| identity.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Vision/decision snapshots of every particle, sorted by id.
    pub fn snapshots(&self) -> Vec<ParticleSnapshot> {
        self.particles()
            .iter()
            .map(ParticleSnapshot::from_particle)
            .collect()
    }

    /// Physics bodies sorted by id, skipping `excluded`.
    pub fn physics_bodies(
        &self,
        speed_boost: f64,
        excluded: &HashSet<ParticleId>,
    ) -> Vec<PhysicsBody> {
        self.index
            .keys()
            .filter(|id| !excluded.contains(id))
            .filter_map(|&id| self.get(id))
            .map(|p| PhysicsBody::from_particle(&p, speed_boost))
            .collect()
    }

    /// Writes integrated positions and velocities back.
    pub fn apply_physics(&mut self, bodies: &[PhysicsBody]) {
        for body in bodies {
            let Some(&entity) = self.index.get(&body.id) else {
                continue;
            };
            if let Ok((position, velocity)) = self
                .world
                .query_one_mut::<(&mut Position, &mut Velocity)>(entity)
            {
                position.x = body.x;
                position.y = body.y;
                velocity.vx = body.vx;
                velocity.vy = body.vy;
            }
        }
    }
}

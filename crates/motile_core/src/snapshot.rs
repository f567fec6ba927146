//! Flat per-tick views of the particle store.
//!
//! The store keeps components in the ECS; each pass copies what it needs into
//! one of these structs, sorted by id, works on the dense slice and writes
//! the results back.

use motile_data::{AbilityTable, Behavior, Body, Particle, ParticleId, ParticleType, Position};

/// What the physics pipeline needs from one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    pub id: ParticleId,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub mass: f64,
    pub radius: f64,
    /// Speed-boost multiplier × movement speed multiplier.
    pub speed_multiplier: f64,
    /// Phasing particles are invisible to collision detection.
    pub phasing: bool,
}

impl PhysicsBody {
    pub fn from_particle(particle: &Particle, speed_boost: f64) -> Self {
        let (speed_multiplier, phasing) = match &particle.behavior {
            Some(b) => {
                let boost = if b.speed_boost.is_active() {
                    speed_boost
                } else {
                    1.0
                };
                (boost * b.movement_speed_multiplier, b.phasing.is_active())
            }
            None => (1.0, false),
        };
        Self {
            id: particle.id(),
            x: particle.position.x,
            y: particle.position.y,
            vx: particle.velocity.vx,
            vy: particle.velocity.vy,
            mass: particle.body.mass,
            radius: particle.body.radius,
            speed_multiplier,
            phasing,
        }
    }
}

/// What the vision system and ability decisions read about other particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSnapshot {
    pub id: ParticleId,
    pub x: f64,
    pub y: f64,
    pub mass: f64,
    pub radius: f64,
    /// `None` for inert particles.
    pub particle_type: Option<ParticleType>,
    pub energy: f64,
    /// Read by eaters inheriting from their prey.
    pub abilities: AbilityTable,
    pub alive: bool,
    /// Removed earlier this tick; never visible again.
    pub consumed: bool,
    pub camouflaged: bool,
    pub phasing: bool,
    pub birthing: bool,
}

impl ParticleSnapshot {
    pub fn from_particle(particle: &Particle) -> Self {
        Self::from_parts(
            particle.id(),
            &particle.position,
            &particle.body,
            particle.behavior.as_ref(),
        )
    }

    /// Builds a snapshot from loose components, as the behavior pass holds them.
    pub fn from_parts(
        id: ParticleId,
        position: &Position,
        body: &Body,
        behavior: Option<&Behavior>,
    ) -> Self {
        Self {
            id,
            x: position.x,
            y: position.y,
            mass: body.mass,
            radius: body.radius,
            particle_type: behavior.map(|b| b.particle_type),
            energy: behavior.map_or(0.0, |b| b.energy),
            abilities: behavior.map(|b| b.abilities).unwrap_or_default(),
            alive: behavior.is_none_or(Behavior::is_alive),
            consumed: false,
            camouflaged: behavior.is_some_and(|b| b.camouflage.is_active()),
            phasing: behavior.is_some_and(|b| b.phasing.is_active()),
            birthing: behavior.is_some_and(|b| b.birthing.is_active()),
        }
    }

    /// Eligible to be seen at all.
    #[inline]
    pub fn is_present(&self) -> bool {
        self.alive && !self.consumed
    }

    #[inline]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }
}

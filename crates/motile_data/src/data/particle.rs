use super::behavior::Behavior;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulation-unique particle identifier.
///
/// Ids are handed out by a single monotonically increasing counter per
/// simulation, so ordering by id is ordering by creation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct ParticleId(pub u64);

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unique identification of a particle.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub id: ParticleId,
}

/// World position of a particle's center.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[inline]
    pub fn distance_sq(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn distance(&self, other: &Position) -> f64 {
        self.distance_sq(other).sqrt()
    }
}

/// Velocity of a particle in world units per second.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

/// Physical extent of a particle.
///
/// Mass and radius are coupled (`mass ∝ radius²`); use [`Body::set_mass`] for
/// every mass mutation so the radius follows.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Body {
    pub mass: f64,
    pub radius: f64,
}

impl Body {
    /// Builds a body whose mass is `density · radius²`.
    pub fn from_radius(radius: f64, density: f64) -> Self {
        Self {
            mass: density * radius * radius,
            radius,
        }
    }

    /// Replaces the mass and rescales the radius so `radius² / mass` is preserved.
    ///
    /// Non-positive or non-finite targets are ignored.
    pub fn set_mass(&mut self, mass: f64) {
        if !(mass.is_finite() && mass > 0.0) || self.mass <= 0.0 {
            return;
        }
        self.radius *= (mass / self.mass).sqrt();
        self.mass = mass;
    }

    /// Area-to-mass ratio; constant for the lifetime of a particle.
    #[inline]
    pub fn area_ratio(&self) -> f64 {
        self.radius * self.radius / self.mass
    }

    #[inline]
    pub fn contains(&self, center: &Position, x: f64, y: f64) -> bool {
        let dx = x - center.x;
        let dy = y - center.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

/// Display color. Opaque to the engine; owned by whoever renders particles.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appearance {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            r: 200,
            g: 200,
            b: 200,
        }
    }
}

/// A complete particle, as handed to and returned from the particle store.
///
/// Inside the store the fields live as separate components; a particle
/// without a [`Behavior`] is an inert physics body.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Particle {
    #[serde(flatten)]
    pub identity: Identity,
    pub position: Position,
    pub velocity: Velocity,
    pub body: Body,
    pub appearance: Appearance,
    pub behavior: Option<Behavior>,
}

impl Particle {
    /// An inert particle at rest.
    pub fn inert(id: ParticleId, position: Position, body: Body) -> Self {
        Self {
            identity: Identity { id },
            position,
            velocity: Velocity::default(),
            body,
            appearance: Appearance::default(),
            behavior: None,
        }
    }

    #[inline]
    pub fn id(&self) -> ParticleId {
        self.identity.id
    }

    /// Inert particles count as alive; behavior particles need positive energy.
    pub fn is_alive(&self) -> bool {
        self.behavior.as_ref().is_none_or(Behavior::is_alive)
    }
}

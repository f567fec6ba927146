use super::ability::AbilityTable;
use super::particle::ParticleId;
use super::timed::TimedState;
use serde::{Deserialize, Serialize};

/// Temperament of a behavior particle. Fixed at creation and inherited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ParticleType {
    Predator,
    Herbivore,
    #[default]
    Neutral,
    Social,
    Solitary,
}

impl ParticleType {
    pub const ALL: [ParticleType; 5] = [
        ParticleType::Predator,
        ParticleType::Herbivore,
        ParticleType::Neutral,
        ParticleType::Social,
        ParticleType::Solitary,
    ];

    pub fn chase_multiplier(self) -> f64 {
        match self {
            ParticleType::Predator => 1.4,
            ParticleType::Herbivore => 0.7,
            ParticleType::Solitary => 1.1,
            ParticleType::Neutral | ParticleType::Social => 1.0,
        }
    }

    pub fn flee_multiplier(self) -> f64 {
        match self {
            ParticleType::Herbivore => 1.4,
            ParticleType::Predator => 0.8,
            ParticleType::Social => 1.1,
            ParticleType::Neutral | ParticleType::Solitary => 1.0,
        }
    }

    pub fn vision_multiplier(self) -> f64 {
        match self {
            ParticleType::Predator => 1.3,
            ParticleType::Solitary => 1.2,
            ParticleType::Herbivore | ParticleType::Neutral | ParticleType::Social => 1.0,
        }
    }

    /// Base tint used when a particle of this type is created.
    pub fn tint(self) -> (u8, u8, u8) {
        match self {
            ParticleType::Predator => (220, 60, 60),
            ParticleType::Herbivore => (90, 200, 90),
            ParticleType::Neutral => (170, 170, 170),
            ParticleType::Social => (80, 170, 230),
            ParticleType::Solitary => (200, 140, 230),
        }
    }
}

/// What the particle was last doing. Set by the ability that last executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BehaviorState {
    #[default]
    Idle,
    Hunting,
    Fleeing,
    Reproducing,
    Phasing,
    Eating,
    Camouflaged,
    Splitting,
}

/// Per-particle energy/mass conversion thresholds, as energy fractions.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConversionThresholds {
    pub energy_to_mass: f64,
    pub mass_to_energy: f64,
    pub energy_abundance: f64,
    pub energy_conservation: f64,
}

impl Default for ConversionThresholds {
    fn default() -> Self {
        Self {
            energy_to_mass: 0.85,
            mass_to_energy: 0.2,
            energy_abundance: 0.7,
            energy_conservation: 0.3,
        }
    }
}

/// The optional behavior component.
///
/// Present only when the behavior layer is enabled; a particle without one is
/// a plain physics body.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Behavior {
    pub energy: f64,
    pub max_energy: f64,
    pub particle_type: ParticleType,
    pub generation: u32,
    pub abilities: AbilityTable,
    pub vision_range: f64,
    pub state: BehaviorState,
    pub phasing: TimedState,
    pub speed_boost: TimedState,
    pub camouflage: TimedState,
    pub birthing: TimedState,
    pub thresholds: ConversionThresholds,
    pub movement_speed_multiplier: f64,
    pub target_id: Option<ParticleId>,
}

impl Behavior {
    pub fn new(particle_type: ParticleType, abilities: AbilityTable, max_energy: f64) -> Self {
        Self {
            energy: max_energy,
            max_energy,
            particle_type,
            generation: 0,
            abilities,
            vision_range: 0.0,
            state: BehaviorState::Idle,
            phasing: TimedState::default(),
            speed_boost: TimedState::default(),
            camouflage: TimedState::default(),
            birthing: TimedState::default(),
            thresholds: ConversionThresholds::default(),
            movement_speed_multiplier: 1.0,
            target_id: None,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.energy > 0.0
    }

    /// `energy / max_energy`, zero when the capacity is degenerate.
    #[inline]
    pub fn energy_fraction(&self) -> f64 {
        if self.max_energy > 0.0 {
            (self.energy / self.max_energy).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Clamps energy back into `[0, max_energy]`.
    #[inline]
    pub fn clamp_energy(&mut self) {
        self.energy = self.energy.clamp(0.0, self.max_energy.max(0.0));
    }

    pub fn add_energy(&mut self, amount: f64) {
        self.energy += amount;
        self.clamp_energy();
    }

    /// Deducts `amount` if affordable; returns whether it was.
    pub fn spend_energy(&mut self, amount: f64) -> bool {
        if amount > self.energy {
            return false;
        }
        self.energy -= amount;
        self.clamp_energy();
        true
    }

    /// Advances every timed state and cooldown by `dt`.
    pub fn tick_timers(&mut self, dt: f64) {
        self.phasing.update(dt);
        self.speed_boost.update(dt);
        self.camouflage.update(dt);
        self.birthing.update(dt);
        self.abilities.tick_cooldowns(dt);
    }
}

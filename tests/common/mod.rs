pub mod macros;

use motile_lib::model::data::{
    AbilityKind, AbilityTable, Behavior, Body, Particle, ParticleId, ParticleType, Position,
    Velocity,
};
use motile_lib::model::AppConfig;
use motile_lib::Simulation;

/// Builds a simulation with no random population, gravity or ambient energy
/// flow, so scenarios only see the particles they add.
#[allow(dead_code)]
pub struct SimulationBuilder {
    config: AppConfig,
    particles: Vec<Particle>,
}

#[allow(dead_code)]
impl SimulationBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.initial_population = 0;
        config.world.seed = Some(42);
        config.world.metrics_log_interval = 0;
        config.physics.gravity_enabled = false;
        config.physics.damping_enabled = false;
        config.energy.ambient_gain_enabled = false;
        config.energy.passive_drain_rate = 0.0;
        Self {
            config,
            particles: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_particle(mut self, particle: Particle) -> Self {
        self.particles.push(particle);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Ids are assigned in insertion order starting at 1.
    pub fn build(self) -> (Simulation, Vec<ParticleId>) {
        let mut sim =
            Simulation::empty(self.config).expect("Failed to create simulation in test builder");
        let ids = self
            .particles
            .into_iter()
            .map(|p| sim.insert_particle(p))
            .collect();
        (sim, ids)
    }
}

#[allow(dead_code)]
pub struct ParticleBuilder {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    radius: f64,
    mass: Option<f64>,
    energy_fraction: f64,
    particle_type: ParticleType,
    abilities: Vec<AbilityKind>,
    inert: bool,
}

#[allow(dead_code)]
impl ParticleBuilder {
    pub fn new() -> Self {
        Self {
            x: 100.0,
            y: 100.0,
            vx: 0.0,
            vy: 0.0,
            radius: 8.0,
            mass: None,
            energy_fraction: 0.6,
            particle_type: ParticleType::Neutral,
            abilities: Vec::new(),
            inert: false,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn velocity(mut self, vx: f64, vy: f64) -> Self {
        self.vx = vx;
        self.vy = vy;
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Overrides the density-derived mass.
    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn energy_fraction(mut self, fraction: f64) -> Self {
        self.energy_fraction = fraction;
        self
    }

    pub fn particle_type(mut self, particle_type: ParticleType) -> Self {
        self.particle_type = particle_type;
        self
    }

    pub fn ability(mut self, kind: AbilityKind) -> Self {
        self.abilities.push(kind);
        self
    }

    /// No behavior component.
    pub fn inert(mut self) -> Self {
        self.inert = true;
        self
    }

    pub fn build(self, config: &AppConfig) -> Particle {
        let body = match self.mass {
            Some(mass) => Body {
                mass,
                radius: self.radius,
            },
            None => Body::from_radius(self.radius, config.world.density),
        };
        let position = Position {
            x: self.x,
            y: self.y,
        };
        let mut particle = Particle::inert(ParticleId(0), position, body);
        particle.velocity = Velocity {
            vx: self.vx,
            vy: self.vy,
        };
        if !self.inert {
            let max_energy = config.energy.max_energy_for(body.mass);
            let mut behavior = Behavior::new(
                self.particle_type,
                AbilityTable::from_kinds(&self.abilities),
                max_energy,
            );
            behavior.energy = max_energy * self.energy_fraction;
            particle.behavior = Some(behavior);
        }
        particle
    }
}

use crate::config::{AppConfig, EnergyConfig, ThresholdRange};
use crate::rng::SimRng;
use motile_data::{
    AbilityKind, AbilityTable, Appearance, Behavior, Body, ConversionThresholds, Identity,
    LiveEvent, Particle, ParticleId, ParticleType, Position, RemovalCause, Velocity, ALL_ABILITIES,
};
use std::collections::BTreeMap;

/// An offspring waiting to be appended at the end of the tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingBirth {
    pub parent_id: ParticleId,
    pub parent_position: Position,
    pub position: Position,
    pub velocity: Velocity,
    pub body: Body,
    pub appearance: Appearance,
    pub behavior: Behavior,
}

/// Removals and births deferred until the end of a tick.
#[derive(Debug, Default)]
pub struct LifecycleQueue {
    removals: BTreeMap<ParticleId, RemovalCause>,
    births: Vec<PendingBirth>,
}

impl LifecycleQueue {
    /// Queues a removal. The first cause recorded for an id wins.
    pub fn remove(&mut self, id: ParticleId, cause: RemovalCause) {
        self.removals.entry(id).or_insert(cause);
    }

    pub fn birth(&mut self, birth: PendingBirth) {
        self.births.push(birth);
    }

    pub fn is_removed(&self, id: ParticleId) -> bool {
        self.removals.contains_key(&id)
    }

    pub fn removal_count(&self) -> usize {
        self.removals.len()
    }

    pub fn birth_count(&self) -> usize {
        self.births.len()
    }

    pub fn removed_ids(&self) -> impl Iterator<Item = ParticleId> + '_ {
        self.removals.keys().copied()
    }

    /// Empties both queues: removals in id order, births in queue order.
    pub fn drain(&mut self) -> (Vec<(ParticleId, RemovalCause)>, Vec<PendingBirth>) {
        let removals = std::mem::take(&mut self.removals).into_iter().collect();
        let births = std::mem::take(&mut self.births);
        (removals, births)
    }

    pub fn clear(&mut self) {
        self.removals.clear();
        self.births.clear();
    }
}

/// Builds a particle at `(x, y)` with a random radius and, when the behavior
/// layer is on, a freshly rolled behavior component.
pub fn create_particle_with_rng(
    id: ParticleId,
    x: f64,
    y: f64,
    config: &AppConfig,
    rng: &mut SimRng,
) -> Particle {
    let world = &config.world;
    let radius = rng.range_f64(world.min_radius, world.max_radius);
    let body = Body::from_radius(radius, world.density);
    let heading = rng.angle();
    let speed = rng.range_f64(0.0, world.initial_speed);
    let velocity = Velocity {
        vx: heading.cos() * speed,
        vy: heading.sin() * speed,
    };

    let behavior = config
        .behavior
        .enabled
        .then(|| roll_behavior(body.mass, config, rng));
    let appearance = behavior
        .as_ref()
        .map(|b| tint(b.particle_type))
        .unwrap_or_default();

    Particle {
        identity: Identity { id },
        position: Position { x, y },
        velocity,
        body,
        appearance,
        behavior,
    }
}

/// Random temperament, independently rolled abilities, partial energy and
/// fresh thresholds.
pub fn roll_behavior(mass: f64, config: &AppConfig, rng: &mut SimRng) -> Behavior {
    let type_idx = rng.range_i64(0, ParticleType::ALL.len() as i64) as usize;
    let particle_type = ParticleType::ALL[type_idx.min(ParticleType::ALL.len() - 1)];

    let mut abilities = AbilityTable::default();
    for kind in ALL_ABILITIES {
        if rng.chance(config.behavior.ability_chances.chance(kind)) {
            abilities.grant(kind);
        }
    }

    let max_energy = config.energy.max_energy_for(mass);
    let mut behavior = Behavior::new(particle_type, abilities, max_energy);
    let fraction = rng.range_f64(
        config.energy.initial_energy_fraction_min,
        config.energy.initial_energy_fraction_max,
    );
    behavior.energy = max_energy * fraction;
    behavior.clamp_energy();
    behavior.thresholds = fresh_thresholds(&config.energy, rng);
    behavior
}

/// Uniform draws inside each configured threshold range.
pub fn fresh_thresholds(config: &EnergyConfig, rng: &mut SimRng) -> ConversionThresholds {
    let draw = |rng: &mut SimRng, range: &ThresholdRange| rng.range_f64(range.min, range.max);
    ConversionThresholds {
        energy_to_mass: draw(rng, &config.energy_to_mass_range),
        mass_to_energy: draw(rng, &config.mass_to_energy_range),
        energy_abundance: draw(rng, &config.energy_abundance_range),
        energy_conservation: draw(rng, &config.energy_conservation_range),
    }
}

/// Parent value ± `threshold_variance`, clamped to the global range.
pub fn inherit_thresholds(
    parent: &ConversionThresholds,
    config: &EnergyConfig,
    rng: &mut SimRng,
) -> ConversionThresholds {
    let spread = config.threshold_variance;
    ConversionThresholds {
        energy_to_mass: config
            .energy_to_mass_range
            .clamp(parent.energy_to_mass + rng.variance(spread)),
        mass_to_energy: config
            .mass_to_energy_range
            .clamp(parent.mass_to_energy + rng.variance(spread)),
        energy_abundance: config
            .energy_abundance_range
            .clamp(parent.energy_abundance + rng.variance(spread)),
        energy_conservation: config
            .energy_conservation_range
            .clamp(parent.energy_conservation + rng.variance(spread)),
    }
}

/// Each held ability passes on independently with probability `chance`.
/// Cooldowns never carry over.
pub fn inherit_abilities(parent: &AbilityTable, chance: f64, rng: &mut SimRng) -> AbilityTable {
    let mut child = AbilityTable::default();
    for kind in parent.held() {
        if rng.chance(chance) {
            child.grant(kind);
        }
    }
    child
}

/// Same held set, cooldowns cleared.
pub fn clone_abilities(parent: &AbilityTable) -> AbilityTable {
    let held: Vec<AbilityKind> = parent.held().collect();
    AbilityTable::from_kinds(&held)
}

/// Behavior for an offspring of `parent`, one generation down.
pub fn offspring_behavior(
    parent: &Behavior,
    abilities: AbilityTable,
    max_energy: f64,
    energy: f64,
    config: &EnergyConfig,
    rng: &mut SimRng,
) -> Behavior {
    let mut child = Behavior::new(parent.particle_type, abilities, max_energy);
    child.generation = parent.generation.saturating_add(1);
    child.energy = energy;
    child.clamp_energy();
    child.thresholds = inherit_thresholds(&parent.thresholds, config, rng);
    child
}

pub fn tint(particle_type: ParticleType) -> Appearance {
    let (r, g, b) = particle_type.tint();
    Appearance { r, g, b }
}

pub fn death_event(particle: &Particle, cause: RemovalCause, tick: u64) -> LiveEvent {
    LiveEvent::Death {
        id: particle.id(),
        cause,
        tick,
        x: particle.position.x,
        y: particle.position.y,
        radius: particle.body.radius,
    }
}

pub fn birth_event(
    particle: &Particle,
    parent: Option<(ParticleId, Position)>,
    tick: u64,
) -> LiveEvent {
    LiveEvent::Birth {
        id: particle.id(),
        parent_id: parent.map(|(id, _)| id),
        generation: particle.behavior.as_ref().map_or(0, |b| b.generation),
        tick,
        x: particle.position.x,
        y: particle.position.y,
        parent_x: parent.map(|(_, p)| p.x),
        parent_y: parent.map(|(_, p)| p.y),
    }
}

impl PendingBirth {
    pub fn into_particle(self, id: ParticleId) -> Particle {
        Particle {
            identity: Identity { id },
            position: self.position,
            velocity: self.velocity,
            body: self.body,
            appearance: self.appearance,
            behavior: Some(self.behavior),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_particles_respect_radius_range() {
        let config = AppConfig::default();
        let mut rng = SimRng::seeded(7);
        for i in 0..50 {
            let p = create_particle_with_rng(ParticleId(i), 10.0, 10.0, &config, &mut rng);
            assert!(p.body.radius >= config.world.min_radius);
            assert!(p.body.radius <= config.world.max_radius);
            let expected = config.world.density * p.body.radius * p.body.radius;
            assert!((p.body.mass - expected).abs() < 1e-9);
            let b = p.behavior.expect("behavior layer on by default");
            assert!(b.energy > 0.0 && b.energy <= b.max_energy);
        }
    }

    #[test]
    fn disabled_behavior_layer_creates_inert_particles() {
        let mut config = AppConfig::default();
        config.behavior.enabled = false;
        let mut rng = SimRng::seeded(1);
        let p = create_particle_with_rng(ParticleId(1), 0.0, 0.0, &config, &mut rng);
        assert!(p.behavior.is_none());
        assert!(p.is_alive());
    }

    #[test]
    fn inherited_thresholds_stay_in_range() {
        let config = EnergyConfig {
            threshold_variance: 0.5,
            ..Default::default()
        };
        let parent = ConversionThresholds::default();
        let mut rng = SimRng::seeded(3);
        for _ in 0..200 {
            let child = inherit_thresholds(&parent, &config, &mut rng);
            assert!(child.energy_to_mass >= config.energy_to_mass_range.min);
            assert!(child.energy_to_mass <= config.energy_to_mass_range.max);
            assert!(child.energy_conservation >= config.energy_conservation_range.min);
            assert!(child.energy_conservation <= config.energy_conservation_range.max);
        }
    }

    #[test]
    fn ability_inheritance_extremes() {
        let parent = AbilityTable::from_kinds(&[AbilityKind::Eating, AbilityKind::Chase]);
        let mut rng = SimRng::seeded(9);
        assert_eq!(inherit_abilities(&parent, 1.0, &mut rng), parent);
        assert!(inherit_abilities(&parent, 0.0, &mut rng).is_empty());
    }

    #[test]
    fn cloned_abilities_drop_cooldowns() {
        let mut parent = AbilityTable::from_kinds(&[AbilityKind::Splitting]);
        parent.trigger_cooldown(AbilityKind::Splitting, 5.0);
        let child = clone_abilities(&parent);
        assert!(child.is_ready(AbilityKind::Splitting));
    }

    #[test]
    fn first_removal_cause_wins() {
        let mut queue = LifecycleQueue::default();
        queue.remove(ParticleId(2), RemovalCause::Consumed { by: ParticleId(1) });
        queue.remove(ParticleId(2), RemovalCause::Starvation);
        let (removals, births) = queue.drain();
        assert_eq!(
            removals,
            vec![(ParticleId(2), RemovalCause::Consumed { by: ParticleId(1) })]
        );
        assert!(births.is_empty());
        assert_eq!(queue.removal_count(), 0);
    }
}

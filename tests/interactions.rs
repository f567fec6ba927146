mod common;

use common::{ParticleBuilder, SimulationBuilder};
use motile_lib::model::data::{AbilityKind, LiveEvent, RemovalCause};

const DT: f64 = 1.0 / 60.0;

#[test]
fn test_larger_particle_eats_touching_prey() {
    let builder = SimulationBuilder::new();
    let eater = ParticleBuilder::new()
        .at(600.0, 360.0)
        .radius(10.0)
        .ability(AbilityKind::Eating)
        .build(builder.config());
    let prey = ParticleBuilder::new()
        .at(616.0, 360.0)
        .radius(6.0)
        .mass(4.0)
        .build(builder.config());
    let (mut sim, ids) = builder.with_particle(eater).with_particle(prey).build();

    let events = sim.update(DT);

    assert_population!(sim, 1);
    assert_particle_gone!(sim, ids[1]);
    let eater = sim.particle(ids[0]).unwrap();
    assert_close!(eater.body.mass, 13.4, 1e-9);
    assert_close!(eater.body.area_ratio(), 10.0, 1e-9);
    assert!(events.iter().any(|e| matches!(
        e,
        LiveEvent::Death { id, cause: RemovalCause::Consumed { by }, .. }
            if *id == ids[1] && *by == ids[0]
    )));
}

#[test]
fn test_equal_sizes_do_not_eat() {
    let builder = SimulationBuilder::new();
    let a = ParticleBuilder::new()
        .at(600.0, 360.0)
        .radius(8.0)
        .ability(AbilityKind::Eating)
        .build(builder.config());
    let b = ParticleBuilder::new()
        .at(616.0, 360.0)
        .radius(8.0)
        .ability(AbilityKind::Eating)
        .build(builder.config());
    let (mut sim, _) = builder.with_particle(a).with_particle(b).build();
    for _ in 0..10 {
        sim.update(DT);
    }
    assert_population!(sim, 2);
}

#[test]
fn test_heavy_particle_splits_in_two() {
    let builder = SimulationBuilder::new().with_config(|c| c.behavior.max_mass = 15.0);
    let parent = ParticleBuilder::new()
        .at(600.0, 360.0)
        .radius(10.0)
        .energy_fraction(0.6)
        .ability(AbilityKind::Splitting)
        .build(builder.config());
    let (mut sim, ids) = builder.with_particle(parent).build();

    let events = sim.update(DT);

    assert_population!(sim, 2);
    let particles = sim.particles();
    for p in &particles {
        assert_close!(p.body.mass, 5.0, 1e-9);
    }
    let child = &particles[1];
    let child_behavior = child.behavior.as_ref().unwrap();
    assert_eq!(child_behavior.generation, 1);
    assert!(child_behavior.abilities.has(AbilityKind::Splitting));
    assert!(child_behavior.birthing.is_active());

    let gap = particles[0].position.distance(&child.position);
    assert!(gap >= particles[0].body.radius + child.body.radius);

    assert!(events.iter().any(|e| matches!(
        e,
        LiveEvent::Birth { id, parent_id: Some(parent), generation: 1, .. }
            if *id == child.id() && *parent == ids[0]
    )));
}

#[test]
fn test_starving_particle_dies() {
    let builder = SimulationBuilder::new().with_config(|c| {
        c.energy.passive_drain_rate = 1000.0;
        c.energy.conversion_rate = 0.0;
    });
    let doomed = ParticleBuilder::new()
        .at(300.0, 300.0)
        .radius(10.0)
        .build(builder.config());
    let rock = ParticleBuilder::new()
        .at(500.0, 300.0)
        .radius(10.0)
        .inert()
        .build(builder.config());
    let (mut sim, ids) = builder.with_particle(doomed).with_particle(rock).build();

    let events = sim.update(DT);

    assert_particle_gone!(sim, ids[0]);
    assert!(sim.particle(ids[1]).is_some(), "Inert particles never starve");
    assert!(events.iter().any(|e| matches!(
        e,
        LiveEvent::Death { id, cause: RemovalCause::Starvation, .. } if *id == ids[0]
    )));
    assert_eq!(sim.stats().deaths, 1);
}

#[test]
fn test_hungry_predator_closes_distance() {
    let builder = SimulationBuilder::new();
    let hunter = ParticleBuilder::new()
        .at(400.0, 360.0)
        .radius(10.0)
        .energy_fraction(0.3)
        .ability(AbilityKind::Chase)
        .build(builder.config());
    let prey = ParticleBuilder::new()
        .at(450.0, 360.0)
        .radius(5.0)
        .inert()
        .build(builder.config());
    let (mut sim, ids) = builder.with_particle(hunter).with_particle(prey).build();

    sim.update(DT);

    let hunter = sim.particle(ids[0]).unwrap();
    assert!(hunter.velocity.vx > 0.0, "Chase should accelerate toward prey");
    assert_close!(hunter.velocity.vy, 0.0, 1e-9);
}

#[test]
fn test_threatened_particle_flees() {
    let builder = SimulationBuilder::new();
    let prey = ParticleBuilder::new()
        .at(400.0, 360.0)
        .radius(8.0)
        .ability(AbilityKind::Flee)
        .build(builder.config());
    let threat = ParticleBuilder::new()
        .at(419.0, 360.0)
        .radius(12.0)
        .inert()
        .build(builder.config());
    let (mut sim, ids) = builder.with_particle(prey).with_particle(threat).build();

    sim.update(DT);

    let prey = sim.particle(ids[0]).unwrap();
    assert!(prey.velocity.vx < 0.0, "Flee should push away from the threat");
}

#[test]
fn test_energetic_particle_reproduces() {
    let builder = SimulationBuilder::new().with_config(|c| c.energy.conversion_rate = 0.0);
    let parent = ParticleBuilder::new()
        .at(600.0, 360.0)
        .radius(10.0)
        .energy_fraction(0.84)
        .ability(AbilityKind::Reproduction)
        .build(builder.config());
    let (mut sim, ids) = builder.with_particle(parent).build();

    sim.update(DT);

    assert_population!(sim, 2);
    let total: f64 = sim.particles().iter().map(|p| p.body.mass).sum();
    assert_close!(total, 10.0, 1e-9);
    let parent = sim.particle(ids[0]).unwrap();
    let child = sim.particles().into_iter().find(|p| p.id() != ids[0]).unwrap();
    assert!(child.body.mass <= parent.body.mass);
}

#[test]
fn test_reproduction_hands_energy_to_offspring() {
    let builder = SimulationBuilder::new().with_config(|c| {
        c.energy.conversion_rate = 0.0;
        c.behavior.reproduction_mass_fraction_min = 0.3;
        c.behavior.reproduction_mass_fraction_max = 0.3;
        c.behavior.reproduction_energy_fraction_min = 0.3;
        c.behavior.reproduction_energy_fraction_max = 0.3;
    });
    let parent = ParticleBuilder::new()
        .at(600.0, 360.0)
        .radius(10.0)
        .energy_fraction(0.95)
        .ability(AbilityKind::Reproduction)
        .build(builder.config());
    let (mut sim, ids) = builder.with_particle(parent).build();

    sim.update(DT);

    assert_population!(sim, 2);
    let parent = sim.particle(ids[0]).unwrap();
    let child = sim.particles().into_iter().find(|p| p.id() != ids[0]).unwrap();
    let parent_energy = parent.behavior.as_ref().unwrap().energy;
    let child_energy = child.behavior.as_ref().unwrap().energy;
    assert_close!(parent_energy, 66.5, 1e-9);
    assert_close!(child_energy, 28.5, 1e-9);
    assert_close!(parent_energy + child_energy, 95.0, 1e-9);
}

#[test]
fn test_behavior_disabled_is_pure_physics() {
    let builder = SimulationBuilder::new().with_config(|c| c.behavior.enabled = false);
    let eater = ParticleBuilder::new()
        .at(600.0, 360.0)
        .radius(10.0)
        .ability(AbilityKind::Eating)
        .build(builder.config());
    let prey = ParticleBuilder::new()
        .at(616.0, 360.0)
        .radius(4.0)
        .build(builder.config());
    let (mut sim, _) = builder.with_particle(eater).with_particle(prey).build();
    for _ in 0..5 {
        sim.update(DT);
    }
    assert_population!(sim, 2);
}

#[test]
fn test_phasing_particle_is_not_separated() {
    let builder = SimulationBuilder::new();
    let prey = ParticleBuilder::new()
        .at(400.0, 360.0)
        .radius(8.0)
        .ability(AbilityKind::Phasing)
        .build(builder.config());
    let threat = ParticleBuilder::new()
        .at(419.0, 360.0)
        .radius(12.0)
        .inert()
        .build(builder.config());
    let (mut sim, ids) = builder.with_particle(prey).with_particle(threat).build();

    sim.update(DT);

    let prey = sim.particle(ids[0]).unwrap();
    let threat = sim.particle(ids[1]).unwrap();
    assert!(prey.behavior.as_ref().unwrap().phasing.is_active());
    assert_close!(prey.position.x, 400.0, 1e-9);
    assert_close!(threat.position.x, 419.0, 1e-9);
}

#[test]
fn test_overlapping_pair_without_phasing_is_separated() {
    let builder = SimulationBuilder::new();
    let prey = ParticleBuilder::new()
        .at(400.0, 360.0)
        .radius(8.0)
        .build(builder.config());
    let threat = ParticleBuilder::new()
        .at(419.0, 360.0)
        .radius(12.0)
        .inert()
        .build(builder.config());
    let (mut sim, ids) = builder.with_particle(prey).with_particle(threat).build();

    sim.update(DT);

    let prey = sim.particle(ids[0]).unwrap();
    let threat = sim.particle(ids[1]).unwrap();
    assert!(threat.position.x - prey.position.x >= 20.0 - 1e-9);
}

#[test]
fn test_speed_burst_raises_velocity_cap() {
    let builder = SimulationBuilder::new().with_config(|c| c.energy.conversion_rate = 0.0);
    let chaser = ParticleBuilder::new()
        .at(400.0, 360.0)
        .velocity(1000.0, 0.0)
        .radius(10.0)
        .energy_fraction(0.3)
        .ability(AbilityKind::Chase)
        .ability(AbilityKind::SpeedBurst)
        .build(builder.config());
    let prey = ParticleBuilder::new()
        .at(430.0, 360.0)
        .radius(4.0)
        .inert()
        .build(builder.config());
    let config = builder.config().clone();
    let (mut sim, ids) = builder.with_particle(chaser).with_particle(prey).build();

    sim.update(DT);

    let chaser = sim.particle(ids[0]).unwrap();
    let behavior = chaser.behavior.as_ref().unwrap();
    assert!(behavior.speed_boost.is_active());
    let cap = config.physics.base_max_velocity
        * config.physics.velocity_headroom
        * config.behavior.speed_burst_multiplier
        * behavior.movement_speed_multiplier;
    let speed = chaser.velocity.vx.hypot(chaser.velocity.vy);
    assert_close!(speed, cap, 1e-6);
    let unboosted = config.physics.base_max_velocity
        * config.physics.velocity_headroom
        * behavior.movement_speed_multiplier;
    assert!(speed > unboosted);
}

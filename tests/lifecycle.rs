mod common;

use common::{ParticleBuilder, SimulationBuilder};
use motile_lib::model::data::{
    AbilityKind, LiveEvent, Particle, ParticleId, Position, RemovalCause,
};
use motile_lib::model::LifecycleObserver;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
enum Seen {
    Destroyed(ParticleId, RemovalCause),
    Born(ParticleId, Option<ParticleId>),
}

struct Recorder(Arc<Mutex<Vec<Seen>>>);

impl LifecycleObserver for Recorder {
    fn on_particle_destroyed(&mut self, particle: &Particle, cause: RemovalCause) {
        self.0
            .lock()
            .unwrap()
            .push(Seen::Destroyed(particle.id(), cause));
    }

    fn on_particle_born(&mut self, particle: &Particle, parent: Option<(ParticleId, Position)>) {
        self.0
            .lock()
            .unwrap()
            .push(Seen::Born(particle.id(), parent.map(|(id, _)| id)));
    }
}

#[test]
fn test_observer_sees_removals_before_births() {
    let builder = SimulationBuilder::new().with_config(|c| c.behavior.max_mass = 15.0);
    let eater = ParticleBuilder::new()
        .at(300.0, 300.0)
        .radius(10.0)
        .energy_fraction(0.6)
        .ability(AbilityKind::Eating)
        .build(builder.config());
    let prey = ParticleBuilder::new()
        .at(316.0, 300.0)
        .radius(6.0)
        .build(builder.config());
    let splitter = ParticleBuilder::new()
        .at(800.0, 300.0)
        .radius(10.0)
        .energy_fraction(0.6)
        .ability(AbilityKind::Splitting)
        .build(builder.config());
    let (mut sim, ids) = builder
        .with_particle(eater)
        .with_particle(prey)
        .with_particle(splitter)
        .build();

    let log = Arc::new(Mutex::new(Vec::new()));
    sim.set_observer(Box::new(Recorder(Arc::clone(&log))));
    let events = sim.update(1.0 / 60.0);

    let seen = log.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            Seen::Destroyed(ids[1], RemovalCause::Consumed { by: ids[0] }),
            Seen::Born(ParticleId(4), Some(ids[2])),
        ]
    );
    assert_eq!(events.len(), 2);
    assert_energy_above!(sim, ids[0], 60.0);
    assert!(events[0].is_death());
    assert!(events[1].is_birth());
}

#[test]
fn test_birth_event_carries_parent_position() {
    let builder = SimulationBuilder::new().with_config(|c| c.behavior.max_mass = 15.0);
    let splitter = ParticleBuilder::new()
        .at(640.0, 360.0)
        .radius(10.0)
        .energy_fraction(0.6)
        .ability(AbilityKind::Splitting)
        .build(builder.config());
    let (mut sim, ids) = builder.with_particle(splitter).build();

    let events = sim.update(1.0 / 60.0);
    let Some(LiveEvent::Birth {
        parent_id,
        parent_x: Some(px),
        parent_y: Some(py),
        tick,
        ..
    }) = events.first()
    else {
        panic!("expected a birth event, got {:?}", events);
    };
    assert_eq!(*parent_id, Some(ids[0]));
    assert_eq!(*tick, 1);
    let parent_at = Position { x: *px, y: *py };
    assert!(parent_at.distance(&Position { x: 640.0, y: 360.0 }) < 10.0);
}

#[test]
fn test_external_removal_and_queries() {
    let builder = SimulationBuilder::new();
    let a = ParticleBuilder::new()
        .at(100.0, 100.0)
        .radius(10.0)
        .build(builder.config());
    let b = ParticleBuilder::new()
        .at(300.0, 100.0)
        .radius(10.0)
        .inert()
        .build(builder.config());
    let (mut sim, ids) = builder.with_particle(a).with_particle(b).build();

    assert_eq!(sim.find_particle_at_position(305.0, 104.0), Some(ids[1]));
    assert_eq!(sim.find_particle_at_position(200.0, 100.0), None);

    assert!(sim.apply_impulse(ids[1], 5.0, 0.0));
    assert!(!sim.apply_impulse(ParticleId(1234), 5.0, 0.0));

    let removed = sim.remove_particle(ids[0]).unwrap();
    assert_eq!(removed.id(), ids[0]);
    assert_population!(sim, 1);
    assert!(sim.update(1.0 / 60.0).is_empty());
    let rock = sim.particle(ids[1]).unwrap();
    assert!((rock.velocity.vx - 0.5).abs() < 1e-9);
}

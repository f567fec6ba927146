//! The step orchestrator.
//!
//! One [`Simulation`] owns the particle store, both random streams, the
//! collision detectors and the lifecycle queues. [`Simulation::update`] runs
//! one tick in a fixed order:
//!
//! 1. Behavior pass, in id order: timers, vision, decision, ability, energy.
//! 2. Physics pass over every particle not consumed this tick: gravity,
//!    damping, integration, boundary reflection, collisions, containment.
//! 3. Lifecycle: starvation deaths, queued removals, queued births, events.

use crate::collision::CollisionSystem;
use crate::config::AppConfig;
use crate::lifecycle::{self, LifecycleQueue};
use crate::metrics::{Metrics, SimulationStats};
use crate::observer::LifecycleObserver;
use crate::rng::RngStreams;
use crate::snapshot::ParticleSnapshot;
use crate::store::{IdAllocator, ParticleStore};
use crate::systems::abilities::{self, AbilityContext, AbilityEntity};
use crate::systems::physics::{self, clamp_axis};
use crate::systems::{decision, energy, vision};
use motile_data::{
    AbilityKind, BehaviorState, LiveEvent, Particle, ParticleId, Position, RemovalCause,
};
use std::collections::HashSet;
use std::time::Instant;

pub struct Simulation {
    config: AppConfig,
    store: ParticleStore,
    ids: IdAllocator,
    rng: RngStreams,
    collisions: CollisionSystem,
    queue: LifecycleQueue,
    metrics: Metrics,
    observer: Option<Box<dyn LifecycleObserver>>,
    tick: u64,
}

impl Simulation {
    /// Validates `config` and seeds `world.initial_population` particles.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let mut sim = Self::empty(config)?;
        sim.seed_population(sim.config.world.initial_population);
        Ok(sim)
    }

    /// Validates `config` without seeding any particles.
    pub fn empty(config: AppConfig) -> anyhow::Result<Self> {
        config.validate()?;
        tracing::debug!(
            fingerprint = %config.fingerprint(),
            seed = ?config.world.seed,
            "simulation created"
        );
        Ok(Self {
            rng: RngStreams::new(config.world.seed),
            metrics: Metrics::new(config.world.metrics_log_interval),
            config,
            store: ParticleStore::new(),
            ids: IdAllocator::new(),
            collisions: CollisionSystem::new(),
            queue: LifecycleQueue::default(),
            observer: None,
            tick: 0,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn population(&self) -> usize {
        self.store.len()
    }

    /// Owned copies of every particle, sorted by id.
    pub fn particles(&self) -> Vec<Particle> {
        self.store.particles()
    }

    pub fn particle(&self, id: ParticleId) -> Option<Particle> {
        self.store.get(id)
    }

    pub fn set_observer(&mut self, observer: Box<dyn LifecycleObserver>) {
        self.observer = Some(observer);
    }

    pub fn take_observer(&mut self) -> Option<Box<dyn LifecycleObserver>> {
        self.observer.take()
    }

    /// Inserts a fully specified particle under a fresh id.
    pub fn insert_particle(&mut self, mut particle: Particle) -> ParticleId {
        particle.identity.id = self.ids.next_id();
        self.store.spawn(particle)
    }

    /// Adds a random particle at `(x, y)`, clamped inside the world.
    pub fn add_particle(&mut self, x: f64, y: f64) -> ParticleId {
        let id = self.ids.next_id();
        let mut particle =
            lifecycle::create_particle_with_rng(id, x, y, &self.config, &mut self.rng.population);
        let r = particle.body.radius;
        particle.position.x = clamp_axis(x, r, self.config.world.width);
        particle.position.y = clamp_axis(y, r, self.config.world.height);
        self.store.spawn(particle)
    }

    /// Adds `count` random particles spread uniformly over the world.
    pub fn seed_population(&mut self, count: usize) -> Vec<ParticleId> {
        let world = &self.config.world;
        let (w, h, margin) = (world.width, world.height, world.max_radius);
        (0..count)
            .map(|_| {
                let x = self
                    .rng
                    .population
                    .range_f64(margin, (w - margin).max(margin));
                let y = self
                    .rng
                    .population
                    .range_f64(margin, (h - margin).max(margin));
                self.add_particle(x, y)
            })
            .collect()
    }

    /// Removes a particle immediately. Notifies the observer.
    pub fn remove_particle(&mut self, id: ParticleId) -> Option<Particle> {
        let particle = self.store.despawn(id)?;
        if let Some(observer) = self.observer.as_mut() {
            observer.on_particle_destroyed(&particle, RemovalCause::External);
        }
        Some(particle)
    }

    /// Drops every particle. Ids keep counting up.
    pub fn clear(&mut self) {
        self.store.clear();
        self.queue.clear();
    }

    /// Lowest-id particle whose disk contains the point.
    pub fn find_particle_at_position(&self, x: f64, y: f64) -> Option<ParticleId> {
        self.store
            .particles()
            .into_iter()
            .find(|p| p.body.contains(&p.position, x, y))
            .map(|p| p.id())
    }

    /// `v += impulse / mass`. Returns `false` for unknown ids or non-finite input.
    pub fn apply_impulse(&mut self, id: ParticleId, ix: f64, iy: f64) -> bool {
        if !ix.is_finite() || !iy.is_finite() {
            tracing::warn!(%id, ix, iy, "non-finite impulse ignored");
            return false;
        }
        let Some((velocity, mass)) = self.store.velocity_mut(id) else {
            tracing::warn!(%id, "impulse on unknown particle ignored");
            return false;
        };
        velocity.vx += ix / mass;
        velocity.vy += iy / mass;
        true
    }

    pub fn stats(&self) -> SimulationStats {
        let particles = self.store.particles();
        let mut behavior_population = 0;
        let mut fraction_sum = 0.0;
        for b in particles.iter().filter_map(|p| p.behavior.as_ref()) {
            behavior_population += 1;
            fraction_sum += b.energy_fraction();
        }
        SimulationStats {
            tick: self.tick,
            population: particles.len(),
            behavior_population,
            total_mass: particles.iter().map(|p| p.body.mass).sum(),
            mean_energy_fraction: if behavior_population > 0 {
                fraction_sum / behavior_population as f64
            } else {
                0.0
            },
            births: self.metrics.births(),
            deaths: self.metrics.deaths(),
        }
    }

    /// Advances the world by `dt` seconds and returns the tick's lifecycle
    /// events. Non-positive or non-finite `dt` does nothing.
    pub fn update(&mut self, dt: f64) -> Vec<LiveEvent> {
        if !dt.is_finite() {
            tracing::warn!(dt, "non-finite dt ignored");
            return Vec::new();
        }
        if dt <= 0.0 {
            return Vec::new();
        }
        let started = Instant::now();
        self.tick += 1;

        if self.config.behavior.enabled {
            let phase = Instant::now();
            self.behavior_pass(dt);
            tracing::trace!(elapsed_us = phase.elapsed().as_micros() as u64, "behavior pass");
        }

        let phase = Instant::now();
        self.physics_pass(dt);
        tracing::trace!(elapsed_us = phase.elapsed().as_micros() as u64, "physics pass");

        let (events, births, deaths) = self.apply_lifecycle();
        self.metrics
            .record_tick(started.elapsed(), self.store.len(), births, deaths);
        events
    }

    fn behavior_pass(&mut self, dt: f64) {
        let config = &self.config;
        let mut snapshots = self.store.snapshots();

        for id in self.store.behavior_ids() {
            if self.queue.is_removed(id) {
                continue;
            }
            let Some(parts) = self.store.behavior_parts_mut(id) else {
                continue;
            };
            if !parts.behavior.is_alive() {
                continue;
            }

            parts.behavior.tick_timers(dt);
            parts.behavior.vision_range =
                vision::compute_vision_range(parts.body.radius, parts.behavior, &config.vision);

            let mut entity = AbilityEntity {
                id,
                position: parts.position,
                velocity: parts.velocity,
                body: parts.body,
                appearance: parts.appearance,
                behavior: parts.behavior,
            };
            let removals_before = self.queue.removal_count();
            let observer = entity.observer();
            let choice = decision::decide(
                &observer,
                entity.behavior,
                entity.body.mass,
                &snapshots,
                config,
            );

            let mut ctx = AbilityContext {
                config,
                snapshots: &snapshots,
                rng: &mut self.rng.ability,
                dt,
            };
            let executed = choice.is_some_and(|kind| {
                abilities::try_execute(kind, &mut entity, &mut ctx, &mut self.queue)
            });
            if executed && choice.is_some_and(AbilityKind::is_continuous) {
                abilities::try_execute(
                    AbilityKind::SpeedBurst,
                    &mut entity,
                    &mut ctx,
                    &mut self.queue,
                );
            }
            if !executed {
                entity.behavior.state = BehaviorState::Idle;
                entity.behavior.target_id = None;
            }

            energy::update_energy(entity.body, entity.behavior, config, dt);

            if let Ok(idx) = snapshots.binary_search_by_key(&id, |s| s.id) {
                snapshots[idx] = ParticleSnapshot::from_parts(
                    id,
                    entity.position,
                    entity.body,
                    Some(&*entity.behavior),
                );
            }
            if self.queue.removal_count() != removals_before {
                for removed in self.queue.removed_ids() {
                    if let Ok(idx) = snapshots.binary_search_by_key(&removed, |s| s.id) {
                        snapshots[idx].consumed = true;
                    }
                }
            }
        }
    }

    fn physics_pass(&mut self, dt: f64) {
        let p = &self.config.physics;
        let (width, height) = (self.config.world.width, self.config.world.height);
        let excluded: HashSet<ParticleId> = self.queue.removed_ids().collect();
        let mut bodies = self
            .store
            .physics_bodies(self.config.behavior.speed_burst_multiplier, &excluded);

        if p.gravity_enabled {
            physics::apply_gravity(&mut bodies, p, dt);
        }
        if p.damping_enabled {
            physics::apply_damping(&mut bodies, p);
        }
        physics::integrate(&mut bodies, p, dt);
        if p.boundaries_enabled {
            physics::reflect_boundaries(&mut bodies, width, height, p.restitution);
        }
        if p.collisions_enabled {
            self.collisions.step(&mut bodies, p);
        }
        if p.boundaries_enabled {
            physics::contain(&mut bodies, width, height);
        }
        self.store.apply_physics(&bodies);
    }

    /// Applies queued removals then births. Returns the events plus birth and
    /// death counts.
    fn apply_lifecycle(&mut self) -> (Vec<LiveEvent>, usize, usize) {
        for id in self.store.starved_ids() {
            self.queue.remove(id, RemovalCause::Starvation);
        }
        let (removals, births) = self.queue.drain();
        let mut events = Vec::with_capacity(removals.len() + births.len());

        let mut removed = Vec::with_capacity(removals.len());
        for (id, cause) in removals {
            if let Some(particle) = self.store.despawn(id) {
                tracing::debug!(%id, ?cause, tick = self.tick, "particle removed");
                events.push(lifecycle::death_event(&particle, cause, self.tick));
                removed.push((particle, cause));
            }
        }

        let clamp = self.config.physics.boundaries_enabled;
        let (width, height) = (self.config.world.width, self.config.world.height);
        let mut born = Vec::with_capacity(births.len());
        for birth in births {
            let parent: Option<(ParticleId, Position)> =
                Some((birth.parent_id, birth.parent_position));
            let mut particle = birth.into_particle(self.ids.next_id());
            if clamp {
                let r = particle.body.radius;
                particle.position.x = clamp_axis(particle.position.x, r, width);
                particle.position.y = clamp_axis(particle.position.y, r, height);
            }
            tracing::debug!(id = %particle.id(), parent = ?parent.map(|(id, _)| id), "particle born");
            events.push(lifecycle::birth_event(&particle, parent, self.tick));
            self.store.spawn(particle.clone());
            born.push((particle, parent));
        }

        if let Some(observer) = self.observer.as_mut() {
            for (particle, cause) in &removed {
                observer.on_particle_destroyed(particle, *cause);
            }
            for (particle, parent) in &born {
                observer.on_particle_born(particle, *parent);
            }
        }
        (events, born.len(), removed.len())
    }
}

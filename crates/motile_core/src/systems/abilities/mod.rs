//! Ability execution.
//!
//! Each ability lives in its own module and exposes one `execute` function
//! with the same shape: it checks its own precondition, returns `false`
//! without touching anything when that fails, and otherwise mutates the
//! acting particle and queues removals or births. [`try_execute`] adds the
//! shared cooldown gate in front and starts the cooldown afterwards.

pub mod chase;
pub mod eating;
pub mod flee;
pub mod phasing;
pub mod reproduction;
pub mod speed_burst;
pub mod splitting;

use crate::config::AppConfig;
use crate::lifecycle::{LifecycleQueue, PendingBirth};
use crate::rng::SimRng;
use crate::snapshot::ParticleSnapshot;
use crate::systems::energy;
use crate::systems::vision::Observer;
use motile_data::{AbilityKind, Appearance, Behavior, Body, ParticleId, Position, Velocity};

/// Read-only world state plus the ability random stream.
pub struct AbilityContext<'a> {
    pub config: &'a AppConfig,
    pub snapshots: &'a [ParticleSnapshot],
    pub rng: &'a mut SimRng,
    pub dt: f64,
}

/// The acting particle's components.
pub struct AbilityEntity<'a> {
    pub id: ParticleId,
    pub position: &'a mut Position,
    pub velocity: &'a mut Velocity,
    pub body: &'a mut Body,
    pub appearance: Appearance,
    pub behavior: &'a mut Behavior,
}

impl AbilityEntity<'_> {
    pub fn observer(&self) -> Observer {
        Observer {
            id: self.id,
            x: self.position.x,
            y: self.position.y,
            radius: self.body.radius,
            vision_range: self.behavior.vision_range,
        }
    }

    pub fn set_mass(&mut self, mass: f64, config: &AppConfig) {
        energy::set_mass(self.body, self.behavior, &config.energy, mass);
    }
}

/// Runs `kind` if it is held, off cooldown and its precondition holds.
pub fn try_execute(
    kind: AbilityKind,
    entity: &mut AbilityEntity,
    ctx: &mut AbilityContext,
    queue: &mut LifecycleQueue,
) -> bool {
    if !entity.behavior.abilities.is_ready(kind) {
        return false;
    }
    let executed = match kind {
        AbilityKind::Eating => eating::execute(entity, ctx, queue),
        AbilityKind::Chase => chase::execute(entity, ctx),
        AbilityKind::Flee => flee::execute(entity, ctx),
        AbilityKind::Splitting => splitting::execute(entity, ctx, queue),
        AbilityKind::Reproduction => reproduction::execute(entity, ctx, queue),
        AbilityKind::Phasing => phasing::execute(entity, ctx),
        AbilityKind::SpeedBurst => speed_burst::execute(entity, ctx),
        AbilityKind::CustomAttraction | AbilityKind::EnergyTransfer | AbilityKind::Camouflage => {
            false
        }
    };
    if executed {
        if !kind.is_continuous() {
            let cooldown = ctx.config.behavior.cooldowns.for_kind(kind);
            entity.behavior.abilities.trigger_cooldown(kind, cooldown);
        }
        tracing::debug!(id = %entity.id, ability = ?kind, "ability executed");
    }
    executed
}

/// Places an offspring of radius `child_radius` next to a parent of radius
/// `parent_radius` along `angle`, pushes the two apart and queues the birth.
///
/// The parent moves back by its own radius plus a small gap, the child
/// forward by its radius plus the same gap, so the disks do not overlap.
pub(crate) fn place_offspring(
    entity: &mut AbilityEntity,
    child_body: Body,
    child_behavior: Behavior,
    ctx: &mut AbilityContext,
    queue: &mut LifecycleQueue,
) {
    const GAP: f64 = 0.5;
    let angle = ctx.rng.angle();
    let (ux, uy) = (angle.cos(), angle.sin());
    let impulse = ctx.config.behavior.separation_impulse;

    let origin = *entity.position;
    let parent_velocity = *entity.velocity;
    let parent_shift = entity.body.radius * 0.5 + GAP;
    let child_shift = child_body.radius + entity.body.radius * 0.5 + GAP;

    entity.position.x = origin.x - ux * parent_shift;
    entity.position.y = origin.y - uy * parent_shift;
    entity.velocity.vx -= ux * impulse / entity.body.mass;
    entity.velocity.vy -= uy * impulse / entity.body.mass;

    let mut behavior = child_behavior;
    behavior
        .birthing
        .activate_from(ctx.config.behavior.birthing_duration, entity.id);

    queue.birth(PendingBirth {
        parent_id: entity.id,
        parent_position: *entity.position,
        position: Position {
            x: origin.x + ux * child_shift,
            y: origin.y + uy * child_shift,
        },
        velocity: Velocity {
            vx: parent_velocity.vx + ux * impulse / child_body.mass,
            vy: parent_velocity.vy + uy * impulse / child_body.mass,
        },
        body: child_body,
        appearance: entity.appearance,
        behavior,
    });
}

use super::{AbilityContext, AbilityEntity};
use crate::lifecycle::LifecycleQueue;
use crate::systems::decision::touching_prey;
use motile_data::{BehaviorState, RemovalCause};

/// Absorbs the nearest touching edible particle.
///
/// The eater gains `mass_transfer_fraction` of the prey's mass (capped at
/// `max_mass`) and `energy_transfer_fraction` of its energy, and may pick up
/// abilities the prey held. The prey is queued for removal.
pub fn execute(
    entity: &mut AbilityEntity,
    ctx: &mut AbilityContext,
    queue: &mut LifecycleQueue,
) -> bool {
    let observer = entity.observer();
    let Some(prey) = touching_prey(&observer, ctx.snapshots, ctx.config) else {
        return false;
    };
    if queue.is_removed(prey.id) {
        return false;
    }
    let config = ctx.config;
    let rules = &config.behavior;

    let gained = prey.mass * rules.mass_transfer_fraction;
    let cap = rules.max_mass.max(entity.body.mass);
    let new_mass = (entity.body.mass + gained).min(cap);
    entity.set_mass(new_mass, ctx.config);
    entity
        .behavior
        .add_energy(prey.energy * rules.energy_transfer_fraction);

    for kind in prey.abilities.held() {
        if !entity.behavior.abilities.has(kind) && ctx.rng.chance(rules.eat_inherit_chance) {
            entity.behavior.abilities.grant(kind);
            tracing::debug!(id = %entity.id, ability = ?kind, "ability absorbed from prey");
        }
    }

    entity.behavior.state = BehaviorState::Eating;
    entity.behavior.target_id = None;
    queue.remove(prey.id, RemovalCause::Consumed { by: entity.id });
    tracing::debug!(id = %entity.id, prey = %prey.id, gained, "particle consumed");
    true
}

use super::{place_offspring, AbilityContext, AbilityEntity};
use crate::lifecycle::{self, LifecycleQueue};
use motile_data::BehaviorState;

/// Fission into two equal halves.
///
/// The offspring keeps every ability, the temperament and the parent's new
/// size, and starts with `split_offspring_energy_fraction` of its capacity.
pub fn execute(
    entity: &mut AbilityEntity,
    ctx: &mut AbilityContext,
    queue: &mut LifecycleQueue,
) -> bool {
    let config = ctx.config;
    let rules = &config.behavior;
    if entity.body.mass < 2.0 * rules.min_mass || entity.behavior.energy < rules.split_min_energy
    {
        return false;
    }

    let half_mass = entity.body.mass * 0.5;
    let half_energy = entity.behavior.energy * 0.5;
    entity.set_mass(half_mass, config);
    entity.behavior.energy = half_energy;
    entity.behavior.clamp_energy();
    entity.behavior.state = BehaviorState::Splitting;

    let child_body = *entity.body;
    let max_energy = entity.behavior.max_energy;
    let child = lifecycle::offspring_behavior(
        entity.behavior,
        lifecycle::clone_abilities(&entity.behavior.abilities),
        max_energy,
        rules.split_offspring_energy_fraction * max_energy,
        &config.energy,
        ctx.rng,
    );
    place_offspring(entity, child_body, child, ctx, queue);
    tracing::debug!(id = %entity.id, mass = half_mass, "particle split");
    true
}

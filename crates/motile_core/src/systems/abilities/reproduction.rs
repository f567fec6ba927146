use super::{place_offspring, AbilityContext, AbilityEntity};
use crate::lifecycle::{self, LifecycleQueue};
use motile_data::BehaviorState;

/// Buds off a smaller offspring.
///
/// The offspring takes a random share of the parent's mass and energy, is
/// never larger than `max_offspring_size_ratio` of the parent, and leaves the
/// parent with at least `min_mass`. Abilities pass on one by one with
/// `inheritance_chance`.
pub fn execute(
    entity: &mut AbilityEntity,
    ctx: &mut AbilityContext,
    queue: &mut LifecycleQueue,
) -> bool {
    let config = ctx.config;
    let rules = &config.behavior;
    let behavior = &*entity.behavior;
    if behavior.energy_fraction() <= rules.reproduction_energy_threshold
        || entity.body.mass < rules.min_mass + rules.reproduction_mass_headroom
        || behavior.energy < rules.reproduction_min_energy
    {
        return false;
    }

    let parent_mass = entity.body.mass;
    let share = ctx.rng.range_f64(
        rules.reproduction_mass_fraction_min,
        rules.reproduction_mass_fraction_max,
    );
    let child_mass = (parent_mass * share)
        .min(parent_mass * rules.max_offspring_size_ratio)
        .min(parent_mass - rules.min_mass);
    if child_mass <= 0.0 {
        return false;
    }
    let energy_share = ctx.rng.range_f64(
        rules.reproduction_energy_fraction_min,
        rules.reproduction_energy_fraction_max,
    );
    let child_energy = entity.behavior.energy * energy_share;

    let mut child_body = *entity.body;
    child_body.set_mass(child_mass);
    // The child's share leaves before the parent's capacity shrinks.
    entity.behavior.energy -= child_energy;
    entity.behavior.clamp_energy();
    entity.set_mass(parent_mass - child_mass, config);
    entity.behavior.state = BehaviorState::Reproducing;

    let abilities = lifecycle::inherit_abilities(
        &entity.behavior.abilities,
        rules.inheritance_chance,
        ctx.rng,
    );
    let child = lifecycle::offspring_behavior(
        entity.behavior,
        abilities,
        config.energy.max_energy_for(child_mass),
        child_energy,
        &config.energy,
        ctx.rng,
    );
    place_offspring(entity, child_body, child, ctx, queue);
    tracing::debug!(id = %entity.id, child_mass, "particle reproduced");
    true
}

use super::{AbilityContext, AbilityEntity};
use crate::systems::vision;
use motile_data::BehaviorState;

/// Temporary invulnerability against an imminent threat.
///
/// A phasing particle is skipped by collision detection and cannot be eaten.
pub fn execute(entity: &mut AbilityEntity, ctx: &mut AbilityContext) -> bool {
    let config = ctx.config;
    let rules = &config.behavior;
    if entity.behavior.phasing.is_active() {
        return false;
    }
    let cost = rules.phasing_cost_fraction * entity.behavior.max_energy;
    if entity.behavior.energy < cost {
        return false;
    }
    let observer = entity.observer();
    let danger = rules.danger_distance_fraction * observer.vision_range;
    let threatened = vision::nearest_threat(&observer, ctx.snapshots, config)
        .is_some_and(|(_, distance)| distance < danger);
    if !threatened {
        return false;
    }

    entity.behavior.spend_energy(cost);
    entity.behavior.phasing.activate(rules.phasing_duration);
    entity.behavior.state = BehaviorState::Phasing;
    true
}

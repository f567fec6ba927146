use super::{AbilityContext, AbilityEntity};
use crate::systems::vision;
use motile_data::BehaviorState;

/// Steers toward the nearest visible edible particle.
///
/// Thrust scales with hunger (`1 - energy fraction`) and temperament. Runs
/// every tick it is selected and never cools down.
pub fn execute(entity: &mut AbilityEntity, ctx: &mut AbilityContext) -> bool {
    let observer = entity.observer();
    let Some((prey, distance)) = vision::nearest_edible(&observer, ctx.snapshots, ctx.config)
    else {
        return false;
    };
    if distance <= f64::EPSILON {
        return false;
    }
    let config = ctx.config;
    let rules = &config.behavior;
    let (ux, uy) = ((prey.x - observer.x) / distance, (prey.y - observer.y) / distance);
    let hunger = 1.0 - entity.behavior.energy_fraction();
    let thrust =
        rules.chase_force * hunger * entity.behavior.particle_type.chase_multiplier() * ctx.dt;

    entity.velocity.vx += ux * thrust;
    entity.velocity.vy += uy * thrust;
    entity.behavior.energy -= rules.chase_energy_cost * ctx.dt;
    entity.behavior.clamp_energy();
    entity.behavior.state = BehaviorState::Hunting;
    entity.behavior.target_id = Some(prey.id);
    true
}

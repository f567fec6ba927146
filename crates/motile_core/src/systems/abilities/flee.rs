use super::{AbilityContext, AbilityEntity};
use crate::systems::vision;
use motile_data::BehaviorState;

/// Proximity never drops below this, so even a distant threat pushes a little.
const MIN_PROXIMITY: f64 = 0.1;

/// Steers away from the nearest visible threat, harder the closer it is.
pub fn execute(entity: &mut AbilityEntity, ctx: &mut AbilityContext) -> bool {
    let observer = entity.observer();
    let Some((threat, distance)) = vision::nearest_threat(&observer, ctx.snapshots, ctx.config)
    else {
        return false;
    };
    let config = ctx.config;
    let rules = &config.behavior;

    let (ux, uy) = if distance > f64::EPSILON {
        ((observer.x - threat.x) / distance, (observer.y - threat.y) / distance)
    } else {
        let angle = ctx.rng.angle();
        (angle.cos(), angle.sin())
    };
    let proximity = if observer.vision_range > 0.0 {
        (1.0 - distance / observer.vision_range).clamp(MIN_PROXIMITY, 1.0)
    } else {
        1.0
    };
    let thrust =
        rules.flee_force * proximity * entity.behavior.particle_type.flee_multiplier() * ctx.dt;

    entity.velocity.vx += ux * thrust;
    entity.velocity.vy += uy * thrust;
    entity.behavior.energy -= rules.flee_energy_cost * ctx.dt;
    entity.behavior.clamp_energy();
    entity.behavior.state = BehaviorState::Fleeing;
    entity.behavior.target_id = Some(threat.id);
    true
}

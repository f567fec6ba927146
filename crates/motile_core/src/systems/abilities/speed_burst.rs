use super::{AbilityContext, AbilityEntity};
use motile_data::BehaviorState;

/// Short sprint while hunting or fleeing.
///
/// Multiplies the current velocity by `speed_burst_impulse` and raises the
/// speed cap for `speed_burst_duration`.
pub fn execute(entity: &mut AbilityEntity, ctx: &mut AbilityContext) -> bool {
    let rules = &ctx.config.behavior;
    let behavior = &mut *entity.behavior;
    if behavior.speed_boost.is_active()
        || !matches!(behavior.state, BehaviorState::Hunting | BehaviorState::Fleeing)
        || !behavior.spend_energy(rules.speed_burst_cost)
    {
        return false;
    }
    behavior.speed_boost.activate(rules.speed_burst_duration);
    entity.velocity.vx *= rules.speed_burst_impulse;
    entity.velocity.vy *= rules.speed_burst_impulse;
    true
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::AppConfig;
    use crate::rng::SimRng;
    use motile_data::AbilityKind;

    #[test]
    fn burst_needs_pursuit_or_escape() {
        let config = AppConfig::default();
        let mut p = particle(1, 0.0, 10.0, 0.5, &[AbilityKind::SpeedBurst], &config);
        p.velocity.vx = 10.0;
        let mut rng = SimRng::seeded(1);
        let mut ctx = AbilityContext {
            config: &config,
            snapshots: &[],
            rng: &mut rng,
            dt: 0.1,
        };
        assert!(!with_entity(&mut p, |e| execute(e, &mut ctx)));
        assert_eq!(p.velocity.vx, 10.0);

        if let Some(b) = p.behavior.as_mut() {
            b.state = BehaviorState::Fleeing;
        }
        assert!(with_entity(&mut p, |e| execute(e, &mut ctx)));
        assert!((p.velocity.vx - 13.0).abs() < 1e-9);
        let b = p.behavior.as_ref().expect("behavior");
        assert!(b.speed_boost.is_active());
        assert!((b.energy - 42.0).abs() < 1e-9);

        // Already boosted.
        assert!(!with_entity(&mut p, |e| execute(e, &mut ctx)));
    }
}

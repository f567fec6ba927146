use crate::config::AppConfig;
use crate::snapshot::ParticleSnapshot;
use crate::systems::vision::{self, Observer};
use motile_data::{AbilityKind, Behavior};

/// Picks at most one ability for this tick. First matching rule wins:
///
/// 1. Threat inside the danger distance: Phasing, else Flee.
/// 2. Edible particle within touch distance: Eating.
/// 3. Hungry with prey in sight: Chase.
/// 4. Energy above the reproduction threshold: Reproduction.
/// 5. Heavy and energetic enough: Splitting.
///
/// Only whether an ability is held is checked here; cooldowns and the
/// ability's own preconditions are checked on execution.
pub fn decide(
    observer: &Observer,
    behavior: &Behavior,
    mass: f64,
    snapshots: &[ParticleSnapshot],
    config: &AppConfig,
) -> Option<AbilityKind> {
    let rules = &config.behavior;
    let held = |kind| behavior.abilities.has(kind);
    let fraction = behavior.energy_fraction();

    if let Some((_, distance)) = vision::nearest_threat(observer, snapshots, config) {
        if distance < rules.danger_distance_fraction * observer.vision_range {
            if held(AbilityKind::Phasing) {
                return Some(AbilityKind::Phasing);
            }
            if held(AbilityKind::Flee) {
                return Some(AbilityKind::Flee);
            }
        }
    }

    if held(AbilityKind::Eating) && touching_prey(observer, snapshots, config).is_some() {
        return Some(AbilityKind::Eating);
    }

    if fraction < rules.hunger_threshold
        && held(AbilityKind::Chase)
        && vision::nearest_edible(observer, snapshots, config).is_some()
    {
        return Some(AbilityKind::Chase);
    }

    if fraction > rules.reproduction_energy_threshold && held(AbilityKind::Reproduction) {
        return Some(AbilityKind::Reproduction);
    }

    if mass > rules.split_mass_fraction * rules.max_mass
        && fraction > rules.split_energy_threshold
        && held(AbilityKind::Splitting)
    {
        return Some(AbilityKind::Splitting);
    }

    None
}

/// Nearest edible particle close enough to eat right now.
pub fn touching_prey<'a>(
    observer: &'a Observer,
    snapshots: &'a [ParticleSnapshot],
    config: &'a AppConfig,
) -> Option<&'a ParticleSnapshot> {
    let ratio = config.behavior.size_ratio_for_eating;
    let margin = config.behavior.touch_margin;
    vision::nearest_visible(observer, snapshots, &config.vision, |s| {
        vision::is_edible(observer.radius, s, ratio)
            && s.distance_to(observer.x, observer.y)
                <= vision::touch_distance(observer.radius, s.radius, margin)
    })
    .map(|(prey, _)| prey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use motile_data::{AbilityTable, ParticleId, ParticleType};

    fn snap(id: u64, x: f64, radius: f64) -> ParticleSnapshot {
        ParticleSnapshot {
            id: ParticleId(id),
            x,
            y: 0.0,
            mass: radius * radius * 0.1,
            radius,
            particle_type: Some(ParticleType::Neutral),
            energy: 10.0,
            abilities: AbilityTable::default(),
            alive: true,
            consumed: false,
            camouflaged: false,
            phasing: false,
            birthing: false,
        }
    }

    fn observer() -> Observer {
        Observer {
            id: ParticleId(1),
            x: 0.0,
            y: 0.0,
            radius: 10.0,
            vision_range: 100.0,
        }
    }

    fn behavior(kinds: &[AbilityKind], fraction: f64) -> Behavior {
        let mut b = Behavior::new(
            ParticleType::Neutral,
            AbilityTable::from_kinds(kinds),
            100.0,
        );
        b.energy = 100.0 * fraction;
        b
    }

    #[test]
    fn close_threat_prefers_phasing_over_flee() {
        let config = AppConfig::default();
        let snapshots = vec![snap(2, 30.0, 20.0)];
        let b = behavior(&[AbilityKind::Phasing, AbilityKind::Flee], 0.5);
        assert_eq!(
            decide(&observer(), &b, 10.0, &snapshots, &config),
            Some(AbilityKind::Phasing)
        );
        let b = behavior(&[AbilityKind::Flee], 0.5);
        assert_eq!(
            decide(&observer(), &b, 10.0, &snapshots, &config),
            Some(AbilityKind::Flee)
        );
    }

    #[test]
    fn distant_threat_is_ignored() {
        let config = AppConfig::default();
        let snapshots = vec![snap(2, 60.0, 20.0)];
        let b = behavior(&[AbilityKind::Flee], 0.5);
        assert_eq!(decide(&observer(), &b, 10.0, &snapshots, &config), None);
    }

    #[test]
    fn touching_prey_is_eaten() {
        let config = AppConfig::default();
        let snapshots = vec![snap(2, 16.5, 6.0)];
        let b = behavior(&[AbilityKind::Eating, AbilityKind::Chase], 0.2);
        assert_eq!(
            decide(&observer(), &b, 10.0, &snapshots, &config),
            Some(AbilityKind::Eating)
        );
    }

    #[test]
    fn hungry_particle_chases_visible_prey() {
        let config = AppConfig::default();
        let snapshots = vec![snap(2, 50.0, 6.0)];
        let b = behavior(&[AbilityKind::Eating, AbilityKind::Chase], 0.2);
        assert_eq!(
            decide(&observer(), &b, 10.0, &snapshots, &config),
            Some(AbilityKind::Chase)
        );
        let fed = behavior(&[AbilityKind::Eating, AbilityKind::Chase], 0.6);
        assert_eq!(decide(&observer(), &fed, 10.0, &snapshots, &config), None);
    }

    #[test]
    fn reproduction_before_splitting() {
        let config = AppConfig::default();
        let b = behavior(&[AbilityKind::Reproduction, AbilityKind::Splitting], 0.9);
        assert_eq!(
            decide(&observer(), &b, 50.0, &[], &config),
            Some(AbilityKind::Reproduction)
        );
        let b = behavior(&[AbilityKind::Splitting], 0.9);
        assert_eq!(
            decide(&observer(), &b, 50.0, &[], &config),
            Some(AbilityKind::Splitting)
        );
        assert_eq!(decide(&observer(), &b, 20.0, &[], &config), None);
    }
}

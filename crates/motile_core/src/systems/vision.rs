//! Who can see whom.
//!
//! Vision range scales with size, energy and temperament. Camouflage works on
//! the target side: a camouflaged particle is only seen from within a fraction
//! of the observer's range.

use crate::config::{AppConfig, VisionConfig};
use crate::snapshot::ParticleSnapshot;
use motile_data::{Behavior, ParticleId};

/// `radius × multiplier × (0.5 + 0.5·energy fraction) × type factor`.
pub fn compute_vision_range(radius: f64, behavior: &Behavior, config: &VisionConfig) -> f64 {
    let energy_factor = 0.5 + 0.5 * behavior.energy_fraction();
    radius
        * config.vision_range_multiplier
        * energy_factor
        * behavior.particle_type.vision_multiplier()
}

/// The observing particle, as seen by the vision queries.
#[derive(Debug, Clone, Copy)]
pub struct Observer {
    pub id: ParticleId,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub vision_range: f64,
}

/// Whether `target` is visible to `observer`, and at what distance.
pub fn visible_distance(
    observer: &Observer,
    target: &ParticleSnapshot,
    config: &VisionConfig,
) -> Option<f64> {
    if target.id == observer.id || !target.is_present() {
        return None;
    }
    let reach = if target.camouflaged {
        observer.vision_range * config.camouflage_visibility_factor
    } else {
        observer.vision_range
    };
    let distance = target.distance_to(observer.x, observer.y);
    (distance <= reach).then_some(distance)
}

/// Every other present particle within the observer's range, in id order.
pub fn visible_particles<'a>(
    observer: &'a Observer,
    snapshots: &'a [ParticleSnapshot],
    config: &'a VisionConfig,
) -> impl Iterator<Item = (&'a ParticleSnapshot, f64)> + 'a {
    snapshots
        .iter()
        .filter_map(move |s| visible_distance(observer, s, config).map(|d| (s, d)))
}

/// `other` is big enough to eat the observer.
#[inline]
pub fn is_threat(own_radius: f64, other: &ParticleSnapshot, size_ratio: f64) -> bool {
    other.radius >= own_radius * size_ratio
}

/// The observer is big enough to eat `other`, and `other` can be eaten now.
#[inline]
pub fn is_edible(own_radius: f64, other: &ParticleSnapshot, size_ratio: f64) -> bool {
    own_radius >= other.radius * size_ratio && !other.birthing && !other.phasing
}

/// Nearest visible particle matching `predicate`; ties go to the lower id.
pub fn nearest_visible<'a, P>(
    observer: &'a Observer,
    snapshots: &'a [ParticleSnapshot],
    config: &'a VisionConfig,
    mut predicate: P,
) -> Option<(&'a ParticleSnapshot, f64)>
where
    P: FnMut(&ParticleSnapshot) -> bool,
{
    let mut best: Option<(&ParticleSnapshot, f64)> = None;
    for (candidate, distance) in visible_particles(observer, snapshots, config) {
        if !predicate(candidate) {
            continue;
        }
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }
    best
}

pub fn nearest_threat<'a>(
    observer: &'a Observer,
    snapshots: &'a [ParticleSnapshot],
    config: &'a AppConfig,
) -> Option<(&'a ParticleSnapshot, f64)> {
    let ratio = config.behavior.size_ratio_for_eating;
    nearest_visible(observer, snapshots, &config.vision, |s| {
        is_threat(observer.radius, s, ratio)
    })
}

pub fn nearest_edible<'a>(
    observer: &'a Observer,
    snapshots: &'a [ParticleSnapshot],
    config: &'a AppConfig,
) -> Option<(&'a ParticleSnapshot, f64)> {
    let ratio = config.behavior.size_ratio_for_eating;
    nearest_visible(observer, snapshots, &config.vision, |s| {
        is_edible(observer.radius, s, ratio)
    })
}

/// Center distance at which two disks count as touching for feeding.
#[inline]
pub fn touch_distance(own_radius: f64, other_radius: f64, margin: f64) -> f64 {
    own_radius + other_radius + margin
}

#[cfg(test)]
mod tests {
    use super::*;
    use motile_data::{AbilityTable, ParticleType};

    fn snap(id: u64, x: f64, radius: f64) -> ParticleSnapshot {
        ParticleSnapshot {
            id: ParticleId(id),
            x,
            y: 0.0,
            mass: radius * radius * 0.1,
            radius,
            particle_type: Some(ParticleType::Neutral),
            energy: 50.0,
            abilities: AbilityTable::default(),
            alive: true,
            consumed: false,
            camouflaged: false,
            phasing: false,
            birthing: false,
        }
    }

    fn observer(range: f64) -> Observer {
        Observer {
            id: ParticleId(1),
            x: 0.0,
            y: 0.0,
            radius: 10.0,
            vision_range: range,
        }
    }

    #[test]
    fn range_depends_on_energy_and_type() {
        let config = VisionConfig::default();
        let mut b = Behavior::new(ParticleType::Neutral, AbilityTable::default(), 100.0);
        let full = compute_vision_range(10.0, &b, &config);
        assert!((full - 80.0).abs() < 1e-9);
        b.energy = 0.0;
        let empty = compute_vision_range(10.0, &b, &config);
        assert!((empty - 40.0).abs() < 1e-9);
        b.particle_type = ParticleType::Predator;
        b.energy = 100.0;
        assert!(compute_vision_range(10.0, &b, &config) > full);
    }

    #[test]
    fn excludes_self_dead_and_distant() {
        let config = VisionConfig::default();
        let obs = observer(50.0);
        let mut dead = snap(3, 10.0, 2.0);
        dead.alive = false;
        let snapshots = vec![snap(1, 0.0, 10.0), snap(2, 20.0, 2.0), dead, snap(4, 80.0, 2.0)];
        let ids: Vec<_> = visible_particles(&obs, &snapshots, &config)
            .map(|(s, _)| s.id)
            .collect();
        assert_eq!(ids, vec![ParticleId(2)]);
    }

    #[test]
    fn camouflage_shrinks_visibility_distance() {
        let config = VisionConfig::default();
        let obs = observer(100.0);
        let mut hidden = snap(2, 40.0, 2.0);
        hidden.camouflaged = true;
        assert!(visible_distance(&obs, &hidden, &config).is_none());
        hidden.x = 25.0;
        assert_eq!(visible_distance(&obs, &hidden, &config), Some(25.0));
    }

    #[test]
    fn threat_and_prey_classification() {
        let big = snap(2, 0.0, 13.0);
        let small = snap(3, 0.0, 6.0);
        assert!(is_threat(10.0, &big, 1.25));
        assert!(!is_threat(10.0, &small, 1.25));
        assert!(is_edible(10.0, &small, 1.25));
        let mut newborn = small;
        newborn.birthing = true;
        assert!(!is_edible(10.0, &newborn, 1.25));
    }

    #[test]
    fn nearest_prefers_closest() {
        let config = AppConfig::default();
        let obs = observer(100.0);
        let snapshots = vec![snap(2, 60.0, 3.0), snap(3, 30.0, 3.0), snap(4, 45.0, 30.0)];
        let (prey, d) = nearest_edible(&obs, &snapshots, &config).expect("prey visible");
        assert_eq!(prey.id, ParticleId(3));
        assert_eq!(d, 30.0);
        let (threat, _) = nearest_threat(&obs, &snapshots, &config).expect("threat visible");
        assert_eq!(threat.id, ParticleId(4));
    }
}

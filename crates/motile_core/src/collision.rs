//! Overlap detection and elastic resolution.
//!
//! Two detectors report the same pairs: [`PairwiseDetector`] tests every
//! unordered pair and [`GridDetector`] only tests pairs sharing a 3×3 block of
//! a uniform grid. [`CollisionSystem`] owns one of each and picks per tick by
//! particle count. Resolution is shared.
//!
//! Every function here expects `bodies` sorted by id, so index order is id
//! order and reported pairs `(a, b)` always have `a < b`.

use crate::config::PhysicsConfig;
use crate::snapshot::PhysicsBody;
use crate::spatial_hash::SpatialHash;
use motile_data::ParticleId;
use std::collections::HashSet;

/// Coincident centers are pushed this far apart before computing a normal.
pub const DEGENERATE_NUDGE: f64 = 0.01;
const DEGENERATE_DISTANCE: f64 = 1e-9;

/// One overlapping pair, as indices into the body slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollisionPair {
    pub a: usize,
    pub b: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorKind {
    Pairwise,
    Grid,
}

/// A strategy for finding overlapping pairs.
pub trait CollisionDetector {
    fn kind(&self) -> DetectorKind;

    /// Returns every overlapping pair, sorted, each pair once.
    fn detect(&mut self, bodies: &[PhysicsBody]) -> Vec<CollisionPair>;
}

#[inline]
pub fn overlaps(a: &PhysicsBody, b: &PhysicsBody) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let reach = a.radius + b.radius;
    dx * dx + dy * dy < reach * reach
}

/// Tests all `n(n-1)/2` pairs.
#[derive(Debug, Default)]
pub struct PairwiseDetector;

impl CollisionDetector for PairwiseDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Pairwise
    }

    fn detect(&mut self, bodies: &[PhysicsBody]) -> Vec<CollisionPair> {
        let mut pairs = Vec::new();
        for a in 0..bodies.len() {
            if bodies[a].phasing {
                continue;
            }
            for b in (a + 1)..bodies.len() {
                if !bodies[b].phasing && overlaps(&bodies[a], &bodies[b]) {
                    pairs.push(CollisionPair { a, b });
                }
            }
        }
        pairs
    }
}

/// Buckets centers into cells of `2 × max radius` and scans 3×3 blocks.
#[derive(Debug, Default)]
pub struct GridDetector {
    hash: SpatialHash,
    candidates: Vec<usize>,
    positions: Vec<(f64, f64)>,
    seen: HashSet<(ParticleId, ParticleId)>,
}

impl CollisionDetector for GridDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Grid
    }

    fn detect(&mut self, bodies: &[PhysicsBody]) -> Vec<CollisionPair> {
        self.candidates.clear();
        self.positions.clear();
        self.seen.clear();

        let mut max_radius: f64 = 0.0;
        for (idx, body) in bodies.iter().enumerate().filter(|(_, b)| !b.phasing) {
            self.candidates.push(idx);
            self.positions.push((body.x, body.y));
            max_radius = max_radius.max(body.radius);
        }
        if self.candidates.len() < 2 {
            return Vec::new();
        }

        self.hash.set_cell_size(2.0 * max_radius);
        self.hash.build(&self.positions);

        let mut pairs = Vec::new();
        for (slot, &idx) in self.candidates.iter().enumerate() {
            let origin = &bodies[idx];
            let (x, y) = self.positions[slot];
            let candidates = &self.candidates;
            let seen = &mut self.seen;
            self.hash.for_each_in_block(x, y, |other_slot| {
                let other_idx = candidates[other_slot];
                if other_idx == idx {
                    return;
                }
                let other = &bodies[other_idx];
                let key = (origin.id.min(other.id), origin.id.max(other.id));
                if !seen.insert(key) {
                    return;
                }
                if overlaps(origin, other) {
                    pairs.push(CollisionPair {
                        a: idx.min(other_idx),
                        b: idx.max(other_idx),
                    });
                }
            });
        }
        pairs.sort_unstable();
        pairs
    }
}

/// Owns both detectors and chooses between them.
#[derive(Debug, Default)]
pub struct CollisionSystem {
    pairwise: PairwiseDetector,
    grid: GridDetector,
}

impl CollisionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairwise at or below the partition threshold (or with partitioning off), grid above.
    pub fn select(&mut self, count: usize, config: &PhysicsConfig) -> &mut dyn CollisionDetector {
        if config.spatial_partitioning_enabled && count > config.spatial_partition_threshold {
            &mut self.grid
        } else {
            &mut self.pairwise
        }
    }

    /// Detects and resolves every overlap. Returns the number of resolved pairs.
    pub fn step(&mut self, bodies: &mut [PhysicsBody], config: &PhysicsConfig) -> usize {
        let detector = self.select(bodies.len(), config);
        let kind = detector.kind();
        let pairs = detector.detect(bodies);
        for pair in &pairs {
            let (a, b) = pair_mut(bodies, pair.a, pair.b);
            resolve_collision(a, b, config.restitution);
        }
        tracing::trace!(?kind, pairs = pairs.len(), "collision pass");
        pairs.len()
    }
}

/// Two distinct mutable elements of a slice, `a < b`.
pub fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert!(a < b);
    let (head, tail) = items.split_at_mut(b);
    (&mut head[a], &mut tail[0])
}

/// Separates two overlapping disks and exchanges an elastic impulse.
///
/// Positions move along the contact normal weighted by the other body's mass
/// share (the lighter body moves further). Bodies already separating keep
/// their velocities.
pub fn resolve_collision(a: &mut PhysicsBody, b: &mut PhysicsBody, restitution: f64) {
    let mut dx = b.x - a.x;
    let mut dy = b.y - a.y;
    let mut dist = (dx * dx + dy * dy).sqrt();
    if dist < DEGENERATE_DISTANCE {
        b.x += DEGENERATE_NUDGE;
        dx = b.x - a.x;
        dy = b.y - a.y;
        dist = (dx * dx + dy * dy).sqrt().max(DEGENERATE_NUDGE);
    }
    let nx = dx / dist;
    let ny = dy / dist;

    let total_mass = a.mass + b.mass;
    let overlap = a.radius + b.radius - dist;
    if overlap > 0.0 && total_mass > 0.0 {
        let share_a = b.mass / total_mass;
        let share_b = a.mass / total_mass;
        a.x -= nx * overlap * share_a;
        a.y -= ny * overlap * share_a;
        b.x += nx * overlap * share_b;
        b.y += ny * overlap * share_b;
    }

    let rel_normal = (b.vx - a.vx) * nx + (b.vy - a.vy) * ny;
    if rel_normal > 0.0 {
        return;
    }

    let inv_a = 1.0 / a.mass;
    let inv_b = 1.0 / b.mass;
    let impulse = -(1.0 + restitution) * rel_normal / (inv_a + inv_b);
    a.vx -= impulse * nx * inv_a;
    a.vy -= impulse * ny * inv_a;
    b.vx += impulse * nx * inv_b;
    b.vy += impulse * ny * inv_b;
}

use super::particle::ParticleId;
use serde::{Deserialize, Serialize};

/// A countdown-based temporary flag.
///
/// Used for phasing, speed boost, camouflage and the birth window. The
/// `source` slot is only meaningful for the birth window, where it holds the
/// parent's id for whoever animates births.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct TimedState {
    pub active: bool,
    pub time_remaining: f64,
    pub duration: f64,
    pub source: Option<ParticleId>,
}

impl TimedState {
    pub fn activate(&mut self, duration: f64) {
        self.active = duration > 0.0;
        self.duration = duration.max(0.0);
        self.time_remaining = self.duration;
    }

    pub fn activate_from(&mut self, duration: f64, source: ParticleId) {
        self.activate(duration);
        self.source = Some(source);
    }

    /// Counts down by `dt`. Returns `true` on the tick the state expires.
    pub fn update(&mut self, dt: f64) -> bool {
        if !self.active {
            return false;
        }
        self.time_remaining -= dt;
        if self.time_remaining <= 0.0 {
            self.expire();
            return true;
        }
        false
    }

    pub fn expire(&mut self) {
        self.active = false;
        self.time_remaining = 0.0;
        self.source = None;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Fraction of the duration already elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if !self.active || self.duration <= 0.0 {
            return 1.0;
        }
        (1.0 - self.time_remaining / self.duration).clamp(0.0, 1.0)
    }
}

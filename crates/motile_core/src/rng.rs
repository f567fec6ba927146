//! Seeded random streams.
//!
//! A simulation owns two independent streams: the population stream (initial
//! particles, `add_particle`) and the ability stream (inheritance rolls,
//! reproduction fractions, separation angles). Keeping them apart means tuning
//! an ability probability never shifts where new particles spawn.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;

/// XOR-ed into the world seed to derive the ability stream.
pub const ABILITY_STREAM_OFFSET: u64 = 0x5EED_AB1E_0000_0001;

#[derive(Clone, Debug)]
pub struct SimRng {
    inner: ChaCha8Rng,
}

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }

    /// Uniform double in `[min, max)`; returns `min` when the range is empty.
    #[inline]
    pub fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        self.inner.gen_range(min..max)
    }

    /// Uniform integer in `[min, max)`; returns `min` when the range is empty.
    #[inline]
    pub fn range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.inner.gen_range(min..max)
    }

    /// Uniform angle in `[0, 2π)`.
    #[inline]
    pub fn angle(&mut self) -> f64 {
        self.inner.gen_range(0.0..TAU)
    }

    /// Bernoulli trial; probabilities outside `[0, 1]` saturate.
    #[inline]
    pub fn chance(&mut self, probability: f64) -> bool {
        if probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.inner.gen_bool(probability)
    }

    /// Symmetric variance in `(-spread, spread)`.
    #[inline]
    pub fn variance(&mut self, spread: f64) -> f64 {
        self.range_f64(-spread, spread)
    }
}

/// The pair of streams owned by one simulation.
#[derive(Clone, Debug)]
pub struct RngStreams {
    pub population: SimRng,
    pub ability: SimRng,
}

impl RngStreams {
    /// Seeded streams when `seed` is set, entropy otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self {
                population: SimRng::seeded(seed),
                ability: SimRng::seeded(seed ^ ABILITY_STREAM_OFFSET),
            },
            None => Self {
                population: SimRng::from_entropy(),
                ability: SimRng::from_entropy(),
            },
        }
    }
}

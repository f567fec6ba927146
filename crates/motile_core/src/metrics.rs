//! Runtime counters and logging setup.
//!
//! [`Metrics`] is owned by a simulation and updated once per tick; it logs a
//! summary line at `info` every `log_interval` ticks.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Per-simulation counters.
pub struct Metrics {
    tick_count: AtomicU64,
    population: AtomicU64,
    births: AtomicU64,
    deaths: AtomicU64,
    last_tick_micros: AtomicU64,
    log_interval: u64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl Metrics {
    /// Creates a collector that logs every `log_interval` ticks (0 disables).
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            population: AtomicU64::new(0),
            births: AtomicU64::new(0),
            deaths: AtomicU64::new(0),
            last_tick_micros: AtomicU64::new(0),
            log_interval,
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick with its duration and lifecycle counts.
    pub fn record_tick(&self, duration: Duration, population: usize, births: usize, deaths: usize) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.population.store(population as u64, Ordering::Relaxed);
        self.births.fetch_add(births as u64, Ordering::Relaxed);
        self.deaths.fetch_add(deaths as u64, Ordering::Relaxed);
        self.last_tick_micros
            .store(duration.as_micros() as u64, Ordering::Relaxed);

        if self.log_interval > 0 && tick.is_multiple_of(self.log_interval) {
            tracing::info!(
                tick,
                population,
                births = self.births(),
                deaths = self.deaths(),
                duration_us = duration.as_micros() as u64,
                "simulation tick"
            );
        }
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn population(&self) -> u64 {
        self.population.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn births(&self) -> u64 {
        self.births.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn deaths(&self) -> u64 {
        self.deaths.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn last_tick_duration(&self) -> Duration {
        Duration::from_micros(self.last_tick_micros.load(Ordering::Relaxed))
    }

    /// Time since the collector was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Zeroes every counter.
    pub fn reset(&self) {
        self.tick_count.store(0, Ordering::Relaxed);
        self.population.store(0, Ordering::Relaxed);
        self.births.store(0, Ordering::Relaxed);
        self.deaths.store(0, Ordering::Relaxed);
        self.last_tick_micros.store(0, Ordering::Relaxed);
    }
}

/// Aggregate state of a simulation at one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SimulationStats {
    pub tick: u64,
    pub population: usize,
    pub behavior_population: usize,
    pub total_mass: f64,
    /// Mean `energy / max_energy` over behavior particles; 0 when there are none.
    pub mean_energy_fraction: f64,
    pub births: u64,
    pub deaths: u64,
}

/// Installs a fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .finish(),
    )
    .ok();
}

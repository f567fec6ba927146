//! Headless batch runs.
//!
//! A [`HeadlessRunner`] steps one or more seeded simulations for a fixed
//! number of ticks and condenses each into a [`RunSummary`]. Independent runs
//! are spread across the rayon pool.

use anyhow::Context;
use motile_core::{AppConfig, Simulation, SimulationStats};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest step handed to the engine; longer frames are capped to this.
pub const MAX_DELTA_TIME: f64 = 1.0 / 30.0;

/// Population at one sampled tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationSample {
    pub tick: u64,
    pub population: usize,
    pub total_mass: f64,
}

/// Outcome of one seeded run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub ticks: u64,
    pub dt: f64,
    pub config_fingerprint: String,
    pub final_stats: SimulationStats,
    pub population_trace: Vec<PopulationSample>,
}

#[derive(Debug, Clone)]
pub struct HeadlessRunner {
    config: AppConfig,
    ticks: u64,
    dt: f64,
    sample_every: u64,
}

impl HeadlessRunner {
    /// `dt` is capped at [`MAX_DELTA_TIME`]; `sample_every = 0` records only
    /// the first and last tick.
    pub fn new(config: AppConfig, ticks: u64, dt: f64, sample_every: u64) -> anyhow::Result<Self> {
        config.validate()?;
        anyhow::ensure!(
            dt.is_finite() && dt > 0.0,
            "Time step must be positive and finite"
        );
        if dt > MAX_DELTA_TIME {
            tracing::warn!(dt, cap = MAX_DELTA_TIME, "time step capped");
        }
        Ok(Self {
            config,
            ticks,
            dt: dt.min(MAX_DELTA_TIME),
            sample_every,
        })
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Runs a single simulation with `seed`.
    pub fn run(&self, seed: u64) -> anyhow::Result<RunSummary> {
        let mut config = self.config.clone();
        config.world.seed = Some(seed);
        let fingerprint = config.fingerprint();
        let mut sim = Simulation::new(config).with_context(|| format!("seed {seed}"))?;

        let mut trace = vec![sample(&sim)];
        for tick in 1..=self.ticks {
            sim.update(self.dt);
            let sampled = self.sample_every > 0 && tick.is_multiple_of(self.sample_every);
            if sampled || tick == self.ticks {
                trace.push(sample(&sim));
            }
        }

        let final_stats = sim.stats();
        tracing::info!(
            seed,
            ticks = self.ticks,
            population = final_stats.population,
            births = final_stats.births,
            deaths = final_stats.deaths,
            "run finished"
        );
        Ok(RunSummary {
            seed,
            ticks: self.ticks,
            dt: self.dt,
            config_fingerprint: fingerprint,
            final_stats,
            population_trace: trace,
        })
    }

    /// Runs `count` simulations seeded `base_seed, base_seed + 1, ...` in
    /// parallel. Summaries come back in seed order.
    pub fn run_batch(&self, base_seed: u64, count: usize) -> anyhow::Result<Vec<RunSummary>> {
        (0..count as u64)
            .into_par_iter()
            .map(|offset| self.run(base_seed.wrapping_add(offset)))
            .collect()
    }
}

fn sample(sim: &Simulation) -> PopulationSample {
    let stats = sim.stats();
    PopulationSample {
        tick: stats.tick,
        population: stats.population,
        total_mass: stats.total_mass,
    }
}

/// Reads and validates a TOML config. A missing file yields the defaults.
pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "config not found, using defaults");
        return Ok(AppConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    AppConfig::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
}

//! Configuration management for simulation parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `config.toml` file. Every tunable the engine reads lives here, grouped
//! by the subsystem that consumes it.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (the `Default` impl of each section)
//! 2. `config.toml` file (overrides defaults; missing keys keep their default)
//!
//! The engine assumes a validated configuration. [`AppConfig::validate`] is the
//! one place where out-of-range values are rejected.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 1280.0
//! height = 720.0
//! initial_population = 120
//! seed = 42
//!
//! [physics]
//! gravity_constant = 2000.0
//! restitution = 0.8
//!
//! [behavior]
//! enabled = true
//! size_ratio_for_eating = 1.25
//! ```

use motile_data::AbilityKind;
use serde::{Deserialize, Serialize};

/// World-level simulation configuration.
///
/// Defines the simulation area, the initial population and the bounds used
/// when synthesizing new particles.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    pub initial_population: usize,
    pub seed: Option<u64>,
    pub min_radius: f64,
    pub max_radius: f64,
    /// Mass per unit of squared radius.
    pub density: f64,
    /// Initial speed is drawn from `[0, initial_speed)` in a random direction.
    pub initial_speed: f64,
    /// Ticks between metrics log lines; 0 disables them.
    pub metrics_log_interval: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            initial_population: 120,
            seed: None,
            min_radius: 4.0,
            max_radius: 14.0,
            density: 0.1,
            initial_speed: 20.0,
            metrics_log_interval: 1000,
        }
    }
}

/// Force, integration and collision parameters plus the physics toggles.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity_enabled: bool,
    pub damping_enabled: bool,
    pub boundaries_enabled: bool,
    pub collisions_enabled: bool,
    pub spatial_partitioning_enabled: bool,
    pub gravity_constant: f64,
    /// Pairs closer than this exert no gravity.
    pub min_distance: f64,
    pub max_acceleration: f64,
    /// Velocity multiplier applied once per tick.
    pub damping_factor: f64,
    pub base_max_velocity: f64,
    pub velocity_headroom: f64,
    pub restitution: f64,
    /// At or below this many particles the pairwise detector is used.
    pub spatial_partition_threshold: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_enabled: true,
            damping_enabled: true,
            boundaries_enabled: true,
            collisions_enabled: true,
            spatial_partitioning_enabled: true,
            gravity_constant: 2000.0,
            min_distance: 5.0,
            max_acceleration: 150.0,
            damping_factor: 0.999,
            base_max_velocity: 120.0,
            velocity_headroom: 1.5,
            restitution: 0.8,
            spatial_partition_threshold: 50,
        }
    }
}

/// Probability of each ability, used both for the initial roll and, when
/// inheriting, as a per-ability gate.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AbilityChances {
    pub eating: f64,
    pub splitting: f64,
    pub reproduction: f64,
    pub phasing: f64,
    pub chase: f64,
    pub flee: f64,
    pub speed_burst: f64,
    pub custom_attraction: f64,
    pub energy_transfer: f64,
    pub camouflage: f64,
}

impl Default for AbilityChances {
    fn default() -> Self {
        Self {
            eating: 0.6,
            splitting: 0.3,
            reproduction: 0.4,
            phasing: 0.2,
            chase: 0.5,
            flee: 0.5,
            speed_burst: 0.3,
            custom_attraction: 0.0,
            energy_transfer: 0.0,
            camouflage: 0.0,
        }
    }
}

impl AbilityChances {
    pub fn chance(&self, kind: AbilityKind) -> f64 {
        match kind {
            AbilityKind::Eating => self.eating,
            AbilityKind::Splitting => self.splitting,
            AbilityKind::Reproduction => self.reproduction,
            AbilityKind::Phasing => self.phasing,
            AbilityKind::Chase => self.chase,
            AbilityKind::Flee => self.flee,
            AbilityKind::SpeedBurst => self.speed_burst,
            AbilityKind::CustomAttraction => self.custom_attraction,
            AbilityKind::EnergyTransfer => self.energy_transfer,
            AbilityKind::Camouflage => self.camouflage,
        }
    }

    fn all(&self) -> [f64; 10] {
        [
            self.eating,
            self.splitting,
            self.reproduction,
            self.phasing,
            self.chase,
            self.flee,
            self.speed_burst,
            self.custom_attraction,
            self.energy_transfer,
            self.camouflage,
        ]
    }
}

/// Cooldown, in seconds, triggered after each discrete ability.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CooldownConfig {
    pub eating: f64,
    pub splitting: f64,
    pub reproduction: f64,
    pub phasing: f64,
    pub speed_burst: f64,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            eating: 0.5,
            splitting: 6.0,
            reproduction: 8.0,
            phasing: 5.0,
            speed_burst: 4.0,
        }
    }
}

impl CooldownConfig {
    /// Continuous and inert abilities have no cooldown.
    pub fn for_kind(&self, kind: AbilityKind) -> f64 {
        match kind {
            AbilityKind::Eating => self.eating,
            AbilityKind::Splitting => self.splitting,
            AbilityKind::Reproduction => self.reproduction,
            AbilityKind::Phasing => self.phasing,
            AbilityKind::SpeedBurst => self.speed_burst,
            _ => 0.0,
        }
    }
}

/// Ability layer: decision thresholds and per-ability effect sizes.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Master switch for the whole behavior layer.
    pub enabled: bool,
    pub ability_chances: AbilityChances,
    /// Per-ability chance that reproduction offspring keep a parent ability.
    pub inheritance_chance: f64,
    /// Per-ability chance that an eater picks up an ability from its prey.
    pub eat_inherit_chance: f64,
    pub size_ratio_for_eating: f64,
    pub mass_transfer_fraction: f64,
    pub energy_transfer_fraction: f64,
    /// Threats inside this fraction of the vision range trigger survival.
    pub danger_distance_fraction: f64,
    /// Extra gap allowed between two disks for them to count as touching.
    pub touch_margin: f64,
    pub hunger_threshold: f64,
    pub reproduction_energy_threshold: f64,
    pub split_mass_fraction: f64,
    pub split_energy_threshold: f64,
    pub min_mass: f64,
    pub max_mass: f64,
    pub chase_force: f64,
    pub chase_energy_cost: f64,
    pub flee_force: f64,
    pub flee_energy_cost: f64,
    pub split_min_energy: f64,
    pub split_offspring_energy_fraction: f64,
    pub separation_impulse: f64,
    pub reproduction_mass_headroom: f64,
    pub reproduction_min_energy: f64,
    pub reproduction_mass_fraction_min: f64,
    pub reproduction_mass_fraction_max: f64,
    pub reproduction_energy_fraction_min: f64,
    pub reproduction_energy_fraction_max: f64,
    pub max_offspring_size_ratio: f64,
    pub phasing_duration: f64,
    pub phasing_cost_fraction: f64,
    pub speed_burst_duration: f64,
    pub speed_burst_cost: f64,
    /// Velocity cap multiplier while the boost is active.
    pub speed_burst_multiplier: f64,
    /// One-time velocity multiplier applied when the burst fires.
    pub speed_burst_impulse: f64,
    pub birthing_duration: f64,
    pub cooldowns: CooldownConfig,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ability_chances: AbilityChances::default(),
            inheritance_chance: 0.7,
            eat_inherit_chance: 0.1,
            size_ratio_for_eating: 1.25,
            mass_transfer_fraction: 0.85,
            energy_transfer_fraction: 0.5,
            danger_distance_fraction: 0.4,
            touch_margin: 1.0,
            hunger_threshold: 0.4,
            reproduction_energy_threshold: 0.8,
            split_mass_fraction: 0.6,
            split_energy_threshold: 0.5,
            min_mass: 1.0,
            max_mass: 60.0,
            chase_force: 120.0,
            chase_energy_cost: 1.5,
            flee_force: 150.0,
            flee_energy_cost: 1.5,
            split_min_energy: 10.0,
            split_offspring_energy_fraction: 0.5,
            separation_impulse: 30.0,
            reproduction_mass_headroom: 2.0,
            reproduction_min_energy: 20.0,
            reproduction_mass_fraction_min: 0.2,
            reproduction_mass_fraction_max: 0.4,
            reproduction_energy_fraction_min: 0.2,
            reproduction_energy_fraction_max: 0.4,
            max_offspring_size_ratio: 0.5,
            phasing_duration: 1.5,
            phasing_cost_fraction: 0.15,
            speed_burst_duration: 1.0,
            speed_burst_cost: 8.0,
            speed_burst_multiplier: 1.8,
            speed_burst_impulse: 1.3,
            birthing_duration: 1.0,
            cooldowns: CooldownConfig::default(),
        }
    }
}

/// Global clamp range for one inherited threshold.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRange {
    pub min: f64,
    pub max: f64,
}

impl ThresholdRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    fn is_valid(&self) -> bool {
        self.min >= 0.0 && self.max <= 1.0 && self.min <= self.max
    }
}

/// Energy economy: capacity, drain, ambient gain and energy↔mass conversion.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EnergyConfig {
    pub base_energy_capacity: f64,
    pub reference_mass: f64,
    pub initial_energy_fraction_min: f64,
    pub initial_energy_fraction_max: f64,
    pub ambient_gain_enabled: bool,
    pub ambient_gain_rate: f64,
    /// Drain per second is `passive_drain_rate · mass^0.67`.
    pub passive_drain_rate: f64,
    /// Energy units converted per second at most, in either direction.
    pub conversion_rate: f64,
    pub energy_to_mass_range: ThresholdRange,
    pub mass_to_energy_range: ThresholdRange,
    pub energy_abundance_range: ThresholdRange,
    pub energy_conservation_range: ThresholdRange,
    /// Half-width of the symmetric variance applied to inherited thresholds.
    pub threshold_variance: f64,
    pub min_speed_multiplier: f64,
    pub max_speed_multiplier: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            base_energy_capacity: 100.0,
            reference_mass: 10.0,
            initial_energy_fraction_min: 0.5,
            initial_energy_fraction_max: 1.0,
            ambient_gain_enabled: true,
            ambient_gain_rate: 2.0,
            passive_drain_rate: 0.5,
            conversion_rate: 20.0,
            energy_to_mass_range: ThresholdRange::new(0.7, 0.95),
            mass_to_energy_range: ThresholdRange::new(0.05, 0.35),
            energy_abundance_range: ThresholdRange::new(0.5, 0.9),
            energy_conservation_range: ThresholdRange::new(0.1, 0.5),
            threshold_variance: 0.05,
            min_speed_multiplier: 0.6,
            max_speed_multiplier: 1.4,
        }
    }
}

impl EnergyConfig {
    /// Energy capacity of a body of the given mass.
    #[inline]
    pub fn max_energy_for(&self, mass: f64) -> f64 {
        mass * (self.base_energy_capacity / self.reference_mass)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct VisionConfig {
    pub vision_range_multiplier: f64,
    /// Camouflaged particles are only visible within this fraction of range.
    pub camouflage_visibility_factor: f64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            vision_range_multiplier: 8.0,
            camouflage_visibility_factor: 0.3,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub physics: PhysicsConfig,
    pub behavior: BehaviorConfig,
    pub energy: EnergyConfig,
    pub vision: VisionConfig,
}

fn unit(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

fn finite_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn finite_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    ///
    /// # Validation Rules
    /// - World dimensions positive, radius bounds ordered and fitting the world
    /// - Every numeric parameter finite
    /// - Rates, forces and durations non-negative
    /// - Probabilities and fractions in `[0.0, 1.0]`
    /// - Mass bounds ordered and compatible with the radius bounds
    pub fn validate(&self) -> anyhow::Result<()> {
        let w = &self.world;
        anyhow::ensure!(finite_positive(w.width), "World width must be positive");
        anyhow::ensure!(finite_positive(w.height), "World height must be positive");
        anyhow::ensure!(
            w.initial_population <= 10_000,
            "Initial population too large (max 10000)"
        );
        anyhow::ensure!(finite_positive(w.min_radius), "Minimum radius must be positive");
        anyhow::ensure!(
            w.max_radius.is_finite() && w.min_radius <= w.max_radius,
            "Minimum radius must not exceed maximum radius"
        );
        anyhow::ensure!(
            w.max_radius * 2.0 < w.width.min(w.height),
            "Maximum radius must fit inside the world"
        );
        anyhow::ensure!(finite_positive(w.density), "Density must be positive");
        anyhow::ensure!(
            finite_non_negative(w.initial_speed),
            "Initial speed must be non-negative"
        );

        let p = &self.physics;
        anyhow::ensure!(
            finite_non_negative(p.gravity_constant),
            "Gravity constant must be non-negative"
        );
        anyhow::ensure!(
            finite_positive(p.min_distance),
            "Minimum distance must be positive"
        );
        anyhow::ensure!(
            finite_positive(p.max_acceleration),
            "Maximum acceleration must be positive"
        );
        anyhow::ensure!(unit(p.damping_factor), "Damping factor must be in [0.0, 1.0]");
        anyhow::ensure!(
            finite_positive(p.base_max_velocity) && finite_positive(p.velocity_headroom),
            "Velocity caps must be positive"
        );
        anyhow::ensure!(unit(p.restitution), "Restitution must be in [0.0, 1.0]");

        let b = &self.behavior;
        anyhow::ensure!(
            b.ability_chances.all().iter().all(|c| unit(*c)),
            "Ability chances must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            unit(b.inheritance_chance) && unit(b.eat_inherit_chance),
            "Inheritance chances must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            b.size_ratio_for_eating.is_finite() && b.size_ratio_for_eating >= 1.0,
            "Size ratio for eating must be at least 1.0"
        );
        anyhow::ensure!(
            unit(b.mass_transfer_fraction) && unit(b.energy_transfer_fraction),
            "Transfer fractions must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            unit(b.danger_distance_fraction),
            "Danger distance fraction must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            finite_non_negative(b.touch_margin),
            "Touch margin must be non-negative"
        );
        anyhow::ensure!(
            unit(b.hunger_threshold)
                && unit(b.reproduction_energy_threshold)
                && unit(b.split_mass_fraction)
                && unit(b.split_energy_threshold),
            "Decision thresholds must be in [0.0, 1.0]"
        );
        anyhow::ensure!(finite_positive(b.min_mass), "Minimum mass must be positive");
        anyhow::ensure!(
            b.max_mass.is_finite() && b.min_mass < b.max_mass,
            "Minimum mass must be below maximum mass"
        );
        let max_radius_for_mass = (b.max_mass / w.density).sqrt();
        anyhow::ensure!(
            max_radius_for_mass * 2.0 < w.width.min(w.height),
            "Maximum mass produces particles larger than the world"
        );
        anyhow::ensure!(
            [b.chase_force, b.flee_force, b.chase_energy_cost, b.flee_energy_cost]
                .into_iter()
                .all(finite_non_negative),
            "Chase and flee parameters must be non-negative"
        );
        anyhow::ensure!(
            unit(b.split_offspring_energy_fraction),
            "Split offspring energy fraction must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            finite_non_negative(b.separation_impulse),
            "Separation impulse must be non-negative"
        );
        anyhow::ensure!(
            unit(b.reproduction_mass_fraction_min)
                && unit(b.reproduction_mass_fraction_max)
                && b.reproduction_mass_fraction_min <= b.reproduction_mass_fraction_max,
            "Reproduction mass fractions must be an ordered range in [0.0, 1.0]"
        );
        anyhow::ensure!(
            unit(b.reproduction_energy_fraction_min)
                && unit(b.reproduction_energy_fraction_max)
                && b.reproduction_energy_fraction_min <= b.reproduction_energy_fraction_max,
            "Reproduction energy fractions must be an ordered range in [0.0, 1.0]"
        );
        anyhow::ensure!(
            unit(b.max_offspring_size_ratio),
            "Maximum offspring size ratio must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            unit(b.phasing_cost_fraction),
            "Phasing cost fraction must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            [b.phasing_duration, b.speed_burst_duration, b.birthing_duration]
                .into_iter()
                .all(finite_non_negative),
            "Durations must be non-negative"
        );
        anyhow::ensure!(
            [b.speed_burst_multiplier, b.speed_burst_impulse]
                .into_iter()
                .all(|m| m.is_finite() && m >= 1.0),
            "Speed burst multipliers must be at least 1.0"
        );
        let c = &b.cooldowns;
        anyhow::ensure!(
            [c.eating, c.splitting, c.reproduction, c.phasing, c.speed_burst]
                .into_iter()
                .all(finite_non_negative),
            "Cooldowns must be non-negative"
        );

        let e = &self.energy;
        anyhow::ensure!(
            finite_positive(e.base_energy_capacity) && finite_positive(e.reference_mass),
            "Energy capacity and reference mass must be positive"
        );
        anyhow::ensure!(
            unit(e.initial_energy_fraction_min)
                && unit(e.initial_energy_fraction_max)
                && e.initial_energy_fraction_min <= e.initial_energy_fraction_max
                && e.initial_energy_fraction_max > 0.0,
            "Initial energy fractions must be an ordered, non-empty range in [0.0, 1.0]"
        );
        anyhow::ensure!(
            [e.ambient_gain_rate, e.passive_drain_rate, e.conversion_rate]
                .into_iter()
                .all(finite_non_negative),
            "Energy rates must be non-negative"
        );
        anyhow::ensure!(
            e.energy_to_mass_range.is_valid()
                && e.mass_to_energy_range.is_valid()
                && e.energy_abundance_range.is_valid()
                && e.energy_conservation_range.is_valid(),
            "Threshold ranges must be ordered and within [0.0, 1.0]"
        );
        anyhow::ensure!(
            finite_non_negative(e.threshold_variance),
            "Threshold variance must be non-negative"
        );
        anyhow::ensure!(
            e.min_speed_multiplier > 0.0
                && e.min_speed_multiplier <= 1.0
                && e.max_speed_multiplier.is_finite()
                && e.max_speed_multiplier >= 1.0,
            "Speed multipliers must bracket 1.0"
        );

        let v = &self.vision;
        anyhow::ensure!(
            finite_non_negative(v.vision_range_multiplier),
            "Vision range multiplier must be non-negative"
        );
        anyhow::ensure!(
            unit(v.camouflage_visibility_factor),
            "Camouflage visibility factor must be in [0.0, 1.0]"
        );

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Stable digest of every tunable, for tagging run outputs.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.physics).as_bytes());
        hasher.update(format!("{:?}", self.behavior).as_bytes());
        hasher.update(format!("{:?}", self.energy).as_bytes());
        hasher.update(format!("{:?}", self.vision).as_bytes());
        hex::encode(hasher.finalize())
    }
}

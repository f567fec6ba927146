//! Per-tick energy economy for behavior particles.
//!
//! Order within a tick: ambient gain, passive drain, energy/mass conversion,
//! then the movement speed multiplier. Energy is clamped after each step.

use crate::config::{AppConfig, EnergyConfig};
use motile_data::{Behavior, Body};

/// Energy units per unit of mass in either conversion direction.
pub const ENERGY_PER_MASS: f64 = 10.0;
/// Passive drain grows sub-linearly with mass.
pub const DRAIN_MASS_EXPONENT: f64 = 0.67;

/// Changes mass, letting radius and energy capacity follow.
pub fn set_mass(body: &mut Body, behavior: &mut Behavior, config: &EnergyConfig, mass: f64) {
    body.set_mass(mass);
    behavior.max_energy = config.max_energy_for(body.mass);
    behavior.clamp_energy();
}

pub fn update_energy(body: &mut Body, behavior: &mut Behavior, config: &AppConfig, dt: f64) {
    let energy = &config.energy;

    if energy.ambient_gain_enabled {
        behavior.add_energy(energy.ambient_gain_rate * dt);
    }

    let drain = energy.passive_drain_rate * body.mass.powf(DRAIN_MASS_EXPONENT) * dt;
    behavior.energy -= drain;
    behavior.clamp_energy();

    convert(body, behavior, config, dt);
    behavior.movement_speed_multiplier = speed_multiplier(behavior, energy);
}

/// Surplus energy becomes mass above the particle's `energy_to_mass`
/// threshold; mass is burned for energy below `mass_to_energy`.
fn convert(body: &mut Body, behavior: &mut Behavior, config: &AppConfig, dt: f64) {
    let limits = &config.behavior;
    let fraction = behavior.energy_fraction();
    let budget = config.energy.conversion_rate * dt;

    if fraction > behavior.thresholds.energy_to_mass && body.mass < limits.max_mass {
        let surplus = behavior.energy - behavior.thresholds.energy_to_mass * behavior.max_energy;
        let spent = surplus.min(budget).max(0.0);
        let gain = (spent / ENERGY_PER_MASS).min(limits.max_mass - body.mass);
        if gain > 0.0 {
            behavior.energy -= gain * ENERGY_PER_MASS;
            set_mass(body, behavior, &config.energy, body.mass + gain);
        }
    } else if fraction < behavior.thresholds.mass_to_energy && body.mass > limits.min_mass {
        let loss = (budget / ENERGY_PER_MASS).min(body.mass - limits.min_mass);
        if loss > 0.0 {
            set_mass(body, behavior, &config.energy, body.mass - loss);
            behavior.add_energy(loss * ENERGY_PER_MASS);
        }
    }
    behavior.clamp_energy();
}

/// Faster above the abundance threshold, slower below conservation.
pub fn speed_multiplier(behavior: &Behavior, config: &EnergyConfig) -> f64 {
    let fraction = behavior.energy_fraction();
    let abundance = behavior.thresholds.energy_abundance;
    let conservation = behavior.thresholds.energy_conservation;

    if fraction > abundance && abundance < 1.0 {
        let t = ((fraction - abundance) / (1.0 - abundance)).clamp(0.0, 1.0);
        1.0 + t * (config.max_speed_multiplier - 1.0)
    } else if fraction < conservation && conservation > 0.0 {
        let t = ((conservation - fraction) / conservation).clamp(0.0, 1.0);
        1.0 - t * (1.0 - config.min_speed_multiplier)
    } else {
        1.0
    }
}

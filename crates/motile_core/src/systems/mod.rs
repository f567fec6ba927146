/// Ability execution, one module per ability
pub mod abilities;
/// Per-tick ability selection
pub mod decision;
/// Ambient gain, drain and energy/mass conversion
pub mod energy;
/// Gravity, damping, integration and boundary handling
pub mod physics;
/// Vision range and visibility queries
pub mod vision;

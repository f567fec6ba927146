pub use motile_core::{
    init_logging, AppConfig, LifecycleObserver, Metrics, NullObserver, Simulation,
    SimulationStats,
};
pub mod config {
    pub use motile_core::config::*;
}
pub mod collision {
    pub use motile_core::collision::*;
}
pub mod lifecycle {
    pub use motile_core::lifecycle::*;
}
pub mod snapshot {
    pub use motile_core::snapshot::*;
}
pub mod spatial_hash {
    pub use motile_core::spatial_hash::*;
}
pub mod systems {
    pub use motile_core::systems::*;
}
pub mod data {
    pub use motile_data::*;
}

pub mod config;
pub mod geofence;
pub mod query;
pub mod spawns;
pub mod storage;

// Re-exports for convenience
pub use config::{AppConfig, AppConfigExt};
pub use geofence::{Geofence, PolygonFence};
pub use query::{QueryError, SpawnStore};
pub use spawns::{
    DespawnFilter, SpawnAccessor, SpawnRepository, next_spawns, next_spawns_now,
    project_window_start,
};
pub use spawnwatch_types::*;

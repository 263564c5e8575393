//! Storage module for the spawn point table.
//!
//! The table lives in a single parquet file (`spawnpoints.parquet` by default)
//! with one row per spawn point. The despawn column is nullable text in `MM:SS`
//! form. Coordinates are nullable in the file but rows without them are never
//! returned by queries.

mod error;
mod import;
mod reader;
mod writer;

pub use error::StorageError;
pub use import::{ImportRecord, ImportSummary, import_json_file, parse_import};
pub use reader::read_spawn_file;
pub use writer::{SpawnWriter, conform_batch, spawn_schema, write_batches};

use std::path::PathBuf;

/// Column names, in schema order.
pub mod columns {
    pub const ID: &str = "id";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const EVENT_ID: &str = "event_id";
    pub const DESPAWN: &str = "despawn_minsec";
    pub const SPAWNDEF: &str = "spawndef";
}

pub const SPAWN_FILENAME: &str = "spawnpoints.parquet";

/// Default location of the spawn point parquet file.
pub fn default_spawn_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spawnwatch")
        .join(SPAWN_FILENAME)
}

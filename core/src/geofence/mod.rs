//! Geofences used to scope spawn point queries.
//!
//! A fence is consumed in two stages: its [`BoundingBox`] is pushed into the
//! storage scan, and [`Geofence::contains`] refines the scanned rows in memory.

mod error;
mod loader;
mod polygon;

pub use error::GeofenceError;
pub use loader::{load_fence, load_fences_from_file, parse_fences};
pub use polygon::PolygonFence;

use spawnwatch_types::{BoundingBox, Coordinate};

/// An area with a cheap rectangular pre-filter and an exact inclusion test.
pub trait Geofence {
    fn bounding_box(&self) -> BoundingBox;

    fn contains(&self, coordinate: Coordinate) -> bool;
}

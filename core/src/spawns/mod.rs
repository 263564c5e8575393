//! Spawn point access and next-spawn projection.
//!
//! [`SpawnAccessor`] runs the two-stage area filter over a [`SpawnRepository`]:
//! a bounding-box scan in storage, then [`refine`] against the exact fence.
//! The projector turns refined known-despawn records into upcoming window starts.

mod accessor;
mod error;
mod projector;
mod repository;

#[cfg(test)]
mod accessor_tests;
#[cfg(test)]
mod projector_tests;
#[cfg(test)]
mod test_support;

pub use accessor::{SpawnAccessor, refine};
pub use error::ProjectionError;
pub use projector::{next_spawns, next_spawns_now, project_window_start};
pub use repository::{DespawnFilter, SpawnRepository};

//! Shared fixtures for spawn tests

use datafusion::error::DataFusionError;
use hashbrown::HashSet;

use spawnwatch_types::{BoundingBox, EventId, EventScope, SpawnId, SpawnPoint};

use super::{DespawnFilter, SpawnRepository};
use crate::query::QueryError;

/// Repository whose storage is gone: every call fails with an I/O error.
pub struct UnavailableRepository;

pub fn storage_error() -> QueryError {
    QueryError::DataFusion(DataFusionError::IoError(std::io::Error::other(
        "spawn storage unavailable",
    )))
}

pub fn is_storage_error(err: &QueryError) -> bool {
    matches!(err, QueryError::DataFusion(DataFusionError::IoError(_)))
}

impl SpawnRepository for UnavailableRepository {
    async fn get(&self, _id: SpawnId) -> Result<Option<SpawnPoint>, QueryError> {
        Err(storage_error())
    }

    async fn get_all(&self, _ids: Option<&HashSet<SpawnId>>) -> Result<Vec<SpawnPoint>, QueryError> {
        Err(storage_error())
    }

    async fn scan_bounds(
        &self,
        _bounds: &BoundingBox,
        _scope: &EventScope,
        _despawn: DespawnFilter,
    ) -> Result<Vec<SpawnPoint>, QueryError> {
        Err(storage_error())
    }

    async fn retag(&self, _ids: &HashSet<SpawnId>, _event_id: EventId) -> Result<(), QueryError> {
        Err(storage_error())
    }
}

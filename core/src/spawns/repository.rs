use std::future::Future;

use hashbrown::HashSet;
use spawnwatch_types::{BoundingBox, EventId, EventScope, SpawnId, SpawnPoint};

use crate::query::QueryError;

/// Which despawn timings a bounding-box scan keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DespawnFilter {
    #[default]
    Any,
    UnknownOnly,
    KnownOnly,
}

impl DespawnFilter {
    pub fn only_unknown(only_unknown: bool) -> Self {
        if only_unknown {
            DespawnFilter::UnknownOnly
        } else {
            DespawnFilter::Any
        }
    }
}

/// Storage contract for spawn point records.
///
/// Implementations own consistency: each call sees a consistent snapshot and
/// [`retag`](SpawnRepository::retag) is applied as one atomic batch.
pub trait SpawnRepository: Send + Sync {
    fn get(&self, id: SpawnId) -> impl Future<Output = Result<Option<SpawnPoint>, QueryError>> + Send;

    /// All records, or only those whose id is in `ids`.
    fn get_all(
        &self,
        ids: Option<&HashSet<SpawnId>>,
    ) -> impl Future<Output = Result<Vec<SpawnPoint>, QueryError>> + Send;

    /// Coarse scan: event id in `scope` and coordinates inside `bounds` (inclusive edges).
    fn scan_bounds(
        &self,
        bounds: &BoundingBox,
        scope: &EventScope,
        despawn: DespawnFilter,
    ) -> impl Future<Output = Result<Vec<SpawnPoint>, QueryError>> + Send;

    fn retag(
        &self,
        ids: &HashSet<SpawnId>,
        event_id: EventId,
    ) -> impl Future<Output = Result<(), QueryError>> + Send;
}

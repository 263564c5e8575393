use hashbrown::HashSet;
use spawnwatch_types::{EventId, EventScope, SpawnId, SpawnPoint};

use super::{DespawnFilter, SpawnRepository};
use crate::geofence::Geofence;
use crate::query::QueryError;

/// Exact-inclusion stage of the area filter.
pub fn refine<G: Geofence + ?Sized>(fence: &G, spawns: Vec<SpawnPoint>) -> Vec<SpawnPoint> {
    spawns
        .into_iter()
        .filter(|spawn| fence.contains(spawn.location))
        .collect()
}

/// Read and retag access to spawn points. Holds no state besides the repository;
/// every call goes to storage.
pub struct SpawnAccessor<R> {
    repo: R,
}

impl<R: SpawnRepository> SpawnAccessor<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub async fn get_by_id(&self, id: SpawnId) -> Result<Option<SpawnPoint>, QueryError> {
        self.repo.get(id).await
    }

    pub async fn get_all(
        &self,
        ids: Option<&HashSet<SpawnId>>,
    ) -> Result<Vec<SpawnPoint>, QueryError> {
        self.repo.get_all(ids).await
    }

    /// Spawn points in `scope` that lie inside `area`. With `only_unknown_despawn`
    /// only points whose despawn time is not yet known are returned.
    ///
    /// A missing area is not an error: it yields no spawns and logs a warning.
    pub async fn get_in_area<G: Geofence + ?Sized>(
        &self,
        area: Option<&G>,
        scope: &EventScope,
        only_unknown_despawn: bool,
    ) -> Result<Vec<SpawnPoint>, QueryError> {
        self.scan_area(area, scope, DespawnFilter::only_unknown(only_unknown_despawn))
            .await
    }

    /// Every spawn point in the area, known despawn time or not.
    pub async fn get_known_of_area<G: Geofence + ?Sized>(
        &self,
        area: Option<&G>,
        scope: &EventScope,
    ) -> Result<Vec<SpawnPoint>, QueryError> {
        self.get_in_area(area, scope, false).await
    }

    /// Spawn points in the area whose despawn time is still unknown.
    pub async fn get_known_without_despawn_of_area<G: Geofence + ?Sized>(
        &self,
        area: Option<&G>,
        scope: &EventScope,
    ) -> Result<Vec<SpawnPoint>, QueryError> {
        self.get_in_area(area, scope, true).await
    }

    /// Spawn points in the area with a known despawn time.
    pub async fn get_known_despawn_in_area<G: Geofence + ?Sized>(
        &self,
        area: Option<&G>,
        scope: &EventScope,
    ) -> Result<Vec<SpawnPoint>, QueryError> {
        self.scan_area(area, scope, DespawnFilter::KnownOnly).await
    }

    async fn scan_area<G: Geofence + ?Sized>(
        &self,
        area: Option<&G>,
        scope: &EventScope,
        despawn: DespawnFilter,
    ) -> Result<Vec<SpawnPoint>, QueryError> {
        let Some(fence) = area else {
            tracing::warn!("No geofence was passed, returning empty list of spawns");
            return Ok(Vec::new());
        };

        let candidates = self
            .repo
            .scan_bounds(&fence.bounding_box(), scope, despawn)
            .await?;
        debug_assert!(candidates.iter().all(|spawn| scope.includes(spawn.event_id)));
        let scanned = candidates.len();
        let spawns = refine(fence, candidates);
        tracing::debug!(scanned, inside = spawns.len(), "Refined spawns against geofence");
        Ok(spawns)
    }

    /// Move every spawn point in `ids` to `event_id` in one atomic update.
    pub async fn retag_to_event(
        &self,
        ids: &HashSet<SpawnId>,
        event_id: EventId,
    ) -> Result<(), QueryError> {
        self.repo.retag(ids, event_id).await
    }
}

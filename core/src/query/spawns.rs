//! Spawn point lookups and scans.

use datafusion::arrow::record_batch::RecordBatch;
use datafusion::prelude::SessionContext;
use hashbrown::HashSet;

use spawnwatch_types::{
    BoundingBox, Coordinate, DespawnTiming, EventId, EventScope, MinuteSecond, SpawnId,
    SpawnPoint,
};

use super::column_helpers::*;
use super::{QueryError, SpawnStore, TABLE, retag, run_sql};
use crate::spawns::{DespawnFilter, SpawnRepository};

const COLUMNS: &str = "id, latitude, longitude, event_id, despawn_minsec, spawndef";
const HAS_COORDINATES: &str = "latitude IS NOT NULL AND longitude IS NOT NULL";

pub(super) fn id_list<I: std::fmt::Display>(ids: impl IntoIterator<Item = I>) -> String {
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Decode result rows in `COLUMNS` order.
/// Rows with a malformed despawn time are skipped with a warning.
fn decode(batches: &[RecordBatch]) -> Result<Vec<SpawnPoint>, QueryError> {
    let mut spawns = Vec::new();
    for batch in batches {
        let ids = col_i64(batch, 0)?;
        let latitudes = col_f64(batch, 1)?;
        let longitudes = col_f64(batch, 2)?;
        let event_ids = col_i32(batch, 3)?;
        let despawns = col_opt_strings(batch, 4)?;
        let spawndefs = col_i32(batch, 5)?;

        for i in 0..batch.num_rows() {
            let despawn = match despawns[i].as_deref().map(str::parse::<MinuteSecond>) {
                None => DespawnTiming::Unknown,
                Some(Ok(ms)) => DespawnTiming::Known(ms),
                Some(Err(e)) => {
                    tracing::warn!(spawn_id = ids[i], error = %e, "Skipping spawn point with malformed despawn time");
                    continue;
                }
            };
            spawns.push(SpawnPoint {
                id: ids[i],
                location: Coordinate::new(latitudes[i], longitudes[i]),
                event_id: event_ids[i],
                despawn,
                spawndef: spawndefs[i],
            });
        }
    }
    Ok(spawns)
}

pub(super) async fn fetch_all(
    ctx: &SessionContext,
    ids: Option<&HashSet<SpawnId>>,
) -> Result<Vec<SpawnPoint>, QueryError> {
    let id_filter = match ids {
        None => String::new(),
        Some(ids) if ids.is_empty() => return Ok(Vec::new()),
        Some(ids) => format!("AND id IN ({})", id_list(ids)),
    };
    let batches = run_sql(
        ctx,
        &format!("SELECT {COLUMNS} FROM {TABLE} WHERE {HAS_COORDINATES} {id_filter} ORDER BY id"),
    )
    .await?;
    decode(&batches)
}

async fn fetch_one(ctx: &SessionContext, id: SpawnId) -> Result<Option<SpawnPoint>, QueryError> {
    let batches = run_sql(
        ctx,
        &format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = {id} AND {HAS_COORDINATES} LIMIT 1"),
    )
    .await?;
    Ok(decode(&batches)?.into_iter().next())
}

async fn fetch_bounds(
    ctx: &SessionContext,
    bounds: &BoundingBox,
    scope: &EventScope,
    despawn: DespawnFilter,
) -> Result<Vec<SpawnPoint>, QueryError> {
    let edges = [bounds.min_lat, bounds.min_lon, bounds.max_lat, bounds.max_lon];
    if edges.iter().any(|v| !v.is_finite()) {
        tracing::warn!(?bounds, "Bounding box has non-finite edges, returning no spawns");
        return Ok(Vec::new());
    }

    let despawn_filter = match despawn {
        DespawnFilter::Any => "",
        DespawnFilter::UnknownOnly => "AND despawn_minsec IS NULL",
        DespawnFilter::KnownOnly => "AND despawn_minsec IS NOT NULL",
    };
    let event_ids: Vec<EventId> = scope.ids();

    let batches = run_sql(
        ctx,
        &format!(
            r#"
            SELECT {COLUMNS}
            FROM {TABLE}
            WHERE event_id IN ({events})
              AND latitude >= {min_lat}
              AND longitude >= {min_lon}
              AND latitude <= {max_lat}
              AND longitude <= {max_lon}
              {despawn_filter}
            ORDER BY id
        "#,
            events = id_list(event_ids),
            min_lat = bounds.min_lat,
            min_lon = bounds.min_lon,
            max_lat = bounds.max_lat,
            max_lon = bounds.max_lon,
        ),
    )
    .await?;

    let spawns = decode(&batches)?;
    tracing::debug!(count = spawns.len(), ?despawn, "Bounding box scan");
    Ok(spawns)
}

impl SpawnRepository for SpawnStore {
    async fn get(&self, id: SpawnId) -> Result<Option<SpawnPoint>, QueryError> {
        let state = self.state.read().await;
        fetch_one(&state.ctx, id).await
    }

    async fn get_all(&self, ids: Option<&HashSet<SpawnId>>) -> Result<Vec<SpawnPoint>, QueryError> {
        let state = self.state.read().await;
        fetch_all(&state.ctx, ids).await
    }

    async fn scan_bounds(
        &self,
        bounds: &BoundingBox,
        scope: &EventScope,
        despawn: DespawnFilter,
    ) -> Result<Vec<SpawnPoint>, QueryError> {
        let state = self.state.read().await;
        fetch_bounds(&state.ctx, bounds, scope, despawn).await
    }

    async fn retag(&self, ids: &HashSet<SpawnId>, event_id: EventId) -> Result<(), QueryError> {
        if ids.is_empty() {
            return Ok(());
        }
        let state = self.state.write().await;
        retag::apply(&state.ctx, ids, event_id).await
    }
}

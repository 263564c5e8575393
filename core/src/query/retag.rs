//! Bulk event retagging.

use datafusion::prelude::SessionContext;
use hashbrown::HashSet;

use spawnwatch_types::{EventId, SpawnId};

use super::spawns::id_list;
use super::{QueryError, TABLE, register_spawns, run_sql};
use crate::storage::conform_batch;

/// Rewrite `event_id` for every row in `ids` and swap the rebuilt table in.
/// Callers must hold the store's write lock.
pub(super) async fn apply(
    ctx: &SessionContext,
    ids: &HashSet<SpawnId>,
    event_id: EventId,
) -> Result<(), QueryError> {
    let batches = run_sql(
        ctx,
        &format!(
            r#"
            SELECT
                id,
                latitude,
                longitude,
                CASE WHEN id IN ({ids}) THEN CAST({event_id} AS INT) ELSE event_id END AS event_id,
                despawn_minsec,
                spawndef
            FROM {TABLE}
        "#,
            ids = id_list(ids),
        ),
    )
    .await?;

    let batches = batches
        .iter()
        .map(conform_batch)
        .collect::<Result<Vec<_>, _>>()?;
    register_spawns(ctx, batches)?;

    tracing::info!(count = ids.len(), event_id, "Retagged spawn points");
    Ok(())
}

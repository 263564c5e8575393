//! Next-spawn projection.
//!
//! Only the minute and second of a spawn's despawn are known, so each projection
//! anchors them to the hour of `now`:
//!
//! 1. Substitute minute/second into `now` (sub-seconds dropped).
//! 2. A minute strictly before the current minute refers to the next hour.
//! 3. A despawn at or before `now` is dropped, not pushed two cycles ahead.
//! 4. Window start = despawn - window length (60 min for `spawndef == 15`, else 30).
//! 5. A window start before `now` is moved one hour forward.

use chrono::{DateTime, Local, TimeDelta, TimeZone, Timelike};

use spawnwatch_types::{EventScope, MinuteSecond, NextSpawn, SpawnDuration};

use super::{ProjectionError, SpawnAccessor, SpawnRepository};
use crate::geofence::Geofence;
use crate::query::QueryError;

/// Start of the next window for a spawn despawning at `despawn`.
/// `Ok(None)` means this hour's despawn has already passed.
pub fn project_window_start<Tz: TimeZone>(
    despawn: MinuteSecond,
    duration: SpawnDuration,
    now: &DateTime<Tz>,
) -> Result<Option<DateTime<Tz>>, ProjectionError> {
    let mut candidate = now
        .with_minute(despawn.minute())
        .and_then(|t| t.with_second(despawn.second()))
        .and_then(|t| t.with_nanosecond(0))
        .ok_or(ProjectionError::InvalidLocalTime {
            minute: despawn.minute(),
            second: despawn.second(),
        })?;

    if despawn.minute() < now.minute() {
        candidate = candidate + TimeDelta::hours(1);
    }

    if candidate <= *now {
        return Ok(None);
    }

    let mut start = candidate - TimeDelta::minutes(duration.minutes());
    if start < *now {
        start = start + TimeDelta::hours(1);
    }
    Ok(Some(start))
}

/// Upcoming window starts for every known-despawn spawn point inside `area`.
///
/// Results follow the accessor's candidate order; callers wanting soonest-first
/// must sort.
pub async fn next_spawns<R, G, Tz>(
    accessor: &SpawnAccessor<R>,
    area: Option<&G>,
    scope: &EventScope,
    now: DateTime<Tz>,
) -> Result<Vec<NextSpawn>, QueryError>
where
    R: SpawnRepository,
    G: Geofence + ?Sized,
    Tz: TimeZone,
{
    let candidates = accessor.get_known_despawn_in_area(area, scope).await?;

    let mut next_up = Vec::with_capacity(candidates.len());
    for spawn in candidates {
        let Some(despawn) = spawn.despawn.known() else {
            continue;
        };
        match project_window_start(despawn, spawn.duration(), &now) {
            Ok(Some(start)) => next_up.push(NextSpawn {
                timestamp: start.timestamp(),
                location: spawn.location,
            }),
            Ok(None) => {
                tracing::trace!(spawn_id = spawn.id, %despawn, "Despawn already passed this hour");
            }
            Err(e) => {
                tracing::warn!(spawn_id = spawn.id, error = %e, "Skipping spawn point projection");
            }
        }
    }

    tracing::debug!(count = next_up.len(), "Projected next spawns");
    Ok(next_up)
}

/// [`next_spawns`] against the local wall clock, sampled once.
pub async fn next_spawns_now<R, G>(
    accessor: &SpawnAccessor<R>,
    area: Option<&G>,
    scope: &EventScope,
) -> Result<Vec<NextSpawn>, QueryError>
where
    R: SpawnRepository,
    G: Geofence + ?Sized,
{
    next_spawns(accessor, area, scope, Local::now()).await
}

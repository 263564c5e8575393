//! Import of spawn point dumps in JSON form.
//!
//! The input is an array of records:
//!
//! ```json
//! [{"id": 17, "latitude": 52.52, "longitude": 13.40, "despawn": "12:30", "spawndef": 15}]
//! ```
//!
//! `event_id`, `despawn` and `spawndef` are optional.

use hashbrown::HashSet;
use serde::Deserialize;
use std::path::Path;

use spawnwatch_types::{
    BASE_EVENT_ID, Coordinate, DEFAULT_SPAWNDEF, DespawnTiming, EventId, MinuteSecond, SpawnId,
    SpawnPoint,
};

use super::StorageError;

#[derive(Debug, Clone, Deserialize)]
pub struct ImportRecord {
    pub id: SpawnId,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub event_id: Option<EventId>,
    #[serde(default)]
    pub despawn: Option<String>,
    #[serde(default)]
    pub spawndef: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub spawns: Vec<SpawnPoint>,
    pub skipped: usize,
}

impl ImportRecord {
    /// Convert to a spawn point. Records missing a coordinate or carrying a
    /// malformed despawn time are rejected individually.
    fn into_spawn(self) -> Option<SpawnPoint> {
        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            tracing::warn!(spawn_id = self.id, "Skipping spawn point without coordinates");
            return None;
        };

        let despawn = match self.despawn.as_deref().map(str::parse::<MinuteSecond>) {
            None => DespawnTiming::Unknown,
            Some(Ok(ms)) => DespawnTiming::Known(ms),
            Some(Err(e)) => {
                tracing::warn!(spawn_id = self.id, error = %e, "Skipping spawn point with malformed despawn time");
                return None;
            }
        };

        Some(SpawnPoint {
            id: self.id,
            location: Coordinate::new(latitude, longitude),
            event_id: self.event_id.unwrap_or(BASE_EVENT_ID),
            despawn,
            spawndef: self.spawndef.unwrap_or(DEFAULT_SPAWNDEF),
        })
    }
}

/// Parse a JSON spawn dump. The first usable record for an id wins; later ones are skipped.
pub fn parse_import(content: &str) -> Result<ImportSummary, serde_json::Error> {
    let records: Vec<ImportRecord> = serde_json::from_str(content)?;
    let total = records.len();
    let mut seen = HashSet::with_capacity(total);
    let spawns: Vec<SpawnPoint> = records
        .into_iter()
        .filter_map(ImportRecord::into_spawn)
        .filter(|spawn| {
            let first = seen.insert(spawn.id);
            if !first {
                tracing::warn!(spawn_id = spawn.id, "Skipping duplicate spawn point id");
            }
            first
        })
        .collect();
    Ok(ImportSummary {
        skipped: total - spawns.len(),
        spawns,
    })
}

pub fn import_json_file(path: &Path) -> Result<ImportSummary, StorageError> {
    let content = std::fs::read_to_string(path).map_err(|source| StorageError::OpenFile {
        path: path.to_path_buf(),
        source,
    })?;
    let summary = parse_import(&content).map_err(|source| StorageError::ParseImport {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        imported = summary.spawns.len(),
        skipped = summary.skipped,
        "Imported spawn points"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_defaults_and_rejections() {
        let summary = parse_import(
            r#"[
                {"id": 1, "latitude": 1.0, "longitude": 2.0},
                {"id": 2, "latitude": 1.0, "longitude": 2.0, "despawn": "05:30", "spawndef": 15, "event_id": 3},
                {"id": 3, "latitude": 1.0, "longitude": 2.0, "despawn": "75:00"},
                {"id": 4, "latitude": null, "longitude": 2.0}
            ]"#,
        )
        .unwrap();

        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.spawns.len(), 2);

        let first = &summary.spawns[0];
        assert_eq!(first.event_id, BASE_EVENT_ID);
        assert_eq!(first.despawn, DespawnTiming::Unknown);
        assert_eq!(first.spawndef, DEFAULT_SPAWNDEF);

        let second = &summary.spawns[1];
        assert_eq!(second.event_id, 3);
        assert_eq!(second.despawn.known().map(|ms| ms.to_string()).as_deref(), Some("05:30"));
    }

    #[test]
    fn test_import_keeps_first_of_duplicate_ids() {
        let summary = parse_import(
            r#"[
                {"id": 1, "latitude": 5.0, "longitude": 2.0, "despawn": "10:00"},
                {"id": 2, "latitude": 6.0, "longitude": 2.0},
                {"id": 1, "latitude": 7.0, "longitude": 3.0}
            ]"#,
        )
        .unwrap();

        assert_eq!(summary.skipped, 1);
        let ids: Vec<SpawnId> = summary.spawns.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(summary.spawns[0].location, Coordinate::new(5.0, 2.0));
        assert!(summary.spawns[0].despawn.is_known());
    }
}

//! Tests for SpawnAccessor area queries and retagging
//!
//! The fence is a triangle covering half of its bounding box, so the
//! refine stage is exercised separately from the storage scan.

use hashbrown::HashSet;

use spawnwatch_types::{
    BoundingBox, Coordinate, DespawnTiming, EventScope, MinuteSecond, SpawnPoint,
};

use super::test_support::{UnavailableRepository, is_storage_error};
use super::{DespawnFilter, SpawnAccessor, SpawnRepository};
use crate::geofence::PolygonFence;
use crate::query::SpawnStore;
use crate::storage::parse_import;

fn spawn(id: i64, lat: f64, lon: f64, event_id: i32, despawn: Option<&str>) -> SpawnPoint {
    SpawnPoint {
        id,
        location: Coordinate::new(lat, lon),
        event_id,
        despawn: despawn
            .map(|raw| raw.parse::<MinuteSecond>().unwrap())
            .into(),
        spawndef: 240,
    }
}

/// Covers points with latitude >= longitude inside the 0..10 square
fn triangle() -> PolygonFence {
    PolygonFence::new(
        "triangle",
        vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(10.0, 0.0),
            Coordinate::new(10.0, 10.0),
        ],
    )
    .unwrap()
}

fn fixture() -> SpawnAccessor<SpawnStore> {
    let store = SpawnStore::from_spawns(vec![
        spawn(1, 5.0, 2.0, 1, None),
        spawn(2, 9.0, 1.0, 1, Some("10:00")),
        spawn(3, 1.0, 9.0, 1, None),          // in bbox, outside triangle
        spawn(4, 8.0, 3.0, 7, None),          // additional event
        spawn(5, 8.0, 4.0, 9, Some("20:00")), // unrelated event
        spawn(6, 30.0, 2.0, 1, None),         // outside bbox
        spawn(7, 7.0, 6.0, 1, Some("45:10")),
    ])
    .unwrap();
    SpawnAccessor::new(store)
}

fn ids(spawns: &[SpawnPoint]) -> Vec<i64> {
    let mut ids: Vec<i64> = spawns.iter().map(|s| s.id).collect();
    ids.sort_unstable();
    ids
}

fn id_set(ids: &[i64]) -> HashSet<i64> {
    ids.iter().copied().collect()
}

#[tokio::test]
async fn test_get_by_id() {
    let accessor = fixture();

    let found = accessor.get_by_id(2).await.unwrap().unwrap();
    assert_eq!(found.location, Coordinate::new(9.0, 1.0));
    assert_eq!(
        found.despawn,
        DespawnTiming::Known(MinuteSecond::new(10, 0).unwrap())
    );

    assert!(accessor.get_by_id(404).await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_all_with_and_without_ids() {
    let accessor = fixture();

    assert_eq!(ids(&accessor.get_all(None).await.unwrap()), vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(
        ids(&accessor.get_all(Some(&id_set(&[3, 5, 99]))).await.unwrap()),
        vec![3, 5]
    );
    assert!(accessor.get_all(Some(&HashSet::new())).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_area_respects_fence_and_scope() {
    let accessor = fixture();
    let fence = triangle();

    let base = accessor
        .get_in_area(Some(&fence), &EventScope::base(), false)
        .await
        .unwrap();
    assert_eq!(ids(&base), vec![1, 2, 7]);

    let with_event = accessor
        .get_in_area(Some(&fence), &EventScope::with_event(Some(7)), false)
        .await
        .unwrap();
    assert_eq!(ids(&with_event), vec![1, 2, 4, 7]);
}

#[tokio::test]
async fn test_unknown_only_is_subset() {
    let accessor = fixture();
    let fence = triangle();
    let scope = EventScope::with_event(Some(9));

    let all = accessor
        .get_known_of_area(Some(&fence), &scope)
        .await
        .unwrap();
    let unknown = accessor
        .get_known_without_despawn_of_area(Some(&fence), &scope)
        .await
        .unwrap();

    assert_eq!(ids(&all), vec![1, 2, 5, 7]);
    assert_eq!(ids(&unknown), vec![1]);
    assert!(unknown.iter().all(|s| !s.despawn.is_known()));
    assert!(unknown.iter().all(|s| all.contains(s)));
}

#[tokio::test]
async fn test_known_despawn_in_area() {
    let accessor = fixture();
    let known = accessor
        .get_known_despawn_in_area(Some(&triangle()), &EventScope::base())
        .await
        .unwrap();
    assert_eq!(ids(&known), vec![2, 7]);
}

#[tokio::test]
async fn test_missing_fence_returns_empty() {
    let accessor = fixture();
    let none: Option<&PolygonFence> = None;

    assert!(accessor.get_in_area(none, &EventScope::base(), false).await.unwrap().is_empty());
    assert!(accessor.get_in_area(none, &EventScope::base(), true).await.unwrap().is_empty());
    assert!(accessor
        .get_known_despawn_in_area(none, &EventScope::base())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_bounds_scan_edges_inclusive() {
    let accessor = fixture();
    let bounds = BoundingBox {
        min_lat: 5.0,
        min_lon: 1.0,
        max_lat: 9.0,
        max_lon: 2.0,
    };
    let scanned = accessor
        .repository()
        .scan_bounds(&bounds, &EventScope::base(), DespawnFilter::Any)
        .await
        .unwrap();
    assert_eq!(ids(&scanned), vec![1, 2]);
}

#[tokio::test]
async fn test_retag_is_visible_and_idempotent() {
    let accessor = fixture();
    let fence = triangle();
    let targets = id_set(&[1, 3]);

    accessor.retag_to_event(&targets, 7).await.unwrap();
    let once = accessor.get_all(None).await.unwrap();

    accessor.retag_to_event(&targets, 7).await.unwrap();
    let twice = accessor.get_all(None).await.unwrap();
    assert_eq!(once, twice);

    let event_of = |id: i64| once.iter().find(|s| s.id == id).unwrap().event_id;
    assert_eq!(event_of(1), 7);
    assert_eq!(event_of(3), 7);
    assert_eq!(event_of(2), 1);
    assert_eq!(event_of(5), 9);

    // Spawn 1 left the base event, spawn 3 is still outside the triangle
    let base = accessor
        .get_in_area(Some(&fence), &EventScope::base(), false)
        .await
        .unwrap();
    assert_eq!(ids(&base), vec![2, 7]);
}

#[tokio::test]
async fn test_retag_with_no_ids_is_noop() {
    let accessor = fixture();
    let before = accessor.get_all(None).await.unwrap();
    accessor.retag_to_event(&HashSet::new(), 42).await.unwrap();
    assert_eq!(accessor.get_all(None).await.unwrap(), before);
}

#[tokio::test]
async fn test_storage_failure_propagates() {
    let accessor = SpawnAccessor::new(UnavailableRepository);
    let fence = triangle();

    let err = accessor.get_by_id(1).await.unwrap_err();
    assert!(is_storage_error(&err));

    let err = accessor.get_all(None).await.unwrap_err();
    assert!(is_storage_error(&err));

    let err = accessor
        .get_in_area(Some(&fence), &EventScope::base(), false)
        .await
        .unwrap_err();
    assert!(is_storage_error(&err));

    let err = accessor
        .retag_to_event(&id_set(&[1]), 7)
        .await
        .unwrap_err();
    assert!(is_storage_error(&err));
}

#[tokio::test]
async fn test_imported_duplicate_appears_once_in_area() {
    let summary = parse_import(
        r#"[
            {"id": 1, "latitude": 5.0, "longitude": 2.0},
            {"id": 1, "latitude": 6.0, "longitude": 1.0}
        ]"#,
    )
    .unwrap();
    let accessor = SpawnAccessor::new(SpawnStore::from_spawns(summary.spawns).unwrap());

    let found = accessor
        .get_in_area(Some(&triangle()), &EventScope::base(), false)
        .await
        .unwrap();
    assert_eq!(ids(&found), vec![1]);
    assert_eq!(found[0].location, Coordinate::new(5.0, 2.0));
}

//! Tests for next-spawn projection
//!
//! Covers hour anchoring, both rollovers, and the already-passed drop.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use spawnwatch_types::{Coordinate, EventScope, MinuteSecond, SpawnDuration, SpawnPoint};

use super::test_support::{UnavailableRepository, is_storage_error};
use super::{SpawnAccessor, next_spawns, project_window_start};
use crate::geofence::PolygonFence;
use crate::query::SpawnStore;

fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 14, h, m, s).unwrap()
}

fn ms(raw: &str) -> MinuteSecond {
    raw.parse().unwrap()
}

fn project(raw: &str, duration: SpawnDuration, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    project_window_start(ms(raw), duration, &now).unwrap()
}

#[test]
fn test_window_start_before_now_rolls_forward() {
    // despawn 12:10, window 11:40 -> next cycle 12:40
    let start = project("10:00", SpawnDuration::HalfHour, at(12, 5, 0));
    assert_eq!(start, Some(at(12, 40, 0)));
}

#[test]
fn test_earlier_minute_refers_to_next_hour() {
    // despawn 13:03, window 12:33 is already in the future
    let start = project("03:00", SpawnDuration::HalfHour, at(12, 5, 0));
    assert_eq!(start, Some(at(12, 33, 0)));
}

#[test]
fn test_same_minute_already_passed_is_dropped() {
    assert_eq!(project("05:00", SpawnDuration::HalfHour, at(12, 5, 30)), None);
}

#[test]
fn test_despawn_exactly_now_is_dropped() {
    assert_eq!(project("05:00", SpawnDuration::HalfHour, at(12, 5, 0)), None);
}

#[test]
fn test_subsecond_now_passes_whole_second_despawn() {
    let now = at(12, 5, 0) + TimeDelta::milliseconds(500);
    assert_eq!(project("05:00", SpawnDuration::HalfHour, now), None);
}

#[test]
fn test_same_minute_later_second_stays_in_current_hour() {
    // despawn 12:05:45, window 11:35:45 -> 12:35:45
    let start = project("05:45", SpawnDuration::HalfHour, at(12, 5, 30));
    assert_eq!(start, Some(at(12, 35, 45)));
}

#[test]
fn test_one_hour_window() {
    // despawn 12:50, window 11:50 -> 12:50
    assert_eq!(
        project("50:00", SpawnDuration::OneHour, at(12, 5, 0)),
        Some(at(12, 50, 0))
    );
    // despawn 13:03, window 12:03 -> 13:03
    assert_eq!(
        project("03:00", SpawnDuration::OneHour, at(12, 5, 0)),
        Some(at(13, 3, 0))
    );
}

#[test]
fn test_window_start_equal_to_now_is_kept() {
    let start = project("35:00", SpawnDuration::HalfHour, at(12, 5, 0));
    assert_eq!(start, Some(at(12, 5, 0)));
}

#[test]
fn test_rollover_crosses_midnight() {
    let now = at(23, 50, 0);
    let start = project("10:00", SpawnDuration::HalfHour, now);
    let expected = Utc.with_ymd_and_hms(2024, 3, 15, 0, 40, 0).unwrap();
    assert_eq!(start, Some(expected));
}

#[test]
fn test_window_start_never_before_now() {
    let now = at(12, 5, 17);
    for minute in 0..60 {
        for second in [0, 16, 17, 18, 59] {
            let despawn = MinuteSecond::new(minute, second).unwrap();
            for duration in [SpawnDuration::OneHour, SpawnDuration::HalfHour] {
                if let Some(start) = project_window_start(despawn, duration, &now).unwrap() {
                    assert!(start >= now, "{despawn} {duration:?} -> {start}");
                    assert!(start < now + TimeDelta::minutes(61));
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Projection over a store
// ─────────────────────────────────────────────────────────────────────────────

fn spawn(id: i64, lat: f64, lon: f64, despawn: Option<&str>, spawndef: i32) -> SpawnPoint {
    SpawnPoint {
        id,
        location: Coordinate::new(lat, lon),
        event_id: 1,
        despawn: despawn.map(ms).into(),
        spawndef,
    }
}

fn square() -> PolygonFence {
    PolygonFence::new(
        "square",
        vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 10.0),
            Coordinate::new(10.0, 10.0),
            Coordinate::new(10.0, 0.0),
        ],
    )
    .unwrap()
}

#[tokio::test]
async fn test_next_spawns_over_store() {
    let store = SpawnStore::from_spawns(vec![
        spawn(1, 1.0, 1.0, Some("10:00"), 240),
        spawn(2, 2.0, 2.0, Some("03:00"), 240),
        spawn(3, 3.0, 3.0, Some("05:00"), 240),
        spawn(4, 4.0, 4.0, None, 240),
        spawn(5, 50.0, 50.0, Some("10:00"), 240),
        spawn(6, 6.0, 6.0, Some("50:00"), 15),
    ])
    .unwrap();
    let accessor = SpawnAccessor::new(store);

    let now = at(12, 5, 30);
    let next = next_spawns(&accessor, Some(&square()), &EventScope::base(), now)
        .await
        .unwrap();

    let got: Vec<(i64, Coordinate)> = next.iter().map(|n| (n.timestamp, n.location)).collect();
    assert_eq!(
        got,
        vec![
            (at(12, 40, 0).timestamp(), Coordinate::new(1.0, 1.0)),
            (at(12, 33, 0).timestamp(), Coordinate::new(2.0, 2.0)),
            (at(12, 50, 0).timestamp(), Coordinate::new(6.0, 6.0)),
        ]
    );
}

#[tokio::test]
async fn test_next_spawns_without_fence_is_empty() {
    let store = SpawnStore::from_spawns(vec![spawn(1, 1.0, 1.0, Some("10:00"), 240)]).unwrap();
    let accessor = SpawnAccessor::new(store);

    let next = next_spawns::<_, PolygonFence, _>(&accessor, None, &EventScope::base(), at(12, 0, 0))
        .await
        .unwrap();
    assert!(next.is_empty());
}


#[tokio::test]
async fn test_next_spawns_storage_failure_aborts() {
    let accessor = SpawnAccessor::new(UnavailableRepository);

    let result = next_spawns(&accessor, Some(&square()), &EventScope::base(), at(12, 0, 0)).await;
    assert!(result.as_ref().is_err_and(is_storage_error));
}

//! Shared types for spawnwatch
//!
//! This crate contains the serializable spawn point model and configuration types
//! that are shared between the core (storage, queries, projection) and the CLI.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Spawn point primary key.
pub type SpawnId = i64;

/// Event (campaign/epoch) tag.
pub type EventId = i32;

/// Event id every spawn point belongs to unless retagged.
pub const BASE_EVENT_ID: EventId = 1;

/// `spawndef` value of spawns with a 60 minute active window.
pub const HOUR_SPAWNDEF: i32 = 15;

/// Default `spawndef` for newly imported spawns with no classifier.
pub const DEFAULT_SPAWNDEF: i32 = 240;

// ─────────────────────────────────────────────────────────────────────────────
// Geography
// ─────────────────────────────────────────────────────────────────────────────

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// Axis-aligned rectangle. All four edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Smallest box containing every coordinate, or `None` for an empty slice.
    pub fn enclosing(points: &[Coordinate]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self {
            min_lat: first.latitude,
            min_lon: first.longitude,
            max_lat: first.latitude,
            max_lon: first.longitude,
        };
        for p in &points[1..] {
            bbox.min_lat = bbox.min_lat.min(p.latitude);
            bbox.min_lon = bbox.min_lon.min(p.longitude);
            bbox.max_lat = bbox.max_lat.max(p.latitude);
            bbox.max_lon = bbox.max_lon.max(p.longitude);
        }
        Some(bbox)
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        c.latitude >= self.min_lat
            && c.latitude <= self.max_lat
            && c.longitude >= self.min_lon
            && c.longitude <= self.max_lon
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Despawn Timing
// ─────────────────────────────────────────────────────────────────────────────

/// Errors parsing a `MM:SS` despawn time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DespawnParseError {
    #[error("expected MM:SS, got {raw:?}")]
    Format { raw: String },

    #[error("{field} out of range in {raw:?} (expected 0-59)")]
    OutOfRange { raw: String, field: &'static str },
}

/// Minute and second within an hour at which a spawn despawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MinuteSecond {
    minute: u32,
    second: u32,
}

impl MinuteSecond {
    pub fn new(minute: u32, second: u32) -> Option<Self> {
        (minute < 60 && second < 60).then_some(Self { minute, second })
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn second(&self) -> u32 {
        self.second
    }
}

impl FromStr for MinuteSecond {
    type Err = DespawnParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let format_err = || DespawnParseError::Format {
            raw: raw.to_string(),
        };
        let (min, sec) = raw.trim().split_once(':').ok_or_else(format_err)?;
        let parse = |part: &str| -> Result<u32, DespawnParseError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(format_err());
            }
            part.parse().map_err(|_| format_err())
        };
        let minute = parse(min)?;
        let second = parse(sec)?;
        if minute > 59 {
            return Err(DespawnParseError::OutOfRange {
                raw: raw.to_string(),
                field: "minute",
            });
        }
        if second > 59 {
            return Err(DespawnParseError::OutOfRange {
                raw: raw.to_string(),
                field: "second",
            });
        }
        Ok(Self { minute, second })
    }
}

impl TryFrom<String> for MinuteSecond {
    type Error = DespawnParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MinuteSecond> for String {
    fn from(value: MinuteSecond) -> Self {
        value.to_string()
    }
}

impl fmt::Display for MinuteSecond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minute, self.second)
    }
}

/// Whether the despawn minute:second of a spawn point has been determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<MinuteSecond>", into = "Option<MinuteSecond>")]
pub enum DespawnTiming {
    Known(MinuteSecond),
    #[default]
    Unknown,
}

impl DespawnTiming {
    pub fn known(&self) -> Option<MinuteSecond> {
        match self {
            DespawnTiming::Known(ms) => Some(*ms),
            DespawnTiming::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, DespawnTiming::Known(_))
    }
}

impl From<Option<MinuteSecond>> for DespawnTiming {
    fn from(value: Option<MinuteSecond>) -> Self {
        value.map_or(DespawnTiming::Unknown, DespawnTiming::Known)
    }
}

impl From<DespawnTiming> for Option<MinuteSecond> {
    fn from(value: DespawnTiming) -> Self {
        value.known()
    }
}

/// Length of a spawn's active window, derived from its `spawndef`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnDuration {
    OneHour,
    HalfHour,
}

impl SpawnDuration {
    pub fn from_spawndef(spawndef: i32) -> Self {
        if spawndef == HOUR_SPAWNDEF {
            SpawnDuration::OneHour
        } else {
            SpawnDuration::HalfHour
        }
    }

    pub fn minutes(&self) -> i64 {
        match self {
            SpawnDuration::OneHour => 60,
            SpawnDuration::HalfHour => 30,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Spawn Points
// ─────────────────────────────────────────────────────────────────────────────

/// A fixed location at which a timed event recurs every hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub id: SpawnId,
    pub location: Coordinate,
    #[serde(default = "default_event_id")]
    pub event_id: EventId,
    #[serde(default)]
    pub despawn: DespawnTiming,
    #[serde(default = "default_spawndef")]
    pub spawndef: i32,
}

impl SpawnPoint {
    pub fn duration(&self) -> SpawnDuration {
        SpawnDuration::from_spawndef(self.spawndef)
    }
}

fn default_event_id() -> EventId {
    BASE_EVENT_ID
}

fn default_spawndef() -> i32 {
    DEFAULT_SPAWNDEF
}

/// Event ids a query is scoped to: always the base event, plus one optional extra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventScope {
    pub additional: Option<EventId>,
}

impl EventScope {
    pub fn base() -> Self {
        Self { additional: None }
    }

    pub fn with_event(additional: Option<EventId>) -> Self {
        Self { additional }
    }

    pub fn ids(&self) -> Vec<EventId> {
        let mut ids = vec![BASE_EVENT_ID];
        if let Some(extra) = self.additional
            && extra != BASE_EVENT_ID
        {
            ids.push(extra);
        }
        ids
    }

    pub fn includes(&self, event_id: EventId) -> bool {
        event_id == BASE_EVENT_ID || self.additional == Some(event_id)
    }
}

/// Projected start of a spawn's next active window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NextSpawn {
    /// Epoch seconds
    pub timestamp: i64,
    pub location: Coordinate,
}

// ─────────────────────────────────────────────────────────────────────────────
// App Configuration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Parquet file holding the spawn point table.
    #[serde(default)]
    pub data_file: String,
    /// Fence file used when a command names no fence.
    #[serde(default)]
    pub fence_file: Option<String>,
    /// Event included in scope next to the base event.
    #[serde(default)]
    pub additional_event: Option<EventId>,
}

impl AppConfig {
    /// Create a new AppConfig pointing at the given spawn data file.
    /// Other fields use their default values.
    pub fn with_data_file(data_file: String) -> Self {
        Self {
            data_file,
            fence_file: None,
            additional_event: None,
        }
    }

    pub fn event_scope(&self) -> EventScope {
        EventScope::with_event(self.additional_event)
    }
}

//! Fence file loading
//!
//! Fence files list one or more polygons:
//!
//! ```text
//! [downtown]
//! 52.5200,13.4000
//! 52.5300,13.4100
//! 52.5150,13.4200
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use std::fs;
use std::path::Path;

use spawnwatch_types::Coordinate;

use super::{GeofenceError, PolygonFence};

/// Parse every fence in `content`, in file order.
pub fn parse_fences(content: &str) -> Result<Vec<PolygonFence>, GeofenceError> {
    let mut fences = Vec::new();
    let mut current: Option<(String, Vec<Coordinate>)> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            if let Some((name, vertices)) = current.take() {
                fences.push(PolygonFence::new(name, vertices)?);
            }
            current = Some((name.trim().to_string(), Vec::new()));
            continue;
        }

        let Some((_, vertices)) = current.as_mut() else {
            return Err(GeofenceError::MissingHeader { line: idx + 1 });
        };
        vertices.push(parse_coordinate(line).ok_or_else(|| {
            GeofenceError::InvalidCoordinate {
                line: idx + 1,
                content: line.to_string(),
            }
        })?);
    }

    if let Some((name, vertices)) = current {
        fences.push(PolygonFence::new(name, vertices)?);
    }
    Ok(fences)
}

fn parse_coordinate(line: &str) -> Option<Coordinate> {
    let (lat, lon) = line.split_once(',')?;
    let latitude: f64 = lat.trim().parse().ok()?;
    let longitude: f64 = lon.trim().parse().ok()?;
    (latitude.is_finite() && longitude.is_finite()).then(|| Coordinate::new(latitude, longitude))
}

/// Load all fences from a file
pub fn load_fences_from_file(path: &Path) -> Result<Vec<PolygonFence>, GeofenceError> {
    let content = fs::read_to_string(path).map_err(|source| GeofenceError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_fences(&content)
}

/// Load one fence from a file: the one called `name`, or the first when no name is given.
pub fn load_fence(path: &Path, name: Option<&str>) -> Result<PolygonFence, GeofenceError> {
    let fences = load_fences_from_file(path)?;
    match name {
        Some(name) => fences
            .into_iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| GeofenceError::NotFound {
                name: name.to_string(),
                path: path.to_path_buf(),
            }),
        None => fences.into_iter().next().ok_or_else(|| GeofenceError::Empty {
            path: path.to_path_buf(),
        }),
    }
}

use spawnwatch_types::{BoundingBox, Coordinate};

use super::{Geofence, GeofenceError};

/// A named single-ring polygon. The ring is implicitly closed.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonFence {
    name: String,
    vertices: Vec<Coordinate>,
    bbox: BoundingBox,
}

impl PolygonFence {
    pub fn new(name: impl Into<String>, vertices: Vec<Coordinate>) -> Result<Self, GeofenceError> {
        let name = name.into();
        let bbox = match BoundingBox::enclosing(&vertices) {
            Some(bbox) if vertices.len() >= 3 => bbox,
            _ => {
                return Err(GeofenceError::TooFewVertices {
                    count: vertices.len(),
                    name,
                });
            }
        };
        Ok(Self {
            name,
            vertices,
            bbox,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }
}

impl Geofence for PolygonFence {
    fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// Even-odd ray casting along the latitude axis.
    fn contains(&self, c: Coordinate) -> bool {
        if !self.bbox.contains(c) {
            return false;
        }

        let mut inside = false;
        let n = self.vertices.len();
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            if (vi.longitude > c.longitude) != (vj.longitude > c.longitude) {
                let crossing = (vj.latitude - vi.latitude) * (c.longitude - vi.longitude)
                    / (vj.longitude - vi.longitude)
                    + vi.latitude;
                if c.latitude < crossing {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

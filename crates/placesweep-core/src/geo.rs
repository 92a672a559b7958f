//! Planar geometry for search regions.
//!
//! Coordinates are treated as a flat (lng = x, lat = y) plane. That is exact
//! enough for city-scale regions; polygons that straddle the antimeridian are
//! not supported.
//!
//! ## Boundary rule
//!
//! A point lying exactly on an edge or a vertex of a region is **outside**.
//! The on-edge test runs before the crossing count and both are computed on
//! canonically ordered edge endpoints, so the answer does not depend on
//! where the vertex list starts or which way it winds. Two regions sharing an
//! edge therefore never both claim a point on that edge.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Axis-aligned box used to scope provider queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Inclusive on all four sides.
    #[must_use]
    pub fn contains(&self, point: LatLng) -> bool {
        (self.south..=self.north).contains(&point.lat) && (self.west..=self.east).contains(&point.lng)
    }

    #[must_use]
    pub const fn south_west(&self) -> LatLng {
        LatLng::new(self.south, self.west)
    }

    #[must_use]
    pub const fn north_east(&self) -> LatLng {
        LatLng::new(self.north, self.east)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("a region needs at least 3 distinct vertices, got {0}")]
    TooFewVertices(usize),

    #[error("vertex {index} is not a valid coordinate: {lat},{lng}")]
    InvalidVertex { index: usize, lat: f64, lng: f64 },
}

/// A simple polygon drawn by the user.
///
/// Immutable once built: a new drawing replaces the whole region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LatLng>", into = "Vec<LatLng>")]
pub struct Region {
    vertices: Vec<LatLng>,
    bounds: BoundingBox,
}

impl Region {
    /// Builds a region from an ordered vertex list.
    ///
    /// Consecutive repeated vertices are collapsed, and a closing vertex equal
    /// to the first one is dropped, so both open and explicitly closed rings
    /// are accepted.
    ///
    /// # Errors
    ///
    /// - [`GeometryError::InvalidVertex`] for a non-finite or out-of-range coordinate.
    /// - [`GeometryError::TooFewVertices`] when fewer than 3 distinct vertices remain.
    pub fn new(vertices: Vec<LatLng>) -> Result<Self, GeometryError> {
        if let Some((index, bad)) = vertices.iter().enumerate().find(|(_, v)| !v.is_valid()) {
            return Err(GeometryError::InvalidVertex {
                index,
                lat: bad.lat,
                lng: bad.lng,
            });
        }

        let mut ring = vertices;
        ring.dedup();
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        let distinct = ring
            .iter()
            .enumerate()
            .filter(|&(i, v)| !ring[..i].contains(v))
            .count();
        if distinct < 3 {
            return Err(GeometryError::TooFewVertices(distinct));
        }

        let bounds = ring.iter().skip(1).fold(
            BoundingBox {
                south: ring[0].lat,
                west: ring[0].lng,
                north: ring[0].lat,
                east: ring[0].lng,
            },
            |b, v| BoundingBox {
                south: b.south.min(v.lat),
                west: b.west.min(v.lng),
                north: b.north.max(v.lat),
                east: b.east.max(v.lng),
            },
        );

        Ok(Self {
            vertices: ring,
            bounds,
        })
    }

    #[must_use]
    pub fn vertices(&self) -> &[LatLng] {
        &self.vertices
    }

    #[must_use]
    pub const fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    /// Precise containment test; see the module docs for the boundary rule.
    #[must_use]
    pub fn contains(&self, point: LatLng) -> bool {
        self.bounds.contains(point) && contains(point, &self.vertices)
    }
}

impl TryFrom<Vec<LatLng>> for Region {
    type Error = GeometryError;

    fn try_from(vertices: Vec<LatLng>) -> Result<Self, Self::Error> {
        Self::new(vertices)
    }
}

impl From<Region> for Vec<LatLng> {
    fn from(region: Region) -> Self {
        region.vertices
    }
}

/// Ray-casting point-in-polygon test over an ordered vertex ring.
///
/// Returns `false` for rings with fewer than 3 vertices and for points on
/// the boundary.
#[must_use]
pub fn contains(point: LatLng, vertices: &[LatLng]) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut prev = vertices[vertices.len() - 1];
    for &current in vertices {
        let (a, b) = ordered_edge(prev, current);
        if on_segment(point, a, b) {
            return false;
        }
        // Half-open rule: an edge counts when exactly one endpoint is above
        // the ray, so a ray through a vertex is counted once.
        if (a.lat > point.lat) != (b.lat > point.lat) {
            let (low, high) = if a.lat < b.lat { (a, b) } else { (b, a) };
            let x_cross =
                low.lng + (point.lat - low.lat) * (high.lng - low.lng) / (high.lat - low.lat);
            if point.lng < x_cross {
                inside = !inside;
            }
        }
        prev = current;
    }
    inside
}

fn ordered_edge(p: LatLng, q: LatLng) -> (LatLng, LatLng) {
    if (p.lat, p.lng) <= (q.lat, q.lng) {
        (p, q)
    } else {
        (q, p)
    }
}

// Exact comparison: only points that are arithmetically on the edge count as
// boundary points.
#[allow(clippy::float_cmp)]
fn on_segment(p: LatLng, a: LatLng, b: LatLng) -> bool {
    let cross = (b.lng - a.lng) * (p.lat - a.lat) - (b.lat - a.lat) * (p.lng - a.lng);
    cross == 0.0
        && p.lng >= a.lng.min(b.lng)
        && p.lng <= a.lng.max(b.lng)
        && p.lat >= a.lat.min(b.lat)
        && p.lat <= a.lat.max(b.lat)
}

#[cfg(test)]
#[path = "geo_test.rs"]
mod tests;

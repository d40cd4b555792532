//! Polygon inclusion with hole subtraction.

use rstar::{RTreeObject, AABB};
use tracing::debug;

use super::ring::PreparedRing;
use crate::error::GeometryError;
use crate::models::{Polygon, Position};

/// Outcome of testing a position against one polygon.
#[derive(Debug, Clone, PartialEq)]
pub enum Membership {
    Inside,
    Outside,
    /// The polygon cannot be tested; treated as outside by every predicate
    Malformed(GeometryError),
}

impl Membership {
    pub fn is_inside(&self) -> bool {
        matches!(self, Membership::Inside)
    }
}

/// Polygon with prepared rings and a cached envelope, stored in the R-tree.
#[derive(Debug, Clone)]
pub struct PreparedPolygon {
    outer: PreparedRing,
    holes: Vec<PreparedRing>,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for PreparedPolygon {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl PreparedPolygon {
    /// Prepare all rings. A degenerate outer ring rejects the polygon,
    /// degenerate holes are dropped.
    pub fn prepare(polygon: &Polygon) -> Result<Self, GeometryError> {
        let outer = PreparedRing::prepare(polygon.outer().ok_or(GeometryError::NoRings)?)?;

        let holes = polygon
            .holes()
            .iter()
            .filter_map(|hole| match PreparedRing::prepare(hole) {
                Ok(ring) => Some(ring),
                Err(e) => {
                    debug!("Ignoring hole: {}", e);
                    None
                }
            })
            .collect();

        let (min_lon, min_lat, max_lon, max_lat) = outer.bbox();

        Ok(Self {
            outer,
            holes,
            envelope: AABB::from_corners([min_lon, min_lat], [max_lon, max_lat]),
        })
    }

    pub fn contains(&self, p: Position) -> bool {
        self.outer.contains(p) && !self.holes.iter().any(|hole| hole.contains(p))
    }

    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }

    pub fn wraps(&self) -> bool {
        self.outer.wraps()
    }
}

/// Test a single polygon without building an index.
pub fn locate(polygon: &Polygon, p: Position) -> Membership {
    match PreparedPolygon::prepare(polygon) {
        Ok(prepared) if prepared.contains(p) => Membership::Inside,
        Ok(_) => Membership::Outside,
        Err(e) => Membership::Malformed(e),
    }
}

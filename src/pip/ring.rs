//! Ray casting over a single linear ring.

use geo::{BoundingRect, Coord, Intersects, LineString};

use crate::error::GeometryError;
use crate::models::Position;

/// Longitude span used for rings that cross the antimeridian. Any test
/// position in [-180, 180] or shifted by one turn falls inside it.
pub const WRAPPED_LON_SPAN: (f64, f64) = (-540.0, 540.0);

/// A ring ready for repeated inclusion tests.
///
/// The ring is stored closed and, when it crosses the antimeridian,
/// unwrapped so consecutive vertices are never more than 180° apart.
#[derive(Debug, Clone)]
pub struct PreparedRing {
    exterior: LineString<f64>,
    wraps: bool,
    bbox: (f64, f64, f64, f64),
}

impl PreparedRing {
    pub fn prepare(ring: &[Position]) -> Result<Self, GeometryError> {
        let mut open = ring.to_vec();
        open.dedup();
        if open.len() > 1 && open.first() == open.last() {
            open.pop();
        }

        if open.len() < 3 {
            return Err(GeometryError::DegenerateRing(open.len()));
        }
        if open.iter().any(|p| !p.lon.is_finite() || !p.lat.is_finite()) {
            return Err(GeometryError::NonFinite);
        }

        let (mut exterior, wraps) = unwrap(&open);
        exterior.close();

        let rect = exterior
            .bounding_rect()
            .ok_or(GeometryError::DegenerateRing(0))?;
        let (min_lon, max_lon) = if wraps {
            WRAPPED_LON_SPAN
        } else {
            (rect.min().x, rect.max().x)
        };

        Ok(Self {
            exterior,
            wraps,
            bbox: (min_lon, rect.min().y, max_lon, rect.max().y),
        })
    }

    /// Whether any edge of the ring crosses the antimeridian
    pub fn wraps(&self) -> bool {
        self.wraps
    }

    /// The closed, unwrapped ring
    pub fn exterior(&self) -> &LineString<f64> {
        &self.exterior
    }

    /// Even-odd inclusion test, trying the shifted longitudes for wrapped rings.
    /// Positions on an edge count as contained.
    pub fn contains(&self, p: Position) -> bool {
        if self.inside_or_on(p) {
            return true;
        }
        self.wraps && (self.inside_or_on(p.shifted(1.0)) || self.inside_or_on(p.shifted(-1.0)))
    }

    /// (min_lon, min_lat, max_lon, max_lat)
    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        self.bbox
    }

    fn inside_or_on(&self, p: Position) -> bool {
        let c = Coord::from(p);
        self.exterior.intersects(&c) || crosses_odd(&self.exterior, c)
    }
}

/// Shift vertices by whole turns so each edge takes the shorter arc.
fn unwrap(ring: &[Position]) -> (LineString<f64>, bool) {
    let mut wraps = false;
    let mut out: Vec<Coord<f64>> = Vec::with_capacity(ring.len() + 1);
    out.push(ring[0].into());

    for v in &ring[1..] {
        let prev = out[out.len() - 1].x;
        let delta = v.lon - prev;
        if delta.abs() > 180.0 {
            wraps = true;
            out.push(v.shifted(-(delta / 360.0).round()).into());
        } else {
            out.push((*v).into());
        }
    }

    (LineString::new(out), wraps)
}

/// Cast a ray from `p` towards increasing longitude and count edge crossings.
///
/// The ring must be closed.
pub fn crosses_odd(ring: &LineString<f64>, p: Coord<f64>) -> bool {
    let mut inside = false;

    for edge in ring.lines() {
        let (a, b) = (edge.start, edge.end);
        if (a.y > p.y) != (b.y > p.y) {
            let crossing = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if crossing > p.x {
                inside = !inside;
            }
        }
    }

    inside
}

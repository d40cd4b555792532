use serde::{Deserialize, Serialize};

use super::Position;

/// Polygon made of linear rings. Ring 0 is the outer boundary, the rest are holes.
///
/// Rings are kept exactly as given: they may be unclosed, in which case the
/// segment from the last position back to the first is implied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    rings: Vec<Vec<Position>>,
}

impl Polygon {
    pub fn new(rings: Vec<Vec<Position>>) -> Self {
        Self { rings }
    }

    /// Build from raw `[lon, lat]` arrays, as found in decoded GeoJSON
    pub fn from_coordinates(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Self::new(
            rings
                .into_iter()
                .map(|ring| ring.into_iter().map(Position::from).collect())
                .collect(),
        )
    }

    pub fn rings(&self) -> &[Vec<Position>] {
        &self.rings
    }

    /// Outer boundary, if the polygon has any rings at all
    pub fn outer(&self) -> Option<&[Position]> {
        self.rings.first().map(Vec::as_slice)
    }

    pub fn holes(&self) -> &[Vec<Position>] {
        self.rings.get(1..).unwrap_or(&[])
    }
}

//! Longitude/latitude pairs.

use geo_types::Coord;
use serde::{Deserialize, Serialize};

/// Geographic position in decimal degrees, serialized as `[lon, lat]`.
///
/// No normalization is applied. Longitude is expected in [-180, 180] and
/// latitude in [-90, 90], but neither is checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
}

impl Position {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// The same position shifted by a number of full turns in longitude
    pub fn shifted(&self, turns: f64) -> Self {
        Self {
            lon: self.lon + turns * 360.0,
            lat: self.lat,
        }
    }
}

impl From<(f64, f64)> for Position {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self::new(lon, lat)
    }
}

impl From<[f64; 2]> for Position {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self::new(lon, lat)
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.lon, p.lat]
    }
}

impl From<Position> for Coord<f64> {
    fn from(p: Position) -> Self {
        Coord { x: p.lon, y: p.lat }
    }
}

impl From<Coord<f64>> for Position {
    fn from(c: Coord<f64>) -> Self {
        Self::new(c.x, c.y)
    }
}

//! Map elements that can be reduced to a single representative position.

use geo::{Centroid, Coord, MultiPoint, Point};
use serde::{Deserialize, Serialize};

use super::Position;

/// Anything that can name a representative position for region lookups.
///
/// Returning `None` means the element has no usable coordinate. Region
/// predicates answer `false` for such elements.
pub trait Locate {
    fn locate(&self) -> Option<Position>;
}

/// Generic map element as seen by the region predicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates", rename_all = "snake_case")]
pub enum Element {
    /// Point-like element (a node), located at its own coordinate
    Point(Position),
    /// Line or area element (a way), located at the centroid of its points
    Extended(Vec<Position>),
    /// Multi-geometry element (a relation); never located
    Unsupported,
}

impl Locate for Element {
    fn locate(&self) -> Option<Position> {
        match self {
            Element::Point(p) => Some(*p),
            Element::Extended(points) => centroid(points),
            Element::Unsupported => None,
        }
    }
}

impl Locate for Position {
    fn locate(&self) -> Option<Position> {
        Some(*self)
    }
}

impl<T: Locate + ?Sized> Locate for &T {
    fn locate(&self) -> Option<Position> {
        (**self).locate()
    }
}

/// Mean position of a set of points, `None` when empty
pub fn centroid(points: &[Position]) -> Option<Position> {
    let multi: MultiPoint<f64> = points
        .iter()
        .map(|&p| Point::from(Coord::from(p)))
        .collect::<Vec<_>>()
        .into();

    multi.centroid().map(|c| Position::from(c.0))
}

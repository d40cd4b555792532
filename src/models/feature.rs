//! Features and named collections of features.

use super::{Polygon, Position};
use crate::error::GeometryError;

/// Geometry carried by a feature.
///
/// Only `Polygon` takes part in region membership; everything else is
/// carried along so that collections decode without loss and is skipped
/// at lookup time.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Position),
    LineString(Vec<Position>),
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
    /// Any other geometry type, identified by its GeoJSON type name
    Other(String),
    /// Geometry whose coordinates could not be decoded
    Invalid { kind: String, error: GeometryError },
}

impl Geometry {
    pub fn type_name(&self) -> &str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::Other(name) => name,
            Geometry::Invalid { kind, .. } => kind,
        }
    }

    /// Undecodable polygon coordinates, as opposed to a non-polygon geometry
    pub fn invalid_polygon(&self) -> Option<&GeometryError> {
        match self {
            Geometry::Invalid { kind, error } if kind == "Polygon" => Some(error),
            _ => None,
        }
    }

    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Geometry::Polygon(p) => Some(p),
            _ => None,
        }
    }
}

/// A single entry of a collection
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    pub name: Option<String>,
    pub geometry: Option<Geometry>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            name: None,
            geometry: Some(geometry),
        }
    }

    pub fn polygon(polygon: Polygon) -> Self {
        Self::new(Geometry::Polygon(polygon))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Ordered set of features describing one region set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Iterate over the polygon geometries, skipping everything else
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .filter_map(Geometry::as_polygon)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

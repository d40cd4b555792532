//! Core geometry types for region lookups.

pub mod element;
pub mod feature;
pub mod polygon;
pub mod position;

pub use element::{Element, Locate};
pub use feature::{Feature, FeatureCollection, Geometry};
pub use polygon::Polygon;
pub use position::Position;

//! Geoctx - point-in-region classification for geographic coordinates
//!
//! This library holds named collections of polygon regions and answers
//! "is this point inside any of them" queries, plus the imperial-units and
//! drive-on-the-left predicates built on top.

pub mod config;
pub mod error;
pub mod geojson;
pub mod models;
pub mod pip;

pub use error::LoadError;
pub use models::{Element, Feature, FeatureCollection, Geometry, Locate, Polygon, Position};
pub use pip::{Classification, Evaluation, RegionContext, RegionContextBuilder};

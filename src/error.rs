//! Error types for region loading and geometry preparation.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a region file into a `FeatureCollection`.
///
/// These never reach query callers: the context builder logs them and
/// registers the region as empty.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a FeatureCollection, found {0}")]
    NotFeatureCollection(String),
}

/// Reason a geometry cannot take part in membership tests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("polygon has no rings")]
    NoRings,

    #[error("ring has {0} vertices once repeats are removed, at least 3 are needed")]
    DegenerateRing(usize),

    #[error("ring has a NaN or infinite coordinate")]
    NonFinite,

    #[error("invalid {kind} coordinates: {reason}")]
    InvalidCoordinates { kind: String, reason: String },
}

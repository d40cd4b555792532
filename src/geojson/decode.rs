use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{GeometryError, LoadError};
use crate::models::{Feature, FeatureCollection, Geometry, Polygon, Position};

#[derive(Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    geo_type: String,
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    geo_type: String,
    #[serde(default)]
    coordinates: Value,
}

/// Parse a GeoJSON FeatureCollection.
///
/// Features whose geometry has unusable coordinates are kept with a
/// `Geometry::Invalid` marker so lookups skip them and indexing counts them.
pub fn parse_collection(json: &str) -> Result<FeatureCollection, LoadError> {
    let raw: RawCollection = serde_json::from_str(json)?;
    if raw.geo_type != "FeatureCollection" {
        return Err(LoadError::NotFeatureCollection(raw.geo_type));
    }

    let mut invalid = 0;
    let features: FeatureCollection = raw
        .features
        .into_iter()
        .enumerate()
        .map(|(i, f)| {
            let geometry = f.geometry.map(|g| {
                match decode_geometry(&g.geo_type, g.coordinates) {
                    Ok(geometry) => geometry,
                    Err(error) => {
                        debug!("Feature {}: {}", i, error);
                        invalid += 1;
                        Geometry::Invalid {
                            kind: g.geo_type,
                            error,
                        }
                    }
                }
            });

            Feature {
                id: f.id.and_then(id_string),
                name: f
                    .properties
                    .as_ref()
                    .and_then(|p| p.get("name"))
                    .and_then(Value::as_str)
                    .map(String::from),
                geometry,
            }
        })
        .collect();

    if invalid > 0 {
        warn!("{} features with invalid geometry will be ignored", invalid);
    }

    Ok(features)
}

fn id_string(id: Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode the `coordinates` member of a GeoJSON geometry of the given type
pub fn decode_geometry(geo_type: &str, coordinates: Value) -> Result<Geometry, GeometryError> {
    let invalid = |e: serde_json::Error| GeometryError::InvalidCoordinates {
        kind: geo_type.to_string(),
        reason: e.to_string(),
    };

    let geometry = match geo_type {
        "Point" => Geometry::Point(serde_json::from_value::<Position>(coordinates).map_err(invalid)?),
        "LineString" => Geometry::LineString(
            serde_json::from_value::<Vec<Position>>(coordinates).map_err(invalid)?,
        ),
        "Polygon" => Geometry::Polygon(Polygon::new(
            serde_json::from_value::<Vec<Vec<Position>>>(coordinates).map_err(invalid)?,
        )),
        "MultiPolygon" => Geometry::MultiPolygon(
            serde_json::from_value::<Vec<Vec<Vec<Position>>>>(coordinates)
                .map_err(invalid)?
                .into_iter()
                .map(Polygon::new)
                .collect(),
        ),
        other => Geometry::Other(other.to_string()),
    };

    Ok(geometry)
}

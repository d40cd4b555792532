//! Spatial index over the polygons of one named region set.

use rstar::{RTree, AABB};
use serde::Serialize;
use tracing::{debug, info};

use super::region::PreparedPolygon;
use crate::models::{FeatureCollection, Geometry, Position};

/// Counts gathered while indexing a collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegionStats {
    /// Features in the source collection
    pub features: usize,
    /// Polygons available for lookups
    pub polygons: usize,
    /// Polygons dropped because they could not be decoded or their outer
    /// ring could not be tested
    pub malformed: usize,
    /// Features without polygon geometry
    pub skipped: usize,
}

/// One named region set: its source collection and an R-tree of its polygons.
pub struct RegionIndex {
    tree: RTree<PreparedPolygon>,
    stats: RegionStats,
    source: FeatureCollection,
}

impl RegionIndex {
    /// Build the index, skipping non-polygon features and malformed polygons
    pub fn build(name: &str, source: FeatureCollection) -> Self {
        let mut stats = RegionStats {
            features: source.len(),
            ..Default::default()
        };

        let mut prepared = Vec::new();
        for (i, feature) in source.features().iter().enumerate() {
            let prepared_polygon = match feature.geometry.as_ref() {
                Some(Geometry::Polygon(polygon)) => PreparedPolygon::prepare(polygon),
                Some(g) => match g.invalid_polygon() {
                    Some(e) => Err(e.clone()),
                    None => {
                        stats.skipped += 1;
                        continue;
                    }
                },
                None => {
                    stats.skipped += 1;
                    continue;
                }
            };

            match prepared_polygon {
                Ok(p) => prepared.push(p),
                Err(e) => {
                    debug!("Region '{}': skipping feature {}: {}", name, i, e);
                    stats.malformed += 1;
                }
            }
        }

        stats.polygons = prepared.len();
        let tree = RTree::bulk_load(prepared);

        info!(
            "Region '{}' indexed: {} polygons ({} malformed, {} non-polygon features skipped)",
            name, stats.polygons, stats.malformed, stats.skipped
        );

        Self {
            tree,
            stats,
            source,
        }
    }

    /// Index standing in for a region whose data could not be loaded
    pub fn empty() -> Self {
        Self {
            tree: RTree::new(),
            stats: RegionStats::default(),
            source: FeatureCollection::empty(),
        }
    }

    /// True if any polygon contains the position. Stops at the first match.
    pub fn contains(&self, p: Position) -> bool {
        let query_envelope = AABB::from_point([p.lon, p.lat]);

        self.tree
            .locate_in_envelope_intersecting(&query_envelope)
            .any(|polygon| polygon.contains(p))
    }

    pub fn stats(&self) -> RegionStats {
        self.stats
    }

    pub fn source(&self) -> &FeatureCollection {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

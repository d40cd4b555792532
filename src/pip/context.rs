//! Process-wide region context: the predicates the rest of the application uses.

use std::collections::BTreeMap;
use std::path::Path;

use hashbrown::HashMap;
use serde::Serialize;
use tracing::{info, warn};

use super::index::{RegionIndex, RegionStats};
use crate::geojson;
use crate::models::{FeatureCollection, Locate, Position};

/// Region set of places that use imperial units
pub const IMPERIAL: &str = "imperial";
/// Region set of places that drive on the left
pub const DRIVE_LEFT: &str = "drive-left";

/// Result of testing a position against a named region set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    Inside,
    Outside,
    /// No region set was registered under the requested name
    UnknownRegion,
}

impl Evaluation {
    pub fn is_inside(&self) -> bool {
        matches!(self, Evaluation::Inside)
    }
}

/// All region flags for one position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub imperial: bool,
    pub drive_left: bool,
    /// One entry per registered region set, including the two above
    pub regions: BTreeMap<String, bool>,
}

/// Collects region sets before the context is frozen.
#[derive(Default)]
pub struct RegionContextBuilder {
    regions: HashMap<String, RegionIndex>,
}

impl RegionContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoded collection under `name`
    pub fn load(mut self, name: impl Into<String>, collection: FeatureCollection) -> Self {
        let name = name.into();
        let index = RegionIndex::build(&name, collection);
        self.insert(name, index);
        self
    }

    /// Register `name` as an empty region set, for data that failed to load upstream
    pub fn load_absent(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        warn!("Region '{}' has no data, lookups against it return false", name);
        self.insert(name, RegionIndex::empty());
        self
    }

    /// Register the outcome of an upstream load, absorbing the failure case
    pub fn load_result<E: std::fmt::Display>(
        self,
        name: impl Into<String>,
        result: Result<FeatureCollection, E>,
    ) -> Self {
        let name = name.into();
        match result {
            Ok(collection) => self.load(name, collection),
            Err(e) => {
                warn!("Unable to load region '{}': {}", name, e);
                self.load_absent(name)
            }
        }
    }

    /// Decode a GeoJSON file (optionally gzipped) and register it
    pub fn load_file(self, name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        let result = geojson::read_collection(path.as_ref());
        self.load_result(name, result)
    }

    fn insert(&mut self, name: String, index: RegionIndex) {
        if self.regions.insert(name.clone(), index).is_some() {
            warn!("Region '{}' loaded more than once, keeping the last", name);
        }
    }

    /// Freeze. No region set can be added afterwards.
    pub fn build(self) -> RegionContext {
        info!("Region context ready with {} region sets", self.regions.len());
        RegionContext {
            regions: self.regions,
        }
    }
}

/// Read-only set of named regions.
///
/// Built once through [`RegionContextBuilder`]; every query is a pure
/// in-memory computation, so a shared reference can be used from any
/// number of threads.
pub struct RegionContext {
    regions: HashMap<String, RegionIndex>,
}

impl RegionContext {
    pub fn builder() -> RegionContextBuilder {
        RegionContextBuilder::new()
    }

    /// Context with no region sets; every predicate answers false
    pub fn empty() -> Self {
        RegionContextBuilder::new().build()
    }

    pub fn evaluate(&self, lon: f64, lat: f64, region: &str) -> Evaluation {
        match self.regions.get(region) {
            Some(index) if index.contains(Position::new(lon, lat)) => Evaluation::Inside,
            Some(_) => Evaluation::Outside,
            None => Evaluation::UnknownRegion,
        }
    }

    /// True iff the position lies inside some polygon of the named region set
    pub fn contains(&self, lon: f64, lat: f64, region: &str) -> bool {
        self.evaluate(lon, lat, region).is_inside()
    }

    /// Same as [`contains`](Self::contains) for an element with a representative position.
    /// Elements that cannot be located are never inside.
    pub fn contains_element<E: Locate + ?Sized>(&self, element: &E, region: &str) -> bool {
        self.contains_with(element, |e| e.locate(), region)
    }

    /// Locate the element with a caller supplied resolver
    pub fn contains_with<T: ?Sized, F>(&self, element: &T, resolve: F, region: &str) -> bool
    where
        F: Fn(&T) -> Option<Position>,
    {
        match resolve(element) {
            Some(p) => self.contains(p.lon, p.lat, region),
            None => false,
        }
    }

    pub fn is_imperial(&self, lon: f64, lat: f64) -> bool {
        self.contains(lon, lat, IMPERIAL)
    }

    pub fn is_imperial_element<E: Locate + ?Sized>(&self, element: &E) -> bool {
        self.contains_element(element, IMPERIAL)
    }

    pub fn is_drive_left(&self, lon: f64, lat: f64) -> bool {
        self.contains(lon, lat, DRIVE_LEFT)
    }

    pub fn is_drive_left_element<E: Locate + ?Sized>(&self, element: &E) -> bool {
        self.contains_element(element, DRIVE_LEFT)
    }

    /// Every region flag for a position
    pub fn classify(&self, lon: f64, lat: f64) -> Classification {
        let regions: BTreeMap<String, bool> = self
            .regions
            .iter()
            .map(|(name, index)| (name.clone(), index.contains(Position::new(lon, lat))))
            .collect();

        Classification {
            imperial: regions.get(IMPERIAL).copied().unwrap_or(false),
            drive_left: regions.get(DRIVE_LEFT).copied().unwrap_or(false),
            regions,
        }
    }

    /// Classification of an element; all flags false if it cannot be located
    pub fn classify_element<E: Locate + ?Sized>(&self, element: &E) -> Classification {
        match element.locate() {
            Some(p) => self.classify(p.lon, p.lat),
            None => Classification {
                regions: self.regions.keys().map(|name| (name.clone(), false)).collect(),
                ..Default::default()
            },
        }
    }

    /// Registered region names, sorted
    pub fn regions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.regions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn stats(&self, region: &str) -> Option<RegionStats> {
        self.regions.get(region).map(RegionIndex::stats)
    }

    /// The collection a region set was built from
    pub fn collection(&self, region: &str) -> Option<&FeatureCollection> {
        self.regions.get(region).map(RegionIndex::source)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Element, Feature, Polygon};

    fn collection(polygons: Vec<Polygon>) -> FeatureCollection {
        polygons.into_iter().map(Feature::polygon).collect()
    }

    fn unit_square() -> Polygon {
        Polygon::from_coordinates(vec![vec![
            [0.0, 0.0],
            [0.0, 2.0],
            [2.0, 2.0],
            [2.0, 0.0],
            [0.0, 0.0],
        ]])
    }

    fn diamond_around_origin() -> Polygon {
        Polygon::from_coordinates(vec![vec![
            [0.0, -0.5],
            [0.5, 0.0],
            [0.0, 0.5],
            [-0.5, 0.0],
            [0.0, -0.5],
        ]])
    }

    fn sample_context() -> RegionContext {
        // Rough boxes, good enough for classification tests
        let uk = Polygon::from_coordinates(vec![vec![
            [-8.0, 50.0],
            [2.0, 50.0],
            [2.0, 59.0],
            [-8.0, 59.0],
            [-8.0, 50.0],
        ]]);
        let us = Polygon::from_coordinates(vec![
            vec![[-125.0, 25.0], [-67.0, 25.0], [-67.0, 49.0], [-125.0, 49.0], [-125.0, 25.0]],
            // carve out a hole so a point inside can be checked
            vec![[-100.0, 30.0], [-90.0, 30.0], [-90.0, 40.0], [-100.0, 40.0], [-100.0, 30.0]],
        ]);
        let fiji = Polygon::from_coordinates(vec![vec![
            [176.0, -20.0],
            [-178.0, -20.0],
            [-178.0, -15.0],
            [176.0, -15.0],
            [176.0, -20.0],
        ]]);

        RegionContext::builder()
            .load(IMPERIAL, collection(vec![us, uk.clone()]))
            .load(DRIVE_LEFT, collection(vec![uk, fiji]))
            .build()
    }

    #[test]
    fn test_predicates() {
        let ctx = sample_context();

        // London
        assert!(ctx.is_imperial(-0.1, 51.5));
        assert!(ctx.is_drive_left(-0.1, 51.5));

        // Denver
        assert!(ctx.is_imperial(-105.0, 39.7));
        assert!(!ctx.is_drive_left(-105.0, 39.7));

        // Hole in the US box
        assert!(!ctx.is_imperial(-95.0, 35.0));

        // Paris
        assert!(!ctx.is_imperial(2.35, 48.85));
        assert!(!ctx.is_drive_left(2.35, 48.85));

        // Both sides of the dateline in the Fiji box
        assert!(ctx.is_drive_left(178.4, -18.1));
        assert!(ctx.is_drive_left(-179.5, -16.5));
        assert!(!ctx.is_drive_left(0.0, -18.0));
    }

    #[test]
    fn test_unknown_and_empty_regions() {
        let ctx = RegionContext::builder()
            .load_absent(DRIVE_LEFT)
            .load("empty", FeatureCollection::empty())
            .build();

        assert_eq!(ctx.evaluate(0.0, 0.0, "missing"), Evaluation::UnknownRegion);
        assert!(!ctx.contains(0.0, 0.0, "missing"));
        assert_eq!(ctx.evaluate(0.0, 0.0, "empty"), Evaluation::Outside);
        assert!(!ctx.is_drive_left(-0.1, 51.5));
        assert!(!ctx.is_imperial(-0.1, 51.5));
        assert!(!RegionContext::empty().is_imperial(-105.0, 39.7));
    }

    #[test]
    fn test_failed_load_becomes_empty_region() {
        let ctx = RegionContext::builder()
            .load_result(IMPERIAL, Err::<FeatureCollection, _>("asset missing"))
            .build();

        assert_eq!(ctx.regions(), vec![IMPERIAL]);
        assert_eq!(ctx.stats(IMPERIAL), Some(RegionStats::default()));
        assert_eq!(ctx.evaluate(-105.0, 39.7, IMPERIAL), Evaluation::Outside);
    }

    #[test]
    fn test_missing_file_becomes_empty_region() {
        let ctx = RegionContext::builder()
            .load_file(IMPERIAL, "/nonexistent/imperial.json")
            .build();

        assert!(!ctx.is_imperial(-105.0, 39.7));
        assert_eq!(ctx.evaluate(-105.0, 39.7, IMPERIAL), Evaluation::Outside);
    }

    #[test]
    fn test_repeated_queries_are_stable() {
        let ctx = sample_context();
        let first = ctx.classify(-0.1, 51.5);
        for _ in 0..10 {
            assert_eq!(ctx.classify(-0.1, 51.5), first);
        }
    }

    #[test]
    fn test_point_element_in_unit_square() {
        let ctx = RegionContext::builder()
            .load("test", collection(vec![unit_square()]))
            .build();

        let node = Element::Point(Position::new(2.0, 1.0));
        assert!(ctx.contains_element(&node, "test"));
        assert!(ctx.contains_element(&Position::new(1.0, 1.0), "test"));

        assert!(!ctx.contains_element(&Element::Unsupported, "test"));
    }

    #[test]
    fn test_centroid_inside_when_vertices_are_not() {
        let ctx = RegionContext::builder()
            .load("origin", collection(vec![diamond_around_origin()]))
            .build();

        let way = Element::Extended(vec![Position::new(-1.0, -1.0), Position::new(1.0, 1.0)]);
        assert!(!ctx.contains(-1.0, -1.0, "origin"));
        assert!(!ctx.contains(1.0, 1.0, "origin"));
        assert!(ctx.contains_element(&way, "origin"));
    }

    #[test]
    fn test_custom_resolver() {
        struct Osm {
            kind: &'static str,
            coords: Vec<(f64, f64)>,
        }

        let ctx = RegionContext::builder()
            .load("test", collection(vec![unit_square()]))
            .build();

        let resolve = |e: &Osm| match e.kind {
            "node" => e.coords.first().map(|&c| Position::from(c)),
            _ => None,
        };

        let node = Osm {
            kind: "node",
            coords: vec![(1.0, 1.0)],
        };
        let relation = Osm {
            kind: "relation",
            coords: vec![(1.0, 1.0)],
        };

        assert!(ctx.contains_with(&node, resolve, "test"));
        assert!(!ctx.contains_with(&relation, resolve, "test"));
    }

    #[test]
    fn test_element_predicates() {
        let ctx = sample_context();
        let london = Element::Point(Position::new(-0.1, 51.5));

        assert!(ctx.is_imperial_element(&london));
        assert!(ctx.is_drive_left_element(&london));
        assert!(!ctx.is_imperial_element(&Element::Unsupported));
        assert!(!ctx.is_drive_left_element(&Element::Unsupported));
    }

    #[test]
    fn test_classify() {
        let ctx = sample_context();

        let c = ctx.classify(-0.1, 51.5);
        assert!(c.imperial);
        assert!(c.drive_left);
        assert_eq!(c.regions.len(), 2);
        assert_eq!(ctx.collection(IMPERIAL).map(|fc| fc.len()), Some(2));
        assert!(ctx.collection("missing").is_none());

        let c = ctx.classify_element(&Element::Unsupported);
        assert!(!c.imperial);
        assert!(!c.drive_left);
        assert_eq!(c.regions.get(IMPERIAL), Some(&false));
    }

    #[test]
    fn test_additional_named_region() {
        let ctx = RegionContext::builder()
            .load("left-hand-traffic-islands", collection(vec![diamond_around_origin()]))
            .build();

        assert!(ctx.contains(0.1, 0.1, "left-hand-traffic-islands"));
        assert_eq!(
            ctx.classify(0.1, 0.1).regions.get("left-hand-traffic-islands"),
            Some(&true)
        );
        assert!(!ctx.classify(0.1, 0.1).imperial);
    }

    #[test]
    fn test_reload_keeps_last() {
        let ctx = RegionContext::builder()
            .load("test", collection(vec![unit_square()]))
            .load("test", collection(vec![diamond_around_origin()]))
            .build();

        assert_eq!(ctx.len(), 1);
        assert!(!ctx.contains(1.5, 1.5, "test"));
        assert!(ctx.contains(0.1, 0.1, "test"));
    }

    #[test]
    fn test_shared_across_threads() {
        let ctx = std::sync::Arc::new(sample_context());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ctx = std::sync::Arc::clone(&ctx);
                std::thread::spawn(move || ctx.is_imperial(-0.1, 51.5))
            })
            .collect();

        for h in handles {
            assert!(h.join().unwrap());
        }
    }
}

//! GeoJSON adapter: turns region files into `FeatureCollection`s.
//!
//! The lookup engine never depends on this module; it only consumes the
//! decoded collections.

mod decode;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::info;

use crate::error::LoadError;
use crate::models::FeatureCollection;

pub use decode::{decode_geometry, parse_collection};

/// Read a GeoJSON FeatureCollection from disk. Files ending in `.gz` are gunzipped.
pub fn read_collection(path: &Path) -> Result<FeatureCollection, LoadError> {
    info!("Loading regions from {}", path.display());

    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let mut reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut content = String::new();
    reader.read_to_string(&mut content).map_err(io_err)?;

    parse_collection(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const SQUARE: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"name": "square"},
            "geometry": {"type": "Polygon", "coordinates": [[[0,0],[0,2],[2,2],[2,0],[0,0]]]}
        }]
    }"#;

    #[test]
    fn test_read_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imperial.json");
        std::fs::write(&path, SQUARE).unwrap();

        let fc = read_collection(&path).unwrap();
        assert_eq!(fc.len(), 1);
        assert_eq!(fc.features()[0].name.as_deref(), Some("square"));
    }

    #[test]
    fn test_read_gzip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drive-left.json.gz");

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(SQUARE.as_bytes()).unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let fc = read_collection(&path).unwrap();
        assert_eq!(fc.polygons().count(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = read_collection(Path::new("/nonexistent/regions.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(read_collection(&path), Err(LoadError::Json(_))));
    }
}

//! Integration tests for loading catalog snapshots from disk and feeding
//! them to the recommendation engine.

use std::path::PathBuf;

use hearth_core::{AspectKind, EngineSettings, Error};
use hearth_ingest::Catalog;
use hearth_search::RecommendationEngine;
use tempfile::TempDir;

const SNAPSHOT: &str = r#"{
  "properties": [
    { "id": "a1", "bedrooms": 2, "bathrooms": 1, "price": 1500, "status": "for_rent",
      "interior_size_sqm": 70, "neighbourhood": 1 },
    { "id": "a2", "bedrooms": 2, "bathrooms": 1, "price": 1550, "status": "for_rent",
      "interior_size_sqm": "72", "neighbourhood": 1 },
    { "id": "h1", "bedrooms": 5, "bathrooms": 3, "price": 800000, "status": "for_sale",
      "interior_size_sqm": 240, "neighbourhood": 2 },
    { "id": "x1", "bedrooms": 3, "bathrooms": 2, "price": 300000, "status": "sold",
      "interior_size_sqm": 110, "neighbourhood": 2 }
  ],
  "property_images": [
    { "property_id": "a1", "aspect": "interior", "embedding": [0.9, 0.1] },
    { "property_id": "a2", "aspect": "interior", "embedding": [0.8, 0.2] },
    { "property_id": "h1", "aspect": "interior", "embedding": [0.1, 0.9] },
    { "property_id": "h1", "aspect": "exterior", "embedding": [1.0, 0.0, 0.0] },
    { "property_id": "x1", "aspect": "exterior", "embedding": [1.0, 0.0, 0.0] }
  ],
  "neighbourhoods": [
    { "id": 1, "embeddings": [0.2, 0.7, 0.1] },
    { "id": 2, "embeddings": [0.6, 0.1, 0.3] }
  ]
}"#;

fn write_snapshot(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, content).expect("Failed to write snapshot");
    path
}

/// Test that a snapshot on disk loads and converts
#[test]
fn test_load_snapshot_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir, SNAPSHOT);

    let ingested = Catalog::load(&path)
        .expect("Failed to load snapshot")
        .into_raw_properties(&EngineSettings::default());

    assert_eq!(ingested.report.property_rows, 4);
    assert_eq!(ingested.report.loaded, 3);
    assert_eq!(ingested.report.skipped_status, 1);
    assert_eq!(ingested.report.orphan_images, 1);

    let a2 = ingested
        .properties
        .iter()
        .find(|p| p.id.as_str() == "a2")
        .expect("a2 loaded");
    assert_eq!(a2.metadata["interior_size_sqm"], Some(72.0));
    assert_eq!(a2.aspect_vectors[AspectKind::Neighbourhood].len(), 1);
}

/// Test the whole path from snapshot to recommendations
#[test]
fn test_snapshot_feeds_engine() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir, SNAPSHOT);
    let settings = EngineSettings::default();

    let ingested = Catalog::load(&path).unwrap().into_raw_properties(&settings);
    let engine = RecommendationEngine::new(settings).unwrap();
    engine.load_all(&ingested.properties).unwrap();

    assert_eq!(engine.len(), 3);
    assert!(!engine.contains("x1"));
    let recs = engine.recommend("a1").unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].id.as_str(), "a2");
}

/// Test that a missing file surfaces as an I/O error
#[test]
fn test_missing_snapshot() {
    let dir = TempDir::new().unwrap();
    let err = Catalog::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

/// Test that a malformed file names the path in the error
#[test]
fn test_malformed_snapshot_names_path() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir, r#"{ "properties": [ { "bedrooms": 2 } ] }"#);

    match Catalog::load(&path).unwrap_err() {
        Error::InvalidData(msg) => assert!(msg.contains("catalog.json"), "{msg}"),
        other => panic!("unexpected error: {other}"),
    }
}

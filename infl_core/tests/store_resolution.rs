mod common;

use std::fs;
use std::sync::Arc;

use common::{bridge_dataset, write_artifact, write_bridge, CountingReader};
use infl_core::{ArtifactKey, Category, CurveFamily, InflError, MaximumPolicy, MaximumSelector, ResultStore, StoreConfig};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn second_load_is_served_from_cache() {
    let dir = bridge_dataset();
    let reader = CountingReader::default();
    let store = ResultStore::with_reader(StoreConfig::explicit(dir.path()), Box::new(reader.clone()));

    let first = store.load("span_moments", Category::InfluenceLines).unwrap();
    assert_eq!(reader.count(), 1);

    let second = store.load("span_moments", Category::InfluenceLines).unwrap();
    assert_eq!(reader.count(), 1);
    assert_eq!(first, second);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn clear_cache_forces_a_new_read() {
    let dir = bridge_dataset();
    let reader = CountingReader::default();
    let store = ResultStore::with_reader(StoreConfig::explicit(dir.path()), Box::new(reader.clone()));

    store.load("neouds_lengths", Category::Properties).unwrap();
    store.clear_cache();
    store.load("neouds_lengths", Category::Properties).unwrap();
    assert_eq!(reader.count(), 2);
}

#[test]
fn reload_does_not_touch_previously_returned_payloads() {
    let dir = bridge_dataset();
    let store = ResultStore::new(StoreConfig::explicit(dir.path()));

    let old = store.load("total_abscissas", Category::InfluenceLines).unwrap();
    let old_x = store.total_abscissas().unwrap();
    let before = old.as_ref().clone();

    // The engine reruns with a longer deck
    write_artifact(
        dir.path(),
        "influence_lines",
        "total_abscissas",
        &json!([0.0, 10.0, 20.0, 30.0, 40.0]),
    );
    let report = store.reload();
    assert_eq!(report.generation, 1);
    assert!(report.is_complete());

    let new = store.load("total_abscissas", Category::InfluenceLines).unwrap();
    assert_eq!(new.as_array().unwrap().len(), 5);
    assert_eq!(*old, before);
    assert_eq!(old_x.len(), 7);
    assert_eq!(store.total_abscissas().unwrap().len(), 5);
}

#[test]
fn reload_refreshes_every_cached_artifact() {
    let dir = bridge_dataset();
    let reader = CountingReader::default();
    let store = ResultStore::with_reader(StoreConfig::explicit(dir.path()), Box::new(reader.clone()));

    store.load("span_moments", Category::InfluenceLines).unwrap();
    store.load("max_span_moments", Category::Analysis).unwrap();
    assert_eq!(reader.count(), 2);

    store.reload();
    assert_eq!(reader.count(), 4);
    assert_eq!(store.cached_keys().len(), 2);

    // Served from the reloaded snapshot
    store.load("span_moments", Category::InfluenceLines).unwrap();
    assert_eq!(reader.count(), 4);
}

#[test]
fn reload_after_rerun_that_drops_an_artifact() {
    let dir = bridge_dataset();
    write_artifact(
        dir.path(),
        "analysis",
        "max_span_shear_forces",
        &json!({ "index_travee": 2, "index_section": 1 }),
    );
    let store = ResultStore::new(StoreConfig::explicit(dir.path()));
    let selector = MaximumSelector::new(&store);

    assert_eq!(store.total_abscissas().unwrap().len(), 7);
    let before = selector.select(CurveFamily::SpanShearForces, MaximumPolicy::Point).unwrap();
    assert_eq!(before.source, "max_span_shear_forces");

    // The rerun writes a shorter deck and no shear maximum record
    write_artifact(dir.path(), "influence_lines", "total_abscissas", &json!([0.0, 15.0, 30.0]));
    fs::remove_file(dir.path().join("analysis/max_span_shear_forces.json")).unwrap();

    let report = store.reload();
    assert_eq!(report.generation, 1);
    assert_eq!(report.missing, vec![ArtifactKey::new("max_span_shear_forces", Category::Analysis)]);
    assert!(report
        .reloaded
        .contains(&ArtifactKey::new("total_abscissas", Category::InfluenceLines)));

    assert_eq!(store.total_abscissas().unwrap().len(), 3);
    let after = selector.select(CurveFamily::SpanShearForces, MaximumPolicy::Point).unwrap();
    assert_eq!(after.source, "max_span_moments");
    assert!(after.fallback);
}

#[test]
fn legacy_search_finds_second_fallback_root() {
    let base = TempDir::new().unwrap();
    let cwd = base.path().join("app").join("build").join("bin");
    fs::create_dir_all(&cwd).unwrap();

    // <cwd>/../../../data/results == <base>/data/results
    write_bridge(&base.path().join("data").join("results"));

    let store = ResultStore::new(StoreConfig::legacy(&cwd));
    let value = store.load("span_moments", Category::InfluenceLines).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 3);
}

#[test]
fn legacy_search_prefers_primary_root() {
    let base = TempDir::new().unwrap();
    let cwd = base.path().join("app").join("build").join("bin");
    fs::create_dir_all(&cwd).unwrap();

    write_artifact(&cwd.join("data/results"), "properties", "span_lengths", &json!([1.0]));
    write_artifact(&base.path().join("data/results"), "properties", "span_lengths", &json!([2.0, 3.0]));

    let store = ResultStore::new(StoreConfig::legacy(&cwd));
    let value = store.load("span_lengths", Category::Properties).unwrap();
    assert_eq!(*value, json!([1.0]));
}

#[test]
fn missing_everywhere_names_all_three_paths() {
    let base = TempDir::new().unwrap();
    let cwd = base.path().join("a").join("b").join("c");
    fs::create_dir_all(&cwd).unwrap();

    let store = ResultStore::new(StoreConfig::legacy(&cwd));
    let err = store.load("span_moments", Category::InfluenceLines).unwrap_err();

    match &err {
        InflError::DataNotFound { artifact, category, tried } => {
            assert_eq!(artifact, "span_moments");
            assert_eq!(category, "influence_lines");
            assert_eq!(tried.len(), 3);
            assert!(tried[0].ends_with("c/data/results/influence_lines/span_moments.json"));
            assert!(tried[1].contains("../../../data/results/influence_lines/span_moments.json"));
            assert!(tried[2].ends_with("c/../data/results/influence_lines/span_moments.json"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_recoverable());
}

#[test]
fn available_reports_catalogue_entries_present() {
    let dir = bridge_dataset();
    let store = ResultStore::new(StoreConfig::explicit(dir.path()));

    let analysis = store.available(Category::Analysis);
    assert!(analysis.contains(&"max_span_moments"));
    assert!(analysis.contains(&"support_moment_areas"));
    assert!(!analysis.contains(&"section_shear_areas"));
    assert_eq!(store.available(Category::InfluenceLines).len(), 8);
}

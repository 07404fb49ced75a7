#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use infl_core::file_io::{ArtifactReader, FsReader};
use serde_json::{json, Value};
use tempfile::TempDir;

pub fn write_artifact(root: &Path, category: &str, name: &str, value: &Value) {
    let dir = root.join(category);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(format!("{}.json", name)),
        serde_json::to_string_pretty(value).unwrap(),
    )
    .unwrap();
}

/// Filesystem reader that counts every read.
#[derive(Clone, Default)]
pub struct CountingReader {
    pub reads: Arc<AtomicUsize>,
}

impl CountingReader {
    pub fn count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ArtifactReader for CountingReader {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        FsReader.read_to_string(path)
    }
}

/// Three-span deck, supports at 0 / 10 / 22 / 30, seven shared abscissas.
///
/// Each span has two sections; shear forces are sampled on their own
/// per-section axes.
pub fn bridge_dataset() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_bridge(dir.path());
    dir
}

pub fn write_bridge(root: &Path) {
    let x = json!([0.0, 5.0, 10.0, 16.0, 22.0, 26.0, 30.0]);
    write_artifact(root, "influence_lines", "total_abscissas", &x);
    write_artifact(root, "properties", "neouds_lengths", &json!([0.0, 10.0, 22.0, 30.0]));

    let section = |peak: f64| json!([0.0, peak, 0.0, -peak / 4.0, 0.0, peak / 10.0, 0.0]);
    let nested = json!([
        [section(2.5), section(1.8)],
        [section(3.1), section(2.2)],
        [section(1.2), section(0.9)]
    ]);
    for family in ["span_moments", "span_rotations", "span_deflections"] {
        write_artifact(root, "influence_lines", family, &nested);
    }

    write_artifact(
        root,
        "influence_lines",
        "shear_abscissas",
        &json!([
            [[0.0, 5.0, 10.0], [0.0, 2.5, 5.0, 7.5]],
            [[10.0, 16.0, 22.0], [10.0, 13.0, 16.0, 19.0]],
            [[22.0, 26.0, 30.0], [22.0, 24.0, 26.0, 28.0]]
        ]),
    );
    write_artifact(
        root,
        "influence_lines",
        "span_shear_forces",
        &json!([
            [[0.5, -0.5, 0.0], [1.0, 0.5, -0.5, 0.0]],
            [[0.4, -0.6, 0.0], [0.9, 0.4, -0.6, 0.0]],
            [[0.3, -0.7, 0.0], [0.8, 0.3, -0.7, 0.0]]
        ]),
    );

    write_artifact(
        root,
        "influence_lines",
        "support_moments",
        &json!([
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, -1.2, 0.0, -0.8, 0.0, 0.2, 0.0],
            [0.0, 0.3, 0.0, -1.1, 0.0, -0.9, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        ]),
    );
    write_artifact(
        root,
        "influence_lines",
        "support_reactions",
        &json!([[1.0, 0.5, 0.0], [0.0, 1.0, 0.0], [0.0, 0.5, 1.0]]),
    );

    write_artifact(
        root,
        "analysis",
        "max_span_moments",
        &json!({ "index_travee": 1, "index_section": 0, "valeur": 3.1 }),
    );
    write_artifact(root, "analysis", "max_support_moments", &json!({ "appuis": 2 }));
    write_artifact(
        root,
        "analysis",
        "largest_moment_areas",
        &json!({ "plus_grande_aire": [
            { "travee": 2, "section": 1, "aire": 14.5 },
            { "travee": 1, "section": 0, "aire": 12.0 }
        ] }),
    );
    write_artifact(
        root,
        "analysis",
        "support_moment_areas",
        &json!({ "appui_1": [4.0, 8.0], "appui_2": [-10.0, -20.0], "appui_3": [2.0, 3.0] }),
    );
}

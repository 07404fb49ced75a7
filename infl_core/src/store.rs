//! # Result Store
//!
//! Resolves `(artifact, category)` pairs to payloads written by the
//! calculation engine and caches them for the life of the current snapshot.
//!
//! ## Snapshots
//!
//! Everything the store has loaded lives in one immutable-once-filled
//! snapshot behind an `Arc`. [`ResultStore::clear_cache`] and
//! [`ResultStore::reload`] replace the whole snapshot in a single swap, so a
//! reader sees either the old data or the new data, never a mix. Payloads
//! already handed out stay valid and unchanged after a swap; they simply
//! stop being what the store returns.
//!
//! ## Example
//!
//! ```rust,no_run
//! use infl_core::config::StoreConfig;
//! use infl_core::dataset::Category;
//! use infl_core::store::ResultStore;
//!
//! let store = ResultStore::new(StoreConfig::explicit("data/results"));
//! let moments = store.load("span_moments", Category::InfluenceLines)?;
//! println!("{} spans", moments.as_array().map(Vec::len).unwrap_or(0));
//!
//! // The engine reran: pick up the new files
//! let report = store.reload();
//! assert!(report.missing.is_empty());
//! # Ok::<(), infl_core::errors::InflError>(())
//! ```

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::dataset::{ArtifactKey, Category, NODE_POSITIONS, SHEAR_ABSCISSAS, TOTAL_ABSCISSAS};
use crate::errors::{InflError, InflResult};
use crate::file_io::{read_json, ArtifactReader, FsReader, ReadFailure};
use crate::payload;

/// Shear abscissas, indexed `[span][section][sample]`
pub type ShearAbscissas = Vec<Vec<Vec<f64>>>;

/// Outcome of [`ResultStore::reload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReloadReport {
    /// Generation of the snapshot now installed
    pub generation: u64,
    /// Keys re-read into the new snapshot, sorted
    pub reloaded: Vec<ArtifactKey>,
    /// Previously cached keys that no longer resolve, sorted
    pub missing: Vec<ArtifactKey>,
}

impl ReloadReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// One generation of loaded data.
struct Snapshot {
    generation: u64,
    loaded_at: DateTime<Utc>,
    artifacts: RwLock<HashMap<ArtifactKey, Arc<Value>>>,
    total_abscissas: OnceCell<Arc<Vec<f64>>>,
    shear_abscissas: OnceCell<Arc<ShearAbscissas>>,
    node_positions: OnceCell<Arc<Vec<f64>>>,
}

impl Snapshot {
    fn new(generation: u64, artifacts: HashMap<ArtifactKey, Arc<Value>>) -> Self {
        Snapshot {
            generation,
            loaded_at: Utc::now(),
            artifacts: RwLock::new(artifacts),
            total_abscissas: OnceCell::new(),
            shear_abscissas: OnceCell::new(),
            node_positions: OnceCell::new(),
        }
    }

    fn cached(&self, key: &ArtifactKey) -> Option<Arc<Value>> {
        self.artifacts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn keys(&self) -> Vec<ArtifactKey> {
        let mut keys: Vec<ArtifactKey> = self
            .artifacts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

/// Loads and caches engine result artifacts.
pub struct ResultStore {
    config: StoreConfig,
    reader: Box<dyn ArtifactReader>,
    snapshot: RwLock<Arc<Snapshot>>,
}

impl std::fmt::Debug for ResultStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.current();
        f.debug_struct("ResultStore")
            .field("config", &self.config)
            .field("generation", &snapshot.generation)
            .field("cached", &snapshot.keys().len())
            .finish()
    }
}

impl ResultStore {
    /// Create a store reading from the filesystem.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_reader(config, Box::new(FsReader))
    }

    /// Create a store with a custom reader.
    pub fn with_reader(config: StoreConfig, reader: Box<dyn ArtifactReader>) -> Self {
        if config.is_legacy() {
            warn!(
                roots = ?config.candidate_roots(),
                "using legacy dataset search; configure an explicit root instead"
            );
        }
        ResultStore {
            config,
            reader,
            snapshot: RwLock::new(Arc::new(Snapshot::new(0, HashMap::new()))),
        }
    }

    /// Create a filesystem store configured from the environment.
    pub fn from_env() -> InflResult<Self> {
        Ok(Self::new(StoreConfig::from_env()?))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn current(&self) -> Arc<Snapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Snapshot generation, bumped by every cache clear or reload
    pub fn generation(&self) -> u64 {
        self.current().generation
    }

    /// When the current snapshot was started
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.current().loaded_at
    }

    /// Keys currently held in the cache, sorted
    pub fn cached_keys(&self) -> Vec<ArtifactKey> {
        self.current().keys()
    }

    /// Load a payload, from the cache when possible.
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<Value>)` - The payload exactly as persisted
    /// * `Err(InflError::DataNotFound)` - No candidate root holds a readable,
    ///   well-formed file; the error lists every path tried
    pub fn load(&self, artifact: &str, category: Category) -> InflResult<Arc<Value>> {
        self.load_key(&ArtifactKey::new(artifact, category))
    }

    /// Load a payload by key.
    pub fn load_key(&self, key: &ArtifactKey) -> InflResult<Arc<Value>> {
        let snapshot = self.current();
        self.load_in(&snapshot, key)
    }

    fn load_in(&self, snapshot: &Snapshot, key: &ArtifactKey) -> InflResult<Arc<Value>> {
        if let Some(value) = snapshot.cached(key) {
            debug!(artifact = %key, "cache hit");
            return Ok(value);
        }

        debug!(artifact = %key, "cache miss");
        let value = Arc::new(self.resolve(key)?);
        let mut artifacts = snapshot
            .artifacts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(artifacts.entry(key.clone()).or_insert(value).clone())
    }

    /// Read a key from disk, probing candidate roots in order.
    fn resolve(&self, key: &ArtifactKey) -> InflResult<Value> {
        let mut tried = Vec::new();

        for root in self.config.candidate_roots() {
            let path = key.path_under(&root, &self.config.extension);
            debug!(artifact = %key, path = %path.display(), "probing");

            match read_json(self.reader.as_ref(), &path) {
                Ok(value) => {
                    info!(artifact = %key, path = %path.display(), "loaded artifact");
                    return Ok(value);
                }
                Err(ReadFailure::Io(e)) if e.kind() == io::ErrorKind::NotFound => {}
                Err(failure) => {
                    warn!(artifact = %key, path = %path.display(), "skipping unusable file: {}", failure);
                }
            }
            tried.push(path.display().to_string());
        }

        Err(InflError::data_not_found(
            key.name.clone(),
            key.category.dir_name(),
            tried,
        ))
    }

    /// Load a payload and deserialize it into a typed record.
    pub fn load_as<T: DeserializeOwned>(
        &self,
        artifact: &str,
        category: Category,
        expected: &str,
    ) -> InflResult<T> {
        let value = self.load(artifact, category)?;
        T::deserialize(value.as_ref())
            .map_err(|e| InflError::malformed(artifact, expected, e.to_string()))
    }

    /// Shared abscissa array `total_abscissas`, parsed once per snapshot
    pub fn total_abscissas(&self) -> InflResult<Arc<Vec<f64>>> {
        let snapshot = self.current();
        let key = ArtifactKey::new(TOTAL_ABSCISSAS, Category::InfluenceLines);
        snapshot
            .total_abscissas
            .get_or_try_init(|| {
                let value = self.load_in(&snapshot, &key)?;
                payload::as_series(&value, TOTAL_ABSCISSAS, "top level").map(Arc::new)
            })
            .cloned()
    }

    /// Per-span, per-section abscissas `shear_abscissas`, parsed once per snapshot
    pub fn shear_abscissas(&self) -> InflResult<Arc<ShearAbscissas>> {
        let snapshot = self.current();
        let key = ArtifactKey::new(SHEAR_ABSCISSAS, Category::InfluenceLines);
        snapshot
            .shear_abscissas
            .get_or_try_init(|| {
                let value = self.load_in(&snapshot, &key)?;
                payload::as_nested_series(&value, SHEAR_ABSCISSAS).map(Arc::new)
            })
            .cloned()
    }

    /// Support positions `neouds_lengths`, parsed once per snapshot
    pub fn node_positions(&self) -> InflResult<Arc<Vec<f64>>> {
        let snapshot = self.current();
        let key = ArtifactKey::new(NODE_POSITIONS, Category::Properties);
        snapshot
            .node_positions
            .get_or_try_init(|| {
                let value = self.load_in(&snapshot, &key)?;
                payload::as_series(&value, NODE_POSITIONS, "top level").map(Arc::new)
            })
            .cloned()
    }

    /// First existing path for a key, without loading it
    pub fn locate(&self, key: &ArtifactKey) -> Option<PathBuf> {
        self.config
            .candidate_roots()
            .into_iter()
            .map(|root| key.path_under(&root, &self.config.extension))
            .find(|path| self.reader.exists(path))
    }

    /// Catalogue artifacts of a category that exist under some candidate root
    pub fn available(&self, category: Category) -> Vec<&'static str> {
        category
            .known_artifacts()
            .iter()
            .copied()
            .filter(|name| self.locate(&ArtifactKey::new(*name, category)).is_some())
            .collect()
    }

    /// Drop every cached payload; the next access reads from disk again.
    pub fn clear_cache(&self) {
        let generation = self.install(HashMap::new());
        info!(generation, "result cache cleared");
    }

    /// Re-read every artifact held in the cache and swap in the new data.
    ///
    /// The replacement snapshot is built completely before it is installed
    /// and always replaces the previous one. Keys that no longer resolve are
    /// left out of it and listed in [`ReloadReport::missing`]; loading them
    /// again reports the current `DataNotFound`.
    pub fn reload(&self) -> ReloadReport {
        let previous = self.current();
        let mut artifacts = HashMap::new();
        let mut missing = Vec::new();
        for key in previous.keys() {
            match self.resolve(&key) {
                Ok(value) => {
                    artifacts.insert(key, Arc::new(value));
                }
                Err(e) => {
                    warn!(artifact = %key, "dropped from cache on reload: {}", e);
                    missing.push(key);
                }
            }
        }

        let mut reloaded: Vec<ArtifactKey> = artifacts.keys().cloned().collect();
        reloaded.sort();
        let generation = self.install(artifacts);
        info!(generation, artifacts = reloaded.len(), missing = missing.len(), "result store reloaded");
        ReloadReport {
            generation,
            reloaded,
            missing,
        }
    }

    /// Publish a new snapshot under one write guard; returns its generation.
    fn install(&self, artifacts: HashMap<ArtifactKey, Arc<Value>>) -> u64 {
        let mut slot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        let generation = slot.generation + 1;
        *slot = Arc::new(Snapshot::new(generation, artifacts));
        generation
    }
}

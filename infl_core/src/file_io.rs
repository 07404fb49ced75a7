//! # File I/O Module
//!
//! Low-level reads used by the result store and the configuration loader.
//!
//! File access goes through the [`ArtifactReader`] trait so the store can be
//! driven by something other than the real filesystem (tests count reads
//! through it to check that cached artifacts are not read twice).
//!
//! ## Example
//!
//! ```rust,no_run
//! use infl_core::file_io::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("infl.json"))?;
//! println!("Roots: {:?}", config.candidate_roots());
//! # Ok::<(), infl_core::errors::InflError>(())
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde_json::Value;

use crate::config::StoreConfig;
use crate::errors::{InflError, InflResult};

/// Source of artifact file contents.
pub trait ArtifactReader: Send + Sync {
    /// Read the whole file at `path` as UTF-8 text
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Whether a file exists at `path` (used for listings, never for loads)
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Reads artifacts from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl ArtifactReader for FsReader {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Ok(contents)
    }
}

/// Why a single candidate file could not be used.
#[derive(Debug)]
pub enum ReadFailure {
    /// The file does not exist or could not be read
    Io(io::Error),
    /// The file exists but is not valid JSON
    Parse(serde_json::Error),
}

impl std::fmt::Display for ReadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadFailure::Io(e) => write!(f, "{}", e),
            ReadFailure::Parse(e) => write!(f, "invalid JSON: {}", e),
        }
    }
}

/// Read and parse one JSON file through a reader.
pub fn read_json(reader: &dyn ArtifactReader, path: &Path) -> Result<Value, ReadFailure> {
    let contents = reader.read_to_string(path).map_err(ReadFailure::Io)?;
    serde_json::from_str(&contents).map_err(ReadFailure::Parse)
}

/// Load a store configuration from a JSON file.
///
/// # Returns
///
/// * `Ok(StoreConfig)` - Successfully loaded
/// * `Err(InflError::ConfigError)` - Missing file or invalid contents
pub fn load_config(path: &Path) -> InflResult<StoreConfig> {
    let contents = FsReader.read_to_string(path).map_err(|e| {
        InflError::config(format!("cannot read {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        InflError::config(format!("invalid configuration in {}: {}", path.display(), e))
    })
}

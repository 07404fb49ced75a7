//! # Store Configuration
//!
//! Where the [`ResultStore`](crate::store::ResultStore) looks for result
//! files. The normal setup is a single explicit dataset root passed at
//! startup. The legacy search reproduces the three relative locations the
//! engine used to write to, depending on the directory the viewer was
//! launched from, and is kept only so existing installations keep working.
//!
//! ## Environment
//!
//! - `INFL_DATA_ROOT` - explicit dataset root (takes precedence)
//! - `INFL_LEGACY_SEARCH` - `1`/`true` to search relative to the current
//!   directory; this is also the fallback when nothing is set
//!
//! ## Example
//!
//! ```rust
//! use infl_core::config::{DataRoot, StoreConfig};
//!
//! let config = StoreConfig::explicit("/srv/bridge/data/results");
//! assert_eq!(config.candidate_roots().len(), 1);
//!
//! let legacy = StoreConfig::legacy("/opt/viewer");
//! assert_eq!(legacy.candidate_roots().len(), 3);
//! assert!(matches!(legacy.root, DataRoot::LegacySearch { .. }));
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{InflError, InflResult};

/// Environment variable naming an explicit dataset root
pub const ENV_DATA_ROOT: &str = "INFL_DATA_ROOT";

/// Environment variable enabling the legacy relative search
pub const ENV_LEGACY_SEARCH: &str = "INFL_LEGACY_SEARCH";

/// Default artifact file extension
pub const DEFAULT_EXTENSION: &str = "json";

/// Relative roots probed by the legacy search, in order
pub const LEGACY_RELATIVE_ROOTS: [&str; 3] = [
    "data/results",
    "../../../data/results",
    "../data/results",
];

/// How the dataset root is located.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DataRoot {
    /// One configured root directory
    Explicit { path: PathBuf },
    /// Probe the legacy relative roots below `cwd`, first hit wins
    LegacySearch { cwd: PathBuf },
}

/// Configuration of a result store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub root: DataRoot,

    /// Artifact file extension, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl StoreConfig {
    /// Configuration with a single explicit root
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            root: DataRoot::Explicit { path: path.into() },
            extension: default_extension(),
        }
    }

    /// Configuration using the legacy three-root search below `cwd`
    pub fn legacy(cwd: impl Into<PathBuf>) -> Self {
        StoreConfig {
            root: DataRoot::LegacySearch { cwd: cwd.into() },
            extension: default_extension(),
        }
    }

    /// Build a configuration from the process environment.
    pub fn from_env() -> InflResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| InflError::config(format!("cannot read current directory: {}", e)))?;
        Self::from_vars(|key| std::env::var(key).ok(), &cwd)
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>, cwd: &Path) -> InflResult<Self> {
        if let Some(root) = lookup(ENV_DATA_ROOT).filter(|v| !v.trim().is_empty()) {
            return Ok(Self::explicit(root.trim()));
        }

        match lookup(ENV_LEGACY_SEARCH).as_deref().map(str::trim) {
            None | Some("") | Some("1") | Some("true") | Some("yes") => Ok(Self::legacy(cwd)),
            Some("0") | Some("false") | Some("no") => Err(InflError::config(format!(
                "legacy search disabled but {} is not set",
                ENV_DATA_ROOT
            ))),
            Some(other) => Err(InflError::config(format!(
                "{} must be a boolean, got '{}'",
                ENV_LEGACY_SEARCH, other
            ))),
        }
    }

    /// Roots to probe, in order
    pub fn candidate_roots(&self) -> Vec<PathBuf> {
        match &self.root {
            DataRoot::Explicit { path } => vec![path.clone()],
            DataRoot::LegacySearch { cwd } => LEGACY_RELATIVE_ROOTS
                .iter()
                .map(|relative| cwd.join(relative))
                .collect(),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self.root, DataRoot::LegacySearch { .. })
    }
}

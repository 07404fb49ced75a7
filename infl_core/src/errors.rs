//! # Error Types
//!
//! Structured error types for infl_core. Every variant carries enough context
//! for the calling shell to tell the user exactly which artifact, family or
//! index was involved, and serializes to JSON so a front end can display it
//! without parsing message strings.
//!
//! None of these errors is fatal to the process. The store never retries on
//! its own: result files only change when the external engine reruns.
//!
//! ## Example
//!
//! ```rust
//! use infl_core::errors::{InflError, InflResult};
//!
//! fn check_lengths(x: &[f64], y: &[f64]) -> InflResult<()> {
//!     if x.len() != y.len() {
//!         return Err(InflError::shape_mismatch("span_moments", 0, 0, x.len(), y.len()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_lengths(&[0.0, 1.0], &[2.0]).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for infl_core operations
pub type InflResult<T> = Result<T, InflError>;

/// Structured error type for dataset access and curve assembly.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum InflError {
    /// Artifact not found (or unreadable) under any candidate root
    #[error("Artifact '{artifact}' not found in category '{category}' (tried: {})", tried.join(", "))]
    DataNotFound {
        artifact: String,
        category: String,
        tried: Vec<String>,
    },

    /// Abscissa and ordinate arrays of a curve have different lengths
    #[error("Shape mismatch for {family} (span {span}, section {section}): x has {x_len} values, y has {y_len}")]
    ShapeMismatch {
        family: String,
        span: usize,
        section: usize,
        x_len: usize,
        y_len: usize,
    },

    /// No extremum record usable for this family and policy
    #[error("No {policy} maximum available for {family}: {reason}")]
    MaximumUnavailable {
        family: String,
        policy: String,
        reason: String,
    },

    /// Payload exists but does not have the expected structure
    #[error("Malformed payload in '{artifact}': expected {expected} - {reason}")]
    MalformedPayload {
        artifact: String,
        expected: String,
        reason: String,
    },

    /// An index was not clamped before a strict lookup
    #[error("{axis} index {index} out of range for {family} (len {len})")]
    IndexOutOfRange {
        family: String,
        axis: String,
        index: usize,
        len: usize,
    },

    /// The family payload holds no curves at all
    #[error("No curves available for {family}")]
    EmptyDataset { family: String },

    /// Store configuration could not be read or is inconsistent
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },
}

impl InflError {
    /// Create a DataNotFound error
    pub fn data_not_found(
        artifact: impl Into<String>,
        category: impl Into<String>,
        tried: Vec<String>,
    ) -> Self {
        InflError::DataNotFound {
            artifact: artifact.into(),
            category: category.into(),
            tried,
        }
    }

    /// Create a ShapeMismatch error
    pub fn shape_mismatch(
        family: impl Into<String>,
        span: usize,
        section: usize,
        x_len: usize,
        y_len: usize,
    ) -> Self {
        InflError::ShapeMismatch {
            family: family.into(),
            span,
            section,
            x_len,
            y_len,
        }
    }

    /// Create a MaximumUnavailable error
    pub fn maximum_unavailable(
        family: impl Into<String>,
        policy: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        InflError::MaximumUnavailable {
            family: family.into(),
            policy: policy.into(),
            reason: reason.into(),
        }
    }

    /// Create a MalformedPayload error
    pub fn malformed(
        artifact: impl Into<String>,
        expected: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        InflError::MalformedPayload {
            artifact: artifact.into(),
            expected: expected.into(),
            reason: reason.into(),
        }
    }

    /// Create an IndexOutOfRange error
    pub fn index_out_of_range(
        family: impl Into<String>,
        axis: impl Into<String>,
        index: usize,
        len: usize,
    ) -> Self {
        InflError::IndexOutOfRange {
            family: family.into(),
            axis: axis.into(),
            index,
            len,
        }
    }

    /// Create a ConfigError
    pub fn config(reason: impl Into<String>) -> Self {
        InflError::ConfigError {
            reason: reason.into(),
        }
    }

    /// Whether the caller can recover (keep its previous state and carry on).
    ///
    /// Only a broken configuration needs operator action before anything
    /// else can work.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, InflError::ConfigError { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            InflError::DataNotFound { .. } => "DATA_NOT_FOUND",
            InflError::ShapeMismatch { .. } => "SHAPE_MISMATCH",
            InflError::MaximumUnavailable { .. } => "MAXIMUM_UNAVAILABLE",
            InflError::MalformedPayload { .. } => "MALFORMED_PAYLOAD",
            InflError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            InflError::EmptyDataset { .. } => "EMPTY_DATASET",
            InflError::ConfigError { .. } => "CONFIG_ERROR",
        }
    }
}

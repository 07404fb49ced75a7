//! # infl_core - Influence Line Result Access
//!
//! `infl_core` loads the influence-line results a bridge-deck calculation
//! engine writes to disk (moments, shear forces, rotations, deflections and
//! support reactions for every span and section), assembles plottable curves
//! out of them and picks the governing worst-case curve of each family.
//!
//! The engine is an external producer. This crate never computes influence
//! lines; it reads `<root>/<category>/<artifact>.json` files and checks that
//! what it hands out is consistent.
//!
//! ## Entry points
//!
//! - [`ResultStore::load`] - payload of one artifact, cached per snapshot
//! - [`ResultStore::clear_cache`] / [`ResultStore::reload`] - pick up a new engine run
//! - [`CurveResolver::resolve`] - x/y arrays of one `(family, span, section)`
//! - [`MaximumSelector::select`] - governing `(span, section)` under a policy
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use infl_core::{CurveFamily, CurveResolver, MaximumPolicy, MaximumSelector, ResultStore, StoreConfig};
//!
//! let store = ResultStore::new(StoreConfig::explicit("data/results"));
//!
//! let governing = MaximumSelector::new(&store).select(CurveFamily::SpanMoments, MaximumPolicy::Area)?;
//! let curve = CurveResolver::new(&store).resolve(
//!     CurveFamily::SpanMoments,
//!     governing.span,
//!     governing.section.unwrap_or(0),
//! )?;
//! println!("{}: {} samples", curve.label, curve.len());
//! # Ok::<(), infl_core::InflError>(())
//! ```
//!
//! ## Modules
//!
//! - [`store`] - Artifact loading, root resolution and snapshot cache
//! - [`curve`] - Curve assembly and index clamping
//! - [`maximum`] - Point and area governing-curve selection
//! - [`family`] - The six curve families and their indexing rules
//! - [`dataset`] - Categories and artifact catalogue
//! - [`axis`] - Tick labels and structural overlay positions
//! - [`config`] - Dataset root configuration
//! - [`errors`] - Structured error types
//! - [`file_io`] - Reader abstraction and JSON file reads

pub mod axis;
pub mod config;
pub mod curve;
pub mod dataset;
pub mod errors;
pub mod family;
pub mod file_io;
pub mod maximum;
pub mod payload;
pub mod store;

// Re-export commonly used types at crate root for convenience
pub use config::{DataRoot, StoreConfig};
pub use curve::{Curve, CurveResolver, IndexBounds};
pub use dataset::{ArtifactKey, Category};
pub use errors::{InflError, InflResult};
pub use family::{CurveFamily, IndexShape};
pub use maximum::{Governing, MaximumPolicy, MaximumSelector};
pub use store::{ReloadReport, ResultStore};

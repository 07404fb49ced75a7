//! # Dataset Layout
//!
//! The calculation engine writes one JSON file per artifact:
//!
//! ```text
//! <root>/<category>/<artifact>.json
//! ```
//!
//! A category and an artifact name together address exactly one payload.
//! This module names the five categories and the artifacts the engine is
//! known to produce in each of them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// =============================================================================
// CATEGORY
// =============================================================================

/// A directory of related result artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Section and material properties, node positions
    Properties,
    /// Boundary condition results
    BoundaryConditions,
    /// Raw influence-line curves and their abscissas
    InfluenceLines,
    /// Post-processed extrema and areas
    Analysis,
    /// Static load case results
    StaticAnalysis,
}

impl Category {
    /// All categories, in directory listing order
    pub const ALL: [Category; 5] = [
        Category::Properties,
        Category::BoundaryConditions,
        Category::InfluenceLines,
        Category::Analysis,
        Category::StaticAnalysis,
    ];

    /// Directory name under the dataset root
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Properties => "properties",
            Category::BoundaryConditions => "boundary_conditions",
            Category::InfluenceLines => "influence_lines",
            Category::Analysis => "analysis",
            Category::StaticAnalysis => "static_analysis",
        }
    }

    /// Parse a directory name back into a category
    pub fn from_dir_name(name: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.dir_name() == name)
    }

    /// Artifacts the calculation engine writes into this category.
    ///
    /// Informational only: the store loads any name it is given and simply
    /// fails to resolve unknown ones.
    pub fn known_artifacts(&self) -> &'static [&'static str] {
        match self {
            Category::Properties => &[
                "abscissas_of_moment_of_inertia",
                "coefficient_a",
                "coefficient_b",
                "coefficient_c",
                "moment_of_inertia",
                "neouds_lengths",
                "phi_prime",
                "phi",
                "span_lengths",
                "young_modulus",
            ],
            Category::BoundaryConditions => &["support_moments"],
            Category::InfluenceLines => &[
                "shear_abscissas",
                "span_deflections",
                "span_moments",
                "span_rotations",
                "span_shear_forces",
                "support_moments",
                "support_reactions",
                "total_abscissas",
            ],
            Category::Analysis => &[
                "largest_moment_areas",
                "max_span_moments",
                "max_support_moments",
                "section_moment_areas",
                "section_rotation_areas",
                "section_shear_areas",
                "split_span_moment_areas",
                "support_moment_areas",
            ],
            Category::StaticAnalysis => &[
                "abscissas",
                "bending_moments",
                "deflections",
                "rotations",
                "shear_abscissas",
                "shear_forces",
            ],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

// =============================================================================
// ARTIFACT KEY
// =============================================================================

/// Cache key and address of one payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactKey {
    pub category: Category,
    pub name: String,
}

impl ArtifactKey {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        ArtifactKey {
            category,
            name: name.into(),
        }
    }

    /// Path of this artifact under a dataset root
    pub fn path_under(&self, root: &Path, extension: &str) -> PathBuf {
        root.join(self.category.dir_name())
            .join(format!("{}.{}", self.name, extension))
    }
}

impl std::fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.category, self.name)
    }
}

// Artifact names the core reads directly.
pub const TOTAL_ABSCISSAS: &str = "total_abscissas";
pub const SHEAR_ABSCISSAS: &str = "shear_abscissas";
pub const NODE_POSITIONS: &str = "neouds_lengths";
pub const MAX_SPAN_MOMENTS: &str = "max_span_moments";
pub const MAX_SUPPORT_MOMENTS: &str = "max_support_moments";
pub const LARGEST_MOMENT_AREAS: &str = "largest_moment_areas";
pub const SUPPORT_MOMENT_AREAS: &str = "support_moment_areas";

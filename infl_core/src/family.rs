//! # Curve Families
//!
//! The six influence-line families the engine produces. Each family is
//! described by one row of [`FAMILY_TABLE`]: its artifact name, how its
//! payload is indexed and which abscissa array supplies its x-axis.
//! Adding a family means adding a variant and a table row.
//!
//! ## Payload shapes
//!
//! - [`IndexShape::SectionNested`]: `payload[span][section][sample]`
//! - [`IndexShape::FlatPerSupport`]: `payload[support][sample]`

use serde::{Deserialize, Serialize};

/// How a family's payload is indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexShape {
    /// Sequence of spans, each a sequence of sections, each a curve
    SectionNested,
    /// Sequence of supports, each directly a curve
    FlatPerSupport,
}

/// Which abscissa array supplies a family's x-values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbscissaSource {
    /// `total_abscissas`, shared by every curve
    Total,
    /// `shear_abscissas[span][section]`
    ShearPerSection,
    /// `shear_abscissas[span][0]`, the first section's axis reused per support
    ShearFirstSection,
}

/// Influence-line curve family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveFamily {
    SpanMoments,
    SpanRotations,
    SpanDeflections,
    SpanShearForces,
    SupportMoments,
    SupportReactions,
}

/// One row of the family dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyEntry {
    pub family: CurveFamily,
    /// Artifact name inside `influence_lines`
    pub artifact: &'static str,
    pub shape: IndexShape,
    pub abscissa: AbscissaSource,
    /// Human-readable name shown in the family picker
    pub display_name: &'static str,
}

/// Dispatch table, one row per family, in [`CurveFamily::ALL`] order.
pub const FAMILY_TABLE: [FamilyEntry; 6] = [
    FamilyEntry {
        family: CurveFamily::SpanMoments,
        artifact: "span_moments",
        shape: IndexShape::SectionNested,
        abscissa: AbscissaSource::Total,
        display_name: "Moments de Travee",
    },
    FamilyEntry {
        family: CurveFamily::SpanRotations,
        artifact: "span_rotations",
        shape: IndexShape::SectionNested,
        abscissa: AbscissaSource::Total,
        display_name: "Rotations",
    },
    FamilyEntry {
        family: CurveFamily::SpanDeflections,
        artifact: "span_deflections",
        shape: IndexShape::SectionNested,
        abscissa: AbscissaSource::Total,
        display_name: "Deflexions",
    },
    FamilyEntry {
        family: CurveFamily::SpanShearForces,
        artifact: "span_shear_forces",
        shape: IndexShape::SectionNested,
        abscissa: AbscissaSource::ShearPerSection,
        display_name: "Forces de Cisaillement",
    },
    FamilyEntry {
        family: CurveFamily::SupportMoments,
        artifact: "support_moments",
        shape: IndexShape::FlatPerSupport,
        abscissa: AbscissaSource::Total,
        display_name: "Moments d'Appui",
    },
    FamilyEntry {
        family: CurveFamily::SupportReactions,
        artifact: "support_reactions",
        shape: IndexShape::FlatPerSupport,
        abscissa: AbscissaSource::ShearFirstSection,
        display_name: "Reactions d'Appui",
    },
];

impl CurveFamily {
    /// All families, in picker order
    pub const ALL: [CurveFamily; 6] = [
        CurveFamily::SpanMoments,
        CurveFamily::SpanRotations,
        CurveFamily::SpanDeflections,
        CurveFamily::SpanShearForces,
        CurveFamily::SupportMoments,
        CurveFamily::SupportReactions,
    ];

    /// This family's dispatch table row
    pub fn entry(&self) -> &'static FamilyEntry {
        &FAMILY_TABLE[*self as usize]
    }

    /// Artifact name inside `influence_lines` (also the family's wire name)
    pub fn artifact(&self) -> &'static str {
        self.entry().artifact
    }

    pub fn shape(&self) -> IndexShape {
        self.entry().shape
    }

    pub fn abscissa(&self) -> AbscissaSource {
        self.entry().abscissa
    }

    /// Returns true if curves are addressed by (span, section)
    pub fn is_section_nested(&self) -> bool {
        self.shape() == IndexShape::SectionNested
    }

    /// Name of the dedicated point-maximum artifact in `analysis`
    pub fn point_maximum_artifact(&self) -> String {
        format!("max_{}", self.artifact())
    }

    /// Parse a family from its artifact name
    pub fn from_artifact(name: &str) -> Option<CurveFamily> {
        FAMILY_TABLE
            .iter()
            .find(|row| row.artifact == name)
            .map(|row| row.family)
    }

    /// Upper-case quantity word used for the y-axis title (`MOMENTS`, `SHEAR`, ...)
    pub fn quantity(&self) -> String {
        self.artifact()
            .split('_')
            .nth(1)
            .unwrap_or("values")
            .to_uppercase()
    }

    /// Legend label for one curve of this family
    pub fn curve_label(&self, span: usize, section: usize) -> String {
        match self {
            CurveFamily::SupportMoments => format!("M_{}", span),
            CurveFamily::SupportReactions => format!("R_{}", span),
            _ => format!("Travee : {}\nSection : {}", span + 1, section),
        }
    }
}

impl std::fmt::Display for CurveFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.artifact())
    }
}

impl std::str::FromStr for CurveFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurveFamily::from_artifact(s).ok_or_else(|| {
            let known: Vec<&str> = FAMILY_TABLE.iter().map(|row| row.artifact).collect();
            format!("unknown curve family '{}' (expected one of: {})", s, known.join(", "))
        })
    }
}

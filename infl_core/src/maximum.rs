//! # Governing Curve Selection
//!
//! Answers "which curve is the worst case?" for a family, under one of two
//! policies:
//!
//! - [`MaximumPolicy::Point`]: the curve holding the single worst sample,
//!   read from a precomputed `max_<family>` record in `analysis`.
//! - [`MaximumPolicy::Area`]: the curve with the largest integrated area,
//!   read from the ranked `largest_moment_areas` list, or computed from the
//!   per-support sums in `support_moment_areas` for support moments.
//!
//! Selection is a stateless query over the store's current snapshot. The
//! winner is handed to [`CurveResolver`] to get the actual arrays.
//!
//! ## Point fallback
//!
//! Only `span_moments` and `support_moments` have dedicated point records in
//! every dataset. For other families `max_<family>` is tried first, and on
//! any failure the `span_moments` record is used instead. That fallback can
//! hide a genuinely missing record, so it is logged at `warn` and flagged on
//! the result.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::curve::{Curve, CurveResolver};
use crate::dataset::{
    Category, LARGEST_MOMENT_AREAS, MAX_SPAN_MOMENTS, MAX_SUPPORT_MOMENTS, SUPPORT_MOMENT_AREAS,
};
use crate::errors::{InflError, InflResult};
use crate::family::CurveFamily;
use crate::payload;
use crate::store::ResultStore;

/// How the governing curve is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaximumPolicy {
    /// Single worst sampled value
    #[default]
    Point,
    /// Largest integrated signed area
    Area,
}

impl std::fmt::Display for MaximumPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaximumPolicy::Point => write!(f, "point"),
            MaximumPolicy::Area => write!(f, "area"),
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// Point-maximum record of a span family (`max_span_moments` and friends).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointMaximum {
    pub index_travee: usize,
    pub index_section: usize,
    /// The extreme value itself, when the engine wrote it
    #[serde(default)]
    pub valeur: Option<f64>,
}

/// Point-maximum record of the support-moment family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportPointMaximum {
    pub appuis: usize,
    #[serde(default)]
    pub valeur: Option<f64>,
}

/// One entry of the ranked area list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaRecord {
    pub travee: usize,
    pub section: usize,
    pub aire: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct AreaRanking {
    plus_grande_aire: Vec<AreaRecord>,
}

/// Winner of the support-moment area selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportAreaMaximum {
    pub support: usize,
    /// Largest absolute sum, negated when the winning sum is negative
    pub value: f64,
}

/// Result of a governing-curve query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Governing {
    pub family: CurveFamily,
    pub policy: MaximumPolicy,
    /// Span index, or support index for support families
    pub span: usize,
    /// `None` for support families
    pub section: Option<usize>,
    /// Governing value (extreme sample or signed area) when known
    pub value: Option<f64>,
    /// Artifact the decision was read from
    pub source: String,
    /// True when a missing `max_<family>` record was replaced by `max_span_moments`
    pub fallback: bool,
}

/// Pick the support whose signed sum has the largest magnitude.
///
/// Ties go to the lowest index. The reported value is the magnitude,
/// negated when the winning sum is the negative extreme, so a governing
/// hogging moment keeps its sign.
///
/// ```rust
/// use infl_core::maximum::support_area_maximum;
///
/// let winner = support_area_maximum(&[12.0, -30.0, 5.0]).unwrap();
/// assert_eq!(winner.support, 1);
/// assert_eq!(winner.value, -30.0);
/// ```
pub fn support_area_maximum(sums: &[f64]) -> Option<SupportAreaMaximum> {
    let abs_sums: Vec<f64> = sums.iter().map(|s| s.abs()).collect();
    let largest = abs_sums
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .reduce(f64::max)?;
    let support = abs_sums.iter().position(|v| *v == largest)?;

    let value = if sums[support] == -largest {
        -largest
    } else {
        largest
    };
    Some(SupportAreaMaximum { support, value })
}

// =============================================================================
// SELECTOR
// =============================================================================

/// Governing-curve queries over a [`ResultStore`].
#[derive(Debug, Clone, Copy)]
pub struct MaximumSelector<'a> {
    store: &'a ResultStore,
}

impl<'a> MaximumSelector<'a> {
    pub fn new(store: &'a ResultStore) -> Self {
        MaximumSelector { store }
    }

    /// Select the governing `(span, section)` for a family.
    ///
    /// # Returns
    ///
    /// * `Ok(Governing)` - winning indices, ready for [`CurveResolver::resolve`]
    /// * `Err(InflError::MaximumUnavailable)` - no usable record for this
    ///   family and policy
    pub fn select(&self, family: CurveFamily, policy: MaximumPolicy) -> InflResult<Governing> {
        match (family, policy) {
            (CurveFamily::SupportMoments, MaximumPolicy::Point) => self.support_point(),
            (CurveFamily::SupportMoments, MaximumPolicy::Area) => self.support_area(),
            (_, MaximumPolicy::Point) => self.span_point(family),
            (_, MaximumPolicy::Area) => self.span_area(family),
        }
    }

    /// Select, then resolve the winning curve.
    pub fn governing_curve(&self, family: CurveFamily, policy: MaximumPolicy) -> InflResult<(Governing, Curve)> {
        let governing = self.select(family, policy)?;
        let curve = CurveResolver::new(self.store).resolve(
            family,
            governing.span,
            governing.section.unwrap_or(0),
        )?;
        Ok((governing, curve))
    }

    fn governing(
        &self,
        family: CurveFamily,
        policy: MaximumPolicy,
        span: usize,
        section: usize,
        value: Option<f64>,
        source: &str,
    ) -> Governing {
        Governing {
            family,
            policy,
            span,
            section: family.is_section_nested().then_some(section),
            value,
            source: source.to_string(),
            fallback: false,
        }
    }

    fn span_point(&self, family: CurveFamily) -> InflResult<Governing> {
        let policy = MaximumPolicy::Point;

        if family != CurveFamily::SpanMoments {
            let artifact = family.point_maximum_artifact();
            match self
                .store
                .load_as::<PointMaximum>(&artifact, Category::Analysis, "{index_travee, index_section}")
            {
                Ok(record) => {
                    return Ok(self.governing(
                        family,
                        policy,
                        record.index_travee,
                        record.index_section,
                        record.valeur,
                        &artifact,
                    ));
                }
                Err(e) => {
                    warn!(%family, "no usable {} ({}), falling back to {}", artifact, e, MAX_SPAN_MOMENTS);
                }
            }
        }

        let record = self
            .store
            .load_as::<PointMaximum>(MAX_SPAN_MOMENTS, Category::Analysis, "{index_travee, index_section}")
            .map_err(|e| InflError::maximum_unavailable(family.artifact(), policy.to_string(), e.to_string()))?;

        let mut governing = self.governing(
            family,
            policy,
            record.index_travee,
            record.index_section,
            record.valeur,
            MAX_SPAN_MOMENTS,
        );
        governing.fallback = family != CurveFamily::SpanMoments;
        Ok(governing)
    }

    fn support_point(&self) -> InflResult<Governing> {
        let family = CurveFamily::SupportMoments;
        let policy = MaximumPolicy::Point;
        let record = self
            .store
            .load_as::<SupportPointMaximum>(MAX_SUPPORT_MOMENTS, Category::Analysis, "{appuis}")
            .map_err(|e| InflError::maximum_unavailable(family.artifact(), policy.to_string(), e.to_string()))?;

        Ok(self.governing(family, policy, record.appuis, 0, record.valeur, MAX_SUPPORT_MOMENTS))
    }

    fn span_area(&self, family: CurveFamily) -> InflResult<Governing> {
        let policy = MaximumPolicy::Area;
        let ranking = self
            .area_ranking()
            .map_err(|e| InflError::maximum_unavailable(family.artifact(), policy.to_string(), e.to_string()))?;
        let best = ranking.first().ok_or_else(|| {
            InflError::maximum_unavailable(
                family.artifact(),
                policy.to_string(),
                format!("{} holds no entries", LARGEST_MOMENT_AREAS),
            )
        })?;

        Ok(self.governing(family, policy, best.travee, best.section, Some(best.aire), LARGEST_MOMENT_AREAS))
    }

    fn support_area(&self) -> InflResult<Governing> {
        let family = CurveFamily::SupportMoments;
        let policy = MaximumPolicy::Area;
        let sums = self
            .support_area_sums()
            .map_err(|e| InflError::maximum_unavailable(family.artifact(), policy.to_string(), e.to_string()))?;
        let winner = support_area_maximum(&sums).ok_or_else(|| {
            InflError::maximum_unavailable(
                family.artifact(),
                policy.to_string(),
                format!("{} holds no supports", SUPPORT_MOMENT_AREAS),
            )
        })?;

        Ok(self.governing(family, policy, winner.support, 0, Some(winner.value), SUPPORT_MOMENT_AREAS))
    }

    /// Full ranked area list, largest first.
    pub fn area_ranking(&self) -> InflResult<Vec<AreaRecord>> {
        let ranking: AreaRanking = self.store.load_as(
            LARGEST_MOMENT_AREAS,
            Category::Analysis,
            "{plus_grande_aire: [{travee, section, aire}]}",
        )?;
        Ok(ranking.plus_grande_aire)
    }

    /// Signed sum of each support's area curve, in file order.
    pub fn support_area_sums(&self) -> InflResult<Vec<f64>> {
        let value = self.store.load(SUPPORT_MOMENT_AREAS, Category::Analysis)?;
        let supports = match value.as_ref() {
            Value::Object(map) => map,
            other => {
                return Err(InflError::malformed(
                    SUPPORT_MOMENT_AREAS,
                    "a mapping of support id to values",
                    format!("found {}", payload::kind_of(other)),
                ))
            }
        };

        supports
            .iter()
            .map(|(id, values)| {
                payload::as_series(values, SUPPORT_MOMENT_AREAS, &format!("support '{}'", id))
                    .map(|series| series.iter().sum::<f64>())
            })
            .collect()
    }

    /// Absolute extreme value of a family.
    ///
    /// Uses the `valeur` field of `max_<family>` when present, otherwise the
    /// largest sample over every curve of the family.
    pub fn absolute_value(&self, family: CurveFamily) -> InflResult<f64> {
        let artifact = family.point_maximum_artifact();
        if let Ok(value) = self.store.load(&artifact, Category::Analysis) {
            if let Some(valeur) = value.get("valeur").and_then(Value::as_f64) {
                return Ok(valeur);
            }
        }

        CurveResolver::new(self.store)
            .all_curves(family)?
            .iter()
            .filter_map(Curve::max_value)
            .reduce(f64::max)
            .ok_or_else(|| InflError::EmptyDataset {
                family: family.to_string(),
            })
    }
}

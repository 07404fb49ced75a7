//! # Curve Resolution
//!
//! Turns a `(family, span, section)` request into matched x/y arrays ready
//! for plotting. Which arrays supply x and y depends only on the family's
//! row in the [dispatch table](crate::family::FAMILY_TABLE):
//!
//! | family | x | y |
//! |---|---|---|
//! | `span_shear_forces` | `shear_abscissas[span][section]` | `payload[span][section]` |
//! | `support_reactions` | `shear_abscissas[span][0]` | `payload[span]` |
//! | `support_moments` | `total_abscissas` | `payload[span]` |
//! | other span families | `total_abscissas` | `payload[span][section]` |
//!
//! Every resolved curve passes the length guard: `x.len() == y.len()` or
//! the request fails with [`InflError::ShapeMismatch`]. Stale or truncated
//! engine output is reported, never padded or cut to fit.
//!
//! [`CurveResolver::resolve`] clamps indices left stale by a reload that
//! shrank the dataset; [`CurveResolver::resolve_exact`] rejects them.
//!
//! ## Example
//!
//! ```rust,no_run
//! use infl_core::config::StoreConfig;
//! use infl_core::curve::CurveResolver;
//! use infl_core::family::CurveFamily;
//! use infl_core::store::ResultStore;
//!
//! let store = ResultStore::new(StoreConfig::explicit("data/results"));
//! let resolver = CurveResolver::new(&store);
//!
//! let curve = resolver.resolve(CurveFamily::SpanShearForces, 99, 99)?;
//! assert_eq!(curve.x.len(), curve.y.len());
//! # Ok::<(), infl_core::errors::InflError>(())
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::dataset::{Category, SHEAR_ABSCISSAS};
use crate::errors::{InflError, InflResult};
use crate::family::{AbscissaSource, CurveFamily};
use crate::payload;
use crate::store::ResultStore;

// =============================================================================
// CURVE
// =============================================================================

/// One plottable curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub family: CurveFamily,
    /// Span index, or support index for support families
    pub span: usize,
    /// Section index; always 0 for support families
    pub section: usize,
    /// Legend label (`M_2`, `R_0`, `Travee : 1\nSection : 5`)
    pub label: String,
    /// Abscissas; shared with the store for `total_abscissas` families
    pub x: Arc<Vec<f64>>,
    pub y: Vec<f64>,
}

impl Curve {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Sum of the ordinates
    pub fn signed_sum(&self) -> f64 {
        self.y.iter().sum()
    }

    /// Largest ordinate, ignoring NaN
    pub fn max_value(&self) -> Option<f64> {
        self.y.iter().copied().filter(|v| !v.is_nan()).reduce(f64::max)
    }

    /// `(min, max)` of the abscissas
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        let min = self.x.iter().copied().filter(|v| !v.is_nan()).reduce(f64::min)?;
        let max = self.x.iter().copied().filter(|v| !v.is_nan()).reduce(f64::max)?;
        Some((min, max))
    }

    /// Same curve with abscissas shifted so the smallest is 0
    pub fn shifted_to_origin(mut self) -> Self {
        if let Some((min, _)) = self.x_extent() {
            if min != 0.0 {
                for x in Arc::make_mut(&mut self.x) {
                    *x -= min;
                }
            }
        }
        self
    }
}

/// Valid index ranges of a family at one span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexBounds {
    /// Number of spans (supports for support families)
    pub spans: usize,
    /// Number of sections in the requested span; 0 for support families
    pub sections: usize,
}

impl IndexBounds {
    /// Largest valid span index
    pub fn last_span(&self) -> usize {
        self.spans.saturating_sub(1)
    }

    /// Largest valid section index (0 when there are no sections)
    pub fn last_section(&self) -> usize {
        self.sections.saturating_sub(1)
    }
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Assembles curves from a [`ResultStore`].
#[derive(Debug, Clone, Copy)]
pub struct CurveResolver<'a> {
    store: &'a ResultStore,
}

impl<'a> CurveResolver<'a> {
    pub fn new(store: &'a ResultStore) -> Self {
        CurveResolver { store }
    }

    fn payload(&self, family: CurveFamily) -> InflResult<Arc<Value>> {
        self.store.load(family.artifact(), Category::InfluenceLines)
    }

    /// Index ranges for `family`, with `span` clamped into range first.
    pub fn bounds(&self, family: CurveFamily, span: usize) -> InflResult<IndexBounds> {
        let payload = self.payload(family)?;
        let spans = payload::as_sequence(&payload, family.artifact(), "top level")?;
        if spans.is_empty() {
            return Ok(IndexBounds { spans: 0, sections: 0 });
        }

        let span = span.min(spans.len() - 1);
        let sections = if family.is_section_nested() {
            payload::as_sequence(&spans[span], family.artifact(), &format!("[{}]", span))?.len()
        } else {
            0
        };

        Ok(IndexBounds {
            spans: spans.len(),
            sections,
        })
    }

    /// Clamp a possibly stale `(span, section)` to the last valid indices.
    ///
    /// Support families always get section 0.
    pub fn clamp(&self, family: CurveFamily, span: usize, section: usize) -> InflResult<(usize, usize)> {
        let bounds = self.bounds(family, span)?;
        if bounds.spans == 0 {
            return Err(InflError::EmptyDataset {
                family: family.to_string(),
            });
        }

        let clamped_span = span.min(bounds.last_span());
        let clamped_section = if family.is_section_nested() {
            section.min(bounds.last_section())
        } else {
            0
        };

        if (clamped_span, clamped_section) != (span, section) {
            debug!(%family, span, section, clamped_span, clamped_section, "clamped indices");
        }
        Ok((clamped_span, clamped_section))
    }

    /// Resolve one curve, clamping out-of-range indices to the last valid
    /// ones. `section` is ignored for support families.
    ///
    /// # Returns
    ///
    /// * `Ok(Curve)` - x and y of equal length, with the indices actually used
    /// * `Err(InflError::EmptyDataset)` - the family has no curves at all
    /// * `Err(InflError::ShapeMismatch)` - x and y lengths differ
    /// * `Err(InflError::MalformedPayload)` - a payload level has the wrong structure
    pub fn resolve(&self, family: CurveFamily, span: usize, section: usize) -> InflResult<Curve> {
        let (span, section) = self.clamp(family, span, section)?;
        self.resolve_exact(family, span, section)
    }

    /// Resolve one curve without clamping.
    ///
    /// Fails with `InflError::IndexOutOfRange` on an index past the payload.
    pub fn resolve_exact(&self, family: CurveFamily, span: usize, section: usize) -> InflResult<Curve> {
        let section = if family.is_section_nested() { section } else { 0 };
        let payload = self.payload(family)?;
        let y = ordinates(&payload, family, span, section)?;
        let x = self.abscissas(family, span, section)?;

        if x.len() != y.len() {
            return Err(InflError::shape_mismatch(
                family.artifact(),
                span,
                section,
                x.len(),
                y.len(),
            ));
        }

        Ok(Curve {
            family,
            span,
            section,
            label: family.curve_label(span, section),
            x,
            y,
        })
    }

    fn abscissas(&self, family: CurveFamily, span: usize, section: usize) -> InflResult<Arc<Vec<f64>>> {
        match family.abscissa() {
            AbscissaSource::Total => self.store.total_abscissas(),
            AbscissaSource::ShearPerSection => shear_entry(&self.store.shear_abscissas()?, span, section).map(Arc::new),
            AbscissaSource::ShearFirstSection => shear_entry(&self.store.shear_abscissas()?, span, 0).map(Arc::new),
        }
    }

    /// Every section of one span (the single curve for support families).
    pub fn span_curves(&self, family: CurveFamily, span: usize) -> InflResult<Vec<Curve>> {
        if !family.is_section_nested() {
            return Ok(vec![self.resolve_exact(family, span, 0)?]);
        }
        let bounds = self.bounds(family, span)?;
        if span >= bounds.spans {
            return Err(InflError::index_out_of_range(family.artifact(), "span", span, bounds.spans));
        }
        (0..bounds.sections)
            .map(|section| self.resolve_exact(family, span, section))
            .collect()
    }

    /// One section across every span that has it.
    ///
    /// Spans with fewer sections are skipped. Support families have no
    /// sections, so every support curve is returned.
    pub fn section_curves(&self, family: CurveFamily, section: usize) -> InflResult<Vec<Curve>> {
        if !family.is_section_nested() {
            return self.all_curves(family);
        }
        let spans = self.bounds(family, 0)?.spans;
        let mut curves = Vec::new();
        for span in 0..spans {
            if section < self.bounds(family, span)?.sections {
                curves.push(self.resolve_exact(family, span, section)?);
            }
        }
        Ok(curves)
    }

    /// Every support-moment curve, optionally leaving out the two end
    /// supports (their moment is zero on a simply supported deck end).
    pub fn support_moment_curves(&self, include_ends: bool) -> InflResult<Vec<Curve>> {
        let family = CurveFamily::SupportMoments;
        let supports = self.bounds(family, 0)?.spans;
        let range = if include_ends {
            0..supports
        } else {
            1..supports.saturating_sub(1).max(1)
        };
        range.map(|support| self.resolve_exact(family, support, 0)).collect()
    }

    /// Every curve of a family in `(span, section)` order.
    pub fn all_curves(&self, family: CurveFamily) -> InflResult<Vec<Curve>> {
        let spans = self.bounds(family, 0)?.spans;
        let mut curves = Vec::new();
        for span in 0..spans {
            if family.is_section_nested() {
                curves.extend(self.span_curves(family, span)?);
            } else {
                curves.push(self.resolve_exact(family, span, 0)?);
            }
        }
        Ok(curves)
    }

    /// Every curve of a family, each shifted so its abscissas start at 0.
    ///
    /// This is the frame sequence the animation export steps through.
    pub fn animation_frames(&self, family: CurveFamily) -> InflResult<Vec<Curve>> {
        Ok(self
            .all_curves(family)?
            .into_iter()
            .map(Curve::shifted_to_origin)
            .collect())
    }
}

/// Pull `payload[span][section]` (or `payload[span]`) out as numbers.
fn ordinates(payload: &Value, family: CurveFamily, span: usize, section: usize) -> InflResult<Vec<f64>> {
    let artifact = family.artifact();
    let spans = payload::as_sequence(payload, artifact, "top level")?;
    let entry = spans
        .get(span)
        .ok_or_else(|| InflError::index_out_of_range(artifact, "span", span, spans.len()))?;

    if !family.is_section_nested() {
        return payload::as_series(entry, artifact, &format!("[{}]", span));
    }

    let sections = payload::as_sequence(entry, artifact, &format!("[{}]", span))?;
    let curve = sections
        .get(section)
        .ok_or_else(|| InflError::index_out_of_range(artifact, "section", section, sections.len()))?;
    payload::as_series(curve, artifact, &format!("[{}][{}]", span, section))
}

fn shear_entry(shear: &[Vec<Vec<f64>>], span: usize, section: usize) -> InflResult<Vec<f64>> {
    shear
        .get(span)
        .and_then(|sections| sections.get(section))
        .cloned()
        .ok_or_else(|| {
            InflError::malformed(
                SHEAR_ABSCISSAS,
                format!("an abscissa array at [{}][{}]", span, section),
                format!("only {} spans present", shear.len()),
            )
        })
}

//! # Axis Layout
//!
//! Data for the x-axis decorations drawn under every curve: one tick per
//! support at its position along the deck, labelled with the distance, plus
//! the structural overlay (the deck baseline and the support markers).
//!
//! Rendering is up to the front end; this module only produces positions
//! and labels.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::InflResult;
use crate::store::ResultStore;

/// Decimal places kept in tick labels
pub const TICK_PRECISION: i32 = 5;

/// One labelled tick on the x-axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// Points of the structural overlay, all at y = 0.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructuralOverlay {
    /// Deck baseline: every shared abscissa
    pub baseline: Vec<f64>,
    /// Support markers
    pub nodes: Vec<f64>,
}

/// Format a distance the way tick labels show it.
///
/// Rounded to [`TICK_PRECISION`] decimals, shortest representation, always
/// with a decimal point.
///
/// ```rust
/// use infl_core::axis::tick_label;
///
/// assert_eq!(tick_label(12.0), "12.0");
/// assert_eq!(tick_label(3.1234567), "3.12346");
/// ```
pub fn tick_label(position: f64) -> String {
    let scale = 10f64.powi(TICK_PRECISION);
    let rounded = (position * scale).round() / scale;
    let mut label = format!("{}", rounded);
    if rounded.is_finite() && !label.contains('.') {
        label.push_str(".0");
    }
    label
}

/// Support positions and their tick labels.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLayout {
    nodes: Arc<Vec<f64>>,
}

impl AxisLayout {
    /// Read node positions from the store.
    pub fn load(store: &ResultStore) -> InflResult<Self> {
        Ok(AxisLayout {
            nodes: store.node_positions()?,
        })
    }

    pub fn from_nodes(nodes: Vec<f64>) -> Self {
        AxisLayout {
            nodes: Arc::new(nodes),
        }
    }

    /// Support positions along the deck
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Number of spans between the supports
    pub fn span_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn ticks(&self) -> Vec<Tick> {
        self.nodes
            .iter()
            .map(|&position| Tick {
                position,
                label: tick_label(position),
            })
            .collect()
    }

    /// Overlay points, limited to `x <= max_x` when given.
    pub fn overlay(&self, baseline: &[f64], max_x: Option<f64>) -> StructuralOverlay {
        let visible = |x: &&f64| max_x.map_or(true, |limit| **x <= limit);
        StructuralOverlay {
            baseline: baseline.iter().filter(visible).copied().collect(),
            nodes: self.nodes.iter().filter(visible).copied().collect(),
        }
    }

    /// Overlay over the store's shared abscissas.
    pub fn structural_overlay(&self, store: &ResultStore, max_x: Option<f64>) -> InflResult<StructuralOverlay> {
        let baseline = store.total_abscissas()?;
        Ok(self.overlay(&baseline, max_x))
    }
}

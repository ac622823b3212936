//! Level (ring) domain model.

use crate::model::defaults::DEFAULT_RING_STEP;
use crate::model::property::LevelProperties;
use serde::{Deserialize, Serialize};

/// One concentric ring of the chart.
///
/// Levels are stored in depth order; the level at index `i` hosts every
/// item whose `level == i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: String,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub properties: LevelProperties,
}

impl Level {
    pub fn new(id: impl Into<String>, inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            id: id.into(),
            inner_radius,
            outer_radius,
            properties: LevelProperties::default(),
        }
    }

    /// Level appended by the editor when an item first reaches `depth`.
    ///
    /// Rings are laid out `DEFAULT_RING_STEP` apart, leaving the innermost
    /// step empty for the chart hole.
    pub fn for_depth(depth: usize) -> Self {
        let step = depth as f64 + 1.0;
        Self::new(
            (depth + 1).to_string(),
            step * DEFAULT_RING_STEP,
            (step + 1.0) * DEFAULT_RING_STEP,
        )
    }

    /// Radial thickness of the ring.
    pub fn thickness(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }
}

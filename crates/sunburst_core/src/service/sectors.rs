//! Sector assembly for the rendering layer.
//!
//! # Responsibility
//! - Run aggregation, then resolve every property of every real item.
//! - Hand out one ordered sector list per configured level.
//!
//! # Invariants
//! - Placeholder sectors carry `properties: None` and render as gaps.
//! - A `MissingAncestor` lookup becomes a `None` property value; any other
//!   resolution error fails the pass.

use crate::model::chart::Chart;
use crate::model::color::Color;
use crate::model::item::{Item, ItemId};
use crate::model::level::Level;
use crate::model::property::{LabelAnchor, LabelDisplay};
use crate::service::aggregate::{aggregate, AggregateError};
use crate::service::resolve::{
    resolve_property, ColorKey, LabelAnchorKey, LabelDisplayKey, LabelDxKey, LabelDyKey,
    LabelFontSizeKey, PropertyKey, ResolveError, ResolveResult, StrokeColorKey, StrokeWidthKey,
};
use log::debug;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from sector assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectorError {
    Aggregate(AggregateError),
    Resolve(ResolveError),
}

impl Display for SectorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aggregate(err) => write!(f, "{err}"),
            Self::Resolve(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SectorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Aggregate(err) => Some(err),
            Self::Resolve(err) => Some(err),
        }
    }
}

impl From<AggregateError> for SectorError {
    fn from(value: AggregateError) -> Self {
        Self::Aggregate(value)
    }
}

impl From<ResolveError> for SectorError {
    fn from(value: ResolveError) -> Self {
        Self::Resolve(value)
    }
}

/// Fully resolved visual properties of one sector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedProperties {
    pub color: Option<Color>,
    pub label_anchor: Option<LabelAnchor>,
    pub label_display: Option<LabelDisplay>,
    pub label_dx: Option<f64>,
    pub label_dy: Option<f64>,
    pub label_font_size: Option<f64>,
    pub stroke_color: Option<Color>,
    pub stroke_width: Option<f64>,
}

/// Renderable output record for one item or placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sector {
    pub id: ItemId,
    pub name: String,
    pub placeholder: bool,
    /// Absolute share of the whole chart, in `[0, 1]`.
    pub value: f64,
    pub properties: Option<ResolvedProperties>,
}

/// Sectors of one ring, in aggregation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSectors<'a> {
    pub level_index: usize,
    pub level: &'a Level,
    pub sectors: Vec<Sector>,
}

/// Resolves every item property of `item`.
pub fn resolve_all(chart: &Chart, item: &Item) -> ResolveResult<ResolvedProperties> {
    Ok(ResolvedProperties {
        color: lenient::<ColorKey>(chart, item)?,
        label_anchor: lenient::<LabelAnchorKey>(chart, item)?,
        label_display: lenient::<LabelDisplayKey>(chart, item)?,
        label_dx: lenient::<LabelDxKey>(chart, item)?,
        label_dy: lenient::<LabelDyKey>(chart, item)?,
        label_font_size: lenient::<LabelFontSizeKey>(chart, item)?,
        stroke_color: lenient::<StrokeColorKey>(chart, item)?,
        stroke_width: lenient::<StrokeWidthKey>(chart, item)?,
    })
}

/// Builds the per-level sector lists handed to the renderer.
///
/// # Errors
/// - `Aggregate` when an item's level has no definition.
/// - `Resolve` for non-recoverable resolution failures.
pub fn build_sectors(chart: &Chart) -> Result<Vec<LevelSectors<'_>>, SectorError> {
    let buckets = aggregate(chart)?;
    let mut output = Vec::with_capacity(buckets.len());

    for bucket in buckets {
        let mut sectors = Vec::with_capacity(bucket.items.len());
        for entry in bucket.items {
            let properties = if entry.is_placeholder() {
                None
            } else {
                let item = chart
                    .items
                    .get(&entry.id)
                    .ok_or_else(|| ResolveError::ItemNotFound(entry.id.clone()))?;
                Some(resolve_all(chart, item)?)
            };
            sectors.push(Sector {
                placeholder: entry.is_placeholder(),
                id: entry.id,
                name: entry.name,
                value: entry.value,
                properties,
            });
        }
        output.push(LevelSectors {
            level_index: bucket.level_index,
            level: bucket.level,
            sectors,
        });
    }
    Ok(output)
}

fn lenient<K: PropertyKey>(chart: &Chart, item: &Item) -> ResolveResult<Option<K::Value>> {
    match resolve_property::<K>(chart, item, K::of_item(&item.properties)) {
        Err(err) if err.is_recoverable() => {
            debug!(
                "event=resolve module=resolve status=degraded item={} property={}",
                item.id,
                K::NAME
            );
            Ok(None)
        }
        other => other,
    }
}

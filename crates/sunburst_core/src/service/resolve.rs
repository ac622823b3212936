//! Property cascade resolution.
//!
//! # Responsibility
//! - Resolve the effective value of one property for one item by following
//!   `override -> parent -> level`.
//! - Distribute the level color across each sibling group.
//!
//! # Invariants
//! - Resolution is a pure read of the chart.
//! - A `parent` chain always ends at an `override` or `level` record, or at
//!   a root, which surfaces `MissingAncestor`.
//! - Properties are addressed by typed keys, so an unknown property name
//!   cannot be expressed.

use crate::model::chart::Chart;
use crate::model::color::Color;
use crate::model::item::{Item, ItemId};
use crate::model::level::Level;
use crate::model::property::{ItemProperties, LabelAnchor, LabelDisplay, Property, PropertySource};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by property resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors from property resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Item id is not part of the chart tree.
    ItemNotFound(ItemId),
    /// Item sits at a level with no matching level definition.
    StructuralInconsistency {
        item: ItemId,
        level: usize,
        level_count: usize,
    },
    /// A `parent`-sourced lookup reached a root item.
    MissingAncestor(ItemId),
}

impl ResolveError {
    /// `MissingAncestor` degrades to a null value instead of failing a pass.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingAncestor(_))
    }
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemNotFound(id) => write!(f, "chart item not found: {id}"),
            Self::StructuralInconsistency {
                item,
                level,
                level_count,
            } => write!(
                f,
                "item {item} is at level {level} but only {level_count} levels are configured"
            ),
            Self::MissingAncestor(id) => {
                write!(f, "item {id} inherits from a parent but has none")
            }
        }
    }
}

impl Error for ResolveError {}

/// Typed handle to one named item property.
pub trait PropertyKey {
    type Value: Clone;

    /// Machine name shared by the item and level records.
    const NAME: &'static str;

    fn of_item(properties: &ItemProperties) -> &Property<Self::Value>;

    /// Value taken from `level` for `item`. Plain level defaults by default.
    fn level_value(_chart: &Chart, _item: &Item, level: &Level) -> Option<Self::Value> {
        Self::of_item(&level.properties.items).value.clone()
    }
}

/// Fill color. Level-sourced colors are spread across the sibling group.
pub struct ColorKey;

impl PropertyKey for ColorKey {
    type Value = Color;
    const NAME: &'static str = "color";

    fn of_item(properties: &ItemProperties) -> &Property<Color> {
        &properties.color
    }

    fn level_value(chart: &Chart, item: &Item, level: &Level) -> Option<Color> {
        let palette = level.properties.items.color.value.as_ref()?;
        let siblings = chart.items.siblings_of(item);
        let index = siblings.iter().position(|id| *id == item.id)?;
        Some(Color::single(palette.pick(index, siblings.len())))
    }
}

macro_rules! plain_property_key {
    ($(#[$meta:meta])* $key:ident, $field:ident, $value:ty) => {
        $(#[$meta])*
        pub struct $key;

        impl PropertyKey for $key {
            type Value = $value;
            const NAME: &'static str = stringify!($field);

            fn of_item(properties: &ItemProperties) -> &Property<$value> {
                &properties.$field
            }
        }
    };
}

plain_property_key!(LabelAnchorKey, label_anchor, LabelAnchor);
plain_property_key!(LabelDisplayKey, label_display, LabelDisplay);
plain_property_key!(
    /// Horizontal label offset in px.
    LabelDxKey,
    label_dx,
    f64
);
plain_property_key!(
    /// Vertical label offset in px.
    LabelDyKey,
    label_dy,
    f64
);
plain_property_key!(LabelFontSizeKey, label_font_size, f64);
plain_property_key!(
    /// Stroke color. Level defaults are used as-is, never distributed.
    StrokeColorKey,
    stroke_color,
    Color
);
plain_property_key!(StrokeWidthKey, stroke_width, f64);

/// Resolves property `K` of the item `id`, starting from its own record.
pub fn resolve<K: PropertyKey>(chart: &Chart, id: &ItemId) -> ResolveResult<Option<K::Value>> {
    let item = chart
        .items
        .get(id)
        .ok_or_else(|| ResolveError::ItemNotFound(id.clone()))?;
    resolve_property::<K>(chart, item, K::of_item(&item.properties))
}

/// Resolves `property` as seen from `item`.
///
/// `property` is usually `item`'s own record; editors pass a draft record
/// to preview a source change before committing it.
///
/// # Errors
/// - `MissingAncestor` when a `parent` source is reached on a root item.
/// - `StructuralInconsistency` when a `level` source has no level record.
/// - `ItemNotFound` when a parent link points outside the tree.
pub fn resolve_property<'a, K: PropertyKey>(
    chart: &'a Chart,
    item: &'a Item,
    property: &'a Property<K::Value>,
) -> ResolveResult<Option<K::Value>> {
    let mut cursor = item;
    let mut record = property;
    loop {
        match record.source {
            PropertySource::Override => return Ok(record.value.clone()),
            PropertySource::Level => {
                let level = chart.levels.get(cursor.level).ok_or_else(|| {
                    ResolveError::StructuralInconsistency {
                        item: cursor.id.clone(),
                        level: cursor.level,
                        level_count: chart.levels.len(),
                    }
                })?;
                return Ok(K::level_value(chart, cursor, level));
            }
            PropertySource::Parent => {
                let parent_id = cursor
                    .parent
                    .as_ref()
                    .ok_or_else(|| ResolveError::MissingAncestor(cursor.id.clone()))?;
                cursor = chart
                    .items
                    .get(parent_id)
                    .ok_or_else(|| ResolveError::ItemNotFound(parent_id.clone()))?;
                record = K::of_item(&cursor.properties);
            }
        }
    }
}

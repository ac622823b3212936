//! Property records shared by items and levels.
//!
//! # Responsibility
//! - Define the typed `Property<T>` record and its `source` tag.
//! - Define the fixed property sets carried by items and levels.
//!
//! # Invariants
//! - `source == Override` means `value` is authoritative and present.
//! - For `Parent` and `Level` sources the stored `value` may be stale and is
//!   never read directly; it has to be resolved with tree/level context.

use crate::model::color::Color;
use serde::{Deserialize, Serialize};

/// Where the effective value of a property comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertySource {
    /// Value stored on this record.
    Override,
    /// Same property looked up on the parent item.
    Parent,
    /// Default of the enclosing level.
    Level,
}

/// Named, described, typed property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property<T> {
    /// Stable machine name, e.g. `color`.
    pub name: String,
    /// Short user-facing label.
    pub label: String,
    pub description: String,
    pub source: PropertySource,
    pub value: Option<T>,
}

impl<T> Property<T> {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
        source: PropertySource,
        value: Option<T>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            description: description.into(),
            source,
            value,
        }
    }

    /// Pins `value` on this record and switches the source to `Override`.
    pub fn set_override(&mut self, value: T) {
        self.source = PropertySource::Override;
        self.value = Some(value);
    }

    /// Switches the source without touching the stored value.
    pub fn inherit_from(&mut self, source: PropertySource) {
        self.source = source;
    }

    /// An `override` record must carry its value.
    pub fn is_empty_override(&self) -> bool {
        self.source == PropertySource::Override && self.value.is_none()
    }
}

/// Text anchor of a sector label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelAnchor {
    Start,
    Middle,
    End,
}

/// Placement strategy of a sector label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelDisplay {
    /// Horizontal text at the arc centroid.
    Centroid,
    /// Text rotated along the sector's bisector.
    Radial,
    /// No label.
    None,
}

/// Visual properties carried by every item (and by levels as defaults).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemProperties {
    pub color: Property<Color>,
    pub label_anchor: Property<LabelAnchor>,
    pub label_display: Property<LabelDisplay>,
    pub label_dx: Property<f64>,
    pub label_dy: Property<f64>,
    pub label_font_size: Property<f64>,
    pub stroke_color: Property<Color>,
    pub stroke_width: Property<f64>,
}

impl ItemProperties {
    /// `(name, source, empty override)` for every record, in field order.
    fn records(&self) -> [(&str, PropertySource, bool); 8] {
        fn entry<T>(property: &Property<T>) -> (&str, PropertySource, bool) {
            (property.name.as_str(), property.source, property.is_empty_override())
        }
        [
            entry(&self.color),
            entry(&self.label_anchor),
            entry(&self.label_display),
            entry(&self.label_dx),
            entry(&self.label_dy),
            entry(&self.label_font_size),
            entry(&self.stroke_color),
            entry(&self.stroke_width),
        ]
    }

    /// Returns the name of the first property declaring `source = parent`.
    pub fn first_parent_sourced(&self) -> Option<&str> {
        self.records()
            .into_iter()
            .find(|(_, source, _)| *source == PropertySource::Parent)
            .map(|(name, _, _)| name)
    }

    /// Returns the name of the first `override` record without a value.
    pub fn first_empty_override(&self) -> Option<&str> {
        self.records()
            .into_iter()
            .find(|(_, _, empty)| *empty)
            .map(|(name, _, _)| name)
    }
}

/// Level defaults plus ring-only geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelProperties {
    /// Terminal fallback of the item property cascade.
    pub items: ItemProperties,
    /// Radians.
    pub start_angle: Property<f64>,
    /// Radians between adjacent sectors.
    pub pad_angle: Property<f64>,
    pub corner_radius: Property<f64>,
    pub outer_edge_width: Property<f64>,
    pub outer_edge_color: Property<Color>,
}

impl LevelProperties {
    /// Like `ItemProperties::first_empty_override`, including ring records.
    pub fn first_empty_override(&self) -> Option<&str> {
        if let Some(name) = self.items.first_empty_override() {
            return Some(name);
        }
        [
            &self.start_angle,
            &self.pad_angle,
            &self.corner_radius,
            &self.outer_edge_width,
        ]
        .into_iter()
        .find(|property| property.is_empty_override())
        .map(|property| property.name.as_str())
        .or_else(|| {
            self.outer_edge_color
                .is_empty_override()
                .then_some(self.outer_edge_color.name.as_str())
        })
    }
}

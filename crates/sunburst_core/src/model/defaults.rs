//! Default property records for new items and levels.

use crate::model::color::{Color, Rgb};
use crate::model::property::{
    ItemProperties, LabelAnchor, LabelDisplay, LevelProperties, Property, PropertySource,
};

/// Default label font size in px.
pub const DEFAULT_LABEL_FONT_SIZE: f64 = 12.0;
/// Radial distance between consecutive default rings.
pub const DEFAULT_RING_STEP: f64 = 100.0;

impl ItemProperties {
    /// Properties for an item created by the editor.
    ///
    /// Child items inherit their color from the parent; root items take the
    /// level palette. Everything else falls back to the level.
    pub fn for_new_item(has_parent: bool) -> Self {
        let color_source = if has_parent {
            PropertySource::Parent
        } else {
            PropertySource::Level
        };

        Self {
            color: Property::new(
                "color",
                "Color",
                "Color of the pie sector",
                color_source,
                None,
            ),
            label_anchor: Property::new(
                "label_anchor",
                "Anchor",
                "Anchor of the pie sector label",
                PropertySource::Level,
                Some(LabelAnchor::Middle),
            ),
            label_display: Property::new(
                "label_display",
                "Display",
                "Display type of label",
                PropertySource::Level,
                None,
            ),
            label_dx: Property::new(
                "label_dx",
                "Delta X",
                "X offset of the label",
                PropertySource::Level,
                Some(0.0),
            ),
            label_dy: Property::new(
                "label_dy",
                "Delta Y",
                "Y offset of the label",
                PropertySource::Level,
                Some(0.0),
            ),
            label_font_size: Property::new(
                "label_font_size",
                "Font size",
                "Size of the label font",
                PropertySource::Level,
                Some(DEFAULT_LABEL_FONT_SIZE),
            ),
            stroke_color: Property::new(
                "stroke_color",
                "Stroke color",
                "Color of the stroke",
                PropertySource::Level,
                None,
            ),
            stroke_width: Property::new(
                "stroke_width",
                "Stroke width",
                "Width of the stroke",
                PropertySource::Level,
                None,
            ),
        }
    }
}

impl Default for LevelProperties {
    fn default() -> Self {
        let mut items = ItemProperties::for_new_item(false);
        items.color.value = Some(Color::single(Rgb::WHITE));
        items.label_anchor.value = Some(LabelAnchor::Middle);
        items.label_display.value = Some(LabelDisplay::Centroid);
        items.label_dx.value = Some(0.0);
        items.label_dy.value = Some(0.0);
        items.label_font_size.value = Some(DEFAULT_LABEL_FONT_SIZE);
        items.stroke_color.value = Some(Color::single(Rgb::BLACK));
        items.stroke_width.value = Some(1.0);

        Self {
            items,
            start_angle: ring_property("start_angle", "Start angle", "Angle of the first sector"),
            pad_angle: ring_property("pad_angle", "Pad angle", "Gap between adjacent sectors"),
            corner_radius: ring_property(
                "corner_radius",
                "Corner radius",
                "Rounding of sector corners",
            ),
            outer_edge_width: ring_property(
                "outer_edge_width",
                "Outer edge width",
                "Thickness of the ring's outer edge",
            ),
            outer_edge_color: Property::new(
                "outer_edge_color",
                "Outer edge color",
                "Color of the ring's outer edge",
                PropertySource::Level,
                Some(Color::single(Rgb::BLACK)),
            ),
        }
    }
}

fn ring_property(name: &str, label: &str, description: &str) -> Property<f64> {
    Property::new(name, label, description, PropertySource::Level, Some(0.0))
}

#[cfg(test)]
mod tests {
    use crate::model::property::{ItemProperties, LevelProperties, PropertySource};

    #[test]
    fn child_items_inherit_color_from_parent() {
        let child = ItemProperties::for_new_item(true);
        assert_eq!(child.color.source, PropertySource::Parent);
        assert_eq!(child.first_parent_sourced(), Some("color"));

        let root = ItemProperties::for_new_item(false);
        assert_eq!(root.color.source, PropertySource::Level);
        assert_eq!(root.first_parent_sourced(), None);
    }

    #[test]
    fn level_defaults_are_fully_populated() {
        let level = LevelProperties::default();
        assert!(level.items.color.value.is_some());
        assert!(level.items.label_display.value.is_some());
        assert!(level.items.stroke_color.value.is_some());
        assert_eq!(level.items.stroke_width.value, Some(1.0));
        assert_eq!(level.items.first_parent_sourced(), None);
    }
}

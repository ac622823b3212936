//! Core engine for multi-level sunburst charts.
//! This crate is the single source of truth for aggregation, property
//! resolution and calibration invariants.

pub mod logging;
pub mod model;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig};
pub use model::chart::Chart;
pub use model::color::{color_sequence, Color, ParseRgbError, Rgb};
pub use model::item::{Item, ItemId};
pub use model::level::Level;
pub use model::property::{
    ItemProperties, LabelAnchor, LabelDisplay, LevelProperties, Property, PropertySource,
};
pub use model::tree::{ChartTree, ItemNode, TreeError, TreeResult};
pub use service::aggregate::{
    aggregate, AggregateError, AggregatedItem, EntryKind, LevelBucket, PLACEHOLDER_NAME,
};
pub use service::calibrate::calibrate;
pub use service::outline::{import_outline, OutlineError};
pub use service::resolve::{
    resolve, resolve_property, ColorKey, LabelAnchorKey, LabelDisplayKey, LabelDxKey, LabelDyKey,
    LabelFontSizeKey, PropertyKey, ResolveError, ResolveResult, StrokeColorKey, StrokeWidthKey,
};
pub use service::sectors::{
    build_sectors, resolve_all, LevelSectors, ResolvedProperties, Sector, SectorError,
};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

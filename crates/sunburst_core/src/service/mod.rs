//! Chart use-case operations.
//!
//! # Responsibility
//! - Turn a chart document into per-level, value-annotated sectors.
//! - Provide calibration and outline import on top of the model layer.
//!
//! # Invariants
//! - Aggregation and resolution never mutate the chart.
//! - Calibration is the only operation rewriting weights.

pub mod aggregate;
pub mod calibrate;
pub mod outline;
pub mod resolve;
pub mod sectors;

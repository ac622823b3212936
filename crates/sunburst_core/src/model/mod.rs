//! Chart domain model.
//!
//! # Responsibility
//! - Define items, levels, typed property records and colors.
//! - Keep the item tree as an id-keyed arena so parent links never form
//!   ownership cycles.
//!
//! # Invariants
//! - Every item is identified by a stable dot-path `ItemId`.
//! - An item's level equals its parent's level + 1; roots sit at level 0.

pub mod chart;
pub mod color;
pub mod defaults;
pub mod item;
pub mod level;
pub mod property;
pub mod tree;

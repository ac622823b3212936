//! Sector calibration ("equalize sector values").
//!
//! # Responsibility
//! - Rewrite item weights so every sector at a target level gets the same
//!   share, keeping shallower levels proportional to that baseline.
//!
//! # Invariants
//! - Items at the target level get weight 1.
//! - Items above the target level get the sum of their children's new
//!   weights, i.e. the number of target-level sectors below them.
//! - A leaf above the target level counts as one sector, since its
//!   placeholder fills one slot of the target ring.
//! - Items below the target level are left untouched.

use crate::model::chart::Chart;
use crate::model::item::ItemId;
use log::info;

/// Equalizes sectors at `target_level`, rewriting weights in place.
///
/// Returns the number of target-level sectors the weights now describe.
pub fn calibrate(chart: &mut Chart, target_level: usize) -> usize {
    let roots = chart.items.roots().to_vec();
    let equalized = roots
        .iter()
        .map(|root| calibrate_item(chart, root, target_level))
        .sum::<f64>();

    info!(
        "event=calibrate module=calibrate status=ok target_level={} equalized={}",
        target_level, equalized
    );
    equalized as usize
}

/// Rebuilds the weight of `id` and returns it so the caller can add it to
/// the parent's total.
fn calibrate_item(chart: &mut Chart, id: &ItemId, target_level: usize) -> f64 {
    let Some(item) = chart.items.get(id) else {
        return 0.0;
    };
    if item.level > target_level {
        return item.weight;
    }

    let children = item.children.clone();
    let weight = if item.level == target_level || children.is_empty() {
        1.0
    } else {
        children
            .iter()
            .map(|child| calibrate_item(chart, child, target_level))
            .sum()
    };

    if let Ok(item) = chart.items.item_mut(id) {
        item.weight = weight;
    }
    weight
}

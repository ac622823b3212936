//! Value aggregation.
//!
//! # Responsibility
//! - Group items by level in breadth-first queue order.
//! - Pad branches that end before the deepest level with placeholders.
//! - Compute each item's absolute share of the whole chart.
//!
//! # Invariants
//! - Bucket order is FIFO queue order: roots in input order, then each
//!   parent's children in the order their parents were dequeued.
//! - Output has exactly one bucket per configured level, empty or not.
//! - Children of one parent split the parent's share by weight; a
//!   placeholder copies its parent's share.
//! - A zero sibling-weight sum yields a zero share, never NaN.

use crate::model::chart::Chart;
use crate::model::item::{Item, ItemId};
use crate::model::level::Level;
use log::{debug, warn};
use std::collections::{HashMap, HashSet, VecDeque};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Display name given to synthetic padding items.
pub const PLACEHOLDER_NAME: &str = "Placeholder";

/// Errors from the aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// Item sits at a level with no matching level definition.
    StructuralInconsistency {
        item: ItemId,
        level: usize,
        level_count: usize,
    },
}

impl Display for AggregateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StructuralInconsistency {
                item,
                level,
                level_count,
            } => write!(
                f,
                "item {item} is at level {level} but only {level_count} levels are configured"
            ),
        }
    }
}

impl Error for AggregateError {}

/// Whether an aggregated entry is a real item or synthetic padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Item,
    /// Padding below a terminated branch. `anchor` is the nearest real
    /// ancestor, whose property map the placeholder shares.
    Placeholder { anchor: ItemId },
}

/// One item as seen by a single aggregation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedItem {
    pub id: ItemId,
    pub name: String,
    pub level: usize,
    pub weight: f64,
    pub parent: Option<ItemId>,
    pub kind: EntryKind,
    /// Absolute share of the whole chart, in `[0, 1]`.
    pub value: f64,
}

impl AggregatedItem {
    fn from_item(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            level: item.level,
            weight: item.weight,
            parent: item.parent.clone(),
            kind: EntryKind::Item,
            value: 0.0,
        }
    }

    fn placeholder_below(&self) -> Self {
        Self {
            id: self.id.placeholder(),
            name: PLACEHOLDER_NAME.to_string(),
            level: self.level + 1,
            weight: 1.0,
            parent: Some(self.id.clone()),
            kind: EntryKind::Placeholder {
                anchor: self.property_owner().clone(),
            },
            value: 0.0,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, EntryKind::Placeholder { .. })
    }

    /// Item whose property map applies to this entry.
    pub fn property_owner(&self) -> &ItemId {
        match &self.kind {
            EntryKind::Item => &self.id,
            EntryKind::Placeholder { anchor } => anchor,
        }
    }
}

/// Items grouped under one configured level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelBucket<'a> {
    pub level_index: usize,
    pub level: &'a Level,
    pub items: Vec<AggregatedItem>,
}

/// Groups items per level and computes their absolute shares.
///
/// # Errors
/// - `StructuralInconsistency` when an item's level has no definition.
pub fn aggregate(chart: &Chart) -> Result<Vec<LevelBucket<'_>>, AggregateError> {
    let mut buckets = group_by_level(chart)?;
    assign_values(chart, &mut buckets);

    let placeholders = buckets
        .iter()
        .flat_map(|bucket| bucket.items.iter())
        .filter(|entry| entry.is_placeholder())
        .count();
    debug!(
        "event=aggregate module=aggregate status=ok levels={} items={} placeholders={}",
        buckets.len(),
        chart.items.len(),
        placeholders
    );
    Ok(buckets)
}

fn group_by_level(chart: &Chart) -> Result<Vec<LevelBucket<'_>>, AggregateError> {
    let level_count = chart.levels.len();
    let mut buckets: Vec<LevelBucket<'_>> = chart
        .levels
        .iter()
        .enumerate()
        .map(|(level_index, level)| LevelBucket {
            level_index,
            level,
            items: Vec::new(),
        })
        .collect();

    let mut queue: VecDeque<AggregatedItem> = chart
        .items
        .roots()
        .iter()
        .filter_map(|id| chart.items.get(id))
        .map(AggregatedItem::from_item)
        .collect();

    while let Some(entry) = queue.pop_front() {
        if entry.level >= level_count {
            return Err(AggregateError::StructuralInconsistency {
                item: entry.id,
                level: entry.level,
                level_count,
            });
        }

        let children: Vec<&Item> = match entry.kind {
            EntryKind::Item => chart
                .items
                .get(&entry.id)
                .map(|item| chart.items.children_of(item).collect())
                .unwrap_or_default(),
            EntryKind::Placeholder { .. } => Vec::new(),
        };

        if !children.is_empty() {
            queue.extend(children.into_iter().map(AggregatedItem::from_item));
        } else if entry.level + 1 < level_count {
            queue.push_back(entry.placeholder_below());
        }

        buckets[entry.level].items.push(entry);
    }
    Ok(buckets)
}

fn assign_values(chart: &Chart, buckets: &mut [LevelBucket<'_>]) {
    let root_sum: f64 = chart
        .items
        .roots()
        .iter()
        .filter_map(|id| chart.items.get(id))
        .map(|item| item.weight)
        .sum();

    let mut values: HashMap<ItemId, f64> = HashMap::new();
    let mut sibling_sums: HashMap<ItemId, f64> = HashMap::new();
    let mut degenerate: HashSet<Option<ItemId>> = HashSet::new();

    // Buckets run shallow to deep, so every parent is valued before its
    // children are.
    for bucket in buckets.iter_mut() {
        for entry in &mut bucket.items {
            let parent_value = entry
                .parent
                .as_ref()
                .and_then(|parent| values.get(parent))
                .copied();

            entry.value = match (&entry.kind, &entry.parent) {
                (EntryKind::Placeholder { .. }, _) => parent_value.unwrap_or(0.0),
                (EntryKind::Item, None) => share(entry.weight, root_sum, None, &mut degenerate),
                (EntryKind::Item, Some(parent)) => {
                    let sum = *sibling_sums
                        .entry(parent.clone())
                        .or_insert_with(|| children_weight(chart, parent));
                    share(entry.weight, sum, Some(parent), &mut degenerate)
                        * parent_value.unwrap_or(0.0)
                }
            };
            values.insert(entry.id.clone(), entry.value);
        }
    }
}

fn children_weight(chart: &Chart, parent: &ItemId) -> f64 {
    chart
        .items
        .get(parent)
        .map(|item| chart.items.children_of(item).map(|child| child.weight).sum())
        .unwrap_or(0.0)
}

fn share(
    weight: f64,
    sibling_sum: f64,
    parent: Option<&ItemId>,
    degenerate: &mut HashSet<Option<ItemId>>,
) -> f64 {
    if sibling_sum > 0.0 {
        return weight / sibling_sum;
    }
    if degenerate.insert(parent.cloned()) {
        warn!(
            "event=degenerate_weights module=aggregate status=warn parent={}",
            parent.map_or("<root>", ItemId::as_str)
        );
    }
    0.0
}

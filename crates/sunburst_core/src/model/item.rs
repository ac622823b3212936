//! Item domain model.
//!
//! # Responsibility
//! - Define the chart item record and its path-shaped identifier.
//!
//! # Invariants
//! - `ItemId` is a dot-delimited path reflecting tree position.
//! - `level == parent.level + 1`; root items sit at level 0.
//! - `parent` is a lookup id, never an owner. `children` is the only
//!   ownership structure.

use crate::model::property::ItemProperties;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Suffix appended to an anchor id to name its padding placeholder.
pub const PLACEHOLDER_SUFFIX: &str = "0p";

/// Dot-delimited item path, e.g. `2.1.3`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment (`3` for `2.1.3`).
    pub fn last_segment(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(self.0.as_str())
    }

    /// Allocates the next id under `parent`, one past the largest numeric
    /// last segment among `siblings`. The first child is `1`.
    ///
    /// Returns `None` once the largest sibling segment is `u64::MAX`.
    pub fn next_child(parent: Option<&ItemId>, siblings: &[ItemId]) -> Option<Self> {
        let max_sibling = siblings
            .iter()
            .filter_map(|id| id.last_segment().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let next = max_sibling.checked_add(1)?;
        Some(match parent {
            Some(parent) => Self(format!("{}.{next}", parent.0)),
            None => Self(next.to_string()),
        })
    }

    /// Id of the synthetic placeholder padding this item one level deeper.
    pub fn placeholder(&self) -> Self {
        Self(format!("{}.{PLACEHOLDER_SUFFIX}", self.0))
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Node of the chart content tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Non-negative; only meaningful relative to siblings.
    pub weight: f64,
    /// 0-based depth; index into the chart's level list.
    pub level: usize,
    /// Back-reference rebuilt in memory, never persisted.
    #[serde(skip)]
    pub parent: Option<ItemId>,
    pub children: Vec<ItemId>,
    pub properties: ItemProperties,
}

impl Item {
    /// Creates a weight-1 item with editor default properties.
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        level: usize,
        parent: Option<ItemId>,
    ) -> Self {
        let has_parent = parent.is_some();
        Self {
            id,
            name: name.into(),
            weight: 1.0,
            level,
            parent,
            children: Vec::new(),
            properties: ItemProperties::for_new_item(has_parent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ItemId;

    #[test]
    fn next_child_is_one_past_largest_sibling() {
        let parent = ItemId::from("2");
        let siblings = vec![ItemId::from("2.1"), ItemId::from("2.4"), ItemId::from("2.2")];
        assert_eq!(ItemId::next_child(Some(&parent), &siblings).unwrap().as_str(), "2.5");
        assert_eq!(ItemId::next_child(Some(&parent), &[]).unwrap().as_str(), "2.1");
        assert_eq!(ItemId::next_child(None, &[]).unwrap().as_str(), "1");
    }

    #[test]
    fn non_numeric_segments_are_ignored() {
        let siblings = vec![ItemId::from("custom"), ItemId::from("3")];
        assert_eq!(ItemId::next_child(None, &siblings).unwrap().as_str(), "4");
    }

    #[test]
    fn next_child_stops_at_largest_segment() {
        let siblings = vec![ItemId::from("1"), ItemId::new(u64::MAX.to_string())];
        assert_eq!(ItemId::next_child(None, &siblings), None);
    }

    #[test]
    fn placeholder_extends_path() {
        assert_eq!(ItemId::from("1.2").placeholder().as_str(), "1.2.0p");
        assert_eq!(ItemId::from("1.2.0p").last_segment(), "0p");
    }
}

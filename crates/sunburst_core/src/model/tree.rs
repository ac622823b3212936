//! Item tree arena.
//!
//! # Responsibility
//! - Own every item, keyed by `ItemId`, plus the ordered root list.
//! - Provide the minimal mutation surface used by editors and calibration.
//! - Rebuild parent back-references when loading a snapshot.
//!
//! # Invariants
//! - Child order is the order of each `children` list; root order is `roots`.
//! - Every item reachable from `roots` is in the arena and vice versa.
//! - Root items never declare `source = parent` on any property.
//! - `override` records always carry a value.
//! - Weights are finite and non-negative.

use crate::model::item::{Item, ItemId};
use crate::model::property::ItemProperties;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors from tree maintenance and snapshot loading.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeError {
    /// Target item does not exist.
    ItemNotFound(ItemId),
    /// Display name is blank after trim.
    InvalidDisplayName,
    /// Weight is negative, NaN or infinite.
    InvalidWeight { item: ItemId, weight: f64 },
    /// Snapshot contains the same id twice.
    DuplicateItem(ItemId),
    /// Declared level does not match tree depth.
    LevelMismatch {
        item: ItemId,
        expected: usize,
        actual: usize,
    },
    /// Root item declares `source = parent`, which can never terminate.
    RootInheritsFromParent { item: ItemId, property: String },
    /// Item record declares `source = override` without a value.
    OverrideWithoutValue { item: ItemId, property: String },
    /// Level default record declares `source = override` without a value.
    LevelOverrideWithoutValue { level: String, property: String },
    /// No numeric id is left under `parent` (`None` for the root list).
    ChildIdOverflow { parent: Option<ItemId> },
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemNotFound(id) => write!(f, "chart item not found: {id}"),
            Self::InvalidDisplayName => write!(f, "display name must not be blank"),
            Self::InvalidWeight { item, weight } => {
                write!(f, "weight of item {item} must be finite and >= 0, got {weight}")
            }
            Self::DuplicateItem(id) => write!(f, "duplicate chart item id: {id}"),
            Self::LevelMismatch {
                item,
                expected,
                actual,
            } => write!(
                f,
                "item {item} declares level {actual} but sits at depth {expected}"
            ),
            Self::RootInheritsFromParent { item, property } => write!(
                f,
                "root item {item} cannot inherit `{property}` from a parent"
            ),
            Self::OverrideWithoutValue { item, property } => write!(
                f,
                "item {item} overrides `{property}` without a value"
            ),
            Self::LevelOverrideWithoutValue { level, property } => write!(
                f,
                "level {level} overrides `{property}` without a value"
            ),
            Self::ChildIdOverflow { parent: Some(parent) } => {
                write!(f, "no child id left under item {parent}")
            }
            Self::ChildIdOverflow { parent: None } => write!(f, "no root item id left"),
        }
    }
}

impl Error for TreeError {}

/// Nested, parent-free form of one item used for snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemNode {
    pub id: ItemId,
    pub name: String,
    pub weight: f64,
    pub level: usize,
    pub properties: ItemProperties,
    #[serde(default)]
    pub children: Vec<ItemNode>,
}

/// Arena of chart items with parent links stored as ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<ItemNode>", try_from = "Vec<ItemNode>")]
pub struct ChartTree {
    items: HashMap<ItemId, Item>,
    roots: Vec<ItemId>,
}

impl ChartTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Root items in display order.
    pub fn roots(&self) -> &[ItemId] {
        &self.roots
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// Like `get`, but reports a missing id as `TreeError::ItemNotFound`.
    pub fn item(&self, id: &ItemId) -> TreeResult<&Item> {
        self.items
            .get(id)
            .ok_or_else(|| TreeError::ItemNotFound(id.clone()))
    }

    pub fn parent_of(&self, item: &Item) -> Option<&Item> {
        item.parent.as_ref().and_then(|id| self.items.get(id))
    }

    pub fn children_of<'a>(&'a self, item: &'a Item) -> impl Iterator<Item = &'a Item> + 'a {
        item.children.iter().filter_map(|id| self.items.get(id))
    }

    /// Sibling group of `item`: its parent's children, or the root list.
    pub fn siblings_of(&self, item: &Item) -> &[ItemId] {
        match self.parent_of(item) {
            Some(parent) => &parent.children,
            None => &self.roots,
        }
    }

    /// Appends a new weight-1 item under `parent` (or at root level).
    pub fn insert(&mut self, parent: Option<&ItemId>, name: Option<String>) -> TreeResult<ItemId> {
        let (level, siblings) = match parent {
            Some(parent_id) => {
                let parent = self.item(parent_id)?;
                (parent.level + 1, parent.children.as_slice())
            }
            None => (0, self.roots.as_slice()),
        };
        let id = ItemId::next_child(parent, siblings).ok_or_else(|| TreeError::ChildIdOverflow {
            parent: parent.cloned(),
        })?;
        let name = match name {
            Some(value) => normalize_display_name(value)?,
            None => id.to_string(),
        };

        let item = Item::new(id.clone(), name, level, parent.cloned());
        self.attach(item);
        Ok(id)
    }

    /// Deletes `id` and its subtree, detaching it from its parent.
    ///
    /// Returns the removed item record.
    pub fn remove_item(&mut self, id: &ItemId) -> TreeResult<Item> {
        let item = self
            .items
            .remove(id)
            .ok_or_else(|| TreeError::ItemNotFound(id.clone()))?;

        let owner = match item.parent.as_ref().and_then(|parent| self.items.get_mut(parent)) {
            Some(parent) => &mut parent.children,
            None => &mut self.roots,
        };
        owner.retain(|child| child != id);

        let mut pending = item.children.clone();
        while let Some(child_id) = pending.pop() {
            if let Some(child) = self.items.remove(&child_id) {
                pending.extend(child.children);
            }
        }
        Ok(item)
    }

    pub fn rename_item(&mut self, id: &ItemId, name: impl Into<String>) -> TreeResult<()> {
        let normalized = normalize_display_name(name.into())?;
        self.item_mut(id)?.name = normalized;
        Ok(())
    }

    pub fn set_weight(&mut self, id: &ItemId, weight: f64) -> TreeResult<()> {
        validate_weight(id, weight)?;
        self.item_mut(id)?.weight = weight;
        Ok(())
    }

    /// Replaces the property set of one item.
    pub fn set_properties(&mut self, id: &ItemId, properties: ItemProperties) -> TreeResult<()> {
        let item = self.item_mut(id)?;
        validate_properties(id, &properties, item.parent.is_none())?;
        item.properties = properties;
        Ok(())
    }

    pub(crate) fn item_mut(&mut self, id: &ItemId) -> TreeResult<&mut Item> {
        self.items
            .get_mut(id)
            .ok_or_else(|| TreeError::ItemNotFound(id.clone()))
    }

    /// Strips parent links into the nested snapshot form.
    pub fn to_nodes(&self) -> Vec<ItemNode> {
        self.roots
            .iter()
            .filter_map(|id| self.items.get(id))
            .map(|item| self.node_of(item))
            .collect()
    }

    /// Loads a nested snapshot, rebuilding every parent link with one
    /// top-down walk.
    ///
    /// # Errors
    /// - `DuplicateItem` when an id appears twice.
    /// - `LevelMismatch` when a declared level disagrees with tree depth.
    /// - `InvalidWeight` for negative or non-finite weights.
    /// - `RootInheritsFromParent` when a root declares `source = parent`.
    /// - `OverrideWithoutValue` when an `override` record has no value.
    pub fn from_nodes(nodes: Vec<ItemNode>) -> TreeResult<Self> {
        let mut tree = Self::new();
        let mut pending: Vec<(ItemNode, Option<ItemId>, usize)> =
            nodes.into_iter().rev().map(|node| (node, None, 0)).collect();

        while let Some((node, parent, depth)) = pending.pop() {
            if node.level != depth {
                return Err(TreeError::LevelMismatch {
                    item: node.id,
                    expected: depth,
                    actual: node.level,
                });
            }
            if tree.items.contains_key(&node.id) {
                return Err(TreeError::DuplicateItem(node.id));
            }
            validate_weight(&node.id, node.weight)?;
            validate_properties(&node.id, &node.properties, parent.is_none())?;

            let ItemNode {
                id,
                name,
                weight,
                level,
                properties,
                children,
            } = node;
            let item = Item {
                id: id.clone(),
                name,
                weight,
                level,
                parent,
                children: Vec::new(),
                properties,
            };
            tree.attach(item);

            pending.extend(
                children
                    .into_iter()
                    .rev()
                    .map(|child| (child, Some(id.clone()), depth + 1)),
            );
        }
        Ok(tree)
    }

    fn attach(&mut self, item: Item) {
        match item.parent.as_ref().and_then(|parent| self.items.get_mut(parent)) {
            Some(parent) => parent.children.push(item.id.clone()),
            None => self.roots.push(item.id.clone()),
        }
        self.items.insert(item.id.clone(), item);
    }

    fn node_of(&self, item: &Item) -> ItemNode {
        ItemNode {
            id: item.id.clone(),
            name: item.name.clone(),
            weight: item.weight,
            level: item.level,
            properties: item.properties.clone(),
            children: self
                .children_of(item)
                .map(|child| self.node_of(child))
                .collect(),
        }
    }
}

impl From<ChartTree> for Vec<ItemNode> {
    fn from(value: ChartTree) -> Self {
        value.to_nodes()
    }
}

impl TryFrom<Vec<ItemNode>> for ChartTree {
    type Error = TreeError;

    fn try_from(value: Vec<ItemNode>) -> Result<Self, Self::Error> {
        Self::from_nodes(value)
    }
}

fn normalize_display_name(value: String) -> TreeResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TreeError::InvalidDisplayName);
    }
    Ok(trimmed.to_string())
}

fn validate_weight(id: &ItemId, weight: f64) -> TreeResult<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(TreeError::InvalidWeight {
            item: id.clone(),
            weight,
        });
    }
    Ok(())
}

fn validate_properties(id: &ItemId, properties: &ItemProperties, is_root: bool) -> TreeResult<()> {
    if let Some(property) = properties.first_empty_override() {
        return Err(TreeError::OverrideWithoutValue {
            item: id.clone(),
            property: property.to_string(),
        });
    }
    if !is_root {
        return Ok(());
    }
    match properties.first_parent_sourced() {
        Some(property) => Err(TreeError::RootInheritsFromParent {
            item: id.clone(),
            property: property.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartTree, ItemNode, TreeError};
    use crate::model::item::ItemId;
    use crate::model::property::{ItemProperties, PropertySource};

    #[test]
    fn insert_allocates_path_ids_and_levels() {
        let mut tree = ChartTree::new();
        let first = tree.insert(None, None).unwrap();
        let second = tree.insert(None, Some("  Second ".to_string())).unwrap();
        let child = tree.insert(Some(&second), None).unwrap();

        assert_eq!(first.as_str(), "1");
        assert_eq!(second.as_str(), "2");
        assert_eq!(child.as_str(), "2.1");
        assert_eq!(tree.item(&second).unwrap().name, "Second");
        assert_eq!(tree.item(&child).unwrap().level, 1);
        assert_eq!(tree.item(&child).unwrap().parent, Some(second.clone()));
        assert_eq!(tree.siblings_of(tree.item(&child).unwrap()), &[child.clone()]);
        assert_eq!(tree.roots(), &[first, second]);
    }

    #[test]
    fn remove_item_drops_subtree_and_detaches() {
        let mut tree = ChartTree::new();
        let root = tree.insert(None, None).unwrap();
        let child = tree.insert(Some(&root), None).unwrap();
        let grandchild = tree.insert(Some(&child), None).unwrap();
        let keep = tree.insert(Some(&root), None).unwrap();

        tree.remove_item(&child).unwrap();

        assert!(tree.get(&child).is_none());
        assert!(tree.get(&grandchild).is_none());
        assert_eq!(tree.item(&root).unwrap().children, vec![keep]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn set_weight_rejects_negative_and_nan() {
        let mut tree = ChartTree::new();
        let root = tree.insert(None, None).unwrap();

        let err = tree.set_weight(&root, -1.0).unwrap_err();
        assert!(matches!(err, TreeError::InvalidWeight { .. }));
        assert!(tree.set_weight(&root, f64::NAN).is_err());
        tree.set_weight(&root, 0.0).unwrap();
        assert_eq!(tree.item(&root).unwrap().weight, 0.0);
    }

    #[test]
    fn set_properties_rejects_override_without_value() {
        let mut tree = ChartTree::new();
        let root = tree.insert(None, None).unwrap();
        let child = tree.insert(Some(&root), None).unwrap();
        let mut properties = tree.item(&child).unwrap().properties.clone();
        properties.stroke_width.inherit_from(PropertySource::Override);

        let err = tree.set_properties(&child, properties).unwrap_err();
        assert_eq!(
            err,
            TreeError::OverrideWithoutValue {
                item: child.clone(),
                property: "stroke_width".to_string(),
            }
        );
        assert_eq!(
            tree.item(&child).unwrap().properties.stroke_width.source,
            PropertySource::Level
        );
    }

    #[test]
    fn insert_reports_exhausted_child_ids() {
        let root = ItemId::new(u64::MAX.to_string());
        let node = ItemNode {
            id: root.clone(),
            name: "Last".to_string(),
            weight: 1.0,
            level: 0,
            properties: ItemProperties::for_new_item(false),
            children: Vec::new(),
        };
        let mut tree = ChartTree::from_nodes(vec![node]).unwrap();

        let err = tree.insert(None, None).unwrap_err();
        assert_eq!(err, TreeError::ChildIdOverflow { parent: None });
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.insert(Some(&root), None).unwrap().as_str(), "18446744073709551615.1");
    }

    #[test]
    fn missing_item_is_reported() {
        let mut tree = ChartTree::new();
        let err = tree.rename_item(&ItemId::from("9"), "x").unwrap_err();
        assert_eq!(err, TreeError::ItemNotFound(ItemId::from("9")));
    }
}

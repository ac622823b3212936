//! Chart document: level list plus item tree.

use crate::model::item::ItemId;
use crate::model::level::Level;
use crate::model::tree::{ChartTree, TreeError, TreeResult};
use serde::{Deserialize, Serialize};

/// Input of one aggregation/resolution pass.
///
/// # Invariants
/// - `levels[i]` exists before any item is assigned depth `i` when items are
///   added through `add_item`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ChartParts")]
pub struct Chart {
    pub levels: Vec<Level>,
    pub items: ChartTree,
}

/// Unvalidated wire form of `Chart`.
#[derive(Deserialize)]
struct ChartParts {
    levels: Vec<Level>,
    items: ChartTree,
}

impl TryFrom<ChartParts> for Chart {
    type Error = TreeError;

    fn try_from(value: ChartParts) -> Result<Self, Self::Error> {
        let chart = Self {
            levels: value.levels,
            items: value.items,
        };
        chart.validate_levels()?;
        Ok(chart)
    }
}

impl Chart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that no level default record overrides without a value.
    pub fn validate_levels(&self) -> TreeResult<()> {
        for level in &self.levels {
            if let Some(property) = level.properties.first_empty_override() {
                return Err(TreeError::LevelOverrideWithoutValue {
                    level: level.id.clone(),
                    property: property.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Deepest configured level index, `None` when no level exists.
    pub fn deepest_level(&self) -> Option<usize> {
        self.levels.len().checked_sub(1)
    }

    /// Adds one weight-1 item and appends a default level when the item is
    /// the first to reach its depth.
    pub fn add_item(&mut self, parent: Option<&ItemId>, name: Option<String>) -> TreeResult<ItemId> {
        let id = self.items.insert(parent, name)?;
        let level = self.items.item(&id)?.level;
        while self.levels.len() <= level {
            let depth = self.levels.len();
            log::debug!("event=level_append module=chart status=ok depth={depth}");
            self.levels.push(Level::for_depth(depth));
        }
        Ok(id)
    }
}

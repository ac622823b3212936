//! Indented outline import.
//!
//! # Responsibility
//! - Build a chart from plain text where indentation encodes nesting.
//!
//! # Invariants
//! - Blank lines are skipped.
//! - A line's parent is the nearest preceding line with a smaller indent.
//! - Levels are appended as depth grows, so the result always aggregates.

use crate::model::chart::Chart;
use crate::model::item::ItemId;
use crate::model::tree::TreeError;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static OUTLINE_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)(\S.*?)\s*$").expect("valid outline line regex"));

/// Errors from outline import.
#[derive(Debug, Clone, PartialEq)]
pub enum OutlineError {
    /// Input has no non-blank line.
    EmptyOutline,
    Tree(TreeError),
}

impl Display for OutlineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyOutline => write!(f, "outline contains no items"),
            Self::Tree(err) => write!(f, "{err}"),
        }
    }
}

impl Error for OutlineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            Self::EmptyOutline => None,
        }
    }
}

impl From<TreeError> for OutlineError {
    fn from(value: TreeError) -> Self {
        Self::Tree(value)
    }
}

/// Builds a chart from an indented outline.
///
/// Indentation is the count of leading whitespace characters; any deeper
/// indent than the previous line nests one level, regardless of width.
pub fn import_outline(text: &str) -> Result<Chart, OutlineError> {
    let mut chart = Chart::new();
    let mut stack: Vec<(ItemId, usize)> = Vec::new();

    for line in text.lines() {
        let Some(captures) = OUTLINE_LINE_RE.captures(line) else {
            continue;
        };
        let indent = captures[1].chars().count();
        let name = captures[2].to_string();

        while stack.last().is_some_and(|(_, top)| *top >= indent) {
            stack.pop();
        }
        let parent = stack.last().map(|(id, _)| id.clone());
        let id = chart.add_item(parent.as_ref(), Some(name))?;
        stack.push((id, indent));
    }

    if chart.items.is_empty() {
        return Err(OutlineError::EmptyOutline);
    }
    info!(
        "event=outline_import module=outline status=ok items={} levels={}",
        chart.items.len(),
        chart.levels.len()
    );
    Ok(chart)
}

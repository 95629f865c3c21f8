//! Table state slices.
//!
//! The engine is fully controlled: it reads these values from its state
//! provider on every access and reports requested changes through the
//! per-field change handlers in [`TableOptions`](crate::TableOptions).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::filter::FilterCondition;

/// One entry of the sort state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSort {
    /// Column id.
    pub id: String,
    /// Sort descending.
    pub desc: bool,
}

impl ColumnSort {
    /// Creates a sort entry.
    pub fn new(id: impl Into<String>, desc: bool) -> Self {
        Self { id: id.into(), desc }
    }
}

/// Ordered sort keys; the first entry is the primary key.
pub type SortingState = Vec<ColumnSort>;

/// Ids of selected rows.
pub type RowSelectionState = BTreeSet<String>;

/// Column visibility by id. Absent ids are visible.
pub type VisibilityState = BTreeMap<String, bool>;

/// Active per-column filters.
pub type ColumnFiltersState = Vec<ColumnFilter>;

/// Zero-indexed pagination position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub page_index: usize,
    pub page_size: usize,
}

impl PaginationState {
    /// Default page size.
    pub const DEFAULT_PAGE_SIZE: usize = 10;
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

/// Column ids pinned to each side, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnPinningState {
    #[serde(default)]
    pub left: Vec<String>,
    #[serde(default)]
    pub right: Vec<String>,
}

impl ColumnPinningState {
    /// Returns the side `id` is pinned to.
    pub fn side_of(&self, id: &str) -> Option<PinSide> {
        if self.left.iter().any(|c| c == id) {
            Some(PinSide::Left)
        } else if self.right.iter().any(|c| c == id) {
            Some(PinSide::Right)
        } else {
            None
        }
    }

    /// Returns the ids pinned to `side`.
    pub fn side(&self, side: PinSide) -> &[String] {
        match side {
            PinSide::Left => &self.left,
            PinSide::Right => &self.right,
        }
    }
}

/// A filter on a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub id: String,
    pub value: FilterCondition,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Maps a `desc` flag to a direction.
    pub fn from_desc(desc: bool) -> Self {
        if desc { SortDirection::Desc } else { SortDirection::Asc }
    }

    /// Returns `true` for [`SortDirection::Desc`].
    pub fn is_desc(self) -> bool {
        self == SortDirection::Desc
    }

    /// Returns `"asc"` or `"desc"`.
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// A pinning side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinSide {
    Left,
    Right,
}

impl PinSide {
    /// Returns `"left"` or `"right"`.
    pub fn as_str(self) -> &'static str {
        match self {
            PinSide::Left => "left",
            PinSide::Right => "right",
        }
    }
}

/// The complete controlled state of a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    pub sorting: SortingState,
    pub row_selection: RowSelectionState,
    pub pagination: PaginationState,
    pub column_pinning: ColumnPinningState,
    pub column_visibility: VisibilityState,
    pub global_filter: String,
    pub column_filters: ColumnFiltersState,
}

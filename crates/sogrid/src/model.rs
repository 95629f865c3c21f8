//! Public grid vocabulary: sort models, column state and filter models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sogrid_table::{
    ColumnFilter, ColumnFiltersState, ColumnSort, FilterCondition, PinSide, SortDirection,
    SortingState,
};

/// One sort key in grid vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortModel {
    pub col_id: String,
    pub sort: SortDirection,
}

impl SortModel {
    pub fn asc(col_id: impl Into<String>) -> Self {
        Self {
            col_id: col_id.into(),
            sort: SortDirection::Asc,
        }
    }

    pub fn desc(col_id: impl Into<String>) -> Self {
        Self {
            col_id: col_id.into(),
            sort: SortDirection::Desc,
        }
    }
}

impl From<&SortModel> for ColumnSort {
    fn from(model: &SortModel) -> Self {
        ColumnSort::new(model.col_id.clone(), model.sort.is_desc())
    }
}

impl From<&ColumnSort> for SortModel {
    fn from(sort: &ColumnSort) -> Self {
        Self {
            col_id: sort.id.clone(),
            sort: SortDirection::from_desc(sort.desc),
        }
    }
}

/// Converts a sort model list to sort state, keeping priority order.
pub fn to_sorting_state(models: &[SortModel]) -> SortingState {
    models.iter().map(ColumnSort::from).collect()
}

/// Converts sort state to a sort model list, keeping priority order.
pub fn to_sort_model(sorting: &[ColumnSort]) -> Vec<SortModel> {
    sorting.iter().map(SortModel::from).collect()
}

/// Column filters by column id.
pub type FilterModel = BTreeMap<String, FilterCondition>;

/// Converts a filter model to the engine's column filter list.
pub fn to_column_filters(model: &FilterModel) -> ColumnFiltersState {
    model
        .iter()
        .map(|(id, value)| ColumnFilter {
            id: id.clone(),
            value: value.clone(),
        })
        .collect()
}

/// Converts the engine's column filter list to a filter model.
pub fn to_filter_model(filters: &[ColumnFilter]) -> FilterModel {
    filters
        .iter()
        .map(|filter| (filter.id.clone(), filter.value.clone()))
        .collect()
}

/// Snapshot of one column's layout and sort state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnState {
    pub col_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide: Option<bool>,
    #[serde(default)]
    pub pinned: Option<PinSide>,
    #[serde(default)]
    pub sort: Option<SortDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_index: Option<usize>,
}

impl ColumnState {
    /// Creates an entry that only names the column.
    pub fn new(col_id: impl Into<String>) -> Self {
        Self {
            col_id: col_id.into(),
            width: None,
            hide: None,
            pinned: None,
            sort: None,
            sort_index: None,
        }
    }
}

//! Headless tabular engine for SO-Grid.
//!
//! `sogrid-table` computes row models (filtered, sorted, paginated, selected)
//! and column layout (visibility, pinning, sizing) for a list of rows. It
//! renders nothing. All view state is controlled: the engine reads it from a
//! [`TableState`] provider and reports requested changes as [`Updater`]s
//! through per-field handlers.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use sogrid_table::{ColumnDef, ColumnSort, Table, TableOptions};
//!
//! let rows = Arc::new(vec![
//!     json!({"name": "Bob", "age": 25}),
//!     json!({"name": "Alice", "age": 30}),
//! ]);
//! let table = Table::new(TableOptions::new(
//!     rows,
//!     vec![ColumnDef::accessor_key("name"), ColumnDef::accessor_key("age")],
//! ));
//!
//! table.set_sorting(vec![ColumnSort::new("name", false)]);
//! let first = &table.get_row_model().rows[0];
//! assert_eq!(first.original()["name"], "Alice");
//! ```
//!
//! [`Updater`]: sogrid_core::Updater

mod column;
mod filter;
mod row;
mod state;
mod table;
mod value;

pub use column::{
    Accessor, AccessorFn, Column, ColumnDef, DEFAULT_COLUMN_SIZE, DEFAULT_MIN_COLUMN_SIZE,
};
pub use filter::{FilterCondition, FilterOperator, FilterType};
pub use row::{Row, RowModel};
pub use state::{
    ColumnFilter, ColumnFiltersState, ColumnPinningState, ColumnSort, PaginationState, PinSide,
    RowSelectionState, SortDirection, SortingState, TableState, VisibilityState,
};
pub use table::{OnChange, RowIdFn, RowPredicate, StateProvider, Table, TableOptions};
pub use value::{CellValue, RowData, natural_cmp};

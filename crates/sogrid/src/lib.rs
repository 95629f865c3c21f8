//! SO-Grid: AG-Grid style data grids over a headless table engine.
//!
//! Hosts describe columns with [`ColumnSpec`] trees and grid behaviour with
//! [`GridOptions`], then drive the grid through the [`GridApi`] facade. The
//! facade keeps every piece of view state in one [`GridStateStore`] per grid,
//! runs the [`sogrid_table`] engine in controlled mode against it, and
//! notifies subscribers exactly once per state-changing call.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use serde_json::json;
//! use sogrid::{ColumnSpec, GridOptions, PinSide, create_grid};
//!
//! let api = create_grid(GridOptions::new(
//!     vec![json!({"id": 1, "name": "A"}), json!({"id": 2, "name": "B,C"})],
//!     vec![
//!         ColumnSpec::field("id").with_header_name("ID"),
//!         ColumnSpec::field("name").with_header_name("Name"),
//!     ],
//! ));
//!
//! let renders = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&renders);
//! let _subscription = api.subscribe(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! api.set_column_pinned("id", Some(PinSide::Left));
//! assert_eq!(renders.load(Ordering::SeqCst), 1);
//!
//! let csv = api.get_data_as_csv(&Default::default()).unwrap();
//! assert_eq!(csv, "\"ID\",\"Name\"\n\"1\",\"A\"\n\"2\",\"B,C\"");
//! ```
//!
//! # Modules
//!
//! - [`column`]: column specifications and the column mapper
//! - [`render`]: render-time resolution of column hooks and CSS classes

mod api;
pub mod column;
mod config;
mod error;
mod export;
mod instance;
mod model;
mod options;
pub mod render;
mod server_side;
mod state;

pub use api::{GridApi, create_grid};
pub use column::{
    CellParams, ColumnBehavior, ColumnSpec, Dynamic, HeaderParams, MappedColumns, StyleMap,
    ValueGetterParams, flatten_columns, get_column_id, map_column_defs,
};
pub use config::{GridConfig, RowSelection, Theme};
pub use error::{GridError, Result};
pub use export::{
    CSV_MIME_TYPE, DEFAULT_FILE_NAME, ExportParams, ExportSink, ExportedFile, FileExportSink,
    MemoryExportSink, export_columns, rows_to_csv,
};
pub use model::{
    ColumnState, FilterModel, SortModel, to_column_filters, to_filter_model, to_sort_model,
    to_sorting_state,
};
pub use options::{
    CellClickedEvent, CellValueChangedEvent, EventHandler, GridEvents, GridOptions,
    RowClickedEvent, RowSelectable,
};
pub use render::{PaginationInfo, RenderedCell, RenderedHeader};
pub use server_side::{
    PaginationChange, ServerSideDatasource, ServerSideRequest, ServerSideResponse,
};
pub use state::{GridState, GridStateStore};

pub use sogrid_core::{Subscription, Updater};
pub use sogrid_table::{
    CellValue, ColumnPinningState, FilterCondition, FilterOperator, FilterType, PinSide, RowData,
    SortDirection,
};

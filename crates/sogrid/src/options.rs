//! Grid options and event callbacks.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use sogrid_core::logging::{panic_message, targets};
use sogrid_table::{CellValue, RowIdFn};

use crate::api::GridApi;
use crate::column::ColumnSpec;
use crate::config::GridConfig;
use crate::model::{FilterModel, SortModel};
use crate::server_side::PaginationChange;

/// Type alias for a per-row selectability check.
pub type RowSelectable<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;

/// Type alias for an event callback.
pub type EventHandler<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// A row was clicked.
#[derive(Debug, Clone, PartialEq)]
pub struct RowClickedEvent<R> {
    pub data: R,
    /// Position in the displayed row model.
    pub row_index: usize,
}

/// A cell was clicked.
#[derive(Debug, Clone, PartialEq)]
pub struct CellClickedEvent<R> {
    pub value: CellValue,
    pub data: R,
    pub row_index: usize,
    pub col_id: String,
}

/// A cell was edited.
#[derive(Debug, Clone, PartialEq)]
pub struct CellValueChangedEvent<R> {
    pub value: CellValue,
    pub old_value: CellValue,
    /// The row after the edit.
    pub data: R,
    pub row_index: usize,
    pub col_id: String,
}

/// Event callbacks of a grid.
pub struct GridEvents<R> {
    pub on_selection_changed: Option<EventHandler<[R]>>,
    pub on_sort_changed: Option<EventHandler<[SortModel]>>,
    pub on_filter_changed: Option<EventHandler<FilterModel>>,
    pub on_pagination_changed: Option<EventHandler<PaginationChange>>,
    pub on_row_clicked: Option<EventHandler<RowClickedEvent<R>>>,
    pub on_row_double_clicked: Option<EventHandler<RowClickedEvent<R>>>,
    pub on_cell_clicked: Option<EventHandler<CellClickedEvent<R>>>,
    pub on_cell_value_changed: Option<EventHandler<CellValueChangedEvent<R>>>,
    pub on_grid_ready: Option<EventHandler<GridApi<R>>>,
}

impl<R> Default for GridEvents<R> {
    fn default() -> Self {
        Self {
            on_selection_changed: None,
            on_sort_changed: None,
            on_filter_changed: None,
            on_pagination_changed: None,
            on_row_clicked: None,
            on_row_double_clicked: None,
            on_cell_clicked: None,
            on_cell_value_changed: None,
            on_grid_ready: None,
        }
    }
}

impl<R> fmt::Debug for GridEvents<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = Vec::new();
        if self.on_selection_changed.is_some() {
            set.push("selection_changed");
        }
        if self.on_sort_changed.is_some() {
            set.push("sort_changed");
        }
        if self.on_filter_changed.is_some() {
            set.push("filter_changed");
        }
        if self.on_pagination_changed.is_some() {
            set.push("pagination_changed");
        }
        if self.on_row_clicked.is_some() {
            set.push("row_clicked");
        }
        if self.on_row_double_clicked.is_some() {
            set.push("row_double_clicked");
        }
        if self.on_cell_clicked.is_some() {
            set.push("cell_clicked");
        }
        if self.on_cell_value_changed.is_some() {
            set.push("cell_value_changed");
        }
        if self.on_grid_ready.is_some() {
            set.push("grid_ready");
        }
        f.debug_tuple("GridEvents").field(&set).finish()
    }
}

impl<R> GridEvents<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_selection_changed<F>(mut self, f: F) -> Self
    where
        F: Fn(&[R]) + Send + Sync + 'static,
    {
        self.on_selection_changed = Some(Arc::new(f));
        self
    }

    pub fn on_sort_changed<F>(mut self, f: F) -> Self
    where
        F: Fn(&[SortModel]) + Send + Sync + 'static,
    {
        self.on_sort_changed = Some(Arc::new(f));
        self
    }

    pub fn on_filter_changed<F>(mut self, f: F) -> Self
    where
        F: Fn(&FilterModel) + Send + Sync + 'static,
    {
        self.on_filter_changed = Some(Arc::new(f));
        self
    }

    pub fn on_pagination_changed<F>(mut self, f: F) -> Self
    where
        F: Fn(&PaginationChange) + Send + Sync + 'static,
    {
        self.on_pagination_changed = Some(Arc::new(f));
        self
    }

    pub fn on_row_clicked<F>(mut self, f: F) -> Self
    where
        F: Fn(&RowClickedEvent<R>) + Send + Sync + 'static,
    {
        self.on_row_clicked = Some(Arc::new(f));
        self
    }

    pub fn on_row_double_clicked<F>(mut self, f: F) -> Self
    where
        F: Fn(&RowClickedEvent<R>) + Send + Sync + 'static,
    {
        self.on_row_double_clicked = Some(Arc::new(f));
        self
    }

    pub fn on_cell_clicked<F>(mut self, f: F) -> Self
    where
        F: Fn(&CellClickedEvent<R>) + Send + Sync + 'static,
    {
        self.on_cell_clicked = Some(Arc::new(f));
        self
    }

    pub fn on_cell_value_changed<F>(mut self, f: F) -> Self
    where
        F: Fn(&CellValueChangedEvent<R>) + Send + Sync + 'static,
    {
        self.on_cell_value_changed = Some(Arc::new(f));
        self
    }

    pub fn on_grid_ready<F>(mut self, f: F) -> Self
    where
        F: Fn(&GridApi<R>) + Send + Sync + 'static,
    {
        self.on_grid_ready = Some(Arc::new(f));
        self
    }
}

/// Invokes an event callback, logging instead of propagating a panic.
pub(crate) fn fire<A: ?Sized>(event: &'static str, handler: Option<&EventHandler<A>>, args: &A) {
    let Some(handler) = handler else {
        return;
    };
    if let Err(payload) = catch_unwind(AssertUnwindSafe(|| handler(args))) {
        tracing::error!(
            target: targets::API,
            event,
            panic = panic_message(payload.as_ref()),
            "event callback panicked"
        );
    }
}

/// Everything needed to create a grid.
pub struct GridOptions<R> {
    pub row_data: Vec<R>,
    pub column_defs: Vec<ColumnSpec<R>>,
    /// Merged under every column definition.
    pub default_col_def: Option<ColumnSpec<R>>,
    pub config: GridConfig,
    pub events: GridEvents<R>,
    /// Row identity. Defaults to the row's index in `row_data`.
    pub get_row_id: Option<RowIdFn<R>>,
    pub is_row_selectable: Option<RowSelectable<R>>,
    pub loading: bool,
}

impl<R> fmt::Debug for GridOptions<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridOptions")
            .field("rows", &self.row_data.len())
            .field("column_defs", &self.column_defs)
            .field("default_col_def", &self.default_col_def)
            .field("config", &self.config)
            .field("events", &self.events)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

impl<R> GridOptions<R> {
    pub fn new(row_data: Vec<R>, column_defs: Vec<ColumnSpec<R>>) -> Self {
        Self {
            row_data,
            column_defs,
            default_col_def: None,
            config: GridConfig::default(),
            events: GridEvents::default(),
            get_row_id: None,
            is_row_selectable: None,
            loading: false,
        }
    }

    pub fn with_default_col_def(mut self, default_col_def: ColumnSpec<R>) -> Self {
        self.default_col_def = Some(default_col_def);
        self
    }

    pub fn with_config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_events(mut self, events: GridEvents<R>) -> Self {
        self.events = events;
        self
    }

    pub fn with_row_id<F>(mut self, f: F) -> Self
    where
        F: Fn(&R, usize) -> String + Send + Sync + 'static,
    {
        self.get_row_id = Some(Arc::new(f));
        self
    }

    pub fn with_row_selectable<F>(mut self, f: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.is_row_selectable = Some(Arc::new(f));
        self
    }

    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }
}

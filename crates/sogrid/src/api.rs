//! The grid facade.
//!
//! [`GridApi`] is the command and query surface host code uses to drive a
//! grid. It is a cheap handle: clones share the same grid instance.
//!
//! Every call that changes observable state ends with exactly one listener
//! notification. State setters never fail; out-of-range indices and unknown
//! column ids are logged at `debug` and otherwise ignored.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sogrid::{ColumnSpec, GridOptions, SortModel, create_grid};
//!
//! let api = create_grid(GridOptions::new(
//!     vec![json!({"name": "Bob", "age": 25}), json!({"name": "Alice", "age": 30})],
//!     vec![ColumnSpec::field("name").sortable(true), ColumnSpec::field("age").sortable(true)],
//! ));
//!
//! api.set_sort_model(&[SortModel::desc("age")]);
//! api.select_row(0);
//! assert_eq!(api.get_selected_rows()[0]["name"], "Alice");
//! ```

use std::fmt;
use std::sync::Arc;

use sogrid_core::logging::targets;
use sogrid_core::{Subscription, Updater};
use sogrid_table::{
    CellValue, ColumnPinningState, ColumnSort, FilterCondition, PinSide, RowData, Table,
    VisibilityState,
};

use crate::column::{CellParams, ColumnBehavior, ColumnSpec, MappedColumns};
use crate::config::GridConfig;
use crate::instance::GridCore;
use crate::error::Result;
use crate::export::{CSV_MIME_TYPE, ExportParams, ExportSink, export_columns, rows_to_csv};
use crate::model::{
    ColumnState, FilterModel, SortModel, to_column_filters, to_filter_model, to_sort_model,
    to_sorting_state,
};
use crate::options::{
    CellClickedEvent, CellValueChangedEvent, GridOptions, RowClickedEvent, fire,
};
use crate::render::{self, PaginationInfo, RenderedCell, RenderedHeader};
use crate::server_side::{ServerSideDatasource, ServerSideRequest, ServerSideResponse};
use crate::state::{GridState, GridStateStore};

/// Creates a grid and returns its API handle.
pub fn create_grid<R: RowData + Clone>(options: GridOptions<R>) -> GridApi<R> {
    GridApi::new(options)
}

/// Handle to one grid instance.
pub struct GridApi<R> {
    core: Arc<GridCore<R>>,
}

impl<R> Clone for GridApi<R> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<R> fmt::Debug for GridApi<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridApi")
            .field("config", &self.core.settings.config)
            .field("listeners", &self.core.store.listener_count())
            .finish_non_exhaustive()
    }
}

impl<R: RowData + Clone> GridApi<R> {
    /// Creates a grid and fires `grid_ready`.
    pub fn new(options: GridOptions<R>) -> Self {
        let api = Self {
            core: GridCore::new(options),
        };
        tracing::info!(
            target: targets::API,
            rows = api.core.row_data().len(),
            columns = api.core.mapped().behaviors.len(),
            server_side = api.core.settings.config.server_side,
            "grid created"
        );
        fire("grid_ready", api.core.settings.events.on_grid_ready.as_ref(), &api);
        api
    }

    // ---- Accessors ----

    pub fn config(&self) -> &GridConfig {
        &self.core.settings.config
    }

    /// A snapshot of the grid state.
    pub fn get_state(&self) -> GridState {
        self.core.store.snapshot()
    }

    /// Registers a state-change listener.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.core.store.subscribe(listener)
    }

    pub fn state_store(&self) -> &GridStateStore {
        &self.core.store
    }

    /// The current engine instance. Replaced whenever the grid rebuilds, so
    /// hold it only for the duration of one read.
    pub fn table(&self) -> Arc<Table<R>> {
        self.core.table()
    }

    // ---- Row data ----

    /// Replaces the row data. Sort, filter, pagination and selection state
    /// are kept.
    pub fn set_row_data(&self, rows: Vec<R>) {
        tracing::debug!(target: targets::API, rows = rows.len(), "set_row_data");
        self.core.replace_row_data(rows);
        self.core.store.notify();
    }

    pub fn get_row_data(&self) -> Arc<Vec<R>> {
        self.core.row_data()
    }

    /// Number of rows on the current page after sorting and filtering.
    pub fn get_displayed_row_count(&self) -> usize {
        self.core.table().get_row_model().len()
    }

    // ---- Selection ----

    pub fn get_selected_rows(&self) -> Vec<R> {
        self.core.selected_rows()
    }

    /// Selects every selectable row that passes the current filters.
    pub fn select_all(&self) {
        self.core.table().toggle_all_rows_selected(true);
    }

    pub fn deselect_all(&self) {
        self.core.table().toggle_all_rows_selected(false);
    }

    /// Selects the row at `row_index` of the displayed row model.
    pub fn select_row(&self, row_index: usize) {
        self.toggle_displayed_row(row_index, true);
    }

    pub fn deselect_row(&self, row_index: usize) {
        self.toggle_displayed_row(row_index, false);
    }

    pub fn is_row_selected(&self, row_index: usize) -> bool {
        let table = self.core.table();
        let model = table.get_row_model();
        model.get(row_index).is_some_and(|row| table.get_is_selected(row))
    }

    fn toggle_displayed_row(&self, row_index: usize, selected: bool) {
        let table = self.core.table();
        let model = table.get_row_model();
        match model.get(row_index) {
            Some(row) => table.toggle_row_selected(row, Some(selected)),
            None => tracing::debug!(
                target: targets::API,
                row_index,
                displayed = model.len(),
                "row index out of range"
            ),
        }
    }

    // ---- Sorting ----

    /// Replaces the sort state. The first entry is the primary key.
    pub fn set_sort_model(&self, sort_model: &[SortModel]) {
        self.core.table().set_sorting(to_sorting_state(sort_model));
    }

    pub fn get_sort_model(&self) -> Vec<SortModel> {
        self.core.store.read(|state| to_sort_model(&state.sorting))
    }

    /// Advances a column through unsorted, ascending and descending, as a
    /// header click does.
    pub fn toggle_column_sort(&self, col_id: &str, multi: bool) {
        let table = self.core.table();
        match table.get_column(col_id) {
            Some(column) => column.toggle_sorting(multi),
            None => tracing::debug!(target: targets::API, col_id, "unknown column"),
        }
    }

    // ---- Filtering ----

    pub fn set_quick_filter(&self, text: &str) {
        self.core.table().set_global_filter(text);
    }

    pub fn get_quick_filter(&self) -> String {
        self.core.store.read(|state| state.global_filter.clone())
    }

    /// Clears the quick filter and every column filter.
    pub fn reset_filters(&self) {
        let reset_page = self.core.settings.resets_page_index();
        self.core.store.update(|state| {
            state.global_filter.clear();
            state.column_filters.clear();
            if reset_page {
                state.pagination.page_index = 0;
            }
        });
        self.core.fire_filter_changed();
    }

    pub fn set_filter_model(&self, filter_model: &FilterModel) {
        self.core
            .table()
            .set_column_filters(to_column_filters(filter_model));
    }

    pub fn get_filter_model(&self) -> FilterModel {
        self.core.store.read(|state| to_filter_model(&state.column_filters))
    }

    /// Sets or clears (`None`) one column's filter.
    pub fn set_column_filter(&self, col_id: &str, condition: Option<FilterCondition>) {
        self.core.table().set_column_filter(col_id, condition);
    }

    // ---- Pagination ----

    /// Moves to a zero-based page.
    pub fn set_page(&self, page: usize) {
        self.core.table().set_page_index(page);
    }

    pub fn get_page(&self) -> usize {
        self.core.store.read(|state| state.pagination.page_index)
    }

    pub fn get_total_pages(&self) -> usize {
        self.core.table().get_page_count()
    }

    /// Changes the page size. The engine keeps the first visible row on the
    /// new page.
    pub fn set_page_size(&self, page_size: usize) {
        self.core.table().set_page_size(page_size);
    }

    pub fn get_page_size(&self) -> usize {
        self.core.store.read(|state| state.pagination.page_size)
    }

    pub fn next_page(&self) {
        self.core.table().next_page();
    }

    pub fn previous_page(&self) {
        self.core.table().previous_page();
    }

    /// The displayed row range. Server-side grids count the reported total.
    pub fn pagination_info(&self) -> PaginationInfo {
        let total_rows = if self.core.settings.config.server_side {
            self.core.total_rows().unwrap_or(0)
        } else {
            self.core.table().get_pre_pagination_row_model().len()
        };
        PaginationInfo::new(self.core.store.read(|state| state.pagination), total_rows)
    }

    // ---- Columns ----

    /// Shows or hides one column. Columns with `lock_visible` stay visible.
    pub fn set_column_visible(&self, col_id: &str, visible: bool) {
        let table = self.core.table();
        let Some(column) = table.get_column(col_id) else {
            tracing::debug!(target: targets::API, col_id, "unknown column");
            return;
        };
        if !visible && !column.get_can_hide() {
            tracing::debug!(target: targets::API, col_id, "column is locked visible");
            return;
        }
        let col_id = col_id.to_string();
        table.set_column_visibility(Updater::with(move |old: &VisibilityState| {
            let mut next = old.clone();
            next.insert(col_id, visible);
            next
        }));
    }

    /// Pins a column to a side, or unpins it with `None`. A newly pinned
    /// column goes to the end of its side.
    pub fn set_column_pinned(&self, col_id: &str, side: Option<PinSide>) {
        let table = self.core.table();
        if table.get_column(col_id).is_none() {
            tracing::debug!(target: targets::API, col_id, "unknown column");
            return;
        }
        let col_id = col_id.to_string();
        table.set_column_pinning(Updater::with(move |old: &ColumnPinningState| {
            let mut next = old.clone();
            next.left.retain(|id| *id != col_id);
            next.right.retain(|id| *id != col_id);
            match side {
                Some(PinSide::Left) => next.left.push(col_id),
                Some(PinSide::Right) => next.right.push(col_id),
                None => {}
            }
            next
        }));
    }

    /// Width, visibility, pinning and sort of every leaf column.
    pub fn get_column_state(&self) -> Vec<ColumnState> {
        let table = self.core.table();
        table
            .get_all_leaf_columns()
            .iter()
            .map(|column| ColumnState {
                col_id: column.id().to_string(),
                width: Some(column.get_size()),
                hide: Some(!column.get_is_visible()),
                pinned: column.get_is_pinned(),
                sort: column.get_is_sorted(),
                sort_index: column.get_sort_index(),
            })
            .collect()
    }

    /// Restores visibility, pinning and sorting from a column state list.
    ///
    /// Widths are not restored.
    pub fn set_column_state(&self, columns: &[ColumnState]) {
        let visibility: VisibilityState = columns
            .iter()
            .filter_map(|entry| entry.hide.map(|hide| (entry.col_id.clone(), !hide)))
            .collect();
        let pinned_to = |side: PinSide| -> Vec<String> {
            columns
                .iter()
                .filter(|entry| entry.pinned == Some(side))
                .map(|entry| entry.col_id.clone())
                .collect()
        };
        let pinning = ColumnPinningState {
            left: pinned_to(PinSide::Left),
            right: pinned_to(PinSide::Right),
        };
        let sorting: Vec<ColumnSort> = columns
            .iter()
            .filter_map(|entry| {
                entry
                    .sort
                    .map(|direction| ColumnSort::new(entry.col_id.clone(), direction.is_desc()))
            })
            .collect();

        tracing::debug!(target: targets::API, columns = columns.len(), "set_column_state");
        self.core.store.update(move |state| {
            state.column_visibility = visibility;
            state.column_pinning = pinning;
            state.sorting = sorting;
        });
        self.core.fire_sort_changed();
    }

    pub fn get_column_defs(&self) -> Arc<Vec<ColumnSpec<R>>> {
        self.core.column_defs()
    }

    /// Replaces the column definitions and rebuilds the engine.
    pub fn set_column_defs(&self, column_defs: Vec<ColumnSpec<R>>) {
        tracing::debug!(target: targets::API, columns = column_defs.len(), "set_column_defs");
        self.core.replace_column_defs(column_defs);
        self.core.store.notify();
    }

    pub fn set_default_col_def(&self, default_col_def: Option<ColumnSpec<R>>) {
        self.core.replace_default_col_def(default_col_def);
        self.core.store.notify();
    }

    /// The current mapper output.
    pub fn mapped_columns(&self) -> Arc<MappedColumns<R>> {
        self.core.mapped()
    }

    pub fn column_behavior(&self, col_id: &str) -> Option<Arc<ColumnBehavior<R>>> {
        self.core.mapped().behavior(col_id).cloned()
    }

    /// Notifies listeners so they re-render after row contents were changed
    /// in place.
    pub fn refresh_cells(&self) {
        self.core.store.notify();
    }

    /// Notifies listeners; the rendering layer recomputes widths.
    pub fn size_columns_to_fit(&self) {
        self.core.store.notify();
    }

    // ---- Export ----

    /// The CSV text an export with `params` would produce.
    pub fn get_data_as_csv(&self, params: &ExportParams) -> Result<String> {
        let column_defs = self.core.column_defs();
        let columns = export_columns(&column_defs, params.column_keys.as_deref());
        if params.only_selected {
            let rows = self.core.selected_rows();
            rows_to_csv(&rows, &columns)
        } else {
            let rows = self.core.row_data();
            rows_to_csv(rows.iter(), &columns)
        }
    }

    /// Exports rows as CSV and hands the file to `sink`.
    pub fn export_data_as_csv(&self, params: &ExportParams, sink: &dyn ExportSink) -> Result<()> {
        let csv = self.get_data_as_csv(params)?;
        tracing::debug!(target: targets::EXPORT, file_name = params.file_name(), "exporting CSV");
        sink.deliver(params.file_name(), CSV_MIME_TYPE, csv.as_bytes())
    }

    // ---- Server side ----

    /// Describes the page the grid currently shows.
    pub fn server_side_request(&self) -> ServerSideRequest {
        self.core.store.read(ServerSideRequest::from_state)
    }

    /// Installs a fetched page and clears the loading flag.
    pub fn apply_server_side_response(&self, response: ServerSideResponse<R>) {
        let ServerSideResponse {
            row_data,
            total_rows,
        } = response;
        tracing::debug!(target: targets::API, rows = row_data.len(), total_rows, "server-side page applied");
        self.core.replace_total_rows(Some(total_rows));
        self.core.replace_row_data(row_data);
        self.core.set_loading(false);
        self.core.store.notify();
    }

    /// Fetches the current page from `source` and applies it.
    pub fn fetch_server_side(&self, source: &dyn ServerSideDatasource<R>) {
        let request = self.server_side_request();
        let response = source.get_rows(&request);
        self.apply_server_side_response(response);
    }

    pub fn set_loading(&self, loading: bool) {
        self.core.set_loading(loading);
        self.core.store.notify();
    }

    pub fn is_loading(&self) -> bool {
        self.core.is_loading()
    }

    // ---- Editing and interaction ----

    /// Writes a cell of the displayed row model. Only editable columns
    /// backed by a field accept values.
    ///
    /// Returns `true` if the value was written.
    pub fn set_cell_value(&self, row_index: usize, col_id: &str, value: impl Into<CellValue>) -> bool {
        let value = value.into();
        let table = self.core.table();
        let model = table.get_row_model();
        let Some(row) = model.get(row_index) else {
            tracing::debug!(target: targets::API, row_index, "row index out of range");
            return false;
        };
        let behavior = self.column_behavior(col_id);
        let Some(field) = behavior
            .as_deref()
            .filter(|behavior| behavior.editable)
            .and_then(ColumnBehavior::field)
        else {
            tracing::debug!(target: targets::API, col_id, "column is not editable");
            return false;
        };

        let old_value = row.original().field(field);
        let mut rows = Vec::clone(&self.core.row_data());
        let Some(target) = rows.get_mut(row.index) else {
            return false;
        };
        if !target.set_field(field, value.clone()) {
            tracing::debug!(target: targets::API, col_id, field, "row rejected the value");
            return false;
        }
        let data = target.clone();

        self.core.replace_row_data(rows);
        fire(
            "cell_value_changed",
            self.core.settings.events.on_cell_value_changed.as_ref(),
            &CellValueChangedEvent {
                value,
                old_value,
                data,
                row_index,
                col_id: col_id.to_string(),
            },
        );
        self.core.store.notify();
        true
    }

    /// Fires `row_clicked` for a displayed row. Returns `false` when the
    /// index is out of range.
    pub fn dispatch_row_clicked(&self, row_index: usize) -> bool {
        self.dispatch_row_event("row_clicked", row_index, false)
    }

    pub fn dispatch_row_double_clicked(&self, row_index: usize) -> bool {
        self.dispatch_row_event("row_double_clicked", row_index, true)
    }

    fn dispatch_row_event(&self, event: &'static str, row_index: usize, double: bool) -> bool {
        let table = self.core.table();
        let model = table.get_row_model();
        let Some(row) = model.get(row_index) else {
            return false;
        };
        let events = &self.core.settings.events;
        let handler = if double {
            events.on_row_double_clicked.as_ref()
        } else {
            events.on_row_clicked.as_ref()
        };
        fire(
            event,
            handler,
            &RowClickedEvent {
                data: row.original().clone(),
                row_index,
            },
        );
        true
    }

    /// Fires `cell_clicked`. Returns `false` for an unknown cell.
    pub fn dispatch_cell_clicked(&self, row_index: usize, col_id: &str) -> bool {
        let table = self.core.table();
        let model = table.get_row_model();
        let Some(row) = model.get(row_index) else {
            return false;
        };
        if table.get_column(col_id).is_none() {
            return false;
        }
        fire(
            "cell_clicked",
            self.core.settings.events.on_cell_clicked.as_ref(),
            &CellClickedEvent {
                value: table.get_value(row, col_id),
                data: row.original().clone(),
                row_index,
                col_id: col_id.to_string(),
            },
        );
        true
    }

    // ---- Rendering ----

    /// Resolves a body cell of the displayed row model.
    pub fn render_cell(&self, row_index: usize, col_id: &str) -> Option<RenderedCell> {
        let table = self.core.table();
        let model = table.get_row_model();
        let row = model.get(row_index)?;
        let column = table.get_column(col_id)?;
        let mapped = self.core.mapped();
        let behavior = mapped.behavior(col_id)?;

        let value = table.get_value(row, col_id);
        let params = CellParams {
            value: &value,
            data: row.original(),
            row_index,
            col_def: &behavior.col_def,
        };
        let pinned = column.get_is_pinned();
        Some(RenderedCell {
            text: render::cell_display(behavior, &params),
            class: render::cell_class(behavior, pinned, &params),
            style: render::cell_style(behavior, &params),
            editor: render::cell_editor(behavior, &params),
            width: column.get_size(),
            pinned,
            offset: pinned.map(|side| match side {
                PinSide::Left => column.get_start(Some(side)),
                PinSide::Right => column.get_after(Some(side)),
            }),
        })
    }

    /// Resolves a header cell. Group columns resolve too.
    pub fn render_header(&self, col_id: &str) -> Option<RenderedHeader> {
        let table = self.core.table();
        let column = table.get_column(col_id)?;
        let mapped = self.core.mapped();
        let behavior = mapped.behavior(col_id).map(|behavior| &**behavior);

        let pinned = column.get_is_pinned();
        Some(RenderedHeader {
            label: render::header_label(behavior, column.header()),
            class: render::header_class(behavior, pinned),
            style: render::header_style(behavior),
            sort_indicator: render::sort_indicator(column.get_is_sorted(), column.get_can_sort()),
            width: column.get_size(),
            pinned,
            offset: pinned.map(|side| match side {
                PinSide::Left => column.get_start(Some(side)),
                PinSide::Right => column.get_after(Some(side)),
            }),
        })
    }

    pub fn row_class(&self, row_index: usize) -> Option<String> {
        let table = self.core.table();
        let model = table.get_row_model();
        let row = model.get(row_index)?;
        Some(render::row_class(row_index, table.get_is_selected(row)))
    }

    pub fn theme_class(&self) -> String {
        render::theme_class(self.core.settings.config.theme)
    }
}

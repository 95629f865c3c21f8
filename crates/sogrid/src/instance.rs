//! Grid instance internals.
//!
//! A [`GridCore`] ties one table engine instance to one [`GridStateStore`].
//! The engine runs in controlled mode: it reads the store on every access and
//! reports every requested change through its change handlers, which write
//! the store and fire the grid events. The engine is rebuilt, never mutated,
//! when row data, column definitions or the server-side page count change.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use sogrid_core::Updater;
use sogrid_core::logging::targets;
use sogrid_table::{
    ColumnFiltersState, ColumnPinningState, PaginationState, Row, RowData, RowIdFn,
    RowSelectionState, SortingState, Table, TableOptions, TableState, VisibilityState,
};

use crate::column::{ColumnSpec, MappedColumns, map_column_defs};
use crate::config::{GridConfig, RowSelection};
use crate::model::{FilterModel, to_filter_model, to_sort_model};
use crate::options::{GridEvents, GridOptions, RowSelectable, fire};
use crate::server_side::PaginationChange;
use crate::state::{GridState, GridStateStore};

/// Options that never change over a grid's lifetime.
pub(crate) struct GridSettings<R> {
    pub(crate) config: GridConfig,
    pub(crate) events: GridEvents<R>,
    pub(crate) get_row_id: Option<RowIdFn<R>>,
    pub(crate) is_row_selectable: Option<RowSelectable<R>>,
}

impl<R> GridSettings<R> {
    /// Whether sort and filter changes return to the first page.
    pub(crate) fn resets_page_index(&self) -> bool {
        self.config.auto_reset_page_index && !self.config.server_side
    }
}

pub(crate) struct GridCore<R> {
    this: Weak<GridCore<R>>,
    pub(crate) settings: GridSettings<R>,
    pub(crate) store: Arc<GridStateStore>,
    row_data: RwLock<Arc<Vec<R>>>,
    column_defs: RwLock<Arc<Vec<ColumnSpec<R>>>>,
    default_col_def: RwLock<Option<Arc<ColumnSpec<R>>>>,
    mapped: RwLock<Arc<MappedColumns<R>>>,
    total_rows: RwLock<Option<usize>>,
    table: RwLock<Arc<Table<R>>>,
    loading: AtomicBool,
}

impl<R: RowData + Clone> GridCore<R> {
    pub(crate) fn new(options: GridOptions<R>) -> Arc<Self> {
        let GridOptions {
            row_data,
            column_defs,
            default_col_def,
            config,
            events,
            get_row_id,
            is_row_selectable,
            loading,
        } = options;

        let store = Arc::new(GridStateStore::new(GridState::initial(&config, &column_defs)));
        let mapped = Arc::new(map_column_defs(&column_defs, default_col_def.as_ref()));
        let row_data = Arc::new(row_data);
        let total_rows = config.total_rows;
        let settings = GridSettings {
            config,
            events,
            get_row_id,
            is_row_selectable,
        };

        Arc::new_cyclic(|this| {
            let page_size = store.read(|state| state.pagination.page_size);
            let table = build_table(
                this,
                &store,
                &settings,
                Arc::clone(&row_data),
                &mapped,
                total_rows,
                page_size,
            );
            GridCore {
                this: this.clone(),
                settings,
                store,
                row_data: RwLock::new(row_data),
                column_defs: RwLock::new(Arc::new(column_defs)),
                default_col_def: RwLock::new(default_col_def.map(Arc::new)),
                mapped: RwLock::new(mapped),
                total_rows: RwLock::new(total_rows),
                table: RwLock::new(Arc::new(table)),
                loading: AtomicBool::new(loading),
            }
        })
    }

    // ---- Accessors ----

    pub(crate) fn table(&self) -> Arc<Table<R>> {
        Arc::clone(&*self.table.read())
    }

    pub(crate) fn row_data(&self) -> Arc<Vec<R>> {
        Arc::clone(&*self.row_data.read())
    }

    pub(crate) fn column_defs(&self) -> Arc<Vec<ColumnSpec<R>>> {
        Arc::clone(&*self.column_defs.read())
    }

    pub(crate) fn mapped(&self) -> Arc<MappedColumns<R>> {
        Arc::clone(&*self.mapped.read())
    }

    pub(crate) fn total_rows(&self) -> Option<usize> {
        *self.total_rows.read()
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub(crate) fn set_loading(&self, loading: bool) {
        self.loading.store(loading, Ordering::SeqCst);
    }

    /// Original rows of the selected row ids, in data order.
    pub(crate) fn selected_rows(&self) -> Vec<R> {
        self.table()
            .get_selected_row_model()
            .iter()
            .map(|row| row.original().clone())
            .collect()
    }

    // ---- Rebuilds ----

    pub(crate) fn replace_row_data(&self, rows: Vec<R>) {
        *self.row_data.write() = Arc::new(rows);
        self.rebuild_table();
    }

    pub(crate) fn replace_total_rows(&self, total_rows: Option<usize>) {
        *self.total_rows.write() = total_rows;
    }

    pub(crate) fn replace_column_defs(&self, column_defs: Vec<ColumnSpec<R>>) {
        *self.column_defs.write() = Arc::new(column_defs);
        self.remap_columns();
    }

    pub(crate) fn replace_default_col_def(&self, default_col_def: Option<ColumnSpec<R>>) {
        *self.default_col_def.write() = default_col_def.map(Arc::new);
        self.remap_columns();
    }

    fn remap_columns(&self) {
        let column_defs = self.column_defs();
        let default_col_def = self.default_col_def.read().clone();
        let mapped = map_column_defs(&column_defs, default_col_def.as_deref());
        *self.mapped.write() = Arc::new(mapped);
        self.rebuild_table();
    }

    pub(crate) fn rebuild_table(&self) {
        let page_size = self.store.read(|state| state.pagination.page_size);
        self.rebuild_table_with_page_size(page_size);
    }

    fn rebuild_table_with_page_size(&self, page_size: usize) {
        let table = build_table(
            &self.this,
            &self.store,
            &self.settings,
            self.row_data(),
            &self.mapped(),
            self.total_rows(),
            page_size,
        );
        *self.table.write() = Arc::new(table);
    }

    // ---- Engine change handlers ----

    fn on_sorting_change(&self, updater: Updater<SortingState>) {
        let reset = self.settings.resets_page_index();
        self.store.update(move |state| {
            state.sorting = updater.apply(&state.sorting);
            if reset {
                state.pagination.page_index = 0;
            }
        });
        self.fire_sort_changed();
    }

    fn on_row_selection_change(&self, updater: Updater<RowSelectionState>) {
        self.store.set_selection(updater);
        let selected = self.selected_rows();
        fire(
            "selection_changed",
            self.settings.events.on_selection_changed.as_ref(),
            &selected[..],
        );
    }

    fn on_pagination_change(&self, updater: Updater<PaginationState>) {
        let before = self.store.read(|state| state.pagination);
        let next = updater.apply(&before);
        // The explicit server-side page count depends on the page size.
        if self.settings.config.server_side && next.page_size != before.page_size {
            self.rebuild_table_with_page_size(next.page_size);
        }
        self.store.set_pagination(next);
        fire(
            "pagination_changed",
            self.settings.events.on_pagination_changed.as_ref(),
            &PaginationChange::from(next),
        );
    }

    fn on_column_pinning_change(&self, updater: Updater<ColumnPinningState>) {
        self.store.set_pinning(updater);
    }

    fn on_column_visibility_change(&self, updater: Updater<VisibilityState>) {
        self.store.set_visibility(updater);
    }

    fn on_global_filter_change(&self, updater: Updater<String>) {
        let reset = self.settings.resets_page_index();
        self.store.update(move |state| {
            state.global_filter = updater.apply(&state.global_filter);
            if reset {
                state.pagination.page_index = 0;
            }
        });
        self.fire_filter_changed();
    }

    fn on_column_filters_change(&self, updater: Updater<ColumnFiltersState>) {
        let reset = self.settings.resets_page_index();
        self.store.update(move |state| {
            state.column_filters = updater.apply(&state.column_filters);
            if reset {
                state.pagination.page_index = 0;
            }
        });
        self.fire_filter_changed();
    }

    // ---- Events ----

    pub(crate) fn fire_sort_changed(&self) {
        let sort_model = self.store.read(|state| to_sort_model(&state.sorting));
        fire(
            "sort_changed",
            self.settings.events.on_sort_changed.as_ref(),
            &sort_model[..],
        );
    }

    pub(crate) fn fire_filter_changed(&self) {
        let filter_model: FilterModel = self.store.read(|state| to_filter_model(&state.column_filters));
        fire(
            "filter_changed",
            self.settings.events.on_filter_changed.as_ref(),
            &filter_model,
        );
    }
}

/// Wraps a core handler as an engine change handler that holds the core
/// weakly.
fn forward<R, T>(
    this: &Weak<GridCore<R>>,
    handler: fn(&GridCore<R>, Updater<T>),
) -> impl Fn(Updater<T>) + Send + Sync + 'static
where
    R: RowData + Clone,
    T: 'static,
{
    let this = this.clone();
    move |updater| match this.upgrade() {
        Some(core) => handler(&core, updater),
        None => tracing::debug!(target: targets::STORE, "state change after grid was dropped"),
    }
}

fn build_table<R: RowData + Clone>(
    this: &Weak<GridCore<R>>,
    store: &Arc<GridStateStore>,
    settings: &GridSettings<R>,
    row_data: Arc<Vec<R>>,
    mapped: &MappedColumns<R>,
    total_rows: Option<usize>,
    page_size: usize,
) -> Table<R> {
    let config = &settings.config;
    let server_side = config.server_side;
    let provider = Arc::clone(store);

    let mut options = TableOptions::new(row_data, mapped.columns.clone())
        .with_state(move || provider.read(|state| TableState::from(state)))
        .on_sorting_change(forward(this, GridCore::on_sorting_change))
        .on_row_selection_change(forward(this, GridCore::on_row_selection_change))
        .on_pagination_change(forward(this, GridCore::on_pagination_change))
        .on_column_pinning_change(forward(this, GridCore::on_column_pinning_change))
        .on_column_visibility_change(forward(this, GridCore::on_column_visibility_change))
        .on_global_filter_change(forward(this, GridCore::on_global_filter_change))
        .on_column_filters_change(forward(this, GridCore::on_column_filters_change))
        .with_sorting(config.sortable, config.multi_sort)
        .with_filters(config.filterable)
        .with_row_selection(
            config.row_selection != RowSelection::None,
            config.row_selection == RowSelection::Multiple,
        )
        .with_pagination(config.pagination)
        .with_manual(server_side, server_side, server_side);

    if let Some(total) = total_rows.filter(|total| server_side && *total > 0) {
        options = options.with_page_count(total.div_ceil(page_size.max(1)));
    }
    if let Some(get_row_id) = &settings.get_row_id {
        options.get_row_id = Some(Arc::clone(get_row_id));
    }
    if let Some(selectable) = &settings.is_row_selectable {
        let selectable = Arc::clone(selectable);
        options = options.with_row_selectable(move |row: &Row<R>| selectable(row.original()));
    }

    tracing::debug!(
        target: targets::API,
        server_side,
        page_count = ?options.page_count,
        "building table engine"
    );
    Table::new(options)
}

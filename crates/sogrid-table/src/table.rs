//! The table engine.
//!
//! A [`Table`] owns its column tree and a shared handle to the row data.
//! State is read on every access, either from a controlled state provider or
//! from the table's own internal state. Requested changes go through the
//! per-field change handlers; a field without a handler updates the internal
//! state directly.
//!
//! Row models are computed in stages:
//!
//! ```text
//! core -> filtered -> sorted (pre-pagination) -> paginated
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use sogrid_core::Updater;
use sogrid_core::logging::targets;

use crate::column::{Accessor, Column, ColumnArena, ColumnDef};
use crate::filter::FilterCondition;
use crate::row::{Row, RowModel};
use crate::state::{
    ColumnFilter, ColumnFiltersState, ColumnPinningState, PaginationState, PinSide,
    RowSelectionState, SortingState, TableState, VisibilityState,
};
use crate::value::{CellValue, RowData};

/// Type alias for a controlled state provider.
pub type StateProvider = Arc<dyn Fn() -> TableState + Send + Sync>;

/// Type alias for a state change handler.
pub type OnChange<T> = Arc<dyn Fn(Updater<T>) + Send + Sync>;

/// Type alias for a row id function. Receives the row and its data index.
pub type RowIdFn<R> = Arc<dyn Fn(&R, usize) -> String + Send + Sync>;

/// Type alias for a per-row predicate.
pub type RowPredicate<R> = Arc<dyn Fn(&Row<R>) -> bool + Send + Sync>;

/// Options for creating a [`Table`].
pub struct TableOptions<R> {
    pub data: Arc<Vec<R>>,
    pub columns: Vec<ColumnDef<R>>,
    /// Controlled state. When absent the table keeps its own state, seeded
    /// from `initial_state`.
    pub state: Option<StateProvider>,
    pub initial_state: TableState,
    pub on_sorting_change: Option<OnChange<SortingState>>,
    pub on_row_selection_change: Option<OnChange<RowSelectionState>>,
    pub on_pagination_change: Option<OnChange<PaginationState>>,
    pub on_column_pinning_change: Option<OnChange<ColumnPinningState>>,
    pub on_column_visibility_change: Option<OnChange<VisibilityState>>,
    pub on_global_filter_change: Option<OnChange<String>>,
    pub on_column_filters_change: Option<OnChange<ColumnFiltersState>>,
    pub enable_sorting: bool,
    pub enable_multi_sort: bool,
    pub enable_filters: bool,
    pub enable_global_filter: bool,
    pub enable_row_selection: bool,
    /// Per-row selection capability, checked in addition to
    /// `enable_row_selection`.
    pub row_selectable: Option<RowPredicate<R>>,
    pub enable_multi_row_selection: bool,
    /// Whether `get_row_model` returns the paginated model.
    pub enable_pagination: bool,
    pub enable_hiding: bool,
    pub enable_column_pinning: bool,
    pub manual_sorting: bool,
    pub manual_filtering: bool,
    pub manual_pagination: bool,
    /// Explicit page count, for externally paginated data.
    pub page_count: Option<usize>,
    pub get_row_id: Option<RowIdFn<R>>,
}

impl<R> TableOptions<R> {
    /// Creates options with every feature enabled and pagination off.
    pub fn new(data: Arc<Vec<R>>, columns: Vec<ColumnDef<R>>) -> Self {
        Self {
            data,
            columns,
            state: None,
            initial_state: TableState::default(),
            on_sorting_change: None,
            on_row_selection_change: None,
            on_pagination_change: None,
            on_column_pinning_change: None,
            on_column_visibility_change: None,
            on_global_filter_change: None,
            on_column_filters_change: None,
            enable_sorting: true,
            enable_multi_sort: true,
            enable_filters: true,
            enable_global_filter: true,
            enable_row_selection: true,
            row_selectable: None,
            enable_multi_row_selection: true,
            enable_pagination: false,
            enable_hiding: true,
            enable_column_pinning: true,
            manual_sorting: false,
            manual_filtering: false,
            manual_pagination: false,
            page_count: None,
            get_row_id: None,
        }
    }

    /// Sets a controlled state provider.
    pub fn with_state<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> TableState + Send + Sync + 'static,
    {
        self.state = Some(Arc::new(provider));
        self
    }

    pub fn with_initial_state(mut self, state: TableState) -> Self {
        self.initial_state = state;
        self
    }

    pub fn on_sorting_change<F>(mut self, f: F) -> Self
    where
        F: Fn(Updater<SortingState>) + Send + Sync + 'static,
    {
        self.on_sorting_change = Some(Arc::new(f));
        self
    }

    pub fn on_row_selection_change<F>(mut self, f: F) -> Self
    where
        F: Fn(Updater<RowSelectionState>) + Send + Sync + 'static,
    {
        self.on_row_selection_change = Some(Arc::new(f));
        self
    }

    pub fn on_pagination_change<F>(mut self, f: F) -> Self
    where
        F: Fn(Updater<PaginationState>) + Send + Sync + 'static,
    {
        self.on_pagination_change = Some(Arc::new(f));
        self
    }

    pub fn on_column_pinning_change<F>(mut self, f: F) -> Self
    where
        F: Fn(Updater<ColumnPinningState>) + Send + Sync + 'static,
    {
        self.on_column_pinning_change = Some(Arc::new(f));
        self
    }

    pub fn on_column_visibility_change<F>(mut self, f: F) -> Self
    where
        F: Fn(Updater<VisibilityState>) + Send + Sync + 'static,
    {
        self.on_column_visibility_change = Some(Arc::new(f));
        self
    }

    pub fn on_global_filter_change<F>(mut self, f: F) -> Self
    where
        F: Fn(Updater<String>) + Send + Sync + 'static,
    {
        self.on_global_filter_change = Some(Arc::new(f));
        self
    }

    pub fn on_column_filters_change<F>(mut self, f: F) -> Self
    where
        F: Fn(Updater<ColumnFiltersState>) + Send + Sync + 'static,
    {
        self.on_column_filters_change = Some(Arc::new(f));
        self
    }

    pub fn with_sorting(mut self, enable: bool, multi: bool) -> Self {
        self.enable_sorting = enable;
        self.enable_multi_sort = multi;
        self
    }

    pub fn with_filters(mut self, enable: bool) -> Self {
        self.enable_filters = enable;
        self
    }

    pub fn with_row_selection(mut self, enable: bool, multi: bool) -> Self {
        self.enable_row_selection = enable;
        self.enable_multi_row_selection = multi;
        self
    }

    pub fn with_row_selectable<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Row<R>) -> bool + Send + Sync + 'static,
    {
        self.row_selectable = Some(Arc::new(predicate));
        self
    }

    pub fn with_pagination(mut self, enable: bool) -> Self {
        self.enable_pagination = enable;
        self
    }

    /// Marks sorting, filtering and pagination as performed externally.
    pub fn with_manual(mut self, sorting: bool, filtering: bool, pagination: bool) -> Self {
        self.manual_sorting = sorting;
        self.manual_filtering = filtering;
        self.manual_pagination = pagination;
        self
    }

    pub fn with_page_count(mut self, page_count: usize) -> Self {
        self.page_count = Some(page_count);
        self
    }

    pub fn with_row_id<F>(mut self, f: F) -> Self
    where
        F: Fn(&R, usize) -> String + Send + Sync + 'static,
    {
        self.get_row_id = Some(Arc::new(f));
        self
    }
}

/// A headless table.
pub struct Table<R> {
    pub(crate) options: TableOptions<R>,
    pub(crate) columns: ColumnArena<R>,
    internal: Mutex<TableState>,
}

impl<R> fmt::Debug for Table<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("rows", &self.options.data.len())
            .field("columns", &self.columns.nodes.len())
            .finish_non_exhaustive()
    }
}

impl<R: RowData> Table<R> {
    /// Creates a table. The column definitions are moved into the table's
    /// column tree.
    pub fn new(mut options: TableOptions<R>) -> Self {
        let columns = ColumnArena::build(std::mem::take(&mut options.columns));
        tracing::debug!(
            target: targets::ENGINE,
            rows = options.data.len(),
            leaf_columns = columns.leaves.len(),
            controlled = options.state.is_some(),
            "table created"
        );
        let internal = Mutex::new(options.initial_state.clone());
        Self {
            options,
            columns,
            internal,
        }
    }

    pub fn options(&self) -> &TableOptions<R> {
        &self.options
    }

    /// The row data.
    pub fn data(&self) -> &Arc<Vec<R>> {
        &self.options.data
    }

    /// The current state.
    pub fn get_state(&self) -> TableState {
        match &self.options.state {
            Some(provider) => provider(),
            None => self.internal.lock().clone(),
        }
    }

    fn dispatch<T>(
        &self,
        handler: Option<&OnChange<T>>,
        updater: Updater<T>,
        slot: fn(&mut TableState) -> &mut T,
    ) {
        match handler {
            Some(handler) => handler(updater),
            None => {
                let mut state = self.internal.lock();
                let field = slot(&mut *state);
                let next = updater.apply(field);
                *field = next;
            }
        }
    }

    // ---- Sorting ----

    pub fn set_sorting(&self, updater: impl Into<Updater<SortingState>>) {
        self.dispatch(
            self.options.on_sorting_change.as_ref(),
            updater.into(),
            |state| &mut state.sorting,
        );
    }

    pub fn reset_sorting(&self) {
        self.set_sorting(SortingState::new());
    }

    // ---- Filtering ----

    pub fn set_global_filter(&self, updater: impl Into<Updater<String>>) {
        self.dispatch(
            self.options.on_global_filter_change.as_ref(),
            updater.into(),
            |state| &mut state.global_filter,
        );
    }

    pub fn reset_global_filter(&self) {
        self.set_global_filter(String::new());
    }

    pub fn set_column_filters(&self, updater: impl Into<Updater<ColumnFiltersState>>) {
        self.dispatch(
            self.options.on_column_filters_change.as_ref(),
            updater.into(),
            |state| &mut state.column_filters,
        );
    }

    pub fn reset_column_filters(&self) {
        self.set_column_filters(ColumnFiltersState::new());
    }

    /// Sets or clears the filter of one column.
    pub fn set_column_filter(&self, column_id: &str, condition: Option<FilterCondition>) {
        let id = column_id.to_string();
        self.set_column_filters(Updater::with(move |old: &ColumnFiltersState| {
            let mut next: ColumnFiltersState =
                old.iter().filter(|filter| filter.id != id).cloned().collect();
            if let Some(value) = condition {
                next.push(ColumnFilter { id, value });
            }
            next
        }));
    }

    // ---- Pagination ----

    pub fn set_pagination(&self, updater: impl Into<Updater<PaginationState>>) {
        self.dispatch(
            self.options.on_pagination_change.as_ref(),
            updater.into(),
            |state| &mut state.pagination,
        );
    }

    /// Sets the page index. Clamped to the last page only when an explicit
    /// page count is configured.
    pub fn set_page_index(&self, updater: impl Into<Updater<usize>>) {
        let updater = updater.into();
        let max_index = self.options.page_count.map(|count| count.saturating_sub(1));
        self.set_pagination(Updater::with(move |old: &PaginationState| {
            let mut page_index = updater.apply(&old.page_index);
            if let Some(max_index) = max_index {
                page_index = page_index.min(max_index);
            }
            PaginationState { page_index, ..*old }
        }));
    }

    /// Sets the page size (at least 1), keeping the first row of the current
    /// page on screen.
    pub fn set_page_size(&self, updater: impl Into<Updater<usize>>) {
        let updater = updater.into();
        self.set_pagination(Updater::with(move |old: &PaginationState| {
            let page_size = updater.apply(&old.page_size).max(1);
            let top_row = old.page_size * old.page_index;
            PaginationState {
                page_index: top_row / page_size,
                page_size,
            }
        }));
    }

    pub fn reset_pagination(&self) {
        self.set_pagination(self.options.initial_state.pagination);
    }

    /// Number of pages: the explicit page count, or the pre-pagination row
    /// count divided by the page size, rounded up.
    pub fn get_page_count(&self) -> usize {
        match self.options.page_count {
            Some(count) => count,
            None => {
                let page_size = self.get_state().pagination.page_size.max(1);
                self.get_pre_pagination_row_model().len().div_ceil(page_size)
            }
        }
    }

    pub fn get_can_previous_page(&self) -> bool {
        self.get_state().pagination.page_index > 0
    }

    pub fn get_can_next_page(&self) -> bool {
        let page_index = self.get_state().pagination.page_index;
        match self.get_page_count() {
            0 => false,
            count => page_index < count - 1,
        }
    }

    pub fn previous_page(&self) {
        self.set_page_index(Updater::with(|old: &usize| old.saturating_sub(1)));
    }

    pub fn next_page(&self) {
        self.set_page_index(Updater::with(|old: &usize| old + 1));
    }

    // ---- Columns ----

    pub fn set_column_pinning(&self, updater: impl Into<Updater<ColumnPinningState>>) {
        self.dispatch(
            self.options.on_column_pinning_change.as_ref(),
            updater.into(),
            |state| &mut state.column_pinning,
        );
    }

    pub fn set_column_visibility(&self, updater: impl Into<Updater<VisibilityState>>) {
        self.dispatch(
            self.options.on_column_visibility_change.as_ref(),
            updater.into(),
            |state| &mut state.column_visibility,
        );
    }

    pub(crate) fn column_at(&self, index: usize) -> Column<'_, R> {
        Column { table: self, index }
    }

    pub(crate) fn column_can_sort(&self, index: usize) -> bool {
        let node = self.columns.node(index);
        node.is_leaf()
            && node.def.accessor.is_some()
            && node.def.enable_sorting.unwrap_or(true)
            && self.options.enable_sorting
    }

    pub(crate) fn column_can_filter(&self, index: usize) -> bool {
        let node = self.columns.node(index);
        node.is_leaf()
            && node.def.accessor.is_some()
            && node.def.enable_column_filter.unwrap_or(true)
            && self.options.enable_filters
    }

    /// Top-level columns (groups and ungrouped leaves).
    pub fn get_all_columns(&self) -> Vec<Column<'_, R>> {
        self.columns
            .roots
            .iter()
            .map(|index| self.column_at(*index))
            .collect()
    }

    /// Every column in depth-first order, groups included.
    pub fn get_all_flat_columns(&self) -> Vec<Column<'_, R>> {
        (0..self.columns.nodes.len())
            .map(|index| self.column_at(index))
            .collect()
    }

    /// Every leaf column in definition order.
    pub fn get_all_leaf_columns(&self) -> Vec<Column<'_, R>> {
        self.columns
            .leaves
            .iter()
            .map(|index| self.column_at(*index))
            .collect()
    }

    /// Visible leaf columns in display order: left pinned, center, right
    /// pinned.
    pub fn get_visible_leaf_columns(&self) -> Vec<Column<'_, R>> {
        let state = self.get_state();
        [Some(PinSide::Left), None, Some(PinSide::Right)]
            .into_iter()
            .flat_map(|side| self.leaf_indices_in(side, &state))
            .map(|index| self.column_at(index))
            .collect()
    }

    pub fn get_left_leaf_columns(&self) -> Vec<Column<'_, R>> {
        self.leaf_columns_in(Some(PinSide::Left))
    }

    pub fn get_center_leaf_columns(&self) -> Vec<Column<'_, R>> {
        self.leaf_columns_in(None)
    }

    pub fn get_right_leaf_columns(&self) -> Vec<Column<'_, R>> {
        self.leaf_columns_in(Some(PinSide::Right))
    }

    /// Looks up a column (group or leaf) by id.
    pub fn get_column(&self, id: &str) -> Option<Column<'_, R>> {
        self.columns.by_id.get(id).map(|index| self.column_at(*index))
    }

    pub(crate) fn leaf_columns_in(&self, side: Option<PinSide>) -> Vec<Column<'_, R>> {
        let state = self.get_state();
        self.leaf_indices_in(side, &state)
            .into_iter()
            .map(|index| self.column_at(index))
            .collect()
    }

    /// Visible leaves of one region. Pinned regions follow pin-list order.
    fn leaf_indices_in(&self, side: Option<PinSide>, state: &TableState) -> Vec<usize> {
        let visible = |index: &usize| self.columns.is_visible(*index, state);
        match side {
            Some(side) => state
                .column_pinning
                .side(side)
                .iter()
                .filter_map(|id| self.columns.leaf_by_id(id))
                .filter(visible)
                .collect(),
            None => self
                .columns
                .leaves
                .iter()
                .copied()
                .filter(|index| {
                    let id = &self.columns.node(*index).def.id;
                    state.column_pinning.side_of(id).is_none()
                })
                .filter(visible)
                .collect(),
        }
    }

    // ---- Rows ----

    fn row_id(&self, row: &R, index: usize) -> String {
        match &self.options.get_row_id {
            Some(get_row_id) => get_row_id(row, index),
            None => index.to_string(),
        }
    }

    /// Reads a cell value. Unknown columns read as `Null`.
    pub fn get_value(&self, row: &Row<R>, column_id: &str) -> CellValue {
        match self.columns.leaf_by_id(column_id) {
            Some(index) => self
                .columns
                .node(index)
                .def
                .accessor
                .read(row.original(), row.index),
            None => CellValue::Null,
        }
    }

    /// Looks up a core row by id.
    pub fn get_row(&self, id: &str) -> Option<Row<R>> {
        self.get_core_row_model()
            .rows
            .into_iter()
            .find(|row| row.id == id)
    }

    /// All rows in data order.
    pub fn get_core_row_model(&self) -> RowModel<R> {
        let data = &self.options.data;
        let rows = data
            .iter()
            .enumerate()
            .map(|(index, row)| Row::new(self.row_id(row, index), index, Arc::clone(data)))
            .collect();
        RowModel::new(rows)
    }

    /// Rows passing the column filters and the global filter.
    pub fn get_filtered_row_model(&self) -> RowModel<R> {
        let state = self.get_state();
        RowModel::new(self.filter_rows(self.get_core_row_model().rows, &state))
    }

    /// Filtered rows in sort order.
    pub fn get_sorted_row_model(&self) -> RowModel<R> {
        let state = self.get_state();
        let filtered = self.filter_rows(self.get_core_row_model().rows, &state);
        RowModel::new(self.sort_rows(filtered, &state))
    }

    /// The model pagination is applied to.
    pub fn get_pre_pagination_row_model(&self) -> RowModel<R> {
        self.get_sorted_row_model()
    }

    /// The rows of the current page.
    pub fn get_pagination_row_model(&self) -> RowModel<R> {
        let state = self.get_state();
        let filtered = self.filter_rows(self.get_core_row_model().rows, &state);
        let sorted = self.sort_rows(filtered, &state);
        RowModel::new(self.paginate_rows(sorted, &state))
    }

    /// The final row model: paginated when pagination is enabled.
    pub fn get_row_model(&self) -> RowModel<R> {
        if self.options.enable_pagination {
            self.get_pagination_row_model()
        } else {
            self.get_pre_pagination_row_model()
        }
    }

    /// Selected rows in data order.
    pub fn get_selected_row_model(&self) -> RowModel<R> {
        let state = self.get_state();
        let rows = self
            .get_core_row_model()
            .rows
            .into_iter()
            .filter(|row| state.row_selection.contains(&row.id))
            .collect();
        RowModel::new(rows)
    }

    fn filter_rows(&self, rows: Vec<Row<R>>, state: &TableState) -> Vec<Row<R>> {
        if self.options.manual_filtering || !self.options.enable_filters {
            return rows;
        }

        let column_filters: Vec<(&Accessor<R>, &FilterCondition)> = state
            .column_filters
            .iter()
            .filter_map(|filter| {
                let index = self.columns.leaf_by_id(&filter.id)?;
                self.column_can_filter(index)
                    .then(|| (&self.columns.node(index).def.accessor, &filter.value))
            })
            .collect();

        let needle = state.global_filter.to_lowercase();
        let global_columns: Vec<&Accessor<R>> = if needle.is_empty() || !self.options.enable_global_filter {
            Vec::new()
        } else {
            [Some(PinSide::Left), None, Some(PinSide::Right)]
                .into_iter()
                .flat_map(|side| self.leaf_indices_in(side, state))
                .map(|index| &self.columns.node(index).def.accessor)
                .filter(|accessor| accessor.is_some())
                .collect()
        };

        if column_filters.is_empty() && global_columns.is_empty() {
            return rows;
        }

        let before = rows.len();
        let rows: Vec<Row<R>> = rows
            .into_iter()
            .filter(|row| {
                let original = row.original();
                let column_pass = column_filters
                    .iter()
                    .all(|(accessor, condition)| condition.matches(&accessor.read(original, row.index)));
                column_pass
                    && (global_columns.is_empty()
                        || global_columns.iter().any(|accessor| {
                            let value = accessor.read(original, row.index);
                            matches!(value, CellValue::String(_) | CellValue::Int(_) | CellValue::Float(_))
                                && value.to_string().to_lowercase().contains(&needle)
                        }))
            })
            .collect();
        tracing::trace!(target: targets::ENGINE, before, after = rows.len(), "filtered rows");
        rows
    }

    fn sort_rows(&self, rows: Vec<Row<R>>, state: &TableState) -> Vec<Row<R>> {
        if self.options.manual_sorting || state.sorting.is_empty() {
            return rows;
        }

        // Entries for unknown or unsortable columns are ignored.
        let keys: Vec<(&Accessor<R>, bool)> = state
            .sorting
            .iter()
            .filter_map(|sort| {
                let index = self.columns.leaf_by_id(&sort.id)?;
                self.column_can_sort(index)
                    .then(|| (&self.columns.node(index).def.accessor, sort.desc))
            })
            .collect();
        if keys.is_empty() {
            return rows;
        }

        let mut keyed: Vec<(Vec<CellValue>, Row<R>)> = rows
            .into_iter()
            .map(|row| {
                let values = keys
                    .iter()
                    .map(|(accessor, _)| accessor.read(row.original(), row.index))
                    .collect();
                (values, row)
            })
            .collect();

        keyed.sort_by(|(a, _), (b, _)| {
            for (position, (_, desc)) in keys.iter().enumerate() {
                let ordering = a[position].sort_cmp(&b[position]);
                let ordering = if *desc { ordering.reverse() } else { ordering };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
        tracing::trace!(target: targets::ENGINE, keys = keys.len(), rows = keyed.len(), "sorted rows");
        keyed.into_iter().map(|(_, row)| row).collect()
    }

    fn paginate_rows(&self, rows: Vec<Row<R>>, state: &TableState) -> Vec<Row<R>> {
        if self.options.manual_pagination {
            return rows;
        }
        let page_size = state.pagination.page_size.max(1);
        let start = state.pagination.page_index.saturating_mul(page_size);
        rows.into_iter().skip(start).take(page_size).collect()
    }

    // ---- Selection ----

    pub fn set_row_selection(&self, updater: impl Into<Updater<RowSelectionState>>) {
        self.dispatch(
            self.options.on_row_selection_change.as_ref(),
            updater.into(),
            |state| &mut state.row_selection,
        );
    }

    pub fn reset_row_selection(&self) {
        self.set_row_selection(RowSelectionState::new());
    }

    pub fn get_can_select(&self, row: &Row<R>) -> bool {
        self.options.enable_row_selection
            && self
                .options
                .row_selectable
                .as_ref()
                .is_none_or(|selectable| selectable(row))
    }

    pub fn get_is_selected(&self, row: &Row<R>) -> bool {
        self.get_state().row_selection.contains(&row.id)
    }

    /// Selects or deselects one row. `None` toggles.
    ///
    /// A row already in the requested state is left alone. In single-select
    /// mode, selecting a row clears every other selection first.
    pub fn toggle_row_selected(&self, row: &Row<R>, value: Option<bool>) {
        let is_selected = self.get_is_selected(row);
        let value = value.unwrap_or(!is_selected);
        let can_select = self.get_can_select(row);
        let multi = self.options.enable_multi_row_selection;
        let id = row.id.clone();

        self.set_row_selection(Updater::with(move |old: &RowSelectionState| {
            if can_select && is_selected == value {
                return old.clone();
            }
            let mut next = old.clone();
            if value {
                if !multi {
                    next.clear();
                }
                if can_select {
                    next.insert(id);
                }
            } else {
                next.remove(&id);
            }
            next
        }));
    }

    /// Selects every selectable filtered row, or deselects every filtered
    /// row.
    pub fn toggle_all_rows_selected(&self, value: bool) {
        let targets: Vec<(String, bool)> = self
            .get_filtered_row_model()
            .rows
            .iter()
            .map(|row| (row.id.clone(), self.get_can_select(row)))
            .collect();

        self.set_row_selection(Updater::with(move |old: &RowSelectionState| {
            let mut next = old.clone();
            for (id, can_select) in targets {
                if !value {
                    next.remove(&id);
                } else if can_select {
                    next.insert(id);
                }
            }
            next
        }));
    }

    /// Returns `true` if every selectable filtered row is selected.
    pub fn get_is_all_rows_selected(&self) -> bool {
        let state = self.get_state();
        let rows = self.get_filtered_row_model();
        let mut selectable = rows.iter().filter(|row| self.get_can_select(row)).peekable();
        selectable.peek().is_some() && selectable.all(|row| state.row_selection.contains(&row.id))
    }

    /// Returns `true` if any filtered row is selected.
    pub fn get_is_some_rows_selected(&self) -> bool {
        let state = self.get_state();
        self.get_filtered_row_model()
            .iter()
            .any(|row| state.row_selection.contains(&row.id))
    }
}

//! The grid state store.
//!
//! [`GridStateStore`] owns the canonical view state of one grid instance and
//! notifies subscribers after every change. The table engine reads this state
//! as its controlled state, and writes to it through its change handlers, so
//! the two never diverge.
//!
//! Every setter accepts an [`Updater`], applies it and notifies exactly once,
//! whether or not the value actually changed.

use std::fmt;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sogrid_core::logging::targets;
use sogrid_core::{Signal, Subscription, Updater};
use sogrid_table::{
    ColumnFiltersState, ColumnPinningState, PaginationState, RowSelectionState, SortingState,
    TableState, VisibilityState,
};

use crate::column::{ColumnSpec, flatten_columns, get_column_id};
use crate::config::GridConfig;
use crate::model::to_sorting_state;

/// View state of one grid instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridState {
    /// Sort keys in priority order.
    pub sorting: SortingState,
    /// Ids of selected rows.
    pub row_selection: RowSelectionState,
    pub pagination: PaginationState,
    pub column_pinning: ColumnPinningState,
    /// Column id to visible flag. Absent ids are visible.
    pub column_visibility: VisibilityState,
    /// Quick filter text.
    pub global_filter: String,
    pub column_filters: ColumnFiltersState,
}

impl GridState {
    /// Seeds the state from grid configuration and the column specs.
    ///
    /// Every leaf column flagged `hide` starts invisible; all others are
    /// implicitly visible.
    pub fn initial<R>(config: &GridConfig, column_defs: &[ColumnSpec<R>]) -> Self {
        let column_visibility = flatten_columns(column_defs)
            .into_iter()
            .filter(|spec| spec.hide == Some(true))
            .map(|spec| (get_column_id(spec), false))
            .collect();

        Self {
            sorting: to_sorting_state(&config.default_sort_model),
            row_selection: RowSelectionState::new(),
            pagination: PaginationState {
                page_index: 0,
                page_size: config.page_size(),
            },
            column_pinning: config.column_pinning.clone(),
            column_visibility,
            global_filter: config.quick_filter_text.clone(),
            column_filters: ColumnFiltersState::new(),
        }
    }
}

impl From<&GridState> for TableState {
    fn from(state: &GridState) -> Self {
        TableState {
            sorting: state.sorting.clone(),
            row_selection: state.row_selection.clone(),
            pagination: state.pagination,
            column_pinning: state.column_pinning.clone(),
            column_visibility: state.column_visibility.clone(),
            global_filter: state.global_filter.clone(),
            column_filters: state.column_filters.clone(),
        }
    }
}

/// Owner of a grid's [`GridState`] with change notification.
///
/// Listeners run synchronously, in registration order, after the new state
/// has been stored. A panicking listener is logged and skipped.
pub struct GridStateStore {
    state: RwLock<GridState>,
    changed: Signal<()>,
}

impl fmt::Debug for GridStateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridStateStore")
            .field("state", &*self.state.read())
            .field("listeners", &self.changed.connection_count())
            .finish()
    }
}

impl Default for GridStateStore {
    fn default() -> Self {
        Self::new(GridState::default())
    }
}

impl GridStateStore {
    pub fn new(initial: GridState) -> Self {
        Self {
            state: RwLock::new(initial),
            changed: Signal::new(),
        }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> GridState {
        self.state.read().clone()
    }

    /// Reads the current state without copying it.
    pub fn read<T>(&self, f: impl FnOnce(&GridState) -> T) -> T {
        f(&*self.state.read())
    }

    /// Registers a change listener.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.changed.subscribe(move |_: &()| listener())
    }

    pub fn listener_count(&self) -> usize {
        self.changed.connection_count()
    }

    /// Notifies every listener without changing state.
    pub fn notify(&self) {
        let failures = self.changed.emit(());
        if failures > 0 {
            tracing::warn!(target: targets::STORE, failures, "state listeners panicked");
        }
    }

    /// Applies a multi-field change with a single notification.
    ///
    /// `f` runs on a copy of the state with no lock held.
    pub fn update(&self, f: impl FnOnce(&mut GridState)) {
        let mut next = self.snapshot();
        f(&mut next);
        *self.state.write() = next;
        tracing::debug!(target: targets::STORE, "state updated");
        self.notify();
    }

    fn set_field<T: Clone + fmt::Debug>(
        &self,
        field: &'static str,
        updater: Updater<T>,
        slot: fn(&mut GridState) -> &mut T,
    ) {
        let old = slot(&mut *self.state.write()).clone();
        let next = updater.apply(&old);
        tracing::debug!(target: targets::STORE, field, value = ?next, "state field set");
        *slot(&mut *self.state.write()) = next;
        self.notify();
    }

    pub fn set_sorting(&self, updater: impl Into<Updater<SortingState>>) {
        self.set_field("sorting", updater.into(), |state| &mut state.sorting);
    }

    pub fn set_selection(&self, updater: impl Into<Updater<RowSelectionState>>) {
        self.set_field("row_selection", updater.into(), |state| &mut state.row_selection);
    }

    pub fn set_pagination(&self, updater: impl Into<Updater<PaginationState>>) {
        self.set_field("pagination", updater.into(), |state| &mut state.pagination);
    }

    pub fn set_pinning(&self, updater: impl Into<Updater<ColumnPinningState>>) {
        self.set_field("column_pinning", updater.into(), |state| &mut state.column_pinning);
    }

    pub fn set_visibility(&self, updater: impl Into<Updater<VisibilityState>>) {
        self.set_field("column_visibility", updater.into(), |state| &mut state.column_visibility);
    }

    pub fn set_global_filter(&self, updater: impl Into<Updater<String>>) {
        self.set_field("global_filter", updater.into(), |state| &mut state.global_filter);
    }

    pub fn set_column_filters(&self, updater: impl Into<Updater<ColumnFiltersState>>) {
        self.set_field("column_filters", updater.into(), |state| &mut state.column_filters);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::model::SortModel;
    use serde_json::Value;
    use sogrid_table::ColumnSort;

    fn counting(store: &GridStateStore) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        store.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[test]
    fn test_initial_from_config() {
        let config = GridConfig {
            pagination_page_size: 25,
            quick_filter_text: "seo".into(),
            default_sort_model: vec![SortModel::desc("age")],
            ..GridConfig::default()
        };
        let specs = vec![
            ColumnSpec::<Value>::field("name"),
            ColumnSpec::group("Meta", vec![ColumnSpec::field("secret").hide(true)]),
            ColumnSpec::field("age").hide(false),
        ];
        let state = GridState::initial(&config, &specs);

        assert_eq!(state.sorting, vec![ColumnSort::new("age", true)]);
        assert_eq!(state.pagination, PaginationState { page_index: 0, page_size: 25 });
        assert_eq!(state.global_filter, "seo");
        assert_eq!(state.column_visibility.len(), 1);
        assert_eq!(state.column_visibility.get("secret"), Some(&false));
    }

    #[test]
    fn test_zero_page_size_falls_back() {
        let config = GridConfig {
            pagination_page_size: 0,
            ..GridConfig::default()
        };
        let state = GridState::initial::<Value>(&config, &[]);
        assert_eq!(state.pagination.page_size, 10);
    }

    #[test]
    fn test_setters_notify_once_even_when_unchanged() {
        let store = GridStateStore::default();
        let count = counting(&store);

        store.set_global_filter("abc");
        store.set_global_filter("abc");
        store.set_sorting(Updater::with(|old: &SortingState| old.clone()));
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(store.snapshot().global_filter, "abc");
    }

    #[test]
    fn test_functional_updater_sees_old_value() {
        let store = GridStateStore::default();
        store.set_pagination(PaginationState { page_index: 2, page_size: 20 });
        store.set_pagination(Updater::with(|old: &PaginationState| PaginationState {
            page_index: old.page_index + 1,
            ..*old
        }));
        assert_eq!(store.read(|state| state.pagination.page_index), 3);
    }

    #[test]
    fn test_update_notifies_once() {
        let store = GridStateStore::default();
        let count = counting(&store);
        store.update(|state| {
            state.global_filter = "x".into();
            state.pagination.page_index = 0;
            state.sorting.push(ColumnSort::new("a", false));
        });
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let store = GridStateStore::default();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let subscription = store.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        store.notify();
        assert!(subscription.unsubscribe());
        store.notify();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn test_listener_panic_is_isolated() {
        let store = GridStateStore::default();
        store.subscribe(|| panic!("listener failure"));
        let count = counting(&store);
        store.set_visibility(VisibilityState::new());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_table_state_conversion() {
        let mut state = GridState::default();
        state.global_filter = "q".into();
        state.row_selection.insert("3".into());
        let table_state = TableState::from(&state);
        assert_eq!(table_state.global_filter, "q");
        assert!(table_state.row_selection.contains("3"));
    }
}

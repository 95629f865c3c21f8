//! Column definitions and column views.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use sogrid_core::Updater;

use crate::state::{
    ColumnPinningState, ColumnSort, PinSide, SortDirection, TableState, VisibilityState,
};
use crate::table::Table;
use crate::value::{CellValue, RowData};

/// Default column width in pixels.
pub const DEFAULT_COLUMN_SIZE: u32 = 150;
/// Default minimum column width in pixels.
pub const DEFAULT_MIN_COLUMN_SIZE: u32 = 20;

/// Type alias for an accessor function. Receives the row and its index in
/// the data vector.
pub type AccessorFn<R> = Arc<dyn Fn(&R, usize) -> CellValue + Send + Sync>;

/// How a column reads its value from a row.
pub enum Accessor<R> {
    /// Computed from the whole row.
    Fn(AccessorFn<R>),
    /// Read through [`RowData::field`].
    Key(String),
    /// Display-only column.
    None,
}

impl<R> Accessor<R> {
    /// Returns `true` unless this is [`Accessor::None`].
    pub fn is_some(&self) -> bool {
        !matches!(self, Accessor::None)
    }

    /// Returns the field key for [`Accessor::Key`].
    pub fn key(&self) -> Option<&str> {
        match self {
            Accessor::Key(key) => Some(key),
            _ => None,
        }
    }
}

impl<R: RowData> Accessor<R> {
    /// Reads the value for `row`.
    pub fn read(&self, row: &R, index: usize) -> CellValue {
        match self {
            Accessor::Fn(f) => f(row, index),
            Accessor::Key(key) => row.field(key),
            Accessor::None => CellValue::Null,
        }
    }
}

impl<R> Clone for Accessor<R> {
    fn clone(&self) -> Self {
        match self {
            Accessor::Fn(f) => Accessor::Fn(Arc::clone(f)),
            Accessor::Key(key) => Accessor::Key(key.clone()),
            Accessor::None => Accessor::None,
        }
    }
}

impl<R> fmt::Debug for Accessor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Fn(_) => f.write_str("Fn(..)"),
            Accessor::Key(key) => f.debug_tuple("Key").field(key).finish(),
            Accessor::None => f.write_str("None"),
        }
    }
}

/// An engine column definition. A definition with non-empty `columns` is a
/// group.
///
/// Capability flags left as `None` take the engine default (enabled).
pub struct ColumnDef<R> {
    pub id: String,
    pub header: String,
    pub accessor: Accessor<R>,
    pub columns: Vec<ColumnDef<R>>,
    pub size: Option<u32>,
    pub min_size: Option<u32>,
    pub max_size: Option<u32>,
    pub enable_sorting: Option<bool>,
    pub enable_column_filter: Option<bool>,
    pub enable_resizing: Option<bool>,
    pub enable_hiding: Option<bool>,
}

impl<R> ColumnDef<R> {
    /// Creates a display-only column with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            header: id.clone(),
            id,
            accessor: Accessor::None,
            columns: Vec::new(),
            size: None,
            min_size: None,
            max_size: None,
            enable_sorting: None,
            enable_column_filter: None,
            enable_resizing: None,
            enable_hiding: None,
        }
    }

    /// Creates a column reading `key` from each row. The id is the key.
    pub fn accessor_key(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(key.clone()).with_accessor(Accessor::Key(key))
    }

    /// Creates a column computed by `f`.
    pub fn accessor_fn<F>(id: impl Into<String>, f: F) -> Self
    where
        F: Fn(&R, usize) -> CellValue + Send + Sync + 'static,
    {
        Self::new(id).with_accessor(Accessor::Fn(Arc::new(f)))
    }

    /// Creates a group column.
    pub fn group(id: impl Into<String>, columns: Vec<ColumnDef<R>>) -> Self {
        Self::new(id).with_columns(columns)
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn with_accessor(mut self, accessor: Accessor<R>) -> Self {
        self.accessor = accessor;
        self
    }

    pub fn with_columns(mut self, columns: Vec<ColumnDef<R>>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_enable_sorting(mut self, enable: bool) -> Self {
        self.enable_sorting = Some(enable);
        self
    }

    pub fn with_enable_column_filter(mut self, enable: bool) -> Self {
        self.enable_column_filter = Some(enable);
        self
    }

    pub fn with_enable_hiding(mut self, enable: bool) -> Self {
        self.enable_hiding = Some(enable);
        self
    }

    /// Returns `true` if this definition has child columns.
    pub fn is_group(&self) -> bool {
        !self.columns.is_empty()
    }
}

impl<R> Clone for ColumnDef<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            columns: self.columns.clone(),
            size: self.size,
            min_size: self.min_size,
            max_size: self.max_size,
            enable_sorting: self.enable_sorting,
            enable_column_filter: self.enable_column_filter,
            enable_resizing: self.enable_resizing,
            enable_hiding: self.enable_hiding,
        }
    }
}

impl<R> fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("accessor", &self.accessor)
            .field("columns", &self.columns)
            .field("size", &self.size)
            .field("enable_sorting", &self.enable_sorting)
            .finish_non_exhaustive()
    }
}

/// A column definition placed in the column tree.
pub(crate) struct ColumnNode<R> {
    /// The definition, with `columns` moved into `children`.
    pub(crate) def: ColumnDef<R>,
    pub(crate) depth: usize,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
}

impl<R> ColumnNode<R> {
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena of column nodes in definition order.
pub(crate) struct ColumnArena<R> {
    pub(crate) nodes: Vec<ColumnNode<R>>,
    pub(crate) roots: Vec<usize>,
    /// Leaf node indices, left to right.
    pub(crate) leaves: Vec<usize>,
    pub(crate) by_id: HashMap<String, usize>,
}

impl<R> ColumnArena<R> {
    pub(crate) fn build(defs: Vec<ColumnDef<R>>) -> Self {
        let mut arena = Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            leaves: Vec::new(),
            by_id: HashMap::new(),
        };
        for def in defs {
            let index = arena.insert(def, 0, None);
            arena.roots.push(index);
        }
        arena
    }

    fn insert(&mut self, mut def: ColumnDef<R>, depth: usize, parent: Option<usize>) -> usize {
        let children = std::mem::take(&mut def.columns);
        let index = self.nodes.len();
        // First definition wins on duplicate ids.
        self.by_id.entry(def.id.clone()).or_insert(index);
        self.nodes.push(ColumnNode {
            def,
            depth,
            parent,
            children: Vec::new(),
        });

        if children.is_empty() {
            self.leaves.push(index);
        } else {
            let child_indices = children
                .into_iter()
                .map(|child| self.insert(child, depth + 1, Some(index)))
                .collect();
            self.nodes[index].children = child_indices;
        }
        index
    }

    pub(crate) fn node(&self, index: usize) -> &ColumnNode<R> {
        &self.nodes[index]
    }

    pub(crate) fn leaf_by_id(&self, id: &str) -> Option<usize> {
        self.by_id
            .get(id)
            .copied()
            .filter(|index| self.nodes[*index].is_leaf())
    }

    /// Collects the leaf indices under `index`, left to right.
    pub(crate) fn leaves_of(&self, index: usize, out: &mut Vec<usize>) {
        let node = &self.nodes[index];
        if node.is_leaf() {
            out.push(index);
        } else {
            for child in &node.children {
                self.leaves_of(*child, out);
            }
        }
    }

    pub(crate) fn is_visible(&self, index: usize, state: &TableState) -> bool {
        let node = &self.nodes[index];
        if node.is_leaf() {
            state.column_visibility.get(&node.def.id) != Some(&false)
        } else {
            node.children.iter().any(|child| self.is_visible(*child, state))
        }
    }

    pub(crate) fn size(&self, index: usize, state: &TableState) -> u32 {
        let node = &self.nodes[index];
        if node.is_leaf() {
            let min = node.def.min_size.unwrap_or(DEFAULT_MIN_COLUMN_SIZE);
            let max = node.def.max_size.unwrap_or(u32::MAX).max(min);
            node.def.size.unwrap_or(DEFAULT_COLUMN_SIZE).clamp(min, max)
        } else {
            node.children
                .iter()
                .filter(|child| self.is_visible(**child, state))
                .map(|child| self.size(*child, state))
                .sum()
        }
    }

    /// The side a column is pinned to. A group is pinned when all its leaves
    /// are pinned to the same side.
    pub(crate) fn pinned(&self, index: usize, state: &TableState) -> Option<PinSide> {
        let mut leaves = Vec::new();
        self.leaves_of(index, &mut leaves);
        let pinning = &state.column_pinning;
        [PinSide::Left, PinSide::Right].into_iter().find(|side| {
            let ids = pinning.side(*side);
            leaves
                .iter()
                .all(|leaf| ids.contains(&self.nodes[*leaf].def.id))
        })
    }
}

/// A view of one column in a table.
pub struct Column<'t, R> {
    pub(crate) table: &'t Table<R>,
    pub(crate) index: usize,
}

impl<R> Clone for Column<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Column<'_, R> {}

impl<R: RowData> fmt::Debug for Column<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column").field("id", &self.id()).finish()
    }
}

impl<'t, R: RowData> Column<'t, R> {
    fn node(&self) -> &'t ColumnNode<R> {
        self.table.columns.node(self.index)
    }

    /// Column id.
    pub fn id(&self) -> &'t str {
        &self.node().def.id
    }

    /// Header label.
    pub fn header(&self) -> &'t str {
        &self.node().def.header
    }

    /// Nesting depth; top-level columns are 0.
    pub fn depth(&self) -> usize {
        self.node().depth
    }

    /// The column definition (without children).
    pub fn column_def(&self) -> &'t ColumnDef<R> {
        &self.node().def
    }

    pub fn accessor(&self) -> &'t Accessor<R> {
        &self.node().def.accessor
    }

    /// Returns `true` if this column has no children.
    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    /// The parent group, if any.
    pub fn parent(&self) -> Option<Column<'t, R>> {
        self.node().parent.map(|index| self.table.column_at(index))
    }

    /// Direct child columns.
    pub fn columns(&self) -> Vec<Column<'t, R>> {
        self.node()
            .children
            .iter()
            .map(|index| self.table.column_at(*index))
            .collect()
    }

    /// Leaf columns under this column (itself for a leaf).
    pub fn get_leaf_columns(&self) -> Vec<Column<'t, R>> {
        let mut leaves = Vec::new();
        self.table.columns.leaves_of(self.index, &mut leaves);
        leaves
            .into_iter()
            .map(|index| self.table.column_at(index))
            .collect()
    }

    /// Width in pixels. Groups sum their visible children.
    pub fn get_size(&self) -> u32 {
        self.table.columns.size(self.index, &self.table.get_state())
    }

    pub fn get_is_visible(&self) -> bool {
        self.table.columns.is_visible(self.index, &self.table.get_state())
    }

    pub fn get_can_hide(&self) -> bool {
        self.node().def.enable_hiding != Some(false) && self.table.options.enable_hiding
    }

    pub fn get_can_sort(&self) -> bool {
        self.table.column_can_sort(self.index)
    }

    pub fn get_can_filter(&self) -> bool {
        self.table.column_can_filter(self.index)
    }

    pub fn get_can_resize(&self) -> bool {
        self.node().def.enable_resizing != Some(false)
    }

    pub fn get_can_pin(&self) -> bool {
        self.table.options.enable_column_pinning
    }

    /// The side this column is pinned to.
    pub fn get_is_pinned(&self) -> Option<PinSide> {
        self.table.columns.pinned(self.index, &self.table.get_state())
    }

    /// Position within its side's pin list.
    pub fn get_pinned_index(&self) -> Option<usize> {
        let state = self.table.get_state();
        let side = self.table.columns.pinned(self.index, &state)?;
        state
            .column_pinning
            .side(side)
            .iter()
            .position(|id| id == self.id())
    }

    /// Offset in pixels from the start of the given region (`None` means
    /// the unpinned center) to this column's left edge.
    pub fn get_start(&self, side: Option<PinSide>) -> u32 {
        let region = self.table.leaf_columns_in(side);
        region
            .iter()
            .take_while(|column| column.index != self.index)
            .map(Column::get_size)
            .sum()
    }

    /// Offset in pixels from this column's right edge to the end of the
    /// given region.
    pub fn get_after(&self, side: Option<PinSide>) -> u32 {
        let region = self.table.leaf_columns_in(side);
        region
            .iter()
            .rev()
            .take_while(|column| column.index != self.index)
            .map(Column::get_size)
            .sum()
    }

    /// Current sort direction.
    pub fn get_is_sorted(&self) -> Option<SortDirection> {
        self.table
            .get_state()
            .sorting
            .iter()
            .find(|sort| sort.id == self.id())
            .map(|sort| SortDirection::from_desc(sort.desc))
    }

    /// Priority of this column in the sort state.
    pub fn get_sort_index(&self) -> Option<usize> {
        self.table
            .get_state()
            .sorting
            .iter()
            .position(|sort| sort.id == self.id())
    }

    /// Shows or hides this column. `None` toggles.
    pub fn toggle_visibility(&self, visible: Option<bool>) {
        if !self.get_can_hide() {
            tracing::debug!(target: sogrid_core::logging::targets::ENGINE, column = self.id(), "column cannot be hidden");
            return;
        }
        let id = self.id().to_string();
        let visible = visible.unwrap_or_else(|| !self.get_is_visible());
        self.table.set_column_visibility(Updater::with(move |old: &VisibilityState| {
            let mut next = old.clone();
            next.insert(id, visible);
            next
        }));
    }

    /// Pins this column (and all its leaves) to `side`, or unpins it.
    pub fn pin(&self, side: Option<PinSide>) {
        let ids: Vec<String> = self
            .get_leaf_columns()
            .iter()
            .map(|column| column.id().to_string())
            .collect();
        self.table.set_column_pinning(Updater::with(move |old: &ColumnPinningState| {
            let mut next = old.clone();
            next.left.retain(|id| !ids.contains(id));
            next.right.retain(|id| !ids.contains(id));
            match side {
                Some(PinSide::Left) => next.left.extend(ids),
                Some(PinSide::Right) => next.right.extend(ids),
                None => {}
            }
            next
        }));
    }

    /// Advances this column's sort: unsorted, ascending, descending, unsorted.
    ///
    /// With `multi` (and multi-sort enabled) other sort keys are kept.
    pub fn toggle_sorting(&self, multi: bool) {
        if !self.get_can_sort() {
            tracing::debug!(target: sogrid_core::logging::targets::ENGINE, column = self.id(), "column cannot be sorted");
            return;
        }
        let id = self.id().to_string();
        let multi = multi && self.table.options.enable_multi_sort;
        self.table.set_sorting(Updater::with(move |old: &Vec<ColumnSort>| {
            let existing = old.iter().position(|sort| sort.id == id);
            let mut next = if multi { old.clone() } else { Vec::new() };
            match existing.map(|i| old[i].desc) {
                None => next.push(ColumnSort::new(id, false)),
                Some(false) => {
                    if multi {
                        if let Some(entry) = next.iter_mut().find(|sort| sort.id == id) {
                            entry.desc = true;
                        }
                    } else {
                        next.push(ColumnSort::new(id, true));
                    }
                }
                Some(true) => next.retain(|sort| sort.id != id),
            }
            next
        }));
    }
}

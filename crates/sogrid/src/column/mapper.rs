//! Mapping column specifications to engine column definitions.
//!
//! The mapper is a pure function of its inputs. Hooks that the engine has no
//! use for (renderers, formatters, editors, styling) are collected into a
//! [`ColumnBehavior`] record per leaf column, keyed by column id.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use sogrid_core::logging::targets;
use sogrid_table::{Accessor, ColumnDef, PinSide, RowData};

use super::spec::{
    CellRenderer, ColumnSpec, Dynamic, HeaderRenderer, StyleMap, ValueFormatter,
    ValueGetterParams,
};

/// Rendering, editing and styling hooks of one mapped leaf column.
pub struct ColumnBehavior<R> {
    /// The merged specification the column was built from.
    pub col_def: ColumnSpec<R>,
    pub flex: Option<f64>,
    pub pinned: Option<PinSide>,
    pub cell_renderer: Option<CellRenderer<R>>,
    pub header_renderer: Option<HeaderRenderer<R>>,
    pub value_formatter: Option<ValueFormatter<R>>,
    pub cell_class: Option<Dynamic<String, R>>,
    pub header_class: Option<String>,
    pub cell_style: Option<Dynamic<StyleMap, R>>,
    pub header_style: Option<StyleMap>,
    pub editable: bool,
    pub cell_editor: Option<Dynamic<String, R>>,
    pub cell_editor_params: Option<Value>,
    pub checkbox_selection: bool,
}

impl<R> ColumnBehavior<R> {
    fn from_spec(merged: &ColumnSpec<R>) -> Self {
        Self {
            col_def: merged.clone(),
            flex: merged.flex,
            pinned: merged.pinned,
            cell_renderer: merged.cell_renderer.clone(),
            header_renderer: merged.header_renderer.clone(),
            value_formatter: merged.value_formatter.clone(),
            cell_class: merged.cell_class.clone(),
            header_class: merged.header_class.clone(),
            cell_style: merged.cell_style.clone(),
            header_style: merged.header_style.clone(),
            editable: merged.editable == Some(true),
            cell_editor: merged.cell_editor.clone(),
            cell_editor_params: merged.cell_editor_params.clone(),
            checkbox_selection: merged.checkbox_selection == Some(true),
        }
    }

    /// The field key, if the column is backed by one.
    pub fn field(&self) -> Option<&str> {
        self.col_def.field.as_deref()
    }
}

impl<R> fmt::Debug for ColumnBehavior<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnBehavior")
            .field("col_def", &self.col_def)
            .field("editable", &self.editable)
            .field("checkbox_selection", &self.checkbox_selection)
            .finish_non_exhaustive()
    }
}

/// The output of [`map_column_defs`].
pub struct MappedColumns<R> {
    /// Engine column tree, in declaration order.
    pub columns: Vec<ColumnDef<R>>,
    /// Behavior records of leaf columns by id.
    pub behaviors: BTreeMap<String, Arc<ColumnBehavior<R>>>,
}

impl<R> MappedColumns<R> {
    /// Looks up the behavior record of a leaf column.
    pub fn behavior(&self, col_id: &str) -> Option<&Arc<ColumnBehavior<R>>> {
        self.behaviors.get(col_id)
    }
}

impl<R> fmt::Debug for MappedColumns<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedColumns")
            .field("columns", &self.columns)
            .field("behaviors", &self.behaviors)
            .finish()
    }
}

/// Resolves a column's identity: `col_id`, else `field`, else `""`.
pub fn get_column_id<R>(spec: &ColumnSpec<R>) -> String {
    spec.col_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .or_else(|| spec.field.as_deref().filter(|field| !field.is_empty()))
        .unwrap_or_default()
        .to_string()
}

/// Returns the leaf specifications in left-to-right, depth-first order.
pub fn flatten_columns<R>(specs: &[ColumnSpec<R>]) -> Vec<&ColumnSpec<R>> {
    fn walk<'a, R>(specs: &'a [ColumnSpec<R>], out: &mut Vec<&'a ColumnSpec<R>>) {
        for spec in specs {
            if spec.is_group() {
                walk(&spec.children, out);
            } else {
                out.push(spec);
            }
        }
    }

    let mut out = Vec::new();
    walk(specs, &mut out);
    out
}

/// Maps column specifications to engine column definitions.
///
/// `default` is merged under every column (and every nested child) before
/// identity and accessor resolution.
pub fn map_column_defs<R: RowData>(
    specs: &[ColumnSpec<R>],
    default: Option<&ColumnSpec<R>>,
) -> MappedColumns<R> {
    let mut behaviors = BTreeMap::new();
    let columns = specs
        .iter()
        .map(|spec| map_single_column(spec, default, &mut behaviors))
        .collect::<Vec<_>>();
    tracing::debug!(
        target: targets::COLUMNS,
        top_level = columns.len(),
        leaves = behaviors.len(),
        "mapped column definitions"
    );
    MappedColumns { columns, behaviors }
}

fn map_single_column<R: RowData>(
    spec: &ColumnSpec<R>,
    default: Option<&ColumnSpec<R>>,
    behaviors: &mut BTreeMap<String, Arc<ColumnBehavior<R>>>,
) -> ColumnDef<R> {
    let merged = match default {
        Some(default) => spec.merged_over(default),
        None => spec.clone(),
    };
    let col_id = get_column_id(&merged);

    if merged.is_group() {
        // Groups without a colId or field are identified by their header.
        let col_id = match (col_id.is_empty(), &merged.header_name) {
            (true, Some(header)) => header.clone(),
            _ => col_id,
        };
        let header = merged.header_name.clone().unwrap_or_else(|| col_id.clone());
        let children = merged
            .children
            .iter()
            .map(|child| map_single_column(child, default, behaviors))
            .collect();
        return ColumnDef::new(col_id)
            .with_header(header)
            .with_columns(children);
    }

    let (accessor, header) = if let Some(getter) = merged.value_getter.clone() {
        let col_def = Arc::new(merged.clone());
        let accessor = Accessor::Fn(Arc::new(move |row: &R, _index: usize| {
            getter(&ValueGetterParams {
                data: row,
                col_def: &col_def,
            })
        }));
        (accessor, leaf_header(&merged, &col_id))
    } else if let Some(field) = merged.field.clone() {
        (Accessor::Key(field), leaf_header(&merged, &col_id))
    } else {
        let header = merged.header_name.clone().unwrap_or_else(|| col_id.clone());
        (Accessor::None, header)
    };

    behaviors
        .entry(col_id.clone())
        .or_insert_with(|| Arc::new(ColumnBehavior::from_spec(&merged)));

    ColumnDef {
        id: col_id,
        header,
        accessor,
        columns: Vec::new(),
        size: merged.width,
        min_size: merged.min_width,
        max_size: merged.max_width,
        enable_sorting: Some(merged.sortable == Some(true)),
        enable_column_filter: Some(merged.filterable != Some(false)),
        enable_resizing: Some(merged.resizable != Some(false)),
        enable_hiding: Some(merged.lock_visible != Some(true)),
    }
}

/// Header label of an accessor-backed leaf: header name, else field, else id.
fn leaf_header<R>(merged: &ColumnSpec<R>, col_id: &str) -> String {
    merged
        .header_name
        .clone()
        .or_else(|| merged.field.clone())
        .unwrap_or_else(|| col_id.to_string())
}

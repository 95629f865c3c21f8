//! Declarative column specifications.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use sogrid_table::{CellValue, PinSide};

/// Inline style properties, e.g. `{"text-align": "right"}`.
pub type StyleMap = BTreeMap<String, String>;

/// Parameters passed to cell-level hooks.
pub struct CellParams<'a, R> {
    /// The cell's accessor value.
    pub value: &'a CellValue,
    pub data: &'a R,
    /// Position of the row in the displayed row model.
    pub row_index: usize,
    /// The merged column specification.
    pub col_def: &'a ColumnSpec<R>,
}

/// Parameters passed to header renderers.
pub struct HeaderParams<'a, R> {
    pub col_def: &'a ColumnSpec<R>,
}

/// Parameters passed to value getters.
pub struct ValueGetterParams<'a, R> {
    pub data: &'a R,
    pub col_def: &'a ColumnSpec<R>,
}

/// Type alias for a cell renderer.
pub type CellRenderer<R> = Arc<dyn Fn(&CellParams<'_, R>) -> String + Send + Sync>;

/// Type alias for a header renderer.
pub type HeaderRenderer<R> = Arc<dyn Fn(&HeaderParams<'_, R>) -> String + Send + Sync>;

/// Type alias for a value formatter.
pub type ValueFormatter<R> = Arc<dyn Fn(&CellParams<'_, R>) -> String + Send + Sync>;

/// Type alias for a value getter.
pub type ValueGetter<R> = Arc<dyn Fn(&ValueGetterParams<'_, R>) -> CellValue + Send + Sync>;

/// A hook that is either a fixed value or computed per cell.
pub enum Dynamic<T, R> {
    Static(T),
    Computed(Arc<dyn Fn(&CellParams<'_, R>) -> T + Send + Sync>),
}

impl<T: Clone, R> Dynamic<T, R> {
    /// Creates a computed hook.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&CellParams<'_, R>) -> T + Send + Sync + 'static,
    {
        Dynamic::Computed(Arc::new(f))
    }

    /// Resolves the hook for one cell.
    pub fn resolve(&self, params: &CellParams<'_, R>) -> T {
        match self {
            Dynamic::Static(value) => value.clone(),
            Dynamic::Computed(f) => f(params),
        }
    }
}

impl<T: Clone, R> Clone for Dynamic<T, R> {
    fn clone(&self) -> Self {
        match self {
            Dynamic::Static(value) => Dynamic::Static(value.clone()),
            Dynamic::Computed(f) => Dynamic::Computed(Arc::clone(f)),
        }
    }
}

impl<T: fmt::Debug, R> fmt::Debug for Dynamic<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dynamic::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Dynamic::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<R> From<&str> for Dynamic<String, R> {
    fn from(value: &str) -> Self {
        Dynamic::Static(value.to_string())
    }
}

impl<R> From<String> for Dynamic<String, R> {
    fn from(value: String) -> Self {
        Dynamic::Static(value)
    }
}

impl<R> From<StyleMap> for Dynamic<StyleMap, R> {
    fn from(value: StyleMap) -> Self {
        Dynamic::Static(value)
    }
}

/// A host-declared column or column group.
///
/// Every option is optional; unset options fall back to the grid's default
/// column specification and then to the documented defaults. A spec with
/// non-empty `children` is a group and carries no accessor or cell hooks.
pub struct ColumnSpec<R> {
    /// Key into the row data.
    pub field: Option<String>,
    pub header_name: Option<String>,
    /// Explicit identity. Derived from `field` when absent.
    pub col_id: Option<String>,

    pub width: Option<u32>,
    pub min_width: Option<u32>,
    pub max_width: Option<u32>,
    pub flex: Option<f64>,

    /// Default: `false`.
    pub sortable: Option<bool>,
    /// Default: `true`.
    pub filterable: Option<bool>,
    /// Default: `true`.
    pub resizable: Option<bool>,
    pub pinned: Option<PinSide>,
    /// Default: `false`.
    pub hide: Option<bool>,
    /// Default: `false`. A locked column cannot be hidden.
    pub lock_visible: Option<bool>,

    pub cell_renderer: Option<CellRenderer<R>>,
    pub header_renderer: Option<HeaderRenderer<R>>,
    pub value_formatter: Option<ValueFormatter<R>>,
    pub value_getter: Option<ValueGetter<R>>,

    pub editable: Option<bool>,
    /// Editor name (`"text"`, `"select"`, ...) or a per-cell choice.
    pub cell_editor: Option<Dynamic<String, R>>,
    pub cell_editor_params: Option<Value>,

    pub checkbox_selection: Option<bool>,

    pub cell_class: Option<Dynamic<String, R>>,
    pub cell_style: Option<Dynamic<StyleMap, R>>,
    pub header_class: Option<String>,
    pub header_style: Option<StyleMap>,

    pub children: Vec<ColumnSpec<R>>,
}

impl<R> Default for ColumnSpec<R> {
    fn default() -> Self {
        Self {
            field: None,
            header_name: None,
            col_id: None,
            width: None,
            min_width: None,
            max_width: None,
            flex: None,
            sortable: None,
            filterable: None,
            resizable: None,
            pinned: None,
            hide: None,
            lock_visible: None,
            cell_renderer: None,
            header_renderer: None,
            value_formatter: None,
            value_getter: None,
            editable: None,
            cell_editor: None,
            cell_editor_params: None,
            checkbox_selection: None,
            cell_class: None,
            cell_style: None,
            header_class: None,
            header_style: None,
            children: Vec::new(),
        }
    }
}

impl<R> Clone for ColumnSpec<R> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            header_name: self.header_name.clone(),
            col_id: self.col_id.clone(),
            width: self.width,
            min_width: self.min_width,
            max_width: self.max_width,
            flex: self.flex,
            sortable: self.sortable,
            filterable: self.filterable,
            resizable: self.resizable,
            pinned: self.pinned,
            hide: self.hide,
            lock_visible: self.lock_visible,
            cell_renderer: self.cell_renderer.clone(),
            header_renderer: self.header_renderer.clone(),
            value_formatter: self.value_formatter.clone(),
            value_getter: self.value_getter.clone(),
            editable: self.editable,
            cell_editor: self.cell_editor.clone(),
            cell_editor_params: self.cell_editor_params.clone(),
            checkbox_selection: self.checkbox_selection,
            cell_class: self.cell_class.clone(),
            cell_style: self.cell_style.clone(),
            header_class: self.header_class.clone(),
            header_style: self.header_style.clone(),
            children: self.children.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnSpec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hook = |present: bool| if present { "Some(..)" } else { "None" };
        f.debug_struct("ColumnSpec")
            .field("field", &self.field)
            .field("header_name", &self.header_name)
            .field("col_id", &self.col_id)
            .field("width", &self.width)
            .field("min_width", &self.min_width)
            .field("max_width", &self.max_width)
            .field("flex", &self.flex)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("resizable", &self.resizable)
            .field("pinned", &self.pinned)
            .field("hide", &self.hide)
            .field("lock_visible", &self.lock_visible)
            .field("cell_renderer", &hook(self.cell_renderer.is_some()))
            .field("header_renderer", &hook(self.header_renderer.is_some()))
            .field("value_formatter", &hook(self.value_formatter.is_some()))
            .field("value_getter", &hook(self.value_getter.is_some()))
            .field("editable", &self.editable)
            .field("cell_editor", &self.cell_editor)
            .field("cell_editor_params", &self.cell_editor_params)
            .field("checkbox_selection", &self.checkbox_selection)
            .field("cell_class", &self.cell_class)
            .field("cell_style", &self.cell_style)
            .field("header_class", &self.header_class)
            .field("header_style", &self.header_style)
            .field("children", &self.children)
            .finish()
    }
}

impl<R> ColumnSpec<R> {
    /// Creates an empty specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a leaf column bound to `field`.
    pub fn field(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::default()
        }
    }

    /// Creates a column group.
    pub fn group(header_name: impl Into<String>, children: Vec<ColumnSpec<R>>) -> Self {
        Self {
            header_name: Some(header_name.into()),
            children,
            ..Self::default()
        }
    }

    /// Returns `true` if this spec has children.
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// Overlays this spec on `default`: every option set here wins, unset
    /// options take the default's value. The default's `children` are never
    /// inherited.
    pub fn merged_over(&self, default: &ColumnSpec<R>) -> ColumnSpec<R> {
        fn pick<T: Clone>(own: &Option<T>, default: &Option<T>) -> Option<T> {
            own.as_ref().or(default.as_ref()).cloned()
        }

        ColumnSpec {
            field: pick(&self.field, &default.field),
            header_name: pick(&self.header_name, &default.header_name),
            col_id: pick(&self.col_id, &default.col_id),
            width: pick(&self.width, &default.width),
            min_width: pick(&self.min_width, &default.min_width),
            max_width: pick(&self.max_width, &default.max_width),
            flex: pick(&self.flex, &default.flex),
            sortable: pick(&self.sortable, &default.sortable),
            filterable: pick(&self.filterable, &default.filterable),
            resizable: pick(&self.resizable, &default.resizable),
            pinned: pick(&self.pinned, &default.pinned),
            hide: pick(&self.hide, &default.hide),
            lock_visible: pick(&self.lock_visible, &default.lock_visible),
            cell_renderer: pick(&self.cell_renderer, &default.cell_renderer),
            header_renderer: pick(&self.header_renderer, &default.header_renderer),
            value_formatter: pick(&self.value_formatter, &default.value_formatter),
            value_getter: pick(&self.value_getter, &default.value_getter),
            editable: pick(&self.editable, &default.editable),
            cell_editor: pick(&self.cell_editor, &default.cell_editor),
            cell_editor_params: pick(&self.cell_editor_params, &default.cell_editor_params),
            checkbox_selection: pick(&self.checkbox_selection, &default.checkbox_selection),
            cell_class: pick(&self.cell_class, &default.cell_class),
            cell_style: pick(&self.cell_style, &default.cell_style),
            header_class: pick(&self.header_class, &default.header_class),
            header_style: pick(&self.header_style, &default.header_style),
            children: self.children.clone(),
        }
    }

    pub fn with_header_name(mut self, header_name: impl Into<String>) -> Self {
        self.header_name = Some(header_name.into());
        self
    }

    pub fn with_col_id(mut self, col_id: impl Into<String>) -> Self {
        self.col_id = Some(col_id.into());
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_min_width(mut self, min_width: u32) -> Self {
        self.min_width = Some(min_width);
        self
    }

    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = Some(max_width);
        self
    }

    pub fn with_flex(mut self, flex: f64) -> Self {
        self.flex = Some(flex);
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = Some(sortable);
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = Some(filterable);
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = Some(resizable);
        self
    }

    pub fn pinned(mut self, side: PinSide) -> Self {
        self.pinned = Some(side);
        self
    }

    pub fn hide(mut self, hide: bool) -> Self {
        self.hide = Some(hide);
        self
    }

    pub fn lock_visible(mut self, lock: bool) -> Self {
        self.lock_visible = Some(lock);
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = Some(editable);
        self
    }

    pub fn checkbox_selection(mut self, enabled: bool) -> Self {
        self.checkbox_selection = Some(enabled);
        self
    }

    pub fn with_cell_renderer<F>(mut self, f: F) -> Self
    where
        F: Fn(&CellParams<'_, R>) -> String + Send + Sync + 'static,
    {
        self.cell_renderer = Some(Arc::new(f));
        self
    }

    pub fn with_header_renderer<F>(mut self, f: F) -> Self
    where
        F: Fn(&HeaderParams<'_, R>) -> String + Send + Sync + 'static,
    {
        self.header_renderer = Some(Arc::new(f));
        self
    }

    pub fn with_value_formatter<F>(mut self, f: F) -> Self
    where
        F: Fn(&CellParams<'_, R>) -> String + Send + Sync + 'static,
    {
        self.value_formatter = Some(Arc::new(f));
        self
    }

    pub fn with_value_getter<F>(mut self, f: F) -> Self
    where
        F: Fn(&ValueGetterParams<'_, R>) -> CellValue + Send + Sync + 'static,
    {
        self.value_getter = Some(Arc::new(f));
        self
    }

    pub fn with_cell_editor(mut self, editor: impl Into<Dynamic<String, R>>) -> Self {
        self.cell_editor = Some(editor.into());
        self
    }

    pub fn with_cell_editor_params(mut self, params: Value) -> Self {
        self.cell_editor_params = Some(params);
        self
    }

    pub fn with_cell_class(mut self, class: impl Into<Dynamic<String, R>>) -> Self {
        self.cell_class = Some(class.into());
        self
    }

    pub fn with_cell_style(mut self, style: impl Into<Dynamic<StyleMap, R>>) -> Self {
        self.cell_style = Some(style.into());
        self
    }

    pub fn with_header_class(mut self, class: impl Into<String>) -> Self {
        self.header_class = Some(class.into());
        self
    }

    pub fn with_header_style(mut self, style: StyleMap) -> Self {
        self.header_style = Some(style);
        self
    }
}

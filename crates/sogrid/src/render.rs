//! Render-time resolution of column hooks.
//!
//! This module is the single place where `Static | Computed` hooks are
//! resolved and where the grid's CSS class vocabulary is produced. The
//! rendering layer asks [`GridApi::render_cell`](crate::GridApi::render_cell)
//! and [`GridApi::render_header`](crate::GridApi::render_header) for finished
//! values; the functions here are public for hosts that render from their own
//! row iteration.

use std::fmt;

use sogrid_table::{PaginationState, PinSide, SortDirection};

use crate::column::{CellParams, ColumnBehavior, HeaderParams, StyleMap};
use crate::config::Theme;

/// Editor used when an editable column names none.
pub const DEFAULT_CELL_EDITOR: &str = "text";

/// Display text of a cell: cell renderer, else value formatter, else the raw
/// value.
pub fn cell_display<R>(behavior: &ColumnBehavior<R>, params: &CellParams<'_, R>) -> String {
    if let Some(renderer) = &behavior.cell_renderer {
        renderer(params)
    } else if let Some(formatter) = &behavior.value_formatter {
        formatter(params)
    } else {
        params.value.to_string()
    }
}

/// CSS classes of a body cell.
pub fn cell_class<R>(
    behavior: &ColumnBehavior<R>,
    pinned: Option<PinSide>,
    params: &CellParams<'_, R>,
) -> String {
    let mut class = String::from("so-grid__cell");
    if let Some(side) = pinned {
        class.push_str(" so-grid__cell--pinned-");
        class.push_str(side.as_str());
    }
    if let Some(user) = &behavior.cell_class {
        let user = user.resolve(params);
        if !user.is_empty() {
            class.push(' ');
            class.push_str(&user);
        }
    }
    class
}

pub fn cell_style<R>(behavior: &ColumnBehavior<R>, params: &CellParams<'_, R>) -> StyleMap {
    behavior
        .cell_style
        .as_ref()
        .map(|style| style.resolve(params))
        .unwrap_or_default()
}

/// Editor name of a cell, or `None` when the column is not editable.
pub fn cell_editor<R>(behavior: &ColumnBehavior<R>, params: &CellParams<'_, R>) -> Option<String> {
    if !behavior.editable {
        return None;
    }
    Some(
        behavior
            .cell_editor
            .as_ref()
            .map(|editor| editor.resolve(params))
            .unwrap_or_else(|| DEFAULT_CELL_EDITOR.to_string()),
    )
}

/// CSS class of an editor input.
pub fn editor_class(editor: &str) -> String {
    format!("so-grid__cell-editor so-grid__cell-editor--{editor}")
}

/// Header label: header renderer output, else the mapped header text.
pub fn header_label<R>(behavior: Option<&ColumnBehavior<R>>, header: &str) -> String {
    match behavior.and_then(|b| b.header_renderer.as_ref().map(|r| (b, r))) {
        Some((behavior, renderer)) => renderer(&HeaderParams {
            col_def: &behavior.col_def,
        }),
        None => header.to_string(),
    }
}

/// CSS classes of a header cell.
pub fn header_class<R>(behavior: Option<&ColumnBehavior<R>>, pinned: Option<PinSide>) -> String {
    let mut class = String::from("so-grid__header-cell");
    if let Some(side) = pinned {
        class.push_str(" so-grid__header-cell--pinned-");
        class.push_str(side.as_str());
    }
    if let Some(user) = behavior
        .and_then(|b| b.header_class.as_deref())
        .filter(|user| !user.is_empty())
    {
        class.push(' ');
        class.push_str(user);
    }
    class
}

pub fn header_style<R>(behavior: Option<&ColumnBehavior<R>>) -> StyleMap {
    behavior
        .and_then(|b| b.header_style.clone())
        .unwrap_or_default()
}

/// Sort indicator of a header: arrows for sorted columns, a neutral mark for
/// sortable ones.
pub fn sort_indicator(sorted: Option<SortDirection>, can_sort: bool) -> Option<&'static str> {
    match sorted {
        Some(SortDirection::Asc) => Some("▲"),
        Some(SortDirection::Desc) => Some("▼"),
        None if can_sort => Some("⇅"),
        None => None,
    }
}

/// CSS classes of a body row. Even/odd follows the display index.
pub fn row_class(row_index: usize, selected: bool) -> String {
    let mut class = String::from("so-grid__row");
    if selected {
        class.push_str(" so-grid__row--selected");
    }
    class.push_str(if row_index % 2 == 0 {
        " so-grid__row--even"
    } else {
        " so-grid__row--odd"
    });
    class
}

/// CSS classes of the grid root.
pub fn theme_class(theme: Theme) -> String {
    format!("so-grid {}", theme.class_name())
}

/// A fully resolved body cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCell {
    pub text: String,
    pub class: String,
    pub style: StyleMap,
    /// Editor name when the cell is editable.
    pub editor: Option<String>,
    pub width: u32,
    pub pinned: Option<PinSide>,
    /// Sticky offset from the pinned side.
    pub offset: Option<u32>,
}

/// A fully resolved header cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedHeader {
    pub label: String,
    pub class: String,
    pub style: StyleMap,
    pub sort_indicator: Option<&'static str>,
    pub width: u32,
    pub pinned: Option<PinSide>,
    pub offset: Option<u32>,
}

/// The "rows x - y of n" summary shown in the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationInfo {
    /// First displayed row, one-based. Zero when the page holds no rows.
    pub start_row: usize,
    /// Last displayed row, one-based, inclusive. Zero when the page holds no
    /// rows.
    pub end_row: usize,
    pub total_rows: usize,
}

impl PaginationInfo {
    pub fn new(pagination: PaginationState, total_rows: usize) -> Self {
        let PaginationState {
            page_index,
            page_size,
        } = pagination;
        let first = page_index.saturating_mul(page_size);
        if first >= total_rows {
            return Self {
                start_row: 0,
                end_row: 0,
                total_rows,
            };
        }
        let start_row = first + 1;
        let end_row = first.saturating_add(page_size).min(total_rows);
        Self {
            start_row,
            end_row,
            total_rows,
        }
    }
}

impl fmt::Display for PaginationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total_rows == 0 {
            f.write_str("0 rows")
        } else {
            write!(f, "{} - {} of {}", self.start_row, self.end_row, self.total_rows)
        }
    }
}

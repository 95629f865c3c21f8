//! Column specifications and the column mapper.
//!
//! Hosts describe columns with [`ColumnSpec`], an AG-Grid style declarative
//! record. [`map_column_defs`] turns a spec tree into engine
//! [`ColumnDef`](sogrid_table::ColumnDef)s plus a [`ColumnBehavior`] record
//! per leaf that carries the hooks the engine does not use.

mod mapper;
mod spec;

pub use mapper::{ColumnBehavior, MappedColumns, flatten_columns, get_column_id, map_column_defs};
pub use spec::{
    CellParams, CellRenderer, ColumnSpec, Dynamic, HeaderParams, HeaderRenderer, StyleMap,
    ValueFormatter, ValueGetter, ValueGetterParams,
};

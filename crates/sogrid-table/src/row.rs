//! Rows and row models.

use std::fmt;
use std::sync::Arc;

/// A row of the table: its id, its index in the data vector, and a shared
/// handle to the data.
pub struct Row<R> {
    pub id: String,
    /// Index of the row in the table's data vector.
    pub index: usize,
    data: Arc<Vec<R>>,
}

impl<R> Row<R> {
    /// `index` must be in bounds of `data`.
    pub(crate) fn new(id: String, index: usize, data: Arc<Vec<R>>) -> Self {
        Self { id, index, data }
    }

    /// The host row this row wraps.
    pub fn original(&self) -> &R {
        &self.data[self.index]
    }
}

impl<R> Clone for Row<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            index: self.index,
            data: Arc::clone(&self.data),
        }
    }
}

impl<R> fmt::Debug for Row<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("id", &self.id)
            .field("index", &self.index)
            .finish()
    }
}

/// An ordered list of rows produced by one row-model stage.
pub struct RowModel<R> {
    pub rows: Vec<Row<R>>,
}

impl<R> RowModel<R> {
    pub(crate) fn new(rows: Vec<Row<R>>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the row at `position`.
    pub fn get(&self, position: usize) -> Option<&Row<R>> {
        self.rows.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row<R>> {
        self.rows.iter()
    }

    /// Row ids in model order.
    pub fn ids(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.id.as_str()).collect()
    }

    /// The host rows in model order.
    pub fn originals(&self) -> Vec<&R> {
        self.rows.iter().map(Row::original).collect()
    }
}

impl<R> Clone for RowModel<R> {
    fn clone(&self) -> Self {
        Self::new(self.rows.clone())
    }
}

impl<R> fmt::Debug for RowModel<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows.iter()).finish()
    }
}

impl<'a, R> IntoIterator for &'a RowModel<R> {
    type Item = &'a Row<R>;
    type IntoIter = std::slice::Iter<'a, Row<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

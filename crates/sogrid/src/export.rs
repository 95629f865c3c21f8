//! CSV export.
//!
//! Export reads raw field values straight from the row data. Value getters,
//! formatters and cell renderers are not consulted, so a column without a
//! `field` exports as empty cells.
//!
//! Every field is quoted, embedded quotes are doubled and records are
//! separated by `\n` with no trailing terminator:
//!
//! ```text
//! "ID","Name"
//! "1","A"
//! "2","B,C"
//! ```
//!
//! The finished text is handed to an [`ExportSink`], which plays the part of
//! a browser download.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use sogrid_core::logging::targets;
use sogrid_table::RowData;

use crate::column::{ColumnSpec, flatten_columns, get_column_id};
use crate::error::{GridError, Result};

/// File name used when the caller supplies none.
pub const DEFAULT_FILE_NAME: &str = "export.csv";

/// MIME type of exported files.
pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8";

/// Options of one export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportParams {
    pub file_name: Option<String>,
    /// Column ids to export, in column order. When absent every column not
    /// flagged `hide` is exported.
    pub column_keys: Option<Vec<String>>,
    /// Export only the selected rows.
    pub only_selected: bool,
}

impl ExportParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_column_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn only_selected(mut self, only_selected: bool) -> Self {
        self.only_selected = only_selected;
        self
    }

    /// The requested file name, or [`DEFAULT_FILE_NAME`].
    pub fn file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(DEFAULT_FILE_NAME)
    }
}

/// Selects the leaf columns to export.
pub fn export_columns<'a, R>(
    column_defs: &'a [ColumnSpec<R>],
    column_keys: Option<&[String]>,
) -> Vec<&'a ColumnSpec<R>> {
    flatten_columns(column_defs)
        .into_iter()
        .filter(|spec| match column_keys {
            Some(keys) => {
                let id = get_column_id(spec);
                keys.iter().any(|key| *key == id)
            }
            None => spec.hide != Some(true),
        })
        .collect()
}

/// Header text of an exported column: header name, else field.
fn export_header<R>(spec: &ColumnSpec<R>) -> &str {
    spec.header_name
        .as_deref()
        .or(spec.field.as_deref())
        .unwrap_or_default()
}

/// Writes rows as CSV text.
pub fn rows_to_csv<'r, R, I>(rows: I, columns: &[&ColumnSpec<R>]) -> Result<String>
where
    R: RowData + 'r,
    I: IntoIterator<Item = &'r R>,
{
    if columns.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .double_quote(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|spec| export_header(spec)))?;

    let mut count = 0usize;
    for row in rows {
        writer.write_record(columns.iter().map(|spec| match spec.field.as_deref() {
            Some(field) => row.field(field).to_string(),
            None => String::new(),
        }))?;
        count += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| GridError::export(e.error().to_string()))?;
    let mut text = String::from_utf8(bytes).map_err(|e| GridError::export(e.to_string()))?;
    if text.ends_with('\n') {
        text.pop();
    }
    tracing::debug!(target: targets::EXPORT, rows = count, columns = columns.len(), "rows written as CSV");
    Ok(text)
}

/// Destination of exported files.
pub trait ExportSink {
    fn deliver(&self, file_name: &str, mime_type: &str, contents: &[u8]) -> Result<()>;
}

/// Writes exports into a directory.
///
/// Each file is written to a temporary file in the same directory and then
/// moved into place, so readers never observe a partial file.
#[derive(Debug, Clone)]
pub struct FileExportSink {
    dir: PathBuf,
}

impl FileExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for FileExportSink {
    fn deliver(&self, file_name: &str, _mime_type: &str, contents: &[u8]) -> Result<()> {
        // Only bare file names; no directory components.
        if Path::new(file_name).file_name().and_then(|name| name.to_str()) != Some(file_name) {
            return Err(GridError::export(format!("invalid export file name '{file_name}'")));
        }
        let path = self.dir.join(file_name);

        let mut temp = tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| GridError::io(&self.dir, e))?;
        temp.write_all(contents).map_err(|e| GridError::io(temp.path(), e))?;
        temp.as_file().sync_all().map_err(|e| GridError::io(temp.path(), e))?;
        temp.persist(&path).map_err(|e| GridError::io(&path, e.error))?;

        tracing::info!(target: targets::EXPORT, path = %path.display(), bytes = contents.len(), "export written");
        Ok(())
    }
}

/// A file captured by [`MemoryExportSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: String,
    pub contents: Vec<u8>,
}

impl ExportedFile {
    /// The contents as text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.contents).into_owned()
    }
}

/// Keeps exports in memory.
#[derive(Default)]
pub struct MemoryExportSink {
    files: Mutex<Vec<ExportedFile>>,
}

impl fmt::Debug for MemoryExportSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryExportSink")
            .field("files", &self.files.lock().len())
            .finish()
    }
}

impl MemoryExportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every file delivered so far, oldest first.
    pub fn files(&self) -> Vec<ExportedFile> {
        self.files.lock().clone()
    }

    /// The most recent file.
    pub fn last(&self) -> Option<ExportedFile> {
        self.files.lock().last().cloned()
    }
}

impl ExportSink for MemoryExportSink {
    fn deliver(&self, file_name: &str, mime_type: &str, contents: &[u8]) -> Result<()> {
        self.files.lock().push(ExportedFile {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            contents: contents.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn specs() -> Vec<ColumnSpec<Value>> {
        vec![
            ColumnSpec::field("id").with_header_name("ID"),
            ColumnSpec::field("name").with_header_name("Name"),
            ColumnSpec::field("secret").hide(true),
        ]
    }

    #[test]
    fn test_quotes_everything() {
        let rows = vec![json!({"id": 1, "name": "A"}), json!({"id": 2, "name": "B,C"})];
        let specs = specs();
        let columns = export_columns(&specs, None);
        let csv = rows_to_csv(&rows, &columns).unwrap();
        assert_eq!(csv, "\"ID\",\"Name\"\n\"1\",\"A\"\n\"2\",\"B,C\"");
    }

    #[test]
    fn test_embedded_quotes_doubled_and_missing_fields_empty() {
        let rows = vec![json!({"name": "say \"hi\""})];
        let specs = vec![
            ColumnSpec::<Value>::field("name"),
            ColumnSpec::field("missing"),
            ColumnSpec::new().with_col_id("actions").with_header_name("Actions"),
        ];
        let columns = export_columns(&specs, None);
        let csv = rows_to_csv(&rows, &columns).unwrap();
        assert_eq!(csv, "\"name\",\"missing\",\"Actions\"\n\"say \"\"hi\"\"\",\"\",\"\"");
    }

    #[test]
    fn test_column_keys_override_hide() {
        let specs = specs();
        let keys = vec!["secret".to_string(), "id".to_string()];
        let columns = export_columns(&specs, Some(&keys));
        let ids: Vec<_> = columns.iter().map(|spec| get_column_id(*spec)).collect();
        assert_eq!(ids, ["id", "secret"]);
    }

    #[test]
    fn test_grouped_columns_export_leaves() {
        let specs = vec![ColumnSpec::<Value>::group(
            "Person",
            vec![ColumnSpec::field("first"), ColumnSpec::field("last")],
        )];
        let rows = vec![json!({"first": "Ada", "last": "Lovelace"})];
        let csv = rows_to_csv(&rows, &export_columns(&specs, None)).unwrap();
        assert_eq!(csv, "\"first\",\"last\"\n\"Ada\",\"Lovelace\"");
    }

    #[test]
    fn test_file_sink_writes_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileExportSink::new(dir.path());
        sink.deliver("out.csv", CSV_MIME_TYPE, b"\"a\"").unwrap();
        assert_eq!(std::fs::read_to_string(dir.path().join("out.csv")).unwrap(), "\"a\"");

        let err = sink.deliver("../escape.csv", CSV_MIME_TYPE, b"x").unwrap_err();
        assert!(matches!(err, GridError::Export(_)));
    }

    #[test]
    fn test_memory_sink() {
        let sink = MemoryExportSink::new();
        sink.deliver(DEFAULT_FILE_NAME, CSV_MIME_TYPE, b"abc").unwrap();
        let file = sink.last().unwrap();
        assert_eq!(file.file_name, "export.csv");
        assert_eq!(file.mime_type, "text/csv;charset=utf-8");
        assert_eq!(file.text(), "abc");
        assert_eq!(sink.files().len(), 1);
    }
}

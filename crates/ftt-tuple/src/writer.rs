use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use ftt_core::errors::{ErrorInfo, FttError};
use ftt_core::{stable_hash_string, EventRecord, TableWriter};
use tracing::info;

use crate::render::{render_csv, render_json, TableDocument};
use crate::schema::{TableFormat, TableSchema};

/// Outcome of a finalized table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    /// Output file.
    pub path: PathBuf,
    /// Number of rows written.
    pub rows: u64,
    /// SHA-256 of the canonical row encoding.
    pub digest: String,
    /// Size of the written file.
    pub bytes: u64,
}

/// Table writer that buffers rows and writes the output file once.
///
/// The file is created when the writer is opened so that an unwritable
/// output path fails before any input is read.
#[derive(Debug)]
pub struct TupleWriter {
    path: PathBuf,
    format: TableFormat,
    schema: TableSchema,
    file: File,
    rows: Vec<EventRecord>,
}

impl TupleWriter {
    /// Creates the output file and an empty table.
    pub fn create(
        path: impl AsRef<Path>,
        format: TableFormat,
        schema: TableSchema,
    ) -> Result<Self, FttError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| output_error("output-mkdir", path, err))?;
            }
        }
        let file = File::create(path).map_err(|err| output_error("output-create", path, err))?;
        info!(
            path = %path.display(),
            tree = %schema.tree_name,
            ?format,
            "opened output table"
        );
        Ok(Self {
            path: path.to_path_buf(),
            format,
            schema,
            file,
            rows: Vec::new(),
        })
    }

    /// Output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Output rendering.
    pub fn format(&self) -> TableFormat {
        self.format
    }

    /// Table layout.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Number of rows appended so far.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether no row has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TableWriter for TupleWriter {
    type Summary = TableSummary;

    fn append(&mut self, record: EventRecord) -> Result<(), FttError> {
        let expected = self.schema.has_descendants();
        if record.descendants.is_some() != expected {
            return Err(FttError::Table(
                ErrorInfo::new("column-mismatch", "row does not match the table columns")
                    .with_context("event", record.event_number.to_string())
                    .with_context("n1_children", expected.to_string()),
            ));
        }
        self.rows.push(record);
        Ok(())
    }

    fn finalize(mut self) -> Result<TableSummary, FttError> {
        let digest = stable_hash_string(&self.rows)?;
        let rows = self.rows.len() as u64;
        let bytes = match self.format {
            TableFormat::Json => render_json(&TableDocument {
                schema: self.schema,
                entries: rows,
                digest: digest.clone(),
                rows: self.rows,
            })?,
            TableFormat::Csv => render_csv(&self.schema, &self.rows)?,
        };
        self.file
            .write_all(&bytes)
            .and_then(|()| self.file.flush())
            .map_err(|err| output_error("output-write", &self.path, err))?;
        info!(path = %self.path.display(), rows, %digest, "finalized output table");
        Ok(TableSummary {
            path: self.path,
            rows,
            digest,
            bytes: bytes.len() as u64,
        })
    }
}

/// Reads a JSON table back and checks its row digest.
pub fn load_json_table(path: impl AsRef<Path>) -> Result<TableDocument, FttError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| output_error("table-read", path, err))?;
    let document: TableDocument = serde_json::from_slice(&bytes).map_err(|err| {
        FttError::Serde(
            ErrorInfo::new("table-json", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    let digest = stable_hash_string(&document.rows)?;
    if digest != document.digest || document.entries != document.rows.len() as u64 {
        return Err(FttError::Table(
            ErrorInfo::new("digest-mismatch", "table contents do not match its header")
                .with_context("path", path.display().to_string())
                .with_hint("the file was modified after it was written"),
        ));
    }
    Ok(document)
}

fn output_error(code: &str, path: &Path, err: impl ToString) -> FttError {
    FttError::Io(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

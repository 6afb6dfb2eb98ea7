use std::path::Path;

use ftt_core::provenance::SchemaVersion;
use serde::{Deserialize, Serialize};

/// Version of the output table layout.
pub const TUPLE_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Default tree name of the legacy tuples.
pub const DEFAULT_TREE_NAME: &str = "FTAG1TruthTuple";

/// Default tree title of the legacy tuples.
pub const DEFAULT_TREE_TITLE: &str = "FTAG Truth Information";

/// Rendering of the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// One JSON document holding header and rows.
    Json,
    /// Header line plus one line per row.
    Csv,
}

impl TableFormat {
    /// `.csv` selects CSV, anything else JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => TableFormat::Csv,
            _ => TableFormat::Json,
        }
    }
}

/// Storage type of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Unsigned 64-bit scalar.
    U64,
    /// Sequence of single-precision floats.
    F32Vec,
    /// Per-primary lists of descendant summaries.
    DescendantLists,
}

/// Name and type of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column (branch) name.
    pub name: String,
    /// Storage type.
    pub kind: ColumnKind,
}

impl ColumnSpec {
    fn new(name: &str, kind: ColumnKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }
}

/// Name, title and columns of the output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Tree name.
    pub tree_name: String,
    /// Tree title.
    pub tree_title: String,
    /// Layout version.
    pub version: SchemaVersion,
    /// Columns in output order.
    pub columns: Vec<ColumnSpec>,
}

impl TableSchema {
    /// The legacy four-column layout, optionally extended by `n1_children`.
    pub fn truth_tuple(
        tree_name: impl Into<String>,
        tree_title: impl Into<String>,
        with_descendants: bool,
    ) -> Self {
        let mut columns = vec![
            ColumnSpec::new("EventNumber", ColumnKind::U64),
            ColumnSpec::new("DV_R", ColumnKind::F32Vec),
            ColumnSpec::new("n1_lifetime", ColumnKind::F32Vec),
            ColumnSpec::new("n1pt", ColumnKind::F32Vec),
        ];
        if with_descendants {
            columns.push(ColumnSpec::new("n1_children", ColumnKind::DescendantLists));
        }
        Self {
            tree_name: tree_name.into(),
            tree_title: tree_title.into(),
            version: TUPLE_SCHEMA,
            columns,
        }
    }

    /// Whether rows carry the descendant column.
    pub fn has_descendants(&self) -> bool {
        self.columns
            .iter()
            .any(|column| column.kind == ColumnKind::DescendantLists)
    }

    /// Column names in output order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }
}

impl Default for TableSchema {
    fn default() -> Self {
        Self::truth_tuple(DEFAULT_TREE_NAME, DEFAULT_TREE_TITLE, false)
    }
}

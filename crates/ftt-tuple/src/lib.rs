#![deny(missing_docs)]

//! Output table for the truth tuple: the fixed legacy columns `EventNumber`,
//! `DV_R`, `n1_lifetime` and `n1pt`, an optional `n1_children` column, and
//! JSON or CSV rendering written in a single flush.

mod render;
mod schema;
mod writer;

pub use render::TableDocument;
pub use schema::{
    ColumnKind, ColumnSpec, TableFormat, TableSchema, DEFAULT_TREE_NAME, DEFAULT_TREE_TITLE,
    TUPLE_SCHEMA,
};
pub use writer::{load_json_table, TableSummary, TupleWriter};

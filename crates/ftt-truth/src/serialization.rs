use std::fs;
use std::path::Path;

use ftt_core::errors::{ErrorInfo, FttError};
use ftt_core::provenance::SchemaVersion;
use serde::{Deserialize, Serialize};

use crate::store::TruthStore;

/// Schema version written into every truth container file.
pub const CONTAINER_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// On-disk encoding of a truth container file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// Pretty JSON, one value per entry.
    Json,
    /// `bincode` payload, one byte blob per entry.
    Binary,
}

impl ContainerFormat {
    /// Picks the encoding from the file extension: `.json` is JSON, anything else binary.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ContainerFormat::Json,
            _ => ContainerFormat::Binary,
        }
    }
}

/// Container file layout. Entries are encoded one by one so that a single
/// corrupt entry does not prevent reading the others.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ContainerPayload<E> {
    pub(crate) schema_version: SchemaVersion,
    pub(crate) entries: Vec<E>,
}

/// Serializes an entry store to a JSON string.
pub fn store_to_json(store: &TruthStore) -> Result<String, FttError> {
    serde_json::to_string_pretty(store)
        .map_err(|err| FttError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores an entry store from a JSON string.
pub fn store_from_json(json: &str) -> Result<TruthStore, FttError> {
    serde_json::from_str(json)
        .map_err(|err| FttError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))
}

/// Serializes an entry store to a compact binary representation using `bincode`.
pub fn store_to_bytes(store: &TruthStore) -> Result<Vec<u8>, FttError> {
    bincode::serialize(store)
        .map_err(|err| FttError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores an entry store from its binary representation.
pub fn store_from_bytes(bytes: &[u8]) -> Result<TruthStore, FttError> {
    bincode::deserialize(bytes)
        .map_err(|err| FttError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))
}

/// Writes `entries` as a truth container file in the requested format.
pub fn write_truth_file(
    path: &Path,
    format: ContainerFormat,
    entries: &[TruthStore],
) -> Result<(), FttError> {
    let bytes = match format {
        ContainerFormat::Json => {
            let entries = entries
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| write_error("serialize-json", path, err))?;
            let payload = ContainerPayload {
                schema_version: CONTAINER_SCHEMA,
                entries,
            };
            serde_json::to_vec_pretty(&payload).map_err(|err| write_error("serialize-json", path, err))?
        }
        ContainerFormat::Binary => {
            let entries = entries
                .iter()
                .map(store_to_bytes)
                .collect::<Result<Vec<_>, _>>()?;
            let payload = ContainerPayload {
                schema_version: CONTAINER_SCHEMA,
                entries,
            };
            bincode::serialize(&payload).map_err(|err| write_error("serialize-bytes", path, err))?
        }
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| write_error("container-mkdir", parent, err))?;
        }
    }
    fs::write(path, bytes).map_err(|err| write_error("container-write", path, err))
}

fn write_error(code: &str, path: &Path, err: impl ToString) -> FttError {
    FttError::Serde(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

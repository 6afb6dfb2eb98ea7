use std::fs;
use std::path::{Path, PathBuf};

use ftt_core::errors::{ErrorInfo, FttError};
use ftt_core::EventSource;
use tracing::debug;

use crate::serialization::{store_from_bytes, ContainerFormat, ContainerPayload, CONTAINER_SCHEMA};
use crate::store::TruthStore;

#[derive(Debug)]
enum EncodedEntry {
    Json(serde_json::Value),
    Binary(Vec<u8>),
}

/// Event source reading one truth container file.
///
/// The whole file is read at open time but entries are decoded lazily, one
/// per [`advance_to`](EventSource::advance_to) call.
#[derive(Debug)]
pub struct TruthFile {
    path: PathBuf,
    format: ContainerFormat,
    entries: Vec<EncodedEntry>,
    current: Option<TruthStore>,
}

impl TruthFile {
    /// Opens a container file and binds an event source to it.
    ///
    /// Unreadable files and payloads that cannot be bound (bad header or
    /// unsupported schema) are reported as [`FttError::Io`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FttError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|err| {
            FttError::Io(
                ErrorInfo::new("open-failed", format!("could not open file: {err}"))
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let format = ContainerFormat::from_path(path);
        let (schema_version, entries) = match format {
            ContainerFormat::Json => {
                let payload: ContainerPayload<serde_json::Value> = serde_json::from_slice(&bytes)
                    .map_err(|err| bind_error(path, err))?;
                let entries = payload.entries.into_iter().map(EncodedEntry::Json).collect();
                (payload.schema_version, entries)
            }
            ContainerFormat::Binary => {
                let payload: ContainerPayload<Vec<u8>> =
                    bincode::deserialize(&bytes).map_err(|err| bind_error(path, err))?;
                let entries = payload.entries.into_iter().map(EncodedEntry::Binary).collect();
                (payload.schema_version, entries)
            }
        };
        if !CONTAINER_SCHEMA.reads(&schema_version) {
            return Err(FttError::Io(
                ErrorInfo::new("schema-unsupported", "could not connect to file")
                    .with_context("path", path.display().to_string())
                    .with_context("schema", schema_version.to_string()),
            ));
        }
        debug!(path = %path.display(), ?format, "bound event source");
        Ok(Self {
            path: path.to_path_buf(),
            format,
            entries,
            current: None,
        })
    }

    /// Path the source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encoding of the underlying file.
    pub fn format(&self) -> ContainerFormat {
        self.format
    }

    fn entry_error(&self, index: u64, code: &str, message: String) -> FttError {
        FttError::Entry(
            ErrorInfo::new(code, message)
                .with_context("path", self.path.display().to_string())
                .with_context("index", index.to_string()),
        )
    }
}

impl EventSource for TruthFile {
    type Store = TruthStore;

    fn entry_count(&self) -> u64 {
        self.entries.len() as u64
    }

    fn advance_to(&mut self, index: u64) -> Result<&TruthStore, FttError> {
        self.current = None;
        let encoded = usize::try_from(index)
            .ok()
            .and_then(|idx| self.entries.get(idx))
            .ok_or_else(|| {
                self.entry_error(index, "entry-out-of-range", "entry does not exist".into())
            })?;
        let decoded = match encoded {
            EncodedEntry::Json(value) => {
                serde_json::from_value::<TruthStore>(value.clone()).map_err(|err| err.to_string())
            }
            EncodedEntry::Binary(bytes) => {
                store_from_bytes(bytes).map_err(|err| err.info().message.clone())
            }
        };
        let store = decoded.map_err(|message| self.entry_error(index, "entry-decode", message))?;
        Ok(self.current.insert(store))
    }

    fn close(self) {
        debug!(path = %self.path.display(), "closed event source");
    }
}

fn bind_error(path: &Path, err: impl ToString) -> FttError {
    FttError::Io(
        ErrorInfo::new("bind-failed", "could not connect to file")
            .with_context("path", path.display().to_string())
            .with_context("reason", err.to_string()),
    )
}

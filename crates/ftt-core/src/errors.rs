//! Structured error types shared across FTT crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`FttError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, entry indices, collection names).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the truth tuple extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum FttError {
    /// An input file could not be opened or bound to an event source.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// A required named collection is absent from an event.
    #[error("missing data: {0}")]
    DataMissing(ErrorInfo),
    /// Advancing to a single event entry failed.
    #[error("entry error: {0}")]
    Entry(ErrorInfo),
    /// Structural errors in a truth record (unknown particle or vertex links).
    #[error("record error: {0}")]
    Record(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Invalid run or selection configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Output table lifecycle errors.
    #[error("table error: {0}")]
    Table(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl FttError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            FttError::Io(info)
            | FttError::DataMissing(info)
            | FttError::Entry(info)
            | FttError::Record(info)
            | FttError::Serde(info)
            | FttError::Config(info)
            | FttError::Table(info) => info,
        }
    }

    /// Adds a context entry to the payload, keeping the family.
    pub fn with_context(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            FttError::Io(info) => FttError::Io(info.with_context(key, value)),
            FttError::DataMissing(info) => FttError::DataMissing(info.with_context(key, value)),
            FttError::Entry(info) => FttError::Entry(info.with_context(key, value)),
            FttError::Record(info) => FttError::Record(info.with_context(key, value)),
            FttError::Serde(info) => FttError::Serde(info.with_context(key, value)),
            FttError::Config(info) => FttError::Config(info.with_context(key, value)),
            FttError::Table(info) => FttError::Table(info.with_context(key, value)),
        }
    }

    /// Returns whether the error aborts the whole run.
    ///
    /// Only a failure to advance to a single entry is recoverable: the driver
    /// logs it and moves on to the next index.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, FttError::Entry(_))
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use ftt_core::errors::{ErrorInfo, FttError};
use ftt_core::stable_hash_string;
use ftt_decay::{EventSelector, RecordBuilder, SelectionConfig};
use ftt_truth::{EVENT_INFO_KEY, TRUTH_PARTICLES_KEY};
use ftt_tuple::{TableFormat, TableSchema, DEFAULT_TREE_NAME, DEFAULT_TREE_TITLE};
use serde::{Deserialize, Serialize};

/// YAML-configurable settings of one extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Output table path.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Output rendering; inferred from the output extension when absent.
    #[serde(default)]
    pub format: Option<TableFormat>,
    /// Name of the output tree.
    #[serde(default = "default_tree_name")]
    pub tree_name: String,
    /// Title of the output tree.
    #[serde(default = "default_tree_title")]
    pub tree_title: String,
    /// Key of the event metadata collection in each entry.
    #[serde(default = "default_event_info_key")]
    pub event_info_key: String,
    /// Key of the truth particle collection in each entry.
    #[serde(default = "default_truth_particles_key")]
    pub truth_particles_key: String,
    /// Adds the per-primary descendant lists as an extra column.
    #[serde(default)]
    pub emit_descendants: bool,
    /// Primary selection and unit conversion.
    #[serde(default)]
    pub selection: SelectionConfig,
}

fn default_output() -> PathBuf {
    PathBuf::from("output.json")
}

fn default_tree_name() -> String {
    DEFAULT_TREE_NAME.to_string()
}

fn default_tree_title() -> String {
    DEFAULT_TREE_TITLE.to_string()
}

fn default_event_info_key() -> String {
    EVENT_INFO_KEY.to_string()
}

fn default_truth_particles_key() -> String {
    TRUTH_PARTICLES_KEY.to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: None,
            tree_name: default_tree_name(),
            tree_title: default_tree_title(),
            event_info_key: default_event_info_key(),
            truth_particles_key: default_truth_particles_key(),
            emit_descendants: false,
            selection: SelectionConfig::default(),
        }
    }
}

impl RunConfig {
    /// Loads a configuration file; omitted fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, FttError> {
        let contents = fs::read_to_string(path).map_err(|err| config_error("config-read", path, err))?;
        Self::from_yaml(&contents).map_err(|err| err.with_context("path", path.display().to_string()))
    }

    /// Parses a YAML document.
    pub fn from_yaml(contents: &str) -> Result<Self, FttError> {
        let config: RunConfig = serde_yaml::from_str(contents)
            .map_err(|err| FttError::Config(ErrorInfo::new("config-parse", err.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks scale factors and collection keys.
    pub fn validate(&self) -> Result<(), FttError> {
        self.selection.validate()?;
        for (field, key) in [
            ("event_info_key", &self.event_info_key),
            ("truth_particles_key", &self.truth_particles_key),
        ] {
            if key.trim().is_empty() {
                return Err(FttError::Config(
                    ErrorInfo::new("empty-key", "collection key must not be empty")
                        .with_context("field", field),
                ));
            }
        }
        Ok(())
    }

    /// Output rendering, explicit or inferred from the output path.
    pub fn format(&self) -> TableFormat {
        self.format
            .unwrap_or_else(|| TableFormat::from_path(&self.output))
    }

    /// Layout of the output table.
    pub fn table_schema(&self) -> TableSchema {
        TableSchema::truth_tuple(&self.tree_name, &self.tree_title, self.emit_descendants)
    }

    /// Primary selector for this run.
    pub fn selector(&self) -> EventSelector {
        EventSelector::new(self.selection.clone())
    }

    /// Row builder for this run.
    pub fn record_builder(&self) -> RecordBuilder {
        RecordBuilder::new(self.selection.momentum_scale).with_descendants(self.emit_descendants)
    }

    /// Stable hash of the configuration, recorded in the run provenance.
    pub fn config_hash(&self) -> Result<String, FttError> {
        stable_hash_string(self)
    }
}

fn config_error(code: &str, path: &Path, err: impl ToString) -> FttError {
    FttError::Config(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

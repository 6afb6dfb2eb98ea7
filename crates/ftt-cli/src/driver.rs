use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ftt_core::errors::FttError;
use ftt_core::{EventRecord, EventSource, RunProvenance, TableWriter};
use ftt_decay::{reduce_event, EventSelector, RecordBuilder};
use ftt_truth::{EventInfo, TruthFile, TruthParticleContainer, TruthStore};
use ftt_tuple::{TableSummary, TupleWriter};
use tracing::{debug, info, trace, warn};

use crate::config::RunConfig;

/// Position of the driver in the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Nothing started yet.
    Idle,
    /// Opening the input at this position of the file list.
    Opening {
        /// Position in the file list.
        file: usize,
    },
    /// Processing one entry of the open input.
    Iterating {
        /// Position in the file list.
        file: usize,
        /// Entry index within the file.
        entry: u64,
    },
    /// Releasing the input before the next one is opened.
    Closing {
        /// Position in the file list.
        file: usize,
    },
    /// Flushing the output table.
    Finalizing,
    /// Run completed.
    Done,
}

/// An entry that could not be read and was skipped.
#[derive(Debug, Clone)]
pub struct SkippedEntry {
    /// Input file.
    pub path: PathBuf,
    /// Entry index within the file.
    pub index: u64,
    /// Reported failure.
    pub error: FttError,
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport<T> {
    /// Number of input files processed.
    pub files: usize,
    /// Total entries over all inputs, skipped ones included.
    pub entries: u64,
    /// Rows appended to the table.
    pub rows: u64,
    /// Entries that failed to load.
    pub skipped: Vec<SkippedEntry>,
    /// Inputs, configuration hash and tool version.
    pub provenance: RunProvenance,
    /// Summary returned by the table writer.
    pub table: T,
}

/// Sequences sources, reduction and the table writer over a file list.
#[derive(Debug)]
pub struct Driver {
    selector: EventSelector,
    builder: RecordBuilder,
    event_info_key: String,
    truth_particles_key: String,
    config_hash: String,
    state: DriverState,
}

impl Driver {
    /// Builds a driver from a validated configuration.
    pub fn new(config: &RunConfig) -> Result<Self, FttError> {
        config.validate()?;
        Ok(Self {
            selector: config.selector(),
            builder: config.record_builder(),
            event_info_key: config.event_info_key.clone(),
            truth_particles_key: config.truth_particles_key.clone(),
            config_hash: config.config_hash()?,
            state: DriverState::Idle,
        })
    }

    /// Current state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    fn transition(&mut self, next: DriverState) {
        trace!(from = ?self.state, to = ?next, "driver state");
        self.state = next;
    }

    /// Reduces one loaded entry to its output row.
    ///
    /// Both required collections must be present; a missing one is fatal.
    pub fn reduce(&self, store: &TruthStore) -> Result<EventRecord, FttError> {
        let info = store.retrieve::<EventInfo>(&self.event_info_key)?;
        let particles = store.retrieve::<TruthParticleContainer>(&self.truth_particles_key)?;
        debug!(
            event = info.event_number,
            particles = particles.len(),
            "truth particles"
        );
        Ok(reduce_event(
            &self.selector,
            &self.builder,
            info.event_number,
            particles.iter(),
        ))
    }

    /// Processes `inputs` in order and finalizes `writer`.
    ///
    /// A failure to open an input, a missing collection or a writer error
    /// aborts the run. An entry that fails to load is logged, recorded in the
    /// report and skipped.
    pub fn run<S, W, F>(
        &mut self,
        inputs: &[PathBuf],
        mut open: F,
        mut writer: W,
    ) -> Result<RunReport<W::Summary>, FttError>
    where
        S: EventSource<Store = TruthStore>,
        W: TableWriter,
        F: FnMut(&Path) -> Result<S, FttError>,
    {
        self.state = DriverState::Idle;
        let mut entries = 0u64;
        let mut rows = 0u64;
        let mut skipped = Vec::new();

        for (file, path) in inputs.iter().enumerate() {
            self.transition(DriverState::Opening { file });
            let mut source = open(path.as_path())?;
            let count = source.entry_count();
            info!(path = %path.display(), entries = count, "opened input file");
            entries += count;

            for entry in 0..count {
                self.transition(DriverState::Iterating { file, entry });
                let store = match source.advance_to(entry) {
                    Ok(store) => store,
                    Err(error) if !error.is_fatal() => {
                        warn!(path = %path.display(), entry, %error, "entry less than 0, skipping");
                        skipped.push(SkippedEntry {
                            path: path.clone(),
                            index: entry,
                            error,
                        });
                        continue;
                    }
                    Err(error) => return Err(error),
                };
                let record = self.reduce(store).map_err(|err| {
                    err.with_context("path", path.display().to_string())
                        .with_context("entry", entry.to_string())
                })?;
                writer.append(record)?;
                rows += 1;
            }

            self.transition(DriverState::Closing { file });
            source.close();
            info!(path = %path.display(), "closed input file");
        }

        self.transition(DriverState::Finalizing);
        let table = writer.finalize()?;
        self.transition(DriverState::Done);
        info!(rows, skipped = skipped.len(), "wrote output table");

        let mut tool_versions = BTreeMap::new();
        tool_versions.insert(
            env!("CARGO_PKG_NAME").to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );
        Ok(RunReport {
            files: inputs.len(),
            entries,
            rows,
            skipped,
            provenance: RunProvenance {
                inputs: inputs.iter().map(|path| path.display().to_string()).collect(),
                config_hash: self.config_hash.clone(),
                tool_versions,
            },
            table,
        })
    }
}

/// Runs the extraction over container files into the configured output table.
///
/// The output file is created before the first input is opened.
pub fn run_files(config: &RunConfig, inputs: &[PathBuf]) -> Result<RunReport<TableSummary>, FttError> {
    let mut driver = Driver::new(config)?;
    info!(
        inputs = inputs.len(),
        output = %config.output.display(),
        config_hash = %driver.config_hash,
        "starting truth tuple extraction"
    );
    let writer = TupleWriter::create(&config.output, config.format(), config.table_schema())?;
    driver.run(inputs, |path: &Path| TruthFile::open(path), writer)
}

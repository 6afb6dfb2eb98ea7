use std::fs;
use std::path::{Path, PathBuf};

use ftt_cli::{run_files, Driver, DriverState, RunConfig};
use ftt_core::errors::{ErrorInfo, FttError};
use ftt_core::rng::RngHandle;
use ftt_core::{EventRecord, EventSource, TableWriter};
use ftt_truth::{
    gen_event_store, write_truth_file, ContainerFormat, DecayTreeOpts, EventInfo,
    TruthParticleContainer, TruthStore, EVENT_INFO_KEY, TRUTH_PARTICLES_KEY,
};
use ftt_tuple::load_json_table;
use serde_json::json;
use tempfile::tempdir;

fn generated(first_event: u64, count: u64) -> Vec<TruthStore> {
    let opts = DecayTreeOpts::default();
    (0..count)
        .map(|idx| {
            gen_event_store(first_event + idx, &opts, &mut RngHandle::substream(17, first_event + idx))
                .unwrap()
        })
        .collect()
}

fn config_for(output: PathBuf) -> RunConfig {
    RunConfig {
        output,
        ..RunConfig::default()
    }
}

fn event_numbers(rows: &[EventRecord]) -> Vec<u64> {
    rows.iter().map(|row| row.event_number).collect()
}

#[test]
fn one_row_per_event_across_files() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a.pool");
    let second = dir.path().join("b.json");
    write_truth_file(&first, ContainerFormat::Binary, &generated(1, 3)).unwrap();
    write_truth_file(&second, ContainerFormat::Json, &generated(10, 2)).unwrap();

    let config = config_for(dir.path().join("tuple.json"));
    let report = run_files(&config, &[first, second]).unwrap();
    assert_eq!(report.files, 2);
    assert_eq!(report.entries, 5);
    assert_eq!(report.rows, 5);
    assert!(report.skipped.is_empty());
    assert_eq!(report.provenance.inputs.len(), 2);
    assert_eq!(report.provenance.config_hash, config.config_hash().unwrap());

    let table = load_json_table(&config.output).unwrap();
    assert_eq!(event_numbers(&table.rows), vec![1, 2, 3, 10, 11]);
    for row in &table.rows {
        // Two primaries per generated event, each with both vertices.
        assert_eq!(row.pt.len(), 2);
        assert_eq!(row.decay_radius.len(), 2);
        assert!(row.lifetime.len() <= 2);
        assert!(row.descendants.is_none());
    }
}

#[test]
fn malformed_entry_is_skipped_and_others_are_unaffected() {
    let dir = tempdir().unwrap();
    let entries = generated(1, 3);
    let clean = dir.path().join("clean.json");
    write_truth_file(&clean, ContainerFormat::Json, &entries).unwrap();

    let broken = dir.path().join("broken.json");
    let values: Vec<serde_json::Value> = entries
        .iter()
        .map(|entry| serde_json::to_value(entry).unwrap())
        .collect();
    let payload = json!({
        "schema_version": {"major": 1, "minor": 0, "patch": 0},
        "entries": [values[0], {"TruthParticles": "corrupt"}, values[1], values[2]],
    });
    fs::write(&broken, serde_json::to_vec(&payload).unwrap()).unwrap();

    let clean_out = dir.path().join("clean-tuple.json");
    let broken_out = dir.path().join("broken-tuple.json");
    run_files(&config_for(clean_out.clone()), &[clean]).unwrap();
    let report = run_files(&config_for(broken_out.clone()), &[broken.clone()]).unwrap();

    assert_eq!(report.entries, 4);
    assert_eq!(report.rows, 3);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 1);
    assert_eq!(report.skipped[0].path, broken);
    assert!(matches!(report.skipped[0].error, FttError::Entry(_)));

    let clean_rows = load_json_table(&clean_out).unwrap().rows;
    let broken_rows = load_json_table(&broken_out).unwrap().rows;
    assert_eq!(clean_rows, broken_rows);
}

#[test]
fn missing_particle_collection_aborts_the_run() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("events.json");
    let entry = TruthStore::new().with(EVENT_INFO_KEY, EventInfo::numbered(5));
    write_truth_file(&input, ContainerFormat::Json, &[entry]).unwrap();

    let err = run_files(&config_for(dir.path().join("tuple.json")), &[input]).unwrap_err();
    match &err {
        FttError::DataMissing(info) => {
            assert_eq!(info.code, "missing-collection");
            assert_eq!(info.context.get("key").map(String::as_str), Some(TRUTH_PARTICLES_KEY));
            assert_eq!(info.context.get("entry").map(String::as_str), Some("0"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("cannot read required collection"));
}

#[test]
fn missing_event_info_aborts_the_run() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("events.json");
    let good = generated(1, 1).remove(0);
    let bare = TruthStore::new().with(TRUTH_PARTICLES_KEY, TruthParticleContainer::new());
    write_truth_file(&input, ContainerFormat::Json, &[good, bare]).unwrap();

    let err = run_files(&config_for(dir.path().join("tuple.json")), &[input]).unwrap_err();
    assert!(err.is_fatal());
    match &err {
        FttError::DataMissing(info) => {
            assert_eq!(info.code, "missing-collection");
            assert_eq!(info.context.get("key").map(String::as_str), Some(EVENT_INFO_KEY));
            assert_eq!(info.context.get("entry").map(String::as_str), Some("1"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unopenable_input_aborts_the_run() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.pool");
    write_truth_file(&good, ContainerFormat::Binary, &generated(1, 1)).unwrap();
    let garbage = dir.path().join("garbage.pool");
    fs::write(&garbage, b"not a container").unwrap();

    let config = config_for(dir.path().join("tuple.json"));
    for input in [dir.path().join("absent.pool"), garbage] {
        let err = run_files(&config, &[good.clone(), input]).unwrap_err();
        assert!(matches!(err, FttError::Io(_)), "{err}");
        assert!(err.is_fatal());
    }
}

#[test]
fn reruns_are_byte_identical() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("events.pool");
    write_truth_file(&input, ContainerFormat::Binary, &generated(100, 6)).unwrap();

    for name in ["tuple.json", "tuple.csv"] {
        let a = dir.path().join("a").join(name);
        let b = dir.path().join("b").join(name);
        let mut config = config_for(a.clone());
        config.emit_descendants = true;
        let first = run_files(&config, &[input.clone()]).unwrap();
        config.output = b.clone();
        let second = run_files(&config, &[input.clone()]).unwrap();
        assert_eq!(first.table.digest, second.table.digest);
        assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
    }
}

#[test]
fn descendants_column_lists_each_primary() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("events.pool");
    write_truth_file(&input, ContainerFormat::Binary, &generated(1, 4)).unwrap();
    let mut config = config_for(dir.path().join("tuple.json"));
    config.emit_descendants = true;
    run_files(&config, &[input]).unwrap();

    let table = load_json_table(&config.output).unwrap();
    assert!(table.schema.has_descendants());
    for row in &table.rows {
        let lists = row.descendants.as_ref().unwrap();
        assert_eq!(lists.len(), row.pt.len());
        for list in lists {
            assert!(!list.is_empty());
            assert!(list.iter().all(|child| child.pdg_id.unsigned_abs() != 1_000_022));
        }
    }
}

#[test]
fn collections_are_read_under_configured_keys() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("events.json");
    let opts = DecayTreeOpts::default();
    let container = ftt_truth::gen_decay_event(&opts, &mut RngHandle::from_seed(9)).unwrap();
    let entry = TruthStore::new()
        .with("EventInfoAux", EventInfo::numbered(77))
        .with("TruthBSM", container);
    write_truth_file(&input, ContainerFormat::Json, &[entry]).unwrap();

    let mut config = config_for(dir.path().join("tuple.json"));
    config.event_info_key = "EventInfoAux".into();
    config.truth_particles_key = "TruthBSM".into();
    run_files(&config, &[input]).unwrap();
    let table = load_json_table(&config.output).unwrap();
    assert_eq!(event_numbers(&table.rows), vec![77]);
    assert_eq!(table.rows[0].pt.len(), 2);
}

/// In-memory source replaying a fixed list of entry outcomes.
struct ScriptedSource {
    entries: Vec<Result<TruthStore, FttError>>,
}

impl EventSource for ScriptedSource {
    type Store = TruthStore;

    fn entry_count(&self) -> u64 {
        self.entries.len() as u64
    }

    fn advance_to(&mut self, index: u64) -> Result<&TruthStore, FttError> {
        match &self.entries[index as usize] {
            Ok(store) => Ok(store),
            Err(err) => Err(err.clone()),
        }
    }
}

#[derive(Default)]
struct MemoryTable {
    rows: Vec<EventRecord>,
}

impl TableWriter for MemoryTable {
    type Summary = Vec<EventRecord>;

    fn append(&mut self, record: EventRecord) -> Result<(), FttError> {
        self.rows.push(record);
        Ok(())
    }

    fn finalize(self) -> Result<Vec<EventRecord>, FttError> {
        Ok(self.rows)
    }
}

fn empty_event(number: u64) -> TruthStore {
    TruthStore::new()
        .with(EVENT_INFO_KEY, EventInfo::numbered(number))
        .with(TRUTH_PARTICLES_KEY, TruthParticleContainer::new())
}

#[test]
fn events_without_primaries_still_produce_rows() {
    let mut driver = Driver::new(&RunConfig::default()).unwrap();
    assert_eq!(driver.state(), DriverState::Idle);
    let inputs = vec![PathBuf::from("memory")];
    let report = driver
        .run(
            &inputs,
            |_: &Path| {
                Ok(ScriptedSource {
                    entries: vec![
                        Ok(empty_event(1)),
                        Err(FttError::Entry(ErrorInfo::new("entry-decode", "bad entry"))),
                        Ok(empty_event(3)),
                    ],
                })
            },
            MemoryTable::default(),
        )
        .unwrap();
    assert_eq!(driver.state(), DriverState::Done);
    assert_eq!(event_numbers(&report.table), vec![1, 3]);
    assert!(report.table.iter().all(|row| row.pt.is_empty()
        && row.decay_radius.is_empty()
        && row.lifetime.is_empty()));
}

#[test]
fn fatal_source_error_stops_at_the_failing_entry() {
    let mut driver = Driver::new(&RunConfig::default()).unwrap();
    let inputs = vec![PathBuf::from("memory")];
    let err = driver
        .run(
            &inputs,
            |_: &Path| {
                Ok(ScriptedSource {
                    entries: vec![
                        Ok(empty_event(1)),
                        Err(FttError::Io(ErrorInfo::new("read-failed", "device gone"))),
                        Ok(empty_event(3)),
                    ],
                })
            },
            MemoryTable::default(),
        )
        .unwrap_err();
    assert!(matches!(err, FttError::Io(_)));
    assert_eq!(driver.state(), DriverState::Iterating { file: 0, entry: 1 });
}

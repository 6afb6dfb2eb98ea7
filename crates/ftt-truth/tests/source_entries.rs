use std::fs;

use ftt_core::errors::FttError;
use ftt_core::rng::RngHandle;
use ftt_core::EventSource;
use ftt_truth::{
    gen_event_store, write_truth_file, ContainerFormat, DecayTreeOpts, EventInfo, TruthFile,
    TruthParticleContainer, EVENT_INFO_KEY, TRUTH_PARTICLES_KEY,
};
use serde_json::json;
use tempfile::tempdir;

fn generated_entries(count: u64) -> Vec<ftt_truth::TruthStore> {
    let opts = DecayTreeOpts::default();
    (0..count)
        .map(|idx| gen_event_store(100 + idx, &opts, &mut RngHandle::substream(3, idx)).unwrap())
        .collect()
}

#[test]
fn binary_container_reads_back_every_entry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.ftt");
    let entries = generated_entries(4);
    write_truth_file(&path, ContainerFormat::Binary, &entries).unwrap();

    let mut source = TruthFile::open(&path).unwrap();
    assert_eq!(source.format(), ContainerFormat::Binary);
    assert_eq!(source.entry_count(), 4);
    for (idx, expected) in entries.iter().enumerate() {
        let store = source.advance_to(idx as u64).unwrap();
        assert_eq!(store, expected);
        assert_eq!(
            store.retrieve::<EventInfo>(EVENT_INFO_KEY).unwrap().event_number,
            100 + idx as u64
        );
    }
    source.close();
}

#[test]
fn malformed_entry_is_a_soft_failure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.json");
    let good = serde_json::to_value(
        ftt_truth::TruthStore::new()
            .with(EVENT_INFO_KEY, EventInfo::numbered(1))
            .with(TRUTH_PARTICLES_KEY, TruthParticleContainer::new()),
    )
    .unwrap();
    let payload = json!({
        "schema_version": {"major": 1, "minor": 0, "patch": 0},
        "entries": [good.clone(), {"EventInfo": {"Bogus": 3}}, good],
    });
    fs::write(&path, serde_json::to_vec(&payload).unwrap()).unwrap();

    let mut source = TruthFile::open(&path).unwrap();
    assert_eq!(source.entry_count(), 3);
    assert!(source.advance_to(0).is_ok());
    let err = source.advance_to(1).unwrap_err();
    assert!(!err.is_fatal());
    assert!(matches!(&err, FttError::Entry(info) if info.code == "entry-decode"));
    assert!(source.advance_to(2).is_ok());

    let err = source.advance_to(3).unwrap_err();
    assert!(matches!(err, FttError::Entry(info) if info.code == "entry-out-of-range"));
}

#[test]
fn missing_file_cannot_be_opened() {
    let dir = tempdir().unwrap();
    let err = TruthFile::open(dir.path().join("absent.json")).unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, FttError::Io(info) if info.code == "open-failed"));
}

#[test]
fn garbage_and_future_schemas_cannot_be_bound() {
    let dir = tempdir().unwrap();
    let garbage = dir.path().join("garbage.json");
    fs::write(&garbage, b"not a container").unwrap();
    let err = TruthFile::open(&garbage).unwrap_err();
    assert!(matches!(err, FttError::Io(info) if info.code == "bind-failed"));

    let future = dir.path().join("future.json");
    let payload = json!({
        "schema_version": {"major": 2, "minor": 0, "patch": 0},
        "entries": [],
    });
    fs::write(&future, serde_json::to_vec(&payload).unwrap()).unwrap();
    match TruthFile::open(&future).unwrap_err() {
        FttError::Io(info) => {
            assert_eq!(info.code, "schema-unsupported");
            assert_eq!(info.context.get("schema").map(String::as_str), Some("2.0.0"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn json_and_binary_files_hold_the_same_events() {
    let dir = tempdir().unwrap();
    let entries = generated_entries(3);
    let json_path = dir.path().join("events.json");
    let binary_path = dir.path().join("events.pool");
    write_truth_file(&json_path, ContainerFormat::Json, &entries).unwrap();
    write_truth_file(&binary_path, ContainerFormat::Binary, &entries).unwrap();

    let mut json = TruthFile::open(&json_path).unwrap();
    let mut binary = TruthFile::open(&binary_path).unwrap();
    for (idx, expected) in entries.iter().enumerate() {
        let idx = idx as u64;
        let from_binary = binary.advance_to(idx).unwrap();
        assert_eq!(from_binary.digest().unwrap(), expected.digest().unwrap());

        let from_json = json.advance_to(idx).unwrap();
        let particles = from_json
            .retrieve::<TruthParticleContainer>(TRUTH_PARTICLES_KEY)
            .unwrap();
        let reference = expected
            .retrieve::<TruthParticleContainer>(TRUTH_PARTICLES_KEY)
            .unwrap();
        assert_eq!(particles.len(), reference.len());
        assert_eq!(particles.vertex_count(), reference.vertex_count());
    }
}

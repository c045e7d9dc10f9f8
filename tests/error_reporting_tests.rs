//! Integration tests for error reporting on bad run and catalog files
//!
//! Each scenario writes a broken input to disk and checks the error variant,
//! its severity and the message shown to the user.

use aletheia::error::{CatalogError, ErrorSeverity, RunError, ValidationError};
use aletheia::{load_run, AletheiaError, CoachingEngine, ExerciseCatalog};
use std::path::Path;
use tempfile::tempdir;

const SNAPSHOT: &str = r#"{
    "number": NUMBER,
    "distance": DISTANCE,
    "duration_seconds": 600.0,
    "metrics": { "efficiency": 80, "braking": 80, "impact": IMPACT, "sway": 80, "variation": 80, "warmup": 80, "endurance": 80 },
    "injury": { "left_leg": { "mobility": 80, "stability": 80 }, "right_leg": { "mobility": 80, "stability": 80 } },
    "gait": {
        "left": { "landing": 12.0, "stabilizing": 25.0, "launching": 23.0, "flying": 40.0 },
        "right": { "landing": 12.0, "stabilizing": 25.0, "launching": 23.0, "flying": 40.0 },
        "cadence": 170,
        "contact_time_ms": 240.0,
        "flight_time_ms": 110.0
    }
}"#;

fn snapshot(number: u32, distance: f64, impact: u32) -> String {
    SNAPSHOT
        .replace("NUMBER", &number.to_string())
        .replace("DISTANCE", &format!("{:.1}", distance))
        .replace("IMPACT", &impact.to_string())
}

fn run_json(data: &str) -> String {
    format!(
        r#"{{
    "id": "0b7e3c1a-52f4-4d8e-a1c6-9f2d7e4b6a10",
    "timestamp": "2024-05-12T07:30:00Z",
    "mode": "Recovery",
    "terrain": "Track",
    "distance": 4.0,
    "duration_seconds": 1320.0,
    "data": {}
}}"#,
        data
    )
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_corrupted_run_file() {
    let dir = tempdir().unwrap();
    let path = write(dir.path(), "corrupted.json", "{ \"id\": ");

    let err = load_run(&path).unwrap_err();
    assert!(matches!(err, AletheiaError::Run(RunError::Parse { .. })));
    assert_eq!(err.severity(), ErrorSeverity::Error);
    assert!(err.user_message().contains("corrupted.json"));
}

#[test]
fn test_missing_run_file() {
    let dir = tempdir().unwrap();
    let err = load_run(dir.path().join("absent.json")).unwrap_err();

    assert!(matches!(err, AletheiaError::Io(_)));
    assert_eq!(err.severity(), ErrorSeverity::Error);
}

#[test]
fn test_score_out_of_range_is_rejected_on_load() {
    let dir = tempdir().unwrap();
    let data = format!("{{ \"snapshots\": [{}] }}", snapshot(1, 2.0, 120));
    let path = write(dir.path(), "overflow.json", &run_json(&data));

    let err = load_run(&path).unwrap_err();
    match &err {
        AletheiaError::Validation(ValidationError::ScoreOutOfRange { field, value }) => {
            assert_eq!(field, "impact");
            assert_eq!(*value, 120);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.severity(), ErrorSeverity::Warning);
    assert!(err.user_message().starts_with("Run data looks corrupted"));
}

#[test]
fn test_snapshot_sequence_errors() {
    let dir = tempdir().unwrap();

    let gap = format!(
        "{{ \"snapshots\": [{}, {}] }}",
        snapshot(1, 2.0, 70),
        snapshot(3, 4.0, 70)
    );
    let path = write(dir.path(), "gap.json", &run_json(&gap));
    assert!(matches!(
        load_run(&path).unwrap_err(),
        AletheiaError::Run(RunError::SnapshotOutOfSequence {
            expected: 2,
            found: 3
        })
    ));

    let backwards = format!(
        "{{ \"snapshots\": [{}, {}] }}",
        snapshot(1, 3.0, 70),
        snapshot(2, 2.0, 70)
    );
    let path = write(dir.path(), "backwards.json", &run_json(&backwards));
    assert!(matches!(
        load_run(&path).unwrap_err(),
        AletheiaError::Run(RunError::NonMonotonicSnapshot { number: 2, .. })
    ));
}

#[test]
fn test_aggregate_run_reports_missing_data() {
    let dir = tempdir().unwrap();
    let aggregate = r#"{ "aggregate": { "efficiency": 80, "braking": 80, "impact": 80, "sway": 80, "variation": 80, "warmup": 80, "endurance": 80 } }"#;
    let path = write(dir.path(), "aggregate.json", &run_json(aggregate));

    let run = load_run(&path).unwrap();
    let err = CoachingEngine::new().analyze_run(&run).unwrap_err();
    assert!(matches!(err, AletheiaError::Run(RunError::MissingData { .. })));
    assert_eq!(err.severity(), ErrorSeverity::Warning);
    assert!(err.user_message().contains("per-snapshot data"));
}

#[test]
fn test_catalog_errors() {
    let dir = tempdir().unwrap();

    let path = write(dir.path(), "empty.toml", "exercises = []\n");
    assert!(matches!(
        ExerciseCatalog::load_from_file(&path).unwrap_err(),
        AletheiaError::Catalog(CatalogError::Empty)
    ));

    let path = write(
        dir.path(),
        "no_steps.toml",
        r#"
[[exercises]]
name = "Mystery Drill"
target = "sway"
duration = "5 min"
difficulty = "foundational"
benefit = "Unknown"
instructions = []
"#,
    );
    let err = ExerciseCatalog::load_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        AletheiaError::Catalog(CatalogError::MissingInstructions { ref name }) if name == "Mystery Drill"
    ));

    let path = write(dir.path(), "broken.toml", "[[exercises]\nname = ");
    assert!(matches!(
        ExerciseCatalog::load_from_file(&path).unwrap_err(),
        AletheiaError::Catalog(CatalogError::Parse { .. })
    ));
}

#[test]
fn test_empty_snapshot_list_is_rejected_on_load() {
    let dir = tempdir().unwrap();
    let path = write(dir.path(), "empty.json", &run_json(r#"{ "snapshots": [] }"#));

    let err = load_run(&path).unwrap_err();
    assert!(matches!(err, AletheiaError::Run(RunError::NoSnapshots { .. })));
    assert!(err.user_message().contains("no per-snapshot data"));
}

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use w2_results::{ResultsError, RunManifest, RunStore, SeriesRecord};
use w2_scenario::TimeDef;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn manifest(run_id: &str, timestamp: &str) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        scenario_name: "standard".to_string(),
        description: None,
        timestamp: timestamp.to_string(),
        time: TimeDef {
            year_min: 1900.0,
            year_max: 1900.4,
            dt: 0.2,
        },
        points: 3,
        engine_version: "0.1.0".to_string(),
        final_values: [("QL".to_string(), 0.5)].into_iter().collect(),
    }
}

fn records() -> Vec<SeriesRecord> {
    (0..3)
        .map(|k| {
            let mut values = BTreeMap::new();
            values.insert("P".to_string(), Some(1.65e9 + k as f64));
            values.insert("BR".to_string(), if k == 0 { None } else { Some(1.0) });
            SeriesRecord {
                time: 1900.0 + k as f64 * 0.2,
                values,
            }
        })
        .collect()
}

#[test]
fn save_list_load_roundtrip() {
    let scenario_dir = unique_temp_dir("w2_results_scenario");
    fs::create_dir_all(&scenario_dir).expect("failed to create temp scenario dir");
    let scenario_path = scenario_dir.join("scenario.yaml");
    fs::write(&scenario_path, "version: 1\nname: test\n").expect("failed to write scenario");

    let store = RunStore::for_scenario(&scenario_path).expect("failed to create run store");
    assert!(store.root_dir().ends_with(".world2/runs"));

    store
        .save_run(&manifest("run-123", "2026-02-26T00:00:00Z"), &records())
        .expect("failed to save run");
    assert!(store.has_run("run-123"));

    let runs = store.list_runs().expect("failed to list runs");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_id, "run-123");

    let loaded = store.load_manifest("run-123").expect("failed to load manifest");
    assert_eq!(loaded, manifest("run-123", "2026-02-26T00:00:00Z"));

    let loaded_records = store.load_series("run-123").expect("failed to load records");
    assert_eq!(loaded_records, records());
    assert_eq!(loaded_records[0].values["BR"], None);
}

#[test]
fn list_runs_is_ordered_and_skips_broken_entries() {
    let store = RunStore::in_dir(&unique_temp_dir("w2_results_list")).unwrap();
    store
        .save_run(&manifest("later", "2026-03-01T00:00:00Z"), &records())
        .unwrap();
    store
        .save_run(&manifest("earlier", "2026-01-01T00:00:00Z"), &records())
        .unwrap();
    let broken = store.root_dir().join("broken");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join("manifest.json"), "{ not json").unwrap();

    let ids: Vec<String> = store
        .list_runs()
        .unwrap()
        .into_iter()
        .map(|m| m.run_id)
        .collect();
    assert_eq!(ids, ["earlier", "later"]);
}

#[test]
fn missing_and_deleted_runs() {
    let store = RunStore::in_dir(&unique_temp_dir("w2_results_delete")).unwrap();
    assert!(matches!(
        store.load_manifest("nope"),
        Err(ResultsError::RunNotFound { .. })
    ));

    store
        .save_run(&manifest("gone", "2026-01-01T00:00:00Z"), &records())
        .unwrap();
    store.delete_run("gone").unwrap();
    assert!(!store.has_run("gone"));
    assert!(matches!(
        store.load_series("gone"),
        Err(ResultsError::RunNotFound { .. })
    ));
}

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use w2_app::{
    RunOptions, RunRequest, RunStage, STANDARD_RUN_REFERENCE, compare_final, ensure_run,
    ensure_run_with_progress, list_runs, load_preset, load_run, validate_scenario_file,
    write_default_documents,
};
use w2_results::RunStore;
use w2_scenario::Scenario;
use w2_sim::Quantity;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{}_{}", prefix, nanos));
    std::fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn short_scenario() -> Scenario {
    let mut scenario = Scenario::new("short");
    scenario.time.year_max = 1920.0;
    scenario
}

#[test]
fn standard_preset_reproduces_reference() {
    let scenario = load_preset("standard").unwrap();
    let response = ensure_run(&RunRequest {
        scenario: &scenario,
        base_dir: None,
        store: None,
        options: RunOptions::default(),
    })
    .unwrap();

    let output = response.output.expect("fresh run returns its output");
    let mismatches = compare_final(&output, &STANDARD_RUN_REFERENCE, 1e-10);
    assert!(mismatches.is_empty(), "{mismatches:?}");
    assert!(!response.loaded_from_cache);
}

#[test]
fn second_run_is_served_from_cache() {
    let store = RunStore::in_dir(&unique_temp_dir("w2_app_cache")).unwrap();
    let scenario = short_scenario();
    let request = RunRequest {
        scenario: &scenario,
        base_dir: None,
        store: Some(&store),
        options: RunOptions::default(),
    };

    let first = ensure_run(&request).unwrap();
    assert!(!first.loaded_from_cache);
    assert!(store.has_run(&first.run_id));

    let second = ensure_run(&request).unwrap();
    assert!(second.loaded_from_cache);
    assert!(second.output.is_none());
    assert_eq!(first.run_id, second.run_id);
    assert_eq!(first.manifest, second.manifest);

    let (manifest, records) = load_run(&store, &first.run_id).unwrap();
    assert_eq!(manifest.points, 101);
    assert_eq!(records.len(), 101);
    assert_eq!(records[0].values["BR"], None);
    assert_eq!(
        manifest.final_values["QL"],
        first
            .output
            .as_ref()
            .and_then(|o| o.final_value(Quantity::QualityOfLife))
            .unwrap()
    );
    assert_eq!(list_runs(&store).unwrap().len(), 1);
}

#[test]
fn disabling_cache_runs_again() {
    let store = RunStore::in_dir(&unique_temp_dir("w2_app_nocache")).unwrap();
    let scenario = short_scenario();
    let mut request = RunRequest {
        scenario: &scenario,
        base_dir: None,
        store: Some(&store),
        options: RunOptions::default(),
    };
    ensure_run(&request).unwrap();

    request.options.use_cache = false;
    let again = ensure_run(&request).unwrap();
    assert!(!again.loaded_from_cache);
    assert!(again.output.is_some());
}

#[test]
fn progress_stages_arrive_in_order() {
    let store = RunStore::in_dir(&unique_temp_dir("w2_app_progress")).unwrap();
    let scenario = short_scenario();
    let request = RunRequest {
        scenario: &scenario,
        base_dir: None,
        store: Some(&store),
        options: RunOptions::default(),
    };

    let mut stages = Vec::new();
    let mut record = |event: w2_app::RunProgressEvent| stages.push(event.stage);
    ensure_run_with_progress(&request, Some(&mut record)).unwrap();

    let running: Vec<&RunStage> = stages
        .iter()
        .filter(|s| matches!(s, RunStage::Running { .. }))
        .collect();
    assert_eq!(running.len(), 101);
    assert_eq!(
        running.last(),
        Some(&&RunStage::Running {
            step: 100,
            total: 101
        })
    );
    assert_eq!(stages.first(), Some(&RunStage::LoadingScenario));
    assert_eq!(stages[1], RunStage::CheckingCache);
    assert_eq!(stages[2], RunStage::Compiling);
    assert_eq!(stages[stages.len() - 2], RunStage::SavingResults);
    assert_eq!(stages.last(), Some(&RunStage::Completed));

    let mut cached = Vec::new();
    let mut record = |event: w2_app::RunProgressEvent| cached.push(event.stage);
    ensure_run_with_progress(&request, Some(&mut record)).unwrap();
    assert_eq!(
        cached,
        [
            RunStage::LoadingScenario,
            RunStage::CheckingCache,
            RunStage::LoadingCachedResult,
            RunStage::Completed,
        ]
    );
}

#[test]
fn default_documents_written_to_disk_validate() {
    let dir = unique_temp_dir("w2_app_defaults");
    let (tables, switches) = write_default_documents(&dir).unwrap();
    assert!(tables.exists() && switches.exists());

    let yaml = "version: 1\nname: from files\n\
                tables: { source: file, path: functions_table_default.json }\n\
                switches: { source: file, path: functions_switch_default.json }\n";
    let path = dir.join("scenario.yaml");
    std::fs::write(&path, yaml).unwrap();

    let summary = validate_scenario_file(&path).unwrap();
    assert_eq!(summary.name, "from files");
    assert!(summary.tables.starts_with("file"));
}

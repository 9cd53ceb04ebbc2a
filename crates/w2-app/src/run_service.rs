//! Run execution and caching service.

use std::path::Path;
use std::time::Instant;

use w2_results::{RunManifest, RunStore, SeriesRecord};
use w2_scenario::{ResolvedScenario, Scenario};
use w2_sim::{RunOutput, Simulation};

use crate::compile::compile_scenario;
use crate::error::AppResult;
use crate::progress::{RunProgressEvent, RunStage};
use crate::scenario_service;

/// Version string folded into run ids; bumping it invalidates cached runs.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options for running simulations.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub engine_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            engine_version: ENGINE_VERSION.to_string(),
        }
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub scenario: &'a Scenario,
    /// Directory relative document paths resolve against.
    pub base_dir: Option<&'a Path>,
    /// Where runs are cached and saved; `None` runs without persistence.
    pub store: Option<&'a RunStore>,
    pub options: RunOptions,
}

/// Concise timing and execution summary for a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub resolve_time_s: f64,
    pub compile_time_s: f64,
    pub run_time_s: f64,
    pub save_time_s: f64,
    pub load_cache_time_s: f64,
    pub total_time_s: f64,
    pub steps: usize,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub loaded_from_cache: bool,
    /// The full output of a fresh run; cached runs are read back with
    /// [`load_run`].
    pub output: Option<RunOutput>,
    pub timing: RunTimingSummary,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            stage,
            started.elapsed().as_secs_f64(),
            message,
        ));
    }
}

/// Execute or load a run based on request.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// Execute or load a run and stream progress events.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    emit_progress(
        &mut progress_cb,
        RunStage::LoadingScenario,
        started,
        Some("Resolving scenario".to_string()),
    );
    let resolve_started = Instant::now();
    let resolved = scenario_service::resolve_scenario(request.scenario, request.base_dir)?;
    timing.resolve_time_s = resolve_started.elapsed().as_secs_f64();

    emit_progress(
        &mut progress_cb,
        RunStage::CheckingCache,
        started,
        Some("Checking run cache".to_string()),
    );
    let run_id = w2_results::compute_run_id(&resolved, &request.options.engine_version);

    if let Some(store) = request.store
        && request.options.use_cache
        && store.has_run(&run_id)
    {
        emit_progress(
            &mut progress_cb,
            RunStage::LoadingCachedResult,
            started,
            Some("Loading cached run".to_string()),
        );

        let load_started = Instant::now();
        match store.load_manifest(&run_id) {
            Ok(manifest) => {
                timing.load_cache_time_s = load_started.elapsed().as_secs_f64();
                timing.total_time_s = started.elapsed().as_secs_f64();
                timing.steps = manifest.points;
                tracing::debug!(%run_id, "cache hit");

                emit_progress(
                    &mut progress_cb,
                    RunStage::Completed,
                    started,
                    Some("Loaded cached run".to_string()),
                );

                return Ok(RunResponse {
                    run_id,
                    manifest,
                    loaded_from_cache: true,
                    output: None,
                    timing,
                });
            }
            Err(e) => {
                tracing::warn!(%run_id, error = %e, "cached manifest unreadable, running again");
            }
        }
    }

    let output = execute_with_progress(&resolved, &mut progress_cb, started, &mut timing)?;
    let manifest = build_manifest(&run_id, &resolved, request.scenario, &output, &request.options);

    if let Some(store) = request.store {
        emit_progress(
            &mut progress_cb,
            RunStage::SavingResults,
            started,
            Some("Saving results".to_string()),
        );
        let save_started = Instant::now();
        store.save_run(&manifest, &w2_results::series_records(&output))?;
        timing.save_time_s = save_started.elapsed().as_secs_f64();
    }

    timing.total_time_s = started.elapsed().as_secs_f64();

    emit_progress(
        &mut progress_cb,
        RunStage::Completed,
        started,
        Some("Run completed".to_string()),
    );

    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: false,
        output: Some(output),
        timing,
    })
}

/// Compile and run a resolved scenario without caching or progress.
pub fn execute(resolved: &ResolvedScenario) -> AppResult<RunOutput> {
    let mut timing = RunTimingSummary::default();
    execute_with_progress(resolved, &mut None, Instant::now(), &mut timing)
}

fn execute_with_progress(
    resolved: &ResolvedScenario,
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    started: Instant,
    timing: &mut RunTimingSummary,
) -> AppResult<RunOutput> {
    emit_progress(
        progress_cb,
        RunStage::Compiling,
        started,
        Some("Configuring model".to_string()),
    );
    let compile_started = Instant::now();
    let config = compile_scenario(resolved)?;
    timing.compile_time_s = compile_started.elapsed().as_secs_f64();

    let run_started = Instant::now();
    let mut sim = Simulation::new(config);
    sim.run_with_progress(|step, total| {
        emit_progress(progress_cb, RunStage::Running { step, total }, started, None);
    })?;
    let output = sim.into_output()?;
    timing.run_time_s = run_started.elapsed().as_secs_f64();
    timing.steps = output.store.len();

    Ok(output)
}

fn build_manifest(
    run_id: &str,
    resolved: &ResolvedScenario,
    scenario: &Scenario,
    output: &RunOutput,
    options: &RunOptions,
) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        scenario_name: resolved.name.clone(),
        description: scenario.description.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        time: resolved.time,
        points: output.grid.len(),
        engine_version: options.engine_version.clone(),
        final_values: w2_results::export::manifest_final_values(output),
    }
}

/// Load a stored run's manifest and series.
pub fn load_run(store: &RunStore, run_id: &str) -> AppResult<(RunManifest, Vec<SeriesRecord>)> {
    let manifest = store.load_manifest(run_id)?;
    let records = store.load_series(run_id)?;
    Ok((manifest, records))
}

pub fn list_runs(store: &RunStore) -> AppResult<Vec<RunManifest>> {
    Ok(store.list_runs()?)
}

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use w2_app::{
    AppError, AppResult, RunOptions, RunProgressEvent, RunRequest, RunStage, query, run_service,
    scenario_service, sweep,
};
use w2_results::RunStore;
use w2_sim::Quantity;

#[derive(Parser)]
#[command(name = "w2-cli")]
#[command(about = "World2 CLI - Forrester's world dynamics model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file and every document it references
    Validate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Run a scenario
    Run {
        /// Path to the scenario file (omit to use --preset)
        scenario_path: Option<PathBuf>,
        /// Built-in scenario: standard or reduced-resource-usage
        #[arg(long, conflicts_with = "scenario_path")]
        preset: Option<String>,
        /// Override the final simulated year
        #[arg(long)]
        year_max: Option<f64>,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
        /// Directory holding the run store (defaults to the scenario's directory)
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// List stored runs
    Runs {
        /// Directory holding the run store
        #[arg(long, default_value = ".")]
        store: PathBuf,
    },
    /// Show details of a stored run
    ShowRun {
        /// Run ID to display
        run_id: String,
        /// Directory holding the run store
        #[arg(long, default_value = ".")]
        store: PathBuf,
    },
    /// Export time series of a stored run as CSV
    ExportSeries {
        /// Run ID
        run_id: String,
        /// Quantity code to export (repeatable, defaults to all)
        #[arg(short, long = "quantity")]
        quantities: Vec<String>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Directory holding the run store
        #[arg(long, default_value = ".")]
        store: PathBuf,
    },
    /// Run several scenarios in parallel and compare their final values
    Sweep {
        /// Scenario files
        scenario_paths: Vec<PathBuf>,
        /// Built-in scenarios to include (repeatable)
        #[arg(long = "preset")]
        presets: Vec<String>,
    },
    /// Write the default table and switch documents into a directory
    Defaults {
        /// Target directory
        dir: PathBuf,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Run {
            scenario_path,
            preset,
            year_max,
            no_cache,
            store,
        } => cmd_run(
            scenario_path.as_deref(),
            preset.as_deref(),
            year_max,
            !no_cache,
            store.as_deref(),
        ),
        Commands::Runs { store } => cmd_runs(&store),
        Commands::ShowRun { run_id, store } => cmd_show_run(&store, &run_id),
        Commands::ExportSeries {
            run_id,
            quantities,
            output,
            store,
        } => cmd_export_series(&store, &run_id, &quantities, output.as_deref()),
        Commands::Sweep {
            scenario_paths,
            presets,
        } => cmd_sweep(&scenario_paths, &presets),
        Commands::Defaults { dir } => cmd_defaults(&dir),
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let summary = scenario_service::validate_scenario_file(scenario_path)?;
    println!("✓ Scenario is valid");
    println!("  Name: {}", summary.name);
    if let Some(description) = &summary.description {
        println!("  Description: {}", description);
    }
    println!(
        "  Time: {} - {} (dt = {}, {} points)",
        summary.year_min, summary.year_max, summary.dt, summary.points
    );
    println!("  Tables: {}", summary.tables);
    println!("  Switches: {}", summary.switches);
    Ok(())
}

fn cmd_run(
    scenario_path: Option<&Path>,
    preset: Option<&str>,
    year_max: Option<f64>,
    use_cache: bool,
    store_dir: Option<&Path>,
) -> AppResult<()> {
    let (mut scenario, base_dir) = match (scenario_path, preset) {
        (Some(path), _) => (
            scenario_service::load_scenario(path)?,
            Some(scenario_service::scenario_dir(path)),
        ),
        (None, Some(name)) => (scenario_service::load_preset(name)?, None),
        (None, None) => (scenario_service::load_preset("standard")?, None),
    };
    if let Some(year_max) = year_max {
        scenario.time.year_max = year_max;
    }

    let store_dir = store_dir
        .map(Path::to_path_buf)
        .or_else(|| base_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let store = RunStore::in_dir(&store_dir)?;

    println!("Running scenario: {}", scenario.name);

    let request = RunRequest {
        scenario: &scenario,
        base_dir: base_dir.as_deref(),
        store: Some(&store),
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    };

    let mut last_emit = Instant::now();
    let mut last_stage = String::new();
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event| {
            let stage_key = event.stage.label().to_string();
            let emit_now = stage_key != last_stage || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = stage_key;
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Simulation completed: {}", response.run_id);
    }

    print_timing_summary(&response.timing);

    println!("\nFinal values ({}):", response.manifest.time.year_max);
    for (code, value) in &response.manifest.final_values {
        println!("  {:<5} {:.6e}", code, value);
    }

    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match event.stage {
        RunStage::Running { step, total } => {
            let fraction = event.fraction_complete().unwrap_or(0.0);
            let width = 28usize;
            let filled = ((fraction * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  step={}/{}  elapsed={:.2}s",
                bar,
                fraction * 100.0,
                step,
                total,
                event.elapsed_wall_s
            );
            let _ = io::stdout().flush();
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            print!("{}", line);
            let _ = io::stdout().flush();
        }
    }
}

fn print_timing_summary(timing: &w2_app::RunTimingSummary) {
    let total = timing.total_time_s.max(1.0e-12);

    println!("\nTiming summary:");
    if timing.load_cache_time_s > 0.0 {
        println!("  Cache load: {:.3}s", timing.load_cache_time_s);
    } else {
        println!(
            "  Resolve: {:.3}s ({:.1}%)",
            timing.resolve_time_s,
            100.0 * timing.resolve_time_s / total
        );
        println!(
            "  Compile: {:.3}s ({:.1}%)",
            timing.compile_time_s,
            100.0 * timing.compile_time_s / total
        );
        println!(
            "  Run:     {:.3}s ({:.1}%)",
            timing.run_time_s,
            100.0 * timing.run_time_s / total
        );
        println!(
            "  Save:    {:.3}s ({:.1}%)",
            timing.save_time_s,
            100.0 * timing.save_time_s / total
        );
    }
    println!("  Total:   {:.3}s", timing.total_time_s);
    println!("  Steps:   {}", timing.steps);
}

fn cmd_runs(store_dir: &Path) -> AppResult<()> {
    let store = RunStore::in_dir(store_dir)?;
    let runs = run_service::list_runs(&store)?;

    if runs.is_empty() {
        println!("No stored runs in: {}", store.root_dir().display());
    } else {
        println!("Stored runs:");
        for manifest in runs {
            println!(
                "  {} {} ({})",
                manifest.run_id, manifest.scenario_name, manifest.timestamp
            );
        }
    }
    Ok(())
}

fn cmd_show_run(store_dir: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let store = RunStore::in_dir(store_dir)?;
    let (manifest, records) = run_service::load_run(&store, run_id)?;

    println!("\nRun Summary:");
    println!("  Scenario: {}", manifest.scenario_name);
    if let Some(description) = &manifest.description {
        println!("  Description: {}", description);
    }
    println!("  Created: {}", manifest.timestamp);
    println!("  Engine: {}", manifest.engine_version);
    println!("  Time points: {}", records.len());
    if let (Some(first), Some(last)) = (records.first(), records.last()) {
        println!("  Time range: {} - {}", first.time, last.time);
    }

    println!("\nFinal values:");
    for (code, value) in &manifest.final_values {
        let description = code
            .parse::<Quantity>()
            .map(|q| format!("{} [{}]", q.description(), q.unit()))
            .unwrap_or_default();
        println!("  {:<5} {:>16.6e}  {}", code, value, description);
    }

    Ok(())
}

fn cmd_export_series(
    store_dir: &Path,
    run_id: &str,
    codes: &[String],
    output: Option<&Path>,
) -> AppResult<()> {
    let store = RunStore::in_dir(store_dir)?;
    let (_manifest, records) = run_service::load_run(&store, run_id)?;

    let quantities = if codes.is_empty() {
        Quantity::ALL.to_vec()
    } else {
        query::parse_quantities(codes)?
    };
    let csv = w2_results::series_csv(&records, &quantities)?;

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} data points to {}",
            records.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}

fn cmd_sweep(scenario_paths: &[PathBuf], presets: &[String]) -> AppResult<()> {
    let mut resolved = Vec::new();
    for path in scenario_paths {
        let scenario = scenario_service::load_scenario(path)?;
        let base_dir = scenario_service::scenario_dir(path);
        resolved.push(scenario_service::resolve_scenario(&scenario, Some(&base_dir))?);
    }
    for name in presets {
        let scenario = scenario_service::load_preset(name)?;
        resolved.push(scenario_service::resolve_scenario(&scenario, None)?);
    }
    if resolved.is_empty() {
        return Err(AppError::InvalidInput(
            "sweep needs at least one scenario or --preset".to_string(),
        ));
    }

    println!("Running {} scenarios", resolved.len());
    let outcomes = sweep::run_sweep(&resolved);

    for outcome in &outcomes {
        match &outcome.result {
            Ok(values) => {
                println!("✓ {}", outcome.name);
                for (quantity, value) in values {
                    println!("  {:<5} {:.6e}", quantity.code(), value);
                }
            }
            Err(e) => println!("✗ {}: {}", outcome.name, e),
        }
    }
    Ok(())
}

fn cmd_defaults(dir: &Path) -> AppResult<()> {
    let (tables, switches) = scenario_service::write_default_documents(dir)?;
    println!("✓ Wrote {}", tables.display());
    println!("✓ Wrote {}", switches.display());
    Ok(())
}

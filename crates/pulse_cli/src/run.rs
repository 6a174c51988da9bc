//! `pulse run`: run a single bench.
//!
//! Resolves a bench file, loads it against the project configuration, runs it
//! on a fresh core, and reports expectation failures. Optionally records a VCD
//! waveform and prints the per-tick trace.

use std::path::{Path, PathBuf};

use pulse_config::{ResolvedBench, WaveformFormat};
use pulse_sim::BenchResult;

use crate::pipeline::{
    discover_benches, load_resolved, render_trace_table, resolve_project_root, BENCH_DIR, OUT_DIR,
};
use crate::{GlobalArgs, ReportFormat, RunArgs};

/// Runs the `pulse run` command.
///
/// Returns exit code 0 if every expectation held, 1 otherwise.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = pulse_config::load_config(&project_dir)?;

    let bench_path = resolve_bench_path(&args.bench, &project_dir)?;
    let bench = load_resolved(&bench_path, &config)?;

    if !global.quiet {
        eprintln!("   Running {} ({} core, {} ticks)", bench.name, bench.core, bench.tick_count());
    }

    let waveform_path = waveform_path(&bench, args, &project_dir)?;
    let result = pulse_sim::simulate(&bench, waveform_path.as_deref())?;

    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        ReportFormat::Text => {
            if global.verbose {
                print!("{}", render_trace_table(&result.trace));
            }
        }
    }

    report(&result, waveform_path.as_deref(), global);

    if result.passed() {
        Ok(0)
    } else {
        Ok(1)
    }
}

/// Prints expectation failures and the run summary to stderr.
fn report(result: &BenchResult, waveform: Option<&Path>, global: &GlobalArgs) {
    for failure in &result.failures {
        eprintln!("EXPECTATION FAILED: {failure}");
    }

    if global.quiet {
        return;
    }
    eprintln!("   Finished {} after {} ticks", result.name, result.ticks);
    if let Some(path) = waveform {
        eprintln!("   Waveform: {}", path.display());
    }
    if !result.passed() {
        eprintln!(
            "   FAILED: {} expectation(s) failed",
            result.failures.len()
        );
    }
}

/// Chooses where to write the VCD, if anywhere.
///
/// `--no-waveform` and `waveform = "none"` disable output; `--vcd` wins over
/// the default `out/<bench>.vcd`.
fn waveform_path(
    bench: &ResolvedBench,
    args: &RunArgs,
    project_dir: &Path,
) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    if args.no_waveform {
        return Ok(None);
    }
    if let Some(p) = &args.vcd {
        return Ok(Some(PathBuf::from(p)));
    }
    if bench.waveform == WaveformFormat::None {
        return Ok(None);
    }
    let out_dir = project_dir.join(OUT_DIR);
    std::fs::create_dir_all(&out_dir)?;
    Ok(Some(out_dir.join(format!("{}.vcd", bench.name))))
}

/// Resolves a bench argument to a file path.
///
/// Tries: (1) exact file path, (2) relative to project dir,
/// (3) search `benches/` by stem name.
fn resolve_bench_path(arg: &str, project_dir: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = PathBuf::from(arg);
    if path.is_file() {
        return Ok(path);
    }

    let rel_path = project_dir.join(arg);
    if rel_path.is_file() {
        return Ok(rel_path);
    }

    for file in discover_benches(&project_dir.join(BENCH_DIR))? {
        if file.file_stem().and_then(|s| s.to_str()) == Some(arg) {
            return Ok(file);
        }
    }

    Err(format!("bench not found: '{arg}'").into())
}

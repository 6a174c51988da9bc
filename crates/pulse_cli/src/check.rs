//! `pulse check`: validate configuration without running anything.
//!
//! Loads `pulse.toml`, then loads and resolves every bench in `benches/`,
//! reporting each problem found. Nothing is simulated.

use crate::pipeline::{bench_name, discover_benches, load_resolved, resolve_project_root, BENCH_DIR};
use crate::GlobalArgs;

/// Runs the `pulse check` command.
///
/// Returns exit code 0 if the project and every bench are valid, 1 otherwise.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = pulse_config::load_config(&project_dir)?;

    if !global.quiet {
        eprintln!(
            "   Checking {} v{}",
            config.project.name, config.project.version
        );
    }

    let benches = discover_benches(&project_dir.join(BENCH_DIR))?;
    let mut errors = 0usize;
    for path in &benches {
        match load_resolved(path, &config) {
            Ok(bench) => {
                if global.verbose {
                    eprintln!(
                        "   {} ({} core, {} ticks)",
                        bench.name,
                        bench.core,
                        bench.tick_count()
                    );
                }
            }
            Err(e) => {
                errors += 1;
                eprintln!("error: {}: {e}", bench_name(path));
            }
        }
    }

    if !global.quiet {
        eprintln!(
            "   Result: {} bench(es) checked, {errors} error(s)",
            benches.len()
        );
    }

    if errors > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

//! Shared pipeline helpers for CLI commands.
//!
//! Contains common utilities used by `run`, `test`, and `check`: project root
//! resolution, bench discovery, bench loading, and trace rendering.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use pulse_common::Word;
use pulse_config::{ProjectConfig, ResolvedBench, CONFIG_FILE};
use pulse_sim::Trace;

use crate::GlobalArgs;

/// Directory, relative to the project root, that holds bench files.
pub const BENCH_DIR: &str = "benches";

/// Directory, relative to the project root, that receives waveform output.
pub const OUT_DIR: &str = "out";

/// Walks up from `start` looking for the nearest directory containing `pulse.toml`.
///
/// Returns the directory containing `pulse.toml`, or an error if none is found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `pulse.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Discovers `*.toml` bench files directly inside `dir`, sorted by path.
///
/// A missing directory yields an empty list.
pub fn discover_benches(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("toml") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Returns the bench name (file stem) for a bench path.
pub fn bench_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Loads a bench file and resolves it against the project configuration.
pub fn load_resolved(
    path: &Path,
    config: &ProjectConfig,
) -> Result<ResolvedBench, Box<dyn std::error::Error>> {
    let (name, bench) = pulse_config::load_bench(path)?;
    Ok(pulse_config::resolve_bench(config, &name, &bench)?)
}

/// Renders a trace as a fixed-width table, one row per tick.
///
/// Single-bit signals print as `0`/`1`; wider signals print in hex.
pub fn render_trace_table(trace: &Trace) -> String {
    let widths: Vec<usize> = trace
        .signals
        .iter()
        .map(|s| s.name.len().max(format_cell(&Word::zero(s.width)).len()))
        .collect();

    let mut out = String::new();
    let _ = write!(out, "{:>6}", "tick");
    for (signal, width) in trace.signals.iter().zip(&widths) {
        let _ = write!(out, "  {:>width$}", signal.name);
    }
    out.push('\n');

    for row in &trace.rows {
        let _ = write!(out, "{:>6}", row.tick);
        for (value, width) in row.values.iter().zip(&widths) {
            let _ = write!(out, "  {:>width$}", format_cell(value));
        }
        out.push('\n');
    }
    out
}

fn format_cell(value: &Word) -> String {
    if value.width() == 1 {
        value.value().to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_sim::{SignalInfo, TimingClass, TraceRow};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn find_project_root_walks_up() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[project]\nname = \"x\"\n").unwrap();
        let nested = tmp.path().join("benches").join("deep");
        fs::create_dir_all(&nested).unwrap();

        let root = find_project_root(&nested).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn find_project_root_missing() {
        let tmp = TempDir::new().unwrap();
        let err = find_project_root(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("pulse.toml"));
    }

    #[test]
    fn resolve_project_root_from_config_file() {
        let tmp = TempDir::new().unwrap();
        let config = tmp.path().join(CONFIG_FILE);
        fs::write(&config, "[project]\nname = \"x\"\n").unwrap();
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(config.to_str().unwrap().to_string()),
        };
        assert_eq!(resolve_project_root(&global).unwrap(), tmp.path());
    }

    #[test]
    fn discover_benches_sorted_toml_only() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.toml"), "").unwrap();
        fs::write(tmp.path().join("a.toml"), "").unwrap();
        fs::write(tmp.path().join("notes.md"), "").unwrap();

        let files = discover_benches(tmp.path()).unwrap();
        let names: Vec<String> = files.iter().map(|p| bench_name(p)).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn discover_benches_missing_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(discover_benches(&tmp.path().join("nope")).unwrap().is_empty());
    }

    #[test]
    fn trace_table_layout() {
        let trace = Trace {
            signals: vec![
                SignalInfo::input("reset", 1),
                SignalInfo::output("read_data", 8, TimingClass::Registered),
            ],
            rows: vec![
                TraceRow {
                    tick: 0,
                    values: vec![Word::from_u64(1, 1), Word::zero(8)],
                },
                TraceRow {
                    tick: 1,
                    values: vec![Word::zero(1), Word::from_u64(0x0A, 8)],
                },
            ],
        };
        let table = render_trace_table(&trace);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "  tick  reset  read_data");
        assert_eq!(lines[1], "     0      1       0x00");
        assert_eq!(lines[2], "     1      0       0x0a");
    }
}

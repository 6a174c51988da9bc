//! `pulse init`: project scaffolding command.
//!
//! Creates a new Pulse project directory with a `pulse.toml` config file,
//! a `benches/` directory holding one smoke bench per core, and an empty
//! `out/` directory for waveforms.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pulse_config::CONFIG_FILE;

use crate::pipeline::{BENCH_DIR, OUT_DIR};
use crate::GlobalArgs;

/// Scaffolds a project in `./<name>`, or in the cwd when no name is given.
///
/// Refuses to touch an existing named directory or an existing `pulse.toml`.
pub fn run(name: Option<String>, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = match &name {
        Some(n) => {
            let dir = PathBuf::from(n);
            if dir.exists() {
                return Err(format!("refusing to overwrite existing directory '{n}'").into());
            }
            fs::create_dir_all(&dir)?;
            dir
        }
        None => std::env::current_dir()?,
    };

    if project_dir.join(CONFIG_FILE).exists() {
        return Err(format!("{CONFIG_FILE} already exists in {}", project_dir.display()).into());
    }

    let project_name = project_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("my_project");

    if !global.quiet {
        eprintln!("  Creating new Pulse project `{project_name}`");
    }

    create_directories(&project_dir)?;
    write_pulse_toml(&project_dir, project_name)?;
    write_fifo_smoke(&project_dir)?;
    write_comparator_smoke(&project_dir)?;

    if !global.quiet {
        eprintln!("     Created {}", project_dir.join(CONFIG_FILE).display());
        for bench in ["fifo_smoke.toml", "comparator_smoke.toml"] {
            eprintln!(
                "     Created {}",
                project_dir.join(BENCH_DIR).join(bench).display()
            );
        }
    }

    Ok(0)
}

/// Makes `benches/` and `out/` under `root`.
fn create_directories(root: &Path) -> io::Result<()> {
    for dir in [BENCH_DIR, OUT_DIR] {
        fs::create_dir_all(root.join(dir))?;
    }
    Ok(())
}

/// Writes the `pulse.toml` configuration file.
fn write_pulse_toml(root: &Path, name: &str) -> io::Result<()> {
    let content = format!(
        r#"[project]
name = "{name}"
version = "0.1.0"

[fifo]
width = 8
depth = 16
status_timing = "combinational"

[comparator]
width = 16
inputs = 8

[trace]
waveform = "vcd"
clock_period = "10ns"
"#
    );
    fs::write(root.join(CONFIG_FILE), content)
}

/// Writes a FIFO bench covering ordered reads and an empty-read pulse.
fn write_fifo_smoke(root: &Path) -> io::Result<()> {
    let content = r#"core = "fifo"
description = "Write three words, read them back in order, then underflow"

[[step]]
label = "reset"
reset = true
expect = { empty = true, full = false }

[[step]]
write = 0x0A
[[step]]
write = 0x0B
[[step]]
write = 0x0C
expect = { empty = false }

[[step]]
read = true
expect = { read_data = 0x0A }
[[step]]
read = true
expect = { read_data = 0x0B }
[[step]]
read = true
expect = { read_data = 0x0C, empty = true }

[[step]]
label = "underflow"
read = true
expect = { error_read_empty = true, read_data = 0 }

[[step]]
label = "pulse clears"
expect = { error_read_empty = false }
"#;
    fs::write(root.join(BENCH_DIR).join("fifo_smoke.toml"), content)
}

/// Writes a comparator bench covering both modes and the done pulse.
fn write_comparator_smoke(root: &Path) -> io::Result<()> {
    let content = r#"core = "comparator"
description = "Capture eight words, report the minimum, then recapture for the maximum"

[[step]]
label = "capture"
reset = true
mode = "min"
inputs = [45, 3, 29, 88, 17, 61, 5, 42]
expect = { done = false }

[[step]]
label = "sorted"
expect = { done = true, result = 3 }

[[step]]
label = "idle"
mode = "max"
expect = { done = false, result = 0 }

[[step]]
label = "recapture"
reset = true

[[step]]
expect = { done = true, result = 88 }
"#;
    fs::write(
        root.join(BENCH_DIR).join("comparator_smoke.toml"),
        content,
    )
}

//! Configuration and bench file loading and validation.

use crate::error::ConfigError;
use crate::types::{BenchFile, ComparatorParams, CoreKind, FifoParams, ProjectConfig, StepSpec};
use pulse_common::{Duration, MAX_COMPARATOR_INPUTS, MAX_FIFO_DEPTH, MAX_WORD_WIDTH};
use std::path::Path;

/// Name of the project configuration file at the project root.
pub const CONFIG_FILE: &str = "pulse.toml";

/// Loads and validates `pulse.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(project_dir.join(CONFIG_FILE))?;
    load_config_from_str(&content)
}

/// Parses and validates a `pulse.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Loads a bench file, naming the bench after the file stem.
///
/// Returns the bench name together with the parsed program.
pub fn load_bench(path: &Path) -> Result<(String, BenchFile), ConfigError> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("bench")
        .to_string();
    let content = std::fs::read_to_string(path)?;
    let bench = load_bench_from_str(&name, &content)?;
    Ok((name, bench))
}

/// Parses a bench program and checks that every step fits its core.
///
/// Checks that need core parameters (data widths, input counts) happen in
/// [`resolve_bench`](crate::resolve_bench).
pub fn load_bench_from_str(name: &str, content: &str) -> Result<BenchFile, ConfigError> {
    let bench: BenchFile =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    if let Some(fifo) = &bench.fifo {
        validate_fifo(fifo)?;
    }
    if let Some(comparator) = &bench.comparator {
        validate_comparator(comparator)?;
    }
    for (index, step) in bench.step.iter().enumerate() {
        validate_step(bench.core, step).map_err(|reason| ConfigError::InvalidStep {
            bench: name.to_string(),
            step: index,
            reason,
        })?;
    }
    Ok(bench)
}

fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    validate_fifo(&config.fifo)?;
    validate_comparator(&config.comparator)?;
    let period: Duration = config
        .trace
        .clock_period
        .parse()
        .map_err(|e| ConfigError::ValidationError(format!("trace.clock_period: {e}")))?;
    if period.is_zero() {
        return Err(ConfigError::ValidationError(
            "trace.clock_period must be nonzero".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_fifo(params: &FifoParams) -> Result<(), ConfigError> {
    validate_width("fifo.width", params.width)?;
    if params.depth == 0 || params.depth > MAX_FIFO_DEPTH {
        return Err(ConfigError::ValidationError(format!(
            "fifo.depth must be between 1 and {MAX_FIFO_DEPTH}, got {}",
            params.depth
        )));
    }
    Ok(())
}

pub(crate) fn validate_comparator(params: &ComparatorParams) -> Result<(), ConfigError> {
    validate_width("comparator.width", params.width)?;
    if params.inputs == 0 || params.inputs > MAX_COMPARATOR_INPUTS {
        return Err(ConfigError::ValidationError(format!(
            "comparator.inputs must be between 1 and {MAX_COMPARATOR_INPUTS}, got {}",
            params.inputs
        )));
    }
    Ok(())
}

fn validate_width(field: &str, width: u32) -> Result<(), ConfigError> {
    if width == 0 || width > MAX_WORD_WIDTH {
        return Err(ConfigError::ValidationError(format!(
            "{field} must be between 1 and {MAX_WORD_WIDTH}, got {width}"
        )));
    }
    Ok(())
}

fn validate_step(core: CoreKind, step: &StepSpec) -> Result<(), String> {
    if step.repeat == 0 {
        return Err("`repeat` must be at least 1".to_string());
    }
    let expect = step.expect.as_ref();
    match core {
        CoreKind::Fifo => {
            if step.mode.is_some() || step.inputs.is_some() {
                return Err("`mode` and `inputs` only apply to comparator benches".to_string());
            }
            if expect.is_some_and(|e| e.has_comparator_fields()) {
                return Err("`done` and `result` are not FIFO outputs".to_string());
            }
            if step.write_enable == Some(false) && step.write.is_some() {
                return Err("`write` data given with `write_enable = false`".to_string());
            }
        }
        CoreKind::Comparator => {
            if step.write.is_some() || step.write_enable.is_some() || step.read {
                return Err("`write`, `write_enable` and `read` only apply to FIFO benches".to_string());
            }
            if expect.is_some_and(|e| e.has_fifo_fields()) {
                return Err("FIFO outputs cannot be expected from a comparator".to_string());
            }
        }
    }
    Ok(())
}

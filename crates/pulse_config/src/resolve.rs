//! Bench resolution: merging project defaults with bench-specific overrides.

use crate::error::ConfigError;
use crate::types::{
    BenchFile, ComparatorParams, CoreKind, FifoParams, ProjectConfig, StepSpec, WaveformFormat,
};
use pulse_common::{Duration, Word, MAX_BENCH_TICKS};

/// A bench program with its core parameters and trace settings fully resolved.
#[derive(Debug, Clone)]
pub struct ResolvedBench {
    /// The bench name (file stem).
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// The core the bench drives.
    pub core: CoreKind,
    /// FIFO parameters (bench override, else project default).
    pub fifo: FifoParams,
    /// Comparator parameters (bench override, else project default).
    pub comparator: ComparatorParams,
    /// Simulated time per tick.
    pub clock_period: Duration,
    /// Waveform output format.
    pub waveform: WaveformFormat,
    /// The stimulus steps, checked against the resolved parameters.
    pub steps: Vec<StepSpec>,
}

impl ResolvedBench {
    /// Total number of ticks the program runs, counting repeats.
    pub fn tick_count(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.repeat)).sum()
    }
}

/// Resolves a bench against the project configuration.
///
/// A `[fifo]` or `[comparator]` table in the bench replaces the project's
/// table entirely. Every data value in the program must fit the resolved
/// word width, and every `inputs` list must have exactly `N` entries. The
/// program may run at most [`MAX_BENCH_TICKS`] ticks, and the last tick's
/// timestamp must fit in 64-bit femtoseconds.
pub fn resolve_bench(
    config: &ProjectConfig,
    name: &str,
    bench: &BenchFile,
) -> Result<ResolvedBench, ConfigError> {
    let fifo = bench.fifo.unwrap_or(config.fifo);
    let comparator = bench.comparator.unwrap_or(config.comparator);

    let clock_period: Duration = config
        .trace
        .clock_period
        .parse()
        .map_err(|e| ConfigError::ValidationError(format!("trace.clock_period: {e}")))?;

    let width = match bench.core {
        CoreKind::Fifo => fifo.width,
        CoreKind::Comparator => comparator.width,
    };

    for (index, step) in bench.steps().enumerate() {
        check_step_values(bench.core, step, width, comparator.inputs).map_err(|reason| {
            ConfigError::InvalidStep {
                bench: name.to_string(),
                step: index,
                reason,
            }
        })?;
    }

    let ticks: u64 = bench.steps().map(|s| u64::from(s.repeat)).sum();
    if ticks > MAX_BENCH_TICKS {
        return Err(ConfigError::ValidationError(format!(
            "bench '{name}' runs {ticks} ticks, more than the limit of {MAX_BENCH_TICKS}"
        )));
    }
    if ticks
        .saturating_sub(1)
        .checked_mul(clock_period.as_fs())
        .is_none()
    {
        return Err(ConfigError::ValidationError(format!(
            "bench '{name}': {ticks} ticks at {clock_period} overflow the 64-bit femtosecond timeline"
        )));
    }

    Ok(ResolvedBench {
        name: name.to_string(),
        description: bench.description.clone(),
        core: bench.core,
        fifo,
        comparator,
        clock_period,
        waveform: config.trace.waveform,
        steps: bench.step.clone(),
    })
}

impl BenchFile {
    /// Iterates over the stimulus steps in order.
    pub fn steps(&self) -> impl Iterator<Item = &StepSpec> {
        self.step.iter()
    }
}

fn check_step_values(
    core: CoreKind,
    step: &StepSpec,
    width: u32,
    inputs: u32,
) -> Result<(), String> {
    let fits = |field: &str, value: u64| {
        if Word::try_new(value, width).is_some() {
            Ok(())
        } else {
            Err(format!("{field} value {value:#x} does not fit in {width} bits"))
        }
    };

    if let Some(data) = step.write {
        fits("write", data)?;
    }
    if let Some(words) = &step.inputs {
        if core == CoreKind::Comparator && words.len() != inputs as usize {
            return Err(format!(
                "expected {inputs} input words, got {}",
                words.len()
            ));
        }
        for &word in words {
            fits("inputs", word)?;
        }
    }
    if let Some(expect) = &step.expect {
        if let Some(v) = expect.read_data {
            fits("expect.read_data", v)?;
        }
        if let Some(v) = expect.result {
            fits("expect.result", v)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_bench_from_str, load_config_from_str};
    use crate::types::StatusTiming;

    fn project() -> ProjectConfig {
        load_config_from_str(
            r#"
[project]
name = "test"

[fifo]
width = 8
depth = 16

[comparator]
width = 16
inputs = 4

[trace]
clock_period = "20ns"
"#,
        )
        .unwrap()
    }

    #[test]
    fn uses_project_defaults() {
        let bench = load_bench_from_str("b", "core = \"fifo\"\n[[step]]\nwrite = 0x0A\n").unwrap();
        let resolved = resolve_bench(&project(), "b", &bench).unwrap();
        assert_eq!(resolved.fifo.depth, 16);
        assert_eq!(resolved.clock_period, Duration::from_ns(20));
        assert_eq!(resolved.tick_count(), 1);
    }

    #[test]
    fn bench_override_replaces_table() {
        let toml = r#"
core = "fifo"

[fifo]
depth = 2
status_timing = "registered"
"#;
        let bench = load_bench_from_str("b", toml).unwrap();
        let resolved = resolve_bench(&project(), "b", &bench).unwrap();
        assert_eq!(resolved.fifo.depth, 2);
        assert_eq!(resolved.fifo.width, 8);
        assert_eq!(resolved.fifo.status_timing, StatusTiming::Registered);
    }

    #[test]
    fn write_data_must_fit_width() {
        let bench = load_bench_from_str("b", "core = \"fifo\"\n[[step]]\nwrite = 0x100\n").unwrap();
        let err = resolve_bench(&project(), "b", &bench).unwrap_err();
        assert!(err.to_string().contains("does not fit in 8 bits"), "{err}");
    }

    #[test]
    fn input_count_must_match() {
        let toml = "core = \"comparator\"\n[[step]]\nreset = true\ninputs = [1, 2, 3]\n";
        let bench = load_bench_from_str("b", toml).unwrap();
        let err = resolve_bench(&project(), "b", &bench).unwrap_err();
        assert!(err.to_string().contains("expected 4 input words"), "{err}");
    }

    #[test]
    fn expected_result_must_fit_width() {
        let toml = "core = \"comparator\"\n[[step]]\nexpect = { result = 0x10000 }\n";
        let bench = load_bench_from_str("b", toml).unwrap();
        assert!(resolve_bench(&project(), "b", &bench).is_err());
    }

    #[test]
    fn tick_count_sums_repeats() {
        let toml = r#"
core = "fifo"

[[step]]
reset = true
repeat = 2

[[step]]
read = true
repeat = 5
"#;
        let bench = load_bench_from_str("b", toml).unwrap();
        let resolved = resolve_bench(&project(), "b", &bench).unwrap();
        assert_eq!(resolved.tick_count(), 7);
    }

    #[test]
    fn tick_limit_enforced() {
        let toml = "core = \"fifo\"\n[[step]]\nrepeat = 4294967295\n";
        let bench = load_bench_from_str("b", toml).unwrap();
        let err = resolve_bench(&project(), "b", &bench).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("limit"), "{err}");
    }

    #[test]
    fn timeline_overflow_rejected() {
        let mut config = project();
        config.trace.clock_period = "1s".to_string();
        // 1s is 1e15 fs, so tick 18446 is the last one that fits in u64.
        let fits = load_bench_from_str("b", "core = \"fifo\"\n[[step]]\nrepeat = 18447\n").unwrap();
        assert!(resolve_bench(&config, "b", &fits).is_ok());

        let long = load_bench_from_str("b", "core = \"fifo\"\n[[step]]\nrepeat = 18448\n").unwrap();
        let err = resolve_bench(&config, "b", &long).unwrap_err();
        assert!(err.to_string().contains("overflow"), "{err}");
    }
}

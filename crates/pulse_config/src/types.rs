//! Configuration types deserialized from `pulse.toml` and bench files.

use serde::{Deserialize, Serialize};

/// The top-level project configuration parsed from `pulse.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata.
    pub project: ProjectMeta,
    /// Default FIFO parameters for benches that drive the FIFO core.
    #[serde(default)]
    pub fifo: FifoParams,
    /// Default comparator parameters for benches that drive the comparator core.
    #[serde(default)]
    pub comparator: ComparatorParams,
    /// Waveform trace settings.
    #[serde(default)]
    pub trace: TraceConfig,
}

/// Project metadata required in every `pulse.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    #[serde(default = "default_version")]
    pub version: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// Construction-time parameters of the FIFO core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FifoParams {
    /// Word width `W` in bits.
    pub width: u32,
    /// Capacity `D` in words.
    pub depth: u32,
    /// Which revision of the full/empty status outputs to model.
    pub status_timing: StatusTiming,
}

impl Default for FifoParams {
    fn default() -> Self {
        Self {
            width: 8,
            depth: 16,
            status_timing: StatusTiming::Combinational,
        }
    }
}

/// Timing class of the FIFO `full`/`empty` outputs.
///
/// Admission and the error pulses always use the current count; this only
/// selects what the status outputs report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTiming {
    /// Status reflects the count after this tick's update (canonical revision).
    #[default]
    Combinational,
    /// Status is registered from the count at the start of the tick, so it
    /// lags the count by one tick (earliest revision).
    Registered,
}

/// Construction-time parameters of the comparator core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparatorParams {
    /// Word width `W` in bits.
    pub width: u32,
    /// Number of input words `N`.
    pub inputs: u32,
}

impl Default for ComparatorParams {
    fn default() -> Self {
        Self {
            width: 16,
            inputs: 8,
        }
    }
}

/// Waveform trace settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// The waveform output format.
    pub waveform: WaveformFormat,
    /// Simulated time per tick (e.g., "10ns"), used for waveform timestamps.
    pub clock_period: String,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            waveform: WaveformFormat::Vcd,
            clock_period: "10ns".to_string(),
        }
    }
}

/// Waveform output format.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WaveformFormat {
    /// Value Change Dump (IEEE 1364).
    #[default]
    Vcd,
    /// No waveform output.
    None,
}

/// Which core a bench drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoreKind {
    /// The circular-buffer core.
    Fifo,
    /// The reset-triggered extremum selector.
    Comparator,
}

impl std::fmt::Display for CoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreKind::Fifo => write!(f, "fifo"),
            CoreKind::Comparator => write!(f, "comparator"),
        }
    }
}

/// Comparator output selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    /// Emit the smallest captured word.
    #[default]
    Min,
    /// Emit the largest captured word.
    Max,
}

/// A stimulus program parsed from `benches/<name>.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct BenchFile {
    /// The core this bench drives.
    pub core: CoreKind,
    /// Free-form description printed by `pulse test --verbose`.
    #[serde(default)]
    pub description: String,
    /// Overrides the project's FIFO parameters for this bench.
    #[serde(default)]
    pub fifo: Option<FifoParams>,
    /// Overrides the project's comparator parameters for this bench.
    #[serde(default)]
    pub comparator: Option<ComparatorParams>,
    /// The ordered stimulus steps.
    #[serde(default)]
    pub step: Vec<StepSpec>,
}

/// One entry of a bench program, applied for `repeat` consecutive ticks.
///
/// `reset`, the enables and `write` apply only to this step. `mode` and
/// `inputs` hold their value until a later step drives them again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepSpec {
    /// Assert reset.
    #[serde(default)]
    pub reset: bool,
    /// Write this data word (asserts the FIFO write enable).
    pub write: Option<u64>,
    /// Explicit FIFO write enable, for driving the enable without new data.
    pub write_enable: Option<bool>,
    /// Assert the FIFO read enable.
    #[serde(default)]
    pub read: bool,
    /// Comparator mode.
    pub mode: Option<CompareMode>,
    /// Comparator input words, `inputs[0]` being field 0.
    pub inputs: Option<Vec<u64>>,
    /// Number of consecutive ticks to apply this step.
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    /// Output values to check after every tick of this step.
    pub expect: Option<Expectation>,
    /// Name shown in expectation failures.
    pub label: Option<String>,
}

fn default_repeat() -> u32 {
    1
}

/// Expected output values; unset fields are not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Expectation {
    /// FIFO `read_data`.
    pub read_data: Option<u64>,
    /// FIFO `full`.
    pub full: Option<bool>,
    /// FIFO `empty`.
    pub empty: Option<bool>,
    /// FIFO `error_write_full`.
    pub error_write_full: Option<bool>,
    /// FIFO `error_read_empty`.
    pub error_read_empty: Option<bool>,
    /// Comparator `done`.
    pub done: Option<bool>,
    /// Comparator `result`.
    pub result: Option<u64>,
}

impl Expectation {
    /// Returns true if any FIFO-only field is set.
    pub fn has_fifo_fields(&self) -> bool {
        self.read_data.is_some()
            || self.full.is_some()
            || self.empty.is_some()
            || self.error_write_full.is_some()
            || self.error_read_empty.is_some()
    }

    /// Returns true if any comparator-only field is set.
    pub fn has_comparator_fields(&self) -> bool {
        self.done.is_some() || self.result.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_bench_from_str, load_config_from_str};

    #[test]
    fn status_timing_variants() {
        for (input, expected) in [
            ("combinational", StatusTiming::Combinational),
            ("registered", StatusTiming::Registered),
        ] {
            let toml = format!(
                r#"
[project]
name = "test"

[fifo]
status_timing = "{input}"
"#
            );
            let config = load_config_from_str(&toml).unwrap();
            assert_eq!(config.fifo.status_timing, expected);
        }
    }

    #[test]
    fn waveform_format_variants() {
        for (input, expected) in [("vcd", WaveformFormat::Vcd), ("none", WaveformFormat::None)] {
            let toml = format!(
                r#"
[project]
name = "test"

[trace]
waveform = "{input}"
"#
            );
            let config = load_config_from_str(&toml).unwrap();
            assert_eq!(config.trace.waveform, expected);
        }
    }

    #[test]
    fn partial_fifo_table_keeps_defaults() {
        let toml = r#"
[project]
name = "test"

[fifo]
depth = 4
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.fifo.depth, 4);
        assert_eq!(config.fifo.width, 8);
        assert_eq!(config.fifo.status_timing, StatusTiming::Combinational);
    }

    #[test]
    fn step_fields() {
        let toml = r#"
core = "comparator"

[[step]]
reset = true
mode = "max"
inputs = [45, 3, 29, 88]
label = "capture"

[[step]]
repeat = 2
expect = { done = false }
"#;
        let bench = load_bench_from_str("cmp", toml).unwrap();
        assert_eq!(bench.core, CoreKind::Comparator);
        assert_eq!(bench.step.len(), 2);
        assert_eq!(bench.step[0].mode, Some(CompareMode::Max));
        assert_eq!(bench.step[0].inputs.as_deref(), Some(&[45, 3, 29, 88][..]));
        assert_eq!(bench.step[0].repeat, 1);
        assert_eq!(bench.step[1].repeat, 2);
        assert_eq!(bench.step[1].expect.as_ref().unwrap().done, Some(false));
    }

    #[test]
    fn hex_write_data() {
        let toml = r#"
core = "fifo"

[[step]]
write = 0x0A
"#;
        let bench = load_bench_from_str("hex", toml).unwrap();
        assert_eq!(bench.step[0].write, Some(0x0A));
    }

    #[test]
    fn unknown_step_field_is_rejected() {
        let toml = r#"
core = "fifo"

[[step]]
wrte = 1
"#;
        assert!(load_bench_from_str("typo", toml).is_err());
    }

    #[test]
    fn expectation_field_groups() {
        let fifo = Expectation {
            empty: Some(true),
            ..Default::default()
        };
        assert!(fifo.has_fifo_fields());
        assert!(!fifo.has_comparator_fields());
        let cmp = Expectation {
            result: Some(3),
            ..Default::default()
        };
        assert!(cmp.has_comparator_fields());
        assert!(!cmp.has_fifo_fields());
    }

    #[test]
    fn core_kind_display() {
        assert_eq!(CoreKind::Fifo.to_string(), "fifo");
        assert_eq!(CoreKind::Comparator.to_string(), "comparator");
    }
}

//! Bench program execution: stimulus expansion, expectation checks, tracing.
//!
//! A resolved bench is expanded into one input record per tick (`repeat`
//! unrolled; `mode` and `inputs` held between steps), fed to a fresh core,
//! and every tick's inputs and outputs are captured in a [`Trace`]. Steps
//! with an `expect` table are checked after each of their ticks.

use std::fmt;

use pulse_common::{Word, MAX_BENCH_TICKS};
use pulse_config::{CompareMode, CoreKind, Expectation, ResolvedBench, StepSpec};
use serde::Serialize;

use crate::clocked::{Clocked, SignalInfo};
use crate::comparator::{ComparatorCore, ComparatorInputs, ComparatorOutputs};
use crate::error::SimError;
use crate::fifo::{FifoCore, FifoInputs, FifoOutputs};
use crate::waveform::WaveformRecorder;

/// An output that did not match its expected value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExpectationFailure {
    /// Zero-based tick index.
    pub tick: u64,
    /// Zero-based index of the bench step that produced the tick.
    pub step: usize,
    /// The step's label, if any.
    pub label: Option<String>,
    /// Output port name.
    pub signal: &'static str,
    /// Expected value.
    pub expected: u64,
    /// Observed value.
    pub actual: u64,
}

impl fmt::Display for ExpectationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {} (step {}", self.tick, self.step)?;
        if let Some(label) = &self.label {
            write!(f, " '{label}'")?;
        }
        write!(
            f,
            "): {} expected {:#x}, got {:#x}",
            self.signal, self.expected, self.actual
        )
    }
}

/// One row of a trace: every port's value for one tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TraceRow {
    /// Zero-based tick index.
    pub tick: u64,
    /// Values aligned with [`Trace::signals`].
    pub values: Vec<Word>,
}

/// The full per-tick history of a bench run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Trace {
    /// Port descriptions, inputs first.
    pub signals: Vec<SignalInfo>,
    /// One row per tick.
    pub rows: Vec<TraceRow>,
}

impl Trace {
    /// Returns the value of `signal` at `tick`, if both exist.
    pub fn value(&self, tick: u64, signal: &str) -> Option<Word> {
        let column = self.signals.iter().position(|s| s.name == signal)?;
        let row = self.rows.get(usize::try_from(tick).ok()?)?;
        row.values.get(column).copied()
    }
}

/// Outcome of running one bench.
#[derive(Clone, Debug, Serialize)]
pub struct BenchResult {
    /// Bench name.
    pub name: String,
    /// The core that was driven.
    pub core: CoreKind,
    /// Number of ticks executed.
    pub ticks: u64,
    /// Every expectation mismatch, in tick order.
    pub failures: Vec<ExpectationFailure>,
    /// Per-tick inputs and outputs.
    pub trace: Trace,
}

impl BenchResult {
    /// True if no expectation failed.
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One tick of expanded stimulus.
struct Stimulus<I> {
    step: usize,
    inputs: I,
}

/// Runs a bench on a freshly built core.
///
/// If a recorder is given, every port is registered under a scope named after
/// the core and value changes are recorded at `tick × clock_period`; the
/// recorder is finalized before returning.
pub fn run_bench(
    bench: &ResolvedBench,
    recorder: Option<&mut dyn WaveformRecorder>,
) -> Result<BenchResult, SimError> {
    let ticks = bench.tick_count();
    if ticks > MAX_BENCH_TICKS {
        return Err(SimError::InvalidParameter {
            reason: format!("bench runs {ticks} ticks, limit is {MAX_BENCH_TICKS}"),
        });
    }
    let (trace, failures) = match bench.core {
        CoreKind::Fifo => {
            let mut core = FifoCore::new(bench.fifo)?;
            let program = fifo_program(bench)?;
            drive(&mut core, &program, bench, recorder, fifo_mismatches)?
        }
        CoreKind::Comparator => {
            let mut core = ComparatorCore::new(bench.comparator)?;
            let program = comparator_program(bench)?;
            drive(&mut core, &program, bench, recorder, comparator_mismatches)?
        }
    };
    Ok(BenchResult {
        name: bench.name.clone(),
        core: bench.core,
        ticks: trace.rows.len() as u64,
        failures,
        trace,
    })
}

fn to_word(signal: &str, value: u64, width: u32) -> Result<Word, SimError> {
    Word::try_new(value, width).ok_or_else(|| SimError::ValueOutOfRange {
        signal: signal.to_string(),
        value,
        width,
    })
}

fn fifo_program(bench: &ResolvedBench) -> Result<Vec<Stimulus<FifoInputs>>, SimError> {
    let width = bench.fifo.width;
    let mut program = Vec::new();
    for (index, step) in bench.steps.iter().enumerate() {
        let inputs = FifoInputs {
            reset: step.reset,
            write_enable: step.write_enable.unwrap_or(step.write.is_some()),
            read_enable: step.read,
            write_data: to_word("write_data", step.write.unwrap_or(0), width)?,
        };
        program.extend((0..step.repeat).map(|_| Stimulus {
            step: index,
            inputs,
        }));
    }
    Ok(program)
}

fn comparator_program(bench: &ResolvedBench) -> Result<Vec<Stimulus<ComparatorInputs>>, SimError> {
    let width = bench.comparator.width;
    let mut mode = CompareMode::Min;
    let mut words = vec![Word::zero(width); bench.comparator.inputs as usize];
    let mut program = Vec::new();
    for (index, step) in bench.steps.iter().enumerate() {
        if let Some(m) = step.mode {
            mode = m;
        }
        if let Some(values) = &step.inputs {
            words = values
                .iter()
                .enumerate()
                .map(|(i, &v)| to_word(&format!("in{i}"), v, width))
                .collect::<Result<_, _>>()?;
        }
        let inputs = ComparatorInputs {
            reset: step.reset,
            mode,
            words: words.clone(),
        };
        program.extend((0..step.repeat).map(|_| Stimulus {
            step: index,
            inputs: inputs.clone(),
        }));
    }
    Ok(program)
}

type Mismatch = (&'static str, u64, u64);

fn check(found: &mut Vec<Mismatch>, signal: &'static str, expected: Option<u64>, actual: u64) {
    if let Some(expected) = expected {
        if expected != actual {
            found.push((signal, expected, actual));
        }
    }
}

fn fifo_mismatches(out: &FifoOutputs, expect: &Expectation) -> Vec<Mismatch> {
    let mut found = Vec::new();
    check(&mut found, "read_data", expect.read_data, out.read_data.value());
    check(&mut found, "full", expect.full.map(u64::from), u64::from(out.full));
    check(&mut found, "empty", expect.empty.map(u64::from), u64::from(out.empty));
    check(
        &mut found,
        "error_write_full",
        expect.error_write_full.map(u64::from),
        u64::from(out.error_write_full),
    );
    check(
        &mut found,
        "error_read_empty",
        expect.error_read_empty.map(u64::from),
        u64::from(out.error_read_empty),
    );
    found
}

fn comparator_mismatches(out: &ComparatorOutputs, expect: &Expectation) -> Vec<Mismatch> {
    let mut found = Vec::new();
    check(&mut found, "done", expect.done.map(u64::from), u64::from(out.done));
    check(&mut found, "result", expect.result, out.result.value());
    found
}

fn drive<C: Clocked>(
    core: &mut C,
    program: &[Stimulus<C::Inputs>],
    bench: &ResolvedBench,
    mut recorder: Option<&mut dyn WaveformRecorder>,
    mismatches: fn(&C::Outputs, &Expectation) -> Vec<Mismatch>,
) -> Result<(Trace, Vec<ExpectationFailure>), SimError> {
    let signals = core.signals();
    if let Some(rec) = recorder.as_deref_mut() {
        rec.begin_scope(core.name())?;
        for (id, signal) in signals.iter().enumerate() {
            rec.register_signal(id as u32, &signal.name, signal.width)?;
        }
        rec.end_scope()?;
    }

    let period_fs = bench.clock_period.as_fs();
    let mut rows: Vec<TraceRow> = Vec::with_capacity(program.len());
    let mut failures = Vec::new();

    for (tick, stimulus) in program.iter().enumerate() {
        let tick = tick as u64;
        let outputs = core.step(&stimulus.inputs)?;
        core.check_invariants()?;

        let values = core.sample(&stimulus.inputs, &outputs);
        if let Some(rec) = recorder.as_deref_mut() {
            let time_fs = tick
                .checked_mul(period_fs)
                .ok_or(SimError::TimeOverflow { tick, period_fs })?;
            let previous = rows.last().map(|row| &row.values);
            for (id, value) in values.iter().enumerate() {
                if previous.map_or(true, |prev| prev[id] != *value) {
                    rec.record_change(time_fs, id as u32, value)?;
                }
            }
        }

        let step: &StepSpec = &bench.steps[stimulus.step];
        if let Some(expect) = &step.expect {
            failures.extend(mismatches(&outputs, expect).into_iter().map(
                |(signal, expected, actual)| ExpectationFailure {
                    tick,
                    step: stimulus.step,
                    label: step.label.clone(),
                    signal,
                    expected,
                    actual,
                },
            ));
        }

        rows.push(TraceRow { tick, values });
    }

    if let Some(rec) = recorder.as_deref_mut() {
        rec.finalize()?;
    }

    Ok((Trace { signals, rows }, failures))
}

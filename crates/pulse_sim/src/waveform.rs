//! Waveform output for bench runs.
//!
//! [`WaveformRecorder`] is the sink the bench driver writes port changes to.
//! [`VcdRecorder`] renders them as an IEEE 1364 Value Change Dump, readable by
//! GTKWave, Surfer and similar viewers. Time is in femtoseconds.

use std::collections::HashMap;
use std::io::Write;

use pulse_common::Word;

use crate::error::SimError;

/// A sink for per-signal value changes.
pub trait WaveformRecorder {
    /// Declares a signal under the caller-chosen `id`.
    fn register_signal(&mut self, id: u32, name: &str, width: u32) -> Result<(), SimError>;

    /// Opens a module scope; later declarations nest inside it.
    fn begin_scope(&mut self, name: &str) -> Result<(), SimError>;

    /// Closes the innermost open scope.
    fn end_scope(&mut self) -> Result<(), SimError>;

    /// Records that signal `id` took `value` at `time_fs`.
    ///
    /// Times must be non-decreasing across calls.
    fn record_change(&mut self, time_fs: u64, id: u32, value: &Word) -> Result<(), SimError>;

    /// Completes the output and flushes it.
    fn finalize(&mut self) -> Result<(), SimError>;
}

/// Where the recorder is in the VCD layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Nothing written yet.
    Empty,
    /// Header written; scopes and variables may follow.
    Declaring,
    /// Definitions closed; the last `#time` marker written.
    Dumping(u64),
}

/// Writes IEEE 1364 VCD text to any [`Write`] sink.
///
/// Identifier codes are short strings over the printable ASCII range `!`..`~`,
/// assigned in registration order.
pub struct VcdRecorder<W: Write> {
    out: W,
    codes: HashMap<u32, String>,
    phase: Phase,
}

impl<W: Write> VcdRecorder<W> {
    /// Creates a recorder writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            codes: HashMap::new(),
            phase: Phase::Empty,
        }
    }

    /// Consumes the recorder and returns the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn ensure_header(&mut self) -> Result<(), SimError> {
        if self.phase == Phase::Empty {
            write!(
                self.out,
                "$version\n  Pulse cycle model\n$end\n$timescale\n  1fs\n$end\n"
            )?;
            self.phase = Phase::Declaring;
        }
        Ok(())
    }

    /// Bijective base-94 code for the `index`-th registered signal.
    fn id_code(index: usize) -> String {
        let mut code = String::new();
        let mut n = index;
        loop {
            code.push(char::from(b'!' + (n % 94) as u8));
            n /= 94;
            if n == 0 {
                return code;
            }
            n -= 1;
        }
    }
}

impl<W: Write> WaveformRecorder for VcdRecorder<W> {
    fn register_signal(&mut self, id: u32, name: &str, width: u32) -> Result<(), SimError> {
        self.ensure_header()?;
        let code = Self::id_code(self.codes.len());
        writeln!(self.out, "$var wire {width} {code} {name} $end")?;
        self.codes.insert(id, code);
        Ok(())
    }

    fn begin_scope(&mut self, name: &str) -> Result<(), SimError> {
        self.ensure_header()?;
        writeln!(self.out, "$scope module {name} $end")?;
        Ok(())
    }

    fn end_scope(&mut self) -> Result<(), SimError> {
        writeln!(self.out, "$upscope $end")?;
        Ok(())
    }

    fn record_change(&mut self, time_fs: u64, id: u32, value: &Word) -> Result<(), SimError> {
        self.ensure_header()?;
        match self.phase {
            Phase::Dumping(t) if t == time_fs => {}
            Phase::Dumping(_) => writeln!(self.out, "#{time_fs}")?,
            Phase::Empty | Phase::Declaring => {
                write!(self.out, "$enddefinitions $end\n$dumpvars\n#{time_fs}\n")?
            }
        }
        self.phase = Phase::Dumping(time_fs);

        let code = self.codes.get(&id).ok_or(SimError::UnregisteredSignal(id))?;
        if value.width() == 1 {
            writeln!(self.out, "{}{code}", value.value())?;
        } else {
            writeln!(self.out, "b{} {code}", value.to_binary_string())?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SimError> {
        if !matches!(self.phase, Phase::Dumping(_)) {
            self.ensure_header()?;
            writeln!(self.out, "$enddefinitions $end")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

//! The per-tick step interface shared by all cores, and signal metadata.
//!
//! Every output of a core has an explicit [`TimingClass`]. A *registered*
//! output holds a value stored at the last tick boundary; a *combinational*
//! output is recomputed from the current state (and, for the comparator
//! result, the current inputs) without storage delay. Getting a class wrong
//! breaks cycle equivalence, so cores report it through [`Clocked::signals`].

use pulse_common::{PulseResult, Word};
use serde::Serialize;
use std::fmt;

use crate::error::SimError;

/// Direction of a core port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Driven by the external driver.
    Input,
    /// Driven by the core.
    Output,
}

/// How an output relates to the tick boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimingClass {
    /// Stored at the tick boundary; one tick of latency from its condition.
    Registered,
    /// Recomputed from current state and inputs with no storage delay.
    Combinational,
}

impl fmt::Display for TimingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingClass::Registered => write!(f, "registered"),
            TimingClass::Combinational => write!(f, "combinational"),
        }
    }
}

/// Name, width, direction and timing of one core port.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignalInfo {
    /// Port name, used for waveform variables and trace columns.
    pub name: String,
    /// Bit width.
    pub width: u32,
    /// Port direction.
    pub direction: Direction,
    /// Timing class; `None` for inputs.
    pub timing: Option<TimingClass>,
}

impl SignalInfo {
    /// Describes an input port.
    pub fn input(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            width,
            direction: Direction::Input,
            timing: None,
        }
    }

    /// Describes an output port with the given timing class.
    pub fn output(name: impl Into<String>, width: u32, timing: TimingClass) -> Self {
        Self {
            name: name.into(),
            width,
            direction: Direction::Output,
            timing: Some(timing),
        }
    }
}

/// A synchronous state machine advanced one tick at a time.
///
/// `step` consumes exactly the inputs presented for one tick and commits the
/// next state atomically, as if every register were updated simultaneously
/// at the tick boundary. The returned outputs are the values visible after
/// that boundary.
pub trait Clocked {
    /// Inputs presented for one tick.
    type Inputs: Clone + fmt::Debug;
    /// Outputs visible after a tick.
    type Outputs: Clone + fmt::Debug + PartialEq;

    /// Short module name used for waveform scopes.
    fn name(&self) -> &'static str;

    /// Rejects inputs the core cannot accept this tick, without changing state.
    ///
    /// Only ports the tick would actually sample are checked. `step` returns
    /// the same error for the same inputs.
    fn validate_inputs(&self, _inputs: &Self::Inputs) -> Result<(), SimError> {
        Ok(())
    }

    /// Advances one tick.
    fn step(&mut self, inputs: &Self::Inputs) -> Result<Self::Outputs, SimError>;

    /// Returns the outputs as of the last tick boundary.
    fn outputs(&self) -> Self::Outputs;

    /// Describes every port, inputs first, in the order used by [`sample`](Self::sample).
    fn signals(&self) -> Vec<SignalInfo>;

    /// Flattens one tick's inputs and outputs into words aligned with
    /// [`signals`](Self::signals).
    fn sample(&self, inputs: &Self::Inputs, outputs: &Self::Outputs) -> Vec<Word>;

    /// Checks the core's state invariants.
    fn check_invariants(&self) -> PulseResult<()> {
        Ok(())
    }
}

/// Inputs that carry a reset level.
pub trait ResetInput {
    /// Drives the reset level for the tick.
    fn set_reset(&mut self, reset: bool);
}

/// Encodes a boolean as a 1-bit word.
pub(crate) fn bit(value: bool) -> Word {
    Word::from_u64(u64::from(value), 1)
}

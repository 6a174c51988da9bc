//! Reset-triggered extremum selector with a one-shot result window.
//!
//! While reset is asserted the core re-captures its `N` input words every
//! tick. On the first tick after release it sorts the captured words in
//! ascending order and raises `done`; on the following tick `done` clears
//! unconditionally and the core idles until reset is asserted again.
//!
//! `done` is registered. `result` is combinational on `done` and the mode
//! presented in the same tick: `captured[0]` for [`CompareMode::Min`],
//! `captured[N-1]` for [`CompareMode::Max`], zero while `done` is low.

use pulse_common::{InternalError, PackedBus, PulseResult, Word};
use pulse_config::{CompareMode, ComparatorParams};
use serde::Serialize;

use crate::clocked::{bit, Clocked, ResetInput, SignalInfo, TimingClass};
use crate::error::SimError;

/// Phase of the capture/sort/one-shot sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ComparatorState {
    /// Reset asserted this tick; inputs captured, sort pending.
    Capturing,
    /// Sorted this tick; `done` is high.
    SortedValid,
    /// Result window closed; waiting for reset.
    IdleWait,
}

/// Inputs presented to the comparator for one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComparatorInputs {
    /// Reset level.
    pub reset: bool,
    /// Output selection.
    pub mode: CompareMode,
    /// The input vector as `N` words. Only sampled while reset is asserted.
    pub words: Vec<Word>,
}

impl ComparatorInputs {
    /// Reset asserted with the given input words.
    pub fn capture(words: Vec<Word>, mode: CompareMode) -> Self {
        Self {
            reset: true,
            mode,
            words,
        }
    }

    /// Reset released; the input vector is not sampled.
    pub fn run(mode: CompareMode) -> Self {
        Self {
            reset: false,
            mode,
            words: Vec::new(),
        }
    }

    /// Builds inputs from a packed `N·W`-bit bus, field 0 in the
    /// least-significant bits.
    pub fn from_packed(
        reset: bool,
        mode: CompareMode,
        bus: &PackedBus,
        params: &ComparatorParams,
    ) -> Result<Self, SimError> {
        let words = bus
            .split(params.inputs, params.width)
            .ok_or_else(|| SimError::WidthMismatch {
                signal: "input_words".to_string(),
                expected: params.inputs.saturating_mul(params.width),
                actual: bus.width(),
            })?;
        Ok(Self { reset, mode, words })
    }
}

impl ResetInput for ComparatorInputs {
    fn set_reset(&mut self, reset: bool) {
        self.reset = reset;
    }
}

/// Comparator outputs visible after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ComparatorOutputs {
    /// Selected extremum while `done`, else zero.
    pub result: Word,
    /// High for exactly one tick per capture/release cycle.
    pub done: bool,
}

/// Cycle-accurate model of the comparator core.
#[derive(Clone, Debug)]
pub struct ComparatorCore {
    params: ComparatorParams,
    captured: Vec<u64>,
    state: ComparatorState,
    mode: CompareMode,
}

impl ComparatorCore {
    /// Builds a comparator idling with an all-zero capture.
    ///
    /// Nothing is sorted until reset has been asserted and released.
    pub fn new(params: ComparatorParams) -> Result<Self, SimError> {
        if params.width == 0 || params.width > pulse_common::MAX_WORD_WIDTH {
            return Err(SimError::InvalidParameter {
                reason: format!("comparator width {} outside 1..=64", params.width),
            });
        }
        if params.inputs == 0 || params.inputs > pulse_common::MAX_COMPARATOR_INPUTS {
            return Err(SimError::InvalidParameter {
                reason: format!(
                    "comparator input count {} outside 1..={}",
                    params.inputs,
                    pulse_common::MAX_COMPARATOR_INPUTS
                ),
            });
        }
        Ok(Self {
            params,
            captured: vec![0; params.inputs as usize],
            state: ComparatorState::IdleWait,
            mode: CompareMode::Min,
        })
    }

    /// Returns the construction parameters.
    pub fn params(&self) -> &ComparatorParams {
        &self.params
    }

    /// Current phase.
    pub fn state(&self) -> ComparatorState {
        self.state
    }

    /// The captured words; ascending once the sort has run.
    pub fn captured(&self) -> Vec<Word> {
        self.captured
            .iter()
            .map(|&v| Word::from_u64(v, self.params.width))
            .collect()
    }

    fn capture(&mut self, words: &[Word]) {
        for (slot, word) in self.captured.iter_mut().zip(words) {
            *slot = word.value();
        }
    }
}

/// Sorts in ascending order by insertion: each element is shifted left past
/// every preceding element greater than it.
pub fn insertion_sort(values: &mut [u64]) {
    for i in 1..values.len() {
        let key = values[i];
        let mut j = i;
        while j > 0 && values[j - 1] > key {
            values[j] = values[j - 1];
            j -= 1;
        }
        values[j] = key;
    }
}

impl Clocked for ComparatorCore {
    type Inputs = ComparatorInputs;
    type Outputs = ComparatorOutputs;

    fn name(&self) -> &'static str {
        "comparator"
    }

    fn validate_inputs(&self, inputs: &ComparatorInputs) -> Result<(), SimError> {
        // Input words are only sampled while reset is asserted.
        if !inputs.reset {
            return Ok(());
        }
        if inputs.words.len() != self.captured.len() {
            return Err(SimError::InputCountMismatch {
                what: "input words",
                expected: self.captured.len(),
                actual: inputs.words.len(),
            });
        }
        if let Some(bad) = inputs.words.iter().find(|w| w.width() != self.params.width) {
            return Err(SimError::WidthMismatch {
                signal: "input_words".to_string(),
                expected: self.params.width,
                actual: bad.width(),
            });
        }
        Ok(())
    }

    fn step(&mut self, inputs: &ComparatorInputs) -> Result<ComparatorOutputs, SimError> {
        self.validate_inputs(inputs)?;
        if inputs.reset {
            self.capture(&inputs.words);
            self.state = ComparatorState::Capturing;
        } else {
            self.state = match self.state {
                ComparatorState::Capturing => {
                    insertion_sort(&mut self.captured);
                    ComparatorState::SortedValid
                }
                ComparatorState::SortedValid | ComparatorState::IdleWait => {
                    ComparatorState::IdleWait
                }
            };
        }
        self.mode = inputs.mode;
        Ok(self.outputs())
    }

    fn outputs(&self) -> ComparatorOutputs {
        let done = self.state == ComparatorState::SortedValid;
        let result = match (done, self.mode) {
            (false, _) => 0,
            (true, CompareMode::Min) => self.captured[0],
            (true, CompareMode::Max) => self.captured[self.captured.len() - 1],
        };
        ComparatorOutputs {
            result: Word::from_u64(result, self.params.width),
            done,
        }
    }

    fn signals(&self) -> Vec<SignalInfo> {
        let width = self.params.width;
        let mut signals = vec![SignalInfo::input("reset", 1), SignalInfo::input("mode", 1)];
        signals.extend((0..self.params.inputs).map(|i| SignalInfo::input(format!("in{i}"), width)));
        signals.push(SignalInfo::output("done", 1, TimingClass::Registered));
        signals.push(SignalInfo::output("result", width, TimingClass::Combinational));
        signals
    }

    fn sample(&self, inputs: &ComparatorInputs, outputs: &ComparatorOutputs) -> Vec<Word> {
        let mut sample = vec![bit(inputs.reset), bit(inputs.mode == CompareMode::Max)];
        sample.extend((0..self.params.inputs as usize).map(|i| {
            inputs
                .words
                .get(i)
                .copied()
                .unwrap_or_else(|| Word::zero(self.params.width))
        }));
        sample.push(bit(outputs.done));
        sample.push(outputs.result);
        sample
    }

    fn check_invariants(&self) -> PulseResult<()> {
        if self.captured.len() != self.params.inputs as usize {
            return Err(InternalError::new(format!(
                "comparator holds {} words, expected {}",
                self.captured.len(),
                self.params.inputs
            )));
        }
        if self.state == ComparatorState::SortedValid
            && self.captured.windows(2).any(|pair| pair[0] > pair[1])
        {
            return Err(InternalError::new("comparator result window open on unsorted data"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ComparatorParams {
        ComparatorParams {
            width: 16,
            inputs: 4,
        }
    }

    fn words(values: &[u64]) -> Vec<Word> {
        values.iter().map(|&v| Word::from_u64(v, 16)).collect()
    }

    #[test]
    fn insertion_sort_orders_ascending() {
        let mut v = vec![45, 3, 29, 88, 3, 0];
        insertion_sort(&mut v);
        assert_eq!(v, vec![0, 3, 3, 29, 45, 88]);

        let mut single = vec![7];
        insertion_sort(&mut single);
        assert_eq!(single, vec![7]);

        let mut empty: Vec<u64> = Vec::new();
        insertion_sort(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn rejects_bad_params() {
        assert!(ComparatorCore::new(ComparatorParams { width: 0, inputs: 4 }).is_err());
        assert!(ComparatorCore::new(ComparatorParams { width: 8, inputs: 0 }).is_err());
        let inputs = pulse_common::MAX_COMPARATOR_INPUTS + 1;
        assert!(ComparatorCore::new(ComparatorParams { width: 8, inputs }).is_err());
    }

    #[test]
    fn idle_until_first_reset() {
        let mut c = ComparatorCore::new(params()).unwrap();
        for _ in 0..3 {
            let out = c.step(&ComparatorInputs::run(CompareMode::Max)).unwrap();
            assert!(!out.done);
            assert!(out.result.is_zero());
        }
        assert_eq!(c.state(), ComparatorState::IdleWait);
    }

    #[test]
    fn capture_sort_one_shot() {
        let mut c = ComparatorCore::new(params()).unwrap();
        let out = c
            .step(&ComparatorInputs::capture(words(&[45, 3, 29, 88]), CompareMode::Min))
            .unwrap();
        assert!(!out.done);
        assert_eq!(c.state(), ComparatorState::Capturing);

        let out = c.step(&ComparatorInputs::run(CompareMode::Min)).unwrap();
        assert!(out.done);
        assert_eq!(out.result.value(), 3);
        assert_eq!(c.captured(), words(&[3, 29, 45, 88]));
        c.check_invariants().unwrap();

        let out = c.step(&ComparatorInputs::run(CompareMode::Min)).unwrap();
        assert!(!out.done);
        assert!(out.result.is_zero());

        for _ in 0..4 {
            let out = c.step(&ComparatorInputs::run(CompareMode::Min)).unwrap();
            assert!(!out.done);
        }
    }

    #[test]
    fn result_follows_mode_in_same_tick() {
        let mut c = ComparatorCore::new(params()).unwrap();
        c.step(&ComparatorInputs::capture(words(&[45, 3, 29, 88]), CompareMode::Min))
            .unwrap();
        let out = c.step(&ComparatorInputs::run(CompareMode::Max)).unwrap();
        assert_eq!(out.result.value(), 88);
    }

    #[test]
    fn held_reset_recaptures_last_vector() {
        let mut c = ComparatorCore::new(params()).unwrap();
        c.step(&ComparatorInputs::capture(words(&[1, 2, 3, 4]), CompareMode::Max))
            .unwrap();
        c.step(&ComparatorInputs::capture(words(&[9, 8, 7, 100]), CompareMode::Max))
            .unwrap();
        let out = c.step(&ComparatorInputs::run(CompareMode::Max)).unwrap();
        assert!(out.done);
        assert_eq!(out.result.value(), 100);
    }

    #[test]
    fn reset_during_result_window_restarts() {
        let mut c = ComparatorCore::new(params()).unwrap();
        c.step(&ComparatorInputs::capture(words(&[5, 6, 7, 8]), CompareMode::Min))
            .unwrap();
        c.step(&ComparatorInputs::run(CompareMode::Min)).unwrap();
        let out = c
            .step(&ComparatorInputs::capture(words(&[50, 60, 2, 80]), CompareMode::Min))
            .unwrap();
        assert!(!out.done);
        let out = c.step(&ComparatorInputs::run(CompareMode::Min)).unwrap();
        assert!(out.done);
        assert_eq!(out.result.value(), 2);
    }

    #[test]
    fn single_input() {
        let mut c = ComparatorCore::new(ComparatorParams { width: 8, inputs: 1 }).unwrap();
        c.step(&ComparatorInputs::capture(
            vec![Word::from_u64(0x42, 8)],
            CompareMode::Max,
        ))
        .unwrap();
        let out = c.step(&ComparatorInputs::run(CompareMode::Min)).unwrap();
        assert_eq!(out.result.value(), 0x42);
    }

    #[test]
    fn capture_validates_inputs() {
        let mut c = ComparatorCore::new(params()).unwrap();
        let err = c
            .step(&ComparatorInputs::capture(words(&[1, 2]), CompareMode::Min))
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::InputCountMismatch { expected: 4, actual: 2, .. }
        ));
        let narrow = vec![Word::from_u64(1, 8); 4];
        let err = c
            .step(&ComparatorInputs::capture(narrow, CompareMode::Min))
            .unwrap_err();
        assert!(matches!(err, SimError::WidthMismatch { .. }));
        assert_eq!(c.state(), ComparatorState::IdleWait);
    }

    #[test]
    fn words_ignored_while_running() {
        let mut c = ComparatorCore::new(params()).unwrap();
        c.step(&ComparatorInputs::capture(words(&[4, 3, 2, 1]), CompareMode::Min))
            .unwrap();
        let inputs = ComparatorInputs {
            reset: false,
            mode: CompareMode::Min,
            words: words(&[0, 0]),
        };
        let out = c.step(&inputs).unwrap();
        assert_eq!(out.result.value(), 1);
    }

    #[test]
    fn from_packed_splits_fields() {
        let bus = PackedBus::from_words(&words(&[45, 3, 29, 88]));
        let inputs =
            ComparatorInputs::from_packed(true, CompareMode::Max, &bus, &params()).unwrap();
        assert_eq!(inputs.words, words(&[45, 3, 29, 88]));

        let short = PackedBus::new(48);
        assert!(ComparatorInputs::from_packed(true, CompareMode::Max, &short, &params()).is_err());
    }

    #[test]
    fn signals_document_timing() {
        let c = ComparatorCore::new(params()).unwrap();
        let signals = c.signals();
        assert_eq!(signals.len(), 2 + 4 + 2);
        let done = signals.iter().find(|s| s.name == "done").unwrap();
        assert_eq!(done.timing, Some(TimingClass::Registered));
        let result = signals.iter().find(|s| s.name == "result").unwrap();
        assert_eq!(result.timing, Some(TimingClass::Combinational));

        let sample = c.sample(&ComparatorInputs::run(CompareMode::Max), &c.outputs());
        assert_eq!(sample.len(), signals.len());
        assert_eq!(sample[1], bit(true));
    }
}

//! Side-by-side replication of independent cores.
//!
//! A [`CoreArray`] holds `n` instances built from the same parameters and
//! steps each one once per tick with its own inputs. Instances share nothing
//! but the tick; there is no cross-instance ordering or coordination.

use pulse_config::{ComparatorParams, FifoParams};

use crate::clocked::{Clocked, ResetInput};
use crate::comparator::ComparatorCore;
use crate::error::SimError;
use crate::fifo::FifoCore;

/// A fixed set of independently stepped cores.
#[derive(Clone, Debug)]
pub struct CoreArray<C> {
    cores: Vec<C>,
}

impl<C: Clocked> CoreArray<C> {
    /// Builds `count` instances, calling `build` with each instance index.
    pub fn new(
        count: usize,
        mut build: impl FnMut(usize) -> Result<C, SimError>,
    ) -> Result<Self, SimError> {
        let cores = (0..count).map(&mut build).collect::<Result<_, _>>()?;
        Ok(Self { cores })
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.cores.len()
    }

    /// True if the array holds no instances.
    pub fn is_empty(&self) -> bool {
        self.cores.is_empty()
    }

    /// Returns instance `index`, if present.
    pub fn get(&self, index: usize) -> Option<&C> {
        self.cores.get(index)
    }

    /// Iterates over the instances in index order.
    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.cores.iter()
    }

    /// Steps every instance once, instance `i` receiving `inputs[i]`.
    ///
    /// Every instance's inputs are validated before any instance advances, so
    /// a rejected tick leaves the whole array untouched.
    pub fn step(&mut self, inputs: &[C::Inputs]) -> Result<Vec<C::Outputs>, SimError> {
        if inputs.len() != self.cores.len() {
            return Err(SimError::InputCountMismatch {
                what: "instance inputs",
                expected: self.cores.len(),
                actual: inputs.len(),
            });
        }
        for (core, input) in self.cores.iter().zip(inputs) {
            core.validate_inputs(input)?;
        }
        self.cores
            .iter_mut()
            .zip(inputs)
            .map(|(core, input)| core.step(input))
            .collect()
    }

    /// Current outputs of every instance.
    pub fn outputs(&self) -> Vec<C::Outputs> {
        self.cores.iter().map(Clocked::outputs).collect()
    }
}

impl<C> CoreArray<C>
where
    C: Clocked,
    C::Inputs: ResetInput,
{
    /// Steps every instance with a shared reset level driven onto its inputs.
    pub fn step_with_reset(
        &mut self,
        reset: bool,
        inputs: &[C::Inputs],
    ) -> Result<Vec<C::Outputs>, SimError> {
        let driven: Vec<C::Inputs> = inputs
            .iter()
            .cloned()
            .map(|mut input| {
                input.set_reset(reset);
                input
            })
            .collect();
        self.step(&driven)
    }
}

impl CoreArray<FifoCore> {
    /// Builds `count` FIFOs with identical parameters.
    pub fn fifos(count: usize, params: FifoParams) -> Result<Self, SimError> {
        Self::new(count, |_| FifoCore::new(params))
    }
}

impl CoreArray<ComparatorCore> {
    /// Builds `count` comparators with identical parameters.
    pub fn comparators(count: usize, params: ComparatorParams) -> Result<Self, SimError> {
        Self::new(count, |_| ComparatorCore::new(params))
    }
}

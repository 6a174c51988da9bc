//! Independence of replicated core instances.

use pulse_common::Word;
use pulse_conformance::{comparator_params, fifo_params, words, ReferenceFifo};
use pulse_config::CompareMode;
use pulse_sim::{ComparatorInputs, ComparatorState, CoreArray, FifoInputs, SimError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn each_fifo_instance_tracks_its_own_reference() {
    let params = fifo_params(8, 4);
    let count = 5;
    let mut array = CoreArray::fifos(count, params).unwrap();
    let mut models: Vec<ReferenceFifo> = (0..count).map(|_| ReferenceFifo::new(params)).collect();
    let mut rng = StdRng::seed_from_u64(31);

    for _ in 0..1_000 {
        let inputs: Vec<FifoInputs> = (0..count)
            .map(|_| {
                let data = Word::from_u64(rng.gen_range(0..256), 8);
                match rng.gen_range(0..3) {
                    0 => FifoInputs::write(data),
                    1 => FifoInputs::read(8),
                    _ => FifoInputs::idle(8),
                }
            })
            .collect();
        let outputs = array.step(&inputs).unwrap();
        for ((out, model), input) in outputs.iter().zip(models.iter_mut()).zip(&inputs) {
            assert_eq!(*out, model.step(input));
        }
    }
    for (core, model) in array.iter().zip(&models) {
        assert_eq!(core.contents(), model.contents());
    }
}

#[test]
fn shared_reset_reaches_every_comparator() {
    let mut array = CoreArray::comparators(3, comparator_params(8, 2)).unwrap();
    let captures = vec![
        ComparatorInputs::capture(words(&[4, 9], 8), CompareMode::Min),
        ComparatorInputs::capture(words(&[7, 1], 8), CompareMode::Max),
        ComparatorInputs::capture(words(&[5, 5], 8), CompareMode::Min),
    ];
    array.step(&captures).unwrap();

    let mut runs = captures.clone();
    let outputs = array.step_with_reset(false, &runs).unwrap();
    let results: Vec<u64> = outputs.iter().map(|o| o.result.value()).collect();
    assert_eq!(results, vec![4, 7, 5]);

    for run in &mut runs {
        run.words = words(&[2, 3], 8);
    }
    let outputs = array.step_with_reset(true, &runs).unwrap();
    assert!(outputs.iter().all(|o| !o.done));
    let outputs = array.step_with_reset(false, &runs).unwrap();
    assert!(outputs.iter().all(|o| o.done));
}

#[test]
fn input_slice_length_must_match() {
    let mut array = CoreArray::comparators(2, comparator_params(8, 2)).unwrap();
    let err = array
        .step(&[ComparatorInputs::run(CompareMode::Min)])
        .unwrap_err();
    assert!(matches!(err, SimError::InputCountMismatch { expected: 2, actual: 1, .. }));
}

#[test]
fn rejected_tick_leaves_every_instance_unchanged() {
    let mut array = CoreArray::fifos(3, fifo_params(8, 4)).unwrap();
    array
        .step(&[
            FifoInputs::write(Word::from_u64(7, 8)),
            FifoInputs::idle(8),
            FifoInputs::idle(8),
        ])
        .unwrap();

    let err = array
        .step(&[
            FifoInputs::write(Word::from_u64(1, 8)),
            FifoInputs::read(8),
            FifoInputs::write(Word::from_u64(1, 16)),
        ])
        .unwrap_err();
    assert!(matches!(err, SimError::WidthMismatch { expected: 8, actual: 16, .. }));

    let counts: Vec<u32> = array.iter().map(|f| f.count()).collect();
    assert_eq!(counts, vec![1, 0, 0]);
    assert_eq!(array.get(0).unwrap().contents(), vec![Word::from_u64(7, 8)]);
}

#[test]
fn rejected_capture_leaves_every_comparator_unchanged() {
    let mut array = CoreArray::comparators(2, comparator_params(8, 2)).unwrap();
    let err = array
        .step(&[
            ComparatorInputs::capture(words(&[1, 2], 8), CompareMode::Min),
            ComparatorInputs::capture(words(&[1], 8), CompareMode::Min),
        ])
        .unwrap_err();
    assert!(matches!(err, SimError::InputCountMismatch { expected: 2, actual: 1, .. }));
    assert!(array.iter().all(|c| c.state() == ComparatorState::IdleWait));
}

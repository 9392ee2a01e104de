//! Tests for the controlled-phase applicator.

use num_complex::Complex64;
use proptest::prelude::*;
use qtunnel_sim::SimError;
use qtunnel_sim::layout::RegisterLayout;
use qtunnel_sim::phase::{ControlPattern, ControlledPhase, PhaseBlock, apply_controlled_phase};

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn mismatched_pattern_is_invalid_argument() {
    let err = ControlPattern::new(vec![0], vec![true, false]).unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(matches!(err, SimError::ControlLengthMismatch { .. }));
}

#[test]
fn duplicate_control_wire_is_rejected() {
    let layout = RegisterLayout::new(2).unwrap();
    let pattern = ControlPattern::new(vec![1, 1], vec![true, true]).unwrap();
    let block = PhaseBlock::propagator(0, 0.1, 0.0, 1.0);
    assert!(matches!(
        ControlledPhase::compile(&layout, &pattern, &block),
        Err(SimError::DuplicateWire(1))
    ));
}

// ---------------------------------------------------------------------------
// Subspace invariance
// ---------------------------------------------------------------------------

type PhaseCase = (RegisterLayout, Vec<Complex64>, Vec<usize>, Vec<bool>, usize);

/// A layout, a random state, a random control pattern and a free wire that
/// is not one of the control wires.
fn arb_case() -> impl Strategy<Value = PhaseCase> {
    (1_usize..=3).prop_flat_map(|width| {
        let layout = RegisterLayout::new(width).unwrap();
        let n_wires = layout.n_wires();
        (
            Just(layout),
            prop::collection::vec((-1.0_f64..1.0, -1.0_f64..1.0), layout.dim()),
            Just((0..n_wires).collect::<Vec<usize>>()).prop_shuffle(),
            prop::collection::vec(any::<bool>(), n_wires),
            0..n_wires,
        )
            .prop_map(|(layout, amps, wires, values, n_controls)| {
                let amps: Vec<Complex64> =
                    amps.into_iter().map(|(re, im)| Complex64::new(re, im)).collect();
                // Last shuffled wire is the free wire; a prefix of the rest
                // are controls.
                let free = wires[wires.len() - 1];
                let controls = wires[..n_controls].to_vec();
                let values = values[..n_controls].to_vec();
                (layout, amps, controls, values, free)
            })
    })
}

proptest! {
    #[test]
    fn non_matching_amplitudes_are_bit_identical(
        (layout, original, controls, values, free) in arb_case(),
        theta0 in -3.0_f64..3.0,
        theta1 in -3.0_f64..3.0,
    ) {
        let pattern = ControlPattern::new(controls.clone(), values.clone()).unwrap();
        let p0 = Complex64::from_polar(1.0, theta0);
        let p1 = Complex64::from_polar(1.0, theta1);
        let mut amps = original.clone();
        let block = PhaseBlock::new(free, p0, p1);
        apply_controlled_phase(&layout, &mut amps, &pattern, &block).unwrap();

        for index in 0..layout.dim() {
            let bit = |wire: usize| (index >> layout.bit_of_wire(wire).unwrap()) & 1 == 1;
            let matches = controls.iter().zip(&values).all(|(&w, &v)| bit(w) == v);
            if matches {
                let p = if bit(free) { p1 } else { p0 };
                prop_assert_eq!(amps[index], original[index] * p);
            } else {
                prop_assert_eq!(amps[index], original[index]);
            }
        }
    }

    #[test]
    fn unit_phases_preserve_norm(
        (layout, original, controls, values, free) in arb_case(),
        theta in -3.0_f64..3.0,
    ) {
        let pattern = ControlPattern::new(controls, values).unwrap();
        let mut amps = original.clone();
        let block = PhaseBlock::propagator(free, 1.0, theta, -theta);
        apply_controlled_phase(&layout, &mut amps, &pattern, &block).unwrap();
        let before: f64 = original.iter().map(|a| a.norm_sqr()).sum();
        let after: f64 = amps.iter().map(|a| a.norm_sqr()).sum();
        prop_assert!((before - after).abs() < 1e-12);
    }
}

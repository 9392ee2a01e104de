//! Controlled diagonal phases.
//!
//! A [`PhaseBlock`] carries two unit multipliers `[p₀, p₁]` keyed on the value
//! of one free wire. A [`ControlPattern`] restricts the block to the basis
//! states whose control wires hold the required bits. Every other amplitude
//! is left untouched.
//!
//! The pair is compiled into a [`ControlledPhase`], which is just a mask,
//! a required value, and the free-wire mask:
//!
//!   i participates  ⇔  i & control_mask == control_value
//!   amp[i] *= p[(i & free_mask) != 0]

use num_complex::Complex64;

use crate::error::{SimError, SimResult};
use crate::layout::{RegisterLayout, bits};

/// Wires paired with the bit each must hold.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControlPattern {
    wires: Vec<usize>,
    values: Vec<bool>,
}

impl ControlPattern {
    /// Pair control wires with required values.
    ///
    /// Fails when the two lists differ in length.
    pub fn new(wires: Vec<usize>, values: Vec<bool>) -> SimResult<Self> {
        if wires.len() != values.len() {
            return Err(SimError::ControlLengthMismatch {
                wires: wires.len(),
                values: values.len(),
            });
        }
        Ok(Self { wires, values })
    }

    /// Require `wires` (most significant first) to spell out `value`.
    pub fn from_value(wires: impl IntoIterator<Item = usize>, value: usize) -> Self {
        let wires: Vec<usize> = wires.into_iter().collect();
        let values = bits(value, wires.len());
        Self { wires, values }
    }

    /// The control wires.
    pub fn wires(&self) -> &[usize] {
        &self.wires
    }

    /// The required bit on each control wire.
    pub fn values(&self) -> &[bool] {
        &self.values
    }

    /// Number of control wires.
    pub fn len(&self) -> usize {
        self.wires.len()
    }

    /// True when the pattern constrains nothing.
    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }
}

/// Two diagonal multipliers selected by the value of a free wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseBlock {
    /// Wire whose bit picks `phases[0]` or `phases[1]`.
    pub free_wire: usize,
    /// Multipliers for free bit 0 and free bit 1.
    pub phases: [Complex64; 2],
}

impl PhaseBlock {
    /// Create a block from explicit multipliers.
    pub fn new(free_wire: usize, p0: Complex64, p1: Complex64) -> Self {
        Self {
            free_wire,
            phases: [p0, p1],
        }
    }

    /// Create the propagator block `[exp(-i·dt·e₀), exp(-i·dt·e₁)]`.
    pub fn propagator(free_wire: usize, dt: f64, e0: f64, e1: f64) -> Self {
        Self::new(
            free_wire,
            Complex64::from_polar(1.0, -dt * e0),
            Complex64::from_polar(1.0, -dt * e1),
        )
    }
}

/// A control pattern and phase block reduced to bit masks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlledPhase {
    control_mask: usize,
    control_value: usize,
    free_mask: usize,
    phases: [Complex64; 2],
}

impl ControlledPhase {
    /// Validate the pattern against the layout and build the masks.
    pub fn compile(
        layout: &RegisterLayout,
        pattern: &ControlPattern,
        block: &PhaseBlock,
    ) -> SimResult<Self> {
        let free_mask = 1 << layout.bit_of_wire(block.free_wire)?;

        let mut control_mask = 0;
        let mut control_value = 0;
        for (&wire, &value) in pattern.wires.iter().zip(&pattern.values) {
            let bit = 1 << layout.bit_of_wire(wire)?;
            if bit & (control_mask | free_mask) != 0 {
                return Err(SimError::DuplicateWire(wire));
            }
            control_mask |= bit;
            if value {
                control_value |= bit;
            }
        }

        Ok(Self {
            control_mask,
            control_value,
            free_mask,
            phases: block.phases,
        })
    }

    /// True if basis index `index` lies in the controlled subspace.
    #[inline]
    pub fn matches(&self, index: usize) -> bool {
        index & self.control_mask == self.control_value
    }

    /// Multiply every participating amplitude by its free-bit phase.
    pub fn apply(&self, amplitudes: &mut [Complex64]) {
        for (i, amp) in amplitudes.iter_mut().enumerate() {
            if self.matches(i) {
                *amp *= self.phases[usize::from(i & self.free_mask != 0)];
            }
        }
    }
}

/// Apply `block` to the basis states matching `pattern`.
pub fn apply_controlled_phase(
    layout: &RegisterLayout,
    amplitudes: &mut [Complex64],
    pattern: &ControlPattern,
    block: &PhaseBlock,
) -> SimResult<()> {
    ControlledPhase::compile(layout, pattern, block)?.apply(amplitudes);
    Ok(())
}

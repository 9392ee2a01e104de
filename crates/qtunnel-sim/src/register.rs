//! Amplitude storage for the two-particle register.

use num_complex::Complex64;

use crate::error::{SimError, SimResult};
use crate::layout::{Particle, RegisterLayout};
use crate::phase::{ControlPattern, ControlledPhase, PhaseBlock};
use crate::qft::{self, Direction};

/// The joint state of both particle registers (2^(2N) amplitudes).
#[derive(Debug, Clone)]
pub struct Register {
    /// The state amplitudes, indexed by `x1 · 2^N + x2`.
    amplitudes: Vec<Complex64>,
    layout: RegisterLayout,
}

impl Register {
    /// Create a register initialized to |0...0⟩.
    pub fn new(layout: RegisterLayout) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); layout.dim()];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self { amplitudes, layout }
    }

    /// Create a register in the fixed starting configuration.
    pub fn initial(layout: RegisterLayout) -> Self {
        let mut register = Self::new(layout);
        register.set_index(layout.initial_index());
        register
    }

    /// The register layout.
    pub fn layout(&self) -> &RegisterLayout {
        &self.layout
    }

    /// Read-only view of the amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Mutable view for the transform and phase primitives.
    pub fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    /// Reset to the basis state spelled by `pattern` (one bit per wire,
    /// wire 0 first).
    pub fn initialize(&mut self, pattern: &[bool]) -> SimResult<()> {
        let expected = self.layout.n_wires();
        if pattern.len() != expected {
            return Err(SimError::PatternLength {
                expected,
                got: pattern.len(),
            });
        }
        let index = pattern
            .iter()
            .fold(0usize, |acc, &bit| (acc << 1) | usize::from(bit));
        self.set_index(index);
        Ok(())
    }

    /// Reset to the basis state with particle 1 at `x1` and particle 2 at `x2`.
    pub fn set_positions(&mut self, x1: usize, x2: usize) -> SimResult<()> {
        self.layout.check_position(x1)?;
        self.layout.check_position(x2)?;
        self.set_index(self.layout.encode(x1, x2));
        Ok(())
    }

    fn set_index(&mut self, index: usize) {
        self.amplitudes.fill(Complex64::new(0.0, 0.0));
        self.amplitudes[index] = Complex64::new(1.0, 0.0);
    }

    /// Apply a compiled controlled phase.
    pub fn apply_phase(&mut self, phase: &ControlledPhase) {
        phase.apply(&mut self.amplitudes);
    }

    /// Apply a phase block restricted to `pattern`.
    pub fn apply_controlled_phase(
        &mut self,
        pattern: &ControlPattern,
        block: &PhaseBlock,
    ) -> SimResult<()> {
        let phase = ControlledPhase::compile(&self.layout, pattern, block)?;
        self.apply_phase(&phase);
        Ok(())
    }

    /// Change one particle's register between position and momentum bases.
    pub fn transform(&mut self, particle: Particle, direction: Direction) {
        qft::apply(&self.layout, &mut self.amplitudes, particle, direction);
    }

    /// Squared magnitudes of every amplitude.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Σ |amp|².
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Rescale to unit norm. No-op for the zero vector.
    pub fn renormalize(&mut self) {
        let norm = self.norm_sqr().sqrt();
        if norm > 0.0 {
            for amp in &mut self.amplitudes {
                *amp /= norm;
            }
        }
    }
}

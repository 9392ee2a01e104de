//! Split-operator Hamiltonian step.
//!
//! The two-particle Hamiltonian is split into a kinetic part, diagonal in the
//! momentum basis of each register, and a potential part, diagonal in the
//! joint position basis:
//!
//!   H = T(k₁) + T(k₂) + V(x₁, x₂),   T(k) = k²,   V(a, b) = C / |a − b|
//!
//! One first-order Trotter step over `dt` is
//!
//!   U(dt) ≈ exp(-i V dt) · QFT† · exp(-i T dt) · QFT
//!
//! Each diagonal exponential is assembled from controlled phase blocks: the
//! control wires fix every bit except one free wire, and the block carries the
//! phases for the two values of that wire.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::layout::{Particle, RegisterLayout};
use crate::phase::{ControlPattern, ControlledPhase, PhaseBlock};
use crate::qft::Direction;
use crate::register::Register;

/// Kinetic energy of discretised momentum `m`.
pub fn kinetic_energy(m: usize) -> f64 {
    (m * m) as f64
}

/// Repulsive pair potential between lattice sites `a` and `b`.
///
/// Zero when the particles coincide.
pub fn potential_energy(a: usize, b: usize, coupling: f64) -> f64 {
    if a == b {
        0.0
    } else {
        coupling / a.abs_diff(b) as f64
    }
}

/// Default coupling constant C = 50 · 2N.
pub fn default_coupling(width: usize) -> f64 {
    50.0 * (2 * width) as f64
}

/// Product-formula order for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrotterOrder {
    /// Kinetic(dt) then potential(dt).
    #[default]
    First,
    /// Kinetic(dt/2), potential(dt), kinetic(dt/2).
    Second,
}

impl FromStr for TrotterOrder {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" | "1" => Ok(TrotterOrder::First),
            "second" | "2" | "strang" => Ok(TrotterOrder::Second),
            other => Err(SimError::UnknownOption {
                kind: "Trotter order",
                value: other.to_string(),
            }),
        }
    }
}

/// Precomputed phase blocks for one Trotter step.
#[derive(Debug, Clone)]
pub struct HamiltonianStep {
    layout: RegisterLayout,
    dt: f64,
    coupling: f64,
    order: TrotterOrder,
    kinetic: Vec<ControlledPhase>,
    potential: Vec<ControlledPhase>,
}

impl HamiltonianStep {
    /// Build the step for `layout`, time increment `dt` and coupling `C`.
    pub fn new(
        layout: RegisterLayout,
        dt: f64,
        coupling: f64,
        order: TrotterOrder,
    ) -> SimResult<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::InvalidTimeStep(dt));
        }
        if !coupling.is_finite() {
            return Err(SimError::InvalidCoupling(coupling));
        }

        let kinetic_dt = match order {
            TrotterOrder::First => dt,
            TrotterOrder::Second => dt / 2.0,
        };
        let kinetic = kinetic_blocks(&layout, kinetic_dt)?;
        let potential = potential_blocks(&layout, dt, coupling)?;

        debug!(
            width = layout.width(),
            dt,
            coupling,
            ?order,
            kinetic_blocks = kinetic.len(),
            potential_blocks = potential.len(),
            "built Hamiltonian step"
        );

        Ok(Self {
            layout,
            dt,
            coupling,
            order,
            kinetic,
            potential,
        })
    }

    /// The register layout this step was built for.
    pub fn layout(&self) -> &RegisterLayout {
        &self.layout
    }

    /// Time increment per step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Potential coupling constant.
    pub fn coupling(&self) -> f64 {
        self.coupling
    }

    /// Product-formula order.
    pub fn order(&self) -> TrotterOrder {
        self.order
    }

    /// Kinetic phase blocks (two per momentum prefix, one per register).
    pub fn kinetic(&self) -> &[ControlledPhase] {
        &self.kinetic
    }

    /// Potential phase blocks (one per (x1, x2-prefix) pair).
    pub fn potential(&self) -> &[ControlledPhase] {
        &self.potential
    }

    /// Apply one full step to `register`.
    pub fn apply(&self, register: &mut Register) {
        debug_assert_eq!(register.layout(), &self.layout);
        match self.order {
            TrotterOrder::First => {
                self.apply_kinetic(register);
                self.apply_potential(register);
            }
            TrotterOrder::Second => {
                self.apply_kinetic(register);
                self.apply_potential(register);
                self.apply_kinetic(register);
            }
        }
    }

    /// QFT both registers, apply the kinetic phases, transform back.
    pub fn apply_kinetic(&self, register: &mut Register) {
        for particle in Particle::BOTH {
            register.transform(particle, Direction::Forward);
        }
        for phase in &self.kinetic {
            register.apply_phase(phase);
        }
        for particle in Particle::BOTH {
            register.transform(particle, Direction::Inverse);
        }
    }

    /// Apply the position-diagonal potential phases.
    pub fn apply_potential(&self, register: &mut Register) {
        for phase in &self.potential {
            register.apply_phase(phase);
        }
    }
}

/// Kinetic blocks: for each momentum prefix `i`, phases `T(2i)` / `T(2i+1)`
/// on each register's low wire, controlled on the register's other wires.
fn kinetic_blocks(layout: &RegisterLayout, dt: f64) -> SimResult<Vec<ControlledPhase>> {
    let n_prefix = layout.register_dim() / 2;
    let mut blocks = Vec::with_capacity(2 * n_prefix);

    for i in 0..n_prefix {
        let block_energy = (kinetic_energy(2 * i), kinetic_energy(2 * i + 1));
        for particle in Particle::BOTH {
            let free = layout.low_wire(particle);
            let pattern = ControlPattern::from_value(layout.wires(particle).start..free, i);
            let block = PhaseBlock::propagator(free, dt, block_energy.0, block_energy.1);
            blocks.push(ControlledPhase::compile(layout, &pattern, &block)?);
        }
    }
    Ok(blocks)
}

/// Potential blocks: for each full `x1` and prefix `x2`, phases
/// `V(x1, 2·x2)` / `V(x1, 2·x2+1)` on particle 2's low wire.
fn potential_blocks(
    layout: &RegisterLayout,
    dt: f64,
    coupling: f64,
) -> SimResult<Vec<ControlledPhase>> {
    let width = layout.width();
    let n_prefix = layout.register_dim() / 2;
    let free = layout.low_wire(Particle::Second);
    let mut blocks = Vec::with_capacity(layout.register_dim() * n_prefix);

    for x1 in 0..layout.register_dim() {
        for x2 in 0..n_prefix {
            // x1's bits followed by x2's prefix bits, wire order.
            let value = (x1 << (width - 1)) | x2;
            let pattern = ControlPattern::from_value(0..free, value);
            let block = PhaseBlock::propagator(
                free,
                dt,
                potential_energy(x1, 2 * x2, coupling),
                potential_energy(x1, 2 * x2 + 1, coupling),
            );
            blocks.push(ControlledPhase::compile(layout, &pattern, &block)?);
        }
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use proptest::prelude::*;

    #[test]
    fn test_kinetic_is_square() {
        for m in 0..64 {
            assert_eq!(kinetic_energy(m), (m * m) as f64);
        }
    }

    #[test]
    fn test_potential_shape() {
        assert_eq!(potential_energy(0, 7, 300.0), 300.0 / 7.0);
        assert_eq!(default_coupling(3), 300.0);
    }

    proptest! {
        #[test]
        fn potential_vanishes_on_coincidence(a in 0_usize..4096, coupling in -500.0_f64..500.0) {
            prop_assert_eq!(potential_energy(a, a, coupling), 0.0);
        }

        #[test]
        fn potential_is_symmetric(
            a in 0_usize..4096,
            b in 0_usize..4096,
            coupling in -500.0_f64..500.0,
        ) {
            prop_assume!(a != b);
            prop_assert_eq!(
                potential_energy(a, b, coupling),
                potential_energy(b, a, coupling)
            );
            prop_assert_eq!(
                potential_energy(a, b, coupling),
                coupling / a.abs_diff(b) as f64
            );
        }
    }

    #[test]
    fn test_order_from_str() {
        assert_eq!("first".parse::<TrotterOrder>().unwrap(), TrotterOrder::First);
        assert_eq!("Second".parse::<TrotterOrder>().unwrap(), TrotterOrder::Second);
        assert!(matches!(
            "third".parse::<TrotterOrder>(),
            Err(SimError::UnknownOption { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_dt() {
        let layout = RegisterLayout::new(2).unwrap();
        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                HamiltonianStep::new(layout, dt, 1.0, TrotterOrder::First),
                Err(SimError::InvalidTimeStep(_))
            ));
        }
        assert!(matches!(
            HamiltonianStep::new(layout, 0.1, f64::NAN, TrotterOrder::First),
            Err(SimError::InvalidCoupling(_))
        ));
    }

    #[test]
    fn test_block_counts_scale_with_width() {
        for width in 1..=4 {
            let layout = RegisterLayout::new(width).unwrap();
            let step = HamiltonianStep::new(layout, 0.02, 1.0, TrotterOrder::First).unwrap();
            let sites = layout.register_dim();
            assert_eq!(step.kinetic().len(), sites);
            assert_eq!(step.potential().len(), sites * sites / 2);
        }
    }

    #[test]
    fn test_potential_is_diagonal_phase() {
        // Every basis state picks up exactly exp(-i dt V(x1, x2)).
        let layout = RegisterLayout::new(2).unwrap();
        let dt = 0.05;
        let coupling = 3.0;
        let step = HamiltonianStep::new(layout, dt, coupling, TrotterOrder::First).unwrap();

        let mut reg = Register::new(layout);
        for amp in reg.amplitudes_mut() {
            *amp = Complex64::new(0.25, 0.0);
        }
        step.apply_potential(&mut reg);

        for index in 0..layout.dim() {
            let (x1, x2) = layout.decode(index);
            let expected =
                Complex64::from_polar(0.25, -dt * potential_energy(x1, x2, coupling));
            assert!((reg.amplitudes()[index] - expected).norm() < 1e-12, "index {index}");
        }
    }

    #[test]
    fn test_kinetic_is_diagonal_in_momentum_basis() {
        // A momentum eigenstate only picks up exp(-i dt (k1² + k2²)).
        let layout = RegisterLayout::new(2).unwrap();
        let dt = 0.03;
        let step = HamiltonianStep::new(layout, dt, 0.0, TrotterOrder::First).unwrap();

        let (k1, k2) = (1, 3);
        let mut reg = Register::new(layout);
        reg.set_positions(k1, k2).unwrap();
        for particle in Particle::BOTH {
            reg.transform(particle, Direction::Inverse);
        }
        let before = reg.amplitudes().to_vec();

        step.apply_kinetic(&mut reg);

        let phase =
            Complex64::from_polar(1.0, -dt * (kinetic_energy(k1) + kinetic_energy(k2)));
        for (after, before) in reg.amplitudes().iter().zip(&before) {
            assert!((after - before * phase).norm() < 1e-12);
        }
    }

    #[test]
    fn test_step_preserves_norm() {
        let layout = RegisterLayout::new(3).unwrap();
        for order in [TrotterOrder::First, TrotterOrder::Second] {
            let step = HamiltonianStep::new(layout, 0.02, default_coupling(3), order).unwrap();
            let mut reg = Register::initial(layout);
            for _ in 0..10 {
                step.apply(&mut reg);
            }
            assert!((reg.norm_sqr() - 1.0).abs() < 1e-10);
        }
    }
}

//! `qtunnel-sim`: two-particle tunnelling on a qubit lattice.
//!
//! Each particle's position on a lattice of 2^N sites is stored in an N-qubit
//! register. The joint state of both registers (2^(2N) amplitudes) is evolved
//! under a split kinetic/potential Hamiltonian using Trotter steps:
//!
//! - **Kinetic** energy k² is applied in the momentum basis, reached with a
//!   QFT on each register.
//! - **Potential** energy C/|x₁ − x₂| is applied directly in the position
//!   basis.
//!
//! Both are diagonal and built from controlled phase blocks. The resulting
//! position distribution can be sampled; an outcome with x₁ = x₂ is a
//! tunnelling event.
//!
//! # Quick start
//!
//! ```rust
//! use qtunnel_sim::evolve;
//!
//! // 3 qubits per particle, dt = 1/50, 10 Trotter steps.
//! let dist = evolve(3, 1.0 / 50.0, 10).unwrap();
//! assert_eq!(dist.probabilities().len(), 64);
//! assert!((dist.total() - 1.0).abs() < 1e-6);
//!
//! let sample = dist.sample(0.5).unwrap();
//! assert_eq!(sample.tunnelled, sample.x1 == sample.x2);
//! ```

pub mod config;
pub mod distribution;
pub mod error;
pub mod evolution;
pub mod hamiltonian;
pub mod layout;
pub mod phase;
pub mod qft;
pub mod register;
pub mod sampler;

pub use config::SimConfig;
pub use distribution::Distribution;
pub use error::{SimError, SimResult};
pub use evolution::{Evolution, EvolutionMode, SimulationParams, evolve};
pub use hamiltonian::{HamiltonianStep, TrotterOrder, kinetic_energy, potential_energy};
pub use layout::{Particle, RegisterLayout};
pub use phase::{ControlPattern, ControlledPhase, PhaseBlock, apply_controlled_phase};
pub use qft::Direction;
pub use register::Register;
pub use sampler::{Counts, Sample};

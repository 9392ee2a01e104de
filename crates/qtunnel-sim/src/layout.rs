//! Wire and index layout of the two-particle register.
//!
//! The joint basis index is the concatenation of particle 1's register
//! (high bits) and particle 2's register (low bits):
//!
//!   index = x1 · 2^N + x2
//!
//! Wires are numbered most-significant first, so wire 0 is the top bit of
//! particle 1 and wire 2N-1 is the bottom bit of particle 2.
//!
//! # Example
//!
//! ```rust
//! use qtunnel_sim::layout::{Particle, RegisterLayout};
//!
//! let layout = RegisterLayout::new(3).unwrap();
//! assert_eq!(layout.dim(), 64);
//! assert_eq!(layout.wires(Particle::Second), 3..6);
//! assert_eq!(layout.decode(layout.encode(5, 2)), (5, 2));
//! ```

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Largest supported register width (2^24 amplitudes, ~256 MB).
pub const MAX_REGISTER_WIDTH: usize = 12;

/// One of the two simulated particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Particle {
    /// Particle encoded in the high register (wires 0..N).
    First,
    /// Particle encoded in the low register (wires N..2N).
    Second,
}

impl Particle {
    /// Both particles, in wire order.
    pub const BOTH: [Particle; 2] = [Particle::First, Particle::Second];
}

/// Register width and the derived index arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLayout")]
pub struct RegisterLayout {
    width: usize,
}

/// Unchecked wire form of [`RegisterLayout`].
#[derive(Deserialize)]
struct RawLayout {
    width: usize,
}

impl TryFrom<RawLayout> for RegisterLayout {
    type Error = SimError;

    fn try_from(raw: RawLayout) -> SimResult<Self> {
        RegisterLayout::new(raw.width)
    }
}

impl RegisterLayout {
    /// Create a layout with `width` qubits per particle.
    pub fn new(width: usize) -> SimResult<Self> {
        if width == 0 || width > MAX_REGISTER_WIDTH {
            return Err(SimError::InvalidRegisterWidth {
                width,
                max: MAX_REGISTER_WIDTH,
            });
        }
        Ok(Self { width })
    }

    /// Qubits per particle register (N).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of wires (2N).
    pub fn n_wires(&self) -> usize {
        2 * self.width
    }

    /// Length of the amplitude vector (2^(2N)).
    pub fn dim(&self) -> usize {
        1 << self.n_wires()
    }

    /// Lattice sites per particle (2^N).
    pub fn register_dim(&self) -> usize {
        1 << self.width
    }

    /// Wires belonging to one particle, most significant first.
    pub fn wires(&self, particle: Particle) -> Range<usize> {
        match particle {
            Particle::First => 0..self.width,
            Particle::Second => self.width..self.n_wires(),
        }
    }

    /// The least-significant wire of a particle's register.
    pub fn low_wire(&self, particle: Particle) -> usize {
        self.wires(particle).end - 1
    }

    /// Bit position of the register's lowest bit inside the joint index.
    pub fn shift(&self, particle: Particle) -> usize {
        match particle {
            Particle::First => self.width,
            Particle::Second => 0,
        }
    }

    /// Bit position (0 = least significant) of a wire inside the joint index.
    pub fn bit_of_wire(&self, wire: usize) -> SimResult<usize> {
        let n_wires = self.n_wires();
        if wire >= n_wires {
            return Err(SimError::WireOutOfRange { wire, n_wires });
        }
        Ok(n_wires - 1 - wire)
    }

    /// Split a joint index into `(x1, x2)` by bit-slicing.
    pub fn decode(&self, index: usize) -> (usize, usize) {
        let mask = self.register_dim() - 1;
        ((index >> self.width) & mask, index & mask)
    }

    /// Join two positions into a joint index.
    ///
    /// Positions are truncated to the register width; use [`Self::check_position`]
    /// first when the input is untrusted.
    pub fn encode(&self, x1: usize, x2: usize) -> usize {
        let mask = self.register_dim() - 1;
        ((x1 & mask) << self.width) | (x2 & mask)
    }

    /// Reject a position that does not fit in one register.
    pub fn check_position(&self, position: usize) -> SimResult<()> {
        let dim = self.register_dim();
        if position >= dim {
            return Err(SimError::PositionOutOfRange { position, dim });
        }
        Ok(())
    }

    /// Starting index: particle 1 at site 0, particle 2 at the last site.
    pub fn initial_index(&self) -> usize {
        self.encode(0, self.register_dim() - 1)
    }

    /// Starting configuration as a wire-ordered bit pattern.
    pub fn initial_pattern(&self) -> Vec<bool> {
        let mut pattern = bits(0, self.width);
        pattern.extend(bits(self.register_dim() - 1, self.width));
        pattern
    }
}

/// The low `n` bits of `value`, most significant first.
pub fn bits(value: usize, n: usize) -> Vec<bool> {
    (0..n).rev().map(|b| (value >> b) & 1 == 1).collect()
}

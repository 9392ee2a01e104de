//! Position ↔ momentum basis change on one particle register.
//!
//! The forward transform is the quantum Fourier transform on the N wires of a
//! register, bit reversal included:
//!
//!   |x⟩ ↦ 2^(-N/2) · Σ_k e^{+2πi·x·k / 2^N} |k⟩
//!
//! The inverse is its adjoint (negated exponent). Both act on the 2^N-long
//! slice selected by fixing the other register, using an iterative radix-2
//! butterfly, O(2^N · N) per slice.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::error::{SimError, SimResult};
use crate::layout::{Particle, RegisterLayout};

/// Direction of the basis change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Position → momentum.
    Forward,
    /// Momentum → position.
    Inverse,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Inverse => -1.0,
        }
    }
}

/// Transform one particle's register in place.
///
/// Fails with [`SimError::DistributionLength`] unless `amplitudes` has
/// length `layout.dim()`.
pub fn transform_register(
    layout: &RegisterLayout,
    amplitudes: &mut [Complex64],
    particle: Particle,
    direction: Direction,
) -> SimResult<()> {
    check_len(layout, amplitudes)?;
    apply(layout, amplitudes, particle, direction);
    Ok(())
}

/// Transform both registers, particle 1 first.
pub fn transform_both(
    layout: &RegisterLayout,
    amplitudes: &mut [Complex64],
    direction: Direction,
) -> SimResult<()> {
    check_len(layout, amplitudes)?;
    for particle in Particle::BOTH {
        apply(layout, amplitudes, particle, direction);
    }
    Ok(())
}

fn check_len(layout: &RegisterLayout, amplitudes: &[Complex64]) -> SimResult<()> {
    if amplitudes.len() != layout.dim() {
        return Err(SimError::DistributionLength {
            expected: layout.dim(),
            got: amplitudes.len(),
        });
    }
    Ok(())
}

/// Unchecked transform for callers that own a correctly sized vector.
pub(crate) fn apply(
    layout: &RegisterLayout,
    amplitudes: &mut [Complex64],
    particle: Particle,
    direction: Direction,
) {
    debug_assert_eq!(amplitudes.len(), layout.dim());

    let n = layout.width();
    let dim = layout.register_dim();
    let shift = layout.shift(particle);
    // Stride between consecutive register values, and the bits of the other
    // register that pick a slice.
    let stride = 1 << shift;
    let other = match particle {
        Particle::First => Particle::Second,
        Particle::Second => Particle::First,
    };
    let other_shift = layout.shift(other);

    let twiddles = twiddles(dim, direction);
    let scale = 1.0 / (dim as f64).sqrt();
    let mut scratch = vec![Complex64::new(0.0, 0.0); dim];

    for rest in 0..dim {
        let base = rest << other_shift;
        for (x, slot) in scratch.iter_mut().enumerate() {
            *slot = amplitudes[base + x * stride];
        }
        fft_in_place(&mut scratch, n, &twiddles);
        for (k, value) in scratch.iter().enumerate() {
            amplitudes[base + k * stride] = *value * scale;
        }
    }
}

/// Roots of unity e^{±2πi·j/dim} for j in 0..dim/2.
fn twiddles(dim: usize, direction: Direction) -> Vec<Complex64> {
    let sign = direction.sign();
    (0..dim / 2)
        .map(|j| Complex64::from_polar(1.0, sign * 2.0 * PI * j as f64 / dim as f64))
        .collect()
}

/// Unnormalised DFT of a length-2^n buffer (Cooley-Tukey, decimation in time).
fn fft_in_place(buf: &mut [Complex64], n: usize, twiddles: &[Complex64]) {
    let dim = buf.len();

    // Bit-reversal permutation.
    for i in 0..dim {
        let j = reverse_bits(i, n);
        if i < j {
            buf.swap(i, j);
        }
    }

    let mut len = 2;
    while len <= dim {
        let half = len / 2;
        let step = dim / len;
        for start in (0..dim).step_by(len) {
            for j in 0..half {
                let w = twiddles[j * step];
                let a = buf[start + j];
                let b = buf[start + j + half] * w;
                buf[start + j] = a + b;
                buf[start + j + half] = a - b;
            }
        }
        len <<= 1;
    }
}

fn reverse_bits(mut value: usize, n: usize) -> usize {
    let mut out = 0;
    for _ in 0..n {
        out = (out << 1) | (value & 1);
        value >>= 1;
    }
    out
}

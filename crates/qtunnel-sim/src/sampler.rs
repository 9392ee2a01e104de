//! Inverse-CDF sampling of joint positions.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::layout::RegisterLayout;

/// One sampled outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Flat joint index.
    pub index: usize,
    /// Position of particle 1.
    pub x1: usize,
    /// Position of particle 2.
    pub x2: usize,
    /// Both particles on the same site.
    pub tunnelled: bool,
}

impl Sample {
    /// Decode a joint index.
    pub fn from_index(layout: &RegisterLayout, index: usize) -> Self {
        let (x1, x2) = layout.decode(index);
        Self {
            index,
            x1,
            x2,
            tunnelled: x1 == x2,
        }
    }
}

/// Pick the first index whose running probability sum reaches `draw`.
///
/// Entries with zero mass are never chosen. If rounding keeps the running sum
/// below `draw`, the last index with nonzero mass is returned rather than the
/// last index of the vector, so trailing zero-probability outcomes are
/// skipped on the clamp path too.
pub fn sample_index(probabilities: &[f64], draw: f64) -> SimResult<usize> {
    if draw.is_nan() || !(0.0..=1.0).contains(&draw) {
        return Err(SimError::InvalidDraw(draw));
    }

    let mut cumulative = 0.0;
    let mut last_nonzero = None;
    for (i, &p) in probabilities.iter().enumerate() {
        if p <= 0.0 {
            continue;
        }
        last_nonzero = Some(i);
        cumulative += p;
        if draw <= cumulative {
            return Ok(i);
        }
    }

    // Floating-point rounding: clamp to the last outcome with mass.
    last_nonzero.ok_or(SimError::EmptyDistribution)
}

/// Sample a joint outcome from a probability vector laid out by `layout`.
pub fn sample(layout: &RegisterLayout, probabilities: &[f64], draw: f64) -> SimResult<Sample> {
    if probabilities.len() != layout.dim() {
        return Err(SimError::DistributionLength {
            expected: layout.dim(),
            got: probabilities.len(),
        });
    }
    let index = sample_index(probabilities, draw)?;
    Ok(Sample::from_index(layout, index))
}

/// Draw a uniform value in [0, 1) and sample with it.
pub fn sample_with_rng<R: Rng>(
    layout: &RegisterLayout,
    probabilities: &[f64],
    rng: &mut R,
) -> SimResult<Sample> {
    let draw: f64 = rng.r#gen();
    sample(layout, probabilities, draw)
}

/// Histogram of repeated samples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    /// Occurrences per joint index.
    pub counts: BTreeMap<usize, u64>,
    /// Total shots taken.
    pub shots: u64,
    /// Shots that landed on a tunnelling outcome.
    pub tunnelled: u64,
}

impl Counts {
    /// Record one sample.
    pub fn record(&mut self, sample: &Sample) {
        *self.counts.entry(sample.index).or_insert(0) += 1;
        self.shots += 1;
        if sample.tunnelled {
            self.tunnelled += 1;
        }
    }

    /// Fraction of shots that tunnelled.
    pub fn tunnelled_fraction(&self) -> f64 {
        if self.shots == 0 {
            0.0
        } else {
            self.tunnelled as f64 / self.shots as f64
        }
    }

    /// Outcomes sorted by count, most frequent first.
    pub fn sorted(&self) -> Vec<(usize, u64)> {
        let mut v: Vec<(usize, u64)> = self.counts.iter().map(|(&i, &c)| (i, c)).collect();
        v.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        v
    }
}

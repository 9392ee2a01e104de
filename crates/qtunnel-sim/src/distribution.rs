//! Joint position distribution produced by an evolution run.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::layout::{Particle, RegisterLayout};
use crate::sampler::{self, Counts, Sample};

/// Probability of every joint position `(x1, x2)`, indexed `x1 · 2^N + x2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDistribution")]
pub struct Distribution {
    layout: RegisterLayout,
    /// Number of Trotter steps that produced this snapshot.
    steps: usize,
    probabilities: Vec<f64>,
}

/// Unchecked wire form of [`Distribution`].
#[derive(Deserialize)]
struct RawDistribution {
    layout: RegisterLayout,
    steps: usize,
    probabilities: Vec<f64>,
}

impl TryFrom<RawDistribution> for Distribution {
    type Error = SimError;

    fn try_from(raw: RawDistribution) -> SimResult<Self> {
        let expected = raw.layout.dim();
        if raw.probabilities.len() != expected {
            return Err(SimError::DistributionLength {
                expected,
                got: raw.probabilities.len(),
            });
        }
        Ok(Self::new(raw.layout, raw.steps, raw.probabilities))
    }
}

impl Distribution {
    pub(crate) fn new(layout: RegisterLayout, steps: usize, probabilities: Vec<f64>) -> Self {
        debug_assert_eq!(probabilities.len(), layout.dim());
        Self {
            layout,
            steps,
            probabilities,
        }
    }

    /// The register layout.
    pub fn layout(&self) -> &RegisterLayout {
        &self.layout
    }

    /// Trotter steps applied before this snapshot was taken.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The probability vector.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Consume into the raw probability vector.
    pub fn into_vec(self) -> Vec<f64> {
        self.probabilities
    }

    /// Probability of particle 1 at `x1` and particle 2 at `x2`.
    ///
    /// Positions outside the lattice have probability zero.
    pub fn probability(&self, x1: usize, x2: usize) -> f64 {
        let dim = self.layout.register_dim();
        if x1 >= dim || x2 >= dim {
            return 0.0;
        }
        self.probabilities[self.layout.encode(x1, x2)]
    }

    /// Σ p.
    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// |Σ p − 1|.
    pub fn drift(&self) -> f64 {
        (self.total() - 1.0).abs()
    }

    /// Position distribution of one particle, the other summed out.
    pub fn marginal(&self, particle: Particle) -> Vec<f64> {
        let mut out = vec![0.0; self.layout.register_dim()];
        for (index, &p) in self.probabilities.iter().enumerate() {
            let (x1, x2) = self.layout.decode(index);
            let x = match particle {
                Particle::First => x1,
                Particle::Second => x2,
            };
            out[x] += p;
        }
        out
    }

    /// Probability that both particles occupy the same site.
    pub fn coincidence_probability(&self) -> f64 {
        (0..self.layout.register_dim())
            .map(|x| self.probability(x, x))
            .sum()
    }

    /// The most probable joint outcome (lowest index on ties).
    pub fn most_likely(&self) -> Sample {
        let mut best = 0;
        for (i, &p) in self.probabilities.iter().enumerate() {
            if p > self.probabilities[best] {
                best = i;
            }
        }
        Sample::from_index(&self.layout, best)
    }

    /// Outcomes ordered by probability, most probable first.
    pub fn ranked(&self) -> Vec<(Sample, f64)> {
        let mut v: Vec<(Sample, f64)> = self
            .probabilities
            .iter()
            .enumerate()
            .map(|(i, &p)| (Sample::from_index(&self.layout, i), p))
            .collect();
        v.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.index.cmp(&b.0.index)));
        v
    }

    /// Sample one outcome with a caller-supplied uniform draw.
    pub fn sample(&self, draw: f64) -> SimResult<Sample> {
        sampler::sample(&self.layout, &self.probabilities, draw)
    }

    /// Sample one outcome using `rng`.
    pub fn sample_with_rng<R: Rng>(&self, rng: &mut R) -> SimResult<Sample> {
        sampler::sample_with_rng(&self.layout, &self.probabilities, rng)
    }

    /// Sample `shots` outcomes and histogram them.
    pub fn sample_shots<R: Rng>(&self, rng: &mut R, shots: u64) -> SimResult<Counts> {
        let mut counts = Counts::default();
        for _ in 0..shots {
            counts.record(&self.sample_with_rng(rng)?);
        }
        Ok(counts)
    }
}

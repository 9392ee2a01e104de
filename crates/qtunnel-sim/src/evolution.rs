//! Trotterised time evolution from the fixed starting configuration.
//!
//! The driver places particle 1 at site 0 and particle 2 at the last site,
//! applies `T` Hamiltonian steps, and returns the joint position
//! distribution.
//!
//! Two evolution modes are available:
//!
//! - [`EvolutionMode::FullRecompute`] starts every run from the initial state.
//!   A frame loop asking for T = 0, 1, 2, … pays O(T²) steps in total.
//! - [`EvolutionMode::Incremental`] keeps the evolved register between runs
//!   and only applies the missing steps. Asking for fewer steps than already
//!   applied resets and recomputes.
//!
//! Both modes produce the same distribution for the same step count.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::SimConfig;
use crate::distribution::Distribution;
use crate::error::{SimError, SimResult};
use crate::hamiltonian::{HamiltonianStep, TrotterOrder, default_coupling};
use crate::layout::RegisterLayout;
use crate::register::Register;

/// Default tolerance on |Σp − 1| before a drift warning is emitted.
pub const DEFAULT_DRIFT_TOLERANCE: f64 = 1e-6;

/// How successive runs reuse state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvolutionMode {
    /// Every run starts from the initial configuration.
    #[default]
    FullRecompute,
    /// Runs continue from the previously evolved register.
    Incremental,
}

impl FromStr for EvolutionMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" | "full-recompute" => Ok(EvolutionMode::FullRecompute),
            "incremental" => Ok(EvolutionMode::Incremental),
            other => Err(SimError::UnknownOption {
                kind: "evolution mode",
                value: other.to_string(),
            }),
        }
    }
}

/// Physical parameters fixed for the lifetime of a driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    /// Qubits per particle register (N).
    pub register_width: usize,
    /// Time increment per Trotter step.
    pub dt: f64,
    /// Potential coupling constant; `None` → 50 · 2N.
    pub coupling: Option<f64>,
    /// Product-formula order.
    pub order: TrotterOrder,
}

impl SimulationParams {
    /// Parameters with the default coupling and first-order steps.
    pub fn new(register_width: usize, dt: f64) -> Self {
        Self {
            register_width,
            dt,
            coupling: None,
            order: TrotterOrder::First,
        }
    }

    /// Override the coupling constant.
    #[must_use]
    pub fn with_coupling(mut self, coupling: f64) -> Self {
        self.coupling = Some(coupling);
        self
    }

    /// Override the product-formula order.
    #[must_use]
    pub fn with_order(mut self, order: TrotterOrder) -> Self {
        self.order = order;
        self
    }
}

/// Evolution driver owning one Hamiltonian step and, in incremental mode,
/// the evolved register.
#[derive(Debug, Clone)]
pub struct Evolution {
    step: HamiltonianStep,
    mode: EvolutionMode,
    renormalize: bool,
    drift_tolerance: f64,
    /// Retained register and the number of steps already applied to it.
    retained: Option<(Register, usize)>,
}

impl Evolution {
    /// Validate the parameters and precompute the Hamiltonian step.
    pub fn new(params: SimulationParams) -> SimResult<Self> {
        let layout = RegisterLayout::new(params.register_width)?;
        let coupling = params
            .coupling
            .unwrap_or_else(|| default_coupling(params.register_width));
        let step = HamiltonianStep::new(layout, params.dt, coupling, params.order)?;
        Ok(Self {
            step,
            mode: EvolutionMode::default(),
            renormalize: false,
            drift_tolerance: DEFAULT_DRIFT_TOLERANCE,
            retained: None,
        })
    }

    /// Build a driver from a validated configuration.
    pub fn from_config(config: &SimConfig) -> SimResult<Self> {
        config.validate()?;
        let mut params = SimulationParams::new(config.register_width, config.dt)
            .with_order(config.order);
        params.coupling = config.coupling;
        Self::new(params)?
            .with_mode(config.mode)
            .with_renormalize(config.renormalize)
            .with_drift_tolerance(config.drift_tolerance)
    }

    /// Choose between full recompute and incremental stepping.
    #[must_use]
    pub fn with_mode(mut self, mode: EvolutionMode) -> Self {
        self.mode = mode;
        self.retained = None;
        self
    }

    /// Renormalize the register when drift exceeds the tolerance.
    #[must_use]
    pub fn with_renormalize(mut self, renormalize: bool) -> Self {
        self.renormalize = renormalize;
        self
    }

    /// Set the drift tolerance.
    ///
    /// Fails unless `tolerance` is finite and strictly positive.
    pub fn with_drift_tolerance(mut self, tolerance: f64) -> SimResult<Self> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(SimError::InvalidTolerance(tolerance));
        }
        self.drift_tolerance = tolerance;
        Ok(self)
    }

    /// The register layout.
    pub fn layout(&self) -> &RegisterLayout {
        self.step.layout()
    }

    /// The Hamiltonian step applied on every iteration.
    pub fn step(&self) -> &HamiltonianStep {
        &self.step
    }

    /// The evolution mode.
    pub fn mode(&self) -> EvolutionMode {
        self.mode
    }

    /// Steps applied to the retained register (always 0 in full-recompute mode).
    pub fn steps_applied(&self) -> usize {
        self.retained.as_ref().map_or(0, |(_, n)| *n)
    }

    /// Drop any retained register.
    pub fn reset(&mut self) {
        self.retained = None;
    }

    /// Evolve the initial configuration through `steps` Trotter steps.
    pub fn run(&mut self, steps: usize) -> Distribution {
        let layout = *self.layout();
        let (mut register, done) = match (self.mode, self.retained.take()) {
            (EvolutionMode::Incremental, Some((register, done))) if done <= steps => {
                (register, done)
            }
            _ => (Register::initial(layout), 0),
        };

        debug!(
            width = layout.width(),
            dt = self.step.dt(),
            steps,
            resumed_from = done,
            mode = ?self.mode,
            "running evolution"
        );

        for i in done..steps {
            self.step.apply(&mut register);
            trace!(step = i + 1, "applied Trotter step");
        }

        self.check_drift(&mut register, steps);
        let distribution = Distribution::new(layout, steps, register.probabilities());

        if self.mode == EvolutionMode::Incremental {
            self.retained = Some((register, steps));
        }
        distribution
    }

    /// Distributions for T = 0, 1, …, `frames` − 1.
    pub fn trajectory(&mut self, frames: usize) -> Trajectory<'_> {
        Trajectory {
            evolution: self,
            next: 0,
            frames,
        }
    }

    fn check_drift(&self, register: &mut Register, steps: usize) {
        let drift = (register.norm_sqr() - 1.0).abs();
        if drift > self.drift_tolerance {
            warn!(
                drift,
                tolerance = self.drift_tolerance,
                steps,
                renormalize = self.renormalize,
                "numeric drift: probability sum deviates from 1"
            );
            if self.renormalize {
                register.renormalize();
            }
        }
    }
}

/// Frame-by-frame iterator returned by [`Evolution::trajectory`].
#[derive(Debug)]
pub struct Trajectory<'a> {
    evolution: &'a mut Evolution,
    next: usize,
    frames: usize,
}

impl Iterator for Trajectory<'_> {
    type Item = Distribution;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.frames {
            return None;
        }
        let distribution = self.evolution.run(self.next);
        self.next += 1;
        Some(distribution)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.frames.saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Trajectory<'_> {}

/// Evolve `steps` Trotter steps with register width `width` and increment `dt`,
/// using the default coupling and first-order steps.
pub fn evolve(width: usize, dt: f64, steps: usize) -> SimResult<Distribution> {
    Ok(Evolution::new(SimulationParams::new(width, dt))?.run(steps))
}

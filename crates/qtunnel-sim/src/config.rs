//! Simulation configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with `QTUNNEL_` prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values
//!
//! Command-line flags in the `qtunnel` binary are layered on top of both.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::evolution::{DEFAULT_DRIFT_TOLERANCE, EvolutionMode};
use crate::hamiltonian::{TrotterOrder, default_coupling};
use crate::layout::RegisterLayout;

/// Complete simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Qubits per particle register (N).
    pub register_width: usize,

    /// Time increment per Trotter step.
    pub dt: f64,

    /// Number of Trotter steps (or animation frames).
    pub steps: usize,

    /// Potential coupling constant; unset means 50 · 2N.
    pub coupling: Option<f64>,

    /// Product-formula order: "first" or "second".
    pub order: TrotterOrder,

    /// Evolution mode: "full-recompute" or "incremental".
    pub mode: EvolutionMode,

    /// Renormalize the state when drift exceeds the tolerance.
    pub renormalize: bool,

    /// Tolerance on |Σp − 1| before a drift warning.
    pub drift_tolerance: f64,

    /// Seed for sampling; unset means an entropy-seeded RNG.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            register_width: 3,
            dt: 1.0 / 50.0,
            steps: 50,
            coupling: None,
            order: TrotterOrder::First,
            mode: EvolutionMode::FullRecompute,
            renormalize: false,
            drift_tolerance: DEFAULT_DRIFT_TOLERANCE,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: SimConfig = serde_yaml_ng::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables on top of the defaults.
    pub fn from_env() -> Self {
        let mut config = SimConfig::default();
        config.apply_env();
        config
    }

    /// Override fields from `QTUNNEL_*` environment variables.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Override fields from a variable lookup. Unparsable values are ignored.
    pub fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("QTUNNEL_WIDTH").and_then(|v| v.parse().ok()) {
            self.register_width = val;
        }
        if let Some(val) = lookup("QTUNNEL_DT").and_then(|v| v.parse().ok()) {
            self.dt = val;
        }
        if let Some(val) = lookup("QTUNNEL_STEPS").and_then(|v| v.parse().ok()) {
            self.steps = val;
        }
        if let Some(val) = lookup("QTUNNEL_COUPLING").and_then(|v| v.parse().ok()) {
            self.coupling = Some(val);
        }
        if let Some(val) = lookup("QTUNNEL_MODE").and_then(|v| v.parse().ok()) {
            self.mode = val;
        }
        if let Some(val) = lookup("QTUNNEL_ORDER").and_then(|v| v.parse().ok()) {
            self.order = val;
        }
        if let Some(val) = lookup("QTUNNEL_RENORMALIZE").and_then(|v| v.parse().ok()) {
            self.renormalize = val;
        }
        if let Some(val) = lookup("QTUNNEL_SEED").and_then(|v| v.parse().ok()) {
            self.seed = Some(val);
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> SimResult<()> {
        RegisterLayout::new(self.register_width)?;
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimError::InvalidTimeStep(self.dt));
        }
        if let Some(c) = self.coupling {
            if !c.is_finite() {
                return Err(SimError::InvalidCoupling(c));
            }
        }
        if !self.drift_tolerance.is_finite() || self.drift_tolerance <= 0.0 {
            return Err(SimError::InvalidTolerance(self.drift_tolerance));
        }
        Ok(())
    }

    /// The coupling constant actually used.
    pub fn effective_coupling(&self) -> f64 {
        self.coupling
            .unwrap_or_else(|| default_coupling(self.register_width))
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> SimResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

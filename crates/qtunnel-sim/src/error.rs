//! Error types for the tunnelling simulator.

use thiserror::Error;

/// Errors produced while building or running a tunnelling simulation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Register width outside the supported range.
    #[error("register width must be between 1 and {max}, got {width}")]
    InvalidRegisterWidth {
        /// The requested width (qubits per particle).
        width: usize,
        /// Largest supported width.
        max: usize,
    },

    /// Time increment is NaN, infinite, or not strictly positive.
    #[error("time step must be finite and positive, got {0}")]
    InvalidTimeStep(f64),

    /// Potential coupling constant is NaN or infinite.
    #[error("coupling constant must be finite, got {0}")]
    InvalidCoupling(f64),

    /// Drift tolerance is NaN or not strictly positive.
    #[error("drift tolerance must be finite and positive, got {0}")]
    InvalidTolerance(f64),

    /// Control wires and control values differ in length.
    #[error("control pattern has {wires} wires but {values} values")]
    ControlLengthMismatch {
        /// Number of control wires.
        wires: usize,
        /// Number of control values.
        values: usize,
    },

    /// A wire index is not part of the register layout.
    #[error("wire {wire} is out of range for a {n_wires}-wire layout")]
    WireOutOfRange {
        /// The offending wire.
        wire: usize,
        /// Total number of wires.
        n_wires: usize,
    },

    /// The same wire appears twice in a control pattern, or the free wire
    /// is also a control wire.
    #[error("wire {0} is used more than once in a phase block")]
    DuplicateWire(usize),

    /// A basis bit pattern does not cover every wire.
    #[error("bit pattern has {got} bits but the layout has {expected} wires")]
    PatternLength {
        /// Number of wires in the layout.
        expected: usize,
        /// Length of the supplied pattern.
        got: usize,
    },

    /// A lattice position does not fit in one register.
    #[error("position {position} does not fit in a register of {dim} sites")]
    PositionOutOfRange {
        /// The offending position.
        position: usize,
        /// Number of lattice sites per register.
        dim: usize,
    },

    /// Uniform draw is NaN or outside [0, 1].
    #[error("uniform draw must lie in [0, 1], got {0}")]
    InvalidDraw(f64),

    /// Probability vector is empty or carries no mass.
    #[error("probability vector carries no mass")]
    EmptyDistribution,

    /// Probability vector length does not match the layout.
    #[error("probability vector has {got} entries, expected {expected}")]
    DistributionLength {
        /// 2^(2N) for the layout.
        expected: usize,
        /// Supplied length.
        got: usize,
    },

    /// A named option (evolution mode, Trotter order) was not recognised.
    #[error("unknown {kind} '{value}'")]
    UnknownOption {
        /// Which option was being parsed.
        kind: &'static str,
        /// The rejected text.
        value: String,
    },

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml_ng::Error),
}

impl SimError {
    /// True for every variant caused by a malformed caller argument.
    ///
    /// These are surfaced immediately and never worth retrying.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, SimError::Io(_) | SimError::Parse(_))
    }
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

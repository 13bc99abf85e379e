//! Error types
//!
//! Three failure families, none recoverable locally: bad configuration or
//! inputs, a singular or degenerate calibration system, and a buildup stage
//! that reads a best value before it is assigned.

use thiserror::Error;

use crate::buildup::Stage;

/// Inputs that are inconsistent or incomplete
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("expected {expected} usable balance readings, found {found}")]
    BalanceCount { expected: usize, found: usize },

    #[error("missing balance reading '{0}'")]
    MissingBalance(String),

    #[error("{left} is defined at {left_w} rad/s but {right} at {right_w} rad/s")]
    FrequencyMismatch {
        left: String,
        left_w: f64,
        right: String,
        right_w: f64,
    },

    #[error("{left} has relative uncertainty {left_u} but {right} has {right_u}")]
    UncertaintyMismatch {
        left: String,
        left_u: f64,
        right: String,
        right_u: f64,
    },

    #[error("no standard labelled '{0}' in the bank")]
    MissingStandard(String),

    #[error("standard '{0}' appears more than once")]
    DuplicateStandard(String),

    #[error("'{0}' is not a standard of the bank")]
    UnknownStandard(String),

    #[error("no lead labelled '{0}'")]
    MissingLead(String),

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: f64 },

    #[error("no value available for {0}")]
    MissingInput(&'static str),

    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

/// Calibration systems without a unique solution
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("dial calibration system is singular (determinant {determinant:e})")]
    SingularSystem { determinant: f64 },

    #[error("denominator vanishes in {0}")]
    DegenerateRatio(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failures of the scale buildup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildupError {
    #[error("stage '{stage}' read the best value of {label} before it was assigned")]
    Precondition { stage: Stage, label: &'static str },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Calibration(#[from] CalibrationError),
}

/// Umbrella error for orchestration code
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CapScaleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Calibration(#[from] CalibrationError),

    #[error(transparent)]
    Buildup(#[from] BuildupError),
}

/// Result alias defaulting to [`CapScaleError`]
pub type Result<T, E = CapScaleError> = std::result::Result<T, E>;

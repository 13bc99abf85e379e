//! Calibration module - bridge dial factors and the main voltage ratio
//!
//! The dial factors are solved first; the main ratio calibration consumes
//! them, and the scale buildup consumes both.

mod dial;
mod ratio;

pub use dial::{
    admittance_from_rc, calibrate_dial_factors, solve_dial_system, CalibrationFactors,
    DialBalance, DialCalibration,
};
pub use ratio::{
    calc_raw_ratio, capacitance_of, correct_ratio, refine_ratio, MainRatioCalibration,
    PermutationLeads, PermutationRun,
};

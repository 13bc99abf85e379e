//! capscale-core: capacitance scale buildup
//!
//! Calibrates a bank of capacitance standards from one certified reference
//! using ratio balances on a two-terminal-pair bridge.
//!
//! ## Modules
//!
//! - `network` - Leads, capacitors and the lead correction
//! - `calibration` - Bridge dial factors and the permutation main ratio
//! - `buildup` - Staged propagation of the reference through the bank
//! - `balance` - Recorded dial settings
//! - `config` - Buildup settings and calibration overrides
//! - `records` - Plain serde records of component values
//! - `constraint` - Drift line of the reference between calibrations

pub mod balance;
pub mod buildup;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod constraint;
pub mod error;
pub mod network;
pub mod records;

pub use balance::{BalanceReading, BalanceSet};
pub use buildup::{run_buildup, Bank, BestValues, BuildupLeads, BuildupOutcome, Stage, Standard};
pub use calibration::{
    calc_raw_ratio, calibrate_dial_factors, correct_ratio, CalibrationFactors,
};
pub use config::{BuildupConfig, CalibrationInputs};
pub use error::{BuildupError, CalibrationError, CapScaleError, ConfigError, Result};
pub use network::{lead_correction, Capacitor, Lead, ParallelCapacitor, SeriesConnection};

pub use capscale_gum::{UComplex, UReal};

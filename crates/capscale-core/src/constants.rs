//! Numerical constants for bridge calculations
//!
//! Standard tolerances and the default parameters of the measurement
//! system.

/// Tolerance for detecting near-zero values in division and singularity checks.
pub const NEAR_ZERO: f64 = 1e-15;

/// Relative tolerance when comparing angular frequencies and relative
/// uncertainties of elements that are combined.
pub const MATCH_TOL: f64 = 1e-12;

/// Relative uncertainty assigned to every lead component (5 %).
pub const LEAD_RELATIVE_UNCERTAINTY: f64 = 0.05;

/// Relative uncertainty assigned to screen admittances of capacitors (1 %).
pub const SCREEN_RELATIVE_UNCERTAINTY: f64 = 0.01;

/// Angular frequency of the bridge, rad/s (about 1.6 kHz).
pub const DEFAULT_ANGULAR_FREQUENCY: f64 = 1e4;

/// Injection ratio of the 100:1 transformer used for buildup balances.
pub const DEFAULT_INJECTION_RATIO: f64 = 1e-4;

/// Injection ratio used while calibrating the 10:1 main ratio.
pub const DEFAULT_PERMUTATION_INJECTION_RATIO: f64 = 1e-4;

/// Number of times the lead correction is applied to the raw main ratio.
pub const DEFAULT_RATIO_REFINEMENTS: usize = 2;

/// Acceptable discrepancy of the buildup cross check, ppm.
pub const DEFAULT_CROSS_CHECK_TOLERANCE_PPM: f64 = 1.0;

/// Relative determinant below which the dial calibration is singular.
pub const DEFAULT_SINGULAR_TOLERANCE: f64 = 1e-15;

/// Relative determinant below which the dial calibration is poorly conditioned.
pub const ILL_CONDITIONED_TOLERANCE: f64 = 1e-6;

//! Network module - two-terminal and two-terminal-pair elements
//!
//! Leads are pi-section models of coaxial cables; capacitors are
//! two-terminal-pair admittance standards with screen admittances at both
//! ports. The lead correction cascades the two.

mod capacitor;
mod correction;
mod lead;

pub use capacitor::{Capacitor, LeadPair, ParallelCapacitor};
pub use correction::{checked_lead_correction, lead_correction};
pub use lead::{Lead, SeriesConnection};

use capscale_gum::UComplex;

use crate::constants::MATCH_TOL;
use crate::error::ConfigError;

/// A cable modelled as series impedance plus shunt admittance, half of the
/// shunt admittance lumped at each end
pub trait Cable {
    fn label(&self) -> &str;
    fn angular_frequency(&self) -> f64;
    fn relative_uncertainty(&self) -> f64;
    /// Series impedance, R + jwL
    fn series_impedance(&self) -> &UComplex;
    /// Total shunt admittance, G + jwC
    fn shunt_admittance(&self) -> &UComplex;
}

/// A two-terminal-pair admittance: main admittance Y13 between the
/// measurement terminals plus screen admittances Y12 (HV) and Y34 (LV)
pub trait TwoTerminalPair {
    fn label(&self) -> &str;
    fn angular_frequency(&self) -> f64;
    fn y13(&self) -> &UComplex;
    fn y12(&self) -> &UComplex;
    fn y34(&self) -> &UComplex;
}

/// Two scalars agree to within [`MATCH_TOL`] relative
#[inline]
pub(crate) fn matches(a: f64, b: f64) -> bool {
    a == b || (a - b).abs() <= MATCH_TOL * a.abs().max(b.abs())
}

pub(crate) fn check_frequency(
    left: &str,
    left_w: f64,
    right: &str,
    right_w: f64,
) -> Result<(), ConfigError> {
    if matches(left_w, right_w) {
        Ok(())
    } else {
        Err(ConfigError::FrequencyMismatch {
            left: left.to_string(),
            left_w,
            right: right.to_string(),
            right_w,
        })
    }
}

pub(crate) fn check_uncertainty(
    left: &str,
    left_u: f64,
    right: &str,
    right_u: f64,
) -> Result<(), ConfigError> {
    if matches(left_u, right_u) {
        Ok(())
    } else {
        Err(ConfigError::UncertaintyMismatch {
            left: left.to_string(),
            left_u,
            right: right.to_string(),
            right_u,
        })
    }
}

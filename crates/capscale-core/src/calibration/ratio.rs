//! Main-ratio calibration by the permutation capacitor technique
//!
//! N nominally equal capacitors are switched in rotation against the
//! reference side of the bridge. Each switch position gives one balance, and
//! because every capacitor takes every position the individual capacitor
//! errors cancel from the sum of the balances. A closing balance repeats the
//! first position and only serves as a drift check.

use capscale_gum::UComplex;
use log::debug;
use num_complex::Complex64;

use super::dial::CalibrationFactors;
use crate::balance::{BalanceReading, BalanceSet};
use crate::config::BuildupConfig;
use crate::constants::NEAR_ZERO;
use crate::error::{CalibrationError, ConfigError};

/// Admittance `y` expressed as a capacitance, `y / (jw)`
pub fn capacitance_of(y: &UComplex, w: f64) -> UComplex {
    y / Complex64::new(0.0, w)
}

/// External impedances and admittances at both ratio terminals of the
/// permutation capacitor
#[derive(Debug, Clone)]
pub struct PermutationLeads {
    pub za: UComplex,
    pub ya: UComplex,
    pub zinta: UComplex,
    pub y3: UComplex,
    pub y4_y2: UComplex,
    pub zb: UComplex,
    pub yb: UComplex,
    pub zintb: UComplex,
    pub y1: UComplex,
    pub y2_y1: UComplex,
}

impl PermutationLeads {
    /// Ideal connections: every term zero, the correction is exactly one
    pub fn none() -> Self {
        Self {
            za: UComplex::zero(),
            ya: UComplex::zero(),
            zinta: UComplex::zero(),
            y3: UComplex::zero(),
            y4_y2: UComplex::zero(),
            zb: UComplex::zero(),
            yb: UComplex::zero(),
            zintb: UComplex::zero(),
            y1: UComplex::zero(),
            y2_y1: UComplex::zero(),
        }
    }

    /// Multiplier `top / bottom` applied to an uncorrected ratio
    pub fn correction_factor(&self) -> Result<UComplex, CalibrationError> {
        let top = 1.0
            + &self.zb
                * (&self.y2_y1
                    + (&self.yb / 2.0 + &self.y1) * (1.0 + &self.zintb * &self.y2_y1))
            + &self.zintb * &self.y2_y1;
        let bottom = 1.0
            + &self.za
                * (&self.y4_y2
                    + (&self.ya / 2.0 + &self.y3) * (1.0 + &self.zinta * &self.y4_y2))
            + &self.zinta * &self.y4_y2;
        if bottom.norm() < NEAR_ZERO {
            return Err(CalibrationError::DegenerateRatio("ratio lead correction"));
        }
        Ok(top / bottom)
    }
}

/// Balances of one permutation run together with the nominal values of the
/// permuted capacitors
#[derive(Debug, Clone)]
pub struct PermutationRun {
    readings: Vec<BalanceReading>,
    nominal_pf: Vec<f64>,
}

impl PermutationRun {
    /// A run over `nominal_pf.len()` capacitors needs one more reading than
    /// there are capacitors: the last repeats the first switch position
    pub fn new(readings: Vec<BalanceReading>, nominal_pf: Vec<f64>) -> Result<Self, ConfigError> {
        if nominal_pf.len() < 2 {
            return Err(ConfigError::InvalidValue {
                field: "permutation capacitor count".to_string(),
                value: nominal_pf.len() as f64,
            });
        }
        let expected = nominal_pf.len() + 1;
        if readings.len() != expected {
            return Err(ConfigError::BalanceCount {
                expected,
                found: readings.len(),
            });
        }
        Ok(Self {
            readings,
            nominal_pf,
        })
    }

    /// Collect readings `<prefix>1 ..= <prefix>N+1` from a balance set
    pub fn from_balance_set(
        set: &BalanceSet,
        prefix: &str,
        nominal_pf: Vec<f64>,
    ) -> Result<Self, ConfigError> {
        let readings = set.sequence(prefix, nominal_pf.len() + 1)?;
        Self::new(readings, nominal_pf)
    }

    /// Readings that enter the ratio, the closing repeat excluded
    pub fn usable(&self) -> &[BalanceReading] {
        &self.readings[..self.readings.len() - 1]
    }

    /// Change between the first reading and its closing repeat
    pub fn closure_error(&self) -> BalanceReading {
        let first = self.readings[0];
        let last = self.readings[self.readings.len() - 1];
        BalanceReading::new(last.alpha - first.alpha, last.beta - first.beta)
    }

    /// Sum of the nominal capacitances, pF
    pub fn nominal_sum_pf(&self) -> f64 {
        self.nominal_pf.iter().sum()
    }

    #[inline]
    pub fn nominal_pf(&self) -> &[f64] {
        &self.nominal_pf
    }
}

/// Ratio before any lead correction
///
/// # Arguments
/// * `balances` - Usable balances, one per permuted capacitor
/// * `factors` - Dial factors
/// * `injection_ratio` - Ratio of the injection transformer
/// * `reference` - Reference capacitance, F, as complex (see [`capacitance_of`])
/// * `nominal_pf` - Nominal capacitances of the permuted capacitors, pF
///
/// The ratio is `(N - 1) / (1 + (reference / PC) dsum r)` where `PC` is the
/// nominal sum and `dsum` the sum of calibrated balances.
pub fn calc_raw_ratio(
    balances: &[BalanceReading],
    factors: &CalibrationFactors,
    injection_ratio: f64,
    reference: &UComplex,
    nominal_pf: &[f64],
) -> Result<UComplex, CalibrationError> {
    let n = nominal_pf.len();
    if balances.len() != n {
        return Err(ConfigError::BalanceCount {
            expected: n,
            found: balances.len(),
        }
        .into());
    }
    if n < 2 {
        return Err(ConfigError::InvalidValue {
            field: "permutation capacitor count".to_string(),
            value: n as f64,
        }
        .into());
    }
    let pc = nominal_pf.iter().sum::<f64>() * 1e-12;
    if pc.abs() < NEAR_ZERO * 1e-12 {
        return Err(CalibrationError::DegenerateRatio("nominal permutation sum"));
    }

    let dsum = balances
        .iter()
        .fold(UComplex::zero(), |acc, b| acc + factors.apply(b));
    let denominator = 1.0 + (reference / pc) * dsum * injection_ratio;
    if denominator.norm() < NEAR_ZERO {
        return Err(CalibrationError::DegenerateRatio("raw permutation ratio"));
    }
    Ok((n - 1) as f64 / denominator)
}

/// Apply the lead and internal-impedance correction once
pub fn correct_ratio(
    ratio: &UComplex,
    leads: &PermutationLeads,
) -> Result<UComplex, CalibrationError> {
    Ok(ratio * leads.correction_factor()?)
}

/// Apply [`correct_ratio`] `iterations` times in sequence
pub fn refine_ratio(
    raw: &UComplex,
    leads: &PermutationLeads,
    iterations: usize,
) -> Result<UComplex, CalibrationError> {
    let factor = leads.correction_factor()?;
    let mut ratio = raw.clone();
    for i in 0..iterations {
        let next = &ratio * &factor;
        debug!(
            "ratio refinement {}: change {:e}",
            i + 1,
            (next.x() - ratio.x()).norm()
        );
        ratio = next;
    }
    Ok(ratio)
}

/// Complete main-ratio calibration from a permutation run
#[derive(Debug, Clone)]
pub struct MainRatioCalibration {
    pub run: PermutationRun,
    pub factors: CalibrationFactors,
    pub injection_ratio: f64,
    /// Reference capacitance, F
    pub reference: UComplex,
    pub leads: PermutationLeads,
    pub refinements: usize,
}

impl MainRatioCalibration {
    /// Calibration using the permutation injection ratio and refinement
    /// count of `config`
    pub fn from_config(
        run: PermutationRun,
        factors: CalibrationFactors,
        reference: UComplex,
        leads: PermutationLeads,
        config: &BuildupConfig,
    ) -> Self {
        Self {
            run,
            factors,
            injection_ratio: config.permutation_injection_ratio,
            reference,
            leads,
            refinements: config.ratio_refinements,
        }
    }

    pub fn raw_ratio(&self) -> Result<UComplex, CalibrationError> {
        calc_raw_ratio(
            self.run.usable(),
            &self.factors,
            self.injection_ratio,
            &self.reference,
            self.run.nominal_pf(),
        )
    }

    /// The raw ratio refined `refinements` times
    pub fn main_ratio(&self) -> Result<UComplex, CalibrationError> {
        let raw = self.raw_ratio()?;
        let closure = self.run.closure_error();
        debug!(
            "permutation raw ratio {}, closure ({:e}, {:e})",
            raw, closure.alpha, closure.beta
        );
        refine_ratio(&raw, &self.leads, self.refinements)
    }
}

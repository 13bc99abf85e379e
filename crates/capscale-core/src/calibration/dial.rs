//! Dial-factor calibration
//!
//! Two balances against known admittance ratios give two complex targets
//!
//! ```text
//! x = alpha1 A + j beta1 B
//! y = alpha2 A + j beta2 B
//! ```
//!
//! solved for the complex dial factors A and B by Cramer's rule. The first
//! balance exercises mainly the alpha dial (reference Y2), the second mainly
//! the beta dial (reference Y3).

use capscale_gum::{UComplex, UReal};
use log::{debug, warn};
use nalgebra::Matrix2;
use num_complex::Complex64;

use crate::balance::BalanceReading;
use crate::config::BuildupConfig;
use crate::constants::{ILL_CONDITIONED_TOLERANCE, NEAR_ZERO};
use crate::error::{CalibrationError, ConfigError};

/// Dial settings at one balance of the dial calibration
#[derive(Debug, Clone)]
pub struct DialBalance {
    pub alpha: UReal,
    pub beta: UReal,
}

impl DialBalance {
    pub fn new(alpha: UReal, beta: UReal) -> Self {
        Self { alpha, beta }
    }

    /// Dial settings read without uncertainty
    pub fn exact(alpha: f64, beta: f64) -> Self {
        Self {
            alpha: UReal::constant(alpha),
            beta: UReal::constant(beta),
        }
    }
}

/// Complex factors scaling raw alpha and beta readings
#[derive(Debug, Clone)]
pub struct CalibrationFactors {
    pub factor_a: UComplex,
    pub factor_b: UComplex,
}

impl CalibrationFactors {
    pub fn new(factor_a: UComplex, factor_b: UComplex) -> Self {
        Self { factor_a, factor_b }
    }

    /// Nominal factors of an ideal bridge, A = B = 1
    pub fn ideal() -> Self {
        Self::new(UComplex::from(1.0), UComplex::from(1.0))
    }

    /// Calibrated balance contribution `alpha A + j beta B`
    pub fn combine(&self, alpha: &UReal, beta: &UReal) -> UComplex {
        &self.factor_a * alpha.clone() + (&self.factor_b * beta.clone()).mul_j()
    }

    /// Calibrated contribution of a recorded balance
    pub fn apply(&self, reading: &BalanceReading) -> UComplex {
        &self.factor_a * reading.alpha + (&self.factor_b * reading.beta).mul_j()
    }
}

/// Inputs of a dial calibration run
#[derive(Debug, Clone)]
pub struct DialCalibration {
    /// Setting k of the seven-decade inductive voltage divider
    pub ivd_setting: f64,
    /// Ratio r of the injection transformer
    pub injection_ratio: f64,
    /// Admittance connected to the IVD
    pub y1: UComplex,
    /// Reference on the dials for the first balance
    pub y2: UComplex,
    /// Reference on the dials for the second balance
    pub y3: UComplex,
    /// Balance against Y2
    pub first: DialBalance,
    /// Balance against Y3
    pub second: DialBalance,
}

impl DialCalibration {
    /// Known complex targets `(x, y)` of the two balances
    pub fn targets(&self) -> Result<(UComplex, UComplex), CalibrationError> {
        if self.injection_ratio == 0.0 || !self.injection_ratio.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "injection ratio".to_string(),
                value: self.injection_ratio,
            }
            .into());
        }
        if self.y2.norm() < NEAR_ZERO || self.y3.norm() < NEAR_ZERO {
            return Err(CalibrationError::DegenerateRatio("dial calibration reference"));
        }
        let scale = self.ivd_setting / (1e-2 * self.injection_ratio);
        let x = (&self.y1 / &self.y2) * scale;
        let y = (&self.y1 / &self.y3) * scale;
        Ok((x, y))
    }

    /// Solve for the dial factors
    ///
    /// A relative determinant at or below `config.singular_tolerance` is
    /// treated as singular.
    pub fn solve(&self, config: &BuildupConfig) -> Result<CalibrationFactors, CalibrationError> {
        let (x, y) = self.targets()?;
        solve_dial_system(&x, &y, &self.first, &self.second, config.singular_tolerance)
    }
}

/// Dial factors from the IVD setting `k`, injection ratio `r` and the three
/// admittances of the calibration circuit
#[allow(clippy::too_many_arguments)]
pub fn calibrate_dial_factors(
    k: f64,
    r: f64,
    y1: &UComplex,
    y2: &UComplex,
    y3: &UComplex,
    first: &DialBalance,
    second: &DialBalance,
    config: &BuildupConfig,
) -> Result<CalibrationFactors, CalibrationError> {
    DialCalibration {
        ivd_setting: k,
        injection_ratio: r,
        y1: y1.clone(),
        y2: y2.clone(),
        y3: y3.clone(),
        first: first.clone(),
        second: second.clone(),
    }
    .solve(config)
}

/// Solve `x = a1 A + j b1 B`, `y = a2 A + j b2 B` for A and B
pub fn solve_dial_system(
    x: &UComplex,
    y: &UComplex,
    first: &DialBalance,
    second: &DialBalance,
    tolerance: f64,
) -> Result<CalibrationFactors, CalibrationError> {
    let (a1, b1) = (&first.alpha, &first.beta);
    let (a2, b2) = (&second.alpha, &second.beta);

    let m = Matrix2::new(a1.x(), b1.x(), a2.x(), b2.x());
    let determinant = m.determinant();
    let scale = (a1.x() * b2.x()).abs() + (a2.x() * b1.x()).abs();
    if !determinant.is_finite() || scale == 0.0 || determinant.abs() <= tolerance * scale {
        return Err(CalibrationError::SingularSystem { determinant });
    }
    if determinant.abs() <= ILL_CONDITIONED_TOLERANCE * scale {
        warn!(
            "dial calibration is poorly conditioned: determinant {:e} against scale {:e}",
            determinant, scale
        );
    }

    let det = a1 * b2 - a2 * b1;
    let factor_a = (x * b2.clone() - y * b1.clone()) / det;
    let factor_b = -((x * a2.clone() - y * a1.clone()) / (a2 * b1 - a1 * b2)).mul_j();

    debug!("dial factors A = {}, B = {}", factor_a, factor_b);
    Ok(CalibrationFactors::new(factor_a, factor_b))
}

/// Admittance `1/R + jwC` of a resistor and capacitor in parallel
pub fn admittance_from_rc(resistance: &UReal, capacitance: &UReal, w: f64) -> UComplex {
    let conductance = 1.0 / resistance;
    UComplex::from_parts(conductance, capacitance * w)
}

impl From<(Complex64, Complex64)> for CalibrationFactors {
    fn from((a, b): (Complex64, Complex64)) -> Self {
        Self::new(UComplex::constant(a), UComplex::constant(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_SINGULAR_TOLERANCE;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_factors() {
        // x = 1, y = j with unit dials: A = B = 1
        let x = UComplex::from(1.0);
        let y = UComplex::constant(Complex64::new(0.0, 1.0));
        let f = solve_dial_system(
            &x,
            &y,
            &DialBalance::exact(1.0, 0.0),
            &DialBalance::exact(0.0, 1.0),
            DEFAULT_SINGULAR_TOLERANCE,
        )
        .unwrap();
        assert_relative_eq!(f.factor_a.x().re, 1.0, epsilon = 1e-15);
        assert_relative_eq!(f.factor_a.x().im, 0.0, epsilon = 1e-15);
        assert_relative_eq!(f.factor_b.x().re, 1.0, epsilon = 1e-15);
        assert_relative_eq!(f.factor_b.x().im, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_parallel_rows_are_singular() {
        let x = UComplex::from(1.0);
        let y = UComplex::from(2.0);
        let err = solve_dial_system(
            &x,
            &y,
            &DialBalance::exact(1.0, 0.5),
            &DialBalance::exact(2.0, 1.0),
            DEFAULT_SINGULAR_TOLERANCE,
        )
        .unwrap_err();
        assert!(matches!(err, CalibrationError::SingularSystem { .. }));
    }

    #[test]
    fn test_admittance_from_rc() {
        let r = UReal::new(1e5, 10.0, f64::INFINITY, "r3");
        let c = UReal::new(10e-12, 1e-15, f64::INFINITY, "c3");
        let y = admittance_from_rc(&r, &c, 1e4);
        assert_relative_eq!(y.x().re, 1e-5, epsilon = 1e-20);
        assert_relative_eq!(y.x().im, 1e-7, epsilon = 1e-20);
        // u(1/R) = u(R)/R^2
        assert_relative_eq!(y.real().u(), 10.0 / 1e10, epsilon = 1e-22);
    }

    #[test]
    fn test_apply_matches_combine() {
        let f = CalibrationFactors::from((Complex64::new(1.0003, 0.0005), Complex64::new(1.0002, -0.0004)));
        let reading = BalanceReading::new(0.3, -0.7);
        let a = f.apply(&reading);
        let b = f.combine(&UReal::constant(0.3), &UReal::constant(-0.7));
        assert_eq!(a.x(), b.x());
        let expected = Complex64::new(1.0003, 0.0005) * 0.3
            + Complex64::new(0.0, 1.0) * Complex64::new(1.0002, -0.0004) * -0.7;
        assert_relative_eq!(a.x().re, expected.re, epsilon = 1e-15);
        assert_relative_eq!(a.x().im, expected.im, epsilon = 1e-15);
    }
}

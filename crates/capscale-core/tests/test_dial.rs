//! Dial-factor calibration tests

use anyhow::Result;
use approx::assert_relative_eq;
use capscale_core::calibration::{
    admittance_from_rc, calibrate_dial_factors, solve_dial_system, CalibrationFactors,
    DialBalance, DialCalibration,
};
use capscale_core::config::BuildupConfig;
use capscale_core::constants::DEFAULT_SINGULAR_TOLERANCE;
use capscale_core::CalibrationError;
use capscale_gum::{UComplex, UReal};
use num_complex::Complex64;
use proptest::prelude::*;

fn published_calibration() -> DialCalibration {
    DialCalibration {
        ivd_setting: 0.01,
        injection_ratio: 0.01,
        y1: UComplex::constant(Complex64::new(0.0, 1e-7)),
        y2: UComplex::new(
            Complex64::new(1.2875496470174829e-07, 9.994766647152855e-06),
            (1e-12, 1e-12),
            f64::INFINITY,
            "y2",
        ),
        y3: UComplex::new(
            Complex64::new(1.0016060233120085e-05, -8.311235143283955e-08),
            (1e-12, 1e-12),
            f64::INFINITY,
            "y3",
        ),
        first: DialBalance::exact(1.0, 0.0123),
        second: DialBalance::exact(-0.0087, 0.9981),
    }
}

#[test]
fn test_published_dial_factors() -> Result<()> {
    let f = published_calibration().solve(&BuildupConfig::default())?;
    assert_relative_eq!(f.factor_a.x().re, 1.0003524339813534, epsilon = 1e-13);
    assert_relative_eq!(f.factor_a.x().im, 0.0005839748330213842, epsilon = 1e-13);
    assert_relative_eq!(f.factor_b.x().re, 1.0002333356352149, epsilon = 1e-13);
    assert_relative_eq!(f.factor_b.x().im, -0.00041983101116730635, epsilon = 1e-13);
    // the reference uncertainties reach both factors
    assert!(f.factor_a.real().u() > 0.0);
    assert!(f.factor_b.imag().u() > 0.0);
    Ok(())
}

#[test]
fn test_free_function_matches_struct() -> Result<()> {
    let cal = published_calibration();
    let f = calibrate_dial_factors(
        cal.ivd_setting,
        cal.injection_ratio,
        &cal.y1,
        &cal.y2,
        &cal.y3,
        &cal.first,
        &cal.second,
        &BuildupConfig::default(),
    )?;
    let g = cal.solve(&BuildupConfig::default())?;
    assert_eq!(f.factor_a.x(), g.factor_a.x());
    assert_eq!(f.factor_b.x(), g.factor_b.x());
    Ok(())
}

fn reconstruct(
    x: Complex64,
    y: Complex64,
    first: (f64, f64),
    second: (f64, f64),
) -> Result<(Complex64, Complex64), capscale_core::CalibrationError> {
    let first = DialBalance::exact(first.0, first.1);
    let second = DialBalance::exact(second.0, second.1);
    let f = solve_dial_system(
        &UComplex::constant(x),
        &UComplex::constant(y),
        &first,
        &second,
        DEFAULT_SINGULAR_TOLERANCE,
    )?;
    let x_back = f.combine(&first.alpha, &first.beta).x();
    let y_back = f.combine(&second.alpha, &second.beta).x();
    Ok((x_back, y_back))
}

#[test]
fn test_forward_reconstruction() -> Result<()> {
    let x = Complex64::new(0.98, 0.013);
    let y = Complex64::new(-0.004, 1.021);
    let (x_back, y_back) = reconstruct(x, y, (1.0, 0.0123), (-0.0087, 0.9981))?;
    assert_relative_eq!(x_back.re, x.re, epsilon = 1e-13);
    assert_relative_eq!(x_back.im, x.im, epsilon = 1e-13);
    assert_relative_eq!(y_back.re, y.re, epsilon = 1e-13);
    assert_relative_eq!(y_back.im, y.im, epsilon = 1e-13);
    Ok(())
}

proptest! {
    #[test]
    fn forward_equations_reproduce_targets(
        xr in -2.0f64..2.0,
        xi in -2.0f64..2.0,
        yr in -2.0f64..2.0,
        yi in -2.0f64..2.0,
        a1 in -3.0f64..3.0,
        b1 in -3.0f64..3.0,
        a2 in -3.0f64..3.0,
        b2 in -3.0f64..3.0,
    ) {
        // well away from singular dial pairs
        prop_assume!((a1 * b2 - a2 * b1).abs() > 0.1);

        let x = Complex64::new(xr, xi);
        let y = Complex64::new(yr, yi);
        let (x_back, y_back) = reconstruct(x, y, (a1, b1), (a2, b2)).unwrap();
        let tol = 1e-9 * (1.0 + x.norm() + y.norm());
        prop_assert!((x_back - x).norm() <= tol, "x {} vs {}", x_back, x);
        prop_assert!((y_back - y).norm() <= tol, "y {} vs {}", y_back, y);
    }
}

#[test]
fn test_singular_balances_rejected() {
    let mut cal = published_calibration();
    cal.first = DialBalance::exact(0.4, 0.2);
    cal.second = DialBalance::exact(0.8, 0.4);
    let err = cal.solve(&BuildupConfig::default()).unwrap_err();
    assert!(matches!(err, CalibrationError::SingularSystem { .. }));
}

#[test]
fn test_near_singular_threshold() {
    let x = UComplex::from(1.0);
    let y = UComplex::from(1.0);
    let first = DialBalance::exact(1.0, 1.0);
    let second = DialBalance::exact(1.0, 1.0 + 1e-9);
    // relative determinant 5e-10: accepted by default, rejected by a
    // stricter tolerance
    assert!(solve_dial_system(&x, &y, &first, &second, DEFAULT_SINGULAR_TOLERANCE).is_ok());
    assert!(solve_dial_system(&x, &y, &first, &second, 1e-6).is_err());
}

#[test]
fn test_singular_tolerance_from_config() -> Result<()> {
    let mut cal = published_calibration();
    cal.first = DialBalance::exact(1.0, 1.0);
    cal.second = DialBalance::exact(1.0, 1.0 + 1e-9);
    assert!(cal.solve(&BuildupConfig::default()).is_ok());

    let strict = BuildupConfig::from_toml_str("singular_tolerance = 1e-6")?;
    assert!(matches!(
        cal.solve(&strict),
        Err(CalibrationError::SingularSystem { .. })
    ));
    assert!(calibrate_dial_factors(
        cal.ivd_setting,
        cal.injection_ratio,
        &cal.y1,
        &cal.y2,
        &cal.y3,
        &cal.first,
        &cal.second,
        &strict,
    )
    .is_err());
    Ok(())
}

#[test]
fn test_zero_injection_ratio_rejected() {
    let mut cal = published_calibration();
    cal.injection_ratio = 0.0;
    assert!(matches!(cal.solve(&BuildupConfig::default()), Err(CalibrationError::Config(_))));
}

#[test]
fn test_rc_reference_for_second_balance() -> Result<()> {
    let r = UReal::new(99_840.0, 5.0, f64::INFINITY, "r3");
    let c = UReal::new(8.3e-12, 1e-16, f64::INFINITY, "c3");
    let y3 = admittance_from_rc(&r, &c, 1e4);
    assert_relative_eq!(y3.x().re, 1.0 / 99_840.0, max_relative = 1e-15);

    let mut cal = published_calibration();
    cal.y3 = y3;
    let f = cal.solve(&BuildupConfig::default())?;
    // the resistor now contributes to both factors
    assert!(f.factor_a.real().component("r3").abs() > 0.0);
    assert!(f.factor_b.real().component("r3").abs() > 0.0);
    Ok(())
}

#[test]
fn test_factors_apply_to_balance() {
    let f = CalibrationFactors::ideal();
    let d = f.apply(&capscale_core::BalanceReading::new(0.25, -0.5));
    assert_eq!(d.x(), Complex64::new(0.25, -0.5));
}

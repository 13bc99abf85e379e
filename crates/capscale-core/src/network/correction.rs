//! Lead correction of a two-terminal-pair admittance
//!
//! The HV lead, the capacitor and the LV lead form a cascade of lumped
//! sections: series impedance `z1`, shunt `y1` (half the HV lead admittance
//! plus the HV screen), the main admittance `Y13`, shunt `y2` (LV screen plus
//! half the LV lead admittance) and series impedance `z2`. Eliminating the
//! internal nodes gives
//!
//! ```text
//! a      = 1 + z1 y1 + z2 y2 + z1 y1 z2 y2
//! b      = z1 + z2 + z1 z2 (y1 + y2)
//! y_meas = Y13 / (a + b Y13)
//! ```
//!
//! and the correction is `Y13 - y_meas`, so that
//! `true Y13 = measured Y13 + correction`.

use capscale_gum::UComplex;

use super::{check_frequency, Cable, TwoTerminalPair};
use crate::error::ConfigError;

/// Correction to add to a value measured at the far end of `hv` and `lv`
///
/// The caller is responsible for all three elements sharing one angular
/// frequency; see [`checked_lead_correction`].
pub fn lead_correction<C, H, L>(capacitor: &C, hv: &H, lv: &L) -> UComplex
where
    C: TwoTerminalPair + ?Sized,
    H: Cable + ?Sized,
    L: Cable + ?Sized,
{
    let z1 = hv.series_impedance();
    let y1 = hv.shunt_admittance() / 2.0 + capacitor.y12();
    let z2 = lv.series_impedance();
    let y2 = capacitor.y34() + lv.shunt_admittance() / 2.0;

    let z1y1 = z1 * &y1;
    let z2y2 = z2 * &y2;
    let a = 1.0 + &z1y1 + &z2y2 + &z1y1 * &z2y2;
    let b = z1 + z2 + &(z1 * z2) * &(&y1 + &y2);

    let y13 = capacitor.y13();
    let y_meas = y13 / (a + &b * y13);
    y13 - &y_meas
}

/// [`lead_correction`] after verifying that the leads and the capacitor are
/// defined at the same angular frequency
pub fn checked_lead_correction<C, H, L>(
    capacitor: &C,
    hv: &H,
    lv: &L,
) -> Result<UComplex, ConfigError>
where
    C: TwoTerminalPair + ?Sized,
    H: Cable + ?Sized,
    L: Cable + ?Sized,
{
    let w = capacitor.angular_frequency();
    check_frequency(capacitor.label(), w, hv.label(), hv.angular_frequency())?;
    check_frequency(capacitor.label(), w, lv.label(), lv.angular_frequency())?;
    Ok(lead_correction(capacitor, hv, lv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Capacitor, Lead};
    use num_complex::Complex64;

    #[test]
    fn test_no_leads_no_correction() {
        let cap = Capacitor::new(
            "AH11A1",
            (0.0, 10e-12),
            (1.62e-9, 84.2e-12),
            (0.72e-9, 120.8e-12),
            1e4,
            0.01,
        );
        let none = Lead::none(1e4, 0.05);
        let correction = lead_correction(&cap, &none, &none);
        assert_eq!(correction.x(), Complex64::new(0.0, 0.0));
        assert_eq!(correction.u(), (0.0, 0.0));
    }

    #[test]
    fn test_checked_rejects_mismatched_lead() {
        let cap = Capacitor::new("c", (0.0, 10e-12), (0.0, 0.0), (0.0, 0.0), 1e4, 0.01);
        let none = Lead::none(1e4, 0.05);
        let other = Lead::none(2e4, 0.05);
        assert!(checked_lead_correction(&cap, &none, &other).is_err());
        assert!(checked_lead_correction(&cap, &none, &none).is_ok());
    }
}

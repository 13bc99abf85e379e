//! Two-terminal-pair capacitors and parallel combinations

use capscale_gum::{UComplex, UReal};
use num_complex::Complex64;

use super::{check_frequency, check_uncertainty, Cable, TwoTerminalPair};
use crate::error::ConfigError;

/// Two-terminal-pair capacitance standard
#[derive(Debug, Clone)]
pub struct Capacitor {
    label: String,
    w: f64,
    relative_uncertainty: f64,
    /// Main admittance, exact: only its nominal value enters corrections
    y13: UComplex,
    /// HV screen admittance
    y12: UComplex,
    /// LV screen admittance
    y34: UComplex,
    best_value: Option<UComplex>,
}

impl Capacitor {
    /// Create a capacitor from nominal component values
    ///
    /// # Arguments
    /// * `label` - Identifier of the standard
    /// * `nominal` - Main admittance as (conductance in S, capacitance in F)
    /// * `hv_screen` - HV screen admittance as (conductance, capacitance)
    /// * `lv_screen` - LV screen admittance as (conductance, capacitance)
    /// * `w` - Angular frequency in rad/s
    /// * `relative_uncertainty` - Fractional uncertainty of the screen values
    ///
    /// The HV screen carries `(relu*G, relu*wC)`; both LV screen components
    /// carry the combined `relu*G + relu*wC`.
    pub fn new(
        label: &str,
        nominal: (f64, f64),
        hv_screen: (f64, f64),
        lv_screen: (f64, f64),
        w: f64,
        relative_uncertainty: f64,
    ) -> Self {
        let relu = relative_uncertainty;
        let y13 = UComplex::constant(Complex64::new(nominal.0, w * nominal.1));
        let y12 = UComplex::new(
            Complex64::new(hv_screen.0, w * hv_screen.1),
            (hv_screen.0 * relu, hv_screen.1 * w * relu),
            f64::INFINITY,
            &format!("{label} y12"),
        );
        let u34 = lv_screen.0 * relu + lv_screen.1 * w * relu;
        let y34 = UComplex::new(
            Complex64::new(lv_screen.0, w * lv_screen.1),
            (u34, u34),
            f64::INFINITY,
            &format!("{label} y34"),
        );
        Self {
            label: label.to_string(),
            w,
            relative_uncertainty,
            y13,
            y12,
            y34,
            best_value: None,
        }
    }

    #[inline]
    pub fn relative_uncertainty(&self) -> f64 {
        self.relative_uncertainty
    }

    /// Nominal capacitance of the main admittance, F
    pub fn nominal_capacitance(&self) -> f64 {
        self.y13.x().im / self.w
    }

    /// Best estimate of the admittance with leads removed, once assigned
    #[inline]
    pub fn best_value(&self) -> Option<&UComplex> {
        self.best_value.as_ref()
    }

    /// Assign (or reassign) the best value
    pub fn set_best_value(&mut self, value: UComplex) {
        self.best_value = Some(value);
    }

    /// Capacitance of the best value in pF
    pub fn capacitance_pf(&self) -> Option<UReal> {
        self.best_value
            .as_ref()
            .map(|y| y.imag() / self.w * 1e12)
    }
}

impl TwoTerminalPair for Capacitor {
    fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    fn angular_frequency(&self) -> f64 {
        self.w
    }

    #[inline]
    fn y13(&self) -> &UComplex {
        &self.y13
    }

    #[inline]
    fn y12(&self) -> &UComplex {
        &self.y12
    }

    #[inline]
    fn y34(&self) -> &UComplex {
        &self.y34
    }
}

/// The HV and LV leads a capacitor is wired with
#[derive(Clone, Copy)]
pub struct LeadPair<'a> {
    pub hv: &'a dyn Cable,
    pub lv: &'a dyn Cable,
}

impl<'a> LeadPair<'a> {
    pub fn new(hv: &'a dyn Cable, lv: &'a dyn Cable) -> Self {
        Self { hv, lv }
    }
}

/// Two capacitors connected in parallel
///
/// The leads that join each capacitor to the common node are passed in
/// explicitly and their admittances fold into the screen admittances of the
/// combination. The common lead to the bridge is supplied at correction time.
#[derive(Debug, Clone)]
pub struct ParallelCapacitor {
    label: String,
    w: f64,
    relative_uncertainty: f64,
    y13: UComplex,
    y12: UComplex,
    y34: UComplex,
    best_value: Option<UComplex>,
}

impl ParallelCapacitor {
    /// Parallel two capacitors of equal frequency and relative uncertainty
    ///
    /// # Arguments
    /// * `label` - Identifier of the combination
    /// * `first`, `second` - The paralleled capacitors
    /// * `first_leads`, `second_leads` - Leads joining each one to the
    ///   common HV and LV nodes
    pub fn new(
        label: &str,
        first: &Capacitor,
        second: &Capacitor,
        first_leads: LeadPair<'_>,
        second_leads: LeadPair<'_>,
    ) -> Result<Self, ConfigError> {
        check_frequency(&first.label, first.w, &second.label, second.w)?;
        check_uncertainty(
            &first.label,
            first.relative_uncertainty,
            &second.label,
            second.relative_uncertainty,
        )?;
        for lead in [
            first_leads.hv,
            first_leads.lv,
            second_leads.hv,
            second_leads.lv,
        ] {
            check_frequency(label, first.w, lead.label(), lead.angular_frequency())?;
        }

        let y12 = &first.y12
            + &second.y12
            + first_leads.hv.shunt_admittance()
            + second_leads.hv.shunt_admittance();
        let y34 = &first.y34
            + &second.y34
            + first_leads.lv.shunt_admittance()
            + second_leads.lv.shunt_admittance();

        Ok(Self {
            label: label.to_string(),
            w: first.w,
            relative_uncertainty: first.relative_uncertainty,
            y13: &first.y13 + &second.y13,
            y12,
            y34,
            best_value: None,
        })
    }

    #[inline]
    pub fn relative_uncertainty(&self) -> f64 {
        self.relative_uncertainty
    }

    #[inline]
    pub fn best_value(&self) -> Option<&UComplex> {
        self.best_value.as_ref()
    }

    pub fn set_best_value(&mut self, value: UComplex) {
        self.best_value = Some(value);
    }
}

impl TwoTerminalPair for ParallelCapacitor {
    fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    fn angular_frequency(&self) -> f64 {
        self.w
    }

    #[inline]
    fn y13(&self) -> &UComplex {
        &self.y13
    }

    #[inline]
    fn y12(&self) -> &UComplex {
        &self.y12
    }

    #[inline]
    fn y34(&self) -> &UComplex {
        &self.y34
    }
}

//! Plain input records
//!
//! Flat serde records for nominal component values, balance readings and
//! stored complex results, independent of any storage format. They convert
//! into the network and calibration types.

use capscale_gum::UComplex;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::balance::{BalanceReading, BalanceSet};
use crate::buildup::{Bank, BuildupLeads};
use crate::error::ConfigError;
use crate::network::{Capacitor, Lead};

fn infinite_dof() -> f64 {
    f64::INFINITY
}

fn is_infinite(dof: &f64) -> bool {
    dof.is_infinite()
}

/// An uncertain complex value stored by value and standard uncertainties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexRecord {
    pub re: f64,
    pub im: f64,
    #[serde(default)]
    pub u_re: f64,
    #[serde(default)]
    pub u_im: f64,
    #[serde(default = "infinite_dof", skip_serializing_if = "is_infinite")]
    pub dof: f64,
    pub label: String,
}

impl ComplexRecord {
    /// A fresh elementary input; two records never share uncertainty
    /// components even when equal
    pub fn to_ucomplex(&self) -> UComplex {
        UComplex::new(
            Complex64::new(self.re, self.im),
            (self.u_re, self.u_im),
            self.dof,
            &self.label,
        )
    }

    /// Summarise a computed value; correlations with other values are lost
    pub fn from_ucomplex(value: &UComplex, label: &str) -> Self {
        let (u_re, u_im) = value.u();
        Self {
            re: value.x().re,
            im: value.x().im,
            u_re,
            u_im,
            dof: value.dof(),
            label: label.to_string(),
        }
    }
}

/// Nominal component values of a lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub label: String,
    /// Ohm
    pub resistance: f64,
    /// H
    pub inductance: f64,
    /// S
    pub conductance: f64,
    /// F
    pub capacitance: f64,
}

impl LeadRecord {
    pub fn to_lead(&self, w: f64, relative_uncertainty: f64) -> Lead {
        Lead::new(
            &self.label,
            (self.resistance, self.inductance),
            (self.conductance, self.capacitance),
            w,
            relative_uncertainty,
        )
    }
}

/// Nominal main admittance and screen admittances of a capacitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacitorRecord {
    pub label: String,
    /// S
    #[serde(default)]
    pub conductance: f64,
    /// F
    pub capacitance: f64,
    /// HV screen (S, F)
    #[serde(default)]
    pub hv: (f64, f64),
    /// LV screen (S, F)
    #[serde(default)]
    pub lv: (f64, f64),
}

impl CapacitorRecord {
    pub fn to_capacitor(&self, w: f64, relative_uncertainty: f64) -> Capacitor {
        Capacitor::new(
            &self.label,
            (self.conductance, self.capacitance),
            self.hv,
            self.lv,
            w,
            relative_uncertainty,
        )
    }
}

/// A balance reading at a named position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub name: String,
    pub alpha: f64,
    pub beta: f64,
}

impl FromIterator<BalanceRecord> for BalanceSet {
    fn from_iter<I: IntoIterator<Item = BalanceRecord>>(iter: I) -> Self {
        let mut set = BalanceSet::new();
        for record in iter {
            set.insert(record.name, BalanceReading::new(record.alpha, record.beta));
        }
        set
    }
}

/// Component values of a whole bank, with the labels of the leads taking
/// each role in the buildup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankRecord {
    pub hv1: String,
    pub lv1: String,
    pub hv2: String,
    pub lv2: String,
    pub transformer: String,
    pub common: String,
    pub leads: Vec<LeadRecord>,
    pub capacitors: Vec<CapacitorRecord>,
}

impl BankRecord {
    /// Build the bank at angular frequency `w`
    ///
    /// # Arguments
    /// * `lead_uncertainty` - Relative uncertainty of every lead component
    /// * `screen_uncertainty` - Relative uncertainty of capacitor screens
    pub fn to_bank(
        &self,
        w: f64,
        lead_uncertainty: f64,
        screen_uncertainty: f64,
    ) -> Result<Bank, ConfigError> {
        let lead = |label: &str| -> Result<Lead, ConfigError> {
            self.leads
                .iter()
                .find(|l| l.label == label)
                .map(|l| l.to_lead(w, lead_uncertainty))
                .ok_or_else(|| ConfigError::MissingLead(label.to_string()))
        };
        let leads = BuildupLeads {
            hv1: lead(&self.hv1)?,
            lv1: lead(&self.lv1)?,
            hv2: lead(&self.hv2)?,
            lv2: lead(&self.lv2)?,
            transformer: lead(&self.transformer)?,
            common: lead(&self.common)?,
        };
        let capacitors = self
            .capacitors
            .iter()
            .map(|c| c.to_capacitor(w, screen_uncertainty))
            .collect();
        Bank::new(capacitors, leads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_complex_record_default_dof() {
        let record: ComplexRecord =
            toml::from_str("re = 10.0\nim = -1.7e-4\nu_re = 1e-10\nu_im = 1e-10\nlabel = \"main_ratio\"")
                .unwrap();
        assert!(record.dof.is_infinite());
        let value = record.to_ucomplex();
        assert_eq!(value.x(), Complex64::new(10.0, -1.7e-4));
        assert_relative_eq!(value.u().1, 1e-10);
    }

    #[test]
    fn test_lead_record() {
        let record = LeadRecord {
            label: "hv1".to_string(),
            resistance: 0.286,
            inductance: 0.782e-6,
            conductance: 0.28e-9,
            capacitance: 255.2e-12,
        };
        use crate::network::Cable;
        let lead = record.to_lead(1e4, 0.05);
        assert_relative_eq!(lead.series_impedance().x().im, 0.782e-2, epsilon = 1e-15);
        assert_relative_eq!(lead.shunt_admittance().u().1, 255.2e-8 * 0.05, epsilon = 1e-20);
    }

    #[test]
    fn test_balance_records_collect() {
        let set: BalanceSet = vec![
            BalanceRecord {
                name: "r1".to_string(),
                alpha: 0.5,
                beta: -0.25,
            },
            BalanceRecord {
                name: "r2".to_string(),
                alpha: 0.1,
                beta: 0.2,
            },
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("r1").unwrap(), BalanceReading::new(0.5, -0.25));
    }
}

//! Shared fixtures: the AH11/GR/ES bank, calibration inputs and a balance
//! set for a complete buildup

#![allow(dead_code)]

use capscale_core::balance::BalanceSet;
use capscale_core::buildup::{Bank, BuildupLeads};
use capscale_core::calibration::CalibrationFactors;
use capscale_core::constants::{LEAD_RELATIVE_UNCERTAINTY, SCREEN_RELATIVE_UNCERTAINTY};
use capscale_core::network::{Capacitor, Lead};
use capscale_gum::{UComplex, UReal};
use num_complex::Complex64;

pub const W: f64 = 1e4;

/// Certified capacitance of AH11C1, F
pub const CERT_CAPACITANCE: f64 = 99.999581e-12;

pub fn lead(label: &str, series: (f64, f64), shunt: (f64, f64)) -> Lead {
    Lead::new(label, series, shunt, W, LEAD_RELATIVE_UNCERTAINTY)
}

pub fn leads() -> BuildupLeads {
    let hv1 = lead("hv1", (0.286, 0.782e-6), (0.28e-9, 255.2e-12));
    BuildupLeads {
        common: hv1.clone(),
        hv1,
        lv1: lead("lv1", (0.302, 0.616e-6), (0.20e-9, 93.6e-12)),
        hv2: lead("hv2", (0.160, 0.830e-6), (0.30e-9, 260.6e-12)),
        lv2: lead("lv2", (0.273, 1.101e-6), (0.36e-9, 169.8e-12)),
        transformer: lead("100 to 1", (3.7e-2, 8.1e-7), (3.4e-10, 5.24e-11)),
    }
}

pub fn capacitor(label: &str, nominal: f64, hv: (f64, f64), lv: (f64, f64)) -> Capacitor {
    Capacitor::new(label, (0.0, nominal), hv, lv, W, SCREEN_RELATIVE_UNCERTAINTY)
}

pub fn capacitors() -> Vec<Capacitor> {
    let none = (0.0, 0.0);
    vec![
        capacitor("AH11A1", 10e-12, (1.62e-9, 84.2e-12), (0.72e-9, 120.8e-12)),
        capacitor("AH11B1", 10e-12, (2.48e-9, 83.6e-12), (0.70e-9, 117.5e-12)),
        capacitor("AH11C1", 100e-12, (2.06e-9, 104.1e-12), (0.57e-9, 87.7e-12)),
        capacitor("AH11D1", 100e-12, (2.15e-9, 100.2e-12), (1.04e-9, 93.9e-12)),
        capacitor("AH11A2", 10e-12, (1.62e-9, 84.2e-12), (0.43e-9, 119.1e-12)),
        capacitor("AH11B2", 10e-12, (1.62e-9, 77.8e-12), (0.40e-9, 112.9e-12)),
        capacitor("AH11C2", 100e-12, (1.96e-9, 101.2e-12), (0.56e-9, 104.8e-12)),
        capacitor("AH11D2", 100e-12, (1.91e-9, 102.4e-12), (0.31e-9, 101.9e-12)),
        capacitor("ES14", 0.5e-12, none, none),
        capacitor("ES13", 5e-12, (8e-10, 2.05e-10), none),
        capacitor("ES16", 5e-12, (6e-10, 1.85e-10), none),
        capacitor("GR10", 10e-12, none, none),
        capacitor("GR100", 100e-12, none, none),
        capacitor("GR1000A", 1000e-12, none, none),
        capacitor("GR1000B", 1000e-12, none, none),
    ]
}

pub fn bank() -> Bank {
    Bank::new(capacitors(), leads()).expect("fixture bank is complete")
}

/// Certificate admittance of AH11C1 at `W`
pub fn certificate() -> UComplex {
    let g = UReal::new(
        1.9e-6 * W * CERT_CAPACITANCE,
        0.6e-6 / 2.0 * W * CERT_CAPACITANCE,
        50.0,
        "ah11c1d",
    );
    let c = UReal::new(
        CERT_CAPACITANCE,
        CERT_CAPACITANCE * 0.11e-6 / 2.0,
        50.0,
        "ah11c1c",
    );
    UComplex::from_parts(g, c * W)
}

pub fn factors() -> CalibrationFactors {
    CalibrationFactors::new(
        UComplex::new(
            Complex64::new(1.0003093210681406, 0.0007497042903003306),
            (1e-10, 1e-10),
            100.0,
            "factora",
        ),
        UComplex::new(
            Complex64::new(1.0001942917392947, -0.00023893092658472306),
            (1e-10, 1e-10),
            100.0,
            "factorb",
        ),
    )
}

pub fn main_ratio() -> UComplex {
    UComplex::new(
        Complex64::new(10.00001763921027, -0.0001684930432066416),
        (1e-10, 1e-10),
        100.0,
        "main_ratio",
    )
}

/// Balance r4 of the AH11A1 transfer with a published result
pub const R4: (f64, f64) = (0.009509873317187823, 1.25);

/// Readings r1..r15 of a complete buildup; r9 repeats r4 so the cross check
/// closes
pub fn balances() -> BalanceSet {
    [
        ("r1", (-0.2153, 0.84)),
        ("r2", (0.1762, -0.31)),
        ("r3", (0.0871, 0.52)),
        ("r4", R4),
        ("r5", (0.0412, 0.97)),
        ("r6", (-0.0365, 1.08)),
        ("r7", (0.0228, 0.66)),
        ("r8", (0.1135, -0.42)),
        ("r9", R4),
        ("r10", (-0.0517, 0.33)),
        ("r11", (0.0634, -0.18)),
        ("r12", (0.0049, 0.27)),
        ("r13", (0.1482, -0.76)),
        ("r14", (-0.3117, 2.41)),
        ("r15", (-0.2894, 2.17)),
    ]
    .into_iter()
    .collect()
}

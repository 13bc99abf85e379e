//! Benchmarks for the scale buildup
//!
//! Times lead corrections, the dial calibration and a complete buildup over
//! the test bank.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use capscale_core::buildup::{run_buildup, Standard};
use capscale_core::calibration::{DialBalance, DialCalibration};
use capscale_core::config::BuildupConfig;
use capscale_core::network::lead_correction;
use capscale_gum::UComplex;
use num_complex::Complex64;

#[path = "../tests/common/mod.rs"]
mod common;

fn bench_lead_correction(c: &mut Criterion) {
    let bank = common::bank();
    let a1 = bank.capacitor(Standard::Ah11A1).expect("fixture standard");
    let leads = bank.leads();

    c.bench_function("lead_correction", |b| {
        b.iter(|| black_box(lead_correction(a1, &leads.hv1, &leads.lv1)))
    });
}

fn bench_dial_calibration(c: &mut Criterion) {
    let cal = DialCalibration {
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
    };

    let config = BuildupConfig::default();

    c.bench_function("dial_calibration", |b| b.iter(|| black_box(cal.solve(&config))));
}

fn bench_full_buildup(c: &mut Criterion) {
    let balances = common::balances();
    let factors = common::factors();
    let main_ratio = common::main_ratio();
    let certificate = common::certificate();
    let config = BuildupConfig::default();

    c.bench_function("full_buildup", |b| {
        b.iter(|| {
            let mut bank = common::bank();
            black_box(run_buildup(
                &mut bank,
                &balances,
                &factors,
                &main_ratio,
                &certificate,
                &config,
            ))
        })
    });
}

criterion_group!(
    benches,
    bench_lead_correction,
    bench_dial_calibration,
    bench_full_buildup
);
criterion_main!(benches);

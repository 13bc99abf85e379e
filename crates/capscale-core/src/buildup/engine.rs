//! Scale buildup engine
//!
//! Every derived value comes from a ratio balance against a value already
//! known:
//!
//! ```text
//! ratio   = main_ratio / (1 + r (alpha A + j beta B))
//! unknown = known / ratio    (smaller unknown)
//! unknown = known * ratio    (larger unknown)
//! ```
//!
//! Known values are taken at the far end of their leads (best value minus
//! lead correction) and derived values have their own lead correction added
//! back.

use capscale_gum::UComplex;
use log::{debug, info, warn};

use super::bank::Bank;
use super::decompose::decompose_pair;
use super::{BestValues, Stage, Standard};
use crate::balance::{BalanceReading, BalanceSet};
use crate::calibration::CalibrationFactors;
use crate::config::BuildupConfig;
use crate::constants::NEAR_ZERO;
use crate::error::{BuildupError, CalibrationError, ConfigError};
use crate::network::{check_frequency, lead_correction, Cable};

/// Balance position and target of every single-ratio transfer, per stage
const TEN_PF_TRANSFERS: [(&str, Standard); 5] = [
    ("r4", Standard::Ah11A1),
    ("r5", Standard::Ah11B1),
    ("r6", Standard::Ah11A2),
    ("r7", Standard::Ah11B2),
    ("r8", Standard::Gr10),
];

const HUNDRED_PF_TRANSFERS: [(&str, Standard); 4] = [
    ("r10", Standard::Ah11D1),
    ("r11", Standard::Ah11C2),
    ("r12", Standard::Ah11D2),
    ("r13", Standard::Gr100),
];

const THOUSAND_PF_TRANSFERS: [(&str, Standard); 2] =
    [("r14", Standard::Gr1000A), ("r15", Standard::Gr1000B)];

const CROSS_CHECK_BALANCE: &str = "r9";
const PARALLEL_BALANCE: &str = "r3";
const PAIR_BALANCES: (&str, &str) = ("r1", "r2");

/// The reference value re-derived through AH11A1, compared with the
/// reference measured directly
#[derive(Debug, Clone)]
pub struct CrossCheck {
    pub value: UComplex,
    pub reference: UComplex,
    /// Relative difference of the capacitances, ppm
    pub discrepancy_ppm: f64,
}

/// Result of a complete buildup
#[derive(Debug, Clone)]
pub struct BuildupOutcome {
    pub values: BestValues,
    pub cross_check: CrossCheck,
}

/// One buildup over a bank with fixed calibration inputs
pub struct ScaleBuildup<'a> {
    bank: &'a Bank,
    balances: &'a BalanceSet,
    factors: &'a CalibrationFactors,
    main_ratio: &'a UComplex,
    injection_ratio: f64,
    cross_check_tolerance_ppm: f64,
}

impl<'a> ScaleBuildup<'a> {
    pub fn new(
        bank: &'a Bank,
        balances: &'a BalanceSet,
        factors: &'a CalibrationFactors,
        main_ratio: &'a UComplex,
        config: &BuildupConfig,
    ) -> Result<Self, ConfigError> {
        check_frequency(
            "bank",
            bank.angular_frequency(),
            "configuration",
            config.angular_frequency,
        )?;
        Ok(Self {
            bank,
            balances,
            factors,
            main_ratio,
            injection_ratio: config.injection_ratio,
            cross_check_tolerance_ppm: config.cross_check_tolerance_ppm,
        })
    }

    /// `main_ratio / (1 + r (alpha A + j beta B))`
    pub fn cap_ratio_factor(&self, balance: &BalanceReading) -> Result<UComplex, CalibrationError> {
        let denominator = 1.0 + self.factors.apply(balance) * self.injection_ratio;
        if denominator.norm() < NEAR_ZERO {
            return Err(CalibrationError::DegenerateRatio("balance ratio"));
        }
        Ok(self.main_ratio / denominator)
    }

    /// Value of the unknown side of a balance against `known`
    ///
    /// With `inverse` the unknown is the smaller of the two.
    pub fn cap_ratio(
        &self,
        balance: &BalanceReading,
        known: &UComplex,
        inverse: bool,
    ) -> Result<UComplex, CalibrationError> {
        let ratio = self.cap_ratio_factor(balance)?;
        if inverse {
            Ok(known / ratio)
        } else {
            Ok(known * ratio)
        }
    }

    /// Lead correction of a standard in its buildup wiring
    fn correction(&self, standard: Standard) -> Result<UComplex, ConfigError> {
        let element = self.bank.element(standard)?;
        let wiring = self.bank.wiring(standard);
        Ok(lead_correction(element, wiring.hv, wiring.lv))
    }

    /// Value of `standard` at the far end of the given leads
    fn at_leads(
        &self,
        state: &BestValues,
        stage: Stage,
        standard: Standard,
        hv: &dyn Cable,
        lv: &dyn Cable,
    ) -> Result<UComplex, BuildupError> {
        let best = state.require(standard, stage)?;
        let element = self.bank.element(standard)?;
        Ok(best - lead_correction(element, hv, lv))
    }

    /// The reference as measured through the transformer and HV2/LV2 leads
    fn reference_at_leads(&self, state: &BestValues, stage: Stage) -> Result<UComplex, BuildupError> {
        let wiring = self.bank.wiring(Standard::Ah11C1);
        self.at_leads(state, stage, Standard::Ah11C1, wiring.hv, wiring.lv)
    }

    /// AH11A1 as measured through its own leads
    fn first_ten_pf_at_leads(
        &self,
        state: &BestValues,
        stage: Stage,
    ) -> Result<UComplex, BuildupError> {
        let wiring = self.bank.wiring(Standard::Ah11A1);
        self.at_leads(state, stage, Standard::Ah11A1, wiring.hv, wiring.lv)
    }

    fn transfer(
        &self,
        next: &mut BestValues,
        transfers: &[(&str, Standard)],
        known: &UComplex,
        inverse: bool,
    ) -> Result<(), BuildupError> {
        for (position, standard) in transfers {
            let balance = self.balances.get(position)?;
            let value = self.cap_ratio(&balance, known, inverse)? + self.correction(*standard)?;
            debug!("{} from {}: {}", standard, position, value);
            next.insert(*standard, value);
        }
        Ok(())
    }

    /// Run one stage on the best values of the stages before it
    pub fn advance(
        &self,
        stage: Stage,
        state: &BestValues,
        certificate: &UComplex,
    ) -> Result<BestValues, BuildupError> {
        debug!("buildup stage '{}'", stage);
        let mut next = state.clone();
        match stage {
            Stage::Seed => {
                next.insert(Standard::Ah11C1, certificate.clone());
            }
            Stage::TenPicofarad => {
                let c1 = self.reference_at_leads(state, stage)?;
                self.transfer(&mut next, &TEN_PF_TRANSFERS, &c1, true)?;
            }
            Stage::HundredPicofarad => {
                // the cross check balance is taken in this stage
                self.balances.get(CROSS_CHECK_BALANCE)?;
                let ref2 = self.first_ten_pf_at_leads(state, stage)?;
                self.transfer(&mut next, &HUNDRED_PF_TRANSFERS, &ref2, false)?;
            }
            Stage::ThousandPicofarad => {
                let leads = self.bank.leads();
                let ref3 = self.at_leads(state, stage, Standard::Ah11C1, &leads.hv2, &leads.lv2)?;
                self.transfer(&mut next, &THOUSAND_PF_TRANSFERS, &ref3, false)?;
            }
            Stage::Decomposition => {
                // the parallel sum is kept as balanced, no lead correction
                let c1 = self.reference_at_leads(state, stage)?;
                let sum = self.cap_ratio(&self.balances.get(PARALLEL_BALANCE)?, &c1, true)?;

                let ratio1 = 1.0 / self.cap_ratio_factor(&self.balances.get(PAIR_BALANCES.0)?)?;
                let ratio2 = 1.0 / self.cap_ratio_factor(&self.balances.get(PAIR_BALANCES.1)?)?;
                let common = &self.bank.leads().common;
                let no_lead = self.bank.no_lead();
                let lead13 =
                    lead_correction(self.bank.capacitor(Standard::Es13)?, common, no_lead);
                let lead16 =
                    lead_correction(self.bank.capacitor(Standard::Es16)?, common, no_lead);

                let pair = decompose_pair(&sum, &ratio1, &ratio2, &lead13, &lead16)?;
                next.insert(Standard::Es13Es16, sum);
                next.insert(Standard::Es13, pair.first);
                next.insert(Standard::Es16, pair.second);
                next.insert(Standard::Es14, pair.reference);
            }
        }
        info!(
            "stage '{}' assigned {}",
            stage,
            stage
                .assigns()
                .iter()
                .map(|s| s.label())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(next)
    }

    /// The reference re-derived from AH11A1 through balance r9
    pub fn cross_check(&self, state: &BestValues) -> Result<CrossCheck, BuildupError> {
        let stage = Stage::HundredPicofarad;
        let reference = self.reference_at_leads(state, stage)?;
        let ref2 = self.first_ten_pf_at_leads(state, stage)?;
        let value = self.cap_ratio(&self.balances.get(CROSS_CHECK_BALANCE)?, &ref2, false)?;

        let discrepancy_ppm = (value.x().im / reference.x().im - 1.0) * 1e6;
        if discrepancy_ppm.abs() > self.cross_check_tolerance_ppm {
            warn!(
                "buildup cross check differs from the reference by {:.3} ppm",
                discrepancy_ppm
            );
        } else {
            info!("buildup cross check: {:.3} ppm", discrepancy_ppm);
        }
        Ok(CrossCheck {
            value,
            reference,
            discrepancy_ppm,
        })
    }

    /// Run every stage without touching the bank
    pub fn run(&self, certificate: &UComplex) -> Result<BuildupOutcome, BuildupError> {
        let mut state = BestValues::new();
        for stage in Stage::ALL {
            state = self.advance(stage, &state, certificate)?;
        }
        let cross_check = self.cross_check(&state)?;
        Ok(BuildupOutcome {
            values: state,
            cross_check,
        })
    }
}

/// Run the buildup and write each completed stage to the bank
///
/// On failure the stages before the failing one stay applied and the
/// failing stage writes nothing.
pub fn run_buildup(
    bank: &mut Bank,
    balances: &BalanceSet,
    factors: &CalibrationFactors,
    main_ratio: &UComplex,
    certificate: &UComplex,
    config: &BuildupConfig,
) -> Result<BuildupOutcome, BuildupError> {
    let mut state = BestValues::new();
    for stage in Stage::ALL {
        let engine = ScaleBuildup::new(bank, balances, factors, main_ratio, config)?;
        state = engine.advance(stage, &state, certificate)?;
        bank.apply(stage, &state);
    }
    let cross_check =
        ScaleBuildup::new(bank, balances, factors, main_ratio, config)?.cross_check(&state)?;
    Ok(BuildupOutcome {
        values: state,
        cross_check,
    })
}

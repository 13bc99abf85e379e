//! The capacitor bank and the leads it is measured with

use std::collections::BTreeMap;

use capscale_gum::UComplex;
use log::debug;

use super::{BestValues, Stage, Standard};
use crate::error::ConfigError;
use crate::network::{
    check_frequency, Cable, Capacitor, Lead, LeadPair, ParallelCapacitor, SeriesConnection,
    TwoTerminalPair,
};

/// Leads used during a buildup
#[derive(Debug, Clone)]
pub struct BuildupLeads {
    /// HV lead of the 10 pF AH11 units
    pub hv1: Lead,
    /// LV lead of the 10 pF AH11 units
    pub lv1: Lead,
    /// HV lead of the 100 pF AH11 units
    pub hv2: Lead,
    /// LV lead of the 100 pF AH11 units
    pub lv2: Lead,
    /// Lead of the 100:1 injection transformer
    pub transformer: Lead,
    /// Short common HV lead of the paralleled 5 pF pair
    pub common: Lead,
}

impl BuildupLeads {
    fn all(&self) -> [&Lead; 6] {
        [
            &self.hv1,
            &self.lv1,
            &self.hv2,
            &self.lv2,
            &self.transformer,
            &self.common,
        ]
    }
}

/// Every standard of the bank, its leads, and the best values assigned so
/// far
#[derive(Debug, Clone)]
pub struct Bank {
    w: f64,
    capacitors: BTreeMap<Standard, Capacitor>,
    parallel: ParallelCapacitor,
    leads: BuildupLeads,
    hv2_transformer: SeriesConnection,
    no_lead: Lead,
}

impl Bank {
    /// Assemble the bank
    ///
    /// Every standard must be present exactly once and every element must
    /// be defined at the angular frequency of the HV1 lead.
    pub fn new(capacitors: Vec<Capacitor>, leads: BuildupLeads) -> Result<Self, ConfigError> {
        let w = leads.hv1.angular_frequency();
        for lead in leads.all() {
            check_frequency(leads.hv1.label(), w, lead.label(), lead.angular_frequency())?;
        }

        let mut by_standard = BTreeMap::new();
        for capacitor in capacitors {
            let standard = Standard::from_label(capacitor.label())
                .filter(|s| *s != Standard::Es13Es16)
                .ok_or_else(|| ConfigError::UnknownStandard(capacitor.label().to_string()))?;
            check_frequency(
                leads.hv1.label(),
                w,
                capacitor.label(),
                capacitor.angular_frequency(),
            )?;
            if by_standard.contains_key(&standard) {
                return Err(ConfigError::DuplicateStandard(standard.label().to_string()));
            }
            by_standard.insert(standard, capacitor);
        }
        for standard in Standard::CAPACITORS {
            if !by_standard.contains_key(&standard) {
                return Err(ConfigError::MissingStandard(standard.label().to_string()));
            }
        }

        let hv2_transformer = SeriesConnection::new(&leads.transformer, &leads.hv2)?;
        let no_lead = Lead::none(w, leads.transformer.relative_uncertainty());
        let parallel = {
            let es13 = lookup(&by_standard, Standard::Es13)?;
            let es16 = lookup(&by_standard, Standard::Es16)?;
            let wiring = LeadPair::new(&leads.transformer, &no_lead);
            ParallelCapacitor::new(Standard::Es13Es16.label(), es13, es16, wiring, wiring)?
        };

        debug!("bank assembled at {} rad/s", w);
        Ok(Self {
            w,
            capacitors: by_standard,
            parallel,
            leads,
            hv2_transformer,
            no_lead,
        })
    }

    #[inline]
    pub fn angular_frequency(&self) -> f64 {
        self.w
    }

    #[inline]
    pub fn leads(&self) -> &BuildupLeads {
        &self.leads
    }

    /// The zero element standing in where no lead is connected
    #[inline]
    pub fn no_lead(&self) -> &Lead {
        &self.no_lead
    }

    /// Transformer lead in series with the HV2 lead
    #[inline]
    pub fn hv2_transformer(&self) -> &SeriesConnection {
        &self.hv2_transformer
    }

    /// An individual capacitor
    pub fn capacitor(&self, standard: Standard) -> Result<&Capacitor, ConfigError> {
        lookup(&self.capacitors, standard)
    }

    #[inline]
    pub fn parallel(&self) -> &ParallelCapacitor {
        &self.parallel
    }

    /// Any standard, the parallel pair included, as a two-terminal-pair
    pub fn element(&self, standard: Standard) -> Result<&dyn TwoTerminalPair, ConfigError> {
        match standard {
            Standard::Es13Es16 => Ok(&self.parallel as &dyn TwoTerminalPair),
            other => self.capacitor(other).map(|c| c as &dyn TwoTerminalPair),
        }
    }

    /// Leads a standard is measured through during the buildup
    ///
    /// The buildup stores the ES13_16 sum as balanced, without a correction
    /// for the common lead; that lead enters only through the individual
    /// ES13 and ES16 corrections of the decomposition. Its wiring and the
    /// screens folded into [`Bank::parallel`] serve callers that want the
    /// correction of the combination itself.
    pub fn wiring(&self, standard: Standard) -> LeadPair<'_> {
        match standard {
            Standard::Ah11A1 | Standard::Ah11B1 | Standard::Ah11A2 | Standard::Ah11B2 => {
                LeadPair::new(&self.leads.hv1, &self.leads.lv1)
            }
            Standard::Ah11C1 | Standard::Ah11D1 | Standard::Ah11C2 | Standard::Ah11D2 => {
                LeadPair::new(&self.hv2_transformer, &self.leads.lv2)
            }
            Standard::Gr10 | Standard::Gr100 | Standard::Es14 => {
                LeadPair::new(&self.no_lead, &self.no_lead)
            }
            Standard::Gr1000A | Standard::Gr1000B | Standard::Es13 | Standard::Es16 => {
                LeadPair::new(&self.leads.transformer, &self.no_lead)
            }
            Standard::Es13Es16 => LeadPair::new(&self.leads.common, &self.no_lead),
        }
    }

    /// Current best value of a standard
    pub fn best_value(&self, standard: Standard) -> Option<&UComplex> {
        match standard {
            Standard::Es13Es16 => self.parallel.best_value(),
            other => self.capacitors.get(&other).and_then(|c| c.best_value()),
        }
    }

    /// Write the values a stage assigned back to their standards
    pub fn apply(&mut self, stage: Stage, values: &BestValues) {
        for standard in stage.assigns() {
            let Some(value) = values.get(*standard) else {
                continue;
            };
            match standard {
                Standard::Es13Es16 => self.parallel.set_best_value(value.clone()),
                other => {
                    if let Some(c) = self.capacitors.get_mut(other) {
                        c.set_best_value(value.clone());
                    }
                }
            }
        }
    }
}

fn lookup(
    capacitors: &BTreeMap<Standard, Capacitor>,
    standard: Standard,
) -> Result<&Capacitor, ConfigError> {
    capacitors
        .get(&standard)
        .ok_or_else(|| ConfigError::MissingStandard(standard.label().to_string()))
}

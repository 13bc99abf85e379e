//! Buildup module - propagation of one certified value through the bank
//!
//! The buildup is a fixed sequence of stages. Each stage is a pure function
//! from the best values known so far to an extended set of best values;
//! [`run_buildup`] applies the stages in order and writes each completed
//! stage back to the [`Bank`].

mod bank;
mod decompose;
mod engine;

pub use bank::{Bank, BuildupLeads};
pub use decompose::{decompose_pair, PairedDecomposition};
pub use engine::{run_buildup, BuildupOutcome, CrossCheck, ScaleBuildup};

use std::collections::BTreeMap;
use std::fmt;

use capscale_gum::UComplex;

use crate::error::BuildupError;

/// The standards of the bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Standard {
    Ah11A1,
    Ah11B1,
    Ah11C1,
    Ah11D1,
    Ah11A2,
    Ah11B2,
    Ah11C2,
    Ah11D2,
    Gr10,
    Gr100,
    Gr1000A,
    Gr1000B,
    Es13,
    Es14,
    Es16,
    /// ES13 and ES16 in parallel
    Es13Es16,
}

impl Standard {
    /// Individual capacitors, in bank order
    pub const CAPACITORS: [Standard; 15] = [
        Standard::Ah11A1,
        Standard::Ah11B1,
        Standard::Ah11C1,
        Standard::Ah11D1,
        Standard::Ah11A2,
        Standard::Ah11B2,
        Standard::Ah11C2,
        Standard::Ah11D2,
        Standard::Gr10,
        Standard::Gr100,
        Standard::Gr1000A,
        Standard::Gr1000B,
        Standard::Es13,
        Standard::Es14,
        Standard::Es16,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Standard::Ah11A1 => "AH11A1",
            Standard::Ah11B1 => "AH11B1",
            Standard::Ah11C1 => "AH11C1",
            Standard::Ah11D1 => "AH11D1",
            Standard::Ah11A2 => "AH11A2",
            Standard::Ah11B2 => "AH11B2",
            Standard::Ah11C2 => "AH11C2",
            Standard::Ah11D2 => "AH11D2",
            Standard::Gr10 => "GR10",
            Standard::Gr100 => "GR100",
            Standard::Gr1000A => "GR1000A",
            Standard::Gr1000B => "GR1000B",
            Standard::Es13 => "ES13",
            Standard::Es14 => "ES14",
            Standard::Es16 => "ES16",
            Standard::Es13Es16 => "ES13_16",
        }
    }

    /// Parse a label (case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        let upper = label.to_uppercase();
        Standard::CAPACITORS
            .iter()
            .chain(std::iter::once(&Standard::Es13Es16))
            .copied()
            .find(|s| s.label() == upper)
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stages of the buildup, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Certificate assigned to the reference
    Seed,
    /// 10 pF units and GR10 from the reference
    TenPicofarad,
    /// Remaining 100 pF units and GR100 from AH11A1
    HundredPicofarad,
    /// 1000 pF units from the reference without the transformer
    ThousandPicofarad,
    /// 5 pF pair and the 0.5 pF unit
    Decomposition,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Seed,
        Stage::TenPicofarad,
        Stage::HundredPicofarad,
        Stage::ThousandPicofarad,
        Stage::Decomposition,
    ];

    /// Standards whose best values the stage assigns
    pub fn assigns(&self) -> &'static [Standard] {
        match self {
            Stage::Seed => &[Standard::Ah11C1],
            Stage::TenPicofarad => &[
                Standard::Ah11A1,
                Standard::Ah11B1,
                Standard::Ah11A2,
                Standard::Ah11B2,
                Standard::Gr10,
            ],
            Stage::HundredPicofarad => &[
                Standard::Ah11D1,
                Standard::Ah11C2,
                Standard::Ah11D2,
                Standard::Gr100,
            ],
            Stage::ThousandPicofarad => &[Standard::Gr1000A, Standard::Gr1000B],
            Stage::Decomposition => &[
                Standard::Es13Es16,
                Standard::Es13,
                Standard::Es16,
                Standard::Es14,
            ],
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Seed => "seed",
            Stage::TenPicofarad => "10 pF",
            Stage::HundredPicofarad => "100 pF",
            Stage::ThousandPicofarad => "1000 pF",
            Stage::Decomposition => "decomposition",
        };
        f.write_str(name)
    }
}

/// Best values keyed by standard
#[derive(Debug, Clone, Default)]
pub struct BestValues {
    values: BTreeMap<Standard, UComplex>,
}

impl BestValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best value of `standard`, required by `stage`
    pub fn require(&self, standard: Standard, stage: Stage) -> Result<&UComplex, BuildupError> {
        self.values
            .get(&standard)
            .ok_or(BuildupError::Precondition {
                stage,
                label: standard.label(),
            })
    }

    #[inline]
    pub fn get(&self, standard: Standard) -> Option<&UComplex> {
        self.values.get(&standard)
    }

    pub fn insert(&mut self, standard: Standard, value: UComplex) {
        self.values.insert(standard, value);
    }

    #[inline]
    pub fn contains(&self, standard: Standard) -> bool {
        self.values.contains_key(&standard)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Standard, &UComplex)> {
        self.values.iter().map(|(s, v)| (*s, v))
    }
}

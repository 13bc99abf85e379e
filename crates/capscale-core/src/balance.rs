//! Bridge balance readings
//!
//! A balance is the pair of (alpha, beta) dial settings recorded at a null,
//! identified by the name of the measurement position (`r4`, `s7`, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Alpha and beta dial settings at a bridge null
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BalanceReading {
    pub alpha: f64,
    pub beta: f64,
}

impl BalanceReading {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }
}

impl From<(f64, f64)> for BalanceReading {
    fn from((alpha, beta): (f64, f64)) -> Self {
        Self { alpha, beta }
    }
}

/// Balance readings keyed by measurement position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceSet {
    readings: BTreeMap<String, BalanceReading>,
}

impl BalanceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reading, replacing any earlier one at the same position
    pub fn insert(&mut self, name: impl Into<String>, reading: impl Into<BalanceReading>) {
        self.readings.insert(name.into(), reading.into());
    }

    /// Reading at `name`; a missing position is a configuration error
    pub fn get(&self, name: &str) -> Result<BalanceReading, ConfigError> {
        self.readings
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::MissingBalance(name.to_string()))
    }

    /// Remove the reading at `name`
    pub fn remove(&mut self, name: &str) -> Option<BalanceReading> {
        self.readings.remove(name)
    }

    /// Readings `<prefix>1` to `<prefix><count>` in numeric order
    pub fn sequence(&self, prefix: &str, count: usize) -> Result<Vec<BalanceReading>, ConfigError> {
        (1..=count)
            .map(|i| self.get(&format!("{prefix}{i}")))
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BalanceReading)> {
        self.readings.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, R: Into<BalanceReading>> FromIterator<(K, R)> for BalanceSet {
    fn from_iter<I: IntoIterator<Item = (K, R)>>(iter: I) -> Self {
        let mut set = BalanceSet::new();
        for (name, reading) in iter {
            set.insert(name, reading);
        }
        set
    }
}

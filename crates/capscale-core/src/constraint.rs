//! Drift constraint on the reference
//!
//! Two external calibrations of the reference, at known decimal-year dates,
//! fix a straight line for its relative error (ppm). The line predicts the
//! certificate value on the day of a buildup.

use capscale_gum::{UComplex, UReal};

use crate::error::ConfigError;

/// Straight line of relative error, ppm, against decimal year
#[derive(Debug, Clone)]
pub struct DriftLine {
    slope: UReal,
    intercept: UReal,
}

impl DriftLine {
    /// Line through `(first_year, first)` and `(second_year, second)`
    pub fn new(
        (first_year, first): (f64, UReal),
        (second_year, second): (f64, UReal),
    ) -> Result<Self, ConfigError> {
        let span = second_year - first_year;
        if !span.is_finite() || span == 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "calibration date span".to_string(),
                value: span,
            });
        }
        let slope = (&second - &first) / span;
        let intercept = &first - &slope * first_year;
        Ok(Self { slope, intercept })
    }

    /// ppm per year
    #[inline]
    pub fn slope(&self) -> &UReal {
        &self.slope
    }

    /// ppm at year zero
    #[inline]
    pub fn intercept(&self) -> &UReal {
        &self.intercept
    }

    /// Predicted relative error at `year`, ppm
    pub fn at(&self, year: f64) -> UReal {
        &self.slope * year + &self.intercept
    }

    /// Predicted capacitance at `year` of a standard of nominal value
    /// `nominal` (F)
    pub fn capacitance_at(&self, year: f64, nominal: f64) -> UReal {
        (self.at(year) * 1e-6 + 1.0) * nominal
    }

    /// Predicted certificate admittance at `year`
    pub fn certificate_at(
        &self,
        year: f64,
        nominal: f64,
        conductance: &UReal,
        w: f64,
    ) -> UComplex {
        certificate_admittance(conductance, &self.capacitance_at(year, nominal), w)
    }
}

/// Admittance `G + jwC` of a certified standard
pub fn certificate_admittance(conductance: &UReal, capacitance: &UReal, w: f64) -> UComplex {
    UComplex::from_parts(conductance.clone(), capacitance * w)
}

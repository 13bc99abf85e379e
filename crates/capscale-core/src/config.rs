//! Buildup configuration
//!
//! Settings of the bridge and the calibration procedure, loadable from TOML.
//! Calibration factors and the main ratio are normally computed by the
//! preceding calibrations; [`Overrides`] replaces any of them with a stored
//! value, resolved once by [`CalibrationInputs::resolve`].

use capscale_gum::UComplex;
use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationFactors;
use crate::constants::{
    DEFAULT_ANGULAR_FREQUENCY, DEFAULT_CROSS_CHECK_TOLERANCE_PPM, DEFAULT_INJECTION_RATIO,
    DEFAULT_PERMUTATION_INJECTION_RATIO, DEFAULT_RATIO_REFINEMENTS, DEFAULT_SINGULAR_TOLERANCE,
};
use crate::error::ConfigError;
use crate::records::ComplexRecord;

/// Stored values replacing computed calibration results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor_a: Option<ComplexRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor_b: Option<ComplexRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_ratio: Option<ComplexRecord>,
}

/// Settings of one buildup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildupConfig {
    /// rad/s
    pub angular_frequency: f64,
    /// Injection ratio of the buildup balances
    pub injection_ratio: f64,
    /// Injection ratio of the permutation run
    pub permutation_injection_ratio: f64,
    /// Number of times the ratio lead correction is applied
    pub ratio_refinements: usize,
    /// ppm
    pub cross_check_tolerance_ppm: f64,
    /// Relative determinant below which the dial system is singular
    pub singular_tolerance: f64,
    pub overrides: Overrides,
}

impl Default for BuildupConfig {
    fn default() -> Self {
        Self {
            angular_frequency: DEFAULT_ANGULAR_FREQUENCY,
            injection_ratio: DEFAULT_INJECTION_RATIO,
            permutation_injection_ratio: DEFAULT_PERMUTATION_INJECTION_RATIO,
            ratio_refinements: DEFAULT_RATIO_REFINEMENTS,
            cross_check_tolerance_ppm: DEFAULT_CROSS_CHECK_TOLERANCE_PPM,
            singular_tolerance: DEFAULT_SINGULAR_TOLERANCE,
            overrides: Overrides::default(),
        }
    }
}

impl BuildupConfig {
    /// Parse and validate a TOML document; absent keys take their defaults
    ///
    /// # Example
    /// ```
    /// use capscale_core::config::BuildupConfig;
    /// let config = BuildupConfig::from_toml_str("ratio_refinements = 3").unwrap();
    /// assert_eq!(config.ratio_refinements, 3);
    /// assert_eq!(config.angular_frequency, 1e4);
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: BuildupConfig =
            toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("angular_frequency", self.angular_frequency),
            ("injection_ratio", self.injection_ratio),
            ("permutation_injection_ratio", self.permutation_injection_ratio),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, value));
            }
        }
        let non_negative = [
            ("cross_check_tolerance_ppm", self.cross_check_tolerance_ppm),
            ("singular_tolerance", self.singular_tolerance),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, value));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, value: f64) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value,
    }
}

/// Dial factors and main ratio feeding a buildup
#[derive(Debug, Clone)]
pub struct CalibrationInputs {
    pub factors: CalibrationFactors,
    pub main_ratio: UComplex,
}

impl CalibrationInputs {
    /// Take each input from the overrides if given, else from the computed
    /// value; an input with neither is a configuration error
    pub fn resolve(
        config: &BuildupConfig,
        computed_factors: Option<&CalibrationFactors>,
        computed_ratio: Option<&UComplex>,
    ) -> Result<Self, ConfigError> {
        let overrides = &config.overrides;
        let factor_a = match (&overrides.factor_a, computed_factors) {
            (Some(record), _) => record.to_ucomplex(),
            (None, Some(f)) => f.factor_a.clone(),
            (None, None) => return Err(ConfigError::MissingInput("factor_a")),
        };
        let factor_b = match (&overrides.factor_b, computed_factors) {
            (Some(record), _) => record.to_ucomplex(),
            (None, Some(f)) => f.factor_b.clone(),
            (None, None) => return Err(ConfigError::MissingInput("factor_b")),
        };
        let main_ratio = match (&overrides.main_ratio, computed_ratio) {
            (Some(record), _) => record.to_ucomplex(),
            (None, Some(r)) => r.clone(),
            (None, None) => return Err(ConfigError::MissingInput("main_ratio")),
        };
        Ok(Self {
            factors: CalibrationFactors::new(factor_a, factor_b),
            main_ratio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BuildupConfig::default();
        assert_eq!(config.angular_frequency, 1e4);
        assert_eq!(config.injection_ratio, 1e-4);
        assert_eq!(config.ratio_refinements, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_injection_ratio() {
        let err = BuildupConfig::from_toml_str("injection_ratio = 0.0").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                field: "injection_ratio".to_string(),
                value: 0.0
            }
        );
        assert!(matches!(
            BuildupConfig::from_toml_str("injection_ratio = \"x\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_resolve_requires_every_input() {
        let config = BuildupConfig::default();
        let err = CalibrationInputs::resolve(&config, None, Some(&UComplex::from(10.0))).unwrap_err();
        assert_eq!(err, ConfigError::MissingInput("factor_a"));
    }
}

//! Coaxial leads and their series connection

use capscale_gum::UComplex;
use num_complex::Complex64;

use super::{check_frequency, check_uncertainty, Cable};
use crate::error::ConfigError;

/// Pi-equivalent model of a coaxial lead at one angular frequency
#[derive(Debug, Clone)]
pub struct Lead {
    label: String,
    w: f64,
    relative_uncertainty: f64,
    z: UComplex,
    y: UComplex,
}

impl Lead {
    /// Create a lead from measured component values
    ///
    /// Every derived component carries `relative_uncertainty` times its
    /// nominal value as standard uncertainty.
    ///
    /// # Arguments
    /// * `label` - Name of the lead, used in uncertainty budgets
    /// * `series` - (resistance in ohm, inductance in H)
    /// * `shunt` - (conductance in S, capacitance in F)
    /// * `w` - Angular frequency in rad/s
    /// * `relative_uncertainty` - Fractional uncertainty of every component
    ///
    /// # Example
    /// ```
    /// use capscale_core::network::{Cable, Lead};
    /// let hv1 = Lead::new("hv1", (0.286, 0.782e-6), (0.28e-9, 255.2e-12), 1e4, 0.05);
    /// assert_eq!(hv1.series_impedance().x().re, 0.286);
    /// ```
    pub fn new(
        label: &str,
        series: (f64, f64),
        shunt: (f64, f64),
        w: f64,
        relative_uncertainty: f64,
    ) -> Self {
        let relu = relative_uncertainty;
        let z = UComplex::new(
            Complex64::new(series.0, w * series.1),
            (series.0 * relu, series.1 * w * relu),
            f64::INFINITY,
            &format!("{label} z"),
        );
        let y = UComplex::new(
            Complex64::new(shunt.0, w * shunt.1),
            (shunt.0 * relu, shunt.1 * w * relu),
            f64::INFINITY,
            &format!("{label} y"),
        );
        Self {
            label: label.to_string(),
            w,
            relative_uncertainty,
            z,
            y,
        }
    }

    /// The zero-impedance, zero-admittance element used where no lead is
    /// connected
    pub fn none(w: f64, relative_uncertainty: f64) -> Self {
        Self::new("no lead", (0.0, 0.0), (0.0, 0.0), w, relative_uncertainty)
    }

    /// Connect `other` in series after this lead
    pub fn in_series(&self, other: &Lead) -> Result<SeriesConnection, ConfigError> {
        SeriesConnection::new(self, other)
    }
}

impl Cable for Lead {
    fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    fn angular_frequency(&self) -> f64 {
        self.w
    }

    #[inline]
    fn relative_uncertainty(&self) -> f64 {
        self.relative_uncertainty
    }

    #[inline]
    fn series_impedance(&self) -> &UComplex {
        &self.z
    }

    #[inline]
    fn shunt_admittance(&self) -> &UComplex {
        &self.y
    }
}

/// Two similar leads, differing only in length, joined end to end
///
/// Used where an injection transformer's own lead adds to the HV lead of a
/// standard.
#[derive(Debug, Clone)]
pub struct SeriesConnection {
    label: String,
    w: f64,
    relative_uncertainty: f64,
    z: UComplex,
    y: UComplex,
}

impl SeriesConnection {
    /// Join two leads; both must share angular frequency and relative
    /// uncertainty
    pub fn new(first: &Lead, second: &Lead) -> Result<Self, ConfigError> {
        check_frequency(&first.label, first.w, &second.label, second.w)?;
        check_uncertainty(
            &first.label,
            first.relative_uncertainty,
            &second.label,
            second.relative_uncertainty,
        )?;

        Ok(Self {
            label: format!("{}+{}", first.label, second.label),
            w: first.w,
            relative_uncertainty: first.relative_uncertainty,
            z: &first.z + &second.z,
            y: &first.y + &second.y,
        })
    }
}

impl Cable for SeriesConnection {
    fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    fn angular_frequency(&self) -> f64 {
        self.w
    }

    #[inline]
    fn relative_uncertainty(&self) -> f64 {
        self.relative_uncertainty
    }

    #[inline]
    fn series_impedance(&self) -> &UComplex {
        &self.z
    }

    #[inline]
    fn shunt_admittance(&self) -> &UComplex {
        &self.y
    }
}

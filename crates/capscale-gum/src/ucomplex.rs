//! Uncertain complex numbers
//!
//! A [`UComplex`] is a pair of [`UReal`] components. Holomorphic operations
//! propagate through the 2x2 real Jacobian of the complex derivative, so the
//! real and imaginary parts of a result stay correlated with every input.

use nalgebra::Matrix2;
use num_complex::Complex64;
use std::fmt;

use crate::ureal::UReal;

/// An uncertain complex number
#[derive(Debug, Clone)]
pub struct UComplex {
    re: UReal,
    im: UReal,
}

/// Real 2x2 Jacobian of multiplication by `d`
#[inline]
fn jacobian(d: Complex64) -> Matrix2<f64> {
    Matrix2::new(d.re, -d.im, d.im, d.re)
}

impl UComplex {
    /// Create an elementary complex input with independent real and
    /// imaginary uncertainties
    ///
    /// The two components appear in budgets as `<label>_re` and `<label>_im`.
    pub fn new(value: Complex64, u: (f64, f64), dof: f64, label: &str) -> Self {
        Self {
            re: UReal::new(value.re, u.0, dof, format!("{label}_re")),
            im: UReal::new(value.im, u.1, dof, format!("{label}_im")),
        }
    }

    /// An exact complex value
    pub fn constant(value: Complex64) -> Self {
        Self {
            re: UReal::constant(value.re),
            im: UReal::constant(value.im),
        }
    }

    /// Zero with no uncertainty
    pub fn zero() -> Self {
        Self::constant(Complex64::new(0.0, 0.0))
    }

    /// Assemble from real and imaginary parts
    pub fn from_parts(re: UReal, im: UReal) -> Self {
        Self { re, im }
    }

    /// Result of a holomorphic function with value `value` whose complex
    /// derivatives with respect to each argument are given in `terms`.
    pub(crate) fn holomorphic(value: Complex64, terms: &[(&UComplex, Complex64)]) -> Self {
        let mut re_terms = Vec::with_capacity(2 * terms.len());
        let mut im_terms = Vec::with_capacity(2 * terms.len());
        for (arg, d) in terms {
            let j = jacobian(*d);
            re_terms.push((&arg.re, j[(0, 0)]));
            re_terms.push((&arg.im, j[(0, 1)]));
            im_terms.push((&arg.re, j[(1, 0)]));
            im_terms.push((&arg.im, j[(1, 1)]));
        }
        Self {
            re: UReal::linear(value.re, &re_terms),
            im: UReal::linear(value.im, &im_terms),
        }
    }

    /// Central value
    #[inline]
    pub fn x(&self) -> Complex64 {
        Complex64::new(self.re.x(), self.im.x())
    }

    /// Real component
    #[inline]
    pub fn real(&self) -> &UReal {
        &self.re
    }

    /// Imaginary component
    #[inline]
    pub fn imag(&self) -> &UReal {
        &self.im
    }

    /// Split into (real, imaginary)
    pub fn into_parts(self) -> (UReal, UReal) {
        (self.re, self.im)
    }

    /// Complex conjugate
    pub fn conj(&self) -> Self {
        Self {
            re: self.re.clone(),
            im: -&self.im,
        }
    }

    /// Multiply by the imaginary unit
    pub fn mul_j(&self) -> Self {
        Self {
            re: -&self.im,
            im: self.re.clone(),
        }
    }

    /// Standard uncertainties of the (real, imaginary) components
    pub fn u(&self) -> (f64, f64) {
        (self.re.u(), self.im.u())
    }

    /// 2x2 real covariance matrix of (real, imaginary)
    pub fn covariance(&self) -> Matrix2<f64> {
        let cov = self.re.covariance(&self.im);
        Matrix2::new(self.re.variance(), cov, cov, self.im.variance())
    }

    /// Degrees of freedom, taken as the smaller of the two components
    pub fn dof(&self) -> f64 {
        self.re.dof().min(self.im.dof())
    }

    /// True when both components of the central value are finite
    pub fn is_finite(&self) -> bool {
        self.re.x().is_finite() && self.im.x().is_finite()
    }

    /// Magnitude of the central value
    #[inline]
    pub fn norm(&self) -> f64 {
        self.x().norm()
    }
}

impl From<f64> for UComplex {
    fn from(x: f64) -> Self {
        UComplex::constant(Complex64::new(x, 0.0))
    }
}

impl From<Complex64> for UComplex {
    fn from(x: Complex64) -> Self {
        UComplex::constant(x)
    }
}

impl From<UReal> for UComplex {
    fn from(re: UReal) -> Self {
        UComplex {
            re,
            im: UReal::constant(0.0),
        }
    }
}

impl fmt::Display for UComplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (ur, ui) = self.u();
        write!(
            f,
            "({:e} ± {:e}) + j({:e} ± {:e})",
            self.re.x(),
            ur,
            self.im.x(),
            ui
        )
    }
}

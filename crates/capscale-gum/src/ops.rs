//! Arithmetic operator implementations
//!
//! Every operator is defined once as a function over borrowed operands and
//! forwarded to the owned/borrowed and mixed-scalar combinations by macro.

use num_complex::Complex64;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::ucomplex::UComplex;
use crate::ureal::UReal;

// ============================================================================
// Real
// ============================================================================

fn add_r(a: &UReal, b: &UReal) -> UReal {
    UReal::linear(a.x() + b.x(), &[(a, 1.0), (b, 1.0)])
}

fn sub_r(a: &UReal, b: &UReal) -> UReal {
    UReal::linear(a.x() - b.x(), &[(a, 1.0), (b, -1.0)])
}

fn mul_r(a: &UReal, b: &UReal) -> UReal {
    UReal::linear(a.x() * b.x(), &[(a, b.x()), (b, a.x())])
}

fn div_r(a: &UReal, b: &UReal) -> UReal {
    let inv = 1.0 / b.x();
    UReal::linear(a.x() * inv, &[(a, inv), (b, -a.x() * inv * inv)])
}

macro_rules! real_binop {
    ($imp:ident, $method:ident, $func:ident) => {
        impl<'a, 'b> $imp<&'b UReal> for &'a UReal {
            type Output = UReal;
            fn $method(self, rhs: &'b UReal) -> UReal {
                $func(self, rhs)
            }
        }
        impl<'a> $imp<UReal> for &'a UReal {
            type Output = UReal;
            fn $method(self, rhs: UReal) -> UReal {
                $func(self, &rhs)
            }
        }
        impl<'b> $imp<&'b UReal> for UReal {
            type Output = UReal;
            fn $method(self, rhs: &'b UReal) -> UReal {
                $func(&self, rhs)
            }
        }
        impl $imp<UReal> for UReal {
            type Output = UReal;
            fn $method(self, rhs: UReal) -> UReal {
                $func(&self, &rhs)
            }
        }
        impl<'a> $imp<f64> for &'a UReal {
            type Output = UReal;
            fn $method(self, rhs: f64) -> UReal {
                $func(self, &UReal::constant(rhs))
            }
        }
        impl $imp<f64> for UReal {
            type Output = UReal;
            fn $method(self, rhs: f64) -> UReal {
                $func(&self, &UReal::constant(rhs))
            }
        }
        impl<'b> $imp<&'b UReal> for f64 {
            type Output = UReal;
            fn $method(self, rhs: &'b UReal) -> UReal {
                $func(&UReal::constant(self), rhs)
            }
        }
        impl $imp<UReal> for f64 {
            type Output = UReal;
            fn $method(self, rhs: UReal) -> UReal {
                $func(&UReal::constant(self), &rhs)
            }
        }
    };
}

real_binop!(Add, add, add_r);
real_binop!(Sub, sub, sub_r);
real_binop!(Mul, mul, mul_r);
real_binop!(Div, div, div_r);

impl<'a> Neg for &'a UReal {
    type Output = UReal;
    fn neg(self) -> UReal {
        UReal::linear(-self.x(), &[(self, -1.0)])
    }
}

impl Neg for UReal {
    type Output = UReal;
    fn neg(self) -> UReal {
        -&self
    }
}

// ============================================================================
// Complex
// ============================================================================

fn add_c(a: &UComplex, b: &UComplex) -> UComplex {
    let one = Complex64::new(1.0, 0.0);
    UComplex::holomorphic(a.x() + b.x(), &[(a, one), (b, one)])
}

fn sub_c(a: &UComplex, b: &UComplex) -> UComplex {
    UComplex::holomorphic(
        a.x() - b.x(),
        &[(a, Complex64::new(1.0, 0.0)), (b, Complex64::new(-1.0, 0.0))],
    )
}

fn mul_c(a: &UComplex, b: &UComplex) -> UComplex {
    UComplex::holomorphic(a.x() * b.x(), &[(a, b.x()), (b, a.x())])
}

fn div_c(a: &UComplex, b: &UComplex) -> UComplex {
    let inv = Complex64::new(1.0, 0.0) / b.x();
    let q = a.x() * inv;
    UComplex::holomorphic(q, &[(a, inv), (b, -q * inv)])
}

macro_rules! complex_binop {
    (@mixed $imp:ident, $method:ident, $func:ident, $t:ty) => {
        impl<'a> $imp<$t> for &'a UComplex {
            type Output = UComplex;
            fn $method(self, rhs: $t) -> UComplex {
                $func(self, &UComplex::from(rhs))
            }
        }
        impl $imp<$t> for UComplex {
            type Output = UComplex;
            fn $method(self, rhs: $t) -> UComplex {
                $func(&self, &UComplex::from(rhs))
            }
        }
        impl<'b> $imp<&'b UComplex> for $t {
            type Output = UComplex;
            fn $method(self, rhs: &'b UComplex) -> UComplex {
                $func(&UComplex::from(self), rhs)
            }
        }
        impl $imp<UComplex> for $t {
            type Output = UComplex;
            fn $method(self, rhs: UComplex) -> UComplex {
                $func(&UComplex::from(self), &rhs)
            }
        }
    };
    ($imp:ident, $method:ident, $func:ident) => {
        impl<'a, 'b> $imp<&'b UComplex> for &'a UComplex {
            type Output = UComplex;
            fn $method(self, rhs: &'b UComplex) -> UComplex {
                $func(self, rhs)
            }
        }
        impl<'a> $imp<UComplex> for &'a UComplex {
            type Output = UComplex;
            fn $method(self, rhs: UComplex) -> UComplex {
                $func(self, &rhs)
            }
        }
        impl<'b> $imp<&'b UComplex> for UComplex {
            type Output = UComplex;
            fn $method(self, rhs: &'b UComplex) -> UComplex {
                $func(&self, rhs)
            }
        }
        impl $imp<UComplex> for UComplex {
            type Output = UComplex;
            fn $method(self, rhs: UComplex) -> UComplex {
                $func(&self, &rhs)
            }
        }
        complex_binop!(@mixed $imp, $method, $func, f64);
        complex_binop!(@mixed $imp, $method, $func, Complex64);
        complex_binop!(@mixed $imp, $method, $func, UReal);
    };
}

complex_binop!(Add, add, add_c);
complex_binop!(Sub, sub, sub_c);
complex_binop!(Mul, mul, mul_c);
complex_binop!(Div, div, div_c);

impl<'a> Neg for &'a UComplex {
    type Output = UComplex;
    fn neg(self) -> UComplex {
        UComplex::holomorphic(-self.x(), &[(self, Complex64::new(-1.0, 0.0))])
    }
}

impl Neg for UComplex {
    type Output = UComplex;
    fn neg(self) -> UComplex {
        -&self
    }
}

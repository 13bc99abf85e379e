//! capscale-gum: uncertain real and complex quantities
//!
//! First-order (linear) uncertainty propagation in the manner of the GUM.
//! Every elementary input is a *leaf* with its own identity; derived
//! quantities carry one uncertainty component per leaf they depend on, so
//! correlations between results that share inputs are tracked automatically.
//!
//! ## Modules
//!
//! - `ureal` - Uncertain real numbers
//! - `ucomplex` - Uncertain complex numbers and their 2x2 covariance

mod ops;
pub mod ucomplex;
pub mod ureal;

pub use ucomplex::UComplex;
pub use ureal::{BudgetEntry, UReal};

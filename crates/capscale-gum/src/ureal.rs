//! Uncertain real numbers
//!
//! A [`UReal`] is a central value plus a sparse set of uncertainty
//! components, one per elementary input it was derived from. The component
//! for a leaf is `sensitivity * u(leaf)`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_LEAF: AtomicU64 = AtomicU64::new(1);

/// Identity of an elementary uncertain input
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LeafId(u64);

impl LeafId {
    fn fresh() -> Self {
        LeafId(NEXT_LEAF.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug)]
struct Leaf {
    label: String,
    dof: f64,
}

#[derive(Debug, Clone)]
struct Component {
    value: f64,
    leaf: Arc<Leaf>,
}

/// One line of an uncertainty budget
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetEntry {
    /// Label of the elementary input
    pub label: String,
    /// Magnitude of its contribution to the standard uncertainty
    pub contribution: f64,
}

/// An uncertain real number
#[derive(Debug, Clone)]
pub struct UReal {
    x: f64,
    components: BTreeMap<LeafId, Component>,
}

impl UReal {
    /// Create an independent elementary input
    ///
    /// # Arguments
    /// * `x` - Central value
    /// * `u` - Standard uncertainty (sign is ignored)
    /// * `dof` - Degrees of freedom (`f64::INFINITY` when unknown)
    /// * `label` - Name used in uncertainty budgets
    pub fn new(x: f64, u: f64, dof: f64, label: impl Into<String>) -> Self {
        let mut components = BTreeMap::new();
        if u != 0.0 {
            components.insert(
                LeafId::fresh(),
                Component {
                    value: u.abs(),
                    leaf: Arc::new(Leaf {
                        label: label.into(),
                        dof,
                    }),
                },
            );
        }
        Self { x, components }
    }

    /// An exact value with no uncertainty
    pub fn constant(x: f64) -> Self {
        Self {
            x,
            components: BTreeMap::new(),
        }
    }

    /// Linear combination of the components of `terms`, each scaled by its
    /// sensitivity, attached to the central value `x`.
    pub(crate) fn linear(x: f64, terms: &[(&UReal, f64)]) -> Self {
        let mut components: BTreeMap<LeafId, Component> = BTreeMap::new();
        for (quantity, sensitivity) in terms {
            if *sensitivity == 0.0 {
                continue;
            }
            for (id, c) in &quantity.components {
                components
                    .entry(*id)
                    .and_modify(|e| e.value += sensitivity * c.value)
                    .or_insert_with(|| Component {
                        value: sensitivity * c.value,
                        leaf: Arc::clone(&c.leaf),
                    });
            }
        }
        Self { x, components }
    }

    /// Central value
    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Standard uncertainty
    pub fn u(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Variance
    pub fn variance(&self) -> f64 {
        self.components.values().map(|c| c.value * c.value).sum()
    }

    /// True when no elementary input contributes
    pub fn is_exact(&self) -> bool {
        self.components.values().all(|c| c.value == 0.0)
    }

    /// Effective degrees of freedom (Welch-Satterthwaite)
    ///
    /// Infinite when the value is exact or every contributing input has
    /// infinite degrees of freedom.
    pub fn dof(&self) -> f64 {
        let var = self.variance();
        if var == 0.0 {
            return f64::INFINITY;
        }
        let den: f64 = self
            .components
            .values()
            .filter(|c| c.leaf.dof.is_finite())
            .map(|c| c.value.powi(4) / c.leaf.dof)
            .sum();
        if den == 0.0 {
            f64::INFINITY
        } else {
            var * var / den
        }
    }

    /// Covariance with another quantity through their shared inputs
    pub fn covariance(&self, other: &UReal) -> f64 {
        self.components
            .iter()
            .filter_map(|(id, c)| other.components.get(id).map(|o| c.value * o.value))
            .sum()
    }

    /// Correlation coefficient with another quantity
    pub fn correlation(&self, other: &UReal) -> f64 {
        let denom = self.u() * other.u();
        if denom == 0.0 {
            0.0
        } else {
            self.covariance(other) / denom
        }
    }

    /// Uncertainty budget, largest contribution first
    pub fn budget(&self) -> Vec<BudgetEntry> {
        let mut entries: Vec<BudgetEntry> = self
            .components
            .values()
            .map(|c| BudgetEntry {
                label: c.leaf.label.clone(),
                contribution: c.value.abs(),
            })
            .collect();
        entries.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
        entries
    }

    /// Component of uncertainty due to the elementary input labelled `label`
    pub fn component(&self, label: &str) -> f64 {
        self.components
            .values()
            .filter(|c| c.leaf.label == label)
            .map(|c| c.value)
            .sum()
    }
}

impl From<f64> for UReal {
    fn from(x: f64) -> Self {
        UReal::constant(x)
    }
}

impl fmt::Display for UReal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:e} ± {:e}", self.x, self.u())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sum_of_independent_inputs() {
        let a = UReal::new(1.0, 0.3, f64::INFINITY, "a");
        let b = UReal::new(2.0, 0.4, f64::INFINITY, "b");
        let s = &a + &b;
        assert_relative_eq!(s.x(), 3.0);
        assert_relative_eq!(s.u(), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_difference_with_itself_is_exact() {
        let a = UReal::new(5.0, 0.1, 10.0, "a");
        let d = &a - &a;
        assert_eq!(d.x(), 0.0);
        assert_eq!(d.u(), 0.0);
        assert!(d.is_exact());
    }

    #[test]
    fn test_product_sensitivities() {
        let a = UReal::new(2.0, 0.1, f64::INFINITY, "a");
        let b = UReal::new(3.0, 0.2, f64::INFINITY, "b");
        let p = &a * &b;
        // u^2 = (3*0.1)^2 + (2*0.2)^2
        assert_relative_eq!(p.u(), (0.09f64 + 0.16).sqrt(), epsilon = 1e-15);
        assert_relative_eq!(p.component("a"), 0.3, epsilon = 1e-15);
    }

    #[test]
    fn test_quotient_sensitivities() {
        let a = UReal::new(4.0, 0.4, f64::INFINITY, "a");
        let b = UReal::new(2.0, 0.2, f64::INFINITY, "b");
        let q = &a / &b;
        assert_relative_eq!(q.x(), 2.0);
        // fully equivalent relative uncertainties of 10%
        assert_relative_eq!(q.u(), 2.0 * (0.01f64 + 0.01).sqrt(), epsilon = 1e-14);
    }

    #[test]
    fn test_welch_satterthwaite() {
        let a = UReal::new(0.0, 1.0, 4.0, "a");
        let b = UReal::new(0.0, 1.0, 4.0, "b");
        let s = &a + &b;
        // 4 / (1/4 + 1/4)
        assert_relative_eq!(s.dof(), 8.0, epsilon = 1e-12);
        assert!(UReal::constant(1.0).dof().is_infinite());
    }

    #[test]
    fn test_budget_is_sorted() {
        let a = UReal::new(1.0, 0.1, f64::INFINITY, "small");
        let b = UReal::new(1.0, 0.5, f64::INFINITY, "large");
        let budget = (&a + &b).budget();
        assert_eq!(budget[0].label, "large");
        assert_eq!(budget[1].label, "small");
    }
}

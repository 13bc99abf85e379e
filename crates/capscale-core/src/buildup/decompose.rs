//! Paired-capacitor decomposition
//!
//! Two nominally equal capacitors are measured in parallel (sum `S`) and
//! each is compared with a smaller common reference (ratios `ratio1`,
//! `ratio2`, reference over capacitor). The three linear constraints
//!
//! ```text
//! c13 + c16          = S
//! c14 = ratio1 (c13 - lead13)
//! c14 = ratio2 (c16 - lead16)
//! ```
//!
//! are solved in closed form. `lead13` and `lead16` are the corrections for
//! the common lead used only in the parallel configuration.

use capscale_gum::UComplex;

use crate::constants::NEAR_ZERO;
use crate::error::CalibrationError;

/// Individual values recovered from a parallel sum
#[derive(Debug, Clone)]
pub struct PairedDecomposition {
    pub first: UComplex,
    pub second: UComplex,
    /// The common smaller reference
    pub reference: UComplex,
}

/// Split `sum` into the two paralleled values and the common reference
pub fn decompose_pair(
    sum: &UComplex,
    ratio1: &UComplex,
    ratio2: &UComplex,
    lead1: &UComplex,
    lead2: &UComplex,
) -> Result<PairedDecomposition, CalibrationError> {
    let total = ratio1 + ratio2;
    if total.norm() < NEAR_ZERO || ratio1.norm() < NEAR_ZERO || ratio2.norm() < NEAR_ZERO {
        return Err(CalibrationError::DegenerateRatio("paired decomposition"));
    }

    let first_side = sum + (ratio1 / ratio2) * lead1 - lead2;
    let second_side = sum + (ratio2 / ratio1) * lead2 - lead1;

    let first = ratio2 / &total * &first_side;
    let second = ratio1 / &total * second_side;
    let reference = (ratio1 * ratio2) / &total * first_side - ratio1 * lead1;

    Ok(PairedDecomposition {
        first,
        second,
        reference,
    })
}

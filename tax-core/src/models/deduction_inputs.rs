use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Itemized deductions claimed under the old regime.
///
/// Fields default to zero; the new regime ignores all of them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeductionInputs {
    /// Capped investment deduction (section 80C).
    pub investment: Decimal,
    /// Health insurance premiums (section 80D).
    pub insurance: Decimal,
    /// House rent allowance exemption.
    pub housing_allowance: Decimal,
    pub other: Decimal,
}

impl DeductionInputs {
    pub fn is_empty(&self) -> bool {
        self.investment.is_zero()
            && self.insurance.is_zero()
            && self.housing_allowance.is_zero()
            && self.other.is_zero()
    }
}

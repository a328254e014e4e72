use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Non-slab constants of one fiscal year's law.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub fiscal_year: String,
    /// Flat deduction applied under the new regime in place of itemized inputs.
    pub new_regime_standard_deduction: Decimal,
    pub old_regime_standard_deduction: Decimal,
    /// Statutory cap on the capped-investment (section 80C) deduction.
    pub investment_deduction_cap: Decimal,
    /// Health and education cess as a fraction of income tax.
    pub cess_rate: Decimal,
}

impl TaxYearConfig {
    pub fn fy_2024_25() -> Self {
        Self {
            fiscal_year: "2024-25".to_string(),
            new_regime_standard_deduction: dec!(75000),
            old_regime_standard_deduction: dec!(0),
            investment_deduction_cap: dec!(150000),
            cess_rate: dec!(0.04),
        }
    }
}

impl Default for TaxYearConfig {
    fn default() -> Self {
        Self::fy_2024_25()
    }
}

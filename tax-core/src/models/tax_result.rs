use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::regime::Regime;

/// Tax contributed by one slab, with its range label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdownEntry {
    pub range: String,
    pub tax: Decimal,
}

/// Outcome of one engine run. Amounts are exact and unrounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputationResult {
    pub gross_income: Decimal,
    pub total_deductions: Decimal,
    pub taxable_income: Decimal,
    pub income_tax: Decimal,
    pub cess: Decimal,
    pub total_tax: Decimal,
    pub net_income: Decimal,
    pub breakdown: Vec<TaxBreakdownEntry>,
    pub regime: Regime,
}

impl TaxComputationResult {
    /// The result reported for zero or negative gross income.
    pub fn zero(regime: Regime) -> Self {
        Self {
            gross_income: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            taxable_income: Decimal::ZERO,
            income_tax: Decimal::ZERO,
            cess: Decimal::ZERO,
            total_tax: Decimal::ZERO,
            net_income: Decimal::ZERO,
            breakdown: Vec::new(),
            regime,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero(self.regime)
    }
}

//! Deduction policy for the two regimes.
//!
//! | Regime | Total deductions |
//! |--------|------------------|
//! | New    | Standard deduction for the year; itemized inputs are ignored |
//! | Old    | min(investment, cap) + insurance + housing allowance + other |
//!
//! The old-regime sum itself is not capped. Each itemized field is floored at
//! zero, so the total is never negative.

use rust_decimal::Decimal;

use crate::calculations::common::max;
use crate::{DeductionInputs, Regime, TaxYearConfig};

/// Computes total deductions for a regime under one fiscal year's rules.
#[derive(Debug, Clone, Copy)]
pub struct DeductionPolicy<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> DeductionPolicy<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// Total deductions for `regime`. `inputs` only matter under the old regime.
    pub fn total(
        &self,
        regime: Regime,
        inputs: &DeductionInputs,
    ) -> Decimal {
        match regime {
            Regime::New => self.config.new_regime_standard_deduction,
            Regime::Old => {
                // Saturates at Decimal::MAX; such a total already exceeds any income.
                self.config
                    .old_regime_standard_deduction
                    .saturating_add(self.capped_investment(inputs.investment))
                    .saturating_add(non_negative(inputs.insurance))
                    .saturating_add(non_negative(inputs.housing_allowance))
                    .saturating_add(non_negative(inputs.other))
            }
        }
    }

    /// Investment deduction limited to the statutory cap.
    fn capped_investment(
        &self,
        investment: Decimal,
    ) -> Decimal {
        non_negative(investment).min(self.config.investment_deduction_cap)
    }
}

fn non_negative(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}

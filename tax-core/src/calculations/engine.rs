//! Slab-based income tax computation.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Total deductions from the regime's [`DeductionPolicy`] |
//! | 2    | Taxable income: gross income minus deductions, minimum 0 |
//! | 3    | Slabs for (regime, age bracket) from the [`SlabTable`] |
//! | 4    | Per-slab tax: income inside the slab × rate / 100 |
//! | 5    | Cess: income tax × cess rate (4%) |
//! | 6    | Total tax: income tax + cess |
//! | 7    | Net income: gross income − total tax |
//!
//! Gross income of zero or less yields [`TaxComputationResult::zero`].
//! Amounts stay exact throughout; rounding is left to display code.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::{TaxEngine, TaxInput};
//! use tax_core::{AgeBracket, Regime};
//!
//! let engine = TaxEngine::default();
//! let result = engine.calculate(&TaxInput::new(dec!(600000), AgeBracket::Below60, Regime::New));
//!
//! assert_eq!(result.taxable_income, dec!(525000));
//! assert_eq!(result.income_tax, dec!(11250));
//! assert_eq!(result.total_tax, dec!(11700));
//! assert_eq!(result.breakdown[0].range, "₹300,000 - ₹700,000 @ 5%");
//! ```

use std::sync::LazyLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::max;
use crate::calculations::deduction::DeductionPolicy;
use crate::{
    AgeBracket, DeductionInputs, Regime, Slab, SlabTable, TaxBreakdownEntry,
    TaxComputationResult, TaxYearConfig,
};

static FY_2024_25_CONFIG: LazyLock<TaxYearConfig> = LazyLock::new(TaxYearConfig::fy_2024_25);

/// Typed, defaulted engine input. Raw text is parsed before it gets here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInput {
    pub gross_income: Decimal,
    pub age_bracket: AgeBracket,
    pub regime: Regime,
    #[serde(default)]
    pub deductions: DeductionInputs,
}

impl TaxInput {
    pub fn new(
        gross_income: Decimal,
        age_bracket: AgeBracket,
        regime: Regime,
    ) -> Self {
        Self {
            gross_income,
            age_bracket,
            regime,
            deductions: DeductionInputs::default(),
        }
    }

    pub fn with_deductions(
        mut self,
        deductions: DeductionInputs,
    ) -> Self {
        self.deductions = deductions;
        self
    }
}

/// Pure tax calculator over one slab table and fiscal-year configuration.
///
/// Holds only shared references, so it is cheap to copy and safe to use
/// from any number of threads at once.
#[derive(Debug, Clone, Copy)]
pub struct TaxEngine<'a> {
    slab_table: &'a SlabTable,
    config: &'a TaxYearConfig,
}

impl Default for TaxEngine<'static> {
    /// Engine over the built-in FY 2024-25 law.
    fn default() -> Self {
        Self {
            slab_table: SlabTable::fy_2024_25(),
            config: &FY_2024_25_CONFIG,
        }
    }
}

impl<'a> TaxEngine<'a> {
    pub fn new(
        slab_table: &'a SlabTable,
        config: &'a TaxYearConfig,
    ) -> Self {
        if slab_table.fiscal_year() != config.fiscal_year {
            warn!(
                slabs = slab_table.fiscal_year(),
                config = %config.fiscal_year,
                "slab table and deduction rules are for different fiscal years"
            );
        }
        Self { slab_table, config }
    }

    pub fn slab_table(&self) -> &'a SlabTable {
        self.slab_table
    }

    /// Computes tax for one regime.
    pub fn calculate(
        &self,
        input: &TaxInput,
    ) -> TaxComputationResult {
        if input.gross_income <= Decimal::ZERO {
            debug!(gross_income = %input.gross_income, "non-positive income, returning zero result");
            return TaxComputationResult::zero(input.regime);
        }

        let total_deductions = self.total_deductions(input.regime, &input.deductions);
        let taxable_income = self.taxable_income(input.gross_income, total_deductions);
        let slabs = self.slab_table.slabs(input.regime, input.age_bracket);
        let (income_tax, breakdown) = self.slab_tax(slabs, taxable_income);
        let cess = self.cess(income_tax);
        let total_tax = self.total_tax(income_tax, cess);
        let net_income = self.net_income(input.gross_income, total_tax);

        debug!(
            regime = %input.regime,
            age_bracket = %input.age_bracket,
            %taxable_income,
            %total_tax,
            slabs_taxed = breakdown.len(),
            "tax calculated"
        );

        TaxComputationResult {
            gross_income: input.gross_income,
            total_deductions,
            taxable_income,
            income_tax,
            cess,
            total_tax,
            net_income,
            breakdown,
            regime: input.regime,
        }
    }

    fn total_deductions(
        &self,
        regime: Regime,
        deductions: &DeductionInputs,
    ) -> Decimal {
        DeductionPolicy::new(self.config).total(regime, deductions)
    }

    /// Deductions may exceed income; taxable income never goes below zero.
    fn taxable_income(
        &self,
        gross_income: Decimal,
        total_deductions: Decimal,
    ) -> Decimal {
        max(gross_income - total_deductions, Decimal::ZERO)
    }

    /// Walks the slabs in ascending order, returning total tax and one
    /// breakdown entry per slab that contributed a positive amount.
    fn slab_tax(
        &self,
        slabs: &[Slab],
        taxable_income: Decimal,
    ) -> (Decimal, Vec<TaxBreakdownEntry>) {
        let mut income_tax = Decimal::ZERO;
        let mut breakdown = Vec::new();

        for slab in slabs.iter().take_while(|s| taxable_income > s.min_income) {
            let slab_tax = slab.tax_on(slab.taxable_amount(taxable_income));
            income_tax += slab_tax;

            if slab_tax > Decimal::ZERO {
                breakdown.push(TaxBreakdownEntry {
                    range: slab.label(),
                    tax: slab_tax,
                });
            }
        }

        (income_tax, breakdown)
    }

    fn cess(
        &self,
        income_tax: Decimal,
    ) -> Decimal {
        income_tax * self.config.cess_rate
    }

    fn total_tax(
        &self,
        income_tax: Decimal,
        cess: Decimal,
    ) -> Decimal {
        income_tax.saturating_add(cess)
    }

    /// Not floored: only tax can pull net income below gross.
    fn net_income(
        &self,
        gross_income: Decimal,
        total_tax: Decimal,
    ) -> Decimal {
        gross_income - total_tax
    }
}

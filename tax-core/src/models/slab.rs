use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{format_inr, format_rate};

/// A contiguous income range taxed at a single flat rate.
///
/// `max_income` is `None` for the top slab, which has no upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slab {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    /// Rate as a percentage, e.g. `5` for 5%.
    pub rate: Decimal,
}

impl Slab {
    pub fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            rate,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_income.is_none()
    }

    /// Portion of `taxable_income` that falls inside this slab.
    ///
    /// Zero when the income does not reach past the slab's lower edge.
    pub fn taxable_amount(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        if taxable_income <= self.min_income {
            return Decimal::ZERO;
        }
        let upper = match self.max_income {
            Some(max) => taxable_income.min(max),
            None => taxable_income,
        };
        upper - self.min_income
    }

    /// Tax owed on `amount` at this slab's rate.
    ///
    /// The rate is scaled to a fraction first, so the result never exceeds
    /// `amount` and cannot overflow.
    pub fn tax_on(
        &self,
        amount: Decimal,
    ) -> Decimal {
        amount * (self.rate / Decimal::ONE_HUNDRED)
    }

    /// Human-readable range, e.g. `₹300,000 - ₹700,000 @ 5%` or `₹1,500,000+ @ 30%`.
    pub fn label(&self) -> String {
        match self.max_income {
            Some(max) => format!(
                "{} - {} @ {}%",
                format_inr(self.min_income),
                format_inr(max),
                format_rate(self.rate)
            ),
            None => format!(
                "{}+ @ {}%",
                format_inr(self.min_income),
                format_rate(self.rate)
            ),
        }
    }
}

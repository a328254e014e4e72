//! Side-by-side comparison of the two regimes.
//!
//! The engine runs once per regime with the same income, age bracket and
//! deduction inputs (the new regime ignores the inputs). The regime with the
//! strictly lower total tax is recommended; equal totals mean no difference.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::engine::{TaxEngine, TaxInput};
use crate::{AgeBracket, DeductionInputs, Regime, TaxComputationResult};

/// The figures of one regime that a comparison reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeSummary {
    pub regime: Regime,
    pub total_tax: Decimal,
    pub net_income: Decimal,
}

impl From<&TaxComputationResult> for RegimeSummary {
    fn from(result: &TaxComputationResult) -> Self {
        Self {
            regime: result.regime,
            total_tax: result.total_tax,
            net_income: result.net_income,
        }
    }
}

/// Which regime to choose, and how much it saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "choice", rename_all = "snake_case")]
pub enum Recommendation {
    New { saved: Decimal },
    Old { saved: Decimal },
    NoDifference,
}

impl Recommendation {
    pub fn regime(&self) -> Option<Regime> {
        match self {
            Self::New { .. } => Some(Regime::New),
            Self::Old { .. } => Some(Regime::Old),
            Self::NoDifference => None,
        }
    }

    pub fn saved(&self) -> Decimal {
        match self {
            Self::New { saved } | Self::Old { saved } => *saved,
            Self::NoDifference => Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub new_regime: RegimeSummary,
    pub old_regime: RegimeSummary,
    /// Old total tax minus new total tax; positive when the new regime is cheaper.
    pub new_regime_savings: Decimal,
    /// New total tax minus old total tax; always the negation of `new_regime_savings`.
    pub old_regime_savings: Decimal,
    pub recommendation: Recommendation,
}

impl<'a> TaxEngine<'a> {
    /// Runs both regimes and recommends the one with strictly lower total tax.
    ///
    /// Callers normally reject non-positive income first; if they do not,
    /// both sides come out zero and the result is a tie.
    pub fn compare(
        &self,
        gross_income: Decimal,
        age_bracket: AgeBracket,
        deductions: &DeductionInputs,
    ) -> RegimeComparison {
        let new = self.calculate(
            &TaxInput::new(gross_income, age_bracket, Regime::New).with_deductions(deductions.clone()),
        );
        let old = self.calculate(
            &TaxInput::new(gross_income, age_bracket, Regime::Old).with_deductions(deductions.clone()),
        );

        let comparison = compare_results(&new, &old);
        debug!(
            new_total = %comparison.new_regime.total_tax,
            old_total = %comparison.old_regime.total_tax,
            recommendation = ?comparison.recommendation,
            "regimes compared"
        );
        comparison
    }
}

/// Derives savings and the recommendation from one result per regime.
pub fn compare_results(
    new: &TaxComputationResult,
    old: &TaxComputationResult,
) -> RegimeComparison {
    let new_regime_savings = old.total_tax - new.total_tax;
    let old_regime_savings = new.total_tax - old.total_tax;

    let recommendation = if new.total_tax < old.total_tax {
        Recommendation::New {
            saved: new_regime_savings,
        }
    } else if old.total_tax < new.total_tax {
        Recommendation::Old {
            saved: old_regime_savings,
        }
    } else {
        Recommendation::NoDifference
    };

    RegimeComparison {
        new_regime: RegimeSummary::from(new),
        old_regime: RegimeSummary::from(old),
        new_regime_savings,
        old_regime_savings,
        recommendation,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use rust_decimal_macros::dec;

    use super::*;

    fn result(
        regime: Regime,
        total_tax: Decimal,
    ) -> TaxComputationResult {
        TaxComputationResult {
            gross_income: dec!(1000000),
            total_tax,
            net_income: dec!(1000000) - total_tax,
            ..TaxComputationResult::zero(regime)
        }
    }

    // =========================================================================
    // compare_results tests
    // =========================================================================

    #[test]
    fn compare_results_recommends_new_when_cheaper() {
        let comparison = compare_results(&result(Regime::New, dec!(100)), &result(Regime::Old, dec!(250)));

        assert_eq!(comparison.recommendation, Recommendation::New { saved: dec!(150) });
        assert_eq!(comparison.new_regime_savings, dec!(150));
        assert_eq!(comparison.old_regime_savings, dec!(-150));
    }

    #[test]
    fn compare_results_recommends_old_when_cheaper() {
        let comparison = compare_results(&result(Regime::New, dec!(300)), &result(Regime::Old, dec!(120.5)));

        assert_eq!(comparison.recommendation, Recommendation::Old { saved: dec!(179.5) });
        assert_eq!(comparison.recommendation.regime(), Some(Regime::Old));
    }

    #[test]
    fn compare_results_reports_tie() {
        let comparison = compare_results(&result(Regime::New, dec!(500)), &result(Regime::Old, dec!(500)));

        assert_eq!(comparison.recommendation, Recommendation::NoDifference);
        assert_eq!(comparison.recommendation.saved(), dec!(0));
        assert_eq!(comparison.new_regime_savings, dec!(0));
    }

    #[test]
    fn compare_results_summaries_carry_net_income() {
        let comparison = compare_results(&result(Regime::New, dec!(100)), &result(Regime::Old, dec!(250)));

        assert_eq!(
            comparison.old_regime,
            RegimeSummary {
                regime: Regime::Old,
                total_tax: dec!(250),
                net_income: dec!(999750),
            }
        );
    }

    // =========================================================================
    // compare (integration) tests
    // =========================================================================

    #[test]
    fn compare_above_80_prefers_new_regime() {
        let engine = TaxEngine::default();

        let comparison = engine.compare(dec!(2000000), AgeBracket::Above80, &DeductionInputs::default());

        assert_eq!(comparison.new_regime.total_tax, dec!(267800));
        assert_eq!(comparison.old_regime.total_tax, dec!(416000));
        assert_eq!(comparison.new_regime_savings, dec!(148200));
        assert_eq!(comparison.recommendation, Recommendation::New { saved: dec!(148200) });
    }

    #[test]
    fn compare_savings_match_independent_runs() {
        let engine = TaxEngine::default();
        let deductions = DeductionInputs {
            investment: dec!(150000),
            insurance: dec!(50000),
            housing_allowance: dec!(240000),
            other: dec!(50000),
        };

        let comparison = engine.compare(dec!(1500000), AgeBracket::Below60, &deductions);
        let new = engine.calculate(
            &TaxInput::new(dec!(1500000), AgeBracket::Below60, Regime::New).with_deductions(deductions.clone()),
        );
        let old = engine.calculate(
            &TaxInput::new(dec!(1500000), AgeBracket::Below60, Regime::Old).with_deductions(deductions),
        );

        assert_eq!(comparison.new_regime_savings, old.total_tax - new.total_tax);
        assert_eq!(comparison.new_regime.net_income, new.net_income);
        assert_eq!(comparison.old_regime.net_income, old.net_income);
    }

    #[test]
    fn compare_heavy_deductions_prefer_old_regime() {
        let engine = TaxEngine::default();
        let deductions = DeductionInputs {
            investment: dec!(150000),
            insurance: dec!(50000),
            housing_allowance: dec!(300000),
            other: dec!(200000),
        };

        // Old taxable 300000: 2500; new taxable 925000: 20000 + 22500
        let comparison = engine.compare(dec!(1000000), AgeBracket::Below60, &deductions);

        assert_eq!(comparison.old_regime.total_tax, dec!(2600));
        assert_eq!(comparison.new_regime.total_tax, dec!(44200));
        assert_eq!(comparison.recommendation, Recommendation::Old { saved: dec!(41600) });
    }

    #[test]
    fn compare_zero_income_is_a_tie() {
        let engine = TaxEngine::default();

        let comparison = engine.compare(dec!(0), AgeBracket::Below60, &DeductionInputs::default());

        assert_eq!(comparison.new_regime.total_tax, dec!(0));
        assert_eq!(comparison.old_regime.total_tax, dec!(0));
        assert_eq!(comparison.recommendation, Recommendation::NoDifference);
    }

    #[test]
    fn compare_low_income_below_both_floors_is_a_tie() {
        let engine = TaxEngine::default();

        let comparison = engine.compare(dec!(240000), AgeBracket::Below60, &DeductionInputs::default());

        assert_eq!(comparison.recommendation, Recommendation::NoDifference);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(128))]

        #[test]
        fn prop_savings_are_antisymmetric(
            income in 0u64..40_000_000,
            age_idx in 0usize..3,
            investment in 0u64..400_000,
            housing in 0u64..600_000
        ) {
            let engine = TaxEngine::default();
            let deductions = DeductionInputs {
                investment: Decimal::from(investment),
                housing_allowance: Decimal::from(housing),
                ..DeductionInputs::default()
            };

            let comparison = engine.compare(
                Decimal::from(income),
                AgeBracket::ALL[age_idx],
                &deductions,
            );

            prop_assert_eq!(comparison.new_regime_savings, -comparison.old_regime_savings);
            prop_assert!(comparison.recommendation.saved() >= Decimal::ZERO);
        }
    }
}

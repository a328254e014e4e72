//! Plain-text rendering of results, comparisons and the exported report.
//!
//! Amounts are rounded to whole rupees for display only; the engine's
//! figures stay exact.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tax_core::calculations::common::format_inr;
use tax_core::{AgeBracket, Recommendation, Regime, RegimeComparison, SlabTable, TaxComputationResult};

pub const EMPTY_INCOME_MESSAGE: &str = "Enter your income to see tax breakdown";
pub const NO_TAX_MESSAGE: &str = "No tax applicable - Income below taxable limit";

const LABEL_WIDTH: usize = 32;

fn line(
    label: &str,
    value: Decimal,
) -> String {
    format!("{label:<LABEL_WIDTH$}{}", format_inr(value))
}

/// Renders a single-regime result with its slab breakdown.
///
/// A zero or negative gross income renders all amounts as zero with a prompt
/// in place of the breakdown.
pub fn format_result_text(
    result: &TaxComputationResult,
    age_bracket: AgeBracket,
) -> String {
    let mut lines = vec![
        format!("Tax Calculation ({}, {})", result.regime.label(), age_bracket.label()),
        String::new(),
        line("Gross Annual Income:", result.gross_income),
        line("Total Deductions:", result.total_deductions),
        line("Taxable Income:", result.taxable_income),
        line("Income Tax:", result.income_tax),
        line("Health & Education Cess:", result.cess),
        line("Total Tax Liability:", result.total_tax),
        line("Net Income After Tax:", result.net_income),
        String::new(),
        "Tax Breakdown:".to_string(),
    ];

    if result.gross_income <= Decimal::ZERO {
        lines.push(format!("  {EMPTY_INCOME_MESSAGE}"));
    } else if result.breakdown.is_empty() {
        lines.push(format!("  {NO_TAX_MESSAGE}"));
    } else {
        let width = result
            .breakdown
            .iter()
            .map(|entry| entry.range.chars().count())
            .max()
            .unwrap_or(0);
        for entry in &result.breakdown {
            lines.push(format!("  {:<width$}  {}", entry.range, format_inr(entry.tax)));
        }
    }

    lines.join("\n") + "\n"
}

/// "₹X saved", "₹X extra" or "Same" for one side of a comparison.
pub fn savings_text(savings: Decimal) -> String {
    if savings > Decimal::ZERO {
        format!("{} saved", format_inr(savings))
    } else if savings < Decimal::ZERO {
        format!("{} extra", format_inr(savings.abs()))
    } else {
        "Same".to_string()
    }
}

/// Headline and explanation for a recommendation.
pub fn recommendation_text(recommendation: &Recommendation) -> (String, String) {
    match recommendation {
        Recommendation::New { saved } => (
            "Recommendation: Choose New Tax Regime".to_string(),
            format!("You can save {} by choosing the new tax regime.", format_inr(*saved)),
        ),
        Recommendation::Old { saved } => (
            "Recommendation: Choose Old Tax Regime".to_string(),
            format!(
                "You can save {} by choosing the old tax regime with deductions.",
                format_inr(*saved)
            ),
        ),
        Recommendation::NoDifference => (
            "Both regimes result in same tax".to_string(),
            "You can choose either regime as both result in the same tax liability.".to_string(),
        ),
    }
}

pub fn format_comparison_text(comparison: &RegimeComparison) -> String {
    let sides = [
        (&comparison.new_regime, comparison.new_regime_savings),
        (&comparison.old_regime, comparison.old_regime_savings),
    ];

    let mut lines = vec!["Regime Comparison".to_string()];
    for (summary, savings) in sides {
        lines.push(String::new());
        lines.push(summary.regime.label().to_string());
        lines.push(line("  Total Tax:", summary.total_tax));
        lines.push(line("  Net Income:", summary.net_income));
        lines.push(format!("{:<LABEL_WIDTH$}{}", "  Savings:", savings_text(savings)));
    }

    let (headline, detail) = recommendation_text(&comparison.recommendation);
    lines.push(String::new());
    lines.push(headline);
    lines.push(detail);

    lines.join("\n") + "\n"
}

/// Lists the schedules in `table`, optionally narrowed to one regime or age bracket.
pub fn format_slabs_text(
    table: &SlabTable,
    regime: Option<Regime>,
    age_bracket: Option<AgeBracket>,
) -> String {
    let mut lines = vec![format!("Income Tax Slabs FY {}", table.fiscal_year())];

    let selected = table.schedules().filter(|(r, a, _)| {
        regime.is_none_or(|wanted| wanted == *r) && age_bracket.is_none_or(|wanted| wanted == *a)
    });
    for (r, a, slabs) in selected {
        lines.push(String::new());
        lines.push(format!("{} ({})", r.label(), a.label()));
        for slab in slabs {
            lines.push(format!("  {}", slab.label()));
        }
    }

    lines.join("\n") + "\n"
}

/// The downloadable plain-text report for a result.
pub fn export_report(
    result: &TaxComputationResult,
    generated_on: NaiveDate,
) -> String {
    let regime = result.regime.as_str().to_uppercase();
    format!(
        "TAX CALCULATION REPORT
=====================

Income Details:
- Gross Annual Income: {gross}
- Total Deductions: {deductions}
- Taxable Income: {taxable}

Tax Calculation ({regime} REGIME):
- Income Tax: {income_tax}
- Health & Education Cess (4%): {cess}
- Total Tax Liability: {total}
- Net Income After Tax: {net}

Generated on: {date}
Generated by: TaxCalc Pro
",
        gross = format_inr(result.gross_income),
        deductions = format_inr(result.total_deductions),
        taxable = format_inr(result.taxable_income),
        income_tax = format_inr(result.income_tax),
        cess = format_inr(result.cess),
        total = format_inr(result.total_tax),
        net = format_inr(result.net_income),
        date = generated_on.format("%d/%m/%Y"),
    )
}

pub fn default_report_file_name(year: i32) -> String {
    format!("tax-calculation-{year}.txt")
}

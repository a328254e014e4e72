//! Command orchestration for `taxcalc`.
//!
//! Every command returns its output as a `String`; `main` only prints. The
//! caller that computed a result is the one that exports it.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use rust_decimal::Decimal;
use tax_core::calculations::common::format_inr;
use tax_core::{AgeBracket, DeductionInputs, Regime, SlabTable, TaxComputationResult, TaxEngine, TaxInput};
use tax_data::SlabTableLoader;
use tracing::{info, warn};

use crate::csv_loader::Scenario;
use crate::report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// The built-in table, or the one loaded from `path`.
pub fn load_slab_table(path: Option<&Path>) -> Result<Cow<'static, SlabTable>> {
    match path {
        None => Ok(Cow::Borrowed(SlabTable::fy_2024_25())),
        Some(path) => {
            let table = SlabTableLoader::load_from_path(path)
                .with_context(|| format!("Failed to load slab table: {}", path.display()))?;
            info!(path = %path.display(), fiscal_year = table.fiscal_year(), "slab table loaded");
            Ok(Cow::Owned(table))
        }
    }
}

pub fn calculate(
    engine: &TaxEngine<'_>,
    input: &TaxInput,
    format: OutputFormat,
) -> Result<(TaxComputationResult, String)> {
    let result = engine.calculate(input);
    let output = match format {
        OutputFormat::Text => report::format_result_text(&result, input.age_bracket),
        OutputFormat::Json => to_json(&result)?,
    };
    Ok((result, output))
}

/// Compares both regimes. Non-positive income is rejected before the engine runs.
pub fn compare(
    engine: &TaxEngine<'_>,
    gross_income: Decimal,
    age_bracket: AgeBracket,
    deductions: &DeductionInputs,
    format: OutputFormat,
) -> Result<String> {
    if gross_income <= Decimal::ZERO {
        bail!("Please enter your annual income first");
    }

    let comparison = engine.compare(gross_income, age_bracket, deductions);
    match format {
        OutputFormat::Text => Ok(report::format_comparison_text(&comparison)),
        OutputFormat::Json => to_json(&comparison),
    }
}

/// Lists the schedules the engine computes with.
pub fn slabs(
    engine: &TaxEngine<'_>,
    regime: Option<Regime>,
    age_bracket: Option<AgeBracket>,
) -> String {
    report::format_slabs_text(engine.slab_table(), regime, age_bracket)
}

/// Compares every scenario and tabulates the outcome, one row each.
///
/// Rows with non-positive income are listed as skipped.
pub fn batch(
    engine: &TaxEngine<'_>,
    scenarios: &[Scenario],
) -> String {
    let width = scenarios
        .iter()
        .map(|s| s.label.chars().count())
        .chain(std::iter::once("Label".len()))
        .max()
        .unwrap_or(0);

    let mut lines = vec![format!(
        "{:<width$}  {:>14}  {:>14}  {:>14}  Recommendation",
        "Label", "Gross Income", "New Regime", "Old Regime"
    )];

    for scenario in scenarios {
        if scenario.gross_income <= Decimal::ZERO {
            warn!(label = %scenario.label, "skipping scenario without positive income");
            lines.push(format!(
                "{:<width$}  {:>14}  skipped: income must be positive",
                scenario.label,
                format_inr(scenario.gross_income)
            ));
            continue;
        }

        let comparison = engine.compare(scenario.gross_income, scenario.age_bracket, &scenario.deductions);
        let recommendation = &comparison.recommendation;
        let choice = match recommendation.regime() {
            Some(regime) => format!("{} (saves {})", regime.label(), format_inr(recommendation.saved())),
            None => "Either".to_string(),
        };
        lines.push(format!(
            "{:<width$}  {:>14}  {:>14}  {:>14}  {choice}",
            scenario.label,
            format_inr(scenario.gross_income),
            format_inr(comparison.new_regime.total_tax),
            format_inr(comparison.old_regime.total_tax),
        ));
    }

    lines.join("\n") + "\n"
}

/// Where an exported report goes: the explicit path, else the default file
/// name inside `export_dir` (or the working directory).
pub fn report_path(
    explicit: Option<PathBuf>,
    export_dir: Option<&Path>,
    today: NaiveDate,
) -> PathBuf {
    explicit.unwrap_or_else(|| {
        let name = report::default_report_file_name(today.year());
        match export_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    })
}

/// Writes the report for `result` to `path`.
pub fn export(
    result: &TaxComputationResult,
    path: &Path,
    today: NaiveDate,
) -> Result<()> {
    if result.is_zero() {
        bail!("Please calculate tax first: the income entered is not positive");
    }

    std::fs::write(path, report::export_report(result, today))
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    info!(path = %path.display(), "report exported");
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    Ok(json + "\n")
}

//! CSV loader for batch comparison scenarios.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). All header
//! names are case-sensitive and must match exactly.
//!
//! | Column              | Required | Type    | Notes                                  |
//! |---------------------|----------|---------|----------------------------------------|
//! | `label`             | yes      | string  | Shown in the batch output              |
//! | `gross_income`      | yes      | decimal | e.g. `1200000`                         |
//! | `age_bracket`       | no       | string  | `below60`, `60to80` or `above80`; empty for `below60` |
//! | `investment`        | no       | decimal | Empty or unreadable cell counts as 0   |
//! | `insurance`         | no       | decimal | Empty or unreadable cell counts as 0   |
//! | `housing_allowance` | no       | decimal | Empty or unreadable cell counts as 0   |
//! | `other`             | no       | decimal | Empty or unreadable cell counts as 0   |
//!
//! Amounts beyond [`MAX_AMOUNT`] are rejected for `gross_income` and count as
//! 0 for the deduction columns.
//!
//! ### Example
//!
//! ```csv
//! label,gross_income,age_bracket,investment,insurance,housing_allowance,other
//! salaried,1000000,below60,,,,
//! retired,900000,60to80,150000,25000,,
//! ```
use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{AgeBracket, DeductionInputs};

use crate::utils::{MAX_AMOUNT, parse_amount_or_zero};

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    label: String,
    gross_income: Decimal,
    #[serde(default)]
    age_bracket: Option<String>,
    #[serde(default)]
    investment: Option<String>,
    #[serde(default)]
    insurance: Option<String>,
    #[serde(default)]
    housing_allowance: Option<String>,
    #[serde(default)]
    other: Option<String>,
}

/// One row of a batch file, ready for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub label: String,
    pub gross_income: Decimal,
    pub age_bracket: AgeBracket,
    pub deductions: DeductionInputs,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading a scenarios file.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioLoadError {
    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, type mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// An `age_bracket` cell held an unknown code. `row` is 1-based
    /// (header = row 0).
    #[error("unrecognised age bracket '{value}' on row {row}")]
    InvalidAgeBracket { value: String, row: usize },

    #[error("gross income {value} on row {row} exceeds the maximum of {max}", max = MAX_AMOUNT)]
    IncomeOutOfRange { value: Decimal, row: usize },

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

/// Convert a single CSV row into a Scenario.
///
/// row_number is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<Scenario, ScenarioLoadError> {
    if row.gross_income.abs() > MAX_AMOUNT {
        return Err(ScenarioLoadError::IncomeOutOfRange {
            value: row.gross_income,
            row: row_number,
        });
    }

    let age_bracket = match row.age_bracket.as_deref().map(str::trim) {
        None | Some("") => AgeBracket::default(),
        Some(code) => AgeBracket::parse(code).ok_or_else(|| ScenarioLoadError::InvalidAgeBracket {
            value: code.to_string(),
            row: row_number,
        })?,
    };

    Ok(Scenario {
        label: row.label,
        gross_income: row.gross_income,
        age_bracket,
        deductions: DeductionInputs {
            investment: parse_amount_or_zero("investment", row.investment.as_deref().unwrap_or_default()),
            insurance: parse_amount_or_zero("insurance", row.insurance.as_deref().unwrap_or_default()),
            housing_allowance: parse_amount_or_zero(
                "housing_allowance",
                row.housing_allowance.as_deref().unwrap_or_default(),
            ),
            other: parse_amount_or_zero("other", row.other.as_deref().unwrap_or_default()),
        },
    })
}

/// Parse CSV text and return the scenarios in file order.
pub fn load_from_str(input: &str) -> Result<Vec<Scenario>, ScenarioLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Convenience wrapper: read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &std::path::Path) -> Result<Vec<Scenario>, ScenarioLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ScenarioLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const MINIMAL_CSV: &str = "\
label,gross_income
first job,600000
";

    const FULL_CSV: &str = "\
label,gross_income,age_bracket,investment,insurance,housing_allowance,other
retired,900000,60to80,150000,25000,60000,10000
";

    // -----------------------------------------------------------------------
    // Minimal CSV: only required columns
    // -----------------------------------------------------------------------
    #[test]
    fn test_minimal_csv_uses_defaults() {
        let scenarios = load_from_str(MINIMAL_CSV).expect("should parse minimal CSV");

        assert_eq!(
            scenarios,
            vec![Scenario {
                label: "first job".to_string(),
                gross_income: dec!(600000),
                age_bracket: AgeBracket::Below60,
                deductions: DeductionInputs::default(),
            }]
        );
    }

    #[test]
    fn test_full_csv_all_fields_populated() {
        let scenarios = load_from_str(FULL_CSV).expect("should parse full CSV");
        let s = &scenarios[0];

        assert_eq!(s.age_bracket, AgeBracket::From60To80);
        assert_eq!(
            s.deductions,
            DeductionInputs {
                investment: dec!(150000),
                insurance: dec!(25000),
                housing_allowance: dec!(60000),
                other: dec!(10000),
            }
        );
    }

    #[test]
    fn test_empty_cells_are_zero() {
        let csv = "\
label,gross_income,age_bracket,investment,insurance,housing_allowance,other
a,1000000,,,5000,,
";
        let scenarios = load_from_str(csv).expect("should parse");

        assert_eq!(scenarios[0].age_bracket, AgeBracket::Below60);
        assert_eq!(scenarios[0].deductions.investment, dec!(0));
        assert_eq!(scenarios[0].deductions.insurance, dec!(5000));
    }

    #[test]
    fn test_non_numeric_deduction_cell_is_zero() {
        let csv = "\
label,gross_income,age_bracket,investment,insurance
x,1000000,below60,n/a,5000
";
        let scenarios = load_from_str(csv).expect("unreadable deduction should not reject the file");

        assert_eq!(scenarios[0].deductions.investment, dec!(0));
        assert_eq!(scenarios[0].deductions.insurance, dec!(5000));
    }

    #[test]
    fn test_out_of_range_deduction_cell_is_zero() {
        let csv = "label,gross_income,other\nx,1000000,79228162514264337593543950335\n";
        let scenarios = load_from_str(csv).expect("should parse");

        assert_eq!(scenarios[0].deductions.other, dec!(0));
    }

    #[test]
    fn test_income_at_maximum_is_accepted() {
        let csv = "label,gross_income\ntop,1000000000000000\n";
        let scenarios = load_from_str(csv).expect("maximum income is in range");

        assert_eq!(scenarios[0].gross_income, MAX_AMOUNT);
    }

    #[test]
    fn test_income_above_maximum_reports_row() {
        let csv = "\
label,gross_income
ok,600000
huge,79228162514264337593543950335
";
        match load_from_str(csv).unwrap_err() {
            ScenarioLoadError::IncomeOutOfRange { row, .. } => assert_eq!(row, 2),
            other => panic!("expected IncomeOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_age_bracket_reports_row() {
        let csv = "\
label,gross_income,age_bracket
a,1,below60
b,2,ancient
";
        match load_from_str(csv).unwrap_err() {
            ScenarioLoadError::InvalidAgeBracket { value, row } => {
                assert_eq!(value, "ancient");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidAgeBracket, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_income_returns_parse_error() {
        let csv = "label,gross_income\na,lots\n";

        assert!(matches!(load_from_str(csv), Err(ScenarioLoadError::Parse(_))));
    }

    #[test]
    fn test_missing_label_column_returns_parse_error() {
        let csv = "gross_income\n1000000\n";

        assert!(matches!(load_from_str(csv), Err(ScenarioLoadError::Parse(_))));
    }

    #[test]
    fn test_header_only_is_empty() {
        let scenarios = load_from_str("label,gross_income\n").expect("header-only CSV is valid");
        assert!(scenarios.is_empty());
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let csv = "\
other,gross_income,label,age_bracket
1000,750000,shuffled,above80
";
        let scenarios = load_from_str(csv).expect("column order should not matter");

        assert_eq!(scenarios[0].label, "shuffled");
        assert_eq!(scenarios[0].gross_income, dec!(750000));
        assert_eq!(scenarios[0].age_bracket, AgeBracket::Above80);
        assert_eq!(scenarios[0].deductions.other, dec!(1000));
    }
}

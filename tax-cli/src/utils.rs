use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tax_core::DeductionInputs;
use thiserror::Error;

/// Largest amount, in rupees, accepted from user input (₹10^15).
///
/// Anything larger in magnitude is rejected before it reaches the engine.
pub const MAX_AMOUNT: Decimal = dec!(1_000_000_000_000_000);

/// Error returned when a string cannot be parsed as an amount.
#[derive(Debug, Error)]
pub enum ParseDecimalError {
    #[error("invalid amount '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("amount '{input}' exceeds the maximum of {max}", max = MAX_AMOUNT)]
    OutOfRange { input: String },
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,50,000"` or `"150,000"`).
/// Empty or whitespace-only input is treated as 0. Values beyond
/// [`MAX_AMOUNT`] in either direction are an error.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let value: Decimal = normalized.parse().map_err(|source| ParseDecimalError::Invalid {
        input: s.to_string(),
        source,
    })?;
    if value.abs() > MAX_AMOUNT {
        return Err(ParseDecimalError::OutOfRange { input: s.to_string() });
    }
    Ok(value)
}

/// Parses an amount typed by the user, coercing anything unreadable to zero.
///
/// `field` names the input in the warning logged on coercion.
pub fn parse_amount_or_zero(
    field: &'static str,
    s: &str,
) -> Decimal {
    parse_decimal(s).unwrap_or_else(|e| {
        tracing::warn!(field, input = %s, "{e}; using 0");
        Decimal::ZERO
    })
}

/// Deduction amounts as typed, before coercion.
#[derive(Debug, Clone, Default)]
pub struct RawDeductions<'a> {
    pub investment: &'a str,
    pub insurance: &'a str,
    pub housing_allowance: &'a str,
    pub other: &'a str,
}

impl RawDeductions<'_> {
    /// Coerces every field with [`parse_amount_or_zero`].
    pub fn to_inputs(&self) -> DeductionInputs {
        DeductionInputs {
            investment: parse_amount_or_zero("investment", self.investment),
            insurance: parse_amount_or_zero("insurance", self.insurance),
            housing_allowance: parse_amount_or_zero("housing_allowance", self.housing_allowance),
            other: parse_amount_or_zero("other", self.other),
        }
    }
}

use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseAmountError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Trims whitespace and drops thousands separators and a leading `€`.
fn normalize_amount_input(s: &str) -> String {
    s.trim().trim_start_matches('€').trim().replace(',', "")
}

/// Parses an amount typed on the command line, e.g. `"1,234.56"` or
/// `"€800"`. Used as a `clap` value parser.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    normalized.parse().map_err(|e| {
        tracing::warn!(input = %s, "invalid amount: {}", e);
        ParseAmountError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Formats optional text for display, using "—" when missing or blank.
pub fn opt_text_display(s: Option<&str>) -> &str {
    s.filter(|s| !s.trim().is_empty()).unwrap_or("—")
}

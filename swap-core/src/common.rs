//! Shared helpers for money values entered through forms.
//!
//! Rents and budgets arrive as free text. These helpers normalize that text
//! into [`Decimal`] values and format results for display.

use rust_decimal::{Decimal, RoundingStrategy};

/// Normalizes input for decimal parsing: trims whitespace and removes commas
/// (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use swap_core::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(43.245)), dec!(43.25));
/// assert_eq!(round_half_up(dec!(43.244)), dec!(43.24));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parses free-text money input, falling back to zero.
///
/// Empty input and input that is not a number both yield zero; the latter
/// is logged at `warn` so a bad value is visible without failing the form.
pub fn parse_decimal_or_zero(s: &str) -> Decimal {
    parse_optional_decimal(s).unwrap_or(Decimal::ZERO)
}

/// Parses free-text money input into an optional [`Decimal`].
///
/// Returns `None` for empty input or when parsing fails.
pub fn parse_optional_decimal(s: &str) -> Option<Decimal> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return None;
    }
    normalized.parse().map_or_else(
        |e| {
            tracing::warn!(input = %s, "invalid decimal input: {}", e);
            None
        },
        Some,
    )
}

/// Formats an amount with exactly two decimal places.
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value))
}

/// Formats an amount in euros, e.g. `€1045.00`.
pub fn format_euros(value: Decimal) -> String {
    format!("€{}", format_amount(value))
}

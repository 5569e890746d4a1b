//! Defensive money parsing and display formatting.
//!
//! Prices arrive from the backend as strings that may already be formatted
//! for display (e.g. `"12.50 €"` or `"€12.50"`). Arithmetic happens on
//! [`rust_decimal::Decimal`] so that accumulating many lines never loses
//! precision; rounding to the two display decimals happens exactly once, in
//! [`format_eur`].

use rust_decimal::Decimal;

/// Parse a possibly-formatted price string into a decimal amount.
///
/// Everything except ASCII digits and the decimal point is discarded before
/// parsing, so currency symbols and surrounding text are tolerated.
/// Unparseable input degrades to zero rather than failing - a missing price
/// must never block the cart.
///
/// # Examples
///
/// ```
/// use pepper_menu_core::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount("12.50"), "12.50".parse::<Decimal>().unwrap());
/// assert_eq!(parse_amount("7487.00 €"), "7487.00".parse::<Decimal>().unwrap());
/// assert_eq!(parse_amount("not a price"), Decimal::ZERO);
/// ```
#[must_use]
pub fn parse_amount(raw: &str) -> Decimal {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse().unwrap_or(Decimal::ZERO)
}

/// Format an amount for display, rounded to two decimals with a euro sign.
///
/// This is the single place where rounding happens; callers must keep
/// intermediate sums at full precision.
#[must_use]
pub fn format_eur(amount: Decimal) -> String {
    format!("€{amount:.2}")
}

//! Line and cart totals.
//!
//! All arithmetic happens on [`Decimal`] at full precision; nothing here
//! rounds. Display rounding is [`pepper_menu_core::format_eur`]'s job, and
//! it happens exactly once, at presentation time, so many-line carts never
//! accumulate rounding error.

use rust_decimal::Decimal;

use pepper_menu_core::parse_amount;

use crate::cart::CartLine;

/// Effective unit price of a line: the product's base price plus the price
/// of every selected extra.
#[must_use]
pub fn unit_price(line: &CartLine) -> Decimal {
    let base = parse_amount(&line.product.price);
    let extras: Decimal = line
        .customization
        .iter()
        .flat_map(|c| c.selected_extras.iter())
        .filter_map(|id| line.product.extra(*id))
        .map(|extra| parse_amount(&extra.price))
        .sum();
    base + extras
}

/// `unit_price * quantity`, at full precision.
#[must_use]
pub fn line_total(line: &CartLine) -> Decimal {
    unit_price(line) * Decimal::from(line.quantity)
}

/// Sum of all line totals, at full precision.
#[must_use]
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(line_total).sum()
}

//! Pure price computation. No side effects, no store access.
//!
//! All arithmetic stays in [`Decimal`]: line totals are exact and the cart
//! total is summed exactly before the final rounding step, leaving no
//! per-line accumulation drift to correct for.

use crate::model::CartEntry;
use rust_decimal::{Decimal, RoundingStrategy};

/// Standard currency rounding: 2 decimal places, half-up.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `round2(unit_price * quantity)`.
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    round2(unit_price * Decimal::from(quantity))
}

/// Sum of line totals across the cart, rounded once at the end.
pub fn cart_total(entries: &[CartEntry]) -> Decimal {
    round2(
        entries
            .iter()
            .map(|e| line_total(e.menu_item.price, e.line.quantity))
            .sum(),
    )
}

/// Cart total plus the delivery fee. The fee is a policy parameter; in
/// scope it is always waived (zero).
pub fn order_total(cart_total: Decimal, delivery_fee: Decimal) -> Decimal {
    round2(cart_total + delivery_fee)
}

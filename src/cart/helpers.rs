//! Shopping Cart Business Logic Helpers
//!
//! This module contains helper functions for cart identifiers, money
//! conversion and display formatting.

use super::models::CartItem;
use crate::checkout::CheckoutError;
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use uuid::Uuid;

/// Returns the provided `cart_id` or creates a new UUID string when `None`.
///
/// This guarantees that every cart operation works with a non-empty identifier.
pub fn get_or_create_cart_id(cart_id: Option<String>) -> String {
    cart_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string())
}

/// Converts a major-unit amount (rupees) into minor units (paise).
///
/// Half-paise are rounded away from zero, so `49.995` becomes `5000`.
///
/// # Errors
///
/// Returns [`CheckoutError::AmountOutOfRange`] when the amount is negative or
/// does not fit in a `u64` once scaled.
pub fn to_minor_units(amount: Decimal) -> Result<u64, CheckoutError> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(CheckoutError::AmountOutOfRange)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(CheckoutError::AmountOutOfRange)
}

/// Renders an amount with the rupee sign and two fixed decimal places.
pub fn format_display(amount: Decimal) -> String {
    format!("₹{:.2}", amount)
}

/// Produces a human-readable one-line summary for a list of cart items.
///
/// Example output: `"2x Denim Jeans, 1x Sneakers"`.
pub fn format_item_summary(items: &[CartItem]) -> String {
    items
        .iter()
        .map(|i| format!("{}x {}", i.quantity, i.product.name))
        .collect::<Vec<_>>()
        .join(", ")
}

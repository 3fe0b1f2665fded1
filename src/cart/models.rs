//! Shopping Cart Domain Models
//!
//! This module contains the cart store itself along with the request and
//! response payloads used by the cart endpoints.

use crate::catalog::Product;
use crate::checkout::models::CheckoutStep;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::helpers::format_display;

// =============================================================================
// Cart Domain Models
// =============================================================================

/// A line item: one product and how many units of it were chosen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// The product fields, flattened into the item
    #[serde(flatten)]
    pub product: Product,

    /// Number of units, always at least 1
    pub quantity: u32,
}

impl CartItem {
    /// `price × quantity`
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Ordered collection of line items, at most one per product id.
///
/// Insertion order is the order in which products were first added. Totals
/// are folded over the items on every call and never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of `product`, merging with an existing line item.
    pub fn add(&mut self, product: &Product) {
        self.add_units(product, 1);
    }

    /// Adds `units` of `product` in a single merge. Quantities saturate at `u32::MAX`.
    pub fn add_units(&mut self, product: &Product, units: u32) {
        if units == 0 {
            return;
        }
        if let Some(existing) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            existing.quantity = existing.quantity.saturating_add(units);
        } else {
            self.items.push(CartItem {
                product: product.clone(),
                quantity: units,
            });
        }
    }

    /// Drops the line item for `product_id`. Missing ids are ignored.
    pub fn remove(&mut self, product_id: u32) {
        self.items.retain(|i| i.product.id != product_id);
    }

    /// Sets the absolute quantity for `product_id`.
    ///
    /// A quantity of 0 removes the line item. Setting a quantity on a
    /// product that is not in the cart does nothing.
    pub fn update_quantity(&mut self, product_id: u32, new_quantity: u32) {
        if new_quantity == 0 {
            self.remove(product_id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            item.quantity = new_quantity;
        }
    }

    /// Empties the cart
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of `price × quantity` over all line items
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

// =============================================================================
// Request Payloads
// =============================================================================

/// Input for `POST /cart/add`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartInput {
    /// Product to add one unit of
    pub product_id: u32,

    /// Optional cart identifier, a new cart is created when absent
    pub cart_id: Option<String>,
}

/// Input for `POST /cart/remove`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartInput {
    pub cart_id: String,
    pub product_id: u32,
}

/// Input for `POST /cart/update`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityInput {
    pub cart_id: String,
    pub product_id: u32,

    /// New absolute quantity; anything below 1 removes the item
    pub quantity: i64,
}

// =============================================================================
// Responses
// =============================================================================

/// A line item as rendered in the cart panel and order summary
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItemView {
    #[serde(flatten)]
    pub item: CartItem,

    pub line_total: Decimal,

    /// `line_total` formatted for display
    pub display_line_total: String,
}

impl From<&CartItem> for LineItemView {
    fn from(item: &CartItem) -> Self {
        let line_total = item.line_total();
        Self {
            item: item.clone(),
            line_total,
            display_line_total: format_display(line_total),
        }
    }
}

/// Snapshot of a cart and its checkout step after an operation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub cart_id: String,
    pub items: Vec<LineItemView>,
    pub total_items: u64,
    pub total_price: Decimal,
    pub display_total: String,
    pub checkout: CheckoutStep,
}

impl CartView {
    pub fn new(cart_id: &str, cart: &Cart, checkout: CheckoutStep) -> Self {
        let total_price = cart.total_price();
        Self {
            cart_id: cart_id.to_string(),
            items: cart.items().iter().map(LineItemView::from).collect(),
            total_items: cart.total_items(),
            total_price,
            display_total: format_display(total_price),
            checkout,
        }
    }
}

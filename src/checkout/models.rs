//! Checkout Domain Models

use crate::cart::models::{CartView, LineItemView};
use crate::payment::{LoadState, Prefill};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, time::Duration};

/// Step of the checkout dialog, as shown to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutStep {
    Closed,
    Summary,
    PaymentCollecting,
    Completed,
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Closed => "closed",
            Self::Summary => "summary",
            Self::PaymentCollecting => "collecting payment",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Merchant-side settings used to build payment options
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub merchant_key: String,
    pub merchant_name: String,
    pub currency: String,
    pub description: String,
    pub theme_color: Option<String>,
    pub payment_timeout: Duration,
    pub widget_load_timeout: Duration,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            merchant_key: "rzp_test_storefront".to_string(),
            merchant_name: "DotShop".to_string(),
            currency: "INR".to_string(),
            description: "We Responce for your product".to_string(),
            theme_color: Some("#F37254".to_string()),
            payment_timeout: Duration::from_secs(120),
            widget_load_timeout: Duration::from_secs(15),
        }
    }
}

/// Customer supplied extras for a payment attempt
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentRequest {
    pub prefill: Option<Prefill>,

    #[serde(default)]
    pub notes: BTreeMap<String, String>,
}

/// Acknowledgment of a completed order
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    /// Identifier reported by the payment widget
    pub payment_id: String,

    /// Amount charged, in minor units
    pub amount: u64,

    pub items: Vec<LineItemView>,
    pub total_price: Decimal,
    pub display_total: String,
}

// =============================================================================
// Request Payloads
// =============================================================================

/// Input for `POST /checkout/open` and `POST /checkout/dismiss`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutInput {
    pub cart_id: String,
}

/// Input for `POST /checkout/pay`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayInput {
    pub cart_id: String,

    #[serde(flatten)]
    pub request: PaymentRequest,
}

// =============================================================================
// Responses
// =============================================================================

/// Itemised order summary with the amount that will be charged
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub items: Vec<LineItemView>,
    pub total_price: Decimal,
    pub display_total: String,

    /// Amount handed to the payment widget, in minor units
    pub amount: u64,
    pub currency: String,
}

/// Response for every checkout endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub cart: CartView,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<OrderSummary>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<OrderReceipt>,

    /// Load state of the payment widget while the dialog shows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget: Option<LoadState>,

    /// Whether the last order went through
    pub order_complete: bool,
}

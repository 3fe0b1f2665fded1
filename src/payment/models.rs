//! Payment Collaborator Models
//!
//! Data exchanged with the hosted payment widget: the options it is opened
//! with and the outcome it reports back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Customer identity fields the widget pre-fills
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Prefill {
    pub name: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
}

/// Widget display theme
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Theme {
    pub color: String,
}

/// Everything the widget needs to open a payment session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentOptions {
    /// Merchant key identifier issued by the payment provider
    pub key: String,

    /// Amount in minor currency units (paise)
    pub amount: u64,

    /// ISO currency code
    pub currency: String,

    /// Merchant display name
    pub name: String,

    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefill: Option<Prefill>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub notes: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

/// Identifiers returned by the widget on success.
///
/// These are not proof of payment on their own; settlement has to be
/// verified server-side against the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSuccess {
    pub payment_id: String,
    pub order_id: Option<String>,
    pub signature: Option<String>,
}

/// Identifiers correlated with a failed payment
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FailureMetadata {
    pub payment_id: Option<String>,
    pub order_id: Option<String>,
}

/// Structured failure reported by the widget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentFailure {
    pub code: String,

    /// Human-readable description shown to the customer
    pub description: String,

    pub source: String,

    /// Step of the payment session that failed
    pub step: String,

    /// Machine-readable reason
    pub reason: String,

    pub metadata: FailureMetadata,
}

/// The single outcome of an opened payment session
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    Succeeded(PaymentSuccess),
    Failed(PaymentFailure),

    /// No outcome arrived within the payment timeout
    TimedOut,

    /// The widget went away without reporting anything
    Abandoned,
}

//! Checkout error taxonomy

use super::models::CheckoutStep;
use crate::payment::PaymentFailure;
use thiserror::Error;

/// Why a checkout operation or payment attempt did not go through.
///
/// Every variant ends the current payment attempt only. The session can
/// always retry from the order summary.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("payment widget failed to load: {0}")]
    ResourceLoadFailure(String),

    #[error("payment widget is not ready yet")]
    CollaboratorUnavailable,

    #[error("payment failed: {}", .0.description)]
    PaymentFailed(PaymentFailure),

    #[error("payment timed out")]
    PaymentTimedOut,

    #[error("payment widget closed without reporting an outcome")]
    PaymentAbandoned,

    #[error("cannot {action} while checkout is {from}")]
    InvalidTransition {
        from: CheckoutStep,
        action: &'static str,
    },

    #[error("payment outcome does not belong to the current attempt")]
    StaleAttempt,

    #[error("cart cannot change while a payment is being collected")]
    CartLocked,

    #[error("order amount is out of range")]
    AmountOutOfRange,
}

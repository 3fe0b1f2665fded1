//! REST API handlers for the checkout dialog
//!
//! Opening the summary, collecting payment and dismissing the dialog. The
//! operations are public so the MCP tools can drive the same flow.

use super::models::{CheckoutInput, CheckoutView, PayInput, PaymentRequest};
use crate::cart::state::{AppState, Session, SharedState};
use crate::error::AppResult;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};

/// Creates routes for checkout operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/checkout/open", post(open))
        .route("/checkout/pay", post(pay))
        .route("/checkout/dismiss", post(dismiss))
}

/// Moves a non-empty cart to the order summary.
pub fn open_checkout(state: &AppState, cart_id: &str) -> AppResult<CheckoutView> {
    state.with_session(cart_id, |session| {
        let Session { cart, checkout } = &mut *session;
        checkout.open(cart, state.payments.as_ref())?;
        session.checkout_view(cart_id, &state.settings)
    })
}

/// Runs one payment attempt from the summary to its outcome.
///
/// The session lock is released while the widget is collecting payment and
/// taken again to apply the outcome.
pub async fn collect_payment(
    state: &AppState,
    cart_id: &str,
    request: PaymentRequest,
) -> AppResult<CheckoutView> {
    let pending = state.with_session(cart_id, |session| {
        let Session { cart, checkout } = &mut *session;
        Ok(checkout.begin_payment(cart, state.payments.as_ref(), &state.settings, request)?)
    })?;

    let attempt = pending.attempt;
    let outcome = pending.wait(state.settings.payment_timeout).await;

    state.with_session(cart_id, |session| {
        let Session { cart, checkout } = &mut *session;
        checkout.settle(attempt, outcome, cart)?;
        session.checkout_view(cart_id, &state.settings)
    })
}

/// Closes the dialog from any step without touching the cart.
pub fn dismiss_checkout(state: &AppState, cart_id: &str) -> AppResult<CheckoutView> {
    state.with_session(cart_id, |session| {
        session.checkout.dismiss();
        session.checkout_view(cart_id, &state.settings)
    })
}

/// Endpoint: POST /checkout/open
async fn open(
    State(state): State<SharedState>,
    payload: Result<Json<CheckoutInput>, JsonRejection>,
) -> AppResult<Json<CheckoutView>> {
    let Json(payload) = payload?;
    open_checkout(&state, &payload.cart_id).map(Json)
}

/// Endpoint: POST /checkout/pay
async fn pay(
    State(state): State<SharedState>,
    payload: Result<Json<PayInput>, JsonRejection>,
) -> AppResult<Json<CheckoutView>> {
    let Json(payload) = payload?;
    collect_payment(&state, &payload.cart_id, payload.request)
        .await
        .map(Json)
}

/// Endpoint: POST /checkout/dismiss
async fn dismiss(
    State(state): State<SharedState>,
    payload: Result<Json<CheckoutInput>, JsonRejection>,
) -> AppResult<Json<CheckoutView>> {
    let Json(payload) = payload?;
    dismiss_checkout(&state, &payload.cart_id).map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::models::{CheckoutSettings, CheckoutStep};
    use crate::checkout::CheckoutError;
    use crate::error::AppError;
    use crate::payment::{SimulatedGateway, Simulation};
    use std::{sync::Arc, time::Duration};

    fn state_with(gateway: Arc<SimulatedGateway>, settings: CheckoutSettings) -> AppState {
        AppState::new(gateway, settings)
    }

    #[tokio::test]
    async fn full_purchase_clears_cart() {
        let gateway = Arc::new(SimulatedGateway::approving());
        let state = state_with(gateway.clone(), CheckoutSettings::default());
        state.add_to_cart("c1", 1).unwrap();
        state.add_to_cart("c1", 2).unwrap();
        state.add_to_cart("c1", 2).unwrap();

        let view = open_checkout(&state, "c1").unwrap();
        assert_eq!(view.cart.checkout, CheckoutStep::Summary);
        assert_eq!(view.summary.as_ref().unwrap().amount, 949_700);

        let view = collect_payment(&state, "c1", PaymentRequest::default()).await.unwrap();
        assert!(view.order_complete);
        assert_eq!(view.cart.total_items, 0);
        assert_eq!(view.receipt.unwrap().amount, 949_700);
        assert_eq!(gateway.last_amount(), 949_700);
        assert!(gateway.scripts().is_empty());
    }

    #[tokio::test]
    async fn decline_is_retryable() {
        let gateway = Arc::new(SimulatedGateway::approving());
        gateway.set_simulation(Simulation::Decline);
        let state = state_with(gateway.clone(), CheckoutSettings::default());
        state.add_to_cart("c1", 5).unwrap();
        open_checkout(&state, "c1").unwrap();

        let err = collect_payment(&state, "c1", PaymentRequest::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Checkout(CheckoutError::PaymentFailed(_))));
        assert_eq!(state.cart("c1").unwrap().checkout, CheckoutStep::Summary);

        gateway.set_simulation(Simulation::Approve);
        let view = collect_payment(&state, "c1", PaymentRequest::default()).await.unwrap();
        assert!(view.order_complete);
        assert_eq!(gateway.opened(), 2);
    }

    #[tokio::test]
    async fn silent_widget_times_out_back_to_summary() {
        let gateway = Arc::new(SimulatedGateway::approving());
        gateway.set_simulation(Simulation::Hold);
        let settings = CheckoutSettings {
            payment_timeout: Duration::from_millis(20),
            ..CheckoutSettings::default()
        };
        let state = state_with(gateway, settings);
        state.add_to_cart("c1", 5).unwrap();
        open_checkout(&state, "c1").unwrap();

        let err = collect_payment(&state, "c1", PaymentRequest::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Checkout(CheckoutError::PaymentTimedOut)));

        let view = state.cart("c1").unwrap();
        assert_eq!(view.checkout, CheckoutStep::Summary);
        assert_eq!(view.total_items, 1);
    }

    #[tokio::test]
    async fn dismiss_keeps_cart() {
        let state = state_with(Arc::new(SimulatedGateway::approving()), CheckoutSettings::default());
        state.add_to_cart("c1", 5).unwrap();
        open_checkout(&state, "c1").unwrap();

        let view = dismiss_checkout(&state, "c1").unwrap();
        assert_eq!(view.cart.checkout, CheckoutStep::Closed);
        assert_eq!(view.cart.total_items, 1);
        assert!(!view.order_complete);
    }
}

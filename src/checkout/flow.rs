//! Checkout State Machine
//!
//! `Closed → Summary → PaymentCollecting → Completed`, with a dismiss from
//! any step back to `Closed`. The payment widget is mounted while the summary
//! is on screen and released as soon as the dialog closes or the order
//! completes.

use super::errors::CheckoutError;
use super::models::{CheckoutSettings, CheckoutStep, OrderReceipt, OrderSummary, PaymentRequest};
use crate::cart::helpers::{format_display, format_item_summary, to_minor_units};
use crate::cart::models::{Cart, LineItemView};
use crate::payment::{
    LoadState, PaymentCollaborator, PaymentOptions, PaymentOutcome, PendingPayment, Theme,
    WidgetMount,
};
use std::mem;
use uuid::Uuid;

#[derive(Debug, Default)]
enum CheckoutState {
    #[default]
    Closed,
    Summary {
        widget: WidgetMount,
    },
    PaymentCollecting {
        attempt: Uuid,
        amount: u64,
        widget: WidgetMount,
    },
    Completed {
        receipt: OrderReceipt,
    },
}

/// Checkout dialog for one cart
#[derive(Debug, Default)]
pub struct CheckoutFlow {
    state: CheckoutState,
}

impl CheckoutFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> CheckoutStep {
        match self.state {
            CheckoutState::Closed => CheckoutStep::Closed,
            CheckoutState::Summary { .. } => CheckoutStep::Summary,
            CheckoutState::PaymentCollecting { .. } => CheckoutStep::PaymentCollecting,
            CheckoutState::Completed { .. } => CheckoutStep::Completed,
        }
    }

    /// True only once a payment has succeeded and the cart was cleared
    pub fn order_complete(&self) -> bool {
        matches!(self.state, CheckoutState::Completed { .. })
    }

    pub fn receipt(&self) -> Option<&OrderReceipt> {
        match &self.state {
            CheckoutState::Completed { receipt } => Some(receipt),
            _ => None,
        }
    }

    /// Whether cart edits must currently be refused
    pub fn is_collecting(&self) -> bool {
        matches!(self.state, CheckoutState::PaymentCollecting { .. })
    }

    /// Load state of the mounted widget, if one is mounted
    pub fn widget_state(&self, settings: &CheckoutSettings) -> Option<LoadState> {
        match &self.state {
            CheckoutState::Summary { widget } | CheckoutState::PaymentCollecting { widget, .. } => {
                Some(widget.load_state(settings.widget_load_timeout))
            }
            _ => None,
        }
    }

    /// Opens the order summary for a non-empty cart.
    ///
    /// Reopening always lands on the summary, never on a stale payment step.
    pub fn open(
        &mut self,
        cart: &Cart,
        collaborator: &dyn PaymentCollaborator,
    ) -> Result<(), CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        match self.state {
            CheckoutState::Closed | CheckoutState::Completed { .. } => {
                self.state = CheckoutState::Summary {
                    widget: collaborator.mount(),
                };
                tracing::info!(items = cart.total_items(), "checkout summary opened");
                Ok(())
            }
            CheckoutState::Summary { .. } => Ok(()),
            CheckoutState::PaymentCollecting { .. } => Err(CheckoutError::InvalidTransition {
                from: self.step(),
                action: "open checkout",
            }),
        }
    }

    /// Builds the itemised summary and the amount that would be charged.
    pub fn summary(
        &self,
        cart: &Cart,
        settings: &CheckoutSettings,
    ) -> Result<OrderSummary, CheckoutError> {
        let total_price = cart.total_price();
        Ok(OrderSummary {
            items: cart.items().iter().map(LineItemView::from).collect(),
            total_price,
            display_total: format_display(total_price),
            amount: to_minor_units(total_price)?,
            currency: settings.currency.clone(),
        })
    }

    /// Hands the cart total to the payment widget.
    ///
    /// On success the flow is collecting payment and the returned
    /// [`PendingPayment`] resolves with the widget's outcome. On any error the
    /// flow stays on the summary.
    pub fn begin_payment(
        &mut self,
        cart: &Cart,
        collaborator: &dyn PaymentCollaborator,
        settings: &CheckoutSettings,
        request: PaymentRequest,
    ) -> Result<PendingPayment, CheckoutError> {
        let CheckoutState::Summary { widget } = &self.state else {
            return Err(CheckoutError::InvalidTransition {
                from: self.step(),
                action: "start payment",
            });
        };

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        match widget.load_state(settings.widget_load_timeout) {
            LoadState::Ready => {}
            LoadState::Loading => return Err(CheckoutError::CollaboratorUnavailable),
            LoadState::Failed(reason) => return Err(CheckoutError::ResourceLoadFailure(reason)),
        }

        let amount = to_minor_units(cart.total_price())?;
        let options = PaymentOptions {
            key: settings.merchant_key.clone(),
            amount,
            currency: settings.currency.clone(),
            name: settings.merchant_name.clone(),
            description: settings.description.clone(),
            prefill: request.prefill,
            notes: request.notes,
            theme: settings.theme_color.clone().map(|color| Theme { color }),
        };

        let receiver = collaborator.open(options)?;
        let attempt = Uuid::new_v4();

        if let CheckoutState::Summary { widget } = mem::take(&mut self.state) {
            self.state = CheckoutState::PaymentCollecting {
                attempt,
                amount,
                widget,
            };
        }

        tracing::info!(%attempt, amount, items = %format_item_summary(cart.items()), "payment collection started");
        Ok(PendingPayment::new(attempt, amount, receiver))
    }

    /// Applies the widget's outcome for `attempt`.
    ///
    /// Success clears the cart and completes the order. Every other outcome
    /// returns the flow to the summary so the customer can retry.
    pub fn settle(
        &mut self,
        attempt: Uuid,
        outcome: PaymentOutcome,
        cart: &mut Cart,
    ) -> Result<&OrderReceipt, CheckoutError> {
        let current = match &self.state {
            CheckoutState::PaymentCollecting { attempt: current, .. } => *current,
            _ => return Err(CheckoutError::StaleAttempt),
        };
        if current != attempt {
            tracing::warn!(%attempt, %current, "ignoring outcome for a previous payment attempt");
            return Err(CheckoutError::StaleAttempt);
        }

        let CheckoutState::PaymentCollecting { amount, widget, .. } = mem::take(&mut self.state)
        else {
            return Err(CheckoutError::StaleAttempt);
        };

        let error = match outcome {
            PaymentOutcome::Succeeded(success) => {
                let total_price = cart.total_price();
                let receipt = OrderReceipt {
                    payment_id: success.payment_id,
                    amount,
                    items: cart.items().iter().map(LineItemView::from).collect(),
                    total_price,
                    display_total: format_display(total_price),
                };
                cart.clear();
                drop(widget);

                tracing::info!(%attempt, payment_id = %receipt.payment_id, amount, "order completed");
                self.state = CheckoutState::Completed { receipt };
                return self.receipt().ok_or(CheckoutError::StaleAttempt);
            }
            PaymentOutcome::Failed(failure) => {
                tracing::warn!(%attempt, code = %failure.code, reason = %failure.reason, "payment failed: {}", failure.description);
                CheckoutError::PaymentFailed(failure)
            }
            PaymentOutcome::TimedOut => {
                tracing::warn!(%attempt, "payment timed out");
                CheckoutError::PaymentTimedOut
            }
            PaymentOutcome::Abandoned => {
                tracing::warn!(%attempt, "payment widget closed without an outcome");
                CheckoutError::PaymentAbandoned
            }
        };

        self.state = CheckoutState::Summary { widget };
        Err(error)
    }

    /// Closes the dialog from any step. The cart is left as it is.
    pub fn dismiss(&mut self) {
        if !matches!(self.state, CheckoutState::Closed) {
            tracing::info!(from = %self.step(), "checkout dismissed");
        }
        self.state = CheckoutState::Closed;
    }
}

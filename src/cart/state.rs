//! Shopping Cart State Management
//!
//! This module manages the application state: one [`Session`] per cart id,
//! the product catalog and the payment collaborator every checkout uses.

use super::models::{Cart, CartView};
use crate::catalog::{Catalog, Product};
use crate::checkout::models::{CheckoutSettings, CheckoutView};
use crate::checkout::{CheckoutError, CheckoutFlow};
use crate::error::{AppError, AppResult};
use crate::payment::PaymentCollaborator;
use dashmap::DashMap;
use std::sync::Arc;

// =============================================================================
// Session
// =============================================================================

/// A shopper's cart together with its checkout dialog
#[derive(Debug, Default)]
pub struct Session {
    pub cart: Cart,
    pub checkout: CheckoutFlow,
}

impl Session {
    /// Runs a cart mutation unless a payment is being collected.
    pub fn edit_cart(&mut self, edit: impl FnOnce(&mut Cart)) -> Result<(), CheckoutError> {
        if self.checkout.is_collecting() {
            return Err(CheckoutError::CartLocked);
        }
        edit(&mut self.cart);
        Ok(())
    }

    pub fn cart_view(&self, cart_id: &str) -> CartView {
        CartView::new(cart_id, &self.cart, self.checkout.step())
    }

    pub fn checkout_view(&self, cart_id: &str, settings: &CheckoutSettings) -> AppResult<CheckoutView> {
        let summary = if self.cart.is_empty() {
            None
        } else {
            Some(self.checkout.summary(&self.cart, settings)?)
        };

        Ok(CheckoutView {
            cart: self.cart_view(cart_id),
            summary,
            receipt: self.checkout.receipt().cloned(),
            widget: self.checkout.widget_state(settings),
            order_complete: self.checkout.order_complete(),
        })
    }
}

// =============================================================================
// Application State
// =============================================================================

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Core application state containing sessions and the storefront's collaborators
pub struct AppState {
    /// In-memory sessions, keyed by cart_id.
    /// Each mutation holds the entry lock, so readers never see a half-applied change.
    pub sessions: DashMap<String, Session>,

    pub catalog: Catalog,

    pub payments: Arc<dyn PaymentCollaborator>,

    pub settings: CheckoutSettings,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sessions", &self.sessions.len())
            .field("catalog", &self.catalog.products().len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Creates a new AppState with no sessions and the seeded catalog
    pub fn new(payments: Arc<dyn PaymentCollaborator>, settings: CheckoutSettings) -> Self {
        Self {
            sessions: DashMap::new(),
            catalog: Catalog::seeded(),
            payments,
            settings,
        }
    }

    pub fn product(&self, product_id: u32) -> AppResult<&Product> {
        self.catalog.get(product_id).ok_or(AppError::NotFound)
    }

    /// Runs `f` against an existing session under its entry lock.
    pub fn with_session<T>(
        &self,
        cart_id: &str,
        f: impl FnOnce(&mut Session) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut session = self.sessions.get_mut(cart_id).ok_or(AppError::NotFound)?;
        f(&mut session)
    }

    /// Adds one unit of `product_id` to the cart, creating the session if needed.
    pub fn add_to_cart(&self, cart_id: &str, product_id: u32) -> AppResult<CartView> {
        self.add_units(cart_id, product_id, 1)
    }

    /// Adds `units` of `product_id` as one atomic change.
    pub fn add_units(&self, cart_id: &str, product_id: u32, units: u32) -> AppResult<CartView> {
        let product = self.product(product_id)?;
        let mut session = self.sessions.entry(cart_id.to_string()).or_default();

        session.edit_cart(|cart| cart.add_units(product, units))?;
        tracing::debug!(cart_id, product_id, units, total_items = session.cart.total_items(), "added to cart");

        Ok(session.cart_view(cart_id))
    }

    pub fn remove_from_cart(&self, cart_id: &str, product_id: u32) -> AppResult<CartView> {
        self.with_session(cart_id, |session| {
            session.edit_cart(|cart| cart.remove(product_id))?;
            tracing::debug!(cart_id, product_id, "removed from cart");
            Ok(session.cart_view(cart_id))
        })
    }

    /// Sets an absolute quantity. Anything below 1 removes the item; values
    /// beyond `u32::MAX` are rejected.
    pub fn update_quantity(&self, cart_id: &str, product_id: u32, quantity: i64) -> AppResult<CartView> {
        let quantity = u32::try_from(quantity.max(0))
            .map_err(|_| AppError::BadRequest(format!("quantity {quantity} is out of range")))?;

        self.with_session(cart_id, |session| {
            session.edit_cart(|cart| cart.update_quantity(product_id, quantity))?;
            tracing::debug!(cart_id, product_id, quantity, "cart quantity updated");
            Ok(session.cart_view(cart_id))
        })
    }

    pub fn cart(&self, cart_id: &str) -> AppResult<CartView> {
        self.sessions
            .get(cart_id)
            .map(|session| session.cart_view(cart_id))
            .ok_or(AppError::NotFound)
    }
}

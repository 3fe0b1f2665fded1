//! Checkout Domain Module
//!
//! This module contains the checkout dialog, including:
//! - The step state machine (summary, payment collection, completion)
//! - Checkout error taxonomy
//! - Settings, summary and receipt models
//! - REST API handlers

pub mod errors;
pub mod flow;
pub mod handlers;
pub mod models;

pub use errors::CheckoutError;
pub use flow::CheckoutFlow;
pub use handlers::routes;
pub use models::{CheckoutSettings, CheckoutStep, OrderReceipt};

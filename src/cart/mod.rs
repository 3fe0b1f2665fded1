//! Shopping Cart Domain Module
//!
//! This module contains all shopping cart business logic, including:
//! - Domain models (Cart, CartItem, inputs, views)
//! - Business logic helpers (money conversion, formatting, cart ids)
//! - Application state management (sessions)
//! - REST API handlers

pub mod handlers;
pub mod helpers;
pub mod models;
pub mod state;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use models::{Cart, CartItem, CartView};
pub use state::{AppState, Session, SharedState};

//! Storefront Library
//!
//! This library provides the core of a single-page storefront: a fixed
//! product catalog, per-session shopping carts and a checkout flow that hands
//! the order total to a hosted payment widget. It is served over REST and
//! MCP (Model Context Protocol).

// Domain modules
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod mcp;
pub mod payment;

// Infrastructure
pub mod config;
pub mod error;
pub mod router;

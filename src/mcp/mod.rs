//! Model Context Protocol (MCP) Module
//!
//! Exposes the storefront to agents as MCP tools:
//! - Protocol models (JsonRpcRequest, tool arguments, constants)
//! - RPC helpers (success/error responses, tool results)
//! - MCP handlers (initialize, tools/list, tools/call, etc.)

pub mod handlers;
pub mod helpers;
pub mod models;

// Re-export commonly used types and functions
pub use handlers::routes;

//! MCP Protocol Models and Constants
//!
//! This module contains all data structures and constants related to the
//! Model Context Protocol (MCP) surface of the storefront.

use serde::Deserialize;
use serde_json::Value;

// =============================================================================
// MCP Constants
// =============================================================================

/// Tool listing the catalog
pub const LIST_PRODUCTS_TOOL: &str = "list_products";
/// Tool adding units of a product to a cart
pub const ADD_TO_CART_TOOL: &str = "add_to_cart";
/// Tool setting the quantity of a line item
pub const UPDATE_QUANTITY_TOOL: &str = "update_quantity";
/// Tool opening the order summary
pub const CHECKOUT_TOOL: &str = "checkout";
/// Server identifier
pub const SERVER_NAME: &str = "storefront";
/// Protocol version for MCP
pub const PROTOCOL_VERSION: &str = "2024-11-05";

// =============================================================================
// MCP Protocol Models
// =============================================================================

/// Standard JSON-RPC 2.0 Request envelope
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version (should be "2.0")
    pub jsonrpc: Option<String>,

    /// Method name to invoke
    pub method: String,

    /// Parameters for the method
    pub params: Option<Value>,

    /// Request identifier
    pub id: Option<Value>,
}

// =============================================================================
// Tool Arguments
// =============================================================================

fn default_quantity() -> u32 {
    1
}

/// Arguments for the add_to_cart tool
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartArgs {
    pub product_id: u32,

    /// Units to add (defaults to 1)
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    pub cart_id: Option<String>,
}

/// Arguments for the update_quantity tool
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityArgs {
    pub cart_id: String,
    pub product_id: u32,
    pub quantity: i64,
}

/// Arguments for the checkout tool
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutArgs {
    pub cart_id: String,
}

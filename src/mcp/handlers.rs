//! MCP (Model Context Protocol) route handlers
//!
//! This module implements the Model Context Protocol handlers that let an
//! agent browse the catalog, fill a cart and open its checkout summary.
//! It exports `handle_tool_call` publicly to make it accessible for tests.

use super::{helpers::*, models::*};
use crate::cart::{helpers::*, state::*};
use crate::checkout::handlers::open_checkout;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// Creates routes for MCP-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/mcp", post(handle_mcp).get(handle_mcp_sse))
        .route("/mcp/", post(handle_mcp).get(handle_mcp_sse)) // Trailing slash safety
}

/// Handle SSE (Server-Sent Events) handshake for GET requests
async fn handle_mcp_sse() -> impl IntoResponse {
    (
        [("content-type", "text/event-stream")],
        "event: endpoint\ndata: /mcp\n\n",
    )
}

/// Endpoint: POST /mcp
/// Handles the Model Context Protocol communication for POST requests.
async fn handle_mcp(
    State(state): State<SharedState>,
    body: Result<Json<JsonRpcRequest>, axum::extract::rejection::JsonRejection>,
) -> impl IntoResponse {
    let req = match body {
        Ok(Json(r)) => r,
        Err(e) => {
            tracing::warn!(error = %e.body_text(), "rejected MCP request");
            return (
                StatusCode::BAD_REQUEST,
                Json(rpc_error(Value::Null, -32700, "Parse error")),
            )
                .into_response();
        }
    };

    let id = req.id.unwrap_or(Value::Null);
    let method_name = req.method.as_str();
    let params = req.params.unwrap_or(Value::Null);

    tracing::debug!(method = method_name, ?id, "MCP call");

    let response_body = match method_name {
        "initialize" => rpc_success(id, handle_initialize()),
        "notifications/initialized" => rpc_success(id, json!({})),
        "tools/list" => rpc_success(id, handle_tools_list()),
        "tools/call" => {
            let tool_name = params.get("name").and_then(|n| n.as_str()).unwrap_or("");
            let args = params.get("arguments").cloned().unwrap_or(Value::Null);

            match handle_tool_call(&state, tool_name, args) {
                Ok(result) => rpc_success(id, result),
                Err(msg) => rpc_error(id, -32602, msg),
            }
        }
        "ping" => rpc_success(id, json!({})),
        _ => {
            tracing::warn!(method = method_name, "unknown MCP method");
            rpc_error(id, -32601, "Method not found")
        }
    };

    Json(response_body).into_response()
}

// =============================================================================
// MCP Method Handlers
// =============================================================================

/// Handles `initialize` request (Handshake).
fn handle_initialize() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

/// Handles `tools/list` request.
fn handle_tools_list() -> Value {
    json!({
        "tools": [
            {
                "name": LIST_PRODUCTS_TOOL,
                "title": "List products",
                "description": "Lists every product in the storefront catalog.",
                "inputSchema": { "type": "object", "properties": {}, "additionalProperties": false }
            },
            {
                "name": ADD_TO_CART_TOOL,
                "title": "Add to cart",
                "description": "Adds units of a catalog product to a cart and returns the cart.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "productId": { "type": "integer" },
                        "quantity": { "type": "integer", "minimum": 1, "default": 1 },
                        "cartId": { "type": "string" }
                    },
                    "required": ["productId"],
                    "additionalProperties": false
                }
            },
            {
                "name": UPDATE_QUANTITY_TOOL,
                "title": "Update quantity",
                "description": "Sets the quantity of a cart line item; below 1 removes it.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "cartId": { "type": "string" },
                        "productId": { "type": "integer" },
                        "quantity": { "type": "integer" }
                    },
                    "required": ["cartId", "productId", "quantity"],
                    "additionalProperties": false
                }
            },
            {
                "name": CHECKOUT_TOOL,
                "title": "Checkout",
                "description": "Opens the order summary for a cart and reports the amount to pay.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "cartId": { "type": "string" }
                    },
                    "required": ["cartId"],
                    "additionalProperties": false
                }
            }
        ]
    })
}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, String> {
    serde_json::from_value(args).map_err(|e| format!("Invalid arguments: {}", e))
}

/// Handles `tools/call` request (Business Logic).
pub fn handle_tool_call(state: &AppState, name: &str, args: Value) -> Result<Value, String> {
    match name {
        LIST_PRODUCTS_TOOL => handle_list_products_tool(state),
        ADD_TO_CART_TOOL => handle_add_to_cart_tool(state, args),
        UPDATE_QUANTITY_TOOL => handle_update_quantity_tool(state, args),
        CHECKOUT_TOOL => handle_checkout_tool(state, args),
        _ => Err(format!("Unknown tool: {}", name)),
    }
}

fn handle_list_products_tool(state: &AppState) -> Result<Value, String> {
    let products = state.catalog.products();
    let listing = products
        .iter()
        .map(|p| format!("#{} {} ({})", p.id, p.name, format_display(p.price)))
        .collect::<Vec<_>>()
        .join("; ");

    Ok(tool_result(listing, json!({ "products": products })))
}

fn handle_add_to_cart_tool(state: &AppState, args: Value) -> Result<Value, String> {
    let input: AddToCartArgs = parse_args(args)?;
    if input.quantity == 0 {
        return Err("Invalid arguments: quantity must be at least 1".to_string());
    }

    let cart_id = get_or_create_cart_id(input.cart_id);
    let view = state
        .add_units(&cart_id, input.product_id, input.quantity)
        .map_err(|e| e.to_string())?;

    let message = format!(
        "Cart {} now has {} item(s) totalling {}.",
        cart_id, view.total_items, view.display_total
    );
    Ok(tool_result(message, json!(view)))
}

fn handle_update_quantity_tool(state: &AppState, args: Value) -> Result<Value, String> {
    let input: UpdateQuantityArgs = parse_args(args)?;
    let view = state
        .update_quantity(&input.cart_id, input.product_id, input.quantity)
        .map_err(|e| e.to_string())?;

    let message = format!("Cart {} now has {} item(s).", input.cart_id, view.total_items);
    Ok(tool_result(message, json!(view)))
}

fn handle_checkout_tool(state: &AppState, args: Value) -> Result<Value, String> {
    let input: CheckoutArgs = parse_args(args)?;
    let view = open_checkout(state, &input.cart_id).map_err(|e| e.to_string())?;

    let message = match &view.summary {
        Some(summary) => {
            let lines = summary
                .items
                .iter()
                .map(|line| format!("{} x {}: {}", line.item.product.name, line.item.quantity, line.display_line_total))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Order summary: {}. Total {}.", lines, summary.display_total)
        }
        None => "Cart is empty.".to_string(),
    };

    Ok(tool_result(message, json!(view)))
}

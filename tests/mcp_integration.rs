//! Integration tests for the MCP (Model Context Protocol) surface
//!
//! These tests verify the MCP protocol implementation including:
//! - Server initialization and handshake
//! - Tool discovery and listing
//! - Tool execution (list_products, add_to_cart, update_quantity, checkout)
//! - Error handling

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

use storefront::cart::AppState;
use storefront::checkout::CheckoutSettings;
use storefront::payment::SimulatedGateway;
use storefront::router::create_app_router;

/// Helper function to create a test app instance
fn create_test_app() -> axum::Router {
    let state = Arc::new(AppState::new(
        Arc::new(SimulatedGateway::approving()),
        CheckoutSettings::default(),
    ));
    create_app_router(state)
}

/// Helper function to send a JSON-RPC request and get the response
async fn send_jsonrpc_request(
    app: &axum::Router,
    method: &str,
    params: Option<Value>,
    id: i32,
) -> (StatusCode, Value) {
    let request_body = json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": id
    });

    let request = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&request_body).unwrap()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));

    (status, body)
}

async fn call_tool(app: &axum::Router, name: &str, arguments: Value, id: i32) -> Value {
    let params = json!({ "name": name, "arguments": arguments });
    let (status, body) = send_jsonrpc_request(app, "tools/call", Some(params), id).await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn test_mcp_sse_endpoint() {
    let app = create_test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/mcp")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(content_type, "text/event-stream");

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_str = String::from_utf8(body_bytes.to_vec()).unwrap();
    assert!(body_str.contains("event: endpoint"));
    assert!(body_str.contains("data: /mcp"));
}

#[tokio::test]
async fn test_mcp_initialize() {
    let app = create_test_app();

    let (status, body) = send_jsonrpc_request(&app, "initialize", None, 1).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["id"], 1);

    let result = &body["result"];
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "storefront");
    assert!(result["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn test_mcp_tools_list() {
    let app = create_test_app();

    let (status, body) = send_jsonrpc_request(&app, "tools/list", None, 2).await;
    assert_eq!(status, StatusCode::OK);

    let tools = body["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec!["list_products", "add_to_cart", "update_quantity", "checkout"]
    );
    assert!(tools[1]["inputSchema"]["properties"]["productId"].is_object());
}

#[tokio::test]
async fn test_mcp_list_products() {
    let app = create_test_app();

    let body = call_tool(&app, "list_products", json!({}), 3).await;
    let products = body["result"]["structuredContent"]["products"]
        .as_array()
        .unwrap();
    assert_eq!(products.len(), 8);
    assert_eq!(products[0]["name"], "Classic T-Shirt");
    assert!(body["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("#2 Denim Jeans (₹3999.00)"));
}

#[tokio::test]
async fn test_mcp_add_to_cart_aggregation() {
    let app = create_test_app();

    let first = call_tool(
        &app,
        "add_to_cart",
        json!({ "cartId": "agent-cart", "productId": 2, "quantity": 2 }),
        4,
    )
    .await;
    assert_eq!(first["result"]["structuredContent"]["cartId"], "agent-cart");

    let second = call_tool(
        &app,
        "add_to_cart",
        json!({ "cartId": "agent-cart", "productId": 2 }),
        5,
    )
    .await;

    let structured = &second["result"]["structuredContent"];
    let items = structured["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(structured["totalItems"], 3);
    assert_eq!(structured["displayTotal"], "₹11997.00");
}

#[tokio::test]
async fn test_mcp_add_to_cart_largest_quantity() {
    let app = create_test_app();

    let body = call_tool(
        &app,
        "add_to_cart",
        json!({ "cartId": "bulk", "productId": 1, "quantity": u32::MAX }),
        30,
    )
    .await;

    let structured = &body["result"]["structuredContent"];
    assert_eq!(structured["items"][0]["quantity"], u32::MAX);
    assert_eq!(structured["totalItems"], u64::from(u32::MAX));
}

#[tokio::test]
async fn test_mcp_add_to_cart_without_id_creates_cart() {
    let app = create_test_app();

    let body = call_tool(&app, "add_to_cart", json!({ "productId": 1 }), 6).await;
    let cart_id = body["result"]["structuredContent"]["cartId"].as_str().unwrap();
    assert!(!cart_id.is_empty());
    assert!(body["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("now has 1 item"));
}

#[tokio::test]
async fn test_mcp_update_quantity_to_zero_removes() {
    let app = create_test_app();

    call_tool(&app, "add_to_cart", json!({ "cartId": "u", "productId": 1 }), 7).await;
    call_tool(&app, "add_to_cart", json!({ "cartId": "u", "productId": 3 }), 8).await;

    let body = call_tool(
        &app,
        "update_quantity",
        json!({ "cartId": "u", "productId": 1, "quantity": 0 }),
        9,
    )
    .await;

    let items = body["result"]["structuredContent"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], 3);
}

#[tokio::test]
async fn test_mcp_checkout_opens_summary() {
    let app = create_test_app();

    call_tool(&app, "add_to_cart", json!({ "cartId": "co", "productId": 1 }), 10).await;
    call_tool(&app, "add_to_cart", json!({ "cartId": "co", "productId": 2, "quantity": 2 }), 11).await;

    let body = call_tool(&app, "checkout", json!({ "cartId": "co" }), 12).await;
    let result = &body["result"];
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("Total ₹9497.00"));

    let structured = &result["structuredContent"];
    assert_eq!(structured["cart"]["checkout"], "summary");
    assert_eq!(structured["summary"]["amount"], 949_700);
    assert_eq!(structured["orderComplete"], false);
}

#[tokio::test]
async fn test_mcp_checkout_unknown_cart() {
    let app = create_test_app();

    let body = call_tool(&app, "checkout", json!({ "cartId": "nope" }), 13).await;
    assert_eq!(body["error"]["code"], -32602);
    assert_eq!(body["error"]["message"], "Not Found");
}

#[tokio::test]
async fn test_mcp_unknown_method() {
    let app = create_test_app();

    let (status, body) = send_jsonrpc_request(&app, "unknown/method", None, 14).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 14);
    assert_eq!(body["error"]["code"], -32601);
    assert_eq!(body["error"]["message"], "Method not found");
}

#[tokio::test]
async fn test_mcp_invalid_json() {
    let app = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from("invalid json {{{"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["error"]["code"], -32700);
    assert_eq!(body["error"]["message"], "Parse error");
}

#[tokio::test]
async fn test_mcp_tool_call_unknown_tool() {
    let app = create_test_app();

    let body = call_tool(&app, "unknown_tool", json!({}), 15).await;
    assert_eq!(body["error"]["code"], -32602);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Unknown tool"));
}

#[tokio::test]
async fn test_mcp_tool_call_invalid_arguments() {
    let app = create_test_app();

    let body = call_tool(&app, "add_to_cart", json!({ "invalid_field": "value" }), 16).await;
    assert_eq!(body["error"]["code"], -32602);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Invalid arguments"));
}

#[tokio::test]
async fn test_mcp_ping() {
    let app = create_test_app();

    let (status, body) = send_jsonrpc_request(&app, "ping", None, 17).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], json!({}));
}

#[tokio::test]
async fn test_mcp_invalid_method_type() {
    let app = create_test_app();

    let request_body = json!({
        "jsonrpc": "2.0",
        "method": 123,
        "id": 1
    });

    let request = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&request_body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

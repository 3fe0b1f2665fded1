//! REST API handlers for shopping cart operations
//!
//! This module implements HTTP endpoints for browsing the catalog and
//! editing a cart.

use super::{helpers::*, models::*, state::SharedState};
use crate::catalog::Product;
use crate::error::AppResult;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};

/// Creates routes for catalog and cart operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/cart/add", post(add_to_cart))
        .route("/cart/remove", post(remove_from_cart))
        .route("/cart/update", post(update_quantity))
        .route("/cart/:cart_id", get(get_cart))
}

/// Endpoint: GET /products
async fn list_products(State(state): State<SharedState>) -> Json<Vec<Product>> {
    Json(state.catalog.products().to_vec())
}

/// Endpoint: GET /cart/:cart_id
async fn get_cart(
    State(state): State<SharedState>,
    Path(cart_id): Path<String>,
) -> AppResult<Json<CartView>> {
    state.cart(&cart_id).map(Json)
}

/// Endpoint: POST /cart/add
/// Adds one unit of a product, starting a new cart when no id is given.
async fn add_to_cart(
    State(state): State<SharedState>,
    payload: Result<Json<AddToCartInput>, JsonRejection>,
) -> AppResult<Json<CartView>> {
    let Json(payload) = payload?;
    let cart_id = get_or_create_cart_id(payload.cart_id);
    state.add_to_cart(&cart_id, payload.product_id).map(Json)
}

/// Endpoint: POST /cart/remove
async fn remove_from_cart(
    State(state): State<SharedState>,
    payload: Result<Json<RemoveFromCartInput>, JsonRejection>,
) -> AppResult<Json<CartView>> {
    let Json(payload) = payload?;
    state
        .remove_from_cart(&payload.cart_id, payload.product_id)
        .map(Json)
}

/// Endpoint: POST /cart/update
/// Sets an absolute quantity; anything below 1 removes the item.
async fn update_quantity(
    State(state): State<SharedState>,
    payload: Result<Json<UpdateQuantityInput>, JsonRejection>,
) -> AppResult<Json<CartView>> {
    let Json(payload) = payload?;
    state
        .update_quantity(&payload.cart_id, payload.product_id, payload.quantity)
        .map(Json)
}

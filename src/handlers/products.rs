use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use serde_json::json;

use super::common::{created_response, success_response, validate_input};
use crate::{
    errors::ApiError,
    services::products::{NewProduct, ProductUpdate},
    AppState,
};

/// List all products, newest first
async fn list_products(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let products = state.services.products.list_products().await?;
    Ok(success_response(products))
}

/// Create a new product with zero opening stock
async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewProduct>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let product = state.services.products.create_product(payload).await?;

    Ok(created_response(product))
}

/// Replace a product's sku/name/unit_price
async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<i32>,
    Json(payload): Json<ProductUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let updated = state
        .services
        .products
        .update_product(product_id, payload)
        .await?;

    if updated == 0 {
        return Err(ApiError::NotFound(format!(
            "Product with ID {} not found",
            product_id
        )));
    }

    Ok(success_response(json!({ "updated": updated })))
}

/// Delete a product; its ledger entries go with it
async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.services.products.delete_product(product_id).await?;

    if deleted == 0 {
        return Err(ApiError::NotFound(format!(
            "Product with ID {} not found",
            product_id
        )));
    }

    Ok(success_response(json!({ "deleted": deleted })))
}

/// Creates the router for product endpoints
pub fn product_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", put(update_product).delete(delete_product))
}

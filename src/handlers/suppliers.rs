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
    services::suppliers::{NewSupplier, SupplierUpdate},
    AppState,
};

/// List all suppliers, newest first
async fn list_suppliers(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let suppliers = state.services.suppliers.list_suppliers().await?;
    Ok(success_response(suppliers))
}

/// Create a new supplier
async fn create_supplier(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewSupplier>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let supplier = state.services.suppliers.create_supplier(payload).await?;

    Ok(created_response(supplier))
}

/// Replace a supplier's name/email/phone
async fn update_supplier(
    State(state): State<Arc<AppState>>,
    Path(supplier_id): Path<i32>,
    Json(payload): Json<SupplierUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let updated = state
        .services
        .suppliers
        .update_supplier(supplier_id, payload)
        .await?;

    if updated == 0 {
        return Err(ApiError::NotFound(format!(
            "Supplier with ID {} not found",
            supplier_id
        )));
    }

    Ok(success_response(json!({ "updated": updated })))
}

/// Delete a supplier
async fn delete_supplier(
    State(state): State<Arc<AppState>>,
    Path(supplier_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.services.suppliers.delete_supplier(supplier_id).await?;

    if deleted == 0 {
        return Err(ApiError::NotFound(format!(
            "Supplier with ID {} not found",
            supplier_id
        )));
    }

    Ok(success_response(json!({ "deleted": deleted })))
}

/// Creates the router for supplier endpoints
pub fn supplier_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route("/:id", put(update_supplier).delete(delete_supplier))
}

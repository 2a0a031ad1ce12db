use std::sync::Arc;

use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::get,
    Router,
};

use super::common::{created_response, success_response};
use crate::{errors::ApiError, services::stock_moves::NewStockMove, AppState};

/// List all ledger entries, newest first
async fn list_moves(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let moves = state.services.stock_moves.list_moves().await?;
    Ok(success_response(moves))
}

/// Apply one stock movement through the engine. Rejections come back as
/// coded 4xx responses; only genuine storage failures surface as 500.
async fn create_move(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewStockMove>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state.services.stock_moves.apply_move(payload).await?;

    Ok(created_response(entry))
}

/// Creates the router for stock move endpoints
pub fn stock_move_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_moves).post(create_move))
}

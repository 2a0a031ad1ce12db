//! stocktrack-api library
//!
//! Inventory management over HTTP/JSON: product and supplier registries
//! plus an append-only stock-move ledger. The one piece of real logic is
//! the stock-move engine in [`services::stock_moves`], which validates and
//! applies each movement against an exclusively locked product row.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod services;

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

/// Assemble the /api router: registries plus the stock-move ledger.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/products", handlers::products::product_routes())
        .nest("/suppliers", handlers::suppliers::supplier_routes())
        .nest("/stock_moves", handlers::stock_moves::stock_move_routes())
}

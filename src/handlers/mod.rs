pub mod common;
pub mod health;
pub mod products;
pub mod stock_moves;
pub mod suppliers;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::services::{
    products::ProductService, stock_moves::StockMoveService, suppliers::SupplierService,
};

/// Aggregated services used by the HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub products: ProductService,
    pub suppliers: SupplierService,
    pub stock_moves: StockMoveService,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            products: ProductService::new(db.clone()),
            suppliers: SupplierService::new(db.clone()),
            stock_moves: StockMoveService::new(db),
        }
    }
}

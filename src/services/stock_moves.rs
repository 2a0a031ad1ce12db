//! The stock-move engine: validates and applies a single movement against
//! a locked product row, producing a ledger entry or a typed rejection.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, QuerySelect, Set,
    TransactionError, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::entities::product::{self, Entity as Product};
use crate::entities::stock_move::{self, Entity as StockMove};
use crate::errors::ServiceError;

pub const MOVE_IN: &str = "IN";
pub const MOVE_OUT: &str = "OUT";

/// Input for one movement. `move_type` stays a raw string until the engine
/// has confirmed the product exists, so the rejection ordering is
/// existence -> type -> quantity -> sufficiency.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStockMove {
    pub product_id: i32,
    pub quantity: i32,
    pub move_type: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// Why a move was not applied. These are expected outcomes, not faults:
/// the engine reports them without touching the store, and callers must
/// not retry until external state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    ProductNotFound,
    InvalidMoveType,
    InvalidQuantity,
    InsufficientStock,
}

impl RejectionReason {
    /// Stable machine-readable code crossing the API boundary.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::InvalidMoveType => "INVALID_MOVE_TYPE",
            Self::InvalidQuantity => "INVALID_QUANTITY",
            Self::InsufficientStock => "INSUFFICIENT_STOCK",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::ProductNotFound => "Product not found",
            Self::InvalidMoveType => "Invalid move_type (must be IN or OUT)",
            Self::InvalidQuantity => "Quantity must be > 0",
            Self::InsufficientStock => "Insufficient stock for OUT move",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StockMoveError {
    #[error("move rejected: {0}")]
    Rejected(RejectionReason),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

#[derive(Clone)]
pub struct StockMoveService {
    db: Arc<DatabaseConnection>,
}

impl StockMoveService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All ledger entries, newest first.
    pub async fn list_moves(&self) -> Result<Vec<stock_move::Model>, ServiceError> {
        StockMove::find()
            .order_by_desc(stock_move::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::from_db)
    }

    /// Validate and apply one movement as a single transaction.
    ///
    /// The product row is locked exclusively for the duration, so movers on
    /// the same product serialize while movers on other products proceed.
    /// The lock acquisition and the stock read are one statement; nothing is
    /// read from a cache. Success mutates exactly one product row and
    /// inserts exactly one ledger row; any rejection or storage failure
    /// rolls the transaction back with zero mutations.
    pub async fn apply_move(&self, req: NewStockMove) -> Result<stock_move::Model, StockMoveError> {
        let result = self
            .db
            .transaction::<_, stock_move::Model, StockMoveError>(move |txn| {
                Box::pin(async move {
                    // Locking and reading the authoritative stock value is a
                    // single SELECT ... FOR UPDATE; a re-read after a separate
                    // lock would leave a window for lost updates.
                    let current = Product::find_by_id(req.product_id)
                        .lock_exclusive()
                        .one(txn)
                        .await?
                        .ok_or(StockMoveError::Rejected(RejectionReason::ProductNotFound))?;

                    if req.move_type != MOVE_IN && req.move_type != MOVE_OUT {
                        return Err(StockMoveError::Rejected(RejectionReason::InvalidMoveType));
                    }

                    if req.quantity <= 0 {
                        return Err(StockMoveError::Rejected(RejectionReason::InvalidQuantity));
                    }

                    let new_stock = if req.move_type == MOVE_OUT {
                        if current.stock < req.quantity {
                            return Err(StockMoveError::Rejected(
                                RejectionReason::InsufficientStock,
                            ));
                        }
                        current.stock - req.quantity
                    } else {
                        current.stock + req.quantity
                    };

                    let mut updated: product::ActiveModel = current.into();
                    updated.stock = Set(new_stock);
                    updated.update(txn).await?;

                    let entry = stock_move::ActiveModel {
                        product_id: Set(req.product_id),
                        quantity: Set(req.quantity),
                        move_type: Set(req.move_type),
                        note: Set(req.note),
                        created_at: Set(Utc::now().naive_utc()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    Ok(entry)
                })
            })
            .await;

        match result {
            Ok(entry) => {
                info!(
                    move_id = entry.id,
                    product_id = entry.product_id,
                    move_type = %entry.move_type,
                    quantity = entry.quantity,
                    "stock move applied"
                );
                Ok(entry)
            }
            Err(TransactionError::Connection(err)) => Err(StockMoveError::Database(err)),
            Err(TransactionError::Transaction(err)) => {
                if let StockMoveError::Rejected(reason) = &err {
                    warn!(code = reason.code(), "stock move rejected");
                }
                Err(err)
            }
        }
    }
}

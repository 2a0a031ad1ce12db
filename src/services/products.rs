use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::entities::product::{self, Entity as Product};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub unit_price: Decimal,
}

/// Full field replace for PUT; `stock` and `created_at` are untouchable
/// through this path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductUpdate {
    pub sku: String,
    pub name: String,
    pub unit_price: Decimal,
}

#[derive(Clone)]
pub struct ProductService {
    db: Arc<DatabaseConnection>,
}

impl ProductService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All products, newest first.
    pub async fn list_products(&self) -> Result<Vec<product::Model>, ServiceError> {
        Product::find()
            .order_by_desc(product::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::from_db)
    }

    /// Insert a product with zero opening stock. A duplicate sku surfaces
    /// as a conflict from the unique index.
    pub async fn create_product(&self, req: NewProduct) -> Result<product::Model, ServiceError> {
        let created = product::ActiveModel {
            sku: Set(req.sku),
            name: Set(req.name),
            unit_price: Set(req.unit_price),
            stock: Set(0),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(ServiceError::from_db)?;

        info!(product_id = created.id, sku = %created.sku, "product created");
        Ok(created)
    }

    /// Replace sku/name/unit_price. Returns rows affected; zero means the
    /// id is unknown.
    pub async fn update_product(&self, id: i32, req: ProductUpdate) -> Result<u64, ServiceError> {
        let result = Product::update_many()
            .set(product::ActiveModel {
                sku: Set(req.sku),
                name: Set(req.name),
                unit_price: Set(req.unit_price),
                ..Default::default()
            })
            .filter(product::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(ServiceError::from_db)?;

        Ok(result.rows_affected)
    }

    /// Delete by id. The stock_moves foreign key cascades, so the ledger
    /// never holds rows for a product that no longer exists.
    pub async fn delete_product(&self, id: i32) -> Result<u64, ServiceError> {
        let result = Product::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(ServiceError::from_db)?;

        if result.rows_affected > 0 {
            info!(product_id = id, "product deleted");
        }
        Ok(result.rows_affected)
    }
}

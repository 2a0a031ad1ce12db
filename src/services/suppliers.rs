use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::entities::supplier::{self, Entity as Supplier};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewSupplier {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SupplierUpdate {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Clone)]
pub struct SupplierService {
    db: Arc<DatabaseConnection>,
}

impl SupplierService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All suppliers, newest first.
    pub async fn list_suppliers(&self) -> Result<Vec<supplier::Model>, ServiceError> {
        Supplier::find()
            .order_by_desc(supplier::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::from_db)
    }

    pub async fn create_supplier(&self, req: NewSupplier) -> Result<supplier::Model, ServiceError> {
        let created = supplier::ActiveModel {
            name: Set(req.name),
            email: Set(req.email),
            phone: Set(req.phone),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(ServiceError::from_db)?;

        info!(supplier_id = created.id, "supplier created");
        Ok(created)
    }

    /// Replace name/email/phone. Returns rows affected; zero means the id
    /// is unknown.
    pub async fn update_supplier(&self, id: i32, req: SupplierUpdate) -> Result<u64, ServiceError> {
        let result = Supplier::update_many()
            .set(supplier::ActiveModel {
                name: Set(req.name),
                email: Set(req.email),
                phone: Set(req.phone),
                ..Default::default()
            })
            .filter(supplier::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(ServiceError::from_db)?;

        Ok(result.rows_affected)
    }

    pub async fn delete_supplier(&self, id: i32) -> Result<u64, ServiceError> {
        let result = Supplier::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(ServiceError::from_db)?;

        if result.rows_affected > 0 {
            info!(supplier_id = id, "supplier deleted");
        }
        Ok(result.rows_affected)
    }
}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A stocked product. `stock` is owned by the stock-move engine and must
/// never be written outside its transaction; the registry only touches
/// sku/name/unit_price.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub sku: String,
    pub name: String,
    pub unit_price: Decimal,
    pub stock: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stock_move::Entity")]
    StockMove,
}

impl Related<super::stock_move::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockMove.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

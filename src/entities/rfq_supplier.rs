use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Link between a Request for Quotation and a supplier invited to quote on it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rfq_suppliers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub rfq: String,
    pub supplier: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

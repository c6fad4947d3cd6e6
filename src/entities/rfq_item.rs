use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One line of a Request for Quotation. `rfq` names the parent document.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rfq_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub rfq: String,
    pub item_code: String,
    pub item_name: String,
    pub uom: String,
    pub qty: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

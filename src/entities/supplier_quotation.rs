use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::DocStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "supplier_quotations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub supplier: String,
    pub currency: Option<String>,
    pub docstatus: DocStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::supplier_quotation_item::Entity")]
    SupplierQuotationItems,
}

impl Related<super::supplier_quotation_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupplierQuotationItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "supplier_quotation_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub parent: String,
    pub item_code: String,
    pub item_name: String,
    pub uom: String,
    pub qty: f64,
    pub rate: Option<f64>,
    /// Set once a Purchase Order has been raised from this line; never cleared.
    pub custom_po_created: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::supplier_quotation::Entity",
        from = "Column::Parent",
        to = "super::supplier_quotation::Column::Name"
    )]
    SupplierQuotation,
}

impl Related<super::supplier_quotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupplierQuotation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub mod purchase_order;
pub mod purchase_order_item;
pub mod rfq_item;
pub mod rfq_supplier;
pub mod supplier_quotation;
pub mod supplier_quotation_item;

/// Document lifecycle flag shared by quotations and Purchase Orders.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum DocStatus {
    #[sea_orm(num_value = 0)]
    Draft,
    #[sea_orm(num_value = 1)]
    Submitted,
    #[sea_orm(num_value = 2)]
    Cancelled,
}

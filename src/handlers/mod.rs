pub mod common;
pub mod supplier_quotations;

pub use crate::AppState;

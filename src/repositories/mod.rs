use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::dto::procurement::{NewPurchaseOrder, PurchaseOrderLine, QuoteLine, RfqItem};
use crate::errors::ServiceError;

pub mod procurement_store;

pub use procurement_store::SeaOrmProcurementStore;

/// Repository trait for common database operations
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Record-store operations the comparison report and the procurement service rely on.
///
/// Implementations own isolation and commit behaviour; callers issue plain reads and
/// writes and take no locks of their own.
#[async_trait]
pub trait ProcurementStore: Send + Sync {
    /// Distinct (item_code, item_name, uom) lines of an RFQ, in RFQ order.
    async fn rfq_items(&self, rfq: &str) -> Result<Vec<RfqItem>, ServiceError>;

    /// Suppliers linked to an RFQ.
    async fn rfq_suppliers(&self, rfq: &str) -> Result<Vec<String>, ServiceError>;

    /// Lines of submitted quotations from `suppliers` whose item appears on the RFQ.
    async fn supplier_quote_lines(
        &self,
        suppliers: &[String],
        rfq: &str,
    ) -> Result<Vec<QuoteLine>, ServiceError>;

    /// Identifiers of the submitted Purchase Orders for a supplier.
    async fn submitted_purchase_orders(&self, supplier: &str) -> Result<Vec<String>, ServiceError>;

    async fn purchase_order_lines(
        &self,
        purchase_order: &str,
    ) -> Result<Vec<PurchaseOrderLine>, ServiceError>;

    /// Persists a Purchase Order with all its lines and returns its identifier.
    async fn insert_purchase_order(&self, order: NewPurchaseOrder) -> Result<String, ServiceError>;

    /// Flags a quotation line as used in a Purchase Order and commits.
    async fn set_po_created(&self, quotation_item: &str) -> Result<(), ServiceError>;
}

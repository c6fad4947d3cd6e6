use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionError, TransactionTrait,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::dto::procurement::{NewPurchaseOrder, PurchaseOrderLine, QuoteLine, RfqItem};
use crate::entities::{
    purchase_order, purchase_order_item, rfq_item, rfq_supplier, supplier_quotation,
    supplier_quotation_item, DocStatus,
};
use crate::errors::ServiceError;
use crate::repositories::{BaseRepository, ProcurementStore, Repository};

/// `ProcurementStore` backed by the sea-orm entities.
#[derive(Debug, Clone)]
pub struct SeaOrmProcurementStore {
    base: BaseRepository,
}

impl SeaOrmProcurementStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn generate_po_name() -> String {
        format!("PO-{}", Uuid::new_v4().simple())
    }
}

#[async_trait]
impl ProcurementStore for SeaOrmProcurementStore {
    #[instrument(skip(self))]
    async fn rfq_items(&self, rfq: &str) -> Result<Vec<RfqItem>, ServiceError> {
        let rows = rfq_item::Entity::find()
            .filter(rfq_item::Column::Rfq.eq(rfq))
            .order_by_asc(rfq_item::Column::Id)
            .all(self.base.get_db())
            .await?;

        // The requested qty for an item_code is the one on its first RFQ line.
        let mut first_qty: HashMap<&str, f64> = HashMap::new();
        for row in &rows {
            first_qty.entry(row.item_code.as_str()).or_insert(row.qty);
        }

        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for row in &rows {
            if seen.insert((
                row.item_code.as_str(),
                row.item_name.as_str(),
                row.uom.as_str(),
            )) {
                items.push(RfqItem {
                    item_code: row.item_code.clone(),
                    item_name: row.item_name.clone(),
                    uom: row.uom.clone(),
                    qty: first_qty.get(row.item_code.as_str()).copied().unwrap_or(0.0),
                });
            }
        }

        debug!(rfq, count = items.len(), "Fetched RFQ items");
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn rfq_suppliers(&self, rfq: &str) -> Result<Vec<String>, ServiceError> {
        let links = rfq_supplier::Entity::find()
            .filter(rfq_supplier::Column::Rfq.eq(rfq))
            .order_by_asc(rfq_supplier::Column::Id)
            .all(self.base.get_db())
            .await?;

        Ok(links.into_iter().map(|link| link.supplier).collect())
    }

    #[instrument(skip(self, suppliers), fields(suppliers = suppliers.len()))]
    async fn supplier_quote_lines(
        &self,
        suppliers: &[String],
        rfq: &str,
    ) -> Result<Vec<QuoteLine>, ServiceError> {
        if suppliers.is_empty() {
            return Ok(Vec::new());
        }

        let rfq_item_codes = Query::select()
            .column(rfq_item::Column::ItemCode)
            .from(rfq_item::Entity)
            .and_where(rfq_item::Column::Rfq.eq(rfq))
            .to_owned();

        let rows = supplier_quotation_item::Entity::find()
            .find_also_related(supplier_quotation::Entity)
            .filter(supplier_quotation::Column::Docstatus.eq(DocStatus::Submitted))
            .filter(supplier_quotation::Column::Supplier.is_in(suppliers.iter().map(String::as_str)))
            .filter(supplier_quotation_item::Column::ItemCode.in_subquery(rfq_item_codes))
            .order_by_asc(supplier_quotation_item::Column::Parent)
            .order_by_asc(supplier_quotation_item::Column::Name)
            .all(self.base.get_db())
            .await?;

        let lines = rows
            .into_iter()
            .filter_map(|(item, quotation)| {
                quotation.map(|quotation| QuoteLine {
                    name: item.name,
                    quotation: quotation.name,
                    supplier: quotation.supplier,
                    item_code: item.item_code,
                    item_name: item.item_name,
                    uom: item.uom,
                    qty: item.qty,
                    rate: item.rate,
                    currency: quotation.currency,
                    custom_po_created: item.custom_po_created,
                })
            })
            .collect::<Vec<_>>();

        debug!(rfq, count = lines.len(), "Fetched supplier quotation lines");
        Ok(lines)
    }

    #[instrument(skip(self))]
    async fn submitted_purchase_orders(&self, supplier: &str) -> Result<Vec<String>, ServiceError> {
        let orders = purchase_order::Entity::find()
            .filter(purchase_order::Column::Supplier.eq(supplier))
            .filter(purchase_order::Column::Docstatus.eq(DocStatus::Submitted))
            .order_by_asc(purchase_order::Column::CreatedAt)
            .all(self.base.get_db())
            .await?;

        Ok(orders.into_iter().map(|po| po.name).collect())
    }

    #[instrument(skip(self))]
    async fn purchase_order_lines(
        &self,
        purchase_order: &str,
    ) -> Result<Vec<PurchaseOrderLine>, ServiceError> {
        let lines = purchase_order_item::Entity::find()
            .filter(purchase_order_item::Column::Parent.eq(purchase_order))
            .all(self.base.get_db())
            .await?;

        Ok(lines
            .into_iter()
            .map(|line| PurchaseOrderLine {
                item_code: line.item_code,
                qty: line.qty,
                rate: line.rate,
            })
            .collect())
    }

    #[instrument(skip(self, order), fields(supplier = %order.supplier, lines = order.items.len()))]
    async fn insert_purchase_order(&self, order: NewPurchaseOrder) -> Result<String, ServiceError> {
        let po_name = Self::generate_po_name();
        let name = po_name.clone();

        self.base
            .get_db()
            .transaction::<_, (), ServiceError>(move |txn| {
                Box::pin(async move {
                    let header = purchase_order::ActiveModel {
                        name: Set(name.clone()),
                        supplier: Set(order.supplier.clone()),
                        company: Set(order.company.clone()),
                        currency: Set(order.currency.clone()),
                        transaction_date: Set(order.transaction_date),
                        schedule_date: Set(order.schedule_date),
                        docstatus: Set(DocStatus::Draft),
                        created_at: Set(Utc::now()),
                    };

                    header.insert(txn).await.map_err(|e| {
                        error!(
                            "Failed to create purchase order {} for supplier {}: {}",
                            name, order.supplier, e
                        );
                        ServiceError::DatabaseError(e)
                    })?;

                    for item in &order.items {
                        let line = purchase_order_item::ActiveModel {
                            parent: Set(name.clone()),
                            item_code: Set(item.item_code.clone()),
                            item_name: Set(item.item_name.clone()),
                            uom: Set(item.uom.clone()),
                            qty: Set(item.qty),
                            rate: Set(item.rate),
                            schedule_date: Set(item.schedule_date),
                            uom_conversion_factor: Set(item.uom_conversion_factor),
                            ..Default::default()
                        };
                        line.insert(txn).await?;
                    }

                    Ok(())
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => ServiceError::DatabaseError(e),
                TransactionError::Transaction(e) => e,
            })?;

        Ok(po_name)
    }

    #[instrument(skip(self))]
    async fn set_po_created(&self, quotation_item: &str) -> Result<(), ServiceError> {
        let result = supplier_quotation_item::Entity::update_many()
            .col_expr(
                supplier_quotation_item::Column::CustomPoCreated,
                Expr::value(true),
            )
            .filter(supplier_quotation_item::Column::Name.eq(quotation_item))
            .exec(self.base.get_db())
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Supplier Quotation Item {}",
                quotation_item
            )));
        }

        Ok(())
    }
}

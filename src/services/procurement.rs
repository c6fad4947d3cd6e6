use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::config::ProcurementDefaults;
use crate::dto::procurement::{
    canonicalize, AsCanonicalLine, JsonOrList, NewPurchaseOrder, NewPurchaseOrderLine, Selection,
};
use crate::errors::{BatchFailure, FailureReason, ServiceError, SupplierFailure};
use crate::repositories::ProcurementStore;

/// Log target for PO creation diagnostics.
const LOG_TARGET: &str = "rfq_comparison_report";

/// Result of a batch in which every supplier group produced a Purchase Order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseOrderBatch {
    pub purchase_orders: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkItemsResult {
    pub success: bool,
    pub message: String,
    pub count: usize,
}

/// Service turning quotation selections into Purchase Orders
#[derive(Clone)]
pub struct ProcurementService {
    store: Arc<dyn ProcurementStore>,
    defaults: ProcurementDefaults,
}

impl ProcurementService {
    /// Creates a new procurement service instance
    pub fn new(store: Arc<dyn ProcurementStore>, defaults: ProcurementDefaults) -> Self {
        Self { store, defaults }
    }

    /// Returns the first submitted Purchase Order of `supplier` whose item set is exactly
    /// `items`, compared as sorted (item_code, qty, rate) triples.
    ///
    /// Values are compared without tolerance.
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn find_duplicate_purchase_order<T>(
        &self,
        supplier: &str,
        items: &[T],
    ) -> Result<Option<String>, ServiceError>
    where
        T: AsCanonicalLine + Sync,
    {
        let candidate = canonicalize(items);

        for purchase_order in self.store.submitted_purchase_orders(supplier).await? {
            let existing = self.store.purchase_order_lines(&purchase_order).await?;
            if canonicalize(&existing) == candidate {
                return Ok(Some(purchase_order));
            }
        }

        Ok(None)
    }

    /// Creates one Purchase Order per supplier among `selections`.
    ///
    /// A supplier whose item set matches a submitted PO is skipped; a supplier whose PO
    /// cannot be persisted is reported. Neither stops the remaining suppliers, and POs
    /// already created stay. Any skip or failure turns the whole call into
    /// `ServiceError::PurchaseOrderBatch`, which still lists the created POs.
    #[instrument(skip(self, selections), fields(selections = selections.len()))]
    pub async fn create_purchase_orders(
        &self,
        selections: Vec<Selection>,
    ) -> Result<PurchaseOrderBatch, ServiceError> {
        if selections.is_empty() {
            return Err(ServiceError::InvalidInput(
                "No items selected for Purchase Order creation.".to_string(),
            ));
        }
        for selection in &selections {
            validator::Validate::validate(selection)?;
        }

        let groups = group_by_supplier(selections);

        let company = self.defaults.company.clone().ok_or_else(|| {
            ServiceError::ConfigurationError(
                "Default Company not found. Please set it up in User Defaults.".to_string(),
            )
        })?;

        let today = Utc::now().date_naive();
        let mut created = Vec::new();
        let mut failures = Vec::new();

        for (supplier, items) in groups {
            match self.create_for_supplier(&supplier, &items, &company, today).await {
                Ok(name) => {
                    info!(supplier = %supplier, purchase_order = %name, "Purchase Order created");
                    created.push(name);
                }
                Err(reason) => failures.push(SupplierFailure { supplier, reason }),
            }
        }

        if !failures.is_empty() {
            warn!(
                created = created.len(),
                failed = failures.len(),
                "Purchase Order batch finished with failures"
            );
            return Err(ServiceError::PurchaseOrderBatch(BatchFailure {
                created,
                failures,
            }));
        }

        Ok(PurchaseOrderBatch {
            purchase_orders: created,
            message: "Purchase Orders created successfully.".to_string(),
        })
    }

    async fn create_for_supplier(
        &self,
        supplier: &str,
        items: &[Selection],
        company: &str,
        today: NaiveDate,
    ) -> Result<String, FailureReason> {
        match self.find_duplicate_purchase_order(supplier, items).await {
            Ok(Some(existing)) => {
                warn!(supplier, existing = %existing, "Skipping duplicate Purchase Order");
                return Err(FailureReason::Duplicate { existing });
            }
            Ok(None) => {}
            Err(e) => {
                error!(target: LOG_TARGET, supplier, error = ?e, "Duplicate check failed for supplier {}: {}", supplier, e);
                return Err(FailureReason::Persistence {
                    reason: e.to_string(),
                });
            }
        }

        let currency = items
            .first()
            .and_then(|first| first.currency.clone())
            .filter(|c| !c.trim().is_empty())
            .or_else(|| self.defaults.currency.clone())
            .ok_or(FailureReason::MissingCurrency)?;

        let order = NewPurchaseOrder {
            supplier: supplier.to_string(),
            company: company.to_string(),
            currency,
            transaction_date: today,
            schedule_date: today,
            items: items
                .iter()
                .map(|item| NewPurchaseOrderLine {
                    item_code: item.item_code.clone(),
                    item_name: item.item_name.clone(),
                    uom: item.uom.clone(),
                    qty: item.qty,
                    rate: item.rate,
                    schedule_date: today,
                    uom_conversion_factor: 1.0,
                })
                .collect(),
        };

        self.store.insert_purchase_order(order).await.map_err(|e| {
            error!(target: LOG_TARGET, supplier, error = ?e, "Error creating PO for supplier {}: {}", supplier, e);
            FailureReason::Persistence {
                reason: e.to_string(),
            }
        })
    }

    /// Remote-callable form of [`Self::create_purchase_orders`]; accepts the selections
    /// as a JSON-encoded string or as a list. Any element that is not a well-formed
    /// selection rejects the whole call.
    pub async fn create_purchase_orders_from_rfq(
        &self,
        selections: JsonOrList,
    ) -> Result<PurchaseOrderBatch, ServiceError> {
        let selections = selections.into_vec::<Selection>().map_err(|e| {
            warn!("Rejected selections payload: {}", e);
            ServiceError::InvalidInput("Invalid selections data received.".to_string())
        })?;
        self.create_purchase_orders(selections).await
    }

    /// Flags each quotation line as used in a Purchase Order. Re-marking a line is a
    /// no-op; an unknown line aborts with the lines before it already committed.
    #[instrument(skip(self, item_ids), fields(items = item_ids.len()))]
    pub async fn mark_used(&self, item_ids: &[String]) -> Result<usize, ServiceError> {
        for name in item_ids {
            self.store.set_po_created(name).await.map_err(|e| {
                error!("Error in mark_items_po_created for {}: {}", name, e);
                e
            })?;
        }
        Ok(item_ids.len())
    }

    /// Remote-callable form of [`Self::mark_used`].
    pub async fn mark_items_po_created(
        &self,
        item_names: JsonOrList,
    ) -> Result<MarkItemsResult, ServiceError> {
        let item_names = item_names.into_vec::<String>()?;
        let count = self.mark_used(&item_names).await?;

        Ok(MarkItemsResult {
            success: true,
            message: format!("Marked {} items as PO created", count),
            count,
        })
    }
}

/// Groups selections by supplier, keeping suppliers in first-appearance order.
fn group_by_supplier(selections: Vec<Selection>) -> Vec<(String, Vec<Selection>)> {
    let mut groups: Vec<(String, Vec<Selection>)> = Vec::new();
    for selection in selections {
        match groups
            .iter()
            .position(|(supplier, _)| *supplier == selection.supplier)
        {
            Some(idx) => groups[idx].1.push(selection),
            None => groups.push((selection.supplier.clone(), vec![selection])),
        }
    }
    groups
}

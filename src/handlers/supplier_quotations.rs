use super::common::{created_response, success_response};
use crate::{
    dto::procurement::JsonOrList,
    errors::ServiceError,
    handlers::AppState,
    reports::ReportFilters,
};
use axum::{
    extract::{Json, Query, State},
    response::Response,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::info;

// Request DTOs

#[derive(Debug, Deserialize)]
pub struct CreatePurchaseOrdersRequest {
    /// JSON-encoded string or array of selections
    pub selections: JsonOrList,
}

#[derive(Debug, Deserialize)]
pub struct MarkItemsRequest {
    /// JSON-encoded string or array of Supplier Quotation Item identifiers
    pub item_names: JsonOrList,
}

// Handler functions

/// Supplier quotation comparison for one RFQ
pub async fn supplier_quotation_comparison(
    State(state): State<AppState>,
    Query(filters): Query<ReportFilters>,
) -> Result<Response, ServiceError> {
    let output = state.report.execute(&filters).await?;
    Ok(success_response(output))
}

/// Create Purchase Orders from selected quotation lines
pub async fn create_purchase_orders_from_rfq(
    State(state): State<AppState>,
    Json(payload): Json<CreatePurchaseOrdersRequest>,
) -> Result<Response, ServiceError> {
    let batch = state
        .procurement
        .create_purchase_orders_from_rfq(payload.selections)
        .await?;

    info!(
        purchase_orders = ?batch.purchase_orders,
        "Purchase Orders created from RFQ selections"
    );
    Ok(created_response(batch))
}

/// Flag quotation lines as used in a Purchase Order
pub async fn mark_items_po_created(
    State(state): State<AppState>,
    Json(payload): Json<MarkItemsRequest>,
) -> Result<Response, ServiceError> {
    let result = state
        .procurement
        .mark_items_po_created(payload.item_names)
        .await?;
    Ok(success_response(result))
}

/// Routes mounted under `/api/v1`
pub fn supplier_quotation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reports/supplier-quotation-comparison",
            get(supplier_quotation_comparison),
        )
        .route(
            "/supplier-quotations/purchase-orders",
            post(create_purchase_orders_from_rfq),
        )
        .route(
            "/supplier-quotations/items/mark-po-created",
            post(mark_items_po_created),
        )
}

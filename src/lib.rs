//! Supplier quotation comparison for Requests for Quotation.
//!
//! Builds a side-by-side grid of submitted supplier quotations against an RFQ and
//! turns selected quotation lines into Purchase Orders, refusing to repeat an order
//! a supplier already has.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod reports;
pub mod repositories;
pub mod services;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::reports::SupplierQuotationComparisonReport;
use crate::repositories::ProcurementStore;
use crate::services::procurement::ProcurementService;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub report: Arc<SupplierQuotationComparisonReport>,
    pub procurement: Arc<ProcurementService>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProcurementStore>, config: AppConfig) -> Self {
        let defaults = config.procurement_defaults();
        Self {
            report: Arc::new(SupplierQuotationComparisonReport::new(
                store.clone(),
                defaults.clone(),
            )),
            procurement: Arc::new(ProcurementService::new(store, defaults)),
            config,
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Full HTTP surface
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest(
            "/api/v1",
            handlers::supplier_quotations::supplier_quotation_routes(),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

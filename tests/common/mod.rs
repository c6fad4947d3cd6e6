#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{header, Method, Request},
    response::Response,
    Router,
};
use chrono::Utc;
use rfq_comparison::{
    api_router,
    config::{AppConfig, ProcurementDefaults},
    db,
    entities::{
        purchase_order, purchase_order_item, rfq_item, rfq_supplier, supplier_quotation,
        supplier_quotation_item, DocStatus,
    },
    repositories::SeaOrmProcurementStore,
    AppState,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::Value;
use tower::ServiceExt;

pub const COMPANY: &str = "Timaflor Ltd";
pub const CURRENCY: &str = "KES";

pub fn defaults() -> ProcurementDefaults {
    ProcurementDefaults::new(COMPANY, CURRENCY)
}

pub fn app_config() -> AppConfig {
    let mut cfg = AppConfig::new("sqlite::memory:".to_string(), "test".to_string());
    cfg.default_company = Some(COMPANY.to_string());
    cfg.default_currency = Some(CURRENCY.to_string());
    cfg
}

/// Helper harness backed by a freshly migrated in-memory SQLite database.
pub struct TestDb {
    pub db: Arc<DatabaseConnection>,
    pub store: Arc<SeaOrmProcurementStore>,
}

impl TestDb {
    pub async fn new() -> Self {
        let pool = db::establish_connection("sqlite::memory:")
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db = Arc::new(pool);
        Self {
            store: Arc::new(SeaOrmProcurementStore::new(db.clone())),
            db,
        }
    }

    pub async fn add_rfq_item(&self, rfq: &str, item_code: &str, qty: f64) {
        rfq_item::ActiveModel {
            rfq: Set(rfq.to_string()),
            item_code: Set(item_code.to_string()),
            item_name: Set(format!("{} name", item_code)),
            uom: Set("Nos".to_string()),
            qty: Set(qty),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .expect("insert rfq item");
    }

    pub async fn link_supplier(&self, rfq: &str, supplier: &str) {
        rfq_supplier::ActiveModel {
            rfq: Set(rfq.to_string()),
            supplier: Set(supplier.to_string()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .expect("insert rfq supplier");
    }

    pub async fn add_quotation(
        &self,
        name: &str,
        supplier: &str,
        currency: Option<&str>,
        docstatus: DocStatus,
    ) {
        supplier_quotation::ActiveModel {
            name: Set(name.to_string()),
            supplier: Set(supplier.to_string()),
            currency: Set(currency.map(str::to_string)),
            docstatus: Set(docstatus),
        }
        .insert(&*self.db)
        .await
        .expect("insert supplier quotation");
    }

    pub async fn add_quotation_item(
        &self,
        name: &str,
        quotation: &str,
        item_code: &str,
        qty: f64,
        rate: Option<f64>,
    ) {
        supplier_quotation_item::ActiveModel {
            name: Set(name.to_string()),
            parent: Set(quotation.to_string()),
            item_code: Set(item_code.to_string()),
            item_name: Set(format!("{} name", item_code)),
            uom: Set("Nos".to_string()),
            qty: Set(qty),
            rate: Set(rate),
            custom_po_created: Set(false),
        }
        .insert(&*self.db)
        .await
        .expect("insert supplier quotation item");
    }

    pub async fn add_purchase_order(
        &self,
        name: &str,
        supplier: &str,
        docstatus: DocStatus,
        lines: &[(&str, f64, f64)],
    ) {
        let today = Utc::now().date_naive();
        purchase_order::ActiveModel {
            name: Set(name.to_string()),
            supplier: Set(supplier.to_string()),
            company: Set(COMPANY.to_string()),
            currency: Set(CURRENCY.to_string()),
            transaction_date: Set(today),
            schedule_date: Set(today),
            docstatus: Set(docstatus),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await
        .expect("insert purchase order");

        for (item_code, qty, rate) in lines {
            purchase_order_item::ActiveModel {
                parent: Set(name.to_string()),
                item_code: Set(item_code.to_string()),
                item_name: Set(None),
                uom: Set(None),
                qty: Set(*qty),
                rate: Set(*rate),
                schedule_date: Set(today),
                uom_conversion_factor: Set(1.0),
                ..Default::default()
            }
            .insert(&*self.db)
            .await
            .expect("insert purchase order item");
        }
    }

    pub async fn quotation_item(&self, name: &str) -> supplier_quotation_item::Model {
        supplier_quotation_item::Entity::find_by_id(name.to_string())
            .one(&*self.db)
            .await
            .expect("query supplier quotation item")
            .expect("supplier quotation item exists")
    }

    pub async fn purchase_orders_for(&self, supplier: &str) -> Vec<purchase_order::Model> {
        purchase_order::Entity::find()
            .filter(purchase_order::Column::Supplier.eq(supplier))
            .order_by_asc(purchase_order::Column::CreatedAt)
            .all(&*self.db)
            .await
            .expect("query purchase orders")
    }

    pub async fn purchase_order_items(&self, po: &str) -> Vec<purchase_order_item::Model> {
        purchase_order_item::Entity::find()
            .filter(purchase_order_item::Column::Parent.eq(po))
            .order_by_asc(purchase_order_item::Column::Id)
            .all(&*self.db)
            .await
            .expect("query purchase order items")
    }

    /// RFQ-001: items I1 (qty 10) and I2 (qty 4), suppliers S1 and S2 each with a
    /// submitted quotation covering both items.
    pub async fn seed_standard_rfq(&self) {
        self.add_rfq_item("RFQ-001", "I1", 10.0).await;
        self.add_rfq_item("RFQ-001", "I2", 4.0).await;
        self.link_supplier("RFQ-001", "S1").await;
        self.link_supplier("RFQ-001", "S2").await;

        self.add_quotation("SQ-001", "S1", None, DocStatus::Submitted).await;
        self.add_quotation_item("SQI-001", "SQ-001", "I1", 10.0, Some(12.0)).await;
        self.add_quotation_item("SQI-002", "SQ-001", "I2", 4.0, Some(30.0)).await;

        self.add_quotation("SQ-002", "S2", Some("USD"), DocStatus::Submitted).await;
        self.add_quotation_item("SQI-003", "SQ-002", "I1", 10.0, Some(15.0)).await;
        self.add_quotation_item("SQI-004", "SQ-002", "I2", 4.0, Some(25.0)).await;
    }
}

/// Router wired to a [`TestDb`], driven with `oneshot` requests.
pub struct TestApp {
    pub db: TestDb,
    router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(app_config()).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let db = TestDb::new().await;
        let router = api_router(AppState::new(db.store.clone(), config));
        Self { db, router }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

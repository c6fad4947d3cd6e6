mod common;

use assert_matches::assert_matches;
use rfq_comparison::{
    dto::procurement::JsonOrList, errors::ServiceError, services::procurement::ProcurementService,
};
use serde_json::json;

use common::{defaults, TestDb};

#[tokio::test]
async fn marking_twice_reports_the_same_count() {
    let db = TestDb::new().await;
    db.seed_standard_rfq().await;
    let service = ProcurementService::new(db.store.clone(), defaults());
    let names = vec!["SQI-001".to_string(), "SQI-002".to_string()];

    let first = service
        .mark_items_po_created(JsonOrList::List(names.iter().map(|n| json!(n)).collect()))
        .await
        .unwrap();
    let second = service
        .mark_items_po_created(JsonOrList::Encoded(r#"["SQI-001","SQI-002"]"#.to_string()))
        .await
        .unwrap();

    assert!(first.success);
    assert_eq!(first.count, 2);
    assert_eq!(first.message, "Marked 2 items as PO created");
    assert_eq!(second.count, 2);

    for name in &names {
        assert!(db.quotation_item(name).await.custom_po_created);
    }
    assert!(!db.quotation_item("SQI-003").await.custom_po_created);
}

#[tokio::test]
async fn empty_list_marks_nothing() {
    let db = TestDb::new().await;
    let service = ProcurementService::new(db.store.clone(), defaults());

    assert_eq!(service.mark_used(&[]).await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_item_stops_after_committed_ones() {
    let db = TestDb::new().await;
    db.seed_standard_rfq().await;
    let service = ProcurementService::new(db.store.clone(), defaults());

    let result = service
        .mark_used(&[
            "SQI-001".to_string(),
            "SQI-404".to_string(),
            "SQI-002".to_string(),
        ])
        .await;

    assert_matches!(result, Err(ServiceError::NotFound(_)));
    assert!(db.quotation_item("SQI-001").await.custom_po_created);
    assert!(!db.quotation_item("SQI-002").await.custom_po_created);
}

#[tokio::test]
async fn non_string_identifier_is_rejected() {
    let db = TestDb::new().await;
    db.seed_standard_rfq().await;
    let service = ProcurementService::new(db.store.clone(), defaults());

    assert_matches!(
        service
            .mark_items_po_created(JsonOrList::List(vec![json!("SQI-001"), json!(42)]))
            .await,
        Err(ServiceError::InvalidInput(_))
    );
    assert!(!db.quotation_item("SQI-001").await.custom_po_created);
}

#[tokio::test]
async fn malformed_list_is_rejected() {
    let db = TestDb::new().await;
    let service = ProcurementService::new(db.store.clone(), defaults());

    assert_matches!(
        service
            .mark_items_po_created(JsonOrList::Encoded("SQI-001".to_string()))
            .await,
        Err(ServiceError::InvalidInput(_))
    );
}

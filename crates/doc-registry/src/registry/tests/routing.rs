use super::common::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::registry::domain::InheritableField;
use crate::registry::loader::{DocumentRegistry, StaticSource};
use crate::registry::router::registry_router;
use crate::registry::seed::seed_records;

async fn loaded_router(records: Vec<Value>) -> axum::Router {
    let registry = Arc::new(DocumentRegistry::new(
        StaticSource::new(records),
        InheritableField::ALL.to_vec(),
    ));
    registry.load().await;
    registry_router(registry)
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .expect("route executes");
    let status = response.status();
    (status, read_json_body(response).await)
}

#[tokio::test]
async fn list_route_filters_by_title_and_status() {
    let router = loaded_router(seed_records()).await;

    let (status, payload) = get(
        router,
        "/api/v1/documents?q=%D0%B4%D0%BE%D0%B3%D0%BE%D0%B2%D0%BE%D1%80&status=%D0%92%20%D1%80%D0%B0%D0%B1%D0%BE%D1%82%D0%B5",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rows = payload.as_array().expect("array payload");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], "D-002");
    assert_eq!(rows[0]["status_tone"], "amber");
}

#[tokio::test]
async fn card_route_marks_inherited_fields() {
    let router = loaded_router(seed_records()).await;

    let (status, card) = get(router, "/api/v1/documents/D-001-A").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["parent"]["id"], "D-001");
    let author = card["fields"]
        .as_array()
        .expect("fields array")
        .iter()
        .find(|field| field["field"] == "author")
        .expect("author field present");
    assert_eq!(author["value"], "Иван Иванов");
    assert_eq!(author["inherited_from"]["source"], "D-001");
    assert_eq!(card["validation"]["kind"], "verdict");
    assert_eq!(card["validation"]["outcome"], "ok");
}

#[tokio::test]
async fn validation_route_reports_verdicts() {
    let router = loaded_router(sample_tree()).await;

    let (status, payload) = get(router, "/api/v1/documents/CON-1/validation").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["rule"], "payment_coverage");
    assert_eq!(payload["outcome"], "ok");
}

#[tokio::test]
async fn unknown_document_returns_not_found() {
    let router = loaded_router(seed_records()).await;

    let (status, payload) = get(router, "/api/v1/documents/D-404/resolved").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(payload["error"], "document D-404 not found");
}

#[tokio::test]
async fn reload_route_publishes_new_generation() {
    let router = loaded_router(sample_tree()).await;

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/registry/reload")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let report = read_json_body(response).await;
    assert_eq!(report["generation"], 2);
    assert_eq!(report["mode"]["state"], "primary");

    let (_, status) = get(router, "/api/v1/registry").await;
    assert_eq!(status["generation"], 2);
    assert_eq!(status["degraded"], false);
    assert_eq!(status["documents"], 5);
}

use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use doc_registry::registry::{registry_router, DocumentRegistry, DocumentSource};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_registry_routes<S>(registry: Arc<DocumentRegistry<S>>) -> axum::Router
where
    S: DocumentSource + 'static,
{
    registry_router(registry)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "loading" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use doc_registry::registry::{seed_records, StaticSource};
    use doc_registry::registry::InheritableField;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app_state() -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    fn seeded_registry() -> Arc<DocumentRegistry<StaticSource>> {
        Arc::new(DocumentRegistry::new(
            StaticSource::new(seed_records()),
            InheritableField::ALL.to_vec(),
        ))
    }

    async fn status_of(app: axum::Router, uri: &str) -> StatusCode {
        app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .expect("route executes")
            .status()
    }

    #[tokio::test]
    async fn readiness_flips_once_the_first_load_commits() {
        let state = app_state();
        let registry = seeded_registry();
        let app = with_registry_routes(registry.clone()).layer(Extension(state.clone()));

        assert_eq!(status_of(app.clone(), "/health").await, StatusCode::OK);
        assert_eq!(
            status_of(app.clone(), "/ready").await,
            StatusCode::SERVICE_UNAVAILABLE
        );

        registry.load().await;
        state.readiness.store(true, Ordering::Release);
        assert_eq!(status_of(app.clone(), "/ready").await, StatusCode::OK);
        assert_eq!(
            status_of(app, "/api/v1/documents/D-003").await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn metrics_endpoint_renders_prometheus_text() {
        let app = with_registry_routes(seeded_registry()).layer(Extension(app_state()));

        let response = app
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}

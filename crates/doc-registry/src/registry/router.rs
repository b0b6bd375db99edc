use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::DocumentId;
use super::loader::{DocumentRegistry, DocumentSource};
use super::service::RegistryError;
use super::views::{DocumentCardView, DocumentLink, DocumentSummaryView, RegistryStatusView};

/// Router builder exposing the registry query surface.
pub fn registry_router<S>(registry: Arc<DocumentRegistry<S>>) -> Router
where
    S: DocumentSource + 'static,
{
    Router::new()
        .route("/api/v1/documents", get(list_handler::<S>))
        .route("/api/v1/documents/:document_id", get(card_handler::<S>))
        .route(
            "/api/v1/documents/:document_id/resolved",
            get(resolved_handler::<S>),
        )
        .route(
            "/api/v1/documents/:document_id/validation",
            get(validation_handler::<S>),
        )
        .route(
            "/api/v1/documents/:document_id/parent",
            get(parent_handler::<S>),
        )
        .route(
            "/api/v1/documents/:document_id/children",
            get(children_handler::<S>),
        )
        .route("/api/v1/registry", get(status_handler::<S>))
        .route("/api/v1/registry/reload", post(reload_handler::<S>))
        .with_state(registry)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    q: String,
    #[serde(default)]
    status: Option<String>,
}

fn error_response(error: RegistryError) -> Response {
    let status = match error {
        RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

pub(crate) async fn list_handler<S>(
    State(registry): State<Arc<DocumentRegistry<S>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    S: DocumentSource + 'static,
{
    let snapshot = registry.snapshot();
    let documents: Vec<DocumentSummaryView> = snapshot
        .list(&query.q, query.status.as_deref())
        .into_iter()
        .map(DocumentSummaryView::from)
        .collect();
    (StatusCode::OK, Json(documents)).into_response()
}

pub(crate) async fn card_handler<S>(
    State(registry): State<Arc<DocumentRegistry<S>>>,
    Path(document_id): Path<String>,
) -> Response
where
    S: DocumentSource + 'static,
{
    let snapshot = registry.snapshot();
    match DocumentCardView::build(&snapshot, &DocumentId(document_id)) {
        Ok(card) => (StatusCode::OK, Json(card)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn resolved_handler<S>(
    State(registry): State<Arc<DocumentRegistry<S>>>,
    Path(document_id): Path<String>,
) -> Response
where
    S: DocumentSource + 'static,
{
    match registry.snapshot().resolve(&DocumentId(document_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn validation_handler<S>(
    State(registry): State<Arc<DocumentRegistry<S>>>,
    Path(document_id): Path<String>,
) -> Response
where
    S: DocumentSource + 'static,
{
    match registry.snapshot().validate(&DocumentId(document_id)) {
        Ok(validation) => (StatusCode::OK, Json(validation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn parent_handler<S>(
    State(registry): State<Arc<DocumentRegistry<S>>>,
    Path(document_id): Path<String>,
) -> Response
where
    S: DocumentSource + 'static,
{
    let snapshot = registry.snapshot();
    match snapshot.parent(&DocumentId(document_id)) {
        Ok(parent) => {
            let payload = json!({ "parent": parent.map(DocumentLink::from) });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn children_handler<S>(
    State(registry): State<Arc<DocumentRegistry<S>>>,
    Path(document_id): Path<String>,
) -> Response
where
    S: DocumentSource + 'static,
{
    let snapshot = registry.snapshot();
    match snapshot.children(&DocumentId(document_id)) {
        Ok(children) => {
            let children: Vec<DocumentSummaryView> =
                children.into_iter().map(DocumentSummaryView::from).collect();
            (StatusCode::OK, Json(children)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<S>(State(registry): State<Arc<DocumentRegistry<S>>>) -> Response
where
    S: DocumentSource + 'static,
{
    let snapshot = registry.snapshot();
    let view = RegistryStatusView::from(snapshot.as_ref());
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn reload_handler<S>(State(registry): State<Arc<DocumentRegistry<S>>>) -> Response
where
    S: DocumentSource + 'static,
{
    let report = registry.load().await;
    (StatusCode::OK, Json(report)).into_response()
}

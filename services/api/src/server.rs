use crate::cli::ServeArgs;
use crate::infra::{file_registry, AppState};
use crate::routes::with_registry_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use doc_registry::config::AppConfig;
use doc_registry::error::AppError;
use doc_registry::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let registry = file_registry(&config.registry);

    let app = with_registry_routes(registry.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let report = registry.load().await;
    if report.mode.is_degraded() {
        warn!(
            path = %config.registry.documents_path.display(),
            "serving built-in seed documents"
        );
    }
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        documents = report.documents,
        "document registry ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

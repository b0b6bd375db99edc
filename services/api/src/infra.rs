use doc_registry::config::RegistryConfig;
use doc_registry::registry::{DocumentRegistry, FileSource};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Registry reading the configured collection file, not yet loaded.
pub(crate) fn file_registry(config: &RegistryConfig) -> Arc<DocumentRegistry<FileSource>> {
    Arc::new(DocumentRegistry::new(
        FileSource::new(config.documents_path.clone()),
        config.inherited_fields.clone(),
    ))
}

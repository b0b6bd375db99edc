use std::sync::Arc;

use tracing::debug;

use super::domain::{Document, DocumentId, InheritableField};
use super::inheritance::{lineage, resolve, resolve_with, ResolvedView};
use super::loader::LoadMode;
use super::store::{DocumentStore, LoadDiagnostic};
use super::validation::{validate, AncestorChain, Validation};

/// Error raised by registry queries.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("document {0} not found")]
    NotFound(DocumentId),
}

/// Immutable document collection published by one load; the query surface for callers.
#[derive(Debug)]
pub struct RegistrySnapshot {
    store: DocumentStore,
    mode: LoadMode,
    generation: u64,
    inherited_fields: Arc<[InheritableField]>,
    diagnostics: Vec<LoadDiagnostic>,
}

impl RegistrySnapshot {
    pub fn new(
        store: DocumentStore,
        mode: LoadMode,
        generation: u64,
        inherited_fields: Arc<[InheritableField]>,
        diagnostics: Vec<LoadDiagnostic>,
    ) -> Self {
        Self {
            store,
            mode,
            generation,
            inherited_fields,
            diagnostics,
        }
    }

    pub fn mode(&self) -> &LoadMode {
        &self.mode
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn inherited_fields(&self) -> &[InheritableField] {
        &self.inherited_fields
    }

    pub fn diagnostics(&self) -> &[LoadDiagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn list(&self, title_filter: &str, status: Option<&str>) -> Vec<&Document> {
        self.store.list(title_filter, status)
    }

    pub fn get(&self, id: &DocumentId) -> Result<&Document, RegistryError> {
        self.store
            .get(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))
    }

    /// Effective field values with their provenance; computed fresh on every call.
    pub fn resolve(&self, id: &DocumentId) -> Result<ResolvedView, RegistryError> {
        let document = self.get(id)?;
        Ok(resolve(document, &self.store, &self.inherited_fields))
    }

    pub fn validate(&self, id: &DocumentId) -> Result<Validation, RegistryError> {
        let document = self.get(id)?;
        let lineage = lineage(document, &self.store);
        let view = resolve_with(document, &lineage, &self.inherited_fields);

        let ancestors = lineage
            .ancestors
            .iter()
            .map(|ancestor| resolve(ancestor, &self.store, &self.inherited_fields))
            .collect();
        let chain = AncestorChain::new(ancestors, lineage.cycle_at.clone());

        let validation = validate(&view, &chain);
        debug!(document = %id, outcome = ?validation.outcome(), "validated document");
        Ok(validation)
    }

    pub fn parent(&self, id: &DocumentId) -> Result<Option<&Document>, RegistryError> {
        let document = self.get(id)?;
        Ok(self.store.parent(document))
    }

    pub fn children(&self, id: &DocumentId) -> Result<Vec<&Document>, RegistryError> {
        let document = self.get(id)?;
        Ok(self.store.children(document))
    }
}

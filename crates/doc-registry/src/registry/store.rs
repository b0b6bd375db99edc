use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::domain::{Document, DocumentId};
use super::inheritance::DocumentLookup;
use super::record::DocumentRecord;

/// Why a record was left out of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadDiagnostic {
    /// Position of the record in the loaded collection.
    pub position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub reason: String,
}

/// Normalized documents in collection order, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
    index: HashMap<DocumentId, usize>,
}

impl DocumentStore {
    /// Normalize every record and index it; malformed and duplicate records are skipped.
    pub fn load<I>(records: I) -> (Self, Vec<LoadDiagnostic>)
    where
        I: IntoIterator<Item = Value>,
    {
        let mut store = DocumentStore::default();
        let mut diagnostics = Vec::new();

        for (position, value) in records.into_iter().enumerate() {
            let raw_id = value
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string);

            match DocumentRecord::from_value(value).and_then(Document::try_from) {
                Ok(document) => {
                    if store.index.contains_key(&document.id) {
                        warn!(position, document = %document.id, "duplicate document id rejected");
                        diagnostics.push(LoadDiagnostic {
                            position,
                            id: raw_id,
                            reason: format!("duplicate id {}", document.id),
                        });
                        continue;
                    }
                    store
                        .index
                        .insert(document.id.clone(), store.documents.len());
                    store.documents.push(document);
                }
                Err(err) => {
                    warn!(position, id = raw_id.as_deref(), error = %err, "malformed record rejected");
                    diagnostics.push(LoadDiagnostic {
                        position,
                        id: raw_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        (store, diagnostics)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.index.get(id).map(|&position| &self.documents[position])
    }

    /// Documents whose title contains `title_filter` (case-insensitive) and whose status equals
    /// `status` when one is given; an empty status means "any".
    pub fn list(&self, title_filter: &str, status: Option<&str>) -> Vec<&Document> {
        let needle = title_filter.to_lowercase();
        let status = status.filter(|status| !status.is_empty());

        self.documents
            .iter()
            .filter(|document| document.title.to_lowercase().contains(&needle))
            .filter(|document| status.map_or(true, |status| document.status == status))
            .collect()
    }

    pub fn parent(&self, document: &Document) -> Option<&Document> {
        let parent_id = document.relations.parent.as_ref()?;
        let parent = self.get(parent_id);
        if parent.is_none() {
            debug!(document = %document.id, parent = %parent_id, "parent id not registered");
        }
        parent
    }

    pub fn children(&self, document: &Document) -> Vec<&Document> {
        document
            .relations
            .children
            .iter()
            .filter_map(|child_id| {
                let child = self.get(child_id);
                if child.is_none() {
                    debug!(document = %document.id, child = %child_id, "child id not registered");
                }
                child
            })
            .collect()
    }
}

impl DocumentLookup for DocumentStore {
    fn document(&self, id: &DocumentId) -> Option<&Document> {
        self.get(id)
    }
}

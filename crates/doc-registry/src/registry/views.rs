use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{Document, DocumentId, DocumentType, InheritableField, StatusTone};
use super::inheritance::Provenance;
use super::loader::LoadMode;
use super::service::{RegistryError, RegistrySnapshot};
use super::validation::Validation;

/// Row of the document list.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummaryView {
    pub id: DocumentId,
    pub title: String,
    pub type_label: String,
    pub status: String,
    pub status_tone: StatusTone,
}

impl From<&Document> for DocumentSummaryView {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id.clone(),
            title: document.title.clone(),
            type_label: document.type_label.clone(),
            status: document.status.clone(),
            status_tone: document.status_tone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentLink {
    pub id: DocumentId,
    pub title: String,
}

impl From<&Document> for DocumentLink {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id.clone(),
            title: document.title.clone(),
        }
    }
}

/// Inheritable field as shown on a card; `inherited_from` drives the lock marker.
#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub field: InheritableField,
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherited_from: Option<Provenance>,
}

/// Everything a document card needs in one payload.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentCardView {
    pub id: DocumentId,
    pub title: String,
    pub type_label: String,
    pub document_type: DocumentType,
    pub status: String,
    pub status_tone: StatusTone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<NaiveDate>,
    pub fields: Vec<FieldView>,
    pub parent: Option<DocumentLink>,
    pub children: Vec<DocumentLink>,
    pub validation: Validation,
}

impl DocumentCardView {
    pub fn build(snapshot: &RegistrySnapshot, id: &DocumentId) -> Result<Self, RegistryError> {
        let view = snapshot.resolve(id)?;
        let validation = snapshot.validate(id)?;
        let parent = snapshot.parent(id)?.map(DocumentLink::from);
        let children = snapshot
            .children(id)?
            .into_iter()
            .map(DocumentLink::from)
            .collect();

        let fields = snapshot
            .inherited_fields()
            .iter()
            .map(|&field| FieldView {
                field,
                value: view.value(field).map(ToString::to_string),
                inherited_from: view.provenance(field).cloned(),
            })
            .collect();

        let document = &view.document;
        Ok(Self {
            id: document.id.clone(),
            title: document.title.clone(),
            type_label: document.type_label.clone(),
            document_type: document.document_type(),
            status: document.status.clone(),
            status_tone: document.status_tone(),
            version: document.version.clone(),
            created_on: document.created_on,
            fields,
            parent,
            children,
            validation,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistryStatusView {
    pub mode: LoadMode,
    pub degraded: bool,
    pub generation: u64,
    pub documents: usize,
    pub rejected: usize,
}

impl From<&RegistrySnapshot> for RegistryStatusView {
    fn from(snapshot: &RegistrySnapshot) -> Self {
        Self {
            mode: snapshot.mode().clone(),
            degraded: snapshot.mode().is_degraded(),
            generation: snapshot.generation(),
            documents: snapshot.len(),
            rejected: snapshot.diagnostics().len(),
        }
    }
}

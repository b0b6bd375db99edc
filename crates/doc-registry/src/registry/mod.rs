//! Document tree registry: relation normalization, upward field inheritance, and per-kind
//! validation of documents against their ancestors.
//!
//! Data flows one way: raw records are normalized into a [`DocumentStore`], published as an
//! immutable [`RegistrySnapshot`] by the [`DocumentRegistry`], and queried for resolved views
//! and validation verdicts.

pub mod domain;
pub mod inheritance;
pub mod loader;
pub mod record;
pub mod router;
mod seed;
pub mod service;
pub mod store;
pub mod validation;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    AgreementKind, Amount, ApplicationDetails, ContractDetails, ContractKind,
    CostCenterAllocation, Document, DocumentId, DocumentKind, DocumentType, FieldValue,
    InheritableField, Money, PaymentSplit, PaymentType, Relations, StatusTone,
};
pub use inheritance::{lineage, resolve, DocumentLookup, Lineage, Provenance, ResolvedView};
pub use loader::{
    DocumentRegistry, DocumentSource, FileSource, LoadMode, LoadReport, SourceError, StaticSource,
};
pub use record::{normalize, DocumentRecord, RecordError, RelationsRecord};
pub use router::registry_router;
pub use seed::seed_records;
pub use service::{RegistryError, RegistrySnapshot};
pub use store::{DocumentStore, LoadDiagnostic};
pub use validation::{
    validate, AgreementTemplate, AncestorChain, AncestorGap, ComparedValue, Outcome, Rule,
    Validation, Verdict,
};
pub use views::{DocumentCardView, DocumentLink, DocumentSummaryView, FieldView, RegistryStatusView};

use super::common::*;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Notify;

use crate::registry::domain::InheritableField;
use crate::registry::loader::{DocumentRegistry, FileSource, LoadMode, StaticSource};

#[tokio::test]
async fn registry_starts_unloaded_and_publishes_primary_load() {
    let registry = DocumentRegistry::new(
        StaticSource::new(sample_tree()),
        InheritableField::ALL.to_vec(),
    );
    assert!(!registry.is_loaded());
    assert!(registry.snapshot().is_empty());

    let report = registry.load().await;
    assert_eq!(report.mode, LoadMode::Primary);
    assert_eq!(report.generation, 1);
    assert_eq!(report.documents, 5);
    assert!(!report.superseded);

    let snapshot = registry.snapshot();
    assert!(registry.is_loaded());
    assert_eq!(snapshot.generation(), 1);
    assert!(snapshot.get(&id("INV-1")).is_ok());
}

#[tokio::test]
async fn unavailable_source_falls_back_to_seed_in_degraded_mode() {
    let registry = DocumentRegistry::new(UnavailableSource, InheritableField::ALL.to_vec());

    let report = registry.load().await;
    match &report.mode {
        LoadMode::Degraded { reason } => assert!(reason.contains("backend offline")),
        other => panic!("expected degraded mode, got {other:?}"),
    }

    let snapshot = registry.snapshot();
    assert!(snapshot.mode().is_degraded());
    assert_eq!(snapshot.len(), 6);
    assert!(snapshot.get(&id("D-001")).is_ok());
}

#[tokio::test]
async fn missing_file_is_reported_as_degraded() {
    let registry = DocumentRegistry::new(
        FileSource::new("does/not/exist/documents.json"),
        InheritableField::ALL.to_vec(),
    );

    let report = registry.load().await;
    assert!(report.mode.is_degraded());
    assert_eq!(report.documents, 6);
}

#[tokio::test]
async fn rejected_records_are_reported_with_the_load() {
    let registry = DocumentRegistry::new(
        StaticSource::new(vec![
            json!({ "id": "D-1", "type": "Invoice", "title": "ok" }),
            json!({ "id": "D-2", "type": "Invoice" }),
        ]),
        InheritableField::ALL.to_vec(),
    );

    let report = registry.load().await;
    assert_eq!(report.documents, 1);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(registry.snapshot().diagnostics().len(), 1);
}

#[tokio::test]
async fn superseded_load_is_discarded() {
    let gate = Arc::new(Notify::new());
    let registry = Arc::new(DocumentRegistry::new(
        ScriptedSource::new(vec![
            ScriptedFetch {
                gate: Some(gate.clone()),
                records: vec![json!({ "id": "OLD", "type": "Invoice", "title": "stale" })],
            },
            ScriptedFetch {
                gate: None,
                records: vec![json!({ "id": "NEW", "type": "Invoice", "title": "fresh" })],
            },
        ]),
        InheritableField::ALL.to_vec(),
    ));

    let slow = {
        let registry = registry.clone();
        tokio::spawn(async move { registry.load().await })
    };
    tokio::task::yield_now().await;
    while registry.source().pending() > 1 {
        tokio::task::yield_now().await;
    }

    let fresh = registry.load().await;
    assert!(!fresh.superseded);

    gate.notify_one();
    let stale = slow.await.expect("load task joins");
    assert!(stale.superseded);
    assert!(stale.generation < fresh.generation);

    let snapshot = registry.snapshot();
    assert_eq!(snapshot.generation(), fresh.generation);
    assert!(snapshot.get(&id("NEW")).is_ok());
    assert!(snapshot.get(&id("OLD")).is_err());
}

use doc_registry::registry::{
    AgreementKind, DocumentCardView, DocumentId, DocumentRegistry, FieldValue, FileSource,
    InheritableField, LoadMode, Outcome, PaymentType, RegistrySnapshot, Rule, Validation,
};
use std::sync::Arc;

const COLLECTION: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/documents.json");

async fn bundled_snapshot() -> Arc<RegistrySnapshot> {
    let registry = DocumentRegistry::new(
        FileSource::new(COLLECTION),
        InheritableField::ALL.to_vec(),
    );
    let report = registry.load().await;
    assert_eq!(report.mode, LoadMode::Primary, "bundled collection should load");
    assert!(report.rejected.is_empty(), "bundled collection is well formed");
    registry.snapshot()
}

fn outcome(snapshot: &RegistrySnapshot, id: &str) -> Outcome {
    snapshot
        .validate(&DocumentId::new(id))
        .expect("document registered")
        .outcome()
        .unwrap_or_else(|| panic!("{id} should produce a verdict"))
}

#[tokio::test]
async fn bundled_collection_mixes_legacy_and_canonical_relations() {
    let snapshot = bundled_snapshot().await;
    assert_eq!(snapshot.len(), 17);

    let legacy_children = snapshot
        .children(&DocumentId::new("D-001"))
        .expect("registered");
    assert_eq!(legacy_children.len(), 2);

    let agreement_parent = snapshot
        .parent(&DocumentId::new("AGR-031-1"))
        .expect("registered")
        .expect("legacy parentId normalized");
    assert_eq!(agreement_parent.id.as_str(), "CON-031");
}

#[tokio::test]
async fn procurement_chain_inherits_from_application_and_contract() {
    let snapshot = bundled_snapshot().await;

    let closing = snapshot
        .resolve(&DocumentId::new("CLS-031-1"))
        .expect("registered");
    assert_eq!(
        closing.value(InheritableField::BudgetArticle),
        Some(&FieldValue::Text("BA-410 Оборудование".to_string()))
    );
    assert_eq!(
        closing
            .provenance(InheritableField::BudgetArticle)
            .map(|provenance| provenance.source.as_str()),
        Some("APP-014")
    );
    assert_eq!(
        closing
            .provenance(InheritableField::Counterparty)
            .map(|provenance| provenance.source.as_str()),
        Some("CON-031"),
        "nearest ancestor wins"
    );
    assert_eq!(closing.payment_type(), Some(PaymentType::Partial));
}

#[tokio::test]
async fn bundled_collection_covers_every_rule() {
    let snapshot = bundled_snapshot().await;

    assert_eq!(outcome(&snapshot, "APP-014"), Outcome::Ok);
    assert_eq!(outcome(&snapshot, "CON-031"), Outcome::Ok);
    assert_eq!(outcome(&snapshot, "ATT-031-1"), Outcome::Ok);
    assert_eq!(outcome(&snapshot, "INV-031-1"), Outcome::Ok);
    assert_eq!(outcome(&snapshot, "INV-031-2"), Outcome::Indeterminate);
    assert_eq!(outcome(&snapshot, "CLS-031-1"), Outcome::Ok);
    assert_eq!(outcome(&snapshot, "CLS-031-2"), Outcome::Mismatch);
    assert_eq!(outcome(&snapshot, "CON-040"), Outcome::Indeterminate);
    assert_eq!(
        outcome(&snapshot, "INV-040-1"),
        Outcome::Indeterminate,
        "alternate amount keys are not read"
    );

    let blocked = snapshot
        .validate(&DocumentId::new("ATT-040-1"))
        .expect("registered");
    let verdict = blocked.verdict().expect("attachment verdict");
    assert_eq!(verdict.rule, Rule::ForbiddenRelationship);
    assert!(verdict.is_blocking());

    match snapshot
        .validate(&DocumentId::new("AGR-031-1"))
        .expect("registered")
    {
        Validation::Templates { templates } => {
            assert_eq!(templates.len(), 1);
            assert_eq!(templates[0].kind, AgreementKind::AntiCorruption);
        }
        other => panic!("expected templates, got {other:?}"),
    }
}

#[tokio::test]
async fn card_lists_configured_fields_only() {
    let registry = DocumentRegistry::new(
        FileSource::new(COLLECTION),
        vec![InheritableField::Author, InheritableField::ProjectNumber],
    );
    registry.load().await;
    let snapshot = registry.snapshot();

    let card = DocumentCardView::build(&snapshot, &DocumentId::new("D-002-1")).expect("registered");
    let fields: Vec<_> = card.fields.iter().map(|field| field.field).collect();
    assert_eq!(
        fields,
        vec![InheritableField::Author, InheritableField::ProjectNumber]
    );
    assert!(card.fields.iter().all(|field| field.inherited_from.is_some()));
    assert_eq!(card.parent.map(|link| link.id.0), Some("D-002".to_string()));
}

#[tokio::test]
async fn unreadable_collection_degrades_to_seed() {
    let registry = DocumentRegistry::new(
        FileSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml")),
        InheritableField::ALL.to_vec(),
    );

    let report = registry.load().await;
    match report.mode {
        LoadMode::Degraded { reason } => assert!(reason.contains("Cargo.toml")),
        other => panic!("expected degraded mode, got {other:?}"),
    }
    assert_eq!(registry.snapshot().len(), 6);
}

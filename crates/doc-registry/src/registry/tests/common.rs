use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};
use tokio::sync::Notify;

use crate::registry::domain::{DocumentId, InheritableField};
use crate::registry::loader::{DocumentSource, LoadMode, SourceError};
use crate::registry::service::RegistrySnapshot;
use crate::registry::store::DocumentStore;
use crate::registry::validation::{Outcome, Validation, Verdict};

pub(super) fn id(value: &str) -> DocumentId {
    DocumentId::new(value)
}

pub(super) fn snapshot(records: Vec<Value>) -> RegistrySnapshot {
    let (store, diagnostics) = DocumentStore::load(records);
    RegistrySnapshot::new(
        store,
        LoadMode::Primary,
        1,
        InheritableField::ALL.to_vec().into(),
        diagnostics,
    )
}

pub(super) fn verdict(snapshot: &RegistrySnapshot, document: &str) -> Verdict {
    match snapshot.validate(&id(document)).expect("document registered") {
        Validation::Verdict(verdict) => verdict,
        other => panic!("expected verdict for {document}, got {other:?}"),
    }
}

pub(super) fn outcome(snapshot: &RegistrySnapshot, document: &str) -> Outcome {
    verdict(snapshot, document).outcome
}

pub(super) fn application(id: &str, total: f64, centers: &[(&str, f64)]) -> Value {
    let cost_centers: Vec<Value> = centers
        .iter()
        .map(|(center, amount)| json!({ "center": center, "amount": amount }))
        .collect();
    json!({
        "id": id, "type": "Application", "title": format!("Заявка {id}"),
        "status": "В работе", "currency": "RUB",
        "author": "Иван Иванов", "organization": "ООО Ромашка",
        "budgetArticle": "BA-42", "cashFlowArticle": "CF-7",
        "totalAmount": total, "costCenters": cost_centers,
        "relations": { "parent": "", "children": [] }
    })
}

pub(super) fn contract(
    id: &str,
    parent: &str,
    prepay: f64,
    postpay: f64,
    payment_type: &str,
    kind: &str,
) -> Value {
    json!({
        "id": id, "type": "Contract", "title": format!("Договор {id}"),
        "status": "Действует", "contractKind": kind, "paymentType": payment_type,
        "counterparty": "ООО Василек",
        "payment": { "prepay": prepay, "postpay": postpay, "currency": "RUB" },
        "relations": { "parent": parent, "children": [] }
    })
}

pub(super) fn with_amount(kind: &str, id: &str, parent: &str, amount: f64) -> Value {
    json!({
        "id": id, "type": kind, "title": format!("{kind} {id}"), "status": "Черновик",
        "amount": { "value": amount, "currency": "RUB" },
        "relations": { "parent": parent, "children": [] }
    })
}

pub(super) fn sample_tree() -> Vec<Value> {
    vec![
        application("APP-1", 2_000_000.0, &[("CC-100", 1_200_000.0), ("CC-200", 800_000.0)]),
        contract("CON-1", "APP-1", 1_200_000.0, 800_000.0, "partial", "ordinary"),
        with_amount("Invoice", "INV-1", "CON-1", 600_000.0),
        with_amount("Closing", "CLS-1", "INV-1", 600_000.0),
        json!({
            "id": "AGR-1", "type": "Agreement", "title": "Соглашение об антикоррупции",
            "agreementKinds": ["AntiCorruption"],
            "parentId": "CON-1", "children": []
        }),
    ]
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Source that always fails, forcing the seed fallback.
pub(super) struct UnavailableSource;

#[async_trait]
impl DocumentSource for UnavailableSource {
    fn describe(&self) -> String {
        "unavailable".to_string()
    }

    async fn fetch(&self) -> Result<Vec<Value>, SourceError> {
        Err(SourceError::Unavailable("backend offline".to_string()))
    }
}

/// One scripted fetch: optionally waits for a release signal before answering.
pub(super) struct ScriptedFetch {
    pub(super) gate: Option<Arc<Notify>>,
    pub(super) records: Vec<Value>,
}

/// Source answering fetches from a script, in call order.
#[derive(Default)]
pub(super) struct ScriptedSource {
    script: Mutex<VecDeque<ScriptedFetch>>,
}

impl ScriptedSource {
    pub(super) fn new(script: Vec<ScriptedFetch>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }

    /// Fetches not yet started.
    pub(super) fn pending(&self) -> usize {
        self.script.lock().expect("script mutex poisoned").len()
    }
}

#[async_trait]
impl DocumentSource for ScriptedSource {
    fn describe(&self) -> String {
        "scripted".to_string()
    }

    async fn fetch(&self) -> Result<Vec<Value>, SourceError> {
        let next = self.script.lock().expect("script mutex poisoned").pop_front();
        let Some(step) = next else {
            return Err(SourceError::Unavailable("script exhausted".to_string()));
        };
        if let Some(gate) = step.gate {
            gate.notified().await;
        }
        Ok(step.records)
    }
}

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use super::domain::{Document, DocumentId, FieldValue, InheritableField, PaymentType};

/// Read access to documents by id, used to walk parent links.
pub trait DocumentLookup {
    fn document(&self, id: &DocumentId) -> Option<&Document>;
}

impl DocumentLookup for HashMap<DocumentId, Document> {
    fn document(&self, id: &DocumentId) -> Option<&Document> {
        self.get(id)
    }
}

/// Ancestors of a document, nearest first.
#[derive(Debug)]
pub struct Lineage<'a> {
    pub ancestors: Vec<&'a Document>,
    /// Id whose revisit closed a cycle in the parent chain.
    pub cycle_at: Option<DocumentId>,
}

/// Walk `relations.parent` one hop at a time until the chain ends or revisits a document.
pub fn lineage<'a, L>(document: &Document, lookup: &'a L) -> Lineage<'a>
where
    L: DocumentLookup + ?Sized,
{
    let mut visited: HashSet<&DocumentId> = HashSet::new();
    visited.insert(&document.id);

    let mut ancestors: Vec<&'a Document> = Vec::new();
    let mut next = document.relations.parent.clone();

    while let Some(parent_id) = next {
        let Some(parent) = lookup.document(&parent_id) else {
            debug!(document = %document.id, parent = %parent_id, "parent not registered; treating as root");
            return Lineage {
                ancestors,
                cycle_at: None,
            };
        };

        if !visited.insert(&parent.id) {
            debug!(document = %document.id, revisited = %parent.id, "cycle in parent chain");
            return Lineage {
                ancestors,
                cycle_at: Some(parent_id),
            };
        }

        ancestors.push(parent);
        next = parent.relations.parent.clone();
    }

    Lineage {
        ancestors,
        cycle_at: None,
    }
}

/// Source of an inherited value, for provenance markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub source: DocumentId,
    pub source_title: String,
}

/// A document overlaid with values inherited from its ancestors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedView {
    pub document: Document,
    pub values: BTreeMap<InheritableField, FieldValue>,
    pub inherited: BTreeMap<InheritableField, Provenance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_at: Option<DocumentId>,
}

impl ResolvedView {
    pub fn value(&self, field: InheritableField) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    pub fn provenance(&self, field: InheritableField) -> Option<&Provenance> {
        self.inherited.get(&field)
    }

    pub fn is_inherited(&self, field: InheritableField) -> bool {
        self.inherited.contains_key(&field)
    }

    pub fn payment_type(&self) -> Option<PaymentType> {
        match self.value(InheritableField::PaymentType) {
            Some(FieldValue::Payment(payment)) => Some(*payment),
            _ => None,
        }
    }
}

/// Resolve `fields` for `document`, taking unset values from the nearest defining ancestor.
///
/// Own values always win. Each field walks the ancestors up to the point where the chain
/// revisits a document; a field not found before that point stays unresolved. A document whose
/// own chain loops back to itself resolves no inherited fields at all.
pub fn resolve<L>(document: &Document, lookup: &L, fields: &[InheritableField]) -> ResolvedView
where
    L: DocumentLookup + ?Sized,
{
    let lineage = lineage(document, lookup);
    resolve_with(document, &lineage, fields)
}

pub(crate) fn resolve_with(
    document: &Document,
    lineage: &Lineage<'_>,
    fields: &[InheritableField],
) -> ResolvedView {
    let mut values = document.fields.clone();
    let mut inherited = BTreeMap::new();

    let on_cycle = lineage.cycle_at.as_ref() == Some(&document.id);
    if !on_cycle {
        for &field in fields {
            if values.contains_key(&field) {
                continue;
            }

            let found = lineage
                .ancestors
                .iter()
                .find_map(|ancestor| ancestor.field(field).map(|value| (*ancestor, value)));

            if let Some((ancestor, value)) = found {
                values.insert(field, value.clone());
                inherited.insert(
                    field,
                    Provenance {
                        source: ancestor.id.clone(),
                        source_title: ancestor.title.clone(),
                    },
                );
            }
        }
    }

    ResolvedView {
        document: document.clone(),
        values,
        inherited,
        cycle_at: lineage.cycle_at.clone(),
    }
}

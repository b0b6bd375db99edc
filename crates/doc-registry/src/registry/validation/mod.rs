mod rules;
mod templates;
mod verdict;

pub use templates::{select_templates, template_for, AgreementTemplate};
pub use verdict::{ComparedValue, Outcome, Rule, Validation, Verdict};

use super::domain::{DocumentId, DocumentKind, DocumentType};
use super::inheritance::ResolvedView;

/// Resolved ancestors of the document under validation, nearest first.
#[derive(Debug, Clone, Default)]
pub struct AncestorChain {
    ancestors: Vec<ResolvedView>,
    cycle_at: Option<DocumentId>,
}

/// Why a validator could not reach the ancestor it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AncestorGap {
    Absent(DocumentType),
    Cycle(DocumentId),
}

impl AncestorGap {
    pub fn describe(&self) -> String {
        match self {
            AncestorGap::Absent(DocumentType::Other) => "document has no parent".to_string(),
            AncestorGap::Absent(expected) => {
                format!("no {} ancestor to compare against", expected.label())
            }
            AncestorGap::Cycle(id) => format!("parent chain loops back to {id}"),
        }
    }
}

impl AncestorChain {
    pub fn new(ancestors: Vec<ResolvedView>, cycle_at: Option<DocumentId>) -> Self {
        Self {
            ancestors,
            cycle_at,
        }
    }

    fn check_cycle(&self) -> Result<(), AncestorGap> {
        match &self.cycle_at {
            Some(id) => Err(AncestorGap::Cycle(id.clone())),
            None => Ok(()),
        }
    }

    /// Direct parent, if the chain is sound.
    pub fn parent(&self) -> Result<Option<&ResolvedView>, AncestorGap> {
        self.check_cycle()?;
        Ok(self.ancestors.first())
    }

    /// Nearest ancestor of the given type.
    pub fn nearest(&self, document_type: DocumentType) -> Result<&ResolvedView, AncestorGap> {
        self.check_cycle()?;
        self.ancestors
            .iter()
            .find(|view| view.document.document_type() == document_type)
            .ok_or(AncestorGap::Absent(document_type))
    }
}

/// Run the rule set matching the document's kind.
pub fn validate(view: &ResolvedView, chain: &AncestorChain) -> Validation {
    match &view.document.kind {
        DocumentKind::Application(details) => Validation::Verdict(rules::application(details)),
        DocumentKind::Contract(details) => Validation::Verdict(rules::contract(details, chain)),
        DocumentKind::Attachment { .. } => Validation::Verdict(rules::attachment(chain)),
        DocumentKind::Invoice { amount } => {
            Validation::Verdict(rules::invoice(view, amount.as_ref(), chain))
        }
        DocumentKind::Closing { amount } => {
            Validation::Verdict(rules::closing(amount.as_ref(), chain))
        }
        DocumentKind::Agreement { kinds } => Validation::Templates {
            templates: select_templates(kinds),
        },
        DocumentKind::Other => Validation::NotApplicable,
    }
}

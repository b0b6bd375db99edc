use serde::Serialize;

use super::super::domain::{Amount, Money};
use super::templates::AgreementTemplate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ok,
    Mismatch,
    Indeterminate,
}

/// Rule that produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Application cost-center allocations against the declared total.
    SumReconciliation,
    /// Contract payment split against the parent application total.
    PaymentCoverage,
    /// Attachment linked under an offer contract.
    ForbiddenRelationship,
    /// Invoice amount against the contract payment limit.
    PaymentLimit,
    /// Closing amount against the limit its parent defines.
    ClosingThreshold,
}

/// One side of a comparison, kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparedValue {
    pub label: String,
    pub amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl ComparedValue {
    pub fn new(label: impl Into<String>, amount: Amount, currency: Option<&str>) -> Self {
        Self {
            label: label.into(),
            amount,
            currency: currency.map(str::to_string),
        }
    }

    pub fn money(label: impl Into<String>, money: &Money) -> Self {
        Self::new(label, money.amount, money.currency.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub rule: Rule,
    pub outcome: Outcome,
    pub message: String,
    pub compared: Vec<ComparedValue>,
}

impl Verdict {
    pub fn ok(rule: Rule, message: impl Into<String>, compared: Vec<ComparedValue>) -> Self {
        Self {
            rule,
            outcome: Outcome::Ok,
            message: message.into(),
            compared,
        }
    }

    pub fn mismatch(rule: Rule, message: impl Into<String>, compared: Vec<ComparedValue>) -> Self {
        Self {
            rule,
            outcome: Outcome::Mismatch,
            message: message.into(),
            compared,
        }
    }

    pub fn indeterminate(rule: Rule, message: impl Into<String>) -> Self {
        Self {
            rule,
            outcome: Outcome::Indeterminate,
            message: message.into(),
            compared: Vec::new(),
        }
    }

    pub fn with_compared(mut self, compared: Vec<ComparedValue>) -> Self {
        self.compared = compared;
        self
    }

    /// Mismatches of relationship rules are rendered as hard warnings.
    pub fn is_blocking(&self) -> bool {
        self.outcome == Outcome::Mismatch && self.rule == Rule::ForbiddenRelationship
    }
}

/// Result of running the rule set for a document's kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validation {
    Verdict(Verdict),
    Templates { templates: Vec<AgreementTemplate> },
    NotApplicable,
}

impl Validation {
    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            Validation::Verdict(verdict) => Some(verdict),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.verdict().map(|verdict| verdict.outcome)
    }
}

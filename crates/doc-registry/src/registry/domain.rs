use std::collections::BTreeMap;
use std::fmt;
use std::ops::Add;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed-point money magnitude in minor units (two decimals).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub const fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    /// Rounds to the nearest minor unit; `None` for NaN or infinite input.
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let minor = (value * 100.0).round();
        if minor.abs() > i64::MAX as f64 {
            return None;
        }
        Some(Self(minor as i64))
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", magnitude / 100, magnitude % 100)
    }
}

/// Declared amount together with the currency it was recorded in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Money {
    pub amount: Amount,
    pub currency: Option<String>,
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.currency {
            Some(currency) => write!(f, "{} {}", self.amount, currency),
            None => write!(f, "{}", self.amount),
        }
    }
}

/// Fields that fall back to the nearest ancestor when a document leaves them unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InheritableField {
    Author,
    Counterparty,
    ProjectNumber,
    Organization,
    BudgetArticle,
    CashFlowArticle,
    PaymentType,
}

impl InheritableField {
    pub const ALL: [InheritableField; 7] = [
        InheritableField::Author,
        InheritableField::Counterparty,
        InheritableField::ProjectNumber,
        InheritableField::Organization,
        InheritableField::BudgetArticle,
        InheritableField::CashFlowArticle,
        InheritableField::PaymentType,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            InheritableField::Author => "author",
            InheritableField::Counterparty => "counterparty",
            InheritableField::ProjectNumber => "projectNumber",
            InheritableField::Organization => "organization",
            InheritableField::BudgetArticle => "budgetArticle",
            InheritableField::CashFlowArticle => "cashFlowArticle",
            InheritableField::PaymentType => "paymentType",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Contract payment scheme driving invoice and closing limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Prepay,
    Postpay,
    Partial,
    Transfer,
}

impl PaymentType {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentType::Prepay => "prepay",
            PaymentType::Postpay => "postpay",
            PaymentType::Partial => "partial",
            PaymentType::Transfer => "transfer",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "prepay" | "prepayment" => Some(Self::Prepay),
            "postpay" | "postpayment" => Some(Self::Postpay),
            "partial" => Some(Self::Partial),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }
}

/// Value held by an inheritable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Payment(PaymentType),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Payment(payment) => f.write_str(payment.label()),
        }
    }
}

/// Canonical parent/children links of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Relations {
    pub parent: Option<DocumentId>,
    pub children: Vec<DocumentId>,
}

/// Tag-only view of [`DocumentKind`], used when looking up typed ancestors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DocumentType {
    Application,
    Contract,
    Attachment,
    Invoice,
    Closing,
    Agreement,
    Other,
}

impl DocumentType {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentType::Application => "Application",
            DocumentType::Contract => "Contract",
            DocumentType::Attachment => "Attachment",
            DocumentType::Invoice => "Invoice",
            DocumentType::Closing => "Closing",
            DocumentType::Agreement => "Agreement",
            DocumentType::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostCenterAllocation {
    pub center: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationDetails {
    pub cost_centers: Vec<CostCenterAllocation>,
    pub declared_total: Option<Amount>,
    pub currency: Option<String>,
}

impl ApplicationDetails {
    pub fn allocated_total(&self) -> Amount {
        self.cost_centers
            .iter()
            .map(|allocation| allocation.amount)
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    /// Unilateral offer; attachments may not be linked to it.
    Offer,
    Ordinary,
}

/// Canonical prepay/postpay split of a contract value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentSplit {
    pub prepay: Amount,
    pub postpay: Amount,
    pub currency: Option<String>,
}

impl PaymentSplit {
    pub fn combined(&self) -> Amount {
        self.prepay + self.postpay
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractDetails {
    pub kind: ContractKind,
    pub payment: Option<PaymentSplit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgreementKind {
    Nda,
    AntiCorruption,
}

impl AgreementKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "nda" => Some(Self::Nda),
            "anticorruption" | "anti-corruption" | "anti_corruption" => {
                Some(Self::AntiCorruption)
            }
            _ => None,
        }
    }
}

/// Type-specific attributes; each variant carries only what its rules need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentKind {
    Application(ApplicationDetails),
    Contract(ContractDetails),
    Attachment { amount: Option<Money> },
    Invoice { amount: Option<Money> },
    Closing { amount: Option<Money> },
    Agreement { kinds: Vec<AgreementKind> },
    Other,
}

impl DocumentKind {
    pub const fn document_type(&self) -> DocumentType {
        match self {
            DocumentKind::Application(_) => DocumentType::Application,
            DocumentKind::Contract(_) => DocumentType::Contract,
            DocumentKind::Attachment { .. } => DocumentType::Attachment,
            DocumentKind::Invoice { .. } => DocumentType::Invoice,
            DocumentKind::Closing { .. } => DocumentType::Closing,
            DocumentKind::Agreement { .. } => DocumentType::Agreement,
            DocumentKind::Other => DocumentType::Other,
        }
    }

    /// Declared amount for the kinds that carry a single one.
    pub fn declared_amount(&self) -> Option<&Money> {
        match self {
            DocumentKind::Attachment { amount }
            | DocumentKind::Invoice { amount }
            | DocumentKind::Closing { amount } => amount.as_ref(),
            _ => None,
        }
    }
}

/// Colour family used when rendering a status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Green,
    Blue,
    Amber,
    Gray,
}

impl StatusTone {
    pub fn for_status(status: &str) -> Self {
        match status {
            "Действует" => StatusTone::Green,
            "Подписан" => StatusTone::Blue,
            "В работе" => StatusTone::Amber,
            _ => StatusTone::Gray,
        }
    }
}

/// A registered document after relation normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub id: DocumentId,
    /// Type tag as it appeared in the source, kept for display.
    pub type_label: String,
    pub title: String,
    pub status: String,
    pub version: Option<String>,
    pub created_on: Option<NaiveDate>,
    pub relations: Relations,
    pub fields: BTreeMap<InheritableField, FieldValue>,
    pub kind: DocumentKind,
}

impl Document {
    pub fn document_type(&self) -> DocumentType {
        self.kind.document_type()
    }

    pub fn field(&self, field: InheritableField) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn status_tone(&self) -> StatusTone {
        StatusTone::for_status(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_rounds_decimal_input_to_minor_units() {
        assert_eq!(Amount::from_decimal(1200000.0), Some(Amount::from_major(1_200_000)));
        assert_eq!(Amount::from_decimal(0.125), Some(Amount::from_minor(13)));
        assert_eq!(Amount::from_decimal(f64::NAN), None);
        assert_eq!(Amount::from_minor(-250).to_string(), "-2.50");
    }

    #[test]
    fn status_tone_matches_badge_palette() {
        assert_eq!(StatusTone::for_status("Действует"), StatusTone::Green);
        assert_eq!(StatusTone::for_status("Подписан"), StatusTone::Blue);
        assert_eq!(StatusTone::for_status("В работе"), StatusTone::Amber);
        assert_eq!(StatusTone::for_status("Черновик"), StatusTone::Gray);
        assert_eq!(StatusTone::for_status("Архив"), StatusTone::Gray);
    }

    #[test]
    fn inheritable_field_names_round_trip_case_insensitively() {
        assert_eq!(
            InheritableField::from_name("cashflowarticle"),
            Some(InheritableField::CashFlowArticle)
        );
        assert_eq!(InheritableField::from_name("title"), None);
    }
}

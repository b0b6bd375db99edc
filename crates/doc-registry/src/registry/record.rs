//! Incoming record shape and relation normalization.
//!
//! Records arrive either with the canonical `relations: { parent, children }` block or with
//! the legacy `parentId` string plus a top-level `children` array. [`normalize`] folds both
//! into the canonical block without touching the input, and [`Document::try_from`] turns a
//! normalized record into the typed model.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::domain::{
    AgreementKind, Amount, ApplicationDetails, ContractDetails, ContractKind,
    CostCenterAllocation, Document, DocumentId, DocumentKind, FieldValue, InheritableField, Money,
    PaymentSplit, PaymentType, Relations,
};

/// Raw document record as found in the JSON collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relations: Option<RelationsRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_article: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_flow_article: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_centers: Option<Vec<CostCenterRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement_kinds: Option<Vec<String>>,

    /// Fields this model does not read, kept so alternate amount shapes can be reported.
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

/// Canonical relation block; an empty `parent` means "no parent".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationsRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub parent: String,
    #[serde(default)]
    pub children: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCenterRecord {
    pub center: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postpay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountRecord {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Alternate amount encodings that are recognised only to be reported.
const ALTERNATE_AMOUNT_KEYS: [&str; 4] = ["amounts", "prepay", "sumTotal", "sumNoVAT"];

/// Validation errors raised while admitting a record into the store.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record has no usable shape: {0}")]
    Shape(String),
    #[error("record is missing required field `{field}`")]
    MissingField { field: &'static str },
}

/// Fold legacy relation fields into the canonical block.
///
/// The canonical block wins when both shapes are present. The returned record never carries
/// `parentId` or a top-level `children` array, so normalizing twice is a no-op.
pub fn normalize(record: &DocumentRecord) -> DocumentRecord {
    let relations = match &record.relations {
        Some(canonical) => canonical.clone(),
        None => RelationsRecord {
            parent: record.parent_id.clone().unwrap_or_default(),
            children: record.children.clone().unwrap_or_default(),
        },
    };

    DocumentRecord {
        relations: Some(relations),
        parent_id: None,
        children: None,
        ..record.clone()
    }
}

impl DocumentRecord {
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        serde_json::from_value(value).map_err(|err| RecordError::Shape(err.to_string()))
    }
}

impl TryFrom<DocumentRecord> for Document {
    type Error = RecordError;

    fn try_from(record: DocumentRecord) -> Result<Self, Self::Error> {
        let record = normalize(&record);

        let id = required(record.id.as_deref(), "id")?;
        let type_label = required(record.type_tag.as_deref(), "type")?;
        let title = required(record.title.as_deref(), "title")?;

        let relations = record
            .relations
            .as_ref()
            .map(|relations| Relations {
                parent: Some(relations.parent.trim())
                    .filter(|parent| !parent.is_empty())
                    .map(DocumentId::new),
                children: relations
                    .children
                    .iter()
                    .filter(|child| !child.trim().is_empty())
                    .map(|child| DocumentId::new(child.trim()))
                    .collect(),
            })
            .unwrap_or_default();

        let created_on = record.date.as_deref().and_then(|raw| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|err| warn!(document = %id, date = raw, %err, "ignoring unparsable date"))
                .ok()
        });

        let fields = inheritable_fields(&record, &id);
        let kind = document_kind(&record, &type_label, &id);

        Ok(Document {
            id: DocumentId::new(id),
            type_label,
            title,
            status: record.status.clone().unwrap_or_default(),
            version: record.version.clone(),
            created_on,
            relations,
            fields,
            kind,
        })
    }
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, RecordError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(RecordError::MissingField { field })
}

fn inheritable_fields(record: &DocumentRecord, id: &str) -> BTreeMap<InheritableField, FieldValue> {
    let text_fields = [
        (InheritableField::Author, &record.author),
        (InheritableField::Counterparty, &record.counterparty),
        (InheritableField::ProjectNumber, &record.project_number),
        (InheritableField::Organization, &record.organization),
        (InheritableField::BudgetArticle, &record.budget_article),
        (InheritableField::CashFlowArticle, &record.cash_flow_article),
    ];

    let mut fields = BTreeMap::new();
    for (field, value) in text_fields {
        if let Some(value) = value.as_deref().filter(|value| !value.trim().is_empty()) {
            fields.insert(field, FieldValue::Text(value.to_string()));
        }
    }

    if let Some(raw) = record.payment_type.as_deref() {
        match PaymentType::parse(raw) {
            Some(payment) => {
                fields.insert(InheritableField::PaymentType, FieldValue::Payment(payment));
            }
            None => warn!(document = id, payment_type = raw, "unknown payment type left unset"),
        }
    }

    fields
}

fn document_kind(record: &DocumentRecord, type_label: &str, id: &str) -> DocumentKind {
    report_alternate_amounts(record, id);

    match classify(type_label) {
        Classified::Application => DocumentKind::Application(ApplicationDetails {
            cost_centers: record
                .cost_centers
                .iter()
                .flatten()
                .filter_map(|allocation| {
                    let amount = decimal(allocation.amount, id, "costCenters.amount")?;
                    Some(CostCenterAllocation {
                        center: allocation.center.clone(),
                        amount,
                    })
                })
                .collect(),
            declared_total: record
                .total_amount
                .and_then(|total| decimal(total, id, "totalAmount")),
            currency: record.currency.clone(),
        }),
        Classified::Contract => DocumentKind::Contract(ContractDetails {
            kind: contract_kind(record.contract_kind.as_deref(), id),
            payment: record.payment.as_ref().map(|payment| PaymentSplit {
                prepay: payment
                    .prepay
                    .and_then(|value| decimal(value, id, "payment.prepay"))
                    .unwrap_or(Amount::ZERO),
                postpay: payment
                    .postpay
                    .and_then(|value| decimal(value, id, "payment.postpay"))
                    .unwrap_or(Amount::ZERO),
                currency: payment.currency.clone().or_else(|| record.currency.clone()),
            }),
        }),
        Classified::Attachment => DocumentKind::Attachment {
            amount: money(record, id),
        },
        Classified::Invoice => DocumentKind::Invoice {
            amount: money(record, id),
        },
        Classified::Closing => DocumentKind::Closing {
            amount: money(record, id),
        },
        Classified::Agreement { implied_nda } => {
            let mut kinds: Vec<AgreementKind> = Vec::new();
            for raw in record.agreement_kinds.iter().flatten() {
                match AgreementKind::parse(raw) {
                    Some(kind) if !kinds.contains(&kind) => kinds.push(kind),
                    Some(_) => {}
                    None => warn!(document = id, tag = raw.as_str(), "unknown agreement kind"),
                }
            }
            if kinds.is_empty() && implied_nda {
                kinds.push(AgreementKind::Nda);
            }
            DocumentKind::Agreement { kinds }
        }
        Classified::Other => DocumentKind::Other,
    }
}

enum Classified {
    Application,
    Contract,
    Attachment,
    Invoice,
    Closing,
    Agreement { implied_nda: bool },
    Other,
}

/// Maps canonical tags and the legacy free-text labels onto the closed kind set.
fn classify(type_label: &str) -> Classified {
    let label = type_label.trim();
    let lowered = label.to_lowercase();
    match lowered.as_str() {
        "application" | "заявка" => Classified::Application,
        "contract" => Classified::Contract,
        "attachment" | "приложение" | "спецификация" => Classified::Attachment,
        "invoice" | "счет" | "счёт" => Classified::Invoice,
        "closing" | "акт" => Classified::Closing,
        "agreement" | "доп. соглашение" => Classified::Agreement { implied_nda: false },
        "nda" => Classified::Agreement { implied_nda: true },
        _ if lowered.starts_with("договор") => Classified::Contract,
        _ if lowered.starts_with("соглашение") => Classified::Agreement {
            implied_nda: lowered.contains("конфиденциальн"),
        },
        _ if lowered.starts_with("акт") => Classified::Closing,
        _ => Classified::Other,
    }
}

fn contract_kind(raw: Option<&str>, id: &str) -> ContractKind {
    match raw.map(|raw| raw.trim().to_ascii_lowercase()) {
        Some(kind) if kind == "offer" => ContractKind::Offer,
        Some(kind) if kind == "ordinary" || kind.is_empty() => ContractKind::Ordinary,
        Some(kind) => {
            warn!(document = id, contract_kind = %kind, "unknown contract kind treated as ordinary");
            ContractKind::Ordinary
        }
        None => ContractKind::Ordinary,
    }
}

fn money(record: &DocumentRecord, id: &str) -> Option<Money> {
    let amount = record.amount.as_ref()?;
    Some(Money {
        amount: decimal(amount.value, id, "amount.value")?,
        currency: amount.currency.clone().or_else(|| record.currency.clone()),
    })
}

fn decimal(value: f64, id: &str, field: &'static str) -> Option<Amount> {
    let amount = Amount::from_decimal(value);
    if amount.is_none() {
        warn!(document = id, field, "non-finite amount left unset");
    }
    amount
}

fn report_alternate_amounts(record: &DocumentRecord, id: &str) {
    for key in ALTERNATE_AMOUNT_KEYS {
        if record.extra.contains_key(key) {
            warn!(
                document = id,
                field = key,
                "alternate amount encoding is not read; use `payment` or `amount`"
            );
        }
    }
}

//! Per-kind consistency rules.
//!
//! Comparisons run on amount magnitudes only. Currencies travel with the compared values for
//! display; no conversion or cross-currency check happens here.

use super::super::domain::{
    ApplicationDetails, ContractDetails, ContractKind, DocumentKind, DocumentType, Money,
    PaymentType,
};
use super::super::inheritance::ResolvedView;
use super::verdict::{ComparedValue, Rule, Verdict};
use super::{AncestorChain, AncestorGap};

fn gap(rule: Rule, gap: AncestorGap) -> Verdict {
    Verdict::indeterminate(rule, gap.describe())
}

pub(crate) fn application(details: &ApplicationDetails) -> Verdict {
    let rule = Rule::SumReconciliation;
    let Some(declared) = details.declared_total else {
        return Verdict::indeterminate(rule, "application declares no total amount");
    };

    let allocated = details.allocated_total();
    let currency = details.currency.as_deref();
    let compared = vec![
        ComparedValue::new("cost-center allocations", allocated, currency),
        ComparedValue::new("declared total", declared, currency),
    ];

    if allocated == declared {
        Verdict::ok(
            rule,
            format!("cost-center allocations match the declared total {declared}"),
            compared,
        )
    } else {
        Verdict::mismatch(
            rule,
            format!("cost-center allocations sum to {allocated}, declared total is {declared}"),
            compared,
        )
    }
}

pub(crate) fn contract(details: &ContractDetails, chain: &AncestorChain) -> Verdict {
    let rule = Rule::PaymentCoverage;
    let Some(split) = &details.payment else {
        return Verdict::indeterminate(rule, "contract declares no prepay/postpay split");
    };

    let application = match chain.nearest(DocumentType::Application) {
        Ok(view) => view,
        Err(missing) => return gap(rule, missing),
    };
    let DocumentKind::Application(parent) = &application.document.kind else {
        return gap(rule, AncestorGap::Absent(DocumentType::Application));
    };
    let Some(required) = parent.declared_total else {
        return Verdict::indeterminate(
            rule,
            format!("application {} declares no total amount", application.document.id),
        );
    };

    let covered = split.combined();
    let compared = vec![
        ComparedValue::new("prepay + postpay", covered, split.currency.as_deref()),
        ComparedValue::new("application total", required, parent.currency.as_deref()),
    ];

    if covered >= required {
        Verdict::ok(
            rule,
            format!("payment split {covered} covers application total {required}"),
            compared,
        )
    } else {
        Verdict::mismatch(
            rule,
            format!("payment split {covered} is below application total {required}"),
            compared,
        )
    }
}

pub(crate) fn attachment(chain: &AncestorChain) -> Verdict {
    let rule = Rule::ForbiddenRelationship;
    let parent = match chain.parent() {
        Ok(parent) => parent,
        Err(missing) => return gap(rule, missing),
    };

    match parent.map(|view| (view, &view.document.kind)) {
        Some((
            view,
            DocumentKind::Contract(ContractDetails {
                kind: ContractKind::Offer,
                ..
            }),
        )) => Verdict::mismatch(
            rule,
            format!(
                "attachments are forbidden under offer contract {}",
                view.document.id
            ),
            Vec::new(),
        ),
        _ => Verdict::ok(rule, "attachment is allowed under its parent", Vec::new()),
    }
}

pub(crate) fn invoice(
    view: &ResolvedView,
    amount: Option<&Money>,
    chain: &AncestorChain,
) -> Verdict {
    let rule = Rule::PaymentLimit;
    let contract = match chain.nearest(DocumentType::Contract) {
        Ok(contract) => contract,
        Err(missing) => return gap(rule, missing),
    };
    let DocumentKind::Contract(details) = &contract.document.kind else {
        return gap(rule, AncestorGap::Absent(DocumentType::Contract));
    };
    let Some(amount) = amount else {
        return Verdict::indeterminate(rule, "invoice declares no amount");
    };
    // Contract terms take precedence; the invoice type applies only when the contract has none.
    let Some(payment_type) = contract.payment_type().or_else(|| view.payment_type()) else {
        return Verdict::indeterminate(
            rule,
            "no payment type defined for the invoice or its contract",
        );
    };

    if payment_type == PaymentType::Transfer {
        return Verdict::ok(
            rule,
            "transfer payments carry no invoice limit",
            vec![ComparedValue::money("invoice amount", amount)],
        );
    }

    let Some(split) = &details.payment else {
        return Verdict::indeterminate(
            rule,
            format!("contract {} declares no prepay/postpay split", contract.document.id),
        );
    };

    let currency = split.currency.as_deref();
    let (label, limit) = match payment_type {
        PaymentType::Prepay => ("contract prepay total", split.prepay),
        PaymentType::Postpay => ("contract postpay total", split.postpay),
        PaymentType::Partial | PaymentType::Transfer => {
            ("contract prepay + postpay total", split.combined())
        }
    };
    let compared = vec![
        ComparedValue::money("invoice amount", amount),
        ComparedValue::new(label, limit, currency),
    ];

    if payment_type == PaymentType::Partial && amount.amount == limit {
        return Verdict::indeterminate(
            rule,
            "disputed: full-amount invoice against a partially-split contract",
        )
        .with_compared(compared);
    }

    if amount.amount <= limit {
        Verdict::ok(
            rule,
            format!(
                "invoice amount {} within {} limit {limit}",
                amount.amount,
                payment_type.label()
            ),
            compared,
        )
    } else {
        Verdict::mismatch(
            rule,
            format!(
                "invoice amount {} exceeds {} limit {limit}",
                amount.amount,
                payment_type.label()
            ),
            compared,
        )
    }
}

pub(crate) fn closing(amount: Option<&Money>, chain: &AncestorChain) -> Verdict {
    let rule = Rule::ClosingThreshold;
    let parent = match chain.parent() {
        Ok(Some(parent)) => parent,
        Ok(None) => return gap(rule, AncestorGap::Absent(DocumentType::Other)),
        Err(missing) => return gap(rule, missing),
    };
    let Some(amount) = amount else {
        return Verdict::indeterminate(rule, "closing document declares no amount");
    };

    let limit = match &parent.document.kind {
        DocumentKind::Contract(details) => match (parent.payment_type(), &details.payment) {
            (Some(PaymentType::Postpay | PaymentType::Partial), Some(split)) => {
                Some(ComparedValue::new(
                    "contract postpay total",
                    split.postpay,
                    split.currency.as_deref(),
                ))
            }
            _ => None,
        },
        DocumentKind::Attachment { amount: declared } => declared
            .as_ref()
            .map(|money| ComparedValue::money("attachment total", money)),
        DocumentKind::Invoice { amount: declared } => declared
            .as_ref()
            .map(|money| ComparedValue::money("invoice total", money)),
        _ => None,
    };

    let Some(limit) = limit else {
        return Verdict::indeterminate(
            rule,
            format!(
                "no limit defined by parent {} ({})",
                parent.document.id,
                parent.document.document_type().label()
            ),
        )
        .with_compared(vec![ComparedValue::money("closing amount", amount)]);
    };

    let required = limit.amount;
    let compared = vec![ComparedValue::money("closing amount", amount), limit];

    if amount.amount >= required {
        Verdict::ok(
            rule,
            format!("closing amount {} reaches required {required}", amount.amount),
            compared,
        )
    } else {
        Verdict::mismatch(
            rule,
            format!("closing amount {} is below required {required}", amount.amount),
            compared,
        )
    }
}

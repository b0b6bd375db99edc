use serde::Serialize;

use super::super::domain::AgreementKind;

/// Boilerplate text attached to an agreement by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgreementTemplate {
    pub kind: AgreementKind,
    pub title: &'static str,
    pub body: &'static str,
}

const NDA: AgreementTemplate = AgreementTemplate {
    kind: AgreementKind::Nda,
    title: "Non-disclosure agreement",
    body: "The parties keep confidential all commercial, technical and financial information \
           received under the principal contract and disclose it to third parties only with \
           prior written consent of the disclosing party.",
};

const ANTI_CORRUPTION: AgreementTemplate = AgreementTemplate {
    kind: AgreementKind::AntiCorruption,
    title: "Anti-corruption clause",
    body: "The parties neither offer nor accept any payment, gift or benefit intended to \
           influence decisions under the principal contract and notify each other in writing \
           of any suspected violation.",
};

pub const fn template_for(kind: AgreementKind) -> AgreementTemplate {
    match kind {
        AgreementKind::Nda => NDA,
        AgreementKind::AntiCorruption => ANTI_CORRUPTION,
    }
}

/// Templates for the declared kinds in order; an agreement without kinds gets the NDA text.
pub fn select_templates(kinds: &[AgreementKind]) -> Vec<AgreementTemplate> {
    if kinds.is_empty() {
        return vec![NDA];
    }

    let mut selected: Vec<AgreementTemplate> = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        if selected.iter().all(|template| template.kind != kind) {
            selected.push(template_for(kind));
        }
    }
    selected
}

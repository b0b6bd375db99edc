use crate::infra::file_registry;
use clap::{Args, Subcommand};
use doc_registry::config::AppConfig;
use doc_registry::error::AppError;
use doc_registry::registry::{
    seed_records, DocumentCardView, DocumentId, DocumentRegistry, Outcome, RegistryError,
    RegistrySnapshot, StaticSource, Validation,
};

#[derive(Subcommand, Debug)]
pub(crate) enum DocumentsCommand {
    /// List documents, optionally filtered by title substring and exact status
    List(ListArgs),
    /// Show a document card with resolved fields, relations and validation
    Show {
        /// Document identifier, e.g. D-001
        id: String,
    },
    /// Run the consistency checks for a single document
    Validate {
        /// Document identifier, e.g. D-001
        id: String,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    /// Case-insensitive title substring
    #[arg(long, default_value = "")]
    pub(crate) query: String,
    /// Exact status label, e.g. "Действует"
    #[arg(long)]
    pub(crate) status: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct TourArgs {
    /// Run the tour over the configured collection instead of the built-in documents
    #[arg(long)]
    pub(crate) configured: bool,
}

pub(crate) async fn run_documents(command: DocumentsCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let registry = file_registry(&config.registry);
    let report = registry.load().await;
    if report.mode.is_degraded() {
        eprintln!(
            "note: {} unavailable, showing built-in documents",
            config.registry.documents_path.display()
        );
    }
    let snapshot = registry.snapshot();

    let output = match command {
        DocumentsCommand::List(args) => {
            render_list(&snapshot, &args.query, args.status.as_deref())
        }
        DocumentsCommand::Show { id } => {
            let card = DocumentCardView::build(&snapshot, &DocumentId::new(id))?;
            render_card(&card)
        }
        DocumentsCommand::Validate { id } => {
            let validation = snapshot.validate(&DocumentId::new(id))?;
            render_validation(&validation).join("\n")
        }
    };
    println!("{output}");
    Ok(())
}

pub(crate) async fn run_tour(args: TourArgs) -> Result<(), AppError> {
    let snapshot = if args.configured {
        let config = AppConfig::load()?;
        let registry = file_registry(&config.registry);
        registry.load().await;
        registry.snapshot()
    } else {
        let registry = DocumentRegistry::new(
            StaticSource::new(seed_records()),
            AppConfig::load()?.registry.inherited_fields,
        );
        registry.load().await;
        registry.snapshot()
    };

    println!("{}", tour_script(&snapshot)?);
    Ok(())
}

/// Scripted walkthrough over the query surface, one titled section per step.
pub(crate) fn tour_script(snapshot: &RegistrySnapshot) -> Result<String, RegistryError> {
    let parent = DocumentId::new("D-001");
    let child = DocumentId::new("D-001-1");
    let independent = DocumentId::new("D-003");

    let steps = [
        (
            "All documents in the registry",
            render_list(snapshot, "", None),
        ),
        (
            "Open a contract",
            render_card(&DocumentCardView::build(snapshot, &parent)?),
        ),
        (
            "Open its child: empty fields are inherited and marked with their source",
            render_card(&DocumentCardView::build(snapshot, &child)?),
        ),
        ("Relations of the contract", render_relations(snapshot, &parent)?),
        (
            "Search titles for \"договор\"",
            render_list(snapshot, "договор", None),
        ),
        (
            "An independent document keeps only its own values",
            render_card(&DocumentCardView::build(snapshot, &independent)?),
        ),
    ];

    let total = steps.len() + 1;
    let mut sections: Vec<String> = steps
        .iter()
        .enumerate()
        .map(|(index, (title, body))| {
            format!("Step {}/{total}: {title}\n{body}", index + 1)
        })
        .collect();
    sections.push(format!(
        "Step {total}/{total}: Tour complete\n  {} documents, generation {}",
        snapshot.len(),
        snapshot.generation()
    ));

    Ok(sections.join("\n\n"))
}

pub(crate) fn render_list(snapshot: &RegistrySnapshot, query: &str, status: Option<&str>) -> String {
    let documents = snapshot.list(query, status);
    if documents.is_empty() {
        return "  (no documents match)".to_string();
    }

    documents
        .into_iter()
        .map(|document| {
            format!(
                "  {:<8} {:<34} {:<18} {}",
                document.id, document.title, document.type_label, document.status
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn render_card(card: &DocumentCardView) -> String {
    let mut lines = vec![
        format!("  {} | {}", card.id, card.title),
        format!("  type: {} | status: {}", card.type_label, card.status),
    ];
    if let Some(version) = &card.version {
        lines.push(format!("  version: {version}"));
    }
    if let Some(created_on) = card.created_on {
        lines.push(format!("  date: {created_on}"));
    }

    for field in &card.fields {
        let value = field.value.as_deref().unwrap_or("-");
        match &field.inherited_from {
            Some(provenance) => lines.push(format!(
                "  [locked] {}: {value} (from {} {})",
                field.field.name(),
                provenance.source,
                provenance.source_title
            )),
            None => lines.push(format!("  {}: {value}", field.field.name())),
        }
    }

    if let Some(parent) = &card.parent {
        lines.push(format!("  parent: {} {}", parent.id, parent.title));
    }
    for child in &card.children {
        lines.push(format!("  child: {} {}", child.id, child.title));
    }

    lines.extend(render_validation(&card.validation));
    lines.join("\n")
}

fn render_relations(snapshot: &RegistrySnapshot, id: &DocumentId) -> Result<String, RegistryError> {
    let mut lines = Vec::new();
    match snapshot.parent(id)? {
        Some(parent) => lines.push(format!("  parent: {} {}", parent.id, parent.title)),
        None => lines.push("  parent: none".to_string()),
    }
    let children = snapshot.children(id)?;
    if children.is_empty() {
        lines.push("  children: none".to_string());
    }
    for child in children {
        lines.push(format!("  child: {} {} ({})", child.id, child.title, child.status));
    }
    Ok(lines.join("\n"))
}

pub(crate) fn render_validation(validation: &Validation) -> Vec<String> {
    match validation {
        Validation::Verdict(verdict) => {
            let mut lines = vec![format!(
                "  check: {} - {}",
                outcome_label(verdict.outcome),
                verdict.message
            )];
            for value in &verdict.compared {
                let currency = value.currency.as_deref().unwrap_or("");
                lines.push(format!("    {}: {} {currency}", value.label, value.amount));
            }
            if verdict.is_blocking() {
                lines.push("    blocking: the link must be removed".to_string());
            }
            lines
        }
        Validation::Templates { templates } => templates
            .iter()
            .map(|template| format!("  template: {}", template.title))
            .collect(),
        Validation::NotApplicable => vec!["  check: not applicable".to_string()],
    }
}

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Ok => "OK",
        Outcome::Mismatch => "MISMATCH",
        Outcome::Indeterminate => "INDETERMINATE",
    }
}

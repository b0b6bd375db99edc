use crate::demo::{run_documents, run_tour, DocumentsCommand, TourArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use doc_registry::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Document Registry",
    about = "Serve and explore the document tree registry from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Query documents from the configured collection
    Documents {
        #[command(subcommand)]
        command: DocumentsCommand,
    },
    /// Walk through the registry step by step: list, open, inherit, relate, search
    Tour(TourArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Documents { command } => run_documents(command).await,
        Command::Tour(args) => run_tour(args).await,
    }
}

//! CLI argument definitions

use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docqa")]
#[command(
    author,
    version,
    about = "Ask questions about a PDF and get answers grounded in its text"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest a document into the index
    Ingest(IngestArgs),

    /// Answer one question
    Ask(AskArgs),

    /// Answer questions interactively
    Chat(ChatArgs),

    /// Show the chunks retrieved for a query
    Search(SearchArgs),

    /// Manage collections
    Collection(CollectionArgs),

    /// Show index status
    Status,
}

#[derive(Args)]
pub struct IngestArgs {
    /// Document to ingest (defaults to DOCQA_PDF_PATH or document.pdf)
    pub path: Option<PathBuf>,

    /// Target collection
    #[arg(short, long)]
    pub collection: Option<String>,

    /// Chunks per embedding request
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Delete the collection before ingesting
    #[arg(long)]
    pub reset: bool,
}

#[derive(Args)]
pub struct AskArgs {
    /// The question
    #[arg(required = true)]
    pub question: Vec<String>,

    /// Collection to answer from
    #[arg(short, long)]
    pub collection: Option<String>,

    /// Number of chunks to retrieve
    #[arg(short = 'k', long, value_parser = at_least_one())]
    pub top_k: Option<usize>,
}

#[derive(Args)]
pub struct ChatArgs {
    /// Collection to answer from
    #[arg(short, long)]
    pub collection: Option<String>,

    /// Number of chunks to retrieve
    #[arg(short = 'k', long, value_parser = at_least_one())]
    pub top_k: Option<usize>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search query
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Collection to search
    #[arg(short, long)]
    pub collection: Option<String>,

    /// Maximum results
    #[arg(short = 'n', long, value_parser = at_least_one())]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct CollectionArgs {
    #[command(subcommand)]
    pub action: CollectionAction,
}

#[derive(Subcommand)]
pub enum CollectionAction {
    /// List collections
    List,
    /// Remove a collection and its chunks
    Remove { name: String },
}

#[derive(Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Cli,
    Json,
}

/// Parser for counts that must be positive
fn at_least_one() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::<usize>::new().range(1..)
}

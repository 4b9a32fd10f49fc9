//! docqa CLI
//!
//! Ask questions about a PDF and get answers grounded in its text.

use anyhow::Result;
use clap::Parser;
use docqa_core::error::exit_codes;
use docqa_core::{Config, Database, DocQaError};

mod app;
mod commands;
mod progress;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let db_path = config.database_path();
    tracing::info!("Using index at {}", db_path.display());
    let db = Database::open(&db_path)?;
    db.initialize()?;

    match cli.command {
        Commands::Ingest(args) => commands::ingest::run(args, &db, &config).await,
        Commands::Ask(args) => commands::ask::run(args, &db, &config, cli.format).await,
        Commands::Chat(args) => commands::chat::run(args, &db, &config).await,
        Commands::Search(args) => commands::search::run(args, &db, &config, cli.format).await,
        Commands::Collection(args) => commands::collection::run(args, &db, cli.format).await,
        Commands::Status => commands::status::run(&db, &config, cli.format).await,
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<DocQaError>()
        .map(DocQaError::exit_code)
        .unwrap_or(exit_codes::GENERAL_ERROR)
}

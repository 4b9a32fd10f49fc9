//! Ingest command

use crate::app::IngestArgs;
use crate::progress::ProgressReporter;
use anyhow::Result;
use docqa_core::document::ensure_readable;
use docqa_core::{
    ingest_file, providers_from_config, Config, Database, IngestOptions, IngestProgress,
};
use std::sync::Arc;

pub async fn run(args: IngestArgs, db: &Database, config: &Config) -> Result<()> {
    let path = args.path.unwrap_or_else(|| config.pdf_path.clone());
    let collection = args.collection.unwrap_or_else(|| config.collection.clone());

    let mut options = IngestOptions::from(&config.chunking);
    if let Some(batch_size) = args.batch_size {
        options.batch_size = batch_size;
    }

    // Fail on a missing source before asking for credentials
    ensure_readable(&path)?;
    let providers = providers_from_config(&config.llm_service)?;

    if args.reset && db.delete_collection(&collection)? {
        println!("Removed existing collection '{}'", collection);
    }

    let reporter = Arc::new(ProgressReporter::new("Embedding"));
    let callback_reporter = reporter.clone();

    let stats = ingest_file(
        &path,
        providers.embedder.as_ref(),
        db,
        &collection,
        options,
        Some(Box::new(move |progress: IngestProgress| {
            callback_reporter.report(&progress)
        })),
    )
    .await;
    reporter.finish();
    let stats = stats?;

    println!(
        "Ingestion complete: {} chunks from '{}' into '{}'.",
        stats.chunks,
        path.display(),
        collection
    );
    Ok(())
}

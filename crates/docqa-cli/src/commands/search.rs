//! Search command

use crate::app::{OutputFormat, SearchArgs};
use anyhow::Result;
use docqa_core::{providers_from_config, retrieve, Config, Database};

const SNIPPET_CHARS: usize = 100;

pub async fn run(
    args: SearchArgs,
    db: &Database,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let query = args.query.join(" ");
    let collection = args.collection.unwrap_or_else(|| config.collection.clone());
    let limit = args.limit.unwrap_or(config.top_k);

    let providers = providers_from_config(&config.llm_service)?;
    let results = retrieve(&query, providers.embedder.as_ref(), db, &collection, limit).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        OutputFormat::Cli => {
            if results.is_empty() {
                println!("No results found");
            }
            for result in &results {
                let chunk = &result.indexed.chunk;
                println!(
                    "{:.3}  p.{:<4} {}",
                    result.score,
                    chunk.source_page,
                    snippet(&chunk.text)
                );
            }
        }
    }
    Ok(())
}

/// First characters of a chunk on one line
fn snippet(text: &str) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > SNIPPET_CHARS {
        let cut: String = flat.chars().take(SNIPPET_CHARS).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}

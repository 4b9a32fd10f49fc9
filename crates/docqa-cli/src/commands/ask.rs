//! Ask command

use crate::app::{AskArgs, OutputFormat};
use anyhow::Result;
use docqa_core::{answer, providers_from_config, Answer, Config, Database};

pub async fn run(
    args: AskArgs,
    db: &Database,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let question = args.question.join(" ");
    let collection = args.collection.unwrap_or_else(|| config.collection.clone());
    let top_k = args.top_k.unwrap_or(config.top_k);

    let providers = providers_from_config(&config.llm_service)?;
    let reply = answer(
        &question,
        providers.embedder.as_ref(),
        providers.generator.as_ref(),
        db,
        &collection,
        top_k,
    )
    .await;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    }

    match reply {
        Answer::Answered { text } => {
            if format == OutputFormat::Cli {
                println!("{}", text);
            }
            Ok(())
        }
        failed => anyhow::bail!("{}", failed),
    }
}

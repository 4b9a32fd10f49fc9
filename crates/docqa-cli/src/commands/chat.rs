//! Interactive question loop

use crate::app::ChatArgs;
use anyhow::Result;
use docqa_core::{answer, providers_from_config, Config, Database};
use std::io::{IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tokio::io::{AsyncBufReadExt, BufReader};

const EXIT_WORDS: &[&str] = &["exit", "quit", "sair"];

pub async fn run(args: ChatArgs, db: &Database, config: &Config) -> Result<()> {
    let collection = args.collection.unwrap_or_else(|| config.collection.clone());
    let top_k = args.top_k.unwrap_or(config.top_k);
    let providers = providers_from_config(&config.llm_service)?;

    let choice = if std::io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        eprint!("Ask a question ('exit' to quit): ");
        std::io::stderr().flush().ok();

        let Some(line) = lines.next_line().await? else {
            eprintln!();
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&question.to_lowercase().as_str()) {
            break;
        }

        let reply = answer(
            question,
            providers.embedder.as_ref(),
            providers.generator.as_ref(),
            db,
            &collection,
            top_k,
        )
        .await;

        write_labelled(&mut stdout, "QUESTION:", Color::Cyan, question)?;
        write_labelled(&mut stdout, "ANSWER:", Color::Green, &reply.into_text())?;
        writeln!(stdout)?;
    }

    Ok(())
}

fn write_labelled(out: &mut StandardStream, label: &str, color: Color, text: &str) -> Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{}", label)?;
    out.reset()?;
    writeln!(out, " {}", text)?;
    Ok(())
}

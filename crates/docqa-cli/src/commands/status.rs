//! Status command

use crate::app::OutputFormat;
use anyhow::Result;
use docqa_core::{Config, Database, Vendor};

pub async fn run(db: &Database, config: &Config, format: OutputFormat) -> Result<()> {
    let stats = db.get_stats()?;
    let vendor = Vendor::select(&config.llm_service).ok();
    let vendor_name = vendor.map(|v| v.to_string());

    match format {
        OutputFormat::Json => {
            let status = serde_json::json!({
                "database": config.database_path(),
                "collection": config.collection,
                "vendor": vendor_name,
                "index": stats,
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        OutputFormat::Cli => {
            println!("Database:        {}", config.database_path().display());
            println!("Collection:      {}", config.collection);
            println!(
                "Provider:        {}",
                vendor_name.as_deref().unwrap_or("not configured")
            );
            println!();
            println!("Collections:     {}", stats.collection_count);
            println!("Chunks:          {}", stats.chunk_count);
            if let Some(version) = stats.schema_version {
                println!("Schema version:  {}", version);
            }
        }
    }
    Ok(())
}

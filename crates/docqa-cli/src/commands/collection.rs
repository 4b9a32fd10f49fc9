//! Collection management commands

use crate::app::{CollectionAction, CollectionArgs, OutputFormat};
use anyhow::Result;
use docqa_core::{Database, DocQaError};

pub async fn run(args: CollectionArgs, db: &Database, format: OutputFormat) -> Result<()> {
    match args.action {
        CollectionAction::List => {
            let collections = db.list_collections()?;
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&collections)?);
            } else if collections.is_empty() {
                println!("No collections");
            } else {
                for coll in collections {
                    println!(
                        "{}: {} chunks, {} dimensions (updated {})",
                        coll.name, coll.chunk_count, coll.dimensions, coll.updated_at
                    );
                }
            }
        }
        CollectionAction::Remove { name } => {
            if !db.delete_collection(&name)? {
                return Err(DocQaError::CollectionNotFound(name).into());
            }
            println!("Removed collection '{}'", name);
        }
    }
    Ok(())
}

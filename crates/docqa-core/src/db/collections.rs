//! Collection operations

use super::Database;
use crate::error::Result;
use rusqlite::params;

/// Collection info
#[derive(Debug, Clone, serde::Serialize)]
pub struct CollectionInfo {
    pub name: String,
    pub dimensions: usize,
    pub chunk_count: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl Database {
    /// List all collections with chunk counts
    pub fn list_collections(&self) -> Result<Vec<CollectionInfo>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.name, c.dimensions, c.created_at, c.updated_at,
                    (SELECT COUNT(*) FROM chunks k WHERE k.collection = c.name)
             FROM collections c
             ORDER BY c.name",
        )?;

        let results = stmt
            .query_map([], |row| {
                Ok(CollectionInfo {
                    name: row.get(0)?,
                    dimensions: row.get::<_, i64>(1)? as usize,
                    created_at: row.get(2)?,
                    updated_at: row.get(3)?,
                    chunk_count: row.get::<_, i64>(4)? as usize,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(results)
    }

    /// Remove a collection and every chunk in it.
    ///
    /// Returns false when the collection did not exist.
    pub fn delete_collection(&self, name: &str) -> Result<bool> {
        self.conn.execute("BEGIN IMMEDIATE", [])?;
        let result = (|| -> Result<bool> {
            let chunks = self
                .conn
                .execute("DELETE FROM chunks WHERE collection = ?1", params![name])?;
            let rows = self
                .conn
                .execute("DELETE FROM collections WHERE name = ?1", params![name])?;
            tracing::info!("Deleted collection '{}' ({} chunks)", name, chunks);
            Ok(rows > 0)
        })();

        if result.is_ok() {
            self.conn.execute("COMMIT", [])?;
        } else {
            let _ = self.conn.execute("ROLLBACK", []);
        }
        result
    }
}

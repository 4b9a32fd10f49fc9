//! Index statistics

use super::Database;
use crate::error::Result;
use serde::Serialize;

/// Index statistics
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub collection_count: usize,
    pub chunk_count: usize,
    pub schema_version: Option<i32>,
}

impl Database {
    /// Get index statistics
    pub fn get_stats(&self) -> Result<IndexStats> {
        let collection_count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM collections", [], |row| row.get(0))?;
        let chunk_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;

        Ok(IndexStats {
            collection_count: collection_count as usize,
            chunk_count: chunk_count as usize,
            schema_version: self.schema_version()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        let stats = db.get_stats().unwrap();
        assert_eq!(stats.collection_count, 0);
        assert_eq!(stats.chunk_count, 0);
        assert_eq!(stats.schema_version, Some(1));
    }
}

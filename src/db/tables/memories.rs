//! Memory database operations

use chrono::Utc;
use rusqlite::Result as SqliteResult;
use serde_json::Value;

use super::super::Database;
use crate::db::MemoryStore;
use crate::models::MemoryRecord;

impl Database {
    pub fn insert_memory(
        &self,
        content: &str,
        source: &str,
        source_id: Option<&str>,
        metadata: Option<&Value>,
    ) -> SqliteResult<i64> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO memories (content, source, source_id, metadata, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                content,
                source,
                source_id,
                metadata.map(|m| m.to_string()),
                now
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn list_recent_memories(&self, limit: usize) -> SqliteResult<Vec<MemoryRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, content, source, source_id, metadata, created_at
             FROM memories ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;

        let memories = stmt
            .query_map([limit as i64], |row| {
                let metadata: Option<String> = row.get(4)?;
                Ok(MemoryRecord {
                    id: row.get(0)?,
                    content: row.get(1)?,
                    source: row.get(2)?,
                    source_id: row.get(3)?,
                    metadata: metadata.and_then(|m| serde_json::from_str(&m).ok()),
                    created_at: row.get(5)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(memories)
    }
}

impl MemoryStore for Database {
    fn store(
        &self,
        content: &str,
        source: &str,
        source_id: Option<&str>,
        metadata: Option<&Value>,
    ) -> Result<i64, String> {
        self.insert_memory(content, source, source_id, metadata)
            .map_err(|e| e.to_string())
    }
}

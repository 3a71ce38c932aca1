//! Audit trail database operations

use chrono::Utc;
use rusqlite::Result as SqliteResult;
use serde_json::Value;

use super::super::Database;
use crate::db::AuditSink;
use crate::models::AuditRecord;

impl Database {
    pub fn insert_audit_record(
        &self,
        action: &str,
        actor: Option<&str>,
        resource: Option<&str>,
        resource_id: Option<&str>,
        details: Option<&Value>,
    ) -> SqliteResult<i64> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO audit_log (action, actor, resource, resource_id, details, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                action,
                actor,
                resource,
                resource_id,
                details.map(|d| d.to_string()),
                now
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn list_recent_audit_records(&self, limit: usize) -> SqliteResult<Vec<AuditRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, action, actor, resource, resource_id, details, created_at
             FROM audit_log ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;

        let records = stmt
            .query_map([limit as i64], |row| {
                let details: Option<String> = row.get(5)?;
                Ok(AuditRecord {
                    id: row.get(0)?,
                    action: row.get(1)?,
                    actor: row.get(2)?,
                    resource: row.get(3)?,
                    resource_id: row.get(4)?,
                    details: details.and_then(|d| serde_json::from_str(&d).ok()),
                    created_at: row.get(6)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(records)
    }
}

impl AuditSink for Database {
    fn log(
        &self,
        action: &str,
        actor: Option<&str>,
        resource: Option<&str>,
        resource_id: Option<&str>,
        details: Option<&Value>,
    ) -> Result<(), String> {
        self.insert_audit_record(action, actor, resource, resource_id, details)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

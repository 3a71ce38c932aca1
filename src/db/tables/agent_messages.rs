//! Agent message queue database operations

use chrono::Utc;
use rusqlite::Result as SqliteResult;
use serde_json::Value;
use uuid::Uuid;

use super::super::Database;
use crate::models::{AgentMessage, MessageStatus};

const MESSAGE_COLUMNS: &str = "id, message_id, from_agent, to_agent, intent, payload, status,
                               created_at, processed_at, result, error_message";

impl Database {
    /// Persist a new inter-agent message with status `pending`.
    /// Enqueuing never invokes the receiving agent; the poller does that.
    pub fn enqueue_agent_message(
        &self,
        from_agent: &str,
        to_agent: &str,
        intent: &str,
        payload: &Value,
    ) -> SqliteResult<AgentMessage> {
        let conn = self.conn();
        let message_id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO agent_messages (message_id, from_agent, to_agent, intent, payload, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6)",
            rusqlite::params![
                message_id,
                from_agent,
                to_agent,
                intent,
                serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string()),
                now
            ],
        )?;

        let id = conn.last_insert_rowid();
        conn.query_row(
            &format!("SELECT {} FROM agent_messages WHERE id = ?1", MESSAGE_COLUMNS),
            [id],
            Self::map_message_row,
        )
    }

    pub fn get_agent_message(&self, id: i64) -> SqliteResult<Option<AgentMessage>> {
        let conn = self.conn();
        match conn.query_row(
            &format!("SELECT {} FROM agent_messages WHERE id = ?1", MESSAGE_COLUMNS),
            [id],
            Self::map_message_row,
        ) {
            Ok(msg) => Ok(Some(msg)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn get_agent_message_by_message_id(
        &self,
        message_id: &str,
    ) -> SqliteResult<Option<AgentMessage>> {
        let conn = self.conn();
        match conn.query_row(
            &format!(
                "SELECT {} FROM agent_messages WHERE message_id = ?1",
                MESSAGE_COLUMNS
            ),
            [message_id],
            Self::map_message_row,
        ) {
            Ok(msg) => Ok(Some(msg)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Oldest-first batch of `pending` messages, for the poller.
    pub fn list_pending_agent_messages(&self, limit: usize) -> SqliteResult<Vec<AgentMessage>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM agent_messages WHERE status = 'pending'
             ORDER BY created_at ASC, id ASC LIMIT ?1",
            MESSAGE_COLUMNS
        ))?;

        let messages = stmt
            .query_map([limit as i64], Self::map_message_row)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(messages)
    }

    /// Most-recent-first listing, optionally filtered by status.
    pub fn list_agent_messages(
        &self,
        status: Option<MessageStatus>,
        limit: usize,
    ) -> SqliteResult<Vec<AgentMessage>> {
        let conn = self.conn();
        let messages = match status {
            Some(status) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM agent_messages WHERE status = ?1
                     ORDER BY created_at DESC, id DESC LIMIT ?2",
                    MESSAGE_COLUMNS
                ))?;
                stmt.query_map(
                    rusqlite::params![status.to_string(), limit as i64],
                    Self::map_message_row,
                )?
                .filter_map(|r| r.ok())
                .collect()
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM agent_messages
                     ORDER BY created_at DESC, id DESC LIMIT ?1",
                    MESSAGE_COLUMNS
                ))?;
                stmt.query_map([limit as i64], Self::map_message_row)?
                    .filter_map(|r| r.ok())
                    .collect()
            }
        };
        Ok(messages)
    }

    /// Claim a pending message for processing.
    ///
    /// The update is conditional on the current status, so two pollers
    /// racing for the same row cannot both win: the loser sees zero rows
    /// affected and returns `false`.
    pub fn claim_agent_message(&self, id: i64) -> SqliteResult<bool> {
        let conn = self.conn();
        let rows = conn.execute(
            "UPDATE agent_messages SET status = 'processing'
             WHERE id = ?1 AND status = 'pending'",
            [id],
        )?;
        Ok(rows > 0)
    }

    pub fn mark_agent_message_processed(&self, id: i64, result: &str) -> SqliteResult<()> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "UPDATE agent_messages SET status = 'processed', processed_at = ?1, result = ?2
             WHERE id = ?3",
            rusqlite::params![now, result, id],
        )?;
        Ok(())
    }

    pub fn mark_agent_message_failed(&self, id: i64, error: &str) -> SqliteResult<()> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "UPDATE agent_messages SET status = 'failed', processed_at = ?1, error_message = ?2
             WHERE id = ?3",
            rusqlite::params![now, error, id],
        )?;
        Ok(())
    }

    fn map_message_row(row: &rusqlite::Row) -> SqliteResult<AgentMessage> {
        let payload: String = row.get(5)?;
        let status: String = row.get(6)?;
        Ok(AgentMessage {
            id: row.get(0)?,
            message_id: row.get(1)?,
            from_agent: row.get(2)?,
            to_agent: row.get(3)?,
            intent: row.get(4)?,
            payload: serde_json::from_str(&payload).unwrap_or(Value::Null),
            status: status.parse().unwrap_or(MessageStatus::Pending),
            created_at: row.get(7)?,
            processed_at: row.get(8)?,
            result: row.get(9)?,
            error_message: row.get(10)?,
        })
    }
}

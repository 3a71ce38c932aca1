//! SQLite database handle and schema migrations.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Result as SqliteResult;
use std::path::Path;

pub type DbConn = PooledConnection<SqliteConnectionManager>;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS agent_messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    message_id TEXT NOT NULL UNIQUE,
    from_agent TEXT NOT NULL,
    to_agent TEXT NOT NULL,
    intent TEXT NOT NULL,
    payload TEXT NOT NULL DEFAULT '{}',
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL,
    processed_at TEXT,
    result TEXT,
    error_message TEXT
);
CREATE INDEX IF NOT EXISTS idx_agent_messages_status
    ON agent_messages(status, created_at);

CREATE TABLE IF NOT EXISTS memories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content TEXT NOT NULL,
    source TEXT NOT NULL,
    source_id TEXT,
    metadata TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS audit_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    action TEXT NOT NULL,
    actor TEXT,
    resource TEXT,
    resource_id TEXT,
    details TEXT,
    created_at TEXT NOT NULL
);
";

pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    pub fn new(path: &str) -> Result<Self, String> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create database directory: {}", e))?;
            }
        }

        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder()
            .max_size(8)
            .build(manager)
            .map_err(|e| format!("Failed to create connection pool: {}", e))?;

        let db = Database { pool };
        db.run_migrations()
            .map_err(|e| format!("Failed to run migrations: {}", e))?;
        Ok(db)
    }

    /// Get a pooled connection. Pool exhaustion is a deployment bug, not
    /// a recoverable condition, so this panics rather than propagating.
    pub fn conn(&self) -> DbConn {
        self.pool.get().expect("Database connection pool exhausted")
    }

    fn run_migrations(&self) -> SqliteResult<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA)
    }
}

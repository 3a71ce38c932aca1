pub mod sqlite;
pub mod tables;

pub use sqlite::{Database, DbConn};

use serde_json::Value;

/// Durable memory collaborator. Writes are fire-and-forget from the
/// caller's point of view: failures are logged, never surfaced.
pub trait MemoryStore: Send + Sync {
    fn store(
        &self,
        content: &str,
        source: &str,
        source_id: Option<&str>,
        metadata: Option<&Value>,
    ) -> Result<i64, String>;
}

/// Audit trail collaborator, same fire-and-forget contract.
pub trait AuditSink: Send + Sync {
    fn log(
        &self,
        action: &str,
        actor: Option<&str>,
        resource: Option<&str>,
        resource_id: Option<&str>,
        details: Option<&Value>,
    ) -> Result<(), String>;
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    pub action: String,
    pub actor: Option<String>,
    pub resource: Option<String>,
    pub resource_id: Option<String>,
    pub details: Option<Value>,
    pub created_at: String,
}

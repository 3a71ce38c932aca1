use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored memory row. Written fire-and-forget after a reasoning call;
/// read back by operators or future retrieval indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: i64,
    pub content: String,
    pub source: String,
    pub source_id: Option<String>,
    pub metadata: Option<Value>,
    pub created_at: String,
}

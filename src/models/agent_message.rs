use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Life-cycle of an inter-agent message.
///
/// Transitions are monotonic and one-directional:
/// pending → processing → {processed | failed}. A message is never
/// re-queued automatically and never deleted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Pending,
    Processing,
    Processed,
    Failed,
}

/// One unit of inter-agent delegation, persisted in `agent_messages`.
///
/// Created by a reasoning engine's delegate action; mutated only by the
/// poller. Timestamps are RFC 3339 strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMessage {
    pub id: i64,
    pub message_id: String,
    pub from_agent: String,
    pub to_agent: String,
    pub intent: String,
    pub payload: Value,
    pub status: MessageStatus,
    pub created_at: String,
    pub processed_at: Option<String>,
    pub result: Option<String>,
    pub error_message: Option<String>,
}

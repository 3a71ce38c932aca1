//! Inter-agent delegation tool
//!
//! Queues a message for another agent instead of invoking it directly.
//! The receiving agent is driven later by the message poller, so the
//! sender never blocks on the delegate's reasoning loop.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolInputSchema, ToolResult,
};

pub const SEND_AGENT_MESSAGE: &str = "send_agent_message";

pub struct SendAgentMessageTool {
    definition: ToolDefinition,
}

impl SendAgentMessageTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();

        properties.insert(
            "to".to_string(),
            PropertySchema {
                schema_type: "string".to_string(),
                description: "Name of the agent to hand this work to.".to_string(),
                default: None,
                items: None,
                enum_values: None,
            },
        );

        properties.insert(
            "intent".to_string(),
            PropertySchema {
                schema_type: "string".to_string(),
                description: "Short label describing what the receiving agent should do."
                    .to_string(),
                default: None,
                items: None,
                enum_values: None,
            },
        );

        properties.insert(
            "payload".to_string(),
            PropertySchema {
                schema_type: "object".to_string(),
                description: "Structured data the receiving agent needs to act.".to_string(),
                default: Some(Value::Object(serde_json::Map::new())),
                items: None,
                enum_values: None,
            },
        );

        SendAgentMessageTool {
            definition: ToolDefinition {
                name: SEND_AGENT_MESSAGE.to_string(),
                description: "Queue a message for another agent. The message is delivered \
                              asynchronously; this call returns as soon as it is queued."
                    .to_string(),
                input_schema: ToolInputSchema {
                    schema_type: "object".to_string(),
                    properties,
                    required: vec!["to".to_string(), "intent".to_string()],
                },
            },
        }
    }
}

impl Default for SendAgentMessageTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct SendAgentMessageParams {
    to: String,
    intent: String,
    #[serde(default)]
    payload: Value,
}

#[async_trait]
impl Tool for SendAgentMessageTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let params: SendAgentMessageParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        let db = match &context.db {
            Some(db) => db,
            None => return ToolResult::error("Message queue is not available in this context"),
        };

        let from = context.agent.as_deref().unwrap_or("system");
        let payload = if params.payload.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            params.payload
        };

        match db.enqueue_agent_message(from, &params.to, &params.intent, &payload) {
            Ok(message) => {
                log::info!(
                    "[TOOLS] Queued message {} from '{}' to '{}' ({})",
                    message.message_id,
                    from,
                    params.to,
                    params.intent
                );
                let mut result = ToolResult::success(format!(
                    "Message queued for agent '{}' with intent '{}'",
                    params.to, params.intent
                ));
                result.metadata = Some(serde_json::json!({ "message_id": message.message_id }));
                result
            }
            Err(e) => ToolResult::error(format!("Failed to queue message: {}", e)),
        }
    }
}

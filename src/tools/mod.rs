pub mod builtin;
pub mod registry;
pub mod types;

pub use builtin::send_agent_message::SEND_AGENT_MESSAGE;
pub use registry::{Tool, ToolRegistry};
pub use types::{PropertySchema, ToolContext, ToolDefinition, ToolInputSchema, ToolResult};

use std::sync::Arc;

/// Create a registry pre-loaded with the built-in tools.
/// Domain tools are registered on top of this by the embedding
/// application.
pub fn create_default_registry() -> ToolRegistry {
    let registry = ToolRegistry::new();
    registry.register(Arc::new(builtin::SendAgentMessageTool::new()));
    registry
}

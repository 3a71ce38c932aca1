pub mod send_agent_message;

pub use send_agent_message::SendAgentMessageTool;

pub mod agent_message;
pub mod audit;
pub mod memory;

pub use agent_message::{AgentMessage, MessageStatus};
pub use audit::AuditRecord;
pub use memory::MemoryRecord;

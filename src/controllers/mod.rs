pub mod agent_messages;
pub mod chat;
pub mod health;
pub mod tools;

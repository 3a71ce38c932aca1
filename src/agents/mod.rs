pub mod config;
pub mod decision;
pub mod engine;
pub mod manager;
pub mod poller;
pub mod prompt;

pub use config::AgentConfig;
pub use decision::{AgentAction, ReasoningStep};
pub use engine::{EngineError, ReasoningEngine};
pub use manager::{AgentManager, RouteError};
pub use poller::MessagePoller;

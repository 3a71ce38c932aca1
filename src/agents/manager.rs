//! Agent manager
//!
//! Owns the set of configured reasoning engines for the process
//! lifetime and routes externally triggered input to them.

use dashmap::DashMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::engine::{EngineError, ReasoningEngine};

#[derive(Debug)]
pub enum RouteError {
    UnknownAgent(String),
    Engine(EngineError),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::UnknownAgent(name) => write!(f, "Agent '{}' not found", name),
            RouteError::Engine(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RouteError {}

pub struct AgentManager {
    engines: DashMap<String, Arc<ReasoningEngine>>,
}

impl AgentManager {
    pub fn new() -> Self {
        AgentManager {
            engines: DashMap::new(),
        }
    }

    pub fn register(&self, engine: ReasoningEngine) {
        let name = engine.name().to_string();
        if self.engines.insert(name.clone(), Arc::new(engine)).is_some() {
            log::warn!("[MANAGER] Replacing existing agent '{}'", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<ReasoningEngine>> {
        self.engines.get(name).map(|e| e.value().clone())
    }

    pub fn agent_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.engines.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Synchronous entry point for externally triggered interaction:
    /// resolve the target engine and drive its reasoning loop to a
    /// final response.
    pub async fn route_message(
        &self,
        agent: &str,
        input: &str,
        metadata: Option<&Value>,
    ) -> Result<String, RouteError> {
        let engine = self
            .get(agent)
            .ok_or_else(|| RouteError::UnknownAgent(agent.to_string()))?;
        engine
            .reason(input, metadata)
            .await
            .map_err(RouteError::Engine)
    }
}

impl Default for AgentManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::config::AgentConfig;
    use crate::ai::{AiError, CompletionClient};
    use crate::tools::ToolRegistry;
    use async_trait::async_trait;

    struct FixedCompletion(String);

    #[async_trait]
    impl CompletionClient for FixedCompletion {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, AiError> {
            Ok(self.0.clone())
        }
    }

    fn engine(name: &str, response: &str) -> ReasoningEngine {
        let config = AgentConfig {
            name: name.to_string(),
            identity: format!("the {} test agent", name),
            instructions: "Answer plainly.".to_string(),
            allowed_tools: Vec::new(),
            use_context: false,
            use_memory: false,
        };
        ReasoningEngine::new(
            config,
            Arc::new(FixedCompletion(format!(
                "Action: respond\nObservation: {}",
                response
            ))),
            Arc::new(ToolRegistry::new()),
        )
    }

    #[tokio::test]
    async fn test_route_to_registered_agent() {
        let manager = AgentManager::new();
        manager.register(engine("frontdesk", "Hello"));

        let response = manager
            .route_message("frontdesk", "hi", None)
            .await
            .unwrap();
        assert_eq!(response, "Hello");
    }

    #[tokio::test]
    async fn test_route_to_unknown_agent() {
        let manager = AgentManager::new();
        manager.register(engine("frontdesk", "Hello"));

        let err = manager.route_message("ghost", "hi", None).await.unwrap_err();
        assert!(matches!(err, RouteError::UnknownAgent(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_agent_names_sorted() {
        let manager = AgentManager::new();
        manager.register(engine("zeta", "z"));
        manager.register(engine("alpha", "a"));

        assert_eq!(manager.agent_names(), vec!["alpha", "zeta"]);
        assert_eq!(manager.len(), 2);
        assert!(!manager.is_empty());
    }
}

//! Agent configuration
//!
//! One `AgentConfig` per named agent, immutable after construction.
//! Configs are read from an optional JSON file so deployments can swap
//! personas without a rebuild; the compiled-in defaults keep the binary
//! runnable out of the box.

use serde::{Deserialize, Serialize};

use crate::tools::SEND_AGENT_MESSAGE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    /// Free-text persona, e.g. "the front desk assistant of a hospital ward".
    pub identity: String,
    pub instructions: String,
    /// Names of the tools this agent may invoke. The agent never sees
    /// tools outside this set.
    #[serde(default)]
    pub allowed_tools: Vec<String>,
    #[serde(default)]
    pub use_context: bool,
    #[serde(default)]
    pub use_memory: bool,
}

pub fn load_agents_file(path: &str) -> Result<Vec<AgentConfig>, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read agents file '{}': {}", path, e))?;
    serde_json::from_str(&raw).map_err(|e| format!("Failed to parse agents file '{}': {}", path, e))
}

pub fn default_agents() -> Vec<AgentConfig> {
    vec![
        AgentConfig {
            name: "frontdesk".to_string(),
            identity: "the front desk assistant of a hospital ward".to_string(),
            instructions: "Answer questions from staff and visitors directly when you can. \
                           Hand anything that needs cross-team coordination to the \
                           'coordinator' agent and tell the caller it has been passed on."
                .to_string(),
            allowed_tools: vec![SEND_AGENT_MESSAGE.to_string()],
            use_context: true,
            use_memory: true,
        },
        AgentConfig {
            name: "coordinator".to_string(),
            identity: "the operations coordinator of a hospital ward".to_string(),
            instructions: "You receive delegated work items from other agents. Work through \
                           each request step by step and report a concise outcome."
                .to_string(),
            allowed_tools: vec![SEND_AGENT_MESSAGE.to_string()],
            use_context: false,
            use_memory: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_agents() {
        let agents = default_agents();
        assert!(agents.iter().any(|a| a.name == "frontdesk"));
        assert!(agents.iter().all(|a| !a.identity.is_empty()));
    }

    #[test]
    fn test_load_agents_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("agents.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"[{{"name": "triage", "identity": "a triage nurse", "instructions": "Sort intake requests.", "allowed_tools": ["send_agent_message"], "use_context": true}}]"#
        )
        .unwrap();

        let agents = load_agents_file(path.to_str().unwrap()).unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].name, "triage");
        assert!(agents[0].use_context);
        assert!(!agents[0].use_memory);
    }

    #[test]
    fn test_load_agents_file_missing() {
        assert!(load_agents_file("/nonexistent/agents.json").is_err());
    }
}

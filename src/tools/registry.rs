use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::tools::types::{ToolContext, ToolDefinition, ToolResult};

/// Trait that all tools must implement
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool definition rendered into agent prompts
    fn definition(&self) -> ToolDefinition;

    /// Executes the tool with the given parameters
    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult;

    /// Returns the tool's name
    fn name(&self) -> String {
        self.definition().name.clone()
    }
}

/// Registry that holds all available tools.
/// Uses interior mutability (RwLock) so tools can be registered at
/// runtime without requiring &mut self.
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        ToolRegistry {
            tools: RwLock::new(HashMap::new()),
        }
    }

    /// Register a tool. Last registration wins: re-registering an
    /// existing name replaces it with a warning, not an error.
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name.clone();
        if self.tools.write().insert(name.clone(), tool).is_some() {
            log::warn!("[REGISTRY] Replacing existing tool '{}'", name);
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.read().get(name).cloned()
    }

    /// Definitions for the given subset of tools, or all tools when the
    /// subset is omitted. Sorted by name so prompts are deterministic.
    pub fn definitions_for(&self, names: Option<&[String]>) -> Vec<ToolDefinition> {
        let tools = self.tools.read();
        let mut definitions: Vec<ToolDefinition> = match names {
            Some(names) => names
                .iter()
                .filter_map(|name| tools.get(name).map(|t| t.definition()))
                .collect(),
            None => tools.values().map(|t| t.definition()).collect(),
        };
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Execute a tool by name.
    ///
    /// Parameters are validated against the tool's declared schema
    /// before the handler runs, so malformed calls fail uniformly
    /// instead of handler-specifically. The handler is invoked at most
    /// once and its outcome is reported as-is.
    pub async fn execute(&self, name: &str, params: Value, context: &ToolContext) -> ToolResult {
        let tool = match self.get(name) {
            Some(t) => t,
            None => return ToolResult::error(format!("Tool '{}' not found", name)),
        };

        if let Err(e) = tool.definition().input_schema.validate(&params) {
            return ToolResult::error(format!("Invalid parameters for tool '{}': {}", name, e));
        }

        tool.execute(params, context).await
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.read().contains_key(name)
    }

    /// Get count of registered tools
    pub fn len(&self) -> usize {
        self.tools.read().len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.read().is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::types::{PropertySchema, ToolInputSchema};

    struct MockTool {
        definition: ToolDefinition,
        reply: String,
    }

    impl MockTool {
        fn new(name: &str, reply: &str) -> Self {
            MockTool {
                definition: ToolDefinition {
                    name: name.to_string(),
                    description: format!("Mock {} tool", name),
                    input_schema: ToolInputSchema::default(),
                },
                reply: reply.to_string(),
            }
        }

        fn with_required_string(mut self, property: &str) -> Self {
            self.definition.input_schema.properties.insert(
                property.to_string(),
                PropertySchema {
                    schema_type: "string".to_string(),
                    description: String::new(),
                    default: None,
                    items: None,
                    enum_values: None,
                },
            );
            self.definition
                .input_schema
                .required
                .push(property.to_string());
            self
        }
    }

    #[async_trait]
    impl Tool for MockTool {
        fn definition(&self) -> ToolDefinition {
            self.definition.clone()
        }

        async fn execute(&self, _params: Value, _context: &ToolContext) -> ToolResult {
            ToolResult::success(self.reply.clone())
        }
    }

    #[test]
    fn test_register_and_get() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(MockTool::new("echo", "ok")));

        assert!(registry.has_tool("echo"));
        assert!(!registry.has_tool("nonexistent"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reregistering_overwrites() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(MockTool::new("echo", "first")));
        registry.register(Arc::new(MockTool::new("echo", "second")));

        assert_eq!(registry.len(), 1);
        let definition = registry.get("echo").unwrap().definition();
        assert_eq!(definition.name, "echo");
    }

    #[test]
    fn test_definitions_for_subset() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(MockTool::new("alpha", "a")));
        registry.register(Arc::new(MockTool::new("beta", "b")));
        registry.register(Arc::new(MockTool::new("gamma", "c")));

        let subset = registry.definitions_for(Some(&[
            "gamma".to_string(),
            "alpha".to_string(),
            "missing".to_string(),
        ]));
        let names: Vec<&str> = subset.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "gamma"]);

        let all = registry.definitions_for(None);
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let registry = ToolRegistry::new();
        let result = registry
            .execute("missing", serde_json::json!({}), &ToolContext::default())
            .await;

        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_execute_validates_params() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(
            MockTool::new("echo", "ok").with_required_string("message"),
        ));

        let result = registry
            .execute("echo", serde_json::json!({}), &ToolContext::default())
            .await;
        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("Invalid parameters"));

        let result = registry
            .execute(
                "echo",
                serde_json::json!({"message": "hi"}),
                &ToolContext::default(),
            )
            .await;
        assert!(result.success);
        assert_eq!(result.content, "ok");
    }
}

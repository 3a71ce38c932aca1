//! Per-agent reasoning loop
//!
//! One engine owns one agent's identity, tool whitelist, and iteration
//! loop. Tool and parse failures are converted into observations the
//! model sees on its next iteration; they never escape `reason`. Only
//! context retrieval and the completion call itself can fail the call.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::config::AgentConfig;
use super::decision::{self, AgentAction, ReasoningStep};
use super::prompt;
use crate::ai::{AiError, CompletionClient};
use crate::context::{ContextBuilder, ContextOptions};
use crate::db::{AuditSink, Database, MemoryStore};
use crate::tools::{ToolContext, ToolRegistry, SEND_AGENT_MESSAGE};

pub const DEFAULT_MAX_ITERATIONS: usize = 5;

const WAIT_RESPONSE: &str = "I need more information before I can continue.";
const LIMIT_RESPONSE: &str = "Reasoning limit reached without a final response.";
const FALLBACK_RESPONSE: &str = "I was unable to produce a response.";

/// How much of the input the audit trail keeps.
const AUDIT_INPUT_MAX: usize = 200;

#[derive(Debug)]
pub enum EngineError {
    EmptyInput,
    Context(String),
    Completion(AiError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::EmptyInput => write!(f, "Input must not be empty"),
            EngineError::Context(e) => write!(f, "Context retrieval failed: {}", e),
            EngineError::Completion(e) => write!(f, "Completion failed: {}", e),
        }
    }
}

impl std::error::Error for EngineError {}

pub struct ReasoningEngine {
    config: AgentConfig,
    completion: Arc<dyn CompletionClient>,
    registry: Arc<ToolRegistry>,
    context_builder: Option<Arc<dyn ContextBuilder>>,
    memory: Option<Arc<dyn MemoryStore>>,
    audit: Option<Arc<dyn AuditSink>>,
    db: Option<Arc<Database>>,
    max_iterations: usize,
}

impl ReasoningEngine {
    pub fn new(
        config: AgentConfig,
        completion: Arc<dyn CompletionClient>,
        registry: Arc<ToolRegistry>,
    ) -> Self {
        ReasoningEngine {
            config,
            completion,
            registry,
            context_builder: None,
            memory: None,
            audit: None,
            db: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_context_builder(mut self, builder: Arc<dyn ContextBuilder>) -> Self {
        self.context_builder = Some(builder);
        self
    }

    pub fn with_memory(mut self, memory: Arc<dyn MemoryStore>) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Database handle passed through to tools (the delegation tool
    /// needs it to reach the message queue).
    pub fn with_database(mut self, db: Arc<Database>) -> Self {
        self.db = Some(db);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Drive the reasoning loop for one input and produce the final
    /// textual response.
    pub async fn reason(
        &self,
        input: &str,
        metadata: Option<&Value>,
    ) -> Result<String, EngineError> {
        if input.trim().is_empty() {
            return Err(EngineError::EmptyInput);
        }

        let context = match (&self.context_builder, self.config.use_context) {
            (Some(builder), true) => Some(
                builder
                    .build_context(input, &ContextOptions::default())
                    .await
                    .map_err(EngineError::Context)?,
            ),
            _ => None,
        };

        let tool_definitions = self
            .registry
            .definitions_for(Some(&self.config.allowed_tools));
        let system_prompt = prompt::build_system_prompt(
            &self.config,
            context.as_ref().map(|c| c.context_string.as_str()),
            metadata,
            &tool_definitions,
        );
        let tool_context = ToolContext {
            agent: Some(self.config.name.clone()),
            db: self.db.clone(),
        };

        let mut history: Vec<ReasoningStep> = Vec::new();
        let mut final_response: Option<String> = None;

        for iteration in 0..self.max_iterations {
            let user_message = prompt::build_user_message(input, &history);
            let raw = self
                .completion
                .complete(&system_prompt, &user_message)
                .await
                .map_err(EngineError::Completion)?;

            let mut step = decision::parse_step(&raw);
            log::debug!(
                "[ENGINE] {} iteration {}: action={}",
                self.config.name,
                iteration + 1,
                step.action.as_str()
            );

            match step.action {
                AgentAction::Respond => {
                    let response = step
                        .observation
                        .clone()
                        .filter(|s| !s.is_empty())
                        .unwrap_or_else(|| raw.trim().to_string());
                    history.push(step);
                    final_response = Some(response);
                    break;
                }
                AgentAction::Wait => {
                    let response = step
                        .observation
                        .clone()
                        .filter(|s| !s.is_empty())
                        .unwrap_or_else(|| WAIT_RESPONSE.to_string());
                    history.push(step);
                    final_response = Some(response);
                    break;
                }
                AgentAction::ToolCall => {
                    if let (Some(tool), Some(tool_input)) = (step.tool.clone(), step.tool_input.clone()) {
                        let result = self
                            .registry
                            .execute(&tool, tool_input, &tool_context)
                            .await;
                        step.observation = Some(if result.success {
                            result.content
                        } else {
                            format!(
                                "Tool '{}' failed: {}",
                                tool,
                                result.error.unwrap_or_default()
                            )
                        });
                    }
                    // An unresolvable tool input leaves the observation
                    // empty; the next iteration sees a no-op step.
                    history.push(step);
                }
                AgentAction::Delegate => {
                    let send_input = step
                        .tool_input
                        .clone()
                        .unwrap_or(Value::Object(serde_json::Map::new()));
                    let target = send_input
                        .get("to")
                        .and_then(|v| v.as_str())
                        .unwrap_or("unknown")
                        .to_string();
                    let result = self
                        .registry
                        .execute(SEND_AGENT_MESSAGE, send_input, &tool_context)
                        .await;
                    step.observation = Some(if result.success {
                        format!("Delegation message sent to '{}'.", target)
                    } else {
                        format!(
                            "Delegation failed: {}",
                            result.error.unwrap_or_default()
                        )
                    });
                    history.push(step);
                }
            }
        }

        let final_response = final_response.unwrap_or_else(|| LIMIT_RESPONSE.to_string());
        let final_response = if final_response.trim().is_empty() {
            FALLBACK_RESPONSE.to_string()
        } else {
            final_response
        };

        self.record_side_effects(input, &final_response, history.len());
        Ok(final_response)
    }

    /// Best-effort memory and audit writes. Failures are logged and
    /// swallowed; they must not alter the returned response.
    fn record_side_effects(&self, input: &str, response: &str, iterations: usize) {
        if self.config.use_memory {
            if let Some(memory) = &self.memory {
                let content = format!("Q: {}\nA: {}", input, response);
                let source = format!("agent:{}", self.config.name);
                if let Err(e) = memory.store(&content, &source, None, None) {
                    log::warn!("[ENGINE] {}: memory write failed: {}", self.config.name, e);
                }
            }
        }

        if let Some(audit) = &self.audit {
            let truncated: String = input.chars().take(AUDIT_INPUT_MAX).collect();
            let details = serde_json::json!({
                "input": truncated,
                "iterations": iterations,
            });
            if let Err(e) = audit.log(
                "agent_reason",
                Some(&self.config.name),
                Some("agent"),
                None,
                Some(&details),
            ) {
                log::warn!("[ENGINE] {}: audit write failed: {}", self.config.name, e);
            }
        }
    }
}

//! Completion output → reasoning step
//!
//! The reasoning protocol asks the model for a single JSON object, which
//! deserializes directly into a `ReasoningStep`. Older prompts produced
//! labeled `Thought:/Action:/...` lines instead; that format is still
//! accepted through the legacy parser below, and anything unparseable
//! degrades to a `respond` step so a malformed completion can never
//! crash a reasoning loop.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The four legal actions a reasoning step can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentAction {
    ToolCall,
    Respond,
    Delegate,
    Wait,
}

impl AgentAction {
    fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "tool_call" | "toolcall" | "tool" => Some(AgentAction::ToolCall),
            "respond" | "response" | "answer" => Some(AgentAction::Respond),
            "delegate" | "delegation" => Some(AgentAction::Delegate),
            "wait" => Some(AgentAction::Wait),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentAction::ToolCall => "tool_call",
            AgentAction::Respond => "respond",
            AgentAction::Delegate => "delegate",
            AgentAction::Wait => "wait",
        }
    }
}

/// One parsed thought/action/tool/observation unit. Lives only inside a
/// single reasoning call; only its effects are persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningStep {
    #[serde(default)]
    pub thought: String,
    pub action: AgentAction,
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default)]
    pub tool_input: Option<Value>,
    #[serde(default)]
    pub observation: Option<String>,
}

/// Parse one raw completion response into a step. Never fails.
pub fn parse_step(raw: &str) -> ReasoningStep {
    if let Some(value) = extract_json_object(raw) {
        if let Ok(step) = serde_json::from_value::<ReasoningStep>(value) {
            return step;
        }
    }
    parse_labeled(raw)
}

static THOUGHT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*Thought:\s*(.+)$").expect("valid regex"));
static ACTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*Action:\s*([A-Za-z_]+)").expect("valid regex"));
static TOOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*Tool:\s*(\S+)").expect("valid regex"));
static TOOL_INPUT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*Tool Input:\s*(.+)$").expect("valid regex"));
static OBSERVATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?ms)^\s*Observation:\s*(.*)").expect("valid regex"));

/// Legacy labeled-line parser. Best-effort field extraction: a missing
/// or unknown action label means `respond`.
fn parse_labeled(raw: &str) -> ReasoningStep {
    let action = ACTION_RE
        .captures(raw)
        .and_then(|c| AgentAction::from_label(&c[1]))
        .unwrap_or(AgentAction::Respond);

    let thought = THOUGHT_RE
        .captures(raw)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default();

    let tool = TOOL_RE.captures(raw).map(|c| c[1].trim().to_string());

    let mut tool_input: Option<Value> = TOOL_INPUT_RE
        .captures(raw)
        .and_then(|c| serde_json::from_str(c[1].trim()).ok());
    if tool_input.is_none() && action == AgentAction::ToolCall {
        tool_input = delegation_shaped_object(raw);
    }

    let observation = OBSERVATION_RE
        .captures(raw)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty());

    ReasoningStep {
        thought,
        action,
        tool,
        tool_input,
        observation,
    }
}

/// Secondary heuristic for unparseable tool input: accept any JSON
/// object in the response that looks like a delegation payload.
fn delegation_shaped_object(raw: &str) -> Option<Value> {
    let value = extract_json_object(raw)?;
    let obj = value.as_object()?;
    if obj.contains_key("to") && obj.contains_key("intent") && obj.contains_key("payload") {
        Some(value)
    } else {
        None
    }
}

/// Extract the first balanced JSON object embedded in `raw`, if any.
fn extract_json_object(raw: &str) -> Option<Value> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in raw[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return serde_json::from_str(&raw[start..start + i + 1]).ok();
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_structured_decision() {
        let raw = r#"{"thought": "the user greeted me", "action": "respond", "observation": "Hello!"}"#;
        let step = parse_step(raw);
        assert_eq!(step.action, AgentAction::Respond);
        assert_eq!(step.thought, "the user greeted me");
        assert_eq!(step.observation.as_deref(), Some("Hello!"));
    }

    #[test]
    fn test_parse_structured_tool_call() {
        let raw = r#"Here is my decision:
{"thought": "look it up", "action": "tool_call", "tool": "bed_lookup", "tool_input": {"ward": "B"}}"#;
        let step = parse_step(raw);
        assert_eq!(step.action, AgentAction::ToolCall);
        assert_eq!(step.tool.as_deref(), Some("bed_lookup"));
        assert_eq!(step.tool_input.unwrap()["ward"], "B");
    }

    #[test]
    fn test_parse_labeled_respond() {
        let raw = "Thought: ok\nAction: respond\nObservation: Hello";
        let step = parse_step(raw);
        assert_eq!(step.action, AgentAction::Respond);
        assert_eq!(step.thought, "ok");
        assert_eq!(step.observation.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_parse_labeled_tool_call_with_input() {
        let raw = "Thought: check\nAction: tool_call\nTool: bed_lookup\nTool Input: {\"ward\": \"B\"}";
        let step = parse_step(raw);
        assert_eq!(step.action, AgentAction::ToolCall);
        assert_eq!(step.tool.as_deref(), Some("bed_lookup"));
        assert_eq!(step.tool_input.unwrap()["ward"], "B");
    }

    #[test]
    fn test_unparseable_action_defaults_to_respond() {
        let step = parse_step("I have no idea what format this is.");
        assert_eq!(step.action, AgentAction::Respond);
        assert!(step.observation.is_none());

        let step = parse_step("Action: explode\nObservation: nope");
        assert_eq!(step.action, AgentAction::Respond);
    }

    #[test]
    fn test_tool_input_delegation_heuristic() {
        // Tool Input line is not valid JSON, but a delegation-shaped
        // object appears elsewhere in the response.
        let raw = "Action: tool_call\nTool: send_agent_message\nTool Input: see below\n\
                   {\"to\": \"coordinator\", \"intent\": \"Ping\", \"payload\": {\"x\": 1}}";
        let step = parse_step(raw);
        assert_eq!(step.action, AgentAction::ToolCall);
        let input = step.tool_input.unwrap();
        assert_eq!(input["to"], "coordinator");
        assert_eq!(input["payload"]["x"], 1);
    }

    #[test]
    fn test_tool_input_unresolvable_stays_none() {
        let raw = "Action: tool_call\nTool: bed_lookup\nTool Input: not json at all";
        let step = parse_step(raw);
        assert_eq!(step.action, AgentAction::ToolCall);
        assert!(step.tool_input.is_none());
    }

    #[test]
    fn test_parse_wait() {
        let raw = "Thought: missing details\nAction: wait\nObservation: Which ward?";
        let step = parse_step(raw);
        assert_eq!(step.action, AgentAction::Wait);
        assert_eq!(step.observation.as_deref(), Some("Which ward?"));
    }

    #[test]
    fn test_extract_json_object_handles_braces_in_strings() {
        let raw = r#"noise {"a": "curly } inside", "b": 2} trailing"#;
        let value = extract_json_object(raw).unwrap();
        assert_eq!(value, json!({"a": "curly } inside", "b": 2}));
    }
}

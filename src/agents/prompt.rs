//! Prompt assembly for reasoning calls

use serde_json::Value;

use super::config::AgentConfig;
use super::decision::ReasoningStep;
use crate::tools::ToolDefinition;

/// Fixed protocol block explaining the four legal actions. The primary
/// format is a single JSON object; the labeled-line format is kept for
/// models that ignore the JSON instruction.
const REASONING_PROTOCOL: &str = r#"Decide your next step and reply with a single JSON object:
{"thought": "...", "action": "...", "tool": "...", "tool_input": {...}, "observation": "..."}

"action" must be one of:
- "respond": you have the final answer for the caller; put it in "observation".
- "tool_call": invoke one of the available tools; set "tool" and "tool_input".
- "delegate": hand work to another agent; set "tool_input" to {"to": "<agent name>", "intent": "<short label>", "payload": {...}}.
- "wait": you cannot proceed without more information; say what is missing in "observation".

Labeled lines (Thought: / Action: / Tool: / Tool Input: / Observation:) are also accepted."#;

pub fn build_system_prompt(
    config: &AgentConfig,
    context: Option<&str>,
    metadata: Option<&Value>,
    tools: &[ToolDefinition],
) -> String {
    let mut prompt = format!("You are {}.\n\nInstructions:\n{}\n", config.identity, config.instructions);

    if let Some(context) = context.filter(|c| !c.is_empty()) {
        prompt.push_str(&format!("\n{}\n", context.trim_end()));
    }

    if let Some(metadata) = metadata {
        prompt.push_str(&format!("\nCaller metadata:\n{}\n", metadata));
    }

    prompt.push_str(&format!("\n{}\n", REASONING_PROTOCOL));

    prompt.push_str("\nAvailable tools:\n");
    prompt.push_str(
        &serde_json::to_string_pretty(tools).unwrap_or_else(|_| "[]".to_string()),
    );
    prompt.push('\n');

    prompt
}

/// Render the original input plus the steps already taken this call, so
/// the model sees its own history.
pub fn build_user_message(input: &str, history: &[ReasoningStep]) -> String {
    if history.is_empty() {
        return input.to_string();
    }

    let mut message = format!("{}\n\nSteps taken so far:\n", input);
    for step in history {
        message.push_str(&render_step(step));
        message.push('\n');
    }
    message.push_str("Decide your next step.");
    message
}

fn render_step(step: &ReasoningStep) -> String {
    let mut out = format!("Thought: {}\nAction: {}\n", step.thought, step.action.as_str());
    if let Some(tool) = &step.tool {
        out.push_str(&format!("Tool: {}\n", tool));
    }
    out.push_str(&format!(
        "Observation: {}\n",
        step.observation.as_deref().unwrap_or("")
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::decision::AgentAction;
    use crate::agents::config::default_agents;

    #[test]
    fn test_system_prompt_sections() {
        let config = &default_agents()[0];
        let metadata = serde_json::json!({"from_agent": "coordinator"});
        let prompt = build_system_prompt(
            config,
            Some("Relevant prior context:\n- [ops] Ward B closed\n"),
            Some(&metadata),
            &[],
        );

        assert!(prompt.contains(&config.identity));
        assert!(prompt.contains("Ward B closed"));
        assert!(prompt.contains("from_agent"));
        assert!(prompt.contains("\"respond\""));
        assert!(prompt.contains("Available tools:"));
    }

    #[test]
    fn test_user_message_includes_history() {
        let history = vec![ReasoningStep {
            thought: "check the roster".to_string(),
            action: AgentAction::ToolCall,
            tool: Some("roster_lookup".to_string()),
            tool_input: None,
            observation: Some("roster is empty".to_string()),
        }];

        let message = build_user_message("who is on call?", &history);
        assert!(message.starts_with("who is on call?"));
        assert!(message.contains("Action: tool_call"));
        assert!(message.contains("Tool: roster_lookup"));
        assert!(message.contains("Observation: roster is empty"));

        assert_eq!(build_user_message("plain", &[]), "plain");
    }
}

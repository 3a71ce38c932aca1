//! Shared types for the tool system

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::Database;

/// Machine-readable description of a tool, rendered into agent prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: ToolInputSchema,
}

/// JSON-schema-like declaration of a tool's parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: HashMap<String, PropertySchema>,
    pub required: Vec<String>,
}

impl Default for ToolInputSchema {
    fn default() -> Self {
        ToolInputSchema {
            schema_type: "object".to_string(),
            properties: HashMap::new(),
            required: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropertySchema>>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl ToolInputSchema {
    /// Validate inbound parameters against the declared schema.
    ///
    /// Checks that params are an object, every required property is
    /// present, and every declared property that is present matches its
    /// declared type. Undeclared extra properties are allowed.
    pub fn validate(&self, params: &Value) -> Result<(), String> {
        let obj = params
            .as_object()
            .ok_or_else(|| "parameters must be a JSON object".to_string())?;

        for required in &self.required {
            if !obj.contains_key(required) {
                return Err(format!("missing required parameter '{}'", required));
            }
        }

        for (name, schema) in &self.properties {
            if let Some(value) = obj.get(name) {
                if value.is_null() {
                    continue;
                }
                if !type_matches(&schema.schema_type, value) {
                    return Err(format!(
                        "parameter '{}' must be of type {}",
                        name, schema.schema_type
                    ));
                }
            }
        }

        Ok(())
    }
}

fn type_matches(schema_type: &str, value: &Value) -> bool {
    match schema_type {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    }
}

/// Ambient state handed to every tool execution.
#[derive(Clone, Default)]
pub struct ToolContext {
    /// Name of the agent making the call, if any.
    pub agent: Option<String>,
    /// Database handle for tools that persist state.
    pub db: Option<Arc<Database>>,
}

/// Outcome of one tool execution, reported faithfully to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        ToolResult {
            success: true,
            content: content.into(),
            error: None,
            metadata: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        let error = error.into();
        ToolResult {
            success: false,
            content: String::new(),
            error: Some(error),
            metadata: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> ToolInputSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "to".to_string(),
            PropertySchema {
                schema_type: "string".to_string(),
                description: "Target agent".to_string(),
                default: None,
                items: None,
                enum_values: None,
            },
        );
        properties.insert(
            "count".to_string(),
            PropertySchema {
                schema_type: "integer".to_string(),
                description: "How many".to_string(),
                default: None,
                items: None,
                enum_values: None,
            },
        );
        ToolInputSchema {
            schema_type: "object".to_string(),
            properties,
            required: vec!["to".to_string()],
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_params() {
        assert!(schema().validate(&json!({"to": "b", "count": 3})).is_ok());
        // Extra undeclared properties are fine.
        assert!(schema().validate(&json!({"to": "b", "other": true})).is_ok());
    }

    #[test]
    fn test_validate_rejects_non_object() {
        assert!(schema().validate(&json!("nope")).is_err());
        assert!(schema().validate(&Value::Null).is_err());
    }

    #[test]
    fn test_validate_rejects_missing_required() {
        let err = schema().validate(&json!({"count": 1})).unwrap_err();
        assert!(err.contains("'to'"));
    }

    #[test]
    fn test_validate_rejects_wrong_type() {
        let err = schema().validate(&json!({"to": 7})).unwrap_err();
        assert!(err.contains("string"));
        let err = schema()
            .validate(&json!({"to": "b", "count": "three"}))
            .unwrap_err();
        assert!(err.contains("integer"));
    }
}

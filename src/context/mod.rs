pub mod retrieval;

pub use retrieval::RetrievalClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One ranked passage returned by the retrieval collaborator.
/// Treated as read-only evidence injected into a prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedMemory {
    pub content: String,
    pub similarity: f64,
    pub source: String,
}

/// The context builder's full answer for one query.
#[derive(Debug, Clone)]
pub struct BuiltContext {
    pub context_string: String,
    pub memories: Vec<RetrievedMemory>,
}

#[derive(Debug, Clone)]
pub struct ContextOptions {
    pub limit: usize,
    pub min_similarity: f64,
    pub source: Option<String>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        ContextOptions {
            limit: 5,
            min_similarity: 0.7,
            source: None,
        }
    }
}

/// External retrieval collaborator boundary. Given a query, returns the
/// ranked relevant passages and a formatted context string.
#[async_trait]
pub trait ContextBuilder: Send + Sync {
    async fn build_context(
        &self,
        query: &str,
        options: &ContextOptions,
    ) -> Result<BuiltContext, String>;
}

/// Format ranked passages into the context block used in prompts.
pub fn format_context(memories: &[RetrievedMemory]) -> String {
    if memories.is_empty() {
        return String::new();
    }
    let mut out = String::from("Relevant prior context:\n");
    for memory in memories {
        out.push_str(&format!("- [{}] {}\n", memory.source, memory.content));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_context() {
        let memories = vec![
            RetrievedMemory {
                content: "Visitor hours end at 20:00".to_string(),
                similarity: 0.91,
                source: "handbook".to_string(),
            },
            RetrievedMemory {
                content: "Ward B is closed for cleaning".to_string(),
                similarity: 0.84,
                source: "ops".to_string(),
            },
        ];

        let formatted = format_context(&memories);
        assert!(formatted.starts_with("Relevant prior context:"));
        assert!(formatted.contains("[handbook] Visitor hours"));
        assert!(formatted.contains("[ops] Ward B"));
        assert!(format_context(&[]).is_empty());
    }
}

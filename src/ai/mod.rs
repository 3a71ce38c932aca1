pub mod claude;
pub mod types;

pub use claude::ClaudeClient;
pub use types::AiError;

use async_trait::async_trait;

/// The opaque text-completion function every reasoning engine is built
/// on. Implementations are expected to run to completion or fail; no
/// retry contract is imposed on callers.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, AiError>;
}

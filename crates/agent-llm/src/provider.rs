//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for text-generation providers
///
/// Workflow nodes treat a provider as an opaque function from a request to
/// completion text; nothing in the workflow parses what comes back.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion from the LLM
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Generate a completion and keep only its text
    async fn complete_text(&self, request: CompletionRequest) -> Result<String> {
        let response = self.complete(request).await?;
        Ok(response.message.content)
    }

    /// Get the provider name (e.g., "openai")
    fn name(&self) -> &str;
}

use super::error::Result;
use super::types::{CompletionReply, CompletionRequest};
use async_trait::async_trait;

/// Anything that can answer a chat completion request.
///
/// Implementations perform exactly one call per request and never retry.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name (for logging)
    fn name(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply>;
}

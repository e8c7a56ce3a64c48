use async_trait::async_trait;

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one chat completion with a system instruction and a single user
    /// message, returning the raw completion content.
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("empty completion")]
    EmptyCompletion,
}

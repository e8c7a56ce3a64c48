use async_trait::async_trait;

use crate::application::ports::{LlmClient, LlmClientError};

/// Canned-completion client for service and handler tests.
pub struct MockLlmClient {
    completion: Result<String, fn() -> LlmClientError>,
}

impl MockLlmClient {
    pub fn returning(completion: &str) -> Self {
        Self {
            completion: Ok(completion.to_string()),
        }
    }

    pub fn empty() -> Self {
        Self {
            completion: Err(|| LlmClientError::EmptyCompletion),
        }
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, LlmClientError> {
        match &self.completion {
            Ok(text) => Ok(text.clone()),
            Err(make) => Err(make()),
        }
    }
}

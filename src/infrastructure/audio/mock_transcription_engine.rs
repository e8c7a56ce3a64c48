use async_trait::async_trait;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

/// Fixed-transcript engine for service and handler tests.
pub struct MockTranscriptionEngine {
    transcript: Option<String>,
}

impl MockTranscriptionEngine {
    pub fn returning(transcript: &str) -> Self {
        Self {
            transcript: Some(transcript.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { transcript: None }
    }
}

#[async_trait]
impl TranscriptionEngine for MockTranscriptionEngine {
    async fn transcribe(
        &self,
        _audio_data: &[u8],
        _filename_hint: &str,
    ) -> Result<String, TranscriptionError> {
        match &self.transcript {
            Some(text) => Ok(text.clone()),
            None => Err(TranscriptionError::ProviderRejected(
                "mock rejection".to_string(),
            )),
        }
    }
}

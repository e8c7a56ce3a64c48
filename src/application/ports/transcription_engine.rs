use async_trait::async_trait;

/// Converts a fully-buffered audio byte stream into raw text.
///
/// Callers must buffer the entire upload before invoking this; engines are
/// free to replay the bytes. On a non-success provider status an engine
/// returns an error and never partially-decoded text.
#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        filename_hint: &str,
    ) -> Result<String, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("provider rejected audio: {0}")]
    ProviderRejected(String),
    #[error("empty transcript")]
    EmptyTranscript,
}

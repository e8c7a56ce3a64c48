use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Avanegar-style speech recognition endpoint. The success envelope nests
/// the transcript at `data.data.result`.
pub struct AvanegarTranscriptionEngine {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct AvanegarEnvelope {
    data: Option<AvanegarOuter>,
}

#[derive(Deserialize)]
struct AvanegarOuter {
    data: Option<AvanegarInner>,
}

#[derive(Deserialize)]
struct AvanegarInner {
    result: Option<String>,
}

impl AvanegarTranscriptionEngine {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl TranscriptionEngine for AvanegarTranscriptionEngine {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        filename_hint: &str,
    ) -> Result<String, TranscriptionError> {
        let file_part = multipart::Part::bytes(audio_data.to_vec())
            .file_name(filename_hint.to_string())
            .mime_str("audio/ogg")
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new().part("file", file_part);

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::ProviderRejected(format!(
                "status {}: {}",
                status, body
            )));
        }

        let envelope: AvanegarEnvelope = response
            .json()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("body: {}", e)))?;

        let transcript = envelope
            .data
            .and_then(|outer| outer.data)
            .and_then(|inner| inner.result)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(TranscriptionError::EmptyTranscript)?;

        tracing::info!(chars = transcript.len(), "Avanegar transcription completed");
        Ok(transcript)
    }
}

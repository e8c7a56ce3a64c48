use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Whisper-style transcription over an OpenAI-compatible
/// `/audio/transcriptions` endpoint.
pub struct WhisperTranscriptionEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    language: Option<String>,
}

impl WhisperTranscriptionEngine {
    pub fn new(
        api_key: String,
        base_url: String,
        model: Option<String>,
        language: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model: model.unwrap_or_else(|| "whisper-1".to_string()),
            language,
        }
    }
}

#[async_trait]
impl TranscriptionEngine for WhisperTranscriptionEngine {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        filename_hint: &str,
    ) -> Result<String, TranscriptionError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let file_part = multipart::Part::bytes(audio_data.to_vec())
            .file_name(filename_hint.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))?;

        let mut form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", file_part);
        if let Some(language) = &self.language {
            form = form.text("language", language.clone());
        }

        tracing::debug!(model = %self.model, bytes = audio_data.len(), "Sending audio for transcription");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
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

        let transcript = response
            .text()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("body: {}", e)))?;

        let transcript = transcript.trim().to_string();
        if transcript.is_empty() {
            return Err(TranscriptionError::EmptyTranscript);
        }

        tracing::info!(chars = transcript.len(), "Transcription completed");
        Ok(transcript)
    }
}
